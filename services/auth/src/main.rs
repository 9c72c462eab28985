use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod jwt;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod session;
mod validation;

use common::cache::{RedisConfig, RedisPool};
use common::database::{self, DatabaseConfig};
use common::schema;

use crate::jwt::JwtService;
use crate::models::{NewUser, Role};
use crate::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::repositories::UserRepository;
use crate::session::SessionManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub session_manager: SessionManager,
    pub user_repository: UserRepository,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    schema::ensure_schema(&pool).await?;

    // Initialize JWT service
    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    let session_manager = SessionManager::new(redis_pool.clone(), jwt_service.clone());
    let user_repository = UserRepository::new(pool.clone());
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    seed_admin(&user_repository).await?;

    let app_state = AppState {
        redis_pool,
        jwt_service,
        session_manager,
        user_repository,
        rate_limiter,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Authentication service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the admin account from env when configured and not present yet
///
/// Admin accounts cannot be self-registered; `ADMIN_USERNAME` and
/// `ADMIN_PASSWORD` provision one at startup.
async fn seed_admin(user_repository: &UserRepository) -> Result<()> {
    let (username, password) = match (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) => (username, password),
        _ => return Ok(()),
    };

    if user_repository
        .find_active_by_username(&username)
        .await?
        .is_some()
    {
        return Ok(());
    }

    user_repository
        .create(&NewUser {
            username: username.clone(),
            password,
            role: Role::Admin,
            tags: Vec::new(),
        })
        .await?;

    info!("Seeded admin account: {}", username);
    Ok(())
}
