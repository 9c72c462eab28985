use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod catalog;
mod error;
mod import;
mod middleware;
mod models;
mod recommend;
mod repositories;
mod routes;
mod state;

use common::database::{self, DatabaseConfig};
use common::schema;

use crate::middleware::JwtVerifier;
use crate::repositories::{
    ChapterRepository, CommentRepository, NovelRepository, OrderRepository,
    ReadingRecordRepository, UserRepository,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting platform service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    schema::ensure_schema(&pool).await?;

    // Token verification against the auth service's public key
    let jwt_verifier = JwtVerifier::from_env()?;

    let app_state = AppState {
        novel_repository: NovelRepository::new(pool.clone()),
        chapter_repository: ChapterRepository::new(pool.clone()),
        user_repository: UserRepository::new(pool.clone()),
        order_repository: OrderRepository::new(pool.clone()),
        reading_repository: ReadingRecordRepository::new(pool.clone()),
        comment_repository: CommentRepository::new(pool),
        jwt_verifier,
    };

    info!("Platform service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
    info!("Platform service listening on 0.0.0.0:3001");

    axum::serve(listener, app).await?;

    Ok(())
}
