//! Authentication service routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    jwt::TokenType,
    models::{NewUser, RegisterRequest, Role},
    validation, AppState,
};

/// Response for token issuance (register and login)
#[derive(Serialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request carrying a refresh token (refresh and logout)
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response for token refresh
#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

fn token_response(state: &AppState, user: &crate::models::User) -> Result<TokenResponse, AuthError> {
    let access_token = state.jwt_service.generate_access_token(user).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        AuthError::InternalServerError
    })?;

    let refresh_token = state.jwt_service.generate_refresh_token(user).map_err(|e| {
        error!("Failed to generate refresh token: {}", e);
        AuthError::InternalServerError
    })?;

    Ok(TokenResponse {
        user_id: user.id.to_string(),
        username: user.username.clone(),
        role: user.role,
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    })
}

/// User registration endpoint
///
/// Creates a reader or creator account and logs it in immediately. Admin
/// accounts are seeded out of band and cannot be self-registered.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Registration attempt for user: {}", payload.username);

    validation::validate_username(&payload.username).map_err(AuthError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(AuthError::BadRequest)?;

    let role = payload.role.unwrap_or(Role::Reader);
    if role == Role::Admin {
        return Err(AuthError::BadRequest(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    let existing = state
        .user_repository
        .find_active_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up username: {}", e);
            AuthError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(AuthError::Conflict("Username already taken".to_string()));
    }

    let new_user = NewUser {
        username: payload.username,
        password: payload.password,
        role,
        tags: payload.tags.unwrap_or_default(),
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        AuthError::InternalServerError
    })?;

    let response = token_response(&state, &user)?;

    state
        .session_manager
        .create_session(user.id, &response.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to store session: {}", e);
            AuthError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for user: {}", payload.username);

    if !state.rate_limiter.is_allowed(&payload.username).await {
        return Err(AuthError::TooManyRequests);
    }

    let user = state
        .user_repository
        .find_active_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or(AuthError::Unauthorized)?;

    let valid = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            AuthError::InternalServerError
        })?;

    if !valid {
        return Err(AuthError::Unauthorized);
    }

    state.rate_limiter.reset(&payload.username).await;

    let response = token_response(&state, &user)?;

    state
        .session_manager
        .create_session(user.id, &response.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to store session: {}", e);
            AuthError::InternalServerError
        })?;

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Token refresh request");

    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| AuthError::Unauthorized)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AuthError::Unauthorized);
    }

    let is_blacklisted = state
        .jwt_service
        .is_token_blacklisted(&state.redis_pool, &payload.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to check token blacklist: {}", e);
            AuthError::InternalServerError
        })?;

    if is_blacklisted {
        return Err(AuthError::Unauthorized);
    }

    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or(AuthError::Unauthorized)?;

    // Only the refresh token stored for this session may be rotated
    let stored = state
        .session_manager
        .get_session(user.id)
        .await
        .map_err(|e| {
            error!("Failed to load session: {}", e);
            AuthError::InternalServerError
        })?;

    if stored.as_deref() != Some(payload.refresh_token.as_str()) {
        return Err(AuthError::Unauthorized);
    }

    let access_token = state.jwt_service.generate_access_token(&user).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        AuthError::InternalServerError
    })?;

    let new_refresh_token = state
        .jwt_service
        .rotate_refresh_token(&state.redis_pool, &user, &payload.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to rotate refresh token: {}", e);
            AuthError::InternalServerError
        })?;

    state
        .session_manager
        .create_session(user.id, &new_refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to update session: {}", e);
            AuthError::InternalServerError
        })?;

    let response = RefreshTokenResponse {
        access_token,
        refresh_token: new_refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Logout request");

    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| AuthError::Unauthorized)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AuthError::Unauthorized);
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| {
            error!("Failed to get current time: {}", e);
            AuthError::InternalServerError
        })?
        .as_secs();

    let expiry = claims.exp.saturating_sub(now);
    state
        .jwt_service
        .blacklist_token(&state.redis_pool, &payload.refresh_token, expiry)
        .await
        .map_err(|e| {
            error!("Failed to blacklist token: {}", e);
            AuthError::InternalServerError
        })?;

    state
        .session_manager
        .delete_session(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to remove session: {}", e);
            AuthError::InternalServerError
        })?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    BadRequest(String),
    Conflict(String),
    TooManyRequests,
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AuthError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, try again later".to_string(),
            ),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
