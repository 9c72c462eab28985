//! Authentication middleware for JWT token validation

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, models::Role, state::AppState};

/// JWT claims structure, mirroring what the auth service issues
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// The user's single role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

/// Authenticated user information attached to every protected request
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Capability check: the operation requires exactly this role
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied)
        }
    }
}

/// Token verifier built once at startup from the auth service's public key
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from env configuration
    ///
    /// # Environment Variables
    /// - `JWT_PUBLIC_KEY`: verification key (PEM format) or path to a key file
    pub fn from_env() -> anyhow::Result<Self> {
        let value = std::env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;

        let public_key = if value.starts_with("-----BEGIN") {
            value
        } else {
            std::fs::read_to_string(&value)
                .or_else(|_| {
                    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
                    path.push(&value);
                    std::fs::read_to_string(path)
                })
                .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                .trim()
                .to_string()
        };

        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.validate_exp = true;

        Ok(JwtVerifier {
            decoding_key,
            validation,
        })
    }

    /// Validate an access token and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
                .map_err(|e| {
                    error!("Failed to validate token: {}", e);
                    ApiError::Unauthorized
                })?;

        if token_data.claims.token_type != TokenType::Access {
            return Err(ApiError::Unauthorized);
        }

        Ok(token_data.claims)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt_verifier.verify(token)?;

    let user = AuthUser {
        id: claims.sub,
        role: claims.role,
    };

    req.extensions_mut().insert(user);

    let response = next.run(req).await;

    Ok(response)
}
