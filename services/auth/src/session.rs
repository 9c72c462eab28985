//! Session management using Redis

use anyhow::Result;
use uuid::Uuid;

use common::cache::RedisPool;

use crate::jwt::JwtService;

/// Session manager for handling user sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    jwt_service: JwtService,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(redis_pool: RedisPool, jwt_service: JwtService) -> Self {
        Self {
            redis_pool,
            jwt_service,
        }
    }

    /// Store the current refresh token for a user
    pub async fn create_session(&self, user_id: Uuid, refresh_token: &str) -> Result<()> {
        let session_key = format!("session:{}", user_id);
        self.redis_pool
            .set(
                &session_key,
                refresh_token,
                Some(self.jwt_service.refresh_token_expiry()),
            )
            .await?;

        Ok(())
    }

    /// Get the stored refresh token for a user
    pub async fn get_session(&self, user_id: Uuid) -> Result<Option<String>> {
        let session_key = format!("session:{}", user_id);
        let refresh_token = self.redis_pool.get(&session_key).await?;

        Ok(refresh_token)
    }

    /// Drop the session for a user
    pub async fn delete_session(&self, user_id: Uuid) -> Result<()> {
        let session_key = format!("session:{}", user_id);
        self.redis_pool.delete(&session_key).await?;

        Ok(())
    }
}
