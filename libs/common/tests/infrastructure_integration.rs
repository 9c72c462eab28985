//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis cache are
//! properly configured and accessible, and that the schema bootstrap is
//! idempotent. They require live services, so they are ignored by default.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{health_check, init_pool, DatabaseConfig},
    schema::ensure_schema,
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    // Bootstrapping twice must be a no-op the second time
    ensure_schema(&pool).await?;
    ensure_schema(&pool).await?;

    let row = sqlx::query("SELECT COUNT(*) AS novel_count FROM novels")
        .fetch_one(&pool)
        .await?;
    let _: i64 = row.get("novel_count");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "integration_test_key";
    redis_pool.set(test_key, "integration_test_value", Some(10)).await?;
    assert_eq!(
        redis_pool.get(test_key).await?,
        Some("integration_test_value".to_string())
    );

    assert!(redis_pool.delete(test_key).await?);
    assert_eq!(redis_pool.get(test_key).await?, None);

    Ok(())
}
