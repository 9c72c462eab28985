//! Common library for the Yuedufang reading platform
//!
//! This crate provides shared infrastructure used by the auth and api
//! services: PostgreSQL connection pooling, the Redis cache wrapper,
//! schema bootstrap, and common error types.

pub mod cache;
pub mod database;
pub mod error;
pub mod schema;
