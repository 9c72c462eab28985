//! Data models for the authentication service

pub mod role;
pub mod user;

pub use role::Role;
pub use user::{NewUser, RegisterRequest, User, UserStatus};
