/// Application settings loading from config.toml
pub mod app;

/// Database configuration and connection management
pub mod database;

/// Current user identity from environment variables
pub mod users;
