//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::config::app::AppConfig;
use crate::entities::{BundleMember, Item, ItemType};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/resale_tracker.sqlite?mode=rwc";

/// Resolves the database URL.
///
/// `DATABASE_URL` in the environment wins, then the config file, then a local `SQLite` file.
#[must_use]
pub fn get_database_url(config: &AppConfig) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| config.database_url.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database: {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables if they do not exist yet.
///
/// Items are created before bundle members because the member references
/// point at `items`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut item_table = schema.create_table_from_entity(Item);
    let mut bundle_member_table = schema.create_table_from_entity(BundleMember);
    let mut item_type_table = schema.create_table_from_entity(ItemType);

    item_table.if_not_exists();
    bundle_member_table.if_not_exists();
    item_type_table.if_not_exists();

    db.execute(builder.build(&item_table)).await?;
    db.execute(builder.build(&bundle_member_table)).await?;
    db.execute(builder.build(&item_type_table)).await?;

    info!("Database tables ensured.");
    Ok(())
}
