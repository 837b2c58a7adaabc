//! Unified error types and result handling.

use thiserror::Error;

/// All errors surfaced by the tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The persistence layer rejected an operation
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// No item with this id exists for the current user
    #[error("Item not found: {id}")]
    ItemNotFound {
        /// Requested item id
        id: i64,
    },

    /// The item exists but is not a bundle
    #[error("Item {id} is not a bundle")]
    NotABundle {
        /// Offending item id
        id: i64,
    },

    /// A price is negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Offending amount
        amount: f64,
    },

    /// A field required for this kind of item was not provided
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name
        field: &'static str,
    },

    /// Empty name, or a type name that collides with the reserved bundle type
    #[error("Invalid name: '{name}'")]
    InvalidName {
        /// Offending name
        name: String,
    },

    /// Bundles are created with a minimum number of members
    #[error("A bundle needs at least {min} items, got {count}")]
    BundleTooSmall {
        /// Minimum member count
        min: usize,
        /// Provided member count
        count: usize,
    },

    /// Sorting was requested on a column that does not exist
    #[error("Unknown column name: {column}")]
    UnknownColumn {
        /// Requested column
        column: String,
    },

    /// Status filter value is not one of `sold`, `on-sale`, `to-sell`
    #[error("Unknown status filter: {status}")]
    UnknownStatus {
        /// Requested status
        status: String,
    },

    /// A bundle references a member that could not be loaded
    #[error("Failed to resolve member {member_id} of bundle {bundle_id}")]
    MemberResolution {
        /// Bundle being normalized
        bundle_id: i64,
        /// Member reference that failed
        member_id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
