//! Explicit request context.
//!
//! A `Session` carries the database handle and the authenticated user id into every
//! persistence operation, so nothing looks either of them up from process-wide state.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Database handle plus the authenticated user the operations act for.
#[derive(Debug)]
pub struct Session {
    db: Arc<DatabaseConnection>,
    user_id: String,
}

impl Session {
    /// Creates a session for `user_id` on `db`.
    pub fn new(db: DatabaseConnection, user_id: impl Into<String>) -> Self {
        Self {
            db: Arc::new(db),
            user_id: user_id.into(),
        }
    }

    /// A session for `user_id` sharing this session's connection.
    #[must_use]
    pub fn for_user(&self, user_id: impl Into<String>) -> Self {
        Self {
            db: Arc::clone(&self.db),
            user_id: user_id.into(),
        }
    }

    /// The database connection
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// The authenticated user's opaque identifier
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Result, test_utils::*};

    #[tokio::test]
    async fn test_for_user_shares_the_connection() -> Result<()> {
        let session = setup_test_session().await?;
        let other = session.for_user("someone_else");

        assert_eq!(other.user_id(), "someone_else");
        assert_eq!(session.user_id(), TEST_USER);
        assert!(std::ptr::eq(session.db(), other.db()));
        Ok(())
    }
}
