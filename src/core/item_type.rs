//! Item type vocabulary - The user's own list of item categories.

use crate::{
    core::{record::BUNDLE_TYPE, session::Session},
    entities::{ItemType, item_type},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::info;

/// Lists the user's item types, alphabetically.
pub async fn list_item_types(session: &Session) -> Result<Vec<String>> {
    let types = ItemType::find()
        .filter(item_type::Column::UserId.eq(session.user_id()))
        .order_by_asc(item_type::Column::Name)
        .all(session.db())
        .await?;
    Ok(types.into_iter().map(|t| t.name).collect())
}

/// Adds a type to the user's vocabulary, returning the existing entry if already there.
///
/// # Errors
/// Returns `InvalidName` for an empty name or the reserved bundle type, or a database error.
pub async fn add_item_type(session: &Session, name: &str) -> Result<item_type::Model> {
    let name = name.trim();
    if name.is_empty() || name == BUNDLE_TYPE {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }

    let existing = ItemType::find()
        .filter(item_type::Column::UserId.eq(session.user_id()))
        .filter(item_type::Column::Name.eq(name))
        .one(session.db())
        .await?;
    if let Some(existing) = existing {
        return Ok(existing);
    }

    item_type::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(session.db())
    .await
    .map_err(Into::into)
}

/// Seeds `defaults` for a user who has no types yet. Returns how many were added.
pub async fn seed_item_types(session: &Session, defaults: &[String]) -> Result<usize> {
    let existing = ItemType::find()
        .filter(item_type::Column::UserId.eq(session.user_id()))
        .count(session.db())
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    for name in defaults {
        add_item_type(session, name).await?;
    }
    info!(
        "Seeded {} item types for user {}",
        defaults.len(),
        session.user_id()
    );
    Ok(defaults.len())
}
