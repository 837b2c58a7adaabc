//! Item type entity - The per-user vocabulary of item categories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item_types")]
pub struct Model {
    /// Unique identifier for the type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of this vocabulary entry
    pub user_id: String,
    /// Display name (e.g. "Jeu", "Livre")
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
