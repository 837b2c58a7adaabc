//! Bundle member entity - The ordered list of member references owned by a bundle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bundle member reference model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bundle_members")]
pub struct Model {
    /// Unique identifier for the reference
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The bundle item
    pub bundle_id: i64,
    /// The referenced member item
    pub member_id: i64,
    /// Display order inside the bundle
    pub position: i32,
}

/// Both ends of the reference point at `items`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning bundle
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::BundleId",
        to = "super::item::Column::Id"
    )]
    Bundle,
    /// The referenced member
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::MemberId",
        to = "super::item::Column::Id"
    )]
    Member,
}

impl ActiveModelBehavior for ActiveModel {}
