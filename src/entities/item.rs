//! Item entity - Represents every tracked record: standalone items, bundles and bundle members.
//!
//! The role of a row is inferred from its data: bundles carry `item_type == "Bundle"` and own
//! an ordered list of references in `bundle_members`, members point back to their bundle
//! through `bundle_id`, and anything else is a standalone item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity-provider id of the owner; every query is scoped by it
    pub user_id: String,
    /// Free-text name (bundles are named `Lot de N articles`)
    pub name: String,
    /// User-defined category, or `Bundle`
    pub item_type: String,
    /// Condition tag (`new`, `like-new`, ...), meaningless for bundles
    pub condition: Option<String>,
    /// Purchase date, inherited from the bundle for members
    pub purchase_date: Option<Date>,
    /// Purchase price in euros
    pub purchase_price: Option<f64>,
    /// Set once the item is sold
    pub sale_date: Option<Date>,
    /// Asking or final sale price in euros
    pub sale_price: Option<f64>,
    /// Optional listing URL
    pub link: Option<String>,
    /// Parent bundle for bundle members
    pub bundle_id: Option<i64>,
    /// Kept by the owner; its sale price is money recovered, not revenue
    pub bought_for_me: bool,
    /// When the item was created
    pub created_at: DateTime,
    /// When the item was last modified
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
