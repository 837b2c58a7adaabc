//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bundle_member;
pub mod item;
pub mod item_type;

// Re-export specific types to avoid conflicts
pub use bundle_member::{
    Column as BundleMemberColumn, Entity as BundleMember, Model as BundleMemberModel,
};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use item_type::{Column as ItemTypeColumn, Entity as ItemType, Model as ItemTypeModel};
