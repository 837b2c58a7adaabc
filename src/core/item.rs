//! Item business logic - Handles creating, editing and deleting tracked items.
//!
//! Every write that touches more than one row (bundle creation, adding to or removing from
//! a bundle, cascading deletes, purchase date propagation) runs inside a single database
//! transaction. All queries are scoped to the session's user.

use crate::{
    core::{
        record::{BUNDLE_TYPE, Condition, bundle_name},
        session::Session,
    },
    entities::{BundleMember, Item, bundle_member, item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    DatabaseTransaction, PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use tracing::{debug, info};

/// Minimum number of members a bundle is created with
pub const MIN_BUNDLE_MEMBERS: usize = 3;

/// Fields of a new standalone item or bundle member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    /// Item name
    pub name: String,
    /// Category, must not be the reserved bundle type
    pub item_type: String,
    /// Condition
    pub condition: Option<Condition>,
    /// Required for standalone items, ignored for bundle members
    pub purchase_date: Option<NaiveDate>,
    /// Required for standalone items, dropped for bundle members
    pub purchase_price: Option<f64>,
    /// Sale date
    pub sale_date: Option<NaiveDate>,
    /// Asking or final price
    pub sale_price: Option<f64>,
    /// Listing URL
    pub link: Option<String>,
    /// Kept by the owner
    pub bought_for_me: bool,
}

/// Fields of the bundle itself when creating one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewBundle {
    /// Purchase date, inherited by every member
    pub purchase_date: NaiveDate,
    /// Price paid for the whole lot
    pub purchase_price: f64,
}

/// Editable fields; `None` leaves a field untouched, `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::option_option)]
pub struct ItemUpdate {
    /// New name
    pub name: Option<String>,
    /// New type (not applicable to bundles)
    pub item_type: Option<String>,
    /// New condition
    pub condition: Option<Option<Condition>>,
    /// New purchase date; ignored for bundle members
    pub purchase_date: Option<NaiveDate>,
    /// New purchase price; ignored for bundle members
    pub purchase_price: Option<Option<f64>>,
    /// New sale date; ignored for bundles
    pub sale_date: Option<Option<NaiveDate>>,
    /// New sale price; ignored for bundles
    pub sale_price: Option<Option<f64>>,
    /// New link
    pub link: Option<Option<String>>,
    /// New kept-by-owner flag
    pub bought_for_me: Option<bool>,
}

fn validate_amount(amount: Option<f64>) -> Result<()> {
    match amount {
        Some(amount) if amount < 0.0 || !amount.is_finite() => {
            Err(Error::InvalidAmount { amount })
        }
        _ => Ok(()),
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn validate_item_type(item_type: &str) -> Result<()> {
    validate_name(item_type)?;
    if item_type == BUNDLE_TYPE {
        return Err(Error::InvalidName {
            name: item_type.to_string(),
        });
    }
    Ok(())
}

fn validate_new_item(new_item: &NewItem) -> Result<()> {
    validate_name(&new_item.name)?;
    validate_item_type(&new_item.item_type)?;
    validate_amount(new_item.purchase_price)?;
    validate_amount(new_item.sale_price)
}

fn active_model(
    session: &Session,
    new_item: NewItem,
    purchase_date: Option<NaiveDate>,
    bundle_id: Option<i64>,
) -> item::ActiveModel {
    let now = chrono::Utc::now().naive_utc();
    item::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        name: Set(new_item.name.trim().to_string()),
        item_type: Set(new_item.item_type),
        condition: Set(new_item.condition.map(|c| c.as_str().to_string())),
        purchase_date: Set(purchase_date),
        // The lot price lives on the bundle
        purchase_price: Set(new_item.purchase_price.filter(|_| bundle_id.is_none())),
        sale_date: Set(new_item.sale_date),
        sale_price: Set(new_item.sale_price),
        link: Set(new_item.link),
        bundle_id: Set(bundle_id),
        bought_for_me: Set(new_item.bought_for_me),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Loads an item of the session's user inside `txn`.
async fn find_owned(txn: &DatabaseTransaction, session: &Session, id: i64) -> Result<item::Model> {
    Item::find_by_id(id)
        .filter(item::Column::UserId.eq(session.user_id()))
        .one(txn)
        .await?
        .ok_or(Error::ItemNotFound { id })
}

async fn find_owned_bundle(
    txn: &DatabaseTransaction,
    session: &Session,
    id: i64,
) -> Result<item::Model> {
    let bundle = find_owned(txn, session, id).await?;
    if bundle.item_type != BUNDLE_TYPE {
        return Err(Error::NotABundle { id });
    }
    Ok(bundle)
}

async fn member_count(txn: &DatabaseTransaction, bundle_id: i64) -> Result<usize> {
    let count = BundleMember::find()
        .filter(bundle_member::Column::BundleId.eq(bundle_id))
        .count(txn)
        .await?;
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

async fn next_position(txn: &DatabaseTransaction, bundle_id: i64) -> Result<i32> {
    let last = BundleMember::find()
        .filter(bundle_member::Column::BundleId.eq(bundle_id))
        .order_by_desc(bundle_member::Column::Position)
        .one(txn)
        .await?;
    Ok(last.map_or(0, |r| r.position + 1))
}

async fn rename_bundle(txn: &DatabaseTransaction, bundle: item::Model, count: usize) -> Result<()> {
    let mut bundle: item::ActiveModel = bundle.into();
    bundle.name = Set(bundle_name(count));
    bundle.updated_at = Set(chrono::Utc::now().naive_utc());
    bundle.update(txn).await?;
    Ok(())
}

/// Retrieves one item of the session's user.
///
/// # Errors
/// Returns `ItemNotFound` if the item does not exist or belongs to someone else.
pub async fn get_item(session: &Session, id: i64) -> Result<item::Model> {
    Item::find_by_id(id)
        .filter(item::Column::UserId.eq(session.user_id()))
        .one(session.db())
        .await?
        .ok_or(Error::ItemNotFound { id })
}

/// Top-level items (standalone items and bundles) of the table, cheapest purchase first.
pub async fn list_table_items(session: &Session) -> Result<Vec<item::Model>> {
    Item::find()
        .filter(item::Column::UserId.eq(session.user_id()))
        .filter(item::Column::BundleId.is_null())
        .order_by_asc(item::Column::PurchasePrice)
        .order_by_asc(item::Column::Id)
        .all(session.db())
        .await
        .map_err(Into::into)
}

/// Every item of the user, bundle members included, for the totals.
pub async fn list_all_items(session: &Session) -> Result<Vec<item::Model>> {
    Item::find()
        .filter(item::Column::UserId.eq(session.user_id()))
        .order_by_asc(item::Column::Id)
        .all(session.db())
        .await
        .map_err(Into::into)
}

/// Earliest purchase date of the user, the lower bound of the date range picker.
pub async fn earliest_purchase_date(session: &Session) -> Result<Option<NaiveDate>> {
    let dates: Vec<Option<NaiveDate>> = Item::find()
        .select_only()
        .column(item::Column::PurchaseDate)
        .filter(item::Column::UserId.eq(session.user_id()))
        .filter(item::Column::PurchaseDate.is_not_null())
        .order_by_asc(item::Column::PurchaseDate)
        .limit(1)
        .into_tuple()
        .all(session.db())
        .await?;
    Ok(dates.into_iter().flatten().next())
}

/// Creates a standalone item.
///
/// # Errors
/// Returns an error if:
/// - The name or type is empty, or the type is the reserved bundle type
/// - A price is negative or not finite
/// - The purchase date or price is missing
/// - The database insert fails
pub async fn create_item(session: &Session, new_item: NewItem) -> Result<item::Model> {
    validate_new_item(&new_item)?;
    let purchase_date = new_item.purchase_date.ok_or(Error::MissingField {
        field: "purchase_date",
    })?;
    if new_item.purchase_price.is_none() {
        return Err(Error::MissingField {
            field: "purchase_price",
        });
    }

    let created = active_model(session, new_item, Some(purchase_date), None)
        .insert(session.db())
        .await?;
    info!("Created item {} '{}'", created.id, created.name);
    Ok(created)
}

/// Adds a new member to an existing bundle.
///
/// The member takes the bundle's purchase date, drops any purchase price of its own, and the
/// bundle is renamed after its new member count, in the same transaction as the insert.
///
/// # Errors
/// Returns `ItemNotFound`/`NotABundle` for a bad bundle id, validation errors as for
/// [`create_item`], or a database error.
pub async fn add_item_to_bundle(
    session: &Session,
    bundle_id: i64,
    new_item: NewItem,
) -> Result<item::Model> {
    validate_new_item(&new_item)?;

    let txn = session.db().begin().await?;
    let bundle = find_owned_bundle(&txn, session, bundle_id).await?;
    let count = member_count(&txn, bundle_id).await?;
    let position = next_position(&txn, bundle_id).await?;

    let member = active_model(session, new_item, bundle.purchase_date, Some(bundle_id))
        .insert(&txn)
        .await?;
    bundle_member::ActiveModel {
        bundle_id: Set(bundle_id),
        member_id: Set(member.id),
        position: Set(position),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    rename_bundle(&txn, bundle, count + 1).await?;

    txn.commit().await?;
    info!("Added item {} to bundle {}", member.id, bundle_id);
    Ok(member)
}

/// Creates a bundle together with its members.
///
/// Members inherit the bundle's purchase date and carry no purchase price; the bundle is
/// named after its member count.
///
/// # Errors
/// Returns `BundleTooSmall` with fewer than [`MIN_BUNDLE_MEMBERS`] members, validation
/// errors for the bundle price or any member, or a database error. Nothing is written
/// unless everything is.
pub async fn create_bundle(
    session: &Session,
    new_bundle: NewBundle,
    members: Vec<NewItem>,
) -> Result<(item::Model, Vec<item::Model>)> {
    if members.len() < MIN_BUNDLE_MEMBERS {
        return Err(Error::BundleTooSmall {
            min: MIN_BUNDLE_MEMBERS,
            count: members.len(),
        });
    }
    validate_amount(Some(new_bundle.purchase_price))?;
    for member in &members {
        validate_new_item(member)?;
    }

    let txn = session.db().begin().await?;
    let now = chrono::Utc::now().naive_utc();
    let bundle = item::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        name: Set(bundle_name(members.len())),
        item_type: Set(BUNDLE_TYPE.to_string()),
        purchase_date: Set(Some(new_bundle.purchase_date)),
        purchase_price: Set(Some(new_bundle.purchase_price)),
        bought_for_me: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut created = Vec::with_capacity(members.len());
    for (position, new_item) in (0_i32..).zip(members) {
        let member = active_model(
            session,
            new_item,
            Some(new_bundle.purchase_date),
            Some(bundle.id),
        )
        .insert(&txn)
        .await?;
        bundle_member::ActiveModel {
            bundle_id: Set(bundle.id),
            member_id: Set(member.id),
            position: Set(position),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.push(member);
    }

    txn.commit().await?;
    info!("Created bundle {} with {} items", bundle.id, created.len());
    Ok((bundle, created))
}

/// Edits an item.
///
/// A new purchase date on a bundle is copied to every member; bundle members keep the
/// bundle's purchase date and have no purchase price of their own. Sale fields of a bundle
/// are left untouched, its sale price always comes from its members. Editing a member also touches its bundle's `updated_at`, so
/// anything watching the top-level rows sees the change.
///
/// # Errors
/// Returns `ItemNotFound`, validation errors, or a database error.
pub async fn update_item(session: &Session, id: i64, update: ItemUpdate) -> Result<item::Model> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(item_type) = &update.item_type {
        validate_item_type(item_type)?;
    }
    validate_amount(update.purchase_price.flatten())?;
    validate_amount(update.sale_price.flatten())?;

    let txn = session.db().begin().await?;
    let existing = find_owned(&txn, session, id).await?;
    let is_bundle = existing.item_type == BUNDLE_TYPE;
    let parent = existing.bundle_id;
    let now = chrono::Utc::now().naive_utc();

    let mut model: item::ActiveModel = existing.into();
    if let Some(name) = update.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(item_type) = update.item_type.filter(|_| !is_bundle) {
        model.item_type = Set(item_type);
    }
    if let Some(condition) = update.condition {
        model.condition = Set(condition.map(|c| c.as_str().to_string()));
    }
    if let Some(purchase_price) = update.purchase_price.filter(|_| parent.is_none()) {
        model.purchase_price = Set(purchase_price);
    }
    // A bundle is sold through its members
    if let Some(sale_date) = update.sale_date.filter(|_| !is_bundle) {
        model.sale_date = Set(sale_date);
    }
    if let Some(sale_price) = update.sale_price.filter(|_| !is_bundle) {
        model.sale_price = Set(sale_price);
    }
    if let Some(link) = update.link {
        model.link = Set(link);
    }
    if let Some(bought_for_me) = update.bought_for_me {
        model.bought_for_me = Set(bought_for_me);
    }

    match (update.purchase_date, parent) {
        (Some(_), Some(bundle_id)) => {
            debug!("Ignoring purchase date edit on item {id}, owned by bundle {bundle_id}");
        }
        (Some(purchase_date), None) => {
            model.purchase_date = Set(Some(purchase_date));
            if is_bundle {
                let result = Item::update_many()
                    .col_expr(item::Column::PurchaseDate, Expr::value(purchase_date))
                    .col_expr(item::Column::UpdatedAt, Expr::value(now))
                    .filter(item::Column::BundleId.eq(id))
                    .exec(&txn)
                    .await?;
                debug!(
                    "Propagated purchase date to {} members of bundle {id}",
                    result.rows_affected
                );
            }
        }
        (None, _) => {}
    }
    model.updated_at = Set(now);
    let updated = model.update(&txn).await?;

    if let Some(bundle_id) = parent {
        Item::update_many()
            .col_expr(item::Column::UpdatedAt, Expr::value(now))
            .filter(item::Column::Id.eq(bundle_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    info!("Updated item {id}");
    Ok(updated)
}

/// Deletes an item.
///
/// Deleting a bundle deletes all of its members. Deleting a member removes it from its
/// bundle and renames the bundle after the remaining member count.
///
/// # Errors
/// Returns `ItemNotFound` or a database error; nothing is deleted on failure.
pub async fn delete_item(session: &Session, id: i64) -> Result<()> {
    let txn = session.db().begin().await?;
    let existing = find_owned(&txn, session, id).await?;

    if existing.item_type == BUNDLE_TYPE {
        BundleMember::delete_many()
            .filter(bundle_member::Column::BundleId.eq(id))
            .exec(&txn)
            .await?;
        let members = Item::delete_many()
            .filter(item::Column::BundleId.eq(id))
            .exec(&txn)
            .await?;
        debug!("Deleted {} members of bundle {id}", members.rows_affected);
    } else if let Some(bundle_id) = existing.bundle_id {
        BundleMember::delete_many()
            .filter(bundle_member::Column::MemberId.eq(id))
            .exec(&txn)
            .await?;
        let bundle = find_owned_bundle(&txn, session, bundle_id).await?;
        let remaining = member_count(&txn, bundle_id).await?;
        rename_bundle(&txn, bundle, remaining).await?;
    }

    Item::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!("Deleted item {id}");
    Ok(())
}
