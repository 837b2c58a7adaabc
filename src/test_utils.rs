//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database session, plus builders for in-memory
//! records used by the pure engine tests.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        Session,
        item::{self, NewBundle, NewItem},
        record::{BUNDLE_TYPE, Record, bundle_name},
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;

/// User id of the test session
pub const TEST_USER: &str = "test_user";

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<sea_orm::DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A session for [`TEST_USER`] on a fresh in-memory database.
pub async fn setup_test_session() -> Result<Session> {
    Ok(Session::new(setup_test_db().await?, TEST_USER))
}

/// A valid standalone item.
///
/// # Defaults
/// * `item_type`: "Jeu"
/// * `purchase_date`: 2023-01-10
pub fn new_item(name: &str, purchase_price: f64) -> NewItem {
    NewItem {
        name: name.to_string(),
        item_type: "Jeu".to_string(),
        purchase_date: Some(date(2023, 1, 10)),
        purchase_price: Some(purchase_price),
        ..NewItem::default()
    }
}

/// A valid bundle member: no purchase date or price of its own.
pub fn new_member(name: &str) -> NewItem {
    NewItem {
        name: name.to_string(),
        item_type: "Jeu".to_string(),
        ..NewItem::default()
    }
}

/// Bundle bought on 2023-03-01 for 30.0
pub fn test_bundle() -> NewBundle {
    NewBundle {
        purchase_date: date(2023, 3, 1),
        purchase_price: 30.0,
    }
}

/// Creates [`test_bundle`] with members "A", "B" and "C".
pub async fn create_test_bundle(
    session: &Session,
) -> Result<(entities::item::Model, Vec<entities::item::Model>)> {
    let members = vec![new_member("A"), new_member("B"), new_member("C")];
    item::create_bundle(session, test_bundle(), members).await
}

/// A stored standalone row, as the database would return it.
pub fn item_model(id: i64, name: &str) -> entities::item::Model {
    let now = chrono::Utc::now().naive_utc();
    entities::item::Model {
        id,
        user_id: TEST_USER.to_string(),
        name: name.to_string(),
        item_type: "Jeu".to_string(),
        condition: None,
        purchase_date: Some(date(2023, 1, 10)),
        purchase_price: Some(10.0),
        sale_date: None,
        sale_price: None,
        link: None,
        bundle_id: None,
        bought_for_me: false,
        created_at: now,
        updated_at: now,
    }
}

/// Unsold standalone record bought on 2023-01-10.
pub fn standalone(id: i64, name: &str, purchase_price: f64) -> Record {
    Record {
        id,
        name: name.to_string(),
        item_type: "Jeu".to_string(),
        purchase_date: Some(date(2023, 1, 10)),
        purchase_price: Some(purchase_price),
        ..Record::default()
    }
}

/// Unsold, unpriced bundle member; [`bundle`] attaches it to its bundle.
pub fn member(id: i64, name: &str) -> Record {
    Record {
        id,
        name: name.to_string(),
        item_type: "Jeu".to_string(),
        bundle_id: Some(0),
        ..Record::default()
    }
}

/// Bundle bought on 2023-01-10 holding `members`, named after their count.
pub fn bundle(id: i64, purchase_price: f64, members: Vec<Record>) -> Record {
    let purchase_date = Some(date(2023, 1, 10));
    let members = members
        .into_iter()
        .map(|member| Record {
            bundle_id: Some(id),
            purchase_date,
            ..member
        })
        .collect::<Vec<_>>();

    Record {
        id,
        name: bundle_name(members.len()),
        item_type: BUNDLE_TYPE.to_string(),
        purchase_date,
        purchase_price: Some(purchase_price),
        members: Some(members),
        ..Record::default()
    }
}
