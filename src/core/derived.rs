//! Derived financial fields.
//!
//! Bundles have no sale price of their own: everything here reconciles a record's own
//! fields with those of its members. None of these values is ever stored.

use crate::core::record::Record;
use chrono::NaiveDate;
use serde::Serialize;

/// Stand-in for a missing sale price when ranking, so unpriced records sort lowest.
pub const PRICE_FLOOR: f64 = -9_007_199_254_740_991.0;

fn is_zero(amount: f64) -> bool {
    amount.abs() < f64::EPSILON
}

/// Asking price of a record: the sum of member prices for a bundle, its own price otherwise.
///
/// A zero total on a record with no sale anywhere is reported as `None`, since nothing has
/// been priced yet.
#[must_use]
pub fn effective_sale_price(record: &Record) -> Option<f64> {
    let price = match &record.members {
        Some(members) => Some(members.iter().map(|m| m.sale_price.unwrap_or(0.0)).sum()),
        None => record.sale_price,
    };

    let nothing_sold =
        record.sale_date.is_none() && !record.members().iter().any(|m| m.sale_date.is_some());
    if price.is_some_and(is_zero) && nothing_sold {
        return None;
    }
    price
}

/// Money actually received: only sold members (or a sold record) contribute.
#[must_use]
pub fn realized_sale_price(record: &Record) -> Option<f64> {
    match &record.members {
        Some(members) => Some(
            members
                .iter()
                .filter(|m| m.sale_date.is_some())
                .map(|m| m.sale_price.unwrap_or(0.0))
                .sum(),
        ),
        None => record.sale_date.and(record.sale_price),
    }
}

/// Sale date of a record.
///
/// A bundle without its own sale date counts as sold only once every member is sold, on
/// the latest member sale date.
#[must_use]
pub fn effective_sale_date(record: &Record) -> Option<NaiveDate> {
    record.sale_date.or_else(|| {
        let members = record.members.as_ref()?;
        members
            .iter()
            .map(|m| m.sale_date)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max()
    })
}

/// Expected profit, with [`PRICE_FLOOR`] standing in for a missing sale price.
#[must_use]
pub fn potential_profit(record: &Record) -> f64 {
    effective_sale_price(record).unwrap_or(PRICE_FLOOR) - record.purchase_price.unwrap_or(0.0)
}

/// Profit actually made once sold, the potential profit before that.
#[must_use]
pub fn realized_profit(record: &Record) -> f64 {
    if effective_sale_date(record).is_none() {
        return potential_profit(record);
    }
    realized_sale_price(record).unwrap_or(PRICE_FLOOR) - record.purchase_price.unwrap_or(0.0)
}

/// Display-safe derived values of one record.
///
/// Profits are `None` whenever the corresponding sale price is unknown; the floor constant
/// is only used for ranking and never shows up here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Derived {
    /// See [`effective_sale_price`]
    pub sale_price: Option<f64>,
    /// See [`effective_sale_date`]
    pub sale_date: Option<NaiveDate>,
    /// Expected profit
    pub potential_profit: Option<f64>,
    /// Realized profit once sold, expected profit before
    pub profit: Option<f64>,
}

impl Derived {
    /// Computes the derived values of `record`.
    #[must_use]
    pub fn of(record: &Record) -> Self {
        let sale_price = effective_sale_price(record);
        let sale_date = effective_sale_date(record);
        let purchase_price = record.purchase_price.unwrap_or(0.0);

        let potential_profit = sale_price.map(|price| price - purchase_price);
        let profit = match sale_date {
            None => potential_profit,
            Some(_) => realized_sale_price(record).map(|price| price - purchase_price),
        };

        Self {
            sale_price,
            sale_date,
            potential_profit,
            profit,
        }
    }
}
