//! Profit totals by year and month.
//!
//! Totals walk records one by one, without looking into bundles: a bundle contributes its
//! own purchase price, its members contribute their sales.

use crate::core::record::{BUNDLE_TYPE, Record};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Year bucket of the totals view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearSelection {
    /// Every year at once
    All,
    /// One calendar year
    Year(i32),
}

impl YearSelection {
    fn accepts(self, date: Option<NaiveDate>) -> bool {
        match self {
            Self::All => true,
            Self::Year(year) => date.is_some_and(|d| d.year() == year),
        }
    }

    /// Month buckets never accept the all-years selection.
    fn accepts_month(self, date: Option<NaiveDate>, month: u32) -> bool {
        match self {
            Self::All => false,
            Self::Year(year) => date.is_some_and(|d| d.year() == year && d.month() == month),
        }
    }
}

/// Spent, sold and profit for the selected year and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfitTotals {
    /// Purchases in the year, minus money recovered on items kept
    pub year_total_spent: f64,
    /// Sales in the year
    pub year_total_sold: f64,
    /// `year_total_sold - year_total_spent`
    pub year_profit: f64,
    /// Purchases in the month, minus money recovered on items kept
    pub month_total_spent: f64,
    /// Sales in the month
    pub month_total_sold: f64,
    /// `month_total_sold - month_total_spent`
    pub month_profit: f64,
}

impl ProfitTotals {
    fn add(&mut self, record: &Record, year: YearSelection, month: u32) {
        let purchase_price = record.purchase_price.unwrap_or(0.0);
        // Bundles sell through their members
        let sale_price = if record.item_type == BUNDLE_TYPE {
            0.0
        } else {
            record.sale_price.unwrap_or(0.0)
        };
        let realized = if record.sale_date.is_some() { sale_price } else { 0.0 };

        if year.accepts(record.purchase_date) {
            self.year_total_spent += purchase_price;
        }
        if year.accepts_month(record.purchase_date, month) {
            self.month_total_spent += purchase_price;
        }

        if record.bought_for_me {
            // What the keeper paid back lowers the cost of the purchase
            if year.accepts(record.purchase_date) {
                self.year_total_spent -= sale_price;
            }
            if year.accepts_month(record.purchase_date, month) {
                self.month_total_spent -= sale_price;
            }
        } else {
            if year.accepts(record.sale_date) {
                self.year_total_sold += realized;
            }
            if year.accepts_month(record.sale_date, month) {
                self.month_total_sold += realized;
            }
        }
    }
}

/// Accumulates the totals of `records` for `year` and `month` (1 to 12).
#[must_use]
pub fn compute_totals(records: &[Record], year: YearSelection, month: u32) -> ProfitTotals {
    let mut totals = records.iter().fold(ProfitTotals::default(), |mut totals, record| {
        totals.add(record, year, month);
        totals
    });
    totals.year_profit = totals.year_total_sold - totals.year_total_spent;
    totals.month_profit = totals.month_total_sold - totals.month_total_spent;
    totals
}

/// Years offered by the totals view: from the earliest purchase to `today`.
#[must_use]
pub fn selectable_years(earliest_purchase: Option<NaiveDate>, today: NaiveDate) -> Vec<i32> {
    let first = earliest_purchase.map_or(today.year(), |d| d.year().min(today.year()));
    (first..=today.year()).collect()
}
