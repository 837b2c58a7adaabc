//! Table sorting.
//!
//! Sorting is stable: records that compare equal keep their input order. Descending order
//! is produced by reversing the ascending result, not by flipping the comparator, so ties
//! come out in reverse input order.

use crate::{
    core::{
        derived::{
            PRICE_FLOOR, effective_sale_date, effective_sale_price, potential_profit,
            realized_profit,
        },
        record::Record,
    },
    errors::{Error, Result},
};
use serde::Serialize;
use std::{cmp::Ordering, fmt, str::FromStr};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Sortable columns of the items table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    /// Item name
    Name,
    /// Item type
    Type,
    /// Condition rank
    Condition,
    /// Purchase date
    PurchaseDate,
    /// Purchase price
    PurchasePrice,
    /// Effective sale date
    SaleDate,
    /// Effective sale price
    SalePrice,
    /// Potential profit
    PotentialProfit,
    /// Realized profit, potential profit for unsold records
    Profit,
}

impl SortColumn {
    /// Column name as used by the table
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
            Self::Condition => "condition",
            Self::PurchaseDate => "purchaseDate",
            Self::PurchasePrice => "purchasePrice",
            Self::SaleDate => "saleDate",
            Self::SalePrice => "salePrice",
            Self::PotentialProfit => "potentialProfit",
            Self::Profit => "profit",
        }
    }

    /// Compares two records on this column, ascending.
    #[must_use]
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            Self::Name => collate(&a.name, &b.name),
            Self::Type => collate(&a.item_type, &b.item_type),
            Self::Condition => condition_rank(a).cmp(&condition_rank(b)),
            Self::PurchaseDate => a.purchase_date.cmp(&b.purchase_date),
            Self::PurchasePrice => a
                .purchase_price
                .unwrap_or(PRICE_FLOOR)
                .total_cmp(&b.purchase_price.unwrap_or(PRICE_FLOOR)),
            Self::SaleDate => effective_sale_date(a).cmp(&effective_sale_date(b)),
            Self::SalePrice => effective_sale_price(a)
                .unwrap_or(PRICE_FLOOR)
                .total_cmp(&effective_sale_price(b).unwrap_or(PRICE_FLOOR)),
            Self::PotentialProfit => potential_profit(a).total_cmp(&potential_profit(b)),
            Self::Profit => {
                if effective_sale_date(a).is_none() && effective_sale_date(b).is_none() {
                    potential_profit(a).total_cmp(&potential_profit(b))
                } else {
                    realized_profit(a).total_cmp(&realized_profit(b))
                }
            }
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "type" | "item_type" => Ok(Self::Type),
            "condition" | "state" => Ok(Self::Condition),
            "purchaseDate" | "purchase_date" => Ok(Self::PurchaseDate),
            "purchasePrice" | "purchase_price" => Ok(Self::PurchasePrice),
            "saleDate" | "sale_date" => Ok(Self::SaleDate),
            "salePrice" | "sale_price" => Ok(Self::SalePrice),
            "potentialProfit" | "potential_profit" => Ok(Self::PotentialProfit),
            "profit" => Ok(Self::Profit),
            other => Err(Error::UnknownColumn {
                column: other.to_string(),
            }),
        }
    }
}

/// Rank in [`Condition::ALL`](crate::core::record::Condition::ALL), -1 when absent.
fn condition_rank(record: &Record) -> i32 {
    record.condition.map_or(-1, |c| c.rank())
}

fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accent- and case-insensitive comparison, falling back to code points on a tie.
fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Sorts `records` on `column`, then reverses the result when `reverse` is set.
#[must_use]
pub fn sort_by_column(mut records: Vec<Record>, column: SortColumn, reverse: bool) -> Vec<Record> {
    records.sort_by(|a, b| column.compare(a, b));
    if reverse {
        records.reverse();
    }
    records
}

/// Like [`sort_by_column`], with the column given by name.
///
/// # Errors
/// Returns `UnknownColumn` for a name that is not a table column; nothing is sorted.
pub fn sort_by_column_name(records: Vec<Record>, column: &str, reverse: bool) -> Result<Vec<Record>> {
    let column: SortColumn = column.parse()?;
    Ok(sort_by_column(records, column, reverse))
}
