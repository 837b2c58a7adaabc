//! Items table assembly.
//!
//! Turns a normalized snapshot into the rows the table shows: filtered, sorted, with each
//! bundle followed by its (sorted) members.

use crate::core::{
    derived::Derived,
    filter::{ItemFilter, StatusFilter},
    record::{Record, Role},
    sort::{SortColumn, sort_by_column},
};
use serde::Serialize;

/// Everything the table view is parameterised by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    /// Search, type and date range
    pub filter: ItemFilter,
    /// Row-level status filter
    pub status: Option<StatusFilter>,
    /// Sort column
    pub column: SortColumn,
    /// Descending order
    pub reverse: bool,
}

/// Most recent purchases first.
impl Default for ViewParams {
    fn default() -> Self {
        Self {
            filter: ItemFilter::default(),
            status: None,
            column: SortColumn::PurchaseDate,
            reverse: true,
        }
    }
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Standalone item, bundle header, or bundle member
    pub role: Role,
    /// The record, without its members
    pub record: Record,
    /// Number of members for a bundle header, 0 otherwise
    pub member_count: usize,
    /// Effective prices, dates and profits
    pub derived: Derived,
}

impl TableRow {
    fn new(mut record: Record) -> Self {
        let derived = Derived::of(&record);
        let role = record.role();
        let member_count = record.members.take().map_or(0, |members| members.len());
        Self {
            role,
            record,
            member_count,
            derived,
        }
    }
}

/// Builds the table rows for `records`.
///
/// Members of each bundle are sorted with the same column and direction as the top level.
/// A bundle matching the filter on its own lists all of its members; a bundle kept only
/// because some members match lists just those. The status filter hides rows one by one,
/// so a member can show while its bundle header is hidden.
#[must_use]
pub fn build_table(records: Vec<Record>, params: &ViewParams) -> Vec<TableRow> {
    let records: Vec<Record> = records
        .into_iter()
        .map(|mut record| {
            if let Some(members) = record.members.take() {
                record.members = Some(sort_by_column(members, params.column, params.reverse));
            }
            record
        })
        .filter(|record| params.filter.matches(record))
        .collect();
    let records = sort_by_column(records, params.column, params.reverse);

    let visible = |record: &Record| params.status.is_none_or(|status| !status.hides(record));

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let members: Vec<Record> = if record.is_bundle() {
            params
                .filter
                .visible_members(&record)
                .into_iter()
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        if visible(&record) {
            rows.push(TableRow::new(record));
        }
        rows.extend(
            members
                .into_iter()
                .filter(|member| visible(member))
                .map(TableRow::new),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bundle, date, member, standalone};

    fn names(rows: &[TableRow]) -> Vec<&str> {
        rows.iter().map(|r| r.record.name.as_str()).collect()
    }

    fn by_name() -> ViewParams {
        ViewParams {
            column: SortColumn::Name,
            reverse: false,
            ..ViewParams::default()
        }
    }

    fn snapshot() -> Vec<Record> {
        vec![
            standalone(1, "Vase", 3.0),
            bundle(2, 30.0, vec![member(3, "Zelda"), member(4, "Mario")]),
            standalone(5, "Lamp", 10.0),
        ]
    }

    #[test]
    fn test_rows_are_sorted_with_members_nested() {
        let rows = build_table(snapshot(), &by_name());

        assert_eq!(
            names(&rows),
            vec!["Lamp", "Lot de 2 articles", "Mario", "Zelda", "Vase"]
        );
        assert_eq!(rows[1].role, Role::Bundle);
        assert_eq!(rows[1].member_count, 2);
        assert!(rows[1].record.members.is_none());
        assert_eq!(rows[2].role, Role::Member);
    }

    #[test]
    fn test_descending_order_applies_to_members() {
        let params = ViewParams {
            reverse: true,
            ..by_name()
        };
        let rows = build_table(snapshot(), &params);

        assert_eq!(
            names(&rows),
            vec!["Vase", "Lot de 2 articles", "Zelda", "Mario", "Lamp"]
        );
    }

    #[test]
    fn test_member_match_shows_only_matching_members() {
        let mut params = by_name();
        params.filter.search = "zelda".to_string();

        let rows = build_table(snapshot(), &params);
        assert_eq!(names(&rows), vec!["Lot de 2 articles", "Zelda"]);
    }

    #[test]
    fn test_header_match_shows_every_member() {
        let mut params = by_name();
        params.filter.search = "lot".to_string();

        let rows = build_table(snapshot(), &params);
        assert_eq!(names(&rows), vec!["Lot de 2 articles", "Mario", "Zelda"]);
    }

    #[test]
    fn test_status_filter_applies_per_row() {
        let mut sold = member(4, "Mario");
        sold.sale_date = Some(date(2023, 5, 1));
        sold.sale_price = Some(12.0);
        let records = vec![
            standalone(1, "Vase", 3.0),
            bundle(2, 30.0, vec![member(3, "Zelda"), sold]),
        ];
        let params = ViewParams {
            status: Some(StatusFilter::Sold),
            ..by_name()
        };

        let rows = build_table(records, &params);
        assert_eq!(names(&rows), vec!["Lot de 2 articles", "Mario"]);
    }

    #[test]
    fn test_bundle_row_carries_derived_values() {
        let mut a = member(3, "Zelda");
        a.sale_price = Some(20.0);
        let records = vec![bundle(2, 15.0, vec![a, member(4, "Mario")])];

        let rows = build_table(records, &by_name());
        assert_eq!(rows[0].derived.sale_price, Some(20.0));
        assert_eq!(rows[0].derived.potential_profit, Some(5.0));
        assert_eq!(rows[0].derived.sale_date, None);
    }
}
