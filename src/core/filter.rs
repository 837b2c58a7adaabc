//! Record filtering.
//!
//! [`ItemFilter`] decides whether a record belongs in the table at all (type, date range and
//! free-text search). [`StatusFilter`] is applied afterwards, row by row, on what is shown.

use crate::{
    core::{
        derived::{effective_sale_date, effective_sale_price},
        record::Record,
    },
    errors::Error,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lower-cases and strips diacritics, shared by names and search text.
fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
}

/// Folds `name` and drops every non-alphanumeric character.
fn normalize_name(name: &str) -> String {
    fold(name).filter(|c| c.is_alphanumeric()).collect()
}

/// Splits search text into normalized tokens. Hyphens join words ("t-shirt" → "tshirt").
fn search_tokens(search: &str) -> Vec<String> {
    let folded: String = fold(search).filter(|c| *c != '-').collect();
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Table filter: free-text search, type and inclusive date range.
///
/// Empty search and type, and missing bounds, accept everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Free-text search
    pub search: String,
    /// Exact type to keep
    pub item_type: Option<String>,
    /// Lower bound, inclusive
    pub min_date: Option<NaiveDate>,
    /// Upper bound, inclusive
    pub max_date: Option<NaiveDate>,
}

impl ItemFilter {
    /// Whether `record`, members included, passes every predicate.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_with_members(record, record.members())
    }

    /// Whether a bundle matches on its own name, type and dates, ignoring its members.
    ///
    /// A bundle that fully matches shows all of its members; otherwise only the members
    /// that match individually are shown.
    #[must_use]
    pub fn fully_matches(&self, bundle: &Record) -> bool {
        self.matches_with_members(bundle, &[])
    }

    /// Members of `bundle` to display under its header.
    #[must_use]
    pub fn visible_members<'a>(&self, bundle: &'a Record) -> Vec<&'a Record> {
        if self.fully_matches(bundle) {
            bundle.members().iter().collect()
        } else {
            bundle.members().iter().filter(|m| self.matches(m)).collect()
        }
    }

    fn matches_with_members(&self, record: &Record, members: &[Record]) -> bool {
        self.type_matches(record, members)
            && self.date_matches(record)
            && self.text_matches(record, members)
    }

    fn type_matches(&self, record: &Record, members: &[Record]) -> bool {
        match self.item_type.as_deref().filter(|t| !t.is_empty()) {
            None => true,
            Some(wanted) => {
                record.item_type == wanted || members.iter().any(|m| m.item_type == wanted)
            }
        }
    }

    fn in_range(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| {
            self.min_date.is_none_or(|min| d >= min) && self.max_date.is_none_or(|max| d <= max)
        })
    }

    fn date_matches(&self, record: &Record) -> bool {
        if self.min_date.is_none() && self.max_date.is_none() {
            return true;
        }
        self.in_range(record.purchase_date) || self.in_range(record.sale_date)
    }

    fn text_matches(&self, record: &Record, members: &[Record]) -> bool {
        let tokens = search_tokens(&self.search);
        if tokens.is_empty() {
            return true;
        }

        std::iter::once(record)
            .chain(members)
            .map(|r| normalize_name(&r.name))
            .any(|name| tokens.iter().all(|token| name.contains(token.as_str())))
    }
}

/// Row-level status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    /// Sold records only
    Sold,
    /// Priced but not sold yet
    OnSale,
    /// Not priced yet
    ToSell,
}

impl StatusFilter {
    /// Whether the row showing `record` is hidden by this filter.
    #[must_use]
    pub fn hides(self, record: &Record) -> bool {
        match self {
            Self::Sold => {
                effective_sale_date(record).is_none()
                    && !record.members().iter().any(|m| m.sale_date.is_some())
            }
            Self::OnSale => {
                let listed = effective_sale_price(record).is_some_and(|price| price > 0.0);
                !(listed && effective_sale_date(record).is_none())
            }
            Self::ToSell => match &record.members {
                Some(members) => members.iter().all(|m| has_price(m.sale_price)),
                None => has_price(record.sale_price),
            },
        }
    }
}

fn has_price(price: Option<f64>) -> bool {
    price.is_some_and(|p| p > 0.0)
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sold" => Ok(Self::Sold),
            "on-sale" => Ok(Self::OnSale),
            "to-sell" => Ok(Self::ToSell),
            other => Err(Error::UnknownStatus {
                status: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bundle, date, member, standalone};

    fn search(text: &str) -> ItemFilter {
        ItemFilter {
            search: text.to_string(),
            ..ItemFilter::default()
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ItemFilter::default();
        assert!(filter.matches(&standalone(1, "Lamp", 10.0)));
        assert!(filter.matches(&bundle(2, 30.0, vec![member(3, "A"), member(4, "B")])));
    }

    #[test]
    fn test_search_ignores_case_and_diacritics() {
        let record = standalone(1, "Éléphant en peluche", 10.0);
        assert!(search("elephant").matches(&record));
        assert!(search("PELUCHE éléph").matches(&record));
        assert!(!search("girafe").matches(&record));
    }

    #[test]
    fn test_search_needs_every_token_in_one_name() {
        let record = bundle(
            1,
            30.0,
            vec![member(2, "Super Mario"), member(3, "Zelda Link")],
        );
        assert!(search("mario super").matches(&record));
        assert!(search("zelda").matches(&record));
        assert!(!search("mario zelda").matches(&record));
    }

    #[test]
    fn test_search_handles_hyphens_and_punctuation() {
        let record = standalone(1, "T-Shirt (XL)", 5.0);
        assert!(search("t-shirt").matches(&record));
        assert!(search("tshirt, xl!").matches(&record));
    }

    #[test]
    fn test_type_filter_looks_into_members() {
        let mut book = member(2, "Roman");
        book.item_type = "Livre".to_string();
        let record = bundle(1, 30.0, vec![member(3, "Mario"), book]);

        let filter = ItemFilter {
            item_type: Some("Livre".to_string()),
            ..ItemFilter::default()
        };
        assert!(filter.matches(&record));
        assert!(!filter.fully_matches(&record));
        assert!(!filter.matches(&standalone(4, "Lamp", 3.0)));
    }

    #[test]
    fn test_date_range_accepts_purchase_or_sale_date() {
        let mut record = standalone(1, "Lamp", 10.0);
        record.purchase_date = Some(date(2022, 12, 20));
        record.sale_date = Some(date(2023, 1, 15));

        let january = ItemFilter {
            min_date: Some(date(2023, 1, 1)),
            max_date: Some(date(2023, 1, 31)),
            ..ItemFilter::default()
        };
        assert!(january.matches(&record));

        let bounds_inclusive = ItemFilter {
            min_date: Some(date(2022, 12, 20)),
            max_date: Some(date(2022, 12, 20)),
            ..ItemFilter::default()
        };
        assert!(bounds_inclusive.matches(&record));

        let february = ItemFilter {
            min_date: Some(date(2023, 2, 1)),
            ..ItemFilter::default()
        };
        assert!(!february.matches(&record));
    }

    #[test]
    fn test_dateless_record_only_fails_active_bounds() {
        let dateless = member(1, "A");
        assert!(ItemFilter::default().matches(&dateless));

        let bounded = ItemFilter {
            min_date: Some(date(2023, 1, 1)),
            ..ItemFilter::default()
        };
        assert!(!bounded.matches(&dateless));
    }

    #[test]
    fn test_names_and_search_fold_the_same_way() {
        // U+0345 is both alphabetic and a combining mark
        let record = standalone(1, "Ka\u{345}lo", 5.0);
        assert!(search("kalo").matches(&record));
        assert!(search("ka\u{345}lo").matches(&record));
        assert_eq!(normalize_name("Ka\u{345}lo"), "kalo");
    }

    #[test]
    fn test_visible_members_of_a_matching_bundle() {
        let record = bundle(1, 30.0, vec![member(2, "Mario"), member(3, "Zelda")]);

        let header_match = search("lot");
        assert_eq!(header_match.visible_members(&record).len(), 2);

        let member_match = search("zelda");
        assert!(member_match.matches(&record));
        let visible = member_match.visible_members(&record);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Zelda");
    }

    #[test]
    fn test_status_sold() {
        let mut sold = standalone(1, "Lamp", 10.0);
        sold.sale_date = Some(date(2023, 1, 1));
        assert!(!StatusFilter::Sold.hides(&sold));
        assert!(StatusFilter::Sold.hides(&standalone(2, "Vase", 5.0)));

        // A partly sold bundle still shows under "sold"
        let mut partly = member(4, "A");
        partly.sale_date = Some(date(2023, 1, 1));
        let record = bundle(3, 20.0, vec![partly, member(5, "B")]);
        assert!(!StatusFilter::Sold.hides(&record));
    }

    #[test]
    fn test_status_on_sale() {
        let mut listed = standalone(1, "Lamp", 10.0);
        listed.sale_price = Some(25.0);
        assert!(!StatusFilter::OnSale.hides(&listed));

        listed.sale_date = Some(date(2023, 1, 1));
        assert!(StatusFilter::OnSale.hides(&listed));
        assert!(StatusFilter::OnSale.hides(&standalone(2, "Vase", 5.0)));
    }

    #[test]
    fn test_status_to_sell() {
        let mut listed = standalone(1, "Lamp", 10.0);
        assert!(!StatusFilter::ToSell.hides(&listed));
        listed.sale_price = Some(25.0);
        assert!(StatusFilter::ToSell.hides(&listed));

        let mut priced = member(3, "A");
        priced.sale_price = Some(4.0);
        let record = bundle(2, 20.0, vec![priced.clone(), member(4, "B")]);
        assert!(!StatusFilter::ToSell.hides(&record));

        let record = bundle(2, 20.0, vec![priced.clone(), priced]);
        assert!(StatusFilter::ToSell.hides(&record));
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!("on-sale".parse::<StatusFilter>().ok(), Some(StatusFilter::OnSale));
        assert!(matches!(
            "archived".parse::<StatusFilter>(),
            Err(Error::UnknownStatus { status }) if status == "archived"
        ));
    }
}
