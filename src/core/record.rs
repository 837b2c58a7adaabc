//! In-memory record model.
//!
//! A [`Record`] is the normalized form of a stored item. Bundles own their resolved members
//! in `members`; members keep a back-reference to their bundle in `bundle_id`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Reserved type tag for bundles
pub const BUNDLE_TYPE: &str = "Bundle";

/// Name marker used by older records to flag items kept by the owner.
pub const LEGACY_BOUGHT_FOR_ME_MARKER: &str = "POUR MOI";

/// Physical condition of an item, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Brand new
    New,
    /// Like new
    LikeNew,
    /// Very good
    VeryGood,
    /// Good
    Good,
    /// Acceptable
    Acceptable,
    /// Bad
    Bad,
}

impl Condition {
    /// All conditions in rank order
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::LikeNew,
        Self::VeryGood,
        Self::Good,
        Self::Acceptable,
        Self::Bad,
    ];

    /// Stored tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::VeryGood => "very-good",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Bad => "bad",
        }
    }

    /// French label shown in the items table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "Neuf",
            Self::LikeNew => "Comme neuf",
            Self::VeryGood => "Très bon état",
            Self::Good => "Bon état",
            Self::Acceptable => "Acceptable",
            Self::Bad => "Mauvais état",
        }
    }

    /// Position in [`Condition::ALL`]
    #[must_use]
    pub const fn rank(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// The three mutually exclusive roles a record can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Neither a bundle nor inside one
    Standalone,
    /// Owns member records
    Bundle,
    /// Belongs to a bundle
    Member,
}

/// A normalized item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stored item id
    pub id: i64,
    /// Free-text name
    pub name: String,
    /// Category tag or [`BUNDLE_TYPE`]
    pub item_type: String,
    /// Condition, `None` when absent or unrecognised
    pub condition: Option<Condition>,
    /// Purchase date
    pub purchase_date: Option<NaiveDate>,
    /// Purchase price
    pub purchase_price: Option<f64>,
    /// Sale date, set once sold
    pub sale_date: Option<NaiveDate>,
    /// Asking or final sale price
    pub sale_price: Option<f64>,
    /// Listing URL
    pub link: Option<String>,
    /// Parent bundle for members
    pub bundle_id: Option<i64>,
    /// Kept by the owner rather than resold
    pub bought_for_me: bool,
    /// Resolved members, present only for bundles
    pub members: Option<Vec<Record>>,
}

impl Record {
    /// Infers the record's role from `members` and `bundle_id`.
    #[must_use]
    pub const fn role(&self) -> Role {
        if self.members.is_some() {
            Role::Bundle
        } else if self.bundle_id.is_some() {
            Role::Member
        } else {
            Role::Standalone
        }
    }

    /// Whether this record is a bundle
    #[must_use]
    pub const fn is_bundle(&self) -> bool {
        matches!(self.role(), Role::Bundle)
    }

    /// Member records, empty for anything but a bundle
    #[must_use]
    pub fn members(&self) -> &[Self] {
        self.members.as_deref().unwrap_or_default()
    }
}

/// Display name of a bundle holding `count` members.
#[must_use]
pub fn bundle_name(count: usize) -> String {
    format!("Lot de {count} articles")
}
