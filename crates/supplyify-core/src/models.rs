use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::DepletionEstimate;

/// Starting quantity for a freshly added item
pub const DEFAULT_AMOUNT_LEFT: f64 = 1.0;

/// Starting usage rate for a freshly added item
pub const DEFAULT_USAGE_PER_DAY: f64 = 1.0;

/// A registered account. The raw password is gone by the time one of these exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
}

/// Stable identifier of a supply item
///
/// Handed out by the storage backend and never reused, so removing one item
/// never changes the id of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ItemId)
    }
}

/// Something the user owns and wants to reorder before it runs out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyItem {
    pub id: ItemId,
    /// The search query the item was added from
    pub name: String,
    /// Affiliate search link, fixed at creation
    pub link: String,
    pub amount_left: f64,
    pub usage_per_day: f64,
    pub added_on: DateTime<Utc>,
}

/// Item data before the backend assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplyItem {
    pub name: String,
    pub link: String,
    pub amount_left: f64,
    pub usage_per_day: f64,
    pub added_on: DateTime<Utc>,
}

impl NewSupplyItem {
    /// New item with the default quantity and usage rate
    pub fn with_defaults(name: String, link: String, added_on: DateTime<Utc>) -> Self {
        Self {
            name,
            link,
            amount_left: DEFAULT_AMOUNT_LEFT,
            usage_per_day: DEFAULT_USAGE_PER_DAY,
            added_on,
        }
    }

    pub fn into_item(self, id: ItemId) -> SupplyItem {
        SupplyItem {
            id,
            name: self.name,
            link: self.link,
            amount_left: self.amount_left,
            usage_per_day: self.usage_per_day,
            added_on: self.added_on,
        }
    }
}

/// An item together with its depletion estimate, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyStatus {
    pub item: SupplyItem,
    /// None when usage is zero or negative
    pub estimate: Option<DepletionEstimate>,
}

impl SupplyStatus {
    pub fn is_low_stock(&self) -> bool {
        self.estimate.as_ref().is_some_and(|e| e.low_stock)
    }
}
