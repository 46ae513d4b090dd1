use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fewer days than this left means it's time to reorder
pub const LOW_STOCK_DAYS: f64 = 3.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// How long an item will last at its current usage rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepletionEstimate {
    /// Days until the item runs out (not rounded)
    pub days_left: f64,
    /// Moment the item runs out
    pub reorder_at: DateTime<Utc>,
    /// True when `days_left` is under [`LOW_STOCK_DAYS`]
    pub low_stock: bool,
}

impl DepletionEstimate {
    /// Calendar date to reorder by. Truncation happens here, never on the stored value.
    pub fn reorder_date(&self) -> NaiveDate {
        self.reorder_at.date_naive()
    }
}

/// Project when an item runs out, assuming constant daily usage
///
/// Zero, negative or NaN usage has no meaningful answer and yields
/// [`Error::NoEstimate`] instead of dividing by zero.
pub fn estimate(amount_left: f64, usage_per_day: f64, now: DateTime<Utc>) -> Result<DepletionEstimate> {
    // Written this way round so NaN lands in the error branch too
    if !(usage_per_day > 0.0) {
        return Err(Error::NoEstimate(format!(
            "usage per day must be above zero, got {}",
            usage_per_day
        )));
    }

    let days_left = amount_left / usage_per_day;
    if !days_left.is_finite() {
        return Err(Error::NoEstimate(format!(
            "{} units at {} per day does not give a finite number of days",
            amount_left, usage_per_day
        )));
    }

    // Float to int casts saturate, so huge values fail the range checks below
    let offset = Duration::try_milliseconds((days_left * MILLIS_PER_DAY) as i64)
        .ok_or_else(|| Error::NoEstimate("reorder date out of range".into()))?;
    let reorder_at = now
        .checked_add_signed(offset)
        .ok_or_else(|| Error::NoEstimate("reorder date out of range".into()))?;

    Ok(DepletionEstimate {
        days_left,
        reorder_at,
        low_stock: days_left < LOW_STOCK_DAYS,
    })
}
