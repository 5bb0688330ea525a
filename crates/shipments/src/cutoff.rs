//! Recency cutoff for delivered parcels.
//!
//! In-transit parcels are never hidden, however old their dates. Delivered
//! parcels stay visible while their [`cutoff_date`](ShipmentRecord::cutoff_date)
//! is at or after `now - days_back`. Date-times without an offset are read in
//! the offset of `now`.
use chrono::{DateTime, Duration, Offset, TimeZone, Utc};

use crate::config::DEFAULT_DAYS_BACK;
use crate::types::ShipmentRecord;

/// Window actually applied: non-positive or missing values mean the default.
pub fn effective_days_back(days_back: Option<i64>) -> i64 {
    match days_back {
        Some(days) if days > 0 => days,
        _ => i64::from(DEFAULT_DAYS_BACK),
    }
}

/// Oldest delivery instant still shown.
pub fn cutoff_instant(now: DateTime<Utc>, days_back: Option<i64>) -> DateTime<Utc> {
    let days = effective_days_back(days_back);
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keeps in-transit records and recently delivered ones, preserving order.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use shipments::{apply_cutoff, ShipmentRecord};
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
/// let mut old = ShipmentRecord::new("old");
/// old.delivered = true;
/// old.delivery_date = Some("2024-01-01".into());
///
/// let kept = apply_cutoff(vec![ShipmentRecord::new("moving"), old], Some(7), now);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].key, "moving");
/// ```
pub fn apply_cutoff<Tz: TimeZone>(
    mut records: Vec<ShipmentRecord>,
    days_back: Option<i64>,
    now: DateTime<Tz>,
) -> Vec<ShipmentRecord> {
    let local = now.offset().fix();
    let cutoff = cutoff_instant(now.with_timezone(&Utc), days_back);
    records.retain(|record| !record.delivered || record.cutoff_date_in(&local) >= cutoff);
    records
}
