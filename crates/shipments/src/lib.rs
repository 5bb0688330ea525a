//! Shipment normalization and filtering for parcel-tracking dashboards.
//!
//! Host integrations expose tracked parcels as loosely structured entity
//! attributes. This crate turns those attributes into ordered, de-duplicated
//! [`ShipmentRecord`]s ready for display.
//!
//! ## What we do here
//!
//! - **Normalize payloads** - Detect which of the known attribute layouts a
//!   payload uses and decode it, never failing on junk ([`normalize`]).
//! - **Apply the recency cutoff** - Hide delivered parcels older than the
//!   configured window; in-transit parcels always stay ([`apply_cutoff`]).
//! - **Select a tab** - Filter by delivery state or switch to the sent feed,
//!   newest first, stable on ties ([`select_view`]).
//! - **Count** - In-transit and delivered totals for the header
//!   ([`FeedCounts`]).
//!
//! ## Main entry point
//!
//! Call [`prepare_feeds`] with the primary and distribution attributes and a
//! [`FilterConfig`]; it returns `None` when the primary entity is unknown to
//! the host, otherwise a [`PreparedFeeds`] that can produce any tab's view.
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use shipments::{prepare_feeds, FilterConfig, Tab};
//!
//! let primary = json!([
//!     {"key": "A", "delivered": false},
//!     {"key": "B", "delivered": true, "delivery_date": "2024-01-01"}
//! ]);
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//!
//! let feeds = prepare_feeds(Some(&primary), None, &FilterConfig::default(), now).unwrap();
//!
//! assert_eq!(feeds.select(Tab::InTransit).len(), 1);
//! assert!(feeds.select(Tab::Delivered).is_empty());
//! assert_eq!(feeds.counts.in_transit, 1);
//! assert_eq!(feeds.counts.delivered, 0);
//! ```
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use serde_json::Value;
use tracing::{Level, debug};

mod config;
mod cutoff;
mod dates;
mod error;
mod payload;
mod types;
mod view;

pub use crate::config::{
    ConfigError, DEFAULT_DAYS_BACK, FilterConfig, MAX_DAYS_BACK, MIN_DAYS_BACK,
};
pub use crate::cutoff::{apply_cutoff, cutoff_instant, effective_days_back};
pub use crate::dates::{EPOCH, parse_date_like, parse_date_like_in, resolve_date, resolve_date_in};
pub use crate::error::{ParseTabError, RecordError};
pub use crate::payload::{PayloadShape, detect_shape, normalize};
pub use crate::types::{
    DeliveryAddressType, Feed, FeedKind, ShipmentRecord, ShipmentType, is_truthy,
};
pub use crate::view::{FeedCounts, Tab, ViewState, select_view, select_view_in, sort_by_recency};

/// Both feeds after normalization and cutoff, ready for tab selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFeeds {
    /// Received parcels, cutoff applied.
    pub primary: Vec<ShipmentRecord>,
    /// Sent parcels; cutoff applied only with [`FilterConfig::cutoff_sent`].
    pub distribution: Vec<ShipmentRecord>,
    /// Totals over `primary`.
    pub counts: FeedCounts,
    /// Offset of `now`; date-times without an offset are read in it.
    pub local: FixedOffset,
}

impl PreparedFeeds {
    /// Records for `tab`, newest first.
    pub fn select(&self, tab: Tab) -> Vec<ShipmentRecord> {
        select_view_in(&self.primary, &self.distribution, tab, &self.local)
    }
}

/// Normalizes both feeds and applies the recency cutoff.
///
/// Returns `None` when `primary` is `None` (the configured entity does not
/// exist). A missing distribution entity is simply an empty sent feed.
///
/// The offset of `now` is the viewer's: carrier date-times without an offset
/// are wall-clock times there.
pub fn prepare_feeds<Tz: TimeZone>(
    primary: Option<&Value>,
    distribution: Option<&Value>,
    cfg: &FilterConfig,
    now: DateTime<Tz>,
) -> Option<PreparedFeeds> {
    let start = Instant::now();
    let span = tracing::span!(Level::DEBUG, "shipments.prepare_feeds", days_back = cfg.days_back);
    let _guard = span.enter();

    let days_back = Some(i64::from(cfg.days_back));
    let local = now.offset().fix();
    let now = now.with_timezone(&local);

    let primary = normalize(primary, FeedKind::Primary).into_records()?;
    let primary = apply_cutoff(primary, days_back, now);

    let distribution = normalize(distribution, FeedKind::Distribution)
        .into_records()
        .unwrap_or_default();
    let distribution = if cfg.cutoff_sent {
        apply_cutoff(distribution, days_back, now)
    } else {
        distribution
    };

    let counts = FeedCounts::from_records(&primary);
    debug!(
        in_transit = counts.in_transit,
        delivered = counts.delivered,
        sent = distribution.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "prepare_feeds_success"
    );

    Some(PreparedFeeds {
        primary,
        distribution,
        counts,
        local,
    })
}
