//! Tab selection, ordering and aggregate counts.
//!
//! Everything here is pure: the caller owns the [`ViewState`] and re-runs
//! [`select_view`] whenever the host pushes a new snapshot or the user picks
//! a tab.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseTabError;
use crate::types::ShipmentRecord;

/// The card's tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    /// Primary-feed parcels not yet delivered.
    #[default]
    #[serde(alias = "onderweg")]
    InTransit,
    /// Primary-feed parcels delivered within the cutoff window.
    #[serde(alias = "bezorgd")]
    Delivered,
    /// The whole distribution feed.
    #[serde(alias = "verzonden")]
    Sent,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::InTransit, Tab::Delivered, Tab::Sent];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::InTransit => "in-transit",
            Tab::Delivered => "delivered",
            Tab::Sent => "sent",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ParseTabError;

    /// Accepts the kebab-case ids and the card's original Dutch tab ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in-transit" | "onderweg" => Ok(Tab::InTransit),
            "delivered" | "bezorgd" => Ok(Tab::Delivered),
            "sent" | "verzonden" => Ok(Tab::Sent),
            other => Err(ParseTabError(other.to_owned())),
        }
    }
}

/// What the user is looking at: the active tab and the expanded parcel.
///
/// Transitions consume and return the state instead of mutating it.
///
/// ```rust
/// use shipments::{Tab, ViewState};
///
/// let state = ViewState::default().toggle_parcel("3SABC");
/// assert_eq!(state.selected(), Some("3SABC"));
///
/// let state = state.select_tab(Tab::Sent);
/// assert_eq!(state.active_tab(), Tab::Sent);
/// assert_eq!(state.selected(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    active_tab: Tab,
    selected: Option<String>,
}

impl ViewState {
    pub fn new(active_tab: Tab) -> Self {
        Self {
            active_tab,
            selected: None,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Switches tab and collapses the expanded parcel. Re-selecting the
    /// active tab changes nothing.
    pub fn select_tab(self, tab: Tab) -> Self {
        if tab == self.active_tab {
            return self;
        }
        Self::new(tab)
    }

    /// Expands `key`, or collapses it when it is already expanded.
    pub fn toggle_parcel(self, key: impl Into<String>) -> Self {
        let key = key.into();
        let selected = match self.selected {
            Some(current) if current == key => None,
            _ => Some(key),
        };
        Self {
            active_tab: self.active_tab,
            selected,
        }
    }
}

/// Records shown on `tab`, most recent first.
///
/// `records` is the primary feed (already cutoff-filtered), `distribution`
/// the sent feed. Ties keep their input order. Date-times without an offset
/// are read as UTC; see [`select_view_in`] for a viewer offset.
pub fn select_view(
    records: &[ShipmentRecord],
    distribution: &[ShipmentRecord],
    tab: Tab,
) -> Vec<ShipmentRecord> {
    select_view_in(records, distribution, tab, &Utc.fix())
}

/// [`select_view`] with naive date-times read in `local`.
pub fn select_view_in(
    records: &[ShipmentRecord],
    distribution: &[ShipmentRecord],
    tab: Tab,
    local: &FixedOffset,
) -> Vec<ShipmentRecord> {
    let mut view: Vec<ShipmentRecord> = match tab {
        Tab::InTransit => records.iter().filter(|r| !r.delivered).cloned().collect(),
        Tab::Delivered => records.iter().filter(|r| r.delivered).cloned().collect(),
        Tab::Sent => distribution.to_vec(),
    };
    sort_by_recency(&mut view, local);
    view
}

/// Stable sort on [`ShipmentRecord::sort_date_in`], newest first.
pub fn sort_by_recency(records: &mut Vec<ShipmentRecord>, local: &FixedOffset) {
    let mut dated: Vec<(DateTime<Utc>, ShipmentRecord)> = records
        .drain(..)
        .map(|record| (record.sort_date_in(local), record))
        .collect();
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    records.extend(dated.into_iter().map(|(_, record)| record));
}

/// Header counters over the whole (cutoff-filtered) primary feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCounts {
    pub in_transit: usize,
    pub delivered: usize,
}

impl FeedCounts {
    pub fn from_records(records: &[ShipmentRecord]) -> Self {
        let delivered = records.iter().filter(|r| r.delivered).count();
        Self {
            in_transit: records.len() - delivered,
            delivered,
        }
    }
}
