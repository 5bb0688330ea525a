//! Umbrella crate for the parcel-tracking dashboard card.
//!
//! This crate ties the shipment pipeline (`shipments`) to a host state
//! snapshot and a YAML card configuration, and produces the presentation
//! model a renderer draws from: header, tabs, parcel rows and animation.
//!
//! ```
//! use chrono::DateTime;
//! use parcelview::{build_card_view, CardConfig, CardView, HostStates, ViewState};
//! use serde_json::json;
//!
//! let mut states = HostStates::new();
//! states.insert("sensor.postnl", json!({"enroute": [{"key": "3S1", "name": "Lamp"}]}));
//!
//! let now = DateTime::parse_from_rfc3339("2024-06-01T12:00:00+02:00").unwrap();
//! let view = build_card_view(&states, &CardConfig::stub(), &ViewState::default(), now);
//!
//! let CardView::Ready(card) = view else { panic!("entity present") };
//! assert_eq!(card.header.stats, "1 onderweg • 0 recent");
//! assert_eq!(card.parcels[0].name, "Lamp");
//! ```

pub mod config;
pub mod host;
pub mod presentation;

pub use config::{CardConfig, CardSection, ConfigLoadError};
pub use host::{EntityState, HostStates, StateProvider, StatesLoadError};
pub use presentation::{Animation, Header, ParcelSummary, TabInfo};
pub use shipments::{
    Feed, FeedCounts, FeedKind, FilterConfig, PayloadShape, PreparedFeeds, ShipmentRecord, Tab,
    ViewState, apply_cutoff, normalize, prepare_feeds, select_view,
};

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{Level, info, warn};

use crate::presentation::{
    EMPTY_TAB_HINT, animation_for, effective_view_state, list_identity, tab_infos,
};

/// Errors that can occur while loading the card inputs.
#[derive(Debug)]
pub enum CardError {
    Config(ConfigLoadError),
    States(StatesLoadError),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardError::Config(err) => write!(f, "card configuration: {err}"),
            CardError::States(err) => write!(f, "host states: {err}"),
        }
    }
}

impl Error for CardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CardError::Config(err) => Some(err),
            CardError::States(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for CardError {
    fn from(value: ConfigLoadError) -> Self {
        CardError::Config(value)
    }
}

impl From<StatesLoadError> for CardError {
    fn from(value: StatesLoadError) -> Self {
        CardError::States(value)
    }
}

/// Loads and validates a card configuration plus a host state snapshot.
pub fn load_inputs(
    config_path: impl AsRef<Path>,
    states_path: impl AsRef<Path>,
) -> Result<(CardConfig, HostStates), CardError> {
    let config = CardConfig::from_file(config_path)?;
    let states = HostStates::from_file(states_path)?;
    Ok((config, states))
}

/// What the card shows for one host snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CardView {
    /// The configured entity does not exist on the host.
    EntityNotFound { entity: String, message: String },
    /// Normal card contents.
    Ready(CardSnapshot),
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSnapshot {
    pub header: Header,
    pub layout: Vec<CardSection>,
    pub tabs: Vec<TabInfo>,
    pub active_tab: Tab,
    pub counts: FeedCounts,
    pub parcels: Vec<ParcelSummary>,
    /// Shown instead of the list when `parcels` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_hint: Option<&'static str>,
    pub animation: Animation,
    /// View state actually applied (hidden tabs fall back to in-transit).
    pub view: ViewState,
}

impl CardSnapshot {
    /// Displayed keys, in order.
    pub fn list_identity(&self) -> Vec<&str> {
        list_identity(&self.parcels)
    }
}

/// Builds the card view for the latest host snapshot.
///
/// `now` drives the recency cutoff, and its offset is the viewer's timezone:
/// carrier date-times without an offset are read in it, and date labels are
/// shown in it.
pub fn build_card_view<P: StateProvider + ?Sized>(
    provider: &P,
    config: &CardConfig,
    view: &ViewState,
    now: DateTime<FixedOffset>,
) -> CardView {
    let start = Instant::now();
    let entity = config.entity_id();
    let span = tracing::span!(Level::INFO, "parcelview.build_card_view", entity = %entity);
    let _guard = span.enter();

    let primary = provider.attributes(entity);
    let distribution = config
        .distribution_entity()
        .and_then(|entity| provider.attributes(entity));

    let Some(feeds) = prepare_feeds(primary, distribution, &config.filter(), now) else {
        warn!(entity = %entity, "card_entity_missing");
        return CardView::EntityNotFound {
            entity: entity.to_string(),
            message: format!("Entiteit niet gevonden: {entity}"),
        };
    };

    let view = effective_view_state(config, view);
    let displayed = feeds.select(view.active_tab());
    let offset = *now.offset();
    let parcels: Vec<ParcelSummary> = displayed
        .iter()
        .map(|record| ParcelSummary::from_record(record, view.selected(), &offset))
        .collect();

    let snapshot = CardSnapshot {
        header: Header::new(config, &feeds.counts),
        layout: config.layout_order.clone(),
        tabs: tab_infos(config, view.active_tab()),
        active_tab: view.active_tab(),
        counts: feeds.counts,
        empty_hint: parcels.is_empty().then_some(EMPTY_TAB_HINT),
        animation: animation_for(config, &view, &displayed),
        parcels,
        view,
    };

    info!(
        tab = %snapshot.active_tab,
        displayed = snapshot.parcels.len(),
        in_transit = snapshot.counts.in_transit,
        delivered = snapshot.counts.delivered,
        elapsed_micros = start.elapsed().as_micros(),
        "card_view_success"
    );

    CardView::Ready(snapshot)
}
