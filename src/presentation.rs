//! Presentation model: the data a renderer needs to draw the card.
//!
//! Nothing here produces markup. Labels are Dutch, matching the carrier and
//! the card's audience.

use chrono::{Datelike, FixedOffset, Timelike};
use serde::Serialize;
use shipments::{
    DeliveryAddressType, FeedCounts, ShipmentRecord, ShipmentType, Tab, ViewState,
    parse_date_like_in,
};

use crate::config::{
    CardConfig, DEFAULT_HEADER_COLOR, DEFAULT_HEADER_TEXT_COLOR, DEFAULT_PLACEHOLDER_BACKGROUND,
    DEFAULT_TITLE,
};

pub const STATUS_IN_TRANSIT: &str = "Onderweg";
pub const STATUS_DELIVERED: &str = "Bezorgd";
pub const UNKNOWN_NAME: &str = "Onbekend";
pub const EMPTY_TAB_HINT: &str = "Geen pakketten in deze categorie";
pub const ANIMATION_HINT: &str = "Selecteer een pakket voor animatie";

/// Van offset along the road, in percent, while in transit.
pub const VAN_POSITION_IN_TRANSIT: u8 = 25;
/// Van offset along the road, in percent, once delivered.
pub const VAN_POSITION_DELIVERED: u8 = 75;

const MONTHS_NL: [&str; 12] = [
    "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// Tab caption as shown on the card.
pub fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::InTransit => "Onderweg",
        Tab::Delivered => "Bezorgd",
        Tab::Sent => "Verzonden",
    }
}

pub fn shipment_type_label(kind: ShipmentType) -> &'static str {
    match kind {
        ShipmentType::LetterboxParcel => "Brievenbuspakje",
        ShipmentType::Parcel => "Pakket",
    }
}

pub fn delivery_address_label(kind: DeliveryAddressType) -> &'static str {
    match kind {
        DeliveryAddressType::ServicePoint => "Afhaalpunt",
        DeliveryAddressType::Home => "Thuisbezorging",
    }
}

/// Header counter line, e.g. `2 onderweg • 1 recent`.
pub fn header_stats(counts: &FeedCounts) -> String {
    format!("{} onderweg • {} recent", counts.in_transit, counts.delivered)
}

/// Short Dutch date label (`30 mei 10:15`) in the given offset. Date-times
/// without an offset are already wall-clock times there. Values that do not
/// parse as dates are shown as-is.
pub fn format_date_label(raw: &str, offset: &FixedOffset) -> String {
    match parse_date_like_in(raw, offset) {
        Some(instant) => {
            let local = instant.with_timezone(offset);
            format!(
                "{} {} {:02}:{:02}",
                local.day(),
                MONTHS_NL[local.month0() as usize],
                local.hour(),
                local.minute()
            )
        }
        None => raw.to_string(),
    }
}

/// One row of the parcel list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParcelSummary {
    pub key: String,
    pub name: String,
    pub status: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub selected: bool,
}

impl ParcelSummary {
    pub fn from_record(
        record: &ShipmentRecord,
        selected: Option<&str>,
        offset: &FixedOffset,
    ) -> Self {
        let default_status = if record.delivered {
            STATUS_DELIVERED
        } else {
            STATUS_IN_TRANSIT
        };

        Self {
            key: record.key.clone(),
            name: display_name(record).to_string(),
            status: record
                .status_message
                .clone()
                .unwrap_or_else(|| default_status.to_string()),
            delivered: record.delivered,
            date_label: record.label_date().map(|raw| format_date_label(raw, offset)),
            type_label: record.shipment_kind().map(shipment_type_label),
            delivery_label: record.address_kind().map(delivery_address_label),
            url: record.url.clone(),
            selected: selected == Some(record.key.as_str()),
        }
    }
}

fn display_name(record: &ShipmentRecord) -> &str {
    record.name.as_deref().unwrap_or(UNKNOWN_NAME)
}

/// A tab button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabInfo {
    pub tab: Tab,
    pub label: &'static str,
    pub active: bool,
}

/// Tabs enabled by the configuration, in display order.
pub fn visible_tabs(config: &CardConfig) -> Vec<Tab> {
    Tab::ALL
        .into_iter()
        .filter(|tab| match tab {
            Tab::InTransit => true,
            Tab::Delivered => config.show_delivered,
            Tab::Sent => config.show_sent,
        })
        .collect()
}

/// The view state with a hidden active tab replaced by the in-transit tab.
pub fn effective_view_state(config: &CardConfig, view: &ViewState) -> ViewState {
    if visible_tabs(config).contains(&view.active_tab()) {
        view.clone()
    } else {
        view.clone().select_tab(Tab::InTransit)
    }
}

pub fn tab_infos(config: &CardConfig, active: Tab) -> Vec<TabInfo> {
    visible_tabs(config)
        .into_iter()
        .map(|tab| TabInfo {
            tab,
            label: tab_label(tab),
            active: tab == active,
        })
        .collect()
}

/// Contents of the animation area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Animation {
    /// Nothing selected, or animation switched off.
    Placeholder {
        hint: &'static str,
        background: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    /// The van on its way to (or at) the house.
    Van {
        key: String,
        name: String,
        status: &'static str,
        position_percent: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

/// Animation for the selected parcel, if it is on screen and animation is on.
pub fn animation_for(
    config: &CardConfig,
    view: &ViewState,
    displayed: &[ShipmentRecord],
) -> Animation {
    let selected = view
        .selected()
        .and_then(|key| displayed.iter().find(|record| record.key == key));

    match selected {
        Some(record) if config.show_animation => {
            let (status, position_percent) = if record.delivered {
                (STATUS_DELIVERED, VAN_POSITION_DELIVERED)
            } else {
                (STATUS_IN_TRANSIT, VAN_POSITION_IN_TRANSIT)
            };
            Animation::Van {
                key: record.key.clone(),
                name: display_name(record).to_string(),
                status,
                position_percent,
                image: non_empty(&config.van_path),
            }
        }
        _ => Animation::Placeholder {
            hint: ANIMATION_HINT,
            background: or_default(&config.placeholder_background, DEFAULT_PLACEHOLDER_BACKGROUND),
            image: config.placeholder_image.clone(),
        },
    }
}

/// Header block: title, custom logo and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub stats: String,
    pub color: String,
    pub text_color: String,
}

impl Header {
    pub fn new(config: &CardConfig, counts: &FeedCounts) -> Self {
        Self {
            title: or_default(&config.title, DEFAULT_TITLE),
            logo: non_empty(&config.logo_path),
            stats: header_stats(counts),
            color: or_default(&config.header_color, DEFAULT_HEADER_COLOR),
            text_color: or_default(&config.header_text_color, DEFAULT_HEADER_TEXT_COLOR),
        }
    }
}

/// Keys of the displayed rows, in order. A renderer can compare this with
/// the previous frame and skip rebuilding the list when it is unchanged.
pub fn list_identity(parcels: &[ParcelSummary]) -> Vec<&str> {
    parcels.iter().map(|parcel| parcel.key.as_str()).collect()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `value`, or `default` when it is blank.
fn or_default(value: &str, default: &str) -> String {
    non_empty(value).unwrap_or_else(|| default.to_string())
}
