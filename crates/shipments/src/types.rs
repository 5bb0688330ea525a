//! Core data model for the shipments crate.
//!
//! Upstream carrier integrations do not agree on a record layout, so every
//! field except `key` is optional and decoding is lenient: values of the wrong
//! JSON type are treated as absent instead of failing the whole record.
//!
//! # Type Hierarchy
//!
//! ```text
//! serde_json::Value (host attributes)
//!        │
//!        ▼ normalize()
//! Feed
//! ├── Unavailable            (entity unknown to the host)
//! └── Available(Vec<ShipmentRecord>)
//!     ├── key: String        (track-and-trace code)
//!     ├── name, status_message, url
//!     ├── delivered: bool    (host truthiness)
//!     ├── delivery_date, planned_date, planned_to, expected_datetime
//!     ├── shipment_type, delivery_address_type
//!     └── extra: Map         (everything else, untouched)
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// Attribute names decoded into typed fields. Everything else lands in
/// [`ShipmentRecord::extra`].
const KNOWN_FIELDS: [&str; 11] = [
    "key",
    "name",
    "delivered",
    "delivery_date",
    "planned_date",
    "planned_to",
    "expected_datetime",
    "status_message",
    "shipment_type",
    "delivery_address_type",
    "url",
];

/// One tracked parcel.
///
/// Empty strings are stored as `None`: the host treats them as falsy, so an
/// empty `delivery_date` must fall through to `planned_date` just like a
/// missing one.
///
/// # Examples
///
/// ```rust
/// use shipments::ShipmentRecord;
/// use serde_json::json;
///
/// let record = ShipmentRecord::try_from(&json!({
///     "key": "3SABCD1234567",
///     "name": "Boekenpakket",
///     "delivered": 1,
///     "shipment_type": "LetterboxParcel"
/// }))
/// .unwrap();
///
/// assert_eq!(record.key, "3SABCD1234567");
/// assert!(record.delivered);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ShipmentRecord {
    /// Track-and-trace code. Identity key for de-duplication and UI binding.
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `false` means in transit.
    pub delivered: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_datetime: Option<String>,

    /// Carrier-provided status text that overrides the default label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address_type: Option<String>,

    /// External tracking link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Attributes this crate does not interpret, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShipmentRecord {
    /// Creates a bare record with only a key. Mostly useful in tests and
    /// fixtures; real records come from [`crate::normalize`].
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            delivered: false,
            delivery_date: None,
            planned_date: None,
            planned_to: None,
            expected_datetime: None,
            status_message: None,
            shipment_type: None,
            delivery_address_type: None,
            url: None,
            extra: Map::new(),
        }
    }

    /// Typed view over the raw `shipment_type` attribute.
    pub fn shipment_kind(&self) -> Option<ShipmentType> {
        self.shipment_type.as_deref().map(ShipmentType::from_raw)
    }

    /// Typed view over the raw `delivery_address_type` attribute.
    pub fn address_kind(&self) -> Option<DeliveryAddressType> {
        self.delivery_address_type
            .as_deref()
            .map(DeliveryAddressType::from_raw)
    }
}

impl TryFrom<&Value> for ShipmentRecord {
    type Error = RecordError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(RecordError::NotAnObject {
            found: json_kind(value),
        })?;

        let key = object
            .get("key")
            .and_then(scalar_text)
            .ok_or(RecordError::MissingKey)?;

        let extra = object
            .iter()
            .filter(|(name, _)| !KNOWN_FIELDS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Self {
            key,
            name: text_field(object, "name"),
            delivered: object.get("delivered").is_some_and(is_truthy),
            delivery_date: text_field(object, "delivery_date"),
            planned_date: text_field(object, "planned_date"),
            planned_to: text_field(object, "planned_to"),
            expected_datetime: text_field(object, "expected_datetime"),
            status_message: text_field(object, "status_message"),
            shipment_type: text_field(object, "shipment_type"),
            delivery_address_type: text_field(object, "delivery_address_type"),
            url: text_field(object, "url"),
            extra,
        })
    }
}

impl TryFrom<Value> for ShipmentRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

/// Parcel format reported by the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentType {
    /// Fits through a letterbox.
    LetterboxParcel,
    /// Anything else.
    Parcel,
}

impl ShipmentType {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "LetterboxParcel" => ShipmentType::LetterboxParcel,
            _ => ShipmentType::Parcel,
        }
    }
}

/// Where the carrier drops the parcel off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryAddressType {
    /// Pick-up point.
    ServicePoint,
    /// Home delivery.
    Home,
}

impl DeliveryAddressType {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "ServicePoint" => DeliveryAddressType::ServicePoint,
            _ => DeliveryAddressType::Home,
        }
    }
}

/// Which configured entity a payload came from.
///
/// The distribution feed accepts a few extra container keys, see
/// [`crate::payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Received parcels.
    Primary,
    /// Sent parcels.
    Distribution,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Primary => f.write_str("primary"),
            FeedKind::Distribution => f.write_str("distribution"),
        }
    }
}

/// Result of normalizing one entity's attributes.
///
/// `Unavailable` and `Available(vec![])` are different answers: the first
/// means the host does not know the entity at all, the second means the
/// entity exists and currently tracks nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Feed {
    Unavailable,
    Available(Vec<ShipmentRecord>),
}

impl Feed {
    pub fn is_available(&self) -> bool {
        matches!(self, Feed::Available(_))
    }

    /// Records of an available feed; empty for an unavailable one.
    pub fn records(&self) -> &[ShipmentRecord] {
        match self {
            Feed::Available(records) => records,
            Feed::Unavailable => &[],
        }
    }

    /// `None` when the entity is unavailable.
    pub fn into_records(self) -> Option<Vec<ShipmentRecord>> {
        match self {
            Feed::Available(records) => Some(records),
            Feed::Unavailable => None,
        }
    }
}

/// Host truthiness: `null`, `false`, `0`, `""` are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Strings and numbers as text; empty strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, name: &str) -> Option<String> {
    object.get(name).and_then(scalar_text)
}
