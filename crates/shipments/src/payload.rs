//! Shape detection and normalization of host attribute payloads.
//!
//! Carrier integrations have shipped several attribute layouts over the
//! years. Rather than testing keys ad hoc, the accepted layouts form a closed
//! set ([`PayloadShape`]) and detection walks them in a fixed priority order.
//! A payload that satisfies several shapes is decoded by the first one only.
//!
//! # Detection Order
//!
//! ```text
//! payload
//!   │
//!   ├─ array ─────────────────────────────────▶ Sequence
//!   ├─ enroute / en_route / delivered ────────▶ Split   (en route first)
//!   │   (+ Enroute / Delivered for the distribution feed)
//!   ├─ shipments ─────────────────────────────▶ Shipments
//!   ├─ parcels ───────────────────────────────▶ Parcels
//!   └─ any other object ──────────────────────▶ KeyedValues
//!       (values that are objects with a key, in attribute order)
//! ```
//!
//! Keys count as present under host truthiness, so `"delivered": []` selects
//! the split layout even though it contributes nothing.
//!
//! # Examples
//!
//! ```rust
//! use shipments::{FeedKind, normalize};
//! use serde_json::json;
//!
//! let attrs = json!({
//!     "en_route": [{"key": "A"}],
//!     "delivered": [{"key": "B", "delivered": true}]
//! });
//!
//! let feed = normalize(Some(&attrs), FeedKind::Primary);
//! let keys: Vec<_> = feed.records().iter().map(|r| r.key.as_str()).collect();
//! assert_eq!(keys, ["A", "B"]);
//! ```
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::types::{Feed, FeedKind, ShipmentRecord, is_truthy};

const PRIMARY_EN_ROUTE_KEYS: &[&str] = &["enroute", "en_route"];
const PRIMARY_DELIVERED_KEYS: &[&str] = &["delivered"];
const DISTRIBUTION_EN_ROUTE_KEYS: &[&str] = &["enroute", "en_route", "Enroute"];
const DISTRIBUTION_DELIVERED_KEYS: &[&str] = &["delivered", "Delivered"];

/// Accepted payload layouts, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// The payload is itself the record array.
    Sequence,
    /// Separate en-route and delivered arrays, concatenated en route first.
    Split,
    /// An object holding the record array under `shipments`.
    Shipments,
    /// An object holding the record array under `parcels`.
    Parcels,
    /// Any other object; its values that carry a `key` are the records.
    KeyedValues,
    /// Scalars and `null`; yields no records.
    Unrecognized,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadShape::Sequence => "sequence",
            PayloadShape::Split => "split",
            PayloadShape::Shipments => "shipments",
            PayloadShape::Parcels => "parcels",
            PayloadShape::KeyedValues => "keyed_values",
            PayloadShape::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

fn en_route_keys(kind: FeedKind) -> &'static [&'static str] {
    match kind {
        FeedKind::Primary => PRIMARY_EN_ROUTE_KEYS,
        FeedKind::Distribution => DISTRIBUTION_EN_ROUTE_KEYS,
    }
}

fn delivered_keys(kind: FeedKind) -> &'static [&'static str] {
    match kind {
        FeedKind::Primary => PRIMARY_DELIVERED_KEYS,
        FeedKind::Distribution => DISTRIBUTION_DELIVERED_KEYS,
    }
}

/// Picks the shape a payload is decoded with.
pub fn detect_shape(payload: &Value, kind: FeedKind) -> PayloadShape {
    let object = match payload {
        Value::Array(_) => return PayloadShape::Sequence,
        Value::Object(object) => object,
        _ => return PayloadShape::Unrecognized,
    };

    let split_key_present = en_route_keys(kind)
        .iter()
        .chain(delivered_keys(kind))
        .any(|name| has_truthy(object, name));

    if split_key_present {
        PayloadShape::Split
    } else if has_truthy(object, "shipments") {
        PayloadShape::Shipments
    } else if has_truthy(object, "parcels") {
        PayloadShape::Parcels
    } else {
        PayloadShape::KeyedValues
    }
}

/// Normalizes one entity's attributes into a feed.
///
/// `None` means the host has no such entity and yields
/// [`Feed::Unavailable`]. Any payload, however malformed, yields
/// [`Feed::Available`]; entries that are not objects or lack a key are
/// dropped, and repeated keys keep their first occurrence.
pub fn normalize(payload: Option<&Value>, kind: FeedKind) -> Feed {
    let Some(payload) = payload else {
        debug!(feed = %kind, "normalize_unavailable");
        return Feed::Unavailable;
    };

    let start = Instant::now();
    let shape = detect_shape(payload, kind);
    let entries = shape_entries(payload, shape, kind);
    let total = entries.len();

    let mut seen = HashSet::with_capacity(total);
    let mut records = Vec::with_capacity(total);
    let mut dropped = 0usize;
    let mut duplicates = 0usize;

    for entry in entries {
        match ShipmentRecord::try_from(entry) {
            Ok(record) => {
                if seen.insert(record.key.clone()) {
                    records.push(record);
                } else {
                    trace!(feed = %kind, key = %record.key, "normalize_duplicate_key");
                    duplicates += 1;
                }
            }
            Err(err) => {
                trace!(feed = %kind, error = %err, "normalize_dropped_entry");
                dropped += 1;
            }
        }
    }

    debug!(
        feed = %kind,
        shape = %shape,
        records = records.len(),
        dropped,
        duplicates,
        elapsed_micros = start.elapsed().as_micros(),
        "normalize_success"
    );

    Feed::Available(records)
}

/// Raw entries of a payload under the given shape, in payload order.
fn shape_entries(payload: &Value, shape: PayloadShape, kind: FeedKind) -> Vec<&Value> {
    match (shape, payload) {
        (PayloadShape::Sequence, Value::Array(items)) => items.iter().collect(),
        (PayloadShape::Split, Value::Object(object)) => {
            let mut entries = first_sequence(object, en_route_keys(kind));
            entries.extend(first_sequence(object, delivered_keys(kind)));
            entries
        }
        (PayloadShape::Shipments, Value::Object(object)) => sequence_at(object, "shipments"),
        (PayloadShape::Parcels, Value::Object(object)) => sequence_at(object, "parcels"),
        (PayloadShape::KeyedValues, Value::Object(object)) => object
            .values()
            .filter(|value| value.get("key").is_some_and(is_truthy))
            .collect(),
        _ => Vec::new(),
    }
}

/// Entries of the first candidate key that holds an array.
fn first_sequence<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Vec<&'a Value> {
    candidates
        .iter()
        .find_map(|name| object.get(*name).and_then(Value::as_array))
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}

fn sequence_at<'a>(object: &'a Map<String, Value>, name: &str) -> Vec<&'a Value> {
    first_sequence(object, &[name])
}

fn has_truthy(object: &Map<String, Value>, name: &str) -> bool {
    object.get(name).is_some_and(is_truthy)
}
