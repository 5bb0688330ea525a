//! Shared payload generators for the card benchmarks.

#![allow(dead_code)]

use serde_json::{Value, json};

/// One generated shipment entry. Every third parcel is delivered; dates
/// fall in May 2024.
pub fn shipment_entry(index: usize) -> Value {
    let delivered = index % 3 == 0;
    let day = 1 + (index % 28);
    let hour = index % 24;
    let date = format!("2024-05-{day:02}T{hour:02}:00:00Z");

    if delivered {
        json!({
            "key": format!("3S{index:08}"),
            "name": format!("Pakket {index}"),
            "delivered": true,
            "delivery_date": date,
            "shipment_type": "Parcel",
        })
    } else {
        json!({
            "key": format!("3S{index:08}"),
            "name": format!("Pakket {index}"),
            "delivered": false,
            "planned_date": date,
            "delivery_address_type": "ServicePoint",
        })
    }
}

/// Bare sequence payload of `count` shipments.
pub fn sequence_payload(count: usize) -> Value {
    Value::Array((0..count).map(shipment_entry).collect())
}

/// Split (`enroute` / `delivered`) payload of `count` shipments.
pub fn split_payload(count: usize) -> Value {
    let (delivered, enroute): (Vec<_>, Vec<_>) = (0..count)
        .map(shipment_entry)
        .partition(|entry| entry["delivered"] == json!(true));
    json!({ "enroute": enroute, "delivered": delivered })
}

/// Keyed-values payload of `count` shipments plus some non-shipment noise.
pub fn keyed_payload(count: usize) -> Value {
    let mut object = serde_json::Map::new();
    for index in 0..count {
        object.insert(format!("parcel_{index}"), shipment_entry(index));
    }
    object.insert("friendly_name".into(), json!("PostNL"));
    object.insert("icon".into(), json!("mdi:package-variant"));
    Value::Object(object)
}
