use chrono::{DateTime, FixedOffset};
use parcelview::{
    Animation, CardConfig, CardSnapshot, CardView, HostStates, Tab, ViewState, build_card_view,
};
use serde_json::json;

const PRIMARY: &str = "sensor.postnl_delivery";
const DISTRIBUTION: &str = "sensor.postnl_distribution";

fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-06-01T00:00:00+02:00").expect("fixture timestamp")
}

fn config() -> CardConfig {
    CardConfig {
        entity: PRIMARY.into(),
        distribution_entity: DISTRIBUTION.into(),
        ..CardConfig::default()
    }
}

fn states() -> HostStates {
    let mut states = HostStates::new();
    states.insert(
        PRIMARY,
        json!({
            "enroute": [
                {"key": "3S-OLD", "name": "Boek", "planned_date": "2024-05-20T09:00:00Z"},
                {"key": "3S-NEW", "name": "Lamp", "planned_date": "2024-05-31T09:00:00Z",
                 "shipment_type": "LetterboxParcel"}
            ],
            "delivered": [
                {"key": "3S-RECENT", "name": "Jas", "delivered": true,
                 "delivery_date": "2024-05-29T14:05:00Z", "delivery_address_type": "ServicePoint"},
                {"key": "3S-ANCIENT", "name": "Tent", "delivered": true,
                 "delivery_date": "2024-01-01T10:00:00Z"}
            ]
        }),
    );
    states.insert(
        DISTRIBUTION,
        json!({
            "Enroute": [{"key": "SENT-1", "planned_date": "2024-01-02"}],
            "Delivered": [{"key": "SENT-2", "delivered": true, "delivery_date": "2023-12-01"}]
        }),
    );
    states
}

fn ready(view: CardView) -> CardSnapshot {
    match view {
        CardView::Ready(snapshot) => snapshot,
        other => panic!("expected a ready card, got {other:?}"),
    }
}

#[test]
fn in_transit_tab_lists_newest_first() {
    let card = ready(build_card_view(&states(), &config(), &ViewState::default(), now()));

    assert_eq!(card.active_tab, Tab::InTransit);
    assert_eq!(card.list_identity(), ["3S-NEW", "3S-OLD"]);
    assert_eq!(card.header.stats, "2 onderweg • 1 recent");
    assert_eq!(card.parcels[0].type_label, Some("Brievenbuspakje"));
    assert_eq!(card.parcels[0].status, "Onderweg");
    assert!(card.empty_hint.is_none());
}

#[test]
fn delivered_tab_hides_parcels_outside_window() {
    let view = ViewState::new(Tab::Delivered);
    let card = ready(build_card_view(&states(), &config(), &view, now()));

    assert_eq!(card.list_identity(), ["3S-RECENT"]);
    let parcel = &card.parcels[0];
    assert_eq!(parcel.status, "Bezorgd");
    assert_eq!(parcel.delivery_label, Some("Afhaalpunt"));
    assert_eq!(parcel.date_label.as_deref(), Some("29 mei 16:05"));
}

#[test]
fn sent_tab_shows_whole_distribution_feed() {
    let view = ViewState::new(Tab::Sent);
    let card = ready(build_card_view(&states(), &config(), &view, now()));
    assert_eq!(card.list_identity(), ["SENT-1", "SENT-2"]);

    let strict = CardConfig {
        cutoff_sent: true,
        ..config()
    };
    let card = ready(build_card_view(&states(), &strict, &view, now()));
    assert_eq!(card.list_identity(), ["SENT-1"]);
}

#[test]
fn missing_distribution_entity_is_an_empty_sent_tab() {
    let mut states = states();
    states.remove(DISTRIBUTION);

    let card = ready(build_card_view(&states, &config(), &ViewState::new(Tab::Sent), now()));
    assert!(card.parcels.is_empty());
    assert_eq!(card.empty_hint, Some("Geen pakketten in deze categorie"));
}

#[test]
fn missing_primary_entity_reports_not_found() {
    let mut states = states();
    states.remove(PRIMARY);

    let view = build_card_view(&states, &config(), &ViewState::default(), now());
    assert_eq!(
        view,
        CardView::EntityNotFound {
            entity: PRIMARY.into(),
            message: format!("Entiteit niet gevonden: {PRIMARY}"),
        }
    );
}

#[test]
fn padded_entity_id_is_found() {
    let config = CardConfig {
        entity: format!("  {PRIMARY} "),
        ..config()
    };

    let card = ready(build_card_view(&states(), &config, &ViewState::default(), now()));
    assert_eq!(card.list_identity(), ["3S-NEW", "3S-OLD"]);
}

#[test]
fn naive_carrier_times_stay_wall_clock() {
    let mut states = HostStates::new();
    states.insert(
        PRIMARY,
        json!([
            {"key": "LOCAL", "planned_date": "2024-05-30T10:15:00"},
            {"key": "ZULU", "planned_date": "2024-05-30T09:00:00Z"}
        ]),
    );

    let card = ready(build_card_view(&states, &config(), &ViewState::default(), now()));
    // 10:15 at +02:00 is 08:15Z, older than 09:00Z.
    assert_eq!(card.list_identity(), ["ZULU", "LOCAL"]);
    assert_eq!(card.parcels[1].date_label.as_deref(), Some("30 mei 10:15"));
}

#[test]
fn empty_entity_is_zero_shipments_not_missing() {
    let mut states = HostStates::new();
    states.insert(PRIMARY, json!({}));

    let card = ready(build_card_view(&states, &config(), &ViewState::default(), now()));
    assert!(card.parcels.is_empty());
    assert_eq!(card.header.stats, "0 onderweg • 0 recent");
}

#[test]
fn hidden_tab_falls_back_to_in_transit() {
    let config = CardConfig {
        show_sent: false,
        ..config()
    };
    let view = ViewState::new(Tab::Sent).toggle_parcel("SENT-1");
    let card = ready(build_card_view(&states(), &config, &view, now()));

    assert_eq!(card.active_tab, Tab::InTransit);
    assert_eq!(card.view.selected(), None);
    assert_eq!(card.tabs.len(), 2);
    assert!(card.tabs.iter().all(|info| info.tab != Tab::Sent));
}

#[test]
fn selected_parcel_drives_animation() {
    let view = ViewState::default().toggle_parcel("3S-OLD");
    let card = ready(build_card_view(&states(), &config(), &view, now()));

    assert!(card.parcels.iter().any(|p| p.key == "3S-OLD" && p.selected));
    match card.animation {
        Animation::Van {
            key,
            name,
            position_percent,
            ..
        } => {
            assert_eq!(key, "3S-OLD");
            assert_eq!(name, "Boek");
            assert_eq!(position_percent, 25);
        }
        other => panic!("expected van, got {other:?}"),
    }

    let view = view.select_tab(Tab::Delivered);
    let card = ready(build_card_view(&states(), &config(), &view, now()));
    assert!(matches!(card.animation, Animation::Placeholder { .. }));
}

#[test]
fn scenario_old_delivery_is_filtered() {
    let mut states = HostStates::new();
    states.insert(
        PRIMARY,
        json!([
            {"key": "A", "delivered": false},
            {"key": "B", "delivered": true, "delivery_date": "2024-01-01"}
        ]),
    );
    let config = CardConfig {
        entity: PRIMARY.into(),
        ..CardConfig::default()
    };

    let in_transit = ready(build_card_view(&states, &config, &ViewState::default(), now()));
    assert_eq!(in_transit.list_identity(), ["A"]);

    let view = ViewState::new(Tab::Delivered);
    let delivered = ready(build_card_view(&states, &config, &view, now()));
    assert!(delivered.parcels.is_empty());
}

#[test]
fn rebuilding_from_same_snapshot_is_identical() {
    let states = states();
    let config = config();
    let view = ViewState::new(Tab::Delivered).toggle_parcel("3S-RECENT");

    let first = build_card_view(&states, &config, &view, now());
    let second = build_card_view(&states, &config, &view, now());
    assert_eq!(first, second);
}

#[test]
fn snapshot_serializes_for_renderers() {
    let card = build_card_view(&states(), &config(), &ViewState::default(), now());
    let encoded = serde_json::to_value(&card).expect("card encodes");

    assert_eq!(encoded["status"], "ready");
    assert_eq!(encoded["active_tab"], "in-transit");
    assert_eq!(encoded["layout"], json!(["header", "tabs", "animation", "list"]));
    assert_eq!(encoded["animation"]["kind"], "placeholder");
    assert!(encoded.get("empty_hint").is_none());
}
