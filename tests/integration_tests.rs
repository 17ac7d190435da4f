use gtfs_rt_probe::entity::{rest_sample, simulated_vehicle};
use gtfs_rt_probe::gtfs_rt::{FeedHeader, FeedMessage};
use gtfs_rt_probe::parser::{parse_entity, parse_feed};
use gtfs_rt_probe::summary::FeedSummary;
use gtfs_rt_probe::textfmt;
use gtfs_rt_probe::topic::{VEHICLE_ID_INDEX, digitransit_topic};
use prost::Message;

#[test]
fn test_full_pipeline() {
    // Entities as the publisher emits them, aggregated into a feed the way
    // the server republishes them, then decoded and summarized.
    let entities: Vec<_> = (1..=3)
        .map(|i| {
            simulated_vehicle(
                &format!("vehicle_{i:03}"),
                50.0647 + i as f32 * 0.0001,
                19.9450,
            )
        })
        .collect();

    let feed = FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            incrementality: None,
            timestamp: Some(1767000000),
        },
        entity: entities,
    };
    let bytes = feed.encode_to_vec();

    let parsed = parse_feed(&bytes).expect("Failed to parse feed");
    let summary = FeedSummary::from_feed(&parsed);

    assert_eq!(summary.headline(), "Feed contains 3 entities");
    assert_eq!(summary.vehicles, 3);
    assert_eq!(summary.with_position, 3);
}

#[test]
fn test_entity_round_trip_is_lossless() {
    let entity = rest_sample();
    let decoded = parse_entity(&entity.encode_to_vec()).expect("Failed to parse entity");
    assert_eq!(decoded, entity);
}

#[test]
fn test_topic_and_payload_agree_on_vehicle_id() {
    let entity = simulated_vehicle("vehicle_002", 50.0537, 19.9353);
    let topic = digitransit_topic("ztp-feed", "ztp-agency", "vehicle_002");

    let parts: Vec<&str> = topic.split('/').collect();
    assert_eq!(parts[VEHICLE_ID_INDEX], entity.id);
}

#[test]
fn test_text_format_covers_all_populated_fields() {
    let entity = simulated_vehicle("vehicle_001", 50.0647, 19.9450);
    let text = textfmt::entity_to_text(&entity);

    for needle in [
        "id: \"vehicle_001\"",
        "trip_id: \"trip_vehicle_001\"",
        "route_id: \"route_123\"",
        "direction_id: 1",
        "start_date: \"20260109\"",
        "start_time: \"14:30:00\"",
        "latitude: 50.0647",
        "speed: 25.5",
        "stop_id: \"stop_001\"",
        "current_status: STOPPED_AT",
        "occupancy_status: FEW_SEATS_AVAILABLE",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
}
