//! Builders for synthetic GTFS-RT vehicle position entities.
//!
//! Everything here produces throwaway test data: placeholder trip, route and
//! stop identifiers around a caller-supplied vehicle id and coordinates.
//! Coordinates are taken as-is with no bounds checking so that out-of-range
//! values can be used to exercise the receiving server.

use chrono::Utc;

use crate::gtfs_rt::{FeedEntity, Position, TripDescriptor, VehiclePosition, vehicle_position};

/// Builds a fully populated [`FeedEntity`] for a simulated vehicle.
///
/// The trip id is derived from the vehicle id (`trip_{vehicle_id}`), the
/// remaining trip/route/stop fields are fixed placeholders, and the
/// timestamp is the current wall clock.
pub fn simulated_vehicle(vehicle_id: &str, lat: f32, lon: f32) -> FeedEntity {
    build(
        vehicle_id,
        &format!("trip_{vehicle_id}"),
        "route_123",
        "stop_001",
        lat,
        lon,
    )
}

/// The fixed entity the HTTP test client sends to the ingestion endpoint.
pub fn rest_sample() -> FeedEntity {
    build(
        "test_vehicle_001",
        "trip_12345",
        "route_67",
        "stop_central_001",
        52.2297,
        21.0122,
    )
}

fn build(
    vehicle_id: &str,
    trip_id: &str,
    route_id: &str,
    stop_id: &str,
    lat: f32,
    lon: f32,
) -> FeedEntity {
    FeedEntity {
        id: vehicle_id.to_string(),
        vehicle: Some(VehiclePosition {
            trip: Some(TripDescriptor {
                trip_id: Some(trip_id.to_string()),
                route_id: Some(route_id.to_string()),
                direction_id: Some(1),
                start_date: Some("20260109".to_string()),
                start_time: Some("14:30:00".to_string()),
                ..Default::default()
            }),
            position: Some(Position {
                latitude: lat,
                longitude: lon,
                bearing: Some(180.0),
                speed: Some(25.5),
                odometer: None,
            }),
            timestamp: Some(Utc::now().timestamp() as u64),
            stop_id: Some(stop_id.to_string()),
            current_status: Some(vehicle_position::VehicleStopStatus::StoppedAt as i32),
            occupancy_status: Some(vehicle_position::OccupancyStatus::FewSeatsAvailable as i32),
            ..Default::default()
        }),
        ..Default::default()
    }
}
