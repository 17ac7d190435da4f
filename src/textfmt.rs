//! Protobuf ASCII text format rendering for GTFS-RT messages.
//!
//! The ingestion endpoint accepts `text/plain` bodies parsed with protobuf
//! `TextFormat`, and serves the aggregated feed in the same encoding for
//! debugging. prost has no text format support, so this module prints the
//! fields this crate works with, in field-number order, in the standard
//! `name: value` / `name { ... }` syntax that any TextFormat parser merges.

use crate::gtfs_rt::{
    FeedEntity, FeedMessage, Position, TripDescriptor, VehicleDescriptor, VehiclePosition,
    feed_header, trip_descriptor, vehicle_position,
};

/// Renders a [`FeedEntity`] in protobuf text format.
pub fn entity_to_text(entity: &FeedEntity) -> String {
    let mut w = Writer::new();
    write_entity_fields(&mut w, entity);
    w.buf
}

/// Renders a [`FeedMessage`] in protobuf text format.
pub fn feed_to_text(feed: &FeedMessage) -> String {
    let mut w = Writer::new();

    w.open("header");
    w.string("gtfs_realtime_version", &feed.header.gtfs_realtime_version);
    if let Some(v) = feed.header.incrementality {
        w.enumeration(
            "incrementality",
            v,
            feed_header::Incrementality::try_from(v)
                .ok()
                .map(|e| e.as_str_name()),
        );
    }
    if let Some(ts) = feed.header.timestamp {
        w.scalar("timestamp", &ts.to_string());
    }
    w.close();

    for entity in &feed.entity {
        w.open("entity");
        write_entity_fields(&mut w, entity);
        w.close();
    }

    w.buf
}

fn write_entity_fields(w: &mut Writer, entity: &FeedEntity) {
    w.string("id", &entity.id);
    if let Some(deleted) = entity.is_deleted {
        w.scalar("is_deleted", if deleted { "true" } else { "false" });
    }
    if let Some(vehicle) = &entity.vehicle {
        w.open("vehicle");
        write_vehicle_fields(w, vehicle);
        w.close();
    }
}

fn write_vehicle_fields(w: &mut Writer, vehicle: &VehiclePosition) {
    if let Some(trip) = &vehicle.trip {
        w.open("trip");
        write_trip_fields(w, trip);
        w.close();
    }
    if let Some(position) = &vehicle.position {
        w.open("position");
        write_position_fields(w, position);
        w.close();
    }
    if let Some(seq) = vehicle.current_stop_sequence {
        w.scalar("current_stop_sequence", &seq.to_string());
    }
    if let Some(v) = vehicle.current_status {
        w.enumeration(
            "current_status",
            v,
            vehicle_position::VehicleStopStatus::try_from(v)
                .ok()
                .map(|e| e.as_str_name()),
        );
    }
    if let Some(ts) = vehicle.timestamp {
        w.scalar("timestamp", &ts.to_string());
    }
    if let Some(v) = vehicle.congestion_level {
        w.enumeration(
            "congestion_level",
            v,
            vehicle_position::CongestionLevel::try_from(v)
                .ok()
                .map(|e| e.as_str_name()),
        );
    }
    if let Some(stop_id) = &vehicle.stop_id {
        w.string("stop_id", stop_id);
    }
    if let Some(descriptor) = &vehicle.vehicle {
        w.open("vehicle");
        write_descriptor_fields(w, descriptor);
        w.close();
    }
    if let Some(v) = vehicle.occupancy_status {
        w.enumeration(
            "occupancy_status",
            v,
            vehicle_position::OccupancyStatus::try_from(v)
                .ok()
                .map(|e| e.as_str_name()),
        );
    }
    if let Some(pct) = vehicle.occupancy_percentage {
        w.scalar("occupancy_percentage", &pct.to_string());
    }
}

fn write_trip_fields(w: &mut Writer, trip: &TripDescriptor) {
    if let Some(trip_id) = &trip.trip_id {
        w.string("trip_id", trip_id);
    }
    if let Some(start_time) = &trip.start_time {
        w.string("start_time", start_time);
    }
    if let Some(start_date) = &trip.start_date {
        w.string("start_date", start_date);
    }
    if let Some(v) = trip.schedule_relationship {
        w.enumeration(
            "schedule_relationship",
            v,
            trip_descriptor::ScheduleRelationship::try_from(v)
                .ok()
                .map(|e| e.as_str_name()),
        );
    }
    if let Some(route_id) = &trip.route_id {
        w.string("route_id", route_id);
    }
    if let Some(direction_id) = trip.direction_id {
        w.scalar("direction_id", &direction_id.to_string());
    }
}

fn write_position_fields(w: &mut Writer, position: &Position) {
    w.scalar("latitude", &position.latitude.to_string());
    w.scalar("longitude", &position.longitude.to_string());
    if let Some(bearing) = position.bearing {
        w.scalar("bearing", &bearing.to_string());
    }
    if let Some(odometer) = position.odometer {
        w.scalar("odometer", &odometer.to_string());
    }
    if let Some(speed) = position.speed {
        w.scalar("speed", &speed.to_string());
    }
}

fn write_descriptor_fields(w: &mut Writer, descriptor: &VehicleDescriptor) {
    if let Some(id) = &descriptor.id {
        w.string("id", id);
    }
    if let Some(label) = &descriptor.label {
        w.string("label", label);
    }
    if let Some(plate) = &descriptor.license_plate {
        w.string("license_plate", plate);
    }
}

struct Writer {
    buf: String,
    indent: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.buf.push_str("  ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn scalar(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}: {value}"));
    }

    fn string(&mut self, name: &str, value: &str) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        self.line(&format!("{name}: \"{escaped}\""));
    }

    // Unknown enum values print numerically, as TextFormat does.
    fn enumeration(&mut self, name: &str, raw: i32, known: Option<&str>) {
        match known {
            Some(label) => self.scalar(name, label),
            None => self.scalar(name, &raw.to_string()),
        }
    }

    fn open(&mut self, name: &str) {
        self.line(&format!("{name} {{"));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent -= 1;
        self.line("}");
    }
}
