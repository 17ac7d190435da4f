//! Topic and URL builders for the ingestion server's MQTT and REST surfaces.
//!
//! The MQTT topic follows the Digitransit shape:
//! `/<feed_format>/<type>/<feed_id>/<agency_id>/<agency_name>/<mode>/
//! <route_id>/<direction_id>/<trip_headsign>/<trip_id>/<next_stop>/
//! <start_time>/<vehicle_id>/<geohash...>/<short_name>/<color>/`
//!
//! Identifiers are formatted verbatim; callers must supply topic-safe values.

/// Number of positional fields after the `/gtfsrt/vp/` prefix.
pub const TOPIC_FIELDS: usize = 17;

/// Split index at which the consumer side reads the vehicle id
/// (`topic.split('/')` with the leading empty segment included).
pub const VEHICLE_ID_INDEX: usize = 13;

/// Formats the Digitransit publish topic for one vehicle.
///
/// Trip, stop, headsign, geohash, short name and color fields are fixed
/// placeholders matching the entities produced by [`crate::entity`].
pub fn digitransit_topic(feed_id: &str, agency_id: &str, vehicle_id: &str) -> String {
    format!(
        "/gtfsrt/vp/{feed_id}/{agency_id}/ZTP/BUS/\
         route_123/1/Downtown/trip_{vehicle_id}/stop_001/\
         14:30:00/{vehicle_id}/u/g/j/k/123/FF0000/"
    )
}

/// REST path for posting one vehicle position entity.
pub fn vp_post_url(base_url: &str, feed_id: &str, agency_id: &str) -> String {
    format!("{base_url}/vp/f/{feed_id}/a/{agency_id}")
}

/// REST path for fetching the aggregated vehicle position feed.
pub fn feed_url(base_url: &str) -> String {
    format!("{base_url}/gtfs-rt/feed.pb")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_has_17_positional_fields() {
        let topic = digitransit_topic("ztp-feed", "ztp-agency", "vehicle_001");

        let fields: Vec<&str> = topic
            .strip_prefix("/gtfsrt/vp/")
            .unwrap()
            .trim_end_matches('/')
            .split('/')
            .collect();
        assert_eq!(fields.len(), TOPIC_FIELDS);
    }

    #[test]
    fn test_vehicle_id_at_consumer_index() {
        let topic = digitransit_topic("ztp-feed", "ztp-agency", "vehicle_042");

        let parts: Vec<&str> = topic.split('/').collect();
        assert_eq!(parts[VEHICLE_ID_INDEX], "vehicle_042");
        assert_eq!(parts[3], "ztp-feed");
        assert_eq!(parts[4], "ztp-agency");
    }

    #[test]
    fn test_topic_shape_is_stable_for_any_ids() {
        for (feed, agency, vehicle) in [
            ("f", "a", "v"),
            ("my-feed", "my-agency", "bus-12"),
            ("x.y", "z.w", "tram_3"),
        ] {
            let topic = digitransit_topic(feed, agency, vehicle);
            assert!(topic.starts_with("/gtfsrt/vp/"));
            assert!(topic.ends_with('/'));
            assert_eq!(
                topic
                    .strip_prefix("/gtfsrt/vp/")
                    .unwrap()
                    .trim_end_matches('/')
                    .split('/')
                    .count(),
                TOPIC_FIELDS
            );
        }
    }

    #[test]
    fn test_vp_post_url() {
        assert_eq!(
            vp_post_url("http://localhost:8087", "ztp-feed", "ztp-agency"),
            "http://localhost:8087/vp/f/ztp-feed/a/ztp-agency"
        );
    }

    #[test]
    fn test_feed_url() {
        assert_eq!(
            feed_url("http://localhost:8087"),
            "http://localhost:8087/gtfs-rt/feed.pb"
        );
    }
}
