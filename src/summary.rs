use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gtfs_rt::FeedMessage;

/// Counts extracted from a fetched feed, for reporting what the server
/// aggregated from the test traffic.
#[derive(Debug, Default, Serialize)]
pub struct FeedSummary {
    pub timestamp: DateTime<Utc>,
    pub feed_timestamp: Option<u64>,
    pub total_entities: usize,

    pub vehicles: usize,
    pub trip_updates: usize,
    pub alerts: usize,

    pub with_position: usize,
    pub with_timestamp: usize,
    pub with_stop_id: usize,
    pub with_occupancy: usize,
}

impl FeedSummary {
    pub fn from_feed(feed: &FeedMessage) -> Self {
        let mut s = FeedSummary {
            timestamp: Utc::now(),
            feed_timestamp: feed.header.timestamp,
            total_entities: feed.entity.len(),
            ..Default::default()
        };

        for e in &feed.entity {
            if let Some(v) = &e.vehicle {
                s.vehicles += 1;

                if v.position.is_some() {
                    s.with_position += 1;
                }

                if v.timestamp.is_some() {
                    s.with_timestamp += 1;
                }

                if v.stop_id.is_some() {
                    s.with_stop_id += 1;
                }

                if v.occupancy_status.is_some() {
                    s.with_occupancy += 1;
                }
            }

            if e.trip_update.is_some() {
                s.trip_updates += 1;
            }

            if e.alert.is_some() {
                s.alerts += 1;
            }
        }

        s
    }

    /// One-line report for the console.
    pub fn headline(&self) -> String {
        format!("Feed contains {} entities", self.total_entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::simulated_vehicle;
    use crate::gtfs_rt::{FeedHeader, FeedMessage};

    fn feed_with(entities: Vec<crate::gtfs_rt::FeedEntity>) -> FeedMessage {
        FeedMessage {
            header: FeedHeader {
                gtfs_realtime_version: "2.0".to_string(),
                incrementality: None,
                timestamp: Some(1234567890),
            },
            entity: entities,
        }
    }

    #[test]
    fn test_from_feed_empty() {
        let summary = FeedSummary::from_feed(&feed_with(vec![]));

        assert_eq!(summary.total_entities, 0);
        assert_eq!(summary.vehicles, 0);
        assert_eq!(summary.feed_timestamp, Some(1234567890));
    }

    #[test]
    fn test_from_feed_counts_vehicles() {
        let feed = feed_with(vec![
            simulated_vehicle("vehicle_001", 50.0, 19.9),
            simulated_vehicle("vehicle_002", 50.1, 19.8),
        ]);
        let summary = FeedSummary::from_feed(&feed);

        assert_eq!(summary.total_entities, 2);
        assert_eq!(summary.vehicles, 2);
        assert_eq!(summary.with_position, 2);
        assert_eq!(summary.with_timestamp, 2);
        assert_eq!(summary.with_stop_id, 2);
        assert_eq!(summary.with_occupancy, 2);
        assert_eq!(summary.trip_updates, 0);
    }

    #[test]
    fn test_headline() {
        let feed = feed_with(vec![
            simulated_vehicle("vehicle_001", 50.0, 19.9),
            simulated_vehicle("vehicle_002", 50.1, 19.8),
            simulated_vehicle("vehicle_003", 50.2, 19.7),
        ]);
        let summary = FeedSummary::from_feed(&feed);

        assert_eq!(summary.headline(), "Feed contains 3 entities");
    }
}
