//! Console reporting for fetched feed summaries.

use anyhow::Result;
use tracing::{debug, info};

use crate::summary::FeedSummary;

/// Logs a feed summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &FeedSummary) {
    debug!("{:#?}", summary);
}

/// Logs a feed summary as pretty-printed JSON.
pub fn print_json(summary: &FeedSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Logs the headline plus the per-type entity counts.
pub fn report(summary: &FeedSummary) {
    info!(
        vehicles = summary.vehicles,
        trip_updates = summary.trip_updates,
        alerts = summary.alerts,
        "{}",
        summary.headline()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::FeedSummary;

    #[test]
    fn test_print_pretty_does_not_panic() {
        let summary = FeedSummary::default();
        print_pretty(&summary);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let summary = FeedSummary::default();
        print_json(&summary).unwrap();
    }

    #[test]
    fn test_report_does_not_panic() {
        let summary = FeedSummary::default();
        report(&summary);
    }
}
