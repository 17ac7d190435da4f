//! CLI entry point for the GTFS-RT probe tool.
//!
//! Provides subcommands for publishing synthetic vehicle positions to an
//! MQTT broker, posting a single FeedEntity to the ingestion endpoint,
//! fetching the aggregated feed back, and writing a sample entity to disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gtfs_rt_probe::entity;
use gtfs_rt_probe::http::{self, BasicClient, Encoding, FetchedFeed};
use gtfs_rt_probe::output;
use gtfs_rt_probe::publisher::{self, MqttSink, PublishConfig};
use gtfs_rt_probe::summary::FeedSummary;
use gtfs_rt_probe::topic;
use prost::Message;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_rt_probe")]
#[command(about = "Test clients for a GTFS-RT vehicle position ingestion server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish synthetic vehicle positions to an MQTT broker at an interval
    Publish {
        /// MQTT broker host
        #[arg(long, default_value = "localhost")]
        broker: String,

        /// MQTT broker port
        #[arg(long, default_value_t = 1883)]
        port: u16,

        /// Feed ID used in the topic
        #[arg(long, default_value = "ztp-feed")]
        feed_id: String,

        /// Agency ID used in the topic
        #[arg(long, default_value = "ztp-agency")]
        agency_id: String,

        /// Publish interval in seconds
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// Number of publish rounds (0 = infinite)
        #[arg(long, default_value_t = 0)]
        count: usize,

        /// Number of test vehicles per round
        #[arg(long, default_value_t = 3)]
        vehicles: usize,
    },
    /// POST one FeedEntity to the vehicle position ingestion endpoint
    Send {
        /// Base URL of the ingestion server
        #[arg(long, default_value = "http://localhost:8087")]
        base_url: String,

        /// Feed ID in the REST path
        #[arg(long, default_value = "ztp-feed")]
        feed_id: String,

        /// Agency ID in the REST path
        #[arg(long, default_value = "ztp-agency")]
        agency_id: String,

        /// Send protobuf text format instead of binary
        #[arg(short, long, default_value_t = false)]
        text: bool,
    },
    /// GET the aggregated feed and report its contents
    Fetch {
        /// Base URL of the ingestion server
        #[arg(long, default_value = "http://localhost:8087")]
        base_url: String,

        /// Request protobuf text format instead of binary
        #[arg(short, long, default_value_t = false)]
        text: bool,

        /// Print the feed summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a serialized sample FeedEntity to a file for curl testing
    GenFile {
        /// Output file path
        #[arg(short, long, default_value = "test_vehicle.pb")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gtfs_rt_probe.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_rt_probe.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            broker,
            port,
            feed_id,
            agency_id,
            interval,
            count,
            vehicles,
        } => {
            publish(broker, port, feed_id, agency_id, interval, count, vehicles).await?;
        }
        Commands::Send {
            base_url,
            feed_id,
            agency_id,
            text,
        } => {
            send(&base_url, &feed_id, &agency_id, encoding_for(text)).await;
        }
        Commands::Fetch {
            base_url,
            text,
            json,
        } => {
            fetch(&base_url, encoding_for(text), json).await?;
        }
        Commands::GenFile { output } => {
            gen_file(&output)?;
        }
    }

    Ok(())
}

fn encoding_for(text: bool) -> Encoding {
    if text { Encoding::Text } else { Encoding::Binary }
}

/// Connects to the broker and runs the publish loop until the configured
/// round count is reached or Ctrl+C is pressed, then disconnects.
#[tracing::instrument(skip_all, fields(broker = %broker, port, count, vehicles))]
async fn publish(
    broker: String,
    port: u16,
    feed_id: String,
    agency_id: String,
    interval: u64,
    count: usize,
    vehicles: usize,
) -> Result<()> {
    info!(broker = %broker, port, "Connecting to MQTT broker");
    let (client, eventloop) = publisher::connect(&broker, port);
    let event_task = publisher::spawn_event_logger(eventloop);

    // Let the connection come up before the first publish.
    tokio::time::sleep(Duration::from_secs(1)).await;

    let sink = MqttSink::new(client.clone());
    let config = PublishConfig {
        feed_id,
        agency_id,
        interval: Duration::from_secs(interval),
        count,
        vehicles,
    };

    tokio::select! {
        result = publisher::run_publish_loop(&sink, &config) => {
            let published = result?;
            info!(published, "Publish loop finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, disconnecting");
        }
    }

    if let Err(e) = client.disconnect().await {
        error!(error = %e, "MQTT disconnect failed");
    }
    event_task.abort();
    Ok(())
}

/// Builds the sample entity and POSTs it, reporting the outcome.
#[tracing::instrument(skip_all, fields(base_url = %base_url, encoding = ?encoding))]
async fn send(base_url: &str, feed_id: &str, agency_id: &str, encoding: Encoding) {
    let entity = entity::rest_sample();
    let url = topic::vp_post_url(base_url, feed_id, agency_id);
    info!(
        url = %url,
        entity_id = %entity.id,
        "Sending FeedEntity to ingestion endpoint"
    );

    let client = BasicClient::new();
    match http::post_entity(&client, base_url, feed_id, agency_id, &entity, encoding).await {
        Ok(outcome) if outcome.is_success() => {
            info!(status = outcome.status, "SUCCESS: vehicle position sent");
        }
        Ok(outcome) => {
            error!(
                status = outcome.status,
                body = %outcome.body,
                "ERROR: vehicle position rejected"
            );
        }
        Err(e) => {
            error!(error = %e, "REQUEST FAILED");
        }
    }
}

/// Fetches the aggregated feed and reports its contents.
#[tracing::instrument(skip_all, fields(base_url = %base_url, encoding = ?encoding))]
async fn fetch(base_url: &str, encoding: Encoding, json: bool) -> Result<()> {
    let client = BasicClient::new();

    match http::fetch_feed(&client, base_url, encoding).await? {
        FetchedFeed::Binary(feed) => {
            let summary = FeedSummary::from_feed(&feed);
            output::report(&summary);
            if json {
                output::print_json(&summary)?;
            } else {
                output::print_pretty(&summary);
            }
        }
        FetchedFeed::Text(text) => {
            println!("{text}");
        }
    }

    Ok(())
}

/// Writes a serialized sample entity for replaying with curl.
fn gen_file(output: &str) -> Result<()> {
    let entity = entity::rest_sample();
    std::fs::write(output, entity.encode_to_vec())?;

    info!(file = output, "Wrote sample FeedEntity");
    info!(
        "Test the endpoint with: curl -X POST http://localhost:8087/vp/f/ztp-feed/a/ztp-agency \
         -H \"Content-Type: application/x-protobuf\" --data-binary @{output}"
    );
    Ok(())
}
