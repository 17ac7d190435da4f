//! MQTT publisher of synthetic vehicle positions.
//!
//! Publishes one binary-serialized [`FeedEntity`](crate::gtfs_rt::FeedEntity)
//! per vehicle per round on the Digitransit topic hierarchy, at QoS 1.
//! Positions drift slightly each round to simulate movement. There is no
//! reconnect logic: a lost connection stops delivery until the process is
//! restarted.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use prost::Message;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tracing::{debug, error, info};

use crate::entity::simulated_vehicle;
use crate::topic::digitransit_topic;

/// Publish seam over the MQTT client so the drive loop can be tested
/// without a broker.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn publish(&self, topic: String, payload: Bytes) -> Result<()>;
}

/// At-least-once sink over a connected rumqttc client.
pub struct MqttSink(AsyncClient);

impl MqttSink {
    pub fn new(client: AsyncClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl MessageSink for MqttSink {
    async fn publish(&self, topic: String, payload: Bytes) -> Result<()> {
        self.0
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await?;
        Ok(())
    }
}

/// Vehicle start positions around Krakow. The vehicle count is capped at
/// this list.
const START_POSITIONS: [(f32, f32); 3] = [
    (50.0647, 19.9450),
    (50.0537, 19.9353),
    (50.0748, 19.9554),
];

#[derive(Clone, Debug)]
pub struct PublishConfig {
    pub feed_id: String,
    pub agency_id: String,
    pub interval: Duration,
    /// Publish rounds to run; 0 means run until interrupted.
    pub count: usize,
    pub vehicles: usize,
}

/// Opens a connection to the broker. The returned [`EventLoop`] must be
/// polled (see [`spawn_event_logger`]) for any traffic to flow.
pub fn connect(broker: &str, port: u16) -> (AsyncClient, EventLoop) {
    let mut options = MqttOptions::new("gtfs-rt-probe", broker, port);
    options.set_keep_alive(Duration::from_secs(60));
    AsyncClient::new(options, 10)
}

/// Drives the MQTT event loop in the background, logging connection and
/// acknowledgement events. A poll error ends the task without reconnecting,
/// so a dropped broker connection stops delivery until process restart.
pub fn spawn_event_logger(mut eventloop: EventLoop) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    info!(code = ?ack.code, "Connected to MQTT broker");
                }
                Ok(Event::Incoming(Packet::PubAck(ack))) => {
                    debug!(pkid = ack.pkid, "Broker acknowledged publish");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "MQTT connection error, stopping event loop");
                    break;
                }
            }
        }
    })
}

/// Runs the publish loop: each round sends one entity per vehicle with a
/// drifted position, then sleeps `interval` before the next round. Returns
/// the number of messages handed to the sink.
pub async fn run_publish_loop<S: MessageSink>(sink: &S, config: &PublishConfig) -> Result<usize> {
    let vehicles = config.vehicles.min(START_POSITIONS.len());
    let mut published = 0usize;
    let mut round = 0usize;

    while config.count == 0 || round < config.count {
        for (i, (start_lat, start_lon)) in START_POSITIONS.iter().take(vehicles).enumerate() {
            let vehicle_id = format!("vehicle_{:03}", i + 1);

            // Drift each position a little per round to simulate movement.
            let drift = round as f32 * 0.0001;
            let lat = start_lat + drift;
            let lon = start_lon + drift;

            let entity = simulated_vehicle(&vehicle_id, lat, lon);
            let topic = digitransit_topic(&config.feed_id, &config.agency_id, &vehicle_id);
            let payload = Bytes::from(entity.encode_to_vec());

            sink.publish(topic.clone(), payload).await?;
            published += 1;

            info!(
                vehicle_id = %vehicle_id,
                lat,
                lon,
                topic = %topic,
                "Published vehicle position"
            );
        }

        round += 1;

        if config.count == 0 || round < config.count {
            debug!(
                interval_secs = config.interval.as_secs(),
                "Waiting before next round"
            );
            tokio::time::sleep(config.interval).await;
        }
    }

    Ok(published)
}
