//! Broker session - periodic region reports out, weather payloads in.
//!
//! One long-lived MQTT session over a single TCP socket. Outbound, the
//! committed region name goes out every few seconds; inbound payloads
//! on the same topic are classified and applied to the shared state.
//! Individual publish/receive failures are logged and survived; a
//! session that cannot be established, or one that keeps failing, is
//! fatal and ends in a device reset with everything else.

use core::convert::Infallible;
use core::str::from_utf8;

use defmt::{info, warn, Debug2Format};
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{with_timeout, Duration, Instant};
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;

use crate::config::{
    BROKER_CLIENT_ID, BROKER_HOST, BROKER_PORT, BROKER_TOPIC, PUBLISH_INTERVAL_SECS,
};
use crate::error::Error;
use crate::net::{classify, ingest, region_report, Inbound};
use crate::state::WeatherState;

/// Consecutive receive failures tolerated before the session is
/// declared dead.
const MAX_RECEIVE_FAILURES: u8 = 5;

/// Run the broker session forever. Returns only with a fatal error.
pub async fn broker_session(
    stack: Stack<'static>,
    state: &'static WeatherState<CriticalSectionRawMutex>,
) -> Result<Infallible, Error> {
    stack.wait_config_up().await;
    info!("Network up, resolving {}", BROKER_HOST);

    let addrs = stack
        .dns_query(BROKER_HOST, DnsQueryType::A)
        .await
        .map_err(|_| Error::Network)?;
    let addr = *addrs.first().ok_or(Error::Network)?;

    let mut rx_buffer = [0u8; 1024];
    let mut tx_buffer = [0u8; 1024];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket
        .connect((addr, BROKER_PORT))
        .await
        .map_err(|_| Error::Broker)?;

    let mut config: ClientConfig<'_, 5, CountingRng> =
        ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
    config.add_client_id(BROKER_CLIENT_ID);
    config.add_max_subscribe_qos(QualityOfService::QoS1);
    config.max_packet_size = 512;

    let mut write_buffer = [0u8; 512];
    let mut recv_buffer = [0u8; 512];
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut write_buffer,
        512,
        &mut recv_buffer,
        512,
        config,
    );

    client.connect_to_broker().await.map_err(|_| Error::Broker)?;
    info!("Connected to {}:{}", BROKER_HOST, BROKER_PORT);

    if let Err(reason) = client.subscribe_to_topic(BROKER_TOPIC).await {
        // The device still publishes; only inbound updates are lost.
        warn!("Subscribe failed: {}", Debug2Format(&reason));
    }

    let mut receive_failures: u8 = 0;
    let mut next_report = Instant::now();

    loop {
        if Instant::now() >= next_report {
            let message = region_report(state.region_name());
            match client
                .send_message(BROKER_TOPIC, message.as_bytes(), QualityOfService::QoS1, false)
                .await
            {
                Ok(()) => info!("Published {}", message.as_str()),
                Err(reason) => warn!("Publish failed: {}", Debug2Format(&reason)),
            }
            next_report = Instant::now() + Duration::from_secs(PUBLISH_INTERVAL_SECS);
        }

        let now = Instant::now();
        let wait = if next_report > now {
            next_report - now
        } else {
            Duration::from_ticks(0)
        };

        match with_timeout(wait, client.receive_message()).await {
            Ok(Ok((_topic, payload))) => {
                receive_failures = 0;
                match from_utf8(payload) {
                    Ok(text) => match classify(text) {
                        Inbound::Data => {
                            if ingest(text, state) {
                                info!("Weather update applied");
                            }
                        }
                        Inbound::Catalog => info!("Catalog broadcast ignored"),
                        Inbound::Other => {}
                    },
                    Err(_) => warn!("Dropped non-UTF-8 payload"),
                }
            }
            Ok(Err(reason)) => {
                warn!("Receive failed: {}", Debug2Format(&reason));
                receive_failures += 1;
                if receive_failures >= MAX_RECEIVE_FAILURES {
                    return Err(Error::Broker);
                }
            }
            // Timeout just means it is time for the next report.
            Err(_) => {}
        }
    }
}
