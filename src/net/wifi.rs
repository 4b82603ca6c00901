//! Wi-Fi station bring-up and reconnect handling.

use defmt::{info, warn, Debug2Format};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};

use crate::config::{WIFI_PASSWORD, WIFI_SSID};
use crate::error::Error;

/// Pause between link checks / reconnect attempts.
const RECONNECT_PAUSE_MS: u64 = 5000;

/// Configure station mode and start the radio. Failing to start the
/// radio is fatal; association happens later in [`connection_task`].
pub fn configure(controller: &mut WifiController<'static>) -> Result<(), Error> {
    let client_config = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    );
    controller
        .set_config(&client_config)
        .map_err(|_| Error::Network)?;
    controller.start().map_err(|_| Error::Network)?;
    info!("Wi-Fi started");
    Ok(())
}

/// Keep the station associated: connect whenever the link is down.
/// Never returns; the UI stays usable while the network is away.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>, stack: Stack<'static>) {
    info!("Wi-Fi task started");
    loop {
        if !stack.is_link_up() {
            info!("Wi-Fi connecting to {}...", WIFI_SSID);
            if let Err(e) = controller.connect() {
                warn!("Wi-Fi connect failed: {}", Debug2Format(&e));
            }
        }
        Timer::after(Duration::from_millis(RECONNECT_PAUSE_MS)).await;
    }
}

/// Drive the IP stack. Never returns.
#[embassy_executor::task]
pub async fn stack_task(mut runner: embassy_net::Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}
