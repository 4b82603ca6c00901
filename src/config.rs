//! Application-wide constants and compile-time configuration.
//!
//! All broker parameters, wire prefixes, timing values, and hardware
//! addresses live here so they can be tuned in one place.

// Broker

/// MQTT broker hostname (resolved via DNS at session start).
pub const BROKER_HOST: &str = "broker.hivemq.com";

/// MQTT broker port (plain TCP, no TLS).
pub const BROKER_PORT: u16 = 1883;

/// Topic shared by the device and the weather feed server.
pub const BROKER_TOPIC: &str = "test";

/// MQTT client identifier for this device.
pub const BROKER_CLIENT_ID: &str = "swipecast";

/// Interval between region reports published to the broker.
pub const PUBLISH_INTERVAL_SECS: u64 = 5;

// Wire format

/// Tag of an inbound weather payload: `"[DATA] <reserved>,<temp>,<hum>,<vis>"`.
pub const PREFIX_DATA: &str = "[DATA]";

/// Tag of the outbound region report: `"[CITY] <region-name>"`.
pub const PREFIX_CITY: &str = "[CITY]";

/// Tag of the server's catalog broadcast. Received but not acted upon.
pub const PREFIX_CITIES: &str = "[CITIES]";

/// Upper bound on a broker payload we are willing to look at.
pub const MESSAGE_MAX: usize = 256;

/// Upper bound on a single stored weather field.
pub const FIELD_MAX: usize = 255;

// Region catalog
//
// Fixed and ordered; the selected-region index is always a valid index
// into this slice. Names are published verbatim in region reports.

pub const REGIONS: &[&str] = &["Brno", "London", "Paris"];

// Menu

/// Main menu entries, fixed order. Indices double as menu cursor values.
pub const MENU_LABELS: [&str; 4] = ["Temperature", "Humidity", "Visibility", "Select area"];

// UI timing

/// Pause between a render pass and the next blocking gesture wait.
/// Keeps a burst of swipes from thrashing the panel.
pub const UI_REFRESH_PAUSE_MS: u64 = 500;

// Wi-Fi (station mode)

pub const WIFI_SSID: &str = "FLAT_420";
pub const WIFI_PASSWORD: &str = "jakub420";

// Hardware (ESP32-C6 defaults)
//
// OLED and gesture sensor share one I2C bus:
//
//   I2C SDA        → GPIO6
//   I2C SCL        → GPIO7
//   SSD1306 OLED   → 0x3C
//   APDS9960       → 0x39

/// I2C address of the SSD1306 OLED panel.
pub const OLED_ADDR: u8 = 0x3C;

/// I2C address of the APDS9960 gesture sensor.
pub const APDS9960_ADDR: u8 = 0x39;

/// Poll period while the gesture FIFO is empty.
pub const GESTURE_POLL_MS: u64 = 30;
