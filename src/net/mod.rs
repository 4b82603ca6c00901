//! Broker wire format - inbound weather payloads, outbound region
//! reports.
//!
//! Payloads are classified by their leading tag token. A `[DATA]`
//! payload carries comma-separated fields after the tag; the first
//! field is reserved, the next three are temperature, humidity and
//! visibility, stored as opaque text (no numeric validation). Anything
//! with another tag leaves the weather state untouched.
//!
//! Parsing is allocation-free and never looks past the payload.

use core::fmt::Write as _;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::{MESSAGE_MAX, PREFIX_CITIES, PREFIX_CITY, PREFIX_DATA};
use crate::state::WeatherState;

#[cfg(feature = "embedded")]
pub mod mqtt;
#[cfg(feature = "embedded")]
pub mod wifi;

/// Payload classes seen on the shared topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inbound {
    /// Weather fields for the selected region.
    Data,
    /// The server's region-catalog broadcast. Received, never acted on.
    Catalog,
    /// Anything else, including our own region reports echoed back.
    Other,
}

/// Classify a payload by its leading tag token.
pub fn classify(message: &str) -> Inbound {
    match message.split(' ').next().unwrap_or("") {
        t if t == PREFIX_DATA => Inbound::Data,
        t if t == PREFIX_CITIES => Inbound::Catalog,
        _ => Inbound::Other,
    }
}

/// Fields of a `[DATA]` payload, borrowed from the message.
///
/// A short message yields `None` for the missing tail so the caller can
/// apply a partial update without clearing anything.
#[derive(Debug, PartialEq, Eq)]
pub struct WeatherUpdate<'a> {
    pub temperature: Option<&'a str>,
    pub humidity: Option<&'a str>,
    pub visibility: Option<&'a str>,
}

/// Parse an inbound payload into its weather fields.
///
/// Returns `None` for oversized payloads and for anything that is not
/// a data message; such payloads are discarded whole, never partially
/// parsed.
pub fn parse_update(message: &str) -> Option<WeatherUpdate<'_>> {
    if message.len() > MESSAGE_MAX {
        return None;
    }
    let (tag, rest) = message.trim_end().split_once(' ')?;
    if tag != PREFIX_DATA {
        return None;
    }

    let mut fields = rest.split(',');
    let _reserved = fields.next();
    Some(WeatherUpdate {
        temperature: fields.next(),
        humidity: fields.next(),
        visibility: fields.next(),
    })
}

/// Apply one inbound payload to the shared state.
///
/// Fields absent from a short message keep their previous values.
/// Returns whether anything was committed.
pub fn ingest<M: RawMutex>(message: &str, state: &WeatherState<M>) -> bool {
    let Some(update) = parse_update(message) else {
        return false;
    };

    let mut committed = false;
    if let Some(text) = update.temperature {
        state.set_temperature(text);
        committed = true;
    }
    if let Some(text) = update.humidity {
        state.set_humidity(text);
        committed = true;
    }
    if let Some(text) = update.visibility {
        state.set_visibility(text);
        committed = true;
    }
    committed
}

/// Compose the periodic region report: `"[CITY] <region-name>"`.
pub fn region_report(region: &str) -> heapless::String<64> {
    let mut message = heapless::String::new();
    let _ = write!(message, "{} {}", PREFIX_CITY, region);
    message
}
