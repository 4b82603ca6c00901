//! Unified error type for swipecast.
//!
//! Only unrecoverable device conditions are represented here; they all
//! propagate to the firmware top level, which resets the device.
//! Recoverable conditions (a failed publish, an alien broker message)
//! are handled where they occur and never become an `Error`.
//!
//! We avoid `alloc` - all variants carry only fixed-size data.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The gesture sensor reported a read error.
    Sensor,

    /// A display transaction failed.
    Display,

    /// Wi-Fi or IP stack bring-up failed.
    Network,

    /// The broker session could not be established.
    Broker,
}
