//! Hardware drivers for the firmware build.

#[cfg(feature = "embedded")]
pub mod apds9960;
