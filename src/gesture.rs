//! Gesture input - raw sensor codes mapped to navigation intents.
//!
//! The sensor driver hands us already-classified swipe directions; this
//! module owns the remap table and the skip-empty-frames loop that
//! turns the raw stream into a clean sequence of [`Intent`] values.

use crate::error::Error;

/// Classified gesture code as reported by the sensor driver.
///
/// Wire values follow the APDS9960 component-library convention:
/// `None`=0, `Up`=1, `Down`=2, `Left`=3, `Right`=4, read error=-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawGesture {
    /// No swipe seen in this frame.
    None,
    Up,
    Down,
    Left,
    Right,
}

impl RawGesture {
    /// Decode a sensor wire value. Negative values are read errors and
    /// fatal; unknown positive codes are treated as empty frames.
    pub fn from_code(code: i8) -> Result<Self, Error> {
        match code {
            1 => Ok(RawGesture::Up),
            2 => Ok(RawGesture::Down),
            3 => Ok(RawGesture::Left),
            4 => Ok(RawGesture::Right),
            c if c < 0 => Err(Error::Sensor),
            _ => Ok(RawGesture::None),
        }
    }
}

/// Navigation meaning of a swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    Up,
    Down,
    Confirm,
    Back,
}

impl Intent {
    /// Fixed remap table: Left confirms, Right goes back. Empty frames
    /// carry no intent.
    pub fn from_raw(raw: RawGesture) -> Option<Intent> {
        match raw {
            RawGesture::None => None,
            RawGesture::Up => Some(Intent::Up),
            RawGesture::Down => Some(Intent::Down),
            RawGesture::Left => Some(Intent::Confirm),
            RawGesture::Right => Some(Intent::Back),
        }
    }
}

/// Source of classified gestures (the sensor driver boundary).
///
/// Implementations may poll, wait on an interrupt line, or replay a
/// script in tests - the caller only sees a suspension point.
#[allow(async_fn_in_trait)]
pub trait GestureSource {
    /// Wait for the next classified gesture frame. `RawGesture::None`
    /// frames are allowed; a sensor failure is fatal.
    async fn next_gesture(&mut self) -> Result<RawGesture, Error>;
}

/// Filters a raw gesture stream into a clean intent sequence.
pub struct GestureInput<S: GestureSource> {
    source: S,
}

impl<S: GestureSource> GestureInput<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Wait until the source yields a mappable gesture.
    ///
    /// Empty frames are consumed without returning, so this never
    /// yields a "no intent" value; it either returns one of the four
    /// intents or the source's fatal error.
    pub async fn next_intent(&mut self) -> Result<Intent, Error> {
        loop {
            if let Some(intent) = Intent::from_raw(self.source.next_gesture().await?) {
                return Ok(intent);
            }
        }
    }
}
