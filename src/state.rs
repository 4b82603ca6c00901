//! State shared between the UI task and the network task.
//!
//! The weather snapshot (written by the network task, read by the
//! renderer) and the selected region (written by the confirm flow, read
//! by both tasks) each sit behind their own blocking mutex, so every
//! access is a single short critical section and a reader can never
//! observe a half-written field. The two groups are deliberately
//! independent: temperature and humidity may come from different
//! broker deliveries.
//!
//! The struct is generic over the embassy `RawMutex` so host tests run
//! it with `NoopRawMutex` while the firmware uses
//! `CriticalSectionRawMutex`.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

use crate::config::{FIELD_MAX, REGIONS};

/// One stored weather field, bounded and owned.
pub type FieldText = String<FIELD_MAX>;

/// Latest known weather readings, stored as opaque display text.
#[derive(Default)]
struct Snapshot {
    temperature: FieldText,
    humidity: FieldText,
    visibility: FieldText,
}

/// Shared store of the latest weather readings and the selected region.
///
/// Created once at boot and handed to both tasks by shared reference;
/// lives for the whole process.
pub struct WeatherState<M: RawMutex> {
    snapshot: Mutex<M, RefCell<Snapshot>>,
    region: Mutex<M, Cell<usize>>,
}

impl<M: RawMutex> WeatherState<M> {
    /// Empty snapshot, region index 0.
    pub const fn new() -> Self {
        Self {
            snapshot: Mutex::new(RefCell::new(Snapshot {
                temperature: String::new(),
                humidity: String::new(),
                visibility: String::new(),
            })),
            region: Mutex::new(Cell::new(0)),
        }
    }

    pub fn temperature(&self) -> FieldText {
        self.snapshot.lock(|s| s.borrow().temperature.clone())
    }

    pub fn humidity(&self) -> FieldText {
        self.snapshot.lock(|s| s.borrow().humidity.clone())
    }

    pub fn visibility(&self) -> FieldText {
        self.snapshot.lock(|s| s.borrow().visibility.clone())
    }

    pub fn set_temperature(&self, text: &str) {
        self.snapshot
            .lock(|s| copy_truncated(&mut s.borrow_mut().temperature, text));
    }

    pub fn set_humidity(&self, text: &str) {
        self.snapshot
            .lock(|s| copy_truncated(&mut s.borrow_mut().humidity, text));
    }

    pub fn set_visibility(&self, text: &str) {
        self.snapshot
            .lock(|s| copy_truncated(&mut s.borrow_mut().visibility, text));
    }

    /// Index of the committed region. Always within catalog bounds.
    pub fn region_index(&self) -> usize {
        self.region.lock(|r| r.get())
    }

    /// Display name of the committed region.
    pub fn region_name(&self) -> &'static str {
        REGIONS[self.region_index()]
    }

    /// Commit a new region. An out-of-catalog index is ignored, which
    /// keeps the bounds invariant without a panic path.
    pub fn select_region(&self, index: usize) {
        if index < REGIONS.len() {
            self.region.lock(|r| r.set(index));
        }
    }
}

impl<M: RawMutex> Default for WeatherState<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `dst` with `text`, truncating at the field capacity.
fn copy_truncated(dst: &mut FieldText, text: &str) {
    dst.clear();
    for c in text.chars() {
        if dst.push(c).is_err() {
            break;
        }
    }
}
