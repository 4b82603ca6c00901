//! APDS9960 gesture sensor - minimal I2C read path.
//!
//! Only the gesture engine is used: power on, set the entry/exit
//! thresholds, then drain the four-photodiode FIFO whenever the sensor
//! flags valid data and reduce the window to one classified swipe.
//! Classification does not leave this module; the rest of the system
//! only ever sees [`RawGesture`] codes.

use defmt::info;
use embassy_time::{Duration, Timer};

use crate::config::{APDS9960_ADDR, GESTURE_POLL_MS};
use crate::error::Error;
use crate::gesture::{GestureSource, RawGesture};

// Register map (gesture engine subset).
const REG_ENABLE: u8 = 0x80;
const REG_ID: u8 = 0x92;
const REG_GPENTH: u8 = 0xA0;
const REG_GEXTH: u8 = 0xA1;
const REG_GCONF2: u8 = 0xA3;
const REG_GPULSE: u8 = 0xA6;
const REG_GCONF4: u8 = 0xAB;
const REG_GFLVL: u8 = 0xAE;
const REG_GSTATUS: u8 = 0xAF;
const REG_GFIFO_U: u8 = 0xFC;

// ENABLE bits.
const PON: u8 = 0x01;
const PEN: u8 = 0x04;
const GEN: u8 = 0x40;

// GSTATUS bits.
const GVALID: u8 = 0x01;

/// Chip IDs seen across APDS9960 revisions.
const CHIP_IDS: [u8; 2] = [0xAB, 0x9C];

/// A FIFO sample only counts once every photodiode clears this floor.
const SAMPLE_FLOOR: u8 = 10;

/// Minimum start-to-end photodiode delta for a swipe to register.
const SWIPE_THRESHOLD: i16 = 13;

/// Gesture engine of the APDS9960, exposed as a [`GestureSource`].
pub struct GestureSensor<I2C> {
    i2c: I2C,
}

impl<I2C> GestureSensor<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Probe the chip and start the gesture engine.
    pub fn new(i2c: I2C) -> Result<Self, Error> {
        let mut sensor = Self { i2c };

        let id = sensor.read_reg(REG_ID)?;
        if !CHIP_IDS.contains(&id) {
            return Err(Error::Sensor);
        }

        sensor.write_reg(REG_GPENTH, 40)?; // proximity entry threshold
        sensor.write_reg(REG_GEXTH, 30)?; // exit threshold
        sensor.write_reg(REG_GCONF2, 0x41)?; // 4x gain, 100 mA, 2.8 ms wait
        sensor.write_reg(REG_GPULSE, 0xC9)?; // 32 us pulse, 10 pulses
        sensor.write_reg(REG_GCONF4, 0x01)?; // gesture mode
        sensor.write_reg(REG_ENABLE, PON | PEN | GEN)?;

        info!("APDS9960 up (id {=u8:#x})", id);
        Ok(sensor)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Error> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(APDS9960_ADDR, &[reg], &mut value)
            .map_err(|_| Error::Sensor)?;
        Ok(value[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(APDS9960_ADDR, &[reg, value])
            .map_err(|_| Error::Sensor)
    }

    /// Drain the gesture FIFO until the engine goes quiet, keeping the
    /// first and last usable sample of the window.
    async fn collect_window(&mut self) -> Result<Option<([u8; 4], [u8; 4])>, Error> {
        let mut first: Option<[u8; 4]> = None;
        let mut last: Option<[u8; 4]> = None;

        while self.read_reg(REG_GSTATUS)? & GVALID != 0 {
            let level = self.read_reg(REG_GFLVL)?;
            for _ in 0..level {
                let mut sample = [0u8; 4];
                self.i2c
                    .write_read(APDS9960_ADDR, &[REG_GFIFO_U], &mut sample)
                    .map_err(|_| Error::Sensor)?;

                if sample.iter().all(|&v| v >= SAMPLE_FLOOR) {
                    if first.is_none() {
                        first = Some(sample);
                    }
                    last = Some(sample);
                }
            }
            // Let the tail of the swipe land in the FIFO.
            Timer::after(Duration::from_millis(GESTURE_POLL_MS)).await;
        }

        Ok(first.zip(last))
    }
}

/// Reduce a sample window to a swipe direction. Samples are photodiode
/// readings in U, D, L, R order; the axis with the larger start-to-end
/// delta wins.
fn classify(first: [u8; 4], last: [u8; 4]) -> RawGesture {
    let ud_first = i16::from(first[0]) - i16::from(first[1]);
    let lr_first = i16::from(first[2]) - i16::from(first[3]);
    let ud_delta = (i16::from(last[0]) - i16::from(last[1])) - ud_first;
    let lr_delta = (i16::from(last[2]) - i16::from(last[3])) - lr_first;

    if ud_delta.abs() >= lr_delta.abs() {
        if ud_delta.abs() < SWIPE_THRESHOLD {
            RawGesture::None
        } else if ud_delta < 0 {
            RawGesture::Down
        } else {
            RawGesture::Up
        }
    } else if lr_delta.abs() < SWIPE_THRESHOLD {
        RawGesture::None
    } else if lr_delta < 0 {
        RawGesture::Right
    } else {
        RawGesture::Left
    }
}

impl<I2C> GestureSource for GestureSensor<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    async fn next_gesture(&mut self) -> Result<RawGesture, Error> {
        if self.read_reg(REG_GSTATUS)? & GVALID == 0 {
            Timer::after(Duration::from_millis(GESTURE_POLL_MS)).await;
            return Ok(RawGesture::None);
        }

        let gesture = match self.collect_window().await? {
            Some((first, last)) => classify(first, last),
            None => RawGesture::None,
        };

        if gesture != RawGesture::None {
            info!("Gesture: {}", gesture);
        }
        Ok(gesture)
    }
}
