//! Text-row display boundary and the SSD1306 OLED implementation.

use crate::error::Error;

/// Number of text rows on the panel (128x64 at 8 px per row).
pub const PANEL_ROWS: u8 = 8;

/// A panel that renders rows of text.
///
/// This is the whole surface the UI needs: whole-screen clear, a
/// contrast level, per-row text with optional inversion, and a flush.
/// Every failure is fatal to the UI task.
pub trait TextPanel {
    /// Blank the whole screen.
    fn clear(&mut self) -> Result<(), Error>;

    /// Set panel contrast (0x00 dimmest .. 0xFF brightest).
    fn set_contrast(&mut self, level: u8) -> Result<(), Error>;

    /// Draw one row of text, inverted when `invert` is set. Rows past
    /// the panel bottom are ignored.
    fn line(&mut self, row: u8, text: &str, invert: bool) -> Result<(), Error>;

    /// Push the composed frame to the hardware.
    fn present(&mut self) -> Result<(), Error>;
}

#[cfg(feature = "embedded")]
mod oled {
    use embedded_graphics::mono_font::ascii::FONT_5X8;
    use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;
    use embedded_graphics::text::{Baseline, Text};
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::I2CDisplayInterface;
    use ssd1306::Ssd1306;

    use super::{TextPanel, PANEL_ROWS};
    use crate::error::Error;

    /// Concrete display driver, generic over the HAL's I2C peripheral.
    type Display<I2C> =
        Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

    /// SSD1306 128x64 OLED rendering 8 rows of 5x8 text.
    pub struct Oled<I2C> {
        display: Display<I2C>,
    }

    impl<I2C> Oled<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        /// Initialise the panel and leave it cleared.
        pub fn new(i2c: I2C) -> Result<Self, Error> {
            let interface = I2CDisplayInterface::new(i2c);
            let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();
            display.init().map_err(|_| Error::Display)?;
            display.clear_buffer();
            display.flush().map_err(|_| Error::Display)?;
            Ok(Self { display })
        }
    }

    fn text_style(invert: bool) -> MonoTextStyle<'static, BinaryColor> {
        let (fg, bg) = if invert {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        MonoTextStyleBuilder::new()
            .font(&FONT_5X8)
            .text_color(fg)
            .background_color(bg)
            .build()
    }

    impl<I2C> TextPanel for Oled<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        fn clear(&mut self) -> Result<(), Error> {
            self.display.clear_buffer();
            Ok(())
        }

        fn set_contrast(&mut self, level: u8) -> Result<(), Error> {
            self.display
                .set_brightness(Brightness::custom(1, level))
                .map_err(|_| Error::Display)
        }

        fn line(&mut self, row: u8, text: &str, invert: bool) -> Result<(), Error> {
            if row >= PANEL_ROWS {
                return Ok(());
            }
            let origin = Point::new(0, i32::from(row) * 8);
            Text::with_baseline(text, origin, text_style(invert), Baseline::Top)
                .draw(&mut self.display)
                .map_err(|_| Error::Display)?;
            Ok(())
        }

        fn present(&mut self) -> Result<(), Error> {
            self.display.flush().map_err(|_| Error::Display)
        }
    }
}

#[cfg(feature = "embedded")]
pub use oled::Oled;
