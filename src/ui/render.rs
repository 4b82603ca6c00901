//! Per-view row layout.
//!
//! Every render pass composes a full frame: clear, full contrast,
//! header, body, and a footer naming the committed region, read from
//! shared state at render time so concurrent updates show up on the
//! next frame. The row under the cursor is drawn inverted.

use core::fmt::Write as _;

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::display::TextPanel;
use super::{View, CONFIRM_NO, CONFIRM_YES};
use crate::config::{MENU_LABELS, REGIONS};
use crate::error::Error;
use crate::state::WeatherState;

const ROW_HEADER: u8 = 0;
const ROW_READING: u8 = 4;
const ROW_FOOTER: u8 = 7;

/// Draw one frame for `view`.
pub fn render<M, P>(view: View, state: &WeatherState<M>, panel: &mut P) -> Result<(), Error>
where
    M: RawMutex,
    P: TextPanel,
{
    panel.clear()?;
    panel.set_contrast(0xFF)?;

    match view {
        View::Welcome => {
            panel.line(2, "    Welcome", true)?;
            panel.line(4, "Swipe to launch!", true)?;
        }

        View::Menu { cursor } => {
            panel.line(ROW_HEADER, "----- Menu -----", false)?;
            for (i, label) in MENU_LABELS.iter().enumerate() {
                panel.line(1 + i as u8, label, i == cursor)?;
            }
        }

        View::Temperature => {
            panel.line(ROW_HEADER, "- <Temperature -", true)?;
            panel.line(ROW_READING, state.temperature().as_str(), false)?;
        }

        View::Humidity => {
            panel.line(ROW_HEADER, "-- < Humidity --", true)?;
            panel.line(ROW_READING, state.humidity().as_str(), false)?;
        }

        View::Visibility => {
            panel.line(ROW_HEADER, "- < Visibility -", true)?;
            panel.line(ROW_READING, state.visibility().as_str(), false)?;
        }

        View::Regions { cursor } => {
            panel.line(ROW_HEADER, "---- <Areas ----", false)?;
            for (i, name) in REGIONS.iter().enumerate() {
                panel.line(1 + i as u8, name, i == cursor)?;
            }
        }

        // The footer keeps showing the committed region, not the
        // pending one.
        View::ConfirmRegion { cursor, .. } => {
            panel.line(ROW_HEADER, "---- <Areas ----", false)?;
            panel.line(1, "Are you sure?", false)?;
            panel.line(3, "Yes", cursor == CONFIRM_YES)?;
            panel.line(4, "No", cursor == CONFIRM_NO)?;
        }
    }

    let mut footer: heapless::String<32> = heapless::String::new();
    let _ = write!(footer, "Area: {}", state.region_name());
    panel.line(ROW_FOOTER, footer.as_str(), false)?;

    panel.present()
}
