//! User interface subsystem - view state machine + OLED rendering.
//!
//! The UI is a single task: render the current view, pause, block on
//! the next gesture intent, apply the transition, repeat. Transitions
//! are a pure function over [`View`] so the whole menu flow is testable
//! without hardware.
//!
//! ## Components
//!
//! - **View / transition**: this module
//! - **Rendering**: [`render`], over the [`display::TextPanel`] trait
//! - **Loop**: [`engine`]

pub mod display;
pub mod engine;
pub mod render;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::{MENU_LABELS, REGIONS};
use crate::gesture::Intent;
use crate::state::WeatherState;

/// Main menu slots, fixed order. Double as menu cursor values.
pub const MENU_TEMPERATURE: usize = 0;
pub const MENU_HUMIDITY: usize = 1;
pub const MENU_VISIBILITY: usize = 2;
pub const MENU_SELECT_AREA: usize = 3;

/// Confirm dialog options.
pub const CONFIRM_YES: usize = 0;
pub const CONFIRM_NO: usize = 1;
const CONFIRM_OPTIONS: usize = 2;

/// Screens (views) the UI can be in. Exactly one is current at any
/// time; each carries only the cursor it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    /// Boot banner - any swipe proceeds to the menu.
    Welcome,
    /// Main menu over [`MENU_LABELS`].
    Menu { cursor: usize },
    /// Latest temperature reading.
    Temperature,
    /// Latest humidity reading.
    Humidity,
    /// Latest visibility reading.
    Visibility,
    /// Region picker over the catalog.
    Regions { cursor: usize },
    /// "Are you sure?" dialog for the picked region.
    ConfirmRegion { pending: usize, cursor: usize },
}

/// Advance a cursor one slot, wrapping past the end.
pub fn cycle_next(cursor: usize, len: usize) -> usize {
    (cursor + 1) % len
}

/// Retreat a cursor one slot, wrapping past the start.
pub fn cycle_prev(cursor: usize, len: usize) -> usize {
    (cursor + len - 1) % len
}

/// Apply one intent to the current view.
///
/// The only side effect is the region commit on a confirmed Accept;
/// everything else is a pure view change.
pub fn transition<M: RawMutex>(view: View, intent: Intent, state: &WeatherState<M>) -> View {
    match view {
        View::Welcome => View::Menu { cursor: 0 },

        // An up-swipe walks down the list and vice versa, wrapping at
        // both ends.
        View::Menu { cursor } => match intent {
            Intent::Up => View::Menu {
                cursor: cycle_next(cursor, MENU_LABELS.len()),
            },
            Intent::Down => View::Menu {
                cursor: cycle_prev(cursor, MENU_LABELS.len()),
            },
            Intent::Confirm => match cursor {
                MENU_TEMPERATURE => View::Temperature,
                MENU_HUMIDITY => View::Humidity,
                MENU_VISIBILITY => View::Visibility,
                _ => View::Regions { cursor: 0 },
            },
            Intent::Back => view,
        },

        View::Temperature | View::Humidity | View::Visibility => match intent {
            Intent::Back => View::Menu {
                cursor: menu_slot(view),
            },
            _ => view,
        },

        View::Regions { cursor } => match intent {
            Intent::Up => View::Regions {
                cursor: cycle_next(cursor, REGIONS.len()),
            },
            Intent::Down => View::Regions {
                cursor: cycle_prev(cursor, REGIONS.len()),
            },
            Intent::Confirm => View::ConfirmRegion {
                pending: cursor,
                cursor: CONFIRM_YES,
            },
            Intent::Back => View::Menu {
                cursor: MENU_SELECT_AREA,
            },
        },

        View::ConfirmRegion { pending, cursor } => match intent {
            Intent::Up => View::ConfirmRegion {
                pending,
                cursor: cycle_next(cursor, CONFIRM_OPTIONS),
            },
            Intent::Down => View::ConfirmRegion {
                pending,
                cursor: cycle_prev(cursor, CONFIRM_OPTIONS),
            },
            Intent::Confirm if cursor == CONFIRM_YES => {
                state.select_region(pending);
                View::Menu {
                    cursor: MENU_SELECT_AREA,
                }
            }
            // Declining and backing out are the same thing: no commit,
            // back to the picker with its cursor kept.
            Intent::Confirm | Intent::Back => View::Regions { cursor: pending },
        },
    }
}

/// The menu slot a leaf view was entered from.
fn menu_slot(view: View) -> usize {
    match view {
        View::Humidity => MENU_HUMIDITY,
        View::Visibility => MENU_VISIBILITY,
        _ => MENU_TEMPERATURE,
    }
}
