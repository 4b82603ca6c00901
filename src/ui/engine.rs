//! The interactive UI loop.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};

use super::display::TextPanel;
use super::{render::render, transition, View};
use crate::config::UI_REFRESH_PAUSE_MS;
use crate::error::Error;
use crate::gesture::{GestureInput, GestureSource};
use crate::state::WeatherState;

/// Run the menu forever: render, pause, block on the next swipe, apply
/// the transition. Returns only with a fatal device error.
///
/// The fixed pause sits between the render pass and the gesture wait,
/// so a burst of swipes cannot redraw the panel faster than twice a
/// second. The gesture wait itself is unbounded.
pub async fn run<M, P, S>(
    state: &WeatherState<M>,
    panel: &mut P,
    input: &mut GestureInput<S>,
) -> Result<Infallible, Error>
where
    M: RawMutex,
    P: TextPanel,
    S: GestureSource,
{
    let mut view = View::Welcome;

    loop {
        render(view, state, panel)?;
        Timer::after(Duration::from_millis(UI_REFRESH_PAUSE_MS)).await;
        let intent = input.next_intent().await?;
        view = transition(view, intent, state);
    }
}
