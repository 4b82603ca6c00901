//! Host-testable core for swipecast.
//!
//! Everything that does not touch hardware lives here: the shared
//! weather state, the gesture-to-intent pipeline, the menu state
//! machine and its renderer (over the [`ui::display::TextPanel`]
//! trait), and the broker wire format.
//!
//! Usage: `cargo test`
//!
//! The firmware binary in main.rs is built with `--features embedded`
//! for the ESP32-C6 target and pulls in the gated hardware modules.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod net;
pub mod state;
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use crate::config::{MENU_LABELS, REGIONS};
    use crate::error::Error;
    use crate::gesture::{GestureInput, GestureSource, Intent, RawGesture};
    use crate::net::{classify, ingest, parse_update, region_report, Inbound};
    use crate::state::WeatherState;
    use crate::ui::display::TextPanel;
    use crate::ui::render::render;
    use crate::ui::{
        cycle_next, cycle_prev, transition, View, CONFIRM_NO, CONFIRM_YES, MENU_SELECT_AREA,
        MENU_TEMPERATURE,
    };

    type TestState = WeatherState<NoopRawMutex>;

    /// Gesture source replaying a fixed script.
    struct ScriptSource {
        frames: Vec<Result<RawGesture, Error>>,
        at: usize,
    }

    impl ScriptSource {
        fn new(frames: Vec<Result<RawGesture, Error>>) -> Self {
            Self { frames, at: 0 }
        }
    }

    impl GestureSource for ScriptSource {
        async fn next_gesture(&mut self) -> Result<RawGesture, Error> {
            let frame = self.frames[self.at];
            self.at += 1;
            frame
        }
    }

    /// Panel recording every drawn row.
    #[derive(Default)]
    struct RecordingPanel {
        rows: Vec<(u8, String, bool)>,
        contrast: Option<u8>,
        presented: u32,
    }

    impl RecordingPanel {
        fn row(&self, row: u8) -> Option<&(u8, String, bool)> {
            self.rows.iter().find(|(r, _, _)| *r == row)
        }
    }

    impl TextPanel for RecordingPanel {
        fn clear(&mut self) -> Result<(), Error> {
            self.rows.clear();
            Ok(())
        }

        fn set_contrast(&mut self, level: u8) -> Result<(), Error> {
            self.contrast = Some(level);
            Ok(())
        }

        fn line(&mut self, row: u8, text: &str, invert: bool) -> Result<(), Error> {
            self.rows.push((row, text.to_string(), invert));
            Ok(())
        }

        fn present(&mut self) -> Result<(), Error> {
            self.presented += 1;
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Gesture Mapping Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn raw_gesture_from_wire_codes() {
        assert_eq!(RawGesture::from_code(0), Ok(RawGesture::None));
        assert_eq!(RawGesture::from_code(1), Ok(RawGesture::Up));
        assert_eq!(RawGesture::from_code(2), Ok(RawGesture::Down));
        assert_eq!(RawGesture::from_code(3), Ok(RawGesture::Left));
        assert_eq!(RawGesture::from_code(4), Ok(RawGesture::Right));
    }

    #[test]
    fn raw_gesture_error_code_is_fatal() {
        assert_eq!(RawGesture::from_code(-1), Err(Error::Sensor));
        assert_eq!(RawGesture::from_code(-7), Err(Error::Sensor));
    }

    #[test]
    fn raw_gesture_unknown_code_is_empty_frame() {
        assert_eq!(RawGesture::from_code(5), Ok(RawGesture::None));
        assert_eq!(RawGesture::from_code(127), Ok(RawGesture::None));
    }

    #[test]
    fn intent_mapping_table_is_exact() {
        assert_eq!(Intent::from_raw(RawGesture::Up), Some(Intent::Up));
        assert_eq!(Intent::from_raw(RawGesture::Down), Some(Intent::Down));
        assert_eq!(Intent::from_raw(RawGesture::Left), Some(Intent::Confirm));
        assert_eq!(Intent::from_raw(RawGesture::Right), Some(Intent::Back));
        assert_eq!(Intent::from_raw(RawGesture::None), None);
    }

    #[test]
    fn gesture_input_skips_empty_frames() {
        let source = ScriptSource::new(vec![
            Ok(RawGesture::None),
            Ok(RawGesture::None),
            Ok(RawGesture::Left),
        ]);
        let mut input = GestureInput::new(source);
        assert_eq!(block_on(input.next_intent()), Ok(Intent::Confirm));
    }

    #[test]
    fn gesture_input_yields_intents_in_order() {
        let source = ScriptSource::new(vec![
            Ok(RawGesture::Up),
            Ok(RawGesture::None),
            Ok(RawGesture::Down),
            Ok(RawGesture::Right),
        ]);
        let mut input = GestureInput::new(source);
        assert_eq!(block_on(input.next_intent()), Ok(Intent::Up));
        assert_eq!(block_on(input.next_intent()), Ok(Intent::Down));
        assert_eq!(block_on(input.next_intent()), Ok(Intent::Back));
    }

    #[test]
    fn gesture_input_propagates_sensor_error() {
        let source = ScriptSource::new(vec![Ok(RawGesture::None), Err(Error::Sensor)]);
        let mut input = GestureInput::new(source);
        assert_eq!(block_on(input.next_intent()), Err(Error::Sensor));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Cursor Arithmetic Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn cursor_cycling_wraps_both_directions() {
        assert_eq!(cycle_next(0, 4), 1);
        assert_eq!(cycle_next(3, 4), 0);
        assert_eq!(cycle_prev(0, 4), 3);
        assert_eq!(cycle_prev(3, 4), 2);
        assert_eq!(cycle_next(0, 1), 0);
        assert_eq!(cycle_prev(0, 1), 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // View Transition Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn welcome_leaves_on_any_intent() {
        let state = TestState::new();
        for intent in [Intent::Up, Intent::Down, Intent::Confirm, Intent::Back] {
            assert_eq!(
                transition(View::Welcome, intent, &state),
                View::Menu { cursor: 0 }
            );
        }
    }

    #[test]
    fn menu_cursor_cycles_up() {
        let state = TestState::new();
        let mut view = View::Menu { cursor: 0 };
        view = transition(view, Intent::Up, &state);
        assert_eq!(view, View::Menu { cursor: 1 });
        view = transition(View::Menu { cursor: 3 }, Intent::Up, &state);
        assert_eq!(view, View::Menu { cursor: 0 });
    }

    #[test]
    fn menu_cursor_cycles_down() {
        let state = TestState::new();
        assert_eq!(
            transition(View::Menu { cursor: 0 }, Intent::Down, &state),
            View::Menu { cursor: 3 }
        );
        assert_eq!(
            transition(View::Menu { cursor: 2 }, Intent::Down, &state),
            View::Menu { cursor: 1 }
        );
    }

    #[test]
    fn menu_confirm_opens_the_selected_view() {
        let state = TestState::new();
        let expect = [
            View::Temperature,
            View::Humidity,
            View::Visibility,
            View::Regions { cursor: 0 },
        ];
        for (cursor, view) in expect.into_iter().enumerate() {
            assert_eq!(
                transition(View::Menu { cursor }, Intent::Confirm, &state),
                view
            );
        }
    }

    #[test]
    fn menu_back_is_a_noop() {
        let state = TestState::new();
        assert_eq!(
            transition(View::Menu { cursor: 2 }, Intent::Back, &state),
            View::Menu { cursor: 2 }
        );
    }

    #[test]
    fn weather_views_ignore_everything_but_back() {
        let state = TestState::new();
        for view in [View::Temperature, View::Humidity, View::Visibility] {
            for intent in [Intent::Up, Intent::Down, Intent::Confirm] {
                assert_eq!(transition(view, intent, &state), view);
            }
        }
    }

    #[test]
    fn weather_view_back_restores_its_menu_slot() {
        let state = TestState::new();
        assert_eq!(
            transition(View::Temperature, Intent::Back, &state),
            View::Menu { cursor: 0 }
        );
        assert_eq!(
            transition(View::Humidity, Intent::Back, &state),
            View::Menu { cursor: 1 }
        );
        assert_eq!(
            transition(View::Visibility, Intent::Back, &state),
            View::Menu { cursor: 2 }
        );
    }

    #[test]
    fn region_cursor_cycles_over_catalog() {
        let state = TestState::new();
        let last = REGIONS.len() - 1;
        assert_eq!(
            transition(View::Regions { cursor: last }, Intent::Up, &state),
            View::Regions { cursor: 0 }
        );
        assert_eq!(
            transition(View::Regions { cursor: 0 }, Intent::Down, &state),
            View::Regions { cursor: last }
        );
    }

    #[test]
    fn region_confirm_opens_dialog_on_accept_option() {
        let state = TestState::new();
        assert_eq!(
            transition(View::Regions { cursor: 2 }, Intent::Confirm, &state),
            View::ConfirmRegion {
                pending: 2,
                cursor: CONFIRM_YES
            }
        );
    }

    #[test]
    fn region_back_returns_to_menu_without_commit() {
        let state = TestState::new();
        assert_eq!(
            transition(View::Regions { cursor: 2 }, Intent::Back, &state),
            View::Menu {
                cursor: MENU_SELECT_AREA
            }
        );
        assert_eq!(state.region_index(), 0);
    }

    #[test]
    fn confirm_dialog_cursor_cycles_mod_two() {
        let state = TestState::new();
        let view = View::ConfirmRegion {
            pending: 1,
            cursor: CONFIRM_YES,
        };
        let view = transition(view, Intent::Up, &state);
        assert_eq!(
            view,
            View::ConfirmRegion {
                pending: 1,
                cursor: CONFIRM_NO
            }
        );
        let view = transition(view, Intent::Up, &state);
        assert_eq!(
            view,
            View::ConfirmRegion {
                pending: 1,
                cursor: CONFIRM_YES
            }
        );
    }

    #[test]
    fn confirm_accept_commits_the_pending_region() {
        let state = TestState::new();
        let view = View::ConfirmRegion {
            pending: 2,
            cursor: CONFIRM_YES,
        };
        assert_eq!(
            transition(view, Intent::Confirm, &state),
            View::Menu {
                cursor: MENU_SELECT_AREA
            }
        );
        assert_eq!(state.region_index(), 2);
        assert_eq!(state.region_name(), "Paris");
    }

    #[test]
    fn confirm_decline_never_commits() {
        let state = TestState::new();
        let view = View::ConfirmRegion {
            pending: 2,
            cursor: CONFIRM_NO,
        };
        assert_eq!(
            transition(view, Intent::Confirm, &state),
            View::Regions { cursor: 2 }
        );
        assert_eq!(state.region_index(), 0);
    }

    #[test]
    fn confirm_back_acts_like_decline() {
        let state = TestState::new();
        let view = View::ConfirmRegion {
            pending: 1,
            cursor: CONFIRM_YES,
        };
        assert_eq!(
            transition(view, Intent::Back, &state),
            View::Regions { cursor: 1 }
        );
        assert_eq!(state.region_index(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Shared State Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn state_starts_empty_with_first_region() {
        let state = TestState::new();
        assert_eq!(state.temperature().as_str(), "");
        assert_eq!(state.humidity().as_str(), "");
        assert_eq!(state.visibility().as_str(), "");
        assert_eq!(state.region_index(), 0);
        assert_eq!(state.region_name(), REGIONS[0]);
    }

    #[test]
    fn state_fields_update_independently() {
        let state = TestState::new();
        state.set_temperature("21C");
        state.set_humidity("55%");
        assert_eq!(state.temperature().as_str(), "21C");
        assert_eq!(state.humidity().as_str(), "55%");
        assert_eq!(state.visibility().as_str(), "");
    }

    #[test]
    fn state_field_is_truncated_at_capacity() {
        let state = TestState::new();
        let long = "x".repeat(400);
        state.set_temperature(&long);
        assert_eq!(state.temperature().len(), 255);
    }

    #[test]
    fn state_rejects_out_of_catalog_region() {
        let state = TestState::new();
        state.select_region(1);
        state.select_region(REGIONS.len());
        assert_eq!(state.region_index(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Wire Format Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn classify_by_leading_tag() {
        assert_eq!(classify("[DATA] x,21C"), Inbound::Data);
        assert_eq!(classify("[CITIES] Brno,London,Paris"), Inbound::Catalog);
        assert_eq!(classify("[CITY] Brno"), Inbound::Other);
        assert_eq!(classify("hello"), Inbound::Other);
        assert_eq!(classify(""), Inbound::Other);
    }

    #[test]
    fn parse_full_data_message() {
        let update = parse_update("[DATA] x,21C,55%,10km").unwrap();
        assert_eq!(update.temperature, Some("21C"));
        assert_eq!(update.humidity, Some("55%"));
        assert_eq!(update.visibility, Some("10km"));
    }

    #[test]
    fn parse_short_data_message_yields_partial_update() {
        let update = parse_update("[DATA] x,21C").unwrap();
        assert_eq!(update.temperature, Some("21C"));
        assert_eq!(update.humidity, None);
        assert_eq!(update.visibility, None);
    }

    #[test]
    fn parse_rejects_alien_tags() {
        assert!(parse_update("[CITY] Brno").is_none());
        assert!(parse_update("[CITIES] Brno,London").is_none());
        assert!(parse_update("DATA x,21C").is_none());
        assert!(parse_update("x[DATA] x,21C").is_none());
    }

    #[test]
    fn parse_rejects_tag_without_fields() {
        assert!(parse_update("[DATA]").is_none());
    }

    #[test]
    fn parse_rejects_oversized_message() {
        let mut message = String::from("[DATA] x,");
        message.push_str(&"y".repeat(300));
        assert!(parse_update(&message).is_none());
    }

    #[test]
    fn parse_strips_trailing_newline() {
        let update = parse_update("[DATA] x,21C,55%,10km\n").unwrap();
        assert_eq!(update.visibility, Some("10km"));
    }

    #[test]
    fn ingest_commits_positionally() {
        let state = TestState::new();
        assert!(ingest("[DATA] x,21C,55%,10km", &state));
        assert_eq!(state.temperature().as_str(), "21C");
        assert_eq!(state.humidity().as_str(), "55%");
        assert_eq!(state.visibility().as_str(), "10km");
    }

    #[test]
    fn ingest_short_message_keeps_prior_fields() {
        let state = TestState::new();
        assert!(ingest("[DATA] x,21C,55%,10km", &state));
        assert!(ingest("[DATA] x,30C", &state));
        assert_eq!(state.temperature().as_str(), "30C");
        assert_eq!(state.humidity().as_str(), "55%");
        assert_eq!(state.visibility().as_str(), "10km");
    }

    #[test]
    fn ingest_ignores_unrecognized_messages() {
        let state = TestState::new();
        state.set_temperature("21C");
        assert!(!ingest("[NOISE] x,99C,99%,0km", &state));
        assert!(!ingest("", &state));
        assert_eq!(state.temperature().as_str(), "21C");
        assert_eq!(state.humidity().as_str(), "");
    }

    #[test]
    fn ingest_stores_malformed_numbers_verbatim() {
        let state = TestState::new();
        assert!(ingest("[DATA] x,not-a-number", &state));
        assert_eq!(state.temperature().as_str(), "not-a-number");
    }

    #[test]
    fn region_report_wire_format() {
        assert_eq!(region_report("Brno").as_str(), "[CITY] Brno");
        assert_eq!(region_report("London").as_str(), "[CITY] London");
    }

    // ════════════════════════════════════════════════════════════════════════
    // Render Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn render_menu_highlights_only_the_cursor_row() {
        let state = TestState::new();
        let mut panel = RecordingPanel::default();
        render(View::Menu { cursor: 1 }, &state, &mut panel).unwrap();

        assert_eq!(panel.contrast, Some(0xFF));
        assert_eq!(panel.presented, 1);
        assert_eq!(panel.row(0).unwrap().1, "----- Menu -----");
        for (i, label) in MENU_LABELS.iter().enumerate() {
            let (_, text, invert) = panel.row(1 + i as u8).unwrap();
            assert_eq!(text, label);
            assert_eq!(*invert, i == 1);
        }
    }

    #[test]
    fn render_footer_names_the_committed_region() {
        let state = TestState::new();
        state.select_region(2);
        let mut panel = RecordingPanel::default();
        render(View::Menu { cursor: 0 }, &state, &mut panel).unwrap();
        assert_eq!(panel.row(7).unwrap().1, "Area: Paris");
    }

    #[test]
    fn render_weather_view_reads_state_fresh() {
        let state = TestState::new();
        let mut panel = RecordingPanel::default();

        state.set_temperature("21C");
        render(View::Temperature, &state, &mut panel).unwrap();
        assert_eq!(panel.row(0).unwrap().1, "- <Temperature -");
        assert_eq!(panel.row(4).unwrap().1, "21C");

        state.set_temperature("22C");
        render(View::Temperature, &state, &mut panel).unwrap();
        assert_eq!(panel.row(4).unwrap().1, "22C");
    }

    #[test]
    fn render_confirm_shows_prompt_and_options() {
        let state = TestState::new();
        let mut panel = RecordingPanel::default();
        render(
            View::ConfirmRegion {
                pending: 2,
                cursor: CONFIRM_NO,
            },
            &state,
            &mut panel,
        )
        .unwrap();

        assert_eq!(panel.row(1).unwrap().1, "Are you sure?");
        assert_eq!(panel.row(3).unwrap(), &(3, "Yes".to_string(), false));
        assert_eq!(panel.row(4).unwrap(), &(4, "No".to_string(), true));
        // Footer keeps the committed region, not the pending pick.
        assert_eq!(panel.row(7).unwrap().1, "Area: Brno");
    }

    #[test]
    fn render_welcome_banner_is_inverted() {
        let state = TestState::new();
        let mut panel = RecordingPanel::default();
        render(View::Welcome, &state, &mut panel).unwrap();
        assert_eq!(panel.row(2).unwrap(), &(2, "    Welcome".to_string(), true));
        assert_eq!(
            panel.row(4).unwrap(),
            &(4, "Swipe to launch!".to_string(), true)
        );
    }

    #[test]
    fn render_surfaces_panel_failure() {
        struct FailingPanel;
        impl TextPanel for FailingPanel {
            fn clear(&mut self) -> Result<(), Error> {
                Err(Error::Display)
            }
            fn set_contrast(&mut self, _: u8) -> Result<(), Error> {
                Ok(())
            }
            fn line(&mut self, _: u8, _: &str, _: bool) -> Result<(), Error> {
                Ok(())
            }
            fn present(&mut self) -> Result<(), Error> {
                Ok(())
            }
        }

        let state = TestState::new();
        assert_eq!(
            render(View::Welcome, &state, &mut FailingPanel),
            Err(Error::Display)
        );
    }

    #[test]
    fn menu_labels_and_slots_agree() {
        assert_eq!(MENU_LABELS[MENU_TEMPERATURE], "Temperature");
        assert_eq!(MENU_LABELS[MENU_SELECT_AREA], "Select area");
        assert!(!REGIONS.is_empty());
    }
}
