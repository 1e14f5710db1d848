//! Per-frame simulation step
//!
//! Core game loop that advances the mode machine deterministically, one frame
//! per call.

use serde::{Deserialize, Serialize};

use super::collision::{GroundContact, check_ground, check_wall, fell_off_screen};
use super::fixed::Fixed;
use super::state::{GameEvent, GameState, Mode};

/// Input edges collected by the host for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Jump went down this frame
    pub jump_pressed: bool,
    /// Jump came up this frame
    pub jump_released: bool,
    /// Host wants the session to end
    pub cancel: bool,
}

impl TickInput {
    pub fn press() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }

    pub fn release() -> Self {
        Self {
            jump_released: true,
            ..Default::default()
        }
    }

    pub fn cancel() -> Self {
        Self {
            cancel: true,
            ..Default::default()
        }
    }
}

/// Result of advancing one frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum TickOutcome {
    /// Frame completed; events raised during it, in order
    Advanced(Vec<GameEvent>),
    /// Cancel was requested; nothing was simulated and the host should stop
    Aborted,
}

impl TickOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, TickOutcome::Aborted)
    }

    pub fn events(&self) -> &[GameEvent] {
        match self {
            TickOutcome::Advanced(events) => events,
            TickOutcome::Aborted => &[],
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if input.cancel {
        log::info!("Abort requested at frame {}", state.frame);
        return TickOutcome::Aborted;
    }

    state.frame += 1;
    let mut events = Vec::new();

    match state.mode {
        Mode::Title => tick_title(state, input, &mut events),
        Mode::Playing => tick_playing(state, input, &mut events),
        Mode::GameOver => tick_game_over(state, input, &mut events),
    }

    let walk_ticks = state.settings().physics.walk_frame_ticks;
    state.animation.update(&state.body, walk_ticks);

    TickOutcome::Advanced(events)
}

fn tick_title(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if input.jump_pressed {
        // The press that starts the run is also its first jump
        events.push(state.enter_playing());
        tick_playing(state, input, events);
        return;
    }

    state.body.speed_x = state.params().initial_run_speed;
    state.scroll_x += state.body.speed_x;
    state.wrap_scroll();
}

fn tick_playing(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let params = *state.params();

    if state
        .body
        .apply_vertical(&params, input.jump_pressed, input.jump_released)
    {
        events.push(GameEvent::Jump);
    }
    state.body.accelerate(&params);
    state.scroll_x += state.body.speed_x;

    // Resolve walls against the pre-wrap offset
    if state.body.speed_x > Fixed::ZERO {
        if let Some(hit) = check_wall(&state.map, &params, state.scroll_x, &state.body) {
            log::debug!("Wall at column {} (frame {})", hit.column, state.frame);
            state.body.speed_x = Fixed::ZERO;
            state.scroll_x = hit.scroll_x;
            events.push(GameEvent::WallHit);
        }
    }

    state.wrap_scroll();
    state.body.integrate();

    if !state.body.is_rising() {
        match check_ground(&state.map, &params, state.scroll_x, &state.body) {
            GroundContact::Landed { y } => {
                let was_floating = state.body.floating;
                state.body.land(y);
                if was_floating {
                    events.push(GameEvent::Landed);
                }
            }
            GroundContact::Airborne => state.body.floating = true,
            GroundContact::OutOfRange => {}
        }
    }

    if fell_off_screen(&params, &state.body) {
        log::info!("Fell off screen at frame {}", state.frame);
        events.push(state.enter_game_over());
    }
}

fn tick_game_over(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if input.jump_pressed {
        events.push(state.goto_title());
        return;
    }
    state.body.speed_x = Fixed::ZERO;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::physics::CharacterBody;
    use crate::sim::tilemap::TILE_GROUND;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(Settings::default()).unwrap()
    }

    fn advance(state: &mut GameState, input: TickInput) -> Vec<GameEvent> {
        match tick(state, &input) {
            TickOutcome::Advanced(events) => events,
            TickOutcome::Aborted => panic!("unexpected abort"),
        }
    }

    /// Press to start a run, then let the character land
    fn start_run(state: &mut GameState) {
        advance(state, TickInput::press());
        assert_eq!(state.mode, Mode::Playing);
        for _ in 0..60 {
            advance(state, TickInput::default());
            if !state.body.floating {
                break;
            }
        }
    }

    fn mode_changes(events: &[GameEvent]) -> Vec<(Mode, Mode)> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ModeChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_idles_on_flat_ground() {
        let mut state = new_state();
        for _ in 0..500 {
            let events = advance(&mut state, TickInput::default());
            assert!(events.is_empty());
            assert_eq!(state.mode, Mode::Title);
            assert_eq!(state.body.y, state.params().character_start_y);
            assert_eq!(state.body.speed_x, state.params().initial_run_speed);
            let cursor = state.terrain.cursor();
            assert_eq!(cursor.ground_height, 10);
            assert!(!cursor.ground_hole);
        }
        assert_eq!(state.frame, 500);
        assert!(state.map.columns_shifted() > 0);
        for col in 0..state.map.columns() as i32 {
            assert!(state.map.is_solid_at(col, 10));
            assert!(!state.map.is_solid_at(col, 9));
        }
    }

    #[test]
    fn test_title_to_playing_on_press() {
        let mut state = new_state();
        for _ in 0..20 {
            advance(&mut state, TickInput::default());
        }
        let events = advance(&mut state, TickInput::press());
        assert_eq!(state.mode, Mode::Playing);
        assert!(state.body.floating);
        assert_eq!(state.body.rising_frames, state.params().rising_frames);
        assert_eq!(mode_changes(&events), vec![(Mode::Title, Mode::Playing)]);
        assert!(events.contains(&GameEvent::Jump));
    }

    #[test]
    fn test_jump_cue_once_per_takeoff() {
        let mut state = new_state();
        start_run(&mut state);
        assert!(!state.body.floating);

        let events = advance(&mut state, TickInput::press());
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Jump).count(), 1);

        // Pressing again mid-air does not re-trigger the cue
        let events = advance(&mut state, TickInput::press());
        assert!(!events.contains(&GameEvent::Jump));
    }

    #[test]
    fn test_variable_jump_height() {
        let mut full = new_state();
        start_run(&mut full);
        let mut short = full.clone();
        let start_y = full.body.y;

        advance(&mut full, TickInput::press());
        advance(&mut short, TickInput::press());
        advance(&mut short, TickInput::release());

        let mut full_peak = start_y;
        let mut short_peak = start_y;
        for _ in 0..40 {
            advance(&mut full, TickInput::default());
            advance(&mut short, TickInput::default());
            full_peak = full_peak.min(full.body.y);
            short_peak = short_peak.min(short.body.y);
        }
        assert!(full_peak < short_peak);
    }

    #[test]
    fn test_landing_snaps_and_grounds() {
        let mut state = new_state();
        advance(&mut state, TickInput::press());
        let mut landed = false;
        for _ in 0..60 {
            let events = advance(&mut state, TickInput::default());
            if events.contains(&GameEvent::Landed) {
                landed = true;
                assert!(!state.body.floating);
                assert_eq!(state.body.speed_y, Fixed::ZERO);
                assert_eq!(state.body.rising_frames, 0);
                assert_eq!(state.body.y.raw() % state.params().tile.raw(), 0);
                break;
            }
        }
        assert!(landed);
    }

    #[test]
    fn test_wall_stop() {
        let mut state = new_state();
        start_run(&mut state);
        state.scroll_x = Fixed::ZERO;
        state.body.speed_x = Fixed::from_px(2);
        let feet_row = (state.body.y.floor() / 16) + 1;
        // Wall one column ahead of the character (x=64 -> column 4)
        state.map.set(5, feet_row, TILE_GROUND);

        let events = advance(&mut state, TickInput::default());
        assert!(events.contains(&GameEvent::WallHit));
        assert_eq!(state.body.speed_x, Fixed::ZERO);
        // Leading edge at the wall's left edge
        let leading_edge = (state.params().character_x + state.scroll_x).floor() + 16;
        assert_eq!(leading_edge, 5 * 16);
        assert_eq!(state.scroll_x, Fixed::ZERO);
    }

    #[test]
    fn test_wall_snap_lands_on_tile_boundary_before_wrap() {
        let mut state = new_state();
        start_run(&mut state);
        state.scroll_x = Fixed::from_px(15);
        state.body.speed_x = Fixed::from_px(2);
        let top_row = state.body.y.floor() / 16;
        // Scroll crosses into the next tile, so the probe reaches column 6
        state.map.set(6, top_row + 1, TILE_GROUND);
        // Keep solid ground under the character once the grid shifts
        state.map.set(4, top_row + 2, TILE_GROUND);
        state.map.set(5, top_row + 2, TILE_GROUND);
        let shifted = state.map.columns_shifted();

        let events = advance(&mut state, TickInput::default());
        assert!(events.contains(&GameEvent::WallHit));
        assert_eq!(state.body.speed_x, Fixed::ZERO);
        // Snapped to 16px, which the wrap turns into one column shift
        assert_eq!(state.scroll_x, Fixed::ZERO);
        assert_eq!(state.map.columns_shifted(), shifted + 1);
        assert!(state.map.is_solid_at(5, top_row + 1));
        assert_eq!(state.mode, Mode::Playing);
    }

    #[test]
    fn test_fast_run_shifts_several_columns_in_one_tick() {
        let mut settings = Settings::default();
        settings.physics.max_run_speed = 40.0;
        let mut state = GameState::new(settings).unwrap();
        start_run(&mut state);
        state.map.fill_flat(state.terrain.title_ground_height());
        state.scroll_x = Fixed::from_px(10);
        state.body.speed_x = Fixed::from_px(40);
        let shifted = state.map.columns_shifted();

        let events = advance(&mut state, TickInput::default());
        assert!(!events.contains(&GameEvent::WallHit));
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.body.speed_x, Fixed::from_px(40));
        // 10px + 40px = 3 tiles and 2px
        assert_eq!(state.map.columns_shifted(), shifted + 3);
        assert_eq!(state.scroll_x, Fixed::from_px(2));
    }

    #[test]
    fn test_press_and_release_same_frame_jumps_full_height() {
        let mut held = new_state();
        start_run(&mut held);
        let mut tapped = held.clone();

        advance(&mut held, TickInput::press());
        let both = TickInput {
            jump_pressed: true,
            jump_released: true,
            ..Default::default()
        };
        let events = advance(&mut tapped, both);
        assert!(events.contains(&GameEvent::Jump));
        assert_eq!(tapped.body.rising_frames, held.body.rising_frames);

        for _ in 0..40 {
            advance(&mut held, TickInput::default());
            advance(&mut tapped, TickInput::default());
            assert_eq!(tapped.body.y, held.body.y);
        }
    }

    #[test]
    fn test_fall_off_to_game_over_and_back() {
        let mut state = new_state();
        start_run(&mut state);

        // Drop the character toward the bottom over open air
        let rows = state.map.rows() as i32;
        state.map.fill_flat(rows);
        state.body.y = Fixed::from_px(170);
        state.body.floating = true;
        let mut changes = Vec::new();
        for _ in 0..10 {
            let events = advance(&mut state, TickInput::default());
            changes.extend(mode_changes(&events));
        }
        assert_eq!(changes, vec![(Mode::Playing, Mode::GameOver)]);
        assert_eq!(state.mode, Mode::GameOver);
        assert_eq!(state.body.speed_x, Fixed::ZERO);

        for _ in 0..30 {
            advance(&mut state, TickInput::default());
            assert_eq!(state.mode, Mode::GameOver);
            assert_eq!(state.body.speed_x, Fixed::ZERO);
        }

        let events = advance(&mut state, TickInput::press());
        assert_eq!(mode_changes(&events), vec![(Mode::GameOver, Mode::Title)]);

        // Full reset
        let fresh = new_state();
        assert_eq!(state.mode, Mode::Title);
        assert_eq!(state.map.tiles(), fresh.map.tiles());
        assert_eq!(state.terrain.cursor(), fresh.terrain.cursor());
        assert_eq!(state.scroll_x, Fixed::ZERO);
        assert_eq!(state.body, CharacterBody::new(state.params()));
    }

    #[test]
    fn test_game_over_ignores_release() {
        let mut state = new_state();
        start_run(&mut state);
        state.enter_game_over();
        advance(&mut state, TickInput::release());
        assert_eq!(state.mode, Mode::GameOver);
    }

    #[test]
    fn test_cancel_aborts_without_simulating() {
        let mut state = new_state();
        advance(&mut state, TickInput::default());
        let before_frame = state.frame;
        let before_scroll = state.scroll_x;

        let outcome = tick(&mut state, &TickInput::cancel());
        assert!(outcome.is_aborted());
        assert!(outcome.events().is_empty());
        assert_eq!(state.frame, before_frame);
        assert_eq!(state.scroll_x, before_scroll);

        // Cancel wins over a simultaneous press
        let input = TickInput {
            jump_pressed: true,
            cancel: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input), TickOutcome::Aborted);
        assert_eq!(state.mode, Mode::Title);
    }

    #[test]
    fn test_determinism() {
        // Same settings, same input edges: identical runs
        let script: Vec<TickInput> = (0..1500)
            .map(|i| match i % 47 {
                0 => TickInput::press(),
                6 => TickInput::release(),
                _ => TickInput::default(),
            })
            .collect();

        let run = || {
            let mut state = new_state();
            let mut trajectory = Vec::with_capacity(script.len());
            for input in &script {
                let _ = tick(&mut state, input);
                trajectory.push((state.mode, state.body, state.scroll_x));
            }
            (trajectory, state.map.tiles().to_vec())
        };

        let (traj_a, tiles_a) = run();
        let (traj_b, tiles_b) = run();
        assert_eq!(traj_a, traj_b);
        assert_eq!(tiles_a, tiles_b);
        assert!(traj_a.iter().any(|(mode, _, _)| *mode == Mode::Playing));
    }

    #[test]
    fn test_replay_after_game_over_repeats_course() {
        // Each run starts from the same seed
        let mut state = new_state();
        let record = |state: &mut GameState| {
            advance(state, TickInput::press());
            let mut columns = Vec::new();
            for _ in 0..200 {
                let before = state.map.columns_shifted();
                advance(state, TickInput::default());
                if state.map.columns_shifted() != before {
                    columns.push(state.terrain.cursor());
                }
                if state.mode != Mode::Playing {
                    break;
                }
            }
            columns
        };

        let first = record(&mut state);
        state.enter_game_over();
        advance(&mut state, TickInput::press());
        assert_eq!(state.mode, Mode::Title);
        let second = record(&mut state);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_scroll_and_ground_invariants(
            presses in proptest::collection::vec(any::<(bool, bool)>(), 1..600)
        ) {
            let mut state = new_state();
            let tile = state.params().tile;
            for (pressed, released) in presses {
                let input = TickInput { jump_pressed: pressed, jump_released: released, cancel: false };
                let old_offset = state.scroll_x;
                let old_shifted = state.map.columns_shifted();
                let mode_before = state.mode;

                let outcome = tick(&mut state, &input);
                let wall_hit = outcome.events().contains(&GameEvent::WallHit);

                prop_assert!(state.scroll_x >= Fixed::ZERO && state.scroll_x < tile);
                if mode_before == state.mode && !wall_hit {
                    let delta = state.body.speed_x;
                    let expected = ((old_offset + delta).raw() / tile.raw()) as u64;
                    prop_assert_eq!(state.map.columns_shifted() - old_shifted, expected);
                }
                if state.mode == Mode::Playing {
                    let height = state.terrain.cursor().ground_height;
                    prop_assert!((4..=10).contains(&height));
                }
                if outcome.events().contains(&GameEvent::Landed) {
                    prop_assert!(!state.body.floating);
                    prop_assert_eq!(state.body.speed_y, Fixed::ZERO);
                }
            }
        }
    }
}
