//! Per-frame simulation tick
//!
//! Order within a tick: the placement request (if any) is resolved first
//! against the position the previous tick produced, then the mover and the
//! camera advance against the same tower, then debris falls.

use super::state::{GameEvent, GamePhase, GameState, PlaceOutcome};

/// Fraction of the top block's extent within which the autoplayer drops
const AUTOPLAY_WINDOW: f32 = 0.5;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drop the active block (click/tap/space)
    pub place: bool,
    /// Idle/demo mode - the autoplayer drops blocks
    pub idle_mode: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> PlaceOutcome {
    let dt = dt.max(0.0);
    state.time_ticks += 1;

    let mut outcome = PlaceOutcome::Ignored;

    if state.phase == GamePhase::Playing {
        let wants_place = input.place || (input.idle_mode && autoplay_should_place(state, dt));
        if wants_place {
            outcome = state.place();
        }
    }

    if state.phase == GamePhase::Playing {
        let speed = state.speed;
        if let Some(active) = state.active.as_mut() {
            active.oscillate(dt, speed);
        }

        let stack_len = state.stack.len();
        if state.config.snap_camera {
            state.camera.snap(stack_len);
        } else {
            state.camera.follow(stack_len, state.config.camera_follow_rate, dt);
        }
    }

    // Debris keeps tumbling on the game over screen
    for id in state.debris.step(dt) {
        state.events.push(GameEvent::DebrisRemoved { id });
    }

    outcome
}

/// Drop when the mover is at its closest approach to the block beneath
fn autoplay_should_place(state: &GameState, dt: f32) -> bool {
    let (Some(active), Some(top)) = (state.active.as_ref(), state.top()) else {
        return false;
    };
    let axis = active.axis;
    let target = axis.get(top.position);
    let now = (axis.get(active.block.position) - target).abs();
    let next = (active.peek(dt, state.speed) - target).abs();

    now <= next && now < axis.get(top.size) * AUTOPLAY_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::Camera;

    /// Tick the fresh mover so its oscillation lands exactly on `offset`
    fn drive_mover_to(state: &mut GameState, offset: f32) {
        let move_time = (offset / MOVE_RANGE).asin() / OSCILLATION_FREQUENCY;
        let dt = move_time / state.speed;
        tick(state, &TickInput::default(), dt);
    }

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_tick_menu_is_idle() {
        let mut state = GameState::new(1);
        let input = TickInput {
            place: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input, SIM_DT), PlaceOutcome::Ignored);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.active.is_none());
        assert_eq!(state.camera, Camera::default());
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_place_at_one_succeeds() {
        let mut state = playing(12345);
        drive_mover_to(&mut state, 1.0);
        let x = state.active.unwrap().block.position.x;
        assert!((x - 1.0).abs() < 1e-4);

        let input = TickInput {
            place: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input, 0.0), PlaceOutcome::Placed { score: 1 });
        assert_eq!(state.stack.len(), 2);
        assert_eq!(state.score, 1);
        let debris = state.debris.iter().next().unwrap();
        assert!((debris.block.size.x - 1.0).abs() < 1e-4);
        assert!((state.stack[1].size.x - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_place_at_four_collapses() {
        let mut state = playing(12345);
        drive_mover_to(&mut state, 4.0);

        let input = TickInput {
            place: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input, 0.0), PlaceOutcome::Collapsed);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.stack.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_place_reads_previous_tick_position() {
        let mut state = playing(77);
        for _ in 0..7 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let landed = state.active.unwrap().block.position.x;

        let input = TickInput {
            place: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!((state.stack[1].position.x - landed / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_rises_after_placement() {
        let mut state = playing(3);
        let input = TickInput {
            place: true,
            ..Default::default()
        };
        state.active.as_mut().unwrap().block.position.x = 0.0;
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.camera.look_at.y, BLOCK_HEIGHT);

        let mut prev = state.camera.position.y;
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.camera.position.y >= prev);
            prev = state.camera.position.y;
        }
        assert!((prev - (CAMERA_START_POS.y + BLOCK_HEIGHT)).abs() < 0.01);
    }

    #[test]
    fn test_debris_falls_after_game_over() {
        let mut state = playing(5);
        drive_mover_to(&mut state, 1.0);
        let place = TickInput {
            place: true,
            ..Default::default()
        };
        tick(&mut state, &place, 0.0);
        drive_mover_to(&mut state, 4.5);
        tick(&mut state, &place, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let y0 = state.debris.iter().next().unwrap().block.position.y;
        tick(&mut state, &TickInput::default(), 0.5);
        let y1 = state.debris.iter().next().unwrap().block.position.y;
        assert!(y1 < y0);

        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.debris.is_empty());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::DebrisRemoved { .. }))
        );
    }

    #[test]
    fn test_idle_mode_builds_a_tower() {
        let mut state = playing(2024);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(120 * 20) {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.score >= 5, "autoplayer only reached {}", state.score);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start();
        state2.start();

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(120 * 10) {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.stack, state2.stack);
        assert_eq!(state1.debris.len(), state2.debris.len());
        for (a, b) in state1.debris.iter().zip(state2.debris.iter()) {
            assert_eq!(a.velocity, b.velocity);
            assert_eq!(a.block.position, b.block.position);
        }
    }
}
