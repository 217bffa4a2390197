//! Frame-to-tick accumulator
//!
//! Hosts render at whatever rate they get; the simulation only ever sees
//! `SIM_DT`. Leftover frame time carries over to the next frame.

use super::state::GameState;
use super::tick::{KeyState, tick};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::{GameError, GameResult};

/// Fixed-timestep driver for `tick`
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconsumed frame time (s)
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Drop any banked time, e.g. after resuming from pause
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Feed one frame's elapsed time and run as many ticks as it covers.
    ///
    /// Long frames are clamped and at most `MAX_SUBSTEPS` ticks run per call;
    /// anything beyond that is discarded. Returns the number of ticks run.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        input: &KeyState,
        frame_dt: f32,
    ) -> GameResult<u32> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return Err(GameError::InvalidTickInput(format!(
                "frame time must be finite and non-negative, got {frame_dt}"
            )));
        }

        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator %= SIM_DT;
        }

        Ok(substeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new("step", 640.0, 10_000.0, Vec2::ZERO)
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut state = state();
        let mut stepper = FixedStep::new();

        assert_eq!(stepper.advance(&mut state, &KeyState::default(), SIM_DT * 0.5).unwrap(), 0);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(stepper.advance(&mut state, &KeyState::default(), SIM_DT * 0.6).unwrap(), 1);
        assert_eq!(state.time_ticks, 1);
        assert!(stepper.pending() < SIM_DT);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut state = state();
        let mut stepper = FixedStep::new();

        let ran = stepper.advance(&mut state, &KeyState::default(), 5.0).unwrap();
        assert!(ran <= MAX_SUBSTEPS);
        assert_eq!(u64::from(ran), state.time_ticks);
        assert!(stepper.pending() < SIM_DT);
    }

    #[test]
    fn test_rejects_bad_frame_time() {
        let mut state = state();
        let mut stepper = FixedStep::new();
        assert!(stepper.advance(&mut state, &KeyState::default(), f32::NAN).is_err());
        assert!(stepper.advance(&mut state, &KeyState::default(), -1.0).is_err());
        assert_eq!(stepper.pending(), 0.0);
    }

    #[test]
    fn test_one_second_of_frames() {
        let mut state = state();
        let mut stepper = FixedStep::new();
        let mut total = 0;
        for _ in 0..100 {
            total += stepper.advance(&mut state, &KeyState::default(), 0.01).unwrap();
        }
        assert!((59..=60).contains(&total));
    }
}
