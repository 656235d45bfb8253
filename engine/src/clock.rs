//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Fixed-timestep simulation clock
//!
//! The host calls [`FixedTimestep::on_frame`] from its animation or timer
//! callback with the current real time. Elapsed real time is accumulated and
//! consumed in constant `fixed_step_ms` quanta, so the simulation advances
//! deterministically regardless of display frame rate. Elapsed time per frame
//! is clamped to `max_frame_delta_ms` so a stall (backgrounded tab, debugger
//! pause) does not trigger an unbounded catch-up.

use crate::config::SimulationConfig;
use crate::error::{SimError, panic_message};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Smallest step the clock accepts, guarding against a zero step spinning forever
const MIN_STEP_MS: f64 = 0.001;

/// Lifecycle of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
    /// An update fault stopped the loop; `start` must be called to resume
    Faulted,
}

/// What a single `on_frame` call did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Fixed steps executed this frame (0, 1, or several)
    pub steps: u32,
    /// Real time credited this frame after clamping
    pub delta_ms: f64,
    /// Whether the real elapsed time exceeded the clamp
    pub clamped: bool,
    /// Leftover accumulator as a fraction of one step, for render interpolation
    pub alpha: f64,
}

/// Accumulator-based fixed-timestep loop
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    fixed_step_ms: f64,
    max_frame_delta_ms: f64,
    accumulator_ms: f64,
    last_time_ms: Option<f64>,
    state: ClockState,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create a stopped clock
    pub fn new(fixed_step_ms: f64, max_frame_delta_ms: f64) -> Self {
        let fixed_step_ms = fixed_step_ms.max(MIN_STEP_MS);
        Self {
            fixed_step_ms,
            max_frame_delta_ms: max_frame_delta_ms.max(fixed_step_ms),
            accumulator_ms: 0.0,
            last_time_ms: None,
            state: ClockState::Stopped,
            total_steps: 0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.fixed_step_ms, config.max_frame_delta_ms)
    }

    /// Start (or restart after a fault) with `now_ms` as the reference time
    pub fn start(&mut self, now_ms: f64) {
        if self.state == ClockState::Faulted {
            tracing::info!("Restarting simulation clock after fault");
        }
        self.state = ClockState::Running;
        self.last_time_ms = Some(now_ms);
        self.accumulator_ms = 0.0;
    }

    /// Stop the loop; pending accumulated time is discarded
    pub fn stop(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Stopped;
        }
        self.last_time_ms = None;
        self.accumulator_ms = 0.0;
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn fixed_step_ms(&self) -> f64 {
        self.fixed_step_ms
    }

    pub fn max_frame_delta_ms(&self) -> f64 {
        self.max_frame_delta_ms
    }

    /// Total fixed steps executed since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Leftover accumulator as a fraction of one step
    pub fn alpha(&self) -> f64 {
        self.accumulator_ms / self.fixed_step_ms
    }

    /// Advance by the real time elapsed since the previous frame
    ///
    /// `step` is invoked once per fixed step with the step length in
    /// milliseconds. If it returns an error or panics, the clock transitions
    /// to [`ClockState::Faulted`] and the fault is returned; no further steps
    /// run until the host restarts the clock.
    pub fn on_frame<F>(&mut self, now_ms: f64, mut step: F) -> Result<FrameStats, SimError>
    where
        F: FnMut(f64) -> Result<(), SimError>,
    {
        if self.state != ClockState::Running {
            return Err(SimError::LoopNotRunning);
        }

        let last = self.last_time_ms.unwrap_or(now_ms);
        self.last_time_ms = Some(now_ms);

        // A host clock running backwards credits nothing
        let elapsed = (now_ms - last).max(0.0);
        let clamped = elapsed > self.max_frame_delta_ms;
        let delta_ms = elapsed.min(self.max_frame_delta_ms);
        if clamped {
            tracing::debug!(
                "Frame delta of {:.1}ms clamped to {:.1}ms",
                elapsed,
                self.max_frame_delta_ms
            );
        }

        self.accumulator_ms += delta_ms;

        let mut steps = 0;
        while self.accumulator_ms >= self.fixed_step_ms {
            let fixed_step_ms = self.fixed_step_ms;
            let outcome = catch_unwind(AssertUnwindSafe(|| step(fixed_step_ms)));
            let fault = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            if let Some(reason) = fault {
                tracing::error!("Fixed-step update faulted, stopping loop: {}", reason);
                self.state = ClockState::Faulted;
                self.accumulator_ms = 0.0;
                self.last_time_ms = None;
                return Err(SimError::LoopFault(reason));
            }
            self.accumulator_ms -= fixed_step_ms;
            self.total_steps += 1;
            steps += 1;
        }

        Ok(FrameStats {
            steps,
            delta_ms,
            clamped,
            alpha: self.alpha(),
        })
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_steps(clock: &mut FixedTimestep, now_ms: f64) -> u32 {
        let mut calls = 0;
        let stats = clock
            .on_frame(now_ms, |_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(stats.steps, calls);
        calls
    }

    #[test]
    fn test_not_running_rejects_frames() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        let result = clock.on_frame(5.0, |_| Ok(()));
        assert!(matches!(result, Err(SimError::LoopNotRunning)));
    }

    #[test]
    fn test_accumulates_partial_steps() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(0.0);

        assert_eq!(count_steps(&mut clock, 4.0), 0);
        assert_eq!(count_steps(&mut clock, 8.0), 0);
        // 12ms accumulated
        assert_eq!(count_steps(&mut clock, 12.0), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-9);
        assert_eq!(count_steps(&mut clock, 40.0), 3);
    }

    #[test]
    fn test_steps_receive_fixed_quantum() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(0.0);

        let mut seen = Vec::new();
        clock
            .on_frame(35.0, |dt| {
                seen.push(dt);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(0.0);

        let stats = clock.on_frame(5000.0, |_| Ok(())).unwrap();
        assert!(stats.clamped);
        assert_eq!(stats.delta_ms, 100.0);
        assert_eq!(stats.steps, 10);
    }

    #[test]
    fn test_error_faults_loop() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(0.0);

        let mut calls = 0;
        let result = clock.on_frame(50.0, |_| {
            calls += 1;
            if calls == 2 {
                Err(SimError::SystemsNotInitialized)
            } else {
                Ok(())
            }
        });

        assert!(matches!(result, Err(SimError::LoopFault(_))));
        assert_eq!(calls, 2);
        assert_eq!(clock.state(), ClockState::Faulted);
        assert_eq!(clock.total_steps(), 1);

        // No further ticks until restarted
        assert!(matches!(
            clock.on_frame(60.0, |_| Ok(())),
            Err(SimError::LoopNotRunning)
        ));

        clock.start(100.0);
        assert_eq!(count_steps(&mut clock, 120.0), 2);
    }

    #[test]
    fn test_panic_faults_loop() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(0.0);

        let result = clock.on_frame(20.0, |_| panic!("scheduler exploded"));
        match result {
            Err(SimError::LoopFault(reason)) => assert!(reason.contains("scheduler exploded")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(clock.state(), ClockState::Faulted);
    }

    #[test]
    fn test_stop_discards_accumulator() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(0.0);
        assert_eq!(count_steps(&mut clock, 9.0), 0);

        clock.stop();
        assert_eq!(clock.state(), ClockState::Stopped);

        clock.start(100.0);
        assert_eq!(count_steps(&mut clock, 102.0), 0);
    }

    #[test]
    fn test_backwards_time_credits_nothing() {
        let mut clock = FixedTimestep::new(10.0, 100.0);
        clock.start(50.0);
        assert_eq!(count_steps(&mut clock, 20.0), 0);
        assert_eq!(count_steps(&mut clock, 30.0), 1);
    }
}
