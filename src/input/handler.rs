//! DAS/ARR input handler for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! a key with no press refresh within the timeout window is treated as
//! released. Resolves raw key events into the per-tick triggered/active/held
//! queries the engine consumes.

use crate::core::InputSource;
use crate::types::{Action, DAS_DELAY_MS, DAS_INTERVAL_MS};

// In terminals without key-release events, a short timeout prevents a single
// tap from turning into a sustained "held" state.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Per-action key state and repeat timers
#[derive(Debug, Clone, Copy, Default)]
struct ActionState {
    held: bool,
    /// Press seen since the last tick, not yet surfaced
    pending_press: bool,
    /// Surfaced as `just_triggered` for exactly one tick
    triggered: bool,
    /// An auto-repeat pulse fired this tick
    repeat_fired: bool,
    das_timer_ms: u32,
    arr_accum_ms: u32,
    /// Milliseconds since the last press refresh (for auto-release)
    since_refresh_ms: u32,
}

impl ActionState {
    fn release(&mut self) {
        self.held = false;
        self.das_timer_ms = 0;
        self.arr_accum_ms = 0;
        self.since_refresh_ms = 0;
    }
}

/// Tracks input state for DAS/ARR handling
#[derive(Debug, Clone)]
pub struct InputHandler {
    states: [ActionState; Action::COUNT],
    das_delay_ms: u32,
    arr_interval_ms: u32,
    key_release_timeout_ms: u32,
}

/// Only lateral movement auto-repeats; soft drop is read as raw held state
/// and everything else fires once per press.
fn is_repeatable(action: Action) -> bool {
    matches!(action, Action::MoveLeft | Action::MoveRight)
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DAS_DELAY_MS, DAS_INTERVAL_MS)
    }

    pub fn with_config(das_delay_ms: u32, arr_interval_ms: u32) -> Self {
        Self {
            states: [ActionState::default(); Action::COUNT],
            das_delay_ms,
            arr_interval_ms,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    /// Record a press event. Terminal auto-repeat presses refresh the
    /// auto-release window but do not re-trigger.
    pub fn key_press(&mut self, action: Action) {
        let state = &mut self.states[action.index()];
        state.since_refresh_ms = 0;
        if !state.held {
            state.held = true;
            state.pending_press = true;
            state.das_timer_ms = 0;
            state.arr_accum_ms = 0;
        }
    }

    /// Record a release event (terminals that emit them)
    pub fn key_release(&mut self, action: Action) {
        self.states[action.index()].release();
    }

    /// Advance timers by one tick. Surfaces pending presses as triggers,
    /// fires at most one auto-repeat pulse per repeatable action, and
    /// auto-releases keys whose press events went stale.
    pub fn tick(&mut self, elapsed_ms: u32) {
        for (i, state) in self.states.iter_mut().enumerate() {
            state.triggered = std::mem::take(&mut state.pending_press);
            state.repeat_fired = false;

            if !state.held {
                continue;
            }

            state.since_refresh_ms += elapsed_ms;
            if state.since_refresh_ms > self.key_release_timeout_ms {
                state.release();
                continue;
            }

            if !is_repeatable(Action::ALL[i]) {
                continue;
            }

            let prev_das = state.das_timer_ms;
            state.das_timer_ms += elapsed_ms;
            if state.das_timer_ms >= self.das_delay_ms {
                let excess = if prev_das < self.das_delay_ms {
                    state.das_timer_ms - self.das_delay_ms
                } else {
                    elapsed_ms
                };
                state.arr_accum_ms += excess;
                if state.arr_accum_ms >= self.arr_interval_ms {
                    state.repeat_fired = true;
                    state.arr_accum_ms -= self.arr_interval_ms;
                }
            }
        }
    }

    /// Drop all held state and timers (used across pause/restart boundaries)
    pub fn reset(&mut self) {
        self.states = [ActionState::default(); Action::COUNT];
    }
}

impl InputSource for InputHandler {
    fn just_triggered(&self, action: Action) -> bool {
        self.states[action.index()].triggered
    }

    fn is_active(&self, action: Action) -> bool {
        let state = &self.states[action.index()];
        state.triggered || state.repeat_fired
    }

    fn is_held(&self, action: Action) -> bool {
        self.states[action.index()].held
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
