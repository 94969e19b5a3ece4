//! Guided exercise state machines.
//!
//! Wall-clock countdowns with no internal threads -- the caller invokes
//! `tick()` periodically (or `advance()` with its own frame clock).
//! Cancelling abandons the run without touching engine state; progress is
//! only recorded when the caller explicitly completes the session through
//! the engine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Completed | Idle via cancel)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseState {
    Idle,
    Running,
    Completed,
}

/// Countdown for a timed mindfulness challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeTimer {
    duration_ms: u64,
    remaining_ms: u64,
    state: ExerciseState,
    /// Timestamp (ms since epoch) of the last tick while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl ChallengeTimer {
    pub fn new(duration_secs: u64) -> Self {
        let duration_ms = duration_secs * 1000;
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            state: ExerciseState::Idle,
            last_tick_epoch_ms: None,
        }
    }

    pub fn state(&self) -> ExerciseState {
        self.state
    }

    /// Whole seconds left, rounded up so the display never shows 0 early.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / self.duration_ms as f64)
    }

    /// Begin the countdown. Only valid from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.state != ExerciseState::Idle {
            return false;
        }
        self.state = ExerciseState::Running;
        self.last_tick_epoch_ms = Some(now_ms());
        true
    }

    /// Abandon the run and return to `Idle` with a full countdown.
    pub fn cancel(&mut self) {
        self.state = ExerciseState::Idle;
        self.remaining_ms = self.duration_ms;
        self.last_tick_epoch_ms = None;
    }

    /// Call periodically while running. Returns `true` on the tick that
    /// completes the countdown.
    pub fn tick(&mut self) -> bool {
        if self.state != ExerciseState::Running {
            return false;
        }
        let now = now_ms();
        let elapsed = now.saturating_sub(self.last_tick_epoch_ms.unwrap_or(now));
        self.last_tick_epoch_ms = Some(now);
        self.advance(elapsed)
    }

    /// Drive the countdown by an explicit delta (what `tick()` does with
    /// the wall clock). Returns `true` when the countdown completes.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        if self.state != ExerciseState::Running {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.state = ExerciseState::Completed;
            self.last_tick_epoch_ms = None;
            return true;
        }
        false
    }
}

/// Breathing phases for the mirror-work warmup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
    /// Short pause between cycles while the count is shown.
    Rest,
}

impl BreathPhase {
    pub fn duration_ms(self) -> u64 {
        match self {
            BreathPhase::Inhale => 4000,
            BreathPhase::Hold => 2000,
            BreathPhase::Exhale => 4000,
            BreathPhase::Rest => 1000,
        }
    }

    fn next(self) -> Option<BreathPhase> {
        match self {
            BreathPhase::Inhale => Some(BreathPhase::Hold),
            BreathPhase::Hold => Some(BreathPhase::Exhale),
            BreathPhase::Exhale => Some(BreathPhase::Rest),
            BreathPhase::Rest => None,
        }
    }
}

/// Breath cycles in one warmup.
pub const BREATH_CYCLES: u32 = 3;

/// The guided breathing sequence: inhale, hold, exhale, rest, three times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingExercise {
    state: ExerciseState,
    phase: BreathPhase,
    cycles_done: u32,
    phase_remaining_ms: u64,
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Default for BreathingExercise {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathingExercise {
    pub fn new() -> Self {
        Self {
            state: ExerciseState::Idle,
            phase: BreathPhase::Inhale,
            cycles_done: 0,
            phase_remaining_ms: BreathPhase::Inhale.duration_ms(),
            last_tick_epoch_ms: None,
        }
    }

    pub fn state(&self) -> ExerciseState {
        self.state
    }

    /// Current phase, for the breathing circle display.
    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn cycles_done(&self) -> u32 {
        self.cycles_done
    }

    /// Begin the sequence. Only valid from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.state != ExerciseState::Idle {
            return false;
        }
        self.state = ExerciseState::Running;
        self.last_tick_epoch_ms = Some(now_ms());
        true
    }

    /// Abandon the sequence and return to a fresh `Idle` state.
    pub fn cancel(&mut self) {
        *self = Self::new();
    }

    /// Call periodically while running. Returns `true` on the tick that
    /// finishes the final cycle.
    pub fn tick(&mut self) -> bool {
        if self.state != ExerciseState::Running {
            return false;
        }
        let now = now_ms();
        let elapsed = now.saturating_sub(self.last_tick_epoch_ms.unwrap_or(now));
        self.last_tick_epoch_ms = Some(now);
        self.advance(elapsed)
    }

    /// Drive the sequence by an explicit delta, crossing as many phase
    /// boundaries as the delta covers. Returns `true` when the final cycle
    /// completes.
    pub fn advance(&mut self, mut elapsed_ms: u64) -> bool {
        if self.state != ExerciseState::Running {
            return false;
        }
        loop {
            if elapsed_ms < self.phase_remaining_ms {
                self.phase_remaining_ms -= elapsed_ms;
                return false;
            }
            elapsed_ms -= self.phase_remaining_ms;

            match self.phase.next() {
                Some(next) => {
                    self.phase = next;
                    self.phase_remaining_ms = next.duration_ms();
                }
                None => {
                    self.cycles_done += 1;
                    if self.cycles_done >= BREATH_CYCLES {
                        self.state = ExerciseState::Completed;
                        self.last_tick_epoch_ms = None;
                        return true;
                    }
                    self.phase = BreathPhase::Inhale;
                    self.phase_remaining_ms = BreathPhase::Inhale.duration_ms();
                }
            }
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_counts_down_and_completes() {
        let mut timer = ChallengeTimer::new(60);
        assert_eq!(timer.state(), ExerciseState::Idle);
        assert!(timer.start());

        assert!(!timer.advance(59_000));
        assert_eq!(timer.remaining_secs(), 1);
        assert!(timer.advance(1_000));
        assert_eq!(timer.state(), ExerciseState::Completed);
    }

    #[test]
    fn timer_start_only_from_idle() {
        let mut timer = ChallengeTimer::new(10);
        assert!(timer.start());
        assert!(!timer.start());
    }

    #[test]
    fn cancel_resets_timer_without_completing() {
        let mut timer = ChallengeTimer::new(30);
        timer.start();
        timer.advance(10_000);
        timer.cancel();
        assert_eq!(timer.state(), ExerciseState::Idle);
        assert_eq!(timer.remaining_secs(), 30);
    }

    #[test]
    fn completed_timer_ignores_further_advances() {
        let mut timer = ChallengeTimer::new(1);
        timer.start();
        assert!(timer.advance(1_000));
        assert!(!timer.advance(1_000));
        assert_eq!(timer.state(), ExerciseState::Completed);
    }

    #[test]
    fn breathing_walks_through_phases() {
        let mut exercise = BreathingExercise::new();
        exercise.start();
        assert_eq!(exercise.phase(), BreathPhase::Inhale);

        assert!(!exercise.advance(4_000));
        assert_eq!(exercise.phase(), BreathPhase::Hold);
        assert!(!exercise.advance(2_000));
        assert_eq!(exercise.phase(), BreathPhase::Exhale);
        assert!(!exercise.advance(4_000));
        assert_eq!(exercise.phase(), BreathPhase::Rest);
        assert!(!exercise.advance(1_000));
        assert_eq!(exercise.phase(), BreathPhase::Inhale);
        assert_eq!(exercise.cycles_done(), 1);
    }

    #[test]
    fn breathing_completes_after_three_cycles() {
        let mut exercise = BreathingExercise::new();
        exercise.start();
        // One cycle is 4 + 2 + 4 + 1 = 11 seconds.
        assert!(!exercise.advance(11_000));
        assert!(!exercise.advance(11_000));
        assert!(exercise.advance(11_000));
        assert_eq!(exercise.state(), ExerciseState::Completed);
        assert_eq!(exercise.cycles_done(), BREATH_CYCLES);
    }

    #[test]
    fn one_large_delta_crosses_many_phases() {
        let mut exercise = BreathingExercise::new();
        exercise.start();
        assert!(exercise.advance(33_000));
        assert_eq!(exercise.state(), ExerciseState::Completed);
    }

    #[test]
    fn cancel_abandons_mid_cycle() {
        let mut exercise = BreathingExercise::new();
        exercise.start();
        exercise.advance(5_000);
        exercise.cancel();
        assert_eq!(exercise.state(), ExerciseState::Idle);
        assert_eq!(exercise.phase(), BreathPhase::Inhale);
        assert_eq!(exercise.cycles_done(), 0);
    }
}
