//! Phase scheduler: the breathing state machine.
//!
//! A session moves through `Inhale -> [Hold1] -> Exhale -> [Hold2]` and back
//! to `Inhale`, one second per tick. Absent holds are skipped at the
//! transition point, so the machine never enters a zero-length phase and
//! `time_remaining` stays positive for as long as a session exists.
//!
//! Every `start`, `stop`, `reset` and `load` bumps a run generation. Tick
//! sources stamp their ticks with the generation they were scheduled under
//! and `advance_for` drops any tick whose stamp no longer matches.

use crate::{ExerciseDefinition, Phase, PhaseDurations};
use std::num::NonZeroU32;

/// Mutable run-time state of one in-progress or paused exercise
#[derive(Clone, Debug)]
pub struct Session {
    exercise: ExerciseDefinition,
    phase: Phase,
    time_remaining: u32,
    cycle_count: u64,
    total_elapsed: u64,
    is_active: bool,
}

impl Session {
    fn new(exercise: ExerciseDefinition) -> Self {
        let time_remaining = exercise.durations.inhale.get();
        Self {
            exercise,
            phase: Phase::Inhale,
            time_remaining,
            cycle_count: 0,
            total_elapsed: 0,
            is_active: false,
        }
    }

    fn reinitialize(&mut self) {
        self.phase = Phase::Inhale;
        self.time_remaining = self.exercise.durations.inhale.get();
        self.cycle_count = 0;
        self.total_elapsed = 0;
    }

    pub fn exercise(&self) -> &ExerciseDefinition {
        &self.exercise
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn total_elapsed(&self) -> u64 {
        self.total_elapsed
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// A phase change produced by a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    pub cycle_completed: bool,
}

/// Result of offering one tick to the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No active session, or the tick belongs to an earlier run
    Ignored,
    /// The tick was counted and the phase continues
    Counted,
    /// The tick ended the phase
    Transitioned(PhaseTransition),
}

impl TickOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, TickOutcome::Ignored)
    }

    pub fn transition(&self) -> Option<PhaseTransition> {
        match self {
            TickOutcome::Transitioned(t) => Some(*t),
            _ => None,
        }
    }
}

/// Phase that follows `phase`, its length, and whether the move closes a cycle
fn next_phase(phase: Phase, durations: &PhaseDurations) -> (Phase, NonZeroU32, bool) {
    match phase {
        Phase::Inhale => match durations.hold1 {
            Some(hold) => (Phase::Hold1, hold, false),
            None => (Phase::Exhale, durations.exhale, false),
        },
        Phase::Hold1 => (Phase::Exhale, durations.exhale, false),
        Phase::Exhale => match durations.hold2 {
            Some(hold) => (Phase::Hold2, hold, false),
            None => (Phase::Inhale, durations.inhale, true),
        },
        Phase::Hold2 => (Phase::Inhale, durations.inhale, true),
        Phase::Idle => unreachable!("a session never sits in the idle phase"),
    }
}

/// Owner of the single session and its run generation
#[derive(Debug, Default)]
pub struct PhaseScheduler {
    session: Option<Session>,
    generation: u64,
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current phase, `Idle` before any session exists
    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, Session::phase)
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_active)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Replace the session with a fresh, inactive one for `exercise`
    pub fn load(&mut self, exercise: &ExerciseDefinition) {
        self.session = Some(Session::new(exercise.clone()));
        self.bump_generation();
        tracing::debug!(
            "Loaded '{}' ({}), generation {}",
            exercise.id,
            exercise.pattern(),
            self.generation
        );
    }

    /// Start or resume a session.
    ///
    /// A different exercise (or no session) begins from the top of the
    /// inhale. The same exercise resumes with its counters intact, and is a
    /// no-op when already running.
    pub fn start(&mut self, exercise: &ExerciseDefinition) {
        match self.session.as_mut() {
            Some(session) if session.exercise == *exercise => {
                if session.is_active {
                    return;
                }
                session.is_active = true;
                tracing::info!(
                    "Resumed '{}' at {}s, cycle {}",
                    exercise.id,
                    session.total_elapsed,
                    session.cycle_count
                );
            }
            _ => {
                let mut session = Session::new(exercise.clone());
                session.is_active = true;
                self.session = Some(session);
                tracing::info!("Started '{}' ({})", exercise.id, exercise.pattern());
            }
        }
        self.bump_generation();
    }

    /// Pause: stop accepting ticks, keep the counters
    pub fn stop(&mut self) {
        if let Some(session) = self.session.as_mut().filter(|s| s.is_active) {
            session.is_active = false;
            tracing::info!(
                "Stopped '{}' at {}s, {} cycles",
                session.exercise.id,
                session.total_elapsed,
                session.cycle_count
            );
            self.bump_generation();
        }
    }

    /// Stop and rewind to the top of the inhale with zeroed counters
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.is_active = false;
            session.reinitialize();
            tracing::info!("Reset '{}'", session.exercise.id);
            self.bump_generation();
        }
    }

    /// Apply one tick under the current generation
    pub fn advance(&mut self) -> TickOutcome {
        self.advance_for(self.generation)
    }

    /// Apply one tick that was scheduled under `generation`
    pub fn advance_for(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale tick from generation {} (current {})",
                generation,
                self.generation
            );
            return TickOutcome::Ignored;
        }

        let Some(session) = self.session.as_mut().filter(|s| s.is_active) else {
            return TickOutcome::Ignored;
        };

        session.total_elapsed += 1;

        if session.time_remaining > 1 {
            session.time_remaining -= 1;
            return TickOutcome::Counted;
        }

        let from = session.phase;
        let (to, duration, cycle_completed) = next_phase(from, &session.exercise.durations);
        session.phase = to;
        session.time_remaining = duration.get();
        if cycle_completed {
            session.cycle_count += 1;
        }

        tracing::debug!(
            "{} -> {} ({}s), elapsed {}s, cycles {}",
            from,
            to,
            duration,
            session.total_elapsed,
            session.cycle_count
        );

        TickOutcome::Transitioned(PhaseTransition {
            from,
            to,
            cycle_completed,
        })
    }
}
