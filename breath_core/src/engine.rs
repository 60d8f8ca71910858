//! Pacing engine: the public surface front ends drive.
//!
//! The engine owns the catalog, the single scheduler and the ticker. Ticks
//! never touch the session directly: the ticker thread only pushes a
//! generation-stamped [`TickEvent`] into a channel, and the engine applies
//! queued events in order when the owner calls [`PacingEngine::pump`] or
//! [`PacingEngine::wait_for_tick`].
//!
//! `stop`, `reset` and `select_exercise` cancel the ticker before touching
//! the scheduler, and each of them moves the scheduler to a new generation,
//! so a tick queued under an earlier run is dropped instead of being applied
//! to the new session.

use crate::{
    build_default_catalog, Catalog, CategoryFilter, Config, Error, ExerciseDefinition, Phase,
    PhaseScheduler, ProgressCalculator, Result, TickOutcome, Ticker,
};
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// One tick, stamped with the scheduler generation it was scheduled under
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEvent {
    pub generation: u64,
}

/// How ticks reach the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickMode {
    /// A background ticker firing at the given interval
    Timer(Duration),
    /// Ticks are applied only through [`PacingEngine::tick`]
    Manual,
}

/// Read-only view of the session for presentation
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SessionSnapshot {
    pub exercise_id: Option<String>,
    pub phase: Phase,
    pub time_remaining: u32,
    pub cycle_count: u64,
    pub total_elapsed: u64,
    pub is_active: bool,
    pub visual_size: f64,
    pub instruction: &'static str,
}

/// Format whole seconds as `mm:ss`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub struct PacingEngine {
    catalog: Catalog,
    progress: ProgressCalculator,
    scheduler: PhaseScheduler,
    ticker: Option<Ticker>,
    tick_tx: Sender<TickEvent>,
    tick_rx: Receiver<TickEvent>,
}

impl PacingEngine {
    pub fn new(catalog: Catalog, progress: ProgressCalculator, mode: TickMode) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        let ticker = match mode {
            TickMode::Timer(interval) => Some(Ticker::new(interval)),
            TickMode::Manual => None,
        };

        Self {
            catalog,
            progress,
            scheduler: PhaseScheduler::new(),
            ticker,
            tick_tx,
            tick_rx,
        }
    }

    /// Build an engine from configuration with a background ticker
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_mode(config, TickMode::Timer(config.ticker.interval()))
    }

    /// Build an engine from configuration that only advances on [`tick`](Self::tick)
    pub fn manual_from_config(config: &Config) -> Result<Self> {
        Self::with_mode(config, TickMode::Manual)
    }

    fn with_mode(config: &Config, mode: TickMode) -> Result<Self> {
        config.validate()?;

        let mut catalog = build_default_catalog();
        let rejected = catalog.add_custom(&config.exercises.custom);
        if !rejected.is_empty() {
            tracing::warn!("{} custom exercise(s) were rejected", rejected.len());
        }
        catalog.ensure_valid()?;

        let progress = ProgressCalculator::from_config(&config.display)?;
        Ok(Self::new(catalog, progress, mode))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressCalculator {
        &self.progress
    }

    pub fn list_exercises(&self, filter: Option<&CategoryFilter>) -> Vec<&ExerciseDefinition> {
        self.catalog
            .by_category(filter.unwrap_or(&CategoryFilter::All))
    }

    /// Make `id` the current exercise, resetting the session against it.
    ///
    /// Any running ticker is cancelled first.
    pub fn select_exercise(&mut self, id: &str) -> Result<SessionSnapshot> {
        let exercise = self.catalog.find(id)?.clone();

        self.cancel_ticker();
        self.scheduler.load(&exercise);
        tracing::info!("Selected '{}' ({})", exercise.id, exercise.pattern());

        Ok(self.snapshot())
    }

    /// Start or resume the current exercise.
    ///
    /// Starting a running session is a no-op.
    pub fn start(&mut self) -> Result<()> {
        let exercise = self
            .scheduler
            .session()
            .ok_or(Error::NoExerciseSelected)?
            .exercise()
            .clone();

        if self.scheduler.is_active() {
            return Ok(());
        }

        self.cancel_ticker();
        self.scheduler.start(&exercise);

        let generation = self.scheduler.generation();
        if let Some(ticker) = self.ticker.as_mut() {
            let tx = self.tick_tx.clone();
            let begun = ticker.begin(move || {
                // The receiver lives as long as the engine
                let _ = tx.send(TickEvent { generation });
            });
            if let Err(e) = begun {
                self.scheduler.stop();
                return Err(e);
            }
        }

        Ok(())
    }

    /// Pause the session, keeping its counters
    pub fn stop(&mut self) {
        self.cancel_ticker();
        self.scheduler.stop();
    }

    /// Stop and rewind the session to its initial state
    pub fn reset(&mut self) {
        self.cancel_ticker();
        self.scheduler.reset();
    }

    /// Apply one tick synchronously
    pub fn tick(&mut self) -> TickOutcome {
        self.scheduler.advance()
    }

    /// Apply every queued tick without blocking, returning the accepted ones
    pub fn pump(&mut self) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.tick_rx.try_recv() {
            let outcome = self.scheduler.advance_for(event.generation);
            if outcome.is_accepted() {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Wait up to `timeout` for the next queued tick and apply it.
    ///
    /// Returns None when no tick arrived in time.
    pub fn wait_for_tick(&mut self, timeout: Duration) -> Option<TickOutcome> {
        let event = self.tick_rx.recv_timeout(timeout).ok()?;
        Some(self.scheduler.advance_for(event.generation))
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn current_exercise(&self) -> Option<&ExerciseDefinition> {
        self.scheduler.session().map(|s| s.exercise())
    }

    /// Size of the breathing circle for the current state
    pub fn visual_size(&self) -> f64 {
        match self.scheduler.session() {
            Some(s) => self.progress.size(s.phase(), s.time_remaining(), s.exercise()),
            None => self.progress.min_size(),
        }
    }

    /// Instruction copy; a session that is not running asks the user to start
    pub fn instruction(&self) -> &'static str {
        if self.scheduler.is_active() {
            self.scheduler.phase().instruction()
        } else {
            Phase::Idle.instruction()
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let visual_size = self.visual_size();
        let instruction = self.instruction();

        match self.scheduler.session() {
            Some(s) => SessionSnapshot {
                exercise_id: Some(s.exercise().id.clone()),
                phase: s.phase(),
                time_remaining: s.time_remaining(),
                cycle_count: s.cycle_count(),
                total_elapsed: s.total_elapsed(),
                is_active: s.is_active(),
                visual_size,
                instruction,
            },
            None => SessionSnapshot {
                exercise_id: None,
                phase: Phase::Idle,
                time_remaining: 0,
                cycle_count: 0,
                total_elapsed: 0,
                is_active: false,
                visual_size,
                instruction,
            },
        }
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.cancel();
        }
    }
}
