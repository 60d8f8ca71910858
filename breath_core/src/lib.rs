#![forbid(unsafe_code)]

//! Core pacing engine for guided breathing exercises.
//!
//! This crate provides:
//! - Domain types (phases, durations, exercise definitions)
//! - Catalog of built-in and configured exercises
//! - Phase scheduler (the breathing state machine)
//! - Progress calculator for the breathing circle
//! - Cancellable ticker and the engine facade tying them together

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod progress;
pub mod scheduler;
pub mod ticker;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::{Config, CustomExercise, DisplayConfig};
pub use progress::ProgressCalculator;
pub use scheduler::{PhaseScheduler, PhaseTransition, Session, TickOutcome};
pub use ticker::Ticker;
pub use engine::{format_clock, PacingEngine, SessionSnapshot, TickEvent, TickMode};
