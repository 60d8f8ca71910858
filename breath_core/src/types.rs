//! Core domain types for the breathing pacing engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise categories and filters
//! - Breath phases and their instruction copy
//! - Phase durations with optional holds
//! - Exercise definitions and the catalog container

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

// ============================================================================
// Categories
// ============================================================================

/// Category tag of a breathing exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Calm,
    Energize,
    Focus,
    Sleep,
    Balance,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Calm,
        Category::Focus,
        Category::Sleep,
        Category::Energize,
        Category::Balance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Calm => "calm",
            Category::Energize => "energize",
            Category::Focus => "focus",
            Category::Sleep => "sleep",
            Category::Balance => "balance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::NotFound(format!("category '{}'", s)))
    }
}

/// Filter used when listing the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

// ============================================================================
// Phases
// ============================================================================

/// State of the pacing state machine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session has been set up yet
    Idle,
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl Phase {
    /// Instruction copy shown to the user for this phase
    pub fn instruction(&self) -> &'static str {
        match self {
            Phase::Idle => "Press start to begin",
            Phase::Inhale => "Breathe in...",
            Phase::Hold1 | Phase::Hold2 => "Hold...",
            Phase::Exhale => "Breathe out...",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Inhale => "inhale",
            Phase::Hold1 => "hold",
            Phase::Exhale => "exhale",
            Phase::Hold2 => "hold",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Durations
// ============================================================================

/// Phase lengths of one breathing cycle, in whole seconds.
///
/// Inhale and exhale are always present. A hold is either absent or strictly
/// positive; a zero hold is normalised to absent on construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseDurations {
    pub inhale: NonZeroU32,
    pub hold1: Option<NonZeroU32>,
    pub exhale: NonZeroU32,
    pub hold2: Option<NonZeroU32>,
}

impl PhaseDurations {
    /// Build durations from raw seconds, rejecting a zero inhale or exhale
    pub fn from_seconds(
        inhale: u32,
        hold1: Option<u32>,
        exhale: u32,
        hold2: Option<u32>,
    ) -> std::result::Result<Self, String> {
        let inhale = NonZeroU32::new(inhale).ok_or("inhale must be greater than zero")?;
        let exhale = NonZeroU32::new(exhale).ok_or("exhale must be greater than zero")?;

        Ok(Self {
            inhale,
            hold1: hold1.and_then(NonZeroU32::new),
            exhale,
            hold2: hold2.and_then(NonZeroU32::new),
        })
    }

    /// Length of `phase` in seconds, or None for an absent hold and for Idle
    pub fn duration_of(&self, phase: Phase) -> Option<NonZeroU32> {
        match phase {
            Phase::Idle => None,
            Phase::Inhale => Some(self.inhale),
            Phase::Hold1 => self.hold1,
            Phase::Exhale => Some(self.exhale),
            Phase::Hold2 => self.hold2,
        }
    }

    /// Number of ticks in one full cycle
    pub fn cycle_seconds(&self) -> u32 {
        self.inhale.get()
            + self.hold1.map_or(0, NonZeroU32::get)
            + self.exhale.get()
            + self.hold2.map_or(0, NonZeroU32::get)
    }

    /// Compact `inhale-hold-exhale-hold` label, absent holds shown as 0
    pub fn pattern(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.inhale,
            self.hold1.map_or(0, NonZeroU32::get),
            self.exhale,
            self.hold2.map_or(0, NonZeroU32::get)
        )
    }
}

// ============================================================================
// Exercise Definition
// ============================================================================

/// An immutable breathing exercise definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub category: Category,
    pub durations: PhaseDurations,
    /// Suggested session length; informational, never enforced by the scheduler
    pub recommended_minutes: u32,
}

impl ExerciseDefinition {
    /// Validate raw timings and build a definition.
    ///
    /// Returns `Error::InvalidDefinition` when the id or name is empty, the
    /// inhale/exhale duration is zero, or the recommended duration is zero.
    pub fn new<B>(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        (inhale, hold1, exhale, hold2): (u32, Option<u32>, u32, Option<u32>),
        recommended_minutes: u32,
        benefits: B,
    ) -> Result<Self>
    where
        B: IntoIterator,
        B::Item: Into<String>,
    {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(Error::InvalidDefinition {
                id,
                reason: "id is empty".into(),
            });
        }
        if name.trim().is_empty() {
            return Err(Error::InvalidDefinition {
                id,
                reason: "name is empty".into(),
            });
        }
        if recommended_minutes == 0 {
            return Err(Error::InvalidDefinition {
                id,
                reason: "recommended duration must be at least one minute".into(),
            });
        }

        let durations = PhaseDurations::from_seconds(inhale, hold1, exhale, hold2)
            .map_err(|reason| Error::InvalidDefinition {
                id: id.clone(),
                reason,
            })?;

        Ok(Self {
            id,
            name,
            description: description.into(),
            benefits: benefits.into_iter().map(Into::into).collect(),
            category,
            durations,
            recommended_minutes,
        })
    }

    pub fn cycle_seconds(&self) -> u32 {
        self.durations.cycle_seconds()
    }

    pub fn pattern(&self) -> String {
        self.durations.pattern()
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The registry of exercise definitions, kept in a stable order
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: Vec<ExerciseDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hold_is_absent() {
        let d = PhaseDurations::from_seconds(4, Some(0), 4, Some(0)).unwrap();
        assert_eq!(d.hold1, None);
        assert_eq!(d.hold2, None);
        assert_eq!(d.cycle_seconds(), 8);
        assert_eq!(d.pattern(), "4-0-4-0");
    }

    #[test]
    fn test_zero_inhale_rejected() {
        let err = ExerciseDefinition::new(
            "broken",
            "Broken",
            "",
            Category::Calm,
            (0, None, 4, None),
            3,
            Vec::<String>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { ref id, .. } if id == "broken"));
    }

    #[test]
    fn test_zero_exhale_rejected() {
        let result = PhaseDurations::from_seconds(4, Some(7), 0, None);
        assert_eq!(result.unwrap_err(), "exhale must be greater than zero");
    }

    #[test]
    fn test_zero_recommended_minutes_rejected() {
        let err = ExerciseDefinition::new(
            "instant",
            "Instant",
            "",
            Category::Energize,
            (1, None, 1, None),
            0,
            Vec::<String>::new(),
        )
        .unwrap_err();
        match err {
            Error::InvalidDefinition { id, reason } => {
                assert_eq!(id, "instant");
                assert!(reason.contains("at least one minute"));
            }
            other => panic!("expected InvalidDefinition, got {:?}", other),
        }
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "sleep".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Sleep)
        );
        assert!("nap".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_instruction_text() {
        assert_eq!(Phase::Idle.instruction(), "Press start to begin");
        assert_eq!(Phase::Inhale.instruction(), "Breathe in...");
        assert_eq!(Phase::Hold1.instruction(), "Hold...");
        assert_eq!(Phase::Hold2.instruction(), "Hold...");
        assert_eq!(Phase::Exhale.instruction(), "Breathe out...");
    }
}
