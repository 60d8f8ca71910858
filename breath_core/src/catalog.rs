//! Default catalog of breathing exercises.
//!
//! This module provides the built-in exercises and the lookup/filter
//! operations front ends use to list them.

use crate::config::CustomExercise;
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with the built-in exercise definitions
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for tests and for catalogs
/// that get extended with custom exercises.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn build_default_catalog_internal() -> Catalog {
    let definitions = [
        ExerciseDefinition::new(
            "box",
            "Box Breathing",
            "A simple technique to help reduce stress and improve focus.",
            Category::Focus,
            (4, Some(4), 4, Some(4)),
            5,
            [
                "Reduces stress",
                "Improves concentration",
                "Helps manage anxiety",
                "Can be done anywhere",
            ],
        ),
        ExerciseDefinition::new(
            "4-7-8",
            "4-7-8 Breathing",
            "A relaxing breath pattern that can help you fall asleep.",
            Category::Sleep,
            (4, Some(7), 8, None),
            4,
            [
                "Helps with sleep",
                "Reduces anxiety",
                "Manages cravings",
                "Helps control emotional responses",
            ],
        ),
        ExerciseDefinition::new(
            "deep",
            "Deep Breathing",
            "A simple deep breathing exercise to calm your nervous system.",
            Category::Calm,
            (5, None, 5, None),
            3,
            [
                "Activates relaxation response",
                "Lowers heart rate",
                "Helps with mindfulness",
                "Reduces tension",
            ],
        ),
        ExerciseDefinition::new(
            "coherent",
            "Coherent Breathing",
            "Breathe at a rate of 5 breaths per minute for heart-brain coherence.",
            Category::Balance,
            (6, None, 6, None),
            5,
            [
                "Balances nervous system",
                "Improves heart rate variability",
                "Reduces stress hormones",
                "Enhances focus and clarity",
            ],
        ),
        ExerciseDefinition::new(
            "stimulating",
            "Stimulating Breath",
            "An energizing yogic breathing technique to increase alertness.",
            Category::Energize,
            (1, None, 1, None),
            2,
            [
                "Increases energy and alertness",
                "Strengthens respiratory system",
                "Clears nasal passages",
                "Enhances concentration",
            ],
        ),
        ExerciseDefinition::new(
            "alternate",
            "Alternate Nostril",
            "A yogic breathing practice that brings balance and calm.",
            Category::Balance,
            (4, Some(2), 6, None),
            5,
            [
                "Balances left and right brain hemispheres",
                "Brings mental clarity",
                "Reduces stress",
                "Improves focus",
            ],
        ),
        ExerciseDefinition::new(
            "diaphragmatic",
            "Diaphragmatic Breathing",
            "Focus on deep belly breathing to engage the diaphragm fully.",
            Category::Calm,
            (4, Some(1), 6, None),
            5,
            [
                "Strengthens the diaphragm",
                "Decreases oxygen demand",
                "Slows heart rate",
                "Reduces blood pressure",
            ],
        ),
        ExerciseDefinition::new(
            "ujjayi",
            "Ujjayi Breath",
            "The 'ocean breath' used in yoga to focus the mind.",
            Category::Focus,
            (5, None, 5, None),
            6,
            [
                "Increases oxygen absorption",
                "Builds internal heat",
                "Calms the nervous system",
                "Improves concentration",
            ],
        ),
    ];

    let mut catalog = Catalog::default();
    for definition in definitions {
        match definition {
            Ok(def) => catalog.exercises.push(def),
            // A bad entry is dropped; the rest of the catalog still loads
            Err(e) => tracing::error!("Skipping built-in exercise: {}", e),
        }
    }
    catalog
}

impl Catalog {
    /// All exercises in definition order
    pub fn all(&self) -> &[ExerciseDefinition] {
        &self.exercises
    }

    /// Exercises matching `filter`, in definition order
    pub fn by_category(&self, filter: &CategoryFilter) -> Vec<&ExerciseDefinition> {
        self.exercises
            .iter()
            .filter(|d| filter.matches(d.category))
            .collect()
    }

    /// String form of [`Catalog::by_category`].
    ///
    /// `"all"` yields every exercise; a tag that names no category yields an
    /// empty list.
    pub fn by_tag(&self, tag: &str) -> Vec<&ExerciseDefinition> {
        match tag.parse::<CategoryFilter>() {
            Ok(filter) => self.by_category(&filter),
            Err(_) => Vec::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|d| d.id == id)
    }

    /// Look up an exercise, failing with `Error::NotFound` for unknown ids
    pub fn find(&self, id: &str) -> Result<&ExerciseDefinition> {
        self.get(id).ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Append user-defined exercises.
    ///
    /// Each entry is validated on its own; rejected entries are logged,
    /// skipped and returned so the caller can report them.
    pub fn add_custom(&mut self, custom: &[CustomExercise]) -> Vec<Error> {
        let mut rejected = Vec::new();

        for entry in custom {
            let result = entry.to_definition().and_then(|def| {
                if self.get(&def.id).is_some() {
                    Err(Error::InvalidDefinition {
                        id: def.id,
                        reason: "duplicate id".into(),
                    })
                } else {
                    Ok(def)
                }
            });

            match result {
                Ok(def) => {
                    tracing::debug!("Added custom exercise '{}' ({})", def.id, def.pattern());
                    self.exercises.push(def);
                }
                Err(e) => {
                    tracing::warn!("Rejected custom exercise: {}", e);
                    rejected.push(e);
                }
            }
        }

        rejected
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for def in &self.exercises {
            if def.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if !seen.insert(def.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", def.id));
            }
            if def.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", def.id));
            }
        }

        errors
    }

    /// Run [`validate`](Self::validate) and fail if it reports anything
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }

        for error in &errors {
            tracing::error!("Catalog validation error: {}", error);
        }
        Err(Error::CatalogValidation(errors.join("; ")))
    }
}
