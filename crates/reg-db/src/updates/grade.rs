//! Grade entry input.
//!
//! A supplied `score_breakdown` replaces the stored list wholesale; every
//! component is stamped with the grader and the entry time on write. Scalar
//! fields are written only when supplied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reg_core::entities::ScoreEntry;
use reg_core::errors::CoreError;

/// One weighted score component as supplied by the grader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreInput {
    pub label: String,
    pub score: f64,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl ScoreInput {
    #[must_use]
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
            max_score: None,
            weight: None,
        }
    }

    fn stamp(&self, grader: &str, at: DateTime<Utc>) -> ScoreEntry {
        ScoreEntry {
            label: self.label.trim().to_string(),
            score: self.score,
            max_score: self.max_score,
            weight: self.weight,
            recorded_by: grader.to_string(),
            recorded_at: at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<Vec<ScoreInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_grade: Option<String>,
    /// On the 0-4 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GradeEntry {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a grade point outside 0-4, a
    /// non-finite or negative score, or a blank component label.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(gp) = self.grade_point {
            if !gp.is_finite() || !(0.0..=4.0).contains(&gp) {
                return Err(CoreError::Validation(format!(
                    "grade_point must be between 0 and 4, got {gp}"
                )));
            }
        }
        if let Some(score) = self.final_score {
            if !score.is_finite() || score < 0.0 {
                return Err(CoreError::Validation(format!(
                    "final_score must be a non-negative number, got {score}"
                )));
            }
        }
        if let Some(ref letter) = self.letter_grade {
            if letter.trim().is_empty() {
                return Err(CoreError::Validation("letter_grade must not be blank".into()));
            }
        }
        for component in self.score_breakdown.iter().flatten() {
            if component.label.trim().is_empty() {
                return Err(CoreError::Validation("score component label is required".into()));
            }
            let finite = component.score.is_finite()
                && component.max_score.is_none_or(f64::is_finite)
                && component.weight.is_none_or(f64::is_finite);
            if !finite || component.score < 0.0 {
                return Err(CoreError::Validation(format!(
                    "score component '{}' has an invalid value",
                    component.label
                )));
            }
        }
        Ok(())
    }

    /// Stamp the supplied components for storage.
    #[must_use]
    pub fn stamped_breakdown(&self, grader: &str, at: DateTime<Utc>) -> Option<Vec<ScoreEntry>> {
        self.score_breakdown
            .as_ref()
            .map(|components| components.iter().map(|c| c.stamp(grader, at)).collect())
    }

    #[must_use]
    pub fn components(&self) -> u32 {
        self.score_breakdown
            .as_ref()
            .map_or(0, |c| u32::try_from(c.len()).unwrap_or(u32::MAX))
    }
}
