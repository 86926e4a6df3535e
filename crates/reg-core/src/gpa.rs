//! Credit-weighted GPA aggregation.
//!
//! The aggregate is always recomputed from the full set of qualifying
//! enrollments; there is no incremental path. An enrollment contributes only
//! when both its course credits and its grade point are strictly positive, so
//! a failing `0.0` grade point is left out of the weighted average entirely.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One qualifying enrollment as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpaInput {
    /// Credits of the offering's course. `None` when the course can't be resolved.
    pub credits: Option<u32>,
    pub grade_point: Option<f64>,
}

/// Result of a GPA recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GpaSummary {
    /// Rounded to two decimals.
    pub gpa: f64,
    pub total_credits: u32,
    pub total_points: f64,
    /// Number of selected enrollments, including ones that did not contribute.
    pub enrollments_count: u32,
}

impl GpaSummary {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            gpa: 0.0,
            total_credits: 0,
            total_points: 0.0,
            enrollments_count: 0,
        }
    }

    /// Aggregate the selected enrollments.
    #[must_use]
    pub fn compute(inputs: &[GpaInput]) -> Self {
        let mut total_points = 0.0_f64;
        let mut total_credits = 0_u32;

        for input in inputs {
            let credits = input.credits.unwrap_or(0);
            let grade_point = input.grade_point.unwrap_or(0.0);
            if credits > 0 && grade_point > 0.0 {
                total_points += f64::from(credits) * grade_point;
                total_credits += credits;
            }
        }

        let gpa = if total_credits > 0 {
            round_to_hundredths(total_points / f64::from(total_credits))
        } else {
            0.0
        };

        Self {
            gpa,
            total_credits,
            total_points,
            enrollments_count: u32::try_from(inputs.len()).unwrap_or(u32::MAX),
        }
    }
}

/// Round half away from zero at two decimal places.
///
/// Rounds the exact decimal expansion of `value`, the boundary fixed
/// two-decimal formatting uses: 2.005 is stored as 2.00499.. and becomes 2.0.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}
