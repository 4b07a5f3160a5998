//! Load Progression Advisor
//!
//! Proposes the working weight for the next session of an exercise from the
//! top set of the last session that contained it:
//! - 12+ reps at RPE 8 or easier → add 2.5 kg
//! - under 8 reps at RPE above 8 → take off 2.5 kg
//! - anything else (including unrecorded RPE) → repeat the weight
//!
//! A weight queued by the coach for an exercise overrides the rule once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{HistoryEntry, WorkoutSet};

const WEIGHT_STEP_KG: f64 = 2.5;
const HIGH_REP_THRESHOLD: u32 = 12;
const LOW_REP_THRESHOLD: u32 = 8;
const RPE_CEILING: i64 = 8;

// ---------------------------------------------------------------------------
/// Progression Rule: Which rule produced the suggestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionRule {
    /// Top set was easy for the reps: progressive overload
    Increase,
    /// Top set was a grind: back off
    Decrease,
    /// No rule matched or RPE was not recorded
    Hold,
    /// A queued coach suggestion replaced the rule
    CoachOverride,
}

impl std::fmt::Display for ProgressionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
            Self::Hold => write!(f, "hold"),
            Self::CoachOverride => write!(f, "coach_override"),
        }
    }
}

impl std::str::FromStr for ProgressionRule {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "hold" => Ok(Self::Hold),
            "coach_override" => Ok(Self::CoachOverride),
            _ => Err(format!("Unknown progression rule: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSuggestion {
    pub suggested_weight: f64,
    pub rule: ProgressionRule,
}

// ---------------------------------------------------------------------------
/// Pending Suggestions: one-shot coach overrides keyed by exercise name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingSuggestions(BTreeMap<String, f64>);

impl PendingSuggestions {
    pub fn queue(&mut self, exercise_name: &str, weight: f64) {
        self.0.insert(exercise_name.to_string(), weight);
    }

    /// Read and clear the override for an exercise
    pub fn take(&mut self, exercise_name: &str) -> Option<f64> {
        self.0.remove(exercise_name)
    }

    pub fn peek(&self, exercise_name: &str) -> Option<f64> {
        self.0.get(exercise_name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

/// Top set of the most recent session containing the exercise.
///
/// Only the newest matching entry is considered: if it has no sets the
/// result is None even when older entries do.
pub fn last_top_set<'a>(history: &'a [HistoryEntry], exercise_name: &str) -> Option<&'a WorkoutSet> {
    history
        .iter()
        .find(|entry| entry.contains(exercise_name))
        .and_then(|entry| entry.exercise(exercise_name))
        .and_then(|exercise| exercise.top_set())
}

/// Suggest the next working weight from history (newest first)
pub fn suggest_next_weight(history: &[HistoryEntry], exercise_name: &str) -> Option<WeightSuggestion> {
    let top_set = last_top_set(history, exercise_name)?;
    let (suggested_weight, rule) = apply_rules(top_set);
    Some(WeightSuggestion {
        suggested_weight,
        rule,
    })
}

/// Suggestion for the session about to start, consuming any coach override
pub fn suggest_for_session(
    history: &[HistoryEntry],
    pending: &mut PendingSuggestions,
    exercise_name: &str,
) -> Option<WeightSuggestion> {
    if let Some(weight) = pending.take(exercise_name) {
        tracing::info!(exercise = exercise_name, weight, "Using queued coach suggestion");
        return Some(WeightSuggestion {
            suggested_weight: weight,
            rule: ProgressionRule::CoachOverride,
        });
    }
    suggest_next_weight(history, exercise_name)
}

fn apply_rules(top_set: &WorkoutSet) -> (f64, ProgressionRule) {
    // RPE is compared as a whole number: 8.5 counts as 8
    let Some(rpe) = top_set.rpe.map(|r| r.trunc() as i64) else {
        return (top_set.weight, ProgressionRule::Hold);
    };

    if top_set.reps >= HIGH_REP_THRESHOLD && rpe <= RPE_CEILING {
        (top_set.weight + WEIGHT_STEP_KG, ProgressionRule::Increase)
    } else if top_set.reps < LOW_REP_THRESHOLD && rpe > RPE_CEILING {
        (top_set.weight - WEIGHT_STEP_KG, ProgressionRule::Decrease)
    } else {
        (top_set.weight, ProgressionRule::Hold)
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
