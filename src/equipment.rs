//! Barbell and plate inventory, and the plate calculator

use serde::{Deserialize, Serialize};

use crate::error::{GymLogError, Result};
use crate::models::WeightKey;

const DEFAULT_BARBELL_KG: f64 = 20.0;
const DEFAULT_PLATES_KG: [f64; 6] = [20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
  #[serde(default = "default_barbell")]
  pub barbell_weight: f64,
  /// Heaviest first
  #[serde(default = "default_plates")]
  pub available_plates: Vec<f64>,
}

fn default_barbell() -> f64 {
  DEFAULT_BARBELL_KG
}

fn default_plates() -> Vec<f64> {
  DEFAULT_PLATES_KG.to_vec()
}

impl Default for Equipment {
  fn default() -> Self {
    Self {
      barbell_weight: default_barbell(),
      available_plates: default_plates(),
    }
  }
}

/// Plates to load on each side, and what could not be matched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateLoad {
  pub per_side: Vec<f64>,
  /// Per-side weight left over with the available plates
  pub remainder: f64,
}

impl Equipment {
  /// Validated inventory. Non-positive plates are dropped; the rest are
  /// sorted heaviest first.
  pub fn new(barbell_weight: f64, plates: &[f64]) -> Result<Self> {
    if !barbell_weight.is_finite() || barbell_weight < 0.0 {
      return Err(GymLogError::InvalidInput("barbell weight must be zero or more".to_string()));
    }
    let mut available_plates: Vec<f64> = plates
      .iter()
      .copied()
      .filter(|p| p.is_finite() && *p > 0.0)
      .collect();
    if available_plates.is_empty() {
      return Err(GymLogError::InvalidInput("at least one plate size is required".to_string()));
    }
    available_plates.sort_by(|a, b| b.total_cmp(a));

    Ok(Self {
      barbell_weight,
      available_plates,
    })
  }

  /// Parse a comma-separated plate list such as "20, 10, 2.5"
  pub fn from_plate_list(barbell_weight: f64, plate_list: &str) -> Result<Self> {
    let plates: Vec<f64> = plate_list
      .split(',')
      .filter_map(|p| p.trim().parse().ok())
      .collect();
    Self::new(barbell_weight, &plates)
  }

  /// Greedy per-side fill, heaviest plate first
  pub fn plate_breakdown(&self, target_weight: f64) -> Result<PlateLoad> {
    if !target_weight.is_finite() || target_weight <= 0.0 {
      return Err(GymLogError::InvalidInput("target weight must be positive".to_string()));
    }
    if target_weight < self.barbell_weight {
      return Err(GymLogError::InvalidInput(format!(
        "target weight {} kg is below the {} kg bar",
        target_weight, self.barbell_weight
      )));
    }

    // Fixed-point so 1.25 kg steps never leave float dust behind
    let mut remaining = WeightKey::from_kg((target_weight - self.barbell_weight) / 2.0);
    let mut per_side = Vec::new();
    for &plate in &self.available_plates {
      let step = WeightKey::from_kg(plate);
      if step <= WeightKey::ZERO {
        continue;
      }
      while remaining >= step {
        per_side.push(plate);
        remaining = remaining - step;
      }
    }

    Ok(PlateLoad {
      per_side,
      remainder: remaining.kg(),
    })
  }
}
