//! Body measurements, one record per day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GymLogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMetric {
  /// Body weight, kg
  Weight,
  /// Body fat, percent
  Bf,
  /// Circumferences, cm
  Chest,
  Waist,
  Arm,
}

impl BodyMetric {
  pub const ALL: [BodyMetric; 5] = [
    BodyMetric::Weight,
    BodyMetric::Bf,
    BodyMetric::Chest,
    BodyMetric::Waist,
    BodyMetric::Arm,
  ];
}

impl std::fmt::Display for BodyMetric {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      BodyMetric::Weight => "weight",
      BodyMetric::Bf => "bf",
      BodyMetric::Chest => "chest",
      BodyMetric::Waist => "waist",
      BodyMetric::Arm => "arm",
    };
    f.write_str(label)
  }
}

impl std::str::FromStr for BodyMetric {
  type Err = String;
  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s {
      "weight" => Ok(BodyMetric::Weight),
      "bf" => Ok(BodyMetric::Bf),
      "chest" => Ok(BodyMetric::Chest),
      "waist" => Ok(BodyMetric::Waist),
      "arm" => Ok(BodyMetric::Arm),
      _ => Err(format!("Unknown body metric: {}", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyStat {
  pub date: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bf: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub chest: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub waist: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub arm: Option<f64>,
}

impl BodyStat {
  pub fn get(&self, metric: BodyMetric) -> Option<f64> {
    match metric {
      BodyMetric::Weight => self.weight,
      BodyMetric::Bf => self.bf,
      BodyMetric::Chest => self.chest,
      BodyMetric::Waist => self.waist,
      BodyMetric::Arm => self.arm,
    }
  }

  fn slot(&mut self, metric: BodyMetric) -> &mut Option<f64> {
    match metric {
      BodyMetric::Weight => &mut self.weight,
      BodyMetric::Bf => &mut self.bf,
      BodyMetric::Chest => &mut self.chest,
      BodyMetric::Waist => &mut self.waist,
      BodyMetric::Arm => &mut self.arm,
    }
  }

  pub fn is_empty(&self) -> bool {
    BodyMetric::ALL.iter().all(|m| self.get(*m).is_none())
  }
}

/// Merge today's measurements into the list, newest first.
///
/// Metrics absent from `stat` keep their earlier value for that day.
pub fn upsert_body_stat(stats: &mut Vec<BodyStat>, stat: BodyStat) -> Result<()> {
  if stat.is_empty() {
    return Err(GymLogError::InvalidInput("no measurements given".to_string()));
  }

  match stats.iter_mut().find(|s| s.date == stat.date) {
    Some(existing) => {
      for metric in BodyMetric::ALL {
        if let Some(value) = stat.get(metric) {
          *existing.slot(metric) = Some(value);
        }
      }
    }
    None => stats.push(stat),
  }
  stats.sort_by(|a, b| b.date.cmp(&a.date));
  Ok(())
}

pub fn delete_body_stat(stats: &mut Vec<BodyStat>, date: NaiveDate) -> Result<()> {
  let before = stats.len();
  stats.retain(|s| s.date != date);
  if stats.len() == before {
    return Err(GymLogError::NotFound(format!("body stats for {}", date)));
  }
  Ok(())
}

/// Oldest-first points for one metric, skipping days it was not measured
pub fn metric_series(stats: &[BodyStat], metric: BodyMetric) -> Vec<(NaiveDate, f64)> {
  let mut series: Vec<_> = stats
    .iter()
    .filter_map(|s| s.get(metric).map(|v| (s.date, v)))
    .collect();
  series.sort_by_key(|(date, _)| *date);
  series
}
