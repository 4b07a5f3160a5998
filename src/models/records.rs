use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A weight in hundredths of a kilogram.
///
/// Used as the rep-PR map key so 2.5 and 2.50 are the same entry. Serialized
/// as the shortest decimal string ("80", "2.5", "1.25").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeightKey(i64);

impl WeightKey {
  pub const ZERO: WeightKey = WeightKey(0);

  pub fn from_kg(kg: f64) -> Self {
    Self((kg * 100.0).round() as i64)
  }

  pub fn kg(self) -> f64 {
    self.0 as f64 / 100.0
  }
}

impl std::ops::Sub for WeightKey {
  type Output = WeightKey;

  fn sub(self, rhs: WeightKey) -> WeightKey {
    WeightKey(self.0 - rhs.0)
  }
}

impl fmt::Display for WeightKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0 % 100 == 0 {
      return write!(f, "{}", self.0 / 100);
    }
    let text = format!("{:.2}", self.kg());
    f.write_str(text.trim_end_matches('0'))
  }
}

impl Serialize for WeightKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for WeightKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    let kg: f64 = text
      .trim()
      .parse()
      .map_err(|_| de::Error::custom(format!("invalid weight key: {:?}", text)))?;
    if !kg.is_finite() {
      return Err(de::Error::custom(format!("invalid weight key: {:?}", text)));
    }
    Ok(WeightKey::from_kg(kg))
  }
}

/// Best lifts for one exercise
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseRecord {
  #[serde(rename = "maxWeight", default)]
  pub max_weight: f64,
  /// Most reps ever performed at exactly this weight
  #[serde(rename = "repPRs", default)]
  pub rep_prs: BTreeMap<WeightKey, u32>,
}

impl ExerciseRecord {
  pub fn reps_at(&self, weight: f64) -> Option<u32> {
    self.rep_prs.get(&WeightKey::from_kg(weight)).copied()
  }

  /// Fold one historical set into the record
  pub fn absorb(&mut self, weight: f64, reps: u32) {
    if weight > self.max_weight {
      self.max_weight = weight;
    }
    let best = self.rep_prs.entry(WeightKey::from_kg(weight)).or_insert(0);
    if reps > *best {
      *best = reps;
    }
  }
}

/// Exercise name → record
pub type PersonalRecordTable = BTreeMap<String, ExerciseRecord>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_weight_key_canonical_text() {
    assert_eq!(WeightKey::from_kg(80.0).to_string(), "80");
    assert_eq!(WeightKey::from_kg(2.5).to_string(), "2.5");
    assert_eq!(WeightKey::from_kg(1.25).to_string(), "1.25");
    assert_eq!(WeightKey::from_kg(-10.0).to_string(), "-10");
    assert_eq!(WeightKey::from_kg(-2.5).to_string(), "-2.5");
  }

  #[test]
  fn test_float_noise_maps_to_same_key() {
    assert_eq!(WeightKey::from_kg(0.1 + 0.2), WeightKey::from_kg(0.3));
    assert_eq!(WeightKey::from_kg(102.50000001), WeightKey::from_kg(102.5));
  }

  #[test]
  fn test_record_reads_original_json() {
    let json = r#"{"maxWeight": 82.5, "repPRs": {"80": 6, "82.5": 2, "80.0": 5}}"#;
    let record: ExerciseRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.max_weight, 82.5);
    assert_eq!(record.reps_at(82.5), Some(2));
    // "80" and "80.0" collapse onto one key
    assert_eq!(record.rep_prs.len(), 2);
  }

  #[test]
  fn test_record_writes_string_keys() {
    let mut record = ExerciseRecord::default();
    record.absorb(62.5, 8);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["repPRs"]["62.5"], 8);
    assert_eq!(json["maxWeight"], 62.5);
  }

  #[test]
  fn test_absorb_keeps_maxima() {
    let mut record = ExerciseRecord::default();
    record.absorb(100.0, 5);
    record.absorb(100.0, 3);
    record.absorb(90.0, 8);
    assert_eq!(record.max_weight, 100.0);
    assert_eq!(record.reps_at(100.0), Some(5));
    assert_eq!(record.reps_at(90.0), Some(8));
  }
}
