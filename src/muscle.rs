//! Muscle groups and name-based group inference

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MuscleGroup {
  Chest,
  Back,
  Legs,
  Shoulders,
  Arms,
  Core,
  #[default]
  Other,
  Cardio,
}

impl MuscleGroup {
  pub const ALL: [MuscleGroup; 8] = [
    MuscleGroup::Chest,
    MuscleGroup::Back,
    MuscleGroup::Legs,
    MuscleGroup::Shoulders,
    MuscleGroup::Arms,
    MuscleGroup::Core,
    MuscleGroup::Other,
    MuscleGroup::Cardio,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MuscleGroup::Chest => "Chest",
      MuscleGroup::Back => "Back",
      MuscleGroup::Legs => "Legs",
      MuscleGroup::Shoulders => "Shoulders",
      MuscleGroup::Arms => "Arms",
      MuscleGroup::Core => "Core",
      MuscleGroup::Other => "Other",
      MuscleGroup::Cardio => "Cardio",
    }
  }
}

impl std::fmt::Display for MuscleGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for MuscleGroup {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    MuscleGroup::ALL
      .iter()
      .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
      .copied()
      .ok_or_else(|| format!("Unknown muscle group: {}", s))
  }
}

// Unknown labels from older data land in Other
impl From<String> for MuscleGroup {
  fn from(s: String) -> Self {
    s.parse().unwrap_or_default()
  }
}

impl From<MuscleGroup> for String {
  fn from(g: MuscleGroup) -> Self {
    g.as_str().to_string()
  }
}

const CARDIO_KEYWORDS: [&str; 4] = ["run", "walk", "cycle", "cardio"];

/// Checked in order: specific phrases before the general words they contain
const KEYWORD_GROUPS: [(&str, MuscleGroup); 22] = [
  ("shoulder press", MuscleGroup::Shoulders),
  ("lateral raise", MuscleGroup::Shoulders),
  ("front raise", MuscleGroup::Shoulders),
  ("push-up", MuscleGroup::Chest),
  ("fly", MuscleGroup::Chest),
  ("dips", MuscleGroup::Chest),
  ("pull-up", MuscleGroup::Back),
  ("pull-down", MuscleGroup::Back),
  ("deadlift", MuscleGroup::Back),
  ("calf raise", MuscleGroup::Legs),
  ("step-up", MuscleGroup::Legs),
  ("hammer curl", MuscleGroup::Arms),
  ("triceps extension", MuscleGroup::Arms),
  ("leg raise", MuscleGroup::Core),
  ("press", MuscleGroup::Chest),
  ("row", MuscleGroup::Back),
  ("squat", MuscleGroup::Legs),
  ("lunge", MuscleGroup::Legs),
  ("thrust", MuscleGroup::Legs),
  ("curl", MuscleGroup::Arms),
  ("crunch", MuscleGroup::Core),
  ("plank", MuscleGroup::Core),
];

/// Guess a muscle group from an exercise name
pub fn infer_muscle_group(exercise_name: &str) -> MuscleGroup {
  let name = exercise_name.to_lowercase();
  if CARDIO_KEYWORDS.iter().any(|k| name.contains(k)) {
    return MuscleGroup::Cardio;
  }
  KEYWORD_GROUPS
    .iter()
    .find(|(keyword, _)| name.contains(keyword))
    .map(|(_, group)| *group)
    .unwrap_or(MuscleGroup::Other)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_specific_keywords_win() {
    assert_eq!(infer_muscle_group("Dumbbell Shoulder Press"), MuscleGroup::Shoulders);
    assert_eq!(infer_muscle_group("Romanian Deadlift (RDL)"), MuscleGroup::Back);
    assert_eq!(infer_muscle_group("Standing Calf Raise"), MuscleGroup::Legs);
    assert_eq!(infer_muscle_group("Dumbbell Hammer Curl"), MuscleGroup::Arms);
  }

  #[test]
  fn test_general_keywords() {
    assert_eq!(infer_muscle_group("Incline Dumbbell Press"), MuscleGroup::Chest);
    assert_eq!(infer_muscle_group("Goblet Squat"), MuscleGroup::Legs);
    assert_eq!(infer_muscle_group("Plank"), MuscleGroup::Core);
  }

  #[test]
  fn test_cardio_checked_first() {
    // "walk" beats "lunge"
    assert_eq!(infer_muscle_group("Walking Lunge"), MuscleGroup::Cardio);
    assert_eq!(infer_muscle_group("Treadmill Run"), MuscleGroup::Cardio);
  }

  #[test]
  fn test_unknown_is_other() {
    assert_eq!(infer_muscle_group("Farmer Carry"), MuscleGroup::Other);
  }

  #[test]
  fn test_serde_accepts_unknown_labels() {
    let group: MuscleGroup = serde_json::from_str("\"Glutes\"").unwrap();
    assert_eq!(group, MuscleGroup::Other);
    let group: MuscleGroup = serde_json::from_str("\"legs\"").unwrap();
    assert_eq!(group, MuscleGroup::Legs);
    assert_eq!(serde_json::to_string(&MuscleGroup::Shoulders).unwrap(), "\"Shoulders\"");
  }
}
