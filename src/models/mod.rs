pub mod plan;
pub mod records;
pub mod workout;

pub use plan::{PlanDay, PlannedExercise, WorkoutPlan};
pub use records::{ExerciseRecord, PersonalRecordTable, WeightKey};
pub use workout::{ExerciseKind, HistoryEntry, LoggedExercise, PrEvent, WorkoutSet};
