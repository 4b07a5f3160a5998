//! Estimated one-rep max

/// Estimate a one-rep max from a set using the Epley formula.
///
/// A single rep is already a measured max and is returned unchanged.
/// Zero reps yields 0 rather than an error.
pub fn estimate_1rm(weight: f64, reps: u32) -> f64 {
  if reps == 1 {
    return weight;
  }
  if reps == 0 {
    return 0.0;
  }
  // Epley: w × (1 + r/30)
  weight * (1.0 + reps as f64 / 30.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;

  #[test]
  fn test_single_rep_is_the_weight() {
    for w in [0.0, 20.0, 102.5, 250.0] {
      assert_eq!(estimate_1rm(w, 1), w);
    }
  }

  #[test]
  fn test_zero_reps_is_zero() {
    assert_eq!(estimate_1rm(100.0, 0), 0.0);
  }

  #[test]
  fn test_epley_ten_reps() {
    assert_approx_eq!(estimate_1rm(100.0, 10), 133.333, 0.001);
  }

  #[test]
  fn test_more_reps_means_higher_estimate() {
    assert!(estimate_1rm(80.0, 8) > estimate_1rm(80.0, 5));
  }
}
