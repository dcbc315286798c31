// src/recommend/performance.rs

use serde::{Deserialize, Serialize};

/// Discrete classification of a quiz percentage score.
///
/// Thresholds are inclusive: 90 is already Excellent, 75 already Good,
/// 60 already Average. The function is total; anything below 60 (including
/// out-of-range garbage) lands in NeedsImprovement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            PerformanceLevel::Excellent
        } else if percentage >= 75.0 {
            PerformanceLevel::Good
        } else if percentage >= 60.0 {
            PerformanceLevel::Average
        } else {
            PerformanceLevel::NeedsImprovement
        }
    }

    /// Resource difficulty this level has an affinity for.
    /// Used by the relevance ranker's difficulty bonus.
    pub fn difficulty_affinity(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "advanced",
            PerformanceLevel::Good | PerformanceLevel::Average => "intermediate",
            PerformanceLevel::NeedsImprovement => "beginner",
        }
    }

    /// Wire label, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "excellent",
            PerformanceLevel::Good => "good",
            PerformanceLevel::Average => "average",
            PerformanceLevel::NeedsImprovement => "needs_improvement",
        }
    }
}

/// Coarse pacing classification derived from the performance level,
/// used to scale suggested study time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LearnerType {
    Slow,
    InBetween,
    Fast,
}

impl From<PerformanceLevel> for LearnerType {
    fn from(level: PerformanceLevel) -> Self {
        match level {
            PerformanceLevel::Excellent => LearnerType::Fast,
            PerformanceLevel::Good | PerformanceLevel::Average => LearnerType::InBetween,
            PerformanceLevel::NeedsImprovement => LearnerType::Slow,
        }
    }
}

impl LearnerType {
    /// Suggested daily study time in minutes.
    pub fn daily_study_minutes(&self) -> u32 {
        match self {
            LearnerType::Slow => 60,
            LearnerType::InBetween => 45,
            LearnerType::Fast => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearnerType::Slow => "slow",
            LearnerType::InBetween => "inBetween",
            LearnerType::Fast => "fast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(
            PerformanceLevel::from_percentage(90.0),
            PerformanceLevel::Excellent
        );
        assert_eq!(
            PerformanceLevel::from_percentage(89.999),
            PerformanceLevel::Good
        );
        assert_eq!(PerformanceLevel::from_percentage(75.0), PerformanceLevel::Good);
        assert_eq!(
            PerformanceLevel::from_percentage(74.999),
            PerformanceLevel::Average
        );
        assert_eq!(
            PerformanceLevel::from_percentage(60.0),
            PerformanceLevel::Average
        );
        assert_eq!(
            PerformanceLevel::from_percentage(59.999),
            PerformanceLevel::NeedsImprovement
        );
    }

    #[test]
    fn test_classifier_is_total() {
        // Out-of-range inputs fall into the else bucket instead of panicking.
        assert_eq!(
            PerformanceLevel::from_percentage(-10.0),
            PerformanceLevel::NeedsImprovement
        );
        assert_eq!(
            PerformanceLevel::from_percentage(250.0),
            PerformanceLevel::Excellent
        );
        assert_eq!(
            PerformanceLevel::from_percentage(f64::NAN),
            PerformanceLevel::NeedsImprovement
        );
    }

    #[test]
    fn test_low_score_maps_to_slow_learner() {
        // score=3 of 10 -> 30% -> needs_improvement -> slow
        let level = PerformanceLevel::from_percentage(30.0);
        assert_eq!(level, PerformanceLevel::NeedsImprovement);
        assert_eq!(LearnerType::from(level), LearnerType::Slow);
    }

    #[test]
    fn test_wire_labels() {
        assert_eq!(PerformanceLevel::NeedsImprovement.as_str(), "needs_improvement");
        assert_eq!(LearnerType::InBetween.as_str(), "inBetween");

        let json = serde_json::to_string(&LearnerType::InBetween).unwrap();
        assert_eq!(json, "\"inBetween\"");
        let json = serde_json::to_string(&PerformanceLevel::NeedsImprovement).unwrap();
        assert_eq!(json, "\"needs_improvement\"");
    }
}
