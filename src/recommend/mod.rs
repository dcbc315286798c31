// src/recommend/mod.rs
//
// The recommendation engine: pure functions that turn a quiz result, the
// user's recent history and the resource catalog into a personalized
// payload. No database access happens in here; handlers aggregate the
// inputs and serialize the output.

pub mod performance;
pub mod resources;
pub mod study_plan;
pub mod topics;

use serde::Serialize;
use std::fmt;

use crate::models::quiz_result::QuizResult;
use crate::models::resource::{LearningResource, ScoredResource};
use crate::models::study_plan::StudyWeek;
use performance::{LearnerType, PerformanceLevel};

/// Why a personalized recommendation could not be built.
///
/// Callers decide what to do with the failure; the quiz-result handler
/// substitutes a minimal fallback payload instead of failing the request.
#[derive(Debug, PartialEq, Eq)]
pub enum RecommendationError {
    /// The result has no questions, so no percentage can be derived.
    EmptyQuiz,
    /// The resource catalog is empty; nothing to rank.
    EmptyCatalog,
}

impl fmt::Display for RecommendationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationError::EmptyQuiz => write!(f, "quiz result has no questions"),
            RecommendationError::EmptyCatalog => write!(f, "learning resource catalog is empty"),
        }
    }
}

impl std::error::Error for RecommendationError {}

/// The full personalization payload for one quiz result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub percentage_score: f64,
    pub performance_level: PerformanceLevel,
    pub learner_type: LearnerType,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub advice: String,
    pub daily_study_minutes: u32,
    pub recommended_resources: Vec<ScoredResource>,
    pub study_plan: Vec<StudyWeek>,
}

fn advice_for(level: PerformanceLevel, category: &str) -> String {
    match level {
        PerformanceLevel::Excellent => format!(
            "Outstanding work on {}! Keep challenging yourself with advanced material.",
            category
        ),
        PerformanceLevel::Good => format!(
            "Solid grasp of {}. Targeted practice on your weak areas will push you to the top.",
            category
        ),
        PerformanceLevel::Average => format!(
            "You're getting there with {}. Work through the fundamentals in your study plan.",
            category
        ),
        PerformanceLevel::NeedsImprovement => format!(
            "{} needs more work. Start with beginner resources and build up slowly.",
            category
        ),
    }
}

/// Builds the personalized recommendation payload.
///
/// `history` is the user's recent result window (typically including
/// `result` itself); its mean percentage decides whether supplementary
/// study-plan weeks are warranted.
pub fn build_recommendations(
    result: &QuizResult,
    history: &[QuizResult],
    catalog: Vec<LearningResource>,
) -> Result<Recommendations, RecommendationError> {
    if result.total_questions <= 0 {
        return Err(RecommendationError::EmptyQuiz);
    }
    if catalog.is_empty() {
        return Err(RecommendationError::EmptyCatalog);
    }

    let percentage = result.percentage();
    let level = PerformanceLevel::from_percentage(percentage);
    let learner_type = LearnerType::from(level);

    let (weak_areas, strong_areas) = topics::weak_and_strong_areas(&result.questions_answered);

    let average_percentage = if history.is_empty() {
        percentage
    } else {
        history.iter().map(|r| r.percentage()).sum::<f64>() / history.len() as f64
    };

    let recommended_resources = resources::rank_resources(catalog, &weak_areas, level);
    let study_plan =
        study_plan::build_study_plan(&result.category, level, &weak_areas, average_percentage);

    Ok(Recommendations {
        percentage_score: percentage,
        performance_level: level,
        learner_type,
        advice: advice_for(level, &result.category),
        daily_study_minutes: learner_type.daily_study_minutes(),
        weak_areas,
        strong_areas,
        recommended_resources,
        study_plan,
    })
}

/// Minimal hard-coded payload served when personalization fails.
/// Generic advice, no areas, no resources, the plain base study plan.
pub fn fallback(category: &str) -> Recommendations {
    let level = PerformanceLevel::Average;
    let learner_type = LearnerType::InBetween;
    Recommendations {
        percentage_score: 0.0,
        performance_level: level,
        learner_type,
        weak_areas: Vec::new(),
        strong_areas: Vec::new(),
        advice: format!("Keep practicing {} regularly to improve your scores.", category),
        daily_study_minutes: learner_type.daily_study_minutes(),
        recommended_resources: Vec::new(),
        study_plan: study_plan::build_study_plan(category, level, &[], 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz_result::AnsweredQuestion;
    use sqlx::types::Json;

    fn quiz_result(score: i64, total: i64, answers: Vec<AnsweredQuestion>) -> QuizResult {
        QuizResult {
            id: 1,
            user_id: 1,
            category: "Math".to_string(),
            difficulty: "beginner".to_string(),
            score,
            total_questions: total,
            time_spent_secs: 300,
            taken_at: chrono::Utc::now(),
            questions_answered: Json(answers),
            created_at: None,
        }
    }

    fn answered(topic: &str, is_correct: bool) -> AnsweredQuestion {
        AnsweredQuestion {
            question: "q".to_string(),
            user_answer: "a".to_string(),
            correct_answer: "a".to_string(),
            is_correct,
            topic: Some(topic.to_string()),
        }
    }

    fn catalog() -> Vec<LearningResource> {
        vec![LearningResource {
            id: 1,
            title: "Algebra drills".to_string(),
            resource_type: "practice".to_string(),
            difficulty: "beginner".to_string(),
            category: "Math".to_string(),
            topic: "Algebra".to_string(),
            tags: Json(vec![]),
            rating: 4.5,
            url: "https://example.com/algebra".to_string(),
        }]
    }

    #[test]
    fn test_low_score_end_to_end() {
        // 3/10 -> 30% -> needs_improvement -> slow
        let result = quiz_result(3, 10, vec![answered("Algebra", false)]);
        let recs = build_recommendations(&result, &[], catalog()).unwrap();

        assert_eq!(recs.percentage_score, 30.0);
        assert_eq!(recs.performance_level, PerformanceLevel::NeedsImprovement);
        assert_eq!(recs.learner_type, LearnerType::Slow);
        assert_eq!(recs.weak_areas, vec!["Algebra"]);
        // 30% average -> supplementary drill weeks present
        assert!(recs.study_plan.iter().any(|w| w.is_supplementary()));
    }

    #[test]
    fn test_repeated_weak_topic_ranks_first() {
        let result = quiz_result(
            9,
            10,
            vec![
                answered("Algebra", false),
                answered("Algebra", false),
                answered("Geometry", true),
            ],
        );
        let recs = build_recommendations(&result, &[], catalog()).unwrap();
        assert_eq!(recs.weak_areas[0], "Algebra");
        assert_eq!(recs.performance_level, PerformanceLevel::Excellent);
    }

    #[test]
    fn test_empty_quiz_is_an_error() {
        let result = quiz_result(0, 0, vec![]);
        let err = build_recommendations(&result, &[], catalog()).unwrap_err();
        assert_eq!(err, RecommendationError::EmptyQuiz);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let result = quiz_result(5, 10, vec![]);
        let err = build_recommendations(&result, &[], Vec::new()).unwrap_err();
        assert_eq!(err, RecommendationError::EmptyCatalog);
    }

    #[test]
    fn test_history_average_drives_supplementary_weeks() {
        // Current result is weak but the history average stays above the
        // threshold, so no supplementary weeks are added.
        let result = quiz_result(6, 10, vec![answered("Algebra", false)]);
        let history = vec![quiz_result(9, 10, vec![]), quiz_result(8, 10, vec![])];
        let recs = build_recommendations(&result, &history, catalog()).unwrap();
        assert!(recs.study_plan.iter().all(|w| !w.is_supplementary()));
    }

    #[test]
    fn test_fallback_is_generic() {
        let recs = fallback("Math");
        assert!(recs.weak_areas.is_empty());
        assert!(recs.recommended_resources.is_empty());
        assert_eq!(recs.learner_type, LearnerType::InBetween);
        assert!(recs.study_plan.iter().all(|w| !w.is_supplementary()));
    }
}
