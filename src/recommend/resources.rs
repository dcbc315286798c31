// src/recommend/resources.rs

use crate::config::MAX_RECOMMENDED_RESOURCES;
use crate::models::resource::{LearningResource, ScoredResource};
use crate::recommend::performance::PerformanceLevel;

/// Fixed bonus per resource type.
fn type_bonus(resource_type: &str) -> i64 {
    match resource_type.to_ascii_lowercase().as_str() {
        "practice" => 25,
        "video" => 20,
        "article" => 15,
        _ => 0,
    }
}

/// Computes the relevance score of a catalog entry for a user.
///
/// Additive bonuses only, so the score is monotone in the number of matches:
/// type bonus, +50 when a weak area appears (case-insensitively) in the title
/// or topic, +30 when the difficulty matches the level's affinity. The raw
/// sum is only ever used for descending sort; there is no normalization.
pub fn relevance_score(
    resource: &LearningResource,
    weak_areas: &[String],
    level: PerformanceLevel,
) -> i64 {
    let mut score = type_bonus(&resource.resource_type);

    let title = resource.title.to_lowercase();
    let topic = resource.topic.to_lowercase();
    let weak_match = weak_areas.iter().any(|area| {
        let needle = area.to_lowercase();
        title.contains(&needle) || topic.contains(&needle)
    });
    if weak_match {
        score += 50;
    }

    if resource
        .difficulty
        .eq_ignore_ascii_case(level.difficulty_affinity())
    {
        score += 30;
    }

    score
}

/// Ranks a catalog snapshot and keeps the best `MAX_RECOMMENDED_RESOURCES`.
/// The sort is stable, so catalog order breaks score ties.
pub fn rank_resources(
    catalog: Vec<LearningResource>,
    weak_areas: &[String],
    level: PerformanceLevel,
) -> Vec<ScoredResource> {
    let mut scored: Vec<ScoredResource> = catalog
        .into_iter()
        .map(|resource| {
            let relevance_score = relevance_score(&resource, weak_areas, level);
            ScoredResource {
                resource,
                relevance_score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    scored.truncate(MAX_RECOMMENDED_RESOURCES);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn resource(resource_type: &str, difficulty: &str, topic: &str) -> LearningResource {
        LearningResource {
            id: 1,
            title: "Sample resource".to_string(),
            resource_type: resource_type.to_string(),
            difficulty: difficulty.to_string(),
            category: "Math".to_string(),
            topic: topic.to_string(),
            tags: Json(vec![]),
            rating: 4.0,
            url: "https://example.com/r/1".to_string(),
        }
    }

    #[test]
    fn test_full_match_scores_105() {
        // practice (+25) + beginner affinity (+30) + weak-area topic (+50)
        let r = resource("practice", "beginner", "Fractions basics");
        let weak = vec!["Fractions".to_string()];
        let score = relevance_score(&r, &weak, PerformanceLevel::NeedsImprovement);
        assert_eq!(score, 105);
    }

    #[test]
    fn test_type_bonuses() {
        let weak: Vec<String> = vec![];
        let level = PerformanceLevel::Good;
        assert_eq!(
            relevance_score(&resource("video", "advanced", "x"), &weak, level),
            20
        );
        assert_eq!(
            relevance_score(&resource("article", "advanced", "x"), &weak, level),
            15
        );
        assert_eq!(
            relevance_score(&resource("practice", "advanced", "x"), &weak, level),
            25
        );
        assert_eq!(
            relevance_score(&resource("podcast", "advanced", "x"), &weak, level),
            0
        );
    }

    #[test]
    fn test_weak_area_match_is_case_insensitive() {
        let r = resource("article", "advanced", "ALGEBRA drills");
        let weak = vec!["algebra".to_string()];
        let score = relevance_score(&r, &weak, PerformanceLevel::Average);
        assert_eq!(score, 15 + 50);
    }

    #[test]
    fn test_adding_a_bonus_never_lowers_the_score() {
        let base = resource("video", "advanced", "Topology");
        let without = relevance_score(&base, &[], PerformanceLevel::NeedsImprovement);

        let with_weak = relevance_score(
            &base,
            &["Topology".to_string()],
            PerformanceLevel::NeedsImprovement,
        );
        assert!(with_weak >= without);

        let mut beginner = base.clone();
        beginner.difficulty = "beginner".to_string();
        let with_difficulty = relevance_score(&beginner, &[], PerformanceLevel::NeedsImprovement);
        assert!(with_difficulty >= without);
    }

    #[test]
    fn test_ranking_sorts_descending_and_truncates() {
        let mut catalog = Vec::new();
        for i in 0..8 {
            let mut r = resource("article", "advanced", "x");
            r.id = i;
            catalog.push(r);
        }
        let mut best = resource("practice", "beginner", "Fractions");
        best.id = 99;
        catalog.push(best);

        let ranked = rank_resources(
            catalog,
            &["Fractions".to_string()],
            PerformanceLevel::NeedsImprovement,
        );

        assert_eq!(ranked.len(), MAX_RECOMMENDED_RESOURCES);
        assert_eq!(ranked[0].resource.id, 99);
        assert!(ranked.windows(2).all(|w| w[0].relevance_score >= w[1].relevance_score));
    }
}
