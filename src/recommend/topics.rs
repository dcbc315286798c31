// src/recommend/topics.rs

use crate::config::TOP_AREA_COUNT;
use crate::models::quiz_result::AnsweredQuestion;

/// Extracts weak and strong areas from an answer sheet.
///
/// Weak areas are the most frequent topics among incorrect answers, strong
/// areas the most frequent among correct ones. Each list holds at most
/// `TOP_AREA_COUNT` topics. Answers without a topic tag are skipped.
///
/// Ties are broken by first-seen order in the answer sheet, which keeps the
/// output deterministic for identical inputs.
pub fn weak_and_strong_areas(answers: &[AnsweredQuestion]) -> (Vec<String>, Vec<String>) {
    let weak = top_topics(answers.iter().filter(|a| !a.is_correct));
    let strong = top_topics(answers.iter().filter(|a| a.is_correct));
    (weak, strong)
}

/// Tallies topic occurrences and returns the `TOP_AREA_COUNT` most frequent.
fn top_topics<'a>(answers: impl Iterator<Item = &'a AnsweredQuestion>) -> Vec<String> {
    // Vec instead of a HashMap so first-seen order survives the tally.
    let mut tally: Vec<(String, usize)> = Vec::new();

    for answer in answers {
        let topic = match answer.topic.as_deref() {
            Some(t) if !t.trim().is_empty() => t.trim(),
            _ => continue,
        };

        if let Some(pos) = tally.iter().position(|(name, _)| name.as_str() == topic) {
            tally[pos].1 += 1;
        } else {
            tally.push((topic.to_string(), 1));
        }
    }

    // Stable sort: equal counts keep their first-seen order.
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally.truncate(TOP_AREA_COUNT);
    tally.into_iter().map(|(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(topic: Option<&str>, is_correct: bool) -> AnsweredQuestion {
        AnsweredQuestion {
            question: "q".to_string(),
            user_answer: "a".to_string(),
            correct_answer: if is_correct { "a" } else { "b" }.to_string(),
            is_correct,
            topic: topic.map(|t| t.to_string()),
        }
    }

    #[test]
    fn test_repeated_incorrect_topic_ranks_first() {
        let answers = vec![
            answered(Some("Geometry"), false),
            answered(Some("Algebra"), false),
            answered(Some("Algebra"), false),
            answered(Some("Fractions"), true),
        ];

        let (weak, strong) = weak_and_strong_areas(&answers);
        assert_eq!(weak[0], "Algebra");
        assert_eq!(weak.len(), 2);
        assert_eq!(strong, vec!["Fractions".to_string()]);
    }

    #[test]
    fn test_ties_break_by_first_seen_order() {
        let answers = vec![
            answered(Some("Geometry"), false),
            answered(Some("Algebra"), false),
            answered(Some("Fractions"), false),
        ];

        let (weak, _) = weak_and_strong_areas(&answers);
        assert_eq!(weak, vec!["Geometry", "Algebra", "Fractions"]);
    }

    #[test]
    fn test_lists_are_capped_at_three() {
        let answers: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|t| answered(Some(t), false))
            .collect();

        let (weak, strong) = weak_and_strong_areas(&answers);
        assert_eq!(weak.len(), 3);
        assert!(strong.is_empty());
    }

    #[test]
    fn test_untagged_answers_are_skipped() {
        let answers = vec![
            answered(None, false),
            answered(Some(""), false),
            answered(Some("  "), false),
            answered(Some("Algebra"), false),
        ];

        let (weak, _) = weak_and_strong_areas(&answers);
        assert_eq!(weak, vec!["Algebra"]);
    }

    #[test]
    fn test_weak_and_strong_are_disjoint_without_overlap() {
        let answers = vec![
            answered(Some("Algebra"), false),
            answered(Some("Geometry"), true),
        ];

        let (weak, strong) = weak_and_strong_areas(&answers);
        assert!(weak.iter().all(|t| !strong.contains(t)));
    }
}
