// src/recommend/study_plan.rs

use crate::config::{MAX_SUPPLEMENTARY_WEEKS, SUPPLEMENTARY_SCORE_THRESHOLD};
use crate::models::study_plan::{StudyWeek, WeekPlan};
use crate::recommend::performance::PerformanceLevel;

/// Fixed weekly skeleton every plan starts from. `{category}` is substituted
/// with the plan's category. Columns: focus, goals, resources, quiz topics.
const BASE_WEEK_TEMPLATES: [(&str, &[&str], &[&str], &[&str]); 4] = [
    (
        "{category} fundamentals",
        &["Understand the core concepts", "Finish the introductory material"],
        &["article:{category} overview"],
        &["{category} basics"],
    ),
    (
        "{category} core techniques",
        &["Work through guided examples", "Summarize each technique in your own words"],
        &["video:{category} walkthrough"],
        &["{category} techniques"],
    ),
    (
        "Applying {category}",
        &["Solve mixed exercises without notes", "Time yourself on a practice set"],
        &["practice:{category} exercises"],
        &["{category} applications", "Mixed review"],
    ),
    (
        "{category} consolidation",
        &["Retake earlier quizzes and compare scores", "Close out any remaining gaps"],
        &["practice:{category} final set"],
        &["Full {category} review"],
    ),
];

/// Goal strings appended to every week, keyed by performance level.
fn level_goals(level: PerformanceLevel) -> &'static [&'static str] {
    match level {
        PerformanceLevel::Excellent => &[
            "Tackle challenge problems beyond the syllabus",
            "Keep a short daily review streak going",
        ],
        PerformanceLevel::Good => &[
            "Close the gap on your remaining weak topics",
            "Aim for 90% on your next attempt",
        ],
        PerformanceLevel::Average => &[
            "Revisit fundamentals before moving on",
            "Retake quizzes on topics you missed",
        ],
        PerformanceLevel::NeedsImprovement => &[
            "Re-learn the basics with beginner resources",
            "Take untimed practice quizzes to build confidence",
        ],
    }
}

fn focus_prefix(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::NeedsImprovement => "Review and Master: ",
        PerformanceLevel::Excellent => "Advanced: ",
        _ => "",
    }
}

/// Synthetic resource identifier for drilling a weak area.
fn drill_resource(area: &str) -> String {
    format!("practice:{}", area.to_lowercase())
}

/// Builds a personalized study plan.
///
/// Starts from the fixed weekly skeleton and enhances every week for the
/// user: a level-dependent focus prefix, extra level goals, weak-area drill
/// resources prepended, and quiz topics reordered so weak areas come first.
/// When the recent average is below `SUPPLEMENTARY_SCORE_THRESHOLD` and weak
/// areas exist, one supplementary drill week per weak area (capped) is
/// appended after the regular schedule.
///
/// Pure function of its inputs: identical arguments always produce an
/// identical plan.
pub fn build_study_plan(
    category: &str,
    level: PerformanceLevel,
    weak_areas: &[String],
    average_percentage: f64,
) -> Vec<StudyWeek> {
    let mut weeks: Vec<StudyWeek> = BASE_WEEK_TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, (focus, goals, resources, quiz_topics))| {
            let plan = enhance_week(
                WeekPlan {
                    focus: fill(focus, category),
                    goals: goals.iter().map(|g| fill(g, category)).collect(),
                    resources: resources.iter().map(|r| fill(r, category)).collect(),
                    quiz_topics: quiz_topics.iter().map(|t| fill(t, category)).collect(),
                },
                level,
                weak_areas,
            );
            StudyWeek::Regular {
                week: i as u32 + 1,
                plan,
            }
        })
        .collect();

    if average_percentage < SUPPLEMENTARY_SCORE_THRESHOLD && !weak_areas.is_empty() {
        for area in weak_areas.iter().take(MAX_SUPPLEMENTARY_WEEKS) {
            weeks.push(StudyWeek::Supplementary {
                plan: WeekPlan {
                    focus: format!("Weak area focus: {}", area),
                    goals: vec![
                        format!("Bring {} up to your overall level", area),
                        "Finish every drill in the resource list".to_string(),
                    ],
                    resources: vec![drill_resource(area)],
                    quiz_topics: vec![area.clone()],
                },
            });
        }
    }

    weeks
}

fn fill(template: &str, category: &str) -> String {
    template.replace("{category}", category)
}

fn enhance_week(mut plan: WeekPlan, level: PerformanceLevel, weak_areas: &[String]) -> WeekPlan {
    plan.focus = format!("{}{}", focus_prefix(level), plan.focus);

    plan.goals
        .extend(level_goals(level).iter().map(|g| g.to_string()));

    // Weak-area drills go in front of the week's regular resources.
    let mut resources: Vec<String> = weak_areas.iter().map(|a| drill_resource(a)).collect();
    resources.append(&mut plan.resources);
    plan.resources = resources;

    // Front-load weak areas in the quiz rotation, keeping the remaining
    // topics in their original order.
    let mut quiz_topics: Vec<String> = weak_areas.to_vec();
    quiz_topics.extend(
        plan.quiz_topics
            .iter()
            .filter(|t| !weak_areas.iter().any(|w| w.eq_ignore_ascii_case(t)))
            .cloned(),
    );
    plan.quiz_topics = quiz_topics;

    plan
}
