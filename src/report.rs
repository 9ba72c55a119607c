// src/report.rs - deterministic local narrative
//
// Turns the numeric scorecard into a readable report: a summary with
// named strengths and weaknesses, a ranked problem list, de-duplicated
// recommendations and a templated training plan. This path is fully
// deterministic and serves as the mandatory fallback when the external
// narrative service is unavailable.

use serde::{Deserialize, Serialize};

use crate::dimensions::consistency::{self, ConsistencyConfig, ConsistencyLevel};
use crate::dimensions::{
    coordination, joint_angles, kinetic_chain, stability, style, symmetry, timing,
};
use crate::engine::DimensionScores;

pub const MAX_PROBLEMS: usize = 5;
pub const MAX_RECOMMENDATIONS: usize = 8;

pub const DISCLAIMER: &str = "Important notes:\n\
1. This analysis is computer-vision based; every measurement carries a stated error margin (±15-25°).\n\
2. Results are informational only and are not professional medical or coaching advice.\n\
3. There is no single correct shooting form; joint angles among professionals differ by 50° or more.\n\
4. Mechanical changes do not guarantee better accuracy; mindset and defensive pressure matter just as much.\n\
5. Stop and consult a physician or coach if you feel any discomfort.\n\
\n\
Scientific basis: kinematic analysis grounded in motion research (Slegers et al. 2021; Cabarkapa et al. 2022). This is a kinematic, not kinetic, measurement.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub title: String,
    pub description: String,
    pub exercises: Vec<Exercise>,
    pub duration_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiReport {
    pub summary: String,
    pub problems: Vec<String>,
    pub recommendations: Vec<String>,
    pub training_plan: TrainingPlan,
    pub disclaimer: String,
}

pub fn generate_report(dimensions: &DimensionScores, overall_score: f64) -> AiReport {
    let mut problems = Vec::new();
    let mut recommendations = Vec::new();

    let consistency_cfg = ConsistencyConfig::default();
    if dimensions.consistency.overall_consistency != ConsistencyLevel::High {
        problems.push("Motion consistency has room to improve".to_string());
    }
    recommendations.extend(consistency::recommendations(&dimensions.consistency, &consistency_cfg));

    if dimensions.joint_angles.score < 70.0 {
        problems.push("Some joint angles sit outside their optimal ranges".to_string());
    }
    recommendations.extend(joint_angles::recommendations(&dimensions.joint_angles));

    if dimensions.symmetry.score < 65.0 {
        problems.push("Body symmetry needs improvement".to_string());
    }
    recommendations.extend(symmetry::recommendations(&dimensions.symmetry));

    recommendations.extend(style::recommendations(&dimensions.shooting_style));

    if dimensions.timing.score < 65.0 {
        problems.push("Shot rhythm needs adjustment".to_string());
    }
    recommendations.extend(timing::recommendations(&dimensions.timing));

    if dimensions.stability.score < 65.0 {
        problems.push("Shooting stability is lacking".to_string());
    }
    recommendations.extend(stability::recommendations(&dimensions.stability));

    if dimensions.coordination.score < 65.0 {
        problems.push("Joint coordination needs strengthening".to_string());
    }
    recommendations.extend(coordination::recommendations(&dimensions.coordination));

    if dimensions.kinetic_chain.score < 65.0 {
        problems.push("The firing sequence needs optimization".to_string());
    }
    recommendations.extend(kinetic_chain::recommendations(&dimensions.kinetic_chain));

    AiReport {
        summary: summary(dimensions, overall_score),
        problems: dedup_capped(problems, MAX_PROBLEMS),
        recommendations: dedup_capped(recommendations, MAX_RECOMMENDATIONS),
        training_plan: training_plan(dimensions, overall_score),
        disclaimer: DISCLAIMER.to_string(),
    }
}

/// First occurrence wins; order is preserved.
fn dedup_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).take(cap).collect()
}

fn summary(dimensions: &DimensionScores, overall_score: f64) -> String {
    let mut text = if overall_score >= 85.0 {
        format!("Your shooting form is excellent overall ({overall_score:.0} pts).")
    } else if overall_score >= 70.0 {
        format!("Your shooting form is good ({overall_score:.0} pts) with room to grow.")
    } else if overall_score >= 55.0 {
        format!("Your shooting form is average ({overall_score:.0} pts); targeted work will pay off.")
    } else {
        format!("Your shooting form needs significant work ({overall_score:.0} pts); start from the fundamentals.")
    };

    let mut strengths = Vec::new();
    if dimensions.consistency.score >= 75.0 {
        strengths.push("motion consistency");
    }
    if dimensions.stability.score >= 75.0 {
        strengths.push("stability");
    }
    if dimensions.kinetic_chain.score >= 75.0 {
        strengths.push("kinetic-chain coordination");
    }
    if !strengths.is_empty() {
        text.push_str(&format!(" Strengths: {}.", strengths.join(", ")));
    }

    let mut weaknesses = Vec::new();
    if dimensions.consistency.score < 60.0 {
        weaknesses.push("motion consistency");
    }
    if dimensions.stability.score < 60.0 {
        weaknesses.push("stability");
    }
    if dimensions.kinetic_chain.score < 60.0 {
        weaknesses.push("kinetic-chain coordination");
    }
    if !weaknesses.is_empty() {
        text.push_str(&format!(" Priorities to improve: {}.", weaknesses.join(", ")));
    }

    text
}

fn training_plan(dimensions: &DimensionScores, overall_score: f64) -> TrainingPlan {
    let mut exercises = Vec::new();

    if dimensions.consistency.score < 70.0 {
        exercises.push(Exercise {
            name: "Spot shooting".to_string(),
            description: "Shoot 10 in a row from one spot, repeating the exact same rhythm each time"
                .to_string(),
            sets: Some(3),
            reps: Some(10),
            duration: None,
        });
    }
    if dimensions.stability.score < 70.0 {
        exercises.push(Exercise {
            name: "Single-leg balance".to_string(),
            description: "Stand on the shooting-side leg for 30 seconds to build a quiet base"
                .to_string(),
            sets: None,
            reps: None,
            duration: Some("30s x 3 sets".to_string()),
        });
    }
    if dimensions.kinetic_chain.score < 70.0 {
        exercises.push(Exercise {
            name: "Hip-led squats".to_string(),
            description: "Initiate each squat from the hips and feel the force travel upward"
                .to_string(),
            sets: Some(3),
            reps: Some(10),
            duration: None,
        });
    }
    if dimensions.timing.score < 70.0 {
        exercises.push(Exercise {
            name: "Metronome shooting".to_string(),
            description: "Shoot on a two-second beat to groove a steady cadence".to_string(),
            sets: None,
            reps: None,
            duration: Some("5 minutes".to_string()),
        });
    }

    // always included, whatever the scores
    exercises.push(Exercise {
        name: "Close-range shooting".to_string(),
        description: "Shoot from one step inside the free-throw line, focusing on form over distance"
            .to_string(),
        sets: Some(3),
        reps: Some(15),
        duration: None,
    });
    exercises.push(Exercise {
        name: "Form-shooting warmup".to_string(),
        description: "One-handed form shots from close range before every session".to_string(),
        sets: Some(2),
        reps: Some(10),
        duration: None,
    });

    let duration_weeks = if overall_score >= 70.0 {
        4
    } else if overall_score >= 55.0 {
        6
    } else {
        8
    };

    TrainingPlan {
        title: "Personalized training plan".to_string(),
        description: format!(
            "Targeted plan built from your analysis result ({overall_score:.0} pts)"
        ),
        exercises,
        duration_weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalysisEngine;
    use crate::pose::{synthetic_shot_sequence, CameraAngle};

    fn scorecard() -> DimensionScores {
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        AnalysisEngine::default()
            .analyze(&sequence, CameraAngle::Side)
            .unwrap()
            .dimensions
    }

    #[test]
    fn report_respects_caps_and_carries_disclaimer() {
        let dims = scorecard();
        let report = generate_report(&dims, 40.0);
        assert!(report.problems.len() <= MAX_PROBLEMS);
        assert!(report.recommendations.len() <= MAX_RECOMMENDATIONS);
        assert_eq!(report.disclaimer, DISCLAIMER);
    }

    #[test]
    fn summary_bucket_follows_overall_score() {
        let dims = scorecard();
        assert!(generate_report(&dims, 90.0).summary.contains("excellent"));
        assert!(generate_report(&dims, 75.0).summary.contains("good"));
        assert!(generate_report(&dims, 60.0).summary.contains("average"));
        assert!(generate_report(&dims, 40.0).summary.contains("significant work"));
    }

    #[test]
    fn plan_duration_scales_with_score() {
        let dims = scorecard();
        assert_eq!(generate_report(&dims, 80.0).training_plan.duration_weeks, 4);
        assert_eq!(generate_report(&dims, 60.0).training_plan.duration_weeks, 6);
        assert_eq!(generate_report(&dims, 40.0).training_plan.duration_weeks, 8);
    }

    #[test]
    fn generic_exercises_are_always_included() {
        let dims = scorecard();
        let plan = generate_report(&dims, 95.0).training_plan;
        let names: Vec<&str> = plan.exercises.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"Close-range shooting"));
        assert!(names.contains(&"Form-shooting warmup"));
    }

    #[test]
    fn recommendations_are_deduplicated() {
        let items = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
        ];
        assert_eq!(dedup_capped(items, 8), vec!["a", "b", "c"]);
        let many: Vec<String> = (0..20).map(|i| format!("rec {i}")).collect();
        assert_eq!(dedup_capped(many, 8).len(), 8);
    }

    #[test]
    fn report_is_deterministic() {
        let dims = scorecard();
        assert_eq!(generate_report(&dims, 72.0), generate_report(&dims, 72.0));
    }
}
