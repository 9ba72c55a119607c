// src/dimensions/symmetry.rs - left/right symmetry
//
// A shot does not need mirror symmetry, but the two sides should move
// in a coordinated way. Each knee/elbow/shoulder pair is scored as a
// blend of mean-angle difference, range-of-motion difference and the
// absolute Pearson correlation between the two time series.

use serde::{Deserialize, Serialize};

use crate::angles::{JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::{ErrorMargin, MIN_SAMPLES};
use crate::math;
use crate::pose::CameraAngle;

#[derive(Debug, Clone)]
pub struct SymmetryConfig {
    /// Acceptable left/right differences in degrees.
    pub knee_diff: f64,
    pub elbow_diff: f64,
    pub shoulder_diff: f64,
    pub knee_weight: f64,
    pub elbow_weight: f64,
    pub shoulder_weight: f64,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            knee_diff: 15.0,
            elbow_diff: 10.0,
            shoulder_diff: 8.0,
            knee_weight: 0.30,
            elbow_weight: 0.30,
            shoulder_weight: 0.40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryAnalysis {
    pub score: f64,
    /// Mean absolute correlation between paired series, 0-100.
    pub left_right_balance: f64,
    pub knee_symmetry: f64,
    pub elbow_symmetry: f64,
    pub shoulder_symmetry: f64,
    pub error_margin: ErrorMargin,
}

pub fn analyze(
    series: &JointSeriesMap,
    camera: CameraAngle,
    cfg: &SymmetryConfig,
) -> SymmetryAnalysis {
    let knee_symmetry = pair_symmetry(series, JointKind::Knee, cfg.knee_diff);
    let elbow_symmetry = pair_symmetry(series, JointKind::Elbow, cfg.elbow_diff);
    let shoulder_symmetry = pair_symmetry(series, JointKind::Shoulder, cfg.shoulder_diff);

    let mut balance_scores = Vec::new();
    for kind in [JointKind::Knee, JointKind::Elbow] {
        let left = series.get(JointType::of(kind, Side::Left));
        let right = series.get(JointType::of(kind, Side::Right));
        if !left.angles.is_empty() && !right.angles.is_empty() {
            let n = left.angles.len().min(right.angles.len());
            let corr = math::correlation(&left.angles[..n], &right.angles[..n]);
            balance_scores.push(corr.abs() * 100.0);
        }
    }
    let left_right_balance =
        if balance_scores.is_empty() { 50.0 } else { math::mean(&balance_scores).round() };

    let score = (knee_symmetry * cfg.knee_weight
        + elbow_symmetry * cfg.elbow_weight
        + shoulder_symmetry * cfg.shoulder_weight)
        .round();

    SymmetryAnalysis {
        score,
        left_right_balance,
        knee_symmetry: knee_symmetry.round(),
        elbow_symmetry: elbow_symmetry.round(),
        shoulder_symmetry: shoulder_symmetry.round(),
        error_margin: ErrorMargin::bilateral(camera),
    }
}

fn pair_symmetry(series: &JointSeriesMap, kind: JointKind, acceptable_diff: f64) -> f64 {
    let left = series.get(JointType::of(kind, Side::Left));
    let right = series.get(JointType::of(kind, Side::Right));

    if left.angles.is_empty() || right.angles.is_empty() {
        return 50.0;
    }

    let mean_diff = (left.mean - right.mean).abs();
    let range_diff = (left.range() - right.range()).abs();

    let n = left.angles.len().min(right.angles.len());
    let corr = if n > MIN_SAMPLES {
        math::correlation(&left.angles[..n], &right.angles[..n]).abs()
    } else {
        0.0
    };

    let mean_score = math::score_from_deviation(mean_diff, 0.0, acceptable_diff);
    let range_score = math::score_from_deviation(range_diff, 0.0, acceptable_diff);
    let corr_score = corr * 100.0;

    mean_score * 0.4 + range_score * 0.3 + corr_score * 0.3
}

pub fn recommendations(analysis: &SymmetryAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    if analysis.knee_symmetry < 60.0 {
        recs.push(format!(
            "Lower-body symmetry is weak ({:.0} pts); strengthen the off leg to stabilize the base",
            analysis.knee_symmetry
        ));
    }
    if analysis.elbow_symmetry < 60.0 {
        recs.push(format!(
            "Arm symmetry needs work ({:.0} pts); keep the guide arm quiet instead of swinging it",
            analysis.elbow_symmetry
        ));
    }
    if analysis.shoulder_symmetry < 70.0 {
        recs.push(format!(
            "Shoulder alignment is off ({:.0} pts); keep both shoulders level through the shot",
            analysis.shoulder_symmetry
        ));
    }
    if analysis.left_right_balance < 60.0 {
        recs.push(format!(
            "Left/right coordination is lacking (balance {:.0}%); add mirror drills for bilateral control",
            analysis.left_right_balance
        ));
    }
    if analysis.score >= 80.0 {
        recs.push(
            "Body symmetry is good; hold this posture, it is the foundation of a repeatable shot"
                .to_string(),
        );
    }

    recs
}
