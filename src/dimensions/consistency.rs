// src/dimensions/consistency.rs - motion consistency (core dimension)
//
// Repetition-to-repetition variability of the dominant knee, elbow and
// wrist angles, measured as coefficient of variation. Consistency is
// the strongest single predictor of shooting accuracy in the motion
// literature (Slegers et al. 2021, r = -0.96).

use serde::{Deserialize, Serialize};

use crate::angles::{JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::{ErrorMargin, MIN_SAMPLES};
use crate::math;
use crate::pose::CameraAngle;

#[derive(Debug, Clone)]
pub struct ConsistencyConfig {
    /// Std-dev thresholds (degrees) above which a joint earns a
    /// recommendation.
    pub knee_threshold: f64,
    pub elbow_threshold: f64,
    pub wrist_threshold: f64,
    pub knee_weight: f64,
    pub elbow_weight: f64,
    pub wrist_weight: f64,
    /// CV at or below this scores 100.
    pub optimal_cv: f64,
    /// CV at or beyond this scores 0.
    pub max_acceptable_cv: f64,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            knee_threshold: 8.0,
            elbow_threshold: 6.0,
            wrist_threshold: 4.0,
            knee_weight: 0.35,
            elbow_weight: 0.35,
            wrist_weight: 0.30,
            optimal_cv: 0.05,
            max_acceptable_cv: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyDetails {
    pub knee_angles: Vec<f64>,
    pub elbow_angles: Vec<f64>,
    pub wrist_angles: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyAnalysis {
    pub score: f64,
    pub knee_angle_std: f64,
    pub elbow_angle_std: f64,
    pub wrist_angle_std: f64,
    pub overall_consistency: ConsistencyLevel,
    pub error_margin: ErrorMargin,
    pub details: ConsistencyDetails,
}

pub fn analyze(
    series: &JointSeriesMap,
    dominant: Side,
    camera: CameraAngle,
    cfg: &ConsistencyConfig,
) -> ConsistencyAnalysis {
    let knee = series.get(JointType::of(JointKind::Knee, dominant));
    let elbow = series.get(JointType::of(JointKind::Elbow, dominant));
    let wrist = series.get(JointType::of(JointKind::Wrist, dominant));

    if knee.angles.len() < MIN_SAMPLES
        && elbow.angles.len() < MIN_SAMPLES
        && wrist.angles.len() < MIN_SAMPLES
    {
        return ConsistencyAnalysis {
            score: 50.0,
            knee_angle_std: 0.0,
            elbow_angle_std: 0.0,
            wrist_angle_std: 0.0,
            overall_consistency: ConsistencyLevel::Medium,
            error_margin: ErrorMargin::angular(camera),
            details: ConsistencyDetails {
                knee_angles: vec![],
                elbow_angles: vec![],
                wrist_angles: vec![],
            },
        };
    }

    let knee_cv = math::coefficient_of_variation(&knee.angles);
    let elbow_cv = math::coefficient_of_variation(&elbow.angles);
    let wrist_cv = math::coefficient_of_variation(&wrist.angles);

    let knee_score = math::score_from_deviation(knee_cv, cfg.optimal_cv, cfg.max_acceptable_cv);
    let elbow_score = math::score_from_deviation(elbow_cv, cfg.optimal_cv, cfg.max_acceptable_cv);
    let wrist_score = math::score_from_deviation(wrist_cv, cfg.optimal_cv, cfg.max_acceptable_cv);

    let score = (knee_score * cfg.knee_weight
        + elbow_score * cfg.elbow_weight
        + wrist_score * cfg.wrist_weight)
        .round();

    let avg_cv = (knee_cv + elbow_cv + wrist_cv) / 3.0;
    let overall_consistency = if avg_cv <= 0.08 {
        ConsistencyLevel::High
    } else if avg_cv <= 0.15 {
        ConsistencyLevel::Medium
    } else {
        ConsistencyLevel::Low
    };

    ConsistencyAnalysis {
        score,
        knee_angle_std: math::round1(knee.std_dev),
        elbow_angle_std: math::round1(elbow.std_dev),
        wrist_angle_std: math::round1(wrist.std_dev),
        overall_consistency,
        error_margin: ErrorMargin::angular(camera),
        details: ConsistencyDetails {
            knee_angles: knee.angles.clone(),
            elbow_angles: elbow.angles.clone(),
            wrist_angles: wrist.angles.clone(),
        },
    }
}

pub fn recommendations(analysis: &ConsistencyAnalysis, cfg: &ConsistencyConfig) -> Vec<String> {
    let mut recs = Vec::new();

    if analysis.knee_angle_std > cfg.knee_threshold {
        recs.push(format!(
            "Knee angle varies widely (std ±{:.1}°); add lower-body strength work to stabilize the base",
            analysis.knee_angle_std
        ));
    }
    if analysis.elbow_angle_std > cfg.elbow_threshold {
        recs.push(format!(
            "Elbow path is unstable (std ±{:.1}°); groove a fixed set point to reduce arm sway",
            analysis.elbow_angle_std
        ));
    }
    if analysis.wrist_angle_std > cfg.wrist_threshold {
        recs.push(format!(
            "Wrist release point is inconsistent (std ±{:.1}°); work on wrist flexibility and a standardized release",
            analysis.wrist_angle_std
        ));
    }
    if analysis.overall_consistency == ConsistencyLevel::High {
        recs.push(
            "Motion consistency is excellent; keep the current training rhythm and raise volume to build accuracy"
                .to_string(),
        );
    }

    recs
}
