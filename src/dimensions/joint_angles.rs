// src/dimensions/joint_angles.rs - mean joint angle vs optimal ranges
//
// Compares each joint's mean angle against reference ranges drawn from
// professional shooting-form studies. Inside the range scores 100,
// then decays linearly to 0 at 30 degrees past either boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::angles::{joint_definition, JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::ErrorMargin;
use crate::math;
use crate::pose::CameraAngle;

#[derive(Debug, Clone)]
pub struct JointAnglesConfig {
    /// Degrees past a range boundary at which the joint scores 0.
    pub max_deviation: f64,
    /// Dominant-side joints count this much more.
    pub dominant_multiplier: f64,
    pub knee_weight: f64,
    pub hip_weight: f64,
    pub shoulder_weight: f64,
    pub elbow_weight: f64,
    pub wrist_weight: f64,
}

impl Default for JointAnglesConfig {
    fn default() -> Self {
        Self {
            max_deviation: 30.0,
            dominant_multiplier: 1.5,
            knee_weight: 0.25,
            hip_weight: 0.15,
            shoulder_weight: 0.20,
            elbow_weight: 0.25,
            wrist_weight: 0.15,
        }
    }
}

impl JointAnglesConfig {
    fn kind_weight(&self, kind: JointKind) -> f64 {
        match kind {
            JointKind::Knee => self.knee_weight,
            JointKind::Hip => self.hip_weight,
            JointKind::Shoulder => self.shoulder_weight,
            JointKind::Elbow => self.elbow_weight,
            JointKind::Wrist => self.wrist_weight,
        }
    }
}

/// Mid-range target used only for the reported deviation.
fn target_angle(kind: JointKind) -> f64 {
    match kind {
        JointKind::Knee => 120.0,
        JointKind::Hip => 100.0,
        JointKind::Shoulder => 90.0,
        JointKind::Elbow => 165.0,
        JointKind::Wrist => 170.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngleReport {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub optimal_range: (f64, f64),
    pub deviation_from_optimal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAnglesAnalysis {
    pub score: f64,
    pub angles: BTreeMap<JointType, JointAngleReport>,
    pub error_margin: ErrorMargin,
}

pub fn analyze(
    series: &JointSeriesMap,
    dominant: Side,
    camera: CameraAngle,
    cfg: &JointAnglesConfig,
) -> JointAnglesAnalysis {
    let mut angles = BTreeMap::new();
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for s in series.iter() {
        if s.angles.is_empty() {
            continue;
        }
        let def = joint_definition(s.joint);
        let (lo, hi) = match def.optimal_range {
            Some(range) => range,
            None => continue,
        };

        let joint_score = range_score(s.mean, lo, hi, cfg.max_deviation);
        let side_multiplier =
            if s.joint.side() == dominant { cfg.dominant_multiplier } else { 1.0 };
        let weight = cfg.kind_weight(s.joint.kind()) * side_multiplier;

        angles.insert(
            s.joint,
            JointAngleReport {
                mean: math::round1(s.mean),
                min: math::round1(s.min),
                max: math::round1(s.max),
                optimal_range: (lo, hi),
                deviation_from_optimal: math::round1(s.mean - target_angle(s.joint.kind())),
            },
        );

        total_score += joint_score * weight;
        total_weight += weight;
    }

    let score = if total_weight > 0.0 { (total_score / total_weight).round() } else { 50.0 };

    JointAnglesAnalysis { score, angles, error_margin: ErrorMargin::angular(camera) }
}

fn range_score(mean_angle: f64, lo: f64, hi: f64, max_deviation: f64) -> f64 {
    if mean_angle >= lo && mean_angle <= hi {
        return 100.0;
    }
    let deviation = if mean_angle < lo { lo - mean_angle } else { mean_angle - hi };
    math::score_from_deviation(deviation, 0.0, max_deviation)
}

pub fn recommendations(analysis: &JointAnglesAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    for (joint, report) in &analysis.angles {
        if report.deviation_from_optimal.abs() > 15.0 {
            let direction = if report.deviation_from_optimal > 0.0 { "high" } else { "low" };
            recs.push(format!(
                "The {} angle runs {} (off target by {:.1}°); bring it into the {:.0}-{:.0}° range",
                joint.label(),
                direction,
                report.deviation_from_optimal.abs(),
                report.optimal_range.0,
                report.optimal_range.1,
            ));
        }
    }

    if analysis.score >= 80.0 {
        recs.push(
            "Joint angles look good overall; keep the current shooting posture".to_string(),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::test_util::series_from;
    use crate::angles::JointSeriesMap;

    #[test]
    fn in_range_means_score_100() {
        // every joint sits at its target angle
        let map = JointSeriesMap::from_fn(|j| {
            series_from(j, &[target_angle(j.kind()); 8])
        });
        let out = analyze(&map, Side::Right, CameraAngle::Side, &JointAnglesConfig::default());
        assert_eq!(out.score, 100.0);
        assert_eq!(out.angles.len(), 10);
    }

    #[test]
    fn far_out_of_range_means_zero() {
        // 30 degrees or more past every boundary
        let map = JointSeriesMap::from_fn(|j| {
            let def = joint_definition(j);
            let (lo, _) = def.optimal_range.unwrap();
            series_from(j, &[lo - 35.0; 8])
        });
        let out = analyze(&map, Side::Right, CameraAngle::Side, &JointAnglesConfig::default());
        assert_eq!(out.score, 0.0);
    }

    #[test]
    fn boundary_decay_is_linear() {
        assert_eq!(range_score(120.0, 100.0, 140.0, 30.0), 100.0);
        assert_eq!(range_score(155.0, 100.0, 140.0, 30.0), 50.0);
        assert_eq!(range_score(85.0, 100.0, 140.0, 30.0), 50.0);
        assert_eq!(range_score(170.0, 100.0, 140.0, 30.0), 0.0);
    }

    #[test]
    fn empty_map_is_neutral() {
        let map = JointSeriesMap::from_fn(|j| series_from(j, &[]));
        let out = analyze(&map, Side::Right, CameraAngle::Side, &JointAnglesConfig::default());
        assert_eq!(out.score, 50.0);
        assert!(out.angles.is_empty());
    }

    #[test]
    fn dominant_side_deviation_costs_more() {
        let cfg = JointAnglesConfig::default();
        // right elbow badly out of range, everything else on target
        let bad_dominant = JointSeriesMap::from_fn(|j| match j {
            JointType::RightElbow => series_from(j, &[110.0; 8]),
            _ => series_from(j, &[target_angle(j.kind()); 8]),
        });
        let bad_off = JointSeriesMap::from_fn(|j| match j {
            JointType::LeftElbow => series_from(j, &[110.0; 8]),
            _ => series_from(j, &[target_angle(j.kind()); 8]),
        });
        let dom = analyze(&bad_dominant, Side::Right, CameraAngle::Side, &cfg);
        let off = analyze(&bad_off, Side::Right, CameraAngle::Side, &cfg);
        assert!(dom.score < off.score);
    }

    #[test]
    fn large_deviation_earns_recommendation() {
        let map = JointSeriesMap::from_fn(|j| match j {
            JointType::RightElbow => series_from(j, &[140.0; 8]),
            _ => series_from(j, &[target_angle(j.kind()); 8]),
        });
        let out = analyze(&map, Side::Right, CameraAngle::Side, &JointAnglesConfig::default());
        let recs = recommendations(&out);
        assert!(recs.iter().any(|r| r.contains("right elbow")));
    }
}
