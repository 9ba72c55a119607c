// src/dimensions/coordination.rs - inter-joint coordination
//
// Scores how well joints move together: the hip/knee pair driving the
// legs, the elbow/wrist pair timing the release, and a chain-wide sync
// coefficient from adjacent-joint correlations.

use serde::{Deserialize, Serialize};

use crate::angles::{JointAngleSeries, JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::MIN_SAMPLES;
use crate::math;

#[derive(Debug, Clone)]
pub struct CoordinationConfig {
    pub hip_knee_weight: f64,
    pub elbow_wrist_weight: f64,
    /// Frames between elbow peak and wrist peak for a perfect release.
    pub ideal_elbow_wrist_delay: f64,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self { hip_knee_weight: 0.5, elbow_wrist_weight: 0.5, ideal_elbow_wrist_delay: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationAnalysis {
    pub score: f64,
    /// Mean adjacent-joint correlation along the dominant chain, 0-1.
    pub joint_sync_coefficient: f64,
    pub hip_knee_coordination: f64,
    pub elbow_wrist_coordination: f64,
}

pub fn analyze(
    series: &JointSeriesMap,
    dominant: Side,
    cfg: &CoordinationConfig,
) -> CoordinationAnalysis {
    let hip_knee = hip_knee_coordination(series, dominant);
    let elbow_wrist = elbow_wrist_coordination(series, dominant, cfg);
    let sync = sync_coefficient(series, dominant);

    let score =
        (hip_knee * cfg.hip_knee_weight + elbow_wrist * cfg.elbow_wrist_weight).round();

    CoordinationAnalysis {
        score,
        joint_sync_coefficient: math::round2(sync),
        hip_knee_coordination: hip_knee.round(),
        elbow_wrist_coordination: elbow_wrist.round(),
    }
}

fn paired_correlation(a: &JointAngleSeries, b: &JointAngleSeries) -> f64 {
    let n = a.angles.len().min(b.angles.len());
    math::correlation(&a.angles[..n], &b.angles[..n]).abs()
}

/// Correlation (60%) plus range-of-motion ratio (40%): hip and knee
/// should flex together and by comparable amounts.
fn hip_knee_coordination(series: &JointSeriesMap, dominant: Side) -> f64 {
    let hip = series.get(JointType::of(JointKind::Hip, dominant));
    let knee = series.get(JointType::of(JointKind::Knee, dominant));

    if hip.angles.len() < MIN_SAMPLES || knee.angles.len() < MIN_SAMPLES {
        return 50.0;
    }

    let corr = paired_correlation(hip, knee);
    let range_ratio =
        hip.range().min(knee.range()) / hip.range().max(knee.range()).max(1.0);

    corr * 60.0 + range_ratio * 40.0
}

/// Peak-to-peak delay vs the one-frame ideal (50%) plus correlation (50%).
fn elbow_wrist_coordination(
    series: &JointSeriesMap,
    dominant: Side,
    cfg: &CoordinationConfig,
) -> f64 {
    let elbow = series.get(JointType::of(JointKind::Elbow, dominant));
    let wrist = series.get(JointType::of(JointKind::Wrist, dominant));

    if elbow.angles.len() < MIN_SAMPLES || wrist.angles.len() < MIN_SAMPLES {
        return 50.0;
    }

    let delay =
        math::argmax(&elbow.angles).abs_diff(math::argmax(&wrist.angles)) as f64;
    let delay_diff = (delay - cfg.ideal_elbow_wrist_delay).abs();
    let timing_score = (100.0 - delay_diff * 20.0).max(0.0);

    let flow_score = paired_correlation(elbow, wrist) * 100.0;

    timing_score * 0.5 + flow_score * 0.5
}

/// Mean absolute correlation over the adjacent pairs of the dominant
/// chain hip, knee, shoulder, elbow, wrist.
fn sync_coefficient(series: &JointSeriesMap, dominant: Side) -> f64 {
    let chain = [
        JointKind::Hip,
        JointKind::Knee,
        JointKind::Shoulder,
        JointKind::Elbow,
        JointKind::Wrist,
    ];

    let mut correlations = Vec::new();
    for pair in chain.windows(2) {
        let a = series.get(JointType::of(pair[0], dominant));
        let b = series.get(JointType::of(pair[1], dominant));
        if a.angles.len() > MIN_SAMPLES && b.angles.len() > MIN_SAMPLES {
            correlations.push(paired_correlation(a, b));
        }
    }

    if correlations.is_empty() { 0.5 } else { math::mean(&correlations) }
}

pub fn recommendations(analysis: &CoordinationAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    if analysis.joint_sync_coefficient < 0.6 {
        recs.push(format!(
            "Joint synchronization is low (coefficient {:.2}); train whole-body movements to feel force travel up the chain.",
            analysis.joint_sync_coefficient
        ));
    }
    if analysis.hip_knee_coordination < 60.0 {
        recs.push(format!(
            "Hip/knee coordination needs work ({:.0} pts); hips and knees should flex together in the dip, not knees alone. Drills: synchronized squats.",
            analysis.hip_knee_coordination
        ));
    }
    if analysis.elbow_wrist_coordination < 60.0 {
        recs.push(format!(
            "Elbow/wrist coordination is weak ({:.0} pts); the wrist snap should flow straight out of elbow extension. Drills: close-range form shooting.",
            analysis.elbow_wrist_coordination
        ));
    }
    if analysis.score >= 75.0 {
        recs.push(
            "Coordination is excellent; the joints work together and the chain transfers cleanly."
                .to_string(),
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
    fn synchronized_chain_scores_high() {
        // every joint follows the same dip-and-rise curve
        let curve: Vec<f64> =
            (0..20).map(|i| 120.0 - 20.0 * ((i as f64 - 10.0).abs() / 10.0 - 1.0).abs()).collect();
        let map = JointSeriesMap::from_fn(|j| series_from(j, &curve));
        let out = analyze(&map, Side::Right, &CoordinationConfig::default());
        assert!(out.joint_sync_coefficient > 0.95);
        assert!(out.hip_knee_coordination >= 90.0);
        assert!(out.score >= 85.0, "got {}", out.score);
    }

    #[test]
    fn uncorrelated_joints_score_low() {
        let up: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 2.0).collect();
        let noise: Vec<f64> =
            (0..20).map(|i| if i % 2 == 0 { 100.0 } else { 140.0 }).collect();
        let map = JointSeriesMap::from_fn(|j| match j.kind() {
            JointKind::Hip | JointKind::Shoulder | JointKind::Wrist => series_from(j, &up),
            _ => series_from(j, &noise),
        });
        let out = analyze(&map, Side::Right, &CoordinationConfig::default());
        assert!(out.joint_sync_coefficient < 0.6);
    }

    #[test]
    fn short_series_is_neutral() {
        let map = JointSeriesMap::from_fn(|j| series_from(j, &[100.0, 110.0]));
        let out = analyze(&map, Side::Right, &CoordinationConfig::default());
        assert_eq!(out.hip_knee_coordination, 50.0);
        assert_eq!(out.elbow_wrist_coordination, 50.0);
        assert_eq!(out.joint_sync_coefficient, 0.5);
        assert_eq!(out.score, 50.0);
    }

    #[test]
    fn late_wrist_peak_hurts_release_timing() {
        let cfg = CoordinationConfig::default();
        // elbow peaks at 10, wrist at 18
        let elbow: Vec<f64> =
            (0..20).map(|i| 160.0 - (i as f64 - 10.0).abs() * 4.0).collect();
        let wrist: Vec<f64> =
            (0..20).map(|i| 170.0 - (i as f64 - 18.0).abs() * 2.0).collect();
        let tight_wrist: Vec<f64> =
            (0..20).map(|i| 170.0 - (i as f64 - 11.0).abs() * 2.0).collect();
        let late = JointSeriesMap::from_fn(|j| match j {
            JointType::RightElbow => series_from(j, &elbow),
            JointType::RightWrist => series_from(j, &wrist),
            _ => series_from(j, &[90.0; 20]),
        });
        let tight = JointSeriesMap::from_fn(|j| match j {
            JointType::RightElbow => series_from(j, &elbow),
            JointType::RightWrist => series_from(j, &tight_wrist),
            _ => series_from(j, &[90.0; 20]),
        });
        let a = analyze(&late, Side::Right, &cfg);
        let b = analyze(&tight, Side::Right, &cfg);
        assert!(a.elbow_wrist_coordination < b.elbow_wrist_coordination);
    }
}
