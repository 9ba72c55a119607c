// src/dimensions/stability.rs - base, upper-body and release stability
//
// Stability underpins consistency: a quiet base, a level shoulder and
// a repeatable release window. Scored from angle std-devs.

use serde::{Deserialize, Serialize};

use crate::angles::{JointKind, JointSeriesMap, JointType, Side};
use crate::math;

#[derive(Debug, Clone)]
pub struct StabilityConfig {
    pub base_weight: f64,
    pub upper_body_weight: f64,
    pub release_point_weight: f64,
    /// Knee std window (degrees): at or under `.0` scores 100, `.1` scores 0.
    pub knee_std_window: (f64, f64),
    pub shoulder_std_window: (f64, f64),
    pub release_std_window: (f64, f64),
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            base_weight: 0.40,
            upper_body_weight: 0.35,
            release_point_weight: 0.25,
            knee_std_window: (5.0, 15.0),
            shoulder_std_window: (3.0, 10.0),
            release_std_window: (2.0, 8.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityAnalysis {
    pub score: f64,
    pub base_stability: f64,
    pub upper_body_stability: f64,
    pub release_point_consistency: f64,
}

pub fn analyze(series: &JointSeriesMap, dominant: Side, cfg: &StabilityConfig) -> StabilityAnalysis {
    let base = base_stability(series, cfg);
    let upper = upper_body_stability(series, dominant, cfg);
    let release = release_point_consistency(series, dominant, cfg);

    let score = (base * cfg.base_weight
        + upper * cfg.upper_body_weight
        + release * cfg.release_point_weight)
        .round();

    StabilityAnalysis {
        score,
        base_stability: base.round(),
        upper_body_stability: upper.round(),
        release_point_consistency: release.round(),
    }
}

/// Left/right knee balance (40%) plus sway magnitude (60%).
fn base_stability(series: &JointSeriesMap, cfg: &StabilityConfig) -> f64 {
    let left = series.get(JointType::LeftKnee);
    let right = series.get(JointType::RightKnee);

    if left.angles.is_empty() || right.angles.is_empty() {
        return 50.0;
    }

    let balance = 1.0
        - (left.std_dev - right.std_dev).abs() / (left.std_dev + right.std_dev).max(0.1);
    let balance_score = balance * 100.0;

    let avg_std = (left.std_dev + right.std_dev) / 2.0;
    let movement_score =
        math::score_from_deviation(avg_std, cfg.knee_std_window.0, cfg.knee_std_window.1);

    balance_score * 0.4 + movement_score * 0.6
}

fn upper_body_stability(series: &JointSeriesMap, dominant: Side, cfg: &StabilityConfig) -> f64 {
    let shoulder = series.get(JointType::of(JointKind::Shoulder, dominant));
    if shoulder.angles.is_empty() {
        return 50.0;
    }
    math::score_from_deviation(
        shoulder.std_dev,
        cfg.shoulder_std_window.0,
        cfg.shoulder_std_window.1,
    )
}

/// Spread of the wrist angle inside a two-frame window either side of
/// its maximum, where the ball leaves the hand.
fn release_point_consistency(series: &JointSeriesMap, dominant: Side, cfg: &StabilityConfig) -> f64 {
    let wrist = series.get(JointType::of(JointKind::Wrist, dominant));
    if wrist.angles.len() < 3 {
        return 50.0;
    }

    let max_idx = math::argmax(&wrist.angles);
    let start = max_idx.saturating_sub(2);
    let end = (max_idx + 2).min(wrist.angles.len() - 1);
    let release_std = math::std_dev(&wrist.angles[start..=end]);

    math::score_from_deviation(
        release_std,
        cfg.release_std_window.0,
        cfg.release_std_window.1,
    )
}

pub fn recommendations(analysis: &StabilityAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    if analysis.base_stability < 60.0 {
        recs.push(format!(
            "The lower-body base is shaky ({:.0} pts); build core strength and balance. Drills: single-leg stands, squats.",
            analysis.base_stability
        ));
    }
    if analysis.upper_body_stability < 60.0 {
        recs.push(format!(
            "Upper-body control needs work ({:.0} pts); keep the shoulders quiet through the shot. Drills: wall push-up holds.",
            analysis.upper_body_stability
        ));
    }
    if analysis.release_point_consistency < 65.0 {
        recs.push(format!(
            "The release point wanders ({:.0} pts); fix one release position and build muscle memory. Drills: spot shooting.",
            analysis.release_point_consistency
        ));
    }
    if analysis.score >= 75.0 {
        recs.push(
            "Stability is excellent, the foundation of a quality shot; hold it while stretching out your range."
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
    fn quiet_base_and_release_score_high() {
        // barely moving knees and shoulder, flat release window
        let map = JointSeriesMap::from_fn(|j| match j.kind() {
            JointKind::Knee => series_from(j, &[120.0, 121.0, 120.5, 121.0, 120.0, 120.5]),
            JointKind::Shoulder => series_from(j, &[90.0, 90.5, 90.0, 91.0, 90.5, 90.0]),
            _ => series_from(j, &[170.0, 170.5, 171.0, 170.5, 170.0, 170.5]),
        });
        let out = analyze(&map, Side::Right, &StabilityConfig::default());
        assert!(out.score >= 90.0, "got {}", out.score);
    }

    #[test]
    fn lopsided_knees_drop_the_balance_term() {
        let cfg = StabilityConfig::default();
        let balanced = JointSeriesMap::from_fn(|j| match j.kind() {
            JointKind::Knee => series_from(j, &[110.0, 130.0, 115.0, 125.0, 120.0, 118.0]),
            _ => series_from(j, &[90.0; 6]),
        });
        let lopsided = JointSeriesMap::from_fn(|j| match j {
            JointType::LeftKnee => series_from(j, &[120.0, 120.2, 120.1, 120.0, 120.1, 120.2]),
            JointType::RightKnee => series_from(j, &[100.0, 140.0, 105.0, 135.0, 110.0, 130.0]),
            _ => series_from(j, &[90.0; 6]),
        });
        let a = analyze(&balanced, Side::Right, &cfg);
        let b = analyze(&lopsided, Side::Right, &cfg);
        assert!(a.base_stability > b.base_stability);
    }

    #[test]
    fn missing_series_gives_neutral_components() {
        let map = JointSeriesMap::from_fn(|j| series_from(j, &[]));
        let out = analyze(&map, Side::Right, &StabilityConfig::default());
        assert_eq!(out.base_stability, 50.0);
        assert_eq!(out.upper_body_stability, 50.0);
        assert_eq!(out.release_point_consistency, 50.0);
        assert_eq!(out.score, 50.0);
    }

    #[test]
    fn release_window_tracks_the_wrist_peak() {
        // wild wrist overall, but flat right around its maximum
        let wrist = [150.0, 130.0, 160.0, 140.0, 178.0, 179.0, 180.0, 179.0, 178.0, 120.0];
        let map = JointSeriesMap::from_fn(|j| match j {
            JointType::RightWrist => series_from(j, &wrist),
            _ => series_from(j, &[90.0; 10]),
        });
        let cfg = StabilityConfig::default();
        let out = analyze(&map, Side::Right, &cfg);
        assert_eq!(out.release_point_consistency, 100.0);
    }
}
