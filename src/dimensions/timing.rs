// src/dimensions/timing.rs - phase timing and rhythm
//
// Splits the shot into setup, load, release and follow-through using
// the dominant knee dip and elbow extension as anchors, then scores
// total duration, phase proportions and rhythm consistency.
// Phase-proportion bands follow Cabarkapa et al. (2022).

use serde::{Deserialize, Serialize};

use crate::angles::{JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::MIN_SAMPLES;
use crate::math;

#[derive(Debug, Clone, Copy)]
pub struct PhaseBand {
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct TimingConfig {
    pub setup: PhaseBand,
    pub load: PhaseBand,
    pub release: PhaseBand,
    pub follow_through: PhaseBand,
    /// Ideal total duration window in milliseconds.
    pub ideal_duration_ms: (f64, f64),
    pub duration_weight: f64,
    pub phase_weight: f64,
    pub rhythm_weight: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            setup: PhaseBand { min: 0.15, max: 0.25, weight: 0.2 },
            load: PhaseBand { min: 0.25, max: 0.35, weight: 0.3 },
            release: PhaseBand { min: 0.15, max: 0.25, weight: 0.3 },
            follow_through: PhaseBand { min: 0.20, max: 0.30, weight: 0.2 },
            ideal_duration_ms: (800.0, 2000.0),
            duration_weight: 0.25,
            phase_weight: 0.60,
            rhythm_weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseData {
    pub duration_ms: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPhases {
    pub setup: PhaseData,
    pub load: PhaseData,
    pub release: PhaseData,
    pub follow_through: PhaseData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAnalysis {
    pub score: f64,
    pub phases: ShotPhases,
    pub total_duration_ms: f64,
    pub rhythm_consistency: f64,
}

struct PhaseBoundaries {
    setup_end: usize,
    load_end: usize,
    release_end: usize,
}

fn neutral(total_duration_ms: f64) -> TimingAnalysis {
    let quarter = PhaseData { duration_ms: total_duration_ms / 4.0, percentage: 25.0 };
    TimingAnalysis {
        score: 50.0,
        phases: ShotPhases {
            setup: quarter,
            load: quarter,
            release: quarter,
            follow_through: quarter,
        },
        total_duration_ms,
        rhythm_consistency: 0.5,
    }
}

pub fn analyze(
    series: &JointSeriesMap,
    dominant: Side,
    fps: f64,
    duration_ms: f64,
    cfg: &TimingConfig,
) -> TimingAnalysis {
    let knee = series.get(JointType::of(JointKind::Knee, dominant));
    let elbow = series.get(JointType::of(JointKind::Elbow, dominant));

    if knee.angles.len() < MIN_SAMPLES || elbow.angles.len() < MIN_SAMPLES || fps <= 0.0 {
        return neutral(duration_ms);
    }

    let boundaries = phase_boundaries(&knee.angles, &elbow.angles);
    let ms_per_frame = 1000.0 / fps;

    let setup = (boundaries.setup_end as f64 * ms_per_frame).max(0.0);
    let load = ((boundaries.load_end as f64 - boundaries.setup_end as f64) * ms_per_frame).max(0.0);
    let release =
        ((boundaries.release_end as f64 - boundaries.load_end as f64) * ms_per_frame).max(0.0);
    let follow_through = (duration_ms - boundaries.release_end as f64 * ms_per_frame).max(0.0);

    let duration_score = duration_score(duration_ms, cfg);

    let phase_score = band_score(setup / duration_ms, &cfg.setup) * cfg.setup.weight
        + band_score(load / duration_ms, &cfg.load) * cfg.load.weight
        + band_score(release / duration_ms, &cfg.release) * cfg.release.weight
        + band_score(follow_through / duration_ms, &cfg.follow_through)
            * cfg.follow_through.weight;

    let rhythm = rhythm_consistency(
        &[setup, load, release, follow_through],
        &knee.angles,
        &elbow.angles,
    );

    let score = (duration_score * cfg.duration_weight
        + phase_score * cfg.phase_weight
        + rhythm * 100.0 * cfg.rhythm_weight)
        .clamp(0.0, 100.0)
        .round();

    let pct = |d: f64| ((d / duration_ms) * 100.0).round();
    TimingAnalysis {
        score,
        phases: ShotPhases {
            setup: PhaseData { duration_ms: setup, percentage: pct(setup) },
            load: PhaseData { duration_ms: load, percentage: pct(load) },
            release: PhaseData { duration_ms: release, percentage: pct(release) },
            follow_through: PhaseData {
                duration_ms: follow_through,
                percentage: pct(follow_through),
            },
        },
        total_duration_ms: duration_ms,
        rhythm_consistency: math::round2(rhythm),
    }
}

/// Setup ends well before the deepest knee bend, load ends at the dip,
/// release ends at full elbow extension.
fn phase_boundaries(knee_angles: &[f64], elbow_angles: &[f64]) -> PhaseBoundaries {
    let min_knee_idx = math::argmin(knee_angles);
    let max_elbow_idx = math::argmax(elbow_angles);
    let total = knee_angles.len();

    PhaseBoundaries {
        setup_end: ((min_knee_idx as f64 * 0.4).floor() as usize).max(1),
        load_end: min_knee_idx,
        release_end: max_elbow_idx.min(total.saturating_sub(2)),
    }
}

/// 100 inside the ideal window. Rushing decays at full slope, a slow
/// wind-up at half slope since it hurts less.
fn duration_score(duration_ms: f64, cfg: &TimingConfig) -> f64 {
    let (min, max) = cfg.ideal_duration_ms;
    if duration_ms >= min && duration_ms <= max {
        100.0
    } else if duration_ms < min {
        (100.0 - (min - duration_ms) / min * 100.0).max(0.0)
    } else {
        (100.0 - (duration_ms - max) / max * 50.0).max(0.0)
    }
}

fn band_score(ratio: f64, band: &PhaseBand) -> f64 {
    if ratio >= band.min && ratio <= band.max {
        100.0
    } else if ratio < band.min {
        (100.0 - (band.min - ratio) / band.min * 100.0).max(0.0)
    } else {
        (100.0 - (ratio - band.max) / band.max * 100.0).max(0.0)
    }
}

/// Blend of phase-duration CV and the CVs of knee/elbow frame deltas,
/// mapped so an average CV of 0.5 or worse reads as no rhythm.
fn rhythm_consistency(phase_durations: &[f64], knee_angles: &[f64], elbow_angles: &[f64]) -> f64 {
    let phase_cv = math::coefficient_of_variation(phase_durations);

    let knee_deltas = math::frame_deltas(knee_angles);
    let elbow_deltas = math::frame_deltas(elbow_angles);
    let knee_cv = if knee_deltas.is_empty() {
        1.0
    } else {
        math::coefficient_of_variation(&knee_deltas)
    };
    let elbow_cv = if elbow_deltas.is_empty() {
        1.0
    } else {
        math::coefficient_of_variation(&elbow_deltas)
    };

    let avg_cv = (phase_cv + knee_cv + elbow_cv) / 3.0;
    (1.0 - avg_cv / 0.5).max(0.0)
}

pub fn recommendations(analysis: &TimingAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    if analysis.total_duration_ms < 800.0 {
        recs.push(format!(
            "The shot is rushed ({:.2}s); slow the tempo so leg drive has time to transfer. Aim for 0.8-2.0 seconds.",
            analysis.total_duration_ms / 1000.0
        ));
    } else if analysis.total_duration_ms > 2000.0 {
        recs.push(format!(
            "The shot is slow ({:.2}s); tighten the motion before defenders can contest.",
            analysis.total_duration_ms / 1000.0
        ));
    }

    if analysis.phases.setup.percentage > 30.0 {
        recs.push(format!(
            "Setup takes too long ({:.0}% of the shot); simplify the gather and get into the dip sooner.",
            analysis.phases.setup.percentage
        ));
    }
    if analysis.phases.load.percentage < 20.0 {
        recs.push(format!(
            "The loading phase is short ({:.0}%); sink deeper into the dip to recruit the legs.",
            analysis.phases.load.percentage
        ));
    }
    if analysis.phases.release.percentage > 30.0 {
        recs.push(format!(
            "The release drags ({:.0}%); speed up the final extension for a quicker shot.",
            analysis.phases.release.percentage
        ));
    }
    if analysis.rhythm_consistency < 0.6 {
        recs.push(format!(
            "Shot rhythm is uneven (consistency {:.0}%); shoot in continuous sets to groove a steady cadence.",
            analysis.rhythm_consistency * 100.0
        ));
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::test_util::series_from;
    use crate::angles::JointSeriesMap;

    fn map_with(knee: &[f64], elbow: &[f64]) -> JointSeriesMap {
        JointSeriesMap::from_fn(|j| match j {
            JointType::RightKnee => series_from(j, knee),
            JointType::RightElbow => series_from(j, elbow),
            _ => series_from(j, &[90.0; 8]),
        })
    }

    #[test]
    fn boundaries_follow_knee_dip_and_elbow_peak() {
        // knee dips at index 10, elbow peaks at 16 of 20
        let knee: Vec<f64> = (0..20)
            .map(|i| if i <= 10 { 140.0 - i as f64 * 3.0 } else { 110.0 + (i - 10) as f64 * 3.0 })
            .collect();
        let elbow: Vec<f64> = (0..20)
            .map(|i| if i <= 16 { 100.0 + i as f64 * 4.0 } else { 164.0 - (i - 16) as f64 * 2.0 })
            .collect();
        let b = phase_boundaries(&knee, &elbow);
        assert_eq!(b.setup_end, 4);
        assert_eq!(b.load_end, 10);
        assert_eq!(b.release_end, 16);
    }

    #[test]
    fn release_end_is_clamped_before_last_frame() {
        // elbow keeps rising to the very end
        let knee: Vec<f64> = (0..10).map(|i| 140.0 - i as f64).collect();
        let elbow: Vec<f64> = (0..10).map(|i| 100.0 + i as f64 * 8.0).collect();
        let b = phase_boundaries(&knee, &elbow);
        assert_eq!(b.release_end, 8);
    }

    #[test]
    fn ideal_duration_scores_100_and_decay_is_asymmetric() {
        let cfg = TimingConfig::default();
        assert_eq!(duration_score(1200.0, &cfg), 100.0);
        // 25% too fast loses 25 points, 25% too slow loses 12.5
        assert!((duration_score(600.0, &cfg) - 75.0).abs() < 1e-9);
        assert!((duration_score(2500.0, &cfg) - 87.5).abs() < 1e-9);
    }

    #[test]
    fn score_stays_bounded_for_odd_inputs() {
        // pathological 100ms clip
        let knee: Vec<f64> = (0..8).map(|i| 140.0 - i as f64 * 5.0).collect();
        let elbow: Vec<f64> = (0..8).map(|i| 100.0 + i as f64 * 10.0).collect();
        let out = analyze(
            &map_with(&knee, &elbow),
            Side::Right,
            30.0,
            100.0,
            &TimingConfig::default(),
        );
        assert!((0.0..=100.0).contains(&out.score));
    }

    #[test]
    fn short_series_is_neutral() {
        let out = analyze(
            &map_with(&[140.0, 120.0], &[100.0, 150.0]),
            Side::Right,
            30.0,
            1000.0,
            &TimingConfig::default(),
        );
        assert_eq!(out.score, 50.0);
        assert_eq!(out.phases.setup.percentage, 25.0);
        assert_eq!(out.rhythm_consistency, 0.5);
        assert_eq!(out.total_duration_ms, 1000.0);
    }

    #[test]
    fn rushed_shot_earns_recommendation() {
        let knee: Vec<f64> = (0..20)
            .map(|i| if i <= 10 { 140.0 - i as f64 * 3.0 } else { 110.0 + (i - 10) as f64 * 3.0 })
            .collect();
        let elbow: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 3.0).collect();
        let out = analyze(
            &map_with(&knee, &elbow),
            Side::Right,
            30.0,
            500.0,
            &TimingConfig::default(),
        );
        assert!(recommendations(&out).iter().any(|r| r.contains("rushed")));
    }
}
