// src/dimensions/kinetic_chain.rs - force transfer up the chain
//
// The shot should fire from the ground up: hip, knee, shoulder, elbow,
// wrist. Scores the firing order, the spacing of the firing moments,
// and how the range of motion decays along the chain.

use serde::{Deserialize, Serialize};

use crate::angles::{JointAngleSeries, JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::MIN_SAMPLES;
use crate::math;

#[derive(Debug, Clone)]
pub struct KineticChainConfig {
    pub sequence_weight: f64,
    pub timing_weight: f64,
    pub efficiency_weight: f64,
    /// Ideal frame gap between successive joints firing.
    pub ideal_step_delay: f64,
    /// Ideal range-of-motion ratios relative to the hip, chain order
    /// knee / shoulder / elbow / wrist.
    pub ideal_ratios: [f64; 4],
}

impl Default for KineticChainConfig {
    fn default() -> Self {
        Self {
            sequence_weight: 0.40,
            timing_weight: 0.35,
            efficiency_weight: 0.25,
            ideal_step_delay: 2.0,
            ideal_ratios: [0.9, 0.7, 0.8, 0.6],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPhases {
    pub hip_initiation: bool,
    pub knee_follow_through: bool,
    pub elbow_extension: bool,
    pub wrist_snap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticChainAnalysis {
    pub score: f64,
    pub force_transfer_efficiency: f64,
    pub sequence_score: f64,
    pub timing_score: f64,
    pub phases: ChainPhases,
}

struct Chain<'a> {
    hip: &'a JointAngleSeries,
    knee: &'a JointAngleSeries,
    shoulder: &'a JointAngleSeries,
    elbow: &'a JointAngleSeries,
    wrist: &'a JointAngleSeries,
}

fn neutral() -> KineticChainAnalysis {
    KineticChainAnalysis {
        score: 50.0,
        force_transfer_efficiency: 0.5,
        sequence_score: 50.0,
        timing_score: 50.0,
        phases: ChainPhases {
            hip_initiation: false,
            knee_follow_through: false,
            elbow_extension: false,
            wrist_snap: false,
        },
    }
}

pub fn analyze(
    series: &JointSeriesMap,
    dominant: Side,
    cfg: &KineticChainConfig,
) -> KineticChainAnalysis {
    let chain = Chain {
        hip: series.get(JointType::of(JointKind::Hip, dominant)),
        knee: series.get(JointType::of(JointKind::Knee, dominant)),
        shoulder: series.get(JointType::of(JointKind::Shoulder, dominant)),
        elbow: series.get(JointType::of(JointKind::Elbow, dominant)),
        wrist: series.get(JointType::of(JointKind::Wrist, dominant)),
    };

    if [chain.hip, chain.knee, chain.shoulder, chain.elbow, chain.wrist]
        .iter()
        .any(|s| s.angles.len() < MIN_SAMPLES)
    {
        return neutral();
    }

    let (sequence_score, phases) = sequence_timing(&chain, cfg);
    let timing_score = timing_coordination(&chain);
    let (efficiency_score, efficiency) = transfer_efficiency(&chain, cfg);

    let score = (sequence_score * cfg.sequence_weight
        + timing_score * cfg.timing_weight
        + efficiency_score * cfg.efficiency_weight)
        .round();

    KineticChainAnalysis {
        score,
        force_transfer_efficiency: math::round2(efficiency),
        sequence_score: sequence_score.round(),
        timing_score: timing_score.round(),
        phases,
    }
}

/// First frame where the joint's angular speed jumps past 1.5x its
/// average, taken as the moment the joint fires.
fn acceleration_start(angles: &[f64]) -> usize {
    if angles.len() < MIN_SAMPLES {
        return 0;
    }
    let velocities = math::frame_deltas(angles);
    let threshold = math::mean(&velocities) * 1.5;
    velocities.iter().position(|v| *v > threshold).unwrap_or(0)
}

fn max_velocity_index(angles: &[f64]) -> usize {
    if angles.len() < 3 {
        return 0;
    }
    math::argmax(&math::frame_deltas(angles))
}

/// Firing-order booleans (60%) plus how closely the gaps between firing
/// moments match the ideal step delay (40%, 5 points per frame off,
/// capped at 25 per joint).
fn sequence_timing(chain: &Chain, cfg: &KineticChainConfig) -> (f64, ChainPhases) {
    let hip_start = acceleration_start(&chain.hip.angles);
    let knee_start = acceleration_start(&chain.knee.angles);
    let shoulder_start = acceleration_start(&chain.shoulder.angles);
    let elbow_start = acceleration_start(&chain.elbow.angles);
    let wrist_start = acceleration_start(&chain.wrist.angles);

    let phases = ChainPhases {
        hip_initiation: true,
        knee_follow_through: knee_start > hip_start,
        elbow_extension: elbow_start > shoulder_start,
        wrist_snap: wrist_start > elbow_start,
    };
    let shoulder_after_knee = shoulder_start > knee_start;

    let correct = 1 + [
        phases.knee_follow_through,
        shoulder_after_knee,
        phases.elbow_extension,
        phases.wrist_snap,
    ]
    .iter()
    .filter(|b| **b)
    .count();
    let order_score = correct as f64 / 5.0 * 100.0;

    let steps = [
        knee_start as f64 - hip_start as f64,
        shoulder_start as f64 - knee_start as f64,
        elbow_start as f64 - shoulder_start as f64,
        wrist_start as f64 - elbow_start as f64,
    ];
    let mut delay_score = 100.0;
    for step in steps {
        let diff = (step - cfg.ideal_step_delay).abs();
        delay_score -= (diff * 5.0).min(25.0);
    }

    (order_score * 0.6 + delay_score.max(0.0) * 0.4, phases)
}

/// Peak-velocity ordering (60%) plus uniformity of the gaps between
/// peaks (40%).
fn timing_coordination(chain: &Chain) -> f64 {
    let peaks = [
        max_velocity_index(&chain.hip.angles) as f64,
        max_velocity_index(&chain.knee.angles) as f64,
        max_velocity_index(&chain.shoulder.angles) as f64,
        max_velocity_index(&chain.elbow.angles) as f64,
        max_velocity_index(&chain.wrist.angles) as f64,
    ];

    let correct = 1 + peaks.windows(2).filter(|w| w[1] > w[0]).count();
    let order_score = correct as f64 / 5.0 * 100.0;

    let intervals: Vec<f64> = peaks.windows(2).map(|w| w[1] - w[0]).collect();
    let avg = math::mean(&intervals);
    let spread = math::mean(
        &intervals.iter().map(|i| (i - avg).abs()).collect::<Vec<f64>>(),
    );
    let uniformity_score = (100.0 - spread * 10.0).max(0.0);

    order_score * 0.6 + uniformity_score * 0.4
}

/// Range of motion should shrink along the chain. Scores each joint's
/// range ratio (relative to the hip) against the ideal decay profile.
fn transfer_efficiency(chain: &Chain, cfg: &KineticChainConfig) -> (f64, f64) {
    let hip_range = chain.hip.range();
    if hip_range <= 0.0 {
        return (50.0, 0.5);
    }

    let ratios = [
        chain.knee.range() / hip_range,
        chain.shoulder.range() / hip_range,
        chain.elbow.range() / hip_range,
        chain.wrist.range() / hip_range,
    ];

    let scores: Vec<f64> = ratios
        .iter()
        .zip(cfg.ideal_ratios.iter())
        .map(|(actual, ideal)| (100.0 - (actual - ideal).abs() * 100.0).max(0.0))
        .collect();

    let score = math::mean(&scores);
    (score, score / 100.0)
}

pub fn recommendations(analysis: &KineticChainAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    if !analysis.phases.knee_follow_through {
        recs.push(
            "The knees do not follow the hip drive; let them extend naturally to pass the force up. Drills: repeated squat jumps."
                .to_string(),
        );
    }
    if !analysis.phases.elbow_extension {
        recs.push(
            "Elbow extension fires out of sequence; it should complete as the body reaches its highest point. Drills: wall form shooting."
                .to_string(),
        );
    }
    if !analysis.phases.wrist_snap {
        recs.push(
            "The wrist snap is mistimed; snap immediately after the elbow finishes extending. Drills: close-range wrist-snap reps."
                .to_string(),
        );
    }
    if analysis.force_transfer_efficiency < 0.6 {
        recs.push(format!(
            "Force transfer up the chain is inefficient ({:.0}%); train whole-body coordination so leg drive reaches the fingertips.",
            analysis.force_transfer_efficiency * 100.0
        ));
    }
    if analysis.score >= 75.0 {
        recs.push(
            "The kinetic chain fires in order and transfers efficiently, the key to effortless range."
                .to_string(),
        );
    }

    recs
}
