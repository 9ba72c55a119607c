// src/dimensions/style.rs - shooting style classification
//
// Distinguishes one-motion (continuous dip-to-release) from two-motion
// (set-point pause, then release) shots using three signals on the
// dominant arm: a pause in the elbow series, release smoothness from
// wrist deltas, and elbow-extension timing relative to wrist release.

use serde::{Deserialize, Serialize};

use crate::angles::{JointKind, JointSeriesMap, JointType, Side};
use crate::dimensions::MIN_SAMPLES;
use crate::math;

#[derive(Debug, Clone)]
pub struct StyleConfig {
    /// Elbow standstill longer than this (ms) counts as a pause.
    pub pause_threshold_ms: f64,
    /// Frame-to-frame elbow change below this (degrees) is standstill.
    pub stability_threshold: f64,
    /// Elbow range marking a two-motion shot, scaled by 0.8 in the rule.
    pub two_motion_elbow_range: f64,
    /// Release-duration fraction for one-motion, scaled by 1.5.
    pub one_motion_release_ratio: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: 150.0,
            stability_threshold: 2.0,
            two_motion_elbow_range: 50.0,
            one_motion_release_ratio: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShootingStyle {
    OneMotion,
    TwoMotion,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleCharacteristics {
    pub has_pause_at_set_point: bool,
    pub release_smoothness: f64,
    pub elbow_extension_timing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingStyleAnalysis {
    pub style: ShootingStyle,
    pub confidence: f64,
    pub score: f64,
    pub characteristics: StyleCharacteristics,
}

fn neutral() -> ShootingStyleAnalysis {
    ShootingStyleAnalysis {
        style: ShootingStyle::Hybrid,
        confidence: 0.5,
        score: 50.0,
        characteristics: StyleCharacteristics {
            has_pause_at_set_point: false,
            release_smoothness: 0.5,
            elbow_extension_timing: 0.5,
        },
    }
}

pub fn analyze(
    series: &JointSeriesMap,
    dominant: Side,
    fps: f64,
    total_frames: usize,
    cfg: &StyleConfig,
) -> ShootingStyleAnalysis {
    let elbow = series.get(JointType::of(JointKind::Elbow, dominant));
    let wrist = series.get(JointType::of(JointKind::Wrist, dominant));

    if elbow.angles.len() < MIN_SAMPLES || wrist.angles.len() < MIN_SAMPLES {
        return neutral();
    }

    let has_pause = detect_pause(&elbow.angles, fps, cfg);
    let smoothness = release_smoothness(&wrist.angles);
    let timing = extension_timing(&elbow.angles, &wrist.angles);

    let elbow_range = elbow.range();
    let release_frames = release_duration(&wrist.angles);
    let release_ratio =
        if total_frames > 0 { release_frames as f64 / total_frames as f64 } else { 0.0 };

    let (style, confidence) = if has_pause && elbow_range > cfg.two_motion_elbow_range * 0.8 {
        let bonus: f64 = if smoothness < 0.5 { 0.3 } else { 0.0 };
        (ShootingStyle::TwoMotion, (0.6 + bonus).min(0.95))
    } else if !has_pause
        && smoothness > 0.7
        && release_ratio < cfg.one_motion_release_ratio * 1.5
    {
        let bonus: f64 = if smoothness > 0.8 { 0.2 } else { 0.0 };
        (ShootingStyle::OneMotion, (0.7 + bonus).min(0.95))
    } else {
        (ShootingStyle::Hybrid, 0.6)
    };

    ShootingStyleAnalysis {
        style,
        confidence: math::round2(confidence),
        score: (confidence * 100.0).round(),
        characteristics: StyleCharacteristics {
            has_pause_at_set_point: has_pause,
            release_smoothness: math::round2(smoothness),
            elbow_extension_timing: math::round2(timing),
        },
    }
}

/// A pause is a run of near-zero elbow change lasting at least the
/// configured milliseconds (never fewer than 3 frames). Needs at least
/// 10 samples to be meaningful.
fn detect_pause(elbow_angles: &[f64], fps: f64, cfg: &StyleConfig) -> bool {
    if elbow_angles.len() < 10 {
        return false;
    }

    let min_pause_frames =
        ((fps * cfg.pause_threshold_ms / 1000.0).floor() as usize).max(3);
    let mut stable = 0usize;

    for w in elbow_angles.windows(2) {
        if (w[1] - w[0]).abs() < cfg.stability_threshold {
            stable += 1;
            if stable >= min_pause_frames {
                return true;
            }
        } else {
            stable = 0;
        }
    }
    false
}

/// Smoothness from the spread of wrist frame deltas: std under 10°/frame
/// maps linearly onto (0,1].
fn release_smoothness(wrist_angles: &[f64]) -> f64 {
    if wrist_angles.len() < MIN_SAMPLES {
        return 0.5;
    }
    let deltas = math::frame_deltas(wrist_angles);
    (1.0 - math::std_dev(&deltas) / 10.0).clamp(0.0, 1.0)
}

/// Frame distance between full elbow extension and the wrist's fastest
/// change, bucketed around the 2-frame ideal.
fn extension_timing(elbow_angles: &[f64], wrist_angles: &[f64]) -> f64 {
    if elbow_angles.len() < MIN_SAMPLES || wrist_angles.len() < MIN_SAMPLES {
        return 0.5;
    }

    let max_elbow_idx = math::argmax(elbow_angles);
    let deltas = math::frame_deltas(wrist_angles);
    let max_wrist_change_idx = math::argmax(&deltas) + 1;

    let diff = max_elbow_idx.abs_diff(max_wrist_change_idx);
    match diff {
        0..=2 => 1.0,
        3..=5 => 0.7,
        6..=7 => 0.4,
        _ => 0.2,
    }
}

/// Frame span of the main wrist action: from the first to the last
/// delta exceeding mean + std of all deltas.
fn release_duration(wrist_angles: &[f64]) -> usize {
    if wrist_angles.len() < 3 {
        return 0;
    }

    let deltas = math::frame_deltas(wrist_angles);
    let threshold = math::mean(&deltas) + math::std_dev(&deltas);

    let start = deltas.iter().position(|d| *d > threshold).unwrap_or(0);
    let end = deltas
        .iter()
        .rposition(|d| *d > threshold)
        .map(|i| i + 1)
        .unwrap_or(wrist_angles.len() - 1);

    end.saturating_sub(start)
}

pub fn recommendations(analysis: &ShootingStyleAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    match analysis.style {
        ShootingStyle::OneMotion => {
            recs.push(
                "One-motion release detected: fluid and quick, well suited to catch-and-shoot. Keep the rhythm and make sure leg drive carries through."
                    .to_string(),
            );
            if analysis.characteristics.release_smoothness < 0.7 {
                recs.push(
                    "The one-motion release could flow better; rehearse without a ball to feel the energy travel from legs to fingertips."
                        .to_string(),
                );
            }
        }
        ShootingStyle::TwoMotion => {
            recs.push(
                "Two-motion release detected: controlled and stable, well suited to longer range. Keep the elbow quiet at the set point for a repeatable release."
                    .to_string(),
            );
            if analysis.characteristics.has_pause_at_set_point
                && analysis.characteristics.elbow_extension_timing < 0.6
            {
                recs.push(
                    "Elbow extension after the set-point pause is late; drill finishing the shot in one beat out of the pause."
                        .to_string(),
                );
            }
        }
        ShootingStyle::Hybrid => {
            recs.push(
                "The release sits between one-motion and two-motion; pick per distance, one-motion up close and two-motion from deep."
                    .to_string(),
            );
        }
    }

    recs
}
