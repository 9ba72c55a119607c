// src/engine.rs - analysis engine
//
// Orchestrates the full pipeline: validate the landmark sequence,
// derive the joint-angle series and dominant side once, run the eight
// dimension analyzers, and aggregate into an overall score with a
// camera-angle-dependent confidence interval. Given the same input it
// always produces the same scorecard.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::angles::{all_joint_series, detect_dominant_side};
use crate::dimensions::consistency::{self, ConsistencyAnalysis, ConsistencyConfig};
use crate::dimensions::coordination::{self, CoordinationAnalysis, CoordinationConfig};
use crate::dimensions::joint_angles::{self, JointAnglesAnalysis, JointAnglesConfig};
use crate::dimensions::kinetic_chain::{self, KineticChainAnalysis, KineticChainConfig};
use crate::dimensions::stability::{self, StabilityAnalysis, StabilityConfig};
use crate::dimensions::style::{self, ShootingStyleAnalysis, StyleConfig};
use crate::dimensions::symmetry::{self, SymmetryAnalysis, SymmetryConfig};
use crate::dimensions::timing::{self, TimingAnalysis, TimingConfig};
use crate::error::PoseError;
use crate::math;
use crate::pose::{CameraAngle, PoseSequence};
use crate::report::{self, AiReport};

/// Weights for the overall score. Consistency and stability dominate,
/// reflecting their predictive value for accuracy. Must sum to 1.
#[derive(Debug, Clone)]
pub struct DimensionWeights {
    pub consistency: f64,
    pub joint_angles: f64,
    pub symmetry: f64,
    pub shooting_style: f64,
    pub timing: f64,
    pub stability: f64,
    pub coordination: f64,
    pub kinetic_chain: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            consistency: 0.20,
            joint_angles: 0.15,
            symmetry: 0.10,
            shooting_style: 0.10,
            timing: 0.10,
            stability: 0.15,
            coordination: 0.10,
            kinetic_chain: 0.10,
        }
    }
}

/// Immutable engine configuration, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub weights: DimensionWeights,
    pub consistency: ConsistencyConfig,
    pub joint_angles: JointAnglesConfig,
    pub symmetry: SymmetryConfig,
    pub style: StyleConfig,
    pub timing: TimingConfig,
    pub stability: StabilityConfig,
    pub coordination: CoordinationConfig,
    pub kinetic_chain: KineticChainConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub consistency: ConsistencyAnalysis,
    pub joint_angles: JointAnglesAnalysis,
    pub symmetry: SymmetryAnalysis,
    pub shooting_style: ShootingStyleAnalysis,
    pub timing: TimingAnalysis,
    pub stability: StabilityAnalysis,
    pub coordination: CoordinationAnalysis,
    pub kinetic_chain: KineticChainAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMargins {
    pub side_view: f64,
    pub front_view: f64,
    pub other_view: f64,
}

impl Default for ErrorMargins {
    fn default() -> Self {
        Self { side_view: 15.0, front_view: 20.0, other_view: 25.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub video_duration_ms: f64,
    pub fps: f64,
    pub total_frames_analyzed: usize,
    pub camera_angle: CameraAngle,
    pub detection_confidence: f64,
    pub processing_timestamp: String,
    pub error_margins: ErrorMargins,
}

/// The persistence unit: one completed analysis, never mutated after
/// creation. A retry produces a fresh result that replaces this one
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteAnalysisResult {
    pub overall_score: f64,
    pub confidence_interval: (f64, f64),
    pub detection_confidence: f64,
    pub dimensions: DimensionScores,
    pub metadata: AnalysisMetadata,
    pub ai_report: Option<AiReport>,
}

/// Uncertainty band around the overall score. Poor landmark detection
/// widens the camera-angle base error by up to 50%.
pub fn error_margin(camera: CameraAngle, detection_confidence: f64) -> f64 {
    camera.base_error() * (1.0 + (1.0 - detection_confidence) * 0.5)
}

pub struct AnalysisEngine {
    config: EngineConfig,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs the full scorecard. Fails only when the sequence itself
    /// violates the pose-detection contract; thin data inside a valid
    /// sequence degrades to neutral dimension results instead.
    pub fn analyze(
        &self,
        sequence: &PoseSequence,
        camera: CameraAngle,
    ) -> Result<CompleteAnalysisResult, PoseError> {
        sequence.validate()?;

        let series = all_joint_series(sequence);
        let dominant = detect_dominant_side(&series);
        debug!(?dominant, frames = sequence.total_frames, "joint series computed");

        let cfg = &self.config;
        let dimensions = DimensionScores {
            consistency: consistency::analyze(&series, dominant, camera, &cfg.consistency),
            joint_angles: joint_angles::analyze(&series, dominant, camera, &cfg.joint_angles),
            symmetry: symmetry::analyze(&series, camera, &cfg.symmetry),
            shooting_style: style::analyze(
                &series,
                dominant,
                sequence.fps,
                sequence.total_frames,
                &cfg.style,
            ),
            timing: timing::analyze(
                &series,
                dominant,
                sequence.fps,
                sequence.duration_ms,
                &cfg.timing,
            ),
            stability: stability::analyze(&series, dominant, &cfg.stability),
            coordination: coordination::analyze(&series, dominant, &cfg.coordination),
            kinetic_chain: kinetic_chain::analyze(&series, dominant, &cfg.kinetic_chain),
        };

        let overall_score = self.overall_score(&dimensions);

        let detection_confidence = math::round2(sequence.detection_confidence());
        let margin = error_margin(camera, detection_confidence);
        let confidence_interval = (
            (overall_score - margin).clamp(0.0, 100.0),
            (overall_score + margin).clamp(0.0, 100.0),
        );

        let metadata = AnalysisMetadata {
            video_duration_ms: sequence.duration_ms,
            fps: sequence.fps,
            total_frames_analyzed: sequence.total_frames,
            camera_angle: camera,
            detection_confidence,
            processing_timestamp: chrono::Utc::now().to_rfc3339(),
            error_margins: ErrorMargins::default(),
        };

        let ai_report = report::generate_report(&dimensions, overall_score);
        info!(overall_score, camera = %camera, "analysis complete");

        Ok(CompleteAnalysisResult {
            overall_score,
            confidence_interval,
            detection_confidence,
            dimensions,
            metadata,
            ai_report: Some(ai_report),
        })
    }

    fn overall_score(&self, d: &DimensionScores) -> f64 {
        let w = &self.config.weights;
        (d.consistency.score * w.consistency
            + d.joint_angles.score * w.joint_angles
            + d.symmetry.score * w.symmetry
            + d.shooting_style.score * w.shooting_style
            + d.timing.score * w.timing
            + d.stability.score * w.stability
            + d.coordination.score * w.coordination
            + d.kinetic_chain.score * w.kinetic_chain)
            .round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{synthetic_shot_sequence, Landmark, PoseFrame, LANDMARK_COUNT};

    #[test]
    fn end_to_end_synthetic_shot() {
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        let engine = AnalysisEngine::default();
        let result = engine.analyze(&sequence, CameraAngle::Side).unwrap();

        assert_eq!(result.metadata.total_frames_analyzed, 30);
        assert_eq!(result.metadata.fps, 30.0);
        assert_eq!(result.metadata.video_duration_ms, 1000.0);
        assert_eq!(result.metadata.camera_angle, CameraAngle::Side);
        assert_eq!(
            result.metadata.error_margins,
            ErrorMargins { side_view: 15.0, front_view: 20.0, other_view: 25.0 }
        );
        assert!((0.0..=100.0).contains(&result.overall_score));
        assert!(result.ai_report.is_some());
    }

    #[test]
    fn every_score_is_bounded() {
        let sequence = synthetic_shot_sequence(1500.0, 24.0);
        let result = AnalysisEngine::default().analyze(&sequence, CameraAngle::Other).unwrap();

        let d = &result.dimensions;
        for score in [
            d.consistency.score,
            d.joint_angles.score,
            d.symmetry.score,
            d.shooting_style.score,
            d.timing.score,
            d.stability.score,
            d.coordination.score,
            d.kinetic_chain.score,
            result.overall_score,
        ] {
            assert!((0.0..=100.0).contains(&score), "score {score} out of bounds");
        }
        let (lo, hi) = result.confidence_interval;
        assert!(lo <= hi);
        assert!((0.0..=100.0).contains(&lo));
        assert!((0.0..=100.0).contains(&hi));
    }

    #[test]
    fn analysis_is_deterministic() {
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        let engine = AnalysisEngine::default();
        let a = engine.analyze(&sequence, CameraAngle::Side).unwrap();
        let b = engine.analyze(&sequence, CameraAngle::Side).unwrap();
        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(a.dimensions, b.dimensions);
        assert_eq!(a.confidence_interval, b.confidence_interval);
    }

    #[test]
    fn margin_widens_with_camera_and_low_confidence() {
        assert_eq!(error_margin(CameraAngle::Side, 1.0), 15.0);
        assert_eq!(error_margin(CameraAngle::Front, 1.0), 20.0);
        assert_eq!(error_margin(CameraAngle::Other, 1.0), 25.0);
        // zero detection confidence adds 50%
        assert_eq!(error_margin(CameraAngle::Side, 0.0), 22.5);
        assert!(error_margin(CameraAngle::Side, 0.5) > error_margin(CameraAngle::Side, 0.9));
    }

    #[test]
    fn empty_sequence_is_a_hard_failure() {
        let sequence =
            PoseSequence { frames: vec![], fps: 30.0, duration_ms: 0.0, total_frames: 0 };
        let err = AnalysisEngine::default().analyze(&sequence, CameraAngle::Side).unwrap_err();
        assert!(matches!(err, PoseError::EmptySequence));
    }

    #[test]
    fn wrong_landmark_count_is_a_hard_failure() {
        let frame = PoseFrame {
            landmarks: vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT - 1],
            timestamp_ms: 0.0,
        };
        let sequence = PoseSequence {
            frames: vec![frame],
            fps: 30.0,
            duration_ms: 33.3,
            total_frames: 1,
        };
        let err = AnalysisEngine::default().analyze(&sequence, CameraAngle::Side).unwrap_err();
        assert!(matches!(err, PoseError::WrongLandmarkCount { .. }));
    }

    #[test]
    fn identical_frames_yield_full_consistency_and_no_two_motion() {
        let mut base = synthetic_shot_sequence(1000.0, 30.0);
        let first = base.frames[0].clone();
        for (i, frame) in base.frames.iter_mut().enumerate() {
            frame.landmarks = first.landmarks.clone();
            frame.timestamp_ms = i as f64 * 1000.0 / 30.0;
        }
        let result = AnalysisEngine::default().analyze(&base, CameraAngle::Side).unwrap();
        assert_eq!(result.dimensions.consistency.score, 100.0);
        assert_ne!(
            result.dimensions.shooting_style.style,
            crate::dimensions::style::ShootingStyle::TwoMotion
        );
    }
}
