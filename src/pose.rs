// src/pose.rs - pose landmark data model and provider boundary
//
// The engine never runs pose detection itself. It consumes a
// PoseSequence produced upstream (MediaPipe-style 33-landmark layout)
// and only validates that the producer honored the contract.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Fixed landmark count per frame. Index meaning is process-wide and
/// matches the MediaPipe Pose layout (see [`landmark`]).
pub const LANDMARK_COUNT: usize = 33;

/// MediaPipe Pose landmark indices. Only a subset participates in joint
/// definitions, but the full layout is kept so upstream indices map 1:1.
pub mod landmark {
    pub const NOSE: usize = 0;
    pub const LEFT_EYE_INNER: usize = 1;
    pub const LEFT_EYE: usize = 2;
    pub const LEFT_EYE_OUTER: usize = 3;
    pub const RIGHT_EYE_INNER: usize = 4;
    pub const RIGHT_EYE: usize = 5;
    pub const RIGHT_EYE_OUTER: usize = 6;
    pub const LEFT_EAR: usize = 7;
    pub const RIGHT_EAR: usize = 8;
    pub const MOUTH_LEFT: usize = 9;
    pub const MOUTH_RIGHT: usize = 10;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_PINKY: usize = 17;
    pub const RIGHT_PINKY: usize = 18;
    pub const LEFT_INDEX: usize = 19;
    pub const RIGHT_INDEX: usize = 20;
    pub const LEFT_THUMB: usize = 21;
    pub const RIGHT_THUMB: usize = 22;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;
    pub const LEFT_HEEL: usize = 29;
    pub const RIGHT_HEEL: usize = 30;
    pub const LEFT_FOOT_INDEX: usize = 31;
    pub const RIGHT_FOOT_INDEX: usize = 32;
}

/// One tracked body point in normalized video-frame coordinates.
/// A missing visibility is treated as fully visible when gating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, visibility: None }
    }

    pub fn with_visibility(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility: Some(visibility) }
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Visibility with the "absent means visible" convention applied.
    pub fn visibility_or_default(&self) -> f64 {
        self.visibility.unwrap_or(1.0)
    }
}

/// One frame of 33 landmarks plus its video timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub landmarks: Vec<Landmark>,
    pub timestamp_ms: f64,
}

/// Camera placement of the source video. Drives the error margin
/// attached to every angle-derived score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraAngle {
    Side,
    Front,
    Other,
}

impl CameraAngle {
    /// Base angular uncertainty in degrees for this view.
    pub fn base_error(self) -> f64 {
        match self {
            CameraAngle::Side => 15.0,
            CameraAngle::Front => 20.0,
            CameraAngle::Other => 25.0,
        }
    }
}

impl std::fmt::Display for CameraAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraAngle::Side => write!(f, "side"),
            CameraAngle::Front => write!(f, "front"),
            CameraAngle::Other => write!(f, "other"),
        }
    }
}

/// Full per-frame landmark time series for one video. Built once by the
/// pose provider and consumed read-only by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSequence {
    pub frames: Vec<PoseFrame>,
    pub fps: f64,
    pub duration_ms: f64,
    pub total_frames: usize,
}

impl PoseSequence {
    /// Checks the upstream detection contract. This is the only place
    /// a hard failure originates: everything downstream degrades softly.
    pub fn validate(&self) -> Result<(), PoseError> {
        if self.frames.is_empty() {
            return Err(PoseError::EmptySequence);
        }
        if self.total_frames != self.frames.len() {
            return Err(PoseError::FrameCountMismatch {
                declared: self.total_frames,
                actual: self.frames.len(),
            });
        }
        let mut last_ts = f64::NEG_INFINITY;
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.landmarks.len() != LANDMARK_COUNT {
                return Err(PoseError::WrongLandmarkCount {
                    frame: i,
                    count: frame.landmarks.len(),
                });
            }
            if frame.timestamp_ms < last_ts {
                return Err(PoseError::NonMonotonicTimestamps { frame: i });
            }
            last_ts = frame.timestamp_ms;
        }
        Ok(())
    }

    /// Mean visibility across every landmark of every frame; 0 when no
    /// landmark carries a visibility value.
    pub fn detection_confidence(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for frame in &self.frames {
            for lm in &frame.landmarks {
                if let Some(v) = lm.visibility {
                    total += v;
                    count += 1;
                }
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

/// Producer of landmark sequences. The real implementation wraps a video
/// pose detector; the engine only depends on this contract.
pub trait PoseProvider {
    fn detect_video(&self, video_ref: &str) -> anyhow::Result<PoseSequence>;
}

/// Deterministic stand-in provider producing a synthetic jump shot.
/// Useful for development, demos, and the end-to-end tests.
pub struct SyntheticPoseProvider {
    pub duration_ms: f64,
    pub fps: f64,
}

impl Default for SyntheticPoseProvider {
    fn default() -> Self {
        Self { duration_ms: 5000.0, fps: 30.0 }
    }
}

impl PoseProvider for SyntheticPoseProvider {
    fn detect_video(&self, video_ref: &str) -> anyhow::Result<PoseSequence> {
        tracing::info!(video_ref, "generating synthetic pose sequence");
        Ok(synthetic_shot_sequence(self.duration_ms, self.fps))
    }
}

/// Generates a right-handed free-throw motion: knees bend then extend,
/// the shooting elbow extends through release, the wrist snaps in the
/// follow-through. Fully deterministic so repeated analyses of the same
/// parameters are bit-identical.
pub fn synthetic_shot_sequence(duration_ms: f64, fps: f64) -> PoseSequence {
    let total_frames = ((duration_ms / 1000.0) * fps).floor() as usize;
    let mut frames = Vec::with_capacity(total_frames);

    for i in 0..total_frames {
        let timestamp_ms = (i as f64 / fps) * 1000.0;
        let progress = i as f64 / total_frames.max(1) as f64;
        frames.push(PoseFrame {
            landmarks: synthetic_frame_landmarks(progress),
            timestamp_ms,
        });
    }

    PoseSequence { frames, fps, duration_ms, total_frames }
}

fn synthetic_frame_landmarks(progress: f64) -> Vec<Landmark> {
    // Motion envelopes: load into the knees over the first half, drive
    // up and extend the arm through release, then hold follow-through.
    let bend = if progress < 0.5 {
        progress / 0.5
    } else if progress < 0.7 {
        1.0 - (progress - 0.5) / 0.2
    } else {
        0.0
    };
    let lift = if progress < 0.5 {
        0.0
    } else if progress < 0.7 {
        (progress - 0.5) / 0.2
    } else {
        1.0
    };
    let snap = if progress < 0.7 { 0.0 } else { (progress - 0.7) / 0.3 };

    // Shooting (right) arm travels the full arc; the guide arm follows
    // at reduced amplitude so dominant-side detection lands on right.
    let arm = |side_sign: f64, scale: f64| -> [(f64, f64); 5] {
        let lift = lift * scale;
        let snap = snap * scale;
        let shoulder = (0.5 + side_sign * 0.08, 0.30 + 0.02 * bend);
        let elbow = (
            shoulder.0 + side_sign * (0.10 - 0.04 * lift),
            shoulder.1 + 0.12 - 0.10 * lift,
        );
        let wrist = (
            elbow.0 - side_sign * 0.02 * lift,
            elbow.1 + 0.10 - 0.22 * lift - 0.02 * snap,
        );
        let index = (wrist.0 + side_sign * 0.02, wrist.1 - 0.03 - 0.02 * snap);
        let pinky = (wrist.0 + side_sign * 0.03, wrist.1 - 0.02 - 0.02 * snap);
        [shoulder, elbow, wrist, index, pinky]
    };
    let left_arm = arm(-1.0, 0.6);
    let right_arm = arm(1.0, 1.0);

    let leg = |side_sign: f64| -> [(f64, f64); 3] {
        let hip = (0.5 + side_sign * 0.06, 0.52 + 0.06 * bend);
        let knee = (0.5 + side_sign * (0.07 + 0.03 * bend), 0.72 + 0.04 * bend);
        let ankle = (0.5 + side_sign * 0.06, 0.92);
        [hip, knee, ankle]
    };
    let left_leg = leg(-1.0);
    let right_leg = leg(1.0);

    let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
    for idx in 0..LANDMARK_COUNT {
        let (x, y, vis) = match idx {
            // face cluster around a fixed head position
            landmark::NOSE..=landmark::MOUTH_RIGHT => {
                (0.47 + 0.006 * idx as f64, 0.12 + 0.02 * bend, 0.9)
            }
            landmark::LEFT_SHOULDER => (left_arm[0].0, left_arm[0].1, 1.0),
            landmark::RIGHT_SHOULDER => (right_arm[0].0, right_arm[0].1, 1.0),
            landmark::LEFT_ELBOW => (left_arm[1].0, left_arm[1].1, 1.0),
            landmark::RIGHT_ELBOW => (right_arm[1].0, right_arm[1].1, 1.0),
            landmark::LEFT_WRIST => (left_arm[2].0, left_arm[2].1, 1.0),
            landmark::RIGHT_WRIST => (right_arm[2].0, right_arm[2].1, 1.0),
            landmark::LEFT_INDEX => (left_arm[3].0, left_arm[3].1, 0.95),
            landmark::RIGHT_INDEX => (right_arm[3].0, right_arm[3].1, 0.95),
            landmark::LEFT_PINKY | landmark::LEFT_THUMB => (left_arm[4].0, left_arm[4].1, 0.9),
            landmark::RIGHT_PINKY | landmark::RIGHT_THUMB => (right_arm[4].0, right_arm[4].1, 0.9),
            landmark::LEFT_HIP => (left_leg[0].0, left_leg[0].1, 1.0),
            landmark::RIGHT_HIP => (right_leg[0].0, right_leg[0].1, 1.0),
            landmark::LEFT_KNEE => (left_leg[1].0, left_leg[1].1, 1.0),
            landmark::RIGHT_KNEE => (right_leg[1].0, right_leg[1].1, 1.0),
            landmark::LEFT_ANKLE => (left_leg[2].0, left_leg[2].1, 1.0),
            landmark::RIGHT_ANKLE => (right_leg[2].0, right_leg[2].1, 1.0),
            // heels and toes sit just off the ankles
            landmark::LEFT_HEEL => (left_leg[2].0 - 0.01, left_leg[2].1 + 0.02, 0.9),
            landmark::RIGHT_HEEL => (right_leg[2].0 + 0.01, right_leg[2].1 + 0.02, 0.9),
            landmark::LEFT_FOOT_INDEX => (left_leg[2].0 - 0.03, left_leg[2].1 + 0.03, 0.9),
            landmark::RIGHT_FOOT_INDEX => (right_leg[2].0 + 0.03, right_leg[2].1 + 0.03, 0.9),
            _ => (0.5, 0.5, 0.8),
        };
        landmarks.push(Landmark::with_visibility(x, y, 0.0, vis));
    }
    landmarks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_sequence_matches_requested_shape() {
        let seq = synthetic_shot_sequence(1000.0, 30.0);
        assert_eq!(seq.total_frames, 30);
        assert_eq!(seq.frames.len(), 30);
        assert_eq!(seq.fps, 30.0);
        assert_eq!(seq.duration_ms, 1000.0);
        assert!(seq.validate().is_ok());
    }

    #[test]
    fn synthetic_sequence_is_deterministic() {
        let a = synthetic_shot_sequence(1000.0, 30.0);
        let b = synthetic_shot_sequence(1000.0, 30.0);
        assert_eq!(a, b);
    }

    #[test]
    fn validate_rejects_empty_sequence() {
        let seq = PoseSequence { frames: vec![], fps: 30.0, duration_ms: 0.0, total_frames: 0 };
        assert!(matches!(seq.validate(), Err(PoseError::EmptySequence)));
    }

    #[test]
    fn validate_rejects_wrong_landmark_count() {
        let mut seq = synthetic_shot_sequence(200.0, 30.0);
        seq.frames[2].landmarks.pop();
        assert!(matches!(
            seq.validate(),
            Err(PoseError::WrongLandmarkCount { frame: 2, count: 32 })
        ));
    }

    #[test]
    fn validate_rejects_frame_count_mismatch() {
        let mut seq = synthetic_shot_sequence(200.0, 30.0);
        seq.total_frames += 1;
        assert!(matches!(seq.validate(), Err(PoseError::FrameCountMismatch { .. })));
    }

    #[test]
    fn validate_rejects_decreasing_timestamps() {
        let mut seq = synthetic_shot_sequence(200.0, 30.0);
        seq.frames[3].timestamp_ms = 0.0;
        seq.frames[2].timestamp_ms = 50.0;
        assert!(matches!(seq.validate(), Err(PoseError::NonMonotonicTimestamps { frame: 3 })));
    }

    #[test]
    fn detection_confidence_averages_visibility() {
        let seq = synthetic_shot_sequence(500.0, 30.0);
        let conf = seq.detection_confidence();
        assert!(conf > 0.5 && conf <= 1.0);

        let blind = PoseSequence {
            frames: vec![PoseFrame {
                landmarks: vec![Landmark::new(0.0, 0.0, 0.0); LANDMARK_COUNT],
                timestamp_ms: 0.0,
            }],
            fps: 30.0,
            duration_ms: 33.0,
            total_frames: 1,
        };
        assert_eq!(blind.detection_confidence(), 0.0);
    }
}
