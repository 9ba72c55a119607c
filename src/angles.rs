// src/angles.rs - joint angle calculator
//
// Maps landmark frames to per-joint angle time series. A joint is three
// landmarks (proximal, center, distal); the angle lives at the center.
// Samples whose minimum landmark visibility falls below 0.5 are recorded
// as zero-confidence and excluded from the series statistics.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::math;
use crate::pose::{landmark, PoseFrame, PoseSequence};

/// Minimum landmark visibility for a joint sample to count.
pub const MIN_VISIBILITY: f64 = 0.5;

/// Body side. Right is the documented default for ties and missing
/// data (most players shoot right-handed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Joint category, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    Knee,
    Hip,
    Shoulder,
    Elbow,
    Wrist,
}

/// The ten tracked joints. Closed enum so analyzers cannot look up a
/// joint that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    LeftKnee,
    RightKnee,
    LeftHip,
    RightHip,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
}

impl JointType {
    pub const ALL: [JointType; 10] = [
        JointType::LeftKnee,
        JointType::RightKnee,
        JointType::LeftHip,
        JointType::RightHip,
        JointType::LeftShoulder,
        JointType::RightShoulder,
        JointType::LeftElbow,
        JointType::RightElbow,
        JointType::LeftWrist,
        JointType::RightWrist,
    ];

    pub fn side(self) -> Side {
        match self {
            JointType::LeftKnee
            | JointType::LeftHip
            | JointType::LeftShoulder
            | JointType::LeftElbow
            | JointType::LeftWrist => Side::Left,
            _ => Side::Right,
        }
    }

    pub fn kind(self) -> JointKind {
        match self {
            JointType::LeftKnee | JointType::RightKnee => JointKind::Knee,
            JointType::LeftHip | JointType::RightHip => JointKind::Hip,
            JointType::LeftShoulder | JointType::RightShoulder => JointKind::Shoulder,
            JointType::LeftElbow | JointType::RightElbow => JointKind::Elbow,
            JointType::LeftWrist | JointType::RightWrist => JointKind::Wrist,
        }
    }

    /// The joint of `kind` on `side`.
    pub fn of(kind: JointKind, side: Side) -> JointType {
        match (kind, side) {
            (JointKind::Knee, Side::Left) => JointType::LeftKnee,
            (JointKind::Knee, Side::Right) => JointType::RightKnee,
            (JointKind::Hip, Side::Left) => JointType::LeftHip,
            (JointKind::Hip, Side::Right) => JointType::RightHip,
            (JointKind::Shoulder, Side::Left) => JointType::LeftShoulder,
            (JointKind::Shoulder, Side::Right) => JointType::RightShoulder,
            (JointKind::Elbow, Side::Left) => JointType::LeftElbow,
            (JointKind::Elbow, Side::Right) => JointType::RightElbow,
            (JointKind::Wrist, Side::Left) => JointType::LeftWrist,
            (JointKind::Wrist, Side::Right) => JointType::RightWrist,
        }
    }

    /// Human-readable name used in recommendation text.
    pub fn label(self) -> &'static str {
        match self {
            JointType::LeftKnee => "left knee",
            JointType::RightKnee => "right knee",
            JointType::LeftHip => "left hip",
            JointType::RightHip => "right hip",
            JointType::LeftShoulder => "left shoulder",
            JointType::RightShoulder => "right shoulder",
            JointType::LeftElbow => "left elbow",
            JointType::RightElbow => "right elbow",
            JointType::LeftWrist => "left wrist",
            JointType::RightWrist => "right wrist",
        }
    }

    fn index(self) -> usize {
        JointType::ALL.iter().position(|j| *j == self).unwrap_or(0)
    }
}

/// Static joint wiring: landmark indices plus a biomechanical reference
/// range (degrees) drawn from shooting-form literature.
#[derive(Debug, Clone, Copy)]
pub struct JointDefinition {
    pub joint: JointType,
    pub proximal: usize,
    pub center: usize,
    pub distal: usize,
    pub optimal_range: Option<(f64, f64)>,
}

pub static JOINT_DEFINITIONS: Lazy<[JointDefinition; 10]> = Lazy::new(|| {
    [
        JointDefinition {
            joint: JointType::LeftKnee,
            proximal: landmark::LEFT_HIP,
            center: landmark::LEFT_KNEE,
            distal: landmark::LEFT_ANKLE,
            optimal_range: Some((100.0, 140.0)),
        },
        JointDefinition {
            joint: JointType::RightKnee,
            proximal: landmark::RIGHT_HIP,
            center: landmark::RIGHT_KNEE,
            distal: landmark::RIGHT_ANKLE,
            optimal_range: Some((100.0, 140.0)),
        },
        JointDefinition {
            joint: JointType::LeftHip,
            proximal: landmark::LEFT_SHOULDER,
            center: landmark::LEFT_HIP,
            distal: landmark::LEFT_KNEE,
            optimal_range: Some((80.0, 120.0)),
        },
        JointDefinition {
            joint: JointType::RightHip,
            proximal: landmark::RIGHT_SHOULDER,
            center: landmark::RIGHT_HIP,
            distal: landmark::RIGHT_KNEE,
            optimal_range: Some((80.0, 120.0)),
        },
        JointDefinition {
            joint: JointType::LeftShoulder,
            proximal: landmark::LEFT_HIP,
            center: landmark::LEFT_SHOULDER,
            distal: landmark::LEFT_ELBOW,
            optimal_range: Some((70.0, 110.0)),
        },
        JointDefinition {
            joint: JointType::RightShoulder,
            proximal: landmark::RIGHT_HIP,
            center: landmark::RIGHT_SHOULDER,
            distal: landmark::RIGHT_ELBOW,
            optimal_range: Some((70.0, 110.0)),
        },
        JointDefinition {
            joint: JointType::LeftElbow,
            proximal: landmark::LEFT_SHOULDER,
            center: landmark::LEFT_ELBOW,
            distal: landmark::LEFT_WRIST,
            optimal_range: Some((140.0, 180.0)),
        },
        JointDefinition {
            joint: JointType::RightElbow,
            proximal: landmark::RIGHT_SHOULDER,
            center: landmark::RIGHT_ELBOW,
            distal: landmark::RIGHT_WRIST,
            optimal_range: Some((140.0, 180.0)),
        },
        JointDefinition {
            joint: JointType::LeftWrist,
            proximal: landmark::LEFT_ELBOW,
            center: landmark::LEFT_WRIST,
            distal: landmark::LEFT_INDEX,
            optimal_range: Some((150.0, 180.0)),
        },
        JointDefinition {
            joint: JointType::RightWrist,
            proximal: landmark::RIGHT_ELBOW,
            center: landmark::RIGHT_WRIST,
            distal: landmark::RIGHT_INDEX,
            optimal_range: Some((150.0, 180.0)),
        },
    ]
});

pub fn joint_definition(joint: JointType) -> &'static JointDefinition {
    &JOINT_DEFINITIONS[joint.index()]
}

/// One joint angle sample. Confidence is the minimum visibility of the
/// three contributing landmarks; gated samples carry angle 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngle {
    pub joint: JointType,
    pub angle: f64,
    pub confidence: f64,
}

/// Per-joint aggregate over a sequence. Only samples with confidence
/// >= 0.5 contribute; with zero surviving samples all statistics are 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSeries {
    pub joint: JointType,
    pub angles: Vec<f64>,
    pub timestamps: Vec<f64>,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl JointAngleSeries {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

pub fn frame_angle(frame: &PoseFrame, def: &JointDefinition) -> JointAngle {
    let prev = frame.landmarks.get(def.proximal);
    let center = frame.landmarks.get(def.center);
    let distal = frame.landmarks.get(def.distal);

    let (prev, center, distal) = match (prev, center, distal) {
        (Some(p), Some(c), Some(d)) => (p, c, d),
        _ => return JointAngle { joint: def.joint, angle: 0.0, confidence: 0.0 },
    };

    let confidence = prev
        .visibility_or_default()
        .min(center.visibility_or_default())
        .min(distal.visibility_or_default());

    if confidence < MIN_VISIBILITY {
        return JointAngle { joint: def.joint, angle: 0.0, confidence: 0.0 };
    }

    let angle = math::angle_between(&prev.as_vector(), &center.as_vector(), &distal.as_vector());
    JointAngle { joint: def.joint, angle: math::round1(angle), confidence }
}

pub fn angle_series(sequence: &PoseSequence, def: &JointDefinition) -> JointAngleSeries {
    let mut angles = Vec::new();
    let mut timestamps = Vec::new();

    for frame in &sequence.frames {
        let sample = frame_angle(frame, def);
        if sample.confidence >= MIN_VISIBILITY {
            angles.push(sample.angle);
            timestamps.push(frame.timestamp_ms);
        }
    }

    let mean = math::mean(&angles);
    let min = angles.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = angles.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let (min, max) = if angles.is_empty() { (0.0, 0.0) } else { (min, max) };
    let std_dev = math::std_dev(&angles);

    JointAngleSeries {
        joint: def.joint,
        angles,
        timestamps,
        mean: math::round1(mean),
        min: math::round1(min),
        max: math::round1(max),
        std_dev: math::round1(std_dev),
    }
}

/// Series for all ten joints, keyed by [`JointType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSeriesMap {
    series: Vec<JointAngleSeries>,
}

impl JointSeriesMap {
    pub fn get(&self, joint: JointType) -> &JointAngleSeries {
        &self.series[joint.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &JointAngleSeries> {
        self.series.iter()
    }

    /// Builds a map from arbitrary per-joint series. Mostly useful for
    /// driving analyzers with hand-made data in tests.
    pub fn from_fn(mut f: impl FnMut(JointType) -> JointAngleSeries) -> Self {
        Self { series: JointType::ALL.iter().map(|j| f(*j)).collect() }
    }
}

pub fn all_joint_series(sequence: &PoseSequence) -> JointSeriesMap {
    JointSeriesMap {
        series: JOINT_DEFINITIONS.iter().map(|def| angle_series(sequence, def)).collect(),
    }
}

/// The shooting side, inferred by comparing wrist angular range. Right
/// wins ties and the no-data case; a single shared implementation keeps
/// every analyzer agreeing on the same side.
pub fn detect_dominant_side(series: &JointSeriesMap) -> Side {
    let left_range = series.get(JointType::LeftWrist).range();
    let right_range = series.get(JointType::RightWrist).range();

    if left_range > right_range {
        Side::Left
    } else {
        Side::Right
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{synthetic_shot_sequence, Landmark, PoseFrame, LANDMARK_COUNT};

    fn frame_with(points: &[(usize, Landmark)]) -> PoseFrame {
        let mut landmarks = vec![Landmark::with_visibility(0.5, 0.5, 0.0, 1.0); LANDMARK_COUNT];
        for (idx, lm) in points {
            landmarks[*idx] = *lm;
        }
        PoseFrame { landmarks, timestamp_ms: 0.0 }
    }

    #[test]
    fn frame_angle_computes_geometry() {
        // right angle at the left knee
        let frame = frame_with(&[
            (landmark::LEFT_HIP, Landmark::with_visibility(0.5, 0.3, 0.0, 1.0)),
            (landmark::LEFT_KNEE, Landmark::with_visibility(0.5, 0.5, 0.0, 1.0)),
            (landmark::LEFT_ANKLE, Landmark::with_visibility(0.7, 0.5, 0.0, 1.0)),
        ]);
        let sample = frame_angle(&frame, joint_definition(JointType::LeftKnee));
        assert_eq!(sample.angle, 90.0);
        assert_eq!(sample.confidence, 1.0);
    }

    #[test]
    fn low_visibility_gates_the_sample() {
        let frame = frame_with(&[
            (landmark::LEFT_HIP, Landmark::with_visibility(0.5, 0.3, 0.0, 1.0)),
            (landmark::LEFT_KNEE, Landmark::with_visibility(0.5, 0.5, 0.0, 0.3)),
            (landmark::LEFT_ANKLE, Landmark::with_visibility(0.7, 0.5, 0.0, 1.0)),
        ]);
        let sample = frame_angle(&frame, joint_definition(JointType::LeftKnee));
        assert_eq!(sample.angle, 0.0);
        assert_eq!(sample.confidence, 0.0);
    }

    #[test]
    fn missing_visibility_counts_as_visible() {
        let frame = frame_with(&[
            (landmark::LEFT_HIP, Landmark::new(0.5, 0.3, 0.0)),
            (landmark::LEFT_KNEE, Landmark::new(0.5, 0.5, 0.0)),
            (landmark::LEFT_ANKLE, Landmark::new(0.7, 0.5, 0.0)),
        ]);
        let sample = frame_angle(&frame, joint_definition(JointType::LeftKnee));
        assert_eq!(sample.angle, 90.0);
    }

    #[test]
    fn empty_series_has_zero_statistics() {
        let seq = crate::pose::PoseSequence {
            frames: vec![],
            fps: 30.0,
            duration_ms: 0.0,
            total_frames: 0,
        };
        let series = angle_series(&seq, joint_definition(JointType::RightElbow));
        assert!(series.angles.is_empty());
        assert_eq!(series.mean, 0.0);
        assert_eq!(series.min, 0.0);
        assert_eq!(series.max, 0.0);
        assert_eq!(series.std_dev, 0.0);
    }

    #[test]
    fn all_joint_series_covers_all_ten_joints() {
        let seq = synthetic_shot_sequence(1000.0, 30.0);
        let map = all_joint_series(&seq);
        for joint in JointType::ALL {
            let series = map.get(joint);
            assert_eq!(series.joint, joint);
            assert!(!series.angles.is_empty(), "{joint:?} produced no samples");
        }
    }

    #[test]
    fn dominant_side_defaults_right_on_tie() {
        let map = JointSeriesMap::from_fn(|j| test_util::series_from(j, &[90.0, 100.0, 95.0]));
        assert_eq!(detect_dominant_side(&map), Side::Right);

        let empty = JointSeriesMap::from_fn(|j| test_util::series_from(j, &[]));
        assert_eq!(detect_dominant_side(&empty), Side::Right);
    }

    #[test]
    fn dominant_side_follows_larger_wrist_range() {
        let map = JointSeriesMap::from_fn(|j| match j {
            JointType::LeftWrist => test_util::series_from(j, &[100.0, 160.0]),
            _ => test_util::series_from(j, &[100.0, 110.0]),
        });
        assert_eq!(detect_dominant_side(&map), Side::Left);
    }

    #[test]
    fn synthetic_shot_is_right_handed() {
        let seq = synthetic_shot_sequence(1000.0, 30.0);
        let map = all_joint_series(&seq);
        assert_eq!(detect_dominant_side(&map), Side::Right);
    }
}
