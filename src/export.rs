// src/export.rs - session artifact export
//
// Writes per-frame joint angles to CSV and the completed scorecard to
// JSON under a timestamped session directory. These are side artifacts
// for later inspection, not part of the analysis result itself.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use csv::Writer;
use serde::Serialize;

use crate::angles::{frame_angle, JointType, JOINT_DEFINITIONS};
use crate::engine::CompleteAnalysisResult;
use crate::pose::PoseSequence;

#[derive(Debug, Serialize)]
struct AngleRecord {
    frame: usize,
    timestamp_ms: f64,

    left_knee_angle: Option<f64>,
    left_knee_confidence: Option<f64>,
    right_knee_angle: Option<f64>,
    right_knee_confidence: Option<f64>,

    left_hip_angle: Option<f64>,
    left_hip_confidence: Option<f64>,
    right_hip_angle: Option<f64>,
    right_hip_confidence: Option<f64>,

    left_shoulder_angle: Option<f64>,
    left_shoulder_confidence: Option<f64>,
    right_shoulder_angle: Option<f64>,
    right_shoulder_confidence: Option<f64>,

    left_elbow_angle: Option<f64>,
    left_elbow_confidence: Option<f64>,
    right_elbow_angle: Option<f64>,
    right_elbow_confidence: Option<f64>,

    left_wrist_angle: Option<f64>,
    left_wrist_confidence: Option<f64>,
    right_wrist_angle: Option<f64>,
    right_wrist_confidence: Option<f64>,
}

pub struct AngleExporter {
    output_dir: PathBuf,
    session_name: String,
}

impl AngleExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));

        Self { output_dir: output_dir.as_ref().to_path_buf(), session_name }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    /// One CSV row per frame, all ten joints. Gated samples are left
    /// empty rather than written as zeros.
    pub fn export_csv(&self, sequence: &PoseSequence) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("joint_angles.csv");
        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);

        for (i, frame) in sequence.frames.iter().enumerate() {
            let record = self.create_record(i, frame);
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(csv_path)
    }

    /// The full scorecard as pretty-printed JSON.
    pub fn export_result(&self, result: &CompleteAnalysisResult) -> Result<PathBuf> {
        let json_path = self.session_dir().join("analysis.json");
        if let Some(parent) = json_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&json_path)?;
        serde_json::to_writer_pretty(file, result)?;
        Ok(json_path)
    }

    fn create_record(&self, frame_idx: usize, frame: &crate::pose::PoseFrame) -> AngleRecord {
        let mut record = AngleRecord {
            frame: frame_idx,
            timestamp_ms: frame.timestamp_ms,
            left_knee_angle: None,
            left_knee_confidence: None,
            right_knee_angle: None,
            right_knee_confidence: None,
            left_hip_angle: None,
            left_hip_confidence: None,
            right_hip_angle: None,
            right_hip_confidence: None,
            left_shoulder_angle: None,
            left_shoulder_confidence: None,
            right_shoulder_angle: None,
            right_shoulder_confidence: None,
            left_elbow_angle: None,
            left_elbow_confidence: None,
            right_elbow_angle: None,
            right_elbow_confidence: None,
            left_wrist_angle: None,
            left_wrist_confidence: None,
            right_wrist_angle: None,
            right_wrist_confidence: None,
        };

        for def in JOINT_DEFINITIONS.iter() {
            let sample = frame_angle(frame, def);
            if sample.confidence <= 0.0 {
                continue;
            }
            let (angle, confidence) = (Some(sample.angle), Some(sample.confidence));
            match def.joint {
                JointType::LeftKnee => {
                    record.left_knee_angle = angle;
                    record.left_knee_confidence = confidence;
                }
                JointType::RightKnee => {
                    record.right_knee_angle = angle;
                    record.right_knee_confidence = confidence;
                }
                JointType::LeftHip => {
                    record.left_hip_angle = angle;
                    record.left_hip_confidence = confidence;
                }
                JointType::RightHip => {
                    record.right_hip_angle = angle;
                    record.right_hip_confidence = confidence;
                }
                JointType::LeftShoulder => {
                    record.left_shoulder_angle = angle;
                    record.left_shoulder_confidence = confidence;
                }
                JointType::RightShoulder => {
                    record.right_shoulder_angle = angle;
                    record.right_shoulder_confidence = confidence;
                }
                JointType::LeftElbow => {
                    record.left_elbow_angle = angle;
                    record.left_elbow_confidence = confidence;
                }
                JointType::RightElbow => {
                    record.right_elbow_angle = angle;
                    record.right_elbow_confidence = confidence;
                }
                JointType::LeftWrist => {
                    record.left_wrist_angle = angle;
                    record.left_wrist_confidence = confidence;
                }
                JointType::RightWrist => {
                    record.right_wrist_angle = angle;
                    record.right_wrist_confidence = confidence;
                }
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalysisEngine;
    use crate::pose::{synthetic_shot_sequence, CameraAngle};

    #[test]
    fn csv_has_one_row_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        let exporter = AngleExporter::new(dir.path(), Some("test_session".to_string()));

        let path = exporter.export_csv(&sequence).unwrap();
        assert!(path.ends_with("test_session/joint_angles.csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        // header plus 30 frames
        assert_eq!(lines.len(), 31);
        assert!(lines[0].contains("right_elbow_angle"));
    }

    #[test]
    fn result_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        let result = AnalysisEngine::default().analyze(&sequence, CameraAngle::Side).unwrap();
        let exporter = AngleExporter::new(dir.path(), None);

        let path = exporter.export_result(&result).unwrap();
        let loaded: CompleteAnalysisResult =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded.overall_score, result.overall_score);
        assert_eq!(loaded.dimensions, result.dimensions);
    }
}
