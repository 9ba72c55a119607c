// src/lib.rs
//
// Shooting-form analysis: a pose-landmark sequence goes in, a scored
// eight-dimension biomechanical report comes out.

pub mod angles;
pub mod dimensions;
pub mod engine;
pub mod error;
pub mod export;
pub mod math;
pub mod narrative;
pub mod pose;
pub mod report;
pub mod runner;

pub use angles::{JointSeriesMap, JointType, Side};
pub use engine::{AnalysisEngine, CompleteAnalysisResult, EngineConfig};
pub use error::PoseError;
pub use pose::{CameraAngle, PoseProvider, PoseSequence};
pub use report::AiReport;
