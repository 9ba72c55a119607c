// src/dimensions/mod.rs
//
// The eight dimension analyzers. Each module exposes a config struct
// with research-backed defaults, an `analyze` entry point producing a
// bounded 0-100 result, and a `recommendations` generator consumed by
// the report builder. Analyzers never fail: series with fewer than
// five usable samples degrade to a documented neutral result.

pub mod consistency;
pub mod coordination;
pub mod joint_angles;
pub mod kinetic_chain;
pub mod stability;
pub mod style;
pub mod symmetry;
pub mod timing;

use serde::{Deserialize, Serialize};

use crate::pose::CameraAngle;

/// Series shorter than this carry too little signal to score.
pub const MIN_SAMPLES: usize = 5;

/// Camera-angle-dependent uncertainty attached to angle-derived scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMargin {
    pub value: f64,
    pub unit: String,
    pub condition: String,
}

impl ErrorMargin {
    pub fn new(value: f64, condition: &str) -> Self {
        Self { value, unit: "degrees".to_string(), condition: condition.to_string() }
    }

    /// Margin for angle measurements: side views see joints edge-on.
    pub fn angular(camera: CameraAngle) -> Self {
        match camera {
            CameraAngle::Side => Self::new(15.0, "side view, joint angles most accurate"),
            CameraAngle::Front => Self::new(20.0, "front view, depth information limited"),
            CameraAngle::Other => Self::new(25.0, "oblique view, measurement error elevated"),
        }
    }

    /// Margin for left/right comparisons: front views see both sides.
    pub fn bilateral(camera: CameraAngle) -> Self {
        match camera {
            CameraAngle::Side => Self::new(15.0, "side view, far side partly occluded"),
            CameraAngle::Front => Self::new(15.0, "front view, both sides visible"),
            CameraAngle::Other => Self::new(20.0, "oblique view, asymmetric occlusion"),
        }
    }
}
