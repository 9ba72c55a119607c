// src/error.rs

use thiserror::Error;

/// Violations of the upstream pose-detection contract. These are the
/// only hard failures the analysis core produces; everything else
/// (low visibility, short series, unreachable narrative service)
/// degrades to documented neutral results instead.
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("pose sequence contains no frames")]
    EmptySequence,

    #[error("frame {frame} has {count} landmarks, expected 33")]
    WrongLandmarkCount { frame: usize, count: usize },

    #[error("sequence declares {declared} frames but contains {actual}")]
    FrameCountMismatch { declared: usize, actual: usize },

    #[error("timestamp at frame {frame} is earlier than its predecessor")]
    NonMonotonicTimestamps { frame: usize },
}
