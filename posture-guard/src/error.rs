use thiserror::Error;

/// Errors raised by the posture pipeline
#[derive(Error, Debug)]
pub enum PostureError {
    /// Landmarks were present but unusable for geometry
    #[error("Degenerate landmarks: {0}")]
    InputDegenerate(String),

    #[error("Calibration incomplete: good and slouched baselines are both required")]
    CalibrationIncomplete,

    /// No stored profile, identity mismatch, or unreadable profile data
    #[error("No calibration profile found for '{identity}'")]
    ProfileNotFound { identity: String },

    #[error("Cannot finalize calibration with zero collected frames")]
    EmptyCalibration,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from a persistence backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
