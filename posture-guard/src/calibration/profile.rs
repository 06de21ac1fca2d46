use crate::metrics::PostureMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which reference posture is being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PoseKind {
    Good,
    Slouched,
}

impl fmt::Display for PoseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => f.write_str("good"),
            Self::Slouched => f.write_str("slouched"),
        }
    }
}

/// Personal reference postures for one identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationProfile {
    pub identity: String,
    pub created_at_ms: u64,
    #[serde(default)]
    pub good_posture: Option<PostureMetrics>,
    #[serde(default)]
    pub slouched_posture: Option<PostureMetrics>,
}

impl CalibrationProfile {
    pub fn new(identity: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            identity: identity.into(),
            created_at_ms,
            good_posture: None,
            slouched_posture: None,
        }
    }

    pub fn baseline(&self, pose: PoseKind) -> Option<&PostureMetrics> {
        match pose {
            PoseKind::Good => self.good_posture.as_ref(),
            PoseKind::Slouched => self.slouched_posture.as_ref(),
        }
    }

    pub fn set_baseline(&mut self, pose: PoseKind, metrics: PostureMetrics) {
        match pose {
            PoseKind::Good => self.good_posture = Some(metrics),
            PoseKind::Slouched => self.slouched_posture = Some(metrics),
        }
    }

    /// Both reference postures have been recorded
    pub fn is_complete(&self) -> bool {
        self.good_posture.is_some() && self.slouched_posture.is_some()
    }
}
