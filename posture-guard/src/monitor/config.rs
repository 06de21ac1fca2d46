use crate::calibration::DEFAULT_DRIFT_TOLERANCE;
use crate::classifier::{ClassifierConfig, Strategy};
use crate::metrics::DEFAULT_MIN_VISIBILITY;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How quickly a sustained slouch raises an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// ~15 s of slouching at 10 fps
    Low,
    /// ~10 s
    #[default]
    Medium,
    /// ~6 s
    High,
}

impl Sensitivity {
    pub fn required_slouch_frames(&self) -> u32 {
        match self {
            Self::Low => 150,
            Self::Medium => 100,
            Self::High => 60,
        }
    }

    pub fn required_good_frames(&self) -> u32 {
        match self {
            Self::Low => 25,
            Self::Medium | Self::High => 10,
        }
    }
}

/// Session monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub strategy: Strategy,
    pub sensitivity: Sensitivity,
    /// Overrides the sensitivity preset
    pub required_slouch_frames: Option<u32>,
    /// Overrides the sensitivity preset
    pub required_good_frames: Option<u32>,
    pub drift_check_interval_secs: u64,
    pub drift_tolerance: f64,
    pub min_visibility: f64,
    pub classifier: ClassifierConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            sensitivity: Sensitivity::default(),
            required_slouch_frames: None,
            required_good_frames: None,
            drift_check_interval_secs: 180,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            min_visibility: DEFAULT_MIN_VISIBILITY,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn slouch_frames(&self) -> u32 {
        self.required_slouch_frames
            .unwrap_or_else(|| self.sensitivity.required_slouch_frames())
            .max(1)
    }

    pub fn good_frames(&self) -> u32 {
        self.required_good_frames
            .unwrap_or_else(|| self.sensitivity.required_good_frames())
            .max(1)
    }

    pub fn drift_check_interval(&self) -> Duration {
        Duration::from_secs(self.drift_check_interval_secs)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
