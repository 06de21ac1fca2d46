use serde::{Deserialize, Serialize};

/// A normalized detector coordinate (x/y in 0-1 with y growing downward, z relative depth)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A single detected keypoint with optional visibility confidence (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(flatten)]
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point::new(x, y, z),
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Landmarks without a confidence score are trusted
    pub fn is_visible(&self, min_visibility: f64) -> bool {
        self.visibility.map_or(true, |v| v >= min_visibility)
    }
}

/// The body keypoints used for posture estimation, one set per video frame
///
/// Every landmark is optional on the wire so that partial detections can be
/// represented; posture metrics require all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkSet {
    pub nose: Option<Landmark>,
    pub left_shoulder: Option<Landmark>,
    pub right_shoulder: Option<Landmark>,
    pub left_hip: Option<Landmark>,
    pub right_hip: Option<Landmark>,
    pub left_ear: Option<Landmark>,
    pub right_ear: Option<Landmark>,
    /// Capture time in milliseconds
    #[serde(default)]
    pub timestamp_ms: u64,
}

/// Output of the landmark detector for a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorFrame {
    NoPerson {
        #[serde(default, rename = "timestampMs")]
        timestamp_ms: u64,
    },
    Landmarks(LandmarkSet),
}

impl DetectorFrame {
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            Self::NoPerson { timestamp_ms } => *timestamp_ms,
            Self::Landmarks(set) => set.timestamp_ms,
        }
    }
}
