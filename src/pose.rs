//! Body sample types produced by the external pose estimator.
//!
//! A [`PoseFrame`] holds whatever joints the estimator reported for one
//! instant. Frames may be empty when detection failed.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anatomical landmarks, COCO ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    /// Nose tip
    Nose,
    /// Left eye
    LeftEye,
    /// Right eye
    RightEye,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl Joint {
    /// Every joint in COCO index order
    pub const ALL: [Self; 17] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Snake-case name used on the wire
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Joint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|joint| joint.name() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown joint name: {s}")))
    }
}

/// One tracked joint in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Which landmark this is
    pub joint: Joint,
    /// Horizontal position
    pub x: f64,
    /// Vertical position, growing downwards
    pub y: f64,
    /// Depth, when the estimator provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection confidence (0-1)
    pub score: f64,
}

impl Keypoint {
    /// Create a 2D keypoint
    #[must_use]
    pub fn new(joint: Joint, x: f64, y: f64, score: f64) -> Self {
        Self {
            joint,
            x,
            y,
            z: None,
            score,
        }
    }

    /// Planar position
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Full set of keypoints sampled at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture time in milliseconds, increasing across a session
    pub timestamp_ms: u64,
    /// Detected joints, possibly none
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl PoseFrame {
    /// Create a frame from detected keypoints
    #[must_use]
    pub fn new(timestamp_ms: u64, keypoints: Vec<Keypoint>) -> Self {
        Self {
            timestamp_ms,
            keypoints,
        }
    }

    /// A frame in which detection found nobody
    #[must_use]
    pub fn empty(timestamp_ms: u64) -> Self {
        Self::new(timestamp_ms, Vec::new())
    }

    /// Builder-style keypoint insertion
    #[must_use]
    pub fn with_keypoint(mut self, joint: Joint, x: f64, y: f64, score: f64) -> Self {
        self.keypoints.push(Keypoint::new(joint, x, y, score));
        self
    }

    /// True when no joints were reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}
