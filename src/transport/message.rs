//! Message definitions for the point-cloud streams
//!
//! Each handled topic carries three logical streams. The payloads mirror the
//! usual robotics message shapes:
//! - `PointCloud`: frame id, stamp (milliseconds since UNIX epoch), points
//!   and optional per-point channels
//! - `Radius`: a single `f32` controlling how large points are drawn
//! - `Color`: an RGBA tuple; accepted by handlers but not acted on

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The logical stream a subscription is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Data,
    Radius,
    Color,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [StreamKind::Data, StreamKind::Radius, StreamKind::Color];

    /// Name of the wire topic carrying this stream for the handler topic `base`.
    pub fn topic_for(self, base: &str) -> String {
        match self {
            StreamKind::Data => base.to_string(),
            StreamKind::Radius => format!("{base}/radius"),
            StreamKind::Color => format!("{base}/color"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point32 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelFloat32 {
    pub name: String,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointCloud {
    pub frame_id: String,
    pub stamp: i64,
    pub points: Vec<Point32>,
    #[serde(default)]
    pub channels: Vec<ChannelFloat32>,
}

impl PointCloud {
    /// Build a cloud stamped with the current wall-clock time.
    pub fn new(frame_id: &str, points: Vec<Point32>) -> Self {
        Self {
            frame_id: frame_id.to_string(),
            stamp: Utc::now().timestamp_millis(),
            points,
            channels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    PointCloud(PointCloud),
    Radius { data: f32 },
    Color(ColorRgba),
}

impl StreamMessage {
    pub fn kind(&self) -> StreamKind {
        match self {
            StreamMessage::PointCloud(_) => StreamKind::Data,
            StreamMessage::Radius { .. } => StreamKind::Radius,
            StreamMessage::Color(_) => StreamKind::Color,
        }
    }
}
