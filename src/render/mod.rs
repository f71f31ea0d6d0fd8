//! Overlay rendering of decoded detections.
//!
//! Every renderer draws into a caller-owned `&mut impl Canvas` and returns
//! nothing; the canvas is the single output.

mod detections;
mod emotion;

pub use detections::render_detections;
pub use emotion::render_emotion;

use image::Rgb;
use std::time::Duration;

use crate::decode::SecondStageModel;
use crate::frame::Color;
use crate::geometry::DepthCalibration;

/// Minimum top score for the emotion label drawn on the first detection.
pub const EMBEDDED_EMOTION_THRESHOLD: f32 = 0.6;

/// Minimum top score for the label of a standalone emotion pipeline.
pub const STANDALONE_EMOTION_THRESHOLD: f32 = 0.7;

/// Maximum age of the detection timestamp for the embedded emotion label.
pub const EMOTION_RECENCY_WINDOW: Duration = Duration::from_secs(100);

/// Side of the square canvas produced by the standalone emotion renderer.
pub const STANDALONE_CANVAS_SIZE: u32 = 300;

pub const RED: Color = Rgb([255, 0, 0]);
pub const GREEN: Color = Rgb([0, 255, 0]);
pub const BLUE: Color = Rgb([0, 0, 255]);
pub const WHITE: Color = Rgb([255, 255, 255]);

/// Per-frame rendering configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayContext {
    pub confidence_threshold: f32,
    /// Label table indexed by class id.
    pub labels: Vec<String>,
    pub second_stage: SecondStageModel,
    /// When set, boxes are drawn in depth-sensor space.
    pub depth: Option<DepthCalibration>,
    pub padding_factor: f32,
    /// Draw the x/y/z distance lines under each label.
    pub calc_dist_to_bb: bool,
}

impl OverlayContext {
    /// Label for `class_id`, or `None` when it falls outside the table.
    pub fn label(&self, class_id: i32) -> Option<&str> {
        usize::try_from(class_id)
            .ok()
            .and_then(|index| self.labels.get(index))
            .map(String::as_str)
    }
}

impl Default for OverlayContext {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            labels: Vec::new(),
            second_stage: SecondStageModel::None,
            depth: None,
            padding_factor: 0.3,
            calc_dist_to_bb: false,
        }
    }
}
