mod emotion;
mod mobilenet_ssd;
mod registry;

pub use emotion::EmotionRecognitionHandler;
pub use mobilenet_ssd::MobilenetSsdHandler;
pub use registry::HandlerRegistry;

use anyhow::Result;

use crate::decode::DecodeError;
use crate::detect::{DetectionBatch, EmotionScores, NnetPacket};
use crate::frame::Canvas;

/// Decoded output of one handler for one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Detections(DetectionBatch),
    Emotions(EmotionScores),
}

/// Decode/render pair for one kind of network.
///
/// Handlers are stateless across frames: `decode` reads the packet and
/// `render` draws the decoded output onto a caller-owned canvas.
pub trait NnetHandler {
    /// Network identifier used for registry lookup.
    fn name(&self) -> &'static str;

    fn decode(&self, packet: &dyn NnetPacket) -> Result<Decoded, DecodeError>;

    /// Fails only when `decoded` came from a different kind of handler.
    fn render(&self, decoded: &Decoded, canvas: &mut dyn Canvas) -> Result<()>;
}
