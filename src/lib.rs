//! Neural-network output overlay
//!
//! This crate decodes the output tensors of an embedded vision accelerator into
//! typed detections and draws them as overlays on video frames.
//!
//! # Pipeline
//!
//! Each frame flows one way and nothing is kept between frames:
//!
//! 1. **Decode**: a packet's structured detections or raw `[1, 1, N, 7]` tensor
//!    become a `DetectionBatch`, plus an optional second-stage payload
//!    (facial landmarks or an emotion vector).
//! 2. **Map**: normalized coordinates become pixel or depth-sensor positions.
//! 3. **Render**: rectangles, labels, confidence, distance and second-stage
//!    artifacts are drawn onto a caller-owned `Canvas`.
//!
//! # Module Structure
//!
//! - `detect`: detection types and the `NnetPacket` source contract
//! - `decode`: primary and second-stage tensor decoding
//! - `geometry`: coordinate mapping and padding shrink
//! - `frame`: `Canvas` trait, RGB `Frame`, `RecordingCanvas`
//! - `render`: overlay renderers and `OverlayContext`
//! - `handler`: named decode/render pairs and their registry
//! - `config`: JSON + environment configuration

pub mod config;
pub mod decode;
pub mod detect;
pub mod frame;
pub mod geometry;
pub mod handler;
pub mod render;

pub use config::OverlayConfig;
pub use decode::{decode_batch, DecodeError, PrimaryDecoder, SecondStageModel};
pub use detect::{
    DepthReading, DetectedObject, Detection, DetectionBatch, EmotionScores, Landmark, NnetPacket,
    Stage2Payload, TensorPacket, EMOTION_LABELS,
};
pub use frame::{Canvas, DrawCommand, Frame, RecordingCanvas};
pub use geometry::{shrink_box, to_depth, to_pixel, DepthCalibration, Point};
pub use handler::{
    Decoded, EmotionRecognitionHandler, HandlerRegistry, MobilenetSsdHandler, NnetHandler,
};
pub use render::{render_detections, render_emotion, OverlayContext};
