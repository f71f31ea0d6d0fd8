mod packet;
mod result;

pub use packet::{DetectedObject, NnetPacket, TensorPacket};
pub use result::{
    DepthReading, Detection, DetectionBatch, EmotionScores, Landmark, Stage2Payload,
    EMOTION_LABELS,
};
