use anyhow::{anyhow, Result};

use crate::decode::{decode_standalone_emotions, DecodeError};
use crate::detect::{NnetPacket, EMOTION_LABELS};
use crate::frame::Canvas;
use crate::handler::{Decoded, NnetHandler};
use crate::render::render_emotion;

/// Emotion classifier running as the only network in the pipeline.
#[derive(Clone, Debug)]
pub struct EmotionRecognitionHandler {
    labels: Vec<String>,
}

impl EmotionRecognitionHandler {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl Default for EmotionRecognitionHandler {
    fn default() -> Self {
        Self::new(EMOTION_LABELS.iter().map(|label| label.to_string()).collect())
    }
}

impl NnetHandler for EmotionRecognitionHandler {
    fn name(&self) -> &'static str {
        "emotion-recognition"
    }

    fn decode(&self, packet: &dyn NnetPacket) -> Result<Decoded, DecodeError> {
        decode_standalone_emotions(packet).map(Decoded::Emotions)
    }

    fn render(&self, decoded: &Decoded, canvas: &mut dyn Canvas) -> Result<()> {
        match decoded {
            Decoded::Emotions(scores) => {
                render_emotion(scores, canvas, &self.labels);
                Ok(())
            }
            Decoded::Detections(_) => Err(anyhow!(
                "{} cannot render detection output",
                self.name()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::TensorPacket;
    use crate::frame::Frame;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn renders_onto_resized_frame() {
        let scores = ArrayD::from_shape_vec(
            IxDyn(&[1, 5, 1, 1]),
            vec![0.02, 0.9, 0.03, 0.03, 0.02],
        )
        .unwrap();
        let packet = TensorPacket::new().with_tensor(scores);
        let handler = EmotionRecognitionHandler::default();

        let decoded = handler.decode(&packet).unwrap();
        let mut frame = Frame::new(640, 480);
        handler.render(&decoded, &mut frame).unwrap();

        assert_eq!(frame.image().dimensions(), (300, 300));
        assert!(frame.image().pixels().any(|pixel| pixel.0[0] > 0));
    }
}
