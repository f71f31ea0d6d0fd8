use crate::detect::EmotionScores;
use crate::frame::Canvas;
use crate::geometry::Point;
use crate::render::{RED, STANDALONE_CANVAS_SIZE, STANDALONE_EMOTION_THRESHOLD};

const LABEL_ORIGIN: Point = (10, 10);

/// Render the output of a standalone emotion classifier.
///
/// Draws the top emotion when its score exceeds
/// [`STANDALONE_EMOTION_THRESHOLD`], then resizes the canvas to a
/// [`STANDALONE_CANVAS_SIZE`] square.
pub fn render_emotion<C: Canvas + ?Sized>(
    scores: &EmotionScores,
    canvas: &mut C,
    labels: &[String],
) {
    if let Some(index) = scores.top_above(STANDALONE_EMOTION_THRESHOLD) {
        match labels.get(index) {
            Some(emotion) => canvas.put_text(LABEL_ORIGIN, emotion, RED),
            None => log::warn!(
                "emotion index {} is out of range ({} labels)",
                index,
                labels.len()
            ),
        }
    }
    canvas.resize(STANDALONE_CANVAS_SIZE, STANDALONE_CANVAS_SIZE);
}
