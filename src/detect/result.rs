/// Labels of the five-class emotion classifier, in tensor order.
pub const EMOTION_LABELS: [&str; 5] = ["neutral", "happy", "sad", "surprise", "anger"];

/// Decoded output of one frame: primary detections plus the optional
/// second-stage payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionBatch {
    /// Primary detections, in source order.
    pub stage1: Vec<Detection>,
    /// `None` when no second-stage model is configured.
    pub stage2: Option<Stage2Payload>,
}

impl DetectionBatch {
    pub fn new(stage1: Vec<Detection>, stage2: Option<Stage2Payload>) -> Self {
        Self { stage1, stage2 }
    }

    pub fn is_empty(&self) -> bool {
        self.stage1.is_empty()
    }
}

/// A single primary detection. Box coordinates are normalized to 0..1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub class_id: i32,
    pub confidence: f32,
    /// Spatial position in meters, only reported by the structured detection API.
    pub depth: Option<DepthReading>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepthReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Output of the second-stage network run on the first detection's crop.
#[derive(Clone, Debug, PartialEq)]
pub enum Stage2Payload {
    Landmarks(Vec<Landmark>),
    Emotions(EmotionScores),
}

/// Landmark point, normalized relative to the detection box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Raw per-class emotion confidences. Values are not normalized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmotionScores(pub Vec<f32>);

impl EmotionScores {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index and value of the highest score. Ties resolve to the lowest index.
    pub fn top(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &score) in self.0.iter().enumerate() {
            match best {
                Some((_, current)) if score <= current => {}
                _ => best = Some((index, score)),
            }
        }
        best
    }

    /// Index of the top emotion when its score is strictly above `threshold`.
    pub fn top_above(&self, threshold: f32) -> Option<usize> {
        self.top()
            .and_then(|(index, score)| (score > threshold).then_some(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_picks_first_maximum() {
        let scores = EmotionScores(vec![0.2, 0.4, 0.4, 0.1]);
        assert_eq!(scores.top(), Some((1, 0.4)));
    }

    #[test]
    fn top_above_requires_strict_excess() {
        let scores = EmotionScores(vec![0.1, 0.8, 0.05, 0.03, 0.02]);
        assert_eq!(scores.top_above(0.6), Some(1));
        assert_eq!(EMOTION_LABELS[1], "happy");
        assert_eq!(scores.top_above(0.8), None);
    }

    #[test]
    fn empty_scores_have_no_top() {
        assert_eq!(EmotionScores::default().top(), None);
        assert_eq!(EmotionScores::default().top_above(0.0), None);
    }
}
