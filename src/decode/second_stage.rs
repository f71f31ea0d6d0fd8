use ndarray::ArrayViewD;

use crate::decode::{rank4, DecodeError};
use crate::detect::{EmotionScores, Landmark, NnetPacket, Stage2Payload, EMOTION_LABELS};

/// Blob name fragment identifying the facial landmark regressor.
pub const LANDMARKS_BLOB: &str = "landmarks-regression-retail-0009";
/// Blob name fragment identifying the emotion classifier.
pub const EMOTIONS_BLOB: &str = "emotions-recognition-retail-0003";

/// Output index of the second-stage tensor in a two-stage packet.
const STAGE2_TENSOR: usize = 1;

/// Second-stage network configured behind the primary detector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SecondStageModel {
    #[default]
    None,
    Landmarks,
    Emotions,
}

impl SecondStageModel {
    /// Resolve the model from the configured second-stage blob file.
    ///
    /// The emotion classifier takes precedence when both names appear.
    pub fn from_blob_file(blob_file: &str) -> Self {
        if blob_file.contains(EMOTIONS_BLOB) {
            Self::Emotions
        } else if blob_file.contains(LANDMARKS_BLOB) {
            Self::Landmarks
        } else {
            Self::None
        }
    }

    /// Decode the second-stage tensor. Returns `None` when no model is set.
    pub fn decode<P: NnetPacket + ?Sized>(
        &self,
        packet: &P,
    ) -> Result<Option<Stage2Payload>, DecodeError> {
        match self {
            Self::None => Ok(None),
            Self::Landmarks => {
                let landmarks = decode_landmarks(stage2_tensor(packet)?, STAGE2_TENSOR)?;
                Ok(Some(Stage2Payload::Landmarks(landmarks)))
            }
            Self::Emotions => {
                let scores = decode_emotions(stage2_tensor(packet)?, STAGE2_TENSOR)?;
                Ok(Some(Stage2Payload::Emotions(scores)))
            }
        }
    }
}

fn stage2_tensor<P: NnetPacket + ?Sized>(packet: &P) -> Result<ArrayViewD<'_, f32>, DecodeError> {
    packet
        .tensor(STAGE2_TENSOR)
        .ok_or(DecodeError::MissingTensor(STAGE2_TENSOR))
}

/// Group a `[1, K, 1, 1]` tensor into `K / 2` points, in emission order.
///
/// A trailing unpaired value is dropped.
pub fn decode_landmarks(
    tensor: ArrayViewD<'_, f32>,
    index: usize,
) -> Result<Vec<Landmark>, DecodeError> {
    let values = channel_values(tensor, index)?;
    if values.len() % 2 != 0 {
        log::warn!(
            "landmark tensor {} holds {} values, dropping the unpaired last one",
            index,
            values.len()
        );
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| Landmark {
            x: pair[0],
            y: pair[1],
        })
        .collect())
}

/// Decode the five-class emotion vector of a two-stage pipeline.
pub fn decode_emotions(
    tensor: ArrayViewD<'_, f32>,
    index: usize,
) -> Result<EmotionScores, DecodeError> {
    let values = channel_values(tensor, index)?;
    if values.len() != EMOTION_LABELS.len() {
        return Err(DecodeError::Shape {
            index,
            expected: "[1, 5, 1, 1]",
            actual: vec![1, values.len(), 1, 1],
        });
    }
    Ok(EmotionScores(values))
}

/// Decode the emotion classifier when it runs as the only network.
///
/// Reads output 0 and accepts any number of classes.
pub fn decode_standalone_emotions<P: NnetPacket + ?Sized>(
    packet: &P,
) -> Result<EmotionScores, DecodeError> {
    let tensor = packet.tensor(0).ok_or(DecodeError::MissingTensor(0))?;
    Ok(EmotionScores(channel_values(tensor, 0)?))
}

/// Element `[0, k, 0, 0]` for every channel `k`.
fn channel_values(tensor: ArrayViewD<'_, f32>, index: usize) -> Result<Vec<f32>, DecodeError> {
    let tensor = rank4(tensor, index)?;
    let shape = tensor.shape();
    if shape[0] != 1 || shape[2] == 0 || shape[3] == 0 {
        return Err(DecodeError::Shape {
            index,
            expected: "[1, K, >=1, >=1]",
            actual: shape.to_vec(),
        });
    }
    Ok((0..shape[1]).map(|k| tensor[[0, k, 0, 0]]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::TensorPacket;
    use ndarray::{ArrayD, IxDyn};

    fn channels(values: &[f32]) -> ArrayD<f32> {
        ArrayD::from_shape_vec(IxDyn(&[1, values.len(), 1, 1]), values.to_vec()).unwrap()
    }

    fn two_stage_packet(stage2: ArrayD<f32>) -> TensorPacket {
        TensorPacket::new()
            .with_tensor(ArrayD::zeros(IxDyn(&[1, 1, 1, 7])))
            .with_tensor(stage2)
    }

    #[test]
    fn resolves_model_from_blob_path() {
        assert_eq!(
            SecondStageModel::from_blob_file("resources/nn/landmarks-regression-retail-0009.blob"),
            SecondStageModel::Landmarks
        );
        assert_eq!(
            SecondStageModel::from_blob_file("emotions-recognition-retail-0003.blob.sh4cmx4NCE1"),
            SecondStageModel::Emotions
        );
        assert_eq!(SecondStageModel::from_blob_file(""), SecondStageModel::None);
        assert_eq!(
            SecondStageModel::from_blob_file("mobilenet-ssd.blob"),
            SecondStageModel::None
        );
    }

    #[test]
    fn no_model_means_absent_stage2() {
        let packet = TensorPacket::new();
        assert_eq!(SecondStageModel::None.decode(&packet), Ok(None));
    }

    #[test]
    fn landmarks_pair_up_in_order() {
        let packet = two_stage_packet(channels(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]));
        let payload = SecondStageModel::Landmarks.decode(&packet).unwrap();
        assert_eq!(
            payload,
            Some(Stage2Payload::Landmarks(vec![
                Landmark { x: 0.1, y: 0.2 },
                Landmark { x: 0.3, y: 0.4 },
                Landmark { x: 0.5, y: 0.6 },
            ]))
        );
    }

    #[test]
    fn odd_landmark_count_drops_trailing_value() {
        let packet = two_stage_packet(channels(&[0.1, 0.2, 0.3]));
        assert_eq!(
            SecondStageModel::Landmarks.decode(&packet),
            Ok(Some(Stage2Payload::Landmarks(vec![Landmark { x: 0.1, y: 0.2 }])))
        );
    }

    #[test]
    fn emotions_keep_raw_values() {
        let packet = two_stage_packet(channels(&[0.1, 0.8, 0.05, 0.03, 0.02]));
        let payload = SecondStageModel::Emotions.decode(&packet).unwrap();
        assert_eq!(
            payload,
            Some(Stage2Payload::Emotions(EmotionScores(vec![
                0.1, 0.8, 0.05, 0.03, 0.02
            ])))
        );
    }

    #[test]
    fn emotion_vector_must_have_five_classes() {
        let packet = two_stage_packet(channels(&[0.5, 0.5]));
        assert!(matches!(
            SecondStageModel::Emotions.decode(&packet),
            Err(DecodeError::Shape { index: 1, .. })
        ));
    }

    #[test]
    fn missing_stage2_tensor_is_fatal() {
        let packet = TensorPacket::new().with_tensor(ArrayD::zeros(IxDyn(&[1, 1, 1, 7])));
        assert_eq!(
            SecondStageModel::Emotions.decode(&packet),
            Err(DecodeError::MissingTensor(1))
        );
    }

    #[test]
    fn standalone_emotions_read_first_output() {
        let packet = TensorPacket::new().with_tensor(channels(&[0.2, 0.1, 0.7]));
        let scores = decode_standalone_emotions(&packet).unwrap();
        assert_eq!(scores, EmotionScores(vec![0.2, 0.1, 0.7]));
    }
}
