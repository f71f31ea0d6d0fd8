//! Tensor decoding: packet outputs to typed detections.

mod error;
mod primary;
mod second_stage;

pub use error::DecodeError;
pub use primary::{decode_raw_tensor, PrimaryDecoder, END_OF_DETECTIONS, RAW_COLUMNS};
pub use second_stage::{
    decode_emotions, decode_landmarks, decode_standalone_emotions, SecondStageModel,
    EMOTIONS_BLOB, LANDMARKS_BLOB,
};

use ndarray::{ArrayView4, ArrayViewD, Ix4};

use crate::detect::{DetectionBatch, NnetPacket};

/// Decode both stages of a two-stage packet.
///
/// Either stage failing fails the whole frame.
pub fn decode_batch<P: NnetPacket + ?Sized>(
    packet: &P,
    decoder: PrimaryDecoder,
    second_stage: SecondStageModel,
    threshold: f32,
) -> Result<DetectionBatch, DecodeError> {
    let stage1 = decoder.decode(packet, threshold)?;
    let stage2 = second_stage.decode(packet)?;
    log::debug!(
        "decoded {} detection(s), stage2 {:?}",
        stage1.len(),
        second_stage
    );
    Ok(DetectionBatch::new(stage1, stage2))
}

pub(crate) fn rank4(
    tensor: ArrayViewD<'_, f32>,
    index: usize,
) -> Result<ArrayView4<'_, f32>, DecodeError> {
    let actual = tensor.ndim();
    tensor
        .into_dimensionality::<Ix4>()
        .map_err(|_| DecodeError::Rank {
            index,
            expected: 4,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Stage2Payload, TensorPacket};
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn batch_fails_when_second_stage_fails() {
        let rows = ArrayD::from_shape_vec(
            IxDyn(&[1, 1, 1, 7]),
            vec![1.0, 1.0, 0.9, 0.1, 0.1, 0.2, 0.2],
        )
        .unwrap();
        let packet = TensorPacket::new().with_tensor(rows);

        let result = decode_batch(&packet, PrimaryDecoder::Raw, SecondStageModel::Landmarks, 0.5);
        assert_eq!(result, Err(DecodeError::MissingTensor(1)));
    }

    #[test]
    fn odd_landmark_tensor_keeps_stage1() {
        let rows = ArrayD::from_shape_vec(
            IxDyn(&[1, 1, 1, 7]),
            vec![1.0, 1.0, 0.9, 0.1, 0.1, 0.2, 0.2],
        )
        .unwrap();
        let landmarks =
            ArrayD::from_shape_vec(IxDyn(&[1, 5, 1, 1]), vec![0.2, 0.3, 0.6, 0.7, 0.9]).unwrap();
        let packet = TensorPacket::new().with_tensor(rows).with_tensor(landmarks);

        let batch =
            decode_batch(&packet, PrimaryDecoder::Raw, SecondStageModel::Landmarks, 0.5).unwrap();
        assert_eq!(batch.stage1.len(), 1);
        assert!(matches!(batch.stage2, Some(Stage2Payload::Landmarks(ref points)) if points.len() == 2));
    }

    #[test]
    fn batch_carries_both_stages() {
        let rows = ArrayD::from_shape_vec(
            IxDyn(&[1, 1, 1, 7]),
            vec![1.0, 1.0, 0.9, 0.1, 0.1, 0.2, 0.2],
        )
        .unwrap();
        let landmarks =
            ArrayD::from_shape_vec(IxDyn(&[1, 4, 1, 1]), vec![0.2, 0.3, 0.6, 0.7]).unwrap();
        let packet = TensorPacket::new().with_tensor(rows).with_tensor(landmarks);

        let batch =
            decode_batch(&packet, PrimaryDecoder::Raw, SecondStageModel::Landmarks, 0.5).unwrap();
        assert_eq!(batch.stage1.len(), 1);
        assert!(matches!(batch.stage2, Some(Stage2Payload::Landmarks(ref points)) if points.len() == 2));
    }
}
