use thiserror::Error;

/// Fatal decode failure. The frame yields no detections.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("packet has no output tensor {0}")]
    MissingTensor(usize),

    #[error("tensor {index} has rank {actual}, expected {expected}")]
    Rank {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("tensor {index} has shape {actual:?}, expected {expected}")]
    Shape {
        index: usize,
        expected: &'static str,
        actual: Vec<usize>,
    },

    #[error("packet reported {count} detections but object {index} is missing")]
    MissingObject { index: usize, count: usize },
}
