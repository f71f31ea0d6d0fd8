use ndarray::{ArrayView2, ArrayViewD, Axis};

use crate::decode::{rank4, DecodeError};
use crate::detect::{DepthReading, Detection, NnetPacket};

/// Column layout of a raw detection row.
const COL_VALID: usize = 0;
const COL_CLASS_ID: usize = 1;
const COL_CONFIDENCE: usize = 2;
const COL_X_MIN: usize = 3;
const COL_Y_MIN: usize = 4;
const COL_X_MAX: usize = 5;
const COL_Y_MAX: usize = 6;

/// Minimum number of columns in a raw detection row.
pub const RAW_COLUMNS: usize = 7;

/// `valid_flag` value marking the end of the valid rows.
pub const END_OF_DETECTIONS: f32 = -1.0;

/// How the primary detector's output is read from a packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimaryDecoder {
    /// Structured detection API with per-object depth.
    Structured,
    /// Raw `[1, 1, N, 7]` tensor in output 0.
    Raw,
}

impl PrimaryDecoder {
    /// Resolve the decoder from a network's `output_format` metadata.
    pub fn from_output_format(format: &str) -> Option<Self> {
        match format.trim() {
            "detection" => Some(Self::Structured),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }

    /// Decode detections whose confidence is strictly above `threshold`.
    pub fn decode<P: NnetPacket + ?Sized>(
        &self,
        packet: &P,
        threshold: f32,
    ) -> Result<Vec<Detection>, DecodeError> {
        match self {
            Self::Structured => decode_structured(packet, threshold),
            Self::Raw => {
                let tensor = packet.tensor(0).ok_or(DecodeError::MissingTensor(0))?;
                decode_raw_tensor(tensor, threshold)
            }
        }
    }
}

fn decode_structured<P: NnetPacket + ?Sized>(
    packet: &P,
    threshold: f32,
) -> Result<Vec<Detection>, DecodeError> {
    let count = packet.detection_count();
    let mut detections = Vec::new();
    for index in 0..count {
        let object = packet
            .detected_object(index)
            .ok_or(DecodeError::MissingObject { index, count })?;
        if object.confidence > threshold {
            detections.push(Detection {
                x_min: object.x_min,
                y_min: object.y_min,
                x_max: object.x_max,
                y_max: object.y_max,
                class_id: object.label,
                confidence: object.confidence,
                depth: Some(DepthReading {
                    x: object.depth_x,
                    y: object.depth_y,
                    z: object.depth_z,
                }),
            });
        }
    }
    Ok(detections)
}

/// Decode a raw detection tensor.
///
/// Scanning stops at the first row flagged [`END_OF_DETECTIONS`] or carrying a
/// confidence of exactly zero. Rows not strictly above `threshold` before that
/// point (NaN included) are skipped and scanning continues.
pub fn decode_raw_tensor(
    tensor: ArrayViewD<'_, f32>,
    threshold: f32,
) -> Result<Vec<Detection>, DecodeError> {
    let rows = raw_rows(tensor)?;
    let mut detections = Vec::new();
    for row in rows.rows() {
        let confidence = row[COL_CONFIDENCE];
        if row[COL_VALID] == END_OF_DETECTIONS || confidence == 0.0 {
            break;
        }
        if !(confidence > threshold) {
            continue;
        }
        detections.push(Detection {
            x_min: row[COL_X_MIN],
            y_min: row[COL_Y_MIN],
            x_max: row[COL_X_MAX],
            y_max: row[COL_Y_MAX],
            class_id: row[COL_CLASS_ID] as i32,
            confidence,
            depth: None,
        });
    }
    Ok(detections)
}

fn raw_rows(tensor: ArrayViewD<'_, f32>) -> Result<ArrayView2<'_, f32>, DecodeError> {
    let tensor = rank4(tensor, 0)?;
    let shape = tensor.shape();
    if shape[0] != 1 || shape[1] != 1 || shape[3] < RAW_COLUMNS {
        return Err(DecodeError::Shape {
            index: 0,
            expected: "[1, 1, N, >=7]",
            actual: shape.to_vec(),
        });
    }
    Ok(tensor.index_axis_move(Axis(0), 0).index_axis_move(Axis(0), 0))
}
