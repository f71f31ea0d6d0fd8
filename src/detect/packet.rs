use ndarray::{ArrayD, ArrayViewD};

/// Object reported by the accelerator's structured detection API.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DetectedObject {
    pub label: i32,
    pub confidence: f32,
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub depth_x: f32,
    pub depth_y: f32,
    pub depth_z: f32,
}

/// Inference packet produced by the accelerator for one frame.
///
/// A packet exposes two views of the same output:
/// - the structured detection API (count + per-index objects), populated when
///   the device runs its own detection post-processing;
/// - the raw output tensors, in the order the network emits them.
///
/// Decoders only read from a packet. They never retain views past the call.
pub trait NnetPacket {
    /// Number of objects reported by the structured detection API.
    fn detection_count(&self) -> usize;

    /// Structured object at `index`, or `None` when the packet does not hold it.
    fn detected_object(&self, index: usize) -> Option<DetectedObject>;

    /// Output tensor at `index`, or `None` when the network has fewer outputs.
    fn tensor(&self, index: usize) -> Option<ArrayViewD<'_, f32>>;
}

/// In-memory packet, used for replayed captures and synthetic input.
#[derive(Clone, Debug, Default)]
pub struct TensorPacket {
    objects: Vec<DetectedObject>,
    tensors: Vec<ArrayD<f32>>,
}

impl TensorPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(mut self, objects: Vec<DetectedObject>) -> Self {
        self.objects = objects;
        self
    }

    /// Append an output tensor. Tensors are indexed in push order.
    pub fn with_tensor(mut self, tensor: ArrayD<f32>) -> Self {
        self.tensors.push(tensor);
        self
    }
}

impl NnetPacket for TensorPacket {
    fn detection_count(&self) -> usize {
        self.objects.len()
    }

    fn detected_object(&self, index: usize) -> Option<DetectedObject> {
        self.objects.get(index).copied()
    }

    fn tensor(&self, index: usize) -> Option<ArrayViewD<'_, f32>> {
        self.tensors.get(index).map(|tensor| tensor.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn tensor_packet_indexes_in_push_order() {
        let first = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 2, 7]));
        let second = ArrayD::<f32>::ones(IxDyn(&[1, 10, 1, 1]));
        let packet = TensorPacket::new().with_tensor(first).with_tensor(second);

        assert_eq!(packet.tensor(0).map(|t| t.shape().to_vec()), Some(vec![1, 1, 2, 7]));
        assert_eq!(packet.tensor(1).map(|t| t.shape().to_vec()), Some(vec![1, 10, 1, 1]));
        assert!(packet.tensor(2).is_none());
        assert_eq!(packet.detection_count(), 0);
    }
}
