use image::Rgb;
use ndarray::{ArrayD, IxDyn};

use nnet_overlay::frame::DrawCommand;
use nnet_overlay::{
    Canvas, Decoded, DecodeError, DetectedObject, EmotionRecognitionHandler, Frame,
    HandlerRegistry, MobilenetSsdHandler, OverlayContext, PrimaryDecoder, RecordingCanvas,
    SecondStageModel, Stage2Payload, TensorPacket,
};

fn labels() -> Vec<String> {
    ["background", "person", "car"]
        .iter()
        .map(|label| label.to_string())
        .collect()
}

fn raw_rows(rows: &[[f32; 7]]) -> ArrayD<f32> {
    let data: Vec<f32> = rows.iter().flat_map(|row| row.iter().copied()).collect();
    ArrayD::from_shape_vec(IxDyn(&[1, 1, rows.len(), 7]), data).unwrap()
}

fn channels(values: &[f32]) -> ArrayD<f32> {
    ArrayD::from_shape_vec(IxDyn(&[1, values.len(), 1, 1]), values.to_vec()).unwrap()
}

fn circles(canvas: &RecordingCanvas) -> usize {
    canvas
        .commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Circle { .. }))
        .count()
}

#[test]
fn two_stage_landmarks_touch_only_first_detection() {
    let packet = TensorPacket::new()
        .with_tensor(raw_rows(&[
            [0.0, 1.0, 0.9, 0.1, 0.1, 0.4, 0.4],
            [0.0, 2.0, 0.8, 0.5, 0.5, 0.9, 0.9],
            [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ]))
        .with_tensor(channels(&[0.2, 0.3, 0.8, 0.3, 0.5, 0.6, 0.3, 0.8, 0.7, 0.8]));
    let ctx = OverlayContext {
        labels: labels(),
        second_stage: SecondStageModel::Landmarks,
        ..OverlayContext::default()
    };
    let mut registry = HandlerRegistry::new();
    registry.register(MobilenetSsdHandler::new(PrimaryDecoder::Raw, ctx));

    let mut canvas = RecordingCanvas::new(1000, 1000);
    let decoded = registry.process(None, &packet, &mut canvas).unwrap();

    let Decoded::Detections(batch) = decoded else {
        panic!("expected detections");
    };
    assert_eq!(batch.stage1.len(), 2);
    assert!(matches!(batch.stage2, Some(Stage2Payload::Landmarks(ref points)) if points.len() == 5));

    // Five landmarks, all inside the first box (100..400).
    assert_eq!(circles(&canvas), 5);
    for command in canvas.commands() {
        if let DrawCommand::Circle { center, .. } = command {
            assert!((100..=400).contains(&center.0), "{center:?}");
            assert!((100..=400).contains(&center.1), "{center:?}");
        }
    }
    assert_eq!(canvas.texts(), vec!["person", "90.00 %", "car", "80.00 %"]);
}

#[test]
fn structured_packet_with_distances() {
    let packet = TensorPacket::new().with_objects(vec![
        DetectedObject {
            label: 2,
            confidence: 0.75,
            x_min: 0.5,
            y_min: 0.5,
            x_max: 0.75,
            y_max: 1.0,
            depth_x: 1.0,
            depth_y: -0.5,
            depth_z: 3.0,
        },
        DetectedObject {
            label: 9,
            confidence: 0.95,
            x_min: 0.0,
            y_min: 0.0,
            x_max: 0.25,
            y_max: 0.25,
            ..DetectedObject::default()
        },
    ]);
    let ctx = OverlayContext {
        labels: labels(),
        calc_dist_to_bb: true,
        ..OverlayContext::default()
    };
    let handler = MobilenetSsdHandler::new(PrimaryDecoder::Structured, ctx);
    let mut registry = HandlerRegistry::new();
    registry.register(handler);

    let mut canvas = RecordingCanvas::new(400, 200);
    registry.process(None, &packet, &mut canvas).unwrap();

    assert_eq!(
        canvas.texts(),
        vec!["car", "75.00 %", "x:  1.000 m", "y: -0.500 m", "z:  3.000 m"]
    );
    let rectangles = canvas
        .commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Rectangle { .. }))
        .count();
    assert_eq!(rectangles, 2);
}

#[test]
fn decode_error_yields_no_overlay() {
    let packet = TensorPacket::new().with_tensor(raw_rows(&[[0.0, 1.0, 0.9, 0.1, 0.1, 0.4, 0.4]]));
    let ctx = OverlayContext {
        labels: labels(),
        second_stage: SecondStageModel::Emotions,
        ..OverlayContext::default()
    };
    let mut registry = HandlerRegistry::new();
    registry.register(MobilenetSsdHandler::new(PrimaryDecoder::Raw, ctx));

    let mut frame = Frame::new(64, 64);
    let err = registry.process(None, &packet, &mut frame).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DecodeError>(),
        Some(&DecodeError::MissingTensor(1))
    );
    assert!(frame.image().pixels().all(|pixel| *pixel == Rgb([0, 0, 0])));
}

#[test]
fn standalone_emotion_pipeline_resizes_frame() {
    let packet = TensorPacket::new().with_tensor(channels(&[0.1, 0.8, 0.05, 0.03, 0.02]));
    let mut registry = HandlerRegistry::new();
    registry.register(EmotionRecognitionHandler::default());

    let mut canvas = RecordingCanvas::new(640, 480);
    registry
        .process(Some("emotion-recognition"), &packet, &mut canvas)
        .unwrap();
    assert_eq!(canvas.texts(), vec!["happy"]);
    assert_eq!((canvas.width(), canvas.height()), (300, 300));
}

#[test]
fn raw_frame_gets_red_rectangle() {
    let packet = TensorPacket::new().with_tensor(raw_rows(&[[0.0, 1.0, 0.9, 0.25, 0.25, 0.75, 0.75]]));
    let ctx = OverlayContext {
        labels: labels(),
        ..OverlayContext::default()
    };
    let mut registry = HandlerRegistry::new();
    registry.register(MobilenetSsdHandler::new(PrimaryDecoder::Raw, ctx));

    let mut frame = Frame::new(100, 100);
    registry.process(None, &packet, &mut frame).unwrap();

    assert_eq!(*frame.image().get_pixel(25, 25), Rgb([255, 0, 0]));
    assert_eq!(*frame.image().get_pixel(75, 50), Rgb([255, 0, 0]));
    assert_eq!(*frame.image().get_pixel(50, 52), Rgb([0, 0, 0]));
}
