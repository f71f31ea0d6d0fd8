use std::time::Instant;

use crate::detect::{
    Detection, DetectionBatch, EmotionScores, Landmark, Stage2Payload, EMOTION_LABELS,
};
use crate::frame::{Canvas, Color};
use crate::geometry::{shrink_box, to_depth, to_pixel, Point};
use crate::render::{
    OverlayContext, BLUE, EMBEDDED_EMOTION_THRESHOLD, EMOTION_RECENCY_WINDOW, GREEN, RED, WHITE,
};

/// Vertical distance between successive text lines under a box corner.
const LINE_SPACING: i32 = 20;
const LANDMARK_RADIUS: i32 = 4;
/// Offset of the emotion label from the box's bottom-right corner.
const EMOTION_LABEL_OFFSET: Point = (-50, -10);

/// Draw every detection above the confidence threshold onto `canvas`.
///
/// Second-stage output is drawn for the first detection of the batch only.
/// Detections whose class id has no label keep their rectangle but get no
/// text.
pub fn render_detections<C: Canvas + ?Sized>(
    batch: &DetectionBatch,
    canvas: &mut C,
    ctx: &OverlayContext,
) {
    let last_detected = Instant::now();
    let (frame_w, frame_h) = (canvas.width(), canvas.height());

    for (idx, detection) in batch.stage1.iter().enumerate() {
        if !(detection.confidence > ctx.confidence_threshold) {
            continue;
        }

        let (pt1, pt2, color) = match &ctx.depth {
            Some(calibration) => {
                let pt1 = to_depth(detection.x_min, detection.y_min, calibration);
                let pt2 = to_depth(detection.x_max, detection.y_max, calibration);
                let (avg_pt1, avg_pt2) = shrink_box(pt1, pt2, ctx.padding_factor);
                canvas.draw_rectangle(avg_pt1, avg_pt2, BLUE);
                (pt1, pt2, WHITE)
            }
            None => (
                to_pixel(detection.x_min, detection.y_min, frame_w, frame_h),
                to_pixel(detection.x_max, detection.y_max, frame_w, frame_h),
                RED,
            ),
        };
        canvas.draw_rectangle(pt1, pt2, color);

        let Some(label) = ctx.label(detection.class_id) else {
            log::warn!(
                "label index {} is out of range ({} labels), not applying text to rectangle",
                detection.class_id,
                ctx.labels.len()
            );
            continue;
        };
        draw_text_block(canvas, detection, label, pt1, color, ctx.calc_dist_to_bb);

        if idx == 0 {
            match &batch.stage2 {
                Some(Stage2Payload::Landmarks(landmarks)) => {
                    draw_landmarks(canvas, landmarks, pt1, pt2)
                }
                Some(Stage2Payload::Emotions(scores)) => {
                    draw_embedded_emotion(canvas, scores, pt2, last_detected)
                }
                None => {}
            }
        }
    }
}

fn draw_text_block<C: Canvas + ?Sized>(
    canvas: &mut C,
    detection: &Detection,
    label: &str,
    (x1, y1): Point,
    color: Color,
    calc_dist_to_bb: bool,
) {
    let mut lines = vec![
        label.to_string(),
        format!("{:.2} %", 100.0 * detection.confidence),
    ];
    if calc_dist_to_bb {
        if let Some(depth) = detection.depth {
            lines.push(format!("x:{:7.3} m", depth.x));
            lines.push(format!("y:{:7.3} m", depth.y));
            lines.push(format!("z:{:7.3} m", depth.z));
        }
    }
    for (line, text) in lines.iter().enumerate() {
        let offset = LINE_SPACING * (line as i32 + 1);
        canvas.put_text((x1, y1.saturating_add(offset)), text, color);
    }
}

fn draw_landmarks<C: Canvas + ?Sized>(
    canvas: &mut C,
    landmarks: &[Landmark],
    (x1, y1): Point,
    (x2, y2): Point,
) {
    let bb_w = x2.saturating_sub(x1) as f32;
    let bb_h = y2.saturating_sub(y1) as f32;
    for landmark in landmarks {
        let x = x1.saturating_add((landmark.x * bb_w) as i32);
        let y = y1.saturating_add((landmark.y * bb_h) as i32);
        canvas.draw_circle((x, y), LANDMARK_RADIUS, BLUE);
    }
}

fn draw_embedded_emotion<C: Canvas + ?Sized>(
    canvas: &mut C,
    scores: &EmotionScores,
    (x2, y2): Point,
    last_detected: Instant,
) {
    let Some(index) = scores.top_above(EMBEDDED_EMOTION_THRESHOLD) else {
        return;
    };
    let Some(emotion) = EMOTION_LABELS.get(index) else {
        return;
    };
    // `last_detected` is taken at the start of the same render call, so this
    // check currently always passes.
    if last_detected.elapsed() < EMOTION_RECENCY_WINDOW {
        let origin = (
            x2.saturating_add(EMOTION_LABEL_OFFSET.0),
            y2.saturating_add(EMOTION_LABEL_OFFSET.1),
        );
        canvas.put_text(origin, emotion, GREEN);
    }
}
