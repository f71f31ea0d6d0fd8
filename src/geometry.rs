//! Coordinate mapping from normalized detector space.
//!
//! All conversions truncate toward zero, matching integer pixel addressing.

use serde::Deserialize;

/// Integer pixel position `(x, y)`.
pub type Point = (i32, i32);

/// Placement of the detector's field of view inside the depth map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct DepthCalibration {
    pub off_x: f32,
    pub off_y: f32,
    pub max_w: f32,
    pub max_h: f32,
}

/// Map a normalized coordinate onto a frame of `width` x `height` pixels.
pub fn to_pixel(x: f32, y: f32, width: u32, height: u32) -> Point {
    ((x * width as f32) as i32, (y * height as f32) as i32)
}

/// Map a normalized coordinate into depth-sensor space.
pub fn to_depth(x: f32, y: f32, calibration: &DepthCalibration) -> Point {
    (
        (calibration.off_x + x * calibration.max_w) as i32,
        (calibration.off_y + y * calibration.max_h) as i32,
    )
}

/// Shrink a box toward its center, keeping `padding_factor` of each extent.
///
/// Each side moves inward by `(1 - padding_factor) / 2` of the extent, so the
/// depth sampling region avoids background pixels at the box edges.
pub fn shrink_box(pt1: Point, pt2: Point, padding_factor: f32) -> (Point, Point) {
    let factor = 1.0 - padding_factor;
    let x_shift = (pt2.0.saturating_sub(pt1.0) as f32 * factor / 2.0) as i32;
    let y_shift = (pt2.1.saturating_sub(pt1.1) as f32 * factor / 2.0) as i32;
    (
        (pt1.0.saturating_add(x_shift), pt1.1.saturating_add(y_shift)),
        (pt2.0.saturating_sub(x_shift), pt2.1.saturating_sub(y_shift)),
    )
}
