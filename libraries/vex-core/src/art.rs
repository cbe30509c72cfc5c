//! Organic-flow point geometry
//!
//! Computes the point cloud of the organic-flow pattern for one animation
//! frame. Nothing here renders; callers draw the points however they like.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Points drawn per frame
pub const ORGANIC_FLOW_POINTS: usize = 10_000;

/// Pattern centre on the reference 400x400 canvas
const CENTER: f64 = 200.0;

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Frame geometry and timing for generated visuals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub duration_secs: u32,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            frame_rate: 30,
            duration_secs: 10,
        }
    }
}

impl ArtConfig {
    /// Frames needed to cover the configured duration
    pub fn total_frames(&self) -> u32 {
        self.duration_secs * self.frame_rate
    }

    /// Time parameter for every frame, in order
    pub fn frame_times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.total_frames()).map(move |frame| frame_time(frame, self.frame_rate))
    }
}

/// Time parameter for `frame` at `fps`
///
/// Returns 0 when `fps` is 0.
pub fn frame_time(frame: u32, fps: u32) -> f64 {
    if fps == 0 {
        return 0.0;
    }
    f64::from(frame) / f64::from(fps) * PI / 10.0
}

/// Organic-flow position for grid coordinate `(x, y)` at time `t`
pub fn organic_flow_point(x: f64, y: f64, t: f64) -> Point {
    let k = 5.0 * (x / 14.0).cos() * (y / 30.0).cos();
    let e = y / 8.0 - 13.0;
    let d = (k * k + e * e) / 59.0 + 4.0;
    let q = 60.0 - 3.0 * (k.atan2(e) * e).sin() + k * (3.0 + 4.0 / d * (d * d - t * 2.0).sin());
    let c = d / 2.0 + e / 99.0 - t / 18.0;

    Point {
        x: q * c.sin() + CENTER,
        y: (q + d * 9.0) * c.cos() + CENTER,
    }
}

/// Every point of one frame, in drawing order
pub fn organic_flow_points(t: f64) -> Vec<Point> {
    (0..ORGANIC_FLOW_POINTS)
        .map(|i| organic_flow_point((i % 200) as f64, (i / 43) as f64, t))
        .collect()
}
