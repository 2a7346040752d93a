//! # World objects

use serde::{Deserialize, Serialize};

/// An axis aligned rectangular obstacle.
///
/// Obstacles are given in view coordinates (the frame the host renders the
/// vehicle path in), which are world coordinates multiplied by the view scale.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleRect {
    /// Left edge
    pub x: f64,

    /// Top edge
    pub y: f64,

    /// Extent along x
    pub width: f64,

    /// Extent along y
    pub height: f64,
}

impl ObstacleRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The four corners in clockwise order (in a y-down frame), starting at the
    /// top left.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        [
            [self.x, self.y],
            [self.x + self.width, self.y],
            [self.x + self.width, self.y + self.height],
            [self.x, self.y + self.height],
        ]
    }
}
