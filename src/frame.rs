//! Per-frame output handed from the simulation to the presentation layer.

use crate::color::{Hsb, Rgb};
use crate::score::ScoreState;
use glam::Vec2;

/// A filled dot in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub position: Vec2,
    pub diameter: f32,
    pub color: Hsb,
    pub alpha: u8,
}

/// How the presentation layer should clear the canvas before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub color: Rgb,
    /// 255 clears completely; anything lower leaves motion trails.
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Background,
    pub drawables: Vec<Drawable>,
    pub score: ScoreState,
    /// Whether the host should keep requesting frames.
    pub looping: bool,
}

impl Frame {
    pub fn is_active(&self) -> bool {
        !self.drawables.is_empty()
    }
}
