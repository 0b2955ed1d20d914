//! Render Surface Contract
//!
//! The engine never draws. Each frame it clears the surface and hands over
//! one sprite per shape; the surface decides how to put pixels on screen.

use serde::{Serialize, Deserialize};

use crate::core::fixed::to_float;
use crate::game::shape::{ShapeEntity, ShapeKind, ShapeColor, CanvasBounds};

/// Render-ready view of one shape (float pixels, center-anchored).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeSprite {
    /// Shape id within the round
    pub id: u32,
    /// Geometric kind
    pub kind: ShapeKind,
    /// Fill color
    pub color: ShapeColor,
    /// Center x
    pub x: f32,
    /// Center y
    pub y: f32,
    /// Edge length or diameter
    pub size: f32,
}

impl From<&ShapeEntity> for ShapeSprite {
    fn from(shape: &ShapeEntity) -> Self {
        let (x, y) = shape.position().to_floats();
        Self {
            id: shape.id(),
            kind: shape.kind(),
            color: shape.color(),
            x,
            y,
            size: to_float(shape.size()),
        }
    }
}

/// Something that can show the current shape set.
pub trait RenderSurface {
    /// Wipe the whole canvas.
    fn clear(&mut self, width: f32, height: f32);

    /// Draw a single shape.
    fn draw_shape(&mut self, sprite: &ShapeSprite);
}

/// Render one frame: clear, then draw every shape in spawn order.
pub fn render_frame<R: RenderSurface + ?Sized>(
    surface: &mut R,
    bounds: &CanvasBounds,
    shapes: &[ShapeEntity],
) {
    surface.clear(to_float(bounds.width), to_float(bounds.height));
    for shape in shapes {
        surface.draw_shape(&ShapeSprite::from(shape));
    }
}

/// A recorded draw call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Canvas cleared
    Clear {
        width: f32,
        height: f32,
    },
    /// Shape drawn
    Shape(ShapeSprite),
}

/// Headless surface that keeps the last frame's draw calls.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    frames: u64,
    current: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames begun so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls of the most recent frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.current
    }

    /// Shapes drawn in the most recent frame.
    pub fn drawn_shapes(&self) -> usize {
        self.current
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Shape(_)))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.frames += 1;
        self.current.clear();
        self.current.push(DrawCommand::Clear { width, height });
    }

    fn draw_shape(&mut self, sprite: &ShapeSprite) {
        self.current.push(DrawCommand::Shape(*sprite));
    }
}
