//! Shape Entities
//!
//! A shape is spawned with a random kind, color, position and heading, then
//! bounces around the canvas until its round ends. Kind and color never
//! change after creation; they exist only to be compared against the
//! wanted target.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{
    Fixed, CANVAS_WIDTH, CANVAS_HEIGHT, SPEED_UNIT, TICK_DURATION,
    fixed_mul, fixed_clamp,
};
use crate::core::hash::StateHasher;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::target::WantedTarget;

// =============================================================================
// KIND AND COLOR
// =============================================================================

/// Geometric kind of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// Filled circle
    Circle = 1,
    /// Filled axis-aligned square
    Square = 2,
}

impl ShapeKind {
    /// All kinds in draw order.
    pub const ALL: [ShapeKind; 2] = [ShapeKind::Circle, ShapeKind::Square];

    /// Uniform draw.
    pub fn random(rng: &mut DeterministicRng) -> Self {
        Self::ALL[rng.next_int(Self::ALL.len() as u32) as usize]
    }
}

/// Fill color of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeColor {
    /// Red
    Red = 0,
    /// Green
    Green = 1,
    /// Blue
    Blue = 2,
}

impl ShapeColor {
    /// All colors.
    pub const ALL: [ShapeColor; 3] = [ShapeColor::Red, ShapeColor::Green, ShapeColor::Blue];

    /// Uniform draw.
    pub fn random(rng: &mut DeterministicRng) -> Self {
        Self::ALL[rng.next_int(Self::ALL.len() as u32) as usize]
    }
}

// =============================================================================
// CANVAS
// =============================================================================

/// Drawable area, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasBounds {
    /// Width in fixed-point pixels
    pub width: Fixed,
    /// Height in fixed-point pixels
    pub height: Fixed,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl CanvasBounds {
    /// Create bounds of the given size.
    pub const fn new(width: Fixed, height: Fixed) -> Self {
        Self { width, height }
    }

    /// Whether a shape of `size` centered at `pos` lies fully on canvas.
    pub fn contains(&self, pos: FixedVec2, size: Fixed) -> bool {
        let half = size >> 1;
        pos.x >= half
            && pos.x <= self.width - half
            && pos.y >= half
            && pos.y <= self.height - half
    }
}

// =============================================================================
// SHAPE ENTITY
// =============================================================================

/// A single moving shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeEntity {
    id: u32,
    kind: ShapeKind,
    color: ShapeColor,
    position: FixedVec2,
    velocity: FixedVec2,
    speed_factor: u32,
    size: Fixed,
}

impl ShapeEntity {
    /// Create a shape with explicit motion state.
    pub fn new(
        id: u32,
        kind: ShapeKind,
        color: ShapeColor,
        position: FixedVec2,
        velocity: FixedVec2,
        speed_factor: u32,
        size: Fixed,
    ) -> Self {
        Self {
            id,
            kind,
            color,
            position,
            velocity,
            speed_factor,
            size,
        }
    }

    /// Spawn a shape at a random on-canvas position with a random heading.
    ///
    /// Speed is `speed_factor * SPEED_UNIT` px/s.
    pub fn spawn(
        id: u32,
        kind: ShapeKind,
        color: ShapeColor,
        speed_factor: u32,
        size: Fixed,
        bounds: &CanvasBounds,
        rng: &mut DeterministicRng,
    ) -> Self {
        let half = size >> 1;
        let x = rng.next_fixed_range(half, bounds.width - half);
        let y = rng.next_fixed_range(half, bounds.height - half);
        let heading = rng.random_direction();
        let speed = SPEED_UNIT.saturating_mul(speed_factor as i32);

        Self::new(
            id,
            kind,
            color,
            FixedVec2::new(x, y),
            heading.scale(speed),
            speed_factor,
            size,
        )
    }

    /// Spawn index within the owning round.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Geometric kind.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Fill color.
    pub fn color(&self) -> ShapeColor {
        self.color
    }

    /// Center position.
    pub fn position(&self) -> FixedVec2 {
        self.position
    }

    /// Velocity in px/s.
    pub fn velocity(&self) -> FixedVec2 {
        self.velocity
    }

    /// Speed factor the shape was spawned with.
    pub fn speed_factor(&self) -> u32 {
        self.speed_factor
    }

    /// Edge length (square) or diameter (circle).
    pub fn size(&self) -> Fixed {
        self.size
    }

    /// Whether this shape is an instance of the wanted target.
    #[inline]
    pub fn matches(&self, target: &WantedTarget) -> bool {
        target.matches(self.kind, self.color)
    }

    /// Integrate one tick of motion and bounce off the canvas edges.
    pub fn update(&mut self, bounds: &CanvasBounds) {
        let dx = fixed_mul(self.velocity.x, TICK_DURATION);
        let dy = fixed_mul(self.velocity.y, TICK_DURATION);

        self.position.x = self.position.x.wrapping_add(dx);
        self.position.y = self.position.y.wrapping_add(dy);

        let half = self.size >> 1;
        let (min_x, max_x) = (half, bounds.width - half);
        let (min_y, max_y) = (half, bounds.height - half);

        if self.position.x < min_x {
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > max_x {
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.position.y < min_y {
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > max_y {
            self.velocity.y = -self.velocity.y.abs();
        }

        self.position.x = fixed_clamp(self.position.x, min_x, max_x);
        self.position.y = fixed_clamp(self.position.y, min_y, max_y);
    }

    /// Hash this shape's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_u8(self.kind as u8);
        hasher.update_u8(self.color as u8);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{from_int, SHAPE_SIZE};

    fn shape_at(x: i32, y: i32, vx: i32, vy: i32) -> ShapeEntity {
        ShapeEntity::new(
            0,
            ShapeKind::Circle,
            ShapeColor::Red,
            FixedVec2::new(from_int(x), from_int(y)),
            FixedVec2::new(from_int(vx), from_int(vy)),
            7,
            SHAPE_SIZE,
        )
    }

    #[test]
    fn test_random_draws_cover_every_tag() {
        let mut rng = DeterministicRng::new(8);
        let kinds: Vec<_> = (0..100).map(|_| ShapeKind::random(&mut rng)).collect();
        let colors: Vec<_> = (0..100).map(|_| ShapeColor::random(&mut rng)).collect();
        for kind in ShapeKind::ALL {
            assert!(kinds.contains(&kind));
        }
        for color in ShapeColor::ALL {
            assert!(colors.contains(&color));
        }
    }

    #[test]
    fn test_spawn_is_on_canvas() {
        let bounds = CanvasBounds::default();
        let mut rng = DeterministicRng::new(99);
        for id in 0..200 {
            let shape = ShapeEntity::spawn(
                id,
                ShapeKind::Square,
                ShapeColor::Green,
                7,
                SHAPE_SIZE,
                &bounds,
                &mut rng,
            );
            assert!(bounds.contains(shape.position(), shape.size()));
            assert_ne!(shape.velocity(), FixedVec2::ZERO);
        }
    }

    #[test]
    fn test_update_moves_shape() {
        let bounds = CanvasBounds::default();
        let mut shape = shape_at(250, 250, 120, 0);
        shape.update(&bounds);
        assert!(shape.position().x > from_int(251));
        assert_eq!(shape.position().y, from_int(250));
    }

    #[test]
    fn test_bounce_off_right_edge() {
        let bounds = CanvasBounds::default();
        let mut shape = shape_at(484, 100, 300, 0);
        shape.update(&bounds);
        assert_eq!(shape.position().x, bounds.width - (SHAPE_SIZE >> 1));
        assert!(shape.velocity().x < 0);
    }

    #[test]
    fn test_bounce_off_top_edge() {
        let bounds = CanvasBounds::default();
        let mut shape = shape_at(100, 16, 0, -300);
        shape.update(&bounds);
        assert_eq!(shape.position().y, SHAPE_SIZE >> 1);
        assert!(shape.velocity().y > 0);
    }

    #[test]
    fn test_shapes_stay_on_canvas_over_time() {
        let bounds = CanvasBounds::default();
        let mut rng = DeterministicRng::new(4242);
        let mut shapes: Vec<_> = (0..20)
            .map(|id| {
                ShapeEntity::spawn(
                    id,
                    ShapeKind::Circle,
                    ShapeColor::Blue,
                    7,
                    SHAPE_SIZE,
                    &bounds,
                    &mut rng,
                )
            })
            .collect();

        for _ in 0..3600 {
            for shape in &mut shapes {
                shape.update(&bounds);
                assert!(bounds.contains(shape.position(), shape.size()));
            }
        }
    }

    #[test]
    fn test_matches_target() {
        let shape = shape_at(10, 10, 0, 0);
        assert!(shape.matches(&WantedTarget::new(ShapeKind::Circle, ShapeColor::Red)));
        assert!(!shape.matches(&WantedTarget::new(ShapeKind::Square, ShapeColor::Red)));
        assert!(!shape.matches(&WantedTarget::new(ShapeKind::Circle, ShapeColor::Blue)));
    }
}
