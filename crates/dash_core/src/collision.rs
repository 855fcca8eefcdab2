//! Axis-aligned bounding-box collision between the player and the obstacles.
//!
//! Hit detection is deliberately more forgiving than the visible sprites:
//! each obstacle's box is inset by a fixed padding on all four sides before
//! testing, while the player's box is used at full size. Overlap is strict on
//! both axes, so boxes that merely share an edge do not collide.
//!
//! The detector is stateless; round stickiness (a hit stays a loss for the
//! rest of the round) lives in the world state machine, not here.

use crate::animation::AnimationState;

/// World-space rectangle: top-left corner plus size, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    /// Strict overlap on both axes.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Shrink by `pad` on all four sides.
    pub fn inset(&self, pad: f32) -> Aabb {
        Aabb {
            x: self.x + pad,
            y: self.y + pad,
            width: self.width - 2.0 * pad,
            height: self.height - 2.0 * pad,
        }
    }
}

/// The full-size world box of an animated sprite at its current position.
pub fn sprite_aabb(state: &AnimationState) -> Aabb {
    Aabb {
        x: state.position.x,
        y: state.position.y,
        width: state.source_rect.width,
        height: state.source_rect.height,
    }
}

/// Test the player's box against every obstacle's padded box.
pub fn any_collision(player: &Aabb, obstacles: &[AnimationState], pad: f32) -> bool {
    obstacles
        .iter()
        .any(|obstacle| sprite_aabb(obstacle).inset(pad).intersects(player))
}
