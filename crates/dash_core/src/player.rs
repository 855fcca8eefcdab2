//! Player vertical motion: gravity, jump impulses, and ground contact.
//!
//! The body is a two-state machine over {grounded, airborne}, re-derived from
//! position every frame *before* gravity is applied. The per-frame order is
//! fixed: ground test, then gravity or velocity reset, then the jump trigger,
//! then position integration with the velocity computed this frame. Jump
//! requests while airborne are silently dropped -- no double jump, no queueing.
//!
//! There is no clamp back to the ground line: the ground test uses `>=`, so a
//! landing frame can leave the body resting slightly past it. That overshoot
//! is part of the observed behavior and is kept.

use glam::Vec2;

use crate::animation::{AnimationState, SpriteSheet};
use crate::config::GameConfig;

/// True when a body whose top edge is at `pos_y` stands on (or past) the
/// ground line. Pure: independent of velocity and time.
pub fn is_on_ground(pos_y: f32, rect_height: f32, ground_level: f32) -> bool {
    pos_y >= ground_level - rect_height
}

/// The player: one animated sprite plus vertical velocity and air state.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub anim: AnimationState,
    pub velocity_y: f32,
    pub airborne: bool,
}

impl Player {
    /// Spawn centered horizontally, standing on the ground line.
    pub fn new(sheet: &SpriteSheet, config: &GameConfig) -> Self {
        let position = Vec2::new(
            config.window_width / 2.0 - sheet.frame_width / 2.0,
            config.ground_level() - sheet.frame_height,
        );
        Self {
            anim: AnimationState::new(sheet, position),
            velocity_y: 0.0,
            airborne: false,
        }
    }

    pub fn step(&mut self, jump_pressed: bool, dt: f32, config: &GameConfig) {
        if is_on_ground(
            self.anim.position.y,
            self.anim.source_rect.height,
            config.ground_level(),
        ) {
            self.velocity_y = 0.0;
            self.airborne = false;
        } else {
            self.velocity_y += config.gravity * dt;
            self.airborne = true;
        }

        // Jump is edge-triggered and only legal from the ground.
        if jump_pressed && !self.airborne {
            self.velocity_y += config.jump_impulse;
        }

        self.anim.position.y += self.velocity_y * dt;
    }
}
