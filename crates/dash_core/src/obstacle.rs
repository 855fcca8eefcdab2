//! The obstacle field: a fixed arena of animated sprites drifting left, plus
//! the finish line that drifts with them.
//!
//! Obstacles are spawned once per round at staggered offsets off the right
//! window edge and are never recycled; past the left edge they simply keep
//! going. The finish line starts at the last obstacle's spawn position and is
//! advanced as its own scalar with the identical per-frame delta the
//! obstacles receive, so it stays in lockstep with their displacement without
//! ever reading the obstacle array.

use glam::Vec2;

use crate::animation::{AnimationState, SpriteSheet};
use crate::config::GameConfig;

pub struct ObstacleField {
    obstacles: Vec<AnimationState>,
    finish_line: f32,
    velocity: f32,
    max_frame: u32,
}

impl ObstacleField {
    pub fn new(sheet: &SpriteSheet, config: &GameConfig) -> Self {
        let obstacles: Vec<AnimationState> = (0..config.obstacle_count)
            .map(|i| {
                let position = Vec2::new(
                    config.window_width + config.obstacle_spacing * i as f32,
                    config.ground_level() - sheet.frame_height,
                );
                AnimationState::new(sheet, position)
            })
            .collect();

        // The last spawn position, not a reference into the arena.
        let finish_line = obstacles
            .last()
            .map(|o| o.position.x)
            .unwrap_or(config.window_width);

        Self {
            obstacles,
            finish_line,
            velocity: config.obstacle_velocity,
            max_frame: config.obstacle_max_frame,
        }
    }

    /// Advance every obstacle's position and animation, and the finish line,
    /// by the same delta.
    pub fn tick(&mut self, dt: f32) {
        let delta = self.velocity * dt;
        for obstacle in &mut self.obstacles {
            obstacle.position.x += delta;
            obstacle.advance(dt, self.max_frame);
        }
        self.finish_line += delta;
    }

    pub fn obstacles(&self) -> &[AnimationState] {
        &self.obstacles
    }

    pub fn finish_line(&self) -> f32 {
        self.finish_line
    }
}
