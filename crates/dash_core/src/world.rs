//! Per-frame simulation orchestration and the round state machine.
//!
//! `World::step` runs one frame of simulation in a fixed order:
//!
//!   1. player physics (ground test, gravity/jump, integrate)
//!   2. collision test -- the player's freshly integrated position against the
//!      obstacles where the *previous* frame left them
//!   3. obstacle motion + animation + finish line, all by the same delta
//!   4. player animation, only while grounded
//!   5. win test -- player past the finish line, if the round is still live
//!
//! The order is load-bearing: collision must see post-movement player
//! coordinates but pre-movement obstacle coordinates, and the win test must
//! run after the finish line advanced. A collision and a finish-line crossing
//! on the same frame resolve to Lost.
//!
//! Once the round is terminal the step becomes a no-op; the loop keeps
//! running (and rendering the end banner) but nothing moves anymore.

use crate::animation::SpriteSheet;
use crate::collision::{any_collision, sprite_aabb};
use crate::config::GameConfig;
use crate::obstacle::ObstacleField;
use crate::player::Player;
use crate::round::RoundState;

/// The per-frame signals the simulation consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// True only on the frame the jump key went down.
    pub jump_pressed: bool,
}

pub struct World {
    config: GameConfig,
    player: Player,
    obstacles: ObstacleField,
    round: RoundState,
}

impl World {
    pub fn new(config: GameConfig, player_sheet: SpriteSheet, obstacle_sheet: SpriteSheet) -> Self {
        Self {
            player: Player::new(&player_sheet, &config),
            obstacles: ObstacleField::new(&obstacle_sheet, &config),
            round: RoundState::Playing,
            config,
        }
    }

    pub fn step(&mut self, input: FrameInput, dt: f32) {
        if self.round.is_terminal() {
            return;
        }

        self.player.step(input.jump_pressed, dt, &self.config);

        if any_collision(
            &sprite_aabb(&self.player.anim),
            self.obstacles.obstacles(),
            self.config.collision_pad,
        ) {
            self.round = RoundState::Lost;
            log::info!("Round lost: obstacle collision");
        }

        self.obstacles.tick(dt);

        if !self.player.airborne {
            self.player
                .anim
                .advance(dt, self.config.player_max_frame());
        }

        if self.round == RoundState::Playing
            && self.player.anim.position.x >= self.obstacles.finish_line()
        {
            self.round = RoundState::Won;
            log::info!("Round won: finish line crossed");
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sheet(frame: f32, max_frame: u32, duration: f32) -> SpriteSheet {
        SpriteSheet {
            frame_width: frame,
            frame_height: frame,
            max_frame,
            frame_duration: duration,
        }
    }

    fn player_sheet() -> SpriteSheet {
        sheet(40.0, 5, 1.0 / 12.0)
    }

    fn obstacle_sheet() -> SpriteSheet {
        sheet(50.0, 7, 1.0 / 16.0)
    }

    fn test_config() -> GameConfig {
        GameConfig {
            obstacle_count: 1,
            collision_pad: 10.0,
            ..GameConfig::default()
        }
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn collision_uses_previous_frame_obstacle_positions() {
        // One obstacle spawning at x=266 (the window edge). Its padded box
        // first overlaps the grounded player's box at x < 143; stepping from
        // the spawn, the pre-tick position crosses that line on step 38. If
        // collision ran against post-tick positions instead, step 37 would
        // already lose.
        let config = GameConfig {
            window_width: 266.0,
            ..test_config()
        };
        let mut world = World::new(config, player_sheet(), obstacle_sheet());

        for _ in 0..37 {
            world.step(FrameInput::default(), DT);
        }
        assert_eq!(world.round(), RoundState::Playing);

        world.step(FrameInput::default(), DT);
        assert_eq!(world.round(), RoundState::Lost);
    }

    #[test]
    fn lost_is_sticky_and_freezes_the_simulation() {
        let config = GameConfig {
            window_width: 266.0,
            ..test_config()
        };
        let mut world = World::new(config, player_sheet(), obstacle_sheet());

        while world.round() == RoundState::Playing {
            world.step(FrameInput::default(), DT);
        }
        assert_eq!(world.round(), RoundState::Lost);

        let obstacle_x = world.obstacles().obstacles()[0].position.x;
        let finish = world.obstacles().finish_line();
        let player_pos = world.player().anim.position;

        for _ in 0..120 {
            world.step(FrameInput { jump_pressed: true }, DT);
        }

        assert_eq!(world.round(), RoundState::Lost);
        assert_eq!(world.obstacles().obstacles()[0].position.x, obstacle_x);
        assert_eq!(world.obstacles().finish_line(), finish);
        assert_eq!(world.player().anim.position, player_pos);
    }

    #[test]
    fn jumping_over_the_obstacle_wins_on_the_crossing_tick() {
        // Default 512-wide window, one obstacle. The finish line starts at
        // the spawn (512) and reaches the player's x (236) on step 83. A
        // single jump at step 61 keeps the player airborne through the whole
        // stretch where the obstacle's padded box passes underneath.
        let mut world = World::new(test_config(), player_sheet(), obstacle_sheet());

        for step in 1..=82 {
            let jump = step == 61;
            world.step(FrameInput { jump_pressed: jump }, DT);
            assert_eq!(world.round(), RoundState::Playing, "step {step}");
        }

        world.step(FrameInput::default(), DT);
        assert_eq!(world.round(), RoundState::Won);
    }

    #[test]
    fn won_is_sticky() {
        let mut world = World::new(test_config(), player_sheet(), obstacle_sheet());
        for step in 1..=83 {
            world.step(
                FrameInput {
                    jump_pressed: step == 61,
                },
                DT,
            );
        }
        assert_eq!(world.round(), RoundState::Won);

        let finish = world.obstacles().finish_line();
        for _ in 0..120 {
            world.step(FrameInput::default(), DT);
        }
        assert_eq!(world.round(), RoundState::Won);
        assert_eq!(world.obstacles().finish_line(), finish);
    }

    #[test]
    fn zero_dt_step_changes_nothing() {
        let mut world = World::new(test_config(), player_sheet(), obstacle_sheet());
        for _ in 0..10 {
            world.step(FrameInput::default(), DT);
        }

        let player_pos = world.player().anim.position;
        let player_frame = world.player().anim.frame_index;
        let obstacle_x = world.obstacles().obstacles()[0].position.x;
        let obstacle_frame = world.obstacles().obstacles()[0].frame_index;
        let finish = world.obstacles().finish_line();

        world.step(FrameInput::default(), 0.0);

        assert_eq!(world.player().anim.position, player_pos);
        assert_eq!(world.player().anim.frame_index, player_frame);
        assert_eq!(world.obstacles().obstacles()[0].position.x, obstacle_x);
        assert_eq!(world.obstacles().obstacles()[0].frame_index, obstacle_frame);
        assert_eq!(world.obstacles().finish_line(), finish);
        assert_eq!(world.round(), RoundState::Playing);
    }

    #[test]
    fn player_animation_is_suppressed_while_airborne() {
        let mut world = World::new(test_config(), player_sheet(), obstacle_sheet());
        // Long enough on the ground to advance the run cycle.
        for _ in 0..10 {
            world.step(FrameInput::default(), DT);
        }
        assert!(world.player().anim.frame_index > 0);

        world.step(FrameInput { jump_pressed: true }, DT);
        let frame_at_takeoff = world.player().anim.frame_index;
        let elapsed_at_takeoff = world.player().anim.frame_elapsed;

        for _ in 0..20 {
            world.step(FrameInput::default(), DT);
        }
        assert!(world.player().airborne);
        assert_eq!(world.player().anim.frame_index, frame_at_takeoff);
        assert_eq!(world.player().anim.frame_elapsed, elapsed_at_takeoff);
    }

    #[test]
    fn spawn_layout_matches_config() {
        let world = World::new(test_config(), player_sheet(), obstacle_sheet());
        assert_eq!(
            world.player().anim.position,
            Vec2::new(512.0 / 2.0 - 20.0, 380.0 - 40.0)
        );
        assert_eq!(world.obstacles().obstacles()[0].position.x, 512.0);
        assert_eq!(world.obstacles().finish_line(), 512.0);
    }
}
