use dash_core::world::FrameInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub frame_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(FrameInput {
                    // A held jump is still one edge: only the first repeated
                    // frame carries the press.
                    jump_pressed: frame.jump_pressed && i == 0,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frame_dt <= 0.0 {
        return Err("Replay validation failed: frame_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::animation::SpriteSheet;
    use dash_core::config::GameConfig;
    use dash_core::round::RoundState;
    use dash_core::world::World;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dash_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn test_world() -> World {
        let config = GameConfig {
            obstacle_count: 1,
            collision_pad: 10.0,
            ..GameConfig::default()
        };
        let player_sheet = SpriteSheet {
            frame_width: 40.0,
            frame_height: 40.0,
            max_frame: 5,
            frame_duration: 1.0 / 12.0,
        };
        let obstacle_sheet = SpriteSheet {
            frame_width: 50.0,
            frame_height: 50.0,
            max_frame: 7,
            frame_duration: 1.0 / 16.0,
        };
        World::new(config, player_sheet, obstacle_sheet)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frame_dt": 0.016666667,
              "frames": [
                { "repeat": 3 },
                { "jump_pressed": true, "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(!expanded[2].jump_pressed);
        assert!(expanded[3].jump_pressed);
        // Held keys repeat as held, not as fresh presses.
        assert!(!expanded[4].jump_pressed);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");

        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frame_dt": 0.016666667,
              "frames": [
                { "repeat": 40 },
                { "jump_pressed": true },
                { "repeat": 90 },
                { "jump_pressed": true },
                { "repeat": 120 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let inputs = replay.expanded_inputs();

        let mut run_a = test_world();
        let mut run_b = test_world();
        for input in &inputs {
            run_a.step(*input, replay.frame_dt);
        }
        for input in &inputs {
            run_b.step(*input, replay.frame_dt);
        }

        let player_a = run_a.player();
        let player_b = run_b.player();
        assert!((player_a.anim.position.y - player_b.anim.position.y).abs() < 0.0001);
        assert!((player_a.velocity_y - player_b.velocity_y).abs() < 0.0001);
        assert_eq!(player_a.anim.frame_index, player_b.anim.frame_index);
        assert!(
            (run_a.obstacles().finish_line() - run_b.obstacles().finish_line()).abs() < 0.0001
        );
        assert_eq!(run_a.round(), run_b.round());
    }

    #[test]
    fn well_timed_jump_replay_wins_the_round() {
        // One obstacle crosses the player's column while the finish line is
        // still inbound; a single jump at the right frame clears it and the
        // round resolves to Won when the line reaches the player.
        let path = temp_file_path("winning");
        fs::write(
            &path,
            r#"{
              "frame_dt": 0.016666667,
              "frames": [
                { "repeat": 60 },
                { "jump_pressed": true },
                { "repeat": 120 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let mut world = test_world();
        for input in replay.expanded_inputs() {
            world.step(input, replay.frame_dt);
        }
        assert_eq!(world.round(), RoundState::Won);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn idle_replay_loses_to_the_first_obstacle() {
        let path = temp_file_path("losing");
        fs::write(
            &path,
            r#"{ "frames": [ { "repeat": 180 } ] }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let mut world = test_world();
        for input in replay.expanded_inputs() {
            world.step(input, replay.frame_dt);
        }
        assert_eq!(world.round(), RoundState::Lost);

        let _ = fs::remove_file(path);
    }
}
