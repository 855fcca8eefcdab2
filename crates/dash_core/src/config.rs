//! Immutable gameplay configuration and the optional JSON tuning file.
//!
//! All constants the simulation depends on live in one `GameConfig` value
//! that is passed into the world at construction; nothing reads process-wide
//! state, so headless tests can run the full simulation with hand-built
//! configs. The defaults are the shipped tuning.
//!
//! A tuning file can override any subset of the defaults. The JSON format
//! carries a `version` and a `tuning_id` like every other content file and
//! is validated strictly on load; a file that fails validation is rejected
//! whole rather than partially applied.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Every tunable the simulation and the cosmetic layers consume.
///
/// Sign conventions: y grows downward, so `gravity` is positive and
/// `jump_impulse` negative; obstacles travel left, so `obstacle_velocity`
/// is negative.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub obstacle_velocity: f32,
    pub obstacle_count: usize,
    pub obstacle_spacing: f32,
    pub collision_pad: f32,
    pub player_columns: u32,
    pub player_rows: u32,
    pub player_frame_duration: f32,
    pub obstacle_columns: u32,
    pub obstacle_rows: u32,
    pub obstacle_max_frame: u32,
    pub obstacle_frame_duration: f32,
    pub scroll_speeds: [f32; 3],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 512.0,
            window_height: 380.0,
            gravity: 1000.0,
            jump_impulse: -600.0,
            obstacle_velocity: -200.0,
            obstacle_count: 2,
            obstacle_spacing: 300.0,
            collision_pad: 50.0,
            player_columns: 6,
            player_rows: 1,
            player_frame_duration: 1.0 / 12.0,
            obstacle_columns: 8,
            obstacle_rows: 8,
            obstacle_max_frame: 7,
            obstacle_frame_duration: 1.0 / 16.0,
            scroll_speeds: [20.0, 40.0, 80.0],
        }
    }
}

impl GameConfig {
    /// The y coordinate of the playable ground line.
    pub fn ground_level(&self) -> f32 {
        self.window_height
    }

    /// Last frame index of the player's run cycle.
    pub fn player_max_frame(&self) -> u32 {
        self.player_columns - 1
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct TuningFileJson {
    version: String,
    tuning_id: String,
    #[serde(default)]
    gravity: Option<f32>,
    #[serde(default)]
    jump_impulse: Option<f32>,
    #[serde(default)]
    obstacle_velocity: Option<f32>,
    #[serde(default)]
    obstacle_count: Option<usize>,
    #[serde(default)]
    obstacle_spacing: Option<f32>,
    #[serde(default)]
    collision_pad: Option<f32>,
    #[serde(default)]
    player_frame_duration: Option<f32>,
    #[serde(default)]
    obstacle_frame_duration: Option<f32>,
    #[serde(default)]
    scroll_speeds: Option<[f32; 3]>,
}

/// Load a tuning file and apply it on top of the default config.
pub fn load_tuning_file(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read tuning file {}: {e}", path.display()))?;
    let json: TuningFileJson = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse tuning file {}: {e}", path.display()))?;
    validate_tuning_json(&json)?;

    let mut config = GameConfig::default();
    if let Some(v) = json.gravity {
        config.gravity = v;
    }
    if let Some(v) = json.jump_impulse {
        config.jump_impulse = v;
    }
    if let Some(v) = json.obstacle_velocity {
        config.obstacle_velocity = v;
    }
    if let Some(v) = json.obstacle_count {
        config.obstacle_count = v;
    }
    if let Some(v) = json.obstacle_spacing {
        config.obstacle_spacing = v;
    }
    if let Some(v) = json.collision_pad {
        config.collision_pad = v;
    }
    if let Some(v) = json.player_frame_duration {
        config.player_frame_duration = v;
    }
    if let Some(v) = json.obstacle_frame_duration {
        config.obstacle_frame_duration = v;
    }
    if let Some(v) = json.scroll_speeds {
        config.scroll_speeds = v;
    }

    log::info!("Tuning loaded: {} ({})", json.tuning_id, json.version);
    Ok(config)
}

fn validate_tuning_json(json: &TuningFileJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Tuning validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.tuning_id.is_empty() {
        return Err("Tuning validation failed: tuning_id is empty".to_string());
    }
    if let Some(g) = json.gravity {
        if g <= 0.0 {
            return Err("Tuning validation failed: gravity must be > 0".to_string());
        }
    }
    if let Some(j) = json.jump_impulse {
        if j >= 0.0 {
            return Err("Tuning validation failed: jump_impulse must be < 0".to_string());
        }
    }
    if let Some(v) = json.obstacle_velocity {
        if v >= 0.0 {
            return Err("Tuning validation failed: obstacle_velocity must be < 0".to_string());
        }
    }
    if let Some(n) = json.obstacle_count {
        if n == 0 {
            return Err("Tuning validation failed: obstacle_count must be >= 1".to_string());
        }
    }
    if let Some(s) = json.obstacle_spacing {
        if s < 0.0 {
            return Err("Tuning validation failed: obstacle_spacing must be >= 0".to_string());
        }
    }
    if let Some(p) = json.collision_pad {
        if p < 0.0 {
            return Err("Tuning validation failed: collision_pad must be >= 0".to_string());
        }
    }
    for (name, duration) in [
        ("player_frame_duration", json.player_frame_duration),
        ("obstacle_frame_duration", json.obstacle_frame_duration),
    ] {
        if let Some(d) = duration {
            if d <= 0.0 {
                return Err(format!(
                    "Tuning validation failed: {name} must be > 0"
                ));
            }
        }
    }
    if let Some(speeds) = json.scroll_speeds {
        if speeds.iter().any(|s| *s < 0.0) {
            return Err("Tuning validation failed: scroll_speeds must be >= 0".to_string());
        }
    }
    Ok(())
}
