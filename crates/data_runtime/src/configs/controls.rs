//! Camera/movement tuning loaded from data/config/controls.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlsCfg {
    #[serde(default)]
    pub camera: CameraCfg,
    #[serde(default)]
    pub movement: MovementCfg,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CameraCfg {
    pub mouse_x_sensitivity: Option<f32>,
    pub mouse_y_sensitivity: Option<f32>,
    pub min_pitch_deg: Option<f32>,
    pub max_pitch_deg: Option<f32>,
    pub rotation_damp: Option<f32>,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub distance_damp: Option<f32>,
    pub collision_radius: Option<f32>,
    pub collision_buffer: Option<f32>,
    pub target_offset_y: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementCfg {
    pub move_speed: Option<f32>,
    pub sprint_speed: Option<f32>,
    pub acceleration: Option<f32>,
    pub deceleration: Option<f32>,
    pub air_control: Option<f32>,
    pub jump_height: Option<f32>,
    pub gravity: Option<f32>,
    pub fall_multiplier: Option<f32>,
    pub coyote_time: Option<f32>,
    pub ground_check_distance: Option<f32>,
    pub slope_limit_deg: Option<f32>,
    pub turn_speed: Option<f32>,
}

fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

pub fn load_default() -> Result<ControlsCfg> {
    let path = data_root().join("config/controls.toml");
    let mut cfg = if path.is_file() {
        let txt =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<ControlsCfg>(&txt).context("parse controls TOML")?
    } else {
        ControlsCfg::default()
    };
    // Env overrides for quick tuning (optional)
    if let Ok(s) = std::env::var("MOUSE_SENS_X") {
        cfg.camera.mouse_x_sensitivity = s.parse().ok();
    }
    if let Ok(s) = std::env::var("MOUSE_SENS_Y") {
        cfg.camera.mouse_y_sensitivity = s.parse().ok();
    }
    if let Ok(v) = std::env::var("MIN_PITCH_DEG") {
        cfg.camera.min_pitch_deg = v.parse().ok();
    }
    if let Ok(v) = std::env::var("MAX_PITCH_DEG") {
        cfg.camera.max_pitch_deg = v.parse().ok();
    }
    if let Ok(v) = std::env::var("CAM_MIN_DIST") {
        cfg.camera.min_distance = v.parse().ok();
    }
    if let Ok(v) = std::env::var("CAM_MAX_DIST") {
        cfg.camera.max_distance = v.parse().ok();
    }
    if let Ok(v) = std::env::var("MOVE_SPEED") {
        cfg.movement.move_speed = v.parse().ok();
    }
    if let Ok(v) = std::env::var("SPRINT_SPEED") {
        cfg.movement.sprint_speed = v.parse().ok();
    }
    if let Ok(v) = std::env::var("JUMP_HEIGHT") {
        cfg.movement.jump_height = v.parse().ok();
    }
    if let Ok(v) = std::env::var("GRAVITY") {
        cfg.movement.gravity = v.parse().ok();
    }
    if let Ok(v) = std::env::var("COYOTE_TIME") {
        cfg.movement.coyote_time = v.parse().ok();
    }
    Ok(cfg)
}
