//! Engine and player tuning, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! wants to change.

use crate::components::collider::Aabb;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Global physics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Pixels/s². Positive Y is down.
    pub gravity: Vec2,
    /// Per-component velocity limit in pixels/s.
    pub max_speed: f32,
    /// Optional world rectangle as `[x, y, width, height]`.
    pub world_bounds: Option<[f32; 4]>,
    /// How far above a slope surface a descending body still snaps onto it.
    pub slope_snap_tolerance: f32,
    /// How far above a ladder's top edge the bottom may be for `ladder_top`.
    pub ladder_top_tolerance: f32,
    /// Tallest ledge a grounded body walks onto without being blocked.
    pub max_step_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 980.0),
            max_speed: 500.0,
            world_bounds: None,
            slope_snap_tolerance: 4.0,
            ladder_top_tolerance: 2.0,
            max_step_height: 8.0,
        }
    }
}

impl PhysicsConfig {
    pub fn world_bounds_aabb(&self) -> Option<Aabb> {
        self.world_bounds
            .map(|[x, y, w, h]| Aabb::new(Vec2::new(x, y), Vec2::new(w, h)))
    }
}

/// Movement tuning for the player state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal force applied per movement input.
    pub move_force: f32,
    /// Horizontal speed cap while walking or airborne.
    pub max_speed: f32,
    /// Idle damping, multiplied into horizontal velocity each update.
    pub friction_factor: f32,
    /// Upward speed given on entering Jump.
    pub jump_velocity: f32,
    pub climb_speed: f32,
    /// Grace period after leaving the ground during which the player still
    /// counts as grounded.
    pub coyote_time: f32,
    /// Downward nudge when grabbing a ladder from its top.
    pub ladder_nudge: f32,
    /// Upward speed given on death.
    pub death_bounce: f32,
    /// Upward speed given after stomping an enemy.
    pub stomp_bounce: f32,
    /// Invincibility window after taking damage.
    pub invincibility_time: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_force: 200.0,
            max_speed: 120.0,
            friction_factor: 0.85,
            jump_velocity: 350.0,
            climb_speed: 100.0,
            coyote_time: 0.1,
            ladder_nudge: 2.0,
            death_bounce: 200.0,
            stomp_bounce: 300.0,
            invincibility_time: 2.0,
        }
    }
}

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub physics: PhysicsConfig,
    pub player: PlayerTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            physics: PhysicsConfig::default(),
            player: PlayerTuning::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let cfg = GameConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.physics.gravity, Vec2::new(0.0, 980.0));
        assert_eq!(cfg.player.jump_velocity, 350.0);
    }

    #[test]
    fn partial_override() {
        let json = r#"{
            "physics": { "max_speed": 320.0, "world_bounds": [0, 0, 640, 480] },
            "player": { "coyote_time": 0.0 }
        }"#;
        let cfg = GameConfig::from_json(json).unwrap();
        assert_eq!(cfg.physics.max_speed, 320.0);
        assert_eq!(cfg.physics.slope_snap_tolerance, 4.0);
        assert_eq!(cfg.player.coyote_time, 0.0);
        assert_eq!(cfg.player.move_force, 200.0);

        let bounds = cfg.physics.world_bounds_aabb().unwrap();
        assert_eq!(bounds.size, Vec2::new(640.0, 480.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(GameConfig::from_json(r#"{ "fixed_dt": "fast" }"#).is_err());
    }
}
