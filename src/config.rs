//! Session tuning and validation
//!
//! All knobs a driver can turn live here as a plain record; a `Session`
//! refuses to construct from a record that fails validation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

/// Rejected configuration values, reported before a session exists
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },
}

/// Complete session configuration (serializable, drives determinism via `seed`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Run seed for reproducible spawning and scatter
    pub seed: u64,
    /// View size the playable rect is carved out of
    pub view_size: Vec2,
    /// Widest aspect ratio the playable rect must fit
    pub max_aspect_ratio: f32,

    /// Chaser top speed (points/sec)
    pub chaser_speed: f32,
    /// Chaser turn rate cap (radians/sec)
    pub chaser_turn_rate: f32,
    /// Chaser footprint (width = height)
    pub chaser_size: f32,

    /// Follower catch-up speed (points/sec)
    pub follower_speed: f32,
    /// Duration of one follower catch-up step (sec)
    pub follower_step_secs: f32,

    /// Starting lives
    pub lives: u32,
    /// Chain length that wins the session
    pub win_chain_length: u32,

    /// Hazard spawn interval (sec of simulation time)
    pub hazard_interval: f32,
    /// Time a hazard takes to cross the arena (sec)
    pub hazard_cross_secs: f32,
    /// Hazard footprint
    pub hazard_size: f32,
    /// Per-side shrink applied to hazard hit boxes
    pub hazard_hit_inset: f32,

    /// Collectible spawn interval (sec of simulation time)
    pub collectible_interval: f32,
    /// Collectible footprint
    pub collectible_size: f32,

    /// Captured entities released per hazard hit
    pub scatter_count: usize,
    /// Max per-axis offset of a scatter destination
    pub scatter_radius: f32,
    /// Scatter animation length (sec)
    pub scatter_secs: f32,

    /// Chaser blink length after a hazard hit (sec)
    pub blink_secs: f32,
    /// On/off cycles within one blink
    pub blink_times: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            view_size: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            max_aspect_ratio: MAX_ASPECT_RATIO,
            chaser_speed: CHASER_MOVE_POINTS_PER_SEC,
            chaser_turn_rate: CHASER_ROTATE_RADIANS_PER_SEC,
            chaser_size: CHASER_SIZE,
            follower_speed: FOLLOWER_MOVE_POINTS_PER_SEC,
            follower_step_secs: FOLLOWER_STEP_SECS,
            lives: START_LIVES,
            win_chain_length: WIN_CHAIN_LENGTH,
            hazard_interval: HAZARD_SPAWN_INTERVAL,
            hazard_cross_secs: HAZARD_CROSS_SECS,
            hazard_size: HAZARD_SIZE,
            hazard_hit_inset: HAZARD_HIT_INSET,
            collectible_interval: COLLECTIBLE_SPAWN_INTERVAL,
            collectible_size: COLLECTIBLE_SIZE,
            scatter_count: SCATTER_COUNT,
            scatter_radius: SCATTER_RADIUS,
            scatter_secs: SCATTER_SECS,
            blink_secs: BLINK_SECS,
            blink_times: BLINK_TIMES,
        }
    }
}

impl SessionConfig {
    /// Validate every tunable; called by `Session::new`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("view_size.x", self.view_size.x),
            ("view_size.y", self.view_size.y),
            ("max_aspect_ratio", self.max_aspect_ratio),
            ("chaser_speed", self.chaser_speed),
            ("chaser_turn_rate", self.chaser_turn_rate),
            ("chaser_size", self.chaser_size),
            ("follower_speed", self.follower_speed),
            ("follower_step_secs", self.follower_step_secs),
            ("hazard_interval", self.hazard_interval),
            ("hazard_cross_secs", self.hazard_cross_secs),
            ("hazard_size", self.hazard_size),
            ("collectible_interval", self.collectible_interval),
            ("collectible_size", self.collectible_size),
            ("scatter_radius", self.scatter_radius),
            ("scatter_secs", self.scatter_secs),
            ("blink_secs", self.blink_secs),
            ("blink_times", self.blink_times),
        ];
        for (name, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.hazard_hit_inset < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "hazard_hit_inset",
                value: self.hazard_hit_inset,
            });
        }
        if self.lives == 0 {
            return Err(ConfigError::ZeroCount { name: "lives" });
        }
        if self.win_chain_length == 0 {
            return Err(ConfigError::ZeroCount {
                name: "win_chain_length",
            });
        }
        Ok(())
    }

    /// Playable rect: full width, height carved to the widest aspect ratio,
    /// vertically centered. Computed once per session.
    pub fn playable_rect(&self) -> Rect {
        let playable_height = self.view_size.x / self.max_aspect_ratio;
        let margin = (self.view_size.y - playable_height) / 2.0;
        Rect::new(0.0, margin, self.view_size.x, playable_height)
    }
}
