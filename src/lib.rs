//! Tail Chase - a chase-and-collect arena game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, motion, collisions, session)
//! - `config`: Data-driven session tuning and validation
//!
//! The crate has no rendering, audio, or input-device dependency: a driver
//! feeds pointer target points in and consumes plain frame reports.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SessionConfig};
pub use sim::{FrameReport, Outcome, Session};

/// Game configuration constants
pub mod consts {
    /// Reference view size the arena is carved out of
    pub const VIEW_WIDTH: f32 = 2048.0;
    pub const VIEW_HEIGHT: f32 = 1536.0;
    /// Widest aspect ratio the arena must fit
    pub const MAX_ASPECT_RATIO: f32 = 16.0 / 9.0;

    /// Chaser defaults
    pub const CHASER_MOVE_POINTS_PER_SEC: f32 = 480.0;
    pub const CHASER_ROTATE_RADIANS_PER_SEC: f32 = 4.0 * std::f32::consts::PI;
    pub const CHASER_SIZE: f32 = 128.0;

    /// Follower defaults
    pub const FOLLOWER_MOVE_POINTS_PER_SEC: f32 = 480.0;
    /// Duration of one follower catch-up step
    pub const FOLLOWER_STEP_SECS: f32 = 0.3;

    /// Session defaults
    pub const START_LIVES: u32 = 5;
    pub const WIN_CHAIN_LENGTH: u32 = 5;

    /// Spawner defaults
    pub const HAZARD_SPAWN_INTERVAL: f32 = 2.0;
    pub const HAZARD_CROSS_SECS: f32 = 2.0;
    pub const HAZARD_SIZE: f32 = 128.0;
    /// Hazard hit boxes shrink by this much per side (forgiving collisions)
    pub const HAZARD_HIT_INSET: f32 = 20.0;
    pub const COLLECTIBLE_SPAWN_INTERVAL: f32 = 1.0;
    pub const COLLECTIBLE_SIZE: f32 = 96.0;

    /// Scatter defaults
    pub const SCATTER_COUNT: usize = 2;
    pub const SCATTER_RADIUS: f32 = 100.0;
    pub const SCATTER_SECS: f32 = 1.0;

    /// Blink-on-hit defaults
    pub const BLINK_SECS: f32 = 3.0;
    pub const BLINK_TIMES: f32 = 10.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed shortest angular difference from `from` to `to`, in (-π, π]
#[inline]
pub fn shortest_angle_between(from: f32, to: f32) -> f32 {
    let mut delta = normalize_angle(to) - normalize_angle(from);
    if delta > std::f32::consts::PI {
        delta -= std::f32::consts::TAU;
    } else if delta <= -std::f32::consts::PI {
        delta += std::f32::consts::TAU;
    }
    delta
}
