//! Entity state and render-facing snapshots
//!
//! Entities are plain data owned by the session; everything a renderer
//! needs each frame is exported as an `EntitySnapshot`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Stable entity identity. Id 0 is reserved for the chaser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub const CHASER: EntityId = EntityId(0);
}

/// Role tag driving per-frame treatment.
///
/// Spawned entities move one way through their life cycle:
/// `Collectible -> Captured -> Scattering -> despawned`, or
/// `Hazard -> despawned`. `Chaser` tags only the controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Chaser,
    Hazard,
    Collectible,
    Captured,
    Scattering,
}

/// A simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians
    pub rotation: f32,
    pub scale: f32,
    /// Recolor blend factor [0, 1]
    pub color_blend: f32,
    /// Opacity [0, 1]
    pub opacity: f32,
    pub visible: bool,
    /// Unscaled footprint (width, height)
    pub size: Vec2,
    /// Set by a removal effect; swept by the session at frame end
    pub despawned: bool,
}

impl Entity {
    pub fn new(id: EntityId, role: Role, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            color_blend: 0.0,
            opacity: 1.0,
            visible: true,
            size,
            despawned: false,
        }
    }

    /// Current footprint: size scaled about the entity position
    pub fn footprint(&self) -> Rect {
        Rect::centered(self.pos, self.size * self.scale)
    }
}

/// Render-facing visual state for one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub role: Role,
    pub color_blend: f32,
    pub opacity: f32,
    pub visible: bool,
    /// True for a chaser that has not yet arrived at its target
    pub moving: bool,
}

/// Read-only per-frame entity view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub visual: VisualState,
}

impl EntitySnapshot {
    pub fn of(entity: &Entity, moving: bool) -> Self {
        Self {
            id: entity.id,
            pos: entity.pos,
            rotation: entity.rotation,
            scale: entity.scale,
            visual: VisualState {
                role: entity.role,
                color_blend: entity.color_blend,
                opacity: entity.opacity,
                visible: entity.visible,
                moving,
            },
        }
    }
}
