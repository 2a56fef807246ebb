//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by elapsed time fed through `Session::advance`
//! - Seeded RNG only
//! - Stable iteration order (entities in spawn order, slots in fixed order)
//! - No rendering or platform dependencies

pub mod action;
pub mod chain;
pub mod collision;
pub mod entity;
pub mod motion;
pub mod rect;
pub mod scheduler;
pub mod session;
pub mod spawner;

pub use action::{Action, ActionRun, Animate, Repeat};
pub use entity::{Entity, EntityId, EntitySnapshot, Role, VisualState};
pub use rect::Rect;
pub use scheduler::{Scheduler, Slot};
pub use session::{FrameReport, Outcome, Session};
pub use spawner::Spawner;
