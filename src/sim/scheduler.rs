//! Attachment slots and the active-run table
//!
//! Each entity owns at most one live `ActionRun` per slot; attaching under
//! an occupied slot replaces the old run outright, so no residual cursor
//! state leaks between timelines. The table never iterates its map - the
//! session drives ticking in entity order with a fixed slot order, keeping
//! frames deterministic.

use std::collections::HashMap;

use super::action::{Action, ActionRun};
use super::entity::{Entity, EntityId};

/// Per-entity attachment key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Spawn-time or scatter timeline
    Script,
    /// Follower catch-up step
    Move,
    /// Capture recolor
    Tint,
    /// Chaser hit feedback
    Blink,
}

impl Slot {
    /// Tick order within one entity's frame
    pub const ALL: [Slot; 4] = [Slot::Script, Slot::Move, Slot::Tint, Slot::Blink];
}

/// Active-run table keyed by (entity, slot)
#[derive(Debug, Default)]
pub struct Scheduler {
    runs: HashMap<(EntityId, Slot), ActionRun>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run, discarding any prior run under the same slot
    pub fn attach(&mut self, id: EntityId, slot: Slot, template: Action) {
        self.runs.insert((id, slot), ActionRun::new(template));
    }

    /// Stop a run immediately; its remaining callbacks never fire
    pub fn cancel(&mut self, id: EntityId, slot: Slot) {
        self.runs.remove(&(id, slot));
    }

    /// Drop every run attached to an entity
    pub fn cancel_all(&mut self, id: EntityId) {
        self.runs.retain(|(run_id, _), _| *run_id != id);
    }

    pub fn has_active(&self, id: EntityId, slot: Slot) -> bool {
        self.runs.contains_key(&(id, slot))
    }

    pub fn has_any_active(&self, id: EntityId) -> bool {
        Slot::ALL.iter().any(|slot| self.has_active(id, *slot))
    }

    /// Advance one slot of one entity. Returns true when the run completed
    /// (or no run was attached); completed runs are removed.
    pub fn tick(&mut self, entity: &mut Entity, slot: Slot, dt: f32) -> bool {
        let key = (entity.id, slot);
        let Some(run) = self.runs.get_mut(&key) else {
            return true;
        };
        let completed = run.tick(entity, dt);
        if completed {
            self.runs.remove(&key);
        }
        completed
    }

    /// Advance every slot of one entity in the fixed slot order
    pub fn tick_entity(&mut self, entity: &mut Entity, dt: f32) {
        for slot in Slot::ALL {
            if self.has_active(entity.id, slot) {
                self.tick(entity, slot, dt);
            }
        }
    }
}
