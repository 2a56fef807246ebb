//! Collision detection and hit outcomes
//!
//! Overlap testing runs after all scripted actions have advanced for the
//! frame. Detection collects hits against a stable snapshot first and the
//! session resolves them afterwards (collectibles before hazards), so the
//! entity set is never mutated mid-scan.

use super::action::{Action, Animate};
use super::entity::{Entity, EntityId, Role};
use super::scheduler::{Scheduler, Slot};
use glam::Vec2;

/// Hits found in one frame, in detection order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Hits {
    pub collectibles: Vec<EntityId>,
    pub hazards: Vec<EntityId>,
}

impl Hits {
    pub fn is_empty(&self) -> bool {
        self.collectibles.is_empty() && self.hazards.is_empty()
    }
}

/// Scan every live entity against the chaser footprint.
///
/// Collectibles use exact rectangle intersection; hazard boxes shrink by
/// `hazard_inset` per side first, making hazard contact slightly more
/// forgiving than the visual overlap.
pub fn detect(chaser: &Entity, entities: &[Entity], hazard_inset: f32) -> Hits {
    let chaser_box = chaser.footprint();
    let mut hits = Hits::default();
    for entity in entities {
        if entity.despawned {
            continue;
        }
        match entity.role {
            Role::Collectible => {
                if entity.footprint().intersects(&chaser_box) {
                    hits.collectibles.push(entity.id);
                }
            }
            Role::Hazard => {
                let hit_box = entity.footprint().inset(Vec2::splat(hazard_inset));
                if hit_box.intersects(&chaser_box) {
                    hits.hazards.push(entity.id);
                }
            }
            _ => {}
        }
    }
    hits
}

/// A captured collectible joins the chain: canonical pose, scripted
/// timeline cancelled, recolor attached. Never removed.
pub fn capture(entity: &mut Entity, scheduler: &mut Scheduler) {
    entity.role = Role::Captured;
    scheduler.cancel_all(entity.id);
    entity.scale = 1.0;
    entity.rotation = 0.0;
    scheduler.attach(
        entity.id,
        Slot::Tint,
        Action::Animate(Animate::ColorBlendTo {
            target: 1.0,
            secs: 0.2,
        }),
    );
}

/// Post-hit feedback for the chaser: `times` on/off cycles spread over
/// `secs`, then a guaranteed return to visibility.
pub fn blink_action(secs: f32, times: f32) -> Action {
    Action::Sequence(vec![
        Action::custom(secs, move |entity, elapsed| {
            let slice = secs / times;
            let remainder = elapsed % slice;
            entity.visible = remainder <= slice / 2.0;
        }),
        Action::show(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::ActionRun;
    use glam::Vec2;

    fn chaser() -> Entity {
        Entity::new(
            EntityId::CHASER,
            Role::Chaser,
            Vec2::new(500.0, 500.0),
            Vec2::splat(128.0),
        )
    }

    fn entity(id: u32, role: Role, pos: Vec2) -> Entity {
        Entity::new(EntityId(id), role, pos, Vec2::splat(128.0))
    }

    #[test]
    fn test_detect_collects_collectibles_then_hazards() {
        let chaser = chaser();
        let entities = vec![
            entity(1, Role::Hazard, Vec2::new(520.0, 500.0)),
            entity(2, Role::Collectible, Vec2::new(480.0, 500.0)),
            entity(3, Role::Collectible, Vec2::new(500.0, 520.0)),
            entity(4, Role::Captured, Vec2::new(500.0, 500.0)),
        ];
        let hits = detect(&chaser, &entities, 20.0);
        assert_eq!(hits.collectibles, vec![EntityId(2), EntityId(3)]);
        assert_eq!(hits.hazards, vec![EntityId(1)]);
    }

    #[test]
    fn test_detect_ignores_far_entities() {
        let chaser = chaser();
        let entities = vec![
            entity(1, Role::Collectible, Vec2::new(1500.0, 500.0)),
            entity(2, Role::Hazard, Vec2::new(500.0, 1500.0)),
        ];
        assert!(detect(&chaser, &entities, 20.0).is_empty());
    }

    #[test]
    fn test_hazard_inset_forgives_grazing_overlap() {
        let chaser = chaser();
        // Footprints overlap by 10 points; the 20-point inset eats it
        let grazing = entity(1, Role::Hazard, Vec2::new(500.0 + 118.0, 500.0));
        let hits = detect(&chaser, std::slice::from_ref(&grazing), 20.0);
        assert!(hits.hazards.is_empty());
        // The same overlap on a collectible counts
        let collectible = entity(2, Role::Collectible, Vec2::new(500.0 + 118.0, 500.0));
        let hits = detect(&chaser, std::slice::from_ref(&collectible), 20.0);
        assert_eq!(hits.collectibles, vec![EntityId(2)]);
    }

    #[test]
    fn test_scale_zero_collectible_cannot_be_hit() {
        let chaser = chaser();
        let mut fresh = entity(1, Role::Collectible, Vec2::new(500.0, 500.0));
        fresh.scale = 0.0;
        assert!(detect(&chaser, std::slice::from_ref(&fresh), 20.0).is_empty());
    }

    #[test]
    fn test_capture_resets_pose_and_keeps_entity() {
        let mut scheduler = Scheduler::new();
        let mut target = entity(1, Role::Collectible, Vec2::new(480.0, 500.0));
        target.scale = 0.7;
        target.rotation = 0.4;
        scheduler.attach(target.id, Slot::Script, Action::Wait(100.0));

        capture(&mut target, &mut scheduler);

        assert_eq!(target.role, Role::Captured);
        assert_eq!(target.scale, 1.0);
        assert_eq!(target.rotation, 0.0);
        assert!(!target.despawned);
        assert!(!scheduler.has_active(target.id, Slot::Script));
        assert!(scheduler.has_active(target.id, Slot::Tint));

        // The recolor runs to full blend
        scheduler.tick(&mut target, Slot::Tint, 0.1);
        assert!((target.color_blend - 0.5).abs() < 1e-5);
        scheduler.tick(&mut target, Slot::Tint, 0.1);
        assert!((target.color_blend - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_blink_toggles_and_ends_visible() {
        let mut subject = chaser();
        let mut run = ActionRun::new(blink_action(3.0, 10.0));
        // Slice is 0.3s: first half visible, second half hidden
        assert!(!run.tick(&mut subject, 0.1));
        assert!(subject.visible);
        assert!(!run.tick(&mut subject, 0.1));
        assert!(!subject.visible);
        // Run out the clock; the trailing effect restores visibility
        assert!(run.tick(&mut subject, 3.0));
        assert!(subject.visible);
    }
}
