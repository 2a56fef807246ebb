//! Follower chain advance and scatter
//!
//! Captured entities form an ordered chain (capture order, oldest first)
//! maintained incrementally on role transition - no scan-by-tag. Each
//! frame every idle follower gets a short catch-up step toward the entity
//! ahead of it, producing a trailing line behind the chaser rather than a
//! cluster converging on one point.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::action::{Action, Animate};
use super::entity::{Entity, EntityId, Role};
use super::scheduler::{Scheduler, Slot};

fn find_mut(entities: &mut [Entity], id: EntityId) -> Option<&mut Entity> {
    entities.iter_mut().find(|e| e.id == id)
}

/// Give every idle follower its next catch-up step and report the chain
/// length for this frame.
///
/// Each follower aims at the previous chain member's current position (the
/// chaser for the head), stepping `follower_speed * step_secs` points over
/// `step_secs`. A follower mid-step keeps its current move.
pub fn advance_chain(
    chain: &[EntityId],
    chaser_pos: Vec2,
    entities: &mut [Entity],
    scheduler: &mut Scheduler,
    follower_speed: f32,
    step_secs: f32,
) -> usize {
    let mut target = chaser_pos;
    for &id in chain {
        let Some(follower) = find_mut(entities, id) else {
            continue;
        };
        if !scheduler.has_active(id, Slot::Move) {
            let direction = (target - follower.pos).normalize_or_zero();
            let delta = direction * follower_speed * step_secs;
            scheduler.attach(
                id,
                Slot::Move,
                Action::Animate(Animate::MoveBy {
                    delta,
                    secs: step_secs,
                }),
            );
        }
        target = follower.pos;
    }
    chain.len()
}

/// Release up to `count` followers after a hazard hit, oldest first.
///
/// Each released entity leaves the chain for good: role demoted to
/// Scattering, runs cancelled, then a spin-fling-shrink composite ending in
/// removal. Returns how many were released.
pub fn scatter(
    chain: &mut Vec<EntityId>,
    count: usize,
    entities: &mut [Entity],
    scheduler: &mut Scheduler,
    rng: &mut Pcg32,
    radius: f32,
    secs: f32,
) -> usize {
    let released = count.min(chain.len());
    for id in chain.drain(..released) {
        let Some(follower) = find_mut(entities, id) else {
            continue;
        };
        follower.role = Role::Scattering;
        scheduler.cancel_all(id);

        let spot = follower.pos
            + Vec2::new(
                rng.random_range(-radius..radius),
                rng.random_range(-radius..radius),
            );
        scheduler.attach(
            id,
            Slot::Script,
            Action::Sequence(vec![
                Action::Group(vec![
                    Action::Animate(Animate::RotateBy {
                        angle: 4.0 * PI,
                        secs,
                    }),
                    Action::Animate(Animate::MoveTo { target: spot, secs }),
                    Action::Animate(Animate::ScaleTo { target: 0.0, secs }),
                ]),
                Action::remove(),
            ]),
        );
    }
    released
}
