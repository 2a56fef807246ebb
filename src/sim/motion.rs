//! Chaser motion: target seeking, capped rotation, edge reflection
//!
//! Velocity is derived once per pointer input and integrated every frame;
//! the chaser snaps onto the target when one frame's travel would overshoot
//! it. Reflection at the arena edge is elastic - clamp the position, negate
//! the velocity component.

use glam::Vec2;

use super::entity::Entity;
use super::rect::Rect;
use crate::shortest_angle_between;

/// Record a commanded target and derive velocity toward it.
///
/// A zero-length offset yields zero velocity rather than NaN.
pub fn seek(chaser: &mut Entity, target: Vec2, max_speed: f32) {
    let direction = (target - chaser.pos).normalize_or_zero();
    chaser.vel = direction * max_speed;
}

/// Integrate one frame of chaser motion toward `target`.
///
/// Returns true when the chaser has arrived: position snapped to the
/// target, velocity zeroed. Otherwise the position integrates along the
/// stored velocity and the heading turns toward it at the capped rate.
pub fn advance_chaser(
    chaser: &mut Entity,
    target: Option<Vec2>,
    max_speed: f32,
    turn_rate: f32,
    dt: f32,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    let remaining = target - chaser.pos;
    if remaining.length() <= max_speed * dt {
        chaser.pos = target;
        chaser.vel = Vec2::ZERO;
        return true;
    }

    chaser.pos += chaser.vel * dt;
    rotate_toward_heading(chaser, turn_rate, dt);
    false
}

/// Turn the heading toward the velocity direction, never the long way
/// around, at most `turn_rate * dt` radians per frame.
fn rotate_toward_heading(chaser: &mut Entity, turn_rate: f32, dt: f32) {
    if chaser.vel.length_squared() == 0.0 {
        return;
    }
    let heading = chaser.vel.y.atan2(chaser.vel.x);
    let shortest = shortest_angle_between(chaser.rotation, heading);
    let amount = (turn_rate * dt).min(shortest.abs());
    chaser.rotation += shortest.signum() * amount;
}

/// Clamp to the arena rect and reflect the offending velocity component.
pub fn reflect_at_bounds(entity: &mut Entity, bounds: &Rect) {
    if entity.pos.x <= bounds.min_x() {
        entity.pos.x = bounds.min_x();
        entity.vel.x = -entity.vel.x;
    }
    if entity.pos.x >= bounds.max_x() {
        entity.pos.x = bounds.max_x();
        entity.vel.x = -entity.vel.x;
    }
    if entity.pos.y <= bounds.min_y() {
        entity.pos.y = bounds.min_y();
        entity.vel.y = -entity.vel.y;
    }
    if entity.pos.y >= bounds.max_y() {
        entity.pos.y = bounds.max_y();
        entity.vel.y = -entity.vel.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityId, Role};
    use proptest::prelude::*;

    fn chaser_at(pos: Vec2) -> Entity {
        Entity::new(EntityId::CHASER, Role::Chaser, pos, Vec2::new(128.0, 128.0))
    }

    #[test]
    fn test_seek_derives_full_speed_velocity() {
        let mut chaser = chaser_at(Vec2::ZERO);
        seek(&mut chaser, Vec2::new(300.0, 400.0), 480.0);
        assert!((chaser.vel.length() - 480.0).abs() < 0.001);
        // Pointing at the target
        assert!(chaser.vel.x > 0.0 && chaser.vel.y > 0.0);
    }

    #[test]
    fn test_seek_current_position_yields_zero_velocity() {
        let mut chaser = chaser_at(Vec2::new(100.0, 100.0));
        seek(&mut chaser, Vec2::new(100.0, 100.0), 480.0);
        assert_eq!(chaser.vel, Vec2::ZERO);
        assert!(chaser.vel.x.is_finite());
        // And arrival is immediate on the next advance
        let arrived = advance_chaser(
            &mut chaser,
            Some(Vec2::new(100.0, 100.0)),
            480.0,
            4.0,
            1.0 / 60.0,
        );
        assert!(arrived);
    }

    #[test]
    fn test_advance_snaps_when_overshooting() {
        let mut chaser = chaser_at(Vec2::ZERO);
        let target = Vec2::new(5.0, 0.0);
        seek(&mut chaser, target, 480.0);
        // One frame of travel (8 points) would overshoot the 5-point gap
        let arrived = advance_chaser(&mut chaser, Some(target), 480.0, 4.0, 1.0 / 60.0);
        assert!(arrived);
        assert_eq!(chaser.pos, target);
        assert_eq!(chaser.vel, Vec2::ZERO);
    }

    #[test]
    fn test_advance_without_target_is_a_no_op() {
        let mut chaser = chaser_at(Vec2::new(10.0, 10.0));
        chaser.vel = Vec2::new(480.0, 0.0);
        let arrived = advance_chaser(&mut chaser, None, 480.0, 4.0, 1.0 / 60.0);
        assert!(!arrived);
        assert_eq!(chaser.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_rotation_takes_shortest_way() {
        let mut chaser = chaser_at(Vec2::ZERO);
        chaser.rotation = 3.0; // Near +π
        let target = Vec2::new(1000.0, -310.0); // Heading ≈ -0.3
        seek(&mut chaser, target, 480.0);
        // The short way from 3.0 to -0.3 wraps through π, so the rotation
        // must increase rather than sweep down through 0
        advance_chaser(&mut chaser, Some(target), 480.0, 2.0, 0.1);
        assert!(chaser.rotation > 3.0);
    }

    #[test]
    fn test_rotation_rate_is_capped() {
        let mut chaser = chaser_at(Vec2::ZERO);
        chaser.rotation = 0.0;
        seek(&mut chaser, Vec2::new(0.0, 1000.0), 480.0); // Heading π/2
        advance_chaser(&mut chaser, Some(Vec2::new(0.0, 1000.0)), 480.0, 1.0, 0.25);
        assert!((chaser.rotation - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_reflection_negates_velocity() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 700.0);
        let mut chaser = chaser_at(Vec2::new(-5.0, 350.0));
        chaser.vel = Vec2::new(-480.0, 100.0);
        reflect_at_bounds(&mut chaser, &bounds);
        assert_eq!(chaser.pos.x, 0.0);
        assert_eq!(chaser.vel.x, 480.0);
        assert_eq!(chaser.vel.y, 100.0);
    }

    proptest! {
        // Whatever the target and however time is sliced, the chaser never
        // leaves the arena rect
        #[test]
        fn prop_reflection_keeps_chaser_in_bounds(
            start_x in 0.0f32..2048.0,
            start_y in 192.0f32..1344.0,
            target_x in -500.0f32..2500.0,
            target_y in -500.0f32..2000.0,
            steps in 1usize..120,
            dt in 0.001f32..0.1,
        ) {
            let bounds = Rect::new(0.0, 192.0, 2048.0, 1152.0);
            let mut chaser = chaser_at(Vec2::new(start_x, start_y));
            let target = Vec2::new(target_x, target_y);
            seek(&mut chaser, target, 480.0);
            for _ in 0..steps {
                advance_chaser(&mut chaser, Some(target), 480.0, 4.0, dt);
                reflect_at_bounds(&mut chaser, &bounds);
                prop_assert!(bounds.contains_point(chaser.pos));
            }
        }
    }
}
