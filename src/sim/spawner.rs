//! Periodic hazard and collectible spawning
//!
//! Two independent accumulating timers, measured purely in simulation time
//! fed through `advance` - no wall clock. Each firing builds an entity and
//! the scripted timeline it lives by; randomness comes from the session's
//! seeded RNG so identical seeds replay identical sessions.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::action::{Action, Animate};
use super::entity::{Entity, EntityId, Role};
use super::rect::Rect;
use crate::config::SessionConfig;

/// How many of each kind to spawn this frame
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SpawnCounts {
    pub hazards: u32,
    pub collectibles: u32,
}

/// Spawn timers; primed so both fire on the session's first advance
#[derive(Debug)]
pub struct Spawner {
    hazard_interval: f32,
    collectible_interval: f32,
    hazard_clock: f32,
    collectible_clock: f32,
}

impl Spawner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            hazard_interval: config.hazard_interval,
            collectible_interval: config.collectible_interval,
            hazard_clock: config.hazard_interval,
            collectible_clock: config.collectible_interval,
        }
    }

    /// Accumulate elapsed time; a long tick can fire a timer several times
    pub fn poll(&mut self, dt: f32) -> SpawnCounts {
        let mut counts = SpawnCounts::default();
        self.hazard_clock += dt;
        while self.hazard_clock >= self.hazard_interval {
            self.hazard_clock -= self.hazard_interval;
            counts.hazards += 1;
        }
        self.collectible_clock += dt;
        while self.collectible_clock >= self.collectible_interval {
            self.collectible_clock -= self.collectible_interval;
            counts.collectibles += 1;
        }
        counts
    }
}

/// Uniform draw over [lo, hi), falling back to the midpoint when the range
/// has collapsed (arena smaller than the inset)
fn uniform_or_mid(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// A hazard enters just beyond the right arena edge and crosses to just
/// past the left edge at a fixed pace, then removes itself.
pub fn spawn_hazard(
    id: EntityId,
    config: &SessionConfig,
    arena: &Rect,
    rng: &mut Pcg32,
) -> (Entity, Action) {
    let half = config.hazard_size / 2.0;
    let y = uniform_or_mid(rng, arena.min_y() + half, arena.max_y() - half);
    let entity = Entity::new(
        id,
        Role::Hazard,
        Vec2::new(arena.max_x() + half, y),
        Vec2::splat(config.hazard_size),
    );
    let script = Action::Sequence(vec![
        Action::Animate(Animate::MoveToX {
            x: arena.min_x() - half,
            secs: config.hazard_cross_secs,
        }),
        Action::remove(),
    ]);
    (entity, script)
}

/// A collectible pops in at a random arena point, pulses and wiggles for a
/// while, then shrinks away and removes itself unless captured first.
pub fn spawn_collectible(
    id: EntityId,
    config: &SessionConfig,
    arena: &Rect,
    rng: &mut Pcg32,
) -> (Entity, Action) {
    let x = uniform_or_mid(rng, arena.min_x(), arena.max_x());
    let y = uniform_or_mid(rng, arena.min_y(), arena.max_y());
    let mut entity = Entity::new(
        id,
        Role::Collectible,
        Vec2::new(x, y),
        Vec2::splat(config.collectible_size),
    );
    entity.scale = 0.0;
    entity.rotation = -PI / 16.0;

    let pulse = Action::Sequence(vec![
        Action::Animate(Animate::ScaleBy {
            factor: 1.2,
            secs: 0.25,
        }),
        Action::Animate(Animate::ScaleBy {
            factor: 1.0 / 1.2,
            secs: 0.25,
        }),
        Action::Animate(Animate::ScaleBy {
            factor: 1.2,
            secs: 0.25,
        }),
        Action::Animate(Animate::ScaleBy {
            factor: 1.0 / 1.2,
            secs: 0.25,
        }),
    ]);
    let wiggle = Action::Sequence(vec![
        Action::Animate(Animate::RotateBy {
            angle: PI / 8.0,
            secs: 0.5,
        }),
        Action::Animate(Animate::RotateBy {
            angle: -PI / 8.0,
            secs: 0.5,
        }),
    ]);
    let script = Action::Sequence(vec![
        Action::Animate(Animate::ScaleTo {
            target: 1.0,
            secs: 0.5,
        }),
        Action::repeat(Action::Group(vec![pulse, wiggle]), 10),
        Action::Animate(Animate::ScaleTo {
            target: 0.0,
            secs: 0.5,
        }),
        Action::remove(),
    ]);
    (entity, script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::ActionRun;
    use rand::SeedableRng;

    fn arena() -> Rect {
        Rect::new(0.0, 192.0, 2048.0, 1152.0)
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_timers_fire_on_first_advance() {
        let config = SessionConfig::default();
        let mut spawner = Spawner::new(&config);
        let counts = spawner.poll(1.0 / 60.0);
        assert_eq!(
            counts,
            SpawnCounts {
                hazards: 1,
                collectibles: 1
            }
        );
    }

    #[test]
    fn test_timers_fire_per_interval() {
        let config = SessionConfig::default(); // hazard 2.0s, collectible 1.0s
        let mut spawner = Spawner::new(&config);
        spawner.poll(0.0); // Burn the primed firings
        let mut hazards = 0;
        let mut collectibles = 0;
        // 4 seconds in 1/60 steps
        for _ in 0..240 {
            let counts = spawner.poll(1.0 / 60.0);
            hazards += counts.hazards;
            collectibles += counts.collectibles;
        }
        assert_eq!(hazards, 2);
        assert_eq!(collectibles, 4);
    }

    #[test]
    fn test_long_tick_fires_multiple_times() {
        let config = SessionConfig::default();
        let mut spawner = Spawner::new(&config);
        spawner.poll(0.0);
        let counts = spawner.poll(6.0);
        assert_eq!(counts.hazards, 3);
        assert_eq!(counts.collectibles, 6);
    }

    #[test]
    fn test_hazard_spawns_beyond_right_edge_inside_vertical_inset() {
        let config = SessionConfig::default();
        let arena = arena();
        let mut rng = rng();
        for i in 0..50 {
            let (entity, _) = spawn_hazard(EntityId(i + 1), &config, &arena, &mut rng);
            let half = config.hazard_size / 2.0;
            assert_eq!(entity.pos.x, arena.max_x() + half);
            assert!(entity.pos.y >= arena.min_y() + half);
            assert!(entity.pos.y <= arena.max_y() - half);
            assert_eq!(entity.role, Role::Hazard);
        }
    }

    #[test]
    fn test_hazard_crosses_and_removes_itself() {
        let config = SessionConfig::default();
        let arena = arena();
        let mut rng = rng();
        let (mut entity, script) = spawn_hazard(EntityId(1), &config, &arena, &mut rng);
        let mut run = ActionRun::new(script);
        let start_y = entity.pos.y;
        assert!(!run.tick(&mut entity, config.hazard_cross_secs / 2.0));
        assert!(entity.pos.x < arena.max_x());
        assert!(run.tick(&mut entity, config.hazard_cross_secs / 2.0));
        assert_eq!(entity.pos.x, arena.min_x() - config.hazard_size / 2.0);
        assert_eq!(entity.pos.y, start_y);
        assert!(entity.despawned);
    }

    #[test]
    fn test_collectible_spawns_inside_arena_at_scale_zero() {
        let config = SessionConfig::default();
        let arena = arena();
        let mut rng = rng();
        for i in 0..50 {
            let (entity, _) = spawn_collectible(EntityId(i + 1), &config, &arena, &mut rng);
            assert!(arena.contains_point(entity.pos));
            assert_eq!(entity.scale, 0.0);
            assert_eq!(entity.role, Role::Collectible);
        }
    }

    #[test]
    fn test_collectible_appears_then_eventually_removes_itself() {
        let config = SessionConfig::default();
        let arena = arena();
        let mut rng = rng();
        let (mut entity, script) = spawn_collectible(EntityId(1), &config, &arena, &mut rng);
        let mut run = ActionRun::new(script);

        // Appear: full size after 0.5s
        assert!(!run.tick(&mut entity, 0.5));
        assert!((entity.scale - 1.0).abs() < 1e-5);

        // 10 pulse/wiggle cycles of 1s each, then a 0.5s disappear
        let mut done = false;
        for _ in 0..((10.5 / 0.05) as usize + 1) {
            if run.tick(&mut entity, 0.05) {
                done = true;
                break;
            }
        }
        assert!(done);
        assert!(entity.scale.abs() < 1e-3);
        assert!(entity.despawned);
    }

    #[test]
    fn test_spawns_are_deterministic_per_seed() {
        let config = SessionConfig::default();
        let arena = arena();
        let mut rng_a = Pcg32::seed_from_u64(42);
        let mut rng_b = Pcg32::seed_from_u64(42);
        for i in 0..10 {
            let (a, _) = spawn_collectible(EntityId(i + 1), &config, &arena, &mut rng_a);
            let (b, _) = spawn_collectible(EntityId(i + 1), &config, &arena, &mut rng_b);
            assert_eq!(a.pos, b.pos);
        }
    }
}
