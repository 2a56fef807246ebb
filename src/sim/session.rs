//! Session state and the per-frame advance loop
//!
//! One `Session` owns everything: the chaser, spawned entities, the active
//! run table, spawn timers, lives and outcome. A driver feeds it pointer
//! targets and elapsed frame times; it hands back plain frame reports.
//! Everything is a pure function of accumulated elapsed time, prior state
//! and the seed - no wall clock anywhere.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::chain;
use super::collision::{self, Hits};
use super::entity::{Entity, EntityId, EntitySnapshot, Role};
use super::motion;
use super::rect::Rect;
use super::scheduler::{Scheduler, Slot};
use super::spawner::{self, Spawner};
use crate::config::{ConfigError, SessionConfig};

/// Session outcome; terminal states never revert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Everything the presentation layer needs from one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// Chain length as yielded by this frame's chain step; captures made
    /// during the same frame's collision pass count from the next frame
    pub chain_length: u32,
    pub lives_remaining: u32,
    pub outcome: Outcome,
    pub entities: Vec<EntitySnapshot>,
}

/// A single chase-and-collect session
pub struct Session {
    config: SessionConfig,
    arena: Rect,
    rng: Pcg32,
    scheduler: Scheduler,
    spawner: Spawner,
    chaser: Entity,
    last_target: Option<Vec2>,
    chaser_moving: bool,
    entities: Vec<Entity>,
    /// Captured ids, capture order (oldest first)
    chain: Vec<EntityId>,
    /// Chain length yielded by the most recent chain step
    frame_chain_len: u32,
    lives: u32,
    outcome: Outcome,
    next_id: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = config.playable_rect();
        let chaser = Entity::new(
            EntityId::CHASER,
            Role::Chaser,
            arena.center(),
            Vec2::splat(config.chaser_size),
        );
        log::info!(
            "session start: arena {:.0}x{:.0}, {} lives, chain target {}",
            arena.width(),
            arena.height(),
            config.lives,
            config.win_chain_length
        );
        Ok(Self {
            rng: Pcg32::seed_from_u64(config.seed),
            spawner: Spawner::new(&config),
            scheduler: Scheduler::new(),
            arena,
            chaser,
            last_target: None,
            chaser_moving: false,
            entities: Vec::new(),
            chain: Vec::new(),
            frame_chain_len: 0,
            lives: config.lives,
            outcome: Outcome::InProgress,
            next_id: 1,
            config,
        })
    }

    /// Feed the most recent pointer location; only the latest call before
    /// the next `advance` matters.
    pub fn on_target_input(&mut self, point: Vec2) {
        if self.outcome.is_terminal() {
            return;
        }
        self.last_target = Some(point);
        motion::seek(&mut self.chaser, point, self.config.chaser_speed);
        self.chaser_moving = true;
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn lives_remaining(&self) -> u32 {
        self.lives
    }

    pub fn chain_length(&self) -> u32 {
        self.chain.len() as u32
    }

    pub fn arena(&self) -> &Rect {
        &self.arena
    }

    /// Attach a timeline to an entity, replacing whatever occupies the
    /// slot. Unknown targets are absorbed as a logged no-op.
    pub fn attach_action(&mut self, id: EntityId, slot: Slot, action: Action) {
        let known = id == EntityId::CHASER || self.entities.iter().any(|e| e.id == id);
        if !known {
            log::warn!("detached target: dropping {slot:?} action for unknown entity {id:?}");
            return;
        }
        self.scheduler.attach(id, slot, action);
    }

    /// Advance the session by one frame of elapsed simulation time.
    ///
    /// Idempotent no-op once the outcome is terminal.
    pub fn advance(&mut self, elapsed: f32) -> FrameReport {
        if self.outcome.is_terminal() {
            return self.report();
        }
        let dt = elapsed.max(0.0);

        // Motion and bounds
        let arrived = motion::advance_chaser(
            &mut self.chaser,
            self.last_target,
            self.config.chaser_speed,
            self.config.chaser_turn_rate,
            dt,
        );
        if arrived {
            self.chaser_moving = false;
        }
        motion::reflect_at_bounds(&mut self.chaser, &self.arena);

        // Follower chain; the yielded length is what this frame reports
        // and what the state machine judges
        self.frame_chain_len = chain::advance_chain(
            &self.chain,
            self.chaser.pos,
            &mut self.entities,
            &mut self.scheduler,
            self.config.follower_speed,
            self.config.follower_step_secs,
        ) as u32;

        // Won before Lost; hits landed last frame settle here, after their
        // blink and scatter effects have already applied
        self.evaluate_outcome();
        if self.outcome.is_terminal() {
            return self.report();
        }

        // Scripted actions, chaser first then entities in spawn order
        self.scheduler.tick_entity(&mut self.chaser, dt);
        for entity in self.entities.iter_mut() {
            self.scheduler.tick_entity(entity, dt);
        }

        // Spawning; fresh scripts start ticking next frame
        let counts = self.spawner.poll(dt);
        for _ in 0..counts.hazards {
            let id = self.next_entity_id();
            let (entity, script) =
                spawner::spawn_hazard(id, &self.config, &self.arena, &mut self.rng);
            log::debug!("hazard {id:?} spawned at {:.0},{:.0}", entity.pos.x, entity.pos.y);
            self.entities.push(entity);
            self.attach_action(id, Slot::Script, script);
        }
        for _ in 0..counts.collectibles {
            let id = self.next_entity_id();
            let (entity, script) =
                spawner::spawn_collectible(id, &self.config, &self.arena, &mut self.rng);
            log::debug!(
                "collectible {id:?} spawned at {:.0},{:.0}",
                entity.pos.x,
                entity.pos.y
            );
            self.entities.push(entity);
            self.attach_action(id, Slot::Script, script);
        }

        // Collisions: detect against a stable snapshot, then resolve
        let hits = collision::detect(&self.chaser, &self.entities, self.config.hazard_hit_inset);
        self.resolve_hits(hits);

        self.sweep_despawned();
        self.report()
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Apply hit outcomes in detection order, collectibles before hazards
    fn resolve_hits(&mut self, hits: Hits) {
        for id in hits.collectibles {
            if let Some(entity) = self
                .entities
                .iter_mut()
                .find(|e| e.id == id && e.role == Role::Collectible && !e.despawned)
            {
                collision::capture(entity, &mut self.scheduler);
                self.chain.push(id);
                log::debug!("collectible {id:?} captured, chain {}", self.chain.len());
            }
        }
        for id in hits.hazards {
            let Some(entity) = self
                .entities
                .iter_mut()
                .find(|e| e.id == id && e.role == Role::Hazard && !e.despawned)
            else {
                continue;
            };
            entity.despawned = true;
            self.lives = self.lives.saturating_sub(1);
            log::debug!("hazard {id:?} hit, lives {}", self.lives);
            self.scheduler.attach(
                EntityId::CHASER,
                Slot::Blink,
                collision::blink_action(self.config.blink_secs, self.config.blink_times),
            );
            chain::scatter(
                &mut self.chain,
                self.config.scatter_count,
                &mut self.entities,
                &mut self.scheduler,
                &mut self.rng,
                self.config.scatter_radius,
                self.config.scatter_secs,
            );
        }
    }

    fn sweep_despawned(&mut self) {
        let scheduler = &mut self.scheduler;
        self.entities.retain(|entity| {
            if entity.despawned {
                scheduler.cancel_all(entity.id);
                false
            } else {
                true
            }
        });
        let entities = &self.entities;
        self.chain.retain(|id| entities.iter().any(|e| e.id == *id));
    }

    /// Single per-frame evaluation; Won is checked before Lost so a maxed
    /// chain wins even on the frame the last life would be judged
    fn evaluate_outcome(&mut self) {
        if self.outcome.is_terminal() {
            return;
        }
        if self.frame_chain_len >= self.config.win_chain_length {
            self.outcome = Outcome::Won;
            log::info!("session won: chain length {}", self.frame_chain_len);
        } else if self.lives == 0 {
            self.outcome = Outcome::Lost;
            log::info!("session lost: out of lives");
        }
    }

    fn report(&self) -> FrameReport {
        let mut entities = Vec::with_capacity(self.entities.len() + 1);
        entities.push(EntitySnapshot::of(&self.chaser, self.chaser_moving));
        entities.extend(self.entities.iter().map(|e| EntitySnapshot::of(e, false)));
        FrameReport {
            chain_length: self.frame_chain_len,
            lives_remaining: self.lives,
            outcome: self.outcome,
            entities,
        }
    }
}
