//! Declarative timed-action trees and their interpreter
//!
//! The tricky part of the core: every behavioral timeline (spawn scripts,
//! follower steps, scatter, blink) is a value of `Action`, advanced purely
//! by elapsed simulation time. Templates are cheap to clone; attaching one
//! produces an `ActionRun` cursor that walks the tree and applies property
//! mutations to its entity.
//!
//! Time accounting is exact: a child that completes mid-tick hands its
//! leftover time to the next child in the same tick, so a sequence of
//! durations d1..dN completes at exactly their sum however the ticks are
//! partitioned.

use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use super::entity::Entity;

/// One-shot side effect fired by `Action::Run`
pub type EffectFn = Rc<dyn Fn(&mut Entity)>;
/// Per-tick hook for `Action::Custom`; receives cumulative elapsed time
/// since the node started, clamped to the node's duration
pub type TickFn = Rc<dyn Fn(&mut Entity, f32)>;

/// Repeat mode for `Action::Repeat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

/// Linear property interpolation, relative (`*By`) or absolute (`*To`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animate {
    ScaleTo { target: f32, secs: f32 },
    /// Multiplies the scale captured when the node starts
    ScaleBy { factor: f32, secs: f32 },
    RotateBy { angle: f32, secs: f32 },
    MoveTo { target: Vec2, secs: f32 },
    MoveBy { delta: Vec2, secs: f32 },
    MoveToX { x: f32, secs: f32 },
    ColorBlendTo { target: f32, secs: f32 },
    FadeTo { target: f32, secs: f32 },
}

impl Animate {
    fn secs(&self) -> f32 {
        match *self {
            Animate::ScaleTo { secs, .. }
            | Animate::ScaleBy { secs, .. }
            | Animate::RotateBy { secs, .. }
            | Animate::MoveTo { secs, .. }
            | Animate::MoveBy { secs, .. }
            | Animate::MoveToX { secs, .. }
            | Animate::ColorBlendTo { secs, .. }
            | Animate::FadeTo { secs, .. } => secs,
        }
    }

    /// Baseline value when the node starts (scalars ride in `x`)
    fn capture(&self, entity: &Entity) -> Vec2 {
        match *self {
            Animate::ScaleTo { .. } | Animate::ScaleBy { .. } => Vec2::new(entity.scale, 0.0),
            Animate::RotateBy { .. } => Vec2::new(entity.rotation, 0.0),
            Animate::MoveTo { .. } | Animate::MoveBy { .. } => entity.pos,
            Animate::MoveToX { .. } => Vec2::new(entity.pos.x, 0.0),
            Animate::ColorBlendTo { .. } => Vec2::new(entity.color_blend, 0.0),
            Animate::FadeTo { .. } => Vec2::new(entity.opacity, 0.0),
        }
    }

    fn resolved_target(&self, baseline: Vec2) -> Vec2 {
        match *self {
            Animate::ScaleTo { target, .. } => Vec2::new(target, 0.0),
            Animate::ScaleBy { factor, .. } => Vec2::new(baseline.x * factor, 0.0),
            Animate::RotateBy { angle, .. } => Vec2::new(baseline.x + angle, 0.0),
            Animate::MoveTo { target, .. } => target,
            Animate::MoveBy { delta, .. } => baseline + delta,
            Animate::MoveToX { x, .. } => Vec2::new(x, 0.0),
            Animate::ColorBlendTo { target, .. } => Vec2::new(target, 0.0),
            Animate::FadeTo { target, .. } => Vec2::new(target, 0.0),
        }
    }

    fn write(&self, entity: &mut Entity, value: Vec2) {
        match *self {
            Animate::ScaleTo { .. } | Animate::ScaleBy { .. } => entity.scale = value.x,
            Animate::RotateBy { .. } => entity.rotation = value.x,
            Animate::MoveTo { .. } | Animate::MoveBy { .. } => entity.pos = value,
            Animate::MoveToX { .. } => entity.pos.x = value.x,
            Animate::ColorBlendTo { .. } => entity.color_blend = value.x.clamp(0.0, 1.0),
            Animate::FadeTo { .. } => entity.opacity = value.x.clamp(0.0, 1.0),
        }
    }
}

/// A node in a declarative timeline. Stateless as a template; `ActionRun`
/// holds the execution state.
#[derive(Clone)]
pub enum Action {
    /// Opaque delay
    Wait(f32),
    /// Fires a side effect once, zero duration
    Run(EffectFn),
    Animate(Animate),
    /// Children strictly in order; duration = sum
    Sequence(Vec<Action>),
    /// Children concurrently; duration = max
    Group(Vec<Action>),
    Repeat(Box<Action>, Repeat),
    /// Per-tick hook over a fixed duration
    Custom { secs: f32, on_tick: TickFn },
}

impl Action {
    pub fn run(effect: impl Fn(&mut Entity) + 'static) -> Self {
        Action::Run(Rc::new(effect))
    }

    pub fn custom(secs: f32, on_tick: impl Fn(&mut Entity, f32) + 'static) -> Self {
        Action::Custom {
            secs,
            on_tick: Rc::new(on_tick),
        }
    }

    pub fn repeat(child: Action, count: u32) -> Self {
        Action::Repeat(Box::new(child), Repeat::Times(count))
    }

    pub fn repeat_forever(child: Action) -> Self {
        Action::Repeat(Box::new(child), Repeat::Forever)
    }

    /// Removal is an ordinary effect; the session sweeps flagged entities
    pub fn remove() -> Self {
        Action::run(|entity| entity.despawned = true)
    }

    pub fn show() -> Self {
        Action::run(|entity| entity.visible = true)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Wait(secs) => write!(f, "Wait({secs})"),
            Action::Run(_) => write!(f, "Run"),
            Action::Animate(anim) => write!(f, "Animate({anim:?})"),
            Action::Sequence(children) => f.debug_tuple("Sequence").field(children).finish(),
            Action::Group(children) => f.debug_tuple("Group").field(children).finish(),
            Action::Repeat(child, mode) => {
                f.debug_tuple("Repeat").field(child).field(mode).finish()
            }
            Action::Custom { secs, .. } => write!(f, "Custom({secs})"),
        }
    }
}

/// Per-node execution state, mirroring the template tree
enum Cursor {
    Wait { elapsed: f32 },
    Run { fired: bool },
    Animate { elapsed: f32, baseline: Option<Vec2> },
    Sequence { index: usize, child: Box<Cursor> },
    Group { children: Vec<(Cursor, bool)> },
    Repeat { iterations: u32, child: Box<Cursor> },
    Custom { elapsed: f32 },
}

impl Cursor {
    fn for_action(action: &Action) -> Cursor {
        match action {
            Action::Wait(_) => Cursor::Wait { elapsed: 0.0 },
            Action::Run(_) => Cursor::Run { fired: false },
            Action::Animate(_) => Cursor::Animate {
                elapsed: 0.0,
                baseline: None,
            },
            Action::Sequence(children) => Cursor::Sequence {
                index: 0,
                child: Box::new(
                    children
                        .first()
                        .map(Cursor::for_action)
                        .unwrap_or(Cursor::Wait { elapsed: 0.0 }),
                ),
            },
            Action::Group(children) => Cursor::Group {
                children: children
                    .iter()
                    .map(|c| (Cursor::for_action(c), false))
                    .collect(),
            },
            Action::Repeat(child, _) => Cursor::Repeat {
                iterations: 0,
                child: Box::new(Cursor::for_action(child)),
            },
            Action::Custom { .. } => Cursor::Custom { elapsed: 0.0 },
        }
    }
}

/// Outcome of advancing a node by one tick
enum Progress {
    Running,
    /// Completed; `leftover` is the tick time the node did not consume
    Done { leftover: f32 },
}

fn advance(action: &Action, cursor: &mut Cursor, entity: &mut Entity, dt: f32) -> Progress {
    match (action, cursor) {
        (Action::Wait(secs), Cursor::Wait { elapsed }) => {
            if *secs <= 0.0 {
                return Progress::Done { leftover: dt };
            }
            *elapsed += dt;
            if *elapsed >= *secs {
                Progress::Done {
                    leftover: *elapsed - *secs,
                }
            } else {
                Progress::Running
            }
        }

        (Action::Run(effect), Cursor::Run { fired }) => {
            if !*fired {
                effect(entity);
                *fired = true;
            }
            Progress::Done { leftover: dt }
        }

        (Action::Animate(anim), Cursor::Animate { elapsed, baseline }) => {
            let base = *baseline.get_or_insert_with(|| anim.capture(entity));
            let secs = anim.secs();
            if secs <= 0.0 {
                anim.write(entity, anim.resolved_target(base));
                return Progress::Done { leftover: dt };
            }
            *elapsed += dt;
            let t = (*elapsed / secs).clamp(0.0, 1.0);
            anim.write(entity, base.lerp(anim.resolved_target(base), t));
            if *elapsed >= secs {
                Progress::Done {
                    leftover: *elapsed - secs,
                }
            } else {
                Progress::Running
            }
        }

        (Action::Sequence(children), Cursor::Sequence { index, child }) => {
            if children.is_empty() {
                return Progress::Done { leftover: dt };
            }
            let mut budget = dt;
            loop {
                match advance(&children[*index], child, entity, budget) {
                    Progress::Running => return Progress::Running,
                    Progress::Done { leftover } => {
                        *index += 1;
                        if *index >= children.len() {
                            return Progress::Done { leftover };
                        }
                        **child = Cursor::for_action(&children[*index]);
                        budget = leftover;
                    }
                }
            }
        }

        (Action::Group(templates), Cursor::Group { children }) => {
            let mut all_done = true;
            let mut end_leftover = f32::INFINITY;
            for (template, (cursor, done)) in templates.iter().zip(children.iter_mut()) {
                if *done {
                    continue;
                }
                match advance(template, cursor, entity, dt) {
                    Progress::Running => all_done = false,
                    Progress::Done { leftover } => {
                        *done = true;
                        end_leftover = end_leftover.min(leftover);
                    }
                }
            }
            if all_done {
                Progress::Done {
                    leftover: if end_leftover.is_finite() {
                        end_leftover
                    } else {
                        dt
                    },
                }
            } else {
                Progress::Running
            }
        }

        (Action::Repeat(template, mode), Cursor::Repeat { iterations, child }) => {
            let mut budget = dt;
            loop {
                if let Repeat::Times(count) = mode {
                    if *iterations >= *count {
                        return Progress::Done { leftover: budget };
                    }
                }
                match advance(template, child, entity, budget) {
                    Progress::Running => return Progress::Running,
                    Progress::Done { leftover } => {
                        *iterations += 1;
                        if let Repeat::Times(count) = mode {
                            if *iterations >= *count {
                                return Progress::Done { leftover };
                            }
                        }
                        // Fresh cursor: interpolation baselines re-capture
                        **child = Cursor::for_action(template);
                        if leftover >= budget {
                            // Zero-duration child consumed nothing; yield
                            // to the next tick instead of spinning
                            return Progress::Running;
                        }
                        budget = leftover;
                    }
                }
            }
        }

        (Action::Custom { secs, on_tick }, Cursor::Custom { elapsed }) => {
            if *secs <= 0.0 {
                on_tick(entity, 0.0);
                return Progress::Done { leftover: dt };
            }
            *elapsed += dt;
            let clamped = elapsed.min(*secs);
            on_tick(entity, clamped);
            if *elapsed >= *secs {
                Progress::Done {
                    leftover: *elapsed - *secs,
                }
            } else {
                Progress::Running
            }
        }

        // Template and cursor are built together; a shape mismatch cannot
        // arise from the public API. Absorb rather than panic.
        _ => Progress::Done { leftover: dt },
    }
}

/// A live execution of an `Action` template against one entity
pub struct ActionRun {
    template: Action,
    cursor: Cursor,
}

impl ActionRun {
    pub fn new(template: Action) -> Self {
        let cursor = Cursor::for_action(&template);
        Self { template, cursor }
    }

    /// Advance by `dt` seconds; returns true when the run has completed
    pub fn tick(&mut self, entity: &mut Entity, dt: f32) -> bool {
        matches!(
            advance(&self.template, &mut self.cursor, entity, dt),
            Progress::Done { .. }
        )
    }
}

impl fmt::Debug for ActionRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRun")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}
