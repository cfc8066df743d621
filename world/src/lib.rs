#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Raven Hunt.
//!
//! The world owns three disjoint entity collections (trail particles,
//! targets, and burst effects), the score, and the session state. It is only
//! mutated through [`apply`]; everything else reads it through [`query`].

mod burst;
mod entity;
mod target;
mod trail;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raven_hunt_core::{
    Command, Event, Point, SessionState, TargetId, TargetSpawn, Tuning, Viewport, WELCOME_BANNER,
};

pub use burst::BurstEffect;
pub use entity::{Entity, UpdateContext};
pub use target::Target;
pub use trail::TrailParticle;

/// Mixed into the session seed so particle rolls do not mirror spawner rolls.
const PARTICLE_STREAM: u64 = 0x7a11_9a57_1c1e_5eed;

/// Represents the authoritative Raven Hunt world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    viewport: Viewport,
    particles: Vec<TrailParticle>,
    targets: Vec<Target>,
    bursts: Vec<BurstEffect>,
    score: u32,
    session: SessionState,
    rng: ChaCha8Rng,
    next_target_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world that uses the provided tuning and random seed.
    #[must_use]
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        Self {
            banner: WELCOME_BANNER,
            tuning,
            viewport,
            particles: Vec::new(),
            targets: Vec::new(),
            bursts: Vec::new(),
            score: 0,
            session: SessionState::Playing,
            rng: ChaCha8Rng::seed_from_u64(seed ^ PARTICLE_STREAM),
            next_target_id: 0,
            tick_index: 0,
        }
    }

    fn allocate_target_id(&mut self) -> TargetId {
        let id = TargetId::new(self.next_target_id);
        self.next_target_id = self.next_target_id.wrapping_add(1);
        id
    }

    fn spawn_target(&mut self, spawn: &TargetSpawn, out_events: &mut Vec<Event>) {
        if self.session == SessionState::GameOver || self.viewport.is_empty() {
            return;
        }

        let id = self.allocate_target_id();
        let target = Target::spawn(id, spawn, self.viewport);
        out_events.push(Event::TargetSpawned {
            target: id,
            bounds: target.bounds(),
            identity: target.identity(),
        });
        log::debug!("target {} spawned at {:?}", id.get(), target.bounds());
        self.targets.push(target);

        // Stable sort: smaller (farther) targets are enumerated and drawn first.
        self.targets
            .sort_by(|a, b| a.bounds().width.total_cmp(&b.bounds().width));
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.session == SessionState::GameOver {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let mut emitted = Vec::new();
        let mut escaped = Vec::new();
        let mut ctx = UpdateContext::new(
            self.viewport,
            &self.tuning,
            &mut self.rng,
            &mut emitted,
            &mut escaped,
            out_events,
        );

        for particle in self.particles.iter_mut().filter(|p| !p.is_marked_for_deletion()) {
            particle.update(dt, &mut ctx);
        }
        for target in self.targets.iter_mut().filter(|t| !t.is_marked_for_deletion()) {
            target.update(dt, &mut ctx);
        }
        for burst in self.bursts.iter_mut().filter(|b| !b.is_marked_for_deletion()) {
            burst.update(dt, &mut ctx);
        }

        self.particles.append(&mut emitted);

        if escaped.is_empty() {
            return;
        }
        for target in escaped {
            out_events.push(Event::TargetEscaped { target });
        }
        self.session = SessionState::GameOver;
        out_events.push(Event::GameOver { score: self.score });
        log::info!(
            "target escaped after {} ticks; final score {}",
            self.tick_index,
            self.score
        );
    }

    fn hit_target(&mut self, target_id: TargetId, out_events: &mut Vec<Event>) {
        if self.session == SessionState::GameOver {
            return;
        }

        let Some(target) = self.targets.iter_mut().find(|t| t.id() == target_id) else {
            return;
        };
        if !target.mark_for_deletion() {
            return;
        }

        let bounds = target.bounds();
        self.bursts.push(BurstEffect::new(
            Point::new(bounds.x, bounds.y),
            bounds.width,
            self.tuning.burst_frame_interval(),
        ));
        self.score = self.score.saturating_add(1);
        out_events.push(Event::TargetHit {
            target: target_id,
            score: self.score,
        });
        log::debug!("target {} hit; score {}", target_id.get(), self.score);
    }

    fn purge_expired(&mut self, out_events: &mut Vec<Event>) {
        let before = (self.targets.len(), self.bursts.len(), self.particles.len());
        self.targets.retain(|t| !t.is_marked_for_deletion());
        self.bursts.retain(|b| !b.is_marked_for_deletion());
        self.particles.retain(|p| !p.is_marked_for_deletion());

        let removed = (
            before.0 - self.targets.len(),
            before.1 - self.bursts.len(),
            before.2 - self.particles.len(),
        );
        if removed != (0, 0, 0) {
            out_events.push(Event::EntitiesPurged {
                targets: removed.0,
                bursts: removed.1,
                particles: removed.2,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureViewport { viewport } => {
            world.viewport = viewport;
            out_events.push(Event::ViewportConfigured { viewport });
        }
        Command::SpawnTarget { spawn } => world.spawn_target(&spawn, out_events),
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::HitTarget { target } => world.hit_target(target, out_events),
        Command::PurgeExpired => world.purge_expired(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{BurstEffect, Entity, Target, TrailParticle, World};
    use raven_hunt_core::{IdentityColor, Rect, SessionState, TargetId, Viewport};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Visible area targets fly across.
    #[must_use]
    pub fn viewport(world: &World) -> Viewport {
        world.viewport
    }

    /// Number of targets hit so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current session state.
    #[must_use]
    pub fn session_state(world: &World) -> SessionState {
        world.session
    }

    /// Returns `true` once a target has escaped.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.session == SessionState::GameOver
    }

    /// Number of ticks the world has advanced.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Every target in draw order, including ones awaiting cleanup.
    #[must_use]
    pub fn targets(world: &World) -> &[Target] {
        &world.targets
    }

    /// Every burst effect, including ones awaiting cleanup.
    #[must_use]
    pub fn bursts(world: &World) -> &[BurstEffect] {
        &world.bursts
    }

    /// Every trail particle, including ones awaiting cleanup.
    #[must_use]
    pub fn particles(world: &World) -> &[TrailParticle] {
        &world.particles
    }

    /// Live entities in draw order: particles, then targets, then bursts.
    pub fn live_entities(world: &World) -> impl Iterator<Item = &dyn Entity> + '_ {
        let particles = world.particles.iter().map(|p| p as &dyn Entity);
        let targets = world.targets.iter().map(|t| t as &dyn Entity);
        let bursts = world.bursts.iter().map(|b| b as &dyn Entity);
        particles
            .chain(targets)
            .chain(bursts)
            .filter(|entity| !entity.is_marked_for_deletion())
    }

    /// Captures a read-only view of the live targets in draw order.
    #[must_use]
    pub fn target_view(world: &World) -> TargetView {
        let snapshots = world
            .targets
            .iter()
            .filter(|target| !target.is_marked_for_deletion())
            .map(|target| TargetSnapshot {
                id: target.id(),
                bounds: target.bounds(),
                identity: target.identity(),
            })
            .collect();
        TargetView { snapshots }
    }

    /// Sizes of the three entity collections.
    #[must_use]
    pub fn entity_counts(world: &World) -> EntityCounts {
        EntityCounts {
            targets: world.targets.len(),
            bursts: world.bursts.len(),
            particles: world.particles.len(),
        }
    }

    /// Read-only snapshot of live targets in draw order.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct TargetView {
        snapshots: Vec<TargetSnapshot>,
    }

    impl TargetView {
        /// Iterates the snapshots from back (small) to front (large).
        pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
            self.snapshots.iter()
        }

        /// Number of live targets captured.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Returns `true` when no live target was captured.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// First target in draw order whose identity matches an RGBA sample.
        ///
        /// Translucent samples never match.
        #[must_use]
        pub fn find_by_sample(&self, sample: [u8; 4]) -> Option<&TargetSnapshot> {
            self.snapshots
                .iter()
                .find(|snapshot| snapshot.identity.matches_sample(sample))
        }
    }

    /// Immutable representation of a single target's state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TargetSnapshot {
        /// Identifier allocated to the target.
        pub id: TargetId,
        /// Bounding box at the time of capture.
        pub bounds: Rect,
        /// Colour stamped onto the collision surface.
        pub identity: IdentityColor,
    }

    /// Sizes of the entity collections, marked entries included.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EntityCounts {
        /// Targets currently held.
        pub targets: usize,
        /// Burst effects currently held.
        pub bursts: usize,
        /// Trail particles currently held.
        pub particles: usize,
    }
}
