#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame loop orchestration for Raven Hunt.
//!
//! The scheduler owns the simulation state together with the systems that
//! drive it. Each frame it turns a timestamp into a delta, lets the spawner
//! add a target, advances the world, draws the frame, rebuilds the collision
//! index, and purges expired entities. Clicks enter through
//! [`Scheduler::click`] between frames.

mod clock;
mod hud;

use std::time::Duration;

use raven_hunt_core::{Command, Event, FrameStatus, RenderSurface, TargetId, Tuning, Viewport};
use raven_hunt_system_collision::CollisionIndex;
use raven_hunt_system_spawning::{Config as SpawningConfig, Spawning};
use raven_hunt_world::{self as world, query, World};

pub use clock::FrameClock;

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Debug)]
pub struct Config {
    tuning: Tuning,
    viewport: Viewport,
    seed: u64,
}

impl Config {
    /// Creates a configuration from tuning, the initial viewport and a session seed.
    #[must_use]
    pub const fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        Self {
            tuning,
            viewport,
            seed,
        }
    }
}

/// Single-threaded frame loop driving the world, the spawner and the collision index.
#[derive(Debug)]
pub struct Scheduler {
    world: World,
    spawning: Spawning,
    collision: CollisionIndex,
    clock: FrameClock,
    commands: Vec<Command>,
}

impl Scheduler {
    /// Creates a scheduler with an empty world.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let spawning = Spawning::new(SpawningConfig::from_tuning(&config.tuning, config.seed));
        Self {
            world: World::new(config.tuning, config.viewport, config.seed),
            spawning,
            collision: CollisionIndex::for_viewport(config.viewport),
            clock: FrameClock::new(),
            commands: Vec::new(),
        }
    }

    /// Simulation state driven by this scheduler.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Identity buffer as painted by the most recent frame.
    #[must_use]
    pub fn collision(&self) -> &CollisionIndex {
        &self.collision
    }

    /// Resizes the play area and the collision buffer when the viewport changes.
    pub fn configure_viewport(&mut self, viewport: Viewport, out_events: &mut Vec<Event>) {
        if viewport == query::viewport(&self.world) {
            return;
        }
        world::apply(
            &mut self.world,
            Command::ConfigureViewport { viewport },
            out_events,
        );
        self.collision.resize(viewport);
        log::debug!(
            "viewport resized to {}x{}",
            viewport.width(),
            viewport.height()
        );
    }

    /// Runs one frame for the provided display timestamp.
    pub fn tick(
        &mut self,
        timestamp: Duration,
        surface: &mut dyn RenderSurface,
        out_events: &mut Vec<Event>,
    ) -> FrameStatus {
        let dt = self.clock.advance(timestamp);
        self.advance(dt, surface, out_events)
    }

    /// Runs one frame that lasted `dt`.
    ///
    /// Once the session is over nothing is drawn and [`FrameStatus::Finished`]
    /// is returned, leaving the final frame on screen.
    pub fn advance(
        &mut self,
        dt: Duration,
        surface: &mut dyn RenderSurface,
        out_events: &mut Vec<Event>,
    ) -> FrameStatus {
        if query::is_game_over(&self.world) {
            return FrameStatus::Finished;
        }

        surface.clear();

        self.spawning
            .handle(dt, query::session_state(&self.world), &mut self.commands);
        self.commands.push(Command::Tick { dt });
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }

        hud::draw_score(surface, query::score(&self.world));
        for entity in query::live_entities(&self.world) {
            entity.draw(surface);
        }
        self.collision.repaint(&query::target_view(&self.world));

        world::apply(&mut self.world, Command::PurgeExpired, out_events);

        if query::is_game_over(&self.world) {
            hud::draw_game_over(
                surface,
                query::score(&self.world),
                query::viewport(&self.world),
            );
            return FrameStatus::Finished;
        }
        FrameStatus::Running
    }

    /// Resolves a pointer click against the collision index painted by the last frame.
    ///
    /// Returns the target that was hit, if any. Clicks after game over are ignored.
    pub fn click(&mut self, x: i32, y: i32, out_events: &mut Vec<Event>) -> Option<TargetId> {
        if query::is_game_over(&self.world) {
            return None;
        }

        let target = self
            .collision
            .resolve(x, y, &query::target_view(&self.world))?;
        world::apply(&mut self.world, Command::HitTarget { target }, out_events);
        Some(target)
    }
}
