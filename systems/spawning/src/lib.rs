#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting target spawn commands.

use std::{ops::Range, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raven_hunt_core::{Command, IdentityColor, SessionState, TargetSpawn, Tuning};

const SCALE: Range<f32> = 0.4..1.0;
const HORIZONTAL_SPEED: Range<f32> = 3.0..7.0;
const VERTICAL_SPEED: Range<f32> = -2.5..1.5;
const FLAP_INTERVAL_MS: Range<u64> = 50..100;
/// Identity channels exclude 255.
const IDENTITY_CHANNEL: Range<u8> = 0..255;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    trail_probability: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    ///
    /// Half of the spawned targets leave a trail.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            trail_probability: 0.5,
            rng_seed,
        }
    }

    /// Creates a configuration from validated tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning, rng_seed: u64) -> Self {
        Self {
            spawn_interval: tuning.spawn_interval(),
            trail_probability: sanitise_probability(tuning.trail_probability),
            rng_seed,
        }
    }
}

/// Maps an unvalidated probability into `0.0..=1.0`; NaN falls back to an even split.
fn sanitise_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.5
    } else {
        probability.clamp(0.0, 1.0)
    }
}

/// Pure system that emits at most one spawn command per tick while the session runs.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    trail_probability: f64,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            trail_probability: config.trail_probability,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Time accumulated towards the next spawn.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Advances the spawn accumulator by `dt` and emits a spawn command once it
    /// reaches the interval.
    ///
    /// The accumulator resets to zero on spawn, so overshoot is discarded and
    /// a long frame never produces more than one target.
    pub fn handle(&mut self, dt: Duration, session: SessionState, out: &mut Vec<Command>) {
        if session != SessionState::Playing {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.spawn_interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator < self.spawn_interval {
            return;
        }

        self.accumulator = Duration::ZERO;
        let spawn = self.roll_spawn();
        log::debug!(
            "spawning target at scale {:.2} (trail: {})",
            spawn.scale,
            spawn.leaves_trail
        );
        out.push(Command::SpawnTarget { spawn });
    }

    fn roll_spawn(&mut self) -> TargetSpawn {
        let rng = &mut self.rng;
        TargetSpawn {
            scale: rng.gen_range(SCALE),
            speed_x: rng.gen_range(HORIZONTAL_SPEED),
            speed_y: rng.gen_range(VERTICAL_SPEED),
            vertical_fraction: rng.gen::<f32>(),
            flap_interval: Duration::from_millis(rng.gen_range(FLAP_INTERVAL_MS)),
            identity: IdentityColor::from_rgb(
                rng.gen_range(IDENTITY_CHANNEL),
                rng.gen_range(IDENTITY_CHANNEL),
                rng.gen_range(IDENTITY_CHANNEL),
            ),
            leaves_trail: rng.gen_bool(self.trail_probability),
        }
    }
}
