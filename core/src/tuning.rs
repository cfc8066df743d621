use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty and feel parameters that can be loaded from configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Milliseconds that must accumulate before another target spawns.
    pub spawn_interval_ms: u64,
    /// Milliseconds each burst animation frame stays on screen.
    pub burst_frame_interval_ms: u64,
    /// Trail particles emitted every time a trail-leaving target flaps.
    pub trail_particles_per_flap: u32,
    /// Probability that a freshly spawned target leaves a trail.
    pub trail_probability: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1_000,
            burst_frame_interval_ms: 200,
            trail_particles_per_flap: 5,
            trail_probability: 0.5,
        }
    }
}

impl Tuning {
    /// Spawn cadence as a duration.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Burst frame cadence as a duration.
    #[must_use]
    pub fn burst_frame_interval(&self) -> Duration {
        Duration::from_millis(self.burst_frame_interval_ms)
    }

    /// Checks that the parameters describe a playable session.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.spawn_interval_ms == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }
        if self.burst_frame_interval_ms == 0 {
            return Err(TuningError::ZeroBurstFrameInterval);
        }
        if !(0.0..=1.0).contains(&self.trail_probability) {
            return Err(TuningError::TrailProbabilityOutOfRange(
                self.trail_probability,
            ));
        }
        Ok(())
    }
}

/// Reasons a [`Tuning`] is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    /// Targets would spawn on every tick.
    #[error("spawn interval must be positive")]
    ZeroSpawnInterval,
    /// Burst animations would finish instantly.
    #[error("burst frame interval must be positive")]
    ZeroBurstFrameInterval,
    /// The trail probability is not a probability.
    #[error("trail probability must lie in 0.0..=1.0 (received {0})")]
    TrailProbabilityOutOfRange(f64),
}
