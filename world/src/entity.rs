//! Shared entity contract and the per-tick context entities update against.

use std::time::Duration;

use raven_hunt_core::{Event, RenderSurface, SoundCue, TargetId, Tuning, Viewport};
use rand_chacha::ChaCha8Rng;

use crate::TrailParticle;

/// Capability set shared by every simulated entity.
///
/// Entities are owned exclusively by one collection inside the world. Once
/// [`Entity::is_marked_for_deletion`] reports `true` it never reports `false`
/// again and the entity is dropped by the next cleanup pass.
pub trait Entity {
    /// Advances the entity by one tick.
    fn update(&mut self, dt: Duration, ctx: &mut UpdateContext<'_>);

    /// Draws the entity onto the visible surface.
    fn draw(&self, surface: &mut dyn RenderSurface);

    /// Whether the entity is waiting to be purged.
    fn is_marked_for_deletion(&self) -> bool;
}

/// Side channel through which entities affect the rest of the world while updating.
#[derive(Debug)]
pub struct UpdateContext<'a> {
    pub(crate) viewport: Viewport,
    pub(crate) tuning: &'a Tuning,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) emitted: &'a mut Vec<TrailParticle>,
    pub(crate) escaped: &'a mut Vec<TargetId>,
    pub(crate) events: &'a mut Vec<Event>,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(
        viewport: Viewport,
        tuning: &'a Tuning,
        rng: &'a mut ChaCha8Rng,
        emitted: &'a mut Vec<TrailParticle>,
        escaped: &'a mut Vec<TargetId>,
        events: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            viewport,
            tuning,
            rng,
            emitted,
            escaped,
            events,
        }
    }

    pub(crate) fn play(&mut self, cue: SoundCue) {
        self.events.push(Event::SoundTriggered { cue });
    }

    pub(crate) fn report_escape(&mut self, target: TargetId) {
        self.escaped.push(target);
    }
}
