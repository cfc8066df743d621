use std::time::Duration;

use raven_hunt_core::{Point, Rect, RenderSurface, SoundCue, SpriteKey};

use crate::{Entity, UpdateContext};

/// Frame index after which the burst animation is finished.
const LAST_FRAME: u32 = 5;

/// Timed explosion played where a target was hit.
///
/// Holds no reference to the target it replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct BurstEffect {
    origin: Point,
    size: f32,
    frame: u32,
    since_frame: Duration,
    frame_interval: Duration,
    sound_played: bool,
    marked_for_deletion: bool,
}

impl BurstEffect {
    pub(crate) fn new(origin: Point, size: f32, frame_interval: Duration) -> Self {
        Self {
            origin,
            size,
            frame: 0,
            since_frame: Duration::ZERO,
            frame_interval,
            sound_played: false,
            marked_for_deletion: false,
        }
    }

    /// Top-left corner of the target this burst replaced.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Edge length of the square the animation is drawn into.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Current animation frame.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Destination rectangle, nudged up and left so the blast centres on the target.
    #[must_use]
    pub fn destination(&self) -> Rect {
        let offset = self.size / 4.0;
        Rect::new(
            self.origin.x - offset,
            self.origin.y - offset,
            self.size,
            self.size,
        )
    }
}

impl Entity for BurstEffect {
    fn update(&mut self, dt: Duration, ctx: &mut UpdateContext<'_>) {
        if self.frame == 0 && !self.sound_played {
            self.sound_played = true;
            ctx.play(SoundCue::Burst);
        }

        self.since_frame += dt;
        if self.since_frame > self.frame_interval {
            self.frame += 1;
            self.since_frame = Duration::ZERO;
            if self.frame > LAST_FRAME {
                self.marked_for_deletion = true;
            }
        }
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        let source = SpriteKey::Burst.sheet().source_rect(self.frame);
        surface.blit_sprite(SpriteKey::Burst, source, self.destination());
    }

    fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}
