use std::time::Duration;

use raven_hunt_core::{
    IdentityColor, Rect, RenderSurface, SoundCue, SpriteKey, TargetId, TargetSpawn, Viewport,
};

use crate::{Entity, TrailParticle, UpdateContext};

/// Highest animation frame index that still advances; the next flap wraps to zero.
const MAX_FRAME: u32 = 4;

/// Flying collectible the player tries to click.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    id: TargetId,
    bounds: Rect,
    speed_x: f32,
    speed_y: f32,
    frame: u32,
    since_flap: Duration,
    flap_interval: Duration,
    identity: IdentityColor,
    leaves_trail: bool,
    marked_for_deletion: bool,
}

impl Target {
    /// Places a freshly rolled target at the right edge of the viewport.
    pub(crate) fn spawn(id: TargetId, spawn: &TargetSpawn, viewport: Viewport) -> Self {
        let sheet = SpriteKey::Target.sheet();
        let width = sheet.frame_width() * spawn.scale;
        let height = sheet.frame_height() * spawn.scale;
        let free_space = (viewport.height() as f32 - height).max(0.0);
        let y = spawn.vertical_fraction.clamp(0.0, 1.0) * free_space;

        Self {
            id,
            bounds: Rect::new(viewport.width() as f32, y, width, height),
            speed_x: spawn.speed_x,
            speed_y: spawn.speed_y,
            frame: 0,
            since_flap: Duration::ZERO,
            flap_interval: spawn.flap_interval,
            identity: spawn.identity,
            leaves_trail: spawn.leaves_trail,
            marked_for_deletion: false,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> TargetId {
        self.id
    }

    /// Current bounding box in viewport space.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Colour the target is stamped with on the collision surface.
    #[must_use]
    pub const fn identity(&self) -> IdentityColor {
        self.identity
    }

    /// Current wing-flap animation frame.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Pixels travelled upwards per tick; negative values move downwards.
    #[must_use]
    pub const fn vertical_speed(&self) -> f32 {
        self.speed_y
    }

    /// Marks the target for deletion, returning `false` if it already was.
    pub(crate) fn mark_for_deletion(&mut self) -> bool {
        !std::mem::replace(&mut self.marked_for_deletion, true)
    }

    fn advance_frame(&mut self, ctx: &mut UpdateContext<'_>) {
        self.frame = if self.frame > MAX_FRAME {
            0
        } else {
            self.frame + 1
        };
        self.since_flap = Duration::ZERO;

        if self.leaves_trail {
            for _ in 0..ctx.tuning.trail_particles_per_flap {
                let particle = TrailParticle::around(self.bounds, self.identity, &mut *ctx.rng);
                ctx.emitted.push(particle);
            }
        }
    }
}

impl Entity for Target {
    fn update(&mut self, dt: Duration, ctx: &mut UpdateContext<'_>) {
        self.bounds.x -= self.speed_x;

        // Flip first, then move with the flipped velocity: an overshoot is
        // corrected on the following tick.
        let floor = ctx.viewport.height() as f32 - self.bounds.height;
        if self.bounds.y < 0.0 || self.bounds.y > floor {
            self.speed_y = -self.speed_y;
        }
        self.bounds.y -= self.speed_y;

        self.since_flap += dt;
        if self.since_flap > self.flap_interval {
            self.advance_frame(ctx);
        }

        if self.bounds.x < -self.bounds.width && self.mark_for_deletion() {
            ctx.play(SoundCue::GameOver);
            ctx.report_escape(self.id);
        }
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        let source = SpriteKey::Target.sheet().source_rect(self.frame);
        surface.blit_sprite(SpriteKey::Target, source, self.bounds);
    }

    fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}
