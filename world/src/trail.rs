use std::time::Duration;

use rand::Rng;
use raven_hunt_core::{IdentityColor, Point, Rect, RenderSurface, Rgba};

use crate::{Entity, UpdateContext};

const RADIUS_GROWTH: f32 = 0.3;
const FADE_MARGIN: f32 = 5.0;
const SCATTER: f32 = 25.0;

/// Short-lived puff emitted behind a flapping target.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailParticle {
    center: Point,
    radius: f32,
    max_radius: f32,
    speed_x: f32,
    color: Rgba,
    marked_for_deletion: bool,
}

impl TrailParticle {
    /// Rolls a particle scattered around the upper-left third of `bounds`.
    pub(crate) fn around(bounds: Rect, identity: IdentityColor, rng: &mut impl Rng) -> Self {
        let size = bounds.width;
        let anchor = size * 0.33;
        let center = Point::new(
            bounds.x + anchor + rng.gen_range(-SCATTER..SCATTER),
            bounds.y + anchor + rng.gen_range(-SCATTER..SCATTER),
        );

        Self {
            center,
            radius: rng.gen::<f32>() * size * 0.1,
            max_radius: rng.gen_range(35.0..55.0),
            speed_x: rng.gen_range(0.5..1.5),
            color: identity.to_rgba(),
            marked_for_deletion: false,
        }
    }

    /// Centre of the particle.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Current radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Radius the particle fades out at.
    #[must_use]
    pub const fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Opacity used when drawing, shrinking as the particle grows.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        (1.0 - self.radius / self.max_radius).clamp(0.0, 1.0)
    }
}

impl Entity for TrailParticle {
    fn update(&mut self, _dt: Duration, _ctx: &mut UpdateContext<'_>) {
        self.center.x += self.speed_x;
        self.radius += RADIUS_GROWTH;
        if self.radius > self.max_radius - FADE_MARGIN {
            self.marked_for_deletion = true;
        }
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill_circle(self.center, self.radius, self.color.with_alpha(self.opacity()));
    }

    fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raven_hunt_core::{TargetId, Tuning, Viewport};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rolled_attributes_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let bounds = Rect::new(300.0, 200.0, 200.0, 140.0);

        for _ in 0..200 {
            let particle =
                TrailParticle::around(bounds, IdentityColor::from_rgb(1, 2, 3), &mut rng);
            assert!((340.0..392.0).contains(&particle.center().x));
            assert!((240.0..292.0).contains(&particle.center().y));
            assert!((0.0..20.0).contains(&particle.radius()));
            assert!((35.0..55.0).contains(&particle.max_radius()));
            assert_eq!(particle.color, Rgba::from_rgb_u8(1, 2, 3));
        }
    }

    #[test]
    fn grows_drifts_and_fades_until_marked() {
        let mut particle = TrailParticle {
            center: Point::new(0.0, 0.0),
            radius: 0.0,
            max_radius: 40.0,
            speed_x: 1.0,
            color: Rgba::WHITE,
            marked_for_deletion: false,
        };
        let tuning = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut emitted = Vec::new();
        let mut escaped: Vec<TargetId> = Vec::new();
        let mut events = Vec::new();
        let mut updates = 0;

        while !particle.is_marked_for_deletion() {
            let mut ctx = UpdateContext::new(
                Viewport::new(10, 10),
                &tuning,
                &mut rng,
                &mut emitted,
                &mut escaped,
                &mut events,
            );
            let before = particle.opacity();
            particle.update(Duration::ZERO, &mut ctx);
            assert!(particle.opacity() < before);
            updates += 1;
        }

        assert_eq!(updates, 117);
        assert!(particle.radius() > 35.0);
        assert!((particle.center().x - 117.0).abs() < 1e-3);
    }
}
