#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Raven Hunt engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Drawing goes through the [`Canvas`] family of
//! traits so the simulation never depends on a concrete window or GPU.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod surface;
mod tuning;

pub use surface::{Canvas, CollisionSurface, RenderSurface, TextAlign, TextStyle};
pub use tuning::{Tuning, TuningError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Raven Hunt.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the visible area that targets fly across.
    ConfigureViewport {
        /// Dimensions of the visible drawing surface in pixels.
        viewport: Viewport,
    },
    /// Requests that a new target enters from the right edge of the viewport.
    SpawnTarget {
        /// Randomised attributes of the target to create.
        spawn: TargetSpawn,
    },
    /// Advances every live entity by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports that the pointer hit the provided target.
    HitTarget {
        /// Identifier of the target resolved from the collision surface.
        target: TargetId,
    },
    /// Drops every entity that was marked for deletion.
    PurgeExpired,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the visible area changed.
    ViewportConfigured {
        /// Viewport that is now active.
        viewport: Viewport,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a target entered the viewport.
    TargetSpawned {
        /// Identifier allocated to the target by the world.
        target: TargetId,
        /// Bounding box the target occupies on arrival.
        bounds: Rect,
        /// Colour the target is stamped with on the collision surface.
        identity: IdentityColor,
    },
    /// Confirms that a pointer click destroyed a target.
    TargetHit {
        /// Identifier of the destroyed target.
        target: TargetId,
        /// Score after the hit was counted.
        score: u32,
    },
    /// Reports that a target crossed the left edge of the viewport.
    TargetEscaped {
        /// Identifier of the target that escaped.
        target: TargetId,
    },
    /// Announces that the session ended.
    GameOver {
        /// Final score of the session.
        score: u32,
    },
    /// Requests playback of a one-shot sound cue.
    SoundTriggered {
        /// Cue that should be played.
        cue: SoundCue,
    },
    /// Summarises a cleanup pass that removed marked entities.
    EntitiesPurged {
        /// Number of targets removed.
        targets: usize,
        /// Number of burst effects removed.
        bursts: usize,
        /// Number of trail particles removed.
        particles: usize,
    },
}

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Targets spawn and move; clicks are resolved.
    #[default]
    Playing,
    /// A target escaped; nothing moves any more.
    GameOver,
}

/// Whether the frame loop should keep scheduling ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FrameStatus {
    /// Request another frame.
    #[default]
    Running,
    /// The session ended; present the last frame and stop ticking.
    Finished,
}

/// Unique identifier assigned to a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new target identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Colour stamped onto the collision surface to identify a target.
///
/// Never shown to the player as-is on the collision surface, although trail
/// particles reuse it as their display tint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl IdentityColor {
    /// Creates a new identity colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns `true` when an RGBA sample carries exactly this colour.
    ///
    /// Only fully opaque samples match, so a cleared pixel never resolves to
    /// a target whose identity happens to be black.
    #[must_use]
    pub const fn matches_sample(&self, sample: [u8; 4]) -> bool {
        sample[3] == u8::MAX
            && sample[0] == self.red
            && sample[1] == self.green
            && sample[2] == self.blue
    }

    /// Opaque display colour with the same channels.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        Rgba::from_rgb_u8(self.red, self.green, self.blue)
    }
}

/// RGBA colour with floating point channels in the range 0.0..=1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel intensity.
    pub red: f32,
    /// Green channel intensity.
    pub green: f32,
    /// Blue channel intensity.
    pub blue: f32,
    /// Alpha channel intensity.
    pub alpha: f32,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new colour from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque colour from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same colour with a replaced alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Quantises the colour into RGBA bytes.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 4] {
        [
            channel_to_byte(self.red),
            channel_to_byte(self.green),
            channel_to_byte(self.blue),
            channel_to_byte(self.alpha),
        ]
    }
}

fn channel_to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Point in viewport space measured in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `true` when the point lies inside the half-open rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Dimensions of the visible drawing surface in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the viewport in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the viewport in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` when either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rectangle covering the whole viewport.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

/// Fully randomised description of a target about to spawn.
///
/// The spawner rolls every attribute; the world turns the description into a
/// positioned entity using the active viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetSpawn {
    /// Multiplier applied to the sprite frame size, in `0.4..1.0`.
    pub scale: f32,
    /// Pixels travelled leftwards per tick.
    pub speed_x: f32,
    /// Pixels travelled vertically per tick; positive values move upwards.
    pub speed_y: f32,
    /// Position of the top edge as a fraction of the free vertical space.
    pub vertical_fraction: f32,
    /// Time between wing-flap animation frames.
    pub flap_interval: Duration,
    /// Colour identifying the target on the collision surface.
    pub identity: IdentityColor,
    /// Whether the target emits trail particles when it flaps.
    pub leaves_trail: bool,
}

/// Sprite sheets known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpriteKey {
    /// Flying target animation.
    Target,
    /// Explosion played when a target is hit.
    Burst,
}

impl SpriteKey {
    /// Every sprite key in canonical load order.
    pub const ALL: [SpriteKey; 2] = [SpriteKey::Target, SpriteKey::Burst];

    /// Layout of the sheet backing this sprite.
    #[must_use]
    pub const fn sheet(self) -> SpriteSheet {
        match self {
            Self::Target => SpriteSheet::new(271.0, 194.0, 6),
            Self::Burst => SpriteSheet::new(200.0, 179.0, 6),
        }
    }
}

/// Horizontal strip of equally sized animation frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSheet {
    frame_width: f32,
    frame_height: f32,
    frames: u32,
}

impl SpriteSheet {
    /// Creates a new sheet layout.
    #[must_use]
    pub const fn new(frame_width: f32, frame_height: f32, frames: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            frames,
        }
    }

    /// Width of a single frame in sheet pixels.
    #[must_use]
    pub const fn frame_width(&self) -> f32 {
        self.frame_width
    }

    /// Height of a single frame in sheet pixels.
    #[must_use]
    pub const fn frame_height(&self) -> f32 {
        self.frame_height
    }

    /// Number of frames laid out horizontally.
    #[must_use]
    pub const fn frames(&self) -> u32 {
        self.frames
    }

    /// Source rectangle of the provided frame within the sheet.
    #[must_use]
    pub fn source_rect(&self, frame: u32) -> Rect {
        Rect::new(
            frame as f32 * self.frame_width,
            0.0,
            self.frame_width,
            self.frame_height,
        )
    }
}

/// One-shot sound effects triggered by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoundCue {
    /// Played once when a burst effect starts.
    Burst,
    /// Played when a target escapes and the session ends.
    GameOver,
}

impl SoundCue {
    /// Every cue in canonical load order.
    pub const ALL: [SoundCue; 2] = [SoundCue::Burst, SoundCue::GameOver];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_color_survives_byte_quantisation() {
        for value in 0..=u8::MAX {
            let identity = IdentityColor::from_rgb(value, value / 2, 255 - value);
            let bytes = identity.to_rgba().to_bytes();
            assert!(
                identity.matches_sample(bytes),
                "identity {identity:?} quantised to {bytes:?}"
            );
        }
    }

    #[test]
    fn identity_color_ignores_translucent_samples() {
        let identity = IdentityColor::from_rgb(0, 0, 0);

        assert!(!identity.matches_sample([0, 0, 0, 0]));
        assert!(!identity.matches_sample([0, 0, 0, 128]));
        assert!(identity.matches_sample([0, 0, 0, 255]));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 5.0, 4.0);

        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(14.9, 23.9)));
        assert!(!rect.contains(Point::new(15.0, 21.0)));
        assert!(!rect.contains(Point::new(12.0, 24.0)));
        assert!(!rect.contains(Point::new(9.9, 21.0)));
    }

    #[test]
    fn sprite_sheet_frames_are_laid_out_horizontally() {
        let sheet = SpriteKey::Target.sheet();
        let third = sheet.source_rect(2);

        assert_eq!(third, Rect::new(542.0, 0.0, 271.0, 194.0));
        assert_eq!(sheet.frames(), 6);
    }

    #[test]
    fn empty_viewport_is_detected() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(Viewport::new(10, 0).is_empty());
        assert!(!Viewport::new(1, 1).is_empty());
        assert_eq!(Viewport::new(8, 6).bounds(), Rect::new(0.0, 0.0, 8.0, 6.0));
    }
}
