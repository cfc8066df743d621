#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Raven Hunt adapters.
//!
//! The simulation draws into a [`DrawList`], which records primitive
//! commands without touching any window. Backends replay the recorded list
//! with whatever graphics library they wrap.

use anyhow::Result as AnyResult;
use glam::Vec2;
use raven_hunt_core::{
    Canvas, FrameStatus, Point, Rect, RenderSurface, Rgba, SoundCue, SpriteKey, TextStyle,
    Viewport,
};
use std::{error::Error, fmt, time::Duration};

/// Primitive drawing operation captured by a [`DrawList`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Resets a region to the presentation's clear colour.
    Clear {
        /// Region to reset.
        region: Rect,
    },
    /// Fills an axis-aligned rectangle.
    FillRect {
        /// Rectangle to fill.
        rect: Rect,
        /// Fill colour.
        color: Rgba,
    },
    /// Fills a circle.
    FillCircle {
        /// Centre of the circle.
        center: Point,
        /// Radius in pixels.
        radius: f32,
        /// Fill colour, possibly translucent.
        color: Rgba,
    },
    /// Copies part of a sprite sheet onto the screen.
    Sprite {
        /// Sheet to sample.
        sprite: SpriteKey,
        /// Region of the sheet to copy.
        source: Rect,
        /// Region of the screen to cover.
        destination: Rect,
    },
    /// Draws one line of text.
    Text {
        /// Text to display.
        text: String,
        /// Baseline anchor.
        position: Point,
        /// Size, colour and alignment.
        style: TextStyle,
    },
}

/// Visible surface that records drawing commands for later replay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list for a surface of the provided size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width(),
            height: viewport.height(),
            commands: Vec::new(),
        }
    }

    /// Drops every recorded command and adopts the provided surface size.
    pub fn reset(&mut self, viewport: Viewport) {
        self.width = viewport.width();
        self.height = viewport.height();
        self.commands.clear();
    }

    /// Commands in the order they were recorded.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Canvas for DrawList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_region(&mut self, region: Rect) {
        self.commands.push(DrawCommand::Clear { region });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }
}

impl RenderSurface for DrawList {
    fn blit_sprite(&mut self, sprite: SpriteKey, source: Rect, destination: Rect) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            source,
            destination,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            style,
        });
    }
}

/// Input snapshot gathered by adapters before running a frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Monotonic time since the backend started.
    pub timestamp: Duration,
    /// Size of the drawable area this frame.
    pub viewport: Viewport,
    /// Pointer clicks latched since the previous frame, oldest first, in viewport pixels.
    pub clicks: Vec<Vec2>,
}

/// Everything a frame produces for the backend to present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Drawing commands for the visible surface.
    pub draw_list: DrawList,
    /// Sound cues triggered during the frame.
    pub sound_cues: Vec<SoundCue>,
}

impl FrameOutput {
    /// Prepares the output for a new frame of the provided size.
    pub fn reset(&mut self, viewport: Viewport) {
        self.draw_list.reset(viewport);
        self.sound_cues.clear();
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid colour used for cleared regions.
    pub clear_color: Rgba,
    /// Initial window size.
    pub viewport: Viewport,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        window_title: T,
        clear_color: Rgba,
        viewport: Viewport,
    ) -> std::result::Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if viewport.is_empty() {
            return Err(RenderingError::EmptyViewport {
                width: viewport.width(),
                height: viewport.height(),
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            viewport,
        })
    }
}

/// Rendering backend capable of presenting Raven Hunt frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `frame` closure is invoked once per display refresh with
    /// the latched input and fills the output with the frame's drawing and
    /// sound cues. Once it reports [`FrameStatus::Finished`] the backend keeps
    /// presenting the last output and stops invoking the closure.
    fn run<F>(self, presentation: Presentation, frame: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut FrameOutput) -> FrameStatus + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The window must have a positive size in both dimensions.
    EmptyViewport {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "window size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
