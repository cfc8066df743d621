#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Raven Hunt.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere the `audio` feature of this crate is
//! off by default; without it sound cues are only logged.
//!
//! The adapter never inspects the simulation. It replays the [`DrawList`]
//! produced by each frame and feeds latched pointer clicks back in.

#[cfg(feature = "audio")]
mod audio;
mod sprites;

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::Color as MacroquadColor,
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    shapes::{draw_circle, draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use raven_hunt_core::{FrameStatus, Point, Rect, Rgba, SpriteKey, TextAlign, TextStyle, Viewport};
use raven_hunt_rendering::{
    DrawCommand, DrawList, FrameInput, FrameOutput, Presentation, RenderingBackend,
};
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use self::sprites::SpriteAtlas;

/// Latches pointer clicks so they reach the simulation in order, between ticks.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct PointerInputState {
    clicks: Vec<Vec2>,
}

impl PointerInputState {
    /// Returns every latched click, oldest first, and clears the latch so each
    /// click fires only once.
    pub fn take_clicks(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.clicks)
    }

    /// Records a click at the provided viewport position.
    pub fn register_click(&mut self, position: Vec2) {
        self.clicks.push(position);
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: PathBuf::from("assets/manifest.toml"),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite and sound assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the location of the asset manifest.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

/// Timing of a single presented frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames.max(1),
            avg_render: self.render_accum / frames.max(1),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut frame: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut FrameOutput) -> FrameStatus + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            viewport,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(viewport.width()).unwrap_or(i32::MAX),
            window_height: i32::try_from(viewport.height()).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = if load_sprites {
                load_atlas(&manifest_path)
            } else {
                None
            };

            #[cfg(feature = "audio")]
            let sound_bank = match &sprite_atlas {
                Some(atlas) => match audio::SoundBank::load(atlas.sounds()).await {
                    Ok(bank) => bank,
                    Err(error) => {
                        log::warn!("{error:#}; continuing without sound");
                        audio::SoundBank::default()
                    }
                },
                None => audio::SoundBank::default(),
            };
            #[cfg(not(feature = "audio"))]
            report_muted_sounds(sprite_atlas.as_ref());

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut pointer = PointerInputState::default();
            let mut output = FrameOutput::default();
            let mut status = FrameStatus::Running;

            loop {
                if KeyboardShortcuts::poll().quit_requested {
                    break;
                }

                if is_mouse_button_pressed(MouseButton::Left) {
                    let (x, y) = mouse_position();
                    pointer.register_click(Vec2::new(x, y));
                }

                let frame_dt = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let simulation_start = Instant::now();
                let clicks = pointer.take_clicks();
                if status == FrameStatus::Running {
                    let viewport = Viewport::new(
                        macroquad::window::screen_width() as u32,
                        macroquad::window::screen_height() as u32,
                    );
                    output.reset(viewport);
                    let input = FrameInput {
                        timestamp: Duration::from_secs_f64(macroquad::time::get_time().max(0.0)),
                        viewport,
                        clicks,
                    };
                    status = frame(input, &mut output);

                    for cue in &output.sound_cues {
                        #[cfg(feature = "audio")]
                        sound_bank.play(*cue);
                        #[cfg(not(feature = "audio"))]
                        log::debug!("sound cue {cue:?}");
                    }
                    if status == FrameStatus::Finished {
                        log::info!("session over; press Escape or Q to quit");
                    }
                }
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                present(&output.draw_list, background, sprite_atlas.as_ref());
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        log::info!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn load_atlas(manifest_path: &Path) -> Option<SpriteAtlas> {
    match SpriteAtlas::from_manifest_path(manifest_path) {
        Ok(atlas) => Some(atlas),
        Err(error) => {
            log::warn!("{error:#}; drawing placeholder shapes instead of sprites");
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn report_muted_sounds(atlas: Option<&SpriteAtlas>) {
    let listed = atlas.map_or(0, |atlas| atlas.sounds().len());
    log::debug!("audio feature disabled; ignoring {listed} sound entries");
}

fn present(list: &DrawList, background: MacroquadColor, atlas: Option<&SpriteAtlas>) {
    for command in list.commands() {
        match command {
            DrawCommand::Clear { region } => {
                draw_rectangle(region.x, region.y, region.width, region.height, background);
            }
            DrawCommand::FillRect { rect, color } => {
                draw_rectangle(
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    to_macroquad_color(*color),
                );
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => draw_circle(center.x, center.y, *radius, to_macroquad_color(*color)),
            DrawCommand::Sprite {
                sprite,
                source,
                destination,
            } => draw_sprite(atlas, *sprite, *source, *destination),
            DrawCommand::Text {
                text,
                position,
                style,
            } => draw_styled_text(text, *position, *style),
        }
    }
}

fn draw_sprite(atlas: Option<&SpriteAtlas>, sprite: SpriteKey, source: Rect, destination: Rect) {
    if let Some(atlas) = atlas {
        match atlas.draw(sprite, source, destination) {
            Ok(()) => return,
            Err(error) => log::debug!("{error:#}"),
        }
    }
    draw_placeholder(sprite, destination);
}

fn draw_placeholder(sprite: SpriteKey, destination: Rect) {
    let color = to_macroquad_color(placeholder_color(sprite));
    draw_rectangle_lines(
        destination.x,
        destination.y,
        destination.width,
        destination.height,
        2.0,
        color,
    );
    draw_rectangle(
        destination.x,
        destination.y,
        destination.width,
        destination.height,
        to_macroquad_color(placeholder_color(sprite).with_alpha(0.35)),
    );
}

fn placeholder_color(sprite: SpriteKey) -> Rgba {
    match sprite {
        SpriteKey::Target => Rgba::from_rgb_u8(40, 40, 48),
        SpriteKey::Burst => Rgba::from_rgb_u8(242, 140, 40),
    }
}

fn draw_styled_text(text: &str, position: Point, style: TextStyle) {
    let font_size = style.size.round().clamp(1.0, f32::from(u16::MAX)) as u16;
    let width = match style.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => measure_text(text, None, font_size, 1.0).width,
    };
    let x = aligned_x(position.x, width, style.align);
    let _ = draw_text(text, x, position.y, style.size, to_macroquad_color(style.color));
}

fn aligned_x(anchor: f32, text_width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => anchor,
        TextAlign::Center => anchor - text_width / 2.0,
    }
}

fn to_macroquad_color(color: Rgba) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}
