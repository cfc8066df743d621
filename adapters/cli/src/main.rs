#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Raven Hunt experience.

mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use raven_hunt_core::{Event, FrameStatus, Rgba, Viewport};
use raven_hunt_rendering::{FrameInput, FrameOutput, Presentation, RenderingBackend};
use raven_hunt_rendering_macroquad::MacroquadBackend;
use raven_hunt_system_scheduler::{Config as SchedulerConfig, Scheduler};
use raven_hunt_world::query;

use crate::config::FileConfig;

/// Nanoseconds between simulated frames in headless mode.
const HEADLESS_FRAME_NANOS: u64 = 1_000_000_000 / 60;

#[derive(Debug, Parser)]
#[command(name = "raven-hunt", version, about = "Shoot the ravens before one gets away")]
struct CliArgs {
    /// Optional TOML file with [tuning], [window] and [assets] tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for every random roll; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between target spawns.
    #[arg(long, value_name = "MS")]
    spawn_interval_ms: Option<u64>,
    /// Draw placeholder shapes instead of loading sprite assets.
    #[arg(long)]
    no_sprites: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, conflicts_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long)]
    no_vsync: bool,
    /// Run this many frames at 60 Hz without opening a window, then print the score.
    #[arg(long, value_name = "FRAMES")]
    headless_frames: Option<u64>,
}

impl CliArgs {
    fn vsync_override(&self) -> Option<bool> {
        if self.vsync {
            Some(true)
        } else if self.no_vsync {
            Some(false)
        } else {
            None
        }
    }

    /// Folds command-line overrides into the file settings.
    fn apply_to(&self, config: &mut FileConfig) {
        if let Some(interval) = self.spawn_interval_ms {
            config.tuning.spawn_interval_ms = interval;
        }
        if self.no_sprites {
            config.assets.sprites = false;
        }
        if self.show_fps {
            config.window.show_fps = true;
        }
        if let Some(vsync) = self.vsync_override() {
            config.window.vsync = vsync;
        }
    }
}

/// Outcome of a headless session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeadlessSummary {
    frames: u64,
    score: u32,
    finished: bool,
}

/// Entry point for the Raven Hunt command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => FileConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate().context("configuration rejected")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("session seed {seed}");

    let viewport = Viewport::new(config.window.width, config.window.height);
    let mut scheduler = Scheduler::new(SchedulerConfig::new(
        config.tuning.clone(),
        viewport,
        seed,
    ));
    println!("{}", query::welcome_banner(scheduler.world()));

    if let Some(frames) = args.headless_frames {
        let summary = run_headless(&mut scheduler, viewport, frames);
        log::info!(
            "headless session ran {} frames (finished: {})",
            summary.frames,
            summary.finished
        );
        println!("Score: {}", summary.score);
        return Ok(());
    }

    let presentation = Presentation::new(config.window.title.clone(), clear_color(), viewport)
        .context("invalid window configuration")?;
    let backend = MacroquadBackend::new()
        .with_vsync(config.window.vsync)
        .with_show_fps(config.window.show_fps)
        .with_sprite_loading(config.assets.sprites)
        .with_manifest_path(config.assets.manifest.clone());

    let mut events = Vec::new();
    backend.run(presentation, move |input, output| {
        run_frame(&mut scheduler, input, output, &mut events)
    })
}

/// Feeds one frame of input through the scheduler and collects its output.
fn run_frame(
    scheduler: &mut Scheduler,
    input: FrameInput,
    output: &mut FrameOutput,
    events: &mut Vec<Event>,
) -> FrameStatus {
    events.clear();
    scheduler.configure_viewport(input.viewport, events);
    for click in &input.clicks {
        let _ = scheduler.click(click.x.floor() as i32, click.y.floor() as i32, events);
    }

    let status = scheduler.tick(input.timestamp, &mut output.draw_list, events);
    output
        .sound_cues
        .extend(events.iter().filter_map(|event| match event {
            Event::SoundTriggered { cue } => Some(*cue),
            _ => None,
        }));
    status
}

fn run_headless(scheduler: &mut Scheduler, viewport: Viewport, frames: u64) -> HeadlessSummary {
    let mut output = FrameOutput::default();
    let mut events = Vec::new();
    let mut ran = 0;
    let mut finished = false;

    for index in 1..=frames {
        output.reset(viewport);
        let input = FrameInput {
            timestamp: Duration::from_nanos(HEADLESS_FRAME_NANOS.saturating_mul(index)),
            viewport,
            clicks: Vec::new(),
        };
        ran = index;
        if run_frame(scheduler, input, &mut output, &mut events) == FrameStatus::Finished {
            finished = true;
            break;
        }
    }

    HeadlessSummary {
        frames: ran,
        score: query::score(scheduler.world()),
        finished,
    }
}

fn clear_color() -> Rgba {
    Rgba::from_rgb_u8(135, 206, 235)
}
