use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use raven_hunt_core::{Event, FrameStatus, SpriteKey, TargetId, TextAlign, Tuning, Viewport};
use raven_hunt_rendering::{DrawCommand, DrawList};
use raven_hunt_system_scheduler::{Config, Scheduler};
use raven_hunt_world::query;

struct Session {
    scheduler: Scheduler,
    viewport: Viewport,
    now: Duration,
    frame: DrawList,
    events: Vec<Event>,
}

impl Session {
    fn new(viewport: Viewport, spawn_interval_ms: u64, seed: u64) -> Self {
        let tuning = Tuning {
            spawn_interval_ms,
            ..Tuning::default()
        };
        Self {
            scheduler: Scheduler::new(Config::new(tuning, viewport, seed)),
            viewport,
            now: Duration::ZERO,
            frame: DrawList::new(viewport),
            events: Vec::new(),
        }
    }

    fn frame_at(&mut self, timestamp: Duration) -> FrameStatus {
        self.now = timestamp;
        self.frame.reset(self.viewport);
        self.scheduler.tick(timestamp, &mut self.frame, &mut self.events)
    }

    fn step(&mut self, dt_ms: u64) -> FrameStatus {
        self.frame_at(self.now + Duration::from_millis(dt_ms))
    }

    fn click(&mut self, x: i32, y: i32) -> Option<TargetId> {
        self.scheduler.click(x, y, &mut self.events)
    }

    /// Spawns one target on the first frame and lets it fly in for a few frames.
    fn with_visible_target() -> Self {
        let mut session = Self::new(Viewport::new(800, 600), 500, 0xfeed);
        let _ = session.step(500);
        for _ in 0..10 {
            let _ = session.step(16);
        }
        session
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

#[test]
fn spawn_gate_yields_two_targets_after_three_frames() {
    let mut session = Session::new(Viewport::new(800, 600), 500, 1);

    for ms in [0, 500, 1_000] {
        assert_eq!(
            session.frame_at(Duration::from_millis(ms)),
            FrameStatus::Running
        );
    }

    assert_eq!(query::targets(session.scheduler.world()).len(), 2);
}

#[test]
fn long_frame_spawns_a_single_target() {
    let mut session = Session::new(Viewport::new(800, 600), 500, 2);

    let _ = session.step(10_000);

    assert_eq!(query::targets(session.scheduler.world()).len(), 1);
}

#[test]
fn background_click_changes_nothing() {
    let mut session = Session::with_visible_target();
    let events_before = session.events.len();

    assert_eq!(session.click(5, 590), None);

    assert_eq!(query::score(session.scheduler.world()), 0);
    assert!(query::bursts(session.scheduler.world()).is_empty());
    assert_eq!(session.events.len(), events_before);
}

#[test]
fn click_on_painted_target_scores_and_bursts() {
    let mut session = Session::with_visible_target();
    let world = session.scheduler.world();
    assert_eq!(query::targets(world).len(), 1);
    let target = &query::targets(world)[0];
    let (id, bounds) = (target.id(), target.bounds());

    let hit = session.click(bounds.x.ceil() as i32 + 2, bounds.y.ceil() as i32 + 2);

    assert_eq!(hit, Some(id));
    let world = session.scheduler.world();
    assert_eq!(query::score(world), 1);
    assert!(query::target_view(world).is_empty());
    let burst = &query::bursts(world)[0];
    assert_eq!((burst.origin().x, burst.origin().y), (bounds.x, bounds.y));
    assert_eq!(burst.size(), bounds.width);

    assert_eq!(
        session.click(bounds.x.ceil() as i32 + 2, bounds.y.ceil() as i32 + 2),
        None,
        "a hit target cannot be hit again before the next repaint"
    );

    let _ = session.step(16);
    assert!(session.frame.commands().iter().any(|command| matches!(
        command,
        DrawCommand::Sprite {
            sprite: SpriteKey::Burst,
            ..
        }
    )));
    assert!(query::targets(session.scheduler.world()).is_empty());
    assert_eq!(
        session.count(|event| matches!(event, Event::SoundTriggered { .. })),
        1
    );
}

#[test]
fn frame_draws_score_then_particles_targets_and_bursts() {
    let mut session = Session::with_visible_target();

    let commands = session.frame.commands();
    assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    assert!(matches!(
        &commands[1],
        DrawCommand::Text { text, .. } if text == "Score: 0"
    ));
    assert!(matches!(&commands[2], DrawCommand::Text { .. }));

    let first_target = commands
        .iter()
        .position(|command| {
            matches!(
                command,
                DrawCommand::Sprite {
                    sprite: SpriteKey::Target,
                    ..
                }
            )
        })
        .expect("live target is drawn");
    assert!(commands[..first_target]
        .iter()
        .skip(3)
        .all(|command| matches!(command, DrawCommand::FillCircle { .. })));
}

#[test]
fn escaping_target_ends_the_session() {
    let mut session = Session::new(Viewport::new(200, 600), 500, 3);
    let mut frames = 0;
    let _ = session.step(500);

    while session.step(16) == FrameStatus::Running {
        frames += 1;
        assert!(frames < 1_000, "a target should escape");
    }

    let world = session.scheduler.world();
    assert!(query::is_game_over(world));
    assert_eq!(
        session.count(|event| matches!(event, Event::GameOver { .. })),
        1
    );

    let overlay: Vec<_> = session
        .frame
        .commands()
        .iter()
        .rev()
        .take(2)
        .collect();
    for command in overlay {
        match command {
            DrawCommand::Text { text, style, .. } => {
                assert_eq!(text, "Game Over: 0");
                assert_eq!(style.align, TextAlign::Center);
            }
            other => panic!("expected overlay text, found {other:?}"),
        }
    }

    let events_before = session.events.len();
    let targets_before = query::entity_counts(session.scheduler.world());
    assert_eq!(session.step(5_000), FrameStatus::Finished);
    assert!(session.frame.is_empty(), "nothing is drawn after game over");
    assert_eq!(session.click(100, 300), None);
    assert_eq!(session.events.len(), events_before);
    assert_eq!(query::entity_counts(session.scheduler.world()), targets_before);
}

#[test]
fn unvalidated_trail_probability_still_spawns() {
    let viewport = Viewport::new(800, 600);
    let tuning = Tuning {
        spawn_interval_ms: 10,
        trail_probability: f64::NAN,
        ..Tuning::default()
    };
    let mut scheduler = Scheduler::new(Config::new(tuning, viewport, 4));
    let mut frame = DrawList::new(viewport);
    let mut events = Vec::new();

    let status = scheduler.tick(Duration::from_millis(20), &mut frame, &mut events);

    assert_eq!(status, FrameStatus::Running);
    assert_eq!(query::targets(scheduler.world()).len(), 1);
}

#[test]
fn viewport_changes_resize_the_collision_index() {
    let mut session = Session::new(Viewport::new(800, 600), 500, 4);

    session
        .scheduler
        .configure_viewport(Viewport::new(1024, 768), &mut session.events);
    session
        .scheduler
        .configure_viewport(Viewport::new(1024, 768), &mut session.events);

    assert_eq!(
        session.count(|event| matches!(event, Event::ViewportConfigured { .. })),
        1
    );
    let surface = session.scheduler.collision().surface();
    assert_eq!(surface.pixels().len(), 1024 * 768 * 4);
}

fn replay_fingerprint(seed: u64) -> u64 {
    let mut session = Session::new(Viewport::new(640, 480), 300, seed);
    for frame in 0..600u64 {
        if session.step(16) == FrameStatus::Finished {
            break;
        }
        if frame % 7 == 0 {
            let _ = session.click((frame * 37 % 640) as i32, (frame * 53 % 480) as i32);
        }
    }

    let mut hasher = DefaultHasher::new();
    format!("{:?}", session.events).hash(&mut hasher);
    query::score(session.scheduler.world()).hash(&mut hasher);
    hasher.finish()
}

#[test]
fn replays_are_deterministic_for_a_seed() {
    assert_eq!(replay_fingerprint(0x5eed), replay_fingerprint(0x5eed));
    assert_ne!(replay_fingerprint(0x5eed), replay_fingerprint(0x5eee));
}
