use std::time::Duration;

use proptest::prelude::*;
use raven_hunt_core::{Command, IdentityColor, TargetSpawn, Tuning, Viewport};
use raven_hunt_world::{self as world, query, World};

const HEIGHT: u32 = 600;

fn spawn_strategy() -> impl Strategy<Value = TargetSpawn> {
    (0.4f32..1.0, 3.0f32..7.0, -2.5f32..1.5, 0.0f32..1.0, 50u64..100).prop_map(
        |(scale, speed_x, speed_y, vertical_fraction, flap_ms)| TargetSpawn {
            scale,
            speed_x,
            speed_y,
            vertical_fraction,
            flap_interval: Duration::from_millis(flap_ms),
            identity: IdentityColor::from_rgb(1, 1, 1),
            leaves_trail: false,
        },
    )
}

proptest! {
    #[test]
    fn vertical_position_overshoots_by_at_most_one_step(
        spawn in spawn_strategy(),
        ticks in 1usize..400,
    ) {
        let mut world = World::new(Tuning::default(), Viewport::new(10_000, HEIGHT), 3);
        let mut events = Vec::new();
        world::apply(&mut world, Command::SpawnTarget { spawn }, &mut events);

        let step = spawn.speed_y.abs();
        for _ in 0..ticks {
            world::apply(
                &mut world,
                Command::Tick { dt: Duration::from_millis(16) },
                &mut events,
            );
            let target = &query::targets(&world)[0];
            let bounds = target.bounds();
            let floor = HEIGHT as f32 - bounds.height;

            prop_assert!(bounds.y >= -step - 1e-3, "y={} step={}", bounds.y, step);
            prop_assert!(bounds.y <= floor + step + 1e-3, "y={} floor={}", bounds.y, floor);
            prop_assert_eq!(target.vertical_speed().abs(), step);
        }
    }

    #[test]
    fn horizontal_drift_is_linear_in_ticks(
        spawn in spawn_strategy(),
        ticks in 1usize..200,
    ) {
        let mut world = World::new(Tuning::default(), Viewport::new(10_000, HEIGHT), 9);
        let mut events = Vec::new();
        world::apply(&mut world, Command::SpawnTarget { spawn }, &mut events);

        for _ in 0..ticks {
            world::apply(
                &mut world,
                Command::Tick { dt: Duration::from_millis(33) },
                &mut events,
            );
        }

        let x = query::targets(&world)[0].bounds().x;
        let expected = 10_000.0 - spawn.speed_x * ticks as f32;
        prop_assert!((x - expected).abs() < 1.0, "x={} expected={}", x, expected);
    }
}
