use std::time::Duration;

use proptest::prelude::*;
use raven_hunt_core::{Command, IdentityColor, Point, TargetId, TargetSpawn, Tuning, Viewport};
use raven_hunt_system_collision::CollisionIndex;
use raven_hunt_world::{self as world, query, World};

const VIEWPORT: Viewport = Viewport::new(800, 600);

fn spawn(scale: f32, vertical_fraction: f32, identity: IdentityColor) -> TargetSpawn {
    TargetSpawn {
        scale,
        speed_x: 100.0,
        speed_y: 0.0,
        vertical_fraction,
        flap_interval: Duration::from_secs(1),
        identity,
        leaves_trail: false,
    }
}

/// Spawns the targets and advances one tick so they enter the viewport.
fn world_with(spawns: &[TargetSpawn]) -> World {
    let mut world = World::new(Tuning::default(), VIEWPORT, 17);
    let mut events = Vec::new();
    for spawn in spawns {
        world::apply(&mut world, Command::SpawnTarget { spawn: *spawn }, &mut events);
    }
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut events,
    );
    world
}

fn repainted(world: &World) -> CollisionIndex {
    let mut index = CollisionIndex::for_viewport(query::viewport(world));
    index.repaint(&query::target_view(world));
    index
}

#[test]
fn background_clicks_resolve_to_nothing() {
    let world = world_with(&[spawn(0.5, 0.0, IdentityColor::from_rgb(200, 10, 10))]);
    let index = repainted(&world);

    assert_eq!(index.resolve(20, 20, &query::target_view(&world)), None);
    assert_eq!(index.resolve(-5, 20, &query::target_view(&world)), None);
    assert_eq!(index.resolve(20, 10_000, &query::target_view(&world)), None);
}

#[test]
fn clicks_inside_the_painted_box_resolve_to_the_target() {
    let world = world_with(&[spawn(0.5, 0.0, IdentityColor::from_rgb(200, 10, 10))]);
    let index = repainted(&world);
    let bounds = query::targets(&world)[0].bounds();

    let hit = index.resolve(
        bounds.x as i32 + 5,
        bounds.y as i32 + 5,
        &query::target_view(&world),
    );

    assert_eq!(hit, Some(TargetId::new(0)));
}

#[test]
fn front_most_target_wins_in_overlaps() {
    let world = world_with(&[
        spawn(0.8, 0.0, IdentityColor::from_rgb(0, 0, 200)),
        spawn(0.4, 0.0, IdentityColor::from_rgb(0, 200, 0)),
    ]);
    let index = repainted(&world);

    // The small target sits entirely inside the large one, which is painted after it.
    assert_eq!(
        index.resolve(710, 10, &query::target_view(&world)),
        Some(TargetId::new(0))
    );
}

#[test]
fn duplicate_identities_resolve_to_the_first_in_draw_order() {
    let shared = IdentityColor::from_rgb(9, 9, 9);
    let world = world_with(&[spawn(0.8, 1.0, shared), spawn(0.4, 0.0, shared)]);
    let index = repainted(&world);

    // Pixel painted by the large target at the bottom of the viewport.
    assert_eq!(
        index.resolve(750, 500, &query::target_view(&world)),
        Some(TargetId::new(1))
    );
}

#[test]
fn black_identity_never_matches_cleared_background() {
    let world = world_with(&[spawn(0.5, 0.0, IdentityColor::from_rgb(0, 0, 0))]);
    let index = repainted(&world);

    assert_eq!(index.resolve(10, 300, &query::target_view(&world)), None);
    assert_eq!(
        index.resolve(710, 10, &query::target_view(&world)),
        Some(TargetId::new(0))
    );
}

#[test]
fn hit_targets_disappear_from_the_next_repaint() {
    let mut world = world_with(&[spawn(0.5, 0.0, IdentityColor::from_rgb(1, 2, 3))]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::HitTarget {
            target: TargetId::new(0),
        },
        &mut events,
    );

    let index = repainted(&world);

    assert_eq!(index.resolve(710, 10, &query::target_view(&world)), None);
}

proptest! {
    #[test]
    fn resolution_matches_pixel_centre_coverage(
        scale in 0.4f32..1.0,
        fraction in 0.0f32..1.0,
        px in 0i32..800,
        py in 0i32..600,
    ) {
        let world = world_with(&[spawn(scale, fraction, IdentityColor::from_rgb(40, 80, 120))]);
        let index = repainted(&world);
        let bounds = query::targets(&world)[0].bounds();

        let centre = Point::new(px as f32 + 0.5, py as f32 + 0.5);
        let expected = bounds.contains(centre).then_some(TargetId::new(0));

        prop_assert_eq!(index.resolve(px, py, &query::target_view(&world)), expected);
    }
}
