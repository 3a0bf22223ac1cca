//! Integration тесты: ground probe + floor check через Rapier query pipeline
//!
//! Пол — статический Rapier cuboid (верхняя грань на y = 0), GroundTraceWorld
//! в этом App не существует.

use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_rapier3d::prelude::*;
use locomotion_simulation::{
    create_headless_app, spawn_locomotion_character, spawn_static_ground, CharacterBody,
    GroundTraceBackend, GroundTraceWorld, JumpState, Locomotion, LocomotionConfig,
    LocomotionSimulationPlugin, MovementState,
};

const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(1000.0, 50.0, 1000.0);

/// App с Rapier backend + пол + персонаж на позиции `position`
fn setup(position: Vec3) -> (App, Entity) {
    let config = LocomotionConfig::default();
    let mut app = create_headless_app(3);
    app.add_plugins((
        TransformPlugin,
        RapierPhysicsPlugin::<NoUserData>::default(),
        LocomotionSimulationPlugin {
            config: config.clone(),
            ground_trace: GroundTraceBackend::Rapier,
        },
    ));

    let world = app.world_mut();
    let entity = {
        let mut commands = world.commands();
        spawn_static_ground(
            &mut commands,
            Vec3::new(0.0, -GROUND_HALF_EXTENTS.y, 0.0),
            GROUND_HALF_EXTENTS,
        );
        spawn_locomotion_character(&mut commands, position, &config)
    };
    world.flush();

    // Первый update: часы + регистрация коллайдеров в Rapier
    app.update();
    (app, entity)
}

fn locomotion_of(app: &App, entity: Entity) -> &Locomotion {
    app.world()
        .get::<Locomotion>(entity)
        .expect("character has Locomotion")
}

fn body(app: &App, entity: Entity) -> CharacterBody {
    *app.world()
        .get::<CharacterBody>(entity)
        .expect("character has CharacterBody")
}

fn height(app: &App, entity: Entity) -> f32 {
    app.world()
        .get::<Transform>(entity)
        .expect("character has Transform")
        .translation
        .y
}

#[test]
fn test_rapier_backend_has_no_resource_world() {
    let (app, _) = setup(Vec3::new(0.0, 96.0, 0.0));
    assert!(app.world().get_resource::<GroundTraceWorld>().is_none());
}

#[test]
fn test_rapier_fast_fall_lands_high_on_collider() {
    let (mut app, entity) = setup(Vec3::new(0.0, 96.0 + 500.0, 0.0));

    let mut probe_velocity = None;
    for _ in 0..300 {
        app.update();
        let locomotion = locomotion_of(&app, entity);
        if locomotion.jump_state() == JumpState::LandHigh {
            assert_eq!(locomotion.movement_state(), MovementState::InAir);
            probe_velocity = Some(body(&app, entity).velocity.y);
            break;
        }
    }
    let vz = probe_velocity.expect("high landing never detected on the collider");
    assert!(vz < -600.0, "vz = {}", vz);

    for _ in 0..5 {
        app.update();
    }

    // Floor check тем же Rapier миром: стоим на верхней грани cuboid'а
    let locomotion = locomotion_of(&app, entity);
    assert_eq!(locomotion.movement_state(), MovementState::Grounded);
    assert_eq!(locomotion.jump_state(), JumpState::LandHigh);
    assert!(!body(&app, entity).is_falling);
    assert!((height(&app, entity) - 96.0).abs() < 1.0, "y = {}", height(&app, entity));
}

#[test]
fn test_rapier_no_collider_below_keeps_falling() {
    // За краем пола: ни probe, ни floor check ничего не находят
    let (mut app, entity) = setup(Vec3::new(5000.0, 96.0 + 100.0, 0.0));

    for _ in 0..90 {
        app.update();
    }

    let locomotion = locomotion_of(&app, entity);
    assert_eq!(locomotion.movement_state(), MovementState::InAir);
    assert_eq!(locomotion.jump_state(), JumpState::None);
    assert!(body(&app, entity).is_falling);
    assert!(height(&app, entity) < 0.0, "y = {}", height(&app, entity));
}
