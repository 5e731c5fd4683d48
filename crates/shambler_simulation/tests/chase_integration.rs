//! Integration tests для полного кадра
//!
//! Проверяем:
//! - chaser догоняет игрока → Attack + урон в том же кадре
//! - смерть игрока → ровно один reset
//! - прыжок только с земли, диагональ без нормализации
//! - загрузка модели: success → chaser в registry, failure → body удалён
//! - camera за visual-ом игрока

use approx::assert_relative_eq;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;
use shambler_simulation::registry::{spawn_chaser, spawn_follow_camera, spawn_player};
use shambler_simulation::*;

/// App с полным кадром, но без Startup spawn мира
fn create_chase_app(config: GameConfig) -> App {
    let mut app = create_headless_app(config);
    app.add_plugins(SimulationPlugin {
        populate_world: false,
    });
    app
}

/// Игрок на полу в начале координат
fn spawn_grounded_player(app: &mut App) -> Entity {
    let mut config = app.world().resource::<GameConfig>().clone();
    config.player_start = Vec3::new(0.0, 0.5, 0.0);

    let player = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, &config);
        spawn_follow_camera(&mut commands, &config);
        player
    };
    app.world_mut().flush();
    player
}

fn spawn_test_chaser(app: &mut App, position: Vec3) -> Entity {
    let config = app.world().resource::<GameConfig>().clone();
    let chaser = app
        .world_mut()
        .resource_scope(|world, mut registry: Mut<EntityRegistry>| {
            let mut commands = world.commands();
            spawn_chaser(&mut commands, &mut registry, &config, position)
        });
    app.world_mut().flush();
    chaser
}

fn set_fixed_dt(app: &mut App, dt: f32) {
    app.world_mut().resource_mut::<GameConfig>().fixed_dt = dt;
}

fn press(app: &mut App, keys: &[&str]) {
    for key in keys {
        app.world_mut().send_event(KeyChanged::down(*key));
    }
}

/// Extended числа (threshold 2, speed 2, урон 0.5), но кубы вместо моделей
fn extended_without_models() -> GameConfig {
    GameConfig {
        animations: None,
        ..GameConfig::extended()
    }
}

#[test]
fn test_chaser_closing_distance_flips_to_attack_and_damages() {
    let mut app = create_chase_app(extended_without_models());
    let player = spawn_grounded_player(&mut app);
    let chaser = spawn_test_chaser(&mut app, Vec3::new(10.0, 0.5, 0.0));

    // Кадр 1: далеко, бежим к игроку
    app.update();
    let state = *app.world().get::<BehaviorState>(chaser).unwrap();
    assert_eq!(state.current, Behavior::Approach);
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 100000.0);

    // Кадр 2: один большой step (2 m/s * 4.25 s = 8.5 m) → дистанция 1.5
    set_fixed_dt(&mut app, 4.25);
    app.update();

    let world = app.world();
    let transform = world.get::<Transform>(chaser).unwrap();
    assert_relative_eq!(transform.translation.x, 1.5, epsilon = 1e-4);

    let state = world.get::<BehaviorState>(chaser).unwrap();
    assert_eq!(state.current, Behavior::Attack);
    assert_eq!(state.previous, Some(Behavior::Approach));

    // Урон применён в том же кадре
    let health = world.get::<Health>(player).unwrap();
    assert_relative_eq!(health.current, 100000.0 - 0.5, epsilon = 1e-3);
    assert_eq!(world.resource::<HealthBar>().resets, 0);
}

#[test]
fn test_classic_attack_damps_horizontal_velocity() {
    let mut app = create_chase_app(GameConfig::classic());
    spawn_grounded_player(&mut app);
    let chaser = spawn_test_chaser(&mut app, Vec3::new(1.0, 0.5, 0.0));

    app.update();

    let world = app.world();
    assert_eq!(world.get::<BehaviorState>(chaser).unwrap().current, Behavior::Attack);
    // velocity был 0 → 0 * -0.5 = 0
    assert_eq!(world.get::<PhysicsBody>(chaser).unwrap().velocity.x, 0.0);
    assert_relative_eq!(
        world.resource::<HealthBar>().width_percent,
        (100.0 - 0.2) / 100.0 * 100.0,
        epsilon = 1e-4
    );
}

#[test]
fn test_extended_max_health_resets_exactly_once() {
    let mut app = create_chase_app(GameConfig::extended());
    let player = spawn_grounded_player(&mut app);

    // 200000 * 0.5 = 100000: ноль достигается ровно на последнем delta
    for _ in 0..200_000 {
        app.world_mut().send_event(HealthDelta {
            target: player,
            amount: -0.5,
            source: None,
        });
    }
    app.update();

    let world = app.world();
    let bar = world.resource::<HealthBar>();
    assert_eq!(bar.resets, 1, "один reset, не по одному на каждый delta ниже нуля");
    assert_eq!(world.get::<Health>(player).unwrap().current, 100000.0);
    assert_eq!(
        world.get::<Transform>(player).unwrap().translation,
        GameConfig::extended().respawn_point
    );
}

#[test]
fn test_player_reset_event_names_killer() {
    let mut app = create_chase_app(GameConfig {
        max_health: 0.2,
        ..GameConfig::classic()
    });
    let player = spawn_grounded_player(&mut app);
    let chaser = spawn_test_chaser(&mut app, Vec3::new(0.5, 0.5, 0.0));

    app.update();

    let events = app.world().resource::<Events<PlayerReset>>();
    let mut cursor = events.get_cursor();
    let resets: Vec<_> = cursor.read(events).copied().collect();
    assert_eq!(
        resets,
        vec![PlayerReset {
            player,
            killer: Some(chaser),
        }]
    );
}

#[test]
fn test_jump_only_from_ground() {
    let mut app = create_chase_app(GameConfig::classic());
    let player = spawn_grounded_player(&mut app);
    let jump_impulse = GameConfig::classic().jump_impulse;
    let dt = GameConfig::classic().fixed_dt;
    let gravity = GameConfig::classic().gravity;

    press(&mut app, &["space"]);

    // На земле: impulse применён
    app.update();
    let vy = app.world().get::<PhysicsBody>(player).unwrap().velocity.y;
    assert_relative_eq!(vy, jump_impulse + gravity * dt, epsilon = 1e-4);

    // В воздухе (vy != 0), space всё ещё зажат: impulse НЕ применяется повторно
    app.update();
    let vy_airborne = app.world().get::<PhysicsBody>(player).unwrap().velocity.y;
    assert_relative_eq!(vy_airborne, vy + gravity * dt, epsilon = 1e-4);
    assert!(app.world().get::<Transform>(player).unwrap().translation.y > 0.5);
}

#[test]
fn test_spawned_mid_air_player_cannot_jump() {
    // player_start по умолчанию (0, 2, 0): vy = 0, но высоко
    let mut app = create_chase_app(GameConfig::classic());
    let player = {
        let config = app.world().resource::<GameConfig>().clone();
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, &config)
    };
    app.world_mut().flush();

    press(&mut app, &[" "]);
    app.update();

    let vy = app.world().get::<PhysicsBody>(player).unwrap().velocity.y;
    assert!(vy < 0.0, "в воздухе прыжка нет, только gravity: vy = {}", vy);
}

#[test]
fn test_diagonal_input_is_unnormalized() {
    let mut app = create_chase_app(GameConfig::classic());
    let player = spawn_grounded_player(&mut app);

    press(&mut app, &["w", "d"]);
    app.update();

    let velocity = app.world().get::<PhysicsBody>(player).unwrap().velocity;
    assert_eq!(velocity.x, 7.0);
    assert_eq!(velocity.z, -7.0);
    assert_relative_eq!(
        Vec2::new(velocity.x, velocity.z).length(),
        7.0 * 2f32.sqrt(),
        epsilon = 1e-4
    );

    // a + d одновременно: противоположные клавиши гасят друг друга
    app.world_mut().send_event(KeyChanged::down("a"));
    app.update();
    let velocity = app.world().get::<PhysicsBody>(player).unwrap().velocity;
    assert_eq!(velocity.x, 0.0);
    assert_eq!(velocity.z, -7.0);
}

#[test]
fn test_model_load_success_and_failure() {
    let mut app = create_headless_app(GameConfig::extended());
    app.add_plugins(SimulationPlugin::default());

    // Startup: игрок + 3 pending body
    app.update();

    let mut query = app
        .world_mut()
        .query_filtered::<Entity, With<ModelRequest>>();
    let mut pending: Vec<Entity> = query.iter(app.world()).collect();
    pending.sort_by_key(|entity| entity.index());
    assert_eq!(pending.len(), 3);
    assert!(app.world().resource::<EntityRegistry>().is_empty());

    // AI не трогает pending body
    assert!(app.world().get::<BehaviorState>(pending[0]).is_none());

    app.world_mut().send_event(ModelLoadEvent::Loaded {
        request: pending[0],
        clip_names: ["Armature|Idle", "Armature|Run", "Armature|Attack", "Armature|Death"]
            .iter()
            .map(|name| name.to_string())
            .collect(),
    });
    app.world_mut().send_event(ModelLoadEvent::Failed {
        request: pending[1],
        error: "404".to_string(),
    });
    app.update();

    let world = app.world();
    let registry = world.resource::<EntityRegistry>();
    assert_eq!(registry.iter().copied().collect::<Vec<_>>(), vec![pending[0]]);

    // Загруженный chaser обработан AI уже в этом кадре
    let state = world.get::<BehaviorState>(pending[0]).unwrap();
    assert_eq!(state.current, Behavior::Approach);
    let animator = world.get::<Animator>(pending[0]).unwrap();
    assert_eq!(animator.clips.get(ClipRole::Run), Some("Armature|Run"));
    assert!(world.get::<ModelRequest>(pending[0]).is_none());

    // Failed → body удалён
    assert!(world.get_entity(pending[1]).is_err());

    // Третий всё ещё ждёт
    assert!(world.get::<ModelRequest>(pending[2]).is_some());
}

/// Visual-ы, чей body уже удалён
fn orphan_visuals(app: &mut App) -> usize {
    let mut visuals = app.world_mut().query::<&VisualOf>();
    let owners: Vec<Entity> = visuals.iter(app.world()).map(|visual| visual.0).collect();
    owners
        .into_iter()
        .filter(|owner| app.world().get_entity(*owner).is_err())
        .count()
}

#[test]
fn test_loaded_then_failed_same_frame_keeps_chaser() {
    let mut app = create_chase_app(GameConfig::extended());
    spawn_grounded_player(&mut app);
    let body = spawn_test_chaser(&mut app, Vec3::new(10.0, 0.5, 0.0));

    app.world_mut().send_event(ModelLoadEvent::Loaded {
        request: body,
        clip_names: vec!["Idle".into(), "Run".into()],
    });
    app.world_mut().send_event(ModelLoadEvent::Failed {
        request: body,
        error: "late duplicate".to_string(),
    });
    app.update();

    assert!(app.world().get::<Chaser>(body).is_some(), "первый ответ окончательный");
    assert_eq!(
        app.world().resource::<EntityRegistry>().iter().copied().collect::<Vec<_>>(),
        vec![body]
    );
    assert_eq!(orphan_visuals(&mut app), 0);
}

#[test]
fn test_failed_then_loaded_same_frame_leaves_nothing() {
    let mut app = create_chase_app(GameConfig::extended());
    spawn_grounded_player(&mut app);
    let body = spawn_test_chaser(&mut app, Vec3::new(10.0, 0.5, 0.0));

    app.world_mut().send_event(ModelLoadEvent::Failed {
        request: body,
        error: "404".to_string(),
    });
    app.world_mut().send_event(ModelLoadEvent::Loaded {
        request: body,
        clip_names: vec!["Idle".into()],
    });
    app.update();

    assert!(app.world().get_entity(body).is_err());
    assert!(app.world().resource::<EntityRegistry>().is_empty());
    assert_eq!(orphan_visuals(&mut app), 0);
}

#[test]
fn test_animator_runs_while_chasing() {
    let mut app = create_chase_app(GameConfig::extended());
    spawn_grounded_player(&mut app);
    let chaser = spawn_test_chaser(&mut app, Vec3::new(10.0, 0.5, 0.0));

    app.world_mut().send_event(ModelLoadEvent::Loaded {
        request: chaser,
        clip_names: vec!["Idle".into(), "Run".into(), "Attack".into()],
    });

    // Кадр 1: загрузка → steering (2 m/s) → Animation видит скорость этого кадра
    app.update();

    let animator = app.world().get::<Animator>(chaser).unwrap();
    assert_eq!(animator.current_role(), ClipRole::Run);
    assert!(animator.is_fading());
}

#[test]
fn test_animation_time_follows_frame_time() {
    let mut app = create_chase_app(GameConfig::extended());
    // 100 ms на кадр, независимо от fixed_dt физики
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    spawn_grounded_player(&mut app);
    let chaser = spawn_test_chaser(&mut app, Vec3::new(10.0, 0.5, 0.0));

    app.world_mut().send_event(ModelLoadEvent::Loaded {
        request: chaser,
        clip_names: vec!["Idle".into(), "Run".into()],
    });

    // Кадр 1: Idle → Run стартует, кадры 2-4: fade 0.2 s закончен
    for _ in 0..4 {
        app.update();
    }

    let animator = app.world().get::<Animator>(chaser).unwrap();
    assert_eq!(animator.current_role(), ClipRole::Run);
    assert!(!animator.is_fading());
    assert_relative_eq!(animator.active.time, 0.3, epsilon = 1e-4);
}

#[test]
fn test_camera_follows_player_visual() {
    let mut app = create_chase_app(GameConfig::classic());
    let player = spawn_grounded_player(&mut app);

    press(&mut app, &["d"]);
    for _ in 0..30 {
        app.update();
    }

    let world = app.world();
    let visual = world.get::<HasVisual>(player).unwrap().0;
    let visual_translation = world.get::<Transform>(visual).unwrap().translation;
    let body_translation = world.get::<Transform>(player).unwrap().translation;
    assert_eq!(visual_translation, body_translation);
    assert!(body_translation.x > 3.0);

    let mut cameras = app
        .world_mut()
        .query_filtered::<&Transform, With<FollowCamera>>();
    let camera = cameras.single(app.world()).unwrap();
    let expected = visual_translation + GameConfig::classic().camera_offset;
    assert_relative_eq!(camera.translation.x, expected.x, epsilon = 1e-4);
    assert_relative_eq!(camera.translation.y, expected.y, epsilon = 1e-4);
    assert_relative_eq!(camera.translation.z, expected.z, epsilon = 1e-4);
}

#[test]
fn test_viewport_resize_updates_aspect() {
    let mut app = create_chase_app(GameConfig::classic());
    spawn_grounded_player(&mut app);

    app.world_mut().send_event(ViewportResized {
        width: 1000.0,
        height: 500.0,
    });
    app.update();

    let mut cameras = app.world_mut().query::<&FollowCamera>();
    let camera = cameras.single(app.world()).unwrap();
    assert_eq!(camera.aspect, 2.0);
}
