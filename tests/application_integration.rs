//! Application host: layers, scripted input and scene persistence.

use std::path::PathBuf;

use serde_json::{Value, json};

use behaviourengine::app::Application;
use behaviourengine::components::behaviour::GameComponent;
use behaviourengine::components::movementbehaviour::MovementBehaviour;
use behaviourengine::components::rigidbody::RigidBody;
use behaviourengine::layers::defaultscene::{DefaultSceneLayer, GROUND_NAME, PLAYER_NAME};
use behaviourengine::resources::input::{ButtonState, InputState, Key};
use behaviourengine::resources::rendertuning::{LutSlot, RenderTuning};
use behaviourengine::resources::worldtime::WorldTime;
use behaviourengine::scene::graph::Scene;
use behaviourengine::scene::registry::ComponentRegistry;
use behaviourengine::systems::input::ScriptedInput;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "behaviourengine_app_{}_{}.json",
        tag,
        std::process::id()
    ))
}

fn scripted_app(script: Value) -> Application {
    Application::new()
        .with_input(ScriptedInput::from_json(&script).unwrap())
        .with_layer(DefaultSceneLayer::new())
}

#[test]
fn load_builds_default_scene() {
    let mut app = scripted_app(json!([]));
    app.load(&Value::Null).unwrap();

    assert_eq!(app.layer_names(), vec!["DefaultSceneLayer"]);
    let scene = app.active_scene().unwrap();
    assert_eq!(scene.object_count(), 2);
    assert!(scene.find_object_by_name(GROUND_NAME).is_some());
    let player = scene.find_object_by_name(PLAYER_NAME).unwrap();
    assert!(player.get_component::<MovementBehaviour>().unwrap().is_enabled());
}

#[test]
fn frame_moves_player_from_scripted_input() {
    let mut app = scripted_app(json!([{ "from": 0, "to": 1, "keys": ["D"] }]));
    app.load(&Value::Null).unwrap();

    // Pressed, Down (impulse queued), Released (impulse integrated).
    for _ in 0..3 {
        app.frame(1.0);
    }

    let player = app
        .active_scene()
        .unwrap()
        .find_object_by_name(PLAYER_NAME)
        .unwrap();
    let body = player.get_component::<RigidBody>().unwrap();
    assert!(approx_eq(body.velocity.x, 0.05));
    assert!(approx_eq(player.position.x, 0.05));
    assert!(approx_eq(player.position.z, 1.0));
    assert_eq!(
        app.world().resource::<InputState>().key_state(Key::D),
        ButtonState::Released
    );
    assert_eq!(app.world().resource::<WorldTime>().frame_count, 3);
}

#[test]
fn number_keys_toggle_render_tuning_once_per_press() {
    let mut app = scripted_app(json!([
        { "from": 0, "to": 3, "keys": ["Num2"] },
        { "from": 1, "to": 1, "keys": ["Num4"] }
    ]));
    app.load(&json!({ "luts": { "cool": "luts/cool.cube" } })).unwrap();

    for _ in 0..5 {
        app.frame(0.016);
    }

    let tuning = app.world().resource::<RenderTuning>();
    assert!(tuning.cool_enabled);
    assert!(tuning.diffuse_wrap_enabled);
    assert!(!tuning.specular_wrap_enabled);
    assert_eq!(tuning.active_lut(), Some(LutSlot::Cool));
    assert_eq!(
        tuning.active_lut_path(),
        Some(&PathBuf::from("luts/cool.cube"))
    );
}

#[test]
fn saved_scene_reloads_through_layer_config() {
    let path = temp_path("reload");

    let mut first = scripted_app(json!([{ "from": 0, "to": 1, "keys": ["W"] }]));
    first.load(&Value::Null).unwrap();
    first
        .active_scene_mut()
        .unwrap()
        .find_object_by_name_mut(PLAYER_NAME)
        .unwrap()
        .get_component_mut::<MovementBehaviour>()
        .unwrap()
        .set_speed(0.5);
    for _ in 0..3 {
        first.frame(0.016);
    }
    let saved = first.active_scene().unwrap();
    saved.save_to_file(&path).unwrap();

    let mut second = scripted_app(json!([]));
    second.load(&json!({ "scene_path": path })).unwrap();
    std::fs::remove_file(&path).ok();

    let reloaded = second.active_scene().unwrap();
    assert_eq!(
        reloaded.to_json().unwrap(),
        first.active_scene().unwrap().to_json().unwrap()
    );
    let player = reloaded.find_object_by_name(PLAYER_NAME).unwrap();
    assert_eq!(player.get_component::<MovementBehaviour>().unwrap().speed(), 0.5);
    // Runtime state is not serialized.
    assert_eq!(
        player.get_component::<RigidBody>().unwrap().velocity,
        nalgebra::Vector3::zeros()
    );
}

#[test]
fn load_fails_on_broken_scene_file() {
    let path = temp_path("broken");
    std::fs::write(
        &path,
        json!({
            "name": "Broken",
            "objects": [ { "name": "p", "components": [ { "type": "MovementBehaviour", "data": {} } ] } ]
        })
        .to_string(),
    )
    .unwrap();

    let mut app = scripted_app(json!([]));
    let err = app.load(&json!({ "scene_path": path })).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(err.is_missing_field());
    assert!(app.active_scene().is_none());
}

#[test]
fn frames_before_load_are_harmless() {
    let mut app = Application::new();
    app.frame(0.016);
    assert!(app.active_scene().is_none());
    assert_eq!(app.world().resource::<InputState>().frame(), 1);
}

#[test]
fn registry_resource_is_used_for_scene_files() {
    let path = temp_path("registry");
    let scene = DefaultSceneLayer::create_default_scene();
    scene.save_to_file(&path).unwrap();

    let mut app = scripted_app(json!([]));
    app.world_mut().insert_resource(ComponentRegistry::new());
    let err = app.load(&json!({ "scene_path": path })).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(err.to_string().contains("unknown component type"));

    let reloaded: Scene = {
        let registry = ComponentRegistry::with_builtin();
        Scene::from_json(&scene.to_json().unwrap(), &registry).unwrap()
    };
    assert_eq!(reloaded.object_count(), 2);
}
