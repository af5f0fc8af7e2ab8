//! Behaviour engine main entry point.
//!
//! Runs the default scene layer headless for a fixed number of frames:
//!
//! 1. Load `config.ini` (missing file keeps defaults), then apply CLI flags
//! 2. Build the [`Application`] with a scripted or idle input backend
//! 3. Load the layer configuration and the scene
//! 4. Run the frame loop at a fixed timestep, optionally drawing the debug UI
//!    into an offscreen imgui context every frame
//! 5. Optionally save the scene as JSON
//!
//! `--write-config` writes the effective settings (file plus flags) back out
//! as INI so a run can be reproduced with `--config`.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 120 --input-script input.json --save-scene out.json
//! ```

use std::path::{Path, PathBuf};

use behaviourengine::app::Application;
use behaviourengine::layers::defaultscene::{DefaultSceneLayer, PLAYER_NAME};
use behaviourengine::resources::appconfig::{AppConfig, DEFAULT_CONFIG_PATH};
use behaviourengine::systems::input::{IdleInput, ScriptedInput};
use clap::Parser;
use serde_json::Value;

/// Headless runner for the behaviour-component sample scene.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of frames to run.
    #[arg(long)]
    frames: Option<u64>,

    /// JSON configuration for the default scene layer.
    #[arg(long, value_name = "PATH")]
    layer_config: Option<PathBuf>,

    /// JSON input script replayed by the headless input backend.
    #[arg(long, value_name = "PATH")]
    input_script: Option<PathBuf>,

    /// Write the scene to this file after the last frame.
    #[arg(long, value_name = "PATH")]
    save_scene: Option<PathBuf>,

    /// Build an offscreen imgui frame each tick and draw the debug panels.
    #[arg(long)]
    debug_ui: bool,

    /// Write the effective configuration to this INI file before running.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn read_layer_config(path: &Path) -> Result<Value, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read layer config {}: {}", path.display(), e))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse layer config {}: {}", path.display(), e))
}

fn headless_imgui() -> imgui::Context {
    let mut ctx = imgui::Context::create();
    ctx.set_ini_filename(None);
    ctx.io_mut().display_size = [1280.0, 720.0];
    ctx.fonts().build_rgba32_texture();
    ctx
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = AppConfig::new();
    if let Err(e) = config.load_from_file(&cli.config) {
        log::info!("{}; using defaults", e);
    }
    config.apply_overrides(cli.frames, cli.layer_config, cli.input_script, cli.save_scene);
    if let Some(path) = &cli.write_config {
        config.save_to_file(path)?;
    }

    let layer_config = match &config.layer_config {
        Some(path) => read_layer_config(path)?,
        None => Value::Null,
    };

    let app = Application::new().with_layer(DefaultSceneLayer::new());
    let mut app = match &config.input_script {
        Some(path) => app.with_input(ScriptedInput::load_from_file(path).map_err(|e| e.to_string())?),
        None => app.with_input(IdleInput),
    };
    app.load(&layer_config).map_err(|e| e.to_string())?;

    let mut imgui = cli.debug_ui.then(headless_imgui);
    let dt = config.frame_delta();
    log::info!("Running {} frames at dt={:.4}s", config.frames, dt);

    for _ in 0..config.frames {
        app.frame(dt);
        if let Some(ctx) = imgui.as_mut() {
            ctx.io_mut().delta_time = dt.max(f32::EPSILON);
            let ui = ctx.new_frame();
            app.render_imgui(ui);
            ctx.render();
        }
    }

    if let Some(player) = app
        .active_scene()
        .and_then(|scene| scene.find_object_by_name(PLAYER_NAME))
    {
        log::info!(
            "Player at ({:.3}, {:.3}, {:.3})",
            player.position.x,
            player.position.y,
            player.position.z
        );
    }

    if let (Some(path), Some(scene)) = (&config.save_scene, app.active_scene()) {
        scene.save_to_file(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Hello, world! This is the behaviour engine!");

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
