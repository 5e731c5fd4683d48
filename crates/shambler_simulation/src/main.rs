//! Headless симуляция Shambler
//!
//! Запускает Bevy App без рендера: игрок стоит (или держит клавиши из --hold),
//! chasers бегут к нему. Для extended варианта сам отвечает на загрузку модели,
//! как это сделал бы renderer.

use bevy::prelude::*;
use clap::{Parser, ValueEnum};
use shambler_simulation::{
    create_headless_app, log_error, log_info, set_log_level, EntityRegistry, GameConfig, HealthBar,
    KeyChanged, LogLevel, ModelLoadEvent, ModelRequest, SimulationPlugin,
};

/// Имена клипов стандартного skeleton-а
const SKELETON_CLIPS: [&str; 4] = ["Idle", "Run", "Attack", "Death"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    Classic,
    Extended,
}

#[derive(Debug, Parser)]
#[command(name = "shambler_simulation", about = "Headless zombie-chase simulation")]
struct Cli {
    /// Preset (игнорируется, если задан --config)
    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    variant: Variant,

    /// Сколько кадров прогнать
    #[arg(long, default_value_t = 1000)]
    ticks: u32,

    /// JSON config (все поля GameConfig)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Клавиши, зажатые на весь прогон (например "wd" или "w,space")
    #[arg(long, default_value = "")]
    hold: String,

    /// Debug лог (переходы AI, spawn, анимации)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                // Логгер ещё не поднят
                eprintln!("shambler_simulation: {}", err);
                std::process::exit(1);
            }
        },
        None => match cli.variant {
            Variant::Classic => GameConfig::classic(),
            Variant::Extended => GameConfig::extended(),
        },
    };

    let mut app = create_headless_app(config);
    app.add_plugins(SimulationPlugin::default());
    set_log_level(if cli.verbose { LogLevel::Debug } else { LogLevel::Info });

    log_info(&format!(
        "Starting Shambler headless simulation ({:?}, {} ticks)",
        cli.variant, cli.ticks
    ));

    for key in held_keys(&cli.hold) {
        app.world_mut().send_event(KeyChanged::down(key));
    }

    for tick in 0..cli.ticks {
        app.update();
        answer_model_requests(app.world_mut());

        if tick % 100 == 0 {
            report(app.world_mut(), tick);
        }
    }

    log_info("Simulation complete!");
}

/// "wd" → ["w", "d"], "w,space" → ["w", "space"]
fn held_keys(hold: &str) -> Vec<String> {
    if hold.contains(',') {
        hold.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        hold.chars().map(|c| c.to_string()).collect()
    }
}

/// Играем роль renderer-а: каждая pending модель "загружается" мгновенно
fn answer_model_requests(world: &mut World) {
    let mut query = world.query_filtered::<Entity, With<ModelRequest>>();
    let pending: Vec<Entity> = query.iter(world).collect();

    for request in pending {
        world.send_event(ModelLoadEvent::Loaded {
            request,
            clip_names: SKELETON_CLIPS.iter().map(|name| name.to_string()).collect(),
        });
    }
}

fn report(world: &mut World, tick: u32) {
    let chasers = world.resource::<EntityRegistry>().len();
    let bar = *world.resource::<HealthBar>();

    let mut players = world.query_filtered::<&Transform, With<shambler_simulation::Player>>();
    match players.single(world) {
        Ok(transform) => log_info(&format!(
            "Tick {}: {} chasers, player at {:.2?}, health {:.1}%, resets {}",
            tick, chasers, transform.translation, bar.width_percent, bar.resets
        )),
        Err(err) => log_error(&format!("Tick {}: no player ({})", tick, err)),
    }
}
