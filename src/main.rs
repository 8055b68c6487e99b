use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;

use av_traffic_sim::render::{AsciiSurface, Surface};
use av_traffic_sim::simulation::{SimulationEngine, Weather, FRAME_DURATION_MS};

#[derive(Parser)]
#[command(name = "av_traffic_sim")]
#[command(about = "Autonomous vehicle traffic simulation with optional UI")]
struct Cli {
    /// Run with the Bevy window viewer
    #[arg(long)]
    ui: bool,

    /// Number of display frames to run in headless mode
    #[arg(long, default_value = "600")]
    frames: u32,

    /// Display refresh rate in frames per second
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Scenario preset to load
    #[arg(long, default_value = "city-intersection")]
    scenario: String,

    /// Weather: clear, rain, fog or snow
    #[arg(long, default_value = "clear")]
    weather: Weather,

    /// Traffic density (1-10); regenerates regular traffic when given
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    density: Option<u32>,

    /// Simulation speed multiplier (0.1-3.0)
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Surface width in logical pixels
    #[arg(long, default_value = "800", value_parser = positive_size)]
    width: f32,

    /// Surface height in logical pixels
    #[arg(long, default_value = "400", value_parser = positive_size)]
    height: f32,

    /// Width of the printed map in characters
    #[arg(long, default_value = "80")]
    columns: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Pace headless frames with the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Hide the AI sensor radius overlay
    #[arg(long)]
    no_sensor_radius: bool,

    /// Hide the AI waypoint markers
    #[arg(long)]
    no_decision_points: bool,

    /// Show the predicted path overlay
    #[arg(long)]
    path_prediction: bool,
}

/// Parse a surface dimension; must be a finite number above zero
fn positive_size(value: &str) -> Result<f32> {
    let size: f32 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a number"))?;
    ensure!(
        size.is_finite() && size > 0.0,
        "size must be greater than zero, got {size}"
    );
    Ok(size)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui();
            return Ok(());
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,av_traffic_sim=info"),
    )
    .init();
    run_headless(&cli)
}

fn configure<S: Surface>(engine: &mut SimulationEngine<S>, cli: &Cli) {
    if cli.scenario != engine.state().scenario {
        engine.load_scenario(&cli.scenario);
    }
    engine.set_weather(cli.weather);
    engine.set_speed(cli.speed);
    if let Some(density) = cli.density {
        engine.set_traffic_density(density);
    }
    if cli.no_sensor_radius {
        engine.toggle_sensor_radius();
    }
    if cli.no_decision_points {
        engine.toggle_decision_points();
    }
    if cli.path_prediction {
        engine.toggle_path_prediction();
    }
}

/// Run the simulation without a window, printing a map every simulated second
fn run_headless(cli: &Cli) -> Result<()> {
    info!("Running traffic simulation in headless mode...");
    info!("Frames: {}, Refresh rate: {} Hz", cli.frames, cli.fps);

    let surface = AsciiSurface::new(cli.width, cli.height, cli.columns);
    let mut engine = match cli.seed {
        Some(seed) => SimulationEngine::with_seed(surface, seed)?,
        None => SimulationEngine::new(surface)?,
    };
    configure(&mut engine, cli);
    if let Some(preset) = engine.state().preset() {
        info!("{}: {}", preset.name(), preset.description());
    }

    info!("Initial state: {}", engine.state().summary());
    engine.draw();
    print_map(&engine);

    let frame_ms = 1000.0 / cli.fps as f64;
    let started = std::time::Instant::now();
    let mut handle = engine.start();

    for frame in 1..=cli.frames {
        let now_ms = if cli.realtime {
            std::thread::sleep(std::time::Duration::from_secs_f64(frame_ms / 1000.0));
            started.elapsed().as_secs_f64() * 1000.0
        } else {
            frame as f64 * frame_ms
        };

        engine.run_frame(handle, now_ms);
        let Some(next) = engine.pending_frame() else {
            break;
        };
        handle = next;

        if frame % cli.fps == 0 {
            info!(
                "--- After frame {} ({:.1}s simulated, {:.0} ticks per frame) ---",
                frame,
                frame as f64 * frame_ms / 1000.0,
                frame_ms / FRAME_DURATION_MS
            );
            info!("{}", engine.state().summary());
            print_map(&engine);
        }
    }

    engine.pause();

    let state = engine.get_state();
    info!("=== SIMULATION COMPLETE ===");
    info!("Frames run: {}", cli.frames);
    info!("Vehicles: {}", state.vehicles.len());
    info!("AI vehicles: {}", state.ai_vehicle_count());
    info!("Near misses: {}", state.metrics.near_misses);
    info!("Average speed: {}", state.metrics.avg_speed);
    info!("Flow rate: {:.0}%", state.metrics.flow_rate);
    info!("Congestion level: {}", state.metrics.congestion_level);
    info!("Success rate: {:.1}%", state.metrics.success_rate);
    Ok(())
}

fn print_map(engine: &SimulationEngine<AsciiSurface>) {
    println!("\n=== World Map ===");
    println!("{}", AsciiSurface::legend());
    println!();
    print!("{}", engine.surface());
    println!();
}

#[cfg(feature = "ui")]
fn run_with_ui() {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting AV Traffic Sim UI...");
    println!();
    println!("Controls:");
    println!("  Space       - Start/pause");
    println!("  R           - Reset");
    println!("  1-4         - Load scenario");
    println!("  W           - Cycle weather");
    println!("  Up/Down     - Traffic density");
    println!("  +/-         - Simulation speed");
    println!("  S/D/P       - Sensor radius / decision points / path prediction");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,av_traffic_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "AV Traffic Sim".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(av_traffic_sim::ui::TrafficSimUIPlugin)
        .run();
}
