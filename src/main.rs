use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use thiserror::Error;

use shape_room::{Demo, RoomConfig};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Walk around a room of random shapes and click them.
#[derive(Debug, Parser)]
#[command(name = "shape-room", version, about)]
struct Cli {
    /// XML room configuration (`<room>...</room>`).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for shape generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of shapes to generate.
    #[arg(long, value_name = "N")]
    shapes: Option<usize>,

    /// Print the generated room and exit without opening a window.
    #[arg(long)]
    summary_only: bool,
}

impl Cli {
    fn load_config(&self) -> Result<RoomConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let xml = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                RoomConfig::from_xml(&xml)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => RoomConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(shapes) = self.shapes {
            config.shape_count = shapes;
        }
        config.validate().context("invalid room configuration")?;
        Ok(config)
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if cli.summary_only {
        return run_headless(config);
    }
    match run_interactive(config.clone()) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            run_headless(config)
        }
        Err(err) => Err(err),
    }
}

fn run_headless(config: RoomConfig) -> Result<()> {
    let seed = config.seed;
    let mut rng = shape_room::seeded_rng(seed);
    let mut demo = Demo::new(config, 16.0 / 9.0, &mut rng);

    match seed {
        Some(seed) => println!(
            "Generated room with {} shapes (seed {seed})",
            demo.scene().shapes.len()
        ),
        None => println!(
            "Generated room with {} shapes (random seed)",
            demo.scene().shapes.len()
        ),
    }
    for line in demo.describe_shapes() {
        println!("{line}");
    }
    let hits = demo.pick(Vec2::ZERO);
    match hits.first() {
        Some(hit) => println!(
            "Center ray from start: hit #{:02} at {:.2}",
            hit.shape + 1,
            hit.distance
        ),
        None => println!("Center ray from start: miss"),
    }
    demo.log_summary();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn run_interactive(config: RoomConfig) -> Result<()> {
    use pollster::block_on;
    use winit::dpi::LogicalSize;
    use winit::event_loop::EventLoop;
    use winit::window::Window;

    use shape_room::{App, Renderer, Scene, TitleHud};

    const TITLE: &str = "Shape Room";

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;

    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(TITLE)
                    .with_inner_size(LogicalSize::new(1280.0, 720.0)),
            )
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let scene = Scene::generate(&config, &mut shape_room::seeded_rng(config.seed));
    let renderer = block_on(Renderer::new(Arc::clone(&window), &scene))?;
    let demo = Demo::with_scene(config, scene, renderer.aspect());
    demo.log_summary();

    let hud = Box::new(TitleHud::new(Arc::clone(&window), TITLE));
    let mut app = App::new(renderer, demo, hud, true);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(err) = app.take_error() {
        return Err(err);
    }
    println!("{}", app.demo().counter().label());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn run_interactive(_config: RoomConfig) -> Result<()> {
    Ok(())
}

#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            stage,
            message: panic_message(panic),
        }
    }

    fn from_error(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}
