use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use starfall::render::Canvas;
use starfall::schedule::FramePacer;
use starfall::terminal::{Presenter, TerminalSession};
use starfall::threaded::{SharedScene, TickThread};
use starfall::{
    AnimatorConfig, FastRandom, HeadingMode, Rgb, Scene, ShootingStars, SpeedSource, StarPaint,
    Viewport,
};

/// Longest time the event loop blocks before re-checking its schedules.
const MAX_POLL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "starfall", version, about = "Shooting stars in the terminal")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Star color as hex (e.g. 9E00FF).
    #[arg(long)]
    star_color: Option<Rgb>,

    /// Trail color as hex (e.g. 2EB9DF).
    #[arg(long)]
    trail_color: Option<Rgb>,

    /// Background color as hex (e.g. 1a1b26).
    #[arg(long = "bg-color")]
    background: Option<Rgb>,

    #[arg(long)]
    star_width: Option<f32>,

    #[arg(long)]
    star_height: Option<f32>,

    #[arg(long)]
    min_speed: Option<f32>,

    #[arg(long)]
    max_speed: Option<f32>,

    /// Heading of new stars.
    #[arg(long, value_enum)]
    heading: Option<HeadingChoice>,

    /// Bounds of the speed draw.
    #[arg(long, value_enum)]
    speed_source: Option<SpeedChoice>,

    /// Star fill.
    #[arg(long, value_enum)]
    star_paint: Option<PaintChoice>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw twinkling background stars.
    #[arg(long)]
    backdrop: bool,

    /// Run the simulation on its own thread.
    #[arg(long)]
    threaded: bool,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeadingChoice {
    Random,
    Edge,
    WholeRadian,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpeedChoice {
    Fixed,
    Configured,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PaintChoice {
    Solid,
    Hue,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref(), cli.log_level)?;
    let config = build_config(&cli)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing::info!(threaded = cli.threaded, seed = ?config.seed, "starting");
    if cli.threaded {
        run_threaded(config)
    } else {
        run(config)
    }
}

fn init_logging(path: Option<&Path>, level: LogLevel) -> anyhow::Result<()> {
    // Logging to the terminal would draw over the animation.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("create log file '{}'", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::from(level))
        .init();
    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<AnimatorConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AnimatorConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => AnimatorConfig::default(),
    };

    if let Some(c) = cli.star_color {
        cfg.star_color = c;
    }
    if let Some(c) = cli.trail_color {
        cfg.trail_color = c;
    }
    if let Some(c) = cli.background {
        cfg.background = c;
    }
    if let Some(w) = cli.star_width {
        cfg.star_width = w;
    }
    if let Some(h) = cli.star_height {
        cfg.star_height = h;
    }
    if let Some(s) = cli.min_speed {
        cfg.min_speed = s;
    }
    if let Some(s) = cli.max_speed {
        cfg.max_speed = s;
    }
    if let Some(h) = cli.heading {
        cfg.heading = match h {
            HeadingChoice::Random => HeadingMode::Random,
            HeadingChoice::Edge => HeadingMode::Edge,
            HeadingChoice::WholeRadian => HeadingMode::WholeRadian,
        };
    }
    if let Some(s) = cli.speed_source {
        cfg.speed_source = match s {
            SpeedChoice::Fixed => SpeedSource::Fixed,
            SpeedChoice::Configured => SpeedSource::Configured,
        };
    }
    if let Some(p) = cli.star_paint {
        cfg.star_paint = match p {
            PaintChoice::Solid => StarPaint::Solid,
            PaintChoice::Hue => StarPaint::Hue,
        };
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    cfg.backdrop |= cli.backdrop;

    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn open_session() -> anyhow::Result<TerminalSession<BufWriter<Stdout>>> {
    let out = BufWriter::with_capacity(1024 * 64, stdout());
    TerminalSession::enter(out).context("enter terminal session")
}

fn is_quit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && (key.code == KeyCode::Char('q')
            || key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

/// Waits up to `timeout` for input. `Ok(None)` means keep going.
fn next_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout.min(MAX_POLL))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

fn until(deadline: Option<Instant>) -> Duration {
    deadline.map_or(MAX_POLL, |d| d.saturating_duration_since(Instant::now()))
}

fn run(config: AnimatorConfig) -> anyhow::Result<()> {
    let mut session = open_session()?;
    let background = config.background;
    let mut presenter = Presenter::new();

    let mut stars = ShootingStars::from_config(config);
    let mut active = stars.activate(session.viewport()?, Instant::now());

    loop {
        match next_event(until(active.next_deadline()))? {
            Some(Event::Key(key)) if is_quit(&key) => break,
            Some(Event::Resize(cols, rows)) => {
                active.resize(Viewport::from_cells(cols, rows), Instant::now());
                session.clear()?;
            }
            _ => {}
        }

        let pump = active.pump(Instant::now());
        if pump.painted {
            if let Some(surface) = active.surface() {
                presenter.present(surface, background, session.out())?;
            }
        }
    }

    Ok(())
}

fn run_threaded(config: AnimatorConfig) -> anyhow::Result<()> {
    let mut session = open_session()?;
    let mut presenter = Presenter::new();
    let background = config.background;

    let mut canvas = Canvas::from_config(&config, || fastrand::u64(..));
    let scene = SharedScene::new(Scene::from_config(&config));
    scene.set_bounds(canvas.fit(session.viewport()?));

    let ticker = TickThread::spawn(
        scene.clone(),
        FastRandom::from_seed(config.seed),
        config.tick_interval(),
    )
    .context("spawn tick thread")?;
    let mut frames = FramePacer::new(config.frame_interval(), Instant::now());

    loop {
        match next_event(until(Some(frames.next_due())))? {
            Some(Event::Key(key)) if is_quit(&key) => break,
            Some(Event::Resize(cols, rows)) => {
                let viewport = Viewport::from_cells(cols, rows);
                tracing::debug!(width = viewport.width, height = viewport.height, "resize");
                scene.set_bounds(canvas.fit(viewport));
                session.clear()?;
            }
            _ => {}
        }

        if !frames.poll(Instant::now()) {
            continue;
        }
        if canvas.paint(&scene.read()) {
            if let Some(surface) = canvas.surface() {
                presenter.present(surface, background, session.out())?;
            }
        }
    }

    ticker.stop();
    Ok(())
}
