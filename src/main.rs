use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use fanfare::color::{Rgb, parse_hex_color};
use fanfare::config::CanvasSize;
use fanfare::emitter::EmitterVariant;
use fanfare::render::TerminalRenderer;
use fanfare::{AnimationState, Config, TriggerPolicy};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Stdout, stdout};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Terminal fireworks that celebrate a perfect score.
///
/// Score results arrive as one JSON object per line, e.g.
/// {"type":"H5P_SCORE_RESULT","score":10,"maxScore":10}, on stdin or from
/// the file or FIFO given with --input. Press 'q', ESC, or Ctrl+C to exit.
#[derive(Parser, Debug)]
#[command(name = "fanfare", version)]
struct Cli {
    /// TOML config file; command line options override it
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Whether a perfect score fires once or keeps fireworks going
    #[arg(long, value_enum)]
    policy: Option<TriggerPolicy>,

    /// Climbing rockets or instant bursts
    #[arg(long, value_enum)]
    variant: Option<EmitterVariant>,

    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = parse_hex_color)]
    bg_color: Option<Rgb>,

    /// Logical canvas size the simulation runs in
    #[arg(long, value_name = "WxH")]
    canvas: Option<CanvasSize>,

    /// Simulation ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for reproducible fireworks
    #[arg(long)]
    seed: Option<u64>,

    /// Read score messages from this file or FIFO instead of stdin ("-")
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write log records to this file. Without it, logging is off while
    /// stderr is the terminal being drawn on.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Returns `None` when records would land on the screen the animation
    /// is drawn on.
    fn logger(&self, stderr_is_terminal: bool) -> Result<Option<env_logger::Logger>> {
        let env = env_logger::Env::default().default_filter_or(self.log_filter());
        let mut builder = env_logger::Builder::from_env(env);
        match &self.log_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating log file {}", path.display()))?;
                builder
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .write_style(env_logger::WriteStyle::Never);
            }
            None if stderr_is_terminal => return Ok(None),
            None => {}
        }
        Ok(Some(builder.build()))
    }

    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(color) = self.bg_color {
            config.background = color;
        }
        if let Some(canvas) = self.canvas {
            config.canvas = canvas;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Forwards input lines to the render loop so every message is applied
/// between ticks, never during one.
fn spawn_input(input: Option<&Path>) -> Result<Option<Receiver<String>>> {
    let file = match input {
        Some(path) if path != Path::new("-") => Some(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        ),
        _ => {
            if io::stdin().is_terminal() {
                log::warn!("stdin is a terminal; pipe score messages in or pass --input");
                return Ok(None);
            }
            None
        }
    };

    let (tx, rx) = crossbeam_channel::unbounded();
    thread::Builder::new()
        .name("score-input".into())
        .spawn(move || {
            let reader: Box<dyn BufRead> = match file {
                Some(file) => Box::new(BufReader::new(file)),
                None => Box::new(io::stdin().lock()),
            };
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::warn!("Failed to read score input: {err}");
                        break;
                    }
                }
            }
            log::debug!("Score input closed");
        })?;

    Ok(Some(rx))
}

fn is_exit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn animate(
    config: &Config,
    messages: Option<Receiver<String>>,
    stdout: &mut BufWriter<Stdout>,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut state = AnimationState::new(config)?;
    let mut renderer =
        TerminalRenderer::new(cols as usize, rows as usize, config.canvas, config.background);
    renderer.paint(&state.frame());
    renderer.present(stdout)?;

    let fixed_dt = 1.0 / config.fps as f32;
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        let mut dirty = false;

        // Nothing to animate while stopped, so wait longer for input
        let timeout = if state.is_looping() { 1 } else { 20 };
        if event::poll(Duration::from_millis(timeout))? {
            match event::read()? {
                Event::Key(key) if is_exit(&key) => break,
                Event::Resize(cols, rows) => {
                    renderer.resize(cols as usize, rows as usize, config.background);
                    renderer.paint(&state.frame());
                    execute!(stdout, Clear(ClearType::All))?;
                    dirty = true;
                }
                _ => {}
            }
        }

        if let Some(rx) = &messages {
            for raw in rx.try_iter() {
                if let Some(frame) = state.handle_message(&raw) {
                    renderer.paint(&frame);
                    dirty = true;
                }
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        if accumulator > fixed_dt * 3.0 {
            accumulator = fixed_dt * 3.0;
        }

        while accumulator >= fixed_dt {
            accumulator -= fixed_dt;
            match state.tick() {
                Some(frame) => {
                    renderer.paint(&frame);
                    dirty = true;
                }
                None => {
                    accumulator = 0.0;
                    break;
                }
            }
        }

        if dirty {
            renderer.present(stdout)?;
        }
    }

    log::info!(
        "Exiting after {} ticks and {} fireworks",
        state.simulation().tick_count(),
        state.simulation().launch_count()
    );
    Ok(())
}

fn run(config: &Config, messages: Option<Receiver<String>>) -> Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = animate(config, messages, &mut stdout);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(logger) = cli.logger(io::stderr().is_terminal())? {
        let max_level = logger.filter();
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(max_level);
    }

    let config = cli.build_config()?;
    log::debug!("Using config {config:?}");

    let messages = spawn_input(cli.input.as_deref())?;
    run(&config, messages)
}
