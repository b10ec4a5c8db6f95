//! Command-line interface for the circles utility
//!
//! Renders transition text as a circles-and-arrows picture, prints the
//! parsed machine, or follows a file and redraws as it changes.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::watch::{draw, Watcher};
use circles::core::logging::init_logging;
use circles::live::LiveConfig;
use circles::machine::StateDatabase;
use circles::{CharacterSet, RenderConfig, Size};

/// How often `watch` looks at the file
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Circles - live state machine diagrams from transition text
#[derive(Parser)]
#[command(name = "circles")]
#[command(about = "Render `A->B: name/action` transition text as a circles-and-arrows diagram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Canvas options shared by `render` and `watch`
#[derive(clap::Args, Clone, Copy, Debug, PartialEq)]
pub struct CanvasArgs {
    /// Character set to use for rendering output
    #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
    pub style: StyleChoice,

    /// Canvas width in canvas units (8 per column)
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Canvas height in canvas units (16 per row)
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,
}

impl CanvasArgs {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(self.style.into(), Size::new(self.width, self.height))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render transition text to a picture
    Render {
        /// Input file with one transition per line (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the picture (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        canvas: CanvasArgs,
    },

    /// Print the parsed states and transitions
    Parse {
        /// Input file with one transition per line (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Follow a file and redraw whenever it changes
    Watch {
        /// File to follow
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        canvas: CanvasArgs,

        /// Quiet period after the last change before redrawing
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },
}

/// Supported output character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// Machine summary printed by `parse --json`
#[derive(Debug, Serialize, PartialEq)]
pub struct ParseReport {
    pub states: Vec<String>,
    pub transitions: Vec<TransitionReport>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TransitionReport {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl From<&StateDatabase> for ParseReport {
    fn from(database: &StateDatabase) -> Self {
        Self {
            states: database.states().iter().cloned().collect(),
            transitions: database
                .transitions()
                .iter()
                .map(|t| TransitionReport {
                    from: t.from.clone(),
                    to: t.to.clone(),
                    name: t.name.clone(),
                    action: t.action.clone(),
                })
                .collect(),
        }
    }
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct CirclesApp;

impl CirclesApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("CIRCLES_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("CIRCLES_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Circles v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                output,
                canvas,
            } => self.render_command(input, output, canvas, cli.verbose),
            Commands::Parse { input, json } => self.parse_command(input, json, cli.verbose),
            Commands::Watch {
                input,
                canvas,
                debounce_ms,
            } => self.watch_command(input, canvas, debounce_ms),
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        canvas: CanvasArgs,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let picture = circles::render_with_config(&content, canvas.render_config())?;
        self.write_output(output, &picture)
    }

    /// Handle the parse command
    fn parse_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        let database = circles::parse(&content);

        if verbose {
            eprintln!(
                "Parsed {} states and {} transitions",
                database.state_count(),
                database.transition_count()
            );
        }

        println!("{}", self.format_report(&database, json)?);
        Ok(())
    }

    /// Human-readable or JSON listing of a parsed machine
    pub fn format_report(&self, database: &StateDatabase, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(&ParseReport::from(database))?);
        }

        let mut lines = Vec::with_capacity(database.transition_count() + 4);
        lines.push(format!("States ({}):", database.state_count()));
        lines.extend(database.states().iter().map(|s| format!("  {}", s)));
        lines.push(String::new());
        lines.push(format!("Transitions ({}):", database.transition_count()));
        lines.extend(database.transitions().iter().map(|t| format!("  {}", t)));
        Ok(lines.join("\n"))
    }

    /// Handle the watch command; runs until interrupted
    fn watch_command(&self, input: PathBuf, canvas: CanvasArgs, debounce_ms: u64) -> Result<()> {
        let live = LiveConfig {
            debounce: Duration::from_millis(debounce_ms),
            ..LiveConfig::default()
        };
        let mut watcher = Watcher::new(&input, canvas.render_config(), live)?;
        info!(path = %input.display(), debounce_ms, "Watching file");
        draw(&watcher.frame())?;

        let started = Instant::now();
        loop {
            thread::sleep(POLL_INTERVAL);
            if watcher.check(started.elapsed())? {
                debug!(passes = watcher.diagram().pass_count(), "Redrawing");
                draw(&watcher.frame())?;
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                if content.is_empty() || content.ends_with('\n') {
                    write!(stdout, "{}", content)?;
                } else {
                    writeln!(stdout, "{}", content)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
