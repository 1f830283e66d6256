use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

mod app;
mod config;
mod error;
mod events;
mod responses;
mod tui;
mod ui;

use config::Config;
use error::KukanError;
use events::Room;
use ui::conversation::format::{format_content, render_blocks, to_plain_text};

#[derive(Parser)]
#[command(name = "kukan")]
#[command(version)]
#[command(about = "Kukan Home Assistant, a real-estate chat widget for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.kukan/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat widget (default)
    Run(RunArgs),
    /// Print the assistant's reply to a question and exit
    Ask {
        /// The question
        #[arg(required = true)]
        text: Vec<String>,
        /// Wrap width of the printed reply
        #[arg(short, long, default_value_t = 80)]
        width: u16,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Clone, Default)]
struct RunArgs {
    /// Start with only the compact composer
    #[arg(long)]
    minimized: bool,

    /// Room selected on startup
    #[arg(long, value_parser = parse_room)]
    room: Option<Room>,

    /// Delay before replies appear, in milliseconds
    #[arg(long)]
    reply_delay_ms: Option<u64>,

    /// Start with the sample conversation
    #[arg(long)]
    demo: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        config.start_minimized |= self.minimized;
        config.seed_demo |= self.demo;
        if let Some(room) = self.room {
            config.default_room = room;
        }
        if let Some(delay) = self.reply_delay_ms {
            config.reply_delay_ms = delay;
        }
    }
}

fn parse_room(value: &str) -> Result<Room, KukanError> {
    Room::parse_name(value)
}

/// Send tracing output to `path`; the TUI owns stdout and stderr
fn init_file_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Failed to set tracing subscriber")
}

fn init_stderr_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Failed to set tracing subscriber")
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        None => run_widget(&cli, &cli.run).await,
        Some(Commands::Run(ref args)) => run_widget(&cli, args).await,
        Some(Commands::Ask { ref text, width }) => {
            init_stderr_logging(cli.verbose)?;
            let question = text.join(" ");
            let reply = responses::select_response(&question);
            tracing::debug!(topic = ?responses::classify(&question), "canned reply selected");

            let lines = render_blocks(&format_content(reply), width, Default::default());
            println!("{}", to_plain_text(&lines));
            Ok(())
        }
        Some(Commands::Config { ref action }) => {
            init_stderr_logging(cli.verbose)?;
            match action {
                ConfigAction::Show => {
                    let config = load_config(cli.config.as_deref())?;
                    print!("{}", config.to_toml()?);
                }
                ConfigAction::Init { force } => {
                    if config_path.exists() && !force {
                        println!(
                            "Config already exists at {} (use --force to overwrite)",
                            config_path.display()
                        );
                        return Ok(());
                    }
                    Config::default().save(&config_path)?;
                    println!("Wrote default config to {}", config_path.display());
                }
            }
            Ok(())
        }
    }
}

async fn run_widget(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    init_file_logging(&config.log_file, cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting kukan");

    app::run(config).await
}
