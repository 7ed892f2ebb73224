mod config;
mod solve_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use logging::{init_logger, LogOptions};
use tracing::info;

use config::Config;
use terminal_output::{note_error, supports_color, StdoutHost};

#[derive(Parser)]
#[command(name = "mathtutor")]
#[command(about = "수학 문제 풀이: explain a photographed math problem with a vision model")]
#[command(version)]
struct Cli {
    /// Chat-completions base URL (overrides MATHTUTOR_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Model identifier (overrides MATHTUTOR_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Write rolling JSON logs here (overrides MATHTUTOR_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Ui,
    /// Solve one picture and print the explanation
    Solve {
        /// png, jpg or jpeg file
        image: PathBuf,

        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Print without ANSI styling
        #[arg(long)]
        plain: bool,
    },
}

impl Cli {
    fn apply(&self, config: Config) -> Config {
        Config {
            api_base: self.api_base.clone().unwrap_or(config.api_base),
            model: self.model.clone().unwrap_or(config.model),
            log_dir: self.log_dir.clone().or(config.log_dir),
            ..config
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.apply(Config::from_env());
    let interactive = !matches!(cli.command, Some(Commands::Solve { .. }));

    // The TUI owns the terminal, so it only logs to file.
    init_logger(&LogOptions {
        level: config.log_level.clone(),
        log_dir: config.log_dir.clone(),
        console: !interactive,
    })?;
    info!(api_base = %config.api_base, model = %config.model, "Starting mathtutor");

    match cli.command {
        None | Some(Commands::Ui) => {
            tui::run_app(tui::TuiConfig {
                api_base: config.api_base,
                model: config.model,
            })
            .await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Solve { image, api_key, plain }) => {
            let color = !plain && supports_color();
            let mut host = StdoutHost::new(std::io::stdout(), color);
            match solve_cmd::run(&config, &image, &api_key, &mut host).await {
                Ok(true) => Ok(ExitCode::SUCCESS),
                Ok(false) => Ok(ExitCode::FAILURE),
                Err(e) => {
                    eprintln!("{}", note_error(&format!("{e:#}"), color));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
