use clap::{ArgAction, Parser, Subcommand};
use commands::{auth, config, daemon, refresh, run, Context};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reclaimarr")]
#[command(about = "Reclaimarr - Delete watched temporary media from Sonarr and Radarr")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize reclaimarr with Trakt
    #[command(long_about = "Print the Trakt authorization URL, exchange the code you receive for an access token and store it in the credentials file. You'll need a Trakt API application (https://trakt.tv/oauth/applications) first.")]
    Auth {
        /// Authorization code (if not provided, will prompt)
        #[arg(long)]
        code: Option<String>,
    },
    /// Refresh the stored Trakt access token now
    Refresh,
    /// Run a single cleanup pass
    #[command(long_about = "Fetch the Trakt watch history, keep titles watched inside the configured window, and delete those tagged temporary in Sonarr or Radarr.")]
    Run {
        /// Log what would be deleted without deleting anything
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Run cleanup and token refresh on a schedule until interrupted
    #[command(long_about = "Run reclaimarr in the foreground with an internal scheduler. Cleanup and token refresh run on their own cron schedules and never overlap. A cleanup pass runs on startup unless --no-startup-run is specified.")]
    Daemon {
        /// Skip the cleanup pass on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_run: bool,

        /// Cron expression for cleanup passes (e.g. '0 0 0 * * *')
        #[arg(long, value_name = "SCHEDULE")]
        cleanup_schedule: Option<String>,

        /// Cron expression for token refresh checks
        #[arg(long, value_name = "SCHEDULE")]
        refresh_schedule: Option<String>,

        /// Write logs to the daily rotated daemon log file instead of stderr
        #[arg(long, action = ArgAction::SetTrue)]
        log_file: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (masks sensitive data)
    #[command(long_about = "Display the configuration after environment overrides. API keys and secrets are masked. Use --full to show them.")]
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a commented config.toml template
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let ctx = Context::new(cli.config);

    let log_file = match &cli.command {
        Commands::Daemon { log_file: true, .. } => Some(ctx.paths.daemon_log_file()),
        _ => None,
    };
    let verbose = if logging::debug_from_env() { cli.verbose.max(1) } else { cli.verbose };
    logging::init_logging_with_file(verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Auth { code } => auth::run_auth(&ctx, code, &output).await,
        Commands::Refresh => refresh::run_refresh(&ctx, &output).await,
        Commands::Run { dry_run } => run::run_cleanup(&ctx, dry_run, &output).await,
        Commands::Daemon {
            no_startup_run,
            cleanup_schedule,
            refresh_schedule,
            log_file: _,
        } => {
            let options = daemon::DaemonOptions {
                no_startup_run,
                cleanup_schedule,
                refresh_schedule,
            };
            daemon::run_daemon(&ctx, options, &output).await
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show { full } => config::show_config(&ctx, full, &output),
            ConfigCommands::Init { force } => config::init_config(&ctx, force, &output),
        },
    }
}
