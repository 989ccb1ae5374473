use std::process::ExitCode;

use anstream::ColorChoice;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing::{Level, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

pub mod commands;
pub mod config;
pub mod progress;
pub mod prompt;
pub mod store;

use appcv_client::DEFAULT_REGISTRY_URL;
use commands::install::install;
use commands::use_version::{OutputFormat, UseArgs, UseOutcome, VersionSelector};
use config::Config;
use prompt::TerminalPrompt;

#[derive(Parser)]
#[command(name = "appcv", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global_args: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Directory holding the installed versions
    #[arg(long, global = true, env = "APPCV_INSTALL_DIR")]
    install_dir: Option<Utf8PathBuf>,

    /// Base URL of the version registry
    #[arg(long, global = true, env = "APPCV_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    registry_url: Url,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// When to use colors in output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Activate, install, list or remove versions")]
    Use(UseArgs),
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ConfigError(#[from] config::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    UseError(#[from] commands::use_version::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    InstallError(#[from] commands::install::Error),
}

type Result<T> = miette::Result<T, Error>;

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();

    ColorChoice::from(cli.global_args.color).write_global();
    init_tracing(&cli.global_args.verbose);

    Ok(run(cli).await?)
}

/// Sends log lines through the indicatif writer so they do not tear spinners.
///
/// Verbosity only filters log output. Spinners come from our own spans, whatever the level.
fn init_tracing(verbose: &Verbosity<WarnLevel>) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::builder()
        .with_default_directive(verbose.tracing_level_filter().into())
        .with_env_var("APPCV_LOG")
        .from_env_lossy();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(indicatif_layer.get_stderr_writer())
        .with_target(false)
        .without_time()
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(Targets::new().with_target("appcv", Level::INFO)))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::new(&cli.global_args)?;

    match cli.command {
        Commands::Use(args) => {
            let store = config.store();
            let registry = config.registry()?;
            let prompt = TerminalPrompt;

            let outcome = VersionSelector::new(&store, &registry, &prompt, config.output)
                .run(&args)
                .await?;

            match &outcome {
                UseOutcome::Install(version) => {
                    install(&store, &registry, version).await?;
                }
                UseOutcome::Offline { error, .. } => {
                    warn!("{error} ({})", error.error_code());
                }
                _ => {}
            }

            Ok(ExitCode::from(outcome.exit_status()))
        }
    }
}
