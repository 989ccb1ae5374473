use std::io;

use anstream::println;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{Instrument, debug};

use appcv_client::{
    DomainError, ErrorCode, FetchError, Registry, RegistryResponse, TransportCode, VersionRecord,
};

use crate::progress;
use crate::prompt::Prompt;
use crate::store::{self, VersionStore};

mod intent;
mod listing;
mod offline;
mod removal;

pub use intent::Intent;
pub use listing::VersionListing;
pub use removal::RemovalReport;

/// The literal positional argument asking for the newest published version.
const LATEST: &str = "latest";

#[derive(Args, Debug, Clone, Default)]
pub struct UseArgs {
    /// Version to activate, `latest`, or the pattern for `--remove regex`
    #[arg(required_if_eq("remove", "regex"))]
    pub version: Option<String>,

    /// Remove `all` versions, versions matching a `regex`, or a single VERSION
    #[arg(short, long, value_name = "all|regex|VERSION")]
    pub remove: Option<String>,

    /// Reinstall a version that is already installed, or remove without asking
    #[arg(short, long)]
    pub force: bool,

    /// Include prerelease versions when listing
    #[arg(long)]
    pub prerelease: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    DomainError(#[from] DomainError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    StoreError(#[from] store::Error),
    #[error("A pattern is required with `--remove regex`")]
    MissingPattern,
    #[error("Invalid version pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Could not read the confirmation")]
    PromptError(#[source] io::Error),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

type Result<T> = miette::Result<T, Error>;

/// What a `use` invocation ended with. `main` maps these to exit codes.
#[derive(Debug, PartialEq)]
pub enum UseOutcome {
    Activated(String),
    /// The version is not installed (or a reinstall was forced).
    Install(String),
    Listed,
    Removed(RemovalReport),
    NoVersionsDeployed,
    /// The registry was unreachable and installed versions were used instead.
    Offline {
        fallback: OfflineFallback,
        error: DomainError,
    },
}

impl UseOutcome {
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::NoVersionsDeployed => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflineFallback {
    Activated(String),
    NothingInstalled,
    Listed,
}

/// Drives a `use` invocation against a version store, a registry and the user.
pub struct VersionSelector<'a> {
    store: &'a dyn VersionStore,
    registry: &'a dyn Registry,
    prompt: &'a dyn Prompt,
    output: OutputFormat,
}

impl<'a> VersionSelector<'a> {
    pub fn new(
        store: &'a dyn VersionStore,
        registry: &'a dyn Registry,
        prompt: &'a dyn Prompt,
        output: OutputFormat,
    ) -> Self {
        Self {
            store,
            registry,
            prompt,
            output,
        }
    }

    pub async fn run(&self, args: &UseArgs) -> Result<UseOutcome> {
        let intent = Intent::resolve(args, None)?;
        self.dispatch(intent, args).await
    }

    async fn dispatch(&self, intent: Intent, args: &UseArgs) -> Result<UseOutcome> {
        debug!("Resolved {args:?} to {intent:?}");

        match intent {
            Intent::Activate(version) => self.activate(&version, args.force),
            Intent::RemoveOne(version) => self.remove_one(&version, args.force),
            Intent::RemoveAll => self.remove_all(args.force),
            Intent::RemoveByPattern(pattern) => self.remove_matching(&pattern, args.force),
            Intent::FetchLatestThenActivate => self.query_registry(args, true).await,
            Intent::ListOrInstall => self.query_registry(args, false).await,
        }
    }

    /// Activates an installed version, or asks for it to be installed.
    fn activate(&self, version: &str, force: bool) -> Result<UseOutcome> {
        match self.store.install_binary(version) {
            Some(binary) if !force => {
                debug!("Activating {version} ({binary})");
                self.store.write_version(version)?;
                println!("{} is now your active version", version.yellow());
                Ok(UseOutcome::Activated(version.to_owned()))
            }
            _ => {
                debug!("Version {version} needs to be installed");
                Ok(UseOutcome::Install(version.to_owned()))
            }
        }
    }

    async fn query_registry(&self, args: &UseArgs, get_latest: bool) -> Result<UseOutcome> {
        let (latest, list) = async {
            let latest = self.registry.latest().await;
            let list = self.registry.list(args.prerelease).await;
            (latest, list)
        }
        .instrument(progress::spinner("Fetching available versions"))
        .await;

        let latest = latest.unwrap_or_else(|err| {
            debug!("Ignoring failed latest version request: {err}");
            None
        });

        let response = match list {
            Ok(Some(response)) => response,
            Ok(None) => return Err(DomainError::bare(ErrorCode::ServerUnavailable).into()),
            Err(FetchError::Domain(err)) => return Err(err.into()),
            Err(FetchError::Transport { code, message }) => {
                let error = DomainError::new(ErrorCode::UseDownload, message);
                return match code.filter(TransportCode::is_offline) {
                    Some(code) => {
                        debug!("Registry unreachable ({code}), using installed versions");
                        let fallback = self.offline_fallback(get_latest)?;
                        Ok(UseOutcome::Offline { fallback, error })
                    }
                    None => Err(error.into()),
                };
            }
        };

        let versions = response.into_versions();
        debug!("Registry returned {} versions", versions.len());
        let latest = find_latest(&versions, latest);

        if get_latest {
            let Some(latest) = latest.filter(|_| !versions.is_empty()) else {
                println!(
                    "{}",
                    "No versions are currently deployed. Please check back in a few minutes.".red()
                );
                return Ok(UseOutcome::NoVersionsDeployed);
            };
            debug!("Latest published version is {latest}");
            let intent = Intent::resolve(args, Some(&latest))?;
            return Box::pin(self.dispatch(intent, args)).await;
        }

        let listing = VersionListing::new(
            versions,
            &self.store.installed_versions()?,
            latest,
            self.store.active_version(),
        );

        match self.output {
            OutputFormat::Json => println!("{}", listing::to_json(&listing)?),
            OutputFormat::Text if listing.versions.is_empty() => {
                println!("No results returned. Make sure you are online.");
            }
            OutputFormat::Text => {
                println!("{}", "The following versions are available:".bold());
                println!();
                listing::print_versions(&listing);
                println!();
            }
        }

        Ok(UseOutcome::Listed)
    }
}

/// The first listed version, unless the latest payload names one.
pub fn find_latest(
    versions: &[VersionRecord],
    latest_payload: Option<RegistryResponse>,
) -> Option<String> {
    let from_payload = latest_payload
        .map(RegistryResponse::into_versions)
        .and_then(|records| records.into_iter().next())
        .map(|record| record.version);

    from_payload.or_else(|| versions.first().map(|record| record.version.clone()))
}
