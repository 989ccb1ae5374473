use anstream::println;
use owo_colors::OwoColorize;
use tracing::{debug, warn};

use super::listing::{self, VersionListing};
use super::{OfflineFallback, OutputFormat, Result, VersionSelector};

impl VersionSelector<'_> {
    /// Answers from the installed versions when the registry cannot be reached.
    pub(super) fn offline_fallback(&self, get_latest: bool) -> Result<OfflineFallback> {
        let installed = self.store.installed_versions()?;

        if get_latest {
            let Some(latest) = installed.first() else {
                warn!("No versions are installed");
                return Ok(OfflineFallback::NothingInstalled);
            };
            let Some(binary) = self.store.install_binary(latest) else {
                return Ok(OfflineFallback::NothingInstalled);
            };
            debug!("Activating newest installed version {latest} ({binary})");
            self.store.write_version(latest)?;
            println!("{} is now your active version", latest.yellow());
            return Ok(OfflineFallback::Activated(latest.clone()));
        }

        let listing = VersionListing::offline(&installed, self.store.active_version());
        match self.output {
            OutputFormat::Json => println!("{}", listing::to_json(&listing)?),
            OutputFormat::Text => {
                println!("{}", "The following versions are available offline:".bold());
                println!();
                listing::print_versions(&listing);
                println!();
            }
        }
        Ok(OfflineFallback::Listed)
    }
}
