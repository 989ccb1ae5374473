use anstream::println;
use owo_colors::OwoColorize;
use regex::Regex;
use tracing::{debug, error};

use super::{Error, Result, UseOutcome, VersionSelector};

/// Versions deleted by a removal, and those that could not be.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<String>,
    pub failed: Vec<String>,
}

impl VersionSelector<'_> {
    pub(super) fn remove_one(&self, version: &str, force: bool) -> Result<UseOutcome> {
        let mut report = RemovalReport::default();

        if self.store.install_binary(version).is_none() {
            println!("Version {} does not exist", version.yellow());
            return Ok(UseOutcome::Removed(report));
        }

        if !force {
            let question = format!("Enter '{}' to confirm removal: ", version.cyan());
            let answer = self.prompt.ask(&question).map_err(Error::PromptError)?;
            if answer.trim() != version {
                debug!("Removal of {version} not confirmed");
                return Ok(UseOutcome::Removed(report));
            }
        }

        let active = self.store.active_version();
        self.remove_version(version, active.as_deref(), &mut report);
        Ok(UseOutcome::Removed(report))
    }

    pub(super) fn remove_all(&self, force: bool) -> Result<UseOutcome> {
        let active = self.store.active_version();
        let candidates = removal_candidates(self.store.installed_versions()?, active.as_deref());

        if candidates.is_empty() {
            println!("No versions to remove");
            return Ok(UseOutcome::Removed(RemovalReport::default()));
        }

        if !force {
            let excluding = active
                .as_ref()
                .map(|active| format!(" excluding {active}"))
                .unwrap_or_default();
            println!(
                "{}",
                format!("WARNING! This will permanently remove ALL versions{excluding}:").red()
            );
            if !self.confirm(&candidates)? {
                return Ok(UseOutcome::Removed(RemovalReport::default()));
            }
        }

        Ok(UseOutcome::Removed(
            self.remove_versions(&candidates, active.as_deref()),
        ))
    }

    pub(super) fn remove_matching(&self, pattern: &str, force: bool) -> Result<UseOutcome> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        let candidates = matching_versions(self.store.installed_versions()?, &regex);

        if candidates.is_empty() {
            println!("No installed versions match {}", pattern.yellow());
            return Ok(UseOutcome::Removed(RemovalReport::default()));
        }

        if !force {
            println!("{}", "WARNING! This will permanently remove:".red());
            if !self.confirm(&candidates)? {
                return Ok(UseOutcome::Removed(RemovalReport::default()));
            }
        }

        let active = self.store.active_version();
        Ok(UseOutcome::Removed(
            self.remove_versions(&candidates, active.as_deref()),
        ))
    }

    /// Lists the candidates and asks for a `yes`.
    fn confirm(&self, candidates: &[String]) -> Result<bool> {
        println!();
        for version in candidates {
            println!("  {}", version.cyan());
        }
        println!();

        let question = format!("Enter '{}' to confirm removal: ", "yes".cyan());
        let answer = self.prompt.ask(&question).map_err(Error::PromptError)?;
        let confirmed = matches!(answer.trim(), "yes" | "y");
        if !confirmed {
            debug!("Removal not confirmed");
        }
        Ok(confirmed)
    }

    fn remove_versions(&self, versions: &[String], active: Option<&str>) -> RemovalReport {
        let mut report = RemovalReport::default();
        for version in versions {
            self.remove_version(version, active, &mut report);
        }
        report
    }

    /// Removes one version, clearing the active version first when it is the one
    /// going away. Failures are logged and recorded.
    fn remove_version(&self, version: &str, active: Option<&str>, report: &mut RemovalReport) {
        if self.store.install_binary(version).is_none() {
            debug!("Skipping {version}, it is not installed");
            return;
        }

        println!("Removing version {}", version.cyan());

        if active == Some(version)
            && let Err(err) = self.store.write_version("")
        {
            error!("Could not clear the active version before removing {version}: {err}");
            report.failed.push(version.to_owned());
            return;
        }

        match self.store.remove_version(version) {
            Ok(removal) => {
                println!("{} {version} ({removal})", "Removed".green());
                report.removed.push(version.to_owned());
            }
            Err(err) => {
                error!("{err}");
                report.failed.push(version.to_owned());
            }
        }
    }
}

/// Installed versions other than the active one.
fn removal_candidates(installed: Vec<String>, active: Option<&str>) -> Vec<String> {
    installed
        .into_iter()
        .filter(|version| Some(version.as_str()) != active)
        .collect()
}

/// Installed versions the pattern matches anywhere in.
fn matching_versions(installed: Vec<String>, regex: &Regex) -> Vec<String> {
    installed
        .into_iter()
        .filter(|version| regex.is_match(version))
        .collect()
}
