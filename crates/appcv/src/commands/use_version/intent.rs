use super::{Error, LATEST, UseArgs};
use crate::store;

/// What a `use` invocation has been asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Activate(String),
    FetchLatestThenActivate,
    RemoveAll,
    RemoveByPattern(String),
    RemoveOne(String),
    ListOrInstall,
}

impl Intent {
    /// Classifies the arguments. `want_version`, when known, overrides the positional
    /// version (including `latest`). Versions that do not name a single directory are
    /// rejected.
    pub fn resolve(args: &UseArgs, want_version: Option<&str>) -> Result<Self, Error> {
        match args.remove.as_deref() {
            Some("all") => return Ok(Self::RemoveAll),
            Some("regex") => {
                return args
                    .version
                    .clone()
                    .map(Self::RemoveByPattern)
                    .ok_or(Error::MissingPattern);
            }
            Some(version) => {
                store::check_version(version)?;
                return Ok(Self::RemoveOne(version.to_owned()));
            }
            None => {}
        }

        let version = match (args.version.as_deref(), want_version) {
            (None, _) => return Ok(Self::ListOrInstall),
            (Some(_), Some(want)) => want,
            (Some(LATEST), None) => return Ok(Self::FetchLatestThenActivate),
            (Some(version), None) => version,
        };
        store::check_version(version)?;
        Ok(Self::Activate(version.to_owned()))
    }
}
