//! The install directory: one sub-directory per installed version, plus a
//! `.version` file naming the active one.

use std::cmp::Ordering;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

pub mod removal;

pub use removal::{Removal, rm_rf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Could not list the versions installed in {dir}")]
    ListVersions {
        dir: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not record the active version")]
    WriteVersion(#[source] io::Error),
    #[error("Invalid version {0:?}")]
    #[diagnostic(help("A version names a single directory inside the install directory"))]
    InvalidVersion(String),
    #[error("Could not remove version {version}: {source}")]
    RemoveVersion {
        version: String,
        #[source]
        source: io::Error,
    },
}

type Result<T> = miette::Result<T, Error>;

/// Everything the `use` flow needs to know about locally installed versions.
pub trait VersionStore {
    /// The directory holding one sub-directory per installed version.
    fn install_dir(&self) -> &Utf8Path;

    /// Installed versions, newest first.
    fn installed_versions(&self) -> Result<Vec<String>>;

    /// The executable of `version`, if that version is installed.
    fn install_binary(&self, version: &str) -> Option<Utf8PathBuf>;

    /// The version recorded as active, if any.
    fn active_version(&self) -> Option<String>;

    /// Records `version` as active. An empty string clears the record.
    fn write_version(&self, version: &str) -> Result<()>;

    /// Deletes the directory of `version`.
    fn remove_version(&self, version: &str) -> Result<Removal>;
}

#[derive(Debug, Clone)]
pub struct FsVersionStore {
    install_dir: Utf8PathBuf,
}

impl FsVersionStore {
    pub fn new(install_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }
}

impl VersionStore for FsVersionStore {
    fn install_dir(&self) -> &Utf8Path {
        &self.install_dir
    }

    fn installed_versions(&self) -> Result<Vec<String>> {
        let list_error = |source| Error::ListVersions {
            dir: self.install_dir.clone(),
            source,
        };

        let entries = match fs_err::read_dir(&self.install_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Install directory {} does not exist", self.install_dir);
                return Ok(Vec::new());
            }
            Err(err) => return Err(list_error(err)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(list_error)?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if self.install_binary(&name).is_some() {
                versions.push(name);
            }
        }

        versions.sort_by(|a, b| newest_first(a, b));
        Ok(versions)
    }

    fn install_binary(&self, version: &str) -> Option<Utf8PathBuf> {
        check_version(version).ok()?;
        let binary = appcv_dirs::install_binary(&self.install_dir, version);
        binary.is_file().then_some(binary)
    }

    fn active_version(&self) -> Option<String> {
        let path = appcv_dirs::version_file(&self.install_dir);
        match fs_err::read_to_string(&path) {
            Ok(contents) => {
                let version = contents.trim();
                (!version.is_empty()).then(|| version.to_owned())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!("Ignoring unreadable active version: {err}");
                None
            }
        }
    }

    fn write_version(&self, version: &str) -> Result<()> {
        fs_err::create_dir_all(&self.install_dir).map_err(Error::WriteVersion)?;
        let path = appcv_dirs::version_file(&self.install_dir);
        debug!("Writing active version {version:?} to {path}");
        fs_err::write(path, version).map_err(Error::WriteVersion)
    }

    fn remove_version(&self, version: &str) -> Result<Removal> {
        check_version(version)?;
        let dir = appcv_dirs::version_dir(&self.install_dir, version);
        if dir.parent() != Some(self.install_dir.as_path()) {
            return Err(Error::InvalidVersion(version.to_owned()));
        }
        debug!("Removing {dir}");
        rm_rf(&dir).map_err(|source| Error::RemoveVersion {
            version: version.to_owned(),
            source,
        })
    }
}

/// Rejects version names that do not map to a directory directly under the
/// install directory.
pub fn check_version(version: &str) -> Result<()> {
    if matches!(version, "" | "." | "..") || version.contains(['/', '\\']) {
        return Err(Error::InvalidVersion(version.to_owned()));
    }
    Ok(())
}

/// Orders versions newest first: semver order when both sides parse, parseable
/// versions ahead of the rest, reverse lexical order otherwise.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    match (semver::Version::parse(a), semver::Version::parse(b)) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => b.cmp(a),
    }
}
