use std::io;

use anstream::println;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use owo_colors::OwoColorize;
use tracing::{Instrument, debug, warn};

use appcv_client::{FetchError, Registry};

use crate::progress;
use crate::store::{self, VersionStore};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    FetchError(#[from] FetchError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    StoreError(#[from] store::Error),
    #[error("Could not unpack version {version} into {dir}")]
    UnpackError {
        version: String,
        dir: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Version {version} does not contain {binary}")]
    MissingBinary { version: String, binary: Utf8PathBuf },
    #[error("Could not move version {version} into {dir}")]
    MoveError {
        version: String,
        dir: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

type Result<T> = miette::Result<T, Error>;

/// Downloads, unpacks and activates a version.
///
/// The tarball is unpacked into a hidden staging directory inside the install directory.
/// An existing directory for the same version is only replaced once the staged copy
/// holds the binary, so a failed download or unpack leaves it untouched.
pub async fn install(
    store: &dyn VersionStore,
    registry: &dyn Registry,
    version: &str,
) -> Result<()> {
    store::check_version(version)?;
    let install_dir = store.install_dir();
    let version_dir = appcv_dirs::version_dir(install_dir, version);

    println!("Installing version {}", version.cyan());

    let tarball = registry
        .download(version)
        .instrument(progress::spinner(&format!("Downloading {version}")))
        .await?;
    debug!("Downloaded {} bytes", tarball.len());

    let staging = stage(&tarball, install_dir).map_err(|source| Error::UnpackError {
        version: version.to_owned(),
        dir: version_dir.clone(),
        source,
    })?;

    if !appcv_dirs::package_binary(staging.path()).is_file() {
        return Err(Error::MissingBinary {
            version: version.to_owned(),
            binary: appcv_dirs::install_binary(install_dir, version),
        });
    }

    if version_dir.exists() {
        debug!("Replacing {version_dir}");
        if let Err(err) = store.remove_version(version) {
            release_pointer(store, version);
            return Err(err.into());
        }
    }

    if let Err(source) = fs_err::rename(staging.path(), &version_dir) {
        release_pointer(store, version);
        return Err(Error::MoveError {
            version: version.to_owned(),
            dir: version_dir,
            source,
        });
    }

    store.write_version(version)?;
    println!("{} is now your active version", version.yellow());

    Ok(())
}

/// Unpacks a tarball into a fresh staging directory, removed again when dropped.
fn stage(tarball: &[u8], install_dir: &Utf8Path) -> io::Result<Utf8TempDir> {
    fs_err::create_dir_all(install_dir)?;
    let staging = camino_tempfile::tempdir_in(install_dir)?;
    unpack(tarball, staging.path())?;
    Ok(staging)
}

/// Extracts a gzipped tarball. Entries live under `package/`, which is kept.
fn unpack(tarball: &[u8], dest: &Utf8Path) -> io::Result<()> {
    fs_err::create_dir_all(dest)?;
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(tarball));
    archive.unpack(dest)
}

/// Clears the active version if it names a version that is no longer usable.
fn release_pointer(store: &dyn VersionStore, version: &str) {
    if store.active_version().as_deref() != Some(version) || store.install_binary(version).is_some()
    {
        return;
    }
    if let Err(err) = store.write_version("") {
        warn!("Could not clear the active version {version}: {err}");
    }
}
