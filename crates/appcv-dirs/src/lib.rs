use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};

/// Name of the per-user directory the platform CLI keeps its state in.
const APPC_HOME_DIR: &str = ".appcelerator";

/// Name of the file recording the active version, relative to the install directory.
const VERSION_FILE: &str = ".version";

/// Returns the per-user platform directory.
///
/// This follows, in order:
///
/// - `$OVERRIDE_VARIABLE` (if provided and absolute)
/// - `$HOME/.appcelerator`
///
/// Returns `None` if `$HOME` cannot be resolved. Does not check if the directory exists.
pub fn appc_home(override_variable: Option<&'static str>) -> Option<Utf8PathBuf> {
    override_variable
        .and_then(std::env::var_os)
        .and_then(parse_path)
        .or_else(|| {
            let home = etcetera::home_dir().ok()?;
            Utf8PathBuf::try_from(home)
                .ok()
                .map(|home| home.join(APPC_HOME_DIR))
        })
}

/// Returns the default directory holding one sub-directory per installed version.
///
/// Corresponds to `$HOME/.appcelerator/install`.
pub fn default_install_dir() -> Option<Utf8PathBuf> {
    let install_dir = appc_home(Some("APPCV_HOME")).map(|home| home.join("install"));
    if install_dir.is_none() {
        tracing::warn!("Could not determine the home directory");
    }
    install_dir
}

/// The file recording the active version.
pub fn version_file(install_dir: &Utf8Path) -> Utf8PathBuf {
    install_dir.join(VERSION_FILE)
}

/// The directory a given version is unpacked into.
pub fn version_dir(install_dir: &Utf8Path, version: &str) -> Utf8PathBuf {
    install_dir.join(version)
}

/// The executable shipped inside an installed version.
pub fn install_binary(install_dir: &Utf8Path, version: &str) -> Utf8PathBuf {
    package_binary(&version_dir(install_dir, version))
}

/// The executable inside an unpacked version directory, wherever it lives.
pub fn package_binary(version_dir: &Utf8Path) -> Utf8PathBuf {
    let bin = version_dir.join("package").join("bin");
    if cfg!(windows) {
        bin.join("appc.cmd")
    } else {
        bin.join("appc")
    }
}

/// Return a [`Utf8PathBuf`] if the given [`OsString`] is an absolute UTF-8 path.
fn parse_path(path: OsString) -> Option<Utf8PathBuf> {
    let path = Utf8PathBuf::from(path.into_string().ok()?);
    if path.is_absolute() { Some(path) } else { None }
}
