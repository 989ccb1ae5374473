use camino::Utf8PathBuf;
use tracing::debug;
use url::Url;

use appcv_client::{FetchError, RegistryClient};

use crate::GlobalArgs;
use crate::commands::use_version::OutputFormat;
use crate::store::FsVersionStore;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Could not determine the install directory")]
    #[diagnostic(help("Pass --install-dir or set APPCV_INSTALL_DIR"))]
    NoInstallDir,
    #[error(transparent)]
    #[diagnostic(transparent)]
    ClientError(#[from] FetchError),
}

type Result<T> = miette::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Config {
    pub install_dir: Utf8PathBuf,
    pub registry_url: Url,
    pub output: OutputFormat,
}

impl Config {
    pub(crate) fn new(global_args: &GlobalArgs) -> Result<Self> {
        let install_dir = match &global_args.install_dir {
            Some(dir) => dir.clone(),
            None => appcv_dirs::default_install_dir().ok_or(Error::NoInstallDir)?,
        };
        debug!("Using install directory {install_dir}");

        Ok(Self {
            install_dir,
            registry_url: global_args.registry_url.clone(),
            output: global_args.output,
        })
    }

    pub fn store(&self) -> FsVersionStore {
        FsVersionStore::new(self.install_dir.clone())
    }

    pub fn registry(&self) -> Result<RegistryClient> {
        Ok(RegistryClient::new(self.registry_url.clone())?)
    }
}
