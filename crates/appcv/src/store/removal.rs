use std::fmt::Display;
use std::io;
use std::ops::{Add, AddAssign};

use bytesize::ByteSize;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::trace;

/// Remove a file or directory recursively, tallying what was deleted.
///
/// A path that does not exist is not an error and yields an empty [`Removal`].
pub fn rm_rf(path: impl AsRef<Utf8Path>) -> Result<Removal, io::Error> {
    let path = path.as_ref();

    let metadata = match fs_err::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Removal::default()),
        Err(err) => return Err(err),
    };

    if !metadata.is_dir() {
        trace!("Removing file {path}");
        fs_err::remove_file(path)?;
        return Ok(Removal::new(1, 0, metadata.len()));
    }

    let mut removal = Removal::default();
    for entry in fs_err::read_dir(path)? {
        let entry_path = Utf8PathBuf::try_from(entry?.path())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Invalid UTF-8 path"))?;
        removal += rm_rf(&entry_path)?;
    }

    trace!("Removing directory {path}");
    fs_err::remove_dir(path)?;
    Ok(removal + Removal::new(0, 1, 0))
}

/// A summary of the files and directories removed from an install directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub files: u64,
    pub dirs: u64,
    /// Total size of the removed files.
    pub bytes: u64,
}

impl Removal {
    pub fn new(files: u64, dirs: u64, bytes: u64) -> Self {
        Self { files, dirs, bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.files == 0 && self.dirs == 0
    }
}

impl Add for Removal {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            files: self.files + other.files,
            dirs: self.dirs + other.dirs,
            bytes: self.bytes + other.bytes,
        }
    }
}

impl AddAssign for Removal {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Display for Removal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "nothing removed");
        }
        let files = match self.files {
            1 => "1 file".to_owned(),
            n => format!("{n} files"),
        };
        write!(f, "{files}, {}", ByteSize::b(self.bytes))
    }
}
