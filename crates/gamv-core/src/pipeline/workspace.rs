use crate::domain::{GamvError, GamvResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

pub const SCRATCH_PREFIX: &str = ".gamv-";

/// Per-run scratch directory inside the working directory, removed on drop.
/// Files are addressed relative to the working directory when handed to the
/// engine, so blanks in ancestor directories never reach its reader.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
    relative: PathBuf,
}

impl ScratchWorkspace {
    pub fn create(working_dir: &Path) -> GamvResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(working_dir)
            .map_err(|source| {
                GamvError::io_system(
                    "IO.SCRATCH_CREATE",
                    format!(
                        "failed to create scratch directory in '{}': {}",
                        working_dir.display(),
                        source
                    ),
                )
            })?;
        let relative = dir
            .path()
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| {
                GamvError::io_system(
                    "IO.SCRATCH_CREATE",
                    format!(
                        "scratch directory '{}' has no file name",
                        dir.path().display()
                    ),
                )
            })?;
        debug!(scratch = %dir.path().display(), "created scratch workspace");
        Ok(Self { dir, relative })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` as seen from the working directory.
    pub fn relative_path(&self, name: &str) -> PathBuf {
        self.relative.join(name)
    }

    pub fn absolute_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Removes the directory now and logs instead of failing if that errors.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(source) = self.dir.close() {
            warn!(scratch = %path.display(), error = %source, "failed to remove scratch workspace");
        }
    }
}
