//! Per-run scratch directory.
//!
//! ```text
//! <temp_root>/<uuid>/
//!     pictures/        composed base frames and fade frames
//!     movies/          finished segments
//!     silence.ac3      audio padding for photo clips
//!     mpglist.txt      concat manifest
//!     <base>-pass*     two-pass statistics
//! ```
//!
//! The directory is unique per run and removed in full after the story
//! has been moved out (or kept for diagnosis, see `keep_failed_work_dir`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

pub const PICTURES_DIR: &str = "pictures";
pub const MOVIES_DIR: &str = "movies";
pub const SILENCE_FILE: &str = "silence.ac3";
pub const MANIFEST_FILE: &str = "mpglist.txt";

/// Error type for working directory operations.
#[derive(Error, Debug)]
pub enum WorkDirError {
    #[error("Failed to create working directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove working directory {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for working directory operations.
pub type WorkDirResult<T> = Result<T, WorkDirError>;

/// Scratch area of one story run.
#[derive(Debug, Clone)]
pub struct WorkDir {
    id: String,
    root: PathBuf,
}

impl WorkDir {
    /// Create `<temp_root>/<uuid>` (and any missing parents).
    pub fn create_unique(temp_root: &Path) -> WorkDirResult<Self> {
        let id = Uuid::new_v4().to_string();
        let root = temp_root.join(&id);
        fs::create_dir_all(&root).map_err(|source| WorkDirError::Create {
            path: root.clone(),
            source,
        })?;
        tracing::debug!("Created working directory {}", root.display());
        Ok(Self { id, root })
    }

    /// Use an existing directory supplied by the caller.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let id = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { id, root }
    }

    /// Run identifier (the directory name).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pictures(&self) -> PathBuf {
        self.root.join(PICTURES_DIR)
    }

    pub fn movies(&self) -> PathBuf {
        self.root.join(MOVIES_DIR)
    }

    pub fn silence(&self) -> PathBuf {
        self.root.join(SILENCE_FILE)
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Path of a segment inside `movies/`.
    pub fn segment(&self, file_name: &str) -> PathBuf {
        self.movies().join(file_name)
    }

    /// Prefix for two-pass statistics files of one clip.
    pub fn passlog(&self, base_name: &str) -> PathBuf {
        self.root.join(format!("{}-pass", base_name))
    }

    /// Create `pictures/` and `movies/`.
    ///
    /// Must run before any worker starts; workers only add files.
    pub fn ensure_layout(&self) -> WorkDirResult<()> {
        for dir in [self.pictures(), self.movies()] {
            fs::create_dir_all(&dir).map_err(|source| WorkDirError::Create {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Delete the directory and everything in it.
    pub fn remove(&self) -> WorkDirResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkDirError::Remove {
                path: self.root.clone(),
                source,
            }),
        }
    }
}
