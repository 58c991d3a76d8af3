//! Folder listing
//!
//! Lists the immediate subdirectories of a directory. Used for both the
//! projects under the projects root and the content folders of a project.
//! Failures never reach the caller: they are logged and degrade to an empty
//! listing flagged with [`Listing::degraded`].

use std::fs;
use std::path::Path;

/// Sorted subdirectory names of a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub names: Vec<String>,
    /// True when the directory could not be read and `names` is a fallback
    pub degraded: bool,
}

impl Listing {
    fn degraded() -> Self {
        Self {
            names: Vec::new(),
            degraded: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// List the immediate subdirectories of `path`, sorted by name
pub fn list_subdirectories(path: impl AsRef<Path>) -> Listing {
    let path = path.as_ref();

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to list folders");
            return Listing::degraded();
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to list folders");
                return Listing::degraded();
            }
        };

        // Follows symlinks, so a linked project directory still counts.
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    tracing::debug!(path = %path.display(), count = names.len(), "Listed folders");

    Listing {
        names,
        degraded: false,
    }
}
