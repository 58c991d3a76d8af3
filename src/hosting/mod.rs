//! Hosting configuration
//!
//! Reads a project's firebase.json, merges one redirect target into its
//! `hosting` list and writes the whole document back.
//!
//! - Missing, unreadable or invalid files are replaced by an empty document.
//! - A `hosting` value that is not a list is reset to an empty list.
//! - At most one entry per `target`: the merged entry replaces any previous
//!   ones and is appended last.

mod document;
mod entry;

pub use document::{HostingDocument, LoadState, LoadedDocument};
pub use entry::{HostingEntry, RedirectRule, RewriteRule, IGNORE_PATTERNS, REDIRECT_STATUS};

use crate::Result;
use std::path::Path;

/// What a merge did to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// How the previous document was obtained
    pub state: LoadState,
    /// Number of previous entries removed for the same target
    pub replaced: usize,
    /// Entries in the document after the merge
    pub total: usize,
}

/// Merge a redirect entry for `target` into the document at `path`
///
/// Read and parse failures are recovered from; only the final write can fail.
pub fn merge_hosting_entry(
    path: impl AsRef<Path>,
    target: &str,
    public: &str,
    raw_redirect_url: &str,
) -> Result<MergeReport> {
    let path = path.as_ref();
    let LoadedDocument {
        mut document,
        state,
    } = HostingDocument::load(path);

    if state.is_degraded() {
        tracing::warn!(
            path = %path.display(),
            state = ?state,
            "Previous hosting entries were discarded before merging"
        );
    }

    let entry = HostingEntry::redirect(target, public, raw_redirect_url);
    let replaced = document.upsert(&entry)?;
    document.save(path)?;

    tracing::info!(
        path = %path.display(),
        target = target,
        public = public,
        destination = entry.destination().unwrap_or_default(),
        replaced = replaced,
        "Merged hosting entry"
    );

    Ok(MergeReport {
        state,
        replaced,
        total: document.hosting().len(),
    })
}
