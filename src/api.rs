//! Export/Import API
//!
//! Entry points used by the CLI and library callers. Export walks the store
//! into a [`Folder`]; import writes a folder back leaf by leaf.
//!
//! Import does not stop at the first failed write: every leaf is attempted
//! and all failures are returned together as
//! [`ApiError::PartialWriteFailure`].

use crate::accessor::RemoteAccessor;
use crate::error::{ApiError, WriteFailure};
use crate::secret::LeafSecret;
use crate::tree::{self, Folder};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Outcome of a successful import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Paths written, in write order
    pub written: Vec<String>,
    /// Paths holding a redacted placeholder, which are never written
    pub skipped_redacted: Vec<String>,
}

/// Export the namespace below `path`.
///
/// With `reveal` false every leaf is the redacted placeholder and no secret
/// value is read.
pub fn export<A: RemoteAccessor + ?Sized>(
    accessor: &A,
    path: &str,
    reveal: bool,
) -> Result<Folder, ApiError> {
    Ok(tree::build(accessor, path, reveal)?)
}

/// Write every leaf of `folder` below `base`.
#[instrument(skip(accessor, folder), fields(leaf_count = folder.leaf_count()))]
pub fn import<A: RemoteAccessor + ?Sized>(
    accessor: &A,
    folder: &Folder,
    base: &str,
) -> Result<ImportReport, ApiError> {
    let mut report = ImportReport::default();
    let mut failures = Vec::new();
    let mut attempted = 0;

    for entry in tree::flatten(folder, base) {
        let payload = match entry.secret {
            LeafSecret::Redacted => {
                warn!(path = %entry.path, "Skipping redacted secret");
                report.skipped_redacted.push(entry.path);
                continue;
            }
            LeafSecret::Revealed(payload) => payload,
        };

        attempted += 1;
        match accessor.write_leaf(&entry.path, &payload) {
            Ok(()) => {
                info!(path = %entry.path, "Secret written");
                report.written.push(entry.path);
            }
            Err(e) => {
                warn!(path = %entry.path, error = %e, "Secret write failed");
                failures.push(WriteFailure {
                    path: entry.path,
                    error: e,
                });
            }
        }
    }

    if !failures.is_empty() {
        return Err(ApiError::PartialWriteFailure {
            attempted,
            failures,
        });
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped_redacted.len(),
        "Import completed"
    );
    Ok(report)
}
