//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
///
/// Partial import failures are listed one path per line.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::PartialWriteFailure {
            attempted,
            failures,
        } => {
            let mut out = format!(
                "Import failed: {} of {} secret writes failed",
                failures.len(),
                attempted
            );
            for failure in failures {
                out.push_str(&format!("\n  - {}: {}", failure.path, failure.error));
            }
            out
        }
        _ => e.to_string(),
    }
}
