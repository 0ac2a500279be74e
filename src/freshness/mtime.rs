//! Mtime-based staleness check for built resources.
//!
//! An output is reused when it is strictly newer than every input that
//! went into it. Equal timestamps count as stale: coarse filesystem clocks
//! can give a source edited right after a build the same mtime as the output.

use std::path::Path;
use std::time::SystemTime;

/// Check if `output` can be reused for inputs last modified at `newest_input`.
///
/// A resource without inputs compares against the epoch, so any existing
/// output counts as fresh.
pub fn is_output_fresh(output: &Path, newest_input: Option<SystemTime>) -> bool {
    let input_time = newest_input.unwrap_or(SystemTime::UNIX_EPOCH);
    get_mtime(output).is_some_and(|output_time| output_time > input_time)
}

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
