//! Modification time handling
//!
//! Timestamps are seconds since the Unix epoch as `f64`, which keeps
//! sub-second precision and serializes as a plain number in YAML.

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::SyncError;

/// Seconds since the Unix epoch
pub type Timestamp = f64;

/// Convert a `SystemTime` to a [`Timestamp`]
#[must_use]
pub fn to_timestamp(time: SystemTime) -> Timestamp {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

/// Convert a [`Timestamp`] back to a `SystemTime`
#[must_use]
pub fn to_system_time(timestamp: Timestamp) -> SystemTime {
    if timestamp >= 0.0 {
        UNIX_EPOCH + Duration::from_secs_f64(timestamp)
    } else {
        UNIX_EPOCH - Duration::from_secs_f64(-timestamp)
    }
}

/// Current wall-clock time
#[must_use]
pub fn now() -> Timestamp {
    to_timestamp(SystemTime::now())
}

/// Get the modification time of a file
///
/// # Errors
///
/// Returns an error if file metadata cannot be read.
pub fn modified_time(path: &Path) -> Result<Timestamp, SyncError> {
    let metadata = fs::metadata(path).map_err(|e| SyncError::from_io(path, e))?;
    let modified = metadata.modified().map_err(|e| SyncError::from_io(path, e))?;
    Ok(to_timestamp(modified))
}

/// Overwrite the modification time of an existing file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its times updated.
pub fn set_modified_time(path: &Path, time: SystemTime) -> Result<(), SyncError> {
    let file = File::options()
        .write(true)
        .open(path)
        .map_err(|e| SyncError::from_io(path, e))?;
    file.set_modified(time)
        .map_err(|e| SyncError::from_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_keeps_subsecond_precision() {
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_250);
        let ts = to_timestamp(time);

        assert!((ts - 1_700_000_000.25).abs() < 1e-6);
        assert_eq!(to_timestamp(to_system_time(ts)), ts);
    }

    #[test]
    fn test_before_epoch_is_negative() {
        let time = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(to_timestamp(time), -10.0);
        assert_eq!(to_system_time(-10.0), time);
    }

    #[test]
    fn test_set_and_read_modified_time() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "content").unwrap();

        set_modified_time(&file, to_system_time(150.0)).unwrap();

        assert_eq!(modified_time(&file).unwrap(), 150.0);
    }

    #[test]
    fn test_nonexistent_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("nonexistent.txt");

        let err = modified_time(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
