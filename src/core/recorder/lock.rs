//! Validation lock: a validated record is frozen for worker-side changes.
//!
//! There is no unlock here: reverting a validation is an
//! administrative task outside the worker-facing commands.

use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;

/// Fails with `RecordLocked` when the record has been validated.
/// Must run before anything is written.
pub fn ensure_unlocked(record: &AttendanceRecord) -> AppResult<()> {
    if record.is_validated() {
        return Err(AppError::RecordLocked(record.id));
    }
    Ok(())
}

/// Apply a worker-side edit only if the record is still open.
/// On failure the record is left untouched.
pub fn guarded_edit<F>(record: &mut AttendanceRecord, edit: F) -> AppResult<()>
where
    F: FnOnce(&mut AttendanceRecord) -> AppResult<()>,
{
    ensure_unlocked(record)?;

    let mut draft = record.clone();
    edit(&mut draft)?;
    *record = draft;
    Ok(())
}
