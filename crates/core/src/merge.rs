//! Day-bucket merging of time-keyed records.
//!
//! Every function returns the full record list to persist as a replace.
//! The list is always sorted by time of day with no two records sharing a
//! time. On error nothing is returned, so the caller has nothing to write.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::time_of_day::TimeOfDay;

/// A record keyed by its time of day within a daily document.
pub trait TimedRecord {
    fn time(&self) -> TimeOfDay;
}

fn sort_by_time<R: TimedRecord>(records: &mut [R]) {
    records.sort_by_key(|r| r.time());
}

/// Times appearing more than once in `records`, ascending.
fn repeated_times<R: TimedRecord>(records: &[R]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let repeated: BTreeSet<TimeOfDay> = records
        .iter()
        .map(TimedRecord::time)
        .filter(|t| !seen.insert(*t))
        .collect();
    repeated.iter().map(ToString::to_string).collect()
}

fn ensure_unique<R: TimedRecord>(records: &[R]) -> Result<(), CoreError> {
    let times = repeated_times(records);
    if times.is_empty() {
        Ok(())
    } else {
        Err(CoreError::DuplicateTimeSlot { times })
    }
}

/// Records for a document that does not exist yet.
pub fn prepare_new_bucket<R: TimedRecord>(mut incoming: Vec<R>) -> Result<Vec<R>, CoreError> {
    ensure_unique(&incoming)?;
    sort_by_time(&mut incoming);
    Ok(incoming)
}

/// Append `incoming` to `existing`, rejecting any time already present.
///
/// Fails with [`CoreError::DuplicateTimeSlot`] listing every colliding time.
pub fn merge_append<R: TimedRecord>(
    existing: Vec<R>,
    incoming: Vec<R>,
) -> Result<Vec<R>, CoreError> {
    ensure_unique(&incoming)?;

    let present: BTreeSet<TimeOfDay> = existing.iter().map(TimedRecord::time).collect();
    let collisions: BTreeSet<TimeOfDay> = incoming
        .iter()
        .map(TimedRecord::time)
        .filter(|t| present.contains(t))
        .collect();
    if !collisions.is_empty() {
        return Err(CoreError::DuplicateTimeSlot {
            times: collisions.iter().map(ToString::to_string).collect(),
        });
    }

    let mut merged = existing;
    merged.extend(incoming);
    sort_by_time(&mut merged);
    Ok(merged)
}

/// Overlay `incoming` on `existing`: a record at an existing time replaces
/// it, other records are added.
pub fn merge_replace<R: TimedRecord>(
    existing: Vec<R>,
    incoming: Vec<R>,
) -> Result<Vec<R>, CoreError> {
    ensure_unique(&incoming)?;

    let replaced: BTreeSet<TimeOfDay> = incoming.iter().map(TimedRecord::time).collect();
    let mut merged: Vec<R> = existing
        .into_iter()
        .filter(|r| !replaced.contains(&r.time()))
        .collect();
    merged.extend(incoming);
    sort_by_time(&mut merged);
    Ok(merged)
}
