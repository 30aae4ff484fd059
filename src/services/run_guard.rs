use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;

/// Tracks which dates currently have an ingest run in flight.
///
/// A second trigger for the same date is turned away instead of racing the
/// first one through delete + insert.
#[derive(Clone, Default)]
pub struct RunGuard {
    active: Arc<Mutex<HashSet<NaiveDate>>>,
}

/// Held for the duration of a run; releases the date when dropped.
pub struct RunPermit {
    date: NaiveDate,
    active: Arc<Mutex<HashSet<NaiveDate>>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, date: NaiveDate) -> Option<RunPermit> {
        let mut active = self.active.lock();
        if !active.insert(date) {
            return None;
        }
        Some(RunPermit {
            date,
            active: self.active.clone(),
        })
    }

    #[allow(dead_code)]
    pub fn is_running(&self, date: NaiveDate) -> bool {
        self.active.lock().contains(&date)
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.active.lock().remove(&self.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_for_same_date_is_rejected() {
        let guard = RunGuard::new();
        let date = NaiveDate::from_ymd_opt(2025, 9, 23).unwrap();

        let permit = guard.try_acquire(date);
        assert!(permit.is_some());
        assert!(guard.try_acquire(date).is_none());
        assert!(guard.is_running(date));

        drop(permit);
        assert!(!guard.is_running(date));
        assert!(guard.try_acquire(date).is_some());
    }

    #[test]
    fn test_different_dates_run_independently() {
        let guard = RunGuard::new();
        let a = guard.try_acquire(NaiveDate::from_ymd_opt(2025, 9, 22).unwrap());
        let b = guard.try_acquire(NaiveDate::from_ymd_opt(2025, 9, 23).unwrap());
        assert!(a.is_some() && b.is_some());
    }
}
