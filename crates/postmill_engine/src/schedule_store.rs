//! Recurring schedule definitions.

use parking_lot::RwLock;
use postmill_core::RecurringSchedule;
use postmill_error::{InvalidRequestError, NotFoundError, PostmillResult};
use std::collections::HashSet;
use tracing::info;

/// In-memory store of recurring schedules, kept in insertion order.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    schedules: RwLock<Vec<RecurringSchedule>>,
}

impl ScheduleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every schedule.
    ///
    /// The whole list is validated first; nothing changes if any entry is
    /// invalid or two entries share an id. Trigger times are stored sorted
    /// and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or [`InvalidRequestError`] for a
    /// repeated id.
    pub fn replace_all(&self, schedules: Vec<RecurringSchedule>) -> PostmillResult<()> {
        let mut ids = HashSet::new();
        for schedule in &schedules {
            schedule.validate()?;
            if !ids.insert(schedule.id().as_str()) {
                return Err(InvalidRequestError::new(format!(
                    "Duplicate schedule id '{}'",
                    schedule.id()
                ))
                .into());
            }
        }
        let schedules: Vec<_> = schedules
            .into_iter()
            .map(RecurringSchedule::normalized)
            .collect();
        info!(count = schedules.len(), "Schedules replaced");
        *self.schedules.write() = schedules;
        Ok(())
    }

    /// All schedules.
    pub fn list(&self) -> Vec<RecurringSchedule> {
        self.schedules.read().clone()
    }

    /// Enabled schedules only.
    pub fn enabled(&self) -> Vec<RecurringSchedule> {
        self.schedules
            .read()
            .iter()
            .filter(|s| *s.enabled())
            .cloned()
            .collect()
    }

    /// Look up a schedule.
    pub fn get(&self, id: &str) -> Option<RecurringSchedule> {
        self.schedules.read().iter().find(|s| s.id() == id).cloned()
    }

    /// Enable or disable a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown id.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> PostmillResult<RecurringSchedule> {
        let mut schedules = self.schedules.write();
        let schedule = schedules
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| NotFoundError::new("schedule", id))?;
        schedule.set_enabled(enabled);
        info!(id, enabled, "Schedule toggled");
        Ok(schedule.clone())
    }

    /// Insert a schedule or replace the one with the same id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed schedule.
    pub fn upsert(&self, schedule: RecurringSchedule) -> PostmillResult<()> {
        schedule.validate()?;
        let schedule = schedule.normalized();
        let mut schedules = self.schedules.write();
        match schedules.iter_mut().find(|s| s.id() == schedule.id()) {
            Some(existing) => *existing = schedule,
            None => schedules.push(schedule),
        }
        Ok(())
    }

    /// Remove a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown id.
    pub fn remove(&self, id: &str) -> PostmillResult<RecurringSchedule> {
        let mut schedules = self.schedules.write();
        let index = schedules
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| NotFoundError::new("schedule", id))?;
        Ok(schedules.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postmill_core::{Platform, RecurringScheduleBuilder, TimeOfDay};

    fn schedule(id: &str, platforms: Vec<Platform>) -> RecurringSchedule {
        RecurringScheduleBuilder::default()
            .id(id)
            .times(vec![TimeOfDay::from_hm(9, 0).unwrap()])
            .platforms(platforms)
            .build()
            .unwrap()
    }

    #[test]
    fn test_invalid_replace_keeps_previous() {
        let store = ScheduleStore::new();
        store
            .replace_all(vec![schedule("a", vec![Platform::Facebook])])
            .unwrap();
        let result = store.replace_all(vec![
            schedule("b", vec![Platform::Twitter]),
            schedule("c", vec![]),
        ]);
        assert!(result.is_err());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id(), "a");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let store = ScheduleStore::new();
        store
            .replace_all(vec![schedule("a", vec![Platform::Facebook])])
            .unwrap();
        let err = store
            .replace_all(vec![
                schedule("a", vec![Platform::Twitter]),
                schedule("a", vec![Platform::Linkedin]),
            ])
            .unwrap_err();
        assert!(err.message().contains("Duplicate schedule id 'a'"));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.get("a").unwrap().platforms(), &vec![Platform::Facebook]);
    }

    #[test]
    fn test_stored_times_are_normalized() {
        let store = ScheduleStore::new();
        let nine = TimeOfDay::from_hm(9, 0).unwrap();
        let noon = TimeOfDay::from_hm(12, 0).unwrap();
        let raw = RecurringScheduleBuilder::default()
            .id("a")
            .times(vec![noon, nine, noon])
            .platforms(vec![Platform::Facebook])
            .build()
            .unwrap();
        store.replace_all(vec![raw.clone()]).unwrap();
        assert_eq!(store.get("a").unwrap().times(), &vec![nine, noon]);
        store.upsert(raw).unwrap();
        assert_eq!(store.get("a").unwrap().times(), &vec![nine, noon]);
    }

    #[test]
    fn test_toggle_filters_enabled() {
        let store = ScheduleStore::new();
        store
            .replace_all(vec![
                schedule("a", vec![Platform::Facebook]),
                schedule("b", vec![Platform::Linkedin]),
            ])
            .unwrap();
        store.set_enabled("a", false).unwrap();
        let enabled: Vec<_> = store.enabled().into_iter().map(|s| s.id().clone()).collect();
        assert_eq!(enabled, vec!["b".to_string()]);
        assert!(store.set_enabled("zzz", true).is_err());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = ScheduleStore::new();
        store.upsert(schedule("a", vec![Platform::Facebook])).unwrap();
        store.upsert(schedule("a", vec![Platform::Twitter])).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.get("a").unwrap().platforms(), &vec![Platform::Twitter]);
        store.remove("a").unwrap();
        assert!(store.get("a").is_none());
    }
}
