use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    catalog::{routine_catalog, Task},
    utils::{clock::Clock, time::date_to_storage_key},
};

use super::local_store::{LocalStore, COMPLETED_BY_DATE_KEY, COMPLETED_TASKS_KEY};

/// Outcome of [RoutineStore::toggle_completion], so views can tell the user what
/// actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Completed,
    Uncompleted,
    /// The id isn't in the catalog. State is untouched.
    UnknownTask,
}

/// Single source of truth for completion state. Owns the task catalog, the ordered set
/// of ids completed today and the per-day history, and mirrors both into a [LocalStore]
/// after every mutation.
///
/// Invariant: the completion set equals the sequence stored under today's history key.
/// Both sides of every mutation go through this type, which is what keeps that true.
pub struct RoutineStore<S> {
    tasks: Vec<Task>,
    completed: Vec<Arc<str>>,
    by_date: BTreeMap<String, Vec<Arc<str>>>,
    storage: S,
    date_provider: Box<dyn Clock>,
}

impl<S: LocalStore> RoutineStore<S> {
    /// Loads the catalog and whatever state survived the previous session. Absent or
    /// malformed persisted values mean a fresh start, never an error.
    pub async fn open(storage: S, date_provider: Box<dyn Clock>) -> Self {
        let by_date = Self::read_key::<BTreeMap<String, Vec<Arc<str>>>>(
            &storage,
            COMPLETED_BY_DATE_KEY,
        )
        .await
        .unwrap_or_default();

        // The saved completion set carries no date, so one written before a day change
        // is stale. Today's history entry is authoritative for the invariant.
        let saved = Self::read_key::<Vec<Arc<str>>>(&storage, COMPLETED_TASKS_KEY)
            .await
            .unwrap_or_default();
        let today = date_to_storage_key(date_provider.today());
        let completed = by_date.get(&today).cloned().unwrap_or_default();
        if saved != completed {
            debug!(
                "Discarding {} stale saved completions in favor of today's history entry",
                saved.len()
            );
        }

        Self {
            tasks: routine_catalog(),
            completed,
            by_date,
            storage,
            date_provider,
        }
    }

    async fn read_key<T: DeserializeOwned>(storage: &S, key: &str) -> Option<T> {
        let raw = match storage.get(key).await {
            Ok(value) => value?,
            Err(e) => {
                warn!("Failed to read {key}, starting empty: {e:?}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // ignore illegal values. Might happen after shutdowns
                warn!("Stored value under {key} is not valid JSON, starting empty: {e}");
                None
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Ordered ids completed today.
    pub fn completed(&self) -> &[Arc<str>] {
        &self.completed
    }

    /// Per-day completion history. May reference ids no longer in the catalog; readers
    /// skip those.
    pub fn history(&self) -> &BTreeMap<String, Vec<Arc<str>>> {
        &self.by_date
    }

    pub fn get_task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| &*task.id == id)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|completed| &**completed == id)
    }

    /// Unique categories in catalog order.
    pub fn categories(&self) -> Vec<Arc<str>> {
        let mut categories = Vec::<Arc<str>>::new();
        for task in &self.tasks {
            if !categories.contains(&task.category) {
                categories.push(task.category.clone());
            }
        }
        categories
    }

    /// Catalog subset for a category, or the whole catalog for `None`. Purely a
    /// projection, nothing persisted.
    pub fn filter_by_category(&self, category: Option<&str>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| category.map_or(true, |c| &*task.category == c))
            .collect()
    }

    fn today_key(&self) -> String {
        date_to_storage_key(self.date_provider.today())
    }

    /// Marks a task done for today, or un-marks it if it already was. Toggling an id
    /// twice returns the state to what it was before.
    pub async fn toggle_completion(&mut self, id: &str) -> Result<ToggleOutcome> {
        let Some(id) = self.get_task_by_id(id).map(|task| task.id.clone()) else {
            warn!("Ignoring toggle for unknown task {id}");
            return Ok(ToggleOutcome::UnknownTask);
        };

        let today = self.today_key();
        let outcome = if self.is_completed(&id) {
            self.completed.retain(|completed| *completed != id);
            if let Some(entry) = self.by_date.get_mut(&today) {
                entry.retain(|completed| *completed != id);
                // resetToday deletes the whole key, so an emptied day does too
                if entry.is_empty() {
                    self.by_date.remove(&today);
                }
            }
            ToggleOutcome::Uncompleted
        } else {
            self.completed.push(id.clone());
            self.by_date.entry(today).or_default().push(id);
            ToggleOutcome::Completed
        };

        self.save().await?;
        Ok(outcome)
    }

    /// Clears today's completions and deletes today's history entry. Other days are
    /// untouched.
    pub async fn reset_today(&mut self) -> Result<()> {
        let today = self.today_key();
        self.completed.clear();
        self.by_date.remove(&today);
        self.save().await
    }

    /// The midnight transition: today becomes a fresh empty day, history stays.
    /// Persisted history is re-read first so a long-running watch session doesn't
    /// clobber completions written by one-shot commands since it started.
    pub async fn rollover(&mut self) -> Result<()> {
        self.by_date = Self::read_key(&self.storage, COMPLETED_BY_DATE_KEY)
            .await
            .unwrap_or_default();
        self.completed.clear();
        self.storage.remove(COMPLETED_TASKS_KEY).await?;
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        self.storage
            .set(COMPLETED_TASKS_KEY, &serde_json::to_string(&self.completed)?)
            .await?;
        self.storage
            .set(COMPLETED_BY_DATE_KEY, &serde_json::to_string(&self.by_date)?)
            .await?;
        debug!(
            "Persisted {} completions across {} days",
            self.completed.len(),
            self.by_date.len()
        );
        Ok(())
    }
}
