//! In-memory task list service.

use super::{ScriptedFailures, lock_error};
use crate::card::CardId;
use crate::synchronizer::{
    domain::ExternalTask,
    ports::{ExternalServiceError, ExternalServiceResult, TaskListService},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

/// Thread-safe in-memory task list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskListService {
    state: Arc<RwLock<TaskListState>>,
}

#[derive(Debug, Default)]
struct TaskListState {
    tasks: BTreeMap<String, ExternalTask>,
    last_id: u64,
    failures: ScriptedFailures,
}

impl InMemoryTaskListService {
    /// Creates an empty task list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with `err`; repeated calls queue up.
    ///
    /// # Errors
    ///
    /// Returns an I/O-classified error when the state lock is poisoned.
    pub fn fail_next(&self, err: ExternalServiceError) -> ExternalServiceResult<()> {
        self.write()?.failures.push(err);
        Ok(())
    }

    /// Returns a copy of every stored task.
    ///
    /// # Errors
    ///
    /// Returns an I/O-classified error when the state lock is poisoned.
    pub fn tasks(&self) -> ExternalServiceResult<Vec<ExternalTask>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.tasks.values().cloned().collect())
    }

    /// Returns how many port calls were made, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns an I/O-classified error when the state lock is poisoned.
    pub fn call_count(&self) -> ExternalServiceResult<u64> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.failures.calls)
    }

    fn write(&self) -> ExternalServiceResult<RwLockWriteGuard<'_, TaskListState>> {
        self.state.write().map_err(|err| lock_error(&err))
    }
}

#[async_trait]
impl TaskListService for InMemoryTaskListService {
    async fn create_task(&self, task: &ExternalTask) -> ExternalServiceResult<String> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        state.last_id = state.last_id.saturating_add(1);
        let id = format!("task-{}", state.last_id);
        state.tasks.insert(id.clone(), task.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn tasks_for_entity(&self, entity_id: CardId) -> ExternalServiceResult<Vec<ExternalTask>> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.linked_entity_id() == entity_id)
            .cloned()
            .collect())
    }

    async fn delete_task(&self, task_id: &str) -> ExternalServiceResult<bool> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        Ok(state.tasks.remove(task_id).is_some())
    }
}
