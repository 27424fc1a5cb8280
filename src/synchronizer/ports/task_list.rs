//! Task list service port.

use super::ExternalServiceResult;
use crate::card::CardId;
use crate::synchronizer::domain::ExternalTask;
use async_trait::async_trait;

/// Remote task list backend contract.
#[async_trait]
pub trait TaskListService: Send + Sync {
    /// Creates a task and returns its assigned identifier.
    async fn create_task(&self, task: &ExternalTask) -> ExternalServiceResult<String>;

    /// Returns every task linked to a card.
    async fn tasks_for_entity(&self, entity_id: CardId) -> ExternalServiceResult<Vec<ExternalTask>>;

    /// Deletes a task; returns `false` when it did not exist.
    async fn delete_task(&self, task_id: &str) -> ExternalServiceResult<bool>;
}
