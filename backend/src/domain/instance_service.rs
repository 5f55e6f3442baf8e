use chrono::{DateTime, Duration, Local, Months, NaiveDate, Utc};
use tracing::info;

use crate::domain::errors::DomainError;
use crate::storage::{DbConnection, InstanceRepository};
use shared::{ChoreInstance, CompletedFilter};

/// Service for working with generated chore instances
#[derive(Clone)]
pub struct InstanceService {
    instance_repository: InstanceRepository,
}

impl InstanceService {
    /// Create a new InstanceService
    pub fn new(db: DbConnection) -> Self {
        Self {
            instance_repository: InstanceRepository::new(db),
        }
    }

    /// Mark an instance complete, stamping the completion time.
    /// Completing an already-completed chore just refreshes the stamp.
    pub async fn complete_chore(&self, instance_id: &str) -> Result<ChoreInstance, DomainError> {
        info!("Completing chore instance {}", instance_id);
        self.set_completion(instance_id, true, Some(Utc::now())).await
    }

    /// Mark an instance not complete, clearing the completion time.
    /// The settlement marker is untouched; settled stays settled.
    pub async fn uncomplete_chore(&self, instance_id: &str) -> Result<ChoreInstance, DomainError> {
        info!("Uncompleting chore instance {}", instance_id);
        self.set_completion(instance_id, false, None).await
    }

    async fn set_completion(
        &self,
        instance_id: &str,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<ChoreInstance, DomainError> {
        let updated = self
            .instance_repository
            .set_completion(instance_id, completed, completed_at)
            .await?;
        if updated == 0 {
            return Err(DomainError::not_found("Chore instance not found"));
        }

        self.instance_repository
            .get_instance(instance_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Chore instance not found"))
    }

    /// Delete a single instance without touching its template
    pub async fn delete_chore_instance(&self, instance_id: &str) -> Result<(), DomainError> {
        info!("Deleting chore instance {}", instance_id);

        let removed = self.instance_repository.delete_instance(instance_id).await?;
        if removed == 0 {
            return Err(DomainError::not_found("Chore instance not found"));
        }
        Ok(())
    }

    /// All instances, newest generation batch first
    pub async fn list_instances(&self) -> Result<Vec<ChoreInstance>, DomainError> {
        Ok(self.instance_repository.list_instances().await?)
    }

    /// Open chores due on one calendar day, ordered by title
    pub async fn chores_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ChoreInstance>, DomainError> {
        Ok(self.instance_repository.get_chores_for_date(date).await?)
    }

    /// Open chores due today or earlier, oldest due first
    pub async fn due_chores(&self) -> Result<Vec<ChoreInstance>, DomainError> {
        let today = Local::now().date_naive();
        Ok(self.instance_repository.get_due_chores(today).await?)
    }

    /// Completion history, most recent first, within the filter's window
    pub async fn completed_history(
        &self,
        filter: CompletedFilter,
    ) -> Result<Vec<ChoreInstance>, DomainError> {
        let cutoff = history_cutoff(filter, Utc::now());
        Ok(self.instance_repository.get_completed_since(cutoff).await?)
    }
}

/// Start of the rolling window a history filter selects, relative to `now`.
/// Month windows step back calendar months, not fixed 30-day spans.
fn history_cutoff(filter: CompletedFilter, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match filter {
        CompletedFilter::All => None,
        CompletedFilter::Week => Some(now - Duration::days(7)),
        CompletedFilter::Month => now.checked_sub_months(Months::new(1)),
        CompletedFilter::ThreeMonths => now.checked_sub_months(Months::new(3)),
    }
}
