use rust_decimal::Decimal;

use crate::domain::errors::DomainError;
use crate::domain::money::AMOUNT_SCALE;
use crate::storage::{DbConnection, InstanceRepository, TemplateRepository};
use shared::{ChoreInstance, ChoreTemplate, Frequency, ScheduleResponse, TemplateSchedule};

/// Service that projects the active templates into a per-frequency overview
#[derive(Clone)]
pub struct ScheduleService {
    template_repository: TemplateRepository,
    instance_repository: InstanceRepository,
}

impl ScheduleService {
    /// Create a new ScheduleService
    pub fn new(db: DbConnection) -> Self {
        Self {
            template_repository: TemplateRepository::new(db.clone()),
            instance_repository: InstanceRepository::new(db),
        }
    }

    /// Summarize every active template, grouped by frequency.
    ///
    /// Each entry carries the next open due date, the most recent completion
    /// and the lifetime amount earned. Lifetime totals keep counting settled
    /// instances, unlike the payable total.
    pub async fn schedule_summary(&self) -> Result<ScheduleResponse, DomainError> {
        let templates = self.template_repository.list_active_templates().await?;
        let instances = self.instance_repository.list_instances().await?;

        let mut response = ScheduleResponse::default();
        for template in templates {
            let bucket = match template.frequency {
                Frequency::Daily => &mut response.daily,
                Frequency::Weekly => &mut response.weekly,
                Frequency::Monthly => &mut response.monthly,
                Frequency::OneTime => &mut response.one_time,
            };
            bucket.push(summarize(template, &instances));
        }

        Ok(response)
    }
}

fn summarize(template: ChoreTemplate, instances: &[ChoreInstance]) -> TemplateSchedule {
    let mine: Vec<&ChoreInstance> = instances
        .iter()
        .filter(|instance| instance.template_id == template.id)
        .collect();

    let next_due_date = mine
        .iter()
        .filter(|instance| !instance.completed)
        .map(|instance| instance.due_date)
        .min();

    let last_completed_at = mine
        .iter()
        .filter_map(|instance| instance.completed_at)
        .max();

    let mut total_earned: Decimal = mine
        .iter()
        .filter(|instance| instance.completed)
        .map(|instance| instance.amount)
        .sum();
    total_earned.rescale(AMOUNT_SCALE);

    TemplateSchedule {
        template,
        next_due_date,
        last_completed_at,
        total_earned,
    }
}
