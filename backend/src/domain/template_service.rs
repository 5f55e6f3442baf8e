use chrono::{Local, Utc};
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::money::validate_amount;
use crate::domain::recurrence::{expand_template, InstanceDraft};
use crate::storage::{DbConnection, InstanceRepository, TemplateRepository};
use shared::{
    ChoreInstance, ChoreTemplate, CreateChoreRequest, CreateChoreResponse,
    GenerateInstancesRequest, UpdateChoreRequest,
};

/// Number of instances generated when a chore is created
pub const DEFAULT_GENERATION_COUNT: u32 = 30;

/// Upper bound for a single generation batch
const MAX_GENERATION_COUNT: u32 = 365;

const MAX_TITLE_LENGTH: usize = 255;

/// Service for managing chore templates and their generated series
#[derive(Clone)]
pub struct TemplateService {
    template_repository: TemplateRepository,
    instance_repository: InstanceRepository,
}

impl TemplateService {
    /// Create a new TemplateService
    pub fn new(db: DbConnection) -> Self {
        Self {
            template_repository: TemplateRepository::new(db.clone()),
            instance_repository: InstanceRepository::new(db),
        }
    }

    /// Create a chore template and generate its initial batch of instances
    pub async fn create_chore(
        &self,
        request: CreateChoreRequest,
    ) -> Result<CreateChoreResponse, DomainError> {
        info!("Creating chore: {:?}", request);

        let title = request.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "Title must be 255 characters or less",
            ));
        }
        let amount = validate_amount(request.amount)?;

        let template = ChoreTemplate {
            id: ChoreTemplate::generate_id(),
            title: title.to_string(),
            amount,
            frequency: request.frequency,
            created_at: Utc::now(),
            is_active: true,
        };
        self.template_repository.store_template(&template).await?;

        let instances = materialize(expand_template(
            &template,
            request.start_date,
            DEFAULT_GENERATION_COUNT,
        ));
        self.instance_repository.store_instances(&instances).await?;

        info!(
            "Created chore {} with {} instances",
            template.id,
            instances.len()
        );

        Ok(CreateChoreResponse {
            template,
            instances_created: instances.len(),
        })
    }

    /// List active templates, newest first
    pub async fn list_chores(&self) -> Result<Vec<ChoreTemplate>, DomainError> {
        Ok(self.template_repository.list_active_templates().await?)
    }

    /// Update a template's reward amount and/or active flag.
    ///
    /// A new amount also rewrites the snapshot on the template's uncompleted
    /// instances due strictly after today. Completed work and anything
    /// already due keep the amount they were generated with.
    pub async fn update_chore(
        &self,
        template_id: &str,
        request: UpdateChoreRequest,
    ) -> Result<ChoreTemplate, DomainError> {
        info!("Updating chore {}: {:?}", template_id, request);

        if request.amount.is_none() && request.is_active.is_none() {
            return Err(DomainError::validation("No fields to update"));
        }

        let mut template = self
            .template_repository
            .get_template(template_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Template not found"))?;

        if let Some(amount) = request.amount {
            let amount = validate_amount(amount)?;
            self.template_repository
                .update_amount(template_id, &amount)
                .await?;

            let today = Local::now().date_naive();
            let updated = self
                .instance_repository
                .propagate_amount(template_id, &amount, today)
                .await?;
            info!(
                "Propagated new amount to {} future instances of {}",
                updated, template_id
            );
            template.amount = amount;
        }

        if let Some(is_active) = request.is_active {
            self.template_repository
                .set_active(template_id, is_active)
                .await?;
            template.is_active = is_active;
        }

        Ok(template)
    }

    /// Delete a template; its instances go with it via the cascade
    pub async fn delete_chore(&self, template_id: &str) -> Result<(), DomainError> {
        info!("Deleting chore {}", template_id);

        let removed = self.template_repository.delete_template(template_id).await?;
        if removed == 0 {
            return Err(DomainError::not_found("Template not found"));
        }
        Ok(())
    }

    /// Generate a further batch of instances for an existing template
    pub async fn generate_instances(
        &self,
        template_id: &str,
        request: GenerateInstancesRequest,
    ) -> Result<usize, DomainError> {
        info!(
            "Generating instances for {}: {:?}",
            template_id, request
        );

        let count = request.count.unwrap_or(DEFAULT_GENERATION_COUNT);
        if count == 0 {
            return Err(DomainError::validation("Count must be at least 1"));
        }
        if count > MAX_GENERATION_COUNT {
            return Err(DomainError::validation("Count must be 365 or less"));
        }

        let template = self
            .template_repository
            .get_template(template_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Template not found"))?;
        if !template.is_active {
            return Err(DomainError::integrity(
                "Cannot generate instances for an inactive chore",
            ));
        }

        let instances = materialize(expand_template(&template, request.start_date, count));
        self.instance_repository.store_instances(&instances).await?;

        info!("Generated {} instances for {}", instances.len(), template_id);
        Ok(instances.len())
    }
}

/// Assign ids and timestamps to a batch of drafts. The whole batch shares one
/// creation timestamp so it lists as a unit.
fn materialize(drafts: Vec<InstanceDraft>) -> Vec<ChoreInstance> {
    let created_at = Utc::now();
    drafts
        .into_iter()
        .map(|draft| ChoreInstance {
            id: ChoreInstance::generate_id(),
            template_id: draft.template_id,
            title: draft.title,
            amount: draft.amount,
            frequency: draft.frequency,
            due_date: draft.due_date,
            completed: false,
            completed_at: None,
            paid_out: false,
            created_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use shared::Frequency;

    async fn setup_test() -> (TemplateService, InstanceRepository) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        (TemplateService::new(db.clone()), InstanceRepository::new(db))
    }

    fn create_request(title: &str, amount: &str, frequency: Frequency) -> CreateChoreRequest {
        CreateChoreRequest {
            title: title.to_string(),
            amount: amount.parse().unwrap(),
            frequency,
            start_date: "2024-01-01".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_chore_generates_initial_batch() {
        let (service, instances) = setup_test().await;

        let response = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap();

        assert_eq!(response.instances_created, 30);
        assert!(response.template.is_active);
        assert_eq!(response.template.amount.to_string(), "2.00");

        let stored = instances.list_instances().await.unwrap();
        assert_eq!(stored.len(), 30);
        assert!(stored.iter().all(|i| !i.completed && !i.paid_out));
        assert!(stored.iter().all(|i| i.template_id == response.template.id));

        // Batches share a creation timestamp and list due-date ascending
        assert_eq!(stored[0].due_date, "2024-01-01".parse().unwrap());
        assert_eq!(stored[29].due_date, "2024-01-30".parse().unwrap());
    }

    #[tokio::test]
    async fn test_create_one_time_chore_yields_single_instance() {
        let (service, instances) = setup_test().await;

        let response = service
            .create_chore(create_request("Clean garage", "10.00", Frequency::OneTime))
            .await
            .unwrap();

        assert_eq!(response.instances_created, 1);
        assert_eq!(instances.list_instances().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_chore_validates_title() {
        let (service, _) = setup_test().await;

        let err = service
            .create_chore(create_request("   ", "2.00", Frequency::Daily))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Title is required");

        let long_title = "x".repeat(256);
        let err = service
            .create_chore(create_request(&long_title, "2.00", Frequency::Daily))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Title must be 255 characters or less");

        // The limit counts characters, not bytes
        let accented = "é".repeat(200);
        let response = service
            .create_chore(create_request(&accented, "2.00", Frequency::Daily))
            .await
            .unwrap();
        assert_eq!(response.template.title, accented);
    }

    #[tokio::test]
    async fn test_create_chore_validates_amount() {
        let (service, _) = setup_test().await;

        let err = service
            .create_chore(create_request("Feed the cat", "2.005", Frequency::Daily))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // One decimal place is accepted and canonicalized
        let response = service
            .create_chore(create_request("Feed the cat", "2.5", Frequency::Daily))
            .await
            .unwrap();
        assert_eq!(response.template.amount.to_string(), "2.50");
    }

    #[tokio::test]
    async fn test_update_chore_amount_propagates_to_future_only() {
        let (service, instances) = setup_test().await;

        // Three dailies: yesterday, today, tomorrow
        let yesterday = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(1))
            .unwrap();
        let template = service
            .create_chore(CreateChoreRequest {
                title: "Feed the cat".to_string(),
                amount: "2.00".parse().unwrap(),
                frequency: Frequency::Daily,
                start_date: yesterday,
            })
            .await
            .unwrap()
            .template;

        let updated = service
            .update_chore(
                &template.id,
                UpdateChoreRequest {
                    amount: Some("5.00".parse().unwrap()),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount.to_string(), "5.00");

        let stored = instances.list_instances().await.unwrap();
        let today = Local::now().date_naive();
        for instance in &stored {
            let expected = if instance.due_date > today { "5.00" } else { "2.00" };
            assert_eq!(
                instance.amount.to_string(),
                expected,
                "instance due {} has wrong amount",
                instance.due_date
            );
        }
    }

    #[tokio::test]
    async fn test_update_chore_deactivates_template() {
        let (service, _) = setup_test().await;

        let template = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap()
            .template;

        let updated = service
            .update_chore(
                &template.id,
                UpdateChoreRequest {
                    amount: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);

        // Inactive templates disappear from the listing
        assert!(service.list_chores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_chore_requires_some_field() {
        let (service, _) = setup_test().await;

        let template = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap()
            .template;

        let err = service
            .update_chore(
                &template.id,
                UpdateChoreRequest {
                    amount: None,
                    is_active: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No fields to update");
    }

    #[tokio::test]
    async fn test_update_chore_unknown_template() {
        let (service, _) = setup_test().await;

        let err = service
            .update_chore(
                "template::missing",
                UpdateChoreRequest {
                    amount: Some("5.00".parse().unwrap()),
                    is_active: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(err.to_string(), "Template not found");
    }

    #[tokio::test]
    async fn test_delete_chore_removes_instances() {
        let (service, instances) = setup_test().await;

        let template = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap()
            .template;

        service.delete_chore(&template.id).await.unwrap();
        assert!(instances.list_instances().await.unwrap().is_empty());

        let err = service.delete_chore(&template.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_generate_instances_extends_series() {
        let (service, instances) = setup_test().await;

        let template = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap()
            .template;

        let created = service
            .generate_instances(
                &template.id,
                GenerateInstancesRequest {
                    start_date: "2024-01-31".parse().unwrap(),
                    count: Some(5),
                },
            )
            .await
            .unwrap();

        assert_eq!(created, 5);
        assert_eq!(instances.list_instances().await.unwrap().len(), 35);
    }

    #[tokio::test]
    async fn test_generate_instances_validates_count() {
        let (service, _) = setup_test().await;

        let template = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap()
            .template;

        let request = |count| GenerateInstancesRequest {
            start_date: "2024-02-01".parse().unwrap(),
            count: Some(count),
        };

        let err = service
            .generate_instances(&template.id, request(0))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Count must be at least 1");

        let err = service
            .generate_instances(&template.id, request(366))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Count must be 365 or less");
    }

    #[tokio::test]
    async fn test_generate_instances_rejects_inactive_template() {
        let (service, _) = setup_test().await;

        let template = service
            .create_chore(create_request("Feed the cat", "2.00", Frequency::Daily))
            .await
            .unwrap()
            .template;
        service
            .update_chore(
                &template.id,
                UpdateChoreRequest {
                    amount: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();

        let err = service
            .generate_instances(
                &template.id,
                GenerateInstancesRequest {
                    start_date: "2024-02-01".parse().unwrap(),
                    count: Some(5),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_generate_instances_unknown_template() {
        let (service, _) = setup_test().await;

        let err = service
            .generate_instances(
                "template::missing",
                GenerateInstancesRequest {
                    start_date: "2024-02-01".parse().unwrap(),
                    count: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
