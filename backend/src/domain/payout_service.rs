use chrono::Utc;
use tracing::info;

use crate::domain::earnings_service::EarningsService;
use crate::domain::errors::DomainError;
use crate::domain::money::validate_payout_amount;
use crate::storage::{DbConnection, PayoutRepository};
use shared::{CreatePayoutRequest, CreatePayoutResponse, Payout};

/// Service for recording payouts and settling completed work
#[derive(Clone)]
pub struct PayoutService {
    payout_repository: PayoutRepository,
    earnings_service: EarningsService,
}

impl PayoutService {
    /// Create a new PayoutService
    pub fn new(db: DbConnection) -> Self {
        Self {
            payout_repository: PayoutRepository::new(db.clone()),
            earnings_service: EarningsService::new(db),
        }
    }

    /// Record a payout after checking it against the current earned total.
    ///
    /// Every completed, unsettled instance is marked paid out along with the
    /// payout, whatever the payout amount. The earned total restarts from
    /// zero and only work completed afterwards counts again.
    pub async fn create_payout(
        &self,
        request: CreatePayoutRequest,
    ) -> Result<CreatePayoutResponse, DomainError> {
        info!("Creating payout: {:?}", request);

        let amount = validate_payout_amount(request.amount)?;

        let total_earned = self.earnings_service.total_earned().await?;
        if amount > total_earned {
            return Err(DomainError::validation("Payout amount exceeds total earned"));
        }

        let payout = Payout {
            id: Payout::generate_id(),
            amount,
            date: Utc::now(),
            notes: request.notes,
        };

        let instances_settled = self
            .payout_repository
            .store_payout_and_settle(&payout)
            .await?;

        info!(
            "Recorded payout {} settling {} instances",
            payout.id, instances_settled
        );

        Ok(CreatePayoutResponse {
            payout,
            instances_settled,
        })
    }

    /// Payout history, newest first
    pub async fn get_payouts(&self) -> Result<Vec<Payout>, DomainError> {
        Ok(self.payout_repository.list_payouts().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceService, TemplateService};
    use shared::{ChoreInstance, CreateChoreRequest, Frequency};

    struct TestContext {
        templates: TemplateService,
        instances: InstanceService,
        payouts: PayoutService,
        earnings: EarningsService,
    }

    async fn setup_test() -> TestContext {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        TestContext {
            templates: TemplateService::new(db.clone()),
            instances: InstanceService::new(db.clone()),
            payouts: PayoutService::new(db.clone()),
            earnings: EarningsService::new(db),
        }
    }

    /// Create a daily 2.00 chore and return its instances, earliest due first
    async fn seed_daily_chore(ctx: &TestContext) -> Vec<ChoreInstance> {
        ctx.templates
            .create_chore(CreateChoreRequest {
                title: "Feed the cat".to_string(),
                amount: "2.00".parse().unwrap(),
                frequency: Frequency::Daily,
                start_date: "2024-01-01".parse().unwrap(),
            })
            .await
            .unwrap();
        ctx.instances.list_instances().await.unwrap()
    }

    fn payout_request(amount: &str) -> CreatePayoutRequest {
        CreatePayoutRequest {
            amount: amount.parse().unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_payout_walkthrough() {
        let ctx = setup_test().await;
        let chores = seed_daily_chore(&ctx).await;

        // One completion earns the chore's amount
        ctx.instances.complete_chore(&chores[0].id).await.unwrap();
        assert_eq!(ctx.earnings.total_earned().await.unwrap().to_string(), "2.00");

        // Paying out the full total succeeds and settles the completion
        let response = ctx
            .payouts
            .create_payout(payout_request("2.00"))
            .await
            .unwrap();
        assert_eq!(response.instances_settled, 1);
        assert_eq!(response.payout.amount.to_string(), "2.00");
        assert_eq!(ctx.earnings.total_earned().await.unwrap().to_string(), "0.00");

        // The same payout again has nothing left to draw on
        let err = ctx
            .payouts
            .create_payout(payout_request("2.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Payout amount exceeds total earned");

        // Only one payout was recorded
        assert_eq!(ctx.payouts.get_payouts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_payout_rejects_bad_amounts() {
        let ctx = setup_test().await;

        for amount in ["0", "-5.00", "1.005"] {
            let err = ctx
                .payouts
                .create_payout(payout_request(amount))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{}", amount);
        }

        // Rejected payouts leave no trace
        assert!(ctx.payouts.get_payouts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_payout_settles_everything() {
        let ctx = setup_test().await;
        let chores = seed_daily_chore(&ctx).await;

        ctx.instances.complete_chore(&chores[0].id).await.unwrap();
        ctx.instances.complete_chore(&chores[1].id).await.unwrap();
        assert_eq!(ctx.earnings.total_earned().await.unwrap().to_string(), "4.00");

        // A partial payout still settles every completed instance
        let response = ctx
            .payouts
            .create_payout(payout_request("1.50"))
            .await
            .unwrap();
        assert_eq!(response.instances_settled, 2);
        assert_eq!(ctx.earnings.total_earned().await.unwrap().to_string(), "0.00");

        // Work completed afterwards earns again
        ctx.instances.complete_chore(&chores[2].id).await.unwrap();
        assert_eq!(ctx.earnings.total_earned().await.unwrap().to_string(), "2.00");
    }

    #[tokio::test]
    async fn test_settled_instances_never_recount() {
        let ctx = setup_test().await;
        let chores = seed_daily_chore(&ctx).await;

        ctx.instances.complete_chore(&chores[0].id).await.unwrap();
        ctx.payouts
            .create_payout(payout_request("2.00"))
            .await
            .unwrap();

        // Toggling the settled instance does not re-earn it
        ctx.instances.uncomplete_chore(&chores[0].id).await.unwrap();
        ctx.instances.complete_chore(&chores[0].id).await.unwrap();
        assert_eq!(ctx.earnings.total_earned().await.unwrap().to_string(), "0.00");
    }

    #[tokio::test]
    async fn test_get_payouts_newest_first_with_notes() {
        let ctx = setup_test().await;
        let chores = seed_daily_chore(&ctx).await;

        ctx.instances.complete_chore(&chores[0].id).await.unwrap();
        let first = ctx
            .payouts
            .create_payout(CreatePayoutRequest {
                amount: "2.00".parse().unwrap(),
                notes: Some("Piggy bank".to_string()),
            })
            .await
            .unwrap();

        ctx.instances.complete_chore(&chores[1].id).await.unwrap();
        let second = ctx
            .payouts
            .create_payout(payout_request("2.00"))
            .await
            .unwrap();

        let listed = ctx.payouts.get_payouts().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.payout.id);
        assert_eq!(listed[1].id, first.payout.id);
        assert_eq!(listed[1].notes.as_deref(), Some("Piggy bank"));
    }
}
