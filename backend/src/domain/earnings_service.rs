use rust_decimal::Decimal;

use crate::domain::errors::DomainError;
use crate::domain::money::AMOUNT_SCALE;
use crate::storage::{DbConnection, InstanceRepository};

/// Derives earnings totals from completion state. Nothing here is stored or
/// cached; every call recomputes from the instance rows.
#[derive(Clone)]
pub struct EarningsService {
    instance_repository: InstanceRepository,
}

impl EarningsService {
    /// Create a new EarningsService
    pub fn new(db: DbConnection) -> Self {
        Self {
            instance_repository: InstanceRepository::new(db),
        }
    }

    /// Sum of amounts on completed instances no payout has settled yet
    pub async fn total_earned(&self) -> Result<Decimal, DomainError> {
        let instances = self.instance_repository.get_completed_unsettled().await?;

        let mut total: Decimal = instances.iter().map(|instance| instance.amount).sum();
        total.rescale(AMOUNT_SCALE);
        Ok(total)
    }
}
