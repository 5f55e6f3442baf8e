use rust_decimal::Decimal;

use crate::domain::errors::DomainError;

/// Two decimal places, the finest granularity stored amounts carry
pub const AMOUNT_SCALE: u32 = 2;

/// Validate and canonicalize a chore reward amount. Zero is allowed.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, DomainError> {
    if amount < Decimal::ZERO {
        return Err(DomainError::validation("Amount cannot be negative"));
    }
    canonicalize(amount, "Amount")
}

/// Validate and canonicalize a payout amount. Must be strictly positive.
pub fn validate_payout_amount(amount: Decimal) -> Result<Decimal, DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::validation("Payout amount must be positive"));
    }
    canonicalize(amount, "Payout amount")
}

fn canonicalize(mut amount: Decimal, label: &str) -> Result<Decimal, DomainError> {
    if amount.scale() > AMOUNT_SCALE {
        return Err(DomainError::validation(format!(
            "{} cannot have more than two decimal places",
            label
        )));
    }
    if amount > Decimal::from(1_000_000) {
        return Err(DomainError::validation(format!("{} is too large", label)));
    }
    // Store "2.50", not "2.5", so the persisted text form is canonical
    amount.rescale(AMOUNT_SCALE);
    Ok(amount)
}
