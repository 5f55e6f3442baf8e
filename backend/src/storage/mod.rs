//! # Storage Module
//!
//! Handles all data persistence for the chore tracker.
//!
//! Everything lives in a single SQLite database reached through [`DbConnection`].
//! Each aggregate (templates, instances, payouts) gets its own repository so the
//! domain layer never touches SQL directly.
//!
//! ## Conventions
//!
//! - Money is stored as its canonical two-decimal string form (TEXT), never as
//!   a float column. Sums happen in `Decimal` space on the Rust side.
//! - Due dates are stored as `YYYY-MM-DD` strings, timestamps as RFC 3339.
//!   Both forms compare lexicographically in the same order as chronologically,
//!   which the date-window queries rely on.
//! - Foreign keys are enabled on every connection; deleting a template
//!   cascades to its instances.

pub mod connection;
pub mod instance_repository;
pub mod payout_repository;
pub mod template_repository;

pub use connection::DbConnection;
pub use instance_repository::InstanceRepository;
pub use payout_repository::PayoutRepository;
pub use template_repository::TemplateRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Parse a stored two-decimal amount back into a `Decimal`
pub(crate) fn parse_amount(text: &str) -> Result<Decimal> {
    text.parse::<Decimal>()
        .with_context(|| format!("Invalid amount in database: {}", text))
}

/// Parse a stored RFC 3339 timestamp
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("Invalid timestamp in database: {}", text))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Parse a stored `YYYY-MM-DD` due date
pub(crate) fn parse_date(text: &str) -> Result<NaiveDate> {
    text.parse::<NaiveDate>()
        .with_context(|| format!("Invalid date in database: {}", text))
}
