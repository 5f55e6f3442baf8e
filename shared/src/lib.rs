use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How often a chore recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Due every day
    Daily,
    /// Due every 7 days
    Weekly,
    /// Due on the same day of the next month (clamped to month end)
    Monthly,
    /// Due exactly once
    OneTime,
}

impl Frequency {
    /// Stable text form, also used as the database column value
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::OneTime => "one-time",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "one-time" => Ok(Frequency::OneTime),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseFrequencyError(pub String);

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown frequency '{}'", self.0)
    }
}

impl std::error::Error for ParseFrequencyError {}

/// A recurring (or one-time) chore definition
///
/// Template ID in format: "template::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreTemplate {
    pub id: String,
    /// What the chore is (max 255 characters)
    pub title: String,
    /// Reward per completion, two decimal places
    pub amount: Decimal,
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
    /// Inactive templates are hidden from scheduling but keep their history
    pub is_active: bool,
}

impl ChoreTemplate {
    /// Generate a template ID
    pub fn generate_id() -> String {
        format!("template::{}", Uuid::new_v4())
    }
}

/// A single dated occurrence generated from a template
///
/// Instance ID in format: "instance::<uuid>". Title, amount and frequency are
/// snapshots taken at generation time; later template edits only reach
/// instances through the explicit propagation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreInstance {
    pub id: String,
    /// ID of the template this instance was generated from
    pub template_id: String,
    pub title: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    /// Calendar day the chore is due (YYYY-MM-DD)
    pub due_date: NaiveDate,
    pub completed: bool,
    /// Set exactly when completed is true
    pub completed_at: Option<DateTime<Utc>>,
    /// True once a payout has settled this completion
    pub paid_out: bool,
    pub created_at: DateTime<Utc>,
}

impl ChoreInstance {
    /// Generate an instance ID
    pub fn generate_id() -> String {
        format!("instance::{}", Uuid::new_v4())
    }
}

/// A recorded cash-out of earned chore money
///
/// Payout ID in format: "payout::<uuid>". Payouts are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Payout {
    /// Generate a payout ID
    pub fn generate_id() -> String {
        format!("payout::{}", Uuid::new_v4())
    }
}

/// Completion toggle carried by instance PATCH requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceAction {
    Complete,
    Uncomplete,
}

/// Rolling window for completion history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletedFilter {
    All,
    /// Last 7 days
    Week,
    /// Last calendar month
    Month,
    /// Last 3 calendar months
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl Default for CompletedFilter {
    fn default() -> Self {
        CompletedFilter::All
    }
}

/// Request for creating a new chore template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChoreRequest {
    pub title: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    /// Due date of the first generated instance (YYYY-MM-DD)
    pub start_date: NaiveDate,
}

/// Request for updating an existing chore template
///
/// Title and frequency are immutable; only the reward amount and the active
/// flag can change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChoreRequest {
    /// New reward amount, propagated to uncompleted future instances
    pub amount: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Request for extending a template's generated series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateInstancesRequest {
    /// Due date of the first new instance (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Number of instances to generate (defaults to 30)
    pub count: Option<u32>,
}

/// Request to complete or uncomplete a chore instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceActionRequest {
    pub id: String,
    pub action: InstanceAction,
}

/// Request for deleting a single chore instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteInstanceRequest {
    pub id: String,
}

/// Request for recording a payout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePayoutRequest {
    pub amount: Decimal,
    pub notes: Option<String>,
}

/// Response after creating a chore template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChoreResponse {
    pub template: ChoreTemplate,
    /// Size of the initial generated batch
    pub instances_created: usize,
}

/// Response after generating additional instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateInstancesResponse {
    pub instances_created: usize,
}

/// Response after a delete operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Response after recording a payout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePayoutResponse {
    pub payout: Payout,
    /// How many completed instances this payout settled
    pub instances_settled: u64,
}

/// Response carrying the derived unsettled earnings total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalEarnedResponse {
    pub total_earned: Decimal,
}

/// Per-template scheduling info for the summary view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSchedule {
    pub template: ChoreTemplate,
    /// Earliest uncompleted due date, if any instances remain open
    pub next_due_date: Option<NaiveDate>,
    /// Most recent completion timestamp across the template's instances
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Lifetime completed earnings for this template, settled included
    pub total_earned: Decimal,
}

/// Active templates grouped by frequency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub daily: Vec<TemplateSchedule>,
    pub weekly: Vec<TemplateSchedule>,
    pub monthly: Vec<TemplateSchedule>,
    pub one_time: Vec<TemplateSchedule>,
}
