//! # Domain Module
//!
//! Contains all business logic for the chore tracker.
//!
//! This module encapsulates the core business rules, entities, and services
//! that define how chores are scheduled, completed, and paid out. It operates
//! independently of any specific transport or storage mechanism.
//!
//! ## Module Organization
//!
//! - **template_service**: Chore template CRUD and instance generation
//! - **instance_service**: Completion toggles and due-instance queries
//! - **earnings_service**: The payable total derived from completed work
//! - **payout_service**: Payout recording and settlement
//! - **schedule_service**: Per-frequency overview of the active templates
//! - **recurrence**: Due date arithmetic for each frequency
//! - **money**: Amount validation and canonical scaling
//!
//! ## Business Rules
//!
//! - Templates are the source of truth; instances snapshot them at generation
//! - Completing an instance earns its amount until a payout settles it
//! - Settled instances stay settled, whatever happens to their completion flag
//! - A payout may never exceed the currently payable total

pub mod earnings_service;
pub mod errors;
pub mod instance_service;
pub mod money;
pub mod payout_service;
pub mod recurrence;
pub mod schedule_service;
pub mod template_service;

pub use earnings_service::*;
pub use errors::*;
pub use instance_service::*;
pub use money::*;
pub use payout_service::*;
pub use recurrence::*;
pub use schedule_service::*;
pub use template_service::*;
