use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use shared::{ChoreTemplate, Frequency};

/// A template snapshot projected onto one due date. Ids and timestamps are
/// assigned when the draft is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDraft {
    pub template_id: String,
    pub title: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub due_date: NaiveDate,
}

/// Step one occurrence forward from `date`.
///
/// Monthly steps land on the same day of the next month, clamped to that
/// month's last day (Jan 31 steps to Feb 29 in a leap year). One-time chores
/// have no next occurrence.
pub fn next_due_date(frequency: Frequency, date: NaiveDate) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(1)),
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::OneTime => None,
    }
}

/// Expand a template into up to `count` dated drafts starting at `start_date`.
///
/// Each step compounds from the previous due date, so a clamped monthly date
/// stays clamped for the rest of the series. One-time templates yield a
/// single draft regardless of `count`.
pub fn expand_template(
    template: &ChoreTemplate,
    start_date: NaiveDate,
    count: u32,
) -> Vec<InstanceDraft> {
    let mut drafts = Vec::new();
    let mut due_date = start_date;

    for _ in 0..count {
        drafts.push(InstanceDraft {
            template_id: template.id.clone(),
            title: template.title.clone(),
            amount: template.amount,
            frequency: template.frequency,
            due_date,
        });

        match next_due_date(template.frequency, due_date) {
            Some(next) => due_date = next,
            None => break,
        }
    }

    drafts
}
