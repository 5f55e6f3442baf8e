use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::{parse_amount, parse_date, parse_timestamp, DbConnection};
use shared::{ChoreInstance, Frequency};

/// Repository for chore instance operations
#[derive(Clone)]
pub struct InstanceRepository {
    db: DbConnection,
}

impl InstanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a batch of instances in one transaction, so a generated series
    /// is never half-persisted
    pub async fn store_instances(&self, instances: &[ChoreInstance]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        for instance in instances {
            sqlx::query(
                r#"
                INSERT INTO chore_instances
                    (id, template_id, title, amount, frequency, due_date,
                     completed, completed_at, paid_out, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&instance.id)
            .bind(&instance.template_id)
            .bind(&instance.title)
            .bind(instance.amount.to_string())
            .bind(instance.frequency.as_str())
            .bind(instance.due_date.to_string())
            .bind(instance.completed)
            .bind(instance.completed_at.map(|at| at.to_rfc3339()))
            .bind(instance.paid_out)
            .bind(instance.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get an instance by ID
    pub async fn get_instance(&self, instance_id: &str) -> Result<Option<ChoreInstance>> {
        let row = sqlx::query(
            r#"
            SELECT id, template_id, title, amount, frequency, due_date,
                   completed, completed_at, paid_out, created_at
            FROM chore_instances
            WHERE id = ?
            "#,
        )
        .bind(instance_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(instance_from_row(&r)?)),
            None => Ok(None),
        }
    }

    /// List all instances, newest generation batch first
    pub async fn list_instances(&self) -> Result<Vec<ChoreInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT id, template_id, title, amount, frequency, due_date,
                   completed, completed_at, paid_out, created_at
            FROM chore_instances
            ORDER BY created_at DESC, due_date ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(instance_from_row).collect()
    }

    /// Get uncompleted instances due on one calendar day, ordered by title
    pub async fn get_chores_for_date(&self, date: NaiveDate) -> Result<Vec<ChoreInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT id, template_id, title, amount, frequency, due_date,
                   completed, completed_at, paid_out, created_at
            FROM chore_instances
            WHERE completed = FALSE AND due_date = ?
            ORDER BY title ASC
            "#,
        )
        .bind(date.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(instance_from_row).collect()
    }

    /// Get uncompleted instances due on or before the given day, oldest due first
    pub async fn get_due_chores(&self, today: NaiveDate) -> Result<Vec<ChoreInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT id, template_id, title, amount, frequency, due_date,
                   completed, completed_at, paid_out, created_at
            FROM chore_instances
            WHERE completed = FALSE AND due_date <= ?
            ORDER BY due_date ASC
            "#,
        )
        .bind(today.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(instance_from_row).collect()
    }

    /// Get completed instances, most recently completed first, optionally
    /// limited to completions at or after a cutoff
    pub async fn get_completed_since(
        &self,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<Vec<ChoreInstance>> {
        let query = if let Some(cutoff) = cutoff {
            sqlx::query(
                r#"
                SELECT id, template_id, title, amount, frequency, due_date,
                       completed, completed_at, paid_out, created_at
                FROM chore_instances
                WHERE completed = TRUE AND completed_at >= ?
                ORDER BY completed_at DESC
                "#,
            )
            .bind(cutoff.to_rfc3339())
        } else {
            sqlx::query(
                r#"
                SELECT id, template_id, title, amount, frequency, due_date,
                       completed, completed_at, paid_out, created_at
                FROM chore_instances
                WHERE completed = TRUE
                ORDER BY completed_at DESC
                "#,
            )
        };

        let rows = query.fetch_all(self.db.pool()).await?;

        rows.iter().map(instance_from_row).collect()
    }

    /// Get completed instances that no payout has settled yet
    pub async fn get_completed_unsettled(&self) -> Result<Vec<ChoreInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT id, template_id, title, amount, frequency, due_date,
                   completed, completed_at, paid_out, created_at
            FROM chore_instances
            WHERE completed = TRUE AND paid_out = FALSE
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(instance_from_row).collect()
    }

    /// Write both halves of the completion state together.
    /// Returns the number of rows updated.
    pub async fn set_completion(
        &self,
        instance_id: &str,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE chore_instances SET completed = ?, completed_at = ? WHERE id = ?
            "#,
        )
        .bind(completed)
        .bind(completed_at.map(|at| at.to_rfc3339()))
        .bind(instance_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected())
    }

    /// Rewrite the snapshot amount on a template's uncompleted instances due
    /// strictly after the given day. Returns the number of rows updated.
    pub async fn propagate_amount(
        &self,
        template_id: &str,
        amount: &Decimal,
        after: NaiveDate,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE chore_instances
            SET amount = ?
            WHERE template_id = ? AND completed = FALSE AND due_date > ?
            "#,
        )
        .bind(amount.to_string())
        .bind(template_id)
        .bind(after.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a single instance. Returns the number of rows removed.
    pub async fn delete_instance(&self, instance_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM chore_instances WHERE id = ?
            "#,
        )
        .bind(instance_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected())
    }
}

fn instance_from_row(row: &SqliteRow) -> Result<ChoreInstance> {
    let amount: String = row.get("amount");
    let frequency: String = row.get("frequency");
    let due_date: String = row.get("due_date");
    let created_at: String = row.get("created_at");
    let completed_at = match row.get::<Option<String>, _>("completed_at") {
        Some(text) => Some(parse_timestamp(&text)?),
        None => None,
    };

    Ok(ChoreInstance {
        id: row.get("id"),
        template_id: row.get("template_id"),
        title: row.get("title"),
        amount: parse_amount(&amount)?,
        frequency: frequency.parse::<Frequency>()?,
        due_date: parse_date(&due_date)?,
        completed: row.get("completed"),
        completed_at,
        paid_out: row.get("paid_out"),
        created_at: parse_timestamp(&created_at)?,
    })
}
