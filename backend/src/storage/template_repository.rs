use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::{parse_amount, parse_timestamp, DbConnection};
use shared::{ChoreTemplate, Frequency};

/// Repository for chore template operations
#[derive(Clone)]
pub struct TemplateRepository {
    db: DbConnection,
}

impl TemplateRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a template in the database
    pub async fn store_template(&self, template: &ChoreTemplate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chore_templates (id, title, amount, frequency, created_at, is_active)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template.id)
        .bind(&template.title)
        .bind(template.amount.to_string())
        .bind(template.frequency.as_str())
        .bind(template.created_at.to_rfc3339())
        .bind(template.is_active)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get a template by ID
    pub async fn get_template(&self, template_id: &str) -> Result<Option<ChoreTemplate>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, amount, frequency, created_at, is_active
            FROM chore_templates
            WHERE id = ?
            "#,
        )
        .bind(template_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(template_from_row(&r)?)),
            None => Ok(None),
        }
    }

    /// List active templates, newest first
    pub async fn list_active_templates(&self) -> Result<Vec<ChoreTemplate>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, amount, frequency, created_at, is_active
            FROM chore_templates
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(template_from_row).collect()
    }

    /// Update a template's reward amount
    pub async fn update_amount(&self, template_id: &str, amount: &Decimal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE chore_templates SET amount = ? WHERE id = ?
            "#,
        )
        .bind(amount.to_string())
        .bind(template_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Set a template's active flag
    pub async fn set_active(&self, template_id: &str, is_active: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE chore_templates SET is_active = ? WHERE id = ?
            "#,
        )
        .bind(is_active)
        .bind(template_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete a template; instances follow via the foreign key cascade.
    /// Returns the number of template rows removed.
    pub async fn delete_template(&self, template_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM chore_templates WHERE id = ?
            "#,
        )
        .bind(template_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected())
    }
}

fn template_from_row(row: &SqliteRow) -> Result<ChoreTemplate> {
    let amount: String = row.get("amount");
    let frequency: String = row.get("frequency");
    let created_at: String = row.get("created_at");

    Ok(ChoreTemplate {
        id: row.get("id"),
        title: row.get("title"),
        amount: parse_amount(&amount)?,
        frequency: frequency.parse::<Frequency>()?,
        created_at: parse_timestamp(&created_at)?,
        is_active: row.get("is_active"),
    })
}
