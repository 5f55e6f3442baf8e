use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::{parse_amount, parse_timestamp, DbConnection};
use shared::Payout;

/// Repository for payout operations
#[derive(Clone)]
pub struct PayoutRepository {
    db: DbConnection,
}

impl PayoutRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert the payout and mark every completed, unsettled instance as paid
    /// out, in one transaction. A payout row and its settlement pass always
    /// land together. Returns how many instances were settled.
    pub async fn store_payout_and_settle(&self, payout: &Payout) -> Result<u64> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO payouts (id, amount, date, notes)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&payout.id)
        .bind(payout.amount.to_string())
        .bind(payout.date.to_rfc3339())
        .bind(&payout.notes)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE chore_instances
            SET paid_out = TRUE
            WHERE completed = TRUE AND paid_out = FALSE
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// List payouts, newest first
    pub async fn list_payouts(&self) -> Result<Vec<Payout>> {
        let rows = sqlx::query(
            r#"
            SELECT id, amount, date, notes
            FROM payouts
            ORDER BY date DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(payout_from_row).collect()
    }
}

fn payout_from_row(row: &SqliteRow) -> Result<Payout> {
    let amount: String = row.get("amount");
    let date: String = row.get("date");

    Ok(Payout {
        id: row.get("id"),
        amount: parse_amount(&amount)?,
        date: parse_timestamp(&date)?,
        notes: row.get("notes"),
    })
}
