use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:chores.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // SQLite ships with foreign keys off; the template -> instance
        // cascade depends on them being enforced
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database, honoring the CHORE_TRACKER_DB override
    pub async fn init() -> Result<Self> {
        let url = std::env::var("CHORE_TRACKER_DB").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create chore_templates table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chore_templates (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                frequency TEXT NOT NULL,
                created_at TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for listing templates newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chore_templates_created_at
            ON chore_templates(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Create chore_instances table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chore_instances (
                id TEXT PRIMARY KEY,
                template_id TEXT NOT NULL,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                frequency TEXT NOT NULL,
                due_date TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                completed_at TEXT,
                paid_out BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL,
                FOREIGN KEY (template_id) REFERENCES chore_templates (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for template_id filtering (propagation, cascade)
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chore_instances_template_id
            ON chore_instances(template_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for the by-date and due queries
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chore_instances_due_date
            ON chore_instances(due_date);
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for earnings and settlement scans
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chore_instances_completed
            ON chore_instances(completed, paid_out);
            "#,
        )
        .execute(pool)
        .await?;

        // Create payouts table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payouts (
                id TEXT PRIMARY KEY,
                amount TEXT NOT NULL,
                date TEXT NOT NULL,
                notes TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for listing payouts newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_payouts_date
            ON payouts(date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
