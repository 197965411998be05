use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Table bootstrap. Idempotent; there is no migration history.
/// `candidates.job_id` has no foreign key: candidates outlive their job.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        job_id       TEXT PRIMARY KEY,
        title        TEXT NOT NULL,
        description  TEXT NOT NULL DEFAULT '',
        requirements TEXT[] NOT NULL DEFAULT '{}',
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS candidates (
        candidate_id        TEXT PRIMARY KEY,
        name                TEXT NOT NULL,
        job_id              TEXT NOT NULL,
        resume_text         TEXT,
        status              TEXT NOT NULL DEFAULT 'applied',
        score               DOUBLE PRECISION,
        persona             TEXT,
        interview_tasks     TEXT[],
        performance_review  TEXT,
        performance_metrics JSONB,
        task_evaluation     TEXT,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at          TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS candidates_job_id_idx ON candidates (job_id)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the jobs and candidates tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to bootstrap database schema")?;
    }
    info!("Database schema ready");
    Ok(())
}
