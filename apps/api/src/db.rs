use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

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

const CREATE_STATUS_TYPE: &str = r#"
DO $$ BEGIN
    CREATE TYPE resume_status AS ENUM ('uploaded', 'processed', 'analyzed', 'failed');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$
"#;

const CREATE_RESUMES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS resumes (
    id              UUID PRIMARY KEY,
    filename        TEXT NOT NULL,
    original_name   TEXT NOT NULL,
    file_path       TEXT NOT NULL,
    file_size_bytes BIGINT NOT NULL,
    mime_type       TEXT NOT NULL DEFAULT 'application/pdf',
    extracted_text  TEXT NOT NULL DEFAULT '',
    word_count      INTEGER NOT NULL DEFAULT 0,
    page_count      INTEGER NOT NULL DEFAULT 0,
    analysis_result JSONB,
    status          resume_status NOT NULL DEFAULT 'uploaded',
    error_message   TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

// Both list orderings the API serves: newest-first overall and
// newest-first within a status.
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS resumes_status_created_at_idx ON resumes (status, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS resumes_created_at_idx ON resumes (created_at DESC)",
];

/// Applies the schema idempotently at startup. There is a single table, so
/// in-binary DDL stands in for a migrations directory.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_STATUS_TYPE).execute(pool).await?;
    sqlx::query(CREATE_RESUMES_TABLE).execute(pool).await?;
    for stmt in CREATE_INDEXES {
        sqlx::query(stmt).execute(pool).await?;
    }

    info!("Database schema ensured");
    Ok(())
}
