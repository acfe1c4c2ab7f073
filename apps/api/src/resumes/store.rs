//! All SQL touching the `resumes` table. No business rules live here; the
//! handlers own lifecycle decisions and this module only persists them.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{ResumeAnalysis, ResumeRow, ResumeStatus, ResumeSummary};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// `page` defaults to 1 with a floor of 1; `limit` defaults to 10 and is
/// clamped to [1, 50].
pub fn clamp_pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    (page, limit)
}

/// `ceil(total / limit)`; `limit` is already clamped to at least 1.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

// Every column except `extracted_text` and `file_path` (see ResumeSummary).
const SUMMARY_COLUMNS: &str = "id, filename, original_name, file_size_bytes, mime_type, \
     word_count, page_count, analysis_result, status, error_message, created_at, updated_at";

pub struct NewResume<'a> {
    pub filename: &'a str,
    pub original_name: &'a str,
    pub file_path: &'a str,
    pub file_size_bytes: i64,
    pub mime_type: &'a str,
}

pub async fn insert(pool: &PgPool, new: NewResume<'_>) -> sqlx::Result<ResumeRow> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, filename, original_name, file_path, file_size_bytes, mime_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.filename)
    .bind(new.original_name)
    .bind(new.file_path)
    .bind(new.file_size_bytes)
    .bind(new.mime_type)
    .fetch_one(pool)
    .await
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<ResumeRow>> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Marks extraction failure. The record stays around for auditing.
pub async fn mark_failed(pool: &PgPool, id: Uuid, error_message: &str) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE resumes SET status = $2, error_message = $3, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(ResumeStatus::Failed)
    .bind(error_message)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn store_extraction(
    pool: &PgPool,
    id: Uuid,
    text: &str,
    page_count: i32,
    word_count: i32,
) -> sqlx::Result<ResumeRow> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET extracted_text = $2, page_count = $3, word_count = $4,
            status = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(text)
    .bind(page_count)
    .bind(word_count)
    .bind(ResumeStatus::Processed)
    .fetch_one(pool)
    .await
}

/// Overwrites any previous analysis; last write wins on concurrent calls.
pub async fn store_analysis(
    pool: &PgPool,
    id: Uuid,
    analysis: &ResumeAnalysis,
) -> sqlx::Result<ResumeRow> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET analysis_result = $2, status = $3, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(Json(analysis))
    .bind(ResumeStatus::Analyzed)
    .fetch_one(pool)
    .await
}

/// Newest-first page of summaries plus the overall record count.
pub async fn list(
    pool: &PgPool,
    page: i64,
    limit: i64,
) -> sqlx::Result<(Vec<ResumeSummary>, i64)> {
    let offset = (page - 1) * limit;

    let summaries = sqlx::query_as::<_, ResumeSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM resumes ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
        .fetch_one(pool)
        .await?;

    Ok((summaries, total))
}

/// Removes the record, returning it so the caller can clean up the file.
pub async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<ResumeRow>> {
    sqlx::query_as::<_, ResumeRow>("DELETE FROM resumes WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(clamp_pagination(None, None), (1, 10));
    }

    #[test]
    fn test_page_floor_is_one() {
        assert_eq!(clamp_pagination(Some(0), None).0, 1);
        assert_eq!(clamp_pagination(Some(-3), None).0, 1);
        assert_eq!(clamp_pagination(Some(7), None).0, 7);
    }

    #[test]
    fn test_limit_clamped_to_fifty() {
        assert_eq!(clamp_pagination(None, Some(200)).1, 50);
        assert_eq!(clamp_pagination(None, Some(0)).1, 1);
        assert_eq!(clamp_pagination(None, Some(25)).1, 25);
    }

    #[test]
    fn test_total_pages_is_exact_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(101, 50), 3);
    }
}
