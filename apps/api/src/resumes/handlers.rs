use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::analysis::provider::AnalyzeOptions;
use crate::errors::AppError;
use crate::extraction::{self, MIN_TEXT_CHARS};
use crate::models::resume::ResumeStatus;
use crate::resumes::storage;
use crate::resumes::store::{self, NewResume};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "resume";
const PDF_MIME: &str = "application/pdf";

/// Identifier guard applied before any store access: malformed ids are a 400,
/// never a wasted lookup.
fn parse_resume_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid ID format: \"{raw}\"")))
}

/// POST /api/resumes/upload
///
/// Accepts a single PDF in the `resume` multipart field, stores it, creates
/// the record, and extracts its text. Extraction failure marks the record
/// `failed` but keeps both the record and the file for auditing.
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            return Err(AppError::Validation(
                r#"Unexpected field name. Use "resume" as the form field name."#.to_string(),
            ));
        }

        let original_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let mime_type = field.content_type().unwrap_or("").to_string();
        if mime_type != PDF_MIME {
            return Err(AppError::Validation("Only PDF files are allowed.".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        if data.len() as u64 > state.config.max_file_size_bytes() {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {}MB.",
                state.config.max_file_size_mb
            )));
        }

        if file.is_some() {
            return Err(AppError::Validation(
                "Too many files. Upload one file at a time.".to_string(),
            ));
        }
        file = Some((original_name, mime_type, data.to_vec()));
    }

    let (original_name, mime_type, data) =
        file.ok_or_else(|| AppError::Validation("Please upload a PDF file.".to_string()))?;

    let stored_name = storage::stored_filename(&original_name);
    let path = storage::save_upload(
        std::path::Path::new(&state.config.upload_dir),
        &stored_name,
        &data,
    )
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::Error::new(e).context("Failed to store uploaded file"))
    })?;
    let path_str = path.to_string_lossy().into_owned();

    let record = store::insert(
        &state.db,
        NewResume {
            filename: &stored_name,
            original_name: &original_name,
            file_path: &path_str,
            file_size_bytes: data.len() as i64,
            mime_type: &mime_type,
        },
    )
    .await?;

    let extracted = match extraction::extract_pdf(&path).await {
        Ok(doc) => doc,
        Err(err) => {
            // The record survives as `failed`; the file stays on disk.
            store::mark_failed(&state.db, record.id, &err.to_string()).await?;
            return Err(err.into());
        }
    };

    let record = store::store_extraction(
        &state.db,
        record.id,
        &extracted.text,
        extracted.page_count,
        extracted.word_count,
    )
    .await?;

    info!("Resume uploaded and processed: {}", record.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Resume uploaded and text extracted successfully.",
            "data": { "resume": record },
        })),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_description: Option<String>,
}

/// POST /api/resumes/:id/analyze
///
/// Runs the configured provider over the extracted text. A provider failure
/// (after the heuristic fallback) leaves the record untouched.
pub async fn analyze_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<AnalyzeRequest>>,
) -> Result<Json<Value>, AppError> {
    let id = parse_resume_id(&id)?;

    let record = store::fetch(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No resume found with ID: {id}")))?;

    if record.status == ResumeStatus::Failed {
        return Err(AppError::Unprocessable(
            "This resume failed to process and cannot be analyzed.".to_string(),
        ));
    }

    if record.extracted_text.trim().len() < MIN_TEXT_CHARS {
        return Err(AppError::Unprocessable(
            "Resume has insufficient text content for analysis.".to_string(),
        ));
    }

    let options = AnalyzeOptions {
        job_description: body.and_then(|Json(b)| b.job_description),
    };

    let analysis = state
        .analyzer
        .analyze(&record.extracted_text, &options)
        .await?;

    let updated = store::store_analysis(&state.db, id, &analysis).await?;

    info!("Resume analyzed: {id} | Score: {}", analysis.overall_score);

    Ok(Json(json!({
        "status": "success",
        "message": "Resume analyzed successfully.",
        "data": { "resume": updated, "analysis": analysis },
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/resumes: paginated summaries, newest first, no extracted text.
pub async fn list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, AppError> {
    let (page, limit) = store::clamp_pagination(params.page, params.limit);
    let (resumes, total) = store::list(&state.db, page, limit).await?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "resumes": resumes,
            "pagination": {
                "total": total,
                "page": page,
                "limit": limit,
                "totalPages": store::total_pages(total, limit),
            },
        },
    })))
}

/// GET /api/resumes/:id: full record including extracted text and analysis.
pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_resume_id(&id)?;

    let record = store::fetch(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No resume found with ID: {id}")))?;

    Ok(Json(json!({
        "status": "success",
        "data": { "resume": record },
    })))
}

/// DELETE /api/resumes/:id: removes the record, then best-effort deletes the
/// stored file.
pub async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_resume_id(&id)?;

    let record = store::delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No resume found with ID: {id}")))?;

    storage::remove_file_best_effort(&record.file_path).await;

    info!("Resume deleted: {id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_id_rejected_before_store_access() {
        let err = parse_resume_id("not-an-id").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_well_formed_uuid_accepted() {
        let id = Uuid::new_v4();
        assert_eq!(parse_resume_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_analyze_request_accepts_camel_case_body() {
        let body: AnalyzeRequest =
            serde_json::from_str(r#"{"jobDescription": "Senior Rust engineer"}"#).unwrap();
        assert_eq!(body.job_description.as_deref(), Some("Senior Rust engineer"));

        let empty: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.job_description.is_none());
    }
}
