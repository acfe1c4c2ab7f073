use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a résumé record. Transitions are closed:
/// `uploaded → processed → analyzed` on the success path,
/// `uploaded → failed` when extraction throws, and `analyzed → analyzed`
/// for re-analysis. Everything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resume_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Uploaded,
    Processed,
    Analyzed,
    Failed,
}

impl ResumeStatus {
    pub fn can_transition_to(self, next: ResumeStatus) -> bool {
        matches!(
            (self, next),
            (ResumeStatus::Uploaded, ResumeStatus::Processed)
                | (ResumeStatus::Uploaded, ResumeStatus::Failed)
                | (ResumeStatus::Processed, ResumeStatus::Analyzed)
                | (ResumeStatus::Analyzed, ResumeStatus::Analyzed)
        )
    }
}

impl std::fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResumeStatus::Uploaded => "uploaded",
            ResumeStatus::Processed => "processed",
            ResumeStatus::Analyzed => "analyzed",
            ResumeStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
    #[default]
    Unknown,
}

/// Which of the five standard résumé sections were detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SectionPresence {
    pub has_contact: bool,
    pub has_summary: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
}

/// Normalized analysis result shared by every provider backend.
///
/// `overall_score` and `experience_level` are required when deserializing a
/// provider response; a payload missing either fails parsing and counts as a
/// provider failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub overall_score: u8,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sections: SectionPresence,
    #[serde(default = "Utc::now")]
    pub analyzed_at: DateTime<Utc>,
}

/// Full persisted résumé record. The on-disk storage path is internal and is
/// never serialized into any API response.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_size_bytes: i64,
    pub mime_type: String,
    pub extracted_text: String,
    pub word_count: i32,
    pub page_count: i32,
    pub analysis_result: Option<Json<ResumeAnalysis>>,
    pub status: ResumeStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-view projection: everything except the extracted text (large) and
/// the storage path (internal).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub file_size_bytes: i64,
    pub mime_type: String,
    pub word_count: i32,
    pub page_count: i32,
    pub analysis_result: Option<Json<ResumeAnalysis>>,
    pub status: ResumeStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path_transitions_allowed() {
        assert!(ResumeStatus::Uploaded.can_transition_to(ResumeStatus::Processed));
        assert!(ResumeStatus::Processed.can_transition_to(ResumeStatus::Analyzed));
        assert!(ResumeStatus::Analyzed.can_transition_to(ResumeStatus::Analyzed));
    }

    #[test]
    fn test_failure_only_reachable_from_uploaded() {
        assert!(ResumeStatus::Uploaded.can_transition_to(ResumeStatus::Failed));
        assert!(!ResumeStatus::Processed.can_transition_to(ResumeStatus::Failed));
        assert!(!ResumeStatus::Analyzed.can_transition_to(ResumeStatus::Failed));
    }

    #[test]
    fn test_failed_is_terminal() {
        for next in [
            ResumeStatus::Uploaded,
            ResumeStatus::Processed,
            ResumeStatus::Analyzed,
            ResumeStatus::Failed,
        ] {
            assert!(!ResumeStatus::Failed.can_transition_to(next));
        }
    }

    #[test]
    fn test_analysis_requires_score_and_level() {
        let missing_level = serde_json::json!({ "overallScore": 80 });
        assert!(serde_json::from_value::<ResumeAnalysis>(missing_level).is_err());

        let missing_score = serde_json::json!({ "experienceLevel": "mid" });
        assert!(serde_json::from_value::<ResumeAnalysis>(missing_score).is_err());

        let minimal = serde_json::json!({ "overallScore": 80, "experienceLevel": "mid" });
        let parsed = serde_json::from_value::<ResumeAnalysis>(minimal).unwrap();
        assert_eq!(parsed.overall_score, 80);
        assert_eq!(parsed.experience_level, ExperienceLevel::Mid);
        assert!(parsed.strengths.is_empty());
        assert!(!parsed.sections.has_contact);
    }

    #[test]
    fn test_row_serialization_hides_file_path() {
        let row = ResumeRow {
            id: Uuid::new_v4(),
            filename: "123-cv.pdf".to_string(),
            original_name: "cv.pdf".to_string(),
            file_path: "uploads/123-cv.pdf".to_string(),
            file_size_bytes: 1024,
            mime_type: "application/pdf".to_string(),
            extracted_text: String::new(),
            word_count: 0,
            page_count: 0,
            analysis_result: None,
            status: ResumeStatus::Uploaded,
            error_message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("filePath").is_none());
        assert_eq!(json["status"], "uploaded");
        assert_eq!(json["originalName"], "cv.pdf");
    }
}
