//! On-disk storage for uploaded PDFs. Files live in the configured upload
//! directory under an opaque timestamped name; the database holds the path.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

/// Replaces anything outside `[A-Za-z0-9._-]` so the original filename can
/// be embedded in a path safely.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Unique stored name: unix-millis prefix plus the sanitized original name.
pub fn stored_filename(original_name: &str) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(original_name)
    )
}

pub async fn save_upload(
    upload_dir: &Path,
    stored_name: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(stored_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Best-effort file removal; a failure is logged but never surfaced, so the
/// delete API call still succeeds when the file is already gone.
pub async fn remove_file_best_effort(path: &str) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        warn!("Could not delete file: {path}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("my-resume_v2.pdf"), "my-resume_v2.pdf");
    }

    #[test]
    fn test_sanitize_replaces_path_and_space_characters() {
        assert_eq!(
            sanitize_filename("../etc/passwd my cv.pdf"),
            ".._etc_passwd_my_cv.pdf"
        );
        assert_eq!(sanitize_filename("résumé.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn test_stored_filename_has_millis_prefix() {
        let name = stored_filename("cv.pdf");
        let (prefix, rest) = name.split_once('-').unwrap();
        assert!(prefix.parse::<i64>().is_ok());
        assert_eq!(rest, "cv.pdf");
    }

    #[tokio::test]
    async fn test_save_and_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_upload(dir.path(), "123-cv.pdf", b"%PDF-1.4 test")
            .await
            .unwrap();
        assert!(path.exists());

        remove_file_best_effort(path.to_str().unwrap()).await;
        assert!(!path.exists());

        // Removing again must not panic or error out.
        remove_file_best_effort(path.to_str().unwrap()).await;
    }
}
