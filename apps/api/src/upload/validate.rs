use tracing::warn;

use crate::errors::AppError;

/// Size ceiling for uploaded resumes.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5 MiB

/// Allowed extensions and the content types they are expected to carry.
/// Extension is authoritative; content type is advisory only.
pub const ALLOWED_FILE_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
];

/// Checks an upload before any network or storage call is made.
///
/// Rejects: missing file name, size over [`MAX_FILE_SIZE`], extension outside
/// the allowed set. A declared content type that does not match the extension
/// is logged, not rejected.
///
/// Returns the expected content type for the file's extension.
pub fn validate_upload(
    file_name: &str,
    content_type: Option<&str>,
    size: usize,
) -> Result<&'static str, AppError> {
    if file_name.is_empty() {
        return Err(AppError::Validation(
            "Please select a file to upload".to_string(),
        ));
    }

    if size > MAX_FILE_SIZE {
        return Err(AppError::Validation(
            "File size should be less than 5MB".to_string(),
        ));
    }

    let ext = file_name
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let expected_type = ALLOWED_FILE_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == ext)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| {
            AppError::Validation("Please upload a PDF, DOC, DOCX, or TXT file".to_string())
        })?;

    if let Some(declared) = content_type {
        if !ALLOWED_FILE_TYPES.iter().any(|(_, mime)| *mime == declared) {
            warn!("File content type ({declared}) might not match the extension ({ext})");
        }
    }

    Ok(expected_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_extensions() {
        for name in ["resume.pdf", "resume.doc", "resume.docx", "resume.txt"] {
            assert!(validate_upload(name, None, 1024).is_ok(), "{name} rejected");
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(validate_upload("Resume.PDF", None, 1024).is_ok());
    }

    #[test]
    fn test_rejects_missing_file() {
        assert!(matches!(
            validate_upload("", None, 0),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_file() {
        assert!(matches!(
            validate_upload("resume.pdf", None, MAX_FILE_SIZE + 1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_boundary_size_is_accepted() {
        assert!(validate_upload("resume.pdf", None, MAX_FILE_SIZE).is_ok());
    }

    #[test]
    fn test_rejects_disallowed_extension() {
        for name in ["resume.exe", "resume.png", "resume", "resume.pdf.zip"] {
            assert!(validate_upload(name, None, 1024).is_err(), "{name} accepted");
        }
    }

    #[test]
    fn test_content_type_mismatch_is_not_rejected() {
        // Extension is authoritative; a mismatched content type only warns.
        let result = validate_upload("resume.pdf", Some("application/octet-stream"), 1024);
        assert_eq!(result.unwrap(), "application/pdf");
    }
}
