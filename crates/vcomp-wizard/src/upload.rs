//! Client-side checks run before a file is sent to the backend.

use std::fmt;

use vcomp_client::LocalVideoFile;
use vcomp_models::format_file_size;

/// Extensions accepted regardless of the MIME type.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Why a file never left the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Neither a `video/*` MIME type nor an accepted extension
    UnsupportedFormat,
    /// At or above the configured size limit
    TooLarge { size: u64, limit: u64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnsupportedFormat => write!(f, "not a supported video format"),
            RejectReason::TooLarge { size, limit } => write!(
                f,
                "file is {} but must be smaller than {}",
                format_file_size(*size),
                format_file_size(*limit)
            ),
        }
    }
}

/// True if the file looks like a video by MIME type or extension.
pub fn is_video(file: &LocalVideoFile) -> bool {
    let mime_ok = file
        .mime
        .as_deref()
        .is_some_and(|mime| mime.to_ascii_lowercase().starts_with("video/"));

    mime_ok
        || file
            .extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Check a file before upload.
pub fn validate_file(file: &LocalVideoFile, max_bytes: u64) -> Result<(), RejectReason> {
    if !is_video(file) {
        return Err(RejectReason::UnsupportedFormat);
    }

    if file.size >= max_bytes {
        return Err(RejectReason::TooLarge {
            size: file.size,
            limit: max_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

    #[test]
    fn test_accepts_listed_extensions() {
        for ext in ACCEPTED_EXTENSIONS {
            let file = LocalVideoFile::new(format!("clip.{}", ext.to_uppercase()), 1).with_mime(None);
            assert!(validate_file(&file, DEFAULT_MAX_UPLOAD_BYTES).is_ok(), "{}", ext);
        }
    }

    #[test]
    fn test_accepts_video_mime_with_unlisted_extension() {
        let file = LocalVideoFile::new("capture.m4v", 1).with_mime(Some("video/x-m4v".into()));
        assert!(is_video(&file));

        let file = LocalVideoFile::new("capture.bin", 1).with_mime(Some("Video/MP2T".into()));
        assert!(is_video(&file));
    }

    #[test]
    fn test_rejects_non_video() {
        let file = LocalVideoFile::new("notes.txt", 1);
        assert_eq!(
            validate_file(&file, DEFAULT_MAX_UPLOAD_BYTES),
            Err(RejectReason::UnsupportedFormat)
        );

        let file = LocalVideoFile::new("mp4", 1).with_mime(None);
        assert!(!is_video(&file));
    }

    #[test]
    fn test_size_limit_is_exclusive() {
        let limit = DEFAULT_MAX_UPLOAD_BYTES;

        let just_under = LocalVideoFile::new("a.mp4", limit - 1);
        assert!(validate_file(&just_under, limit).is_ok());

        let at_limit = LocalVideoFile::new("a.mp4", limit);
        assert_eq!(
            validate_file(&at_limit, limit),
            Err(RejectReason::TooLarge { size: limit, limit })
        );
    }

    #[test]
    fn test_reject_reason_message() {
        let reason = RejectReason::TooLarge {
            size: 600 * 1024 * 1024,
            limit: DEFAULT_MAX_UPLOAD_BYTES,
        };
        assert_eq!(reason.to_string(), "file is 600 MB but must be smaller than 500 MB");
    }
}
