//! # Media Assets
//!
//! Descriptions of the files a user picks for an upload: the video itself, an
//! optional thumbnail, or a new avatar. Nothing here decodes media; the mime
//! type is derived from the file extension and the duration is supplied by the
//! caller (a browser would read it from a `<video>` element).
//!
//! All checks run before any store write, so a rejected upload leaves no trace.

use crate::error::{MediaError, Result};
use crate::model::VideoDuration;
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
pub const DEFAULT_MAX_DURATION_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLimits {
    pub max_bytes: u64,
    pub max_duration_secs: u32,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

/// A video file selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub mime_type: String,
    pub size_bytes: u64,
    /// Measured duration in (fractional) seconds.
    pub duration_secs: f64,
    /// Where the media lives; stored as the video's `videoUrl`.
    pub source: Option<String>,
}

impl MediaAsset {
    pub fn new(mime_type: impl Into<String>, size_bytes: u64, duration_secs: f64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes,
            duration_secs,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Describes a file on disk. Size comes from file metadata.
    pub fn from_file(path: &Path, duration_secs: f64) -> Result<Self> {
        let size = fs::metadata(path)?.len();
        Ok(Self::new(mime_from_path(path), size, duration_secs)
            .with_source(path.display().to_string()))
    }

    /// Checks type, size and length, returning the floored duration.
    pub fn validate(&self, limits: &MediaLimits) -> std::result::Result<VideoDuration, MediaError> {
        if !self.mime_type.starts_with("video/") {
            return Err(MediaError::NotAVideo(self.mime_type.clone()));
        }
        if self.size_bytes > limits.max_bytes {
            return Err(MediaError::FileTooLarge {
                size: self.size_bytes,
                max: limits.max_bytes,
            });
        }
        let duration = VideoDuration::from_secs_f64(self.duration_secs)?;
        if self.duration_secs > f64::from(limits.max_duration_secs) {
            return Err(MediaError::TooLong {
                actual: duration.to_string(),
                max: VideoDuration::from_secs(limits.max_duration_secs).to_string(),
            });
        }
        Ok(duration)
    }
}

/// A thumbnail or avatar image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub mime_type: String,
    pub source: String,
}

impl ImageAsset {
    pub fn new(mime_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            source: source.into(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(mime_from_path(path), path.display().to_string())
    }

    pub fn validate(&self) -> std::result::Result<(), MediaError> {
        if self.mime_type.starts_with("image/") {
            Ok(())
        } else {
            Err(MediaError::NotAnImage(self.mime_type.clone()))
        }
    }
}

/// Maps a file extension to a mime type.
pub fn mime_from_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "ogv" => "video/ogg",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn accepts_video_within_limits() {
        let asset = MediaAsset::new("video/mp4", 1024, 299.9);
        let duration = asset.validate(&MediaLimits::default()).unwrap();
        assert_eq!(duration.to_string(), "4:59");
    }

    #[test]
    fn rejects_non_video_mime() {
        let asset = MediaAsset::new("image/png", 10, 1.0);
        assert_eq!(
            asset.validate(&MediaLimits::default()),
            Err(MediaError::NotAVideo("image/png".into()))
        );
    }

    #[test]
    fn rejects_oversized_file() {
        let asset = MediaAsset::new("video/mp4", DEFAULT_MAX_UPLOAD_BYTES + 1, 10.0);
        assert!(matches!(
            asset.validate(&MediaLimits::default()),
            Err(MediaError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_video_over_five_minutes() {
        let asset = MediaAsset::new("video/mp4", 10, 301.0);
        let err = asset.validate(&MediaLimits::default()).unwrap_err();
        assert_eq!(
            err,
            MediaError::TooLong {
                actual: "5:01".into(),
                max: "5:00".into()
            }
        );
        // Exactly five minutes is fine, a fraction more is not.
        assert!(MediaAsset::new("video/mp4", 10, 300.0)
            .validate(&MediaLimits::default())
            .is_ok());
        assert!(MediaAsset::new("video/mp4", 10, 300.4)
            .validate(&MediaLimits::default())
            .is_err());
    }

    #[test]
    fn custom_limits_apply() {
        let limits = MediaLimits {
            max_bytes: 100,
            max_duration_secs: 10,
        };
        assert!(MediaAsset::new("video/webm", 50, 9.0).validate(&limits).is_ok());
        assert!(MediaAsset::new("video/webm", 150, 9.0).validate(&limits).is_err());
        assert!(MediaAsset::new("video/webm", 50, 11.0).validate(&limits).is_err());
    }

    #[test]
    fn image_must_be_image() {
        assert!(ImageAsset::new("image/png", "a.png").validate().is_ok());
        assert_eq!(
            ImageAsset::new("video/mp4", "a.mp4").validate(),
            Err(MediaError::NotAnImage("video/mp4".into()))
        );
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_from_path(&PathBuf::from("clip.MP4")), "video/mp4");
        assert_eq!(mime_from_path(&PathBuf::from("thumb.jpeg")), "image/jpeg");
        assert_eq!(
            mime_from_path(&PathBuf::from("noext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn from_file_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.webm");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let asset = MediaAsset::from_file(&path, 12.0).unwrap();
        assert_eq!(asset.size_bytes, 2048);
        assert_eq!(asset.mime_type, "video/webm");
        assert!(asset.source.unwrap().ends_with("clip.webm"));
    }
}
