//! File type classification derived from the MIME type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use filedock_core::error::AppError;

/// Coarse file category used to pick a rendering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Raster or vector images.
    Image,
    /// Video containers.
    Video,
    /// Audio containers.
    Audio,
    /// Text, PDF and office documents.
    Document,
    /// Compressed archives.
    Archive,
    /// Anything else.
    Other,
}

const ARCHIVE_TYPES: &[&str] = &[
    "application/zip",
    "application/gzip",
    "application/x-gzip",
    "application/x-tar",
    "application/x-7z-compressed",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/x-bzip2",
    "application/x-xz",
];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/json",
    "application/xml",
    "application/rtf",
    "application/msword",
];

const DOCUMENT_PREFIXES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.",
    "application/vnd.ms-",
    "application/vnd.oasis.opendocument.",
];

impl FileType {
    /// Classify a MIME type (parameters such as `; charset=` are ignored).
    pub fn from_mime(mime_type: &str) -> Self {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.split_once('/') {
            Some(("image", _)) => Self::Image,
            Some(("video", _)) => Self::Video,
            Some(("audio", _)) => Self::Audio,
            Some(("text", _)) => Self::Document,
            _ if ARCHIVE_TYPES.contains(&essence.as_str()) => Self::Archive,
            _ if DOCUMENT_TYPES.contains(&essence.as_str()) => Self::Document,
            _ if DOCUMENT_PREFIXES.iter().any(|p| essence.starts_with(p)) => Self::Document,
            _ => Self::Other,
        }
    }

    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "document" => Ok(Self::Document),
            "archive" => Ok(Self::Archive),
            "other" => Ok(Self::Other),
            _ => Err(AppError::validation(format!(
                "Invalid file type: '{s}'. Expected one of: image, video, audio, document, archive, other"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(FileType::from_mime("image/png"), FileType::Image);
        assert_eq!(FileType::from_mime("video/mp4"), FileType::Video);
        assert_eq!(FileType::from_mime("audio/mpeg"), FileType::Audio);
        assert_eq!(FileType::from_mime("text/plain; charset=utf-8"), FileType::Document);
        assert_eq!(FileType::from_mime("application/pdf"), FileType::Document);
        assert_eq!(
            FileType::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            FileType::Document
        );
        assert_eq!(FileType::from_mime("application/zip"), FileType::Archive);
        assert_eq!(FileType::from_mime("application/octet-stream"), FileType::Other);
        assert_eq!(FileType::from_mime(""), FileType::Other);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Image".parse::<FileType>().ok(), Some(FileType::Image));
        assert!("picture".parse::<FileType>().is_err());
    }
}
