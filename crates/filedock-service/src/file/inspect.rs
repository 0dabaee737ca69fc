//! Content fingerprinting and type detection at registration time.

use std::path::Path;

use sha2::{Digest, Sha256};

/// MIME type used when neither the content nor the name identify the file.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Properties computed once from the content and fixed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    /// SHA-256 hex digest.
    pub hash: String,
    /// Detected MIME type.
    pub mime_type: String,
    /// Lowercase extension without the dot; empty if unknown.
    pub extension: String,
    /// Byte length.
    pub size_bytes: i64,
}

impl ContentInfo {
    /// Inspect `content` registered under `name`.
    pub fn inspect(name: &str, content: &[u8]) -> Self {
        let sniffed = infer::get(content);
        let mime_type = sniffed
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| {
                mime_guess::from_path(name)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        let extension = name_extension(name)
            .or_else(|| sniffed.map(|kind| kind.extension().to_string()))
            .unwrap_or_default();

        Self {
            hash: sha256_hex(content),
            mime_type,
            extension,
            size_bytes: i64::try_from(content.len()).unwrap_or(i64::MAX),
        }
    }
}

/// SHA-256 of `content` as lowercase hex.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn name_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}
