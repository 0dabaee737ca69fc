//! Image transform parameters for image URLs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use filedock_core::error::AppError;
use filedock_core::result::AppResult;

/// How an image is fitted into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to fit inside the box, keeping aspect ratio.
    Contain,
    /// Like `Contain` but never upscale.
    Max,
    /// Fit inside the box and pad the remainder.
    Fill,
    /// Ignore aspect ratio.
    Stretch,
    /// Cover the box and crop the overflow.
    Crop,
}

impl ImageFit {
    /// Query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contain => "contain",
            Self::Max => "max",
            Self::Fill => "fill",
            Self::Stretch => "stretch",
            Self::Crop => "crop",
        }
    }
}

impl fmt::Display for ImageFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contain" => Ok(Self::Contain),
            "max" => Ok(Self::Max),
            "fill" => Ok(Self::Fill),
            "stretch" => Ok(Self::Stretch),
            "crop" => Ok(Self::Crop),
            other => Err(AppError::validation(format!("Unknown image fit '{other}'"))),
        }
    }
}

/// Transform parameters appended to an image URL; unset ones are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageParams {
    /// Target width in pixels.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Fit mode.
    pub fit: Option<ImageFit>,
    /// Encoder quality, 1-100.
    pub quality: Option<u8>,
}

impl ImageParams {
    /// No transforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height.
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the fit mode.
    pub fn fit(mut self, fit: ImageFit) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Set the quality.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// `(key, value)` pairs in `w`, `h`, `fit`, `q` order.
    pub(crate) fn query_pairs(&self) -> AppResult<Vec<(&'static str, String)>> {
        if let Some(quality) = self.quality {
            if !(1..=100).contains(&quality) {
                return Err(AppError::validation(format!(
                    "Image quality must be between 1 and 100, got {quality}"
                )));
            }
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(AppError::validation("Image dimensions must be positive"));
        }

        let mut pairs = Vec::new();
        if let Some(width) = self.width {
            pairs.push(("w", width.to_string()));
        }
        if let Some(height) = self.height {
            pairs.push(("h", height.to_string()));
        }
        if let Some(fit) = self.fit {
            pairs.push(("fit", fit.as_str().to_string()));
        }
        if let Some(quality) = self.quality {
            pairs.push(("q", quality.to_string()));
        }
        Ok(pairs)
    }
}
