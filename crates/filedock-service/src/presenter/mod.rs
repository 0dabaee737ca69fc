//! Path and presentation resolution over a resolved file.
//!
//! Everything here is a pure function of the [`ResolvedFile`], the
//! [`UrlContext`] and the adapters' public roots: no I/O and no ambient
//! request state.

pub mod paths;
pub mod size;
pub mod thumbnail;

use chrono::{DateTime, Utc};
use url::Url;

use filedock_core::config::{PresentationConfig, SizeScale};
use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_entity::file::FileType;
use filedock_storage::AdapterRegistry;

use crate::context::UrlContext;
use crate::file::ResolvedFile;

pub use paths::{ImageFit, ImageParams};
pub use size::readable_size;
pub use thumbnail::{PREVIEW_SIZE, THUMBNAIL_SIZE, Thumbnail};

const DEFAULT_THUMBNAIL_CLASS: &str = "img-rounded";

/// Derives access paths and display values for one file.
#[derive(Debug, Clone)]
pub struct FilePresenter<'a> {
    resolved: &'a ResolvedFile,
    ctx: &'a UrlContext,
    adapters: &'a AdapterRegistry,
    size_scale: SizeScale,
    thumbnail_class: &'a str,
}

impl<'a> FilePresenter<'a> {
    /// Presenter with the default size scale and thumbnail class.
    pub fn new(
        resolved: &'a ResolvedFile,
        ctx: &'a UrlContext,
        adapters: &'a AdapterRegistry,
    ) -> Self {
        Self {
            resolved,
            ctx,
            adapters,
            size_scale: SizeScale::default(),
            thumbnail_class: DEFAULT_THUMBNAIL_CLASS,
        }
    }

    /// Apply the display settings from configuration.
    pub fn with_config(mut self, config: &'a PresentationConfig) -> Self {
        self.size_scale = config.size_scale;
        self.thumbnail_class = &config.thumbnail_class;
        self
    }

    /// Override the size scale.
    pub fn with_size_scale(mut self, scale: SizeScale) -> Self {
        self.size_scale = scale;
        self
    }

    /// `folder/path/name.ext`, or `name.ext` at the disk root.
    pub fn path(&self) -> String {
        self.resolved.location()
    }

    /// `{slug}://{path}`.
    pub fn disk_path(&self) -> String {
        format!("{}://{}", self.resolved.disk.slug, self.path())
    }

    /// URL under the adapter's public root.
    pub fn public_path(&self) -> AppResult<String> {
        let disk = &self.resolved.disk;
        let root = self.adapters.public_root(&disk.adapter).ok_or_else(|| {
            AppError::unsupported(format!("Disk '{}' is not publicly exposed", disk.slug))
        })?;

        let mut url = root.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::unsupported(format!("Public root of disk '{}' cannot carry paths", disk.slug))
            })?
            .pop_if_empty()
            .extend(self.path().split('/'));
        Ok(url.into())
    }

    /// `{base}/files/stream/{slug}/{path}`.
    pub fn stream_path(&self) -> String {
        self.route("stream").into()
    }

    /// `{base}/files/download/{slug}/{path}`.
    pub fn download_path(&self) -> String {
        self.route("download").into()
    }

    /// `{base}/files/image/{slug}/{path}?w=&h=&fit=&q=` for images.
    pub fn image_path(&self, params: &ImageParams) -> AppResult<String> {
        if !self.resolved.file.is_image() {
            return Err(AppError::unsupported(format!(
                "'{}' is a {} file, not an image",
                self.resolved.file.name,
                self.file_type()
            )));
        }

        let pairs = params.query_pairs()?;
        let mut url = self.route("image");
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url.into())
    }

    /// Size with two decimals, e.g. `1.5 KB`.
    pub fn readable_size(&self) -> String {
        self.readable_size_with(2)
    }

    /// Size with up to `decimals` fractional digits.
    pub fn readable_size_with(&self, decimals: usize) -> String {
        let bytes = u64::try_from(self.resolved.file.size_bytes).unwrap_or(0);
        readable_size(bytes, decimals, self.size_scale)
    }

    /// Cropped `width`×`height` image reference.
    pub fn thumbnail(&self, width: u32, height: u32) -> AppResult<Thumbnail> {
        let params = ImageParams::new()
            .width(width)
            .height(height)
            .fit(ImageFit::Crop);
        let file = &self.resolved.file;
        Ok(Thumbnail {
            src: self.image_path(&params)?,
            width,
            height,
            alt: file.alt.clone().unwrap_or_else(|| file.name.clone()),
            class: self.thumbnail_class.to_string(),
        })
    }

    /// [`thumbnail`](Self::thumbnail) at the default size.
    pub fn default_thumbnail(&self) -> AppResult<Thumbnail> {
        self.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    }

    /// Small thumbnail for images, nothing for other files.
    pub fn preview(&self) -> Option<Thumbnail> {
        if !self.resolved.file.is_image() {
            return None;
        }
        self.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).ok()
    }

    /// Classification of the file.
    pub fn file_type(&self) -> FileType {
        self.resolved.file.file_type()
    }

    /// Disk name in the context locale.
    pub fn disk_name(&self) -> &'a str {
        self.resolved
            .disk
            .display_name(&self.ctx.locale, &self.ctx.fallback_locale)
    }

    /// Disk description in the context locale.
    pub fn disk_description(&self) -> Option<&'a str> {
        self.resolved
            .disk
            .display_description(&self.ctx.locale, &self.ctx.fallback_locale)
    }

    /// When the content was written.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.resolved.file.last_modified
    }

    fn route(&self, kind: &str) -> Url {
        let path = self.path();
        let slug = self.resolved.disk.slug.as_str();
        self.ctx.route(&["files", kind, slug], path.split('/'))
    }
}
