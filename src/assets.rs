//! Asset resolution before layout.
//!
//! Requests may reference images by path (`ImageAsset::Linked`). The loader
//! reads them into `Decoded` resources; anything it cannot read becomes
//! `Unavailable` and is drawn as a placeholder.

use crate::error::{Error, Result};
use crate::model::{DocumentRenderRequest, ImageAsset, Resource};
use std::path::{Path, PathBuf};

/// Default upper bound for one image file (8 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 8 * 1024 * 1024;

/// Loads linked image assets from the filesystem.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_dir: PathBuf,
    max_bytes: u64,
}

impl AssetLoader {
    /// Create a loader resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Loader for the assets of a request file, relative to its directory.
    pub fn for_request_file(path: impl AsRef<Path>) -> Self {
        let dir = path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(dir)
    }

    /// Set the maximum accepted file size.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Directory relative paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute or base-relative location of `path`.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn check_image(&self, path: &str, data: Vec<u8>) -> Result<Resource> {
        if data.len() as u64 > self.max_bytes {
            return Err(Error::Asset(format!(
                "{} is {} bytes (limit {})",
                path,
                data.len(),
                self.max_bytes
            )));
        }
        let resource = Resource::image(data);
        if !resource.is_image() {
            return Err(Error::Asset(format!("{} is not a supported image", path)));
        }
        Ok(resource)
    }

    /// Read an image file.
    pub fn read(&self, path: &str) -> Result<Resource> {
        let full = self.resolve_path(path);
        let data = std::fs::read(&full)?;
        self.check_image(path, data)
    }

    /// Read an image file, degrading to `Unavailable` on failure.
    pub fn load(&self, path: &str) -> ImageAsset {
        match self.read(path) {
            Ok(resource) => {
                log::debug!("Loaded asset {} ({} bytes)", path, resource.size());
                ImageAsset::Decoded(resource)
            }
            Err(e) => {
                log::warn!("Asset {} unavailable: {}", path, e);
                ImageAsset::unavailable(e.to_string())
            }
        }
    }

    /// Replace every linked asset of a request with its loaded form.
    ///
    /// Returns the number of assets that were linked.
    pub fn resolve_request(&self, request: &mut DocumentRenderRequest) -> usize {
        let mut linked = 0;
        for slot in image_slots(request) {
            if let ImageAsset::Linked { path } = slot {
                let path = path.clone();
                *slot = self.load(&path);
                linked += 1;
            }
        }
        linked
    }

    /// Read an image file without blocking the runtime.
    #[cfg(feature = "async")]
    pub async fn read_async(&self, path: &str) -> Result<Resource> {
        let full = self.resolve_path(path);
        let data = tokio::fs::read(&full).await?;
        self.check_image(path, data)
    }

    /// Async variant of [`AssetLoader::load`].
    #[cfg(feature = "async")]
    pub async fn load_async(&self, path: &str) -> ImageAsset {
        match self.read_async(path).await {
            Ok(resource) => ImageAsset::Decoded(resource),
            Err(e) => {
                log::warn!("Asset {} unavailable: {}", path, e);
                ImageAsset::unavailable(e.to_string())
            }
        }
    }

    /// Async variant of [`AssetLoader::resolve_request`].
    #[cfg(feature = "async")]
    pub async fn resolve_request_async(&self, request: &mut DocumentRenderRequest) -> usize {
        let mut linked = 0;
        for slot in image_slots(request) {
            if let ImageAsset::Linked { path } = slot {
                let path = path.clone();
                *slot = self.load_async(&path).await;
                linked += 1;
            }
        }
        linked
    }
}

/// Every image a request can carry: logos and signature images.
fn image_slots(request: &mut DocumentRenderRequest) -> Vec<&mut ImageAsset> {
    let mut slots = Vec::new();
    for contact in [request.company.as_mut(), request.client.as_mut()]
        .into_iter()
        .flatten()
    {
        if let Some(logo) = contact.logo.as_mut() {
            slots.push(logo);
        }
    }
    for signature in &mut request.signatures {
        if let Some(completion) = signature.completion.as_mut() {
            slots.push(&mut completion.image);
        }
    }
    slots
}
