//! Image assets supplied alongside a render request (logos, signatures).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Decoded image bytes ready to be placed on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Raw binary data (base64 in JSON)
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,
}

impl Resource {
    /// Create an image resource, detecting the MIME type from magic bytes.
    pub fn image(data: Vec<u8>) -> Self {
        let mime_type = Self::detect_mime_type(&data)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self { data, mime_type }
    }

    /// Get the size of the resource data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if the data looks like a placeable image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Detect MIME type from data magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        None
    }
}

/// An image slot after asset resolution.
///
/// Fetching happens before the engine runs; a failed fetch or decode is
/// recorded as `Unavailable` and rendered as a text placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageAsset {
    /// Bytes are available
    Decoded(Resource),
    /// The asset could not be fetched or decoded
    Unavailable {
        /// Why the asset is missing, for logs and the audit page
        reason: String,
    },
    /// A file reference not yet fetched; see [`crate::assets::AssetLoader`]
    Linked {
        /// Path relative to the loader's base directory
        path: String,
    },
}

impl ImageAsset {
    /// Wrap raw bytes, degrading to `Unavailable` when they are not an image.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let resource = Resource::image(data);
        if resource.is_image() {
            ImageAsset::Decoded(resource)
        } else {
            ImageAsset::unavailable("unrecognized image format")
        }
    }

    /// Create an unavailable asset.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ImageAsset::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a reference to a file that still has to be loaded.
    pub fn linked(path: impl Into<String>) -> Self {
        ImageAsset::Linked { path: path.into() }
    }

    /// Get the decoded resource, if any.
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            ImageAsset::Decoded(r) => Some(r),
            ImageAsset::Unavailable { .. } | ImageAsset::Linked { .. } => None,
        }
    }

    /// Check if bytes are available.
    pub fn is_available(&self) -> bool {
        self.resource().is_some()
    }
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        // Accept data URLs as well as bare base64.
        let payload = match encoded.split_once(";base64,") {
            Some((_, rest)) => rest,
            None => encoded.as_str(),
        };
        STANDARD
            .decode(payload.trim())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_detect_mime_type() {
        let jpeg_data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(Resource::detect_mime_type(&jpeg_data), Some("image/jpeg"));
        assert_eq!(Resource::detect_mime_type(&PNG_HEADER), Some("image/png"));

        let unknown = vec![0x00, 0x00, 0x00, 0x00];
        assert_eq!(Resource::detect_mime_type(&unknown), None);
    }

    #[test]
    fn test_from_bytes_degrades() {
        assert!(ImageAsset::from_bytes(PNG_HEADER.to_vec()).is_available());
        let bad = ImageAsset::from_bytes(b"not an image".to_vec());
        assert!(!bad.is_available());
        assert!(matches!(bad, ImageAsset::Unavailable { .. }));
    }

    #[test]
    fn test_resource_json_base64() {
        let resource = Resource::image(PNG_HEADER.to_vec());
        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains("iVBORw0KGgo="));

        let back: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resource);
    }

    #[test]
    fn test_resource_accepts_data_url() {
        let json = r#"{"data":"data:image/png;base64,iVBORw0KGgo=","mime_type":"image/png"}"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.data, PNG_HEADER.to_vec());
    }
}
