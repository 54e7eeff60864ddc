//! Map snapshot image loading.
//!
//! The path in the store may point at a file that was deleted, truncated, or
//! never finished writing. Loading is therefore always fallible, and the map
//! renderer turns every [`ImageError`] into the placeholder background. A file
//! only counts as loadable once it decodes in full.

use std::fmt;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Default ceiling for a map image, in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 8 * 1024 * 1024;

/// Why a map image could not be used.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No file at the path.
    #[error("{path} does not exist")]
    NotFound {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The path exists but is not a regular file.
    #[error("{path} is not a regular file")]
    NotAFile {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Unreadable {
        /// Path that was tried.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file has no content.
    #[error("{path} is empty")]
    Empty {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The file exceeds the configured size ceiling.
    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    TooLarge {
        /// Path that was tried.
        path: PathBuf,
        /// Actual size.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// The content does not start with a known image signature.
    #[error("{path} is not a recognized image")]
    UnrecognizedFormat {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The signature is known but the content does not decode.
    #[error("{path} is a corrupt {format} image: {source}")]
    Corrupt {
        /// Path that was tried.
        path: PathBuf,
        /// Format claimed by the signature.
        format: ImageFormat,
        /// The decoder error.
        #[source]
        source: ::image::ImageError,
    },
}

/// Image container formats a widget host can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG / JFIF.
    Jpeg,
    /// GIF87a or GIF89a.
    Gif,
    /// RIFF WebP.
    WebP,
    /// Windows bitmap.
    Bmp,
}

impl ImageFormat {
    /// Every supported format.
    pub const ALL: [Self; 5] = [Self::Png, Self::Jpeg, Self::Gif, Self::WebP, Self::Bmp];

    /// Detect the format from the leading bytes.
    ///
    /// PNG additionally requires the `IHDR` chunk in first position, so a file
    /// cut off right after the signature is rejected.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

        if bytes.starts_with(PNG_SIGNATURE) {
            return (bytes.len() >= 16 && &bytes[12..16] == b"IHDR").then_some(Self::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        if bytes.len() >= 26 && bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }
        None
    }

    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
        }
    }
}

impl From<ImageFormat> for ::image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => Self::Png,
            ImageFormat::Jpeg => Self::Jpeg,
            ImageFormat::Gif => Self::Gif,
            ImageFormat::WebP => Self::WebP,
            ImageFormat::Bmp => Self::Bmp,
        }
    }
}

/// Sniff and fully decode `bytes`, returning the detected format.
///
/// `path` is only used to label errors.
///
/// # Errors
///
/// Returns [`ImageError::UnrecognizedFormat`] for an unknown signature and
/// [`ImageError::Corrupt`] when the decoder rejects the content.
pub fn verify(path: &Path, bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    let format = ImageFormat::sniff(bytes).ok_or_else(|| ImageError::UnrecognizedFormat {
        path: path.to_path_buf(),
    })?;

    let decoded = ::image::ImageReader::with_format(Cursor::new(bytes), format.into())
        .decode()
        .map_err(|source| ImageError::Corrupt {
            path: path.to_path_buf(),
            format,
            source,
        })?;

    trace!(
        path = %path.display(),
        %format,
        width = decoded.width(),
        height = decoded.height(),
        "Decoded map image"
    );
    Ok(format)
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A map image that passed loading checks.
#[derive(Clone, PartialEq, Eq)]
pub struct MapImage {
    /// Where it was loaded from.
    pub path: PathBuf,
    /// Detected container format.
    pub format: ImageFormat,
    /// Raw file content, handed to the platform decoder as-is.
    pub bytes: Vec<u8>,
}

impl MapImage {
    /// Size of the image file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the image has no bytes. Never true for a loaded image.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for MapImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapImage")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Source of map images for the map renderer.
pub trait ImageLoader {
    /// Load the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageError`] if the file is missing, unreadable, empty,
    /// too large, or does not decode.
    fn load(&self, path: &Path) -> Result<MapImage, ImageError>;
}

/// Loads map images from the local file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsImageLoader {
    max_bytes: u64,
}

impl FsImageLoader {
    /// Create a loader with the default size ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_bytes(DEFAULT_MAX_IMAGE_BYTES)
    }

    /// Create a loader with a custom size ceiling.
    #[must_use]
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// The configured size ceiling.
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl Default for FsImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> Result<MapImage, ImageError> {
        let metadata = std::fs::metadata(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ImageError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ImageError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        if !metadata.is_file() {
            return Err(ImageError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let size = metadata.len();
        if size == 0 {
            return Err(ImageError::Empty {
                path: path.to_path_buf(),
            });
        }
        if size > self.max_bytes {
            return Err(ImageError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(|source| ImageError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let format = verify(path, &bytes)?;

        trace!(path = %path.display(), %format, len = bytes.len(), "Loaded map image");
        Ok(MapImage {
            path: path.to_path_buf(),
            format,
            bytes,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{PNG_1X1, PNG_CORRUPT};
    use super::*;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(PNG_1X1), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::sniff(b"RIFF\x24\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::WebP)
        );
        let mut bmp = b"BM".to_vec();
        bmp.resize(26, 0);
        assert_eq!(ImageFormat::sniff(&bmp), Some(ImageFormat::Bmp));
    }

    #[test]
    fn test_sniff_rejects_truncated_png() {
        assert_eq!(ImageFormat::sniff(&PNG_1X1[..8]), None);
    }

    #[test]
    fn test_verify_decodes() {
        let path = Path::new("/tmp/map.png");
        assert_eq!(verify(path, PNG_1X1).unwrap(), ImageFormat::Png);
        assert!(matches!(
            verify(path, b"plain text"),
            Err(ImageError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_truncated_png() {
        // Signature and IHDR intact, image data cut off
        let truncated = &PNG_1X1[..PNG_1X1.len() - 20];
        assert_eq!(ImageFormat::sniff(truncated), Some(ImageFormat::Png));
        assert!(matches!(
            verify(Path::new("/tmp/map.png"), truncated),
            Err(ImageError::Corrupt {
                format: ImageFormat::Png,
                ..
            })
        ));
    }

    #[test]
    fn test_sniff_rejects_text() {
        assert_eq!(ImageFormat::sniff(b"hello world, not an image"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[test]
    fn test_format_extension_display() {
        assert_eq!(ImageFormat::Png.to_string(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_load_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "map.png", PNG_1X1);

        let image = FsImageLoader::new().load(&path).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.path, path);
        assert_eq!(image.len(), PNG_1X1.len());
        assert!(!image.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsImageLoader::new().load(&dir.path().join("gone.png"));
        assert!(matches!(result, Err(ImageError::NotFound { .. })));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsImageLoader::new().load(dir.path());
        assert!(matches!(result, Err(ImageError::NotAFile { .. })));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "map.png", b"");
        let result = FsImageLoader::new().load(&path);
        assert!(matches!(result, Err(ImageError::Empty { .. })));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "map.png", b"definitely not a png");
        let result = FsImageLoader::new().load(&path);
        assert!(matches!(result, Err(ImageError::UnrecognizedFormat { .. })));
    }

    #[test]
    fn test_load_corrupt_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "map.png", PNG_CORRUPT);

        match FsImageLoader::new().load(&path) {
            Err(err @ ImageError::Corrupt { .. }) => {
                assert!(err.to_string().contains("corrupt png image"));
            }
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn test_load_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "map.png", PNG_1X1);
        let loader = FsImageLoader::with_max_bytes(8);
        assert_eq!(loader.max_bytes(), 8);

        match loader.load(&path) {
            Err(ImageError::TooLarge { size, limit, .. }) => {
                assert_eq!(limit, 8);
                assert_eq!(size, PNG_1X1.len() as u64);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_map_image_debug_omits_bytes() {
        let image = MapImage {
            path: PathBuf::from("/tmp/map.png"),
            format: ImageFormat::Png,
            bytes: PNG_1X1.to_vec(),
        };
        let debug_str = format!("{image:?}");
        assert!(debug_str.contains("len"));
        assert!(!debug_str.contains("bytes"));
    }
}
