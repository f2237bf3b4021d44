use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::utils::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    JPEG,
    PNG,
    GIF,
    BMP,
    TIFF,
    WebP,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 6] = [
        Self::JPEG,
        Self::PNG,
        Self::GIF,
        Self::BMP,
        Self::TIFF,
        Self::WebP,
    ];

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::GIF => &["gif"],
            Self::BMP => &["bmp"],
            Self::TIFF => &["tif", "tiff"],
            Self::WebP => &["webp"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }


    /// The codec used to encode this format
    pub fn codec(&self) -> image::ImageFormat {
        match self {
            Self::JPEG => image::ImageFormat::Jpeg,
            Self::PNG => image::ImageFormat::Png,
            Self::GIF => image::ImageFormat::Gif,
            Self::BMP => image::ImageFormat::Bmp,
            Self::TIFF => image::ImageFormat::Tiff,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = TaskError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.matches_extension(ext))
            .ok_or_else(|| TaskError::processing(format!(
                "file type {} not supported", ext.to_uppercase()
            )))
    }
}

/// Get format from file extension
pub fn format_from_extension(path: impl AsRef<Path>) -> Result<ImageFormat, TaskError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| TaskError::processing(
            format!("File has no extension: {}", path.display())
        ))?;

    ImageFormat::from_str(ext)
}
