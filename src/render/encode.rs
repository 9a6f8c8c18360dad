//! Image serialization.
//!
//! The output format follows the file extension: `.png` and `.jpg`/`.jpeg`
//! are encoded explicitly, anything else the `image` crate recognizes is
//! handed to it. Paths without an extension are written as PNG.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{PostError, Result};

/// Encoder settings for [`save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Spend more time for a smaller PNG.
    pub optimize: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            quality: 95,
            optimize: true,
        }
    }
}

enum Target {
    Png,
    Jpeg,
    Other(ImageFormat),
}

fn target_for(path: &Path) -> Result<Target> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        None | Some("png") => Ok(Target::Png),
        Some("jpg") | Some("jpeg") => Ok(Target::Jpeg),
        Some(other) => match ImageFormat::from_path(path) {
            Ok(format) if format.can_write() => Ok(Target::Other(format)),
            _ => Err(PostError::InvalidArgument {
                message: format!("unsupported output format '.{}'", other),
                help: Some("Use a .png or .jpg output path".to_string()),
            }),
        },
    }
}

fn encode_error(path: &Path, e: impl std::fmt::Display) -> PostError {
    PostError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Encode as PNG into `writer`.
pub fn write_png<W: Write>(image: &RgbImage, writer: W, optimize: bool) -> image::ImageResult<()> {
    let compression = if optimize {
        CompressionType::Best
    } else {
        CompressionType::Default
    };
    PngEncoder::new_with_quality(writer, compression, FilterType::Adaptive).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )
}

/// Encode as PNG in memory.
pub fn png_bytes(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    write_png(image, &mut buf, false).map_err(|e| encode_error(Path::new("<memory>"), e))?;
    Ok(buf.into_inner())
}

/// Write `image` to `path`, creating parent directories as needed.
pub fn save(image: &RgbImage, path: &Path, options: &SaveOptions) -> Result<PathBuf> {
    let target = target_for(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PostError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    match target {
        Target::Png | Target::Jpeg => {
            let file = File::create(path).map_err(|e| PostError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to create file: {}", e),
            })?;
            let mut writer = BufWriter::new(file);
            let result = match target {
                Target::Jpeg => {
                    let quality = options.quality.clamp(1, 100);
                    JpegEncoder::new_with_quality(&mut writer, quality).write_image(
                        image.as_raw(),
                        image.width(),
                        image.height(),
                        ExtendedColorType::Rgb8,
                    )
                }
                _ => write_png(image, &mut writer, options.optimize),
            };
            result.map_err(|e| encode_error(path, e))?;
            writer.flush().map_err(|e| encode_error(path, e))?;
        }
        Target::Other(format) => {
            image
                .save_with_format(path, format)
                .map_err(|e| encode_error(path, e))?;
        }
    }

    tracing::debug!(path = %path.display(), "saved image");
    Ok(path.to_path_buf())
}
