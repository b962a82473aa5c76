use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::AnimatorError;

/// Write `image` to `path` as PNG.
///
/// With a compression level the encoded bytes get an extra lossless oxipng
/// pass before they hit the disk.
pub fn save_atlas_image(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), AnimatorError> {
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, ImageFormat::Png)
        .map_err(|e| AnimatorError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let bytes = match compress {
        Some(level) => optimize_png(&encoded.into_inner(), level).map_err(|message| {
            AnimatorError::PngCompress {
                path: path.to_path_buf(),
                message,
            }
        })?,
        None => encoded.into_inner(),
    };

    fs::write(path, bytes).map_err(|e| AnimatorError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn optimize_png(png: &[u8], level: CompressionLevel) -> Result<Vec<u8>, String> {
    let options = match level {
        CompressionLevel::Max => oxipng::Options::max_compression(),
        CompressionLevel::Level(preset) => oxipng::Options::from_preset(preset),
    };
    oxipng::optimize_from_memory(png, &options).map_err(|e| e.to_string())
}
