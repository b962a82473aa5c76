use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimatorError {
    #[error("Definition file does not exist: {0}")]
    DefinitionNotFound(PathBuf),

    #[error("PngDirectory is not defined")]
    PngDirectoryUndefined,

    #[error("PngDirectory '{0}' does not exist")]
    PngDirectoryNotFound(PathBuf),

    #[error("ExportBaseDirectory is not defined")]
    ExportBaseDirectoryUndefined,

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Sprite name '{0}' must be 4 characters long")]
    InvalidSpriteName(String),

    #[error("Offset ({x}, {y}) of sprite '{sprite}' is out of range")]
    OffsetOutOfRange { sprite: String, x: i32, y: i32 },

    #[error("Cannot find sprite '{frame}{rotation}'")]
    SpriteNotFound { frame: String, rotation: char },

    #[error("Sprite '{sprite}' does not belong to frame '{frame}'")]
    FrameMismatch { sprite: String, frame: String },

    #[error("Frame of {width}x{height} cannot be stored in a GIF")]
    InvalidFrameSize { width: u32, height: u32 },

    #[error("Palette of {0} colors exceeds the GIF limit of 256")]
    PaletteTooLarge(usize),

    #[error("Failed to compress GIF frame: {0}")]
    FrameCompress(String),

    #[error("GIF '{0}' is already finished")]
    EncoderFinished(PathBuf),
}
