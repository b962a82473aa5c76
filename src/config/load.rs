use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::Definition;
use crate::error::AnimatorError;

/// Export subdirectory for sprite sheet images, CSS and preview HTML
pub const SPRITE_SHEET_DIR: &str = "SpriteSheet";
/// Export subdirectory for animated GIFs
pub const ANIMATED_GIF_DIR: &str = "AnimatedGIF";

/// A loaded definition file with its associated directory.
///
/// Paths in the definition are relative to the definition file location,
/// so we need to track where it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    /// The parsed definition
    pub definition: Definition,
    /// The directory containing the definition file
    pub definition_dir: PathBuf,
}

impl LoadedDefinition {
    /// Load a definition file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AnimatorError::DefinitionNotFound(path.to_path_buf()).into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read definition file: {}", path.display()))?;

        let definition: Definition = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse definition file: {}", path.display()))?;

        let definition_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            definition,
            definition_dir,
        })
    }

    /// Resolve and check the sprite directory.
    pub fn resolve_png_dir(&self) -> Result<PathBuf, AnimatorError> {
        let dir = self
            .definition
            .png_directory
            .as_deref()
            .ok_or(AnimatorError::PngDirectoryUndefined)?;

        let path = self.definition_dir.join(dir);
        if !path.is_dir() {
            return Err(AnimatorError::PngDirectoryNotFound(path));
        }
        Ok(path)
    }

    /// Resolve the export base directory.
    pub fn resolve_export_dir(&self) -> Result<PathBuf, AnimatorError> {
        match self.definition.export_base_directory.as_deref() {
            Some(dir) if !dir.is_empty() => Ok(self.definition_dir.join(dir)),
            _ => Err(AnimatorError::ExportBaseDirectoryUndefined),
        }
    }
}
