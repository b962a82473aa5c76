//! End-to-end processing of one definition file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::actor::actors_from_definitions;
use crate::cli::{CompressionLevel, PaletteMode};
use crate::config::{ANIMATED_GIF_DIR, LoadedDefinition, SPRITE_SHEET_DIR};
use crate::gif::{GrayscaleQuantizer, MedianCutQuantizer};
use crate::output::{write_animated_gifs, write_css_animations, write_json, write_sprite_sheets};
use crate::report::Reporter;
use crate::sprite::{find_referenced_pngs, load_sprite_pool};

/// Settings that come from the command line rather than the definition file
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// oxipng level for sprite sheet PNGs
    pub compress: Option<CompressionLevel>,
    /// Palette used for GIF frames
    pub palette: PaletteMode,
}

/// Load a definition file and run every export it enables.
///
/// Errors abort this file only; callers decide whether to go on with others.
pub fn process_definition_file(
    path: &Path,
    options: &ExportOptions,
    reporter: &Reporter,
) -> Result<()> {
    let loaded = LoadedDefinition::load(path)?;
    let definition = &loaded.definition;

    if definition.nothing_to_export() {
        reporter.info("Nothing to export.");
        return Ok(());
    }

    let png_dir = loaded.resolve_png_dir()?;
    let export_dir = loaded.resolve_export_dir()?;
    let prefix = definition.export_name_prefix.as_str();

    let actors = actors_from_definitions(&definition.actors);
    let png_paths = find_referenced_pngs(&actors, &png_dir)?;
    debug!(
        "{} actor(s), {} referenced image(s) in {}",
        actors.len(),
        png_paths.len(),
        png_dir.display()
    );
    let pool = load_sprite_pool(&png_paths, reporter);
    debug!("{}", pool);

    let sheet_dir = export_dir.join(SPRITE_SHEET_DIR);
    let nested = reporter.nested();

    if definition.export_sprite_sheet {
        reporter.info("Exporting sprite sheet...");
        create_dir(&sheet_dir)?;
        write_sprite_sheets(&actors, &pool, &sheet_dir, prefix, options.compress, &nested)?;
    }

    if let Some(file_name) = definition.json_file_name() {
        reporter.info("Exporting sprite sheet JSON...");
        create_dir(&export_dir)?;
        write_json(&actors, &pool, prefix, &export_dir.join(file_name), &nested)?;
    }

    if let Some(file_name) = definition.css_file_name() {
        reporter.info("Exporting CSS animations...");
        create_dir(&sheet_dir)?;
        write_css_animations(&actors, &pool, &sheet_dir, prefix, file_name, &nested)?;
    }

    if definition.export_animated_gif {
        reporter.info("Exporting animated GIFs...");
        let gif_dir = export_dir.join(ANIMATED_GIF_DIR);
        create_dir(&gif_dir)?;
        match options.palette {
            PaletteMode::Grayscale => {
                let quantizer = GrayscaleQuantizer;
                write_animated_gifs(&actors, &pool, &gif_dir, prefix, &quantizer, &nested)?;
            }
            PaletteMode::MedianCut => {
                let quantizer = MedianCutQuantizer::default();
                write_animated_gifs(&actors, &pool, &gif_dir, prefix, &quantizer, &nested)?;
            }
        }
    }

    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))
}
