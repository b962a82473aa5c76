use std::path::{Path, PathBuf};

use anyhow::Result;

use super::save_atlas_image;
use crate::actor::Actor;
use crate::atlas::SpriteSheet;
use crate::cli::CompressionLevel;
use crate::report::Reporter;
use crate::sprite::SpritePool;

/// Render one atlas image per actor into `dir` as `<prefix><Actor>.png`.
///
/// Actors without any resolvable sprite produce no image. Returns the paths
/// written.
pub fn write_sprite_sheets(
    actors: &[Actor],
    pool: &SpritePool,
    dir: &Path,
    name_prefix: &str,
    compress: Option<CompressionLevel>,
    reporter: &Reporter,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for actor in actors {
        let sheet = SpriteSheet::from_actor(actor, pool)?;
        let region = sheet.alignment_region(actor, actors, pool)?;

        let Some(image) = sheet.render(&region) else {
            reporter.warn(format!("{} has no sprites, sprite sheet skipped.", actor));
            continue;
        };

        let path = dir.join(format!("{}{}.png", name_prefix, actor.name));
        save_atlas_image(&image, &path, compress)?;
        reporter.info(format!(
            "Saved {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        ));
        written.push(path);
    }
    Ok(written)
}
