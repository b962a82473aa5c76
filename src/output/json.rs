use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::actor::Actor;
use crate::atlas::SpriteSheet;
use crate::error::AnimatorError;
use crate::report::Reporter;
use crate::sprite::SpritePool;

/// Layout of one actor's sprite sheet image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpriteSheetJson {
    /// Cell width in pixels
    pub sprite_width: u32,
    /// Cell height in pixels
    pub sprite_height: u32,
    /// One `NAME F ROTATIONS` line per sheet row
    pub frames: Vec<String>,
}

/// Sheet layouts keyed by image name (`<prefix><Actor>`)
pub fn sprite_sheet_json(
    actors: &[Actor],
    pool: &SpritePool,
    name_prefix: &str,
) -> Result<BTreeMap<String, SpriteSheetJson>, AnimatorError> {
    let mut sheets = BTreeMap::new();
    for actor in actors {
        let sheet = SpriteSheet::from_actor(actor, pool)?;
        let region = sheet.alignment_region(actor, actors, pool)?;

        sheets.insert(
            format!("{}{}", name_prefix, actor.name),
            SpriteSheetJson {
                sprite_width: region.width,
                sprite_height: region.height,
                frames: sheet.text_list(),
            },
        );
    }
    Ok(sheets)
}

/// Write the sheet layouts of every actor as one JSON object
pub fn write_json(
    actors: &[Actor],
    pool: &SpritePool,
    name_prefix: &str,
    path: &Path,
    reporter: &Reporter,
) -> Result<()> {
    let sheets = sprite_sheet_json(actors, pool, name_prefix)?;
    let content = serde_json::to_string_pretty(&sheets)?;

    fs::write(path, content).map_err(|e| AnimatorError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    reporter.info(format!("Saved {} ({} sheets)", path.display(), sheets.len()));
    Ok(())
}
