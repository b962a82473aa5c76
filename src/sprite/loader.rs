use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use super::{Sprite, SpritePool, extract_offset};
use crate::actor::Actor;
use crate::error::AnimatorError;
use crate::report::Reporter;

const SUPPORTED_EXTENSION: &str = "png";

/// Lump name length for a single sprite, e.g. `TROOA1`
const SINGLE_LUMP_LEN: usize = 6;
/// Lump name length for a sprite plus its mirror, e.g. `TROOA2A8`
const MIRRORED_LUMP_LEN: usize = 8;

/// Find the PNG files in `png_dir` that any actor can reach.
///
/// A file is referenced when one of its lump names matches a state's frame
/// with one of the actor's rotations, or with rotation `0`. Only those files
/// get decoded. Subdirectories are not searched.
pub fn find_referenced_pngs(actors: &[Actor], png_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(png_dir)
        .with_context(|| format!("failed to read directory: {}", png_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();

    // Every lump name a file can answer for, first file wins
    let mut lump_to_path: HashMap<String, PathBuf> = HashMap::new();
    for path in candidates {
        let Some(stem) = lump_stem(&path) else {
            continue;
        };
        let chars: Vec<char> = stem.chars().collect();
        match chars.len() {
            SINGLE_LUMP_LEN => {
                lump_to_path.entry(stem).or_insert(path);
            }
            MIRRORED_LUMP_LEN => {
                let primary: String = chars[..6].iter().collect();
                let mirrored: String = chars[..4].iter().chain(&chars[6..]).collect();
                lump_to_path.entry(primary).or_insert_with(|| path.clone());
                lump_to_path.entry(mirrored).or_insert(path);
            }
            _ => {}
        }
    }

    let mut referenced: Vec<PathBuf> = Vec::new();
    for actor in actors {
        let mut rotations = actor.rotations.clone();
        if !rotations.contains(&'0') {
            rotations.push('0');
        }

        for state in &actor.states {
            for rotation in &rotations {
                let lump = format!("{}{}", state.full_frame_name(), rotation);
                if let Some(path) = lump_to_path.remove(&lump)
                    && !referenced.contains(&path)
                {
                    referenced.push(path);
                }
            }
        }
    }

    Ok(referenced)
}

/// Decode the given lump files into a sprite pool.
///
/// Unreadable files are skipped; a single warning reports how many.
pub fn load_sprite_pool(paths: &[impl AsRef<Path>], reporter: &Reporter) -> SpritePool {
    let mut pool = SpritePool::new();
    let mut failed = 0usize;

    for path in paths {
        let path = path.as_ref();
        match load_lump(path) {
            Ok(sprites) => {
                for sprite in sprites {
                    pool.add_sprite(sprite);
                }
            }
            Err(e) => {
                debug!("{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        reporter.warn(format!(
            "{} image{} could not be loaded and {} skipped.",
            failed,
            if failed == 1 { "" } else { "s" },
            if failed == 1 { "was" } else { "were" },
        ));
    }

    pool
}

/// Decode one lump file into its sprite, plus the mirrored sprite for
/// eight-character names. Files with other name lengths yield nothing.
pub fn load_lump(path: &Path) -> Result<Vec<Sprite>, AnimatorError> {
    let Some(stem) = lump_stem(path) else {
        return Ok(Vec::new());
    };
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() != SINGLE_LUMP_LEN && chars.len() != MIRRORED_LUMP_LEN {
        return Ok(Vec::new());
    }

    let bytes = std::fs::read(path).map_err(|e| AnimatorError::ImageLoad {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let (offset_x, offset_y) = extract_offset(&bytes);

    let image = image::load_from_memory(&bytes)
        .map_err(|e| AnimatorError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    let name: String = chars[..4].iter().collect();
    let sprite = Sprite::new(&name, chars[4], chars[5], image, offset_x, offset_y)?;

    let mirrored = if chars.len() == MIRRORED_LUMP_LEN {
        Some(sprite.mirror(chars[6], chars[7])?)
    } else {
        None
    };

    Ok(std::iter::once(sprite).chain(mirrored).collect())
}

/// Upper-cased file stem
fn lump_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_uppercase)
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
        .unwrap_or(false)
}
