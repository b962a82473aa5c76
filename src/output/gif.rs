use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::RgbaImage;

use super::image_name_with_rotation;
use crate::actor::{Actor, TICS_PER_SECOND};
use crate::atlas::SpriteSheet;
use crate::gif::{AnimatedGifWriter, Quantizer};
use crate::region::Region;
use crate::report::Reporter;
use crate::sprite::{Sprite, SpritePool};

/// Delay of a single tic in milliseconds
pub const TIC_DELAY_MS: u32 = 1000 / TICS_PER_SECOND;

/// `duration` tics in milliseconds, rounded to nearest
pub fn tics_to_ms(duration: i32) -> u32 {
    let tics = i64::from(TICS_PER_SECOND);
    let ms = (i64::from(duration) * 2000 + tics) / (2 * tics);
    u32::try_from(ms.max(0)).unwrap_or(u32::MAX)
}

/// Write one looping GIF per actor rotation into `dir`.
///
/// A rotation whose states reference a missing sprite is skipped with a
/// warning. Returns the paths written.
pub fn write_animated_gifs<Q: Quantizer + Clone>(
    actors: &[Actor],
    pool: &SpritePool,
    dir: &Path,
    name_prefix: &str,
    quantizer: &Q,
    reporter: &Reporter,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for actor in actors {
        let image_base = format!("{}{}", name_prefix, actor.name);
        let sheet = SpriteSheet::from_actor(actor, pool)?;

        for &rotation in &actor.rotations {
            let image_name = image_name_with_rotation(&image_base, rotation);
            let file_name = format!("{}.gif", image_name);

            let timeline = match resolve_timeline(actor, pool, rotation) {
                Ok(timeline) => timeline,
                Err(missing) => {
                    reporter.warn(format!(
                        "Cannot find sprite \"{}\". GIF \"{}\" export aborted.",
                        missing, file_name
                    ));
                    continue;
                }
            };
            if timeline.is_empty() {
                reporter.warn(format!(
                    "{} has no visible states, GIF \"{}\" skipped.",
                    actor, file_name
                ));
                continue;
            }

            let region = sheet.rotation_alignment_region(actor, rotation, actors, pool)?;
            if region.is_empty() {
                reporter.warn(format!("GIF \"{}\" has an empty region, skipped.", file_name));
                continue;
            }

            let path = dir.join(&file_name);
            let mut gif =
                AnimatedGifWriter::with_quantizer(&path, TIC_DELAY_MS, None, quantizer.clone());
            let mut frames: HashMap<String, RgbaImage> = HashMap::new();
            for (sprite, duration) in timeline {
                let frame = frames
                    .entry(sprite.full_sprite_name())
                    .or_insert_with(|| render_frame(sprite, &region));
                gif.add_frame(frame, Some(tics_to_ms(duration)))?;
            }
            gif.finish()?;

            reporter.info(format!("Saved {} ({} frames)", path.display(), gif.frame_count()));
            written.push(path);
        }
    }
    Ok(written)
}

/// Sprite and duration of every visible state, or the name of the first
/// sprite that can't be found.
fn resolve_timeline<'p>(
    actor: &Actor,
    pool: &'p SpritePool,
    rotation: char,
) -> Result<Vec<(&'p Sprite, i32)>, String> {
    actor
        .states
        .iter()
        .filter(|s| s.is_visible())
        .map(|s| {
            pool.get_sprite(&s.full_frame_name(), rotation)
                .map(|sprite| (sprite, s.duration()))
                .ok_or_else(|| format!("{}{}", s.full_frame_name(), rotation))
        })
        .collect()
}

fn render_frame(sprite: &Sprite, region: &Region) -> RgbaImage {
    let mut frame = RgbaImage::new(region.width, region.height);
    sprite.draw(&mut frame, (0, 0), region);
    frame
}
