use std::collections::HashMap;

use image::RgbaImage;
use log::debug;

use super::{SheetPosition, SpriteFrame};
use crate::actor::Actor;
use crate::error::AnimatorError;
use crate::region::{Region, RegionMerger};
use crate::sprite::{Sprite, SpritePool};

/// The frames of one actor, each holding the sprites of its rotations.
///
/// Sprites are borrowed from the [`SpritePool`] the sheet was built from.
#[derive(Debug, Clone, Default)]
pub struct SpriteSheet<'a> {
    frames: HashMap<String, SpriteFrame<'a>>,
}

impl<'a> SpriteSheet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every frame the actor's states use, in every rotation the
    /// actor exports. Rotations the pool can't resolve are left out.
    pub fn from_actor(actor: &Actor, pool: &'a SpritePool) -> Result<Self, AnimatorError> {
        let mut sheet = SpriteSheet::new();
        for frame_name in actor.frame_names() {
            for &rotation in &actor.rotations {
                if let Some(sprite) = pool.get_sprite(&frame_name, rotation) {
                    sheet.add_sprite(sprite)?;
                }
            }
        }

        debug!(
            "{}: {} frame(s), region {:?}",
            actor,
            sheet.frame_count(),
            sheet.region()
        );
        Ok(sheet)
    }

    pub fn add_sprite(&mut self, sprite: &'a Sprite) -> Result<(), AnimatorError> {
        self.frames
            .entry(sprite.full_frame_name())
            .or_default()
            .add_sprite(sprite)
    }

    /// Add a whole frame, replacing any frame with the same full frame name.
    /// Empty frames are ignored.
    pub fn add_sprite_frame(&mut self, frame: SpriteFrame<'a>) {
        if frame.is_empty() {
            return;
        }
        self.frames.insert(frame.full_frame_name(), frame);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames sorted by full frame name
    pub fn frames(&self) -> Vec<&SpriteFrame<'a>> {
        let mut frames: Vec<_> = self.frames.values().collect();
        frames.sort_by_key(|f| f.full_frame_name());
        frames
    }

    /// Largest number of sprites in any frame
    pub fn column_count(&self) -> usize {
        self.frames
            .values()
            .map(|f| f.sprites().len())
            .max()
            .unwrap_or(0)
    }

    /// Bounding box of every sprite in the sheet
    pub fn region(&self) -> Region {
        self.frames
            .values()
            .filter(|f| !f.is_empty())
            .map(SpriteFrame::region)
            .collect::<RegionMerger>()
            .region()
    }

    /// A new sheet keeping only the sprite each frame resolves for `rotation`
    pub fn extract_rotation(&self, rotation: char) -> Result<SpriteSheet<'a>, AnimatorError> {
        let mut sheet = SpriteSheet::new();
        for frame in self.frames.values() {
            sheet.add_sprite_frame(frame.extract_rotations(&[rotation])?);
        }
        Ok(sheet)
    }

    /// Row of the frame named `full_frame_name`
    pub fn find_sprite_frame(&self, full_frame_name: &str) -> Option<SheetPosition<'_, 'a>> {
        let name = full_frame_name.to_uppercase();
        self.frames()
            .into_iter()
            .enumerate()
            .find(|(_, f)| f.full_frame_name() == name)
            .map(|(row, frame)| SheetPosition {
                frame,
                sprite: None,
                row,
                column: None,
            })
    }

    /// Row and column of the sprite drawn for `full_frame_name` in `rotation`.
    ///
    /// The column is that of the sprite the rotation resolves to, so a
    /// fallback rotation reports the cell it actually borrows.
    pub fn find_sprite(
        &self,
        full_frame_name: &str,
        rotation: char,
    ) -> Option<SheetPosition<'_, 'a>> {
        let position = self.find_sprite_frame(full_frame_name)?;
        let sprite = position.frame.get(rotation);
        let column = sprite.and_then(|s| {
            position
                .frame
                .rotations()
                .iter()
                .position(|&r| r == s.rotation())
        });

        Some(SheetPosition {
            sprite,
            column,
            ..position
        })
    }

    /// One line per frame: `NAME F ROTATIONS`, e.g. `TROO A 12345`
    pub fn text_list(&self) -> Vec<String> {
        self.frames()
            .iter()
            .map(|f| {
                let rotations: String = f.rotations().into_iter().collect();
                format!(
                    "{} {} {}",
                    f.name().unwrap_or_default(),
                    f.frame().map(String::from).unwrap_or_default(),
                    rotations
                )
            })
            .collect()
    }

    /// Render every frame as a row and every rotation as a column, with all
    /// sprites aligned by pivot inside cells of `region`'s size.
    ///
    /// Returns `None` for an empty sheet or region.
    pub fn render(&self, region: &Region) -> Option<RgbaImage> {
        if self.is_empty() || region.is_empty() {
            return None;
        }

        let columns = u32::try_from(self.column_count()).ok()?;
        let rows = u32::try_from(self.frame_count()).ok()?;
        let mut image = RgbaImage::new(
            columns.checked_mul(region.width)?,
            rows.checked_mul(region.height)?,
        );

        let mut origin_y = 0i64;
        for frame in self.frames() {
            let mut origin_x = 0i64;
            for sprite in frame.sprites() {
                sprite.draw(&mut image, (origin_x, origin_y), region);
                origin_x += i64::from(region.width);
            }
            origin_y += i64::from(region.height);
        }

        Some(image)
    }

    /// This sheet's region merged with the regions of the actors named in
    /// `referenced_names`. Each referenced actor's sheet is built afresh from
    /// `pool`; names that match no actor are ignored.
    pub fn region_with_actors(
        &self,
        actors: &[Actor],
        pool: &SpritePool,
        referenced_names: &[String],
    ) -> Result<Region, AnimatorError> {
        let mut merger = RegionMerger::new();
        merger.merge(self.region());

        for actor in actors
            .iter()
            .filter(|a| referenced_names.iter().any(|n| *n == a.name))
        {
            let sheet = SpriteSheet::from_actor(actor, pool)?;
            if !sheet.is_empty() {
                merger.merge(sheet.region());
            }
        }

        Ok(merger.region())
    }

    /// Region shared by every rotation of `actor`: the referenced actors'
    /// union when declared, otherwise the whole sheet.
    pub fn alignment_region(
        &self,
        actor: &Actor,
        actors: &[Actor],
        pool: &SpritePool,
    ) -> Result<Region, AnimatorError> {
        if actor.has_referenced_actor_region() {
            self.region_with_actors(actors, pool, &actor.referenced_actor_region_names)
        } else {
            Ok(self.region())
        }
    }

    /// Region used when `rotation` is exported on its own.
    ///
    /// Referenced actors win over `RegionAmongAllRotations`; without either,
    /// the rotation is cropped to its own sprites.
    pub fn rotation_alignment_region(
        &self,
        actor: &Actor,
        rotation: char,
        actors: &[Actor],
        pool: &SpritePool,
    ) -> Result<Region, AnimatorError> {
        if actor.has_referenced_actor_region() {
            self.region_with_actors(actors, pool, &actor.referenced_actor_region_names)
        } else if actor.region_among_all_rotations {
            Ok(self.region())
        } else {
            Ok(self.extract_rotation(rotation)?.region())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActorDefinition;
    use image::Rgba;

    fn solid(name: &str, rotation: char, size: (u32, u32), offset: (i32, i32)) -> Sprite {
        let chars: Vec<char> = name.chars().collect();
        let img = RgbaImage::from_pixel(size.0, size.1, Rgba([255, 255, 255, 255]));
        let name: String = chars[..4].iter().collect();
        Sprite::new(&name, chars[4], rotation, img, offset.0, offset.1).unwrap()
    }

    fn actor(name: &str, states: &[&str], rotations: &str) -> Actor {
        Actor::from_definition(
            name,
            &ActorDefinition {
                states: states.iter().map(|s| s.to_string()).collect(),
                rotations: Some(rotations.to_string()),
                ..Default::default()
            },
        )
    }

    fn pool(sprites: Vec<Sprite>) -> SpritePool {
        let mut pool = SpritePool::new();
        for sprite in sprites {
            pool.add_sprite(sprite);
        }
        pool
    }

    #[test]
    fn test_frames_sorted_regardless_of_state_order() {
        let pool = pool(vec![
            solid("TROOC", '1', (4, 4), (0, 0)),
            solid("TROOA", '1', (4, 4), (0, 0)),
            solid("TROOB", '1', (4, 4), (0, 0)),
        ]);
        let imp = actor("Imp", &["TROO CAB 5"], "1");

        let sheet = SpriteSheet::from_actor(&imp, &pool).unwrap();
        let names: Vec<String> = sheet.frames().iter().map(|f| f.full_frame_name()).collect();

        assert_eq!(names, vec!["TROOA", "TROOB", "TROOC"]);
        assert_eq!(sheet.text_list(), vec!["TROO A 1", "TROO B 1", "TROO C 1"]);
    }

    #[test]
    fn test_missing_sprites_are_left_out() {
        let pool = pool(vec![solid("TROOA", '1', (4, 4), (0, 0))]);
        let imp = actor("Imp", &["TROO AB 5"], "13");

        let sheet = SpriteSheet::from_actor(&imp, &pool).unwrap();

        assert_eq!(sheet.frame_count(), 1);
        assert_eq!(sheet.column_count(), 1);
        assert!(sheet.find_sprite_frame("TROOB").is_none());
    }

    #[test]
    fn test_find_sprite_reports_resolved_column() {
        let pool = pool(vec![
            solid("TROOA", '0', (4, 4), (0, 0)),
            solid("TROOA", '2', (4, 4), (0, 0)),
            solid("TROOB", '2', (4, 4), (0, 0)),
        ]);
        let imp = actor("Imp", &["TROO AB 5"], "23");

        let sheet = SpriteSheet::from_actor(&imp, &pool).unwrap();

        let found = sheet.find_sprite("TROOA", '2').unwrap();
        assert_eq!((found.row, found.column), (0, Some(1)));

        // Rotation 3 borrows the rotation 0 sprite in the first column
        let found = sheet.find_sprite("trooa", '3').unwrap();
        assert_eq!(found.sprite.unwrap().rotation(), '0');
        assert_eq!((found.row, found.column), (0, Some(0)));

        let found = sheet.find_sprite("TROOB", '3').unwrap();
        assert!(found.sprite.is_none());
        assert_eq!((found.row, found.column), (1, None));
    }

    #[test]
    fn test_render_grid_size_and_alignment() {
        let pool = pool(vec![
            solid("TROOA", '1', (2, 2), (0, 0)),
            solid("TROOA", '2', (2, 2), (2, 2)),
            solid("TROOB", '1', (2, 2), (0, 0)),
        ]);
        let imp = actor("Imp", &["TROO AB 5"], "12");
        let sheet = SpriteSheet::from_actor(&imp, &pool).unwrap();

        let region = sheet.region();
        assert_eq!(region, Region::new(-2, -2, 4, 4));

        let image = sheet.render(&region).unwrap();
        assert_eq!(image.dimensions(), (8, 8));

        let white = Rgba([255, 255, 255, 255]);
        let clear = Rgba([0, 0, 0, 0]);
        // TROOA1 sits at the pivot, two pixels in from the cell corner
        assert_eq!(*image.get_pixel(2, 2), white);
        assert_eq!(*image.get_pixel(1, 1), clear);
        // TROOA2 is shifted up-left by its offset within the second cell
        assert_eq!(*image.get_pixel(4, 0), white);
        assert_eq!(*image.get_pixel(6, 2), clear);
        // TROOB has only one rotation; its second cell stays empty
        assert_eq!(*image.get_pixel(2, 6), white);
        assert_eq!(*image.get_pixel(4, 4), clear);
    }

    #[test]
    fn test_render_empty_sheet() {
        let sheet = SpriteSheet::new();
        assert!(sheet.render(&Region::new(0, 0, 4, 4)).is_none());
        assert!(sheet.region().is_empty());
    }

    #[test]
    fn test_per_rotation_region() {
        let pool = pool(vec![
            solid("TROOA", '1', (10, 10), (0, 0)),
            solid("TROOA", '2', (10, 10), (-5, 3)),
        ]);
        let mut imp = actor("Imp", &["TROO A 5"], "12");
        let actors = vec![imp.clone()];
        let sheet = SpriteSheet::from_actor(&imp, &pool).unwrap();

        assert_eq!(
            sheet.rotation_alignment_region(&imp, '1', &actors, &pool).unwrap(),
            Region::new(0, 0, 10, 10)
        );
        assert_eq!(
            sheet.rotation_alignment_region(&imp, '2', &actors, &pool).unwrap(),
            Region::new(5, -3, 10, 10)
        );

        imp.region_among_all_rotations = true;
        assert_eq!(
            sheet.rotation_alignment_region(&imp, '1', &actors, &pool).unwrap(),
            Region::new(0, -3, 15, 13)
        );
    }

    #[test]
    fn test_referenced_actor_region() {
        let pool = pool(vec![
            solid("TROOA", '1', (10, 10), (0, 0)),
            solid("TROOI", '1', (10, 10), (-5, 3)),
        ]);
        let walk = actor("Imp", &["TROO A 5"], "1");
        let mut death = actor("ImpDeath", &["TROO I 5"], "1");
        death.referenced_actor_region_names = vec!["Imp".to_string(), "Nobody".to_string()];
        let actors = vec![walk, death.clone()];

        let sheet = SpriteSheet::from_actor(&death, &pool).unwrap();
        let expected = Region::new(0, -3, 15, 13);

        assert_eq!(sheet.region(), Region::new(5, -3, 10, 10));
        assert_eq!(
            sheet.alignment_region(&death, &actors, &pool).unwrap(),
            expected
        );
        assert_eq!(
            sheet
                .rotation_alignment_region(&death, '1', &actors, &pool)
                .unwrap(),
            expected
        );
    }
}
