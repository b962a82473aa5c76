use std::collections::HashMap;

use crate::error::AnimatorError;
use crate::region::{Region, RegionMerger};
use crate::sprite::{Sprite, fallback_rotation};

/// All rotations of one frame of one sprite name
#[derive(Debug, Clone, Default)]
pub struct SpriteFrame<'a> {
    /// Name and frame shared by every member, set by the first sprite added
    identity: Option<(String, char)>,
    sprites: HashMap<char, &'a Sprite>,
}

impl<'a> SpriteFrame<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn frame(&self) -> Option<char> {
        self.identity.as_ref().map(|(_, frame)| *frame)
    }

    pub fn full_frame_name(&self) -> String {
        match &self.identity {
            Some((name, frame)) => format!("{}{}", name, frame),
            None => String::new(),
        }
    }

    /// Add a sprite, replacing any sprite of the same rotation.
    ///
    /// Fails if the sprite's name or frame differs from the frame's members.
    pub fn add_sprite(&mut self, sprite: &'a Sprite) -> Result<(), AnimatorError> {
        if self.identity.is_none() {
            self.identity = Some((sprite.name().to_string(), sprite.frame()));
        } else if self.name() != Some(sprite.name()) || self.frame() != Some(sprite.frame()) {
            return Err(AnimatorError::FrameMismatch {
                sprite: sprite.full_sprite_name(),
                frame: self.full_frame_name(),
            });
        }

        self.sprites.insert(sprite.rotation(), sprite);
        Ok(())
    }

    /// Sprite for `rotation`, falling back to rotation `0` (or `1` when `0`
    /// itself was asked for).
    pub fn get(&self, rotation: char) -> Option<&'a Sprite> {
        let rotation = rotation.to_ascii_uppercase();
        self.sprites
            .get(&rotation)
            .or_else(|| self.sprites.get(&fallback_rotation(rotation)))
            .copied()
    }

    /// Members sorted by rotation character
    pub fn sprites(&self) -> Vec<&'a Sprite> {
        let mut sprites: Vec<&'a Sprite> = self.sprites.values().copied().collect();
        sprites.sort_by_key(|s| s.rotation());
        sprites
    }

    /// Rotation characters present, sorted
    pub fn rotations(&self) -> Vec<char> {
        self.sprites().iter().map(|s| s.rotation()).collect()
    }

    /// Bounding box of every member's region
    pub fn region(&self) -> Region {
        self.sprites
            .values()
            .map(|s| s.region())
            .collect::<RegionMerger>()
            .region()
    }

    /// A new frame holding only the sprites resolved for `rotations`
    pub fn extract_rotations(&self, rotations: &[char]) -> Result<SpriteFrame<'a>, AnimatorError> {
        let mut frame = SpriteFrame::new();
        for sprite in rotations.iter().filter_map(|&r| self.get(r)) {
            frame.add_sprite(sprite)?;
        }
        Ok(frame)
    }
}

/// Position of a frame (and optionally one of its sprites) inside a sheet
#[derive(Debug, Clone)]
pub struct SheetPosition<'s, 'a> {
    pub frame: &'s SpriteFrame<'a>,
    /// Resolved sprite, if a rotation was asked for and found
    pub sprite: Option<&'a Sprite>,
    /// Index of the frame among the sheet's sorted frames
    pub row: usize,
    /// Index of the sprite among the frame's sorted rotations
    pub column: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn sprite(name: &str, frame: char, rotation: char, offset: (i32, i32)) -> Sprite {
        Sprite::new(name, frame, rotation, RgbaImage::new(10, 10), offset.0, offset.1).unwrap()
    }

    #[test]
    fn test_rejects_mismatched_members() {
        let a1 = sprite("TROO", 'A', '1', (0, 0));
        let b1 = sprite("TROO", 'B', '1', (0, 0));
        let other = sprite("POSS", 'A', '2', (0, 0));

        let mut frame = SpriteFrame::new();
        frame.add_sprite(&a1).unwrap();

        assert!(matches!(
            frame.add_sprite(&b1),
            Err(AnimatorError::FrameMismatch { .. })
        ));
        assert!(frame.add_sprite(&other).is_err());
        assert_eq!(frame.full_frame_name(), "TROOA");
    }

    #[test]
    fn test_fallback_lookup() {
        let a1 = sprite("TROO", 'A', '1', (0, 0));
        let mut frame = SpriteFrame::new();
        frame.add_sprite(&a1).unwrap();

        assert!(frame.get('3').is_none());
        assert_eq!(frame.get('0').unwrap().rotation(), '1');
    }

    #[test]
    fn test_region_and_sorted_rotations() {
        let a3 = sprite("TROO", 'A', '3', (-5, 3));
        let a1 = sprite("TROO", 'A', '1', (0, 0));
        let mut frame = SpriteFrame::new();
        frame.add_sprite(&a3).unwrap();
        frame.add_sprite(&a1).unwrap();

        assert_eq!(frame.rotations(), vec!['1', '3']);
        assert_eq!(frame.region(), Region::new(0, -3, 15, 13));
    }

    #[test]
    fn test_extract_rotations_resolves_fallback() {
        let a0 = sprite("BAR1", 'A', '0', (0, 0));
        let mut frame = SpriteFrame::new();
        frame.add_sprite(&a0).unwrap();

        let extracted = frame.extract_rotations(&['4']).unwrap();
        assert_eq!(extracted.rotations(), vec!['0']);

        let missing = SpriteFrame::new().extract_rotations(&['1']).unwrap();
        assert!(missing.is_empty());
    }
}
