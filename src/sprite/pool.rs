use std::collections::HashMap;

use super::Sprite;

/// Rotation to try when `rotation` is missing: `0` falls back to `1`,
/// everything else falls back to `0`.
pub fn fallback_rotation(rotation: char) -> char {
    if rotation == '0' { '1' } else { '0' }
}

/// All sprites discovered for one definition file, keyed by full sprite name
#[derive(Debug, Default)]
pub struct SpritePool {
    pool: HashMap<String, Sprite>,
}

impl SpritePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Insert a sprite, replacing any sprite with the same name, frame and rotation
    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.pool.insert(sprite.full_sprite_name(), sprite);
    }

    /// Look up a sprite by full frame name and rotation, applying the
    /// rotation fallback rule.
    pub fn get_sprite(&self, full_frame_name: &str, rotation: char) -> Option<&Sprite> {
        let frame = full_frame_name.to_uppercase();
        let rotation = rotation.to_ascii_uppercase();
        self.pool
            .get(&format!("{}{}", frame, rotation))
            .or_else(|| {
                self.pool
                    .get(&format!("{}{}", frame, fallback_rotation(rotation)))
            })
    }

    /// All sprites sorted by full sprite name
    pub fn sprites(&self) -> Vec<&Sprite> {
        let mut sprites: Vec<_> = self.pool.values().collect();
        sprites.sort_by_key(|s| s.full_sprite_name());
        sprites
    }

    /// Sprites of one frame, sorted by rotation
    pub fn frame_sprites(&self, full_frame_name: &str) -> Vec<&Sprite> {
        let frame = full_frame_name.to_uppercase();
        self.sprites()
            .into_iter()
            .filter(|s| s.full_frame_name() == frame)
            .collect()
    }
}

impl std::fmt::Display for SpritePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.pool.len();
        write!(
            f,
            "SpritePool: {} sprite{}",
            count,
            if count == 1 { "" } else { "s" }
        )
    }
}
