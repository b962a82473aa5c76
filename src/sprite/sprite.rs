use image::{RgbaImage, imageops};

use crate::error::AnimatorError;
use crate::region::Region;

/// One rotation of one animation frame, with its pivot offset
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Four-character sprite name (upper case)
    name: String,
    /// Frame character (upper case)
    frame: char,
    /// Rotation character (upper case)
    rotation: char,
    image: RgbaImage,
    /// Pivot offset as stored in the lump
    offset: (i32, i32),
    /// Where the image lands relative to the pivot
    region: Region,
}

impl Sprite {
    pub fn new(
        name: &str,
        frame: char,
        rotation: char,
        image: RgbaImage,
        offset_x: i32,
        offset_y: i32,
    ) -> Result<Self, AnimatorError> {
        if name.chars().count() != 4 {
            return Err(AnimatorError::InvalidSpriteName(name.to_string()));
        }

        let (Some(x), Some(y)) = (offset_x.checked_neg(), offset_y.checked_neg()) else {
            return Err(AnimatorError::OffsetOutOfRange {
                sprite: format!("{}{}{}", name, frame, rotation),
                x: offset_x,
                y: offset_y,
            });
        };
        let region = Region::new(x, y, image.width(), image.height());
        Ok(Self {
            name: name.to_uppercase(),
            frame: frame.to_ascii_uppercase(),
            rotation: rotation.to_ascii_uppercase(),
            image,
            offset: (offset_x, offset_y),
            region,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> char {
        self.frame
    }

    pub fn rotation(&self) -> char {
        self.rotation
    }

    /// Name plus frame, e.g. `TROOA`
    pub fn full_frame_name(&self) -> String {
        format!("{}{}", self.name, self.frame)
    }

    /// Name plus frame plus rotation, e.g. `TROOA1`
    pub fn full_sprite_name(&self) -> String {
        format!("{}{}{}", self.name, self.frame, self.rotation)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Build the horizontally mirrored companion used for the second half of
    /// an eight-character lump name. The pivot moves with the mirror so the
    /// sprite still lines up when drawn.
    pub fn mirror(&self, frame: char, rotation: char) -> Result<Sprite, AnimatorError> {
        let image = imageops::flip_horizontal(&self.image);
        let offset_x = i32::try_from(image.width())
            .ok()
            .and_then(|w| w.checked_sub(self.offset.0))
            .ok_or_else(|| AnimatorError::OffsetOutOfRange {
                sprite: format!("{}{}{}", self.name, frame, rotation),
                x: self.offset.0,
                y: self.offset.1,
            })?;
        Sprite::new(&self.name, frame, rotation, image, offset_x, self.offset.1)
    }

    /// Composite this sprite onto `canvas`, aligned inside the shared `region`
    /// with the cell's top-left corner at `origin`.
    pub fn draw(&self, canvas: &mut RgbaImage, origin: (i64, i64), region: &Region) {
        let x = origin.0 + i64::from(self.region.x) - i64::from(region.x);
        let y = origin.1 + i64::from(self.region.y) - i64::from(region.y);
        imageops::overlay(canvas, &self.image, x, y);
    }
}

impl std::fmt::Display for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sprite: {}", self.full_sprite_name())
    }
}
