//! Color reduction of true-color frames to an indexed palette.
//!
//! GIF frames hold at most 256 colors, so every frame goes through a
//! [`Quantizer`] before encoding.

use std::collections::HashMap;

use image::RgbaImage;

/// An indexed frame: one palette index per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedImage {
    pub width: u32,
    pub height: u32,
    /// At most 256 RGB entries
    pub palette: Vec<[u8; 3]>,
    pub indices: Vec<u8>,
}

/// Turns an RGBA image into a palette plus per-pixel indices
pub trait Quantizer {
    fn quantize(&self, image: &RgbaImage) -> QuantizedImage;
}

/// Fixed 256-step gray ramp, indexed by luminance.
///
/// The palette ignores the image content entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscaleQuantizer;

impl GrayscaleQuantizer {
    /// `round(0.299 R + 0.587 G + 0.114 B)` in 20-bit fixed point.
    ///
    /// The weights sum to 2^20 - 1 (the blue weight is floored), so white
    /// rounds to exactly 255 and the result always fits a byte.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "weighted sum is at most 255.5 * 2^20 before the shift"
    )]
    pub fn luminance_index(r: u8, g: u8, b: u8) -> u8 {
        ((524_288 + u32::from(r) * 313_524 + u32::from(g) * 615_514 + u32::from(b) * 119_537)
            >> 20) as u8
    }
}

impl Quantizer for GrayscaleQuantizer {
    fn quantize(&self, image: &RgbaImage) -> QuantizedImage {
        let palette = (0..=255u8).map(|i| [i, i, i]).collect();
        let indices = image
            .pixels()
            .map(|p| Self::luminance_index(p[0], p[1], p[2]))
            .collect();

        QuantizedImage {
            width: image.width(),
            height: image.height(),
            palette,
            indices,
        }
    }
}

/// Palette index every GIF frame marks as transparent
pub const TRANSPARENT_INDEX: u8 = 0xFF;

/// Content-adaptive palette built by median cut over the frame's colors.
///
/// Fully transparent pixels stay out of the palette and map to
/// [`TRANSPARENT_INDEX`], which never holds an image color.
#[derive(Debug, Clone, Copy)]
pub struct MedianCutQuantizer {
    max_colors: usize,
}

impl MedianCutQuantizer {
    /// `max_colors` is clamped to 1..=255
    pub fn new(max_colors: usize) -> Self {
        Self {
            max_colors: max_colors.clamp(1, usize::from(TRANSPARENT_INDEX)),
        }
    }
}

impl Default for MedianCutQuantizer {
    fn default() -> Self {
        Self::new(usize::from(TRANSPARENT_INDEX))
    }
}

impl Quantizer for MedianCutQuantizer {
    fn quantize(&self, image: &RgbaImage) -> QuantizedImage {
        let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
        let mut has_transparent = false;
        for p in image.pixels() {
            if p[3] == 0 {
                has_transparent = true;
            } else {
                *histogram.entry([p[0], p[1], p[2]]).or_insert(0) += 1;
            }
        }

        let mut colors: Vec<([u8; 3], u32)> = histogram.into_iter().collect();
        // Stable input order keeps the palette deterministic
        colors.sort_unstable();

        let mut palette = median_cut(colors, self.max_colors);
        let image_colors = palette.len();

        let mut nearest: HashMap<[u8; 3], u8> = HashMap::new();
        let indices = image
            .pixels()
            .map(|p| {
                if p[3] == 0 {
                    return TRANSPARENT_INDEX;
                }
                let color = [p[0], p[1], p[2]];
                *nearest
                    .entry(color)
                    .or_insert_with(|| closest_index(color, &palette[..image_colors]))
            })
            .collect();

        if has_transparent {
            palette.resize(usize::from(TRANSPARENT_INDEX) + 1, [0, 0, 0]);
        }

        QuantizedImage {
            width: image.width(),
            height: image.height(),
            palette,
            indices,
        }
    }
}

/// A box of colors with their pixel counts
#[derive(Debug, Clone)]
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
}

impl ColorBox {
    fn pixel_count(&self) -> u64 {
        self.colors.iter().map(|(_, n)| u64::from(*n)).sum()
    }

    /// Channel with the largest value range
    fn widest_channel(&self) -> usize {
        let mut widest = (0, 0u8);
        for channel in 0..3 {
            let (min, max) = self
                .colors
                .iter()
                .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                    (lo.min(c[channel]), hi.max(c[channel]))
                });
            let range = max.saturating_sub(min);
            if range > widest.1 {
                widest = (channel, range);
            }
        }
        widest.0
    }

    /// Split at the pixel-weighted median of the widest channel
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel();
        self.colors.sort_by_key(|(c, _)| c[channel]);

        let half = self.pixel_count() / 2;
        let mut running = 0u64;
        let mut split_at = self.colors.len() / 2;
        for (i, (_, n)) in self.colors.iter().enumerate() {
            running += u64::from(*n);
            if running >= half {
                split_at = i + 1;
                break;
            }
        }
        split_at = split_at.clamp(1, self.colors.len() - 1);

        let right = self.colors.split_off(split_at);
        (ColorBox { colors: self.colors }, ColorBox { colors: right })
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a weighted mean of u8 values fits in u8"
    )]
    fn average(&self) -> [u8; 3] {
        let total = self.pixel_count().max(1);
        let mut sums = [0u64; 3];
        for (c, n) in &self.colors {
            for channel in 0..3 {
                sums[channel] += u64::from(c[channel]) * u64::from(*n);
            }
        }
        sums.map(|s| (s / total) as u8)
    }
}

fn median_cut(colors: Vec<([u8; 3], u32)>, max_colors: usize) -> Vec<[u8; 3]> {
    if colors.is_empty() {
        return vec![[0, 0, 0]];
    }
    if colors.len() <= max_colors {
        return colors.into_iter().map(|(c, _)| c).collect();
    }

    let mut boxes = vec![ColorBox { colors }];
    while boxes.len() < max_colors {
        let Some(idx) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1)
            .max_by_key(|(_, b)| b.pixel_count())
            .map(|(i, _)| i)
        else {
            break;
        };

        let (left, right) = boxes.swap_remove(idx).split();
        boxes.push(left);
        boxes.push(right);
    }

    boxes.iter().map(ColorBox::average).collect()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "palettes hold at most 256 entries"
)]
fn closest_index(color: [u8; 3], palette: &[[u8; 3]]) -> u8 {
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| {
            (0..3)
                .map(|i| {
                    let d = i32::from(color[i]) - i32::from(p[i]);
                    d * d
                })
                .sum::<i32>()
        })
        .map(|(i, _)| i as u8)
        .unwrap_or(0)
}
