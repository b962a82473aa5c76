//! Frame-by-frame animated GIF writer.
//!
//! The file is created by the first [`AnimatedGifWriter::add_frame`] call and
//! closed by [`AnimatedGifWriter::finish`] or on drop. A writer that never
//! receives a frame never touches the filesystem.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};
use weezl::BitOrder;
use weezl::encode::Encoder as LzwEncoder;

use super::quantizer::{GrayscaleQuantizer, QuantizedImage, Quantizer, TRANSPARENT_INDEX};
use crate::error::AnimatorError;

const SIGNATURE: &[u8; 6] = b"GIF89a";
const EXTENSION_INTRODUCER: u8 = 0x21;
const APPLICATION_LABEL: u8 = 0xFF;
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;

/// No global color table, 8 bits of color resolution
const SCREEN_FLAGS: u8 = 0x70;
/// Restore to background after each frame, transparency enabled
const GRAPHIC_CONTROL_FLAGS: u8 = 0x09;
/// Local color table present
const LOCAL_TABLE_FLAG: u8 = 0x80;

const MAX_SUB_BLOCK: usize = 255;

enum WriterState {
    Unopened,
    Open(BufWriter<File>),
    Closed,
}

/// Writes an animated GIF one frame at a time.
///
/// Every frame is reduced to at most 256 colors by the writer's
/// [`Quantizer`] and stored with its own local color table.
pub struct AnimatedGifWriter<Q = GrayscaleQuantizer> {
    path: PathBuf,
    delay_ms: u32,
    repeat: Option<u8>,
    quantizer: Q,
    state: WriterState,
    frames: usize,
}

impl AnimatedGifWriter<GrayscaleQuantizer> {
    /// A writer using the grayscale palette.
    ///
    /// `delay_ms` is the default frame delay. `repeat` of `None` loops
    /// forever.
    pub fn create(path: impl Into<PathBuf>, delay_ms: u32, repeat: Option<u8>) -> Self {
        Self::with_quantizer(path, delay_ms, repeat, GrayscaleQuantizer)
    }
}

impl<Q> AnimatedGifWriter<Q> {
    pub fn with_quantizer(
        path: impl Into<PathBuf>,
        delay_ms: u32,
        repeat: Option<u8>,
        quantizer: Q,
    ) -> Self {
        Self {
            path: path.into(),
            delay_ms,
            repeat,
            quantizer,
            state: WriterState::Unopened,
            frames: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames written so far
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Write the trailer and close the file.
    ///
    /// Does nothing if no frame was ever added; calling it again is a no-op.
    pub fn finish(&mut self) -> Result<(), AnimatorError> {
        match std::mem::replace(&mut self.state, WriterState::Closed) {
            WriterState::Open(mut out) => {
                out.write_all(&[TRAILER])
                    .and_then(|()| out.flush())
                    .map_err(|e| AnimatorError::OutputWrite {
                        path: self.path.clone(),
                        source: e,
                    })?;
                debug!("Closed {} ({} frames)", self.path.display(), self.frames);
                Ok(())
            }
            WriterState::Unopened | WriterState::Closed => Ok(()),
        }
    }
}

impl<Q: Quantizer> AnimatedGifWriter<Q> {
    /// Append a frame, shown for `delay_ms` or the writer's default delay.
    ///
    /// The first frame fixes the logical screen size.
    pub fn add_frame(&mut self, image: &RgbaImage, delay_ms: Option<u32>) -> Result<(), AnimatorError> {
        if matches!(self.state, WriterState::Closed) {
            return Err(AnimatorError::EncoderFinished(self.path.clone()));
        }

        let (width, height) = frame_size(image)?;
        let quantized = self.quantizer.quantize(image);

        let mut bytes = graphic_control_bytes(delay_ms.unwrap_or(self.delay_ms)).to_vec();
        bytes.extend(image_bytes(&quantized, width, height)?);

        if matches!(self.state, WriterState::Unopened) {
            let out = self.open(width, height)?;
            self.state = WriterState::Open(out);
        }

        if let WriterState::Open(out) = &mut self.state {
            out.write_all(&bytes)
                .map_err(|e| AnimatorError::OutputWrite {
                    path: self.path.clone(),
                    source: e,
                })?;
        }
        self.frames += 1;
        Ok(())
    }

    fn open(&self, width: u16, height: u16) -> Result<BufWriter<File>, AnimatorError> {
        let write_error = |e| AnimatorError::OutputWrite {
            path: self.path.clone(),
            source: e,
        };

        let mut out = BufWriter::new(File::create(&self.path).map_err(write_error)?);
        out.write_all(&header_bytes(width, height, self.repeat))
            .map_err(write_error)?;
        Ok(out)
    }
}

impl<Q> Drop for AnimatedGifWriter<Q> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!("{}", e);
        }
    }
}

fn frame_size(image: &RgbaImage) -> Result<(u16, u16), AnimatorError> {
    let invalid = || AnimatorError::InvalidFrameSize {
        width: image.width(),
        height: image.height(),
    };
    if image.width() == 0 || image.height() == 0 {
        return Err(invalid());
    }
    let width = u16::try_from(image.width()).map_err(|_e| invalid())?;
    let height = u16::try_from(image.height()).map_err(|_e| invalid())?;
    Ok((width, height))
}

/// Signature, logical screen descriptor and the looping extension
fn header_bytes(width: u16, height: u16, repeat: Option<u8>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(SIGNATURE);

    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&[SCREEN_FLAGS, 0, 0]);

    let (count, flag) = match repeat {
        Some(n) => (n, 1),
        None => (0, 0),
    };
    bytes.extend_from_slice(&[EXTENSION_INTRODUCER, APPLICATION_LABEL, 0x0B]);
    bytes.extend_from_slice(b"NETSCAPE2.0");
    bytes.extend_from_slice(&[0x03, 0x01, count, flag, 0x00]);
    bytes
}

fn graphic_control_bytes(delay_ms: u32) -> [u8; 8] {
    let centiseconds = u16::try_from(delay_ms / 10).unwrap_or(u16::MAX);
    let [lo, hi] = centiseconds.to_le_bytes();
    [
        EXTENSION_INTRODUCER,
        GRAPHIC_CONTROL_LABEL,
        0x04,
        GRAPHIC_CONTROL_FLAGS,
        lo,
        hi,
        TRANSPARENT_INDEX,
        0x00,
    ]
}

/// Exponent `n` of the smallest color table (2^(n+1) entries) holding `colors`
fn color_table_bits(colors: usize) -> u8 {
    let mut bits = 0u8;
    while bits < 7 && (2usize << bits) < colors {
        bits += 1;
    }
    bits
}

/// Image descriptor, local color table and LZW image data
fn image_bytes(frame: &QuantizedImage, width: u16, height: u16) -> Result<Vec<u8>, AnimatorError> {
    if frame.palette.len() > 256 {
        return Err(AnimatorError::PaletteTooLarge(frame.palette.len()));
    }

    let bits = color_table_bits(frame.palette.len());
    let mut bytes = Vec::with_capacity(frame.indices.len() / 2 + 800);

    bytes.push(IMAGE_SEPARATOR);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.push(LOCAL_TABLE_FLAG | bits);

    let table_len = 2usize << bits;
    for i in 0..table_len {
        bytes.extend_from_slice(&frame.palette.get(i).copied().unwrap_or([0, 0, 0]));
    }

    let min_code_size = (bits + 1).max(2);
    let compressed = LzwEncoder::new(BitOrder::Lsb, min_code_size)
        .encode(&frame.indices)
        .map_err(|e| AnimatorError::FrameCompress(e.to_string()))?;

    bytes.push(min_code_size);
    for chunk in compressed.chunks(MAX_SUB_BLOCK) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sub-blocks hold at most 255 bytes"
        )]
        bytes.push(chunk.len() as u8);
        bytes.extend_from_slice(chunk);
    }
    bytes.push(0);

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gif::MedianCutQuantizer;
    use image::Rgba;

    #[derive(Debug, Default, PartialEq)]
    struct Blocks {
        signature: bool,
        loop_extensions: usize,
        loop_bytes: Vec<[u8; 2]>,
        graphic_controls: usize,
        delays: Vec<u16>,
        descriptors: usize,
        trailers: usize,
    }

    fn sub_blocks_end(bytes: &[u8], mut pos: usize) -> usize {
        loop {
            let len = bytes[pos] as usize;
            pos += 1;
            if len == 0 {
                return pos;
            }
            pos += len;
        }
    }

    /// Walk the top-level block structure of a GIF stream
    fn walk(bytes: &[u8]) -> Blocks {
        let mut blocks = Blocks {
            signature: bytes.starts_with(SIGNATURE),
            ..Default::default()
        };
        let mut pos = 13;

        while pos < bytes.len() {
            match bytes[pos] {
                EXTENSION_INTRODUCER => {
                    let label = bytes[pos + 1];
                    if label == APPLICATION_LABEL && &bytes[pos + 3..pos + 14] == b"NETSCAPE2.0" {
                        blocks.loop_extensions += 1;
                        blocks.loop_bytes.push([bytes[pos + 16], bytes[pos + 17]]);
                    }
                    if label == GRAPHIC_CONTROL_LABEL {
                        blocks.graphic_controls += 1;
                        blocks
                            .delays
                            .push(u16::from_le_bytes([bytes[pos + 4], bytes[pos + 5]]));
                    }
                    pos = sub_blocks_end(bytes, pos + 2);
                }
                IMAGE_SEPARATOR => {
                    blocks.descriptors += 1;
                    let flags = bytes[pos + 9];
                    pos += 10;
                    if flags & LOCAL_TABLE_FLAG != 0 {
                        pos += 3 * (2usize << (flags & 0x07));
                    }
                    // LZW minimum code size
                    pos = sub_blocks_end(bytes, pos + 1);
                }
                TRAILER => {
                    blocks.trailers += 1;
                    pos += 1;
                }
                other => panic!("unexpected block 0x{:02X} at {}", other, pos),
            }
        }
        blocks
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_stream_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");

        let mut gif = AnimatedGifWriter::create(&path, 1000 / 35, None);
        gif.add_frame(&solid(4, 3, [255, 0, 0, 255]), None).unwrap();
        gif.add_frame(&solid(4, 3, [0, 255, 0, 255]), Some(200)).unwrap();
        gif.add_frame(&solid(4, 3, [0, 0, 255, 255]), None).unwrap();
        assert_eq!(gif.frame_count(), 3);
        gif.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[6..10], &[4, 0, 3, 0]);

        let blocks = walk(&bytes);
        assert!(blocks.signature);
        assert_eq!(blocks.loop_extensions, 1);
        assert_eq!(blocks.loop_bytes, vec![[0, 0]]);
        assert_eq!(blocks.graphic_controls, 3);
        assert_eq!(blocks.descriptors, 3);
        assert_eq!(blocks.trailers, 1);
        assert_eq!(bytes.last(), Some(&TRAILER));
        // Per-frame delay only overrides its own frame
        assert_eq!(blocks.delays, vec![2, 20, 2]);
    }

    #[test]
    fn test_finite_repeat_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("once.gif");

        let mut gif = AnimatedGifWriter::create(&path, 100, Some(3));
        gif.add_frame(&solid(2, 2, [0, 0, 0, 255]), None).unwrap();
        gif.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(walk(&bytes).loop_bytes, vec![[3, 1]]);
    }

    #[test]
    fn test_graphic_control_layout() {
        assert_eq!(
            graphic_control_bytes(1000),
            [0x21, 0xF9, 0x04, 0x09, 100, 0, 0xFF, 0x00]
        );
        assert_eq!(graphic_control_bytes(10_000_000)[4..6], [0xFF, 0xFF]);
    }

    #[test]
    fn test_no_frames_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.gif");

        let mut gif = AnimatedGifWriter::create(&path, 100, None);
        gif.finish().unwrap();
        gif.finish().unwrap();
        drop(gif);

        assert!(!path.exists());
    }

    #[test]
    fn test_drop_writes_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.gif");

        {
            let mut gif = AnimatedGifWriter::create(&path, 100, None);
            gif.add_frame(&solid(2, 2, [10, 10, 10, 255]), None).unwrap();
        }

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(walk(&bytes).trailers, 1);
    }

    #[test]
    fn test_add_after_finish_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closed.gif");

        let mut gif = AnimatedGifWriter::create(&path, 100, None);
        gif.add_frame(&solid(2, 2, [0, 0, 0, 255]), None).unwrap();
        gif.finish().unwrap();

        assert!(matches!(
            gif.add_frame(&solid(2, 2, [0, 0, 0, 255]), None),
            Err(AnimatorError::EncoderFinished(_))
        ));
    }

    #[test]
    fn test_decodes_with_image_crate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decoded.gif");

        let mut frame = solid(8, 8, [0, 0, 0, 255]);
        frame.put_pixel(3, 3, Rgba([128, 128, 128, 255]));

        let mut gif = AnimatedGifWriter::create(&path, 100, None);
        gif.add_frame(&frame, None).unwrap();
        gif.add_frame(&solid(8, 8, [64, 64, 64, 255]), None).unwrap();
        gif.finish().unwrap();

        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.get_pixel(3, 3)[0], 128);
        assert_eq!(decoded.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_custom_quantizer_table_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("median.gif");

        let mut frame = solid(4, 4, [200, 30, 30, 255]);
        frame.put_pixel(0, 0, Rgba([30, 30, 200, 255]));

        let mut gif =
            AnimatedGifWriter::with_quantizer(&path, 100, None, MedianCutQuantizer::default());
        gif.add_frame(&frame, None).unwrap();
        gif.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // Descriptor right after the 13-byte header, 19-byte loop extension
        // and 8-byte graphic control: two colors need a 2-entry table
        assert_eq!(bytes[13 + 19 + 8], IMAGE_SEPARATOR);
        assert_eq!(bytes[13 + 19 + 8 + 9], LOCAL_TABLE_FLAG);

        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [30, 30, 200, 255]);
        assert_eq!(decoded.get_pixel(2, 2).0, [200, 30, 30, 255]);
    }

    #[test]
    fn test_median_cut_frame_stays_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.gif");

        // 400 distinct opaque colors, more than a color table holds
        let mut frame = RgbaImage::new(20, 20);
        for (x, y, p) in frame.enumerate_pixels_mut() {
            *p = Rgba([(x * 12) as u8, (y * 12) as u8, ((x * 7 + y * 5) % 256) as u8, 255]);
        }

        let mut gif =
            AnimatedGifWriter::with_quantizer(&path, 100, None, MedianCutQuantizer::default());
        gif.add_frame(&frame, None).unwrap();
        gif.finish().unwrap();

        let decoded = image::open(&path).unwrap().into_rgba8();
        let transparent = decoded.pixels().filter(|p| p[3] == 0).count();
        assert_eq!(transparent, 0);
    }

    #[test]
    fn test_median_cut_background_is_transparent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.gif");

        let mut frame = RgbaImage::new(4, 4);
        frame.put_pixel(1, 2, Rgba([220, 40, 40, 255]));

        let mut gif =
            AnimatedGifWriter::with_quantizer(&path, 100, None, MedianCutQuantizer::default());
        gif.add_frame(&frame, None).unwrap();
        gif.finish().unwrap();

        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(decoded.get_pixel(1, 2).0, [220, 40, 40, 255]);
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_rejects_empty_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut gif = AnimatedGifWriter::create(dir.path().join("zero.gif"), 100, None);

        assert!(matches!(
            gif.add_frame(&RgbaImage::new(0, 4), None),
            Err(AnimatorError::InvalidFrameSize { .. })
        ));
    }

    #[test]
    fn test_color_table_bits() {
        assert_eq!(color_table_bits(1), 0);
        assert_eq!(color_table_bits(2), 0);
        assert_eq!(color_table_bits(3), 1);
        assert_eq!(color_table_bits(16), 3);
        assert_eq!(color_table_bits(17), 4);
        assert_eq!(color_table_bits(256), 7);
    }
}
