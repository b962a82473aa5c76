//! Animated GIF encoding with a pluggable color quantizer.

mod encoder;
mod quantizer;

pub use encoder::AnimatedGifWriter;
pub use quantizer::{GrayscaleQuantizer, MedianCutQuantizer, QuantizedImage, Quantizer};
