pub mod actor;
pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod gif;
pub mod output;
pub mod process;
pub mod region;
pub mod report;
pub mod sprite;

pub use actor::{Actor, State};
pub use atlas::{SheetPosition, SpriteFrame, SpriteSheet};
pub use cli::{CliArgs, CompressionLevel, PaletteMode};
pub use error::AnimatorError;
pub use gif::{AnimatedGifWriter, GrayscaleQuantizer, MedianCutQuantizer, Quantizer};
pub use process::{ExportOptions, process_definition_file};
pub use region::{Region, RegionMerger};
pub use report::Reporter;
pub use sprite::{Sprite, SpritePool};
