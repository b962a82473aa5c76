use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spriteanim")]
#[command(
    version,
    about = "Sprite sheet, CSS animation and animated GIF exporter",
    long_about = None
)]
pub struct CliArgs {
    /// Definition files (JSON), processed in order
    #[arg(required = true, value_name = "DEFINITION")]
    pub definitions: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run sprite sheets through oxipng at LEVEL (0-6 or 'max', 2 when omitted)
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Palette used for animated GIF frames [default: grayscale]
    #[arg(long, value_enum, default_value_t)]
    pub palette: PaletteMode,
}

/// Color reduction applied to GIF frames
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PaletteMode {
    /// Fixed 256-level gray ramp
    #[default]
    #[value(name = "grayscale")]
    Grayscale,
    /// Up to 256 colors picked per frame by median cut
    #[value(name = "median-cut")]
    MedianCut,
}

/// oxipng effort for sprite sheet PNGs: a preset or the slowest setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    Level(u8),
    Max,
}

/// Highest oxipng preset accepted on the command line
const MAX_PRESET: u8 = 6;

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            return Ok(Self::Max);
        }
        match s.parse::<u8>() {
            Ok(preset) if preset <= MAX_PRESET => Ok(Self::Level(preset)),
            Ok(preset) => Err(format!(
                "compression level {} is out of range, use 0-{} or 'max'",
                preset, MAX_PRESET
            )),
            Err(_e) => Err(format!("invalid compression level: {}", s)),
        }
    }
}
