mod load;
mod types;

pub use load::{ANIMATED_GIF_DIR, LoadedDefinition, SPRITE_SHEET_DIR};
pub use types::{ActorDefinition, Definition};
