mod loader;
mod offset;
mod pool;
mod sprite;

pub use loader::{find_referenced_pngs, load_lump, load_sprite_pool};
pub use offset::extract_offset;
pub use pool::{SpritePool, fallback_rotation};
pub use sprite::Sprite;
