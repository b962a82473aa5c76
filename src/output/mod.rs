mod css;
mod format;
mod gif;
mod json;
mod sheet;

pub use css::{css_file_name, image_name_with_rotation, write_css_animations};
pub use format::save_atlas_image;
pub use gif::{TIC_DELAY_MS, tics_to_ms, write_animated_gifs};
pub use json::{SpriteSheetJson, sprite_sheet_json, write_json};
pub use sheet::write_sprite_sheets;
