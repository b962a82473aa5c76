mod sheet;
mod types;

pub use sheet::SpriteSheet;
pub use types::{SheetPosition, SpriteFrame};
