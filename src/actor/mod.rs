mod actor;
mod state;

pub use actor::{Actor, DEFAULT_ROTATIONS, actors_from_definitions};
pub use state::{State, parse_state_line};

/// Animation tics per second
pub const TICS_PER_SECOND: u32 = 35;
