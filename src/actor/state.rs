/// One step of an actor's animation timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    name: String,
    frame: char,
    /// Duration in tics (35 per second)
    duration: i32,
}

impl State {
    /// Returns `None` if `name` is not four characters long.
    pub fn new(name: &str, frame: char, duration: i32) -> Option<Self> {
        if name.chars().count() != 4 {
            return None;
        }
        Some(Self {
            name: name.to_uppercase(),
            frame: frame.to_ascii_uppercase(),
            duration,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> char {
        self.frame
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// States that last zero (or fewer) tics are never shown
    pub fn is_visible(&self) -> bool {
        self.duration > 0
    }

    pub fn full_frame_name(&self) -> String {
        format!("{}{}", self.name, self.frame)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "State: {} {} {}", self.name, self.frame, self.duration)
    }
}

/// Parse a `NAME FRAMES DURATION` line into one state per frame character.
///
/// Lines that don't follow the grammar yield no states.
pub fn parse_state_line(line: &str) -> Vec<State> {
    let tokens: Vec<&str> = line
        .split([' ', '\t'])
        .filter(|t| !t.is_empty())
        .collect();

    let [name, frames, duration] = tokens.as_slice() else {
        return Vec::new();
    };
    let Ok(duration) = duration.parse::<i32>() else {
        return Vec::new();
    };

    frames
        .chars()
        .filter_map(|frame| State::new(name, frame, duration))
        .collect()
}
