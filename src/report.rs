//! Indented progress reporting on top of the `log` facade.

use log::{error, info, warn};

/// Carries the indentation depth for nested progress messages.
///
/// Each nesting level prefixes messages with two spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    depth: usize,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter one level deeper than this one
    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn prefix(&self) -> String {
        "  ".repeat(self.depth)
    }

    pub fn info(&self, message: impl std::fmt::Display) {
        info!("{}{}", self.prefix(), message);
    }

    pub fn warn(&self, message: impl std::fmt::Display) {
        warn!("{}Warning: {}", self.prefix(), message);
    }

    pub fn error(&self, message: impl std::fmt::Display) {
        error!("{}Error: {}", self.prefix(), message);
    }
}
