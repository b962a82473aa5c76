use super::{State, parse_state_line};
use crate::config::ActorDefinition;

/// Rotation used when an actor declares none
pub const DEFAULT_ROTATIONS: &str = "1";

/// An animated actor: its timeline, the rotations to export and how its
/// drawing region is aligned.
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub states: Vec<State>,
    /// Distinct rotation characters in declaration order
    pub rotations: Vec<char>,
    /// Share one region among all rotations instead of cropping each
    pub region_among_all_rotations: bool,
    /// Other actors whose regions are merged into this actor's region
    pub referenced_actor_region_names: Vec<String>,
}

impl Actor {
    pub fn from_definition(name: &str, definition: &ActorDefinition) -> Self {
        let states = definition
            .states
            .iter()
            .flat_map(|line| parse_state_line(line))
            .collect();

        let rotation_text = match definition.rotations.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => DEFAULT_ROTATIONS,
        };

        Self {
            name: name.to_string(),
            states,
            rotations: distinct_rotations(rotation_text),
            region_among_all_rotations: definition.region_among_all_rotations,
            referenced_actor_region_names: definition.referenced_actor_region_names.clone(),
        }
    }

    pub fn has_referenced_actor_region(&self) -> bool {
        !self.referenced_actor_region_names.is_empty()
    }

    /// Sum of all state durations in tics
    pub fn total_duration(&self) -> i64 {
        self.states.iter().map(|s| i64::from(s.duration())).sum()
    }

    /// Distinct full frame names referenced by the states, in timeline order
    pub fn frame_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for state in &self.states {
            let name = state.full_frame_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor: {}", self.name)
    }
}

/// Split a rotation string into characters, dropping repeats but keeping order
fn distinct_rotations(text: &str) -> Vec<char> {
    let mut rotations = Vec::new();
    for c in text.chars().map(|c| c.to_ascii_uppercase()) {
        if !rotations.contains(&c) {
            rotations.push(c);
        }
    }
    rotations
}

/// Build actors from the definition file's actor table
pub fn actors_from_definitions<'a>(
    definitions: impl IntoIterator<Item = (&'a String, &'a ActorDefinition)>,
) -> Vec<Actor> {
    definitions
        .into_iter()
        .map(|(name, definition)| Actor::from_definition(name, definition))
        .collect()
}
