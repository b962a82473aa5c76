use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-actor entry of the definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ActorDefinition {
    /// State lines, e.g. `TROO ABCD 8`
    pub states: Vec<String>,
    /// Rotation characters to export, e.g. `12345678` (defaults to `1`)
    pub rotations: Option<String>,
    /// Whether to consider size and offset among all rotations
    pub region_among_all_rotations: bool,
    /// Actors whose regions are merged into this one so switching between
    /// them does not jump. Overrides `RegionAmongAllRotations`.
    pub referenced_actor_region_names: Vec<String>,
}

/// Definition file structure.
///
/// Relative paths are resolved against the definition file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Definition {
    /// Directory holding the sprite PNGs (not searched recursively)
    pub png_directory: Option<String>,
    /// Actors keyed by name
    pub actors: BTreeMap<String, ActorDefinition>,
    /// Base directory for every exported file
    pub export_base_directory: Option<String>,
    /// Prefix prepended to every exported image name
    pub export_name_prefix: String,
    /// Export one sprite sheet image per actor
    pub export_sprite_sheet: bool,
    /// File name of the sprite sheet JSON metadata
    #[serde(rename = "ExportSpriteSheetJSONFileName")]
    pub export_sprite_sheet_json_file_name: Option<String>,
    /// File name of the CSS animation
    #[serde(rename = "ExportCSSAnimationFileName")]
    pub export_css_animation_file_name: Option<String>,
    /// Export one animated GIF per actor rotation
    #[serde(rename = "ExportAnimatedGIF")]
    pub export_animated_gif: bool,
}

impl Definition {
    pub fn json_file_name(&self) -> Option<&str> {
        non_empty(self.export_sprite_sheet_json_file_name.as_deref())
    }

    pub fn css_file_name(&self) -> Option<&str> {
        non_empty(self.export_css_animation_file_name.as_deref())
    }

    pub fn nothing_to_export(&self) -> bool {
        !self.export_sprite_sheet
            && self.json_file_name().is_none()
            && self.css_file_name().is_none()
            && !self.export_animated_gif
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pascal_case() {
        let json = r#"{
            "PngDirectory": "sprites",
            "Actors": {
                "Imp": {
                    "States": ["TROO AB 10"],
                    "Rotations": "12345678",
                    "RegionAmongAllRotations": true
                },
                "ImpDeath": {
                    "States": ["TROO IJKLM 8"],
                    "ReferencedActorRegionNames": ["Imp"]
                }
            },
            "ExportBaseDirectory": "out",
            "ExportNamePrefix": "SS_",
            "ExportSpriteSheet": true,
            "ExportSpriteSheetJSONFileName": "sheets.json",
            "ExportCSSAnimationFileName": "anim.css",
            "ExportAnimatedGIF": true
        }"#;

        let def: Definition = serde_json::from_str(json).unwrap();

        assert_eq!(def.png_directory.as_deref(), Some("sprites"));
        assert_eq!(def.export_name_prefix, "SS_");
        assert_eq!(def.json_file_name(), Some("sheets.json"));
        assert_eq!(def.css_file_name(), Some("anim.css"));
        assert!(def.export_animated_gif);
        assert!(def.actors["Imp"].region_among_all_rotations);
        assert_eq!(
            def.actors["ImpDeath"].referenced_actor_region_names,
            vec!["Imp"]
        );
        assert!(!def.nothing_to_export());
    }

    #[test]
    fn test_nothing_to_export() {
        let def: Definition =
            serde_json::from_str(r#"{ "ExportSpriteSheetJSONFileName": "" }"#).unwrap();
        assert!(def.nothing_to_export());
    }
}
