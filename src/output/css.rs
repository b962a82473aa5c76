use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::actor::{Actor, TICS_PER_SECOND};
use crate::atlas::SpriteSheet;
use crate::error::AnimatorError;
use crate::region::Region;
use crate::report::Reporter;
use crate::sprite::SpritePool;

const CSS_EXTENSION: &str = "css";
const HTML_EXTENSION: &str = "html";

/// Image name for one rotation of `base`: `base` itself for rotation `0`,
/// otherwise `base_R<rotation>` (no extra underscore if `base` ends in one).
pub fn image_name_with_rotation(base: &str, rotation: char) -> String {
    if rotation == '0' {
        base.to_string()
    } else if base.ends_with('_') {
        format!("{}R{}", base, rotation)
    } else {
        format!("{}_R{}", base, rotation)
    }
}

/// `file_name` with its extension forced to `.css`
pub fn css_file_name(file_name: &str, reporter: &Reporter) -> String {
    let path = Path::new(file_name);
    if path.extension().and_then(|e| e.to_str()) == Some(CSS_EXTENSION) {
        return file_name.to_string();
    }

    let renamed = path.with_extension(CSS_EXTENSION).to_string_lossy().into_owned();
    reporter.warn(format!(
        "CSS file extension must be \".css\". Output path will be changed from \"{}\" to \"{}\".",
        file_name, renamed
    ));
    renamed
}

/// Write a CSS keyframe animation for every actor rotation into `dir`,
/// plus an HTML page next to it that shows each one.
///
/// Returns the path of the CSS file.
pub fn write_css_animations(
    actors: &[Actor],
    pool: &SpritePool,
    dir: &Path,
    name_prefix: &str,
    file_name: &str,
    reporter: &Reporter,
) -> Result<PathBuf> {
    let file_name = css_file_name(file_name, reporter);

    let mut css = String::new();
    let mut divs = Vec::new();
    for actor in actors {
        let image_base = format!("{}{}", name_prefix, actor.name);
        let sheet = SpriteSheet::from_actor(actor, pool)?;
        let region = sheet.alignment_region(actor, actors, pool)?;

        if actor.total_duration() <= 0 {
            reporter.warn(format!("{} has no visible states, CSS skipped.", actor));
            continue;
        }

        for &rotation in &actor.rotations {
            let image_name = image_name_with_rotation(&image_base, rotation);
            match rotation_css(actor, &sheet, &region, &image_base, &image_name, rotation) {
                Ok(block) => {
                    css.push_str(&block);
                    divs.push(format!("<div class=\"SAni_{}\"></div>", image_name));
                }
                Err(e) => reporter.warn(format!("{}. CSS for \"{}\" skipped.", e, image_name)),
            }
        }
    }

    let css_path = dir.join(&file_name);
    write_text(&css_path, &css)?;
    reporter.info(format!("Saved {}", css_path.display()));

    let html_path = css_path.with_extension(HTML_EXTENSION);
    write_text(&html_path, &preview_html(&file_name, &divs))?;
    reporter.info(format!("Saved {}", html_path.display()));

    Ok(css_path)
}

/// Class and keyframes for one rotation of an actor
fn rotation_css(
    actor: &Actor,
    sheet: &SpriteSheet<'_>,
    region: &Region,
    image_base: &str,
    image_name: &str,
    rotation: char,
) -> Result<String, AnimatorError> {
    let total = actor.total_duration() as f64;
    let (width, height) = (i64::from(region.width), i64::from(region.height));

    let mut keyframes = String::new();
    let mut elapsed = 0i64;
    for state in actor.states.iter().filter(|s| s.is_visible()) {
        let position = sheet
            .find_sprite(&state.full_frame_name(), rotation)
            .filter(|p| p.column.is_some())
            .ok_or_else(|| AnimatorError::SpriteNotFound {
                frame: state.full_frame_name(),
                rotation,
            })?;
        let column = i64::try_from(position.column.unwrap_or_default()).unwrap_or_default();
        let row = i64::try_from(position.row).unwrap_or_default();

        let percent = elapsed as f64 / total * 100.0;
        keyframes.push_str(&format!(
            "\t{:.2}% {{ background-position: {}px {}px }}\n",
            percent,
            -column * width,
            -row * height
        ));
        elapsed += i64::from(state.duration());
    }

    let mut css = format!(".SAni_{} {{\n", image_name);
    css.push_str(&format!("\twidth: {}px;\n", region.width));
    css.push_str(&format!("\theight: {}px;\n", region.height));
    css.push_str(&format!("\tbackground: url('{}.png');\n", image_base));
    css.push_str(&format!(
        "\tanimation: SKF_{} {:.3}s step-end infinite;\n",
        image_name,
        total / f64::from(TICS_PER_SECOND)
    ));
    css.push_str("}\n");
    css.push_str(&format!("@keyframes SKF_{} {{\n", image_name));
    css.push_str(&keyframes);
    css.push_str("}\n\n");

    Ok(css)
}

fn preview_html(css_file_name: &str, divs: &[String]) -> String {
    let link = format!(
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">",
        css_file_name
    );

    let mut html = String::new();
    for line in [
        "<html>",
        "<head>",
        "<title>Test</title>",
        link.as_str(),
        "<style>",
        "body { background-color: black }",
        "</style>",
        "</head>",
        "<body>",
    ]
    .into_iter()
    .chain(divs.iter().map(String::as_str))
    .chain(["</body>", "</html>"])
    {
        html.push_str(line);
        html.push('\n');
    }
    html
}

fn write_text(path: &Path, content: &str) -> Result<(), AnimatorError> {
    fs::write(path, content).map_err(|e| AnimatorError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
