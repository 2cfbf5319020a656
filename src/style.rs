//! Page theme.
//!
//! The transformer leaves an empty `<style type="text/css"></style>` block in
//! every page; the presentation layer fills it from a [`StyleSheet`] built
//! from the `[style]` configuration section.

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Colour settings for rendered pages.
///
/// Each colour is a CSS named colour or six hex digits (with or without `#`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Leave the style block empty and let the host theme decide.
    #[serde(default)]
    pub theme_colors: bool,

    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_background")]
    pub section_color: String,
    #[serde(default = "default_section_background")]
    pub section_background: String,
    #[serde(default = "default_link_color")]
    pub link_color: String,
    #[serde(default = "default_background")]
    pub link_background: String,
    #[serde(default = "default_bold_color")]
    pub bold_color: String,
    #[serde(default = "default_background")]
    pub bold_background: String,
    #[serde(default = "default_italic_color")]
    pub italic_color: String,
    #[serde(default = "default_background")]
    pub italic_background: String,
    #[serde(default = "default_envar_color")]
    pub envar_color: String,
    #[serde(default = "default_background")]
    pub envar_background: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            theme_colors: false,
            color: default_text_color(),
            background: default_background(),
            section_color: default_background(),
            section_background: default_section_background(),
            link_color: default_link_color(),
            link_background: default_background(),
            bold_color: default_bold_color(),
            bold_background: default_background(),
            italic_color: default_italic_color(),
            italic_background: default_background(),
            envar_color: default_envar_color(),
            envar_background: default_background(),
        }
    }
}

fn default_text_color() -> String {
    "LightSlateGray".to_string()
}

fn default_background() -> String {
    "CornSilk".to_string()
}

fn default_section_background() -> String {
    "CadetBlue".to_string()
}

fn default_link_color() -> String {
    "Navy".to_string()
}

fn default_bold_color() -> String {
    "Orange".to_string()
}

fn default_italic_color() -> String {
    "DarkCyan".to_string()
}

fn default_envar_color() -> String {
    "DarkMagenta".to_string()
}

impl StyleConfig {
    /// Replace every invalid colour with its default, warning for each.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            ("color", &mut self.color, defaults.color),
            ("background", &mut self.background, defaults.background),
            ("section_color", &mut self.section_color, defaults.section_color),
            ("section_background", &mut self.section_background, defaults.section_background),
            ("link_color", &mut self.link_color, defaults.link_color),
            ("link_background", &mut self.link_background, defaults.link_background),
            ("bold_color", &mut self.bold_color, defaults.bold_color),
            ("bold_background", &mut self.bold_background, defaults.bold_background),
            ("italic_color", &mut self.italic_color, defaults.italic_color),
            ("italic_background", &mut self.italic_background, defaults.italic_background),
            ("envar_color", &mut self.envar_color, defaults.envar_color),
            ("envar_background", &mut self.envar_background, defaults.envar_background),
        ];

        for (name, value, default) in fields {
            match css_color(value) {
                Some(css) => *value = css,
                None => {
                    warn!("Invalid colour {:?} for style.{}, using {}", value, name, default);
                    *value = default;
                }
            }
        }
        self
    }
}

/// A colour as CSS, or `None` when it is neither a named colour nor hex.
///
/// Bare hex gains its `#`; named colours keep the spelling they were given.
pub fn css_color(value: &str) -> Option<String> {
    static HEX: OnceLock<Regex> = OnceLock::new();
    let hex = HEX.get_or_init(|| Regex::new(r"^#?[0-9A-Fa-f]{6}$").unwrap());

    let value = value.trim();
    if hex.is_match(value) {
        return Some(format!("#{}", value.trim_start_matches('#')));
    }
    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search(&lower.as_str())
        .ok()
        .map(|_| value.to_string())
}

/// Stylesheet text injected into the placeholder block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    css: String,
}

impl StyleSheet {
    pub fn new(config: &StyleConfig) -> Self {
        let mut css = String::new();
        if !config.theme_colors {
            let config = config.clone().validated();
            css.push_str(&format!(
                "body {{ color: {}; background-color: {} }}\n",
                config.color, config.background
            ));
            css.push_str(&format!(
                "a:link {{ color: {}; background-color: {} }}\n",
                config.link_color, config.link_background
            ));
            css.push_str(&format!(
                "h2 {{ color: {}; background-color: {} }}\n",
                config.section_color, config.section_background
            ));
            css.push_str(&format!(
                "envar {{ color: {}; background-color: {} }}\n",
                config.envar_color, config.envar_background
            ));
            css.push_str(&format!(
                "b {{ color: {}; background-color: {} }}\n",
                config.bold_color, config.bold_background
            ));
            css.push_str(&format!(
                "i {{ color: {}; background-color: {} }}\n",
                config.italic_color, config.italic_background
            ));
            css.push_str("table.add { border-collapse: collapse; margin: 1em auto; }\n");
            css.push_str(&format!(
                "td.add, th.add {{ border: 1px solid {}; padding: 3px; }}\n",
                config.color
            ));
        }
        css.push_str("p, pre, table { margin-top: 0; margin-bottom: 0; vertical-align: top }\n");
        Self { css }
    }

    /// Fill the empty style block of a transformed page.
    pub fn apply(&self, html: &str) -> String {
        const EMPTY_BLOCK: &str = "<style type=\"text/css\"></style>";
        html.replacen(
            EMPTY_BLOCK,
            &format!("<style type=\"text/css\">{}</style>", self.css),
            1,
        )
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new(&StyleConfig::default())
    }
}

/// CSS named colours, lowercase and sorted.
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkkhaki", "darkmagenta", "darkolivegreen",
    "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen", "darkslateblue",
    "darkslategray", "darkturquoise", "darkviolet", "deeppink", "deepskyblue", "dimgray",
    "dodgerblue", "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite",
    "gold", "goldenrod", "gray", "green", "greenyellow", "honeydew", "hotpink", "indianred",
    "indigo", "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon",
    "lightblue", "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon",
    "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue",
    "mintcream", "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab",
    "orange", "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise",
    "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple",
    "rebeccapurple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown",
    "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue", "slategray", "snow",
    "springgreen", "steelblue", "tan", "teal", "thistle", "tomato", "turquoise", "violet", "wheat",
    "white", "whitesmoke", "yellow", "yellowgreen",
];
