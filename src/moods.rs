use crate::color::parse_color;
use crate::compositor::{Background, IconSpec};
use crate::font::{emoji_font_sources, system_font_sources, FontSource};
use anyhow::{bail, Result};
use clap::ValueEnum;
use image::Rgb;
use std::path::PathBuf;

/// A mood with its emoji and the two colors of its gradient.
///
/// Solid backgrounds use `primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood {
    pub name: &'static str,
    pub emoji: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

pub const MOODS: &[Mood] = &[
    Mood {
        name: "Happy",
        emoji: "😊",
        primary: "#FFD93D",   // yellow
        secondary: "#FFAA80", // peach
    },
    Mood {
        name: "Neutral",
        emoji: "😐",
        primary: "#A8D8EA",   // light blue
        secondary: "#6BA3BE", // sky blue
    },
    Mood {
        name: "Sad",
        emoji: "😔",
        primary: "#C8B6E2",   // lavender
        secondary: "#9B7EBD", // purple
    },
    Mood {
        name: "Angry",
        emoji: "😡",
        primary: "#FF6B6B",   // coral
        secondary: "#E63946", // red
    },
    Mood {
        name: "Sleepy",
        emoji: "😴",
        primary: "#F4E4C1",   // beige
        secondary: "#C9C9C9", // gray
    },
];

/// Look up moods by name (case-insensitive), keeping the table order.
pub fn select_moods(names: &[String]) -> Result<Vec<&'static Mood>> {
    for name in names {
        if !MOODS.iter().any(|m| m.name.eq_ignore_ascii_case(name)) {
            let known: Vec<_> = MOODS.iter().map(|m| m.name.to_lowercase()).collect();
            bail!(
                "Unknown mood: {}. Available moods: {}",
                name,
                known.join(", ")
            );
        }
    }

    Ok(MOODS
        .iter()
        .filter(|m| names.iter().any(|n| m.name.eq_ignore_ascii_case(n)))
        .collect())
}

/// The two built-in icon batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Gradient app icons, `AppIcon-<Mood>@<N>x.png` at 2x and 3x
    AppIcons,
    /// Flat 300x300 emoji placeholders, `<Mood>Emoji.png`
    Placeholders,
}

impl Preset {
    pub fn title(self) -> &'static str {
        match self {
            Preset::AppIcons => "test app icons",
            Preset::Placeholders => "emoji placeholders",
        }
    }

    pub fn default_output_dir(self) -> PathBuf {
        match self {
            Preset::AppIcons => PathBuf::from("."),
            Preset::Placeholders => PathBuf::from("TempEmojiAssets"),
        }
    }

    /// Size of a 1x icon (points for app icons, pixels for placeholders)
    pub fn base_size(self) -> u32 {
        match self {
            Preset::AppIcons => 60,
            Preset::Placeholders => 300,
        }
    }

    pub fn scales(self) -> &'static [u32] {
        match self {
            Preset::AppIcons => &[2, 3],
            Preset::Placeholders => &[1],
        }
    }

    /// Glyph color; only visible for fonts that draw outlines.
    pub fn fill(self) -> Rgb<u8> {
        match self {
            Preset::AppIcons => Rgb([255, 255, 255]),
            Preset::Placeholders => Rgb([0, 0, 0]),
        }
    }

    pub fn include_alpha(self) -> bool {
        matches!(self, Preset::Placeholders)
    }

    pub fn file_name(self, mood: &Mood, scale: u32) -> String {
        match self {
            Preset::AppIcons => format!("AppIcon-{}@{}x.png", mood.name, scale),
            Preset::Placeholders if scale == 1 => format!("{}Emoji.png", mood.name),
            Preset::Placeholders => format!("{}Emoji@{}x.png", mood.name, scale),
        }
    }

    /// Asset catalog idiom for the generated files
    pub fn idiom(self) -> &'static str {
        match self {
            Preset::AppIcons => "iphone",
            Preset::Placeholders => "universal",
        }
    }

    pub fn background(self, mood: &Mood) -> Result<Background> {
        let primary = parse_color(mood.primary)?;
        Ok(match self {
            Preset::AppIcons => Background::DiagonalGradient {
                from: primary,
                to: parse_color(mood.secondary)?,
            },
            Preset::Placeholders => Background::Solid(primary),
        })
    }

    pub fn icon_spec(self, mood: &Mood, size: u32) -> Result<IconSpec> {
        Ok(IconSpec {
            name: mood.name.to_string(),
            glyph: mood.emoji.to_string(),
            background: self.background(mood)?,
            size,
        })
    }

    /// Fonts to try, best first. The chain always ends with the built-in font.
    pub fn font_chain(self, custom_font: Option<&PathBuf>) -> Vec<FontSource> {
        let mut chain = Vec::new();
        if let Some(path) = custom_font {
            chain.push(FontSource::file(path, 0.6));
        }
        chain.extend(emoji_font_sources(0.6));
        if self == Preset::AppIcons {
            chain.extend(system_font_sources(0.5));
        }
        chain.push(FontSource::Builtin { size_ratio: 0.5 });
        chain
    }
}
