use crate::compositor::render_icon;
use crate::contents_json::{write_contents_json, ImageEntry};
use crate::font::{load_font, FontSource};
use crate::moods::{select_moods, Mood, Preset, MOODS};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[clap(
    name = "mood-icon-gen",
    about = "Generate emoji placeholder icons for every mood"
)]
pub struct Args {
    /// Which icon batch to generate.
    #[clap(long, value_enum, default_value = "app-icons")]
    pub preset: Preset,

    /// Output directory. Defaults to "." for app icons and "TempEmojiAssets" for placeholders.
    #[clap(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Font file tried before the system emoji fonts.
    #[clap(long, value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Skip system fonts and draw with the built-in font only.
    #[clap(long, conflicts_with = "font")]
    pub builtin_font: bool,

    /// Scale tiers to generate (e.g. 2,3). Defaults to the preset's tiers.
    #[clap(long, value_delimiter = ',', value_name = "SCALES")]
    pub scales: Option<Vec<u32>>,

    /// Size of a 1x icon in pixels. Defaults to 60 for app icons and 300 for placeholders.
    #[clap(long, value_name = "SIZE")]
    pub base_size: Option<u32>,

    /// Only generate these moods (e.g. happy,sad).
    #[clap(long, value_delimiter = ',', value_name = "MOODS")]
    pub mood: Option<Vec<String>>,

    /// Also write an asset catalog Contents.json next to the icons.
    #[clap(long)]
    pub contents_json: bool,
}

/// Generate every (mood, scale) icon of the selected preset.
///
/// Returns the paths of the written PNG files in generation order. The batch
/// stops at the first write error.
pub fn generate_icons(args: Args) -> Result<Vec<PathBuf>> {
    let preset = args.preset;
    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| preset.default_output_dir());

    let scales = args
        .scales
        .clone()
        .unwrap_or_else(|| preset.scales().to_vec());
    let base_size = args.base_size.unwrap_or_else(|| preset.base_size());
    if base_size == 0 {
        bail!("Base size must be positive");
    }
    if scales.is_empty() || scales.contains(&0) {
        bail!("Scales must be positive");
    }

    let moods: Vec<&Mood> = match &args.mood {
        Some(names) => select_moods(names)?,
        None => MOODS.iter().collect(),
    };

    let chain = if args.builtin_font {
        vec![FontSource::Builtin { size_ratio: 0.5 }]
    } else {
        preset.font_chain(args.font.as_ref())
    };

    std::fs::create_dir_all(&out_dir).context("Can't create output directory")?;

    println!("Creating {}...", preset.title());

    let mut written = Vec::new();
    let mut entries = Vec::new();

    for mood in moods {
        println!("Generating {} icons...", mood.name);
        for &scale in &scales {
            let size = match base_size.checked_mul(scale) {
                Some(size) => size,
                None => bail!("Icon size {base_size}x{scale} is too large"),
            };
            let filename = preset.file_name(mood, scale);
            let path = out_dir.join(&filename);

            generate_icon(preset, mood, size, &chain, &path)?;
            println!("  ✓ Generated {filename} ({size}x{size})");

            let entry = ImageEntry::new(filename, preset.idiom().to_string(), scale);
            entries.push(match preset {
                Preset::AppIcons => entry.with_point_size(base_size, scale),
                Preset::Placeholders => entry.with_pixel_size(size),
            });
            written.push(path);
        }
    }

    if args.contents_json {
        write_contents_json(&out_dir, entries)?;
    }

    println!(
        "✓ All {} created in {}",
        preset.title(),
        out_dir.display()
    );
    for path in &written {
        if let Some(name) = path.file_name() {
            println!("  - {}", name.to_string_lossy());
        }
    }

    Ok(written)
}

fn generate_icon(
    preset: Preset,
    mood: &Mood,
    size: u32,
    chain: &[FontSource],
    path: &Path,
) -> Result<()> {
    let spec = preset.icon_spec(mood, size)?;
    let font = load_font(chain, size, &spec.glyph)?;
    let canvas = render_icon(&spec, &font, preset.fill());
    canvas.save_png(path, preset.include_alpha())
}
