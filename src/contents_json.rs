//! Contents.json data model for Apple's Asset Catalog format
//!
//! Only the fields the generated icons need are modelled: one image entry per
//! written PNG plus the catalog's `info` block.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

pub const AUTHOR: &str = "mood-icon-gen";

/// Root structure of a Contents.json file
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// Array of image entries for different scales and sizes
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within an asset catalog
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// The filename of the PNG
    pub filename: String,

    /// The device type for the image (e.g., "universal", "iphone")
    pub idiom: String,

    /// The scale factor for the image (e.g., "1x", "2x", "3x")
    pub scale: String,

    /// The size of the image in points (e.g., "60x60")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Pixel size of the written file
    #[serde(skip_serializing_if = "Option::is_none", rename = "expected-size")]
    pub expected_size: Option<String>,
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The format version of the asset catalog (typically 1)
    pub version: u8,

    /// The tool that authored the asset catalog
    pub author: String,
}

impl ContentsFile {
    pub fn new(author: String) -> Self {
        Self {
            images: Vec::new(),
            info: Info { version: 1, author },
        }
    }

    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }
}

impl ImageEntry {
    pub fn new(filename: String, idiom: String, scale: u32) -> Self {
        Self {
            filename,
            idiom,
            scale: format!("{scale}x"),
            size: None,
            expected_size: None,
        }
    }

    /// Sets the point size and the matching pixel size for `scale`
    pub fn with_point_size(mut self, points: u32, scale: u32) -> Self {
        self.size = Some(format!("{points}x{points}"));
        self.expected_size = Some((points * scale).to_string());
        self
    }

    /// Sets only the pixel size, for images without a point size
    pub fn with_pixel_size(mut self, pixels: u32) -> Self {
        self.expected_size = Some(pixels.to_string());
        self
    }
}

/// Writes `Contents.json` into `dir`, replacing any existing file.
pub fn write_contents_json(dir: &Path, images: Vec<ImageEntry>) -> Result<()> {
    let mut contents = ContentsFile::new(AUTHOR.to_string());
    for image in images {
        contents.add_image(image);
    }

    let contents_json =
        serde_json::to_string_pretty(&contents).context("Failed to serialize Contents.json")?;
    std::fs::write(dir.join("Contents.json"), contents_json)
        .context("Failed to write Contents.json file")?;

    println!("  ✓ Generated Contents.json");
    Ok(())
}
