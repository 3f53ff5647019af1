use crate::font::{GlyphBounds, GlyphFont, Ink};
use anyhow::{Context, Result};
use image::buffer::ConvertBuffer;
use image::{ImageBuffer, Rgb, RgbImage, RgbaImage};
use std::path::Path;

/// Background of an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(Rgb<u8>),
    /// Runs from `from` at the top-left corner towards `to` at the bottom-right.
    DiagonalGradient { from: Rgb<u8>, to: Rgb<u8> },
}

/// Everything needed to render one icon file
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub name: String,
    pub glyph: String,
    pub background: Background,
    pub size: u32,
}

/// An owned RGB drawing surface.
///
/// All drawing goes through `&mut self`; there is no shared drawing state
/// between canvases.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn solid(width: u32, height: u32, color: Rgb<u8>) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, color),
        }
    }

    /// Diagonal gradient with blend weight `t = (x + y) / (width + height)`.
    ///
    /// `t` stays below 1 even at the bottom-right pixel, so that pixel is only
    /// close to `to`, never exactly equal for distant colors.
    pub fn diagonal_gradient(width: u32, height: u32, from: Rgb<u8>, to: Rgb<u8>) -> Self {
        let span = (width + height) as f64;
        let image = ImageBuffer::from_fn(width, height, |x, y| {
            let t = (x + y) as f64 / span;
            Rgb([
                mix(from[0], to[0], t),
                mix(from[1], to[1], t),
                mix(from[2], to[2], t),
            ])
        });

        Self { image }
    }

    pub fn with_background(width: u32, height: u32, background: &Background) -> Self {
        match *background {
            Background::Solid(color) => Self::solid(width, height, color),
            Background::DiagonalGradient { from, to } => {
                Self::diagonal_gradient(width, height, from, to)
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Draw `text` centered on its measured bounding box and return the anchor
    /// it was drawn at.
    ///
    /// Outline and built-in glyphs are drawn in `fill`; color bitmap glyphs keep
    /// their own colors and are alpha-blended over the background.
    pub fn composite_glyph_centered(
        &mut self,
        text: &str,
        font: &GlyphFont,
        fill: Rgb<u8>,
    ) -> (i32, i32) {
        let bounds = measure_glyph_bounds(text, font);
        let (x, y) = centered_anchor(self.width(), self.height(), &bounds);

        let (width, height) = (self.width() as i32, self.height() as i32);
        let image = &mut self.image;
        font.draw(text, x, y, |px, py, ink| {
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }
            let (color, coverage) = match ink {
                Ink::Coverage(coverage) => (fill, coverage),
                Ink::Color(color) => {
                    (Rgb([color[0], color[1], color[2]]), color[3] as f32 / 255.0)
                }
            };
            let pixel = image.get_pixel_mut(px as u32, py as u32);
            for channel in 0..3 {
                pixel[channel] = blend(pixel[channel], color[channel], coverage);
            }
        });

        (x, y)
    }

    /// Write the canvas as PNG, replacing any existing file.
    ///
    /// With `include_alpha` the image is stored as RGBA with every pixel fully
    /// opaque.
    pub fn save_png(&self, path: &Path, include_alpha: bool) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create PNG file {}", path.display()))?;

        let written = if include_alpha {
            let rgba: RgbaImage = self.image.convert();
            rgba.write_to(&mut file, image::ImageOutputFormat::Png)
        } else {
            self.image.write_to(&mut file, image::ImageOutputFormat::Png)
        };
        written.with_context(|| format!("Failed to write PNG {}", path.display()))?;
        Ok(())
    }
}

/// Tight bounds of `text` under `font`, including the origin offset.
pub fn measure_glyph_bounds(text: &str, font: &GlyphFont) -> GlyphBounds {
    font.bounds(text)
}

/// Anchor that puts the center of `bounds` on the center of the canvas.
pub fn centered_anchor(width: u32, height: u32, bounds: &GlyphBounds) -> (i32, i32) {
    let x = (width as i32 - bounds.width as i32).div_euclid(2) - bounds.offset_x;
    let y = (height as i32 - bounds.height as i32).div_euclid(2) - bounds.offset_y;
    (x, y)
}

/// Render a complete icon: background plus centered glyph.
pub fn render_icon(spec: &IconSpec, font: &GlyphFont, fill: Rgb<u8>) -> Canvas {
    let mut canvas = Canvas::with_background(spec.size, spec.size, &spec.background);
    canvas.composite_glyph_centered(&spec.glyph, font, fill);
    canvas
}

fn mix(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 * (1.0 - t) + b as f64 * t).round().clamp(0.0, 255.0) as u8
}

fn blend(dst: u8, src: u8, coverage: f32) -> u8 {
    let coverage = coverage.clamp(0.0, 1.0);
    (dst as f32 + (src as f32 - dst as f32) * coverage).round() as u8
}
