//! Glyph fonts and the font fallback chain
//!
//! A font chain is an ordered list of [`FontSource`]s. Loading walks the list
//! and keeps the first source that can actually draw the requested text, so a
//! missing emoji font degrades to a system font and finally to the built-in
//! box font.
//!
//! Color emoji fonts (sbix, CBDT) carry PNG strikes instead of outlines; those
//! glyphs are drawn in their own colors.

use anyhow::{bail, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::PathBuf;
use ttf_parser::{Face, RasterGlyphImage, RasterImageFormat};

/// Tight pixel bounds of rendered text, relative to the drawing anchor.
///
/// The anchor is the top-left corner of the text line with the ascender at
/// `y = 0`, so `offset_x`/`offset_y` are usually non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphBounds {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
}

impl GlyphBounds {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn from_corners(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            offset_x: min_x,
            offset_y: min_y,
            width: (max_x - min_x).max(0) as u32,
            height: (max_y - min_y).max(0) as u32,
        }
    }
}

/// What a font puts on one canvas pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ink {
    /// Coverage in `0.0..=1.0` of the caller's fill color
    Coverage(f32),
    /// A pixel of a color glyph, straight (non-premultiplied) alpha
    Color(Rgba<u8>),
}

/// One strategy for acquiring a font at a size derived from the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    /// A TrueType/OpenType file; `face_index` selects the face inside a `.ttc`.
    File {
        path: PathBuf,
        face_index: u32,
        size_ratio: f32,
    },
    /// The built-in font. It has no glyph coverage and always loads.
    Builtin { size_ratio: f32 },
}

impl FontSource {
    pub fn file(path: impl Into<PathBuf>, size_ratio: f32) -> Self {
        FontSource::File {
            path: path.into(),
            face_index: 0,
            size_ratio,
        }
    }

    /// Try to produce a font for a canvas of `canvas_size` pixels.
    pub fn load(&self, canvas_size: u32) -> Option<GlyphFont> {
        match self {
            FontSource::File {
                path,
                face_index,
                size_ratio,
            } => {
                let data = std::fs::read(path).ok()?;
                let px = pixel_size(canvas_size, *size_ratio);

                if ColorBitmapFont::has_strikes(&data, *face_index) {
                    return Some(GlyphFont::ColorBitmap(ColorBitmapFont {
                        data,
                        face_index: *face_index,
                        px,
                    }));
                }

                let font = Font::try_from_vec_and_index(data, *face_index)?;
                Some(GlyphFont::Outline {
                    font,
                    scale: Scale::uniform(px as f32),
                })
            }
            FontSource::Builtin { size_ratio } => Some(GlyphFont::Builtin(BuiltinFont::new(
                pixel_size(canvas_size, *size_ratio),
            ))),
        }
    }
}

fn pixel_size(canvas_size: u32, ratio: f32) -> u32 {
    ((canvas_size as f32 * ratio) as u32).max(1)
}

/// Load the first font in `chain` that draws something for `text`.
///
/// Sources that fail to load, or load but measure `text` as empty (no
/// outline, no bitmap), are skipped without notice. If no source covers
/// `text`, the first font that loaded is returned; only a chain where nothing
/// loads is an error.
pub fn load_font(chain: &[FontSource], canvas_size: u32, text: &str) -> Result<GlyphFont> {
    let mut first_loaded = None;

    for source in chain {
        if let Some(font) = source.load(canvas_size) {
            if !font.bounds(text).is_empty() {
                return Ok(font);
            }
            if first_loaded.is_none() {
                first_loaded = Some(font);
            }
        }
    }

    match first_loaded {
        Some(font) => Ok(font),
        None => bail!(
            "No usable font found (tried {} font source{})",
            chain.len(),
            if chain.len() == 1 { "" } else { "s" }
        ),
    }
}

/// A font ready to measure and draw text at a fixed pixel size.
pub enum GlyphFont {
    Outline { font: Font<'static>, scale: Scale },
    ColorBitmap(ColorBitmapFont),
    Builtin(BuiltinFont),
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphFont::Outline { scale, .. } => {
                f.debug_struct("Outline").field("scale", scale).finish()
            }
            GlyphFont::ColorBitmap(bitmap) => f.debug_tuple("ColorBitmap").field(bitmap).finish(),
            GlyphFont::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
        }
    }
}

impl GlyphFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, GlyphFont::Builtin(_))
    }

    pub fn is_color_bitmap(&self) -> bool {
        matches!(self, GlyphFont::ColorBitmap(_))
    }

    /// Measure `text` drawn with its anchor at the origin.
    pub fn bounds(&self, text: &str) -> GlyphBounds {
        match self {
            GlyphFont::Outline { font, scale } => {
                let glyphs = layout(font, *scale, text, 0, 0);
                let mut corners: Option<(i32, i32, i32, i32)> = None;

                for bb in glyphs.iter().filter_map(|g| g.pixel_bounding_box()) {
                    corners = Some(union(corners, (bb.min.x, bb.min.y, bb.max.x, bb.max.y)));
                }

                corners
                    .map(|(x0, y0, x1, y1)| GlyphBounds::from_corners(x0, y0, x1, y1))
                    .unwrap_or_default()
            }
            GlyphFont::ColorBitmap(bitmap) => bitmap.bounds(text),
            GlyphFont::Builtin(builtin) => builtin.bounds(text),
        }
    }

    /// Rasterize `text` with its anchor at `(x, y)`.
    ///
    /// `plot` receives canvas coordinates and the ink for that pixel;
    /// coordinates may fall outside the canvas.
    pub fn draw<F: FnMut(i32, i32, Ink)>(&self, text: &str, x: i32, y: i32, mut plot: F) {
        match self {
            GlyphFont::Outline { font, scale } => {
                for glyph in layout(font, *scale, text, x, y) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            plot(
                                bb.min.x + gx as i32,
                                bb.min.y + gy as i32,
                                Ink::Coverage(coverage),
                            )
                        });
                    }
                }
            }
            GlyphFont::ColorBitmap(bitmap) => bitmap.draw(text, x, y, plot),
            GlyphFont::Builtin(builtin) => builtin.draw(text, x, y, plot),
        }
    }
}

fn union(
    corners: Option<(i32, i32, i32, i32)>,
    rect: (i32, i32, i32, i32),
) -> (i32, i32, i32, i32) {
    match corners {
        None => rect,
        Some((x0, y0, x1, y1)) => (x0.min(rect.0), y0.min(rect.1), x1.max(rect.2), y1.max(rect.3)),
    }
}

// Integer anchors keep the sub-pixel phase identical between measuring and
// drawing, so the drawn bounds are the measured bounds shifted exactly.
// Unmapped characters (glyph 0) are dropped instead of drawing `.notdef`.
fn layout(
    font: &Font<'static>,
    scale: Scale,
    text: &str,
    x: i32,
    y: i32,
) -> Vec<PositionedGlyph<'static>> {
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(x as f32, y as f32 + v_metrics.ascent))
        .filter(|glyph| glyph.id().0 != 0)
        .collect()
}

/// A font whose glyphs are PNG strikes (Apple sbix, Google CBDT).
///
/// Strikes are scaled from their own ppem to the requested pixel size and
/// placed on the pen position using the bitmap's bottom-left offset.
pub struct ColorBitmapFont {
    data: Vec<u8>,
    face_index: u32,
    px: u32,
}

impl std::fmt::Debug for ColorBitmapFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorBitmapFont")
            .field("face_index", &self.face_index)
            .field("px", &self.px)
            .finish()
    }
}

/// A scaled glyph bitmap, cropped to its visible pixels
struct PlacedBitmap {
    left: i32,
    top: i32,
    image: RgbaImage,
}

impl ColorBitmapFont {
    fn has_strikes(data: &[u8], face_index: u32) -> bool {
        Face::parse(data, face_index)
            .map(|face| face.tables().sbix.is_some() || face.tables().cbdt.is_some())
            .unwrap_or(false)
    }

    pub fn pixel_size(&self) -> u32 {
        self.px
    }

    fn place(&self, text: &str) -> Vec<PlacedBitmap> {
        let face = match Face::parse(&self.data, self.face_index) {
            Ok(face) => face,
            Err(_) => return Vec::new(),
        };

        let units = self.px as f32 / face.units_per_em().max(1) as f32;
        let baseline = (face.ascender() as f32 * units).round() as i32;
        let strike_ppem = self.px.min(u16::MAX as u32) as u16;

        let mut pen_x = 0.0;
        let mut placed = Vec::new();
        for c in text.chars() {
            let glyph_id = match face.glyph_index(c) {
                Some(id) => id,
                None => continue,
            };

            if let Some(raster) = face.glyph_raster_image(glyph_id, strike_ppem) {
                if let Some(bitmap) = place_raster(&raster, self.px, pen_x, baseline) {
                    placed.push(bitmap);
                }
            }

            pen_x += face
                .glyph_hor_advance(glyph_id)
                .map(|advance| advance as f32 * units)
                .unwrap_or(0.0);
        }

        placed
    }

    pub fn bounds(&self, text: &str) -> GlyphBounds {
        let mut corners = None;
        for bitmap in self.place(text) {
            corners = Some(union(
                corners,
                (
                    bitmap.left,
                    bitmap.top,
                    bitmap.left + bitmap.image.width() as i32,
                    bitmap.top + bitmap.image.height() as i32,
                ),
            ));
        }

        corners
            .map(|(x0, y0, x1, y1)| GlyphBounds::from_corners(x0, y0, x1, y1))
            .unwrap_or_default()
    }

    pub fn draw<F: FnMut(i32, i32, Ink)>(&self, text: &str, x: i32, y: i32, mut plot: F) {
        for bitmap in self.place(text) {
            for (bx, by, pixel) in bitmap.image.enumerate_pixels() {
                if pixel[3] > 0 {
                    plot(
                        x + bitmap.left + bx as i32,
                        y + bitmap.top + by as i32,
                        Ink::Color(*pixel),
                    );
                }
            }
        }
    }
}

fn place_raster(
    raster: &RasterGlyphImage,
    px: u32,
    pen_x: f32,
    baseline: i32,
) -> Option<PlacedBitmap> {
    if !matches!(raster.format, RasterImageFormat::PNG) {
        return None;
    }

    let strike = image::load_from_memory(raster.data).ok()?.to_rgba8();
    let factor = px as f32 / raster.pixels_per_em.max(1) as f32;
    let width = ((strike.width() as f32 * factor).round() as u32).max(1);
    let height = ((strike.height() as f32 * factor).round() as u32).max(1);
    let scaled = imageops::resize(&strike, width, height, FilterType::Lanczos3);

    // (x, y) is the bottom-left corner of the strike, y pointing up.
    let left = (pen_x + raster.x as f32 * factor).round() as i32;
    let top = baseline - ((raster.y as f32 + strike.height() as f32) * factor).round() as i32;

    crop_to_visible(scaled, left, top)
}

fn crop_to_visible(image: RgbaImage, left: i32, top: i32) -> Option<PlacedBitmap> {
    let mut corners: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            corners = Some(match corners {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    let (x0, y0, x1, y1) = corners?;
    Some(PlacedBitmap {
        left: left + x0 as i32,
        top: top + y0 as i32,
        image: imageops::crop_imm(&image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image(),
    })
}

/// Minimal last-resort font: every visible character is drawn as a hollow
/// "missing glyph" box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFont {
    px: u32,
}

impl BuiltinFont {
    pub fn new(px: u32) -> Self {
        Self { px: px.max(1) }
    }

    pub fn pixel_size(&self) -> u32 {
        self.px
    }

    fn advance(&self) -> i32 {
        (self.px * 3 / 5).max(1) as i32
    }

    // (left bearing, top, width, height) of one box relative to its pen position
    fn cell(&self) -> (i32, i32, i32, i32) {
        let px = self.px as i32;
        (px / 10, px / 5, (px / 2).max(1), (px * 7 / 10).max(1))
    }

    fn stroke(&self) -> i32 {
        (self.px / 12).max(1) as i32
    }

    fn visible_count(text: &str) -> usize {
        text.chars().filter(|&c| !is_zero_width(c)).count()
    }

    pub fn bounds(&self, text: &str) -> GlyphBounds {
        let count = Self::visible_count(text) as i32;
        if count == 0 {
            return GlyphBounds::default();
        }

        let (left, top, width, height) = self.cell();
        GlyphBounds::from_corners(
            left,
            top,
            left + (count - 1) * self.advance() + width,
            top + height,
        )
    }

    pub fn draw<F: FnMut(i32, i32, Ink)>(&self, text: &str, x: i32, y: i32, mut plot: F) {
        let (left, top, width, height) = self.cell();
        let stroke = self.stroke();

        for i in 0..Self::visible_count(text) as i32 {
            let box_x = x + left + i * self.advance();
            let box_y = y + top;

            for dy in 0..height {
                for dx in 0..width {
                    let on_edge = dx < stroke
                        || dy < stroke
                        || dx >= width - stroke
                        || dy >= height - stroke;
                    if on_edge {
                        plot(box_x + dx, box_y + dy, Ink::Coverage(1.0));
                    }
                }
            }
        }
    }
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200D}' | '\u{FE00}'..='\u{FE0F}') || c.is_control()
}

/// Emoji fonts shipped by the common desktop systems.
pub fn emoji_font_sources(size_ratio: f32) -> Vec<FontSource> {
    vec![
        FontSource::file("/System/Library/Fonts/Apple Color Emoji.ttc", size_ratio),
        FontSource::file(
            "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
            size_ratio,
        ),
        FontSource::file("/usr/share/fonts/noto/NotoColorEmoji.ttf", size_ratio),
    ]
}

/// Plain text system fonts used when no emoji font is installed.
pub fn system_font_sources(size_ratio: f32) -> Vec<FontSource> {
    vec![
        FontSource::file("/System/Library/Fonts/Helvetica.ttc", size_ratio),
        FontSource::file(
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            size_ratio,
        ),
        FontSource::file("/usr/share/fonts/TTF/DejaVuSans.ttf", size_ratio),
    ]
}
