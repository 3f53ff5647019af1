//! Synthetic color bitmap (sbix) fonts for tests that must not depend on the
//! fonts installed on the host.

#![allow(dead_code)]

use image::{ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;

/// One mapped character of a synthetic font.
pub struct BitmapGlyph {
    pub ch: char,
    /// Bottom-left corner of the bitmap relative to the pen, y up, in strike pixels.
    pub origin: (i16, i16),
    /// PNG bytes, or `None` for a glyph without bitmap data.
    pub png: Option<Vec<u8>>,
}

impl BitmapGlyph {
    pub fn solid(ch: char, ppem: u32, color: [u8; 4], origin: (i16, i16)) -> Self {
        Self {
            ch,
            origin,
            png: Some(solid_png(ppem, ppem, color)),
        }
    }

    pub fn empty(ch: char) -> Self {
        Self {
            ch,
            origin: (0, 0),
            png: None,
        }
    }
}

pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .expect("Failed to encode glyph PNG");
    bytes.into_inner()
}

/// Build a minimal TrueType file with one sbix strike at `ppem`.
///
/// Glyph 0 is `.notdef`; `glyphs[i]` becomes glyph `i + 1`. Every glyph
/// advances by one em.
pub fn sbix_font(ppem: u16, glyphs: &[BitmapGlyph]) -> Vec<u8> {
    let num_glyphs = glyphs.len() as u16 + 1;

    let tables: [(&[u8; 4], Vec<u8>); 6] = [
        (b"cmap", cmap_table(glyphs)),
        (b"head", head_table()),
        (b"hhea", hhea_table(num_glyphs)),
        (b"hmtx", hmtx_table(num_glyphs)),
        (b"maxp", maxp_table(num_glyphs)),
        (b"sbix", sbix_table(ppem, glyphs)),
    ];

    let mut font = Vec::new();
    font.extend(0x0001_0000u32.to_be_bytes());
    font.extend((tables.len() as u16).to_be_bytes());
    // searchRange, entrySelector, rangeShift
    font.extend(64u16.to_be_bytes());
    font.extend(2u16.to_be_bytes());
    font.extend(32u16.to_be_bytes());

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend(tag.iter());
        font.extend(0u32.to_be_bytes());
        font.extend((offset as u32).to_be_bytes());
        font.extend((data.len() as u32).to_be_bytes());

        body.extend(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend(body);
    font
}

pub fn write_sbix_font(dir: &Path, name: &str, ppem: u16, glyphs: &[BitmapGlyph]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sbix_font(ppem, glyphs)).expect("Failed to write test font");
    path
}

fn cmap_table(glyphs: &[BitmapGlyph]) -> Vec<u8> {
    let mut groups: Vec<(u32, u32)> = glyphs
        .iter()
        .enumerate()
        .map(|(i, glyph)| (glyph.ch as u32, i as u32 + 1))
        .collect();
    groups.sort();

    let mut data = Vec::new();
    data.extend(0u16.to_be_bytes());
    data.extend(1u16.to_be_bytes());
    // Windows, Unicode full repertoire
    data.extend(3u16.to_be_bytes());
    data.extend(10u16.to_be_bytes());
    data.extend(12u32.to_be_bytes());

    data.extend(12u16.to_be_bytes());
    data.extend(0u16.to_be_bytes());
    data.extend((16 + 12 * groups.len() as u32).to_be_bytes());
    data.extend(0u32.to_be_bytes());
    data.extend((groups.len() as u32).to_be_bytes());
    for (code_point, glyph_id) in groups {
        data.extend(code_point.to_be_bytes());
        data.extend(code_point.to_be_bytes());
        data.extend(glyph_id.to_be_bytes());
    }
    data
}

fn head_table() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(0x0001_0000u32.to_be_bytes());
    data.extend(0x0001_0000u32.to_be_bytes());
    data.extend(0u32.to_be_bytes());
    data.extend(0x5F0F_3CF5u32.to_be_bytes());
    data.extend(0u16.to_be_bytes());
    data.extend(UNITS_PER_EM.to_be_bytes());
    data.extend(0u64.to_be_bytes());
    data.extend(0u64.to_be_bytes());
    for bound in [0i16, DESCENDER, UNITS_PER_EM as i16, ASCENDER] {
        data.extend(bound.to_be_bytes());
    }
    data.extend(0u16.to_be_bytes());
    data.extend(8u16.to_be_bytes());
    data.extend(2i16.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    debug_assert_eq!(data.len(), 54);
    data
}

fn hhea_table(num_glyphs: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(0x0001_0000u32.to_be_bytes());
    data.extend(ASCENDER.to_be_bytes());
    data.extend(DESCENDER.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    data.extend(UNITS_PER_EM.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    data.extend((UNITS_PER_EM as i16).to_be_bytes());
    data.extend(1i16.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    data.extend(0i16.to_be_bytes());
    data.extend([0u8; 8]);
    data.extend(0i16.to_be_bytes());
    data.extend(num_glyphs.to_be_bytes());
    debug_assert_eq!(data.len(), 36);
    data
}

fn hmtx_table(num_glyphs: u16) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..num_glyphs {
        data.extend(UNITS_PER_EM.to_be_bytes());
        data.extend(0i16.to_be_bytes());
    }
    data
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(0x0000_5000u32.to_be_bytes());
    data.extend(num_glyphs.to_be_bytes());
    data
}

fn sbix_table(ppem: u16, glyphs: &[BitmapGlyph]) -> Vec<u8> {
    let num_glyphs = glyphs.len() + 1;

    // Strike header plus one offset per glyph and a closing offset.
    let mut strike = Vec::new();
    strike.extend(ppem.to_be_bytes());
    strike.extend(72u16.to_be_bytes());

    let mut glyph_data = Vec::new();
    let data_start = 4 + 4 * (num_glyphs + 1);

    // .notdef has no bitmap, so it starts and ends at `data_start`.
    let mut offsets = vec![data_start, data_start];
    for glyph in glyphs {
        if let Some(png) = &glyph.png {
            glyph_data.extend(glyph.origin.0.to_be_bytes());
            glyph_data.extend(glyph.origin.1.to_be_bytes());
            glyph_data.extend(b"png ");
            glyph_data.extend(png);
        }
        offsets.push(data_start + glyph_data.len());
    }

    for offset in offsets {
        strike.extend((offset as u32).to_be_bytes());
    }
    strike.extend(glyph_data);

    let mut data = Vec::new();
    data.extend(1u16.to_be_bytes());
    data.extend(1u16.to_be_bytes());
    data.extend(1u32.to_be_bytes());
    data.extend(12u32.to_be_bytes());
    data.extend(strike);
    data
}
