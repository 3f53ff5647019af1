use anyhow::{anyhow, Result};
use image::Rgb;
use std::str::FromStr;

/// Parse a CSS color string (`#FFD93D`, `#fff`, ...) into an RGB pixel.
/// A malformed color is an error, there is no fallback color.
pub fn parse_color(color: &str) -> Result<Rgb<u8>> {
    let srgb = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow!("Invalid color: {:?}", color))?;

    Ok(Rgb([
        to_channel(srgb.red),
        to_channel(srgb.green),
        to_channel(srgb.blue),
    ]))
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#FFD93D").unwrap(), Rgb([255, 217, 61]));
        assert_eq!(parse_color("#ffaa80").unwrap(), Rgb([255, 170, 128]));
        assert_eq!(parse_color("#fff").unwrap(), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_malformed_color_is_an_error() {
        assert!(parse_color("#FFD93").is_err());
        assert!(parse_color("#GGGGGG").is_err());
        assert!(parse_color("").is_err());
    }
}
