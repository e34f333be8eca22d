//! Single-entry PNG card rendered with an 8x8 bitmap font.

use std::io::Cursor;

use anyhow::{Context, Result};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};

use super::entry_heading;
use crate::journal::types::Entry;

const ORIGIN: (u32, u32) = (10, 10);
const GLYPH: u32 = 8;
const LINE_HEIGHT: u32 = 10;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Render `entry` as a `width`×`height` PNG: heading, blank line, summary,
/// blank line, entry text. Lines are not wrapped; anything past the canvas
/// edge is dropped.
pub fn render_card(entry: &Entry, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    let text = format!(
        "{}\n\n{}\n\n{}",
        entry_heading(entry),
        entry.summary,
        entry.entry
    );
    let (x0, mut y) = ORIGIN;
    for line in text.lines() {
        draw_line(&mut img, line, x0, y);
        y = y.saturating_add(LINE_HEIGHT);
        if y >= height {
            break;
        }
    }

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("failed to encode card as PNG")?;
    Ok(bytes)
}

fn draw_line(img: &mut RgbImage, line: &str, x0: u32, y0: u32) {
    let mut x = x0;
    for c in line.chars() {
        if x >= img.width() {
            break;
        }
        draw_glyph(img, glyph(c), x, y0);
        x = x.saturating_add(GLYPH);
    }
}

fn draw_glyph(img: &mut RgbImage, rows: [u8; 8], x0: u32, y0: u32) {
    for (dy, row) in rows.iter().enumerate() {
        for dx in 0..GLYPH {
            if *row & (1u8 << dx) == 0 {
                continue;
            }
            let (px, py) = (x0 + dx, y0 + dy as u32);
            if px < img.width() && py < img.height() {
                img.put_pixel(px, py, BLACK);
            }
        }
    }
}

/// Bitmap for `c`, falling back to `?` for characters the font lacks.
fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}
