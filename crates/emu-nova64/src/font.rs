//! The fixed glyph ROM.
//!
//! 256 glyphs of 8x8 pixels, unpacked at construction time to ARGB4444 so
//! the pixel engine can fetch glyph pixels exactly like pixel-RAM pixels.
//! Codes $20-$7E carry the printable ASCII set; $B0-$DF carry the classic
//! box-drawing and block range. Everything else renders blank.

use font8x8::{BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, UnicodeFonts};

/// Number of glyphs in the ROM.
pub const GLYPH_COUNT: usize = 256;

/// Pixels per glyph (8x8).
pub const GLYPH_PIXELS: usize = 64;

/// Address mask for glyph ROM lookups.
pub const GLYPH_ROM_MASK: usize = 0x3FFF;

/// Ink color of set glyph pixels (light grey, full alpha).
pub const GLYPH_INK: u16 = 0xFCCC;

/// Full-block glyph, used as the terminal cursor.
pub const CURSOR_GLYPH: u8 = 0xDB;

/// Box-drawing and block glyphs for codes $B0-$DF.
const EXTENDED: [char; 48] = [
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
];

/// Build the unpacked glyph ROM: `GLYPH_COUNT * GLYPH_PIXELS` ARGB4444
/// entries, one 64-pixel run per glyph code.
#[must_use]
pub fn build_glyph_rom() -> Vec<u16> {
    let mut rom = vec![0u16; GLYPH_COUNT * GLYPH_PIXELS];
    for code in 0..GLYPH_COUNT {
        if let Some(bitmap) = glyph_bitmap(code as u8) {
            let base = code * GLYPH_PIXELS;
            for (row, &bits) in bitmap.iter().enumerate() {
                for col in 0..8 {
                    // font8x8 rows are LSB-leftmost
                    if (bits >> col) & 1 == 1 {
                        rom[base + row * 8 + col] = GLYPH_INK;
                    }
                }
            }
        }
    }
    rom
}

fn glyph_bitmap(code: u8) -> Option<[u8; 8]> {
    match code {
        0x20..=0x7E => BASIC_FONTS.get(code as char),
        0xB0..=0xDF => {
            let ch = EXTENDED[usize::from(code - 0xB0)];
            BOX_FONTS.get(ch).or_else(|| BLOCK_FONTS.get(ch))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_has_expected_size() {
        assert_eq!(build_glyph_rom().len(), GLYPH_COUNT * GLYPH_PIXELS);
    }

    #[test]
    fn control_codes_are_blank() {
        let rom = build_glyph_rom();
        for pixel in &rom[0..GLYPH_PIXELS] {
            assert_eq!(*pixel, 0x0000);
        }
    }

    #[test]
    fn letter_glyph_has_ink_pixels() {
        let rom = build_glyph_rom();
        let base = usize::from(b'A') * GLYPH_PIXELS;
        let ink = rom[base..base + GLYPH_PIXELS]
            .iter()
            .filter(|&&p| p == GLYPH_INK)
            .count();
        assert!(ink > 0, "glyph 'A' should have set pixels");
        assert!(ink < GLYPH_PIXELS, "glyph 'A' should have clear pixels");
    }

    #[test]
    fn cursor_glyph_is_solid() {
        let rom = build_glyph_rom();
        let base = usize::from(CURSOR_GLYPH) * GLYPH_PIXELS;
        for pixel in &rom[base..base + GLYPH_PIXELS] {
            assert_eq!(*pixel, GLYPH_INK, "cursor block glyph must be fully set");
        }
    }

    #[test]
    fn space_is_transparent() {
        let rom = build_glyph_rom();
        let base = usize::from(b' ') * GLYPH_PIXELS;
        for pixel in &rom[base..base + GLYPH_PIXELS] {
            assert_eq!(*pixel, 0x0000);
        }
    }
}
