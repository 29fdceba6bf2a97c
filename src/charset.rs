//! 8x8 glyph data and the text-atlas packer shared by the ROM build tools.
//!
//! A character ROM is 256 glyphs of 8 bytes each. Every byte is one pixel
//! row with the most significant bit leftmost.

pub const GLYPH_COUNT: usize = 256;
pub const GLYPH_BYTES: usize = 8;
pub const GLYPHS_PER_ROW: usize = 16;
pub const CHARSET_LEN: usize = GLYPH_COUNT * GLYPH_BYTES;

const FIRST_PRINTABLE: usize = 0x20;

/// Built-in glyphs for $20..$5F. Uppercase only, like the home computer
/// character generators this machine borrows its video scheme from.
const FONT: [[u8; 8]; 64] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x66, 0x66, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00], // #
    [0x18, 0x3E, 0x60, 0x3C, 0x06, 0x7C, 0x18, 0x00], // $
    [0x62, 0x66, 0x0C, 0x18, 0x30, 0x66, 0x46, 0x00], // %
    [0x3C, 0x66, 0x3C, 0x38, 0x67, 0x66, 0x3F, 0x00], // &
    [0x18, 0x18, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x0C, 0x18, 0x30, 0x30, 0x30, 0x18, 0x0C, 0x00], // (
    [0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x18, 0x30, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30], // ,
    [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00], // .
    [0x00, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x00], // /
    [0x3C, 0x66, 0x6E, 0x76, 0x66, 0x66, 0x3C, 0x00], // 0
    [0x18, 0x18, 0x38, 0x18, 0x18, 0x18, 0x7E, 0x00], // 1
    [0x3C, 0x66, 0x06, 0x0C, 0x30, 0x60, 0x7E, 0x00], // 2
    [0x3C, 0x66, 0x06, 0x1C, 0x06, 0x66, 0x3C, 0x00], // 3
    [0x06, 0x0E, 0x1E, 0x26, 0x7F, 0x06, 0x06, 0x00], // 4
    [0x7E, 0x60, 0x7C, 0x06, 0x06, 0x66, 0x3C, 0x00], // 5
    [0x3C, 0x66, 0x60, 0x7C, 0x66, 0x66, 0x3C, 0x00], // 6
    [0x7E, 0x66, 0x0C, 0x18, 0x18, 0x18, 0x18, 0x00], // 7
    [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00], // 8
    [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x66, 0x3C, 0x00], // 9
    [0x00, 0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00], // :
    [0x00, 0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x30], // ;
    [0x0E, 0x18, 0x30, 0x60, 0x30, 0x18, 0x0E, 0x00], // <
    [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00], // =
    [0x70, 0x18, 0x0C, 0x06, 0x0C, 0x18, 0x70, 0x00], // >
    [0x3C, 0x66, 0x06, 0x0C, 0x18, 0x00, 0x18, 0x00], // ?
    [0x3C, 0x66, 0x6E, 0x6E, 0x60, 0x62, 0x3C, 0x00], // @
    [0x18, 0x3C, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00], // A
    [0x7C, 0x66, 0x66, 0x7C, 0x66, 0x66, 0x7C, 0x00], // B
    [0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00], // C
    [0x78, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0x78, 0x00], // D
    [0x7E, 0x60, 0x60, 0x78, 0x60, 0x60, 0x7E, 0x00], // E
    [0x7E, 0x60, 0x60, 0x78, 0x60, 0x60, 0x60, 0x00], // F
    [0x3C, 0x66, 0x60, 0x6E, 0x66, 0x66, 0x3C, 0x00], // G
    [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00], // H
    [0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00], // I
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x6C, 0x38, 0x00], // J
    [0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00], // K
    [0x60, 0x60, 0x60, 0x60, 0x60, 0x60, 0x7E, 0x00], // L
    [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00], // M
    [0x66, 0x76, 0x7E, 0x7E, 0x6E, 0x66, 0x66, 0x00], // N
    [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // O
    [0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00], // P
    [0x3C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x0E, 0x00], // Q
    [0x7C, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x00], // R
    [0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00], // S
    [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00], // T
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // U
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00], // V
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // W
    [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00], // X
    [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00], // Y
    [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x7E, 0x00], // Z
    [0x3C, 0x30, 0x30, 0x30, 0x30, 0x30, 0x3C, 0x00], // [
    [0x00, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x00], // backslash
    [0x3C, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x3C, 0x00], // ]
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // _
];

/// The built-in character ROM. Glyphs outside $20..$5F stay blank.
pub fn builtin() -> Vec<u8> {
    let mut charset = vec![0u8; CHARSET_LEN];
    for (index, rows) in FONT.iter().enumerate() {
        let offset = (FIRST_PRINTABLE + index) * GLYPH_BYTES;
        charset[offset..offset + GLYPH_BYTES].copy_from_slice(rows);
    }
    charset
}

/// Packs one 8-character atlas row into a glyph byte, '#' lit and '.'
/// background, leftmost character in the most significant bit.
pub fn pack_row(row: &[u8]) -> Result<u8, String> {
    let mut bits = 0u8;
    for (i, &ch) in row.iter().enumerate() {
        match ch {
            b'#' => bits |= 0x80 >> i,
            b'.' => {}
            other => return Err(format!("unexpected character '{}'", other as char)),
        }
    }
    Ok(bits)
}

/// Parses a text atlas into a character ROM. The atlas is a grid of 16
/// glyphs per line group, 8 text lines per group. A short atlas leaves
/// the remaining glyphs blank.
pub fn parse_atlas(text: &str) -> Result<Vec<u8>, String> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Err(String::from("atlas is empty"));
    }
    if lines.len() % GLYPH_BYTES != 0 {
        return Err(format!(
            "atlas has {} lines, expected a multiple of {}",
            lines.len(),
            GLYPH_BYTES
        ));
    }
    let max_lines = (GLYPH_COUNT / GLYPHS_PER_ROW) * GLYPH_BYTES;
    if lines.len() > max_lines {
        return Err(format!(
            "atlas has {} lines, which describes more than {} glyphs",
            lines.len(),
            GLYPH_COUNT
        ));
    }

    let mut charset = vec![0u8; CHARSET_LEN];
    for (line_no, line) in lines.iter().enumerate() {
        let row = line.as_bytes();
        if row.len() != GLYPHS_PER_ROW * 8 {
            return Err(format!(
                "atlas line {} is {} characters, expected {}",
                line_no + 1,
                row.len(),
                GLYPHS_PER_ROW * 8
            ));
        }
        let glyph_row = line_no / GLYPH_BYTES;
        let pixel_row = line_no % GLYPH_BYTES;
        for glyph_col in 0..GLYPHS_PER_ROW {
            let start = glyph_col * 8;
            let bits = pack_row(&row[start..start + 8])
                .map_err(|e| format!("atlas line {}: {}", line_no + 1, e))?;
            let glyph = glyph_row * GLYPHS_PER_ROW + glyph_col;
            charset[glyph * GLYPH_BYTES + pixel_row] = bits;
        }
    }
    Ok(charset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_row_is_msb_first() {
        assert_eq!(pack_row(b"##....##").unwrap(), 0xC3);
        assert_eq!(pack_row(b"########").unwrap(), 0xFF);
        assert_eq!(pack_row(b"........").unwrap(), 0x00);
        assert_eq!(pack_row(b"#.......").unwrap(), 0x80);
    }

    #[test]
    fn pack_row_rejects_other_characters() {
        assert!(pack_row(b"##..x.##").is_err());
    }

    #[test]
    fn parse_atlas_places_glyphs() {
        let mut lines = vec![".".repeat(128); 8];
        lines[0].replace_range(0..8, "##....##");
        lines[2].replace_range(8..16, "#######.");
        let text = lines.join("\n");

        let charset = parse_atlas(&text).unwrap();

        assert_eq!(charset.len(), CHARSET_LEN);
        // Glyph 0, pixel row 0
        assert_eq!(charset[0], 0xC3);
        // Glyph 1, pixel row 2
        assert_eq!(charset[GLYPH_BYTES + 2], 0xFE);
    }

    #[test]
    fn parse_atlas_rejects_short_lines() {
        let text = "####\n".repeat(8);
        assert!(parse_atlas(&text).is_err());
    }

    #[test]
    fn builtin_covers_the_printable_range() {
        let charset = builtin();
        assert_eq!(charset.len(), CHARSET_LEN);
        // Control glyphs are blank
        assert!(charset[..FIRST_PRINTABLE * GLYPH_BYTES].iter().all(|&b| b == 0));
        // 'A' has pixels
        let a = 0x41 * GLYPH_BYTES;
        assert!(charset[a..a + GLYPH_BYTES].iter().any(|&b| b != 0));
    }
}
