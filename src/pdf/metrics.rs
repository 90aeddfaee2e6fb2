//! Glyph widths and WinAnsi encoding for the built-in Type1 fonts.
//!
//! Widths are in thousandths of the font size, taken from the Adobe core
//! font metrics. Accented Latin-1 letters share the width of their base
//! letter.

use crate::layout::{FontFamily, FontStyle};

/// Widths of ASCII 32 (space) through 126 (`~`).
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER: u16 = 600;
const FALLBACK: u16 = 556;

/// PostScript name of a built-in font.
pub fn base_font(family: FontFamily, style: FontStyle) -> &'static str {
    match (family, style) {
        (FontFamily::Helvetica, FontStyle::Regular) => "Helvetica",
        (FontFamily::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
        (FontFamily::Courier, FontStyle::Regular) => "Courier",
        (FontFamily::Courier, FontStyle::Bold) => "Courier-Bold",
    }
}

/// WinAnsi byte for `ch`, or `None` when the encoding has no such glyph.
pub fn encode_char(ch: char) -> Option<u8> {
    let byte = match ch {
        '\t' => b' ',
        ' '..='~' | '\u{a0}'..='\u{ff}' => ch as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        '‰' => 0x89,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => return None,
    };
    Some(byte)
}

/// Width of `ch` in thousandths of the font size.
pub fn glyph_width(family: FontFamily, style: FontStyle, ch: char) -> Option<u16> {
    let byte = encode_char(ch)?;
    if family == FontFamily::Courier {
        return Some(COURIER);
    }
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    let bold = style == FontStyle::Bold;
    let width = match byte {
        0x20..=0x7e => table[usize::from(byte - 0x20)],
        0x82 => if bold { 278 } else { 222 },
        0x84 | 0x93 | 0x94 => if bold { 500 } else { 333 },
        0x91 | 0x92 => if bold { 278 } else { 222 },
        0x95 => 350,
        0x85 | 0x89 | 0x97 | 0x99 => 1000,
        0xa0 => table[0],
        _ => match base_letter(ch) {
            Some(base) => table[usize::from(base as u8 - 0x20)],
            None => FALLBACK,
        },
    };
    Some(width)
}

fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        '¡' => '!',
        '¿' => '?',
        _ => return None,
    };
    Some(base)
}
