//! Metrics and encoding for the built-in (non-embedded) Helvetica faces.

/// Advance widths (1/1000 em) for Helvetica, codes 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Advance widths (1/1000 em) for Helvetica-Bold, codes 32..=126.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

const DEFAULT_WIDTH: u16 = 556;

/// The byte a character encodes to under WinAnsiEncoding, if it has one.
pub(crate) fn winansi_byte(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '\u{a0}'..='\u{ff}' => Some(ch as u32 as u8),
        '€' => Some(0x80),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}

/// Encodes text for a built-in face; characters outside WinAnsi become `?`.
pub(crate) fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|ch| !ch.is_control())
        .map(|ch| winansi_byte(ch).unwrap_or(b'?'))
        .collect()
}

pub(crate) fn advance(byte: u8, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match byte {
        32..=126 => table[(byte - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width in points of `text` set in Helvetica (or Helvetica-Bold) at `size`.
pub(crate) fn text_width(text: &str, bold: bool, size: f32) -> f32 {
    let units: u32 = encode_winansi(text)
        .into_iter()
        .map(|b| advance(b, bold) as u32)
        .sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_monospaced() {
        assert_eq!(text_width("0000", false, 10.0), text_width("9876", false, 10.0));
        assert!((text_width("1", false, 10.0) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn bold_is_wider() {
        assert!(text_width("Statement", true, 12.0) > text_width("Statement", false, 12.0));
    }

    #[test]
    fn unencodable_characters_become_question_marks() {
        assert_eq!(encode_winansi("₹ 5"), b"? 5".to_vec());
        assert_eq!(encode_winansi("café"), vec![b'c', b'a', b'f', 0xe9]);
    }
}
