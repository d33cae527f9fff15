use lopdf::{dictionary, Dictionary, Object};

/// The standard Type1 fonts used by the recipe layout. None of them are
/// embedded; every PDF viewer ships them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    TimesRoman,
    /// Symbol font for the rating stars
    ZapfDingbats,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Helvetica, Font::TimesRoman, Font::ZapfDingbats];

    /// Name of the font in the page resource dictionary
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::TimesRoman => "F2",
            Font::ZapfDingbats => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::TimesRoman => "Times-Roman",
            Font::ZapfDingbats => "ZapfDingbats",
        }
    }

    pub fn dictionary(self) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
        };
        // symbol fonts use their built-in encoding
        if self != Font::ZapfDingbats {
            dict.set("Encoding", "WinAnsiEncoding");
        }
        dict
    }

    /// Advance width of `text` in points
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.glyph_width(c)).sum();
        units as f32 * size / 1000.0
    }

    fn glyph_width(self, c: char) -> u32 {
        let code = c as u32;
        match self {
            Font::ZapfDingbats => 816,
            Font::Helvetica if (32..=126).contains(&code) => HELVETICA_WIDTHS[(code - 32) as usize],
            Font::TimesRoman if (32..=126).contains(&code) => TIMES_WIDTHS[(code - 32) as usize],
            Font::Helvetica => 556,
            Font::TimesRoman => 500,
        }
    }
}

/// Glyph widths of the printable ASCII range, from the Adobe core font metrics
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u32; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_WIDTHS: [u32; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

/// ZapfDingbats code for a filled star (U+2605)
pub const FULL_STAR: u8 = b'H';
/// ZapfDingbats code for an open centre star (U+272B), drawn for half points
pub const HALF_STAR: u8 = b'K';

/// Encodes text for a WinAnsiEncoding font. Characters without a WinAnsi
/// code point become `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x20..=0x7e | 0xa0..=0xff => c as u8,
        _ => match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            '\t' => b' ',
            _ => b'?',
        },
    }
}

/// Encodes a PDF text string (outline titles, document info). ASCII stays
/// literal, anything else is written as UTF-16BE with a byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xfe, 0xff];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, lopdf::StringFormat::Hexadecimal)
    }
}
