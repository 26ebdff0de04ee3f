//! Static font data.
//!
//! This module contains two tables:
//!
//! - Font styles: for each font name used by groff's devices, the family,
//!     weight and slant that a renderer should use to approximate it.
//!
//! - Symbol maps: the symbol and dingbat fonts place their glyphs at the
//!     code points of ASCII letters. Text printed in these fonts is remapped
//!     to the Unicode characters the glyphs actually depict.

/// Weight of a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weight {
    Normal,
    Bold,
}

/// Slant of a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slant {
    Roman,
    Italic,
    Oblique,
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weight::Normal => write!(f, "normal"),
            Weight::Bold => write!(f, "bold"),
        }
    }
}

impl std::fmt::Display for Slant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slant::Roman => write!(f, "normal"),
            Slant::Italic => write!(f, "italic"),
            Slant::Oblique => write!(f, "oblique"),
        }
    }
}

/// Style of a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FontStyle {
    pub family: &'static str,
    pub weight: Weight,
    pub slant: Slant,
}

impl FontStyle {
    const fn new(family: &'static str, weight: Weight, slant: Slant) -> FontStyle {
        FontStyle {
            family,
            weight,
            slant,
        }
    }
}

macro_rules! family {
    ($family: expr, $r: expr, $b: expr, $i: expr, $bi: expr, $slant: expr) => {
        [
            ($r, FontStyle::new($family, Weight::Normal, Slant::Roman)),
            ($b, FontStyle::new($family, Weight::Bold, Slant::Roman)),
            ($i, FontStyle::new($family, Weight::Normal, $slant)),
            ($bi, FontStyle::new($family, Weight::Bold, $slant)),
        ]
    };
}

const FAMILIES: [[(&str, FontStyle); 4]; 10] = [
    family!("Avant Garde", "AR", "AB", "AI", "ABI", Slant::Oblique),
    family!("Bookman", "BMR", "BMB", "BMI", "BMBI", Slant::Italic),
    family!("Courier", "CR", "CB", "CI", "CBI", Slant::Oblique),
    family!("Helvetica", "HR", "HB", "HI", "HBI", Slant::Oblique),
    family!(
        "Helvetica Narrow",
        "HNR",
        "HNB",
        "HNI",
        "HNBI",
        Slant::Oblique
    ),
    family!(
        "New Century Schoolbook",
        "NR",
        "NB",
        "NI",
        "NBI",
        Slant::Italic
    ),
    family!("Palatino", "PR", "PB", "PI", "PBI", Slant::Italic),
    family!("Times", "TR", "TB", "TI", "TBI", Slant::Italic),
    // Fonts of the terminal devices.
    family!("monospace", "R", "B", "I", "BI", Slant::Italic),
    // Fonts of the dvi device.
    family!("Computer Modern", "CMR", "CMB", "CMI", "CMBI", Slant::Italic),
];

const OTHERS: [(&str, FontStyle); 4] = [
    (
        "ZCMI",
        FontStyle::new("Zapf Chancery", Weight::Normal, Slant::Italic),
    ),
    (
        "ZD",
        FontStyle::new("Zapf Dingbats", Weight::Normal, Slant::Roman),
    ),
    ("S", FontStyle::new("Symbol", Weight::Normal, Slant::Roman)),
    ("SS", FontStyle::new("Symbol", Weight::Normal, Slant::Oblique)),
];

/// Returns the style of a font known to groff's devices.
///
/// ```
/// use ditroff::font::*;
/// assert_eq!(
///     style("HBI"),
///     Some(FontStyle { family: "Helvetica", weight: Weight::Bold, slant: Slant::Oblique }),
/// );
/// assert_eq!(style("XYZ"), None);
/// ```
pub fn style(name: &str) -> Option<FontStyle> {
    FAMILIES
        .iter()
        .flatten()
        .chain(OTHERS.iter())
        .find(|(n, _)| *n == name)
        .map(|(_, s)| *s)
}

/// Returns the style of a font, guessing from the name's suffix if the font is unknown.
///
/// Fonts named with groff's conventions end in `R`, `I`, `B` or `BI`.
pub fn style_or_guess(name: &str) -> FontStyle {
    if let Some(s) = style(name) {
        return s;
    }
    let (weight, slant) = if name.ends_with("BI") {
        (Weight::Bold, Slant::Italic)
    } else if name.ends_with('B') {
        (Weight::Bold, Slant::Roman)
    } else if name.ends_with('I') {
        (Weight::Normal, Slant::Italic)
    } else {
        (Weight::Normal, Slant::Roman)
    };
    FontStyle::new("serif", weight, slant)
}

const SYMBOL: [(char, char); 52] = [
    ('a', 'α'),
    ('b', 'β'),
    ('c', 'χ'),
    ('d', 'δ'),
    ('e', 'ε'),
    ('f', 'φ'),
    ('g', 'γ'),
    ('h', 'η'),
    ('i', 'ι'),
    ('j', 'ϕ'),
    ('k', 'κ'),
    ('l', 'λ'),
    ('m', 'μ'),
    ('n', 'ν'),
    ('o', 'ο'),
    ('p', 'π'),
    ('q', 'θ'),
    ('r', 'ρ'),
    ('s', 'σ'),
    ('t', 'τ'),
    ('u', 'υ'),
    ('v', 'ϖ'),
    ('w', 'ω'),
    ('x', 'ξ'),
    ('y', 'ψ'),
    ('z', 'ζ'),
    ('A', 'Α'),
    ('B', 'Β'),
    ('C', 'Χ'),
    ('D', 'Δ'),
    ('E', 'Ε'),
    ('F', 'Φ'),
    ('G', 'Γ'),
    ('H', 'Η'),
    ('I', 'Ι'),
    ('J', 'ϑ'),
    ('K', 'Κ'),
    ('L', 'Λ'),
    ('M', 'Μ'),
    ('N', 'Ν'),
    ('O', 'Ο'),
    ('P', 'Π'),
    ('Q', 'Θ'),
    ('R', 'Ρ'),
    ('S', 'Σ'),
    ('T', 'Τ'),
    ('U', 'Υ'),
    ('V', 'ς'),
    ('W', 'Ω'),
    ('X', 'Ξ'),
    ('Y', 'Ψ'),
    ('Z', 'Ζ'),
];

/// Runs of consecutive code points in the dingbat font.
///
/// Each entry is (first byte, last byte, first Unicode code point).
const DINGBATS: [(u8, u8, u32); 18] = [
    (0x21, 0x24, 0x2701),
    (0x25, 0x25, 0x260E),
    (0x26, 0x29, 0x2706),
    (0x2A, 0x2A, 0x261B),
    (0x2B, 0x2B, 0x261E),
    (0x2C, 0x47, 0x270C),
    (0x48, 0x48, 0x2605),
    (0x49, 0x6B, 0x2729),
    (0x6C, 0x6C, 0x25CF),
    (0x6D, 0x6D, 0x274D),
    (0x6E, 0x6E, 0x25A0),
    (0x6F, 0x72, 0x274F),
    (0x73, 0x73, 0x25B2),
    (0x74, 0x74, 0x25BC),
    (0x75, 0x75, 0x25C6),
    (0x76, 0x76, 0x2756),
    (0x77, 0x77, 0x25D7),
    (0x78, 0x7E, 0x2758),
];

/// A symbol font whose glyphs are remapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolMap {
    /// The `S` and `SS` fonts.
    Symbol,
    /// The `ZD` font.
    Dingbats,
}

impl SymbolMap {
    /// Returns the symbol map for a font name, if the font has one.
    pub fn for_font(name: &str) -> Option<SymbolMap> {
        match name {
            "S" | "SS" => Some(SymbolMap::Symbol),
            "ZD" => Some(SymbolMap::Dingbats),
            _ => None,
        }
    }

    /// Remaps a single character; characters outside the map are returned unchanged.
    pub fn remap_char(self, c: char) -> char {
        match self {
            SymbolMap::Symbol => SYMBOL
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c),
            SymbolMap::Dingbats => {
                let Ok(b) = u8::try_from(c) else {
                    return c;
                };
                DINGBATS
                    .iter()
                    .find(|(first, last, _)| (*first..=*last).contains(&b))
                    .and_then(|(first, _, base)| char::from_u32(base + (b - first) as u32))
                    .unwrap_or(c)
            }
        }
    }

    /// Remaps every character in a string.
    pub fn remap(self, s: &str) -> String {
        s.chars().map(|c| self.remap_char(c)).collect()
    }
}
