//! Glyph names.
//!
//! The `C` command prints a glyph by name.
//! Names are resolved in the following order:
//!
//! 1. Special character names like `em`, `*a` or `co` are looked up in a static table.
//! 1. Single character names are returned literally.
//! 1. Names of the form `uXXXX`, with 4 to 6 hexadecimal digits, name a Unicode
//!     scalar value directly. Composite names like `u0041_0301` are also supported.
//! 1. Names of the form `charNNN` name a Latin-1 code point.
//!
//! Any other name is unknown.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Special character names and the text they map to.
///
/// Every entry maps to a single character, except for the ligatures
/// `ff`, `ffi`, `ffl`, `fi` and `fl` which map to their component letters.
pub const NAMES: &[(&str, &str)] = &[
    // Ligatures
    ("ff", "ff"),
    ("fi", "fi"),
    ("fl", "fl"),
    ("ffi", "ffi"),
    ("ffl", "ffl"),
    // Letters
    ("-D", "Đ"),
    ("Sd", "ð"),
    ("TP", "Þ"),
    ("Tp", "þ"),
    ("ss", "ß"),
    ("AE", "Æ"),
    ("ae", "æ"),
    ("OE", "Œ"),
    ("oe", "œ"),
    ("IJ", "Ĳ"),
    ("ij", "ĳ"),
    (".i", "ı"),
    (".j", "ȷ"),
    ("/L", "Ł"),
    ("/l", "ł"),
    ("/O", "Ø"),
    ("/o", "ø"),
    ("'A", "Á"),
    ("'C", "Ć"),
    ("'E", "É"),
    ("'I", "Í"),
    ("'O", "Ó"),
    ("'U", "Ú"),
    ("'Y", "Ý"),
    ("'a", "á"),
    ("'c", "ć"),
    ("'e", "é"),
    ("'i", "í"),
    ("'o", "ó"),
    ("'u", "ú"),
    ("'y", "ý"),
    (":A", "Ä"),
    (":E", "Ë"),
    (":I", "Ï"),
    (":O", "Ö"),
    (":U", "Ü"),
    (":Y", "Ÿ"),
    (":a", "ä"),
    (":e", "ë"),
    (":i", "ï"),
    (":o", "ö"),
    (":u", "ü"),
    (":y", "ÿ"),
    ("^A", "Â"),
    ("^E", "Ê"),
    ("^I", "Î"),
    ("^O", "Ô"),
    ("^U", "Û"),
    ("^a", "â"),
    ("^e", "ê"),
    ("^i", "î"),
    ("^o", "ô"),
    ("^u", "û"),
    ("`A", "À"),
    ("`E", "È"),
    ("`I", "Ì"),
    ("`O", "Ò"),
    ("`U", "Ù"),
    ("`a", "à"),
    ("`e", "è"),
    ("`i", "ì"),
    ("`o", "ò"),
    ("`u", "ù"),
    ("~A", "Ã"),
    ("~N", "Ñ"),
    ("~O", "Õ"),
    ("~a", "ã"),
    ("~n", "ñ"),
    ("~o", "õ"),
    ("vS", "Š"),
    ("vs", "š"),
    ("vZ", "Ž"),
    ("vz", "ž"),
    (",C", "Ç"),
    (",c", "ç"),
    ("oA", "Å"),
    ("oa", "å"),
    // Accents
    ("a\"", "˝"),
    ("a-", "¯"),
    ("a.", "˙"),
    ("a^", "^"),
    ("aa", "´"),
    ("ga", "`"),
    ("ab", "˘"),
    ("ac", "¸"),
    ("ad", "¨"),
    ("ah", "ˇ"),
    ("ao", "˚"),
    ("a~", "~"),
    ("ho", "˛"),
    ("ha", "^"),
    ("ti", "~"),
    // Quotes
    ("Bq", "„"),
    ("bq", "‚"),
    ("lq", "“"),
    ("rq", "”"),
    ("oq", "‘"),
    ("cq", "’"),
    ("aq", "'"),
    ("dq", "\""),
    ("Fo", "«"),
    ("Fc", "»"),
    ("fo", "‹"),
    ("fc", "›"),
    // Punctuation
    ("r!", "¡"),
    ("r?", "¿"),
    ("em", "—"),
    ("en", "–"),
    ("hy", "‐"),
    // Brackets
    ("lB", "["),
    ("rB", "]"),
    ("lC", "{"),
    ("rC", "}"),
    ("la", "⟨"),
    ("ra", "⟩"),
    ("bv", "⎪"),
    ("braceex", "⎪"),
    ("lt", "⎧"),
    ("lk", "⎨"),
    ("lb", "⎩"),
    ("rt", "⎫"),
    ("rk", "⎬"),
    ("rb", "⎭"),
    ("bracketlefttp", "⎡"),
    ("bracketleftex", "⎢"),
    ("bracketleftbt", "⎣"),
    ("bracketrighttp", "⎤"),
    ("bracketrightex", "⎥"),
    ("bracketrightbt", "⎦"),
    ("parenlefttp", "⎛"),
    ("parenleftex", "⎜"),
    ("parenleftbt", "⎝"),
    ("parenrighttp", "⎞"),
    ("parenrightex", "⎟"),
    ("parenrightbt", "⎠"),
    // Arrows
    ("<-", "←"),
    ("->", "→"),
    ("<>", "↔"),
    ("da", "↓"),
    ("ua", "↑"),
    ("va", "↕"),
    ("lA", "⇐"),
    ("rA", "⇒"),
    ("hA", "⇔"),
    ("dA", "⇓"),
    ("uA", "⇑"),
    ("vA", "⇕"),
    ("an", "⎯"),
    // Lines
    ("ba", "|"),
    ("br", "│"),
    ("ul", "_"),
    ("rn", "‾"),
    ("ru", "_"),
    ("bb", "¦"),
    ("sl", "/"),
    ("rs", "\\"),
    // Text markers
    ("ci", "○"),
    ("bu", "•"),
    ("dd", "‡"),
    ("dg", "†"),
    ("lz", "◊"),
    ("sq", "□"),
    ("ps", "¶"),
    ("sc", "§"),
    ("lh", "☜"),
    ("rh", "☞"),
    ("at", "@"),
    ("sh", "#"),
    ("CR", "↵"),
    ("OK", "✓"),
    // Legal symbols
    ("co", "©"),
    ("rg", "®"),
    ("tm", "™"),
    // Currency symbols
    ("Do", "$"),
    ("ct", "¢"),
    ("eu", "€"),
    ("Eu", "€"),
    ("Ye", "¥"),
    ("Po", "£"),
    ("Cs", "¤"),
    ("Fn", "ƒ"),
    // Units
    ("de", "°"),
    ("%0", "‰"),
    ("fm", "′"),
    ("sd", "″"),
    ("mc", "µ"),
    ("Of", "ª"),
    ("Om", "º"),
    // Logical symbols
    ("AN", "∧"),
    ("OR", "∨"),
    ("no", "¬"),
    ("tno", "¬"),
    ("te", "∃"),
    ("fa", "∀"),
    ("st", "∋"),
    ("3d", "∴"),
    ("tf", "∴"),
    ("or", "|"),
    // Mathematical symbols
    ("12", "½"),
    ("14", "¼"),
    ("34", "¾"),
    ("18", "⅛"),
    ("38", "⅜"),
    ("58", "⅝"),
    ("78", "⅞"),
    ("S1", "¹"),
    ("S2", "²"),
    ("S3", "³"),
    ("pl", "+"),
    ("mi", "−"),
    ("-+", "∓"),
    ("+-", "±"),
    ("t+-", "±"),
    ("pc", "·"),
    ("md", "⋅"),
    ("mu", "×"),
    ("tmu", "×"),
    ("c*", "⊗"),
    ("c+", "⊕"),
    ("di", "÷"),
    ("tdi", "÷"),
    ("f/", "⁄"),
    ("**", "∗"),
    ("<=", "≤"),
    (">=", "≥"),
    ("<<", "≪"),
    (">>", "≫"),
    ("!=", "≠"),
    ("eq", "="),
    ("==", "≡"),
    ("ne", "≢"),
    ("=~", "≅"),
    ("|=", "≃"),
    ("ap", "∼"),
    ("~~", "≈"),
    ("~=", "≈"),
    ("pt", "∝"),
    ("es", "∅"),
    ("mo", "∈"),
    ("nm", "∉"),
    ("sb", "⊂"),
    ("nb", "⊄"),
    ("sp", "⊃"),
    ("nc", "⊅"),
    ("ib", "⊆"),
    ("ip", "⊇"),
    ("ca", "∩"),
    ("cu", "∪"),
    ("/_", "∠"),
    ("pp", "⊥"),
    ("is", "∫"),
    ("integral", "∫"),
    ("sum", "∑"),
    ("product", "∏"),
    ("coproduct", "∐"),
    ("gr", "∇"),
    ("sr", "√"),
    ("sqrt", "√"),
    ("lc", "⌈"),
    ("rc", "⌉"),
    ("lf", "⌊"),
    ("rf", "⌋"),
    ("if", "∞"),
    ("Ah", "ℵ"),
    ("Im", "ℑ"),
    ("Re", "ℜ"),
    ("wp", "℘"),
    ("pd", "∂"),
    ("-h", "ℏ"),
    ("hbar", "ℏ"),
    // Greek
    ("*A", "Α"),
    ("*B", "Β"),
    ("*G", "Γ"),
    ("*D", "Δ"),
    ("*E", "Ε"),
    ("*Z", "Ζ"),
    ("*Y", "Η"),
    ("*H", "Θ"),
    ("*I", "Ι"),
    ("*K", "Κ"),
    ("*L", "Λ"),
    ("*M", "Μ"),
    ("*N", "Ν"),
    ("*C", "Ξ"),
    ("*O", "Ο"),
    ("*P", "Π"),
    ("*R", "Ρ"),
    ("*S", "Σ"),
    ("*T", "Τ"),
    ("*U", "Υ"),
    ("*F", "Φ"),
    ("*X", "Χ"),
    ("*Q", "Ψ"),
    ("*W", "Ω"),
    ("*a", "α"),
    ("*b", "β"),
    ("*g", "γ"),
    ("*d", "δ"),
    ("*e", "ε"),
    ("*z", "ζ"),
    ("*y", "η"),
    ("*h", "θ"),
    ("*i", "ι"),
    ("*k", "κ"),
    ("*l", "λ"),
    ("*m", "μ"),
    ("*n", "ν"),
    ("*c", "ξ"),
    ("*o", "ο"),
    ("*p", "π"),
    ("*r", "ρ"),
    ("ts", "ς"),
    ("*s", "σ"),
    ("*t", "τ"),
    ("*u", "υ"),
    ("*f", "ϕ"),
    ("*x", "χ"),
    ("*q", "ψ"),
    ("*w", "ω"),
    ("+h", "ϑ"),
    ("+f", "φ"),
    ("+p", "ϖ"),
    ("+e", "ϵ"),
    // Card symbols
    ("CL", "♣"),
    ("SP", "♠"),
    ("HE", "♥"),
    ("DI", "♦"),
];

/// Ligature names; these are the only names that map to more than one character.
pub const LIGATURES: [&str; 5] = ["ff", "ffi", "ffl", "fi", "fl"];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| NAMES.iter().copied().collect())
}

/// Looks up a special character name in the static table.
pub fn lookup(name: &str) -> Option<&'static str> {
    table().get(name).copied()
}

/// Resolves a glyph name to the text it represents.
///
/// Returns [`None`] if the name is unknown.
///
/// ```
/// assert_eq!(ditroff::glyph::resolve("em").as_deref(), Some("—"));
/// assert_eq!(ditroff::glyph::resolve("x").as_deref(), Some("x"));
/// assert_eq!(ditroff::glyph::resolve("u2014").as_deref(), Some("—"));
/// assert_eq!(ditroff::glyph::resolve("char65").as_deref(), Some("A"));
/// assert_eq!(ditroff::glyph::resolve("nonsense"), None);
/// ```
pub fn resolve(name: &str) -> Option<String> {
    if let Some(s) = lookup(name) {
        return Some(s.to_string());
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c.to_string());
    }
    if let Some(hex) = name.strip_prefix('u') {
        return unicode_name(hex);
    }
    if let Some(digits) = name.strip_prefix("char") {
        return latin1_name(digits);
    }
    None
}

fn unicode_name(hex: &str) -> Option<String> {
    let mut s = String::new();
    for component in hex.split('_') {
        if !(4..=6).contains(&component.len())
            || !component.chars().all(|c| c.is_ascii_hexdigit())
        {
            return None;
        }
        let n = u32::from_str_radix(component, 16).ok()?;
        // char::from_u32 rejects both surrogates and values beyond U+10FFFF.
        s.push(char::from_u32(n)?);
    }
    Some(s)
}

fn latin1_name(digits: &str) -> Option<String> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: u32 = digits.parse().ok()?;
    if n > 255 {
        return None;
    }
    Some(char::from(n as u8).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! resolve_tests {
        ( $( ($name: ident, $input: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let want: Option<&str> = $want;
                    assert_eq!(resolve($input).as_deref(), want);
                }
            )+
        };
    }

    resolve_tests!(
        (table_name, "*a", Some("α")),
        (ligature, "ffi", Some("ffi")),
        (single_character, "%", Some("%")),
        (single_non_ascii_character, "é", Some("é")),
        (unicode_4_digits, "u00E9", Some("é")),
        (unicode_5_digits, "u1F600", Some("😀")),
        (unicode_6_digits, "u10FFFF", Some("\u{10FFFF}")),
        (unicode_composite, "u0041_0301", Some("A\u{0301}")),
        (unicode_too_big, "u110000", None),
        (unicode_surrogate, "uD800", None),
        (unicode_too_short, "u41", None),
        (unicode_too_long, "u0000041", None),
        (unicode_not_hex, "u00G9", None),
        (latin1, "char233", Some("é")),
        (latin1_too_big, "char256", None),
        (latin1_empty, "char", None),
        (unknown, "zz9", None),
        (empty, "", None),
    );

    #[test]
    fn names_are_single_characters_except_ligatures() {
        for (name, value) in NAMES {
            if LIGATURES.contains(name) {
                assert_eq!(name, value);
                continue;
            }
            assert_eq!(
                value.chars().count(),
                1,
                "glyph {name} maps to {value:?} which is not a single character"
            );
        }
    }

    #[test]
    fn names_are_unique() {
        assert_eq!(table().len(), NAMES.len());
    }
}
