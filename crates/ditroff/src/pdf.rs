//! PDF objects embedded in device control escapes.
//!
//! Links, anchors and bookmarks reach ditroff as PostScript `pdfmark`
//! operators wrapped in `x X` escapes, e.g.
//!
//! ```txt
//! x X ps:exec [/Dest /intro /View [/XYZ -4 PDFPageHeight 0] /DEST pdfmark
//! ```
//!
//! This module contains a small lexer and parser for the subset of PDF object
//! syntax that appears in these escapes, and a scanner that extracts the
//! `pdfmark` operators.

use crate::outline::OutlineEntry;

/// A PDF object.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    /// A name like `/Dest`; the leading slash is not included.
    Name(String),
    /// A literal string like `(Introduction)` or a hex string like `<4142>`.
    String(String),
    Number(f64),
    /// A bare word like `pdfmark` or `PDFPageHeight`.
    Word(String),
    Array(Vec<Object>),
    /// A dictionary; entries are kept in source order.
    Dict(Vec<(String, Object)>),
}

impl Object {
    /// Returns the text of a name or string object.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Object::Name(s) | Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numbers in an array object; non-numeric elements are skipped.
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            Object::Array(elems) => Some(elems.iter().filter_map(Object::as_number).collect()),
            _ => None,
        }
    }

    /// Finds the value of a key in this object or any dictionary nested inside it.
    pub fn find(&self, key: &str) -> Option<&Object> {
        match self {
            Object::Dict(entries) => find(entries, key),
            Object::Array(elems) => elems.iter().find_map(|e| e.find(key)),
            _ => None,
        }
    }
}

fn find<'a>(entries: &'a [(String, Object)], key: &str) -> Option<&'a Object> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .or_else(|| entries.iter().find_map(|(_, v)| v.find(key)))
}

#[derive(Clone, Debug, PartialEq)]
enum Lexeme {
    Name(String),
    String(String),
    Number(f64),
    Word(String),
    ArrayOpen,
    ArrayClose,
    DictOpen,
    DictClose,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || "()<>[]{}/%".contains(c)
}

fn lex(source: &str) -> Vec<Lexeme> {
    let mut lexemes = vec![];
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        let lexeme = match c {
            '%' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            '/' => Lexeme::Name(regular(&mut chars, String::new())),
            '(' => Lexeme::String(decode_text(&literal_string(&mut chars))),
            '<' => {
                if chars.peek() == Some(&'<') {
                    chars.next();
                    Lexeme::DictOpen
                } else {
                    Lexeme::String(decode_text(&hex_string(&mut chars)))
                }
            }
            '>' => {
                if chars.peek() == Some(&'>') {
                    chars.next();
                    Lexeme::DictClose
                } else {
                    continue;
                }
            }
            '[' => Lexeme::ArrayOpen,
            ']' => Lexeme::ArrayClose,
            c if c.is_whitespace() || c == ')' || c == '{' || c == '}' => continue,
            c => {
                let word = regular(&mut chars, c.to_string());
                let numeric = c.is_ascii_digit() || "+-.".contains(c);
                match word.parse::<f64>() {
                    Ok(n) if numeric => Lexeme::Number(n),
                    _ => Lexeme::Word(word),
                }
            }
        };
        lexemes.push(lexeme);
    }
    lexemes
}

fn regular(chars: &mut std::iter::Peekable<std::str::Chars>, mut s: String) -> String {
    while let Some(&c) = chars.peek() {
        if is_delimiter(c) {
            break;
        }
        s.push(c);
        chars.next();
    }
    s
}

fn literal_string(chars: &mut std::iter::Peekable<std::str::Chars>) -> Vec<u8> {
    let mut b = vec![];
    let mut depth = 0_usize;
    while let Some(c) = chars.next() {
        match c {
            '(' => {
                depth += 1;
                b.push(b'(');
            }
            ')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                b.push(b')');
            }
            '\\' => {
                let Some(e) = chars.next() else {
                    break;
                };
                match e {
                    'n' => b.push(b'\n'),
                    'r' => b.push(b'\r'),
                    't' => b.push(b'\t'),
                    'b' => b.push(0x08),
                    'f' => b.push(0x0C),
                    '\n' => {}
                    '\r' => {
                        if chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                    }
                    '0'..='7' => {
                        let mut n = e as u32 - '0' as u32;
                        for _ in 0..2 {
                            match chars.peek() {
                                Some(&d @ '0'..='7') => {
                                    n = n * 8 + (d as u32 - '0' as u32);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }
                        b.push((n & 0xFF) as u8);
                    }
                    e => push_char(&mut b, e),
                }
            }
            c => push_char(&mut b, c),
        }
    }
    b
}

fn push_char(b: &mut Vec<u8>, c: char) {
    let mut buf = [0_u8; 4];
    b.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn hex_string(chars: &mut std::iter::Peekable<std::str::Chars>) -> Vec<u8> {
    let mut digits = vec![];
    for c in chars.by_ref() {
        if c == '>' {
            break;
        }
        if let Some(d) = c.to_digit(16) {
            digits.push(d as u8);
        }
    }
    if digits.len() % 2 == 1 {
        digits.push(0);
    }
    digits.chunks(2).map(|p| p[0] * 16 + p[1]).collect()
}

/// Decodes the bytes of a PDF string into text.
///
/// Strings starting with the byte order mark `FE FF` are UTF-16BE.
/// Other strings are UTF-8 if valid and Latin-1 otherwise.
fn decode_text(b: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = b {
        let units: Vec<u16> = rest
            .chunks(2)
            .map(|p| u16::from_be_bytes([p[0], p.get(1).copied().unwrap_or(0)]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(b) {
        Ok(s) => s.to_string(),
        Err(_) => b.iter().map(|&b| char::from(b)).collect(),
    }
}

fn parse_value(lexemes: &[Lexeme], i: &mut usize) -> Option<Object> {
    let lexeme = lexemes.get(*i)?;
    *i += 1;
    Some(match lexeme {
        Lexeme::Name(s) => Object::Name(s.clone()),
        Lexeme::String(s) => Object::String(s.clone()),
        Lexeme::Number(n) => Object::Number(*n),
        Lexeme::Word(s) => Object::Word(s.clone()),
        Lexeme::ArrayOpen => {
            let mut elems = vec![];
            while *i < lexemes.len() {
                if lexemes[*i] == Lexeme::ArrayClose {
                    *i += 1;
                    break;
                }
                if let Some(elem) = parse_value(lexemes, i) {
                    elems.push(elem);
                }
            }
            Object::Array(elems)
        }
        Lexeme::DictOpen => {
            let mut objects = vec![];
            while *i < lexemes.len() {
                if lexemes[*i] == Lexeme::DictClose {
                    *i += 1;
                    break;
                }
                if let Some(object) = parse_value(lexemes, i) {
                    objects.push(object);
                }
            }
            Object::Dict(pairs(objects))
        }
        Lexeme::ArrayClose | Lexeme::DictClose => return None,
    })
}

fn parse_all(lexemes: &[Lexeme]) -> Vec<Object> {
    let mut objects = vec![];
    let mut i = 0;
    while i < lexemes.len() {
        if let Some(object) = parse_value(lexemes, &mut i) {
            objects.push(object);
        }
    }
    objects
}

/// Pairs up a flat list of objects into dictionary entries.
///
/// Values without a name key before them are dropped.
fn pairs(objects: Vec<Object>) -> Vec<(String, Object)> {
    let mut entries = vec![];
    let mut objects = objects.into_iter();
    while let Some(key) = objects.next() {
        let Object::Name(key) = key else {
            continue;
        };
        match objects.next() {
            Some(value) => entries.push((key, value)),
            None => break,
        }
    }
    entries
}

/// Parses a sequence of PDF objects.
///
/// ```
/// use ditroff::pdf::{parse, Object};
/// assert_eq!(
///     parse("/Border [0 0 1] (A\\051)"),
///     vec![
///         Object::Name("Border".into()),
///         Object::Array(vec![Object::Number(0.0), Object::Number(0.0), Object::Number(1.0)]),
///         Object::String("A)".into()),
///     ],
/// );
/// ```
pub fn parse(source: &str) -> Vec<Object> {
    parse_all(&lex(source))
}

/// Parses a sequence of PDF objects as the keys and values of a dictionary.
pub fn parse_entries(source: &str) -> Vec<(String, Object)> {
    pairs(parse(source))
}

/// A `pdfmark` operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Pdfmark {
    /// The kind of mark, e.g. `DEST` or `OUT`.
    pub kind: String,
    pub entries: Vec<(String, Object)>,
}

impl Pdfmark {
    /// Returns the value for a key, searching nested dictionaries too.
    pub fn get(&self, key: &str) -> Option<&Object> {
        find(&self.entries, key)
    }

    /// If this is a named destination, returns its name.
    pub fn destination(&self) -> Option<&str> {
        if self.kind != "DEST" {
            return None;
        }
        self.get("Dest")?.as_text()
    }

    /// If this is an outline entry, returns it.
    ///
    /// Entries without a `/Level` are at level 1.
    pub fn outline_entry(&self) -> Option<OutlineEntry> {
        if self.kind != "OUT" {
            return None;
        }
        let title = self
            .get("Title")
            .and_then(Object::as_text)
            .unwrap_or_default();
        let target = self
            .get("Dest")
            .and_then(Object::as_text)
            .unwrap_or_default();
        let level = self
            .get("Level")
            .and_then(Object::as_number)
            .map(|l| (l.abs() as u32).max(1))
            .unwrap_or(1);
        Some(OutlineEntry::new(title, target, level))
    }
}

/// Scans text for `pdfmark` operators.
///
/// Both the PostScript form `[ <entries> /KIND pdfmark` and the
/// gropdf form `pdfmark <entries> /KIND` are recognized.
///
/// ```
/// use ditroff::pdf::scan_pdfmarks;
/// let marks = scan_pdfmarks("ps:exec [/Dest /intro /View [/XYZ -4 PDFPageHeight 0] /DEST pdfmark");
/// assert_eq!(marks.len(), 1);
/// assert_eq!(marks[0].destination(), Some("intro"));
/// ```
pub fn scan_pdfmarks(text: &str) -> Vec<Pdfmark> {
    if !text.contains("pdfmark") {
        return vec![];
    }
    let lexemes = lex(text);
    let mut marks = vec![];
    let mut opens: Vec<usize> = vec![];
    for (i, lexeme) in lexemes.iter().enumerate() {
        match lexeme {
            Lexeme::ArrayOpen => opens.push(i),
            Lexeme::ArrayClose => {
                opens.pop();
            }
            Lexeme::Word(w) if w == "pdfmark" => match opens.pop() {
                Some(open) => marks.extend(build_mark(&lexemes[open + 1..i])),
                None => {
                    // The gropdf form consumes the rest of the escape.
                    marks.extend(build_mark(&lexemes[i + 1..]));
                    break;
                }
            },
            _ => {}
        }
    }
    marks
}

fn build_mark(body: &[Lexeme]) -> Option<Pdfmark> {
    let (Lexeme::Name(kind), entries) = body.split_last()? else {
        return None;
    };
    Some(Pdfmark {
        kind: kind.clone(),
        entries: pairs(parse_all(entries)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! parse_tests {
        ( $( ($name: ident, $input: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let want: Vec<Object> = $want;
                    assert_eq!(parse($input), want);
                }
            )+
        };
    }

    fn s(s: &str) -> Object {
        Object::String(s.into())
    }

    fn name(s: &str) -> Object {
        Object::Name(s.into())
    }

    parse_tests!(
        (string_escapes, r"(a\(b\)c\\d)", vec![s(r"a(b)c\d")]),
        (string_nested_parens, "(a (b) c)", vec![s("a (b) c")]),
        (string_octal, r"(\101\102)", vec![s("AB")]),
        (string_newline_escape, r"(a\nb)", vec![s("a\nb")]),
        (string_line_continuation, "(a\\\nb)", vec![s("ab")]),
        (string_utf16, r"(\376\377\000A\000B)", vec![s("AB")]),
        (string_utf8, "(Süd)", vec![s("Süd")]),
        (string_latin1, r"(S\374d)", vec![s("Süd")]),
        (hex_string, "<414243>", vec![s("ABC")]),
        (hex_string_odd_digits, "<41 4>", vec![s("A@")]),
        (names, "/Dest /intro", vec![name("Dest"), name("intro")]),
        (
            numbers_and_words,
            "-4 PDFPageHeight 0.5",
            vec![
                Object::Number(-4.0),
                Object::Word("PDFPageHeight".into()),
                Object::Number(0.5)
            ]
        ),
        (
            dictionary,
            "<< /S /URI /URI (http://example.com) >>",
            vec![Object::Dict(vec![
                ("S".into(), name("URI")),
                ("URI".into(), s("http://example.com")),
            ])]
        ),
        (comment, "/A % ignored\n/B", vec![name("A"), name("B")]),
        (unbalanced_array, "[1 2", vec![Object::Array(vec![Object::Number(1.0), Object::Number(2.0)])]),
        (stray_close, "] /A", vec![name("A")]),
    );

    #[test]
    fn outline_mark() {
        let marks =
            scan_pdfmarks(r"ps:exec [/Dest /sec1 /Title (Section \(one\)) /Level 2 /OUT pdfmark");
        assert_eq!(marks.len(), 1);
        assert_eq!(
            marks[0].outline_entry(),
            Some(OutlineEntry::new("Section (one)", "sec1", 2))
        );
        assert_eq!(marks[0].destination(), None);
    }

    #[test]
    fn outline_mark_without_level() {
        let marks = scan_pdfmarks("[/Title (A) /OUT pdfmark");
        assert_eq!(marks[0].outline_entry(), Some(OutlineEntry::new("A", "", 1)));
    }

    #[test]
    fn gropdf_form() {
        let marks = scan_pdfmarks("pdf: pdfmark /Dest /here /DEST");
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].destination(), Some("here"));
    }

    #[test]
    fn several_marks() {
        let marks = scan_pdfmarks("[/Dest /a /DEST pdfmark [/Dest /b /DEST pdfmark");
        let names: Vec<&str> = marks.iter().filter_map(Pdfmark::destination).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn no_marks() {
        assert_eq!(scan_pdfmarks("ps:exec 0 setlinecap"), vec![]);
    }

    #[test]
    fn nested_lookup() {
        let entries = parse_entries("/Action << /Subtype /URI /URI (http://x) >>");
        let mark = Pdfmark {
            kind: "ANN".into(),
            entries,
        };
        assert_eq!(mark.get("URI").and_then(Object::as_text), Some("http://x"));
    }
}
