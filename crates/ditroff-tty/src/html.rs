//! HTML and ANSI serialization of grids.
//!
//! A grid is first serialized to a small subset of HTML:
//!
//! | markup | meaning |
//! |--------|---------|
//! | `<b>` | bold |
//! | `<u>` | italic, which terminals show as underlined |
//! | `<span data-sgr="N">` | colour _N_ of the xterm 256 colour palette |
//! | `<b data-sgr="N">` | bold in colour _N_ |
//!
//! and the HTML is then translated to ANSI escape sequences when needed.

use crate::grid::{Cell, Grid};

/// Serializes one page to HTML.
///
/// Each row ends with a newline.
/// Colours are only emitted if `sgr` is true.
pub fn page_to_html(grid: &Grid, trim: bool, sgr: bool) -> String {
    let mut html = String::new();
    for row in grid.output_rows(trim) {
        let mut i = 0;
        while i < row.len() {
            let style = row[i];
            let end = row[i..]
                .iter()
                .position(|c| !c.same_style(&style))
                .map(|n| i + n)
                .unwrap_or(row.len());
            write_run(&mut html, &row[i..end], style, sgr);
            i = end;
        }
        html.push('\n');
    }
    html
}

fn write_run(html: &mut String, cells: &[Cell], style: Cell, sgr: bool) {
    let bold = style.font.is_bold();
    let coloured = sgr && style.colour >= 0;
    match (bold, coloured) {
        (true, true) => html.push_str(&format!(r#"<b data-sgr="{}">"#, style.colour)),
        (true, false) => html.push_str("<b>"),
        (false, true) => html.push_str(&format!(r#"<span data-sgr="{}">"#, style.colour)),
        (false, false) => {}
    }
    if style.font.is_italic() {
        html.push_str("<u>");
    }
    for cell in cells {
        match cell.ch {
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '&' => html.push_str("&amp;"),
            c => html.push(c),
        }
    }
    if style.font.is_italic() {
        html.push_str("</u>");
    }
    if bold {
        html.push_str("</b>");
    } else if coloured {
        html.push_str("</span>");
    }
}

/// Translates HTML produced by [`page_to_html`] to text with ANSI escape sequences.
///
/// Unknown tags are kept as they are.
/// Closing a bold element that set a colour also resets the colour.
/// The entities `&lt;`, `&gt;`, `&amp;` and numeric character references are decoded.
///
/// ```
/// use ditroff_tty::html_to_ansi;
/// assert_eq!(
///     html_to_ansi(r#"<span data-sgr="196"><b>a &lt; b</b></span>"#),
///     "\x1b[38;5;196m\x1b[1ma < b\x1b[22m\x1b[39m",
/// );
/// assert_eq!(
///     html_to_ansi(r#"<b data-sgr="46">ok</b>"#),
///     "\x1b[1;38;5;46mok\x1b[22m\x1b[39m",
/// );
/// ```
pub fn html_to_ansi(html: &str) -> String {
    let mut ansi = String::with_capacity(html.len());
    // For each open bold element, whether it set a colour.
    let mut bold = Vec::new();
    let mut rest = html;
    while let Some(i) = rest.find(|c: char| c == '<' || c == '&') {
        ansi.push_str(&rest[..i]);
        rest = &rest[i..];
        let translated = if rest.starts_with('<') {
            rest.find('>')
                .and_then(|j| tag(&rest[1..j], &mut bold).map(|s| (j, s)))
        } else {
            rest.find(';')
                .and_then(|j| entity(&rest[1..j]).map(|s| (j, s)))
        };
        match translated {
            Some((j, s)) => {
                ansi.push_str(&s);
                rest = &rest[j + 1..];
            }
            None => {
                ansi.push_str(&rest[..1]);
                rest = &rest[1..];
            }
        }
    }
    ansi.push_str(rest);
    ansi
}

fn tag(name: &str, bold: &mut Vec<bool>) -> Option<String> {
    let sgr = |prefix: &str| -> Option<u8> {
        name.strip_prefix(prefix)?
            .strip_prefix(r#" data-sgr=""#)?
            .strip_suffix('"')?
            .parse()
            .ok()
    };
    Some(match name {
        "b" => {
            bold.push(false);
            "\x1b[1m".to_string()
        }
        "u" => "\x1b[4m".to_string(),
        "/b" => match bold.pop() {
            Some(true) => "\x1b[22m\x1b[39m".to_string(),
            _ => "\x1b[22m".to_string(),
        },
        "/u" => "\x1b[24m".to_string(),
        "/span" => "\x1b[39m".to_string(),
        _ => {
            if let Some(n) = sgr("b") {
                bold.push(true);
                format!("\x1b[1;38;5;{n}m")
            } else {
                format!("\x1b[38;5;{}m", sgr("span")?)
            }
        }
    })
}

fn entity(name: &str) -> Option<String> {
    let c = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(|c: char| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(c.to_string())
}
