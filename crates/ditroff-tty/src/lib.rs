//! # Ditroff terminal renderer
//!
//! This crate renders ditroff onto a grid of character cells, the way a
//! terminal shows a manual page. Each cell holds a character, one of four
//! font styles and a colour from the xterm 256 colour palette.
//!
//! Positions in device units are mapped to cells using the minimum
//! horizontal and vertical motions of the resolution:
//! column `h / horizontal` and row `v / vertical`.
//! Lines are drawn with box drawing characters that join where they meet;
//! see [`lines`].
//!
//! The grid is serialized to HTML or to text with ANSI escape sequences;
//! see [`html`].
//!
//! ```
//! use ditroff_tty::TtyRenderer;
//! let mut renderer = TtyRenderer::default();
//! renderer
//!     .process("x T ascii\nx res 240 24 40\np1\nV40\nH0\ntHello\nn40 0\n")
//!     .unwrap();
//! assert_eq!(renderer.to_text(), "\nHello\n");
//! ```

pub mod grid;
pub mod html;
pub mod lines;
pub mod palette;

use ditroff::{Colour, Draw, Interpreter, Resolution, Sink, Warning};

pub use grid::{Cell, Font, Grid};
pub use html::html_to_ansi;

/// Highest resolution, in units per inch, that can be rendered.
pub const MAX_UNITS_PER_INCH: i32 = 1000;

/// Output format of the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    #[default]
    Html,
    Ansi,
    /// Text without any styling.
    Text,
}

/// Options for the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Resolution used until the input sets one with `x res`.
    pub resolution: Resolution,
    /// Whether to remove trailing blank cells and rows.
    pub trim: bool,
    pub format: Format,
    /// Whether to output colours. The input can turn colours off with `x X tty: sgr 0`.
    pub sgr: bool,
}

impl Default for Options {
    /// The resolution of groff's `ascii`, `latin1` and `utf8` devices.
    fn default() -> Self {
        Options {
            resolution: Resolution {
                units_per_inch: 240,
                horizontal: 24,
                vertical: 40,
            },
            trim: true,
            format: Format::Html,
            sgr: true,
        }
    }
}

/// Error returned if rendering fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The input sets a resolution too fine for a character grid.
    ResolutionTooHigh { units_per_inch: i32 },
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ResolutionTooHigh { units_per_inch } => write!(
                f,
                "resolution of {units_per_inch} units per inch is higher than the maximum of {MAX_UNITS_PER_INCH}; was the input generated for a terminal device?"
            ),
        }
    }
}

/// Renderer of ditroff onto character grids.
#[derive(Debug)]
pub struct TtyRenderer {
    options: Options,
    horizontal: i32,
    vertical: i32,
    pages: Vec<Grid>,
    strokes: lines::Strokes,
    h: i32,
    v: i32,
    font: Font,
    colour: i16,
    visible: bool,
    sgr: bool,
    warnings: Vec<Warning>,
}

impl Default for TtyRenderer {
    fn default() -> Self {
        TtyRenderer::new(Default::default())
    }
}

impl TtyRenderer {
    pub fn new(options: Options) -> TtyRenderer {
        TtyRenderer {
            horizontal: options.resolution.horizontal.max(1),
            vertical: options.resolution.vertical.max(1),
            sgr: options.sgr,
            options,
            pages: vec![],
            strokes: Default::default(),
            h: 0,
            v: 0,
            font: Font::R,
            colour: -1,
            visible: true,
            warnings: vec![],
        }
    }

    /// Renders ditroff source, replacing anything rendered before.
    pub fn process(&mut self, source: &str) -> Result<(), Error> {
        *self = TtyRenderer::new(self.options.clone());
        let mut interpreter = Interpreter::new();
        let result = interpreter.run(self, source);
        self.warnings = interpreter.warnings().to_vec();
        result
    }

    /// The rendered pages.
    pub fn pages(&self) -> &[Grid] {
        &self.pages
    }

    /// Warnings generated by the last call to [`TtyRenderer::process`].
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Serializes the pages in the format chosen in the options.
    pub fn render(&self) -> String {
        match self.options.format {
            Format::Html => self.to_html(),
            Format::Ansi => self.to_ansi(),
            Format::Text => self.to_text(),
        }
    }

    /// Serializes the pages to HTML, with a blank line between pages.
    pub fn to_html(&self) -> String {
        self.join_pages(|grid| html::page_to_html(grid, self.options.trim, self.sgr))
    }

    /// Serializes the pages to text with ANSI escape sequences.
    pub fn to_ansi(&self) -> String {
        html_to_ansi(&self.to_html())
    }

    /// Serializes the pages to text without styling.
    pub fn to_text(&self) -> String {
        self.join_pages(|grid| {
            let mut text = String::new();
            for row in grid.output_rows(self.options.trim) {
                text.extend(row.iter().map(|cell| cell.ch));
                text.push('\n');
            }
            text
        })
    }

    fn join_pages<F: Fn(&Grid) -> String>(&self, f: F) -> String {
        self.pages.iter().map(f).collect::<Vec<String>>().join("\n")
    }

    fn page(&mut self) -> &mut Grid {
        if self.pages.is_empty() {
            self.pages.push(Grid::new());
        }
        let n = self.pages.len();
        &mut self.pages[n - 1]
    }

    fn cell_position(&self, h: i32, v: i32) -> (i32, i32) {
        (v.div_euclid(self.vertical), h.div_euclid(self.horizontal))
    }

    fn put(&mut self, col_offset: i32, ch: char) {
        if !self.visible {
            return;
        }
        let (row, col) = self.cell_position(self.h, self.v);
        let cell = Cell::new(ch, self.font, self.colour);
        self.page().set(row, col.saturating_add(col_offset), cell);
    }

    fn line_by(&mut self, dh: i32, dv: i32) {
        self.line_to(self.h.saturating_add(dh), self.v.saturating_add(dv));
    }

    /// Draws a line from the current point to a point and moves there.
    fn line_to(&mut self, h: i32, v: i32) {
        let from = self.cell_position(self.h, self.v);
        let to = self.cell_position(h, v);
        if self.visible {
            let style = Cell::new(' ', self.font, self.colour);
            if self.pages.is_empty() {
                self.pages.push(Grid::new());
            }
            if let Some(page) = self.pages.last_mut() {
                self.strokes.draw_line(page, from, to, style);
            }
        }
        self.h = h;
        self.v = v;
    }
}

impl Sink for TtyRenderer {
    type Error = Error;

    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error> {
        if resolution.units_per_inch > MAX_UNITS_PER_INCH {
            return Err(Error::ResolutionTooHigh {
                units_per_inch: resolution.units_per_inch,
            });
        }
        self.horizontal = resolution.horizontal.max(1);
        self.vertical = resolution.vertical.max(1);
        Ok(())
    }

    fn begin_page(&mut self, _: i32) {
        self.pages.push(Grid::new());
        self.strokes = Default::default();
        self.h = 0;
        self.v = 0;
    }

    fn set_font(&mut self, _: i32, name: Option<&str>) {
        self.font = Font::from_name(name.unwrap_or_default());
    }

    fn move_to_h(&mut self, h: i32) {
        self.h = h;
    }

    fn move_by_h(&mut self, dh: i32) {
        self.h = self.h.saturating_add(dh);
    }

    fn move_to_v(&mut self, v: i32) {
        self.v = v;
    }

    fn move_by_v(&mut self, dv: i32) {
        self.v = self.v.saturating_add(dv);
    }

    fn print_glyph(&mut self, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put(i as i32, ch);
        }
    }

    fn print_text(&mut self, text: &str, tracking: i32) {
        for ch in text.chars() {
            self.put(0, ch);
            self.h = self.h.saturating_add(self.horizontal.saturating_add(tracking));
        }
    }

    fn draw(&mut self, draw: &Draw) {
        match draw {
            Draw::Line { dh, dv } => self.line_by(*dh, *dv),
            Draw::Polygon { points, .. } => {
                let (h, v) = (self.h, self.v);
                for (dh, dv) in points {
                    self.line_by(*dh, *dv);
                }
                self.line_to(h, v);
                let (dh, dv) = draw.advance();
                self.h = h.saturating_add(dh);
                self.v = v.saturating_add(dv);
            }
            _ => {
                let (dh, dv) = draw.advance();
                self.h = self.h.saturating_add(dh);
                self.v = self.v.saturating_add(dv);
            }
        }
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.colour = palette::index(colour);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_sgr(&mut self, enabled: bool) {
        self.sgr = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROLOGUE: &str = "x T utf8\nx res 240 24 40\nx init\nx font 1 R\nx font 2 I\nx font 3 B\nx font 4 BI\nf1\ns10\n";

    fn render(body: &str) -> TtyRenderer {
        let mut renderer = TtyRenderer::default();
        renderer.process(&format!("{PROLOGUE}{body}")).unwrap();
        renderer
    }

    macro_rules! text_tests {
        ( $( ($name: ident, $body: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(render($body).to_text(), $want);
                }
            )+
        };
    }

    text_tests!(
        (hello, "p1\nV40\nH0\ntHello\nn40 0\n", "\nHello\n"),
        (two_words, "p1\nV0\nH0\ntab\nwh24\ntcd\n", "ab cd\n"),
        (move_print, "p1\nV0\nH48\ncx\n24y\n", "  xy\n"),
        (tracking, "p1\nV0\nH0\nu24 abc\n", "a b c\n"),
        (named_glyph, "p1\nV0\nH0\nCem\n", "—\n"),
        (indexed_glyph, "p1\nV0\nH0\nN65\n", "A\n"),
        (negative_positions_dropped, "p1\nV-40\nH0\ntx\n", ""),
        (
            two_pages,
            "p1\nV0\nH0\nta\np2\nV0\nH0\ntb\n",
            "a\n\nb\n"
        ),
        (
            horizontal_rule,
            "p1\nV0\nH0\nDl 72 0\n",
            "────\n"
        ),
        (
            box_from_lines,
            "p1\nV0\nH0\nDl 72 0\nDl 0 80\nDl -72 0\nDl 0 -80\n",
            "┌──┐\n│  │\n└──┘\n"
        ),
        (
            box_from_polygon,
            "p1\nV0\nH0\nDp 72 0 0 80 -72 0\n",
            "┌──┐\n│  │\n└──┘\n"
        ),
        (
            diagonal,
            "p1\nV0\nH0\nDl 48 80\n",
            "╲\n ╲\n  ╲\n"
        ),
        (
            lines_advance_the_position,
            "p1\nV0\nH0\nDl 48 0\ntx\n",
            "──x\n"
        ),
        (
            other_angles_advance_the_position,
            "p1\nV0\nH0\nDl 48 40\ntx\n",
            "\n  x\n"
        ),
        (
            invisible_text,
            "p1\nV0\nH0\nx X ps: invis\nta\nx X ps: endinvis\ntb\n",
            " b\n"
        ),
        (
            symbol_font,
            "x font 5 S\np1\nV0\nH0\nf5\nca\n",
            "α\n"
        ),
    );

    #[test]
    fn fonts_and_colours() {
        let r = render("p1\nV0\nH0\nf3\ntB\nf2\ntI\nf1\nmr 65535 0 0\ntR\nmd\ntD\n");
        assert_eq!(
            r.to_html(),
            r#"<b>B</b><u>I</u><span data-sgr="196">R</span>D"#.to_string() + "\n"
        );
        assert_eq!(
            r.to_ansi(),
            "\x1b[1mB\x1b[22m\x1b[4mI\x1b[24m\x1b[38;5;196mR\x1b[39mD\n"
        );
    }

    #[test]
    fn sgr_can_be_disabled() {
        let r = render("x X tty: sgr 0\np1\nV0\nH0\nmr 65535 0 0\ntR\n");
        assert_eq!(r.to_html(), "R\n");

        let mut renderer = TtyRenderer::new(Options {
            sgr: false,
            ..Default::default()
        });
        renderer.process("p1\nV0\nH0\nmr 65535 0 0\ntR\n").unwrap();
        assert_eq!(renderer.to_html(), "R\n");
    }

    #[test]
    fn large_moves_saturate() {
        let r = render("p1\nh2147483647\nh1\nv2147483647\nv1\nH0\nV0\ntok\n");
        assert_eq!(r.to_text(), "ok\n");
        let r = render(
            "p1\nx X ps: invis\nh2147483000\nu2147483000 ab\nDl 2147483000 0\n\
            Dp 2147483000 0 0 1\nx X ps: endinvis\nH0\nV0\ntok\n",
        );
        assert_eq!(r.to_text(), "ok\n");
    }

    #[test]
    fn cells_hold_style() {
        let r = render("p1\nV40\nH24\nf4\nmr 0 0 65535\ntx\n");
        assert_eq!(r.pages().len(), 1);
        assert_eq!(r.pages()[0].get(1, 1), Cell::new('x', Font::BI, 21));
    }

    #[test]
    fn resolution_too_high() {
        let mut renderer = TtyRenderer::default();
        let err = renderer.process("x T ps\nx res 72000 1 1\np1\n").unwrap_err();
        assert_eq!(
            err,
            Error::ResolutionTooHigh {
                units_per_inch: 72000
            }
        );
        assert!(renderer.pages().is_empty());
    }

    #[test]
    fn process_replaces_previous_output() {
        let mut renderer = TtyRenderer::default();
        renderer.process("p1\nV0\nH0\ntfirst\n").unwrap();
        renderer.process("p1\nV0\nH0\ntsecond\n").unwrap();
        assert_eq!(renderer.to_text(), "second\n");
    }

    #[test]
    fn warnings_are_kept() {
        let r = render("p1\nCnosuchglyph\n");
        assert_eq!(r.warnings().len(), 1);
    }

    #[test]
    fn untrimmed_output() {
        let mut renderer = TtyRenderer::new(Options {
            trim: false,
            format: Format::Text,
            ..Default::default()
        });
        renderer.process("p1\nV0\nH0\ntx\nH24\nCu0020\n").unwrap();
        assert_eq!(renderer.render(), "x \n");
    }

    #[test]
    fn default_format_is_html() {
        let r = render("p1\nV0\nH0\nt<&>\n");
        assert_eq!(r.render(), "&lt;&amp;&gt;\n");
    }
}
