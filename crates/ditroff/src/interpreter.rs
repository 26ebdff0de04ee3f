//! The ditroff command interpreter.
//!
//! The interpreter decodes the operand of each [`Token`] and calls the
//! corresponding method of a [`Sink`].
//! It keeps track of the small amount of state needed to do this:
//! which fonts are mounted, the current page and vertical position, and a
//! buffer of pending text.
//!
//! ## Text runs
//!
//! Text commands are often split up by small horizontal moves that correct
//! the kerning between characters. To print the text as one run, consecutive
//! `t` commands and the horizontal moves and word spaces between them are
//! buffered and sent to [`Sink::text_run`] together. The buffer holds at most
//! [`RUN_CAPACITY`] pieces and is flushed when it is full, when any other
//! command is seen and at the end of the input.
//!
//! ## Anchors and outlines
//!
//! `pdfmark` operators in device escapes are scanned as they are seen.
//! Named destinations are recorded as [`Anchor`]s at the current page and
//! vertical position, and outline entries are collected in document order.

use std::collections::{BTreeMap, HashMap};

use crate::colour::{self, Colour};
use crate::control::{DeviceControl, Escape};
use crate::draw::Draw;
use crate::font::SymbolMap;
use crate::glyph;
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::outline::{Outline, OutlineEntry};
use crate::pdf;
use crate::sink::{RunPiece, Sink};
use crate::warning::{Warning, WarningKind};
use crate::Resolution;

/// Maximum number of pieces in a buffered text run.
pub const RUN_CAPACITY: usize = 64;

/// Position of a named destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    /// Page number, counting pages in the order they appear starting from 1.
    pub page: usize,
    /// Vertical position on the page in device units.
    pub v: i32,
}

/// The ditroff command interpreter.
#[derive(Debug, Default)]
pub struct Interpreter {
    fonts: HashMap<i32, String>,
    font: i32,
    symbol_map: Option<SymbolMap>,
    resolution: Resolution,
    page: usize,
    in_page: bool,
    v: i32,
    run: Vec<RunPiece>,
    anchors: BTreeMap<String, Anchor>,
    outline: Vec<OutlineEntry>,
    warnings: Vec<Warning>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Default::default()
    }

    /// Interprets ditroff source, from start to finish.
    ///
    /// ```
    /// use ditroff::{Interpreter, TraceSink};
    /// let mut sink = TraceSink::default();
    /// Interpreter::new().run(&mut sink, "p1\nV40\nCem\n").unwrap();
    /// assert_eq!(
    ///     sink.lines,
    ///     vec!["begin_page 1", "move_to_v 40", "print_glyph —", "end_page"],
    /// );
    /// ```
    pub fn run<S: Sink>(&mut self, sink: &mut S, source: &str) -> Result<(), S::Error> {
        for token in Tokenizer::new(source) {
            self.exec(sink, token)?;
        }
        self.finish(sink);
        Ok(())
    }

    /// Executes a single command.
    pub fn exec<S: Sink>(&mut self, sink: &mut S, token: Token) -> Result<(), S::Error> {
        use TokenKind::*;
        let piece = match token.kind {
            TextNormal => Some(RunPiece::Text(self.remap(&token.operand))),
            MoveAbsH if !self.run.is_empty() => {
                Some(RunPiece::MoveTo(self.int(&token, &token.operand)))
            }
            MoveRelH if !self.run.is_empty() => {
                Some(RunPiece::MoveBy(self.int(&token, &token.operand)))
            }
            WordSpace if !self.run.is_empty() => Some(RunPiece::WordSpace),
            _ => None,
        };
        if let Some(piece) = piece {
            self.run.push(piece);
            if self.run.len() >= RUN_CAPACITY {
                self.flush(sink);
            }
            return Ok(());
        }
        self.flush(sink);
        match token.kind {
            BeginPage => {
                let number = self.int(&token, &token.operand);
                if self.in_page {
                    sink.end_page();
                }
                self.page += 1;
                self.in_page = true;
                self.v = 0;
                sink.begin_page(number);
            }
            Comment => {}
            SetSize => {
                let size = self.int(&token, &token.operand);
                sink.set_size(size);
            }
            SetFont => {
                let index = self.int(&token, &token.operand);
                self.font = index;
                let name = self.fonts.get(&index).cloned();
                if name.is_none() {
                    self.warn(&token, WarningKind::UnmountedFont { index });
                }
                self.symbol_map = name.as_deref().and_then(SymbolMap::for_font);
                sink.set_font(index, name.as_deref());
            }
            CharLiteral => {
                if !token.operand.is_empty() {
                    sink.print_glyph(&self.remap(&token.operand));
                }
            }
            CharNamed => {
                let name = &token.operand;
                match glyph::resolve(name) {
                    Some(s) if name.chars().count() == 1 => sink.print_glyph(&self.remap(&s)),
                    Some(s) => sink.print_glyph(&s),
                    None => self.warn(
                        &token,
                        WarningKind::UnknownGlyph {
                            name: name.clone(),
                        },
                    ),
                }
            }
            CharIndexed => {
                let index = self.int(&token, &token.operand);
                match u32::try_from(index).ok().and_then(char::from_u32) {
                    Some(c) => sink.print_glyph(&self.remap(&c.to_string())),
                    None => self.warn(
                        &token,
                        WarningKind::InvalidGlyphIndex {
                            index: index as i64,
                        },
                    ),
                }
            }
            MoveAbsH => {
                let h = self.int(&token, &token.operand);
                sink.move_to_h(h);
            }
            MoveRelH => {
                let dh = self.int(&token, &token.operand);
                sink.move_by_h(dh);
            }
            MoveAbsV => {
                self.v = self.int(&token, &token.operand);
                sink.move_to_v(self.v);
            }
            MoveRelV => {
                let dv = self.int(&token, &token.operand);
                self.v = self.v.saturating_add(dv);
                sink.move_by_v(dv);
            }
            MovePrint => {
                let operand = &token.operand;
                let split = operand
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(operand.len());
                let (digits, glyph) = operand.split_at(split);
                let dh = self.int(&token, digits);
                sink.move_by_h(dh);
                sink.print_glyph(&self.remap(glyph));
            }
            InformEOL => {
                let mut words = token.operand.split_whitespace();
                let before = self.int(&token, words.next().unwrap_or_default());
                let after = self.int(&token, words.next().unwrap_or_default());
                sink.end_of_line(before, after);
            }
            WordSpace => sink.word_space(),
            Drawing => self.drawing(sink, &token),
            SetColour => {
                if let Some(colour) = self.colour(&token, &token.operand) {
                    sink.set_stroke_colour(colour);
                }
            }
            TextNormal => {}
            TextTracked => {
                let (tracking, text) = token
                    .operand
                    .split_once(char::is_whitespace)
                    .unwrap_or((token.operand.as_str(), ""));
                let tracking = self.int(&token, tracking);
                sink.print_text(&self.remap(text.trim_start()), tracking);
            }
            DeviceControl => self.device_control(sink, &token)?,
        }
        Ok(())
    }

    /// Flushes pending text and ends the current page.
    pub fn finish<S: Sink>(&mut self, sink: &mut S) {
        self.flush(sink);
        if self.in_page {
            sink.end_page();
            self.in_page = false;
        }
    }

    fn flush<S: Sink>(&mut self, sink: &mut S) {
        if self.run.is_empty() {
            return;
        }
        sink.text_run(&self.run);
        self.run.clear();
    }

    fn drawing<S: Sink>(&mut self, sink: &mut S, token: &Token) {
        let mut chars = token.operand.chars();
        let Some(letter) = chars.next() else {
            self.warn(
                token,
                WarningKind::UnknownDrawing {
                    command: String::new(),
                },
            );
            return;
        };
        let rest = chars.as_str();
        match letter {
            'f' => {
                let shade = self.float(token, rest.split_whitespace().next().unwrap_or_default());
                sink.set_fill_colour(colour::legacy_grey(shade));
            }
            'F' => {
                if let Some(colour) = self.colour(token, rest) {
                    sink.set_fill_colour(colour);
                }
            }
            _ => {
                let args: Vec<i32> = rest.split_whitespace().map(|w| self.int(token, w)).collect();
                match Draw::new(letter, &args) {
                    Some(draw) => {
                        self.v = self.v.saturating_add(draw.advance().1);
                        sink.draw(&draw);
                    }
                    None => self.warn(
                        token,
                        WarningKind::UnknownDrawing {
                            command: letter.to_string(),
                        },
                    ),
                }
            }
        }
    }

    /// Decodes a colour specification like `r 65535 0 0`.
    fn colour(&mut self, token: &Token, spec: &str) -> Option<Colour> {
        let spec = spec.trim_start();
        let mut chars = spec.chars();
        let scheme: String = chars.next().map(String::from).unwrap_or_default();
        let args: Vec<f64> = chars
            .as_str()
            .split_whitespace()
            .map(|w| self.float(token, w))
            .collect();
        let colour = colour::parse_colour(&scheme, &args);
        if colour.is_none() {
            self.warn(token, WarningKind::UnknownColourScheme { scheme });
        }
        colour
    }

    fn device_control<S: Sink>(&mut self, sink: &mut S, token: &Token) -> Result<(), S::Error> {
        match DeviceControl::parse(&token.operand) {
            DeviceControl::Device(name) => sink.set_device(&name),
            DeviceControl::Resolution(resolution) => {
                self.resolution = resolution;
                sink.set_resolution(resolution)?;
            }
            DeviceControl::Init | DeviceControl::Pause | DeviceControl::Trailer => {}
            DeviceControl::Stop => self.finish(sink),
            DeviceControl::MountFont { index, name } => {
                sink.mount_font(index, &name);
                if index == self.font {
                    self.symbol_map = SymbolMap::for_font(&name);
                }
                self.fonts.insert(index, name);
            }
            DeviceControl::SourceFile(name) => sink.set_source_file(&name),
            DeviceControl::CharHeight(height) => sink.set_char_height(height),
            DeviceControl::Slant(degrees) => sink.set_slant(degrees),
            DeviceControl::Escape(escape) => self.escape(sink, escape),
            DeviceControl::Other(text) => sink.device_control(&text),
        }
        Ok(())
    }

    fn escape<S: Sink>(&mut self, sink: &mut S, escape: Escape) {
        match escape {
            Escape::Invisible => sink.set_visible(false),
            Escape::EndInvisible => sink.set_visible(true),
            Escape::Exec(exec, code) => {
                if let Some(degrees) = exec.rotate {
                    sink.rotate(degrees);
                }
                if let Some(cap) = exec.line_cap {
                    sink.set_line_cap(cap);
                }
                if let Some(join) = exec.line_join {
                    sink.set_line_join(join);
                }
                self.scan_pdfmarks(&code);
            }
            Escape::MarkStart(mark) => sink.mark_start(&mark),
            Escape::MarkEnd => sink.mark_end(),
            Escape::MarkSuspend => sink.mark_suspend(),
            Escape::MarkRestart => sink.mark_restart(),
            Escape::Reverse => sink.mirror(),
            Escape::PaperSize(width, height) => {
                let units = self.resolution.units_per_inch;
                sink.paper_size(width.to_device_units(units), height.to_device_units(units));
            }
            Escape::Sgr(enabled) => sink.set_sgr(enabled),
            Escape::Other(text) => {
                self.scan_pdfmarks(&text);
                sink.device_escape(&text);
            }
        }
    }

    fn scan_pdfmarks(&mut self, text: &str) {
        for mark in pdf::scan_pdfmarks(text) {
            if let Some(name) = mark.destination() {
                self.anchors.insert(
                    name.to_string(),
                    Anchor {
                        page: self.page,
                        v: self.v,
                    },
                );
            }
            if let Some(entry) = mark.outline_entry() {
                self.outline.push(entry);
            }
        }
    }

    fn remap(&self, text: &str) -> String {
        match self.symbol_map {
            Some(map) => map.remap(text),
            None => text.to_string(),
        }
    }

    fn int(&mut self, token: &Token, text: &str) -> i32 {
        match text.trim().parse::<i32>() {
            Ok(n) => n,
            Err(_) => {
                self.warn(
                    token,
                    WarningKind::InvalidNumber {
                        text: text.to_string(),
                    },
                );
                0
            }
        }
    }

    fn float(&mut self, token: &Token, text: &str) -> f64 {
        match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => {
                self.warn(
                    token,
                    WarningKind::InvalidNumber {
                        text: text.to_string(),
                    },
                );
                0.0
            }
        }
    }

    fn warn(&mut self, token: &Token, kind: WarningKind) {
        self.warnings.push(Warning::new(token.span(), kind));
    }

    /// Named destinations seen so far.
    pub fn anchors(&self) -> &BTreeMap<String, Anchor> {
        &self.anchors
    }

    /// Outline entries seen so far, in document order.
    pub fn outline_entries(&self) -> &[OutlineEntry] {
        &self.outline
    }

    /// Builds the outline from the entries seen so far.
    pub fn outline(&self) -> Outline {
        Outline::build(self.outline.iter().cloned())
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The most recent resolution set by an `x res` command.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Number of pages begun so far.
    pub fn pages(&self) -> usize {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Rgb;
    use crate::{NullSink, TraceSink};

    fn trace(source: &str) -> (Vec<String>, Interpreter) {
        let mut sink = TraceSink::default();
        let mut interpreter = Interpreter::new();
        interpreter.run(&mut sink, source).unwrap();
        (sink.lines, interpreter)
    }

    macro_rules! interpreter_tests {
        ( $( ($name: ident, $input: expr, [ $( $want: expr ),* $(,)? ] ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let (got, _) = trace($input);
                    let want: Vec<&str> = vec![ $( $want ),* ];
                    assert_eq!(got, want);
                }
            )+
        };
    }

    interpreter_tests!(
        (
            sample_document,
            "x T ascii\nx res 240 24 40\np1\nV40\nH0\ntHello\nn40 0\n",
            [
                "device ascii",
                "resolution 240 24 40",
                "begin_page 1",
                "move_to_v 40",
                "move_to_h 0",
                r#"text_run [Text("Hello")]"#,
                "end_of_line 40 0",
                "end_page",
            ]
        ),
        (
            text_and_moves_are_merged,
            "tHe\nh-10\ntllo\nwH500\ntworld\nV0\n",
            [
                r#"text_run [Text("He"), MoveBy(-10), Text("llo"), WordSpace, MoveTo(500), Text("world")]"#,
                "move_to_v 0",
            ]
        ),
        (
            moves_before_text_are_not_buffered,
            "H100\nwtA\n",
            ["move_to_h 100", "word_space", r#"text_run [Text("A")]"#]
        ),
        (
            inform_eol_flushes,
            "tA\nn12 0\ntB\n",
            [
                r#"text_run [Text("A")]"#,
                "end_of_line 12 0",
                r#"text_run [Text("B")]"#,
            ]
        ),
        (
            move_print,
            "24a",
            ["move_by_h 24", "print_glyph a"]
        ),
        (
            named_glyphs,
            "Chy\nCu00E9\n",
            ["print_glyph ‐", "print_glyph é"]
        ),
        (unknown_glyph_prints_nothing, "Cxyzzy\n", []),
        (indexed_glyph, "N65\n", ["print_glyph A"]),
        (
            tracked_text,
            "u-12 Hi there\n",
            [r#"print_text "Hi there" -12"#]
        ),
        (
            pages,
            "p1\nV100\np2\nx stop\n",
            ["begin_page 1", "move_to_v 100", "end_page", "begin_page 2", "end_page"]
        ),
        (comments_are_discarded, "# nothing\n", []),
        (
            symbol_font,
            "x font 3 S\nf3\nca\nCb\nCem\nN100\ntpq\n",
            [
                "mount_font 3 S",
                "set_font 3 S",
                "print_glyph α",
                "print_glyph β",
                "print_glyph —",
                "print_glyph δ",
                r#"text_run [Text("πθ")]"#,
            ]
        ),
        (
            unmounted_font,
            "f9\n",
            ["set_font 9 -"]
        ),
        (
            stroke_colour,
            "mr 65535 0 0\nmd\n",
            ["stroke Rgb(Rgb { r: 255, g: 0, b: 0 })", "stroke Default"]
        ),
        (
            fill_colours,
            "Df 1000\nDFg 0\n",
            [
                "fill Rgb(Rgb { r: 0, g: 0, b: 0 })",
                "fill Rgb(Rgb { r: 0, g: 0, b: 0 })",
            ]
        ),
        (
            drawing,
            "Dl 100 0\nDC 40\n",
            [
                "draw Line { dh: 100, dv: 0 }",
                "draw Circle { diameter: 40, filled: true }",
            ]
        ),
        (
            escapes,
            "x X ps:invis\nx X ps:endinvis\nx X ps:exec 1 setlinecap\nx X pdf: xrev\nx X devtag:.NH 1\n",
            [
                "visible false",
                "visible true",
                "line_cap 1",
                "mirror",
                "device_escape devtag:.NH 1",
            ]
        ),
        (
            marks,
            "x X pdf: markstart 1 2 3 /Dest /a\nx X pdf: marksuspend\nx X pdf: markrestart\nx X pdf: markend\n",
            [
                r#"mark_start Some(Destination("a"))"#,
                "mark_suspend",
                "mark_restart",
                "mark_end",
            ]
        ),
        (
            paper_size,
            "x res 72000 1 1\nx X papersize=8.5i,11i\n",
            ["resolution 72000 1 1", "paper_size 612000 792000"]
        ),
        (
            other_device_controls,
            "x init\nx F doc.ms\nx H 12\nx S 10\nx u 1\nx trailer\n",
            [
                "source_file doc.ms",
                "char_height 12",
                "slant 10",
                "device_control u 1",
            ]
        ),
    );

    #[test]
    fn run_capacity() {
        let source = "tx\n".repeat(RUN_CAPACITY + 6);
        let (got, _) = trace(&source);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].matches("Text").count(), RUN_CAPACITY);
        assert_eq!(got[1].matches("Text").count(), 6);
    }

    #[test]
    fn warnings() {
        let (_, interpreter) = trace("s\nCxyzzy\nmz 1\nDz 1\nf4\nN-1\n");
        let kinds: Vec<WarningKind> = interpreter
            .warnings()
            .iter()
            .map(|w| w.kind.clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::InvalidNumber {
                    text: "".to_string()
                },
                WarningKind::UnknownGlyph {
                    name: "xyzzy".to_string()
                },
                WarningKind::UnknownColourScheme {
                    scheme: "z".to_string()
                },
                WarningKind::UnknownDrawing {
                    command: "z".to_string()
                },
                WarningKind::UnmountedFont { index: 4 },
                WarningKind::InvalidGlyphIndex { index: -1 },
            ]
        );
        assert_eq!(interpreter.warnings()[1].span, 2..8);
    }

    #[test]
    fn anchors_and_outline() {
        let source = "p1\nV1000\nx X ps:exec [/Dest /intro /DEST pdfmark\n\
            x X ps:exec [/Dest /intro /Title (Intro) /Level 1 /OUT pdfmark\n\
            p2\nV500\nv20\nx X pdf: pdfmark /Dest /details /DEST\n\
            x X ps:exec [/Dest /details /Title (Details) /Level 2 /OUT pdfmark\n";
        let (_, interpreter) = trace(source);
        let anchors: Vec<(&str, Anchor)> = interpreter
            .anchors()
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            anchors,
            vec![
                ("details", Anchor { page: 2, v: 520 }),
                ("intro", Anchor { page: 1, v: 1000 }),
            ]
        );
        assert_eq!(
            interpreter.outline_entries(),
            &[
                OutlineEntry::new("Intro", "intro", 1),
                OutlineEntry::new("Details", "details", 2),
            ]
        );
        assert_eq!(format!["{}", interpreter.outline()], "Intro\n  Details\n");
        assert_eq!(interpreter.pages(), 2);
    }

    #[test]
    fn drawing_advances_vertical_position() {
        let (_, interpreter) = trace("p1\nV10\nDl 5 20\nx X ps:exec [/Dest /a /DEST pdfmark\n");
        assert_eq!(interpreter.anchors()["a"], Anchor { page: 1, v: 30 });
    }

    #[test]
    fn large_vertical_moves_saturate() {
        let (_, interpreter) =
            trace("p1\nv2147483647\nv1\nx X ps:exec [/Dest /a /DEST pdfmark\n");
        assert_eq!(interpreter.anchors()["a"], Anchor { page: 1, v: i32::MAX });
    }

    #[test]
    fn large_arc_saturates() {
        let (got, interpreter) = trace(
            "p1\nDa 0 2000000000 0 2000000000\nx X ps:exec [/Dest /a /DEST pdfmark\n",
        );
        assert_eq!(got.len(), 3);
        assert_eq!(interpreter.anchors()["a"], Anchor { page: 1, v: i32::MAX });
        let mut interpreter = Interpreter::new();
        interpreter
            .run(&mut NullSink, "p1\nDa 2000000000 0 2000000000 0\n")
            .unwrap();
        assert_eq!(interpreter.pages(), 1);
    }

    struct Picky;

    impl Sink for Picky {
        type Error = String;

        fn set_resolution(&mut self, resolution: Resolution) -> Result<(), String> {
            if resolution.units_per_inch > 1000 {
                return Err("too high".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn sink_errors_abort() {
        let mut interpreter = Interpreter::new();
        let got = interpreter.run(&mut Picky, "x res 72000 1 1\np1\n");
        assert_eq!(got, Err("too high".to_string()));
        assert_eq!(interpreter.pages(), 0);
    }

    #[test]
    fn stroke_colour_value() {
        let mut sink = TraceSink::default();
        Interpreter::new().run(&mut sink, "mg 32896\n").unwrap();
        assert_eq!(
            sink.lines,
            vec![format!["stroke {:?}", Colour::Rgb(Rgb::grey(128))]]
        );
    }
}
