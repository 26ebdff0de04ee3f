//! The interface between the interpreter and renderers.

use crate::colour::Colour;
use crate::control::{MarkStart, Resolution};
use crate::draw::Draw;

/// A piece of a buffered text run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunPiece {
    /// Text to print, advancing after each character.
    Text(String),
    /// Move to an absolute horizontal position.
    MoveTo(i32),
    /// Move right by a relative amount.
    MoveBy(i32),
    /// An interword space.
    WordSpace,
}

/// Receiver of decoded ditroff commands.
///
/// Every method has a default implementation that does nothing,
/// so a renderer only implements the commands it cares about.
/// Positions are in device units.
pub trait Sink {
    /// Error returned by the sink.
    type Error;

    /// Handles `x res`.
    ///
    /// This is the only command that can fail; the error aborts interpretation.
    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Self::Error> {
        let _ = resolution;
        Ok(())
    }

    fn set_device(&mut self, name: &str) {
        let _ = name;
    }

    fn set_source_file(&mut self, name: &str) {
        let _ = name;
    }

    fn mount_font(&mut self, index: i32, name: &str) {
        let _ = (index, name);
    }

    /// Begins a new page. The vertical position is reset to 0.
    fn begin_page(&mut self, number: i32) {
        let _ = number;
    }

    fn end_page(&mut self) {}

    fn set_size(&mut self, size: i32) {
        let _ = size;
    }

    /// Selects a font; the name is [`None`] if nothing is mounted at the index.
    fn set_font(&mut self, index: i32, name: Option<&str>) {
        let _ = (index, name);
    }

    fn move_to_h(&mut self, h: i32) {
        let _ = h;
    }

    fn move_by_h(&mut self, dh: i32) {
        let _ = dh;
    }

    fn move_to_v(&mut self, v: i32) {
        let _ = v;
    }

    fn move_by_v(&mut self, dv: i32) {
        let _ = dv;
    }

    /// Prints a glyph at the current position without advancing.
    fn print_glyph(&mut self, text: &str) {
        let _ = text;
    }

    /// Prints text, advancing after each character by its width plus the tracking.
    fn print_text(&mut self, text: &str, tracking: i32) {
        let _ = (text, tracking);
    }

    /// Prints a run of text and horizontal moves that were buffered together.
    ///
    /// The default implementation replays the run piece by piece.
    fn text_run(&mut self, run: &[RunPiece]) {
        for piece in run {
            match piece {
                RunPiece::Text(text) => self.print_text(text, 0),
                RunPiece::MoveTo(h) => self.move_to_h(*h),
                RunPiece::MoveBy(dh) => self.move_by_h(*dh),
                RunPiece::WordSpace => self.word_space(),
            }
        }
    }

    /// Handles the end of an output line.
    fn end_of_line(&mut self, before: i32, after: i32) {
        let _ = (before, after);
    }

    fn word_space(&mut self) {}

    /// Draws a shape starting at the current position.
    ///
    /// The sink is responsible for advancing its own position by [`Draw::advance`].
    fn draw(&mut self, draw: &Draw) {
        let _ = draw;
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        let _ = colour;
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        let _ = colour;
    }

    /// Sets the character height; 0 restores the type size.
    fn set_char_height(&mut self, height: i32) {
        let _ = height;
    }

    /// Sets the slant in degrees.
    fn set_slant(&mut self, degrees: i32) {
        let _ = degrees;
    }

    fn set_visible(&mut self, visible: bool) {
        let _ = visible;
    }

    fn rotate(&mut self, degrees: f64) {
        let _ = degrees;
    }

    fn set_line_cap(&mut self, cap: i32) {
        let _ = cap;
    }

    fn set_line_join(&mut self, join: i32) {
        let _ = join;
    }

    /// Begins a link at the current position.
    fn mark_start(&mut self, mark: &MarkStart) {
        let _ = mark;
    }

    fn mark_end(&mut self) {}

    /// Suspends the current link at a line wrap.
    fn mark_suspend(&mut self) {}

    /// Restarts a suspended link on the new line.
    fn mark_restart(&mut self) {}

    /// Toggles mirrored text.
    fn mirror(&mut self) {}

    /// Sets the paper size; this persists until the next paper size command.
    fn paper_size(&mut self, width: i32, height: i32) {
        let _ = (width, height);
    }

    /// Enables or disables SGR output on terminals.
    fn set_sgr(&mut self, enabled: bool) {
        let _ = enabled;
    }

    /// Receives a device escape that is not otherwise recognized.
    fn device_escape(&mut self, text: &str) {
        let _ = text;
    }

    /// Receives a device control command that is not otherwise recognized.
    fn device_control(&mut self, text: &str) {
        let _ = text;
    }
}

/// A sink that ignores everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl Sink for NullSink {
    type Error = std::convert::Infallible;
}

/// A sink that records the commands it receives as lines of text.
///
/// This is useful in tests and for debugging.
#[derive(Debug, Default)]
pub struct TraceSink {
    pub lines: Vec<String>,
}

macro_rules! trace {
    ($self: ident, $($arg: tt)*) => {
        $self.lines.push(format![$($arg)*])
    };
}

impl Sink for TraceSink {
    type Error = std::convert::Infallible;

    fn set_resolution(&mut self, r: Resolution) -> Result<(), Self::Error> {
        trace!(self, "resolution {} {} {}", r.units_per_inch, r.horizontal, r.vertical);
        Ok(())
    }
    fn set_device(&mut self, name: &str) {
        trace!(self, "device {name}");
    }
    fn set_source_file(&mut self, name: &str) {
        trace!(self, "source_file {name}");
    }
    fn mount_font(&mut self, index: i32, name: &str) {
        trace!(self, "mount_font {index} {name}");
    }
    fn begin_page(&mut self, number: i32) {
        trace!(self, "begin_page {number}");
    }
    fn end_page(&mut self) {
        trace!(self, "end_page");
    }
    fn set_size(&mut self, size: i32) {
        trace!(self, "set_size {size}");
    }
    fn set_font(&mut self, index: i32, name: Option<&str>) {
        trace!(self, "set_font {index} {}", name.unwrap_or("-"));
    }
    fn move_to_h(&mut self, h: i32) {
        trace!(self, "move_to_h {h}");
    }
    fn move_by_h(&mut self, dh: i32) {
        trace!(self, "move_by_h {dh}");
    }
    fn move_to_v(&mut self, v: i32) {
        trace!(self, "move_to_v {v}");
    }
    fn move_by_v(&mut self, dv: i32) {
        trace!(self, "move_by_v {dv}");
    }
    fn print_glyph(&mut self, text: &str) {
        trace!(self, "print_glyph {text}");
    }
    fn print_text(&mut self, text: &str, tracking: i32) {
        trace!(self, "print_text {text:?} {tracking}");
    }
    fn text_run(&mut self, run: &[RunPiece]) {
        trace!(self, "text_run {run:?}");
    }
    fn end_of_line(&mut self, before: i32, after: i32) {
        trace!(self, "end_of_line {before} {after}");
    }
    fn word_space(&mut self) {
        trace!(self, "word_space");
    }
    fn draw(&mut self, draw: &Draw) {
        trace!(self, "draw {draw:?}");
    }
    fn set_stroke_colour(&mut self, colour: Colour) {
        trace!(self, "stroke {colour:?}");
    }
    fn set_fill_colour(&mut self, colour: Colour) {
        trace!(self, "fill {colour:?}");
    }
    fn set_char_height(&mut self, height: i32) {
        trace!(self, "char_height {height}");
    }
    fn set_slant(&mut self, degrees: i32) {
        trace!(self, "slant {degrees}");
    }
    fn set_visible(&mut self, visible: bool) {
        trace!(self, "visible {visible}");
    }
    fn rotate(&mut self, degrees: f64) {
        trace!(self, "rotate {degrees}");
    }
    fn set_line_cap(&mut self, cap: i32) {
        trace!(self, "line_cap {cap}");
    }
    fn set_line_join(&mut self, join: i32) {
        trace!(self, "line_join {join}");
    }
    fn mark_start(&mut self, mark: &MarkStart) {
        trace!(self, "mark_start {:?}", mark.target);
    }
    fn mark_end(&mut self) {
        trace!(self, "mark_end");
    }
    fn mark_suspend(&mut self) {
        trace!(self, "mark_suspend");
    }
    fn mark_restart(&mut self) {
        trace!(self, "mark_restart");
    }
    fn mirror(&mut self) {
        trace!(self, "mirror");
    }
    fn paper_size(&mut self, width: i32, height: i32) {
        trace!(self, "paper_size {width} {height}");
    }
    fn set_sgr(&mut self, enabled: bool) {
        trace!(self, "sgr {enabled}");
    }
    fn device_escape(&mut self, text: &str) {
        trace!(self, "device_escape {text}");
    }
    fn device_control(&mut self, text: &str) {
        trace!(self, "device_control {text}");
    }
}
