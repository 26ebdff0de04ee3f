//! The drawing surface that pages are rendered onto.

use ditroff::font::FontStyle;
use ditroff::Rgb;

use crate::geometry::{Point, Transform};

/// A font at a particular size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FontSpec {
    pub style: FontStyle,
    /// Size of the font in device units.
    pub size: f64,
}

/// How the ends of stroked lines are drawn, as in PostScript's `setlinecap`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// How the corners of stroked paths are drawn, as in PostScript's `setlinejoin`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineCap {
    /// Returns the line cap with a PostScript code; unknown codes give [`None`].
    pub fn from_code(code: i32) -> Option<LineCap> {
        match code {
            0 => Some(LineCap::Butt),
            1 => Some(LineCap::Round),
            2 => Some(LineCap::Square),
            _ => None,
        }
    }
}

impl LineJoin {
    /// Returns the line join with a PostScript code; unknown codes give [`None`].
    pub fn from_code(code: i32) -> Option<LineJoin> {
        match code {
            0 => Some(LineJoin::Miter),
            1 => Some(LineJoin::Round),
            2 => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

/// Style of a stroked path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    pub colour: Rgb,
    /// Width in device units.
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

/// A 2D drawing surface with a current path, in the style of an HTML canvas.
///
/// Coordinates are in device units with the origin at the top left of the page.
/// The transform applies to everything drawn after it is set.
pub trait Surface {
    /// Begins a page of the given size in device units.
    fn begin_page(&mut self, width: f64, height: f64) {
        let _ = (width, height);
    }

    fn end_page(&mut self) {}

    fn set_transform(&mut self, transform: Transform);

    /// Discards the current path and begins a new one.
    fn begin_path(&mut self);

    fn move_to(&mut self, p: Point);

    fn line_to(&mut self, p: Point);

    /// Adds an arc about a centre between two angles in radians.
    fn arc(&mut self, centre: Point, radius: f64, start: f64, end: f64, anticlockwise: bool);

    /// Adds a closed ellipse with the given radii.
    fn ellipse(&mut self, centre: Point, rx: f64, ry: f64);

    fn bezier_to(&mut self, c1: Point, c2: Point, to: Point);

    /// Adds a closed polygon.
    fn polygon(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        self.close_path();
    }

    fn close_path(&mut self);

    fn stroke(&mut self, stroke: &Stroke);

    fn fill(&mut self, colour: Rgb);

    /// Returns the width of text in device units.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64;

    /// Draws text with its baseline starting at a point.
    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, colour: Rgb);
}

/// A call made to a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Call {
    BeginPage {
        width: f64,
        height: f64,
    },
    EndPage,
    SetTransform(Transform),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Arc {
        centre: Point,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    Ellipse {
        centre: Point,
        rx: f64,
        ry: f64,
    },
    BezierTo(Point, Point, Point),
    ClosePath,
    Stroke(Stroke),
    Fill(Rgb),
    FillText {
        text: String,
        at: Point,
        font: FontSpec,
        colour: Rgb,
    },
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = |p: &Point| format!("{} {}", p.x, p.y);
        match self {
            Call::BeginPage { width, height } => write!(f, "begin_page {width} {height}"),
            Call::EndPage => write!(f, "end_page"),
            Call::SetTransform(t) => write!(
                f,
                "set_transform {} {} {} {} {} {}",
                t.a, t.b, t.c, t.d, t.e, t.f
            ),
            Call::BeginPath => write!(f, "begin_path"),
            Call::MoveTo(to) => write!(f, "move_to {}", p(to)),
            Call::LineTo(to) => write!(f, "line_to {}", p(to)),
            Call::Arc {
                centre,
                radius,
                start,
                end,
                anticlockwise,
            } => write!(
                f,
                "arc {} {radius} {start:.4} {end:.4}{}",
                p(centre),
                if *anticlockwise { " anticlockwise" } else { "" }
            ),
            Call::Ellipse { centre, rx, ry } => write!(f, "ellipse {} {rx} {ry}", p(centre)),
            Call::BezierTo(c1, c2, to) => {
                write!(f, "bezier_to {} {} {}", p(c1), p(c2), p(to))
            }
            Call::ClosePath => write!(f, "close_path"),
            Call::Stroke(s) => write!(f, "stroke {} {}", s.colour, s.width),
            Call::Fill(colour) => write!(f, "fill {colour}"),
            Call::FillText {
                text,
                at,
                font,
                colour,
            } => write!(
                f,
                "fill_text {text:?} {} {} {} {} {} {colour}",
                p(at),
                font.style.family,
                font.style.weight,
                font.style.slant,
                font.size
            ),
        }
    }
}

/// A surface that records the calls made to it.
///
/// Text is measured as if every character were half an em wide.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    pub fn new() -> RecordingSurface {
        Default::default()
    }
}

impl Surface for RecordingSurface {
    fn begin_page(&mut self, width: f64, height: f64) {
        self.calls.push(Call::BeginPage { width, height });
    }
    fn end_page(&mut self) {
        self.calls.push(Call::EndPage);
    }
    fn set_transform(&mut self, transform: Transform) {
        self.calls.push(Call::SetTransform(transform));
    }
    fn begin_path(&mut self) {
        self.calls.push(Call::BeginPath);
    }
    fn move_to(&mut self, p: Point) {
        self.calls.push(Call::MoveTo(p));
    }
    fn line_to(&mut self, p: Point) {
        self.calls.push(Call::LineTo(p));
    }
    fn arc(&mut self, centre: Point, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.calls.push(Call::Arc {
            centre,
            radius,
            start,
            end,
            anticlockwise,
        });
    }
    fn ellipse(&mut self, centre: Point, rx: f64, ry: f64) {
        self.calls.push(Call::Ellipse { centre, rx, ry });
    }
    fn bezier_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.calls.push(Call::BezierTo(c1, c2, to));
    }
    fn close_path(&mut self) {
        self.calls.push(Call::ClosePath);
    }
    fn stroke(&mut self, stroke: &Stroke) {
        self.calls.push(Call::Stroke(*stroke));
    }
    fn fill(&mut self, colour: Rgb) {
        self.calls.push(Call::Fill(colour));
    }
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size / 2.0
    }
    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, colour: Rgb) {
        self.calls.push(Call::FillText {
            text: text.to_string(),
            at,
            font: *font,
            colour,
        });
    }
}
