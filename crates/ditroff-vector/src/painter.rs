//! Rendering one page onto a surface.

use std::convert::Infallible;
use std::f64::consts::PI;

use ditroff::control::{MarkStart, Resolution};
use ditroff::font::{self, FontStyle};
use ditroff::{Colour, Draw, Rgb, RunPiece, Sink};

use crate::geometry::{self, Arc, Point, Segment, Transform};
use crate::hotspot::{Hotspot, Marks};
use crate::surface::{FontSpec, LineCap, LineJoin, Stroke, Surface};
use crate::Options;

/// How far in device units a move may be from the end of text and still join it.
const JOIN_TOLERANCE: f64 = 0.5;

/// A sink that draws the commands it receives onto a surface.
pub(crate) struct Painter<'a, S> {
    surface: &'a mut S,
    line_width: f64,
    units_per_inch: i32,
    h: f64,
    v: f64,
    font: FontStyle,
    size: i32,
    char_height: i32,
    slant: i32,
    rotation: f64,
    mirrored: bool,
    visible: bool,
    stroke: Colour,
    fill: Option<Colour>,
    thickness: Option<f64>,
    cap: LineCap,
    join: LineJoin,
    marks: Marks,
}

impl<'a, S: Surface> Painter<'a, S> {
    pub fn new(surface: &'a mut S, page: usize, options: &Options) -> Painter<'a, S> {
        Painter {
            surface,
            line_width: options.line_width,
            units_per_inch: Resolution::default().units_per_inch,
            h: 0.0,
            v: 0.0,
            font: font::style_or_guess("TR"),
            size: 10,
            char_height: 0,
            slant: 0,
            rotation: 0.0,
            mirrored: false,
            visible: true,
            stroke: Colour::Default,
            fill: None,
            thickness: None,
            cap: LineCap::default(),
            join: LineJoin::default(),
            marks: Marks::new(page),
        }
    }

    /// Ends any open link and returns the hotspots of the page.
    pub fn finish(self) -> Vec<Hotspot> {
        self.marks.finish(self.h)
    }

    fn position(&self) -> Point {
        Point::new(self.h, self.v)
    }

    fn points_to_units(&self, points: i32) -> f64 {
        points as f64 * self.units_per_inch as f64 / 72.0
    }

    fn font_spec(&self) -> FontSpec {
        FontSpec {
            style: self.font,
            size: self.points_to_units(self.size),
        }
    }

    fn stroke_style(&self) -> Stroke {
        Stroke {
            colour: self.stroke.or(Rgb::BLACK),
            width: self
                .thickness
                .unwrap_or_else(|| self.line_width * self.font_spec().size),
            cap: self.cap,
            join: self.join,
        }
    }

    fn fill_colour(&self) -> Rgb {
        self.fill.unwrap_or(self.stroke).or(Rgb::BLACK)
    }

    /// The transform applied to text, about the start of the text.
    fn text_transform(&self) -> Transform {
        let mut t = Transform::IDENTITY;
        if self.char_height != 0 && self.size != 0 {
            t.d = self.char_height as f64 / self.size as f64;
        }
        if self.slant != 0 {
            t.c = -(self.slant as f64).to_radians().tan() * t.d;
        }
        if self.mirrored {
            t.a = -t.a;
        }
        if self.rotation != 0.0 {
            t = t.then(&Transform::rotation(self.rotation));
        }
        t
    }

    /// Draws text at the current position and returns its width.
    fn show(&mut self, text: &str) -> f64 {
        let font = self.font_spec();
        let width = self.surface.measure_text(text, &font);
        if !self.visible || text.is_empty() {
            return width;
        }
        let colour = self.stroke.or(Rgb::BLACK);
        let t = self.text_transform();
        if t.is_identity() {
            self.surface.fill_text(text, self.position(), &font, colour);
            return width;
        }
        // Mirrored text keeps its extent on the page.
        let origin = if self.mirrored {
            Point::new(self.h + width, self.v)
        } else {
            self.position()
        };
        self.surface
            .set_transform(t.then(&Transform::translation(origin)));
        self.surface.fill_text(text, Point::ORIGIN, &font, colour);
        self.surface.set_transform(Transform::IDENTITY);
        width
    }

    /// Shows buffered text at the current position.
    ///
    /// The current position then moves to `end` if given, or past the text.
    fn show_pending(&mut self, pending: &mut String, end: Option<f64>) {
        if !pending.is_empty() {
            self.h += self.show(pending);
            pending.clear();
        }
        if let Some(end) = end {
            self.h = end;
        }
    }

    fn finish_shape(&mut self, filled: bool) {
        if filled {
            let colour = self.fill_colour();
            self.surface.fill(colour);
        } else {
            let stroke = self.stroke_style();
            self.surface.stroke(&stroke);
        }
    }

    fn paint(&mut self, draw: &Draw) {
        let start = self.position();
        match draw {
            Draw::Line { dh, dv } => {
                self.surface.begin_path();
                self.surface.move_to(start);
                self.surface.line_to(start + Point::from((*dh, *dv)));
                self.finish_shape(false);
            }
            Draw::Circle { diameter, filled } => {
                let r = *diameter as f64 / 2.0;
                self.surface.begin_path();
                self.surface
                    .arc(start + Point::new(r, 0.0), r, 0.0, 2.0 * PI, false);
                self.finish_shape(*filled);
            }
            Draw::Ellipse { h, v, filled } => {
                let (rx, ry) = (*h as f64 / 2.0, *v as f64 / 2.0);
                self.surface.begin_path();
                self.surface.ellipse(start + Point::new(rx, 0.0), rx, ry);
                self.finish_shape(*filled);
            }
            Draw::Arc { c1, c2 } => {
                self.surface.begin_path();
                self.surface.move_to(start);
                match geometry::arc(start, *c1, *c2) {
                    Arc::Line(to) => self.surface.line_to(to),
                    Arc::Arc {
                        centre,
                        radius,
                        start: from,
                        end: to,
                    } => self.surface.arc(centre, radius, from, to, true),
                }
                self.finish_shape(false);
            }
            Draw::Spline(offsets) => {
                self.surface.begin_path();
                self.surface.move_to(start);
                for segment in geometry::spline(start, offsets) {
                    match segment {
                        Segment::Line(to) => self.surface.line_to(to),
                        Segment::Cubic(c1, c2, to) => self.surface.bezier_to(c1, c2, to),
                    }
                }
                self.finish_shape(false);
            }
            Draw::Polygon { points, filled } => {
                let mut vertices = vec![start];
                for offset in points {
                    let last = vertices[vertices.len() - 1];
                    vertices.push(last + Point::from(*offset));
                }
                self.surface.begin_path();
                self.surface.polygon(&vertices);
                self.finish_shape(*filled);
            }
            Draw::Thickness(_) => {}
        }
    }
}

impl<'a, S: Surface> Sink for Painter<'a, S> {
    type Error = Infallible;

    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Infallible> {
        self.units_per_inch = resolution.units_per_inch;
        Ok(())
    }

    fn begin_page(&mut self, _: i32) {
        self.h = 0.0;
        self.v = 0.0;
    }

    fn set_size(&mut self, size: i32) {
        self.size = size;
    }

    fn set_font(&mut self, _: i32, name: Option<&str>) {
        self.font = font::style_or_guess(name.unwrap_or_default());
    }

    fn move_to_h(&mut self, h: i32) {
        self.h = h as f64;
    }

    fn move_by_h(&mut self, dh: i32) {
        self.h += dh as f64;
    }

    fn move_to_v(&mut self, v: i32) {
        self.v = v as f64;
    }

    fn move_by_v(&mut self, dv: i32) {
        self.v += dv as f64;
    }

    fn print_glyph(&mut self, text: &str) {
        self.show(text);
    }

    fn print_text(&mut self, text: &str, tracking: i32) {
        if tracking == 0 {
            self.h += self.show(text);
            return;
        }
        let mut buf = [0; 4];
        for c in text.chars() {
            self.h += self.show(c.encode_utf8(&mut buf)) + tracking as f64;
        }
    }

    /// Prints a run, joining text across moves that land where the text ends.
    ///
    /// Joined text is drawn with a single call so the surface can kern it.
    fn text_run(&mut self, run: &[RunPiece]) {
        let mut pending = String::new();
        // Position the pending text was moved to after it ended.
        let mut end = None;
        for piece in run {
            let target = match piece {
                RunPiece::Text(text) => {
                    pending.push_str(text);
                    end = None;
                    continue;
                }
                RunPiece::MoveTo(h) => Some(*h as f64),
                RunPiece::MoveBy(dh) => {
                    let font = self.font_spec();
                    let at = end.unwrap_or(self.h + self.surface.measure_text(&pending, &font));
                    Some(at + *dh as f64)
                }
                RunPiece::WordSpace => None,
            };
            if let Some(h) = target {
                let font = self.font_spec();
                let measured = self.h + self.surface.measure_text(&pending, &font);
                if !pending.is_empty() && (h - measured).abs() <= JOIN_TOLERANCE {
                    end = Some(h);
                    continue;
                }
            }
            self.show_pending(&mut pending, end.take());
            match target {
                Some(h) => self.h = h,
                None => self.word_space(),
            }
        }
        self.show_pending(&mut pending, end);
    }

    fn word_space(&mut self) {}

    fn draw(&mut self, draw: &Draw) {
        if let Draw::Thickness(n) = draw {
            self.thickness = if *n < 0 { None } else { Some(*n as f64) };
        }
        if self.visible {
            self.paint(draw);
        }
        let (dh, dv) = draw.advance();
        self.h += dh as f64;
        self.v += dv as f64;
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.stroke = colour;
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.fill = Some(colour);
    }

    fn set_char_height(&mut self, height: i32) {
        self.char_height = height;
    }

    fn set_slant(&mut self, degrees: i32) {
        self.slant = degrees;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn rotate(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn set_line_cap(&mut self, cap: i32) {
        if let Some(cap) = LineCap::from_code(cap) {
            self.cap = cap;
        }
    }

    fn set_line_join(&mut self, join: i32) {
        if let Some(join) = LineJoin::from_code(join) {
            self.join = join;
        }
    }

    fn mark_start(&mut self, mark: &MarkStart) {
        self.marks.start(mark, self.h, self.v);
    }

    fn mark_end(&mut self) {
        self.marks.end(self.h);
    }

    fn mark_suspend(&mut self) {
        self.marks.suspend(self.h);
    }

    fn mark_restart(&mut self) {
        self.marks.restart(self.h, self.v);
    }

    fn mirror(&mut self) {
        self.mirrored = !self.mirrored;
    }
}
