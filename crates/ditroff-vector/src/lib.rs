//! # Ditroff vector renderer
//!
//! This crate renders ditroff onto a 2D drawing surface, such as an HTML
//! canvas. The surface is abstracted by the [`Surface`] trait; the renderer
//! only issues path, fill, stroke and text calls to it.
//!
//! Rendering happens in two steps. [`VectorRenderer::process`] splits the
//! document into pages and collects the document-wide tables: named
//! destinations, the outline and the page sizes. [`VectorRenderer::render_page`]
//! then draws a single page and returns the link hotspots on it, which depend
//! on text widths measured by the surface.
//!
//! Commands that appear before the first page form the prologue, page 0.
//! The prologue is replayed before every page, so each page can be rendered
//! on its own.
//!
//! ```
//! use ditroff_vector::{surface::Call, RecordingSurface, VectorRenderer};
//! let mut renderer = VectorRenderer::default();
//! renderer.process("x T ps\nx res 72000 1 1\np1\nV0\nH0\nDl 100 0\n");
//! let mut surface = RecordingSurface::new();
//! renderer.render_page(1, &mut surface).unwrap();
//! let lines: Vec<&Call> = surface
//!     .calls
//!     .iter()
//!     .filter(|c| matches!(c, Call::LineTo(_)))
//!     .collect();
//! assert_eq!(lines.len(), 1);
//! ```

pub mod geometry;
pub mod hotspot;
mod painter;
pub mod surface;

use std::collections::BTreeMap;
use std::convert::Infallible;

use ditroff::{Anchor, Interpreter, Outline, Resolution, Sink, Token, Tokenizer, Warning};

pub use hotspot::{Hotspot, Rect};
pub use surface::{RecordingSurface, Surface};

/// Options for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Paper width in inches, used until the document sets a paper size.
    pub paper_width: f64,
    /// Paper height in inches, used until the document sets a paper size.
    pub paper_height: f64,
    /// Default line width as a fraction of the type size.
    pub line_width: f64,
}

impl Default for Options {
    /// US letter paper, and the default line width of groff's `ps` device.
    fn default() -> Self {
        Options {
            paper_width: 8.5,
            paper_height: 11.0,
            line_width: 0.04,
        }
    }
}

/// Error returned if rendering fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested page does not exist. Pages are numbered from 1.
    NoSuchPage { page: usize, pages: usize },
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoSuchPage { page, pages } => {
                write!(f, "page {page} does not exist; the document has {pages} pages")
            }
        }
    }
}

/// A page of the document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    /// The number in the page's `p` command.
    pub number: i32,
    /// Width in device units.
    pub width: i32,
    /// Height in device units.
    pub height: i32,
    /// The commands of the page, starting with its `p` command.
    pub tokens: Vec<Token>,
}

/// Renderer of ditroff onto drawing surfaces.
#[derive(Debug, Default)]
pub struct VectorRenderer {
    options: Options,
    pages: Vec<Page>,
    anchors: BTreeMap<String, Anchor>,
    outline: Outline,
    warnings: Vec<Warning>,
}

impl VectorRenderer {
    pub fn new(options: Options) -> VectorRenderer {
        VectorRenderer {
            options,
            ..Default::default()
        }
    }

    /// Splits a document into pages and rebuilds the anchors and outline.
    ///
    /// Anything processed before is discarded.
    pub fn process(&mut self, source: &str) {
        let mut interpreter = Interpreter::new();
        let mut pager = Pager {
            options: &self.options,
            units_per_inch: Resolution::default().units_per_inch,
            paper: None,
            pages: vec![],
        };
        let prologue = pager.new_page(0);
        pager.pages.push(prologue);
        for token in Tokenizer::new(source) {
            infallible(interpreter.exec(&mut pager, token.clone()));
            if let Some(page) = pager.pages.last_mut() {
                page.tokens.push(token);
            }
        }
        interpreter.finish(&mut pager);
        self.pages = pager.pages;
        self.anchors = interpreter.anchors().clone();
        self.outline = interpreter.outline();
        self.warnings = interpreter.warnings().to_vec();
    }

    /// Draws a page onto a surface and returns the link hotspots on it.
    ///
    /// Pages are numbered from 1 in the order they appear.
    pub fn render_page<S: Surface>(&self, n: usize, surface: &mut S) -> Result<Vec<Hotspot>, Error> {
        let (Some(prologue), Some(page)) = (self.pages.first(), self.page(n)) else {
            return Err(Error::NoSuchPage {
                page: n,
                pages: self.page_count(),
            });
        };
        surface.begin_page(page.width as f64, page.height as f64);
        let mut painter = painter::Painter::new(surface, n, &self.options);
        let mut interpreter = Interpreter::new();
        for token in prologue.tokens.iter().chain(&page.tokens) {
            infallible(interpreter.exec(&mut painter, token.clone()));
        }
        interpreter.finish(&mut painter);
        let hotspots = painter.finish();
        surface.end_page();
        Ok(hotspots)
    }

    /// The pages of the document, without the prologue.
    pub fn pages(&self) -> &[Page] {
        self.pages.get(1..).unwrap_or_default()
    }

    /// Returns a page by number, counting from 1.
    pub fn page(&self, n: usize) -> Option<&Page> {
        if n == 0 {
            return None;
        }
        self.pages.get(n)
    }

    /// The commands before the first page.
    pub fn prologue(&self) -> Option<&Page> {
        self.pages.first()
    }

    pub fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Named destinations in the document.
    pub fn anchors(&self) -> &BTreeMap<String, Anchor> {
        &self.anchors
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Warnings generated by the last call to [`VectorRenderer::process`].
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The smallest width and smallest height of the pages, in device units.
    ///
    /// If there are no pages this is the default paper size.
    pub fn min_size(&self) -> (i32, i32) {
        self.size_by(i32::min)
    }

    /// The largest width and largest height of the pages, in device units.
    ///
    /// If there are no pages this is the default paper size.
    pub fn max_size(&self) -> (i32, i32) {
        self.size_by(i32::max)
    }

    fn size_by(&self, f: fn(i32, i32) -> i32) -> (i32, i32) {
        let mut pages = self.pages().iter();
        let Some(first) = pages.next().or(self.prologue()) else {
            let upi = Resolution::default().units_per_inch as f64;
            return (
                (self.options.paper_width * upi).round() as i32,
                (self.options.paper_height * upi).round() as i32,
            );
        };
        pages.fold((first.width, first.height), |(w, h), page| {
            (f(w, page.width), f(h, page.height))
        })
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(t) => t,
        Err(never) => match never {},
    }
}

/// A sink that tracks page sizes while the document is split into pages.
struct Pager<'a> {
    options: &'a Options,
    units_per_inch: i32,
    paper: Option<(i32, i32)>,
    pages: Vec<Page>,
}

impl<'a> Pager<'a> {
    fn new_page(&self, number: i32) -> Page {
        let (width, height) = self.paper.unwrap_or_else(|| {
            let upi = self.units_per_inch as f64;
            (
                (self.options.paper_width * upi).round() as i32,
                (self.options.paper_height * upi).round() as i32,
            )
        });
        Page {
            number,
            width,
            height,
            tokens: vec![],
        }
    }
}

impl<'a> Sink for Pager<'a> {
    type Error = Infallible;

    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Infallible> {
        self.units_per_inch = resolution.units_per_inch;
        if self.pages.len() == 1 && self.paper.is_none() {
            let prologue = self.new_page(0);
            if let Some(page) = self.pages.first_mut() {
                page.width = prologue.width;
                page.height = prologue.height;
            }
        }
        Ok(())
    }

    fn begin_page(&mut self, number: i32) {
        let page = self.new_page(number);
        self.pages.push(page);
    }

    fn paper_size(&mut self, width: i32, height: i32) {
        self.paper = Some((width, height));
        if let Some(page) = self.pages.last_mut() {
            page.width = width;
            page.height = height;
        }
    }
}
