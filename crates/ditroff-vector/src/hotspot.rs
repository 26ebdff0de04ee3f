//! Link hotspots.
//!
//! A link begins with a `pdf: markstart` escape and ends with `pdf: markend`.
//! Links that wrap onto a new line are suspended at the end of the first line
//! with `pdf: marksuspend` and restarted on the next with `pdf: markrestart`;
//! each line then gets its own hotspot with the same target.

use ditroff::control::{MarkStart, Target};

/// A rectangle in device units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }
}

/// A rectangular link on a page.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hotspot {
    /// Page number, counting from 1.
    pub page: usize,
    pub rect: Rect,
    pub target: Option<Target>,
    /// Values of the `/Border` array; an empty array or a zero width means no border.
    pub border: Vec<f64>,
    /// Values of the `/Color` array of the border.
    pub colour: Vec<f64>,
    /// The arguments of the `markstart` escape that began the link.
    pub raw: String,
}

#[derive(Debug)]
struct Open {
    mark: MarkStart,
    left: f64,
    v: f64,
}

/// Tracks the links of one page as the page is rendered.
#[derive(Debug)]
pub(crate) struct Marks {
    page: usize,
    open: Option<Open>,
    suspended: Option<MarkStart>,
    hotspots: Vec<Hotspot>,
}

impl Marks {
    pub fn new(page: usize) -> Marks {
        Marks {
            page,
            open: None,
            suspended: None,
            hotspots: vec![],
        }
    }

    /// Begins a link at a position. A link that is still open is ended first.
    pub fn start(&mut self, mark: &MarkStart, h: f64, v: f64) {
        self.close(h);
        self.suspended = None;
        self.open = Some(Open {
            mark: mark.clone(),
            left: h,
            v,
        });
    }

    pub fn suspend(&mut self, h: f64) {
        if let Some(mark) = self.close(h) {
            self.suspended = Some(mark);
        }
    }

    pub fn restart(&mut self, h: f64, v: f64) {
        if let Some(mark) = self.suspended.take() {
            self.open = Some(Open { mark, left: h, v });
        }
    }

    pub fn end(&mut self, h: f64) {
        self.close(h);
        self.suspended = None;
    }

    /// Ends any open link and returns the hotspots of the page.
    pub fn finish(mut self, h: f64) -> Vec<Hotspot> {
        self.close(h);
        self.hotspots
    }

    fn close(&mut self, h: f64) -> Option<MarkStart> {
        let open = self.open.take()?;
        let mark = open.mark;
        self.hotspots.push(Hotspot {
            page: self.page,
            rect: Rect {
                left: open.left.min(h),
                top: open.v - f64::from(mark.rst).abs(),
                right: open.left.max(h),
                bottom: open.v + f64::from(mark.rsb).abs(),
            },
            target: mark.target.clone(),
            border: mark.border.clone(),
            colour: mark.colour.clone(),
            raw: mark.raw.clone(),
        });
        Some(mark)
    }
}
