//! Drawing commands.
//!
//! The operand of a `D` command is a subcommand letter followed by
//! whitespace separated numbers. All coordinates are relative: each point is
//! given as an offset from the previous one.
//!
//! | command | meaning |
//! |---------|---------|
//! | `Dl h v` | line |
//! | `Dc d`, `DC d` | circle of diameter _d_, outlined or filled |
//! | `De h v`, `DE h v` | ellipse with axes _h_ and _v_ |
//! | `Da h1 v1 h2 v2` | anticlockwise arc; centre at (h1,v1), end at (h2,v2) from the centre |
//! | `D~ h1 v1 ...` | spline through the control points |
//! | `Dp h1 v1 ...`, `DP ...` | polygon |
//! | `Dt n` | line thickness |
//!
//! The fill colour commands `Df` and `DF` are handled by the interpreter.

/// A decoded drawing command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Draw {
    Line {
        dh: i32,
        dv: i32,
    },
    /// A circle whose leftmost point is the current point.
    Circle {
        diameter: i32,
        filled: bool,
    },
    /// An ellipse whose leftmost point is the current point.
    Ellipse {
        h: i32,
        v: i32,
        filled: bool,
    },
    Arc {
        /// Centre relative to the current point.
        c1: (i32, i32),
        /// End point relative to the centre.
        c2: (i32, i32),
    },
    /// Spline through control points, each relative to the previous one.
    Spline(Vec<(i32, i32)>),
    /// Polygon through vertices, each relative to the previous one.
    ///
    /// The polygon is closed back to the starting point.
    Polygon {
        points: Vec<(i32, i32)>,
        filled: bool,
    },
    /// Set the line thickness; negative values select the default thickness.
    Thickness(i32),
}

impl Draw {
    /// Builds a drawing command from its letter and numeric arguments.
    ///
    /// Missing arguments are 0.
    /// Returns [`None`] if the letter is not a drawing command.
    pub fn new(letter: char, args: &[i32]) -> Option<Draw> {
        let arg = |i: usize| args.get(i).copied().unwrap_or(0);
        Some(match letter {
            'l' => Draw::Line {
                dh: arg(0),
                dv: arg(1),
            },
            'c' | 'C' => Draw::Circle {
                diameter: arg(0),
                filled: letter == 'C',
            },
            'e' | 'E' => Draw::Ellipse {
                h: arg(0),
                v: arg(1),
                filled: letter == 'E',
            },
            'a' => Draw::Arc {
                c1: (arg(0), arg(1)),
                c2: (arg(2), arg(3)),
            },
            '~' => Draw::Spline(points(args)),
            'p' | 'P' => Draw::Polygon {
                points: points(args),
                filled: letter == 'P',
            },
            't' => Draw::Thickness(arg(0)),
            _ => return None,
        })
    }

    /// Returns how far the command moves the current point.
    ///
    /// Sums saturate at the bounds of `i32`.
    pub fn advance(&self) -> (i32, i32) {
        match self {
            Draw::Line { dh, dv } => (*dh, *dv),
            Draw::Circle { diameter, .. } => (*diameter, 0),
            Draw::Ellipse { h, .. } => (*h, 0),
            Draw::Arc { c1, c2 } => (c1.0.saturating_add(c2.0), c1.1.saturating_add(c2.1)),
            Draw::Spline(points) | Draw::Polygon { points, .. } => {
                points.iter().fold((0, 0), |(h, v): (i32, i32), (dh, dv)| {
                    (h.saturating_add(*dh), v.saturating_add(*dv))
                })
            }
            Draw::Thickness(_) => (0, 0),
        }
    }
}

fn points(args: &[i32]) -> Vec<(i32, i32)> {
    args.chunks(2)
        .map(|p| (p[0], p.get(1).copied().unwrap_or(0)))
        .collect()
}
