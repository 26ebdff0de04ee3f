//! Character grids.

/// Style of the font a cell was printed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Font {
    #[default]
    R,
    I,
    B,
    BI,
}

impl Font {
    /// Derives the style from a font name, using groff's naming conventions.
    ///
    /// ```
    /// use ditroff_tty::Font;
    /// assert_eq!(Font::from_name("TBI"), Font::BI);
    /// assert_eq!(Font::from_name("CB"), Font::B);
    /// assert_eq!(Font::from_name("I"), Font::I);
    /// assert_eq!(Font::from_name("S"), Font::R);
    /// ```
    pub fn from_name(name: &str) -> Font {
        if name.ends_with("BI") {
            Font::BI
        } else if name.ends_with('B') {
            Font::B
        } else if name.ends_with('I') {
            Font::I
        } else {
            Font::R
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Font::B | Font::BI)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Font::I | Font::BI)
    }
}

/// A cell in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub ch: char,
    pub font: Font,
    /// Index in the xterm 256 colour palette, or -1 for the default colour.
    pub colour: i16,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        font: Font::R,
        colour: -1,
    };

    pub fn new(ch: char, font: Font, colour: i16) -> Cell {
        Cell { ch, font, colour }
    }

    /// Whether the cell has the same style as another.
    pub fn same_style(&self, other: &Cell) -> bool {
        self.font == other.font && self.colour == other.colour
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::BLANK
    }
}

/// A grid of cells that grows on demand.
///
/// Rows may have different lengths.
/// Reading a cell outside the grid returns a blank cell;
/// writing a cell outside the grid grows it.
/// Growing never changes existing cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new() -> Grid {
        Default::default()
    }

    /// Returns the cell at a position.
    ///
    /// Negative positions are outside the grid.
    pub fn get(&self, row: i32, col: i32) -> Cell {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return Cell::BLANK;
        };
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::BLANK)
    }

    /// Sets the cell at a position, growing the grid if needed.
    ///
    /// Writes at negative positions are dropped.
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return;
        };
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if r.len() <= col {
            r.resize(col + 1, Cell::BLANK);
        }
        r[col] = cell;
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the rows to output, optionally trimming trailing blanks.
    ///
    /// Trimming removes blank cells at the end of each row and blank rows at the end of the grid.
    pub(crate) fn output_rows(&self, trim: bool) -> Vec<&[Cell]> {
        let mut rows: Vec<&[Cell]> = self
            .rows
            .iter()
            .map(|r| {
                if !trim {
                    return r.as_slice();
                }
                let end = r
                    .iter()
                    .rposition(|c| *c != Cell::BLANK)
                    .map(|i| i + 1)
                    .unwrap_or(0);
                &r[..end]
            })
            .collect();
        if trim {
            while rows.last().map(|r| r.is_empty()).unwrap_or(false) {
                rows.pop();
            }
        }
        rows
    }

    /// Returns the text of a row without styling.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| r.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }
}
