//! Drawing lines with box drawing characters.
//!
//! Each horizontal or vertical line cell is described by the set of arms that
//! leave it: up, down, left and right. When a line is drawn, the arms of each
//! cell are computed from the direction of the line and from the arms of the
//! neighbouring cells, merged with the arms already in the cell, and then
//! converted back into a box drawing character. This way lines that meet form
//! corners, tees and crosses.
//!
//! The arms are kept alongside the grid because the end of a line has a single
//! arm, which is drawn with the same character as a full line.

use std::collections::HashMap;

use crate::grid::{Cell, Grid};

const UP: u8 = 0b0001;
const DOWN: u8 = 0b0010;
const LEFT: u8 = 0b0100;
const RIGHT: u8 = 0b1000;
const ALL: u8 = UP | DOWN | LEFT | RIGHT;

const RISING: char = '╱';
const FALLING: char = '╲';
const CROSSED: char = '╳';

/// Returns the arms of a box drawing character.
fn arms(ch: char) -> u8 {
    match ch {
        '─' => LEFT | RIGHT,
        '│' => UP | DOWN,
        '┌' => RIGHT | DOWN,
        '┐' => LEFT | DOWN,
        '└' => RIGHT | UP,
        '┘' => LEFT | UP,
        '┬' => LEFT | RIGHT | DOWN,
        '┴' => LEFT | RIGHT | UP,
        '├' => UP | DOWN | RIGHT,
        '┤' => UP | DOWN | LEFT,
        '┼' => ALL,
        _ => 0,
    }
}

/// Returns the box drawing character for a set of arms.
///
/// A single arm is drawn as a full horizontal or vertical line.
fn char_for_arms(bits: u8) -> char {
    match bits {
        b if b == LEFT | RIGHT || b == LEFT || b == RIGHT => '─',
        b if b == UP | DOWN || b == UP || b == DOWN => '│',
        b if b == RIGHT | DOWN => '┌',
        b if b == LEFT | DOWN => '┐',
        b if b == RIGHT | UP => '└',
        b if b == LEFT | UP => '┘',
        b if b == LEFT | RIGHT | DOWN => '┬',
        b if b == LEFT | RIGHT | UP => '┴',
        b if b == UP | DOWN | RIGHT => '├',
        b if b == UP | DOWN | LEFT => '┤',
        b if b == ALL => '┼',
        _ => '─',
    }
}

/// The arms of the line cells of one page.
#[derive(Clone, Debug, Default)]
pub struct Strokes {
    arms: HashMap<(i32, i32), u8>,
}

impl Strokes {
    pub fn new() -> Strokes {
        Default::default()
    }

    /// Returns the arms of the cell at a position.
    ///
    /// If the cell was overwritten since the line was drawn, the recorded arms are stale
    ///     and the arms are read from the character instead.
    fn arms_at(&self, grid: &Grid, row: i32, col: i32) -> u8 {
        let ch = grid.get(row, col).ch;
        match self.arms.get(&(row, col)) {
            Some(&bits) if char_for_arms(bits) == ch => bits,
            _ => arms(ch),
        }
    }

    fn connects(&self, grid: &Grid, row: i32, col: i32, arm: u8) -> bool {
        self.arms_at(grid, row, col) & arm != 0
    }

    fn merge(&mut self, grid: &mut Grid, row: i32, col: i32, bits: u8, style: Cell) {
        if row < 0 || col < 0 {
            return;
        }
        let merged = bits | self.arms_at(grid, row, col);
        self.arms.insert((row, col), merged);
        grid.set(
            row,
            col,
            Cell {
                ch: char_for_arms(merged),
                ..style
            },
        );
    }

    /// Draws a line between two cells, inclusive of both ends.
    ///
    /// Only horizontal, vertical and 45 degree lines can be drawn;
    /// other lines are ignored and `false` is returned.
    /// The font and colour of the line are taken from `style`.
    pub fn draw_line(
        &mut self,
        grid: &mut Grid,
        from: (i32, i32),
        to: (i32, i32),
        style: Cell,
    ) -> bool {
        let (r0, c0) = from;
        let (r1, c1) = to;
        if r0 == r1 {
            let (start, end) = (c0.min(c1), c0.max(c1));
            for col in start.max(0)..=end {
                let mut bits = 0;
                if col > start || self.connects(grid, r0, col.saturating_sub(1), RIGHT) {
                    bits |= LEFT;
                }
                if col < end || self.connects(grid, r0, col.saturating_add(1), LEFT) {
                    bits |= RIGHT;
                }
                if self.connects(grid, r0.saturating_sub(1), col, DOWN) {
                    bits |= UP;
                }
                if self.connects(grid, r0.saturating_add(1), col, UP) {
                    bits |= DOWN;
                }
                if bits == 0 {
                    bits = LEFT | RIGHT;
                }
                self.merge(grid, r0, col, bits, style);
            }
            true
        } else if c0 == c1 {
            let (start, end) = (r0.min(r1), r0.max(r1));
            for row in start.max(0)..=end {
                let mut bits = 0;
                if row > start || self.connects(grid, row.saturating_sub(1), c0, DOWN) {
                    bits |= UP;
                }
                if row < end || self.connects(grid, row.saturating_add(1), c0, UP) {
                    bits |= DOWN;
                }
                if self.connects(grid, row, c0.saturating_sub(1), RIGHT) {
                    bits |= LEFT;
                }
                if self.connects(grid, row, c0.saturating_add(1), LEFT) {
                    bits |= RIGHT;
                }
                self.merge(grid, row, c0, bits, style);
            }
            true
        } else if r0.abs_diff(r1) == c0.abs_diff(c1) {
            let dr = i64::from(r1.cmp(&r0) as i8);
            let dc = i64::from(c1.cmp(&c0) as i8);
            let (ch, opposite) = if dr == dc {
                (FALLING, RISING)
            } else {
                (RISING, FALLING)
            };
            let (Some(first_row), Some(first_col)) =
                (first_visible(r0, dr), first_visible(c0, dc))
            else {
                return true;
            };
            for i in first_row.max(first_col)..=i64::from(r0.abs_diff(r1)) {
                let row = i32::try_from(i64::from(r0) + i * dr);
                let col = i32::try_from(i64::from(c0) + i * dc);
                let (Ok(row @ 0..), Ok(col @ 0..)) = (row, col) else {
                    break;
                };
                let existing = grid.get(row, col).ch;
                let ch = if existing == opposite || existing == CROSSED {
                    CROSSED
                } else {
                    ch
                };
                self.arms.remove(&(row, col));
                grid.set(row, col, Cell { ch, ..style });
            }
            true
        } else {
            false
        }
    }
}

/// Returns the first step at which a coordinate moving in a direction is not negative.
fn first_visible(start: i32, step: i64) -> Option<i64> {
    match (start, step) {
        (0.., _) => Some(0),
        (_, 1..) => Some(-i64::from(start)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Font;

    fn draw(lines: &[((i32, i32), (i32, i32))]) -> Vec<String> {
        let mut grid = Grid::new();
        let mut strokes = Strokes::new();
        for (from, to) in lines {
            strokes.draw_line(&mut grid, *from, *to, Cell::BLANK);
        }
        (0..grid.height()).map(|r| grid.row_text(r)).collect()
    }

    macro_rules! line_tests {
        ( $( ($name: ident, [ $( $line: expr ),* ], [ $( $row: expr ),* ]), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let got = draw(&[ $( $line ),* ]);
                    let want: Vec<&str> = vec![ $( $row ),* ];
                    assert_eq!(got, want);
                }
            )+
        };
    }

    line_tests!(
        (horizontal, [((0, 0), (0, 3))], ["────"]),
        (horizontal_reversed, [((0, 3), (0, 0))], ["────"]),
        (single_cell, [((0, 0), (0, 0))], ["─"]),
        (vertical, [((0, 0), (2, 0))], ["│", "│", "│"]),
        (
            box_corners,
            [
                ((0, 0), (0, 3)),
                ((0, 3), (2, 3)),
                ((2, 3), (2, 0)),
                ((2, 0), (0, 0))
            ],
            ["┌──┐", "│  │", "└──┘"]
        ),
        (
            cross,
            [((1, 0), (1, 2)), ((0, 1), (2, 1))],
            [" │", "─┼─", " │"]
        ),
        (
            tee_from_vertical_ending_on_horizontal,
            [((0, 0), (0, 2)), ((0, 1), (2, 1))],
            ["─┬─", " │", " │"]
        ),
        (
            tee_from_horizontal_starting_on_vertical,
            [((0, 0), (2, 0)), ((1, 0), (1, 2))],
            ["│", "├──", "│"]
        ),
        (
            parallel_lines_do_not_join,
            [((0, 0), (0, 2)), ((1, 0), (1, 2))],
            ["───", "───"]
        ),
        (
            end_to_end_lines_do_not_join,
            [((0, 0), (1, 0)), ((2, 0), (3, 0))],
            ["│", "│", "│", "│"]
        ),
        (falling_diagonal, [((0, 0), (2, 2))], ["╲", " ╲", "  ╲"]),
        (rising_diagonal, [((2, 0), (0, 2))], ["  ╱", " ╱", "╱"]),
        (
            crossed_diagonals,
            [((0, 0), (2, 2)), ((2, 0), (0, 2))],
            ["╲ ╱", " ╳", "╱ ╲"]
        ),
    );

    #[test]
    fn other_angles_are_ignored() {
        let mut grid = Grid::new();
        let mut strokes = Strokes::new();
        assert!(!strokes.draw_line(&mut grid, (0, 0), (1, 3), Cell::BLANK));
        assert_eq!(grid.height(), 0);
    }

    #[test]
    fn lines_at_the_edge_of_the_range() {
        let mut grid = Grid::new();
        let mut strokes = Strokes::new();
        assert!(strokes.draw_line(&mut grid, (0, i32::MIN), (0, 1), Cell::BLANK));
        assert!(strokes.draw_line(&mut grid, (i32::MIN, 3), (2, 3), Cell::BLANK));
        assert!(strokes.draw_line(
            &mut grid,
            (i32::MIN + 4, i32::MIN + 3),
            (2, 1),
            Cell::BLANK
        ));
        assert!(strokes.draw_line(&mut grid, (-1, 0), (i32::MIN, i32::MAX), Cell::BLANK));
        assert!(!strokes.draw_line(&mut grid, (0, i32::MIN), (1, i32::MAX), Cell::BLANK));
        assert_eq!(grid.row_text(0), "── │");
        assert_eq!(grid.row_text(1), "╲  │");
        assert_eq!(grid.row_text(2), " ╲ │");
    }

    #[test]
    fn overwritten_cells_lose_their_arms() {
        let mut grid = Grid::new();
        let mut strokes = Strokes::new();
        strokes.draw_line(&mut grid, (0, 0), (2, 0), Cell::BLANK);
        grid.set(1, 0, Cell::new('x', Font::R, -1));
        strokes.draw_line(&mut grid, (1, 1), (1, 2), Cell::BLANK);
        assert_eq!(grid.row_text(1), "x──");
    }

    #[test]
    fn arms_round_trip() {
        for bits in 0..=ALL {
            let ch = char_for_arms(bits);
            if bits.count_ones() >= 2 {
                assert_eq!(arms(ch), bits, "{ch}");
            }
        }
    }

    #[test]
    fn style_is_applied() {
        let mut grid = Grid::new();
        let mut strokes = Strokes::new();
        let style = Cell::new(' ', Font::B, 9);
        strokes.draw_line(&mut grid, (0, 0), (0, 1), style);
        assert_eq!(grid.get(0, 0), Cell::new('─', Font::B, 9));
    }
}
