//! The xterm 256 colour palette.
//!
//! Indices 0 to 15 are the system colours, whose values vary between terminals,
//! so they are never chosen. Indices 16 to 231 form a 6x6x6 colour cube and
//! indices 232 to 255 are a greyscale ramp.

use ditroff::{Colour, Rgb};

const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Returns the RGB value of a palette entry from the colour cube or greyscale ramp.
pub fn rgb(index: u8) -> Option<Rgb> {
    match index {
        0..=15 => None,
        16..=231 => {
            let i = index - 16;
            Some(Rgb::new(
                LEVELS[(i / 36) as usize],
                LEVELS[((i / 6) % 6) as usize],
                LEVELS[(i % 6) as usize],
            ))
        }
        232..=255 => Some(Rgb::grey(8 + 10 * (index - 232))),
    }
}

fn distance(a: Rgb, b: Rgb) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
}

/// Returns the index of the palette entry nearest to a colour.
///
/// Ties are broken in favour of the lower index.
pub fn nearest(colour: Rgb) -> u8 {
    let mut best = 16;
    let mut best_distance = u32::MAX;
    for index in 16..=255_u8 {
        let Some(candidate) = rgb(index) else {
            continue;
        };
        let d = distance(colour, candidate);
        if d < best_distance {
            best = index;
            best_distance = d;
        }
    }
    best
}

/// Returns the palette index for a colour, or -1 for the default colour.
pub fn index(colour: Colour) -> i16 {
    match colour {
        Colour::Default => -1,
        Colour::Rgb(rgb) => nearest(rgb) as i16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! nearest_tests {
        ( $( ($name: ident, $rgb: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let (r, g, b) = $rgb;
                    assert_eq!(nearest(Rgb::new(r, g, b)), $want);
                }
            )+
        };
    }

    nearest_tests!(
        (black, (0, 0, 0), 16),
        (white, (255, 255, 255), 231),
        (red, (255, 0, 0), 196),
        (green, (0, 255, 0), 46),
        (blue, (0, 0, 255), 21),
        (grey_128, (128, 128, 128), 244),
        (almost_red, (250, 5, 3), 196),
        (orange, (255, 135, 0), 208),
    );

    #[test]
    fn default_colour() {
        assert_eq!(index(Colour::Default), -1);
        assert_eq!(index(Colour::Rgb(Rgb::new(255, 0, 0))), 196);
    }

    #[test]
    fn round_trip_palette_entries() {
        for i in 16..=255_u8 {
            let entry = rgb(i).unwrap();
            assert_eq!(rgb(nearest(entry)), Some(entry));
        }
    }

    #[test]
    fn system_colours_are_not_used() {
        assert_eq!(rgb(3), None);
    }
}
