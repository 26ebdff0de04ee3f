//! Colour decoding.
//!
//! Ditroff colours are specified by a one letter scheme followed by
//! channel values in the range 0 to 65536:
//!
//! | scheme | channels          |
//! |--------|-------------------|
//! | `c`    | cyan magenta yellow |
//! | `d`    | none; the default colour |
//! | `g`    | grey              |
//! | `k`    | cyan magenta yellow black |
//! | `r`    | red green blue    |
//!
//! All schemes are decoded to 8-bit RGB.

/// An 8-bit RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    pub const fn grey(v: u8) -> Rgb {
        Rgb { r: v, g: v, b: v }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// A colour set by a ditroff command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Colour {
    /// The device's default colour.
    Default,
    Rgb(Rgb),
}

impl Colour {
    /// Returns the RGB value, or the fallback for the default colour.
    pub fn or(self, fallback: Rgb) -> Rgb {
        match self {
            Colour::Default => fallback,
            Colour::Rgb(rgb) => rgb,
        }
    }
}

/// Largest value of a ditroff colour channel.
pub const CHANNEL_MAX: f64 = 65536.0;

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

fn subtractive(v: f64) -> f64 {
    1.0 - v / CHANNEL_MAX
}

/// Decodes a colour given its scheme and raw channel values.
///
/// Missing channel values are treated as 0.
/// Returns [`None`] if the scheme is not one of `c`, `d`, `g`, `k` or `r`.
///
/// Channel values are 16 bit, as groff writes them.
/// Values on an 8 bit scale are not rescaled,
///     so `r 255 0 0` is the nearly black `rgb(1,0,0)` and not pure red.
///
/// ```
/// use ditroff::colour::{parse_colour, Colour, Rgb};
/// assert_eq!(
///     parse_colour("r", &[65535.0, 0.0, 0.0]),
///     Some(Colour::Rgb(Rgb::new(255, 0, 0))),
/// );
/// assert_eq!(
///     parse_colour("g", &[32896.0]),
///     Some(Colour::Rgb(Rgb::grey(128))),
/// );
/// assert_eq!(
///     parse_colour("r", &[255.0, 0.0, 0.0]),
///     Some(Colour::Rgb(Rgb::new(1, 0, 0))),
/// );
/// ```
pub fn parse_colour(scheme: &str, args: &[f64]) -> Option<Colour> {
    let arg = |i: usize| args.get(i).copied().unwrap_or(0.0);
    let rgb = match scheme {
        "d" => return Some(Colour::Default),
        "c" => Rgb::new(
            channel(subtractive(arg(0)) * 255.0),
            channel(subtractive(arg(1)) * 255.0),
            channel(subtractive(arg(2)) * 255.0),
        ),
        "k" => {
            let k = subtractive(arg(3));
            Rgb::new(
                channel(subtractive(arg(0)) * k * 255.0),
                channel(subtractive(arg(1)) * k * 255.0),
                channel(subtractive(arg(2)) * k * 255.0),
            )
        }
        "r" => Rgb::new(
            channel(arg(0) / 257.0),
            channel(arg(1) / 257.0),
            channel(arg(2) / 257.0),
        ),
        "g" => Rgb::grey(channel(arg(0) / 257.0)),
        _ => return None,
    };
    Some(Colour::Rgb(rgb))
}

/// Converts the legacy `Df` fill shade into the 16-bit grey domain.
///
/// The shade runs from 0 (white) to 1000 (black).
/// Values outside this range select the default colour.
/// The result is then decoded through the grey path of [`parse_colour`];
/// this two step conversion matches the observed behaviour of existing
/// postprocessors but has not been confirmed as intentional.
pub fn legacy_grey(shade: f64) -> Colour {
    if !(0.0..=1000.0).contains(&shade) {
        return Colour::Default;
    }
    let raw = (1000.0 - shade) * CHANNEL_MAX / 1000.0;
    Colour::Rgb(Rgb::grey(channel(raw / 257.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! colour_tests {
        ( $( ($name: ident, $scheme: expr, [ $($arg: expr),* ], $want: expr ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let args: Vec<f64> = vec![ $( $arg as f64 ),* ];
                    assert_eq!(parse_colour($scheme, &args), $want);
                }
            )+
        };
    }

    fn rgb(r: u8, g: u8, b: u8) -> Option<Colour> {
        Some(Colour::Rgb(Rgb::new(r, g, b)))
    }

    colour_tests!(
        (rgb_red, "r", [65535, 0, 0], rgb(255, 0, 0)),
        (rgb_mid, "r", [32896, 257, 0], rgb(128, 1, 0)),
        (rgb_missing_channels, "r", [65535], rgb(255, 0, 0)),
        (grey_half, "g", [32896], rgb(128, 128, 128)),
        (grey_black, "g", [0], rgb(0, 0, 0)),
        (cmy_white, "c", [0, 0, 0], rgb(255, 255, 255)),
        (cmy_cyan, "c", [65536, 0, 0], rgb(0, 255, 255)),
        (cmy_half, "c", [32768, 0, 0], rgb(128, 255, 255)),
        (cmyk_black, "k", [0, 0, 0, 65536], rgb(0, 0, 0)),
        (cmyk_half_black, "k", [0, 0, 65536, 32768], rgb(128, 128, 0)),
        (default, "d", [], Some(Colour::Default)),
        (unknown_scheme, "z", [1, 2, 3], None),
        (out_of_range_is_clamped, "r", [100000, -5, 0], rgb(255, 0, 0)),
    );

    #[test]
    fn legacy_grey_scale() {
        assert_eq!(legacy_grey(0.0), Colour::Rgb(Rgb::WHITE));
        assert_eq!(legacy_grey(1000.0), Colour::Rgb(Rgb::BLACK));
        assert_eq!(legacy_grey(500.0), Colour::Rgb(Rgb::grey(128)));
        assert_eq!(legacy_grey(-1.0), Colour::Default);
    }

    #[test]
    fn display() {
        assert_eq!(format!["{}", Rgb::new(255, 0, 0)], "rgb(255,0,0)");
    }
}
