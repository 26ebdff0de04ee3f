//! Device control commands.
//!
//! The operand of an `x` command is a subcommand name followed by its arguments.
//! Only the first letter of the subcommand name is significant, so `x res` and
//! `x r` are the same command. The exceptions are `F` and `f`, which differ.
//!
//! The `x X` subcommand carries a device escape: arbitrary text passed through
//! troff to the postprocessor. A fixed set of escapes used by groff's macro
//! packages is recognized here; all other escapes are kept verbatim.

use crate::pdf::{self, Object};

/// The resolution of the output device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// Number of device units in one inch.
    pub units_per_inch: i32,
    /// Minimum horizontal motion in device units.
    pub horizontal: i32,
    /// Minimum vertical motion in device units.
    pub vertical: i32,
}

impl Default for Resolution {
    /// The resolution of groff's `ps` device.
    fn default() -> Self {
        Resolution {
            units_per_inch: 72000,
            horizontal: 1,
            vertical: 1,
        }
    }
}

/// A length in a device escape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Inches(f64),
    /// A length without a unit, which is in device units.
    DeviceUnits(f64),
}

impl Length {
    /// Converts the length to device units.
    pub fn to_device_units(self, units_per_inch: i32) -> i32 {
        match self {
            Length::Inches(n) => (n * units_per_inch as f64).round() as i32,
            Length::DeviceUnits(n) => n.round() as i32,
        }
    }

    fn parse(s: &str) -> Option<Length> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let n: f64 = number.parse().ok()?;
        Some(match unit {
            "i" => Length::Inches(n),
            "c" => Length::Inches(n / 2.54),
            "m" => Length::Inches(n / 25.4),
            "p" => Length::Inches(n / 72.0),
            "P" => Length::Inches(n / 6.0),
            "" | "u" => Length::DeviceUnits(n),
            _ => return None,
        })
    }
}

/// Named paper sizes, as (name, width in inches, height in inches).
const PAPER_SIZES: [(&str, f64, f64); 14] = [
    ("letter", 8.5, 11.0),
    ("legal", 8.5, 14.0),
    ("tabloid", 11.0, 17.0),
    ("ledger", 17.0, 11.0),
    ("statement", 5.5, 8.5),
    ("executive", 7.25, 10.5),
    ("com10", 4.125, 9.5),
    ("monarch", 3.875, 7.5),
    ("dl", 110.0 / 25.4, 220.0 / 25.4),
    ("a3", 297.0 / 25.4, 420.0 / 25.4),
    ("a4", 210.0 / 25.4, 297.0 / 25.4),
    ("a5", 148.0 / 25.4, 210.0 / 25.4),
    ("b5", 176.0 / 25.4, 250.0 / 25.4),
    ("c5", 162.0 / 25.4, 229.0 / 25.4),
];

/// Parses the value of a `papersize=` escape.
///
/// The value is either `width,height` or a named paper size.
/// A named size with an `l` suffix, like `a4l`, is in landscape orientation.
fn paper_size(value: &str) -> Option<(Length, Length)> {
    if let Some((w, h)) = value.split_once(',') {
        return Some((Length::parse(w)?, Length::parse(h)?));
    }
    let lower = value.trim().to_ascii_lowercase();
    let lookup = |name: &str| {
        PAPER_SIZES
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|&(_, w, h)| (Length::Inches(w), Length::Inches(h)))
    };
    if let Some(size) = lookup(&lower) {
        return Some(size);
    }
    let (w, h) = lookup(lower.strip_suffix('l')?)?;
    Some((h, w))
}

/// Where a link points.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Uri(String),
    /// A named destination in the document.
    Destination(String),
}

/// Arguments of a `pdf: markstart` escape, which begins a link.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkStart {
    /// Distance of the top of the hotspot above the baseline.
    pub rst: i32,
    /// Distance of the bottom of the hotspot below the baseline.
    pub rsb: i32,
    /// Line spacing; used when the link wraps onto a new line.
    pub leading: i32,
    pub target: Option<Target>,
    /// Values of the `/Border` array, if any.
    pub border: Vec<f64>,
    /// Values of the `/Color` array, if any, each between 0 and 1.
    pub colour: Vec<f64>,
    /// The text of the escape after the `markstart` keyword.
    ///
    /// This is needed to restart the link after a line wrap.
    pub raw: String,
}

impl MarkStart {
    fn parse(raw: &str) -> MarkStart {
        let mut words = raw.split_whitespace();
        let mut int = || {
            words
                .next()
                .and_then(|w| w.parse::<f64>().ok())
                .map(|n| n.round() as i32)
                .unwrap_or(0)
        };
        let (rst, rsb, leading) = (int(), int(), int());
        let dict = Object::Dict(pdf::parse_entries(raw));
        let target = if let Some(uri) = dict.find("URI").and_then(Object::as_text) {
            Some(Target::Uri(uri.to_string()))
        } else {
            dict.find("Dest")
                .or_else(|| dict.find("D"))
                .and_then(Object::as_text)
                .map(|d| Target::Destination(d.to_string()))
        };
        MarkStart {
            rst,
            rsb,
            leading,
            target,
            border: dict
                .find("Border")
                .and_then(Object::as_numbers)
                .unwrap_or_default(),
            colour: dict
                .find("Color")
                .and_then(Object::as_numbers)
                .unwrap_or_default(),
            raw: raw.to_string(),
        }
    }
}

/// The pieces of a `ps:exec` escape that affect rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PsExec {
    /// Rotation in degrees, from `<angle> rotate`.
    pub rotate: Option<f64>,
    /// From `<n> setlinecap`.
    pub line_cap: Option<i32>,
    /// From `<n> setlinejoin`.
    pub line_join: Option<i32>,
}

impl PsExec {
    fn parse(code: &str) -> PsExec {
        let mut exec = PsExec::default();
        let words: Vec<&str> = code.split_whitespace().collect();
        for pair in words.windows(2) {
            let Ok(n) = pair[0].parse::<f64>() else {
                continue;
            };
            match pair[1] {
                "rotate" => exec.rotate = Some(n),
                "setlinecap" => exec.line_cap = Some(n as i32),
                "setlinejoin" => exec.line_join = Some(n as i32),
                _ => {}
            }
        }
        exec
    }
}

/// A device escape from an `x X` command.
#[derive(Clone, Debug, PartialEq)]
pub enum Escape {
    /// `ps:invis`: stop drawing until `ps:endinvis`.
    Invisible,
    EndInvisible,
    /// `ps:exec <code>`. The raw code is kept for pdfmark scanning.
    Exec(PsExec, String),
    MarkStart(MarkStart),
    MarkEnd,
    MarkSuspend,
    MarkRestart,
    /// `pdf: xrev`: toggle mirrored text.
    Reverse,
    PaperSize(Length, Length),
    /// `tty: sgr <n>`: enable or disable SGR output.
    Sgr(bool),
    /// Any other escape, kept verbatim.
    Other(String),
}

impl Escape {
    /// Parses the text of an `x X` command.
    ///
    /// ```
    /// use ditroff::control::Escape;
    /// assert_eq!(Escape::parse("ps:invis"), Escape::Invisible);
    /// assert_eq!(Escape::parse("devtag:.NH 1"), Escape::Other("devtag:.NH 1".into()));
    /// ```
    pub fn parse(text: &str) -> Escape {
        let text = text.trim();
        if let Some(value) = text.strip_prefix("papersize=") {
            return match paper_size(value) {
                Some((w, h)) => Escape::PaperSize(w, h),
                None => Escape::Other(text.to_string()),
            };
        }
        let Some((tag, rest)) = text.split_once(':') else {
            return Escape::Other(text.to_string());
        };
        let rest = rest.trim_start();
        let (keyword, args) = rest
            .split_once(char::is_whitespace)
            .map(|(k, a)| (k, a.trim()))
            .unwrap_or((rest, ""));
        match (tag, keyword) {
            ("ps", "invis") => Escape::Invisible,
            ("ps", "endinvis") => Escape::EndInvisible,
            ("ps", "exec") => Escape::Exec(PsExec::parse(args), args.to_string()),
            ("pdf", "markstart") => Escape::MarkStart(MarkStart::parse(args)),
            ("pdf", "markend") => Escape::MarkEnd,
            ("pdf", "marksuspend") => Escape::MarkSuspend,
            ("pdf", "markrestart") => Escape::MarkRestart,
            ("pdf", "xrev") => Escape::Reverse,
            ("tty", "sgr") => Escape::Sgr(args.parse::<i32>().map(|n| n != 0).unwrap_or(true)),
            _ => Escape::Other(text.to_string()),
        }
    }
}

/// A device control command.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceControl {
    /// `x T <name>`: the output device.
    Device(String),
    /// `x res <n> <h> <v>`.
    Resolution(Resolution),
    /// `x init`.
    Init,
    /// `x font <index> <name>`: mount a font.
    MountFont { index: i32, name: String },
    /// `x F <name>`: the name of the source file.
    SourceFile(String),
    /// `x H <n>`: the character height; 0 restores the type size.
    CharHeight(i32),
    /// `x S <n>`: the slant in degrees.
    Slant(i32),
    /// `x X <escape>`.
    Escape(Escape),
    /// `x pause`.
    Pause,
    /// `x stop`: the end of the document.
    Stop,
    /// `x trailer`.
    Trailer,
    /// Any other command, kept verbatim.
    Other(String),
}

impl DeviceControl {
    /// Parses the operand of an `x` command.
    ///
    /// Missing or malformed numbers are 0.
    pub fn parse(operand: &str) -> DeviceControl {
        let operand = operand.trim();
        let (command, args) = operand
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((operand, ""));
        let mut words = args.split_whitespace();
        let mut int = || words.next().and_then(|w| w.parse::<i32>().ok()).unwrap_or(0);
        match command.chars().next() {
            Some('T') => DeviceControl::Device(args.to_string()),
            Some('r') => DeviceControl::Resolution(Resolution {
                units_per_inch: int(),
                horizontal: int(),
                vertical: int(),
            }),
            Some('i') => DeviceControl::Init,
            Some('f') => {
                let index = int();
                let name = words.next().unwrap_or_default().to_string();
                DeviceControl::MountFont { index, name }
            }
            Some('F') => DeviceControl::SourceFile(args.to_string()),
            Some('H') => DeviceControl::CharHeight(int()),
            Some('S') => DeviceControl::Slant(int()),
            Some('X') => DeviceControl::Escape(Escape::parse(args)),
            Some('p') => DeviceControl::Pause,
            Some('s') => DeviceControl::Stop,
            Some('t') => DeviceControl::Trailer,
            _ => DeviceControl::Other(operand.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! control_tests {
        ( $( ($name: ident, $input: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(DeviceControl::parse($input), $want);
                }
            )+
        };
    }

    control_tests!(
        (device, "T ascii", DeviceControl::Device("ascii".into())),
        (
            resolution,
            "res 240 24 40",
            DeviceControl::Resolution(Resolution {
                units_per_inch: 240,
                horizontal: 24,
                vertical: 40
            })
        ),
        (
            resolution_abbreviated,
            "r 72000 1 1",
            DeviceControl::Resolution(Resolution::default())
        ),
        (init, "init", DeviceControl::Init),
        (
            mount_font,
            "font 5 ZD",
            DeviceControl::MountFont {
                index: 5,
                name: "ZD".into()
            }
        ),
        (
            mount_font_missing_name,
            "font 5",
            DeviceControl::MountFont {
                index: 5,
                name: "".into()
            }
        ),
        (
            source_file,
            "F doc.ms",
            DeviceControl::SourceFile("doc.ms".into())
        ),
        (char_height, "H 12000", DeviceControl::CharHeight(12000)),
        (slant, "S -15", DeviceControl::Slant(-15)),
        (slant_malformed, "S x", DeviceControl::Slant(0)),
        (pause, "pause", DeviceControl::Pause),
        (stop, "stop", DeviceControl::Stop),
        (trailer, "trailer", DeviceControl::Trailer),
        (unknown, "u 1", DeviceControl::Other("u 1".into())),
        (
            escape,
            "X ps:endinvis",
            DeviceControl::Escape(Escape::EndInvisible)
        ),
    );

    #[test]
    fn ps_exec() {
        let Escape::Exec(exec, code) = Escape::parse("ps:exec gsave -90 rotate 1 setlinecap 2 setlinejoin") else {
            panic!("not an exec escape");
        };
        assert_eq!(
            exec,
            PsExec {
                rotate: Some(-90.0),
                line_cap: Some(1),
                line_join: Some(2),
            }
        );
        assert_eq!(code, "gsave -90 rotate 1 setlinecap 2 setlinejoin");
    }

    #[test]
    fn mark_start_uri() {
        let Escape::MarkStart(mark) = Escape::parse(
            "pdf: markstart 5000 -1000 12000 /Subtype /Link /Action << /Subtype /URI /URI (https://example.com) >> /Border [0 0 1] /Color [0 0 1]",
        ) else {
            panic!("not a markstart escape");
        };
        assert_eq!(mark.rst, 5000);
        assert_eq!(mark.rsb, -1000);
        assert_eq!(mark.leading, 12000);
        assert_eq!(mark.target, Some(Target::Uri("https://example.com".into())));
        assert_eq!(mark.border, vec![0.0, 0.0, 1.0]);
        assert_eq!(mark.colour, vec![0.0, 0.0, 1.0]);
        assert!(mark.raw.starts_with("5000 -1000 12000"));
    }

    #[test]
    fn mark_start_destination() {
        let Escape::MarkStart(mark) =
            Escape::parse("pdf: markstart 10 20 30 /Subtype /Link /Dest /intro")
        else {
            panic!("not a markstart escape");
        };
        assert_eq!(mark.target, Some(Target::Destination("intro".into())));
        assert_eq!(mark.border, Vec::<f64>::new());
    }

    #[test]
    fn mark_lifecycle() {
        assert_eq!(Escape::parse("pdf: markend"), Escape::MarkEnd);
        assert_eq!(Escape::parse("pdf: marksuspend"), Escape::MarkSuspend);
        assert_eq!(Escape::parse("pdf: markrestart"), Escape::MarkRestart);
        assert_eq!(Escape::parse("pdf: xrev"), Escape::Reverse);
    }

    #[test]
    fn sgr() {
        assert_eq!(Escape::parse("tty: sgr 0"), Escape::Sgr(false));
        assert_eq!(Escape::parse("tty: sgr 1"), Escape::Sgr(true));
    }

    #[test]
    fn papersize_explicit() {
        assert_eq!(
            Escape::parse("papersize=8.5i,11i"),
            Escape::PaperSize(Length::Inches(8.5), Length::Inches(11.0))
        );
        assert_eq!(
            Escape::parse("papersize=612000,792000"),
            Escape::PaperSize(Length::DeviceUnits(612000.0), Length::DeviceUnits(792000.0))
        );
    }

    #[test]
    fn papersize_named() {
        let Escape::PaperSize(w, h) = Escape::parse("papersize=A4") else {
            panic!("not a papersize escape");
        };
        assert_eq!(w.to_device_units(72000), 595276);
        assert_eq!(h.to_device_units(72000), 841890);
    }

    #[test]
    fn papersize_landscape() {
        assert_eq!(
            Escape::parse("papersize=letterl"),
            Escape::PaperSize(Length::Inches(11.0), Length::Inches(8.5))
        );
    }

    #[test]
    fn papersize_invalid() {
        assert_eq!(
            Escape::parse("papersize=huge"),
            Escape::Other("papersize=huge".into())
        );
    }

    #[test]
    fn centimetres() {
        assert_eq!(Length::parse("2.54c"), Some(Length::Inches(1.0)));
        assert_eq!(Length::Inches(1.0).to_device_units(240), 240);
    }
}
