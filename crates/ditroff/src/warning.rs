//! Warnings generated while interpreting ditroff.
//!
//! Interpretation never fails on malformed input.
//! Instead, each problem is recorded as a [`Warning`] and a fallback is used.

/// Warning generated while interpreting ditroff.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Warning {
    /// Location of the command that generated this warning.
    ///
    /// The span is in bytes.
    pub span: std::ops::Range<usize>,
    /// Kind of the warning.
    pub kind: WarningKind,
}

/// Kind of warning.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum WarningKind {
    /// A `C` command names a glyph that cannot be resolved.
    /// Nothing is printed.
    UnknownGlyph { name: String },
    /// An `N` command has an index that is not a Unicode scalar value.
    /// Nothing is printed.
    InvalidGlyphIndex { index: i64 },
    /// A numeric operand is missing or malformed. The value 0 is used.
    InvalidNumber { text: String },
    /// A colour command uses an unknown colour scheme.
    /// The colour is not changed.
    UnknownColourScheme { scheme: String },
    /// A `D` command has an unknown subcommand letter.
    /// Nothing is drawn.
    UnknownDrawing { command: String },
    /// An `f` command selects a font position with no font mounted.
    UnmountedFont { index: i32 },
}

impl WarningKind {
    /// Returns a human readable description of the problem.
    pub fn message(&self) -> String {
        use WarningKind::*;
        match self {
            UnknownGlyph { name } => format!["unknown glyph name `{name}`"],
            InvalidGlyphIndex { index } => format!["glyph index {index} is not a valid character"],
            InvalidNumber { text } => {
                if text.is_empty() {
                    "missing number".to_string()
                } else {
                    format!["invalid number `{text}`"]
                }
            }
            UnknownColourScheme { scheme } => format!["unknown colour scheme `{scheme}`"],
            UnknownDrawing { command } => format!["unknown drawing command `D{command}`"],
            UnmountedFont { index } => format!["no font is mounted at position {index}"],
        }
    }

    /// Returns a description of what the interpreter did instead.
    pub fn action(&self) -> &'static str {
        use WarningKind::*;
        match self {
            UnknownGlyph { .. } | InvalidGlyphIndex { .. } => "nothing is printed",
            InvalidNumber { .. } => "the value 0 is used",
            UnknownColourScheme { .. } => "the colour is not changed",
            UnknownDrawing { .. } => "nothing is drawn",
            UnmountedFont { .. } => "the font is selected without a name",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (byte {}); {}",
            self.kind.message(),
            self.span.start,
            self.kind.action()
        )
    }
}

impl Warning {
    pub fn new(span: std::ops::Range<usize>, kind: WarningKind) -> Warning {
        Warning { span, kind }
    }

    /// Builds an ariadne report for this warning.
    ///
    /// Ariadne works in characters rather than bytes, so the source is
    ///     needed to convert the span.
    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'a>(
        &self,
        file_name: &'a str,
        source: &str,
    ) -> ariadne::Report<'static, (&'a str, std::ops::Range<usize>)> {
        let to_chars = |b: usize| {
            let b = b.min(source.len());
            source
                .char_indices()
                .take_while(|(i, _)| *i < b)
                .count()
        };
        let span = to_chars(self.span.start)..to_chars(self.span.end);
        let message = self.kind.message();
        ariadne::Report::build(ariadne::ReportKind::Warning, (file_name, span.clone()))
            .with_message(&message)
            .with_label(
                ariadne::Label::new((file_name, span))
                    .with_message(message)
                    .with_color(ariadne::Color::BrightYellow),
            )
            .with_note(self.kind.action())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let warning = Warning::new(
            4..7,
            WarningKind::UnknownGlyph {
                name: "zz".to_string(),
            },
        );
        assert_eq!(
            format!["{warning}"],
            "unknown glyph name `zz` (byte 4); nothing is printed"
        );
    }

    #[test]
    fn missing_number() {
        let kind = WarningKind::InvalidNumber {
            text: "".to_string(),
        };
        assert_eq!(kind.message(), "missing number");
    }
}
