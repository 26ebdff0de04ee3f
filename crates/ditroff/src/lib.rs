//! # Ditroff
//!
//! This crate implements a tokenizer and interpreter for ditroff,
//! the device-independent output format of troff and groff.
//! Ditroff is what `groff -Z` prints: a line oriented stream of
//! short commands that position and print glyphs, draw shapes and
//! pass information to the output device.
//!
//! Interpretation happens in two stages:
//!
//! - The [`Tokenizer`] splits the source text into [`Token`]s.
//!     Each token has a [`TokenKind`] and the raw text of its operand.
//!
//! - The [`Interpreter`] decodes each token's operand and calls the
//!     corresponding method of a [`Sink`]. Renderers implement this trait.
//!
//! Neither stage fails on malformed input.
//! Problems are recorded as [`Warning`]s and a fallback is used.
//! The only errors are the ones returned by the sink itself.
//!
//! ```
//! use ditroff::{Interpreter, TraceSink};
//! let mut sink = TraceSink::default();
//! let mut interpreter = Interpreter::new();
//! interpreter.run(&mut sink, "p1\nV40\nH0\ntHello\nn40 0\n").unwrap();
//! assert_eq!(sink.lines[3], r#"text_run [Text("Hello")]"#);
//! ```
//!
//! ## Format summary
//!
//! | command | meaning |
//! |---------|---------|
//! | `p<n>` | begin page _n_ |
//! | `s<n>` | set the type size |
//! | `f<n>` | select the font mounted at position _n_ |
//! | `c<char>` | print a character |
//! | `C<name>` | print a named glyph; see [`glyph`] |
//! | `N<n>` | print the glyph with index _n_ |
//! | `H<n>`, `V<n>` | absolute horizontal and vertical moves |
//! | `h<n>`, `v<n>` | relative horizontal and vertical moves |
//! | `<nn><char>` | move right _nn_ and print a character |
//! | `n<b> <a>` | end of line |
//! | `w` | word space |
//! | `D<args>` | draw; see [`draw`] |
//! | `m<scheme> <args>` | set the colour; see [`colour`] |
//! | `t<text>` | print text |
//! | `u<n> <text>` | print text with tracking |
//! | `x <args>` | device control; see [`control`] |
//! | `#<text>` | comment |

pub mod colour;
pub mod control;
pub mod draw;
pub mod font;
pub mod glyph;
pub mod interpreter;
pub mod lexer;
pub mod outline;
pub mod pdf;
pub mod sink;
pub mod warning;

pub use colour::{Colour, Rgb};
pub use control::Resolution;
pub use draw::Draw;
pub use interpreter::{Anchor, Interpreter};
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use outline::{Outline, OutlineEntry, OutlineNode};
pub use sink::{NullSink, RunPiece, Sink, TraceSink};
pub use warning::{Warning, WarningKind};
