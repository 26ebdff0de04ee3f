#![no_main]

use ditroff::{Token, TokenKind};
use libfuzzer_sys::fuzz_target;

// Well formed command letters with arbitrary operands.
// This reaches the operand decoders more often than arbitrary text does.
fuzz_target!(|commands: Vec<(TokenKind, String)>| {
    let mut source = String::new();
    for (kind, operand) in commands {
        let operand: String = operand.chars().filter(|c| *c != '\n').collect();
        source.push_str(&Token::new(kind, operand, 0).to_string());
        source.push('\n');
    }

    let mut interpreter = ditroff::Interpreter::new();
    let mut sink = ditroff::TraceSink::default();
    interpreter
        .run(&mut sink, &source)
        .unwrap_or_else(|never| match never {});
    for warning in interpreter.warnings() {
        assert!(warning.span.start < source.len(), "{warning:?}");
    }

    let mut tty = ditroff_tty::TtyRenderer::default();
    if tty.process(&source).is_ok() {
        tty.to_html();
    }

    let mut vector = ditroff_vector::VectorRenderer::default();
    vector.process(&source);
    for n in 1..=vector.page_count() {
        let mut surface = ditroff_vector::RecordingSurface::new();
        vector.render_page(n, &mut surface).unwrap();
    }
});
