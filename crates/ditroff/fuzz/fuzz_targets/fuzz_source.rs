#![no_main]

use libfuzzer_sys::fuzz_target;

// Arbitrary text is tokenized and rendered by every renderer.
fuzz_target!(|source: &str| {
    let tokens = ditroff::tokenize(source);
    let mut last = None;
    for token in &tokens {
        assert!(token.offset < source.len(), "{token:?}");
        assert!(source.is_char_boundary(token.offset), "{token:?}");
        if let Some(last) = last {
            assert!(last < token.offset, "{tokens:?}");
        }
        last = Some(token.offset);
    }

    let mut tty = ditroff_tty::TtyRenderer::default();
    if tty.process(source).is_ok() {
        tty.to_ansi();
        tty.to_text();
    }

    let mut vector = ditroff_vector::VectorRenderer::default();
    vector.process(source);
    for n in 1..=vector.page_count() {
        let mut surface = ditroff_vector::RecordingSurface::new();
        vector.render_page(n, &mut surface).unwrap();
    }
});
