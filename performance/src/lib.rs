use rand::prelude::Distribution;
use rand::Rng;
use std::io::Write;
use std::process::Command;
use std::process::Stdio;

pub fn tokenize_in_ditroff(input: &str) -> usize {
    ditroff::Tokenizer::new(input).count()
}

pub fn interpret_in_ditroff(input: &str) {
    let mut interpreter = ditroff::Interpreter::new();
    interpreter
        .run(&mut ditroff::NullSink, input)
        .unwrap_or_else(|never| match never {});
}

pub fn render_in_ditroff_tty(input: &str) -> String {
    let mut renderer = ditroff_tty::TtyRenderer::default();
    renderer.process(input).unwrap();
    renderer.to_ansi()
}

pub fn render_in_ditroff_vector(input: &str) {
    let mut renderer = ditroff_vector::VectorRenderer::default();
    renderer.process(input);
    for n in 1..=renderer.page_count() {
        let mut surface = ditroff_vector::RecordingSurface::new();
        renderer.render_page(n, &mut surface).unwrap();
    }
}

pub fn host_has_grotty() -> bool {
    Command::new("which")
        .arg("grotty")
        .spawn()
        .expect("`which grotty` command failed to start")
        .wait()
        .expect("failed to run `which grotty`")
        .success()
}

pub fn run_in_grotty(input: &str) {
    let mut child = Command::new("grotty")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .expect("grotty command failed to start");
    let child_stdin = child.stdin.as_mut().unwrap();
    child_stdin
        .write_all(input.as_bytes())
        .expect("failed to write to grotty");
    child.wait().expect("Failed to run grotty");
}

static RANDOM_GLYPH_NAMES: [&str; 12] = [
    "hy", "em", "en", "bu", "co", "rg", "*a", "*b", "<=", ">=", "u2022", "xyzzy",
];

static RANDOM_WORDS: [&str; 16] = [
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "ditroff", "groff",
    "device", "independent", "output", "glyph", "page", "ligature",
];

pub struct Weights {
    pub text: u32,
    pub tracked_text: u32,
    pub move_print: u32,
    pub char_named: u32,
    pub horizontal_move: u32,
    pub word_space: u32,
    pub font: u32,
    pub colour: u32,
    pub line: u32,
    pub shape: u32,
    pub device_control: u32,
    pub comment: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            text: 100,
            tracked_text: 5,
            move_print: 100,
            char_named: 20,
            horizontal_move: 50,
            word_space: 50,
            font: 10,
            colour: 5,
            line: 10,
            shape: 5,
            device_control: 5,
            comment: 1,
        }
    }
}

/// Generates a document in the format groff writes for the `utf8` device.
pub fn generate_random_ditroff_document(
    rng: &mut rand::prelude::StdRng,
    num_bytes: usize,
    lines_per_page: usize,
    weights: &Weights,
) -> String {
    let mut result = String::with_capacity(num_bytes + 1000);
    result.push_str("x T utf8\nx res 240 24 40\nx init\n");
    result.push_str("x font 1 R\nx font 2 I\nx font 3 B\nx font 4 BI\n");
    // Lines are 80 columns wide at 24 units per column.
    let line_length_bounds = (600, 1920);
    let mut page = 0;
    while result.len() < num_bytes {
        page += 1;
        result.push_str(&format!["p{page}\nf1\ns10\n"]);
        for line in 0..lines_per_page {
            if result.len() >= num_bytes {
                break;
            }
            let v = 40 * (line + 1);
            result.push_str(&format!["V{v}\nH0\n"]);
            let line_length = rng.gen_range(line_length_bounds.0..line_length_bounds.1);
            result.push_str(&generate_random_ditroff_line(rng, line_length, weights));
            result.push_str("n40 0\n");
        }
    }
    result.push_str("x trailer\nV2640\nx stop\n");
    result
}

/// Generates the commands of one output line, up to a horizontal position.
pub fn generate_random_ditroff_line(
    rng: &mut rand::prelude::StdRng,
    line_length: usize,
    weights: &Weights,
) -> String {
    let dist = rand::distributions::WeightedIndex::new([
        weights.text,
        weights.tracked_text,
        weights.move_print,
        weights.char_named,
        weights.horizontal_move,
        weights.word_space,
        weights.font,
        weights.colour,
        weights.line,
        weights.shape,
        weights.device_control,
        weights.comment,
    ])
    .unwrap();

    let mut result = String::new();
    let mut h: usize = 0;
    while h < line_length {
        let word = RANDOM_WORDS[rng.gen_range(0..RANDOM_WORDS.len())];
        match dist.sample(rng) {
            0 => {
                result.push_str(&format!["t{word}\n"]);
                h += 24 * word.len();
            }
            1 => {
                result.push_str(&format!["u24 {word}\n"]);
                h += 48 * word.len();
            }
            2 => {
                let c = char::from_u32(97 + rng.gen_range(0..26)).unwrap();
                result.push_str(&format!["24{c}"]);
                h += 24;
            }
            3 => {
                let name = RANDOM_GLYPH_NAMES[rng.gen_range(0..RANDOM_GLYPH_NAMES.len())];
                result.push_str(&format!["C{name}\nh24\n"]);
                h += 24;
            }
            4 => {
                let dh = 24 * rng.gen_range(1..4);
                result.push_str(&format!["h{dh}"]);
                h += dh;
            }
            5 => {
                result.push_str("wh24");
                h += 24;
            }
            6 => {
                result.push_str(&format!["f{}\n", rng.gen_range(1..5)]);
            }
            7 => {
                let (r, g, b) = (rng.gen::<u16>(), rng.gen::<u16>(), rng.gen::<u16>());
                result.push_str(&format!["mr {r} {g} {b}\n"]);
            }
            8 => {
                let n = rng.gen_range(1..10);
                if rng.gen_bool(0.5) {
                    result.push_str(&format!["Dl {} 0\n", 24 * n]);
                    h += 24 * n;
                } else {
                    result.push_str(&format!["Dl 0 {}\n", 40 * n]);
                }
            }
            9 => {
                let d = 24 * rng.gen_range(1..10);
                match rng.gen_range(0..4) {
                    0 => result.push_str(&format!["Dc {d}\n"]),
                    1 => result.push_str(&format!["De {d} {}\n", d / 2]),
                    2 => result.push_str(&format!["Da 0 {d} {d} 0\n"]),
                    _ => result.push_str(&format!["D~ {d} 0 0 {d} {d} 0\n"]),
                }
                h += d;
            }
            10 => {
                result.push_str(&format!["x X ps:exec [/Dest /{word}{h} /DEST pdfmark\n"]);
            }
            _ => {
                result.push_str(&format!["# {word}\n"]);
            }
        }
    }
    result.push('\n');
    result
}
