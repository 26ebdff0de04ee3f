use clap::Parser;
use colored::Colorize;
use ditroff::{Interpreter, NullSink, TraceSink, Warning};
use ditroff_vector::surface::RecordingSurface;

fn main() {
    if let Err(err) = Cli::parse().run() {
        if !err.is_empty() {
            eprintln!("{} {err}", "Error:".bright_red().bold());
        }
        std::process::exit(1);
    }
}

/// Tools for working with ditroff files.
///
/// Ditroff is the device-independent output of troff and groff,
///     as printed by `groff -Z`.
#[derive(Debug, Parser)]
#[command(
    name = "ditrofftools",
    author = "The Texcraft Project",
    version = "0.1",
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Do not print warnings about malformed input.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        let quiet = self.quiet;
        match self.command {
            Command::Anchors(anchors) => anchors.run(quiet),
            Command::Check(check) => check.run(),
            Command::Draw(draw) => draw.run(quiet),
            Command::Outline(outline) => outline.run(quiet),
            Command::Tokens(tokens) => tokens.run(),
            Command::Trace(trace) => trace.run(quiet),
            Command::Tty(tty) => tty.run(quiet),
        }
    }
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Print the named destinations of a ditroff file.
    ///
    /// Each line contains the name of the destination,
    ///     the page it is on counting from 1,
    ///     and its vertical position on the page in device units.
    Anchors(Anchors),

    /// Check that a ditroff file is well formed.
    ///
    /// All warnings are printed, and the command fails if there are any.
    Check(Check),

    /// Print the drawing calls made when rendering a page of a ditroff file.
    ///
    /// The calls are printed one per line, followed by the link hotspots on the page.
    /// Text is measured as if every character were half an em wide.
    Draw(Draw),

    /// Print the document outline (bookmarks) of a ditroff file.
    Outline(Outline),

    /// Print the tokens of a ditroff file.
    ///
    /// Tokens are printed one per line, written back out as ditroff.
    Tokens(Tokens),

    /// Print the sink calls made when interpreting a ditroff file.
    ///
    /// This subcommand is used to debug the interpreter.
    Trace(Trace),

    /// Render a ditroff file for a terminal.
    ///
    /// The input should be generated for one of groff's terminal devices:
    ///
    ///   $ groff -Z -Tutf8 file.ms > file.ditroff
    ///
    /// Box drawing lines are joined up,
    ///     and bold and italic text is styled as in the output of grotty.
    Tty(Tty),
}

/// Reads the file at a path, or standard input if the path is `-`.
fn read(path: &std::path::Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        return match std::io::Read::read_to_string(&mut std::io::stdin(), &mut s) {
            Ok(_) => Ok(s),
            Err(err) => Err(format!("failed to read standard input: {err}")),
        };
    }
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(err) => Err(format!("failed to read `{}`: {}", path.display(), err)),
    }
}

/// Prints warnings to standard error.
fn report(path: &std::path::Path, source: &str, warnings: &[Warning]) -> Result<(), String> {
    let name = path.as_os_str().to_string_lossy();
    let cache: (&str, _) = (&name, ariadne::Source::from(source));
    for warning in warnings {
        warning
            .ariadne_report(&name, source)
            .eprint(cache.clone())
            .map_err(|err| format!("failed to print warning: {err}"))?;
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("failed to serialize output: {err}"))
}

/// Runs the interpreter over a file and returns it for inspection.
fn interpret(path: &std::path::Path, quiet: bool) -> Result<Interpreter, String> {
    let source = read(path)?;
    let mut interpreter = Interpreter::new();
    interpreter
        .run(&mut NullSink, &source)
        .unwrap_or_else(|never| match never {});
    if !quiet {
        report(path, &source, interpreter.warnings())?;
    }
    Ok(interpreter)
}

#[derive(Clone, Debug, Parser)]
struct Anchors {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,

    /// Print the anchors as JSON.
    #[arg(short, long)]
    json: bool,
}

impl Anchors {
    fn run(&self, quiet: bool) -> Result<(), String> {
        let interpreter = interpret(&self.path, quiet)?;
        if self.json {
            println!("{}", to_json(interpreter.anchors())?);
            return Ok(());
        }
        for (name, anchor) in interpreter.anchors() {
            println!("{name} {} {}", anchor.page, anchor.v);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Check {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,
}

impl Check {
    fn run(&self) -> Result<(), String> {
        let interpreter = interpret(&self.path, false)?;
        match interpreter.warnings().len() {
            0 => Ok(()),
            1 => Err("check failure: 1 warning".into()),
            n => Err(format!("check failure: {n} warnings")),
        }
    }
}

#[derive(Clone, Debug, Parser)]
struct Draw {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,

    /// Page to draw, counting from 1.
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Print the calls and hotspots as JSON.
    #[arg(short, long)]
    json: bool,
}

impl Draw {
    fn run(&self, quiet: bool) -> Result<(), String> {
        let source = read(&self.path)?;
        let mut renderer = ditroff_vector::VectorRenderer::default();
        renderer.process(&source);
        if !quiet {
            report(&self.path, &source, renderer.warnings())?;
        }
        let mut surface = RecordingSurface::new();
        let hotspots = renderer
            .render_page(self.page, &mut surface)
            .map_err(|err| err.to_string())?;
        if self.json {
            let value = serde_json::json!({
                "calls": surface.calls,
                "hotspots": hotspots,
            });
            println!("{}", to_json(&value)?);
            return Ok(());
        }
        for call in &surface.calls {
            println!("{call}");
        }
        for hotspot in &hotspots {
            let r = &hotspot.rect;
            println!(
                "hotspot {} {} {} {} {}",
                r.left, r.top, r.right, r.bottom, hotspot.raw
            );
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Outline {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,

    /// Print the outline as JSON.
    #[arg(short, long)]
    json: bool,
}

impl Outline {
    fn run(&self, quiet: bool) -> Result<(), String> {
        let interpreter = interpret(&self.path, quiet)?;
        let outline = interpreter.outline();
        if self.json {
            println!("{}", to_json(&outline)?);
        } else {
            print!("{outline}");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Tokens {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,

    /// Print the tokens as JSON, including their kinds and byte offsets.
    #[arg(short, long)]
    json: bool,
}

impl Tokens {
    fn run(&self) -> Result<(), String> {
        let source = read(&self.path)?;
        let tokens = ditroff::tokenize(&source);
        if self.json {
            println!("{}", to_json(&tokens)?);
            return Ok(());
        }
        for token in &tokens {
            println!("{token}");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Trace {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,
}

impl Trace {
    fn run(&self, quiet: bool) -> Result<(), String> {
        let source = read(&self.path)?;
        let mut sink = TraceSink::default();
        let mut interpreter = Interpreter::new();
        interpreter
            .run(&mut sink, &source)
            .unwrap_or_else(|never| match never {});
        if !quiet {
            report(&self.path, &source, interpreter.warnings())?;
        }
        for line in &sink.lines {
            println!("{line}");
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum TtyFormat {
    /// HTML with <b> and <u> elements, as used by web terminals.
    #[default]
    Html,
    /// Text with ANSI escape sequences.
    Ansi,
    /// Plain text.
    Text,
}

#[derive(Clone, Debug, Parser)]
struct Tty {
    /// Path to the ditroff file, or `-` for standard input.
    path: std::path::PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: TtyFormat,

    /// Keep trailing blank cells and rows.
    #[arg(long)]
    no_trim: bool,

    /// Do not output colours.
    #[arg(long)]
    no_sgr: bool,
}

impl Tty {
    fn run(&self, quiet: bool) -> Result<(), String> {
        let source = read(&self.path)?;
        let options = ditroff_tty::Options {
            trim: !self.no_trim,
            format: match self.format {
                TtyFormat::Html => ditroff_tty::Format::Html,
                TtyFormat::Ansi => ditroff_tty::Format::Ansi,
                TtyFormat::Text => ditroff_tty::Format::Text,
            },
            sgr: !self.no_sgr,
            ..Default::default()
        };
        let mut renderer = ditroff_tty::TtyRenderer::new(options);
        let result = renderer.process(&source);
        if !quiet {
            report(&self.path, &source, renderer.warnings())?;
        }
        result.map_err(|err| err.to_string())?;
        print!("{}", renderer.render());
        Ok(())
    }
}
