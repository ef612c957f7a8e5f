use clap::{CommandFactory, Parser};
use dotfont::{ControlPoint, DotConfig, DotError, GlyphDots};
use norad::Glyph;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(
    name = "dotfont",
    about = "Create a dotted font from a UFO font: strokes become dots along the stroke skeleton"
)]
struct Cli {
    /// Input UFO font
    input: Option<PathBuf>,

    /// Optional glyph to render alone (name or U+XXXX codepoint); prints
    /// the dot count instead of writing a font. Useful when tweaking
    /// radius and spacing.
    glyph: Option<String>,

    /// Output UFO path
    #[arg(short, long, default_value = "dotted.ufo")]
    output: PathBuf,

    /// Radius of dots, in em units
    #[arg(short, long, default_value = "12")]
    radius: f64,

    /// Spacing of dots, as a multiple of the radius
    #[arg(short, long, default_value = "6.0")]
    spacing: f64,

    /// Lower stroke-width bound (fine-tuning, advanced usage only)
    #[arg(short = 'm', long, default_value = "1")]
    min_stroke_width: f64,

    /// Upper stroke-width bound (fine-tuning, advanced usage only)
    #[arg(short = 'M', long, default_value = "1e100")]
    max_stroke_width: f64,

    /// Per-glyph timeout in seconds; triangulation of malformed outlines
    /// can degrade badly
    #[arg(long, default_value = "30")]
    timeout: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(input) = cli.input.clone() else {
        let _ = Cli::command().print_help();
        return ExitCode::from(2);
    };

    match run(&cli, &input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, input: &PathBuf) -> Result<(), DotError> {
    let config = DotConfig {
        radius: cli.radius,
        spacing: cli.spacing,
        min_stroke_width: cli.min_stroke_width,
        max_stroke_width: cli.max_stroke_width,
        ..DotConfig::default()
    };
    let timeout = Duration::from_secs_f64(cli.timeout);

    let font = norad::Font::load(input)?;

    match &cli.glyph {
        Some(selector) => demo_glyph(&font, selector, &config, timeout),
        None => dot_font(cli, font, &config, timeout),
    }
}

/// Process one glyph and print the dot count.
fn demo_glyph(
    font: &norad::Font,
    selector: &str,
    config: &DotConfig,
    timeout: Duration,
) -> Result<(), DotError> {
    let glyph = find_glyph(font, selector)
        .ok_or_else(|| DotError::GlyphNotFound(selector.to_string()))?;
    let result = dot_with_timeout(dotfont::ufo::glyph_contours(glyph), config.clone(), timeout)?;
    report_glyph(glyph.name().as_str(), &result);
    println!("{} dots found", result.dots.len());
    Ok(())
}

/// Batch mode: dot every glyph and write the output font.
fn dot_font(
    cli: &Cli,
    font: norad::Font,
    config: &DotConfig,
    timeout: Duration,
) -> Result<(), DotError> {
    let t_start = Instant::now();

    // One glyph's full pipeline is the unit of work. Glyphs are
    // independent, so they fan out across the pool; font writing is not
    // thread-safe and happens sequentially afterwards.
    let jobs: Vec<(Glyph, Vec<Vec<ControlPoint>>)> = font
        .default_layer()
        .iter()
        .filter(|g| !matches!(g.name().as_str(), ".notdef" | ".null"))
        .map(|g| (g.clone(), dotfont::ufo::glyph_contours(g)))
        .collect();
    let total = jobs.len();

    let results: Vec<(Glyph, Result<GlyphDots, DotError>)> = jobs
        .into_par_iter()
        .map(|(glyph, contours)| {
            let result = dot_with_timeout(contours, config.clone(), timeout);
            (glyph, result)
        })
        .collect();

    let mut out_font = font.clone();
    let mut failures: Vec<(String, DotError)> = Vec::new();
    for (glyph, result) in results {
        match result {
            Ok(dots) => {
                report_glyph(glyph.name().as_str(), &dots);
                let dotted = dotfont::ufo::dotted_glyph(&glyph, &dots.dots, config.radius);
                out_font.default_layer_mut().insert_glyph(dotted);
            }
            Err(e) => {
                // Failed glyphs keep their original outline in the output.
                eprintln!("  {:24} failed: {e}", glyph.name().as_str());
                failures.push((glyph.name().as_str().to_string(), e));
            }
        }
    }

    out_font.save(&cli.output)?;

    let elapsed = t_start.elapsed().as_millis();
    eprintln!();
    eprintln!(
        "  {} glyphs dotted, {} failed  ({}ms)",
        total - failures.len(),
        failures.len(),
        elapsed,
    );
    for (name, error) in &failures {
        eprintln!("    {name}: {error}");
    }
    eprintln!("  \u{2713} {}", cli.output.display());
    Ok(())
}

/// Run one glyph's pipeline on a worker thread with a deadline.
fn dot_with_timeout(
    contours: Vec<Vec<ControlPoint>>,
    config: DotConfig,
    timeout: Duration,
) -> Result<GlyphDots, DotError> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(dotfont::dot_glyph(&contours, &config));
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(DotError::Timeout(timeout)),
    }
}

/// Per-glyph progress line: dot count plus any skips and warnings.
fn report_glyph(name: &str, result: &GlyphDots) {
    eprintln!("  {:24} {:>5} dots", name, result.dots.len());
    for skip in &result.skipped {
        eprintln!("    contour {} skipped: {}", skip.contour, skip.reason);
    }
    for warning in &result.warnings {
        eprintln!("    warning: {warning}");
    }
}

/// Find a glyph by name, or by codepoint when the selector is U+XXXX.
fn find_glyph<'a>(font: &'a norad::Font, selector: &str) -> Option<&'a Glyph> {
    if let Some(glyph) = font.default_layer().iter().find(|g| g.name().as_str() == selector) {
        return Some(glyph);
    }
    let hex = selector.strip_prefix("U+").or_else(|| selector.strip_prefix("u+"))?;
    let codepoint = u32::from_str_radix(hex, 16).ok()?;
    let target = char::from_u32(codepoint)?;
    font.default_layer()
        .iter()
        .find(|g| g.codepoints.contains(target))
}
