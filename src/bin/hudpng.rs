//! hudpng CLI - HUD baseline generator and checker
//!
//! Generates the reference HUD baselines, validates a directory of PNG
//! screenshots against the layout contract, and renders telemetry charts.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::debug;

use hudpng::baseline::{self, CheckOptions};
use hudpng::layout::LayoutContract;
use hudpng::png::{self, DecodeOptions};
use hudpng::{chart, Rect, Rgba};

/// Generate and check HUD baseline PNGs.
#[derive(Parser, Debug)]
#[command(name = "hudpng")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the reference baseline PNGs into a directory
    Generate {
        /// Directory to populate (existing *.png files are removed)
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Validate every PNG in a directory against the layout contract
    Check {
        /// Directory containing baseline PNGs
        #[arg(long, value_name = "DIR", default_value = "dev/screenshots/ui_baseline")]
        images: PathBuf,

        /// Required image size
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        expected: Option<(u32, u32)>,

        /// Region that must stay empty
        #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect)]
        toast: Option<Rect>,

        /// Region that must contain all content, as edges
        #[arg(long, value_name = "L,T,R,B", value_parser = parse_edges)]
        safe_area: Option<Rect>,

        /// Background color (default: each image's top-left pixel)
        #[arg(long, value_name = "COLOR", value_parser = parse_color)]
        background: Option<Rgba>,

        /// Skip chunk CRC verification
        #[arg(long)]
        lax_crc: bool,
    },

    /// Render a line chart from a file with one number per line
    Chart {
        /// Input series
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match init_logging(args.verbose).and_then(|()| run(args)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("installing log subscriber")
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    match args.command {
        Command::Generate { output } => {
            let written = baseline::generate(&output)
                .with_context(|| format!("generating baselines in {}", output.display()))?;
            for path in &written {
                debug!(path = %path.display(), "written");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            images,
            expected,
            toast,
            safe_area,
            background,
            lax_crc,
        } => {
            let defaults = LayoutContract::default();
            let options = CheckOptions {
                contract: LayoutContract {
                    expected_size: expected.unwrap_or(defaults.expected_size),
                    toast_rect: toast.unwrap_or(defaults.toast_rect),
                    safe_area: safe_area.unwrap_or(defaults.safe_area),
                },
                background,
                decode: if lax_crc {
                    DecodeOptions::lax()
                } else {
                    DecodeOptions::default()
                },
            };
            check(images, &options)
        }
        Command::Chart { input, output } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let values = parse_series(&text)?;
            let Some(canvas) = chart::render_line_chart(&values) else {
                bail!("need at least two values to draw a chart, got {}", values.len());
            };
            let bytes = png::encode(&canvas)?;
            fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;
            debug!(path = %output.display(), points = values.len(), "wrote chart");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(images: PathBuf, options: &CheckOptions) -> anyhow::Result<ExitCode> {
    if !images.is_dir() {
        eprintln!("[ui_assert] Missing directory: {}", images.display());
        return Ok(ExitCode::FAILURE);
    }
    let report = match baseline::check_dir(&images, options) {
        Ok(report) => report,
        Err(hudpng::Error::NoBaselines(dir)) => {
            eprintln!("[ui_assert] No PNGs found in {}", dir.display());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    for outcome in &report.outcomes {
        if outcome.passed() {
            println!("[ui_assert] {outcome}");
        } else {
            eprintln!("[ui_assert] {outcome}");
        }
    }
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_series(text: &str) -> anyhow::Result<Vec<f64>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.trim()
                .parse::<f64>()
                .with_context(|| format!("line {}: not a number: {line:?}", i + 1))
        })
        .collect()
}

fn parse_numbers<const N: usize>(s: &str, sep: char) -> Result<[u32; N], String> {
    let parts: Vec<&str> = s.split(sep).map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} values separated by '{sep}', got {s:?}"));
    }
    let mut out = [0u32; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid number {part:?}: {e}"))?;
    }
    Ok(out)
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let [w, h] = parse_numbers::<2>(&s.to_ascii_lowercase(), 'x')?;
    Ok((w, h))
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let [x, y, w, h] = parse_numbers::<4>(s, ',')?;
    Ok(Rect::new(x, y, w, h))
}

fn parse_edges(s: &str) -> Result<Rect, String> {
    let [l, t, r, b] = parse_numbers::<4>(s, ',')?;
    if r < l || b < t {
        return Err(format!("edges must satisfy left <= right and top <= bottom: {s:?}"));
    }
    Ok(Rect::from_edges(l, t, r, b))
}

fn parse_color(s: &str) -> Result<Rgba, String> {
    s.parse().map_err(|e: hudpng::Error| e.to_string())
}
