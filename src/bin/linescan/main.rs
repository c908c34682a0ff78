//! Command-line front end for document structure detection.
//!
//! ```bash
//! linescan scans/                    # folder of images
//! linescan report.pdf -o out.json    # every page of a PDF
//! linescan page.png --save-visualization
//! ```

use clap::Parser;
use linescan::utils::init_tracing;
use linescan::{
    process_folder, process_pdf, process_single_image, BatchOutcome, DetectError, DetectionParams,
    JobOptions,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "linescan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Detect horizontal lines and rectangles in scanned documents", long_about = None)]
struct Cli {
    /// Image file, folder of images, or PDF to analyze
    input: PathBuf,

    /// Where to write the JSON report (default: next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum line width as a fraction of image width
    #[arg(long, default_value_t = DetectionParams::default().min_line_width_ratio)]
    min_width_ratio: f64,

    /// Maximum line height in pixels
    #[arg(long, default_value_t = DetectionParams::default().max_line_height)]
    max_height: u32,

    /// Minimum rectangle area as a fraction of image area
    #[arg(long, default_value_t = DetectionParams::default().min_rect_area_ratio)]
    min_rect_area: f64,

    /// Maximum rectangle area as a fraction of image area
    #[arg(long, default_value_t = DetectionParams::default().max_rect_area_ratio)]
    max_rect_area: f64,

    /// Dump intermediate masks into this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Save an annotated copy of each processed image next to its source
    #[arg(long)]
    save_visualization: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "job failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), DetectError> {
    let params = DetectionParams {
        min_line_width_ratio: cli.min_width_ratio,
        max_line_height: cli.max_height,
        min_rect_area_ratio: cli.min_rect_area,
        max_rect_area_ratio: cli.max_rect_area,
    };
    let opts = JobOptions {
        debug_dir: cli.debug_dir.clone(),
        save_visualization: cli.save_visualization,
        ..JobOptions::default()
    };

    let mut last_reported = 0usize;
    let mut progress = |done: usize, total: usize| {
        // Log every item for small jobs, every tenth for large ones.
        if total <= 20 || done - last_reported >= total / 10 || done == total {
            info!(done, total, "progress");
            last_reported = done;
        }
    };

    let outcome = dispatch(&cli.input, &params, &opts, &mut progress)?;

    for skip in &outcome.skipped {
        warn!(item = %skip.item, reason = %skip.reason, "item skipped");
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));
    outcome.results.write_json(&output)?;
    info!(
        output = %output.display(),
        entries = outcome.results.len(),
        skipped = outcome.skipped.len(),
        "report written"
    );
    Ok(())
}

fn dispatch(
    input: &Path,
    params: &DetectionParams,
    opts: &JobOptions,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<BatchOutcome, DetectError> {
    if input.is_dir() {
        process_folder(input, params, opts, Some(progress))
    } else if is_pdf_path(input) {
        process_pdf(input, params, opts, Some(progress))
    } else {
        process_single_image(input, params, opts, Some(progress))
    }
}

fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// `<stem>_structures.json` next to a file input, `structures.json`
/// inside a folder input.
fn default_output(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.join("structures.json")
    } else {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        input.with_file_name(format!("{stem}_structures.json"))
    }
}
