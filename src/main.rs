use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use plotkit::{init_logging, merge_streams, process_stream, InkPolicy, PassParams};
use plotkit_settings::{Config, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(
    name = "plotkit",
    version,
    about = "G-code post-processor for pen-plotter writing machines"
)]
struct Cli {
    /// Emit debug logs
    #[arg(long, global = true)]
    verbose: bool,

    /// Configuration file (created with defaults when missing)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Post-process one G-code file with stroke-triggered ink insertion
    Post {
        /// Input G-code file
        #[arg(long)]
        input: PathBuf,
        /// Output G-code file
        #[arg(long)]
        output: PathBuf,
        /// Draw moves between ink insertions
        #[arg(long)]
        stroke_interval: Option<u32>,
        /// Paper macro after every N ink insertions (0 disables)
        #[arg(long)]
        paper_every: Option<u32>,
        /// Pen-up Z height override
        #[arg(long)]
        pen_up: Option<f64>,
        /// Pen-down Z height override
        #[arg(long)]
        pen_down: Option<f64>,
        /// Default feed rate override
        #[arg(long)]
        feedrate: Option<f64>,
    },
    /// Merge a writing and a drawing G-code file around one paper change
    Merge {
        /// Writing-pass G-code file
        #[arg(long)]
        writing: PathBuf,
        /// Drawing-pass G-code file
        #[arg(long)]
        drawing: PathBuf,
        /// Output G-code file
        #[arg(long)]
        output: PathBuf,
        /// Paper macro after every N ink insertions (0 disables)
        #[arg(long)]
        paper_every: Option<u32>,
        /// Pen-up Z height override
        #[arg(long)]
        pen_up: Option<f64>,
        /// Pen-down Z height override
        #[arg(long)]
        pen_down: Option<f64>,
        /// Default feed rate override
        #[arg(long)]
        feedrate: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::ensure_file(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    match cli.command {
        Command::Post {
            input,
            output,
            stroke_interval,
            paper_every,
            pen_up,
            pen_down,
            feedrate,
        } => {
            let config = apply_overrides(config, pen_up, pen_down, feedrate, paper_every);
            run_post(&config, &input, &output, stroke_interval)
        }
        Command::Merge {
            writing,
            drawing,
            output,
            paper_every,
            pen_up,
            pen_down,
            feedrate,
        } => {
            let config = apply_overrides(config, pen_up, pen_down, feedrate, paper_every);
            run_merge(&config, &writing, &drawing, &output)
        }
    }
}

/// Fold explicit command-line overrides into the loaded configuration.
fn apply_overrides(
    mut config: Config,
    pen_up: Option<f64>,
    pen_down: Option<f64>,
    feedrate: Option<f64>,
    paper_every: Option<u32>,
) -> Config {
    if let Some(z) = pen_up {
        config.plotter.pen_up_z = z;
    }
    if let Some(z) = pen_down {
        config.plotter.pen_down_z = z;
    }
    if let Some(feed) = feedrate {
        config.gcode.default_feedrate = feed;
    }
    if let Some(every) = paper_every {
        config.gcode.insert_every_n_ink = every;
    }
    config
}

fn run_post(
    config: &Config,
    input: &Path,
    output: &Path,
    stroke_interval: Option<u32>,
) -> Result<()> {
    let lines = read_gcode(input)?;
    let params = PassParams {
        policy: InkPolicy::Stroke {
            interval: stroke_interval.unwrap_or(config.gcode.drawing.stroke_interval),
        },
        insert_every_n_ink: config.gcode.insert_every_n_ink,
    };

    let result = process_stream(
        &lines,
        &config.plotter_profile(),
        &config.macro_set(),
        &params,
    )?;
    write_gcode(output, &result.lines)?;

    println!(
        "Inserted {} ink changes and {} paper changes over {} draw moves, {} lines -> {}",
        result.summary.ink_insertions,
        result.summary.paper_insertions,
        result.summary.draw_moves,
        result.lines.len(),
        output.display()
    );
    report_unresolved(result.summary.unresolved_placeholders);
    Ok(())
}

fn run_merge(config: &Config, writing: &Path, drawing: &Path, output: &Path) -> Result<()> {
    config.validate()?;
    let writing_lines = read_gcode(writing)?;
    let drawing_lines = read_gcode(drawing)?;

    let result = merge_streams(&writing_lines, &drawing_lines, &config.merge_params())?;
    write_gcode(output, &result.lines)?;

    println!(
        "Writing pass: {} ink changes; drawing pass: {} ink changes; {} paper changes total, {} lines -> {}",
        result.summary.writing.ink_insertions,
        result.summary.drawing.ink_insertions,
        result.summary.paper_insertions(),
        result.summary.total_lines,
        output.display()
    );
    report_unresolved(result.summary.unresolved_placeholders());
    Ok(())
}

fn report_unresolved(count: usize) {
    if count > 0 {
        println!(
            "Warning: {} unresolved macro placeholder(s) left in the output; check the macro templates in the configuration",
            count
        );
    }
}

fn read_gcode(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading G-code from {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("G-code file is empty: {}", path.display());
    }
    Ok(text.lines().map(String::from).collect())
}

fn write_gcode(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    fs::write(path, lines.join("\n") + "\n")
        .with_context(|| format!("writing G-code to {}", path.display()))?;
    Ok(())
}
