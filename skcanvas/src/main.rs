mod script;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use script::Script;
use std::path::{Path, PathBuf};

/// skcanvas: render Canvas 2D command scripts to PNG or raw RGBA
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every drawing operation
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script and write the resulting surface
    Render {
        /// Path to input JSON script
        #[arg(short, long)]
        script: PathBuf,

        /// Path to output file to be created
        #[arg(short, long)]
        output: PathBuf,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
        format: OutputFormat,

        /// Pixels per inch recorded in the PNG. Defaults to 72
        #[arg(long)]
        ppi: Option<f32>,
    },

    /// Run a script and print one pixel as JSON
    Probe {
        /// Path to input JSON script
        #[arg(short, long)]
        script: PathBuf,

        #[arg(short, long, allow_negative_numbers = true)]
        x: i32,

        #[arg(short, long, allow_negative_numbers = true)]
        y: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// PNG with straight alpha
    Png,
    /// Premultiplied RGBA8888 bytes, row-major, no header
    Raw,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Render {
            script,
            output,
            format,
            ppi,
        } => render(&script, &output, format, ppi),
        Commands::Probe { script, x, y } => probe(&script, x, y),
    }
}

fn render(script: &Path, output: &Path, format: OutputFormat, ppi: Option<f32>) -> Result<()> {
    if let Some(ppi) = ppi {
        if !ppi.is_finite() || ppi <= 0.0 {
            bail!("Invalid ppi: {}", ppi);
        }
    }
    let ctx = Script::load(script)?.render()?;

    let bytes = match format {
        OutputFormat::Png => ctx.to_png(ppi).context("Failed to encode PNG")?,
        OutputFormat::Raw => ctx.to_buffer(),
    };
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    log::info!(
        "Wrote {}x{} surface to {} ({} bytes)",
        ctx.width(),
        ctx.height(),
        output.display(),
        bytes.len()
    );
    Ok(())
}

fn probe(script: &Path, x: i32, y: i32) -> Result<()> {
    let ctx = Script::load(script)?.render()?;
    let Some(pixel) = ctx.get_pixel(x, y) else {
        bail!(
            "Pixel ({}, {}) is outside the {}x{} surface",
            x,
            y,
            ctx.width(),
            ctx.height()
        );
    };
    let json = serde_json::json!({
        "x": x,
        "y": y,
        "r": pixel.r,
        "g": pixel.g,
        "b": pixel.b,
        "a": pixel.a,
    });
    println!("{}", json);
    Ok(())
}
