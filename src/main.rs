//! Loads an image, reports its dimensions and optionally writes it back as grayscale.
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use imageproc_texel::{Complex, Pixel, PixelBuffer};
use log::info;

/// Which sample type the image is loaded into.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Samples {
    /// Integer intensities, written back unchanged
    Scalar,
    /// Complex values, written back as their rounded magnitude
    Complex,
}

#[derive(Parser, Debug)]
#[command(name = "imageproc")]
#[command(version, long_about = None)]
#[command(about = "Load an image into a pixel buffer and report its dimensions")]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Sample type of the loaded buffer
    #[arg(long, value_enum, default_value_t = Samples::Scalar)]
    samples: Samples,

    /// Write the loaded buffer to this path as 8-bit grayscale
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Image Processing!!!");

    match args.samples {
        Samples::Scalar => run::<i32>(&args.input, args.output.as_deref()),
        Samples::Complex => run::<Complex>(&args.input, args.output.as_deref()),
    }
}

fn run<P: Pixel>(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let image: PixelBuffer<P> = imageproc_canvas::load(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    println!("Image width: {}", image.width());
    println!("Image height: {}", image.height());

    if let Some(output) = output {
        imageproc_canvas::save(output, &image)
            .with_context(|| format!("Failed to save {}", output.display()))?;
        info!("Wrote {}", output.display());
    }

    Ok(())
}
