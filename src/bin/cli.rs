// Command-line batch front end: enhance a single image file and save the
// result. All validation and processing goes through the same pipeline as
// the HTTP API.

use clap::Parser;
use photo_enhancer::{
    engine::{EngineProvider, default_factory},
    error::EnhanceError,
    image_codec::{self, ImageSource},
    service::{EnhanceRequest, EnhancementService},
};
use std::path::PathBuf;
use tracing::Level;

/// Command line arguments for the image enhancement tool
#[derive(Parser, Debug)]
#[command(author, version, about = "Image Enhancement Tool", long_about = None)]
struct CliArgs {
    /// Enhancement method to use (gfpgan, RestoreFormer or codeformer)
    #[arg(long)]
    method: String,

    /// Path to input image file
    #[arg(long = "image_path")]
    image_path: PathBuf,

    /// Path to save enhanced image
    #[arg(long = "output_path")]
    output_path: PathBuf,

    /// Disable background enhancement
    #[arg(
        long = "no-background_enhancement",
        action = clap::ArgAction::SetFalse,
        default_value_t = true
    )]
    background_enhancement: bool,

    /// Upscaling factor (2 or 4)
    #[arg(long, default_value_t = 2)]
    upscale: u32,
}

fn run(args: &CliArgs) -> Result<(), EnhanceError> {
    // Each CLI invocation is one request: a fresh engine, no sharing.
    let service = EnhancementService::new(EngineProvider::per_request(default_factory()));

    let request = EnhanceRequest {
        method: args.method.clone(),
        background_enhancement: args.background_enhancement,
        upscale: args.upscale,
    };

    let restored = service.run(&ImageSource::Path(args.image_path.clone()), &request)?;
    image_codec::save(&restored, &args.output_path)
}

fn main() {
    let args = CliArgs::parse();

    // Keep stdout clean for the confirmation line; warnings still surface.
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .init();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    println!(
        "Successfully enhanced image saved to: {}",
        args.output_path.display()
    );
}
