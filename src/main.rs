use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod assets;
mod error;
mod pipeline;
mod utils;

use assets::manifest::Manifest;
use assets::AssetCategory;
use pipeline::PipelineConfig;

/// Simple program to fetch and process pixel-art assets for the NFT frontend
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download assets listed in a manifest and process them into the output layout
    Fetch {
        /// Path to the JSON asset manifest
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output root for processed images
        #[arg(short, long, default_value = "src/assets/images/nft")]
        output: PathBuf,

        /// Edge length of every processed image
        #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..))]
        output_size: u32,

        /// Edge length of a sprite-sheet tile
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
        sprite_size: u32,

        /// Exit with an error code if any asset fails
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Sort a raw downloaded asset pack into category staging folders
    Organize {
        /// Root of the unpacked asset pack
        #[arg(short, long)]
        pack: PathBuf,

        /// Staging root the pack is sorted into
        #[arg(short, long, default_value = "pixel_assets")]
        staging: PathBuf,
    },
    /// Process staged local images into the output layout
    Process {
        /// Staging root holding per-category source images
        #[arg(short, long, default_value = "pixel_assets")]
        staging: PathBuf,

        /// Output root for processed images
        #[arg(short, long, default_value = "src/assets/images/nft")]
        output: PathBuf,

        /// Only process a single category
        #[arg(short, long, value_enum)]
        category: Option<AssetCategory>,

        /// Edge length of every processed image
        #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..))]
        output_size: u32,

        /// Edge length of a sprite-sheet tile
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
        sprite_size: u32,

        /// Exit with an error code if any asset fails
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

fn build_config(output: PathBuf, output_size: u32, sprite_size: u32) -> PipelineConfig {
    let mut config = PipelineConfig::new(output);
    config.output_size = (output_size, output_size);
    config.sprite_size = (sprite_size, sprite_size);
    config
}


#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Fetch {
            manifest,
            output,
            output_size,
            sprite_size,
            strict,
        } => {
            let manifest = Manifest::load(&manifest)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            println!(
                "Fetching {} assets across {} categories",
                manifest.asset_count(),
                manifest.categories.len()
            );

            let config = build_config(output, output_size, sprite_size);
            let summary = pipeline::run_fetch(&manifest, &config).await?;
            summary.print();

            if strict && !summary.is_clean() {
                std::process::exit(1);
            }
        }
        Commands::Organize { pack, staging } => {
            let summary = pipeline::run_organize(&pack, &staging)?;
            summary.print();
        }
        Commands::Process {
            staging,
            output,
            category,
            output_size,
            sprite_size,
            strict,
        } => {
            let config = build_config(output, output_size, sprite_size);
            let summary = pipeline::run_process(&staging, category, &config)?;
            summary.print();

            if strict && !summary.is_clean() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
