use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::assets::manifest::Manifest;
use crate::assets::{AssetCategory, AssetEntry, AssetSource};
use crate::error::{AssetError, FetchError};
use crate::utils::{self, files, http, images};

/// Settings shared by every asset in a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_root: PathBuf,
    pub output_size: (u32, u32),
    pub sprite_size: (u32, u32),
}

impl PipelineConfig {
    pub fn new(output_root: PathBuf) -> Self {
        Self {
            output_root,
            output_size: images::DEFAULT_OUTPUT_SIZE,
            sprite_size: images::DEFAULT_SPRITE_SIZE,
        }
    }
}

/// One asset that could not be processed, with the reason.
#[derive(Debug)]
pub struct AssetFailure {
    pub asset: String,
    pub error: AssetError,
}

/// Aggregate outcome of a run. Individual failures never abort the batch;
/// they are collected here for the caller to report and act on.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub files_written: usize,
    pub failures: Vec<AssetFailure>,
}

impl RunSummary {
    fn record_ok(&mut self, outputs: &[PathBuf]) {
        self.succeeded += 1;
        self.files_written += outputs.len();
    }

    fn record_err(&mut self, asset: String, error: AssetError) {
        self.failures.push(AssetFailure { asset, error });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn print(&self) {
        println!(
            "\nProcessed {} assets ({} files written)",
            self.succeeded, self.files_written
        );
        if !self.is_clean() {
            eprintln!("Warning: {} assets failed", self.failed());
            for failure in &self.failures {
                eprintln!("  - {}: {}", failure.asset, failure.error);
            }
        }
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

/// Download every asset listed in the manifest and process it into the
/// output layout. Assets are fetched strictly one at a time.
pub async fn run_fetch(manifest: &Manifest, config: &PipelineConfig) -> io::Result<RunSummary> {
    utils::ensure_directories(&config.output_root)?;

    let client = Client::new();
    let mut summary = RunSummary::default();

    for entry in &manifest.categories {
        println!("\nFetching {} assets...", entry.category.dir_name());
        let dest_dir = config.output_root.join(entry.category.dir_name());
        let pb = progress_bar(entry.assets.len());

        for asset in &entry.assets {
            match fetch_one(&client, asset, &dest_dir, config).await {
                Ok(outputs) => {
                    pb.println(format!(
                        "Successfully processed: {}/{}",
                        entry.category.dir_name(),
                        asset.name
                    ));
                    summary.record_ok(&outputs);
                }
                Err(e) => {
                    pb.println(format!("Failed {}: {}", asset.name, e));
                    summary.record_err(asset.name.clone(), e);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
    }

    Ok(summary)
}

/// Fetch, decode, and transform a single manifest asset.
pub async fn fetch_one(
    client: &Client,
    asset: &AssetEntry,
    dest_dir: &Path,
    config: &PipelineConfig,
) -> Result<Vec<PathBuf>, AssetError> {
    let bytes = match &asset.source {
        AssetSource::Remote { url } => http::fetch_image_bytes(client, url).await?,
        AssetSource::Local { path } => fs::read(path).map_err(|e| FetchError::Read {
            path: path.clone(),
            source: e,
        })?,
    };

    let img = images::decode_image(&bytes, &asset.name)?;
    let written = images::transform_image(
        img,
        dest_dir,
        &asset.name,
        config.output_size,
        config.sprite_size,
    )?;
    Ok(written)
}

/// Process staged local images into the output layout.
///
/// Each selected category reads its staging directory (empty or missing
/// directories are skipped) and runs every discovered image through the
/// transformer. Oversized images are sliced into sprite tiles.
pub fn run_process(
    staging_root: &Path,
    only: Option<AssetCategory>,
    config: &PipelineConfig,
) -> io::Result<RunSummary> {
    utils::ensure_directories(&config.output_root)?;

    let mut summary = RunSummary::default();

    for category in AssetCategory::all() {
        if only.is_some_and(|c| c != category) {
            continue;
        }

        let source_dir = staging_root.join(category.staging_dir());
        let inputs = files::discover_images(&source_dir);
        if inputs.is_empty() {
            continue;
        }

        println!("\nProcessing {} assets...", category.dir_name());
        let dest_dir = config.output_root.join(category.dir_name());

        for input in inputs {
            let display = input.display().to_string();
            match process_one(&input, &dest_dir, config) {
                Ok(outputs) => {
                    println!("Successfully processed: {}", display);
                    summary.record_ok(&outputs);
                }
                Err(e) => {
                    eprintln!("Failed {}: {}", display, e);
                    summary.record_err(display, e);
                }
            }
        }
    }

    Ok(summary)
}

fn process_one(
    input: &Path,
    dest_dir: &Path,
    config: &PipelineConfig,
) -> Result<Vec<PathBuf>, AssetError> {
    let bytes = fs::read(input).map_err(|e| FetchError::Read {
        path: input.to_path_buf(),
        source: e,
    })?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());
    let name = format!("pixel_{}", stem);

    let img = images::decode_image(&bytes, &name)?;
    let written = images::transform_image(
        img,
        dest_dir,
        &name,
        config.output_size,
        config.sprite_size,
    )?;
    Ok(written)
}

/// Sort a raw downloaded asset pack into the staging layout.
///
/// Files are routed by the pack subtree they live in, plus filename keywords
/// for items and UI art, then copied into the matching staging directory with
/// the category prefix. No pixel data is touched; `process` does that later.
pub fn run_organize(pack_root: &Path, staging_root: &Path) -> io::Result<RunSummary> {
    for category in AssetCategory::all() {
        fs::create_dir_all(staging_root.join(category.staging_dir()))?;
    }

    let mut summary = RunSummary::default();

    let subtrees: [(&str, fn(&str) -> Option<AssetCategory>); 4] = [
        ("Backgrounds", |_| Some(AssetCategory::Background)),
        ("Actor/Characters", |_| Some(AssetCategory::Character)),
        ("Items", route_item),
        ("Ui", route_ui),
    ];

    for (subtree, route) in subtrees {
        let inputs = files::discover_images(&pack_root.join(subtree));
        if inputs.is_empty() {
            continue;
        }

        println!("\nOrganizing {}...", subtree);
        for input in inputs {
            let file_name = match input.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let Some(category) = route(&file_name) else {
                continue;
            };

            let dest = staging_root
                .join(category.staging_dir())
                .join(format!("{}{}", category.staging_prefix(), file_name));
            match fs::copy(&input, &dest) {
                Ok(_) => {
                    println!("Staged: {}", dest.display());
                    summary.record_ok(std::slice::from_ref(&dest));
                }
                Err(e) => {
                    eprintln!("Failed {}: {}", input.display(), e);
                    summary.record_err(
                        input.display().to_string(),
                        AssetError::Fetch(FetchError::Read {
                            path: input.clone(),
                            source: e,
                        }),
                    );
                }
            }
        }
    }

    Ok(summary)
}

/// Items split into hats, held accessories, and general equipment.
fn route_item(file_name: &str) -> Option<AssetCategory> {
    let lower = file_name.to_lowercase();
    if lower.contains("hat") || lower.contains("helmet") {
        Some(AssetCategory::Hat)
    } else if lower.contains("weapon") || lower.contains("sword") {
        Some(AssetCategory::Accessory)
    } else {
        Some(AssetCategory::Clothing)
    }
}

/// UI art only contributes badges and frames; everything else is skipped.
fn route_ui(file_name: &str) -> Option<AssetCategory> {
    let lower = file_name.to_lowercase();
    if lower.contains("badge") || lower.contains("icon") {
        Some(AssetCategory::Badge)
    } else if lower.contains("frame") || lower.contains("border") {
        Some(AssetCategory::Frame)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        img.save(path).unwrap();
    }

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig::new(root.to_path_buf())
    }

    #[test]
    fn process_handles_small_and_oversized_assets() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        let output = dir.path().join("out");

        let badges = staging.join("badges");
        fs::create_dir_all(&badges).unwrap();
        write_png(&badges.join("hero.png"), 16, 16);
        write_png(&badges.join("sheet.png"), 48, 32);

        let config = test_config(&output);
        let summary = run_process(&staging, None, &config).unwrap();

        assert_eq!(summary.succeeded, 2);
        // one direct output + 6 sprite tiles
        assert_eq!(summary.files_written, 7);
        assert!(output.join("badges/pixel_hero.png").exists());
        assert!(output.join("badges/sprite_2_1.png").exists());
    }

    #[test]
    fn one_bad_asset_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        let output = dir.path().join("out");

        let frames = staging.join("frames");
        fs::create_dir_all(&frames).unwrap();
        // Sorted discovery order: the corrupt file comes first.
        fs::write(frames.join("a_corrupt.png"), b"not a png").unwrap();
        write_png(&frames.join("b_gold.png"), 20, 20);

        let config = test_config(&output);
        let summary = run_process(&staging, None, &config).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_clean());
        assert!(output.join("frames/pixel_b_gold.png").exists());
    }

    #[test]
    fn category_filter_limits_processing() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        let output = dir.path().join("out");

        fs::create_dir_all(staging.join("badges")).unwrap();
        fs::create_dir_all(staging.join("frames")).unwrap();
        write_png(&staging.join("badges/hero.png"), 16, 16);
        write_png(&staging.join("frames/gold.png"), 16, 16);

        let config = test_config(&output);
        let summary =
            run_process(&staging, Some(AssetCategory::Badge), &config).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert!(output.join("badges/pixel_hero.png").exists());
        assert!(!output.join("frames/pixel_gold.png").exists());
    }

    #[tokio::test]
    async fn fetch_one_reads_local_sources() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("wand.png");
        write_png(&source_path, 16, 16);

        let asset = AssetEntry {
            name: "pixel_wand".to_string(),
            source: AssetSource::Local { path: source_path },
        };
        let dest_dir = dir.path().join("acc");
        let config = test_config(dir.path());

        let client = Client::new();
        let written = fetch_one(&client, &asset, &dest_dir, &config).await.unwrap();
        assert_eq!(written.len(), 1);
        assert!(dest_dir.join("pixel_wand.png").exists());
    }

    #[tokio::test]
    async fn fetch_one_reports_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let asset = AssetEntry {
            name: "ghost".to_string(),
            source: AssetSource::Local {
                path: dir.path().join("missing.png"),
            },
        };
        let config = test_config(dir.path());

        let client = Client::new();
        let err = fetch_one(&client, &asset, &dir.path().join("bg"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Fetch(FetchError::Read { .. })));
    }

    #[test]
    fn organize_routes_by_subtree_and_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let pack = dir.path().join("pack");
        let staging = dir.path().join("staging");

        fs::create_dir_all(pack.join("Backgrounds")).unwrap();
        fs::create_dir_all(pack.join("Items")).unwrap();
        fs::create_dir_all(pack.join("Ui")).unwrap();
        write_png(&pack.join("Backgrounds/forest.png"), 16, 16);
        write_png(&pack.join("Items/iron_helmet.png"), 16, 16);
        write_png(&pack.join("Items/long_sword.png"), 16, 16);
        write_png(&pack.join("Items/tunic.png"), 16, 16);
        write_png(&pack.join("Ui/gold_frame.png"), 16, 16);
        write_png(&pack.join("Ui/cursor.png"), 16, 16);

        let summary = run_organize(&pack, &staging).unwrap();

        // cursor.png matches no UI keyword and is skipped
        assert_eq!(summary.succeeded, 5);
        assert!(staging.join("backgrounds/bg_forest.png").exists());
        assert!(staging.join("hats/hat_iron_helmet.png").exists());
        assert!(staging.join("accessories/acc_long_sword.png").exists());
        assert!(staging.join("equipment/equip_tunic.png").exists());
        assert!(staging.join("frames/frame_gold_frame.png").exists());
        assert!(!staging.join("badges/badge_cursor.png").exists());
    }

    #[test]
    fn organize_tolerates_missing_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        let pack = dir.path().join("empty_pack");
        let staging = dir.path().join("staging");
        fs::create_dir_all(&pack).unwrap();

        let summary = run_organize(&pack, &staging).unwrap();
        assert_eq!(summary.succeeded, 0);
        assert!(summary.is_clean());
    }
}
