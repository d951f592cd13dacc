//! Utility modules:
//! - `files`: local asset discovery
//! - `http`: remote fetching
//! - `images`: the transform pipeline (normalize, resize, slice)

pub mod files;
pub mod http;
pub mod images;

use std::fs;
use std::io;
use std::path::Path;

use crate::assets::AssetCategory;

/// Ensure the output root and one subdirectory per category exist.
pub fn ensure_directories(output_root: &Path) -> io::Result<()> {
    if !output_root.exists() {
        fs::create_dir_all(output_root)?;
        println!("Created base directory: {}", output_root.display());
    }

    for category in AssetCategory::all() {
        let dir = output_root.join(category.dir_name());
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            println!("Created directory: {}", dir.display());
        }
    }

    Ok(())
}
