use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::assets::{AssetCategory, AssetEntry};
use crate::error::ManifestError;

/// The full asset table for a fetch run: which categories to populate and
/// where each named image comes from. Loaded from a JSON file so that test
/// runs and alternate asset packs can inject their own tables.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryEntry {
    pub category: AssetCategory,
    pub assets: Vec<AssetEntry>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Total number of assets across all categories.
    pub fn asset_count(&self) -> usize {
        self.categories.iter().map(|c| c.assets.len()).sum()
    }
}
