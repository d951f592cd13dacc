use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;

pub mod manifest;

/// The fixed set of asset categories the frontend layout knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Scene backgrounds
    Background,
    /// Playable characters
    Character,
    /// Facial expressions
    Expression,
    /// Clothing / equipment
    Clothing,
    /// Hats and helmets
    Hat,
    /// Held accessories (weapons, shields)
    Accessory,
    /// Achievement badges
    Badge,
    /// Decorative frames
    Frame,
}

impl AssetCategory {
    pub fn all() -> [Self; 8] {
        [
            Self::Background,
            Self::Character,
            Self::Expression,
            Self::Clothing,
            Self::Hat,
            Self::Accessory,
            Self::Badge,
            Self::Frame,
        ]
    }

    /// Subdirectory under the output root where processed images land.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Background => "bg",
            Self::Character => "char",
            Self::Expression => "exp",
            Self::Clothing => "clothes",
            Self::Hat => "hats",
            Self::Accessory => "acc",
            Self::Badge => "badges",
            Self::Frame => "frames",
        }
    }

    /// Subdirectory under the staging root where raw local assets are sorted.
    pub fn staging_dir(&self) -> &'static str {
        match self {
            Self::Background => "backgrounds",
            Self::Character => "characters",
            Self::Expression => "expressions",
            Self::Clothing => "equipment",
            Self::Hat => "hats",
            Self::Accessory => "accessories",
            Self::Badge => "badges",
            Self::Frame => "frames",
        }
    }

    /// Filename prefix applied when organizing a raw asset pack into staging.
    pub fn staging_prefix(&self) -> &'static str {
        match self {
            Self::Background => "bg_",
            Self::Character => "char_",
            Self::Expression => "exp_",
            Self::Clothing => "equip_",
            Self::Hat => "hat_",
            Self::Accessory => "acc_",
            Self::Badge => "badge_",
            Self::Frame => "frame_",
        }
    }
}

/// Where an asset's bytes come from. Each source is consumed once per run.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssetSource {
    Remote { url: String },
    Local { path: PathBuf },
}

/// One named asset inside a manifest category.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    #[serde(flatten)]
    pub source: AssetSource,
}
