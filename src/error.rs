use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain raw image bytes for an asset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than 200 OK.
    #[error("HTTP {status} for URL: {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The request never completed (DNS, connect, or body read failure).
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A local source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The fetched bytes were not a decodable image.
#[derive(Debug, Error)]
#[error("could not decode image '{name}': {source}")]
pub struct DecodeError {
    pub name: String,
    #[source]
    pub source: image::ImageError,
}

/// Failure while resizing, slicing, or writing an output PNG.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can go wrong for a single asset. Errors of this type are
/// recorded per asset and never abort the batch.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Failure to load the asset manifest. Unlike `AssetError` this is fatal:
/// without a manifest there is no batch to run.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
