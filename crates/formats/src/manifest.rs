use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dots::{DotDataError, LandDot, parse_land_dots};

pub const MANIFEST_VERSION: &str = "1.0";
pub const MANIFEST_FILE_NAME: &str = "dots.manifest.json";

/// Manifest describing a published land-dot dataset.
///
/// The offline generator writes this next to the dataset file. The optional
/// `content_hash` is a blake3 hex digest of the dataset bytes; when present
/// it is verified on load so a stale or truncated asset is rejected instead
/// of rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DotManifest {
    pub version: String,
    pub dataset_id: String,
    /// Sphere radius the dots were projected onto.
    pub radius: f64,
    /// Relative path of the dataset file.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl DotManifest {
    pub fn new(dataset_id: impl Into<String>, radius: f64, path: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            dataset_id: dataset_id.into(),
            radius,
            path: path.into(),
            dot_count: None,
            content_hash: None,
        }
    }
}

#[derive(Debug)]
pub enum DotPackageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    ManifestParse(serde_json::Error),
    UnsupportedVersion {
        found: String,
    },
    HashMismatch {
        expected: String,
        found: String,
    },
    Data(DotDataError),
}

impl std::fmt::Display for DotPackageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotPackageError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            DotPackageError::ManifestParse(err) => write!(f, "manifest parse error: {err}"),
            DotPackageError::UnsupportedVersion { found } => {
                write!(f, "unsupported manifest version: {found}")
            }
            DotPackageError::HashMismatch { expected, found } => {
                write!(f, "dataset hash mismatch: expected {expected}, found {found}")
            }
            DotPackageError::Data(err) => write!(f, "dataset error: {err}"),
        }
    }
}

impl std::error::Error for DotPackageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DotPackageError::Io { source, .. } => Some(source),
            DotPackageError::ManifestParse(err) => Some(err),
            DotPackageError::Data(err) => Some(err),
            _ => None,
        }
    }
}

/// Load a manifest + dataset pair from a directory.
pub fn load_dot_package(root: impl AsRef<Path>) -> Result<(DotManifest, Vec<LandDot>), DotPackageError> {
    let root = root.as_ref();
    let manifest_path = root.join(MANIFEST_FILE_NAME);
    let payload = fs::read_to_string(&manifest_path).map_err(|e| DotPackageError::Io {
        path: manifest_path.clone(),
        source: e,
    })?;
    let manifest: DotManifest =
        serde_json::from_str(&payload).map_err(DotPackageError::ManifestParse)?;

    if manifest.version != MANIFEST_VERSION {
        return Err(DotPackageError::UnsupportedVersion {
            found: manifest.version,
        });
    }

    let data_path = root.join(&manifest.path);
    let data = fs::read_to_string(&data_path).map_err(|e| DotPackageError::Io {
        path: data_path.clone(),
        source: e,
    })?;

    if let Some(expected) = &manifest.content_hash {
        let found = blake3::hash(data.as_bytes()).to_hex().to_string();
        if &found != expected {
            warn!(dataset = %manifest.dataset_id, "land-dot dataset failed hash verification");
            return Err(DotPackageError::HashMismatch {
                expected: expected.clone(),
                found,
            });
        }
    }

    let dots = parse_land_dots(&data).map_err(DotPackageError::Data)?;
    Ok((manifest, dots))
}
