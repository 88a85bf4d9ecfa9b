//! Last-used coordinates, persisted between sessions
//!
//! A small JSON record keyed by role. A missing key means "unset". Values
//! are rounded to one decimal place whenever they are stored, matching what
//! the user sees in the numeric inputs.

use crate::geometry::{PointMm, RectMm};
use crate::options::RelocateOptions;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory
const STORE_DIR_NAME: &str = "pdf-relocate";

/// File name of the persisted record
const STORE_FILE_NAME: &str = "coordinates.json";

/// Role of a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateRole {
    Source,
    Destination,
    Cover,
}

/// Persisted record of the last-used rectangles and point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredCoordinates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RectMm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PointMm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<RectMm>,
}

impl StoredCoordinates {
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.destination.is_none() && self.cover.is_none()
    }

    /// Options for a run, if both source and destination are known
    pub fn to_options(&self) -> Option<RelocateOptions> {
        let mut options = RelocateOptions::new(self.source?, self.destination?);
        options.cover = self.cover;
        Some(options)
    }
}

/// File-backed coordinate store
///
/// Every setter writes through to disk so a crash or reload never loses the
/// last change.
#[derive(Debug, Clone)]
pub struct CoordinateStore {
    path: PathBuf,
    values: StoredCoordinates,
}

impl CoordinateStore {
    /// Default location: `<config dir>/pdf-relocate/coordinates.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_DIR_NAME)
            .join(STORE_FILE_NAME)
    }

    /// Open the store at `path`, starting empty if the file does not exist
    ///
    /// A corrupt file is logged and treated as empty rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!(
                    "Ignoring unreadable coordinate store {}: {}",
                    path.display(),
                    e
                );
                StoredCoordinates::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredCoordinates::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &StoredCoordinates {
        &self.values
    }

    pub fn source(&self) -> Option<RectMm> {
        self.values.source
    }

    pub fn destination(&self) -> Option<PointMm> {
        self.values.destination
    }

    pub fn cover(&self) -> Option<RectMm> {
        self.values.cover
    }

    pub fn set_source(&mut self, rect: Option<RectMm>) -> Result<()> {
        self.values.source = rect.map(|r| r.rounded());
        self.persist()
    }

    pub fn set_destination(&mut self, point: Option<PointMm>) -> Result<()> {
        self.values.destination = point.map(PointMm::rounded);
        self.persist()
    }

    pub fn set_cover(&mut self, rect: Option<RectMm>) -> Result<()> {
        self.values.cover = rect.map(|r| r.rounded());
        self.persist()
    }

    /// Clear one role
    pub fn clear(&mut self, role: CoordinateRole) -> Result<()> {
        match role {
            CoordinateRole::Source => self.set_source(None),
            CoordinateRole::Destination => self.set_destination(None),
            CoordinateRole::Cover => self.set_cover(None),
        }
    }

    /// Forget everything and remove the file
    pub fn reset(&mut self) -> Result<()> {
        self.values = StoredCoordinates::default();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values).map_err(|e| {
            RelocateError::Config(format!("Failed to serialize coordinates: {}", e))
        })?;
        std::fs::write(&self.path, json)?;
        log::debug!("Saved coordinates to {}", self.path.display());
        Ok(())
    }
}
