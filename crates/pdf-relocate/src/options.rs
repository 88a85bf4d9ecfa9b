use crate::constants::{DEFAULT_PAGE_NUMBER, SOURCE_PADDING_PT};
use crate::geometry::{PointMm, RectMm};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything needed to relocate one region on one page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RelocateOptions {
    /// Region to capture and white out
    pub source: RectMm,
    /// Top-left corner where the capture is pasted
    pub destination: PointMm,
    /// Optional extra region to white out
    pub cover: Option<RectMm>,
    /// Page to edit (1-indexed)
    pub page_number: usize,
    /// Padding added around the source white-out, in points
    pub source_padding_pt: f64,
}

impl Default for RelocateOptions {
    fn default() -> Self {
        Self {
            source: RectMm::default(),
            destination: PointMm::default(),
            cover: None,
            page_number: DEFAULT_PAGE_NUMBER,
            source_padding_pt: SOURCE_PADDING_PT,
        }
    }
}

impl RelocateOptions {
    pub fn new(source: RectMm, destination: PointMm) -> Self {
        Self {
            source,
            destination,
            ..Default::default()
        }
    }

    pub fn with_cover(mut self, cover: RectMm) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn with_page(mut self, page_number: usize) -> Self {
        self.page_number = page_number;
        self
    }

    /// Rectangle the pasted image occupies (source size at the destination)
    pub fn destination_rect(&self) -> RectMm {
        self.source.moved_to(self.destination)
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| RelocateError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RelocateError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.source.has_area() {
            return Err(RelocateError::InvalidRegion(format!(
                "source must have positive width and height (got {} x {} mm)",
                self.source.width, self.source.height
            )));
        }

        if let Some(cover) = &self.cover {
            if !cover.has_area() {
                return Err(RelocateError::InvalidRegion(format!(
                    "cover must have positive width and height (got {} x {} mm)",
                    cover.width, cover.height
                )));
            }
        }

        if !self.destination.x.is_finite() || !self.destination.y.is_finite() {
            return Err(RelocateError::InvalidRegion(
                "destination must be a finite point".to_string(),
            ));
        }

        if !self.source_padding_pt.is_finite() || self.source_padding_pt < 0.0 {
            return Err(RelocateError::Config(format!(
                "Source padding must be a non-negative number of points (got {})",
                self.source_padding_pt
            )));
        }

        Ok(())
    }
}
