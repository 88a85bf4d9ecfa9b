//! Shared constants for address relocation
//!
//! This module centralizes the unit factors and fixed pipeline parameters.

use std::time::Duration;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Millimeters per point
pub const MM_PER_POINT: f64 = 25.4 / 72.0;

// =============================================================================
// Capture & White-out
// =============================================================================

/// Supersampling factor for the capture raster, independent of preview scale
pub const CAPTURE_SCALE: f64 = 4.0;

/// Padding around the source white-out so anti-aliased edges are hidden (points)
pub const SOURCE_PADDING_PT: f64 = 1.0;

// =============================================================================
// Page Defaults
// =============================================================================

/// Page size used when a page has no readable MediaBox (US Letter, points)
pub const DEFAULT_PAGE_DIMENSIONS: (f64, f64) = (612.0, 792.0);

/// Page used when none is specified (1-indexed)
pub const DEFAULT_PAGE_NUMBER: usize = 1;

// =============================================================================
// Output
// =============================================================================

/// Suffix appended to the input file stem for the output file
pub const OUTPUT_SUFFIX: &str = "-moved_address";

/// Pause between documents in interactive batch runs
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(400);

/// Name prefix for embedded image XObjects
pub const IMAGE_RESOURCE_PREFIX: &str = "ImRelocated";
