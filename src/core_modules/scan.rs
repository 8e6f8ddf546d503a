// THEORY:
// A `Scan` answers one question: is the target sitting in the snapper image
// with its top-left corner at this offset?
//
// Algorithm:
// 1.  **Slice**: copy a window the size of the target's trimmed grid out of the
//     source grid. A window that would run off the image is an `OutOfBounds`
//     error, never a clamped or truncated read.
// 2.  **Compare**: walk only the target's occupied cells and count matches and
//     differences against the window. Background cells carry no signal and are
//     never compared, so a sparse target is not diluted by its own blank space.
// 3.  **Decide**: confidence = matches / (matches + differences). The target is
//     found when confidence >= the minimum (the threshold is inclusive). A valid
//     target always has at least one occupied cell, so the denominator is never
//     zero.
// 4.  **Translate**: shift the target's local centroid by the offset to get its
//     position in image coordinates.
//
// A scan is pure. It borrows the grid and the target, owns only its result, and
// gives bit-identical results when repeated on the same inputs. Many scans over
// the same grid and target can run at once without coordination.

use crate::core_modules::coordinate::coordinate::Coordinate;
use crate::core_modules::grid::Grid;
use crate::core_modules::target_shape::{TargetImage, global_centroid};
use crate::error::{Result, SnapperError};
use std::fmt;
use tracing::trace;

pub type Confidence = f64;

/// The outcome of comparing one window of a source grid against a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    target_name: String,
    horizontal_offset: usize,
    vertical_offset: usize,
    minimum_confidence: Confidence,
    /// Occupied target cells whose window cell holds the same character.
    matches: usize,
    /// Occupied target cells whose window cell differs.
    differences: usize,
    confidence: Confidence,
    target_found: bool,
    global_centroid: Coordinate,
    top_left_global_coordinate: Coordinate,
}

impl Scan {
    pub fn new<T: TargetImage + ?Sized>(
        source: &Grid,
        target: &T,
        horizontal_offset: usize,
        vertical_offset: usize,
        minimum_confidence: Confidence,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&minimum_confidence) {
            return Err(SnapperError::InvalidConfidence(minimum_confidence));
        }

        let target_grid = target.grid_representation();
        let window = source.window(
            vertical_offset,
            horizontal_offset,
            target_grid.rows(),
            target_grid.cols(),
        )?;

        let mut matches = 0;
        let mut differences = 0;
        for &cell in target.internal_coordinates() {
            match (window.at(cell), target_grid.at(cell)) {
                (Some(seen), Some(expected)) if seen == expected => matches += 1,
                _ => differences += 1,
            }
        }

        let compared = matches + differences;
        if compared == 0 {
            return Err(SnapperError::ShapeDefinition {
                name: target.name().to_string(),
                reason: "no occupied cells to compare".to_string(),
            });
        }
        let confidence = matches as Confidence / compared as Confidence;
        let target_found = confidence >= minimum_confidence;

        trace!(
            target_name = target.name(),
            h = horizontal_offset,
            v = vertical_offset,
            matches,
            differences,
            confidence,
            "scanned window"
        );

        Ok(Self {
            target_name: target.name().to_string(),
            horizontal_offset,
            vertical_offset,
            minimum_confidence,
            matches,
            differences,
            confidence,
            target_found,
            global_centroid: global_centroid(target, horizontal_offset, vertical_offset),
            top_left_global_coordinate: Coordinate::new(
                horizontal_offset as f64,
                vertical_offset as f64,
            ),
        })
    }

    /// Whether a window for `target` at this offset lies inside `source`.
    pub fn window_fits<T: TargetImage + ?Sized>(
        source: &Grid,
        target: &T,
        horizontal_offset: usize,
        vertical_offset: usize,
    ) -> bool {
        let target_grid = target.grid_representation();
        source.fits(
            vertical_offset,
            horizontal_offset,
            target_grid.rows(),
            target_grid.cols(),
        )
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn horizontal_offset(&self) -> usize {
        self.horizontal_offset
    }

    pub fn vertical_offset(&self) -> usize {
        self.vertical_offset
    }

    pub fn minimum_confidence(&self) -> Confidence {
        self.minimum_confidence
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn differences(&self) -> usize {
        self.differences
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn target_found(&self) -> bool {
        self.target_found
    }

    pub fn global_centroid(&self) -> Coordinate {
        self.global_centroid
    }

    pub fn top_left_global_coordinate(&self) -> Coordinate {
        self.top_left_global_coordinate
    }

    /// Confidence as a whole percentage, rounded to two decimal places of the
    /// underlying fraction.
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 100.0).round()
    }

    /// One human-readable line describing this scan.
    pub fn summary(&self) -> String {
        if self.target_found {
            format!(
                "Position {},{} - {} found with centroid co-ordinates [X,Y] {} with a certainty of {}%!",
                self.horizontal_offset,
                self.vertical_offset,
                self.target_name,
                self.global_centroid,
                self.confidence_percent()
            )
        } else {
            format!(
                "Position {},{} - {} NOT found with centroid co-ordinates [X,Y] {}.",
                self.horizontal_offset,
                self.vertical_offset,
                self.target_name,
                self.global_centroid
            )
        }
    }
}

impl fmt::Display for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
