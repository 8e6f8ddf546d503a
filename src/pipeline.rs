// THEORY:
// The `pipeline` module is the top-level, sequential API of the engine. A single
// `Scan` only looks at one offset; a sweep slides that scan over every offset
// where the target fits inside the snapper image and packages the results into
// a report.
//
// Offsets are visited in row-major order (vertical outer, horizontal inner), so
// detections come out in reading order. The parallel sweep reproduces the same
// order, which keeps the two interchangeable.

use crate::core_modules::coordinate::coordinate::Coordinate;
use crate::core_modules::scan::{Confidence, Scan};
use crate::core_modules::snapper_image::SnapperImage;
use crate::core_modules::target_shape::{TargetImage, TargetShape};
use crate::error::{Result, SnapperError};
use serde::Serialize;
use tracing::{info, trace};

/// Configuration for a sweep, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fraction of occupied cells that must match, e.g. 0.75 => 75%.
    pub minimum_confidence: Confidence,
    /// Keep scans that did not clear the threshold in the report.
    pub report_misses: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            minimum_confidence: 0.75,
            report_misses: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.minimum_confidence) {
            return Err(SnapperError::InvalidConfidence(self.minimum_confidence));
        }
        Ok(())
    }
}

/// The reportable part of a single scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub horizontal_offset: usize,
    pub vertical_offset: usize,
    pub global_centroid: Coordinate,
    pub top_left: Coordinate,
    pub confidence: Confidence,
    pub target_found: bool,
    pub summary: String,
}

impl From<&Scan> for Detection {
    fn from(scan: &Scan) -> Self {
        Self {
            horizontal_offset: scan.horizontal_offset(),
            vertical_offset: scan.vertical_offset(),
            global_centroid: scan.global_centroid(),
            top_left: scan.top_left_global_coordinate(),
            confidence: scan.confidence(),
            target_found: scan.target_found(),
            summary: scan.summary(),
        }
    }
}

/// Everything a sweep of one target over one image produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub image_name: String,
    pub target_name: String,
    pub offsets_scanned: usize,
    /// Scans that cleared the threshold, in row-major order.
    pub detections: Vec<Detection>,
    /// Scans that did not, kept only when `report_misses` is set.
    pub misses: Vec<Detection>,
    /// The highest-confidence scan, found or not. Earliest offset wins ties.
    pub best: Option<Detection>,
}

/// The primary output of a sweep, reduced to what a caller usually branches on.
#[derive(Debug, Clone)]
pub enum Report {
    NoTargetFound,
    TargetsFound(Vec<Detection>),
}

impl SweepReport {
    pub fn report(&self) -> Report {
        if self.detections.is_empty() {
            Report::NoTargetFound
        } else {
            Report::TargetsFound(self.detections.clone())
        }
    }

    /// Detections and kept misses merged back into row-major offset order.
    pub fn scans_in_order(&self) -> Vec<&Detection> {
        let mut scans: Vec<&Detection> = self.detections.iter().chain(&self.misses).collect();
        scans.sort_by_key(|d| (d.vertical_offset, d.horizontal_offset));
        scans
    }

    pub fn total_line(&self) -> String {
        format!(
            "{}: {} found in {} positions",
            self.target_name,
            self.detections.len(),
            self.offsets_scanned
        )
    }
}

/// Every (horizontal, vertical) offset at which `target` fits inside `image`,
/// in row-major order. Empty when the target is larger than the image.
pub fn candidate_offsets<T: TargetImage + ?Sized>(
    image: &SnapperImage,
    target: &T,
) -> Vec<(usize, usize)> {
    let target_grid = target.grid_representation();
    let (Some(max_v), Some(max_h)) = (
        image.grid.rows().checked_sub(target_grid.rows()),
        image.grid.cols().checked_sub(target_grid.cols()),
    ) else {
        return Vec::new();
    };

    let mut offsets = Vec::with_capacity((max_v + 1) * (max_h + 1));
    for v in 0..=max_v {
        for h in 0..=max_h {
            offsets.push((h, v));
        }
    }
    offsets
}

/// Folds row-major scans into a report.
pub(crate) fn assemble_report(
    config: &PipelineConfig,
    image: &SnapperImage,
    target_name: &str,
    scans: &[Scan],
) -> SweepReport {
    let mut detections = Vec::new();
    let mut misses = Vec::new();
    let mut best: Option<&Scan> = None;

    for scan in scans {
        if best.is_none_or(|b| scan.confidence() > b.confidence()) {
            best = Some(scan);
        }
        if scan.target_found() {
            info!("{}", scan.summary());
            detections.push(Detection::from(scan));
        } else {
            trace!("{}", scan.summary());
            if config.report_misses {
                misses.push(Detection::from(scan));
            }
        }
    }

    SweepReport {
        image_name: image.name.clone(),
        target_name: target_name.to_string(),
        offsets_scanned: scans.len(),
        detections,
        misses,
        best: best.map(Detection::from),
    }
}

/// The sequential sweep driver.
pub struct SweepPipeline {
    config: PipelineConfig,
}

impl SweepPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn sweep(&self, image: &SnapperImage, target: &TargetShape) -> Result<SweepReport> {
        // Stage 1: Enumerate every offset where the window fits.
        let offsets = candidate_offsets(image, target);

        // Stage 2: One scan per offset.
        let scans = offsets
            .into_iter()
            .map(|(h, v)| Scan::new(&image.grid, target, h, v, self.config.minimum_confidence))
            .collect::<Result<Vec<_>>>()?;

        // Stage 3: Aggregate.
        Ok(assemble_report(&self.config, image, target.name(), &scans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::grid::Grid;
    use crate::core_modules::grid_loader::InMemoryGridSource;

    fn image(rows: &[&str]) -> SnapperImage {
        SnapperImage::from_source("image", &InMemoryGridSource::new(rows.iter().copied()))
            .expect("image")
    }

    fn block() -> TargetShape {
        let grid = Grid::from_rows(vec![vec!['X', 'X'], vec!['X', 'X']]).expect("grid");
        TargetShape::new("block", &grid, ' ').expect("target")
    }

    #[test]
    fn offsets_are_row_major_and_inclusive() {
        let offsets = candidate_offsets(&image(&["   ", "   ", "   "]), &block());
        assert_eq!(offsets, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn oversized_target_yields_no_offsets() {
        assert!(candidate_offsets(&image(&["XXXXX"]), &block()).is_empty());
    }

    #[test]
    fn sweep_finds_each_block_once() {
        let pipeline = SweepPipeline::new(PipelineConfig {
            minimum_confidence: 1.0,
            report_misses: false,
        })
        .expect("pipeline");
        let report = pipeline
            .sweep(&image(&["XX  ", "XX  ", "    ", "  XX", "  XX"]), &block())
            .expect("report");

        assert_eq!(report.offsets_scanned, 12);
        let hits: Vec<(usize, usize)> = report
            .detections
            .iter()
            .map(|d| (d.horizontal_offset, d.vertical_offset))
            .collect();
        assert_eq!(hits, vec![(0, 0), (2, 3)]);
        assert!(report.misses.is_empty());
        assert_eq!(report.best.as_ref().map(|b| (b.horizontal_offset, b.vertical_offset)), Some((0, 0)));
        assert_eq!(report.total_line(), "block: 2 found in 12 positions");
        assert!(matches!(report.report(), Report::TargetsFound(ref d) if d.len() == 2));
    }

    #[test]
    fn misses_are_kept_on_request() {
        let pipeline = SweepPipeline::new(PipelineConfig {
            minimum_confidence: 1.0,
            report_misses: true,
        })
        .expect("pipeline");
        let report = pipeline.sweep(&image(&["X  ", "   "]), &block()).expect("report");
        assert!(matches!(report.report(), Report::NoTargetFound));
        assert_eq!(report.misses.len(), 2);
        let best = report.best.expect("best");
        assert_eq!((best.horizontal_offset, best.confidence), (0, 0.25));
    }

    #[test]
    fn misses_interleave_with_detections_in_offset_order() {
        let pipeline = SweepPipeline::new(PipelineConfig {
            minimum_confidence: 1.0,
            report_misses: true,
        })
        .expect("pipeline");
        let report = pipeline.sweep(&image(&["   ", "XX ", "XX "]), &block()).expect("report");

        let order: Vec<(usize, usize, bool)> = report
            .scans_in_order()
            .iter()
            .map(|d| (d.horizontal_offset, d.vertical_offset, d.target_found))
            .collect();
        assert_eq!(
            order,
            vec![(0, 0, false), (1, 0, false), (0, 1, true), (1, 1, false)]
        );
    }

    #[test]
    fn invalid_threshold_fails_before_sweeping() {
        let config = PipelineConfig {
            minimum_confidence: -0.1,
            report_misses: false,
        };
        assert!(matches!(SweepPipeline::new(config), Err(SnapperError::InvalidConfidence(_))));
    }
}
