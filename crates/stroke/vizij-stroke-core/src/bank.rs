//! Stroke Bank: fixed-capacity table of normalized strokes.
//!
//! Storage is row-major, `C` rows (strokes) by `N` columns (points), two
//! `f32` components per cell, allocated once at construction. Row `r`,
//! column `c` lives at `cells[r * N + c]`.

use std::ops::Range;

use log::{debug, warn};

use crate::error::{Result, StrokeError};
use crate::interp::lerp_vec2;
use crate::stroke::NormalizedStroke;

/// Bytes per stored component.
pub const BYTES_PER_COMPONENT: usize = std::mem::size_of::<f32>();

/// Outcome of a batch upload; bad entries are skipped, never fatal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadReport {
    pub uploaded: Vec<usize>,
    pub skipped: Vec<(usize, StrokeError)>,
}

impl UploadReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StrokeBank {
    capacity: usize,
    point_count: usize,
    cells: Vec<[f32; 2]>,
    occupied: Vec<bool>,
    revision: u64,
    dirty: Option<Range<usize>>,
}

impl StrokeBank {
    /// Pre-allocate `capacity * point_count` zeroed cells.
    pub fn new(capacity: usize, point_count: usize) -> Self {
        Self {
            capacity,
            point_count,
            cells: vec![[0.0; 2]; capacity * point_count],
            occupied: vec![false; capacity],
            revision: 0,
            dirty: None,
        }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self::new(cfg.bank_capacity, cfg.point_count)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// `C * N * 2 * bytesPerComponent`.
    #[inline]
    pub fn memory_bytes(&self) -> usize {
        self.capacity * self.point_count * 2 * BYTES_PER_COMPONENT
    }

    /// Bumped once per completed upload/clear call.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn is_occupied(&self, index: usize) -> bool {
        self.occupied.get(index).copied().unwrap_or(false)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.capacity {
            Ok(())
        } else {
            Err(StrokeError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            })
        }
    }

    fn check_row(&self, index: usize, points: &[[f32; 2]]) -> Result<()> {
        self.check_index(index)?;
        if points.len() != self.point_count {
            return Err(StrokeError::PointCountMismatch {
                expected: self.point_count,
                actual: points.len(),
            });
        }
        if let Some(i) = points
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(StrokeError::InvalidNormalizedStroke {
                reason: format!("point {i} is not finite"),
            });
        }
        Ok(())
    }

    #[inline]
    fn row_range(&self, index: usize) -> Range<usize> {
        let start = index * self.point_count;
        start..start + self.point_count
    }

    fn mark_dirty(&mut self, rows: Range<usize>) {
        self.dirty = Some(match self.dirty.take() {
            Some(d) => d.start.min(rows.start)..d.end.max(rows.end),
            None => rows,
        });
    }

    fn write_row(&mut self, index: usize, points: &[[f32; 2]]) {
        let range = self.row_range(index);
        self.cells[range].copy_from_slice(points);
        self.occupied[index] = true;
    }

    /// Replace row `index` with `points` (exactly `N` entries).
    pub fn upload_stroke(&mut self, index: usize, points: &[[f32; 2]]) -> Result<()> {
        self.check_row(index, points)?;
        self.write_row(index, points);
        self.mark_dirty(index..index + 1);
        self.revision += 1;
        debug!("stroke bank: uploaded row {index}");
        Ok(())
    }

    /// `upload_stroke` for a normalized stroke.
    pub fn upload_normalized(&mut self, index: usize, stroke: &NormalizedStroke) -> Result<()> {
        self.upload_stroke(index, &stroke.to_xy())
    }

    /// Apply several row replacements as one bulk transfer: one revision bump
    /// and one contiguous dirty range. Invalid entries are skipped with a
    /// warning and reported back.
    pub fn upload_strokes<'a, I>(&mut self, batch: I) -> UploadReport
    where
        I: IntoIterator<Item = (usize, &'a [[f32; 2]])>,
    {
        let mut report = UploadReport::default();
        let mut lo = usize::MAX;
        let mut hi = 0usize;
        for (index, points) in batch {
            match self.check_row(index, points) {
                Ok(()) => {
                    self.write_row(index, points);
                    lo = lo.min(index);
                    hi = hi.max(index + 1);
                    report.uploaded.push(index);
                }
                Err(err) => {
                    warn!("stroke bank: skipping row {index} in batch upload: {err}");
                    report.skipped.push((index, err));
                }
            }
        }
        if !report.uploaded.is_empty() {
            self.mark_dirty(lo..hi);
            self.revision += 1;
        }
        debug!(
            "stroke bank: batch upload wrote {} row(s), skipped {}",
            report.uploaded.len(),
            report.skipped.len()
        );
        report
    }

    /// Zero row `index`.
    pub fn clear_stroke(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let range = self.row_range(index);
        self.cells[range].fill([0.0; 2]);
        self.occupied[index] = false;
        self.mark_dirty(index..index + 1);
        self.revision += 1;
        Ok(())
    }

    /// Zero every row.
    pub fn clear_all(&mut self) {
        self.cells.fill([0.0; 2]);
        self.occupied.fill(false);
        self.mark_dirty(0..self.capacity);
        self.revision += 1;
    }

    /// Read-only view of row `index`.
    pub fn get_stroke_data(&self, index: usize) -> Result<&[[f32; 2]]> {
        self.check_index(index)?;
        Ok(&self.cells[self.row_range(index)])
    }

    /// Rows touched since the last call, for a single host→device copy.
    pub fn take_dirty_rows(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    /// Whole table in its row-major byte layout.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Bytes of `rows`, for a partial upload after `take_dirty_rows`.
    pub fn rows_as_bytes(&self, rows: Range<usize>) -> &[u8] {
        let start = rows.start.min(self.capacity) * self.point_count;
        let end = rows.end.min(self.capacity) * self.point_count;
        bytemuck::cast_slice(&self.cells[start..end.max(start)])
    }

    /// Sample row `row` at point-progress `u` in [0,1]; column `u * (N-1)`,
    /// linearly filtered between neighbouring columns.
    ///
    /// `row` is trusted: validation happens at admission.
    #[inline]
    pub fn sample(&self, row: usize, u: f32) -> [f32; 2] {
        let cells = &self.cells[self.row_range(row)];
        let col = u.clamp(0.0, 1.0) * (self.point_count - 1) as f32;
        let c0 = col.floor() as usize;
        let c1 = (c0 + 1).min(self.point_count - 1);
        lerp_vec2(cells[c0], cells[c1], col - c0 as f32)
    }
}
