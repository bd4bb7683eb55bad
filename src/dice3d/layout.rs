//! Grid placement and apparent-size stabilization.

use bevy::prelude::*;

pub const DEFAULT_COLUMNS: usize = 5;
pub const DEFAULT_CELL_SIZE: f32 = 2.4;

/// Row-major grid of dice centered horizontally on `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_size: f32,
    pub origin: Vec3,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            cell_size: DEFAULT_CELL_SIZE,
            origin: Vec3::ZERO,
        }
    }
}

impl GridLayout {
    pub fn new(columns: usize, cell_size: f32) -> Self {
        Self {
            columns: columns.max(1),
            cell_size,
            origin: Vec3::ZERO,
        }
    }

    /// `(row, column)` of slot `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        (index / columns, index % columns)
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let (row, col) = self.cell(index);
        let center_col = (self.columns.max(1) as f32 - 1.0) / 2.0;
        self.origin
            + Vec3::new(
                (col as f32 - center_col) * self.cell_size,
                -(row as f32) * self.cell_size,
                0.0,
            )
    }

    pub fn positions(&self, count: usize) -> Vec<Vec3> {
        (0..count).map(|i| self.position(i)).collect()
    }

    pub fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns.max(1))
    }

    /// Pixel height that fits `count` dice at `row_px` per row, plus a
    /// quarter row of padding. An empty stage still gets one row, and the
    /// result is never less than `min_height` when given.
    pub fn content_height(&self, count: usize, row_px: f32, min_height: Option<f32>) -> f32 {
        let rows = self.rows(count).max(1);
        let height = rows as f32 * row_px + (row_px * 0.25).round();
        match min_height {
            Some(min) => height.max(min),
            None => height,
        }
    }

    /// Y coordinate halfway between the first and last row.
    pub fn vertical_center(&self, count: usize) -> f32 {
        let rows = self.rows(count);
        if rows == 0 {
            return self.origin.y;
        }
        self.origin.y - (rows as f32 - 1.0) * self.cell_size / 2.0
    }
}

/// Keeps dice the same size on screen when the viewport height changes.
///
/// The first observed height is the reference; later heights scale the
/// stage root by `reference / current`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelStability {
    reference_height: Option<f32>,
}

impl PixelStability {
    pub fn observe(&mut self, height: f32) -> f32 {
        if self.reference_height.is_none() && height > 0.0 {
            self.reference_height = Some(height);
        }
        self.scale(height)
    }

    pub fn scale(&self, height: f32) -> f32 {
        match self.reference_height {
            Some(reference) if height > 0.0 => reference / height,
            _ => 1.0,
        }
    }

    pub fn reference_height(&self) -> Option<f32> {
        self.reference_height
    }

    pub fn reset(&mut self) {
        self.reference_height = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_instances_in_five_columns() {
        let layout = GridLayout::default();
        let positions = layout.positions(13);
        assert_eq!(layout.rows(13), 3);
        assert_eq!(positions[0], Vec3::new(-4.8, 0.0, 0.0));
        assert_eq!(positions[4], Vec3::new(4.8, 0.0, 0.0));
        assert_eq!(positions[5], Vec3::new(-4.8, -2.4, 0.0));
        assert_eq!(layout.cell(12), (2, 2));
        assert!(positions[12].x.abs() < 1e-6);
        assert!((positions[12].y + 4.8).abs() < 1e-6);
    }

    #[test]
    fn test_content_height() {
        let layout = GridLayout::default();
        assert_eq!(layout.content_height(7, 120.0, None), 270.0);
        assert_eq!(layout.content_height(7, 120.0, Some(400.0)), 400.0);
        assert_eq!(layout.content_height(0, 120.0, None), 150.0);
    }

    #[test]
    fn test_vertical_center() {
        let layout = GridLayout::default();
        assert_eq!(layout.vertical_center(3), 0.0);
        assert!((layout.vertical_center(11) + 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_stability() {
        let mut stability = PixelStability::default();
        assert_eq!(stability.observe(600.0), 1.0);
        assert_eq!(stability.observe(300.0), 2.0);
        assert_eq!(stability.observe(1200.0), 0.5);
        assert_eq!(stability.scale(0.0), 1.0);
        assert_eq!(stability.reference_height(), Some(600.0));
    }

    #[test]
    fn test_non_positive_first_height_is_not_recorded() {
        let mut stability = PixelStability::default();
        assert_eq!(stability.observe(0.0), 1.0);
        assert_eq!(stability.observe(500.0), 1.0);
        assert_eq!(stability.observe(250.0), 2.0);
    }
}
