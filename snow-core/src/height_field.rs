use glam::Vec2;

use crate::types::{Column, column_index};

/// Per-column snow heights plus the heights they are easing toward.
///
/// For each [`Column`], this field stores:
///
/// - `pile[i]`, the rendered height of the snow surface above the base band.
/// - `target[i]`, the height `pile[i]` is relaxing toward.
///
/// A third scratch buffer of the same length is kept for the smoothing
/// pass so that diffusion does not allocate per tick.
///
/// The field also remembers the viewport height in pixels, which the
/// melt pass needs to locate the surface in screen space.
#[derive(Debug, Clone)]
pub struct HeightField {
    pub pile: Vec<f32>,
    pub target: Vec<f32>,
    pub(crate) scratch: Vec<f32>,
    viewport_height: f32,
}

impl HeightField {
    /// Creates a zero-filled field for a viewport of the given size.
    ///
    /// The column count is `max(1, floor(width))`, so a degenerate
    /// viewport still yields a single column.
    pub fn new(width: f32, height: f32) -> Self {
        let n = Self::columns_for(width);
        Self {
            pile: vec![0.0; n],
            target: vec![0.0; n],
            scratch: vec![0.0; n],
            viewport_height: height,
        }
    }

    /// Number of columns a viewport of `width` pixels maps to.
    pub fn columns_for(width: f32) -> usize {
        if width.is_finite() && width >= 1.0 {
            width.floor() as usize
        } else {
            1
        }
    }

    /// Adapts the field to a new viewport size.
    ///
    /// If the column count changes, `pile`, `target` and the scratch buffer
    /// are reinitialized to zeros and all history is discarded. If it stays
    /// the same only the stored viewport height is updated.
    ///
    /// ### Returns
    /// `true` if the field was reset.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.viewport_height = height;

        let n = Self::columns_for(width);
        if self.pile.len() == n {
            return false;
        }

        log::debug!("height field resized {} -> {} columns, resetting", self.pile.len(), n);
        self.pile = vec![0.0; n];
        self.target = vec![0.0; n];
        self.scratch = vec![0.0; n];
        true
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.pile.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }

    /// Viewport height in pixels; the surface is measured up from this edge.
    #[inline]
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Maps a pointer x-coordinate to a valid column index.
    pub fn column_at(&self, x: f32) -> Column {
        column_index(x, self.len())
    }

    /// Screen-space y of the snow surface at `col`, measured from the top.
    #[inline]
    pub fn surface_y(&self, col: Column, base_thickness: f32) -> f32 {
        self.viewport_height - (base_thickness + self.pile[col])
    }

    /// Surface outline points, one per column, in canvas-local coordinates.
    pub fn surface_points(&self, base_thickness: f32) -> impl Iterator<Item = Vec2> + '_ {
        self.pile.iter().enumerate().map(move |(x, &h)| {
            Vec2::new(x as f32, self.viewport_height - (base_thickness + h))
        })
    }

    /// Caps every pile and target column at `max_height`.
    pub fn clamp_to(&mut self, max_height: f32) {
        for h in self.pile.iter_mut().chain(self.target.iter_mut()) {
            *h = h.min(max_height);
        }
    }

    /// Zeroes both fields without changing their length.
    pub fn clear(&mut self) {
        self.pile.fill(0.0);
        self.target.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero_filled_with_one_column_per_pixel() {
        let field = HeightField::new(10.7, 100.0);
        assert_eq!(field.len(), 10);
        assert!(field.pile.iter().all(|&h| h == 0.0));
        assert!(field.target.iter().all(|&h| h == 0.0));
        assert_eq!(field.scratch.len(), 10);
    }

    #[test]
    fn degenerate_width_still_has_one_column() {
        assert_eq!(HeightField::new(0.0, 10.0).len(), 1);
        assert_eq!(HeightField::new(0.4, 10.0).len(), 1);
        assert_eq!(HeightField::new(f32::NAN, 10.0).len(), 1);
    }

    #[test]
    fn resize_to_same_width_keeps_history() {
        let mut field = HeightField::new(8.0, 50.0);
        field.pile[3] = 4.0;
        field.target[3] = 5.0;

        assert!(!field.resize(8.0, 60.0));
        assert!(!field.resize(8.9, 60.0));

        assert_eq!(field.pile[3], 4.0);
        assert_eq!(field.target[3], 5.0);
        assert_eq!(field.viewport_height(), 60.0);
    }

    #[test]
    fn resize_to_new_width_resets_to_zeros() {
        let mut field = HeightField::new(8.0, 50.0);
        field.pile.fill(3.0);
        field.target.fill(3.0);

        assert!(field.resize(12.0, 50.0));

        assert_eq!(field.pile, vec![0.0; 12]);
        assert_eq!(field.target, vec![0.0; 12]);
        assert_eq!(field.scratch.len(), 12);
    }

    #[test]
    fn column_at_clamps_into_range() {
        let field = HeightField::new(10.0, 50.0);
        assert_eq!(field.column_at(-5.0), 0);
        assert_eq!(field.column_at(0.0), 0);
        assert_eq!(field.column_at(4.9), 4);
        assert_eq!(field.column_at(10.0), 9);
        assert_eq!(field.column_at(1e9), 9);
    }

    #[test]
    fn clamp_to_caps_pile_and_target() {
        let mut field = HeightField::new(3.0, 100.0);
        field.pile = vec![1.0, 9.0, 4.0];
        field.target = vec![8.0, 2.0, 4.0];

        field.clamp_to(4.0);

        assert_eq!(field.pile, vec![1.0, 4.0, 4.0]);
        assert_eq!(field.target, vec![4.0, 2.0, 4.0]);
    }

    #[test]
    fn surface_points_measure_from_bottom_edge() {
        let mut field = HeightField::new(3.0, 100.0);
        field.pile = vec![0.0, 5.0, 2.0];

        let pts: Vec<Vec2> = field.surface_points(10.0).collect();
        assert_eq!(
            pts,
            vec![
                Vec2::new(0.0, 90.0),
                Vec2::new(1.0, 85.0),
                Vec2::new(2.0, 88.0),
            ]
        );
        assert_eq!(field.surface_y(1, 10.0), 85.0);
    }
}
