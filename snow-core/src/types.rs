use glam::Vec2;

/// Index of a horizontal pixel column in a [`crate::height_field::HeightField`].
///
/// Only meaningful for the field width it was computed against; a resize
/// that changes the column count invalidates it.
pub type Column = usize;

/// Maps a horizontal pixel coordinate to a column of a `len`-column field.
///
/// Negative and NaN coordinates map to column 0; anything past the right
/// edge maps to the last column.
pub fn column_index(x: f32, len: usize) -> Column {
    let last = len.saturating_sub(1);
    if x.is_nan() || x <= 0.0 {
        0
    } else {
        (x.floor() as usize).min(last)
    }
}

/// Latest pointer sample in canvas-local pixel coordinates.
///
/// `pos` is `None` when no pointer interaction is active (mouse left the
/// canvas, touch ended). `inside` is only `true` when `pos` is within the
/// canvas bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub pos: Option<Vec2>,
    pub inside: bool,
}

impl Pointer {
    /// No active pointer.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Builds a sample from a position already mapped into the canvas's
    /// local pixel space (origin at the top-left corner).
    pub fn from_local(x: f32, y: f32, width: f32, height: f32) -> Self {
        let inside = x >= 0.0 && y >= 0.0 && x <= width && y <= height;
        Self {
            pos: Some(Vec2::new(x, y)),
            inside,
        }
    }

    /// Position of the pointer if it is active and inside the canvas.
    pub fn active_pos(&self) -> Option<Vec2> {
        if self.inside { self.pos } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_index_clamps_into_range() {
        assert_eq!(column_index(-5.0, 10), 0);
        assert_eq!(column_index(f32::NAN, 10), 0);
        assert_eq!(column_index(4.9, 10), 4);
        assert_eq!(column_index(10.0, 10), 9);
        assert_eq!(column_index(3.0, 0), 0);
    }

    #[test]
    fn from_local_flags_inside_inclusive_of_edges() {
        assert!(Pointer::from_local(0.0, 0.0, 100.0, 50.0).inside);
        assert!(Pointer::from_local(100.0, 50.0, 100.0, 50.0).inside);
        assert!(!Pointer::from_local(-1.0, 10.0, 100.0, 50.0).inside);
        assert!(!Pointer::from_local(10.0, 50.5, 100.0, 50.0).inside);
    }

    #[test]
    fn active_pos_requires_inside_and_coordinates() {
        assert_eq!(Pointer::absent().active_pos(), None);

        let outside = Pointer::from_local(200.0, 10.0, 100.0, 50.0);
        assert_eq!(outside.active_pos(), None);

        let p = Pointer::from_local(20.0, 10.0, 100.0, 50.0);
        assert_eq!(p.active_pos(), Some(Vec2::new(20.0, 10.0)));
    }
}
