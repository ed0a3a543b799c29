//! Axis-aligned integer rectangles and clip math.
//!
//! Pure geometry with no failure modes: degenerate rectangles (non-positive
//! width or height) simply behave as empty and intersect to empty.

/// Axis-aligned integer rectangle.
///
/// `width`/`height` may be zero or negative; such rectangles are empty and
/// contain no pixels. Coordinates are in whatever space the caller is
/// working in (buffer space or view space).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size at the origin.
    #[inline]
    pub const fn of_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge (`x + width`), saturating at `i32::MAX` so that
    /// exploratory geometry near the integer limits clips instead of
    /// overflowing.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge (`y + height`), saturating at `i32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// True iff the rectangle contains no pixels (width or height ≤ 0).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True iff the point `(x, y)` lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True iff `other` lies entirely inside `self`.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Axis-aligned intersection.
    ///
    /// Returns [`Rect::EMPTY`] when the rectangles do not overlap or either
    /// input is empty.
    pub const fn intersect(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::EMPTY;
        }
        let x0 = if self.x > other.x { self.x } else { other.x };
        let y0 = if self.y > other.y { self.y } else { other.y };
        let x1 = if self.right() < other.right() {
            self.right()
        } else {
            other.right()
        };
        let y1 = if self.bottom() < other.bottom() {
            self.bottom()
        } else {
            other.bottom()
        };
        if x0 >= x1 || y0 >= y1 {
            return Rect::EMPTY;
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub const fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_detection() {
        assert!(Rect::EMPTY.is_empty());
        assert!(Rect::new(3, 4, 0, 10).is_empty());
        assert!(Rect::new(3, 4, 10, 0).is_empty());
        assert!(Rect::new(3, 4, -1, 10).is_empty());
        assert!(!Rect::new(3, 4, 1, 1).is_empty());
    }

    #[test]
    fn edges() {
        let r = Rect::new(2, 3, 10, 20);
        assert_eq!(r.right(), 12);
        assert_eq!(r.bottom(), 23);
    }

    #[test]
    fn contains_point() {
        let r = Rect::new(-2, -2, 4, 4);
        assert!(r.contains(-2, -2));
        assert!(r.contains(1, 1));
        assert!(!r.contains(2, 1));
        assert!(!r.contains(1, 2));
        assert!(!r.contains(-3, 0));
        assert!(!Rect::EMPTY.contains(0, 0));
    }

    #[test]
    fn contains_rect() {
        let outer = Rect::of_size(10, 10);
        assert!(outer.contains_rect(&Rect::new(0, 0, 10, 10)));
        assert!(outer.contains_rect(&Rect::new(2, 2, 3, 3)));
        assert!(!outer.contains_rect(&Rect::new(5, 5, 6, 6)));
        assert!(!outer.contains_rect(&Rect::new(-1, 0, 5, 5)));
        assert!(!outer.contains_rect(&Rect::EMPTY));
    }

    #[test]
    fn intersect_overlapping() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));
        assert_eq!(b.intersect(&a), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn intersect_contained() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(2, 3, 4, 5);
        assert_eq!(a.intersect(&b), b);
    }

    #[test]
    fn intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), Rect::EMPTY);
        assert_eq!(a.intersect(&Rect::new(0, 10, 5, 5)), Rect::EMPTY);
        assert_eq!(a.intersect(&Rect::new(-5, -5, 5, 5)), Rect::EMPTY);
    }

    #[test]
    fn intersect_degenerate_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersect(&Rect::new(5, 5, 0, 5)).is_empty());
        assert!(a.intersect(&Rect::new(5, 5, -3, 5)).is_empty());
        assert!(Rect::EMPTY.intersect(&a).is_empty());
    }

    #[test]
    fn intersect_negative_origin() {
        let a = Rect::new(-5, -5, 10, 10);
        let b = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(0, 0, 5, 5));
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let huge = Rect::new(1, 1, i32::MAX, i32::MAX);
        assert_eq!(huge.right(), i32::MAX);
        assert_eq!(huge.bottom(), i32::MAX);
        let small = Rect::new(2, 3, 4, 5);
        assert_eq!(huge.intersect(&small), small);
        let far = Rect::new(i32::MIN, i32::MIN, 10, 10);
        assert!(far.intersect(&small).is_empty());
        assert!(huge.contains(i32::MAX - 1, 1));
    }

    #[test]
    fn translate_moves_origin() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.translate(10, -20), Rect::new(11, -18, 3, 4));
        assert_eq!(r.translate(0, 0), r);
    }
}
