//! Integer axis-aligned rectangles for collision boxes and hit regions

use glam::Vec2;

/// Axis-aligned rectangle in window pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at a sub-pixel position, snapped to the nearest pixel
    /// (ties to even, matching how sprites are placed on screen)
    pub fn at(position: Vec2, width: i32, height: i32) -> Self {
        Self::new(
            position.x.round_ties_even() as i32,
            position.y.round_ties_even() as i32,
            width,
            height,
        )
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Grow (or shrink, with negative amounts) on every side
    pub fn inflate(self, horizontal: i32, vertical: i32) -> Self {
        Self::new(
            self.x - horizontal,
            self.y - vertical,
            self.width + horizontal * 2,
            self.height + vertical * 2,
        )
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left() as f32
            && point.x < self.right() as f32
            && point.y >= self.top() as f32
            && point.y < self.bottom() as f32
    }
}
