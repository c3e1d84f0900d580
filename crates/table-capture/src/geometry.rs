use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A pixel rectangle positioned relative to a parent origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> u32 {
        self.x
    }

    pub fn top(&self) -> u32 {
        self.y
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.left() <= other.left()
            && self.right() >= other.right()
            && self.top() <= other.top()
            && self.bottom() >= other.bottom()
    }

    /// Construct a child rectangle, failing unless it lies fully inside
    /// `parent`. Calibrated regions go through here so a bad offset is a
    /// startup error rather than a silent mis-crop.
    pub fn within(parent: &Rect, x: u32, y: u32, width: u32, height: u32) -> Result<Rect> {
        let rect = Rect::new(x, y, width, height);
        if !parent.contains(&rect) {
            bail!(
                "region {}x{}+{}+{} falls outside parent {}x{}+{}+{}",
                rect.width,
                rect.height,
                rect.x,
                rect.y,
                parent.width,
                parent.height,
                parent.x,
                parent.y,
            );
        }
        Ok(rect)
    }

    /// Bounding box spanning from `first`'s top-left to `last`'s
    /// bottom-right.
    pub fn span(first: &Rect, last: &Rect) -> Rect {
        Rect::new(
            first.left(),
            first.top(),
            last.right() - first.left(),
            last.bottom() - first.top(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.right() - r.left(), r.width);
        assert_eq!(r.bottom() - r.top(), r.height);
    }

    #[test]
    fn test_within_accepts_contained() {
        let parent = Rect::new(0, 0, 100, 100);
        let r = Rect::within(&parent, 10, 10, 50, 50).unwrap();
        assert_eq!(r, Rect::new(10, 10, 50, 50));
        // A child filling the parent exactly is still inside.
        assert!(Rect::within(&parent, 0, 0, 100, 100).is_ok());
    }

    #[test]
    fn test_within_rejects_overflow() {
        let parent = Rect::new(0, 0, 100, 100);
        assert!(Rect::within(&parent, 60, 10, 50, 20).is_err());
        assert!(Rect::within(&parent, 10, 90, 20, 20).is_err());
    }

    #[test]
    fn test_span() {
        let first = Rect::new(335, 211, 49, 59);
        let last = Rect::new(574, 211, 49, 59);
        let bounds = Rect::span(&first, &last);
        assert_eq!(bounds, Rect::new(335, 211, 288, 59));
    }
}
