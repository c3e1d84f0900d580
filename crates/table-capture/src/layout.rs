use anyhow::Result;

use crate::geometry::Rect;

/// Calibrated regions of the poker client, fixed offsets relative to the
/// captured client area. Slot and indicator positions were measured
/// against the stock table at its default window size.
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// The two hole-card slots, left to right.
    pub hole_slots: [Rect; 2],
    /// Single pixel that goes solid white while hole cards are dealt.
    pub hole_indicator: Rect,
    /// The five community-card slots, left to right.
    pub board_slots: [Rect; 5],
    /// Single pixels lit white once the flop/turn/river card backs land.
    /// Index 0 = flop, 1 = turn, 2 = river.
    pub board_indicators: [Rect; 3],
    /// Bounding box spanning both hole slots; the settle detector watches
    /// this for deal animation.
    pub hand_bounds: Rect,
    /// Bounding box spanning all five board slots.
    pub board_bounds: Rect,
}

const HOLE_SLOT_W: u32 = 35;
const HOLE_SLOT_H: u32 = 42;
const BOARD_SLOT_W: u32 = 49;
const BOARD_SLOT_H: u32 = 59;

const HOLE_SLOT_XS: [u32; 2] = [442, 480];
const HOLE_SLOT_Y: u32 = 328;
const BOARD_SLOT_XS: [u32; 5] = [335, 395, 455, 514, 574];
const BOARD_SLOT_Y: u32 = 211;
const BOARD_INDICATOR_XS: [u32; 3] = [496, 556, 612];
const BOARD_INDICATOR_Y: u32 = 220;

impl TableLayout {
    /// Build the layout validated against the client-area rectangle.
    /// Any region outside the window is a fatal configuration error.
    pub fn new(window: Rect) -> Result<Self> {
        let hole_slots = [
            Rect::within(&window, HOLE_SLOT_XS[0], HOLE_SLOT_Y, HOLE_SLOT_W, HOLE_SLOT_H)?,
            Rect::within(&window, HOLE_SLOT_XS[1], HOLE_SLOT_Y, HOLE_SLOT_W, HOLE_SLOT_H)?,
        ];
        let hole_indicator = Rect::within(&window, 470, 330, 1, 1)?;

        let mut board_slots = [Rect::new(0, 0, 0, 0); 5];
        for (slot, x) in board_slots.iter_mut().zip(BOARD_SLOT_XS) {
            *slot = Rect::within(&window, x, BOARD_SLOT_Y, BOARD_SLOT_W, BOARD_SLOT_H)?;
        }

        let mut board_indicators = [Rect::new(0, 0, 0, 0); 3];
        for (px, x) in board_indicators.iter_mut().zip(BOARD_INDICATOR_XS) {
            *px = Rect::within(&window, x, BOARD_INDICATOR_Y, 1, 1)?;
        }

        let hand_bounds = Rect::span(&hole_slots[0], &hole_slots[1]);
        let board_bounds = Rect::span(&board_slots[0], &board_slots[4]);

        Ok(Self {
            hole_slots,
            hole_indicator,
            board_slots,
            board_indicators,
            hand_bounds,
            board_bounds,
        })
    }

    /// Smallest client area the calibrated regions fit inside.
    pub fn required_size(&self) -> (u32, u32) {
        let mut w = 0;
        let mut h = 0;
        for rect in self
            .hole_slots
            .iter()
            .chain(self.board_slots.iter())
            .chain(self.board_indicators.iter())
            .chain([&self.hole_indicator])
        {
            w = w.max(rect.right());
            h = h.max(rect.bottom());
        }
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fits_reference_window() {
        let layout = TableLayout::new(Rect::new(0, 0, 800, 600)).unwrap();
        let window = Rect::new(0, 0, 800, 600);
        for slot in layout.hole_slots.iter().chain(layout.board_slots.iter()) {
            assert!(window.contains(slot));
        }
        assert!(window.contains(&layout.hand_bounds));
        assert!(window.contains(&layout.board_bounds));
    }

    #[test]
    fn test_layout_rejects_small_window() {
        assert!(TableLayout::new(Rect::new(0, 0, 640, 480)).is_err());
    }

    #[test]
    fn test_derived_bounds_span_slots() {
        let layout = TableLayout::new(Rect::new(0, 0, 800, 600)).unwrap();
        assert_eq!(layout.hand_bounds.left(), layout.hole_slots[0].left());
        assert_eq!(layout.hand_bounds.right(), layout.hole_slots[1].right());
        assert_eq!(layout.board_bounds.left(), layout.board_slots[0].left());
        assert_eq!(layout.board_bounds.right(), layout.board_slots[4].right());
        assert_eq!(layout.board_bounds.height, 59);
    }

    #[test]
    fn test_required_size() {
        let layout = TableLayout::new(Rect::new(0, 0, 800, 600)).unwrap();
        let (w, h) = layout.required_size();
        assert_eq!(w, 574 + 49);
        assert_eq!(h, 328 + 42);
    }
}
