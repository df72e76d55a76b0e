// ── Tooltip placement ──
//
// Pure geometry for positioning a tooltip next to the cell that
// triggered it. Units are whatever the renderer uses (pixels, columns).

use serde::Serialize;

/// Minimum distance between the tooltip and the viewport edges.
pub const VIEWPORT_MARGIN: f64 = 8.0;

/// Gap between the anchor and the tooltip (room for the arrow).
pub const ANCHOR_GAP: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Where to draw the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    /// The arrow points down at the anchor; hidden when flipped below.
    pub arrow_visible: bool,
}

/// Center the tooltip above `anchor`, keep it inside the horizontal
/// margins and flip it below the anchor when it would overflow the top.
pub fn place_tooltip(anchor: Rect, tooltip: Size, viewport: Size) -> Placement {
    let mut left = anchor.left + anchor.width / 2.0 - tooltip.width / 2.0;
    let mut top = anchor.top - tooltip.height - ANCHOR_GAP;

    if left < VIEWPORT_MARGIN {
        left = VIEWPORT_MARGIN;
    }
    if left + tooltip.width > viewport.width - VIEWPORT_MARGIN {
        left = viewport.width - tooltip.width - VIEWPORT_MARGIN;
    }

    let arrow_visible = top >= VIEWPORT_MARGIN;
    if !arrow_visible {
        top = anchor.bottom() + ANCHOR_GAP;
    }

    Placement {
        left,
        top,
        arrow_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 1000.0,
        height: 800.0,
    };
    const TIP: Size = Size {
        width: 200.0,
        height: 80.0,
    };

    fn anchor(left: f64, top: f64) -> Rect {
        Rect {
            left,
            top,
            width: 100.0,
            height: 30.0,
        }
    }

    #[test]
    fn centered_above_anchor() {
        let p = place_tooltip(anchor(400.0, 300.0), TIP, VIEWPORT);
        assert_eq!(p.left, 350.0);
        assert_eq!(p.top, 208.0);
        assert!(p.arrow_visible);
    }

    #[test]
    fn clamped_to_left_margin() {
        let p = place_tooltip(anchor(0.0, 300.0), TIP, VIEWPORT);
        assert_eq!(p.left, 8.0);
    }

    #[test]
    fn clamped_to_right_margin() {
        let p = place_tooltip(anchor(950.0, 300.0), TIP, VIEWPORT);
        assert_eq!(p.left, 792.0);
    }

    #[test]
    fn flips_below_when_overflowing_top() {
        let p = place_tooltip(anchor(400.0, 50.0), TIP, VIEWPORT);
        assert_eq!(p.top, 92.0);
        assert!(!p.arrow_visible);
    }
}
