// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Docking a floating layer next to its anchor.

use kurbo::{Point, Rect, Size};

/// Which anchor edge the layer's near edge attaches to, vertically.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalEdge {
    /// Layer top at the anchor's bottom (the layer opens downward).
    #[default]
    Below,
    /// Layer bottom at the anchor's top (the layer opens upward).
    Above,
}

/// Which edges of the layer and the anchor line up, horizontally.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalEdge {
    /// Left edges aligned.
    #[default]
    Left,
    /// Right edges aligned.
    Right,
}

bitflags::bitflags! {
    /// Axes on which [`place`] may flip the layer to keep it inside the viewport.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SpaceDetection: u8 {
        /// Open upward when there is no room below but room above (and vice versa).
        const VERTICAL = 0b0000_0001;
        /// Swap the aligned edge when the layer would overflow horizontally.
        const HORIZONTAL = 0b0000_0010;
    }
}

/// Docking rule for a floating layer.
///
/// The default opens below the anchor, left-aligned, flipping upward when the
/// viewport has no room below.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dock {
    /// Preferred vertical attachment.
    pub vertical: VerticalEdge,
    /// Preferred horizontal alignment.
    pub horizontal: HorizontalEdge,
    /// Axes allowed to flip.
    pub space_detection: SpaceDetection,
    /// Make the layer at least as wide as the anchor.
    pub strict_width: bool,
}

impl Default for Dock {
    fn default() -> Self {
        Self {
            vertical: VerticalEdge::Below,
            horizontal: HorizontalEdge::Left,
            space_detection: SpaceDetection::VERTICAL,
            strict_width: false,
        }
    }
}

/// Result of [`place`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// The layer's box in viewport space.
    pub rect: Rect,
    /// The vertical edge actually used.
    pub vertical: VerticalEdge,
    /// The horizontal alignment actually used.
    pub horizontal: HorizontalEdge,
}

impl Placement {
    /// Returns true if space detection moved the layer off its preferred vertical edge.
    pub fn flipped_vertically(&self, dock: &Dock) -> bool {
        self.vertical != dock.vertical
    }

    /// Returns true if space detection moved the layer off its preferred horizontal alignment.
    pub fn flipped_horizontally(&self, dock: &Dock) -> bool {
        self.horizontal != dock.horizontal
    }
}

/// Compute where a layer of size `layer` goes relative to `anchor`.
///
/// A flip only happens when the preferred side lacks room and the opposite
/// side has it; when neither side fits, the preferred side is kept.
///
/// ```
/// use kurbo::{Rect, Size};
/// use trellis_overlay::{Dock, VerticalEdge, place};
///
/// let viewport = Rect::new(0.0, 0.0, 400.0, 300.0);
/// let layer = Size::new(120.0, 100.0);
///
/// // Plenty of room below.
/// let anchor = Rect::new(10.0, 20.0, 90.0, 44.0);
/// let p = place(anchor, layer, viewport, &Dock::default());
/// assert_eq!(p.rect, Rect::new(10.0, 44.0, 130.0, 144.0));
///
/// // Near the bottom edge the layer opens upward.
/// let anchor = Rect::new(10.0, 250.0, 90.0, 274.0);
/// let p = place(anchor, layer, viewport, &Dock::default());
/// assert_eq!(p.vertical, VerticalEdge::Above);
/// assert_eq!(p.rect.y1, 250.0);
/// ```
pub fn place(anchor: Rect, layer: Size, viewport: Rect, dock: &Dock) -> Placement {
    let width = if dock.strict_width {
        layer.width.max(anchor.width())
    } else {
        layer.width
    };
    let height = layer.height;

    let space_below = viewport.y1 - anchor.y1;
    let space_above = anchor.y0 - viewport.y0;
    let mut vertical = dock.vertical;
    if dock.space_detection.contains(SpaceDetection::VERTICAL) {
        vertical = match dock.vertical {
            VerticalEdge::Below if height > space_below && height <= space_above => {
                VerticalEdge::Above
            }
            VerticalEdge::Above if height > space_above && height <= space_below => {
                VerticalEdge::Below
            }
            preferred => preferred,
        };
    }

    let fits_left_aligned = anchor.x0 + width <= viewport.x1;
    let fits_right_aligned = anchor.x1 - width >= viewport.x0;
    let mut horizontal = dock.horizontal;
    if dock.space_detection.contains(SpaceDetection::HORIZONTAL) {
        horizontal = match dock.horizontal {
            HorizontalEdge::Left if !fits_left_aligned && fits_right_aligned => {
                HorizontalEdge::Right
            }
            HorizontalEdge::Right if !fits_right_aligned && fits_left_aligned => {
                HorizontalEdge::Left
            }
            preferred => preferred,
        };
    }

    if vertical != dock.vertical || horizontal != dock.horizontal {
        tracing::debug!(
            ?vertical,
            ?horizontal,
            space_below,
            space_above,
            "layer flipped to fit viewport"
        );
    }

    let x = match horizontal {
        HorizontalEdge::Left => anchor.x0,
        HorizontalEdge::Right => anchor.x1 - width,
    };
    let y = match vertical {
        VerticalEdge::Below => anchor.y1,
        VerticalEdge::Above => anchor.y0 - height,
    };
    Placement {
        rect: Rect::from_origin_size(Point::new(x, y), Size::new(width, height)),
        vertical,
        horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    #[test]
    fn default_docks_below_left() {
        let anchor = Rect::new(50.0, 10.0, 150.0, 30.0);
        let dock = Dock::default();
        let p = place(anchor, Size::new(80.0, 60.0), VIEWPORT, &dock);
        assert_eq!(p.rect, Rect::new(50.0, 30.0, 130.0, 90.0));
        assert!(!p.flipped_vertically(&dock));
        assert!(!p.flipped_horizontally(&dock));
    }

    #[test]
    fn no_flip_when_neither_side_fits() {
        let anchor = Rect::new(0.0, 140.0, 100.0, 160.0);
        let p = place(anchor, Size::new(80.0, 200.0), VIEWPORT, &Dock::default());
        assert_eq!(p.vertical, VerticalEdge::Below);
        assert_eq!(p.rect.y0, 160.0);
    }

    #[test]
    fn vertical_detection_can_be_disabled() {
        let anchor = Rect::new(0.0, 260.0, 100.0, 280.0);
        let dock = Dock {
            space_detection: SpaceDetection::empty(),
            ..Dock::default()
        };
        let p = place(anchor, Size::new(80.0, 100.0), VIEWPORT, &dock);
        assert_eq!(p.vertical, VerticalEdge::Below);
    }

    #[test]
    fn preferred_above_flips_down_near_top() {
        let anchor = Rect::new(0.0, 10.0, 100.0, 30.0);
        let dock = Dock {
            vertical: VerticalEdge::Above,
            ..Dock::default()
        };
        let p = place(anchor, Size::new(80.0, 50.0), VIEWPORT, &dock);
        assert_eq!(p.vertical, VerticalEdge::Below);
        assert_eq!(p.rect.y0, 30.0);
        assert!(p.flipped_vertically(&dock));
    }

    #[test]
    fn horizontal_detection_right_aligns_on_overflow() {
        let anchor = Rect::new(320.0, 10.0, 390.0, 30.0);
        let layer = Size::new(150.0, 40.0);
        let off = place(anchor, layer, VIEWPORT, &Dock::default());
        assert_eq!(off.horizontal, HorizontalEdge::Left);
        assert_eq!(off.rect.x0, 320.0);

        let dock = Dock {
            space_detection: SpaceDetection::all(),
            ..Dock::default()
        };
        let on = place(anchor, layer, VIEWPORT, &dock);
        assert_eq!(on.horizontal, HorizontalEdge::Right);
        assert_eq!(on.rect.x1, 390.0);
        assert_eq!(on.rect.x0, 240.0);
    }

    #[test]
    fn strict_width_grows_to_anchor() {
        let anchor = Rect::new(10.0, 10.0, 210.0, 30.0);
        let dock = Dock {
            strict_width: true,
            ..Dock::default()
        };
        let p = place(anchor, Size::new(120.0, 40.0), VIEWPORT, &dock);
        assert_eq!(p.rect.width(), 200.0);
        let wide = place(anchor, Size::new(260.0, 40.0), VIEWPORT, &dock);
        assert_eq!(wide.rect.width(), 260.0);
    }
}
