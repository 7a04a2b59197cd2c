// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement helpers over explicit style and host-provided layout boxes.
//!
//! Widths resolve the way a block box does: an explicit style width wins,
//! then the host layout box, and an auto-width block otherwise fills its
//! parent's content box (the parent's width minus its horizontal padding).

use crate::Document;
use crate::types::NodeId;

/// Resolved border-box width of an element.
///
/// Returns `0.0` for stale identifiers and text nodes.
pub fn computed_width(doc: &Document, el: NodeId) -> f64 {
    if !doc.is_element(el) {
        return 0.0;
    }
    let (Some(style), Some(bounds)) = (doc.style(el), doc.bounds(el)) else {
        return 0.0;
    };
    if let Some(width) = style.width {
        return width.max(0.0);
    }
    if bounds.width() > 0.0 {
        return bounds.width();
    }
    doc.parent_of(el)
        .map_or(0.0, |parent| content_width(doc, parent))
}

/// Resolved border-box height of an element: style height, else layout box height.
pub fn computed_height(doc: &Document, el: NodeId) -> f64 {
    match (doc.style(el), doc.bounds(el)) {
        (Some(style), Some(bounds)) => style.height.unwrap_or(bounds.height()).max(0.0),
        _ => 0.0,
    }
}

fn content_width(doc: &Document, el: NodeId) -> f64 {
    let padding = doc.style(el).map_or(0.0, |s| s.padding.x_value());
    (computed_width(doc, el) - padding).max(0.0)
}

/// Height of `el` including its top and bottom margins.
///
/// ```
/// use kurbo::{Insets, Rect};
/// use trellis_dom::{Document, Style, outer_height};
///
/// let mut doc = Document::default();
/// let row = doc.create_element("li");
/// doc.set_bounds(row, Rect::new(0.0, 0.0, 100.0, 24.0));
/// doc.set_style(row, Style { margin: Insets::new(0.0, 2.0, 0.0, 4.0), ..Style::default() });
/// assert_eq!(outer_height(&doc, row), 30.0);
/// ```
pub fn outer_height(doc: &Document, el: NodeId) -> f64 {
    let margin = doc.style(el).map_or(0.0, |s| s.margin.y0 + s.margin.y1);
    computed_height(doc, el) + margin
}

/// Width available to block content inside `el`.
///
/// Appends an empty block ruler to `el`, reads its resolved width, and
/// removes it again, so the document is unchanged afterwards.
///
/// ```
/// use kurbo::{Insets, Rect};
/// use trellis_dom::{Document, Style, measure_width};
///
/// let mut doc = Document::new(Rect::new(0.0, 0.0, 640.0, 480.0));
/// let panel = doc.create_element("div");
/// doc.append_child(doc.body(), panel);
/// doc.set_style(panel, Style { padding: Insets::uniform_xy(20.0, 0.0), ..Style::default() });
///
/// assert_eq!(measure_width(&mut doc, panel), 600.0);
/// assert!(doc.children_of(panel).is_empty());
/// ```
pub fn measure_width(doc: &mut Document, el: NodeId) -> f64 {
    if !doc.is_element(el) {
        return 0.0;
    }
    let ruler = doc.create_element("div");
    doc.append_child(el, ruler);
    let width = computed_width(doc, ruler);
    doc.remove(ruler);
    width
}
