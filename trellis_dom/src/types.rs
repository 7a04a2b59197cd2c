// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, flags, and box style.

use kurbo::Insets;

/// Identifier for a node in the document (generational).
///
/// Identifiers stay valid until the node is removed. A slot freed by
/// [`Document::remove`](crate::Document::remove) may be reused, but the reused
/// slot carries a newer generation, so stale identifiers never alias a new node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible. Hidden nodes keep their layout box and listeners.
        const VISIBLE = 0b0000_0001;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Box style of an element, as consulted by the measurement helpers.
///
/// `width` and `height` are explicit sizes in logical pixels; `None` means the
/// size comes from the host-provided layout box (see
/// [`Document::set_bounds`](crate::Document::set_bounds)).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    /// Explicit width, if any.
    pub width: Option<f64>,
    /// Explicit height, if any.
    pub height: Option<f64>,
    /// Outer margins (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub margin: Insets,
    /// Inner padding, same edge order as `margin`.
    pub padding: Insets,
}
