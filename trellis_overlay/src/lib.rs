// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Overlay: floating layer primitives.
//!
//! Dropdowns, menus, and popovers share one shape: a layer that is built on
//! first use, docked next to an anchor, shown and hidden, and eventually torn
//! down. This crate captures the parts of that shape that do not depend on a
//! particular widget or surface.
//!
//! - [`Overlay`]: the show/hide/toggle capability a layer implements for its host.
//! - [`LayerState`]: the layer lifecycle, rejecting transitions out of
//!   [`LayerState::Disposed`] with a [`TransitionError`].
//! - [`place`]: the pure docking rule, driven by a [`Dock`] configuration.
//!
//! ## Docking
//!
//! The default [`Dock`] attaches the layer's top to the anchor's bottom with
//! left edges aligned. With [`SpaceDetection::VERTICAL`] (on by default) the
//! layer opens upward when the viewport has no room below the anchor but has
//! room above it. [`SpaceDetection::HORIZONTAL`] swaps the aligned edge when
//! the layer would overflow the viewport sideways. [`Dock::strict_width`]
//! makes the layer at least as wide as its anchor.
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use trellis_overlay::{Dock, HorizontalEdge, SpaceDetection, place};
//!
//! let viewport = Rect::new(0.0, 0.0, 320.0, 240.0);
//! let anchor = Rect::new(260.0, 8.0, 310.0, 28.0);
//! let dock = Dock { space_detection: SpaceDetection::all(), ..Dock::default() };
//!
//! let p = place(anchor, Size::new(120.0, 80.0), viewport, &dock);
//! assert_eq!(p.horizontal, HorizontalEdge::Right);
//! assert_eq!(p.rect, Rect::new(190.0, 28.0, 310.0, 108.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod dock;
mod layer;

pub use dock::{Dock, HorizontalEdge, Placement, SpaceDetection, VerticalEdge, place};
pub use layer::{LayerState, Overlay, TransitionError};
