// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Command Menu: a trigger that opens a docked list of actions.
//!
//! A [`CommandMenu`] binds to an anchor element. Clicking the anchor toggles a
//! [`MenuLayer`], a `ul` appended to the document body and docked below the
//! anchor (or above it when the viewport has no room below). Each row is
//! rendered from a [`MenuItem`]; clicking an enabled row calls the item's
//! handler, closes the layer, and emits a [`SelectEvent`] to every
//! [`on_select`](CommandMenu::on_select) subscriber.
//!
//! ## Host model
//!
//! The menu owns no document. The host keeps a [`trellis_dom::Document`],
//! passes it to every call, and routes the deliveries returned by
//! [`Document::dispatch`](trellis_dom::Document::dispatch) back through
//! [`CommandMenu::handle_event`]. Deliveries for listeners the menu did not
//! register are ignored, so several widgets can share one dispatch loop.
//!
//! ## Pieces
//!
//! - [`ControlHelper`]: part/state class names, tracked listeners, lifecycle stage.
//! - [`Lifecycle`] and [`LifeStage`]: `initialize`/`render`/`repaint`/`dispose`.
//! - [`Property`] and [`PropertyChange`]: assignments and the old/new diff that
//!   [`CommandMenu::repaint`] paints from.
//! - [`resolve_row_index`]: maps a click target to a row through a [`RowLookup`];
//!   [`DomRows`] implements it over a document.
//! - [`MenuLayer`]: implements [`trellis_overlay::Overlay`].
//!
//! ## Rows
//!
//! Rows look like `<li data-index="0" class="ui-commandmenu-node"><span>Copy</span></li>`.
//! Item text is always escaped before it is substituted into
//! [`MenuOptions::item_template`]. Disabled items carry the `node-disabled`
//! part classes and ignore clicks; [`CommandMenu::disable_item_by_value`] and
//! [`CommandMenu::enable_item_by_value`] toggle those classes on a rendered row.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod helper;
mod item;
mod layer;
mod lifecycle;
mod menu;
mod options;
mod property;
mod resolve;

pub use helper::{Classes, ControlHelper};
pub use item::{ItemHandler, MenuItem, SelectEvent};
pub use layer::{MenuLayer, rows_markup};
pub use lifecycle::{LifeStage, Lifecycle};
pub use menu::{CommandMenu, MenuAction};
pub use options::MenuOptions;
pub use property::{MenuState, Property, PropertyChange, StateFlags};
pub use resolve::{DomRows, RowHit, RowLookup, resolve_row_index};
