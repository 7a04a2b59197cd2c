// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The floating list a command menu opens.

use alloc::{format, string::String, vec::Vec};
use core::fmt::Write as _;
use kurbo::{Rect, Size};
use trellis_dom::{
    Document, DomEvent, EventKind, ListenerKey, NodeId, escape_html, format_template, outer_height,
};
use trellis_overlay::{Dock, LayerState, Overlay, Placement, place};

use crate::helper::{Classes, ControlHelper};
use crate::item::MenuItem;
use crate::resolve::{DomRows, RowHit, resolve_row_index};

/// Build the row markup for `items`.
///
/// Each row is `<li data-index="i" class="...">` holding `item_template`
/// formatted with the escaped item text. Rows get the `node` part classes,
/// plus `node-active` for `active_index` and `node-disabled` for disabled
/// items.
pub fn rows_markup<A: Copy>(
    helper: &ControlHelper<A>,
    items: &[MenuItem],
    active_index: Option<usize>,
    item_template: &str,
) -> String {
    let mut html = String::new();
    for (i, item) in items.iter().enumerate() {
        let mut classes: Vec<String> = helper.part_classes("node").into_vec();
        if active_index == Some(i) {
            classes.extend(helper.part_classes("node-active"));
        }
        if item.disabled {
            classes.extend(helper.part_classes("node-disabled"));
        }
        let text = escape_html(&item.text);
        let _ = write!(
            html,
            r#"<li data-index="{i}" class="{}">{}</li>"#,
            escape_html(&classes.join(" ")),
            format_template(item_template, &[("text", &text)]),
        );
    }
    html
}

/// The docked `ul` holding one row per item.
///
/// The element is built on first [`show`](Overlay::show), appended to the
/// document body, and carries a single delegated click listener. Until then
/// [`MenuLayer::render`] only records the markup.
pub struct MenuLayer {
    state: LayerState,
    element: Option<NodeId>,
    listener: Option<ListenerKey>,
    classes: Classes,
    disabled_class: String,
    markup: String,
    dock: Dock,
    placement: Option<Placement>,
}

impl core::fmt::Debug for MenuLayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MenuLayer")
            .field("state", &self.state)
            .field("element", &self.element)
            .field("listener", &self.listener)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl MenuLayer {
    /// A detached layer. `classes` go on the list element; rows carrying
    /// `disabled_class` ignore clicks.
    pub fn new(classes: Classes, disabled_class: impl Into<String>, dock: Dock) -> Self {
        Self {
            state: LayerState::Detached,
            element: None,
            listener: None,
            classes,
            disabled_class: disabled_class.into(),
            markup: String::new(),
            dock,
            placement: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LayerState {
        self.state
    }

    /// The list element, once built.
    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    /// The delegated click listener, once built.
    pub fn listener(&self) -> Option<ListenerKey> {
        self.listener
    }

    /// Where the layer was last docked.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Class marking disabled rows.
    pub fn disabled_class(&self) -> &str {
        &self.disabled_class
    }

    /// Re-render the rows from `items`, replacing all previous rows.
    pub fn render<A: Copy>(
        &mut self,
        doc: &mut Document,
        helper: &ControlHelper<A>,
        items: &[MenuItem],
        active_index: Option<usize>,
        item_template: &str,
    ) {
        if self.state == LayerState::Disposed {
            return;
        }
        self.markup = rows_markup(helper, items, active_index, item_template);
        if let Some(el) = self.element {
            doc.set_inner_html(el, &self.markup);
            tracing::trace!(rows = items.len(), "layer re-rendered");
        }
    }

    /// The row element for datasource index `index`, if the layer is built.
    pub fn row(&self, doc: &Document, index: usize) -> Option<NodeId> {
        let el = self.element?;
        trellis_dom::find(doc, el, &format!(r#"li[data-index="{index}"]"#))
            .ok()
            .flatten()
    }

    /// Map a click delivered to this layer's listener to a row.
    ///
    /// Events delivered anywhere else are misses.
    pub fn resolve_click(&self, doc: &Document, event: &DomEvent) -> RowHit {
        let Some(root) = self.element else {
            return RowHit::Miss;
        };
        if event.kind != EventKind::Click || event.current_target != root {
            return RowHit::Miss;
        }
        let rows = DomRows {
            doc,
            disabled_class: &self.disabled_class,
        };
        resolve_row_index(event.target, root, &rows)
    }

    /// Detach the listener, remove the element, and enter [`LayerState::Disposed`].
    pub fn dispose(&mut self, doc: &mut Document) {
        if self.state == LayerState::Disposed {
            return;
        }
        if let Some(key) = self.listener.take() {
            doc.remove_listener(key);
        }
        if let Some(el) = self.element.take() {
            doc.remove(el);
        }
        self.markup.clear();
        self.placement = None;
        let _ = self.state.transition(LayerState::Disposed);
        tracing::debug!("layer disposed");
    }

    fn build(&mut self, doc: &mut Document) -> NodeId {
        if let Some(el) = self.element {
            return el;
        }
        let el = doc.create_element("ul");
        doc.add_classes(el, &self.classes);
        doc.set_visible(el, false);
        doc.append_child(doc.body(), el);
        doc.set_inner_html(el, &self.markup);
        self.listener = doc.add_listener(el, EventKind::Click);
        self.element = Some(el);
        let _ = self.state.transition(LayerState::Hidden);
        el
    }

    fn dock_to(&mut self, doc: &mut Document, el: NodeId, anchor: NodeId) {
        let anchor_box = doc.bounds(anchor).unwrap_or(Rect::ZERO);
        let style = doc.style(el).unwrap_or_default();
        let width = style.width.unwrap_or(anchor_box.width());
        let height = style.height.unwrap_or_else(|| {
            doc.children_of(el)
                .iter()
                .map(|&row| outer_height(doc, row))
                .sum()
        });
        let placement = place(
            anchor_box,
            Size::new(width, height),
            doc.viewport(),
            &self.dock,
        );
        doc.set_bounds(el, placement.rect);
        self.placement = Some(placement);
    }
}

impl Overlay for MenuLayer {
    type Host = Document;
    type Anchor = NodeId;

    fn show(&mut self, doc: &mut Document, anchor: NodeId) {
        if self.state == LayerState::Disposed {
            return;
        }
        let el = self.build(doc);
        doc.set_visible(el, true);
        let _ = self.state.transition(LayerState::Shown);
        self.dock_to(doc, el, anchor);
        tracing::debug!(placement = ?self.placement, "layer shown");
    }

    fn hide(&mut self, doc: &mut Document) {
        if !self.state.is_built() {
            return;
        }
        if let Some(el) = self.element {
            doc.set_visible(el, false);
        }
        if self.state.is_shown() {
            tracing::debug!("layer hidden");
        }
        let _ = self.state.transition(LayerState::Hidden);
    }

    fn is_shown(&self) -> bool {
        self.state.is_shown()
    }
}
