// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command menu control.

use alloc::{boxed::Box, string::String, vec::Vec};
use trellis_dom::{Delivery, Document, EventKind, NodeId, Style, escape_html};
use trellis_overlay::Overlay;

use crate::helper::ControlHelper;
use crate::item::{MenuItem, SelectEvent};
use crate::layer::MenuLayer;
use crate::lifecycle::{LifeStage, Lifecycle};
use crate::options::MenuOptions;
use crate::property::{MenuState, Property, PropertyChange, StateFlags};
use crate::resolve::RowHit;

/// What a listener tracked by the control's helper is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Click on the anchor: toggle the layer.
    ToggleLayer,
}

type SelectCallback = Box<dyn FnMut(&SelectEvent)>;

/// A trigger that toggles a docked list of selectable actions.
///
/// The host owns the [`Document`] and passes it to every call. Deliveries
/// produced by [`Document::dispatch`] are routed back with
/// [`CommandMenu::handle_event`]; listeners the menu does not own are ignored.
///
/// ```
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use trellis_command_menu::{CommandMenu, MenuItem, MenuOptions};
/// use trellis_dom::{Document, EventKind};
///
/// let mut doc = Document::default();
/// let anchor = doc.create_element("div");
/// doc.append_child(doc.body(), anchor);
///
/// let mut menu = CommandMenu::new(MenuOptions::default());
/// menu.initialize(&mut doc, anchor);
/// menu.set_display_text(&mut doc, "Actions");
/// menu.set_datasource(&mut doc, vec![MenuItem::new("Copy", "copy"), MenuItem::new("Paste", "paste")]);
/// menu.render(&mut doc);
///
/// let picked = Rc::new(Cell::new(None));
/// let sink = picked.clone();
/// menu.on_select(move |e| sink.set(Some(e.index)));
///
/// // Open the menu, then click the second row.
/// for d in doc.dispatch(anchor, EventKind::Click) {
///     menu.handle_event(&mut doc, d);
/// }
/// assert!(menu.is_open());
/// let row = menu.layer().row(&doc, 1).unwrap();
/// for d in doc.dispatch(row, EventKind::Click) {
///     menu.handle_event(&mut doc, d);
/// }
/// assert_eq!(picked.get(), Some(1));
/// assert!(!menu.is_open());
/// ```
pub struct CommandMenu {
    options: MenuOptions,
    helper: ControlHelper<MenuAction>,
    state: MenuState,
    layer: MenuLayer,
    anchor: Option<NodeId>,
    subscribers: Vec<SelectCallback>,
}

impl core::fmt::Debug for CommandMenu {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandMenu")
            .field("stage", &self.helper.stage())
            .field("anchor", &self.anchor)
            .field("state", &self.state)
            .field("layer", &self.layer)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl CommandMenu {
    /// Create a menu with a detached layer.
    pub fn new(options: MenuOptions) -> Self {
        let mut helper = ControlHelper::new(
            &options.prefix,
            &options.type_name,
            options.skin.as_deref(),
        );
        let disabled_class = helper
            .part_classes("node-disabled")
            .into_iter()
            .next()
            .unwrap_or_default();
        let layer = MenuLayer::new(helper.part_classes("layer"), disabled_class, options.dock);
        helper.change_stage(LifeStage::Inited);
        Self {
            options,
            helper,
            state: MenuState::default(),
            layer,
            anchor: None,
            subscribers: Vec::new(),
        }
    }

    /// Bind to `anchor`: clicks on it toggle the layer.
    ///
    /// Only the first call binds; later calls are ignored.
    pub fn initialize(&mut self, doc: &mut Document, anchor: NodeId) {
        if self.anchor.is_some() || self.helper.is_in_stage(LifeStage::Disposed) {
            return;
        }
        if self
            .helper
            .add_dom_event(doc, anchor, EventKind::Click, MenuAction::ToggleLayer)
            .is_none()
        {
            tracing::warn!(?anchor, "command menu anchor is not in the document");
            return;
        }
        self.anchor = Some(anchor);
    }

    /// Paint the anchor and every property. Later calls do nothing.
    pub fn render(&mut self, doc: &mut Document) {
        if !self.helper.is_in_stage(LifeStage::Inited) {
            return;
        }
        if let Some(anchor) = self.anchor {
            doc.add_classes(anchor, &self.helper.root_classes());
        }
        let changes = self.state.full_diff();
        self.helper.change_stage(LifeStage::Rendered);
        self.repaint(doc, &changes);
    }

    /// Replace the items and re-render the layer.
    pub fn set_datasource(&mut self, doc: &mut Document, items: Vec<MenuItem>) {
        self.set_properties(doc, [Property::Datasource(items)]);
    }

    /// Set the highlighted row.
    pub fn set_active_index(&mut self, doc: &mut Document, index: Option<usize>) {
        self.set_properties(doc, [Property::ActiveIndex(index)]);
    }

    /// Set the anchor label. It is escaped before it reaches markup.
    pub fn set_display_text(&mut self, doc: &mut Document, text: impl Into<String>) {
        self.set_properties(doc, [Property::DisplayText(text.into())]);
    }

    /// Disable or enable the whole control.
    pub fn set_disabled(&mut self, doc: &mut Document, disabled: bool) {
        self.set_properties(doc, [Property::Disabled(disabled)]);
    }

    /// Hide or show the whole control.
    pub fn set_hidden(&mut self, doc: &mut Document, hidden: bool) {
        self.set_properties(doc, [Property::Hidden(hidden)]);
    }

    /// Make the control read-only.
    pub fn set_read_only(&mut self, doc: &mut Document, read_only: bool) {
        self.set_properties(doc, [Property::ReadOnly(read_only)]);
    }

    /// Set explicit anchor width and height.
    pub fn set_size(&mut self, doc: &mut Document, width: Option<f64>, height: Option<f64>) {
        self.set_properties(doc, [Property::Width(width), Property::Height(height)]);
    }

    /// Assign a batch of properties and repaint what changed.
    ///
    /// Before [`render`](Self::render) only the values are stored. Returns the
    /// changes in application order.
    pub fn set_properties(
        &mut self,
        doc: &mut Document,
        props: impl IntoIterator<Item = Property>,
    ) -> Vec<PropertyChange> {
        if self.helper.is_in_stage(LifeStage::Disposed) {
            return Vec::new();
        }
        let changes = self.state.apply_all(props);
        if self.helper.is_in_stage(LifeStage::Rendered) && !changes.is_empty() {
            self.repaint(doc, &changes);
        }
        changes
    }

    /// Paint exactly the given changes.
    pub fn repaint(&mut self, doc: &mut Document, changes: &[PropertyChange]) {
        if self.helper.is_in_stage(LifeStage::Disposed) {
            return;
        }
        for change in changes {
            match change {
                PropertyChange::Width { new, .. } => self.paint_style(doc, |s| s.width = *new),
                PropertyChange::Height { new, .. } => self.paint_style(doc, |s| s.height = *new),
                PropertyChange::Datasource { .. } | PropertyChange::ActiveIndex { .. } => {
                    self.render_layer(doc);
                }
                PropertyChange::DisplayText { new, .. } => {
                    if let Some(anchor) = self.anchor {
                        doc.set_inner_html(anchor, &escape_html(new));
                    }
                }
                PropertyChange::State { flag, set } => self.paint_state(doc, *flag, *set),
            }
        }
    }

    /// Add the disabled row classes to the first item whose value is `value`.
    ///
    /// Does nothing if the layer is not built or no item matches. The item's
    /// own `disabled` field is untouched; a re-render restores it.
    pub fn disable_item_by_value(&mut self, doc: &mut Document, value: &str) {
        if let Some(row) = self.row_by_value(doc, value) {
            doc.add_classes(row, &self.helper.part_classes("node-disabled"));
        }
    }

    /// Remove the disabled row classes from the first item whose value is `value`.
    pub fn enable_item_by_value(&mut self, doc: &mut Document, value: &str) {
        if let Some(row) = self.row_by_value(doc, value) {
            doc.remove_classes(row, &self.helper.part_classes("node-disabled"));
        }
    }

    /// Route one delivery from [`Document::dispatch`].
    ///
    /// Returns `true` if the delivery belonged to this menu.
    pub fn handle_event(&mut self, doc: &mut Document, delivery: Delivery) -> bool {
        if self.helper.is_in_stage(LifeStage::Disposed) {
            return false;
        }
        if let Some(action) = self.helper.action_for(delivery.listener) {
            match action {
                MenuAction::ToggleLayer => self.toggle_layer(doc),
            }
            return true;
        }
        if self.layer.listener() == Some(delivery.listener) {
            let hit = self.layer.resolve_click(doc, &delivery.event);
            self.select(doc, hit);
            return true;
        }
        false
    }

    /// Close the layer when a click landed outside both the anchor and the layer.
    pub fn dismiss_outside(&mut self, doc: &mut Document, target: NodeId) {
        if !self.layer.is_shown() {
            return;
        }
        let inside = |root: Option<NodeId>| root.is_some_and(|r| doc.contains(r, target));
        if inside(self.anchor) || inside(self.layer.element()) {
            return;
        }
        tracing::trace!(?target, "outside click");
        self.layer.hide(doc);
    }

    /// Subscribe to `select` notifications.
    pub fn on_select(&mut self, callback: impl FnMut(&SelectEvent) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Open the layer if the control is interactive.
    pub fn open(&mut self, doc: &mut Document) {
        if let Some(anchor) = self.anchor
            && !self.state.is_inert()
            && !self.helper.is_in_stage(LifeStage::Disposed)
        {
            self.layer.show(doc, anchor);
        }
    }

    /// Close the layer.
    pub fn close(&mut self, doc: &mut Document) {
        self.layer.hide(doc);
    }

    /// Returns true if the layer is visible.
    pub fn is_open(&self) -> bool {
        self.layer.is_shown()
    }

    /// Current items.
    pub fn datasource(&self) -> &[MenuItem] {
        &self.state.datasource
    }

    /// Mutable access to the items without repainting.
    ///
    /// Rendered rows keep their old indices until the next repaint, so a
    /// click on a row whose index no longer exists emits `select` with no item.
    pub fn datasource_mut(&mut self) -> &mut Vec<MenuItem> {
        &mut self.state.datasource
    }

    /// Current property values.
    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// The control's helper.
    pub fn helper(&self) -> &ControlHelper<MenuAction> {
        &self.helper
    }

    /// The floating layer.
    pub fn layer(&self) -> &MenuLayer {
        &self.layer
    }

    /// The bound anchor.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Construction options.
    pub fn options(&self) -> &MenuOptions {
        &self.options
    }

    /// Tear down the layer, detach every listener, and drop subscribers.
    ///
    /// The anchor element itself stays in the document.
    pub fn dispose(&mut self, doc: &mut Document) {
        if self.helper.is_in_stage(LifeStage::Disposed) {
            return;
        }
        self.layer.dispose(doc);
        self.helper.clear_dom_events(doc);
        self.subscribers.clear();
        self.helper.change_stage(LifeStage::Disposed);
        tracing::debug!("command menu disposed");
    }

    fn toggle_layer(&mut self, doc: &mut Document) {
        if self.layer.is_shown() {
            self.layer.hide(doc);
        } else if self.state.is_inert() {
            tracing::trace!(flags = ?self.state.flags, "anchor click ignored");
        } else {
            self.open(doc);
        }
    }

    fn select(&mut self, doc: &mut Document, hit: RowHit) {
        let index = match hit {
            RowHit::Row(index) => index,
            RowHit::Disabled(index) => {
                tracing::trace!(index, "click on disabled row ignored");
                return;
            }
            RowHit::Miss => {
                tracing::trace!("click missed every row");
                return;
            }
        };
        let item = self.state.datasource.get(index).cloned();
        if let Some(item) = &item
            && let Some(handler) = &item.handler
        {
            handler(item, index);
        }
        self.layer.hide(doc);
        if item.is_none() {
            tracing::debug!(index, "selected row no longer in datasource");
        } else {
            tracing::debug!(index, "item selected");
        }
        let event = SelectEvent { item, index };
        for callback in &mut self.subscribers {
            callback(&event);
        }
    }

    fn render_layer(&mut self, doc: &mut Document) {
        self.layer.render(
            doc,
            &self.helper,
            &self.state.datasource,
            self.state.active_index,
            &self.options.item_template,
        );
    }

    fn paint_style(&self, doc: &mut Document, edit: impl FnOnce(&mut Style)) {
        if let Some(anchor) = self.anchor
            && let Some(mut style) = doc.style(anchor)
        {
            edit(&mut style);
            doc.set_style(anchor, style);
        }
    }

    fn paint_state(&mut self, doc: &mut Document, flag: StateFlags, set: bool) {
        if let (Some(anchor), Some(name)) = (self.anchor, flag.class_name()) {
            let classes = self.helper.state_classes(name);
            if set {
                doc.add_classes(anchor, &classes);
            } else {
                doc.remove_classes(anchor, &classes);
            }
            if flag == StateFlags::HIDDEN {
                doc.set_visible(anchor, !set);
            }
        }
        if self.state.is_inert() {
            self.layer.hide(doc);
        }
    }

    fn row_by_value(&self, doc: &Document, value: &str) -> Option<NodeId> {
        let index = self
            .state
            .datasource
            .iter()
            .position(|item| item.value == value)?;
        self.layer.row(doc, index)
    }
}

impl Lifecycle for CommandMenu {
    type Host = Document;
    type Anchor = NodeId;
    type Change = PropertyChange;

    fn stage(&self) -> LifeStage {
        self.helper.stage()
    }

    fn initialize(&mut self, doc: &mut Document, anchor: NodeId) {
        Self::initialize(self, doc, anchor);
    }

    fn render(&mut self, doc: &mut Document) {
        Self::render(self, doc);
    }

    fn repaint(&mut self, doc: &mut Document, changes: &[PropertyChange]) {
        Self::repaint(self, doc, changes);
    }

    fn dispose(&mut self, doc: &mut Document) {
        Self::dispose(self, doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{rc::Rc, vec, vec::Vec};
    use core::cell::RefCell;
    use kurbo::Rect;
    use trellis_overlay::LayerState;

    type Log = Rc<RefCell<Vec<(Option<String>, usize)>>>;

    struct Fixture {
        doc: Document,
        anchor: NodeId,
        menu: CommandMenu,
        selects: Log,
        handled: Log,
    }

    impl Fixture {
        fn new(items: Vec<MenuItem>) -> Self {
            let mut doc = Document::new(Rect::new(0.0, 0.0, 400.0, 300.0));
            let anchor = doc.create_element("div");
            doc.append_child(doc.body(), anchor);
            doc.set_bounds(anchor, Rect::new(10.0, 10.0, 110.0, 30.0));

            let handled: Log = Rc::default();
            let items = items
                .into_iter()
                .map(|item| {
                    let sink = handled.clone();
                    item.with_handler(move |it, i| sink.borrow_mut().push((Some(it.value.clone()), i)))
                })
                .collect();

            let mut menu = CommandMenu::new(MenuOptions::default());
            menu.initialize(&mut doc, anchor);
            menu.set_datasource(&mut doc, items);
            menu.render(&mut doc);

            let selects: Log = Rc::default();
            let sink = selects.clone();
            menu.on_select(move |e| {
                sink.borrow_mut()
                    .push((e.item.as_ref().map(|it| it.value.clone()), e.index));
            });
            Self {
                doc,
                anchor,
                menu,
                selects,
                handled,
            }
        }

        fn click(&mut self, target: NodeId) {
            for d in self.doc.dispatch(target, EventKind::Click) {
                self.menu.handle_event(&mut self.doc, d);
            }
        }

        fn row(&self, index: usize) -> NodeId {
            self.menu.layer().row(&self.doc, index).unwrap()
        }

        fn list(&self) -> NodeId {
            self.menu.layer().element().unwrap()
        }
    }

    fn two_items() -> Vec<MenuItem> {
        vec![MenuItem::new("A", "a"), MenuItem::new("B", "b").disabled(true)]
    }

    #[test]
    fn renders_one_row_per_item_in_order() {
        let items = (0..5)
            .map(|i| MenuItem::new(alloc::format!("item {i}"), alloc::format!("v{i}")))
            .collect();
        let mut f = Fixture::new(items);
        f.click(f.anchor);
        let rows = f.doc.children_of(f.list()).to_vec();
        assert_eq!(rows.len(), 5);
        for (i, &row) in rows.iter().enumerate() {
            let index = alloc::format!("{i}");
            assert_eq!(f.doc.attribute(row, "data-index"), Some(index.as_str()));
            assert!(f.doc.has_class(row, "ui-commandmenu-node"));
            assert_eq!(f.doc.text_content(row), alloc::format!("item {i}"));
        }
    }

    #[test]
    fn two_item_scenario() {
        let mut f = Fixture::new(two_items());
        f.click(f.anchor);
        assert!(f.menu.is_open());

        let disabled = f.row(1);
        f.click(disabled);
        assert!(f.handled.borrow().is_empty());
        assert!(f.selects.borrow().is_empty());
        assert!(f.menu.is_open(), "disabled rows leave the layer open");

        let label = f.doc.children_of(f.row(0))[0];
        f.click(label);
        assert_eq!(*f.handled.borrow(), vec![(Some(String::from("a")), 0)]);
        assert_eq!(*f.selects.borrow(), vec![(Some(String::from("a")), 0)]);
        assert!(!f.menu.is_open());
        assert_eq!(f.menu.layer().state(), LayerState::Hidden);
    }

    #[test]
    fn select_fires_without_handler() {
        let mut f = Fixture::new(Vec::new());
        f.menu
            .set_datasource(&mut f.doc, vec![MenuItem::new("Plain", "plain")]);
        f.click(f.anchor);
        f.click(f.row(0));
        assert!(f.handled.borrow().is_empty());
        assert_eq!(*f.selects.borrow(), vec![(Some(String::from("plain")), 0)]);
    }

    #[test]
    fn clicks_on_list_padding_change_nothing() {
        let mut f = Fixture::new(two_items());
        f.click(f.anchor);
        let before = f.doc.inner_html(f.list());
        f.click(f.list());
        assert!(f.selects.borrow().is_empty());
        assert!(f.menu.is_open());
        assert_eq!(f.doc.inner_html(f.list()), before);
    }

    #[test]
    fn disable_then_enable_by_value_restores_clicks() {
        let mut f = Fixture::new(vec![
            MenuItem::new("A", "dup"),
            MenuItem::new("B", "dup"),
        ]);
        // Not built yet: no-op.
        f.menu.disable_item_by_value(&mut f.doc, "dup");
        f.click(f.anchor);
        assert!(!f.doc.has_class(f.row(0), "ui-commandmenu-node-disabled"));

        f.menu.disable_item_by_value(&mut f.doc, "dup");
        f.menu.disable_item_by_value(&mut f.doc, "dup");
        assert!(f.doc.has_class(f.row(0), "ui-commandmenu-node-disabled"));
        assert!(!f.doc.has_class(f.row(1), "ui-commandmenu-node-disabled"));
        f.click(f.row(0));
        assert!(f.selects.borrow().is_empty());

        f.menu.enable_item_by_value(&mut f.doc, "dup");
        f.menu.enable_item_by_value(&mut f.doc, "dup");
        assert!(!f.doc.has_class(f.row(0), "ui-commandmenu-node-disabled"));
        f.click(f.row(0));
        assert_eq!(*f.selects.borrow(), vec![(Some(String::from("dup")), 0)]);

        // Absent values are ignored.
        f.menu.disable_item_by_value(&mut f.doc, "missing");
    }

    #[test]
    fn toggling_twice_restores_visibility() {
        let mut f = Fixture::new(two_items());
        f.click(f.anchor);
        f.click(f.anchor);
        assert!(!f.menu.is_open());
        f.click(f.anchor);
        assert!(f.menu.is_open());
        f.click(f.anchor);
        f.click(f.anchor);
        assert!(f.menu.is_open());
    }

    #[test]
    fn inert_states_close_and_block_the_layer() {
        let mut f = Fixture::new(two_items());
        f.click(f.anchor);
        f.menu.set_disabled(&mut f.doc, true);
        assert!(!f.menu.is_open());
        assert!(f.doc.has_class(f.anchor, "state-disabled"));
        f.click(f.anchor);
        assert!(!f.menu.is_open(), "disabled anchors ignore clicks");

        f.menu.set_disabled(&mut f.doc, false);
        assert!(!f.doc.has_class(f.anchor, "ui-commandmenu-disabled"));
        f.menu.set_hidden(&mut f.doc, true);
        assert!(!f.doc.is_visible(f.anchor));
        f.menu.set_hidden(&mut f.doc, false);
        f.menu.set_read_only(&mut f.doc, true);
        f.click(f.anchor);
        assert!(!f.menu.is_open());
        f.menu.set_read_only(&mut f.doc, false);
        f.click(f.anchor);
        assert!(f.menu.is_open());
    }

    #[test]
    fn repaint_dispatches_each_change() {
        let mut f = Fixture::new(two_items());
        f.menu.set_display_text(&mut f.doc, "<Menu>");
        assert_eq!(f.doc.text_content(f.anchor), "<Menu>");
        assert_eq!(f.doc.inner_html(f.anchor), "&lt;Menu&gt;");

        let changes = f.menu.set_properties(
            &mut f.doc,
            [Property::Width(Some(150.0)), Property::Height(Some(28.0))],
        );
        assert_eq!(changes.len(), 2);
        let style = f.doc.style(f.anchor).unwrap();
        assert_eq!((style.width, style.height), (Some(150.0), Some(28.0)));

        f.click(f.anchor);
        f.menu.set_active_index(&mut f.doc, Some(1));
        assert!(f.doc.has_class(f.row(1), "ui-commandmenu-node-active"));
        assert!(!f.doc.has_class(f.row(0), "ui-commandmenu-node-active"));

        f.menu
            .set_datasource(&mut f.doc, vec![MenuItem::new("Only", "only")]);
        assert_eq!(f.doc.children_of(f.list()).len(), 1);
        assert!(f.menu.is_open(), "datasource changes keep the layer open");
    }

    #[test]
    fn properties_before_render_are_painted_by_render() {
        let mut doc = Document::default();
        let anchor = doc.create_element("div");
        doc.append_child(doc.body(), anchor);
        let mut menu = CommandMenu::new(MenuOptions {
            skin: Some("flat".into()),
            ..MenuOptions::default()
        });
        assert_eq!(menu.stage(), LifeStage::Inited);
        menu.initialize(&mut doc, anchor);
        menu.set_display_text(&mut doc, "Go");
        menu.set_hidden(&mut doc, true);
        assert_eq!(doc.text_content(anchor), "");

        menu.render(&mut doc);
        assert_eq!(menu.stage(), LifeStage::Rendered);
        assert_eq!(doc.text_content(anchor), "Go");
        assert!(doc.has_class(anchor, "ui-commandmenu"));
        assert!(doc.has_class(anchor, "skin-flat-commandmenu"));
        assert!(doc.has_class(anchor, "skin-flat-commandmenu-hidden"));

        menu.set_display_text(&mut doc, "Again");
        menu.render(&mut doc);
        assert_eq!(doc.text_content(anchor), "Again");
    }

    #[test]
    fn second_initialize_keeps_first_anchor() {
        let mut f = Fixture::new(two_items());
        let other = f.doc.create_element("div");
        f.doc.append_child(f.doc.body(), other);
        f.menu.initialize(&mut f.doc, other);
        assert_eq!(f.menu.anchor(), Some(f.anchor));
        assert_eq!(f.doc.listeners_on(other), 0);
    }

    #[test]
    fn stale_index_emits_select_without_item() {
        let mut f = Fixture::new(two_items());
        f.click(f.anchor);
        f.menu.datasource_mut().truncate(0);
        let row = f.row(0);
        f.click(row);
        assert!(f.handled.borrow().is_empty());
        assert_eq!(*f.selects.borrow(), vec![(None, 0)]);
        assert!(!f.menu.is_open());
    }

    #[test]
    fn outside_clicks_dismiss() {
        let mut f = Fixture::new(two_items());
        let elsewhere = f.doc.create_element("p");
        f.doc.append_child(f.doc.body(), elsewhere);
        f.click(f.anchor);

        let row = f.row(1);
        f.menu.dismiss_outside(&mut f.doc, row);
        f.menu.dismiss_outside(&mut f.doc, f.anchor);
        assert!(f.menu.is_open());
        f.menu.dismiss_outside(&mut f.doc, elsewhere);
        assert!(!f.menu.is_open());
    }

    #[test]
    fn foreign_listeners_are_ignored() {
        let mut f = Fixture::new(two_items());
        let key = f.doc.add_listener(f.anchor, EventKind::Click).unwrap();
        let delivery = f
            .doc
            .dispatch(f.anchor, EventKind::Click)
            .into_iter()
            .find(|d| d.listener == key)
            .unwrap();
        assert!(!f.menu.handle_event(&mut f.doc, delivery));
        assert!(!f.menu.is_open());
    }

    #[test]
    fn dispose_leaves_no_layer_and_no_listeners() {
        let mut f = Fixture::new(two_items());
        f.click(f.anchor);
        let list = f.list();
        f.menu.dispose(&mut f.doc);
        assert!(!f.doc.is_alive(list));
        assert_eq!(f.doc.listener_count(), 0);
        assert!(f.menu.is_in_stage(LifeStage::Disposed));
        assert_eq!(
            trellis_dom::Selector::parse("ul").unwrap().first_in(&f.doc, f.doc.body()),
            None
        );

        f.menu.dispose(&mut f.doc);
        f.click(f.anchor);
        f.menu.set_display_text(&mut f.doc, "late");
        assert!(!f.menu.is_open());
        assert!(f.doc.is_alive(f.anchor));
    }
}
