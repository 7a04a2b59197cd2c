// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, classes, style, and traversal.

use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use kurbo::Rect;
use smallvec::SmallVec;

use crate::events::Listeners;
use crate::types::{NodeFlags, NodeId, Style};

/// A retained element tree standing in for the host DOM.
///
/// The document owns every node. Nodes are addressed by generational
/// [`NodeId`]s; every accessor ignores stale identifiers instead of panicking,
/// so callers holding on to a removed node simply observe `None`/no-ops.
///
/// A fresh document has a single root element, [`Document::body`]. Nodes
/// created with [`Document::create_element`] start detached and become part of
/// the tree once appended.
///
/// The document is not a layout engine. Hosts compute layout elsewhere and
/// record the resulting boxes with [`Document::set_bounds`].
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use trellis_dom::Document;
///
/// let mut doc = Document::new(Rect::new(0.0, 0.0, 800.0, 600.0));
/// let list = doc.create_element("ul");
/// doc.append_child(doc.body(), list);
/// doc.add_classes(list, ["menu", "menu-open"]);
///
/// assert_eq!(doc.parent_of(list), Some(doc.body()));
/// assert!(doc.has_class(list, "menu-open"));
/// assert_eq!(doc.attribute(list, "class"), Some("menu menu-open"));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: NodeId,
    viewport: Rect,
    pub(crate) listeners: Listeners,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeData {
    Element {
        tag: String,
        attributes: SmallVec<[(String, String); 4]>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub(crate) data: NodeData,
    flags: NodeFlags,
    style: Style,
    bounds: Rect,
}

impl Node {
    fn new(generation: u32, data: NodeData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
            flags: NodeFlags::default(),
            style: Style::default(),
            bounds: Rect::ZERO,
        }
    }
}

impl Document {
    /// Create a document whose visible area is `viewport`.
    pub fn new(viewport: Rect) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: NodeId::new(0, 0),
            viewport,
            listeners: Listeners::default(),
        };
        doc.body = doc.create_element("body");
        doc.set_bounds(doc.body, viewport);
        doc
    }

    /// The root element every attached node descends from.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The visible area of the host, in the same space as element bounds.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Update the visible area (for example after a host resize).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Create a detached element with the given tag name (ASCII-lowercased).
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: SmallVec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert(NodeData::Text(text.to_owned()))
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    ///
    /// Ignored when either identifier is stale, when `parent` is a text node,
    /// or when `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(child) || !self.is_element(parent) {
            return;
        }
        if self.contains(child, parent) {
            return;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Remove a node and its subtree, dropping any listeners registered on them.
    ///
    /// The body cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            stack.extend(self.node(cur).children.iter().copied());
            self.listeners.drop_node(cur);
            self.nodes[cur.idx()] = None;
            self.free_list.push(cur.idx());
        }
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children_of(id).to_vec() {
            self.remove(child);
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns true if `id` is a live element (not a text node).
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.node_opt(id).map(|n| &n.data),
            Some(NodeData::Element { .. })
        )
    }

    /// Returns true if `id` is a live text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node_opt(id).map(|n| &n.data), Some(NodeData::Text(_)))
    }

    /// Returns the parent of a node if live, or `None` for roots, detached nodes, or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Iterate from `id` (inclusive) up to its root.
    ///
    /// This is the bubble path of an event targeted at `id`. Stale ids yield nothing.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Returns true if `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_alive(ancestor) && self.ancestors(node).any(|n| n == ancestor)
    }

    /// Iterate the descendants of `root` (exclusive) in document order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.extend(self.children_of(root).iter().rev().copied());
        Descendants { doc: self, stack }
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Tag name of a live element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node_opt(id)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Value of an attribute on a live element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the element carries the attribute (with any value).
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set (or replace) an attribute on a live element. Names are ASCII-lowercased.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let Some(attributes) = self.attributes_mut(id) else {
            return;
        };
        match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => attributes.push((name, value.to_owned())),
        }
    }

    /// Remove an attribute from a live element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(attributes) = self.attributes_mut(id) {
            attributes.retain(|(n, _)| n != name);
        }
    }

    /// All attributes of a live element, in insertion order.
    pub fn attributes(&self, id: NodeId) -> Option<&[(String, String)]> {
        match &self.node_opt(id)?.data {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> Option<&mut SmallVec<[(String, String); 4]>> {
        match &mut self.node_opt_mut(id)?.data {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    /// Iterate the classes of an element (the whitespace-separated `class` attribute).
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.attribute(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Returns true if the element's class list contains `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// Add classes that are not already present, keeping their order.
    pub fn add_classes<I, S>(&mut self, id: NodeId, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_element(id) {
            return;
        }
        let mut list: Vec<String> = self.classes(id).map(ToString::to_string).collect();
        let before = list.len();
        for class in classes {
            let class = class.as_ref();
            if !class.is_empty() && !list.iter().any(|c| c == class) {
                list.push(class.to_owned());
            }
        }
        if list.len() != before {
            self.set_attribute(id, "class", &list.join(" "));
        }
    }

    /// Remove classes from the element's class list.
    pub fn remove_classes<I, S>(&mut self, id: NodeId, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.has_attribute(id, "class") {
            return;
        }
        let doomed: SmallVec<[S; 4]> = classes.into_iter().collect();
        let list: Vec<String> = self
            .classes(id)
            .filter(|c| !doomed.iter().any(|d| d.as_ref() == *c))
            .map(ToString::to_string)
            .collect();
        self.set_attribute(id, "class", &list.join(" "));
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeData::Text(t)) = self.node_opt(id).map(|n| &n.data) {
            out.push_str(t);
            return out;
        }
        for node in self.descendants(id) {
            if let NodeData::Text(t) = &self.node(node).data {
                out.push_str(t);
            }
        }
        out
    }

    /// Replace the contents of `id` with a single text node (or the text itself for text nodes).
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(NodeData::Text(t)) = self.node_opt_mut(id).map(|n| &mut n.data) {
            t.clear();
            t.push_str(text);
            return;
        }
        if !self.is_element(id) {
            return;
        }
        self.clear_children(id);
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    /// Box style of a live node.
    pub fn style(&self, id: NodeId) -> Option<Style> {
        self.node_opt(id).map(|n| n.style)
    }

    /// Replace the box style of a live node.
    pub fn set_style(&mut self, id: NodeId, style: Style) {
        if let Some(n) = self.node_opt_mut(id) {
            n.style = style;
        }
    }

    /// Host-provided layout box of a live node, in viewport space.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Record the layout box the host computed for a node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.bounds = bounds;
        }
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Show or hide a node.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Returns true if the node is live and its own [`NodeFlags::VISIBLE`] flag is set.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
    }

    // --- internals ---

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

/// Iterator over a node and its ancestors. See [`Document::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.doc.parent_of(cur);
        Some(cur)
    }
}

/// Iterator over a subtree in document order. See [`Document::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.stack.pop()?;
        self.stack
            .extend(self.doc.children_of(cur).iter().rev().copied());
        Some(cur)
    }
}
