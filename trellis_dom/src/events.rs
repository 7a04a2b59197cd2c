// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration and bubble-order delivery.
//!
//! The document does not run handlers. [`Document::dispatch`] resolves which
//! registered listeners an event reaches and returns them as [`Delivery`]
//! values, target first, then each ancestor up to the root. The host hands
//! each delivery to whichever widget owns the [`ListenerKey`]; widgets ignore
//! keys they did not register.
//!
//! ```
//! use trellis_dom::{Document, EventKind};
//!
//! let mut doc = Document::default();
//! let list = doc.create_element("ul");
//! let row = doc.create_element("li");
//! doc.append_child(doc.body(), list);
//! doc.append_child(list, row);
//!
//! // One delegated listener on the list sees clicks on any row.
//! let key = doc.add_listener(list, EventKind::Click).unwrap();
//! let deliveries = doc.dispatch(row, EventKind::Click);
//! assert_eq!(deliveries.len(), 1);
//! assert_eq!(deliveries[0].listener, key);
//! assert_eq!(deliveries[0].event.target, row);
//! assert_eq!(deliveries[0].event.current_target, list);
//! ```

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::Document;
use crate::types::NodeId;

/// Kind of a delivered event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A completed click (press and release on the same target).
    Click,
    /// A pointer press, used for outside-dismiss policies.
    MouseDown,
}

/// Handle of a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(u64);

/// An event as seen by one listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DomEvent {
    /// Kind of the event.
    pub kind: EventKind,
    /// The node the event was dispatched at.
    pub target: NodeId,
    /// The node the receiving listener is registered on.
    pub current_target: NodeId,
}

/// One listener invocation produced by [`Document::dispatch`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// The listener to invoke.
    pub listener: ListenerKey,
    /// The event as seen by that listener.
    pub event: DomEvent,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Listeners {
    by_node: HashMap<NodeId, SmallVec<[(ListenerKey, EventKind); 2]>>,
    owner: HashMap<ListenerKey, NodeId>,
    next: u64,
}

impl Listeners {
    pub(crate) fn len(&self) -> usize {
        self.owner.len()
    }

    pub(crate) fn drop_node(&mut self, node: NodeId) {
        if let Some(entries) = self.by_node.remove(&node) {
            for (key, _) in entries {
                self.owner.remove(&key);
            }
        }
    }
}

impl Document {
    /// Register a listener for `kind` on `node`.
    ///
    /// Returns `None` if `node` is stale.
    pub fn add_listener(&mut self, node: NodeId, kind: EventKind) -> Option<ListenerKey> {
        if !self.is_alive(node) {
            return None;
        }
        let listeners = &mut self.listeners;
        listeners.next += 1;
        let key = ListenerKey(listeners.next);
        listeners
            .by_node
            .entry(node)
            .or_default()
            .push((key, kind));
        listeners.owner.insert(key, node);
        Some(key)
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        let listeners = &mut self.listeners;
        let Some(node) = listeners.owner.remove(&key) else {
            return false;
        };
        if let Some(entries) = listeners.by_node.get_mut(&node) {
            entries.retain(|(k, _)| *k != key);
            if entries.is_empty() {
                listeners.by_node.remove(&node);
            }
        }
        true
    }

    /// Number of registered listeners across the whole document.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners registered directly on `node`.
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.listeners.by_node.get(&node).map_or(0, SmallVec::len)
    }

    /// Resolve the listeners an event of `kind` at `target` reaches.
    ///
    /// Deliveries are ordered target first, then each ancestor up to the root;
    /// listeners on the same node keep their registration order.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Vec<Delivery> {
        let mut out = Vec::new();
        for node in self.ancestors(target) {
            let Some(entries) = self.listeners.by_node.get(&node) else {
                continue;
            };
            for &(listener, k) in entries {
                if k == kind {
                    out.push(Delivery {
                        listener,
                        event: DomEvent {
                            kind,
                            target,
                            current_target: node,
                        },
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn bubble_order_target_first() {
        let mut doc = Document::default();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        doc.append_child(doc.body(), ul);
        doc.append_child(ul, li);
        let on_body = doc.add_listener(doc.body(), EventKind::Click).unwrap();
        let on_ul = doc.add_listener(ul, EventKind::Click).unwrap();
        let on_li = doc.add_listener(li, EventKind::Click).unwrap();
        let on_li_2 = doc.add_listener(li, EventKind::Click).unwrap();

        let keys: Vec<ListenerKey> = doc
            .dispatch(li, EventKind::Click)
            .iter()
            .map(|d| d.listener)
            .collect();
        assert_eq!(keys, vec![on_li, on_li_2, on_ul, on_body]);
    }

    #[test]
    fn kinds_are_filtered() {
        let mut doc = Document::default();
        let ul = doc.create_element("ul");
        doc.append_child(doc.body(), ul);
        doc.add_listener(ul, EventKind::MouseDown).unwrap();
        assert!(doc.dispatch(ul, EventKind::Click).is_empty());
        assert_eq!(doc.dispatch(ul, EventKind::MouseDown).len(), 1);
    }

    #[test]
    fn remove_listener_and_node_cleanup() {
        let mut doc = Document::default();
        let ul = doc.create_element("ul");
        doc.append_child(doc.body(), ul);
        let a = doc.add_listener(ul, EventKind::Click).unwrap();
        let _b = doc.add_listener(ul, EventKind::Click).unwrap();
        assert_eq!(doc.listener_count(), 2);

        assert!(doc.remove_listener(a));
        assert!(!doc.remove_listener(a), "second removal is a no-op");
        assert_eq!(doc.listeners_on(ul), 1);

        doc.remove(ul);
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.listeners_on(ul), 0);
    }

    #[test]
    fn stale_targets_reach_nobody() {
        let mut doc = Document::default();
        let ul = doc.create_element("ul");
        doc.append_child(doc.body(), ul);
        doc.add_listener(doc.body(), EventKind::Click).unwrap();
        doc.remove(ul);
        assert!(doc.dispatch(ul, EventKind::Click).is_empty());
        assert_eq!(doc.add_listener(ul, EventKind::Click), None);
    }
}
