// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolving a delegated click to a datasource row.

use trellis_dom::{Document, NodeId};

/// Read-only view of a rendered list, as needed to resolve clicks.
pub trait RowLookup<K> {
    /// Parent of `node`, or `None` at the top of the tree.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// The row index `node` carries, if it is a row.
    fn row_index(&self, node: &K) -> Option<usize>;

    /// Returns true if the row `node` is currently marked disabled.
    fn is_disabled(&self, node: &K) -> bool;
}

/// Outcome of [`resolve_row_index`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowHit {
    /// An enabled row was clicked.
    Row(usize),
    /// A disabled row was clicked; the click is inert.
    Disabled(usize),
    /// The click missed every row.
    Miss,
}

/// Walk from `target` toward `root` and find the row the click belongs to.
///
/// The walk stops at the first node carrying a row index, or at `root`
/// (which is never treated as a row). A path that runs out of parents without
/// meeting `root` is a miss too.
///
/// ```
/// use trellis_command_menu::{RowHit, RowLookup, resolve_row_index};
///
/// // 0 is the list, 1 and 2 are rows, 3 is a label inside row 2.
/// struct Rows;
/// impl RowLookup<u32> for Rows {
///     fn parent_of(&self, n: &u32) -> Option<u32> {
///         match n { 1 | 2 => Some(0), 3 => Some(2), _ => None }
///     }
///     fn row_index(&self, n: &u32) -> Option<usize> {
///         matches!(n, 1 | 2).then(|| *n as usize - 1)
///     }
///     fn is_disabled(&self, n: &u32) -> bool {
///         *n == 1
///     }
/// }
///
/// assert_eq!(resolve_row_index(3, 0, &Rows), RowHit::Row(1));
/// assert_eq!(resolve_row_index(1, 0, &Rows), RowHit::Disabled(0));
/// assert_eq!(resolve_row_index(0, 0, &Rows), RowHit::Miss);
/// ```
pub fn resolve_row_index<K, L>(target: K, root: K, lookup: &L) -> RowHit
where
    K: Copy + Eq,
    L: RowLookup<K> + ?Sized,
{
    let mut cur = target;
    loop {
        if cur == root {
            return RowHit::Miss;
        }
        if let Some(index) = lookup.row_index(&cur) {
            return if lookup.is_disabled(&cur) {
                RowHit::Disabled(index)
            } else {
                RowHit::Row(index)
            };
        }
        match lookup.parent_of(&cur) {
            Some(p) => cur = p,
            None => return RowHit::Miss,
        }
    }
}

/// [`RowLookup`] over rendered rows in a [`Document`].
///
/// A row is an element whose `data-index` attribute parses as an index; it is
/// disabled when it carries `disabled_class`.
#[derive(Clone, Copy, Debug)]
pub struct DomRows<'a> {
    /// The document holding the rows.
    pub doc: &'a Document,
    /// Class marking a disabled row.
    pub disabled_class: &'a str,
}

impl RowLookup<NodeId> for DomRows<'_> {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.doc.parent_of(*node)
    }

    fn row_index(&self, node: &NodeId) -> Option<usize> {
        self.doc.attribute(*node, "data-index")?.trim().parse().ok()
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        self.doc.has_class(*node, self.disabled_class)
    }
}
