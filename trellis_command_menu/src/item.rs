// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu items and the selection notification.

use alloc::{rc::Rc, string::String};
use core::fmt;

/// Callback attached to a single item, called with the item and its index.
pub type ItemHandler = Rc<dyn Fn(&MenuItem, usize)>;

/// One selectable action.
///
/// Missing fields degrade quietly: an empty `text` renders an empty label and
/// an empty `value` only matches an empty lookup.
#[derive(Clone, Default)]
pub struct MenuItem {
    /// Label, escaped before it reaches markup.
    pub text: String,
    /// Lookup key for [`CommandMenu::disable_item_by_value`](crate::CommandMenu::disable_item_by_value).
    pub value: String,
    /// Disabled items render with the disabled part classes and ignore clicks.
    pub disabled: bool,
    /// Called before the `select` notification.
    pub handler: Option<ItemHandler>,
}

impl MenuItem {
    /// An enabled item without a handler.
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Builder: set `disabled`.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Builder: attach a handler.
    #[must_use]
    pub fn with_handler(mut self, handler: impl Fn(&Self, usize) + 'static) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("text", &self.text)
            .field("value", &self.value)
            .field("disabled", &self.disabled)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Payload of the `select` notification.
///
/// `item` is `None` when the clicked row's index no longer exists in the
/// datasource (the datasource shrank after the rows were rendered).
#[derive(Clone, Debug)]
pub struct SelectEvent {
    /// The selected item, if the index still resolves.
    pub item: Option<MenuItem>,
    /// Index carried by the clicked row.
    pub index: usize,
}
