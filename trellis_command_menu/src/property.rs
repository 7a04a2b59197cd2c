// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control properties and the repaint diff.

use alloc::{string::String, vec::Vec};

use crate::item::MenuItem;

bitflags::bitflags! {
    /// Interaction states that force the layer closed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        /// The control ignores interaction.
        const DISABLED = 0b0000_0001;
        /// The control is not displayed.
        const HIDDEN = 0b0000_0010;
        /// The control shows its value but cannot be operated.
        const READ_ONLY = 0b0000_0100;
    }
}

impl StateFlags {
    /// State name used in state class names.
    ///
    /// Returns `None` unless exactly one flag is set.
    pub fn class_name(self) -> Option<&'static str> {
        if self == Self::DISABLED {
            Some("disabled")
        } else if self == Self::HIDDEN {
            Some("hidden")
        } else if self == Self::READ_ONLY {
            Some("readonly")
        } else {
            None
        }
    }
}

/// A value assigned through [`CommandMenu::set_properties`](crate::CommandMenu::set_properties).
#[derive(Clone, Debug)]
pub enum Property {
    /// Replace the items.
    Datasource(Vec<MenuItem>),
    /// Highlight one row, or none.
    ActiveIndex(Option<usize>),
    /// Anchor label.
    DisplayText(String),
    /// Set or clear [`StateFlags::DISABLED`].
    Disabled(bool),
    /// Set or clear [`StateFlags::HIDDEN`].
    Hidden(bool),
    /// Set or clear [`StateFlags::READ_ONLY`].
    ReadOnly(bool),
    /// Explicit anchor width.
    Width(Option<f64>),
    /// Explicit anchor height. Does not affect the layer.
    Height(Option<f64>),
}

/// One changed property, with its old and new value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyChange {
    /// The datasource was replaced. Always reported, even with equal contents.
    Datasource {
        /// Item count before.
        old_len: usize,
        /// Item count after.
        new_len: usize,
    },
    /// The highlighted row changed.
    ActiveIndex {
        /// Before.
        old: Option<usize>,
        /// After.
        new: Option<usize>,
    },
    /// The anchor label changed.
    DisplayText {
        /// Before.
        old: String,
        /// After.
        new: String,
    },
    /// One interaction state flag flipped.
    State {
        /// The flag that changed (exactly one bit).
        flag: StateFlags,
        /// Whether it is now set.
        set: bool,
    },
    /// The anchor width changed.
    Width {
        /// Before.
        old: Option<f64>,
        /// After.
        new: Option<f64>,
    },
    /// The anchor height changed.
    Height {
        /// Before.
        old: Option<f64>,
        /// After.
        new: Option<f64>,
    },
}

/// Everything a command menu paints from.
#[derive(Clone, Debug, Default)]
pub struct MenuState {
    /// Items, in display order.
    pub datasource: Vec<MenuItem>,
    /// Highlighted row.
    pub active_index: Option<usize>,
    /// Anchor label, unescaped.
    pub display_text: String,
    /// Interaction states.
    pub flags: StateFlags,
    /// Explicit anchor width.
    pub width: Option<f64>,
    /// Explicit anchor height.
    pub height: Option<f64>,
}

impl MenuState {
    /// Returns true if any state that forbids opening the layer is set.
    pub fn is_inert(&self) -> bool {
        self.flags.intersects(StateFlags::all())
    }

    /// Assign `prop` and report what changed.
    pub fn apply(&mut self, prop: Property) -> Option<PropertyChange> {
        match prop {
            Property::Datasource(items) => {
                let old_len = self.datasource.len();
                self.datasource = items;
                Some(PropertyChange::Datasource {
                    old_len,
                    new_len: self.datasource.len(),
                })
            }
            Property::ActiveIndex(new) => {
                let old = core::mem::replace(&mut self.active_index, new);
                (old != new).then_some(PropertyChange::ActiveIndex { old, new })
            }
            Property::DisplayText(new) => {
                if self.display_text == new {
                    return None;
                }
                let old = core::mem::replace(&mut self.display_text, new.clone());
                Some(PropertyChange::DisplayText { old, new })
            }
            Property::Disabled(set) => self.set_flag(StateFlags::DISABLED, set),
            Property::Hidden(set) => self.set_flag(StateFlags::HIDDEN, set),
            Property::ReadOnly(set) => self.set_flag(StateFlags::READ_ONLY, set),
            Property::Width(new) => {
                let old = core::mem::replace(&mut self.width, new);
                (old != new).then_some(PropertyChange::Width { old, new })
            }
            Property::Height(new) => {
                let old = core::mem::replace(&mut self.height, new);
                (old != new).then_some(PropertyChange::Height { old, new })
            }
        }
    }

    /// Apply a batch and collect the changes in application order.
    pub fn apply_all(&mut self, props: impl IntoIterator<Item = Property>) -> Vec<PropertyChange> {
        props.into_iter().filter_map(|p| self.apply(p)).collect()
    }

    /// Every property as a change from the default, for a first paint.
    pub fn full_diff(&self) -> Vec<PropertyChange> {
        let mut out = Vec::new();
        if self.width.is_some() {
            out.push(PropertyChange::Width {
                old: None,
                new: self.width,
            });
        }
        if self.height.is_some() {
            out.push(PropertyChange::Height {
                old: None,
                new: self.height,
            });
        }
        out.push(PropertyChange::Datasource {
            old_len: 0,
            new_len: self.datasource.len(),
        });
        out.push(PropertyChange::DisplayText {
            old: String::new(),
            new: self.display_text.clone(),
        });
        for flag in self.flags.iter() {
            out.push(PropertyChange::State { flag, set: true });
        }
        out
    }

    fn set_flag(&mut self, flag: StateFlags, set: bool) -> Option<PropertyChange> {
        if self.flags.contains(flag) == set {
            return None;
        }
        self.flags.set(flag, set);
        Some(PropertyChange::State { flag, set })
    }
}
