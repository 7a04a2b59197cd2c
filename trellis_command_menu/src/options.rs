// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use trellis_overlay::{Dock, HorizontalEdge, SpaceDetection, VerticalEdge};

/// Construction options for a [`CommandMenu`](crate::CommandMenu).
#[derive(Clone, Debug, PartialEq)]
pub struct MenuOptions {
    /// Class prefix (`ui` gives `ui-commandmenu-node`).
    pub prefix: String,
    /// Type name used in class names; lowercased.
    pub type_name: String,
    /// Optional skin, adding `skin-{skin}-...` classes.
    pub skin: Option<String>,
    /// Row template. `${text}` is replaced with the escaped item text.
    pub item_template: String,
    /// Where the layer goes relative to the anchor.
    pub dock: Dock,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            prefix: "ui".into(),
            type_name: "CommandMenu".into(),
            skin: None,
            item_template: "<span>${text}</span>".into(),
            dock: Dock {
                vertical: VerticalEdge::Below,
                horizontal: HorizontalEdge::Left,
                space_detection: SpaceDetection::VERTICAL,
                strict_width: false,
            },
        }
    }
}
