// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis DOM: a small retained element tree for headless widgets.
//!
//! Trellis DOM stands in for the browser DOM when widgets are written against
//! explicit state instead of a live page. It is the substrate the Trellis
//! widgets render into and read back from.
//!
//! - Represents a hierarchy of elements and text nodes with attributes, classes, and box style.
//! - Parses and serializes markup fragments, escapes text, and fills `${key}` templates.
//! - Answers CSS selector queries and ancestor searches.
//! - Registers event listeners and resolves their bubble-order delivery.
//!
//! ## Not a layout engine
//!
//! The document stores a layout box per node but never computes one. Hosts run
//! layout elsewhere and record the results with [`Document::set_bounds`]. The
//! measurement helpers ([`outer_height`], [`measure_width`]) only combine those
//! boxes with explicit [`Style`] values.
//!
//! ## Not a browser
//!
//! The markup parser accepts the well-formed fragment subset widgets emit:
//! elements, quoted/unquoted/boolean attributes, void and self-closing
//! elements, comments, an implicit `</li>`, and the entities that
//! [`escape_html`] produces. Events are not run either: [`Document::dispatch`]
//! returns [`Delivery`] values and the host routes them to their owners.
//!
//! ## API overview
//!
//! - [`Document`]: container owning every node; stale [`NodeId`]s are ignored, never panic.
//! - [`NodeId`]: generational handle of a node.
//! - [`NodeFlags`]: per-node visibility.
//! - [`Style`]: explicit width/height, margins, and padding.
//! - [`Selector`]: a parsed selector list; [`SelectorError`] reports parse failures.
//!
//! Key operations:
//! - [`Document::create_element`] / [`Document::append_child`] / [`Document::remove`]
//! - [`Document::add_classes`] / [`Document::remove_classes`] / [`Document::set_attribute`]
//! - [`Document::set_inner_html`] / [`Document::inner_html`]
//! - [`find`], [`find_all`], [`matches`], and [`parent`]
//! - [`Document::add_listener`] / [`Document::dispatch`]
//!
//! ## Example
//!
//! ```rust
//! use trellis_dom::{Document, EventKind, escape_html, find, parent};
//!
//! let mut doc = Document::default();
//! let list = doc.create_element("ul");
//! doc.append_child(doc.body(), list);
//! doc.set_inner_html(
//!     list,
//!     &format!(r#"<li data-index="0"><span>{}</span></li>"#, escape_html("Save & exit")),
//! );
//!
//! let key = doc.add_listener(list, EventKind::Click).unwrap();
//! let span = find(&doc, list, "li span").unwrap().unwrap();
//! assert_eq!(doc.text_content(span), "Save & exit");
//!
//! // A click on the label bubbles to the delegated listener on the list...
//! let delivery = doc.dispatch(span, EventKind::Click)[0];
//! assert_eq!(delivery.listener, key);
//!
//! // ...which maps it back to its row.
//! let row = parent(&doc, delivery.event.target, Some("[data-index]"), Some(list))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(doc.attribute(row, "data-index"), Some("0"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod events;
mod markup;
mod measure;
mod selector;
mod types;

pub use document::{Ancestors, Descendants, Document};
pub use events::{Delivery, DomEvent, EventKind, ListenerKey};
pub use markup::{escape_html, format_template};
pub use measure::{computed_height, computed_width, measure_width, outer_height};
pub use selector::{Selector, SelectorError, find, find_all, matches, parent};
pub use types::{NodeFlags, NodeId, Style};
