// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command menu driven by a scripted host loop.
//!
//! This example shows how to:
//! - build a document and bind a `CommandMenu` to an anchor,
//! - route `Document::dispatch` deliveries back to the menu,
//! - dismiss the layer on outside clicks,
//! - observe docking flips and selections through `tracing`.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example command_menu`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, Size};
use trellis_command_menu::{CommandMenu, MenuItem, MenuOptions};
use trellis_demos::{click, init_tracing};
use trellis_dom::{Document, Style};
use trellis_overlay::Overlay;

fn main() {
    init_tracing();

    let viewport = Rect::from_origin_size((0.0, 0.0), Size::new(480.0, 320.0));
    let mut doc = Document::new(viewport);
    let toolbar = doc.create_element("div");
    let anchor = doc.create_element("button");
    let canvas = doc.create_element("div");
    doc.append_child(doc.body(), toolbar);
    doc.append_child(toolbar, anchor);
    doc.append_child(doc.body(), canvas);
    doc.set_bounds(anchor, Rect::new(16.0, 8.0, 136.0, 32.0));

    let log = Rc::new(RefCell::new(Vec::new()));
    let items = vec![
        MenuItem::new("New file", "new").with_handler({
            let log = log.clone();
            move |item, index| log.borrow_mut().push(format!("handler: {} #{index}", item.text))
        }),
        MenuItem::new("Open <recent>", "recent"),
        MenuItem::new("Delete", "delete").disabled(true),
    ];

    let mut menu = CommandMenu::new(MenuOptions::default());
    menu.initialize(&mut doc, anchor);
    menu.set_display_text(&mut doc, "File");
    menu.set_size(&mut doc, Some(120.0), Some(24.0));
    menu.set_datasource(&mut doc, items);
    menu.render(&mut doc);
    menu.on_select({
        let log = log.clone();
        move |e| {
            let label = e.item.as_ref().map_or("<gone>", |item| item.text.as_str());
            log.borrow_mut().push(format!("select: {label} #{}", e.index));
        }
    });

    // Open, then click the disabled row: nothing happens and the layer stays open.
    click(&mut doc, &mut menu, anchor);
    let disabled = menu.layer().row(&doc, 2).expect("row 2 is rendered");
    click(&mut doc, &mut menu, disabled);
    println!("after disabled click, open = {}", menu.is_open());

    // Pick the first row.
    let first = menu.layer().row(&doc, 0).expect("row 0 is rendered");
    click(&mut doc, &mut menu, first);

    // Re-enable "Delete" by value, then move the anchor to the bottom edge so the
    // layer opens upward.
    menu.enable_item_by_value(&mut doc, "delete");
    doc.set_bounds(anchor, Rect::new(16.0, 290.0, 136.0, 314.0));
    if let Some(list) = menu.layer().element() {
        doc.set_style(
            list,
            Style {
                height: Some(72.0),
                ..Style::default()
            },
        );
    }
    click(&mut doc, &mut menu, anchor);
    println!("layer placement: {:?}", menu.layer().placement());
    let delete = menu.layer().row(&doc, 2).expect("row 2 is rendered");
    click(&mut doc, &mut menu, delete);

    // An outside click closes an open layer.
    click(&mut doc, &mut menu, anchor);
    click(&mut doc, &mut menu, canvas);
    println!("after outside click, open = {}", menu.layer().is_shown());

    println!("markup: {}", doc.outer_html(doc.body()));
    menu.dispose(&mut doc);
    println!("listeners left after dispose: {}", doc.listener_count());

    for line in log.borrow().iter() {
        println!("{line}");
    }
}
