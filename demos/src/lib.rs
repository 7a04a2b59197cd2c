// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host glue shared by the Trellis demos.

use trellis_command_menu::CommandMenu;
use trellis_dom::{Document, EventKind, NodeId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Deliver a click at `target` the way a browser would.
///
/// Deliveries go to the menu first; a click nobody claimed may still close an
/// open layer as an outside click.
pub fn click(doc: &mut Document, menu: &mut CommandMenu, target: NodeId) {
    let mut handled = false;
    for delivery in doc.dispatch(target, EventKind::Click) {
        handled |= menu.handle_event(doc, delivery);
    }
    if !handled {
        tracing::trace!(?target, "unclaimed click");
        menu.dismiss_outside(doc, target);
    }
}
