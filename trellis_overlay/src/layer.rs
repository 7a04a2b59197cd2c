// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer lifecycle and the overlay capability.

/// Lifecycle of a floating layer.
///
/// ```text
/// Detached ──show──▶ Shown ◀──show/hide──▶ Hidden
///     │                 │                    │
///     └────────────── dispose ───────────────┴──▶ Disposed
/// ```
///
/// `Detached` means the layer has not built its element yet. Nothing leaves
/// `Disposed`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerState {
    /// Not built yet.
    #[default]
    Detached,
    /// Built and positioned, not visible.
    Hidden,
    /// Built and visible.
    Shown,
    /// Torn down; terminal.
    Disposed,
}

/// A rejected [`LayerState`] transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("layer cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    /// State the layer was in.
    pub from: LayerState,
    /// State that was requested.
    pub to: LayerState,
}

impl LayerState {
    /// Returns true if the layer is visible.
    pub fn is_shown(self) -> bool {
        self == Self::Shown
    }

    /// Returns true if the layer element exists.
    pub fn is_built(self) -> bool {
        matches!(self, Self::Hidden | Self::Shown)
    }

    /// Returns true if `self → to` is allowed.
    ///
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(self, to: Self) -> bool {
        match (self, to) {
            (from, to) if from == to => true,
            (Self::Disposed, _) => false,
            (_, Self::Disposed) => true,
            (Self::Detached | Self::Hidden, Self::Shown)
            | (Self::Detached | Self::Shown, Self::Hidden) => true,
            _ => false,
        }
    }

    /// Move to `to`, returning the previous state.
    pub fn transition(&mut self, to: Self) -> Result<Self, TransitionError> {
        if !self.can_transition_to(to) {
            tracing::trace!(from = ?*self, ?to, "rejected layer transition");
            return Err(TransitionError { from: *self, to });
        }
        Ok(core::mem::replace(self, to))
    }
}

/// A floating layer that can be shown next to an anchor and hidden again.
///
/// `Host` is whatever the layer renders into (for example a document) and
/// `Anchor` identifies what it docks to.
pub trait Overlay {
    /// The surface the layer lives in.
    type Host: ?Sized;
    /// What the layer docks to.
    type Anchor: Copy;

    /// Build the layer if needed, make it visible, and dock it to `anchor`.
    fn show(&mut self, host: &mut Self::Host, anchor: Self::Anchor);

    /// Make the layer invisible. Does nothing if it is not built.
    fn hide(&mut self, host: &mut Self::Host);

    /// Returns true if the layer is visible.
    fn is_shown(&self) -> bool;

    /// Flip visibility. Toggling twice restores the starting visibility.
    fn toggle(&mut self, host: &mut Self::Host, anchor: Self::Anchor) {
        if self.is_shown() {
            self.hide(host);
        } else {
            self.show(host, anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_path() {
        let mut s = LayerState::default();
        assert_eq!(s.transition(LayerState::Shown), Ok(LayerState::Detached));
        assert!(s.is_shown() && s.is_built());
        assert_eq!(s.transition(LayerState::Hidden), Ok(LayerState::Shown));
        assert_eq!(s.transition(LayerState::Hidden), Ok(LayerState::Hidden));
        assert_eq!(s.transition(LayerState::Disposed), Ok(LayerState::Hidden));
        assert!(!s.is_built());
    }

    #[test]
    fn nothing_leaves_disposed() {
        let mut s = LayerState::Disposed;
        for to in [LayerState::Detached, LayerState::Hidden, LayerState::Shown] {
            assert_eq!(
                s.transition(to),
                Err(TransitionError {
                    from: LayerState::Disposed,
                    to
                })
            );
        }
        assert_eq!(s.transition(LayerState::Disposed), Ok(LayerState::Disposed));
    }

    #[test]
    fn built_layers_never_detach() {
        assert!(!LayerState::Shown.can_transition_to(LayerState::Detached));
        assert!(!LayerState::Hidden.can_transition_to(LayerState::Detached));
        assert!(LayerState::Detached.can_transition_to(LayerState::Disposed));
    }

    #[derive(Debug, Default)]
    struct Flag {
        state: LayerState,
        shows: u32,
    }

    impl Overlay for Flag {
        type Host = ();
        type Anchor = ();

        fn show(&mut self, _: &mut (), _: ()) {
            self.shows += 1;
            let _ = self.state.transition(LayerState::Shown);
        }

        fn hide(&mut self, _: &mut ()) {
            if self.state.is_built() {
                let _ = self.state.transition(LayerState::Hidden);
            }
        }

        fn is_shown(&self) -> bool {
            self.state.is_shown()
        }
    }

    #[test]
    fn toggle_twice_restores_visibility() {
        let mut layer = Flag::default();
        layer.toggle(&mut (), ());
        assert!(layer.is_shown());
        layer.toggle(&mut (), ());
        assert!(!layer.is_shown());
        assert_eq!(layer.state, LayerState::Hidden);
        assert_eq!(layer.shows, 1);
    }
}
