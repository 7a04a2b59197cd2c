// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget lifecycle: stages and the capability trait.

/// Lifecycle stage of a control.
///
/// Stages only move forward: `New → Inited → Rendered → Disposed`, and any
/// stage may jump straight to `Disposed`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifeStage {
    /// Constructed, options not applied yet.
    #[default]
    New,
    /// Options applied; nothing painted.
    Inited,
    /// Painted at least once.
    Rendered,
    /// Torn down; terminal.
    Disposed,
}

/// Init/render/repaint/dispose, with stage tracking.
///
/// Implementors keep their own stage and must treat every call after
/// [`Lifecycle::dispose`] as a no-op.
pub trait Lifecycle {
    /// The surface the control paints into.
    type Host: ?Sized;
    /// The element the control binds to.
    type Anchor: Copy;
    /// One entry of a repaint diff.
    type Change;

    /// Current stage.
    fn stage(&self) -> LifeStage;

    /// Returns true if the control is in `stage`.
    fn is_in_stage(&self, stage: LifeStage) -> bool {
        self.stage() == stage
    }

    /// Bind the control to its anchor element and wire its listeners.
    fn initialize(&mut self, host: &mut Self::Host, anchor: Self::Anchor);

    /// Paint everything once. Later calls do nothing.
    fn render(&mut self, host: &mut Self::Host);

    /// Paint only what `changes` describe.
    fn repaint(&mut self, host: &mut Self::Host, changes: &[Self::Change]);

    /// Release every resource the control holds. Idempotent.
    fn dispose(&mut self, host: &mut Self::Host);
}
