// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class naming, tracked listeners, and stage bookkeeping shared by controls.

use alloc::{format, string::String, vec::Vec};
use hashbrown::HashMap;
use smallvec::{SmallVec, smallvec};
use trellis_dom::{Document, EventKind, ListenerKey, NodeId};

use crate::lifecycle::LifeStage;

/// Short list of class names.
pub type Classes = SmallVec<[String; 3]>;

/// Per-control helper.
///
/// Class names follow the `{prefix}-{type}-{part}` scheme, with a
/// `skin-{skin}-{type}-{part}` companion when a skin is configured:
///
/// ```
/// use trellis_command_menu::ControlHelper;
///
/// let helper = ControlHelper::<()>::new("ui", "CommandMenu", Some("flat"));
/// assert_eq!(
///     helper.part_classes("node-disabled").to_vec(),
///     ["ui-commandmenu-node-disabled", "skin-flat-commandmenu-node-disabled"],
/// );
/// assert_eq!(
///     helper.state_classes("disabled").to_vec(),
///     ["ui-commandmenu-disabled", "state-disabled", "skin-flat-commandmenu-disabled"],
/// );
/// ```
///
/// Listeners registered through [`ControlHelper::add_dom_event`] are tracked
/// with an action of type `A`, so a delivered [`ListenerKey`] maps back to
/// what the control should do, and [`ControlHelper::clear_dom_events`] can
/// detach them all at once.
#[derive(Clone, Debug)]
pub struct ControlHelper<A> {
    prefix: String,
    type_name: String,
    skin: Option<String>,
    stage: LifeStage,
    dom_events: HashMap<ListenerKey, A>,
}

impl<A: Copy> ControlHelper<A> {
    /// Create a helper in stage [`LifeStage::New`]. `type_name` is lowercased.
    pub fn new(prefix: &str, type_name: &str, skin: Option<&str>) -> Self {
        Self {
            prefix: prefix.into(),
            type_name: type_name.to_ascii_lowercase(),
            skin: skin.filter(|s| !s.is_empty()).map(Into::into),
            stage: LifeStage::New,
            dom_events: HashMap::new(),
        }
    }

    /// Classes for the control's root element.
    pub fn root_classes(&self) -> Classes {
        let mut out: Classes = smallvec![format!("{}-{}", self.prefix, self.type_name)];
        if let Some(skin) = &self.skin {
            out.push(format!("skin-{skin}"));
            out.push(format!("skin-{skin}-{}", self.type_name));
        }
        out
    }

    /// Classes for a named part of the control (`"node"`, `"layer"`, ...).
    pub fn part_classes(&self, part: &str) -> Classes {
        let mut out: Classes = smallvec![format!("{}-{}-{part}", self.prefix, self.type_name)];
        if let Some(skin) = &self.skin {
            out.push(format!("skin-{skin}-{}-{part}", self.type_name));
        }
        out
    }

    /// Classes marking the control as being in `state` (`"disabled"`, `"hidden"`, ...).
    pub fn state_classes(&self, state: &str) -> Classes {
        let mut out: Classes = smallvec![
            format!("{}-{}-{state}", self.prefix, self.type_name),
            format!("state-{state}"),
        ];
        if let Some(skin) = &self.skin {
            out.push(format!("skin-{skin}-{}-{state}", self.type_name));
        }
        out
    }

    /// Register a listener on `el` and remember `action` for it.
    ///
    /// Returns `None` if `el` is stale.
    pub fn add_dom_event(
        &mut self,
        doc: &mut Document,
        el: NodeId,
        kind: EventKind,
        action: A,
    ) -> Option<ListenerKey> {
        let key = doc.add_listener(el, kind)?;
        self.dom_events.insert(key, action);
        Some(key)
    }

    /// Detach one tracked listener. Returns `false` if it was not tracked here.
    pub fn remove_dom_event(&mut self, doc: &mut Document, key: ListenerKey) -> bool {
        if self.dom_events.remove(&key).is_none() {
            return false;
        }
        doc.remove_listener(key);
        true
    }

    /// The action registered for `key`, if this helper tracks it.
    pub fn action_for(&self, key: ListenerKey) -> Option<A> {
        self.dom_events.get(&key).copied()
    }

    /// Number of tracked listeners.
    pub fn dom_event_count(&self) -> usize {
        self.dom_events.len()
    }

    /// Detach every tracked listener.
    pub fn clear_dom_events(&mut self, doc: &mut Document) {
        let keys: Vec<ListenerKey> = self.dom_events.drain().map(|(k, _)| k).collect();
        for key in keys {
            doc.remove_listener(key);
        }
    }

    /// Current stage.
    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    /// Returns true if the control is in `stage`.
    pub fn is_in_stage(&self, stage: LifeStage) -> bool {
        self.stage == stage
    }

    /// Move to `stage`. Stages never move backwards; returns `false` if rejected.
    pub fn change_stage(&mut self, stage: LifeStage) -> bool {
        if stage < self.stage {
            tracing::trace!(from = ?self.stage, to = ?stage, "rejected stage change");
            return false;
        }
        self.stage = stage;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Act {
        Open,
        Pick,
    }

    #[test]
    fn class_names_without_skin() {
        let helper = ControlHelper::<Act>::new("ui", "CommandMenu", None);
        assert_eq!(helper.root_classes().to_vec(), ["ui-commandmenu"]);
        assert_eq!(helper.part_classes("node").to_vec(), ["ui-commandmenu-node"]);
        assert_eq!(
            helper.state_classes("readonly").to_vec(),
            ["ui-commandmenu-readonly", "state-readonly"]
        );
        let empty_skin = ControlHelper::<Act>::new("ui", "CommandMenu", Some(""));
        assert_eq!(empty_skin.part_classes("node").len(), 1);
    }

    #[test]
    fn tracked_listeners_map_to_actions() {
        let mut doc = Document::default();
        let a = doc.create_element("div");
        let b = doc.create_element("ul");
        doc.append_child(doc.body(), a);
        doc.append_child(doc.body(), b);

        let mut helper = ControlHelper::new("ui", "Menu", None);
        let ka = helper.add_dom_event(&mut doc, a, EventKind::Click, Act::Open).unwrap();
        let kb = helper.add_dom_event(&mut doc, b, EventKind::Click, Act::Pick).unwrap();
        assert_eq!(helper.action_for(ka), Some(Act::Open));
        assert_eq!(helper.action_for(kb), Some(Act::Pick));
        assert_eq!(doc.listener_count(), 2);

        assert!(helper.remove_dom_event(&mut doc, ka));
        assert!(!helper.remove_dom_event(&mut doc, ka));
        assert_eq!(helper.action_for(ka), None);

        helper.clear_dom_events(&mut doc);
        assert_eq!(helper.dom_event_count(), 0);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn stages_only_move_forward() {
        let mut helper = ControlHelper::<Act>::new("ui", "Menu", None);
        assert!(helper.is_in_stage(LifeStage::New));
        assert!(helper.change_stage(LifeStage::Rendered));
        assert!(!helper.change_stage(LifeStage::Inited));
        assert!(helper.change_stage(LifeStage::Disposed));
        assert!(!helper.change_stage(LifeStage::Rendered));
        assert_eq!(helper.stage(), LifeStage::Disposed);
    }
}
