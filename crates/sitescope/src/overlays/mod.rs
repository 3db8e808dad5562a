//! Environmental overlays.
//!
//! Each overlay is a pure function of its inputs that yields scene nodes
//! (or, for the sun study, lighting parameters). The [`Preview`](crate::Preview)
//! keeps the last input key of each overlay and recomputes only when the
//! key changes; the nodes of the previous result are released before the
//! new ones are inserted.

pub mod solar_path;
pub mod sun_study;
pub mod wind_field;

use sitescope_core::{NodeId, OverlayKind, Scene, SceneNode};

pub use solar_path::{SolarPathGeometry, SolarPathInput};
pub use sun_study::{Lighting, SunStudyInput};
pub use wind_field::WindFieldInput;

/// The one current set of scene nodes owned by an overlay.
#[derive(Debug)]
pub struct OverlaySlot {
    kind: OverlayKind,
    nodes: Vec<NodeId>,
}

impl OverlaySlot {
    /// Creates an empty slot.
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
        }
    }

    /// Returns the owning overlay.
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    /// Returns the ids of the current nodes.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns true if the slot holds nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every current node from the scene.
    ///
    /// A node that can no longer be removed is logged and forgotten; the
    /// slot is always empty afterwards.
    pub fn release(&mut self, scene: &mut Scene) {
        for id in self.nodes.drain(..) {
            if let Err(e) = scene.remove(id) {
                log::warn!("{:?} overlay: failed to release node: {e}", self.kind);
            }
        }
    }

    /// Releases the current nodes, then inserts `nodes` as the new set.
    pub fn replace(&mut self, scene: &mut Scene, nodes: Vec<SceneNode>) -> &[NodeId] {
        self.release(scene);
        self.nodes = nodes.into_iter().map(|n| scene.insert(n)).collect();
        &self.nodes
    }

    /// Forgets the current nodes without touching the scene.
    ///
    /// Used after the scene itself was cleared.
    pub fn forget(&mut self) {
        self.nodes.clear();
    }
}

/// Last input key of an overlay, for dirty tracking.
#[derive(Debug)]
pub struct InputKey<K> {
    last: Option<K>,
}

impl<K> Default for InputKey<K> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<K: PartialEq> InputKey<K> {
    /// Records `key`; returns true if it differs from the last one.
    pub fn update(&mut self, key: K) -> bool {
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        self.last = Some(key);
        true
    }

    /// Forces the next [`update`](Self::update) to report a change.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Whether the next update is guaranteed to report a change.
    pub fn is_dirty(&self) -> bool {
        self.last.is_none()
    }
}
