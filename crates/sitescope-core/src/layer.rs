//! Visibility layers for model geometry.
//!
//! Every model node is assigned to exactly one [`LayerKind`]. Disabling a
//! layer hides all of its nodes without destroying them. The surface layer
//! additionally carries a per-subtype flag; a surface node is visible only
//! when both the layer flag and its subtype flag are set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::scene::{NodeId, NodeRole, Scene};

/// The named visibility groups of a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Buildings,
    Surface,
    Vegetation,
    Infrastructure,
    Barriers,
    Topography,
}

impl LayerKind {
    /// All layers in display order.
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Buildings,
        LayerKind::Surface,
        LayerKind::Vegetation,
        LayerKind::Infrastructure,
        LayerKind::Barriers,
        LayerKind::Topography,
    ];

    /// Lower-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Buildings => "buildings",
            Self::Surface => "surface",
            Self::Vegetation => "vegetation",
            Self::Infrastructure => "infrastructure",
            Self::Barriers => "barriers",
            Self::Topography => "topography",
        }
    }

    /// Parses a layer name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A visibility group owning a set of scene nodes.
#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    enabled: bool,
    children: BTreeSet<NodeId>,
}

impl Layer {
    fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            enabled: true,
            children: BTreeSet::new(),
        }
    }

    /// Returns the kind of this layer.
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Returns whether this layer is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the node ids assigned to this layer.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().copied()
    }

    /// Returns the number of assigned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if no nodes are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// All layers of a preview together with the surface subtype flags.
#[derive(Debug, Clone)]
pub struct LayerSet {
    layers: BTreeMap<LayerKind, Layer>,
    surface_subtypes: BTreeMap<String, bool>,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerSet {
    /// Creates the full set of layers, all enabled.
    pub fn new() -> Self {
        Self {
            layers: LayerKind::ALL.into_iter().map(|k| (k, Layer::new(k))).collect(),
            surface_subtypes: BTreeMap::new(),
        }
    }

    /// Returns a layer.
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.get(&kind)
    }

    /// Sets the group flag of a layer.
    pub fn set_visibility(&mut self, kind: LayerKind, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&kind) {
            layer.enabled = visible;
        }
    }

    /// Returns the group flag of a layer.
    #[must_use]
    pub fn is_visible(&self, kind: LayerKind) -> bool {
        self.layers.get(&kind).is_some_and(Layer::is_enabled)
    }

    /// Sets the flag of one surface subtype.
    pub fn set_subtype_visibility(&mut self, subtype: &str, visible: bool) {
        self.surface_subtypes.insert(subtype.to_string(), visible);
    }

    /// Returns the flag of a surface subtype; unknown subtypes are visible.
    #[must_use]
    pub fn subtype_visibility(&self, subtype: &str) -> bool {
        self.surface_subtypes.get(subtype).copied().unwrap_or(true)
    }

    /// Surface subtypes that have an explicit flag, with their flag.
    pub fn subtypes(&self) -> impl Iterator<Item = (&str, bool)> {
        self.surface_subtypes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Registers a surface subtype so it shows up in [`subtypes`](Self::subtypes).
    ///
    /// An existing flag is kept.
    pub fn register_subtype(&mut self, subtype: &str) {
        self.surface_subtypes.entry(subtype.to_string()).or_insert(true);
    }

    /// Visibility of a node in `kind` carrying `subtype`.
    #[must_use]
    pub fn effective_visibility(&self, kind: LayerKind, subtype: Option<&str>) -> bool {
        let group = self.is_visible(kind);
        match (kind, subtype) {
            (LayerKind::Surface, Some(subtype)) => group && self.subtype_visibility(subtype),
            _ => group,
        }
    }

    /// Assigns a node to a layer.
    pub fn assign(&mut self, kind: LayerKind, id: NodeId) {
        if let Some(layer) = self.layers.get_mut(&kind) {
            layer.children.insert(id);
        }
    }

    /// Drops all node assignments, keeping the flags.
    pub fn clear_children(&mut self) {
        for layer in self.layers.values_mut() {
            layer.children.clear();
        }
    }

    /// Flips the visibility flag of every assigned node in `scene`.
    ///
    /// Nodes are never created or destroyed. Assigned ids that no longer
    /// exist in the scene are skipped. Returns the number of nodes updated.
    pub fn apply(&self, scene: &mut Scene) -> usize {
        let mut updated = 0;
        for layer in self.layers.values() {
            for id in &layer.children {
                let subtype = match scene.get(*id).map(|n| &n.role) {
                    Some(NodeRole::Model { subtype, .. }) => subtype.clone(),
                    _ => None,
                };
                let visible = self.effective_visibility(layer.kind, subtype.as_deref());
                if scene.set_visible(*id, visible) {
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Ids of assigned nodes that are currently visible in `scene`.
    pub fn visible_node_ids(&self, scene: &Scene) -> BTreeSet<NodeId> {
        self.layers
            .values()
            .flat_map(|l| l.children.iter().copied())
            .filter(|id| scene.get(*id).is_some_and(|n| n.visible))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{NodeContent, SceneNode};
    use glam::Vec3;
    use proptest::prelude::*;

    fn add(scene: &mut Scene, layers: &mut LayerSet, kind: LayerKind, subtype: Option<&str>) -> NodeId {
        let id = scene.insert(SceneNode::new(
            "n",
            NodeRole::Model {
                layer: kind,
                subtype: subtype.map(str::to_string),
            },
            NodeContent::Lines {
                segments: vec![[Vec3::ZERO, Vec3::X]],
                color: Vec3::ONE,
                dashed: false,
            },
        ));
        layers.assign(kind, id);
        id
    }

    #[test]
    fn test_layer_names_round_trip() {
        for kind in LayerKind::ALL {
            assert_eq!(LayerKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(LayerKind::from_name(" Buildings "), Some(LayerKind::Buildings));
        assert_eq!(LayerKind::from_name("roads"), None);
    }

    #[test]
    fn test_surface_composition() {
        let mut layers = LayerSet::new();
        layers.set_visibility(LayerKind::Surface, false);
        layers.set_subtype_visibility("footway", true);
        assert!(!layers.effective_visibility(LayerKind::Surface, Some("footway")));

        layers.set_visibility(LayerKind::Surface, true);
        layers.set_subtype_visibility("footway", false);
        assert!(!layers.effective_visibility(LayerKind::Surface, Some("footway")));

        layers.set_subtype_visibility("footway", true);
        assert!(layers.effective_visibility(LayerKind::Surface, Some("footway")));

        assert!(layers.effective_visibility(LayerKind::Surface, Some("never_seen")));
    }

    #[test]
    fn test_subtype_flags_only_apply_to_surface() {
        let mut layers = LayerSet::new();
        layers.set_subtype_visibility("street_lamp", false);
        assert!(layers.effective_visibility(LayerKind::Infrastructure, Some("street_lamp")));
    }

    #[test]
    fn test_apply_hides_and_restores() {
        let mut scene = Scene::new();
        let mut layers = LayerSet::new();
        let b = add(&mut scene, &mut layers, LayerKind::Buildings, None);
        let f = add(&mut scene, &mut layers, LayerKind::Surface, Some("footway"));
        let r = add(&mut scene, &mut layers, LayerKind::Surface, Some("road"));
        layers.set_subtype_visibility("road", false);
        layers.apply(&mut scene);
        let before = layers.visible_node_ids(&scene);
        assert_eq!(before, [b, f].into_iter().collect());

        layers.set_visibility(LayerKind::Surface, false);
        assert_eq!(layers.apply(&mut scene), 3);
        assert_eq!(layers.visible_node_ids(&scene), [b].into_iter().collect());

        layers.set_visibility(LayerKind::Surface, true);
        layers.apply(&mut scene);
        assert_eq!(layers.visible_node_ids(&scene), before);
        assert!(!scene.get(r).unwrap().visible);
    }

    #[test]
    fn test_nodes_added_after_hiding_are_hidden() {
        let mut scene = Scene::new();
        let mut layers = LayerSet::new();
        layers.set_visibility(LayerKind::Vegetation, false);
        add(&mut scene, &mut layers, LayerKind::Vegetation, None);
        layers.apply(&mut scene);
        let late = add(&mut scene, &mut layers, LayerKind::Vegetation, None);
        layers.apply(&mut scene);
        assert!(!scene.get(late).unwrap().visible);
    }

    #[test]
    fn test_apply_skips_removed_nodes() {
        let mut scene = Scene::new();
        let mut layers = LayerSet::new();
        let id = add(&mut scene, &mut layers, LayerKind::Barriers, None);
        scene.remove(id).unwrap();
        assert_eq!(layers.apply(&mut scene), 0);
    }

    #[test]
    fn test_register_subtype_keeps_flag() {
        let mut layers = LayerSet::new();
        layers.set_subtype_visibility("grass", false);
        layers.register_subtype("grass");
        layers.register_subtype("water");
        let subtypes: Vec<_> = layers.subtypes().collect();
        assert_eq!(subtypes, vec![("grass", false), ("water", true)]);
    }

    proptest! {
        #[test]
        fn prop_toggles_are_idempotent(
            toggles in proptest::collection::vec((0usize..6, any::<bool>(), any::<bool>()), 1..24)
        ) {
            let mut scene = Scene::new();
            let mut layers = LayerSet::new();
            for kind in LayerKind::ALL {
                add(&mut scene, &mut layers, kind, None);
            }
            add(&mut scene, &mut layers, LayerKind::Surface, Some("footway"));
            let count = scene.len();

            for (layer, visible, subtype) in toggles {
                if subtype {
                    layers.set_subtype_visibility("footway", visible);
                } else {
                    layers.set_visibility(LayerKind::ALL[layer], visible);
                }
                layers.apply(&mut scene);
                let once = layers.visible_node_ids(&scene);
                layers.apply(&mut scene);
                prop_assert_eq!(layers.visible_node_ids(&scene), once);
                prop_assert_eq!(scene.len(), count);
            }
        }
    }
}
