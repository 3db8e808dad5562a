//! Retained scene registry.
//!
//! The [`Scene`] owns every drawable node of a preview: model geometry handed
//! over by the ingestor and the helper geometry created by overlays. Hosts
//! mirror it into their rendering backend; each node stands for one set of
//! backend resources (geometry buffer, material, and possibly a texture), so
//! removing a node is the disposal of those resources.

use std::collections::BTreeMap;

use glam::{Mat4, Vec3};

use crate::bounds::SceneBounds;
use crate::error::{Result, SitescopeError};
use crate::layer::LayerKind;

/// Stable identifier of a node within one [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Raw numeric id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Overlays that create helper nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKind {
    SolarPath,
    WindField,
    MapUnderlay,
}

impl OverlayKind {
    /// Whether nodes of this overlay are hidden while capturing a frame.
    pub fn is_capture_helper(self) -> bool {
        matches!(self, Self::SolarPath | Self::WindField)
    }
}

/// What a node belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// Model geometry in a visibility layer, optionally tagged with a
    /// surface/infrastructure subtype.
    Model {
        layer: LayerKind,
        subtype: Option<String>,
    },
    /// Helper geometry owned by an overlay.
    Overlay(OverlayKind),
}

/// Opaque handle of a texture that arrived asynchronously (map tiles).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub String);

/// Drawable content of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Non-indexed triangle soup with per-vertex normals.
    Mesh {
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        color: Vec3,
        opacity: f32,
        flat_shading: bool,
    },
    /// Independent line segments.
    Lines {
        segments: Vec<[Vec3; 2]>,
        color: Vec3,
        dashed: bool,
    },
    /// Connected polyline.
    Polyline { points: Vec<Vec3>, color: Vec3 },
    /// One base mesh drawn once per transform in a single call.
    Instanced {
        base_positions: Vec<Vec3>,
        base_normals: Vec<Vec3>,
        transforms: Vec<Mat4>,
        colors: Vec<Vec3>,
        flat_shading: bool,
    },
    /// Text rendered to a texture and drawn on a ground-plane quad.
    Label {
        text: String,
        position: Vec3,
        size: f32,
        color: Vec3,
    },
    /// Horizontal quad at `center`, `size` metres along X/Z, waiting for a
    /// texture until one is attached.
    TexturedQuad {
        center: Vec3,
        size: f32,
        texture: Option<TextureHandle>,
    },
}

/// Backend resource footprint of a set of nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

impl ResourceCounts {
    /// Sum over all resource kinds.
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }
}

impl NodeContent {
    /// Resources a backend allocates to draw this content.
    pub fn resources(&self) -> ResourceCounts {
        let textures = match self {
            Self::Label { .. } => 1,
            Self::TexturedQuad { texture, .. } => usize::from(texture.is_some()),
            _ => 0,
        };
        ResourceCounts {
            geometries: 1,
            materials: 1,
            textures,
        }
    }

    /// Mesh positions; other content never contributes to scene bounds.
    fn mesh_positions(&self) -> Option<&[Vec3]> {
        match self {
            Self::Mesh { positions, .. } => Some(positions),
            _ => None,
        }
    }
}

/// A drawable node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub role: NodeRole,
    pub content: NodeContent,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl SceneNode {
    /// Creates a visible node that neither casts nor receives shadows.
    pub fn new(name: impl Into<String>, role: NodeRole, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            role,
            content,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Enables shadow casting and receiving.
    #[must_use]
    pub fn with_shadows(mut self) -> Self {
        self.cast_shadow = true;
        self.receive_shadow = true;
        self
    }

    /// Returns the overlay that owns this node, if any.
    pub fn overlay(&self) -> Option<OverlayKind> {
        match self.role {
            NodeRole::Overlay(kind) => Some(kind),
            NodeRole::Model { .. } => None,
        }
    }

    /// Whether this node is model geometry.
    pub fn is_model(&self) -> bool {
        matches!(self.role, NodeRole::Model { .. })
    }

    /// Bounds this node adds to the scene: ingested model meshes only.
    fn model_mesh_bounds(&self) -> Option<SceneBounds> {
        if !self.is_model() {
            return None;
        }
        SceneBounds::from_points(self.content.mesh_positions()?)
    }
}

/// Registry of all nodes in a preview scene.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
    bounds: Option<SceneBounds>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node and returns its id.
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        if let Some(b) = node.model_mesh_bounds() {
            self.bounds = Some(match self.bounds {
                Some(current) => current.union(&b),
                None => b,
            });
        }
        self.nodes.insert(id, node);
        id
    }

    /// Removes a node, releasing its resources.
    pub fn remove(&mut self, id: NodeId) -> Result<SceneNode> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or(SitescopeError::NodeNotFound(id))?;
        if node.model_mesh_bounds().is_some() {
            self.update_extents();
        }
        Ok(node)
    }

    /// Gets a node by id.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Gets a mutable node by id.
    ///
    /// Callers must not change the geometry of model nodes through this;
    /// bounds are only refreshed on insert and remove.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Checks whether a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Sets the visibility flag of a node. Returns `false` if it does not exist.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Attaches a texture to a textured quad.
    pub fn attach_texture(&mut self, id: NodeId, handle: TextureHandle) -> Result<()> {
        match self.nodes.get_mut(&id).map(|n| &mut n.content) {
            Some(NodeContent::TexturedQuad { texture, .. }) => {
                *texture = Some(handle);
                Ok(())
            }
            _ => Err(SitescopeError::NodeNotFound(id)),
        }
    }

    /// Iterates all nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    /// Iterates the nodes owned by an overlay.
    pub fn overlay_nodes(&self, kind: OverlayKind) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.iter().filter(move |(_, n)| n.overlay() == Some(kind))
    }

    /// Iterates model nodes.
    pub fn model_nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.iter().filter(|(_, n)| n.is_model())
    }

    /// Returns the total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounds of all model meshes, or `None` while no mesh is loaded.
    ///
    /// Instanced point features, outlines and overlays never seed the bounds.
    pub fn bounds(&self) -> Option<SceneBounds> {
        self.bounds
    }

    /// Recomputes the bounds from all model meshes.
    pub fn update_extents(&mut self) {
        self.bounds = self
            .nodes
            .values()
            .filter_map(SceneNode::model_mesh_bounds)
            .reduce(|a, b| a.union(&b));
    }

    /// Resources held by every node.
    pub fn resource_counts(&self) -> ResourceCounts {
        self.nodes
            .values()
            .map(|n| n.content.resources())
            .fold(ResourceCounts::default(), |acc, r| ResourceCounts {
                geometries: acc.geometries + r.geometries,
                materials: acc.materials + r.materials,
                textures: acc.textures + r.textures,
            })
    }

    /// Removes all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.bounds = None;
    }
}
