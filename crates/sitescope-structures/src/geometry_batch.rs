//! Mesh groups ingested from the geometry source.
//!
//! A [`GeometryBatch`] holds one raw triangle soup together with the data
//! derived from it at ingestion time:
//! - Vertex normals (flat per face, or smooth across welded positions)
//! - Edge outline for buildings (boundary edges and creases)
//! - Resolved display color

use std::collections::HashMap;

use glam::Vec3;
use sitescope_core::{LayerKind, NodeContent, NodeRole, SceneNode};

use crate::palette;

/// Minimum angle between adjacent face normals for an edge to be outlined.
const OUTLINE_THRESHOLD_DEG: f32 = 1.0;

/// Positions closer than this are welded when computing smooth normals.
const WELD_EPSILON: f32 = 1e-4;

/// Feature class of a mesh group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Buildings,
    Surface,
    Infrastructure,
    Barriers,
    Topography,
}

impl BatchKind {
    /// Maps a payload `type` to a batch kind.
    ///
    /// Unrecognized mesh types are kept as infrastructure so they stay
    /// visible rather than being dropped.
    pub fn from_type(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "buildings" | "building" => Self::Buildings,
            "surface" | "surfaces" => Self::Surface,
            "barriers" | "barrier" => Self::Barriers,
            "topography" | "terrain" => Self::Topography,
            _ => Self::Infrastructure,
        }
    }

    /// Visibility layer owning batches of this kind.
    pub fn layer(self) -> LayerKind {
        match self {
            Self::Buildings => LayerKind::Buildings,
            Self::Surface => LayerKind::Surface,
            Self::Infrastructure => LayerKind::Infrastructure,
            Self::Barriers => LayerKind::Barriers,
            Self::Topography => LayerKind::Topography,
        }
    }

    /// Display color for a batch of this kind with the given subtype.
    pub fn color(self, descriptor: Option<&str>) -> Vec3 {
        match self {
            Self::Buildings => sitescope_core::color::hex(palette::BUILDING_COLOR),
            Self::Surface => palette::surface_color(descriptor),
            Self::Infrastructure => palette::infrastructure_color(descriptor),
            Self::Barriers => sitescope_core::color::hex(palette::BARRIER_COLOR),
            Self::Topography => sitescope_core::color::hex(palette::TOPOGRAPHY_COLOR),
        }
    }
}

/// How vertex normals are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeStyle {
    /// Normals averaged over faces sharing a position.
    #[default]
    Smooth,
    /// One normal per face.
    Flat,
}

/// A named mesh group, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBatch {
    kind: BatchKind,
    descriptor: Option<String>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    color: Vec3,
    shade_style: ShadeStyle,
    outline: Option<Vec<[Vec3; 2]>>,
}

impl GeometryBatch {
    /// Builds a batch from a flat `[x, y, z, ...]` triangle soup.
    ///
    /// Returns `None` when the buffer holds no complete triangle. Trailing
    /// values that do not form a whole triangle are dropped.
    pub fn from_raw(
        kind: BatchKind,
        raw: &[f32],
        descriptor: Option<String>,
        shade_style: ShadeStyle,
    ) -> Option<Self> {
        let whole = raw.len() - raw.len() % 9;
        if whole == 0 {
            return None;
        }
        if whole != raw.len() {
            log::debug!(
                "dropping {} trailing values of a {:?} mesh",
                raw.len() - whole,
                kind
            );
        }

        let positions: Vec<Vec3> = raw[..whole]
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let color = kind.color(descriptor.as_deref());

        let mut batch = Self {
            kind,
            descriptor,
            positions,
            normals: Vec::new(),
            color,
            shade_style,
            outline: None,
        };
        batch.compute_normals();
        if kind == BatchKind::Buildings {
            batch.outline = Some(batch.compute_outline(OUTLINE_THRESHOLD_DEG));
        }
        Some(batch)
    }

    /// Returns the feature class.
    #[must_use]
    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    /// Returns the subtype tag, if any.
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    /// Returns the vertex positions, three per triangle.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the per-vertex normals.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Returns the display color.
    #[must_use]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Returns the shading style.
    #[must_use]
    pub fn shade_style(&self) -> ShadeStyle {
        self.shade_style
    }

    /// Returns the outline segments (buildings only).
    #[must_use]
    pub fn outline(&self) -> Option<&[[Vec3; 2]]> {
        self.outline.as_deref()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.positions.len() / 3
    }

    fn face_normal(&self, tri: usize) -> Vec3 {
        let v0 = self.positions[tri * 3];
        let v1 = self.positions[tri * 3 + 1];
        let v2 = self.positions[tri * 3 + 2];
        (v1 - v0).cross(v2 - v0)
    }

    fn compute_normals(&mut self) {
        let face_normals: Vec<Vec3> = (0..self.num_triangles())
            .map(|t| self.face_normal(t))
            .collect();

        self.normals = match self.shade_style {
            ShadeStyle::Flat => face_normals
                .iter()
                .flat_map(|n| std::iter::repeat(n.normalize_or_zero()).take(3))
                .collect(),
            ShadeStyle::Smooth => {
                // Unnormalized cross products weight each face by its area.
                let mut accum: HashMap<[i64; 3], Vec3> = HashMap::new();
                for (i, p) in self.positions.iter().enumerate() {
                    *accum.entry(weld_key(*p)).or_insert(Vec3::ZERO) += face_normals[i / 3];
                }
                self.positions
                    .iter()
                    .map(|p| accum[&weld_key(*p)].normalize_or_zero())
                    .collect()
            }
        };
    }

    /// Computes edges on the boundary or where adjacent faces meet at more
    /// than `threshold_deg` degrees.
    fn compute_outline(&self, threshold_deg: f32) -> Vec<[Vec3; 2]> {
        let cos_threshold = threshold_deg.to_radians().cos();
        let mut edges: HashMap<([i64; 3], [i64; 3]), (Vec3, Vec3, Vec<Vec3>)> = HashMap::new();
        let mut order: Vec<([i64; 3], [i64; 3])> = Vec::new();

        for tri in 0..self.num_triangles() {
            let normal = self.face_normal(tri).normalize_or_zero();
            if normal == Vec3::ZERO {
                continue;
            }
            for k in 0..3 {
                let a = self.positions[tri * 3 + k];
                let b = self.positions[tri * 3 + (k + 1) % 3];
                let (ka, kb) = (weld_key(a), weld_key(b));
                let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
                let entry = edges.entry(key).or_insert_with(|| {
                    order.push(key);
                    (a, b, Vec::new())
                });
                entry.2.push(normal);
            }
        }

        order
            .into_iter()
            .filter_map(|key| {
                let (a, b, normals) = &edges[&key];
                let crease = match normals.as_slice() {
                    [_] => true,
                    [n0, n1] => n0.dot(*n1) <= cos_threshold,
                    _ => true,
                };
                crease.then_some([*a, *b])
            })
            .collect()
    }

    /// Scene nodes for this batch: the mesh, and the outline for buildings.
    pub fn scene_nodes(&self, name: &str) -> Vec<SceneNode> {
        let role = NodeRole::Model {
            layer: self.kind.layer(),
            subtype: self.descriptor.clone(),
        };
        let mut nodes = vec![SceneNode::new(
            name,
            role.clone(),
            NodeContent::Mesh {
                positions: self.positions.clone(),
                normals: self.normals.clone(),
                color: self.color,
                opacity: 1.0,
                flat_shading: self.shade_style == ShadeStyle::Flat,
            },
        )
        .with_shadows()];

        if let Some(outline) = &self.outline {
            nodes.push(SceneNode::new(
                format!("{name} outline"),
                role,
                NodeContent::Lines {
                    segments: outline.clone(),
                    color: sitescope_core::color::hex(palette::BUILDING_EDGE_COLOR),
                    dashed: false,
                },
            ));
        }
        nodes
    }
}

fn weld_key(p: Vec3) -> [i64; 3] {
    let q = (p / WELD_EPSILON).round();
    [q.x as i64, q.y as i64, q.z as i64]
}
