//! Instance synthesis for point features.
//!
//! Point features are expanded into [`InstanceBatch`]es, one per
//! [`InstanceCategory`]. Every entry of a batch shares the batch's base
//! shape so a batch can be drawn with a single instanced call.

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use sitescope_core::color::hex;
use sitescope_core::{LayerKind, NodeContent, NodeRole, SceneNode};

use crate::classify::{classify, normalize_tag, Classification};
use crate::palette;
use crate::shapes::BaseShape;

/// Height of the tree trunk at unit scale.
pub const TRUNK_HEIGHT: f32 = 2.0;
/// Fraction of the trunk height where the foliage starts.
const FOLIAGE_START: f32 = 0.8;
/// Scale factor applied to shrubs and street furniture.
const SMALL_FEATURE_SCALE: f32 = 0.5;

/// A single point feature from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PointInstance {
    pub position: Vec3,
    pub scale: f32,
    /// Raw tag as received; normalized during synthesis.
    pub tag: String,
}

/// Category of an instance batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstanceCategory {
    TreeTrunk,
    TreeFoliage,
    Shrubbery,
    UtilityPole,
    Bench,
    Default,
}

impl InstanceCategory {
    /// Base shape shared by all instances of this category.
    pub fn base_shape(self) -> BaseShape {
        match self {
            Self::TreeTrunk => BaseShape::Cylinder {
                radius_top: 0.15,
                radius_bottom: 0.2,
                height: TRUNK_HEIGHT,
                segments: 6,
            },
            Self::TreeFoliage => BaseShape::Icosphere {
                radius: 1.2,
                subdivisions: 0,
            },
            Self::Shrubbery => BaseShape::Icosphere {
                radius: 0.8,
                subdivisions: 0,
            },
            Self::UtilityPole => BaseShape::Cylinder {
                radius_top: 0.1,
                radius_bottom: 0.12,
                height: 8.0,
                segments: 6,
            },
            Self::Bench => BaseShape::Cuboid {
                width: 1.8,
                height: 0.5,
                depth: 0.6,
            },
            Self::Default => BaseShape::Cuboid {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
        }
    }

    /// Visibility layer of this category.
    pub fn layer(self) -> LayerKind {
        match self {
            Self::TreeTrunk | Self::TreeFoliage | Self::Shrubbery => LayerKind::Vegetation,
            Self::UtilityPole | Self::Bench | Self::Default => LayerKind::Infrastructure,
        }
    }

    /// Display name used for scene nodes.
    pub fn name(self) -> &'static str {
        match self {
            Self::TreeTrunk => "tree trunks",
            Self::TreeFoliage => "tree foliage",
            Self::Shrubbery => "shrubbery",
            Self::UtilityPole => "utility poles",
            Self::Bench => "benches",
            Self::Default => "street furniture",
        }
    }
}

/// Placement of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub scale: Vec3,
    /// Rotation about +Y in radians; visual variation only.
    pub yaw: f32,
    pub color: Vec3,
}

impl InstanceTransform {
    /// Model matrix: translate, then yaw, then scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.yaw),
            self.position,
        )
    }
}

/// Instances of one category drawn with one base shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBatch {
    category: InstanceCategory,
    shape: BaseShape,
    instances: Vec<InstanceTransform>,
}

impl InstanceBatch {
    fn new(category: InstanceCategory) -> Self {
        Self {
            category,
            shape: category.base_shape(),
            instances: Vec::new(),
        }
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> InstanceCategory {
        self.category
    }

    /// Returns the shared base shape.
    #[must_use]
    pub fn shape(&self) -> BaseShape {
        self.shape
    }

    /// Returns the instance placements in input order.
    #[must_use]
    pub fn instances(&self) -> &[InstanceTransform] {
        &self.instances
    }

    /// Returns the number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if the batch holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Scene node drawing the whole batch.
    pub fn scene_node(&self) -> SceneNode {
        let (base_positions, base_normals) = self.shape.flat_mesh();
        SceneNode::new(
            self.category.name(),
            NodeRole::Model {
                layer: self.category.layer(),
                subtype: None,
            },
            NodeContent::Instanced {
                base_positions,
                base_normals,
                transforms: self.instances.iter().map(InstanceTransform::matrix).collect(),
                colors: self.instances.iter().map(|i| i.color).collect(),
                flat_shading: true,
            },
        )
        .with_shadows()
    }
}

/// Expands point features into instance batches ordered by category.
///
/// `rng` drives the yaw of street furniture only.
pub fn synthesize(points: &[PointInstance], rng: &mut impl Rng) -> Vec<InstanceBatch> {
    let mut batches: BTreeMap<InstanceCategory, InstanceBatch> = BTreeMap::new();
    let mut push = |category: InstanceCategory, t: InstanceTransform| {
        batches
            .entry(category)
            .or_insert_with(|| InstanceBatch::new(category))
            .instances
            .push(t);
    };

    for point in points {
        let tag = normalize_tag(&point.tag);
        let scale = effective_scale(point.scale);

        match classify(&tag) {
            Classification::Tree => {
                push(
                    InstanceCategory::TreeTrunk,
                    InstanceTransform {
                        position: point.position,
                        scale: Vec3::splat(scale),
                        yaw: 0.0,
                        color: hex(palette::TREE_TRUNK_COLOR),
                    },
                );
                push(
                    InstanceCategory::TreeFoliage,
                    InstanceTransform {
                        position: point.position
                            + Vec3::new(0.0, TRUNK_HEIGHT * FOLIAGE_START * scale, 0.0),
                        scale: Vec3::splat(scale),
                        yaw: 0.0,
                        color: hex(palette::TREE_FOLIAGE_COLOR),
                    },
                );
            }
            Classification::Shrubbery => push(
                InstanceCategory::Shrubbery,
                InstanceTransform {
                    position: point.position,
                    scale: Vec3::splat(scale * SMALL_FEATURE_SCALE),
                    yaw: 0.0,
                    color: palette::instance_color(&tag),
                },
            ),
            other => {
                let category = match other {
                    Classification::UtilityPole => InstanceCategory::UtilityPole,
                    Classification::Bench => InstanceCategory::Bench,
                    _ => InstanceCategory::Default,
                };
                push(
                    category,
                    InstanceTransform {
                        position: point.position,
                        scale: Vec3::splat(scale * SMALL_FEATURE_SCALE),
                        yaw: rng.gen_range(0.0..TAU),
                        color: palette::instance_color(&tag),
                    },
                );
            }
        }
    }

    batches.into_values().collect()
}

/// Input scale floored at 1.0; non-finite values count as 1.0.
pub fn effective_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.max(1.0)
    } else {
        1.0
    }
}
