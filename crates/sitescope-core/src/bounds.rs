//! Axis-aligned scene bounds.
//!
//! Every overlay and the map underlay size and place themselves relative to
//! the bounds of the loaded model geometry. Bounds are derived, never stored
//! by callers: the [`Scene`](crate::Scene) recomputes them whenever model
//! nodes change and reports `None` while nothing has been loaded.

use glam::Vec3;

use crate::error::{Result, SitescopeError};

/// Axis-aligned bounding box of all model geometry, in scene-local metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    /// Creates bounds from explicit corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Computes the bounds of a point set.
    ///
    /// Returns `None` for an empty set or when any coordinate is not finite.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut any = false;

        for p in points {
            if !p.is_finite() {
                return None;
            }
            min = min.min(*p);
            max = max.max(*p);
            any = true;
        }

        any.then_some(Self { min, max })
    }

    /// Grows these bounds to include `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest extent over all three axes.
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Largest extent over the horizontal (X/Z) axes.
    pub fn max_horizontal_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.z)
    }

    /// Validates that the box is usable for sizing overlays.
    ///
    /// A box with zero extent on every axis (a single point) or with
    /// non-finite corners cannot scale anything proportionally.
    pub fn validated(&self) -> Result<Self> {
        let dim = self.max_dimension();
        if !self.min.is_finite() || !self.max.is_finite() || !dim.is_finite() || dim <= 0.0 {
            return Err(SitescopeError::DegenerateBounds);
        }
        Ok(*self)
    }
}
