//! Low-poly base shapes for instanced point features.
//!
//! All shapes are tessellated with their pivot at the base: the origin is
//! the ground contact point, so an instance placed at a position stands on
//! it instead of being half-buried.

use std::f32::consts::TAU;

use glam::Vec3;

/// Parametric base shape of an instance batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseShape {
    /// Capped cylinder along +Y.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// Icosahedron, optionally subdivided.
    Icosphere { radius: f32, subdivisions: u32 },
    /// Axis-aligned box.
    Cuboid { width: f32, height: f32, depth: f32 },
}

impl BaseShape {
    /// Height of the shape at unit scale.
    pub fn height(&self) -> f32 {
        match *self {
            Self::Cylinder { height, .. } | Self::Cuboid { height, .. } => height,
            Self::Icosphere { .. } => {
                let (lo, hi) = vertical_extent(&self.centered_triangles());
                hi - lo
            }
        }
    }

    /// Translation that moves the shape's geometric center to sit on the
    /// ground plane.
    pub fn pivot_offset(&self) -> Vec3 {
        match *self {
            Self::Cylinder { height, .. } | Self::Cuboid { height, .. } => {
                Vec3::new(0.0, height * 0.5, 0.0)
            }
            // An icosahedron's poles sit below the circumscribed radius.
            Self::Icosphere { .. } => {
                let (lo, _) = vertical_extent(&self.centered_triangles());
                Vec3::new(0.0, -lo, 0.0)
            }
        }
    }

    /// Triangle soup with the pivot applied, three vertices per face.
    pub fn triangles(&self) -> Vec<Vec3> {
        let centered = self.centered_triangles();
        let offset = match *self {
            Self::Icosphere { .. } => Vec3::new(0.0, -vertical_extent(&centered).0, 0.0),
            _ => self.pivot_offset(),
        };
        centered.into_iter().map(|p| p + offset).collect()
    }

    fn centered_triangles(&self) -> Vec<Vec3> {
        match *self {
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => cylinder(radius_top, radius_bottom, height, segments.max(3)),
            Self::Icosphere {
                radius,
                subdivisions,
            } => icosphere(radius, subdivisions),
            Self::Cuboid {
                width,
                height,
                depth,
            } => cuboid(Vec3::new(width, height, depth) * 0.5),
        }
    }

    /// Triangles with per-face normals.
    pub fn flat_mesh(&self) -> (Vec<Vec3>, Vec<Vec3>) {
        let positions = self.triangles();
        let normals = positions
            .chunks_exact(3)
            .flat_map(|t| {
                let n = (t[1] - t[0]).cross(t[2] - t[0]).normalize_or_zero();
                [n, n, n]
            })
            .collect();
        (positions, normals)
    }
}

fn vertical_extent(points: &[Vec3]) -> (f32, f32) {
    points
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)))
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Vec<Vec3> {
    let half = height * 0.5;
    let ring = |r: f32, y: f32, i: u32| {
        let a = TAU * i as f32 / segments as f32;
        Vec3::new(r * a.sin(), y, r * a.cos())
    };
    let top_c = Vec3::new(0.0, half, 0.0);
    let bot_c = Vec3::new(0.0, -half, 0.0);

    let mut out = Vec::with_capacity(segments as usize * 12);
    for i in 0..segments {
        let b0 = ring(radius_bottom, -half, i);
        let b1 = ring(radius_bottom, -half, i + 1);
        let t0 = ring(radius_top, half, i);
        let t1 = ring(radius_top, half, i + 1);
        out.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
        out.extend_from_slice(&[top_c, t0, t1]);
        out.extend_from_slice(&[bot_c, b1, b0]);
    }
    out
}

fn cuboid(h: Vec3) -> Vec<Vec3> {
    let v = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    let quads = [
        [v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.), v(1., -1., 1.)],
        [v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.)],
        [v(-1., 1., -1.), v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.)],
        [v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.)],
        [v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.)],
        [v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.), v(1., -1., -1.)],
    ];
    quads
        .iter()
        .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
        .collect()
}

fn icosphere(radius: f32, subdivisions: u32) -> Vec<Vec3> {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let verts = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let mut tris: Vec<[Vec3; 3]> = FACES
        .iter()
        .map(|f| [verts[f[0]], verts[f[1]], verts[f[2]]].map(|v| v.normalize()))
        .collect();

    for _ in 0..subdivisions {
        tris = tris
            .into_iter()
            .flat_map(|[a, b, c]| {
                let ab = ((a + b) * 0.5).normalize();
                let bc = ((b + c) * 0.5).normalize();
                let ca = ((c + a) * 0.5).normalize();
                [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
            })
            .collect();
    }

    tris.into_iter().flatten().map(|v| v * radius).collect()
}
