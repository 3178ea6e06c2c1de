use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Floats per interleaved vertex: `position.xyz` followed by `normal.xyz`.
pub const VERTEX_STRIDE: usize = 6;

const SPHERE_WIDTH_SEGMENTS: u32 = 32;
const SPHERE_HEIGHT_SEGMENTS: u32 = 32;
const RADIAL_SEGMENTS: u32 = 32;

/// GPU ready triangle mesh with counter-clockwise front faces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Sphere enclosing every vertex of a mesh, in the mesh's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Mesh {
    pub fn sphere(radius: f32) -> Self {
        let mut mesh = Self::default();
        let columns = SPHERE_WIDTH_SEGMENTS + 1;
        for iy in 0..=SPHERE_HEIGHT_SEGMENTS {
            let theta = iy as f32 / SPHERE_HEIGHT_SEGMENTS as f32 * PI;
            for ix in 0..=SPHERE_WIDTH_SEGMENTS {
                let phi = ix as f32 / SPHERE_WIDTH_SEGMENTS as f32 * TAU;
                let normal = Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                mesh.push_vertex(normal * radius, normal);
            }
        }
        for iy in 0..SPHERE_HEIGHT_SEGMENTS {
            for ix in 0..SPHERE_WIDTH_SEGMENTS {
                let a = iy * columns + ix + 1;
                let b = iy * columns + ix;
                let c = (iy + 1) * columns + ix;
                let d = (iy + 1) * columns + ix + 1;
                // The pole rows collapse to a point, so each contributes a single fan.
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != SPHERE_HEIGHT_SEGMENTS - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        mesh
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let mut mesh = Self::default();
        // (normal, u, v) with u x v == normal so every quad winds outward.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            let base = mesh.vertex_count();
            let center = normal * half;
            let u = u * half;
            let v = v * half;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                mesh.push_vertex(center + u * su + v * sv, normal);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// A cone is a cylinder whose top radius is zero.
    pub fn cone(radius: f32, height: f32) -> Self {
        Self::cylinder(0.0, radius, height)
    }

    /// Capped cylinder along the Y axis, centered on the origin.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        let mut mesh = Self::default();
        let half_height = height * 0.5;
        let slope = if height > 0.0 {
            (radius_bottom - radius_top) / height
        } else {
            0.0
        };

        let columns = RADIAL_SEGMENTS + 1;
        for (y, radius) in [(half_height, radius_top), (-half_height, radius_bottom)] {
            for ix in 0..=RADIAL_SEGMENTS {
                let theta = ix as f32 / RADIAL_SEGMENTS as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize();
                mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
            }
        }
        for ix in 0..RADIAL_SEGMENTS {
            let a = ix;
            let b = columns + ix;
            let c = columns + ix + 1;
            let d = ix + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            mesh.push_cap(half_height, radius_top, Vec3::Y);
        }
        if radius_bottom > 0.0 {
            mesh.push_cap(-half_height, radius_bottom, Vec3::NEG_Y);
        }
        mesh
    }

    /// Box seen from the inside: faces and normals point towards the center.
    pub fn room(size: f32) -> Self {
        let mut mesh = Self::cuboid(size, size, size);
        mesh.flip();
        mesh
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / VERTEX_STRIDE) as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: u32) -> Vec3 {
        let start = index as usize * VERTEX_STRIDE;
        Vec3::from_slice(&self.vertices[start..start + 3])
    }

    /// Iterates over triangles as corner positions in winding order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.position(tri[0]),
                self.position(tri[1]),
                self.position(tri[2]),
            ]
        })
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.vertices.is_empty() {
            return BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        let (min, max) = (0..self.vertex_count())
            .map(|index| self.position(index))
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(min, max), p| {
                (min.min(p), max.max(p))
            });
        let center = (min + max) * 0.5;
        let radius = (0..self.vertex_count())
            .map(|index| self.position(index).distance_squared(center))
            .fold(0.0_f32, f32::max)
            .sqrt();
        BoundingSphere { center, radius }
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
    }

    fn push_cap(&mut self, y: f32, radius: f32, normal: Vec3) {
        let center = self.vertex_count();
        self.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        for ix in 0..=RADIAL_SEGMENTS {
            let theta = ix as f32 / RADIAL_SEGMENTS as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
        for ix in 0..RADIAL_SEGMENTS {
            let current = center + 1 + ix;
            let next = current + 1;
            if normal.y > 0.0 {
                self.indices.extend_from_slice(&[center, current, next]);
            } else {
                self.indices.extend_from_slice(&[center, next, current]);
            }
        }
    }

    fn flip(&mut self) {
        for vertex in self.vertices.chunks_exact_mut(VERTEX_STRIDE) {
            for component in &mut vertex[3..] {
                *component = -*component;
            }
        }
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_normal(mesh: &Mesh, index: u32) -> Vec3 {
        let start = index as usize * VERTEX_STRIDE + 3;
        Vec3::from_slice(&mesh.vertices[start..start + 3])
    }

    fn face_normal([a, b, c]: [Vec3; 3]) -> Vec3 {
        (b - a).cross(c - a)
    }

    #[test]
    fn cuboid_faces_wind_outward() {
        let mesh = Mesh::cuboid(2.0, 2.0, 2.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for tri in mesh.triangles() {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(face_normal(tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn room_faces_wind_inward() {
        let mesh = Mesh::room(20.0);
        for tri in mesh.triangles() {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(face_normal(tri).dot(centroid) < 0.0);
        }
        for index in 0..mesh.vertex_count() {
            assert!(vertex_normal(&mesh, index).dot(mesh.position(index)) < 0.0);
        }
    }

    #[test]
    fn sphere_faces_wind_outward() {
        let mesh = Mesh::sphere(1.5);
        for tri in mesh.triangles() {
            let normal = face_normal(tri);
            if normal.length_squared() < 1e-10 {
                continue;
            }
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
        let bounds = mesh.bounding_sphere();
        assert!(bounds.center.length() < 1e-4);
        assert!((bounds.radius - 1.5).abs() < 1e-4);
    }

    #[test]
    fn cylinder_torso_and_caps_wind_outward() {
        let mesh = Mesh::cylinder(0.5, 1.0, 2.0);
        // torso + two caps
        assert_eq!(mesh.triangle_count(), 32 * 2 + 32 * 2);
        for tri in mesh.triangles() {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(face_normal(tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn cone_has_no_top_cap() {
        let mesh = Mesh::cone(1.0, 3.0);
        assert_eq!(mesh.triangle_count(), 32 * 2 + 32);
        let bounds = mesh.bounding_sphere();
        assert!(bounds.radius >= 1.5);
    }

    #[test]
    fn normals_are_unit_length() {
        for mesh in [Mesh::sphere(1.0), Mesh::cuboid(1.0, 2.0, 3.0), Mesh::cone(1.0, 2.0)] {
            for index in 0..mesh.vertex_count() {
                assert!((vertex_normal(&mesh, index).length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
