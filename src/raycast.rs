use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::shape::Shape;

/// Determinants below this are treated as back-facing or parallel.
const DET_EPSILON: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from the camera's eye through a point in normalized device coordinates.
    pub fn from_camera(camera: &Camera, ndc: Vec2) -> Self {
        Self {
            origin: camera.position,
            direction: camera.ray_direction(ndc),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when the ray (not the infinite line) passes within `radius` of `center`.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let along = (center - self.origin).dot(self.direction).max(0.0);
        self.at(along).distance_squared(center) <= radius * radius
    }

    /// Moller-Trumbore, returning the distance to a front-facing (counter-clockwise) hit.
    pub fn intersect_triangle(&self, [a, b, c]: [Vec3; 3]) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det <= DET_EPSILON {
            return None;
        }
        let inv_det = det.recip();

        let t_vec = self.origin - a;
        let u = t_vec.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = t_vec.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Nearest hit on one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Index into the queried shape slice.
    pub shape: usize,
    pub distance: f32,
    pub point: Vec3,
}

/// Picks shapes along a ray, limited to `[near, far]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    pub ray: Ray,
    pub near: f32,
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            ray: Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_from_camera(&mut self, ndc: Vec2, camera: &Camera) {
        self.ray = Ray::from_camera(camera, ndc);
    }

    /// Nearest front-facing hit on `shape`, if any.
    pub fn intersect_shape(&self, shape: &Shape) -> Option<(f32, Vec3)> {
        if !self
            .ray
            .intersects_sphere(shape.world_center(), shape.bounds.radius)
        {
            return None;
        }
        // Shapes are only translated, so local space is a plain offset.
        let local = Ray {
            origin: self.ray.origin - shape.position,
            direction: self.ray.direction,
        };
        shape
            .mesh
            .triangles()
            .filter_map(|tri| local.intersect_triangle(tri))
            .filter(|t| (self.near..=self.far).contains(t))
            .min_by(f32::total_cmp)
            .map(|t| (t, self.ray.at(t)))
    }

    /// One entry per hit shape, nearest first.
    pub fn intersect_shapes(&self, shapes: &[Shape]) -> Vec<Intersection> {
        let mut hits = shapes
            .iter()
            .enumerate()
            .filter_map(|(index, shape)| {
                self.intersect_shape(shape)
                    .map(|(distance, point)| Intersection {
                        shape: index,
                        distance,
                        point,
                    })
            })
            .collect::<Vec<_>>();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn hits_any(&self, shapes: &[Shape]) -> bool {
        shapes
            .iter()
            .any(|shape| self.intersect_shape(shape).is_some())
    }
}

/// Converts a pixel position (origin top-left) into normalized device coordinates.
pub fn pointer_to_ndc(position: Vec2, viewport: (u32, u32)) -> Vec2 {
    let width = viewport.0.max(1) as f32;
    let height = viewport.1.max(1) as f32;
    Vec2::new(
        position.x / width * 2.0 - 1.0,
        -(position.y / height * 2.0 - 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::shape::Dimensions;

    fn sphere(radius: f32, position: Vec3) -> Shape {
        Shape::new(Dimensions::Sphere { radius }, 0xff0000, position)
    }

    fn caster(origin: Vec3, direction: Vec3) -> Raycaster {
        Raycaster {
            ray: Ray::new(origin, direction),
            ..Raycaster::default()
        }
    }

    #[test]
    fn hits_the_near_side_of_a_sphere() {
        let shapes = [sphere(1.0, Vec3::ZERO)];
        let hits = caster(Vec3::new(0.05, 0.1, 10.0), Vec3::NEG_Z).intersect_shapes(&shapes);
        assert_eq!(hits.len(), 1);
        // facets sit slightly inside the true surface
        let expected = 10.0 - (1.0_f32 - 0.05 * 0.05 - 0.1 * 0.1).sqrt();
        assert!((hits[0].distance - expected).abs() < 1e-2);
        assert!(hits[0].point.z > 0.9);
    }

    #[test]
    fn misses_when_pointing_away() {
        let shapes = [sphere(1.0, Vec3::ZERO)];
        let raycaster = caster(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(!raycaster.hits_any(&shapes));
    }

    #[test]
    fn ray_starting_inside_a_shape_does_not_hit_it() {
        let shapes = [sphere(2.0, Vec3::ZERO)];
        assert!(!caster(Vec3::ZERO, Vec3::X).hits_any(&shapes));
    }

    #[test]
    fn results_are_sorted_by_distance() {
        let shapes = [
            sphere(1.0, Vec3::new(0.0, 0.0, -5.0)),
            Shape::new(
                Dimensions::Box {
                    width: 2.0,
                    height: 2.0,
                    depth: 2.0,
                },
                0x00ff00,
                Vec3::ZERO,
            ),
        ];
        let hits = caster(Vec3::new(0.1, 0.3, 10.0), Vec3::NEG_Z).intersect_shapes(&shapes);
        assert_eq!(hits.iter().map(|h| h.shape).collect::<Vec<_>>(), vec![1, 0]);
        assert!((hits[0].distance - 9.0).abs() < 1e-4);
        let expected = 15.0 - (1.0_f32 - 0.1 * 0.1 - 0.3 * 0.3).sqrt();
        assert!((hits[1].distance - expected).abs() < 1e-2);
    }

    #[test]
    fn hits_cylinder_side_and_cone_base() {
        let cylinder = Shape::new(
            Dimensions::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 2.0,
            },
            0x0000ff,
            Vec3::new(4.0, 0.0, 0.0),
        );
        let hit = caster(Vec3::new(4.05, 0.3, 10.0), Vec3::NEG_Z).intersect_shape(&cylinder);
        assert!((hit.unwrap().0 - 9.0).abs() < 1e-2);

        let cone = Shape::new(
            Dimensions::Cone {
                radius: 1.0,
                height: 2.0,
            },
            0x0000ff,
            Vec3::ZERO,
        );
        let hit = caster(Vec3::new(0.1, -5.0, 0.2), Vec3::Y).intersect_shape(&cone);
        assert!((hit.unwrap().0 - 4.0).abs() < 1e-4);
    }

    #[test]
    fn far_limit_excludes_distant_hits() {
        let shapes = [sphere(1.0, Vec3::ZERO)];
        let mut raycaster = caster(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        raycaster.far = 5.0;
        assert!(raycaster.intersect_shapes(&shapes).is_empty());
    }

    #[test]
    fn set_from_camera_uses_the_eye_position() {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera(Vec2::ZERO, &camera);
        assert_eq!(raycaster.ray.origin, camera.position);
        assert!((raycaster.ray.direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn pointer_maps_to_ndc() {
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), (800, 600)), Vec2::ZERO);
        assert_eq!(pointer_to_ndc(Vec2::ZERO, (800, 600)), Vec2::new(-1.0, 1.0));
        assert_eq!(
            pointer_to_ndc(Vec2::new(800.0, 600.0), (800, 600)),
            Vec2::new(1.0, -1.0)
        );
    }
}
