use glam::Vec3;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RoomConfig;
use crate::mesh::Mesh;
use crate::shape::{Shape, ShapeFactory};

/// Runtime representation of the room and everything inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub room: Room,
    pub shapes: Vec<Shape>,
    pub lights: Lighting,
}

impl Scene {
    /// Builds the room and fills it with `config.shape_count` random shapes.
    pub fn generate<R: Rng + ?Sized>(config: &RoomConfig, rng: &mut R) -> Self {
        let factory = ShapeFactory::new(config.spawn_span);
        let shapes = (0..config.shape_count)
            .map(|_| factory.random_shape(rng))
            .collect::<Vec<_>>();
        info!(
            "Generated room of size {} with {} shapes (seed {:?})",
            config.room_size,
            shapes.len(),
            config.seed
        );
        Self::from_shapes(config, shapes)
    }

    /// Builds the room around a caller supplied shape list.
    pub fn from_shapes(config: &RoomConfig, shapes: Vec<Shape>) -> Self {
        Self {
            room: Room::new(config.room_size, config.room_color),
            shapes,
            lights: Lighting {
                ambient: Light {
                    position: Vec3::ZERO,
                    color: Vec3::ONE,
                    intensity: config.lighting.ambient,
                },
                point: Light {
                    position: config.lighting.position,
                    color: Vec3::ONE,
                    intensity: config.lighting.intensity,
                },
            },
        }
    }
}

/// Deterministic generator when a seed is given, OS entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Inside-facing box enclosing the shapes. Rendered unlit.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub size: f32,
    pub color: u32,
    pub mesh: Mesh,
}

impl Room {
    pub fn new(size: f32, color: u32) -> Self {
        Self {
            size,
            color,
            mesh: Mesh::room(size),
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.size * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.abs().max_element() <= self.half_extent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// One ambient term plus one point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Light,
    pub point: Light,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    #[test]
    fn generate_populates_the_configured_count() {
        let config = RoomConfig::default();
        let scene = Scene::generate(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(scene.shapes.len(), 20);
        assert_eq!(scene.room.size, 20.0);
        assert_eq!(scene.room.color, 0x808080);
        assert_eq!(scene.lights.point.position, Vec3::new(0.0, 10.0, 10.0));
        assert_eq!(scene.lights.ambient.intensity, 0.5);
    }

    #[test]
    fn every_shape_is_inside_the_room() {
        let config = RoomConfig::default();
        let scene = Scene::generate(&config, &mut StdRng::seed_from_u64(99));
        for shape in &scene.shapes {
            assert!(ShapeKind::ALL.contains(&shape.kind()));
            assert!(scene.room.contains(shape.position));
        }
    }

    #[test]
    fn shape_count_follows_config() {
        let config = RoomConfig {
            shape_count: 3,
            ..RoomConfig::default()
        };
        let scene = Scene::generate(&config, &mut StdRng::seed_from_u64(5));
        assert_eq!(scene.shapes.len(), 3);
    }

    #[test]
    fn same_seed_gives_the_same_room() {
        let config = RoomConfig::default();
        let first = Scene::generate(&config, &mut seeded_rng(Some(42)));
        let second = Scene::generate(&config, &mut seeded_rng(Some(42)));
        assert_eq!(first, second);
    }
}
