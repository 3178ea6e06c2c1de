use std::fmt;

use glam::Vec3;
use rand::Rng;

use crate::mesh::{BoundingSphere, Mesh};

/// The four primitive kinds a room is populated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Box,
    Cone,
    Cylinder,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [Self::Sphere, Self::Box, Self::Cone, Self::Cylinder];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size parameters of a shape, one variant per kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimensions {
    Sphere {
        radius: f32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cone {
        radius: f32,
        height: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
}

impl Dimensions {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
            Self::Cone { .. } => ShapeKind::Cone,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
        }
    }

    pub fn build_mesh(&self) -> Mesh {
        match *self {
            Self::Sphere { radius } => Mesh::sphere(radius),
            Self::Box {
                width,
                height,
                depth,
            } => Mesh::cuboid(width, height, depth),
            Self::Cone { radius, height } => Mesh::cone(radius, height),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => Mesh::cylinder(radius_top, radius_bottom, height),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sphere { radius } => write!(f, "radius={radius:.2}"),
            Self::Box {
                width,
                height,
                depth,
            } => write!(f, "size={width:.2}x{height:.2}x{depth:.2}"),
            Self::Cone { radius, height } => write!(f, "radius={radius:.2} height={height:.2}"),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => write!(
                f,
                "radius={radius_top:.2}/{radius_bottom:.2} height={height:.2}"
            ),
        }
    }
}

/// A colored primitive placed in the room. Shapes are never rotated or scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub dimensions: Dimensions,
    /// 24-bit sRGB color.
    pub color: u32,
    pub position: Vec3,
    pub mesh: Mesh,
    pub bounds: BoundingSphere,
}

impl Shape {
    pub fn new(dimensions: Dimensions, color: u32, position: Vec3) -> Self {
        let mesh = dimensions.build_mesh();
        let bounds = mesh.bounding_sphere();
        Self {
            dimensions,
            color,
            position,
            mesh,
            bounds,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.dimensions.kind()
    }

    /// Bounding sphere center in world space.
    pub fn world_center(&self) -> Vec3 {
        self.position + self.bounds.center
    }
}

/// Draws shapes from a random source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFactory {
    spawn_span: f32,
}

impl ShapeFactory {
    /// `spawn_span` is the edge of the cube, centered on the origin, that positions are drawn from.
    pub fn new(spawn_span: f32) -> Self {
        Self { spawn_span }
    }

    pub fn random_shape<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        let kind = ShapeKind::ALL[rng.gen_range(0..ShapeKind::ALL.len())];
        let dimensions = match kind {
            ShapeKind::Sphere => Dimensions::Sphere {
                radius: rng.gen::<f32>() * 2.0,
            },
            ShapeKind::Box => Dimensions::Box {
                width: rng.gen::<f32>() * 2.0,
                height: rng.gen::<f32>() * 2.0,
                depth: rng.gen::<f32>() * 2.0,
            },
            ShapeKind::Cone => Dimensions::Cone {
                radius: rng.gen::<f32>(),
                height: rng.gen::<f32>() * 3.0,
            },
            ShapeKind::Cylinder => Dimensions::Cylinder {
                radius_top: rng.gen::<f32>(),
                radius_bottom: rng.gen::<f32>(),
                height: rng.gen::<f32>() * 3.0,
            },
        };
        let color = (rng.gen::<f64>() * f64::from(0xff_ff_ff_u32)) as u32;
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.spawn_span,
            (rng.gen::<f32>() - 0.5) * self.spawn_span,
            (rng.gen::<f32>() - 0.5) * self.spawn_span,
        );
        Shape::new(dimensions, color, position)
    }
}

/// Converts a 24-bit sRGB color into linear RGB channels in [0, 1].
pub fn srgb_to_linear(color: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}
