//! A first-person room full of random shapes.
//!
//! The crate generates a closed room populated with spheres, boxes, cones and
//! cylinders, lets the viewer walk around with pointer-lock mouse look and WASD,
//! and counts mousedowns that land on a shape using CPU ray casting. Everything
//! except [`render`], [`app`] and the browser entry point is plain data and
//! logic, so it can be driven and tested without a window or GPU.

pub mod app;
pub mod camera;
pub mod config;
pub mod demo;
pub mod hud;
pub mod input;
pub mod mesh;
pub mod page;
pub mod raycast;
pub mod render;
pub mod scene;
pub mod shape;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::App;
pub use camera::{Camera, PointerLockControls};
pub use config::{CameraConfig, ConfigError, LightingConfig, RoomConfig};
pub use demo::{Demo, FrameReport, KeyOutcome};
#[cfg(not(target_arch = "wasm32"))]
pub use hud::TitleHud;
pub use hud::{ClickCounter, CrosshairColor, HudPresenter, HudSink};
pub use input::{KeyCode, MouseButton, Movement, MovementState};
pub use mesh::{BoundingSphere, Mesh};
pub use raycast::{Intersection, Ray, Raycaster};
pub use render::{CameraParams, LightParams, Renderer};
pub use scene::{seeded_rng, Light, Lighting, Room, Scene};
pub use shape::{Dimensions, Shape, ShapeFactory, ShapeKind};
