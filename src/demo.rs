//! Event handling and the per-frame step, independent of any window or GPU.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::camera::{Camera, PointerLockControls};
use crate::config::RoomConfig;
use crate::hud::{ClickCounter, CrosshairColor};
use crate::input::{KeyCode, Movement, MovementState};
use crate::raycast::{Intersection, Raycaster};
use crate::scene::Scene;

/// Result of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub crosshair: CrosshairColor,
    pub moved: bool,
}

/// What a key event did, so the platform layer can mirror it (e.g. release the cursor grab).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Movement,
    Unlocked,
    Ignored,
}

/// All mutable demo state: camera, controls, held keys, counter and crosshair.
#[derive(Debug, Clone)]
pub struct Demo {
    config: RoomConfig,
    scene: Scene,
    camera: Camera,
    controls: PointerLockControls,
    movement: MovementState,
    raycaster: Raycaster,
    counter: ClickCounter,
    crosshair: CrosshairColor,
    /// Last known pointer position in NDC while unlocked.
    pointer: Vec2,
}

impl Demo {
    pub fn new<R: Rng + ?Sized>(config: RoomConfig, aspect: f32, rng: &mut R) -> Self {
        let scene = Scene::generate(&config, rng);
        Self::with_scene(config, scene, aspect)
    }

    pub fn with_scene(config: RoomConfig, scene: Scene, aspect: f32) -> Self {
        let camera = Camera::new(&config.camera, aspect);
        let controls = PointerLockControls::new(config.pointer_speed);
        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera(Vec2::ZERO, &camera);
        Self {
            config,
            scene,
            camera,
            controls,
            movement: MovementState::new(),
            raycaster,
            counter: ClickCounter::new(),
            crosshair: CrosshairColor::White,
            pointer: Vec2::ZERO,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn counter(&self) -> &ClickCounter {
        &self.counter
    }

    pub fn crosshair(&self) -> CrosshairColor {
        self.crosshair
    }

    pub fn is_locked(&self) -> bool {
        self.controls.is_locked()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Mirrors the platform's pointer lock. Call with `true` only once the lock is
    /// actually granted, and with `false` when a request fails or the platform
    /// releases it. Returns true when the state changed.
    pub fn set_pointer_locked(&mut self, locked: bool) -> bool {
        if locked {
            self.controls.lock()
        } else {
            self.controls.unlock()
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> KeyOutcome {
        if self.movement.set_key(key, pressed) {
            return KeyOutcome::Movement;
        }
        if pressed && key == KeyCode::Escape && self.controls.unlock() {
            return KeyOutcome::Unlocked;
        }
        KeyOutcome::Ignored
    }

    /// Relative pointer motion in pixels; only turns the camera while locked.
    pub fn handle_pointer_motion(&mut self, delta: Vec2) -> bool {
        self.controls.look(&mut self.camera, delta)
    }

    /// Absolute pointer position in NDC, used by mousedown while unlocked.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = ndc;
    }

    /// While locked the cursor is hidden and pinned to the screen center.
    pub fn pointer(&self) -> Vec2 {
        if self.controls.is_locked() {
            Vec2::ZERO
        } else {
            self.pointer
        }
    }

    /// Casts from the pointer and counts the click if anything was hit.
    pub fn handle_mouse_down(&mut self) -> bool {
        let hits = self.pick(self.pointer());
        if hits.is_empty() {
            return false;
        }
        let total = self.counter.increment();
        debug!(
            "mousedown hit {} shape(s), nearest #{} at {:.2}; total {total}",
            hits.len(),
            hits[0].shape,
            hits[0].distance
        );
        true
    }

    /// Shapes under an NDC point, nearest first.
    pub fn pick(&mut self, ndc: Vec2) -> Vec<Intersection> {
        self.raycaster.set_from_camera(ndc, &self.camera);
        self.raycaster.intersect_shapes(&self.scene.shapes)
    }

    /// Applies held movement, then refreshes the crosshair from the center ray.
    pub fn advance_frame(&mut self) -> FrameReport {
        let step = self.config.move_speed;
        let mut moved = false;
        for movement in self.movement.active() {
            match movement {
                Movement::Forward => self.controls.move_forward(&mut self.camera, step),
                Movement::Backward => self.controls.move_forward(&mut self.camera, -step),
                Movement::Left => self.controls.move_right(&mut self.camera, -step),
                Movement::Right => self.controls.move_right(&mut self.camera, step),
            }
            moved = true;
        }

        self.raycaster.set_from_camera(Vec2::ZERO, &self.camera);
        let crosshair = CrosshairColor::from_hit(self.raycaster.hits_any(&self.scene.shapes));
        if crosshair != self.crosshair {
            debug!("crosshair turned {}", crosshair.css());
        }
        self.crosshair = crosshair;

        FrameReport { crosshair, moved }
    }

    /// One line per shape, used by the headless summary.
    pub fn describe_shapes(&self) -> Vec<String> {
        self.scene
            .shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| {
                format!(
                    " - #{:02} {} {} pos=({:.2}, {:.2}, {:.2}) color=#{:06x}",
                    index + 1,
                    shape.kind(),
                    shape.dimensions,
                    shape.position.x,
                    shape.position.y,
                    shape.position.z,
                    shape.color
                )
            })
            .collect()
    }

    pub fn log_summary(&self) {
        info!(
            "Room {} with {} shapes, camera at {:?} facing {:?}",
            self.scene.room.size,
            self.scene.shapes.len(),
            self.camera.position,
            self.camera.direction()
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::shape::{Dimensions, Shape};

    const W: KeyCode = KeyCode::Character('W');

    fn demo_with(shapes: Vec<Shape>) -> Demo {
        let config = RoomConfig::default();
        let scene = Scene::from_shapes(&config, shapes);
        Demo::with_scene(config, scene, 16.0 / 9.0)
    }

    fn sphere_at(position: Vec3) -> Shape {
        Shape::new(Dimensions::Sphere { radius: 1.0 }, 0x3366cc, position)
    }

    #[test]
    fn generated_demo_has_twenty_shapes_inside_the_room() {
        let demo = Demo::new(RoomConfig::default(), 1.0, &mut StdRng::seed_from_u64(2024));
        assert_eq!(demo.scene().shapes.len(), 20);
        let bound = RoomConfig::default().half_extent();
        for shape in &demo.scene().shapes {
            assert!(shape.position.abs().max_element() <= bound);
        }
        assert_eq!(demo.describe_shapes().len(), 20);
    }

    #[test]
    fn key_w_then_one_frame_moves_forward_by_one_step() {
        let mut demo = demo_with(Vec::new());
        let start = demo.camera().position;
        assert_eq!(demo.handle_key(W, true), KeyOutcome::Movement);
        let report = demo.advance_frame();
        assert!(report.moved);
        let travelled = demo.camera().position - start;
        assert!((travelled - Vec3::new(0.0, 0.0, -0.1)).length() < 1e-6);

        demo.handle_key(W, false);
        assert!(!demo.advance_frame().moved);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut demo = demo_with(Vec::new());
        let start = demo.camera().position;
        demo.handle_key(KeyCode::Character('A'), true);
        demo.handle_key(KeyCode::Character('D'), true);
        demo.advance_frame();
        assert!((demo.camera().position - start).length() < 1e-6);
    }

    #[test]
    fn crosshair_is_red_only_over_a_shape() {
        let mut demo = demo_with(vec![sphere_at(Vec3::new(0.05, 1.7, 0.0))]);
        assert_eq!(demo.advance_frame().crosshair, CrosshairColor::Red);

        demo.set_pointer_locked(true);
        demo.handle_pointer_motion(Vec2::new(400.0, 0.0));
        assert_eq!(demo.advance_frame().crosshair, CrosshairColor::White);
        assert_eq!(demo.crosshair(), CrosshairColor::White);
    }

    #[test]
    fn mousedown_on_projected_center_counts_once() {
        let target = Vec3::new(3.0, 0.5, 0.0);
        let mut demo = demo_with(vec![sphere_at(target)]);
        assert_eq!(demo.counter().value(), 0);

        let ndc = demo.camera().project(target).truncate();
        demo.set_pointer(ndc);
        assert!(demo.handle_mouse_down());
        assert_eq!(demo.counter().value(), 1);
    }

    #[test]
    fn mousedown_on_empty_space_does_not_count() {
        let mut demo = demo_with(vec![sphere_at(Vec3::new(3.0, 0.5, 0.0))]);
        demo.set_pointer(Vec2::new(-0.9, -0.9));
        assert!(!demo.handle_mouse_down());
        assert_eq!(demo.counter().value(), 0);
    }

    #[test]
    fn overlapping_shapes_count_once_per_mousedown() {
        let mut demo = demo_with(vec![
            sphere_at(Vec3::new(0.05, 1.7, 0.0)),
            sphere_at(Vec3::new(0.05, 1.7, -4.0)),
        ]);
        demo.set_pointer_locked(true);
        assert_eq!(demo.pick(Vec2::ZERO).len(), 2);
        assert!(demo.handle_mouse_down());
        assert!(demo.handle_mouse_down());
        assert_eq!(demo.counter().value(), 2);
    }

    #[test]
    fn locked_pointer_casts_from_the_center() {
        let mut demo = demo_with(vec![sphere_at(Vec3::new(0.05, 1.7, 0.0))]);
        demo.set_pointer(Vec2::new(0.9, 0.9));
        assert!(!demo.handle_mouse_down());
        demo.set_pointer_locked(true);
        assert_eq!(demo.pointer(), Vec2::ZERO);
        assert!(demo.handle_mouse_down());
    }

    #[test]
    fn escape_releases_the_lock() {
        let mut demo = demo_with(Vec::new());
        let escape = KeyCode::Escape;
        assert_eq!(demo.handle_key(escape, true), KeyOutcome::Ignored);
        assert!(demo.set_pointer_locked(true));
        assert_eq!(demo.handle_key(escape, true), KeyOutcome::Unlocked);
        assert!(!demo.is_locked());
    }

    #[test]
    fn look_is_ignored_until_locked() {
        let mut demo = demo_with(Vec::new());
        assert!(!demo.handle_pointer_motion(Vec2::new(50.0, 10.0)));
        assert_eq!(demo.camera().yaw(), 0.0);
        demo.set_pointer_locked(true);
        assert!(demo.handle_pointer_motion(Vec2::new(50.0, 10.0)));
        assert!(demo.camera().yaw() < 0.0);
    }

    #[test]
    fn denied_lock_leaves_the_pointer_free() {
        let mut demo = demo_with(vec![sphere_at(Vec3::new(0.05, 1.7, 0.0))]);
        assert!(!demo.set_pointer_locked(false));
        assert!(!demo.is_locked());
        assert!(!demo.handle_pointer_motion(Vec2::new(100.0, 0.0)));
        assert_eq!(demo.camera().yaw(), 0.0);

        demo.set_pointer(Vec2::new(0.9, 0.9));
        assert_eq!(demo.pointer(), Vec2::new(0.9, 0.9));
        assert!(!demo.handle_mouse_down());

        // a later grant is still adopted
        assert!(demo.set_pointer_locked(true));
        assert!(demo.handle_mouse_down());
    }

    #[test]
    fn platform_release_unlocks_once() {
        let mut demo = demo_with(Vec::new());
        demo.set_pointer_locked(true);
        assert!(demo.set_pointer_locked(false));
        assert!(!demo.set_pointer_locked(false));
        assert!(!demo.handle_pointer_motion(Vec2::new(10.0, 0.0)));
    }
}
