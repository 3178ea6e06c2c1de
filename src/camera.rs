use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use log::debug;

use crate::config::CameraConfig;

/// Perspective camera oriented by yaw (around +Y) then pitch (around local +X).
///
/// With zero yaw and pitch the camera looks down -Z with +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            yaw: 0.0,
            pitch: 0.0,
            fov: config.fov,
            aspect: aspect.max(0.01),
            near: config.near,
            far: config.far,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(0.01);
    }

    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Unit vector the camera is looking along.
    pub fn direction(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Camera local +X in world space. Always horizontal since there is no roll.
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.position).inverse()
    }

    /// Projection with a [0, 1] depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Maps a world position to normalized device coordinates.
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_proj().project_point3(point)
    }

    /// World space direction of the ray leaving the eye through `ndc`.
    pub fn ray_direction(&self, ndc: Vec2) -> Vec3 {
        let tan = (self.fov.to_radians() * 0.5).tan();
        let local = Vec3::new(ndc.x * tan * self.aspect, ndc.y * tan, -1.0);
        (self.rotation() * local).normalize()
    }
}

/// First-person mouse look and walking on top of a [`Camera`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointerLockControls {
    locked: bool,
    pointer_speed: f32,
}

impl PointerLockControls {
    /// Radians of rotation per pixel of pointer motion at unit pointer speed.
    pub const LOOK_SCALE: f32 = 0.002;

    pub fn new(pointer_speed: f32) -> Self {
        Self {
            locked: false,
            pointer_speed,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true when the state changed.
    pub fn lock(&mut self) -> bool {
        let changed = !self.locked;
        self.locked = true;
        if changed {
            debug!("pointer locked");
        }
        changed
    }

    /// Returns true when the state changed.
    pub fn unlock(&mut self) -> bool {
        let changed = self.locked;
        self.locked = false;
        if changed {
            debug!("pointer unlocked");
        }
        changed
    }

    /// Applies pointer motion in pixels. Ignored unless locked.
    pub fn look(&self, camera: &mut Camera, delta: Vec2) -> bool {
        if !self.locked {
            return false;
        }
        let scale = Self::LOOK_SCALE * self.pointer_speed;
        let yaw = camera.yaw() - delta.x * scale;
        let pitch = (camera.pitch() - delta.y * scale).clamp(-FRAC_PI_2, FRAC_PI_2);
        camera.set_orientation(yaw, pitch);
        true
    }

    /// Moves parallel to the ground along the horizontal view direction.
    pub fn move_forward(&self, camera: &mut Camera, distance: f32) {
        let forward = Vec3::Y.cross(camera.right());
        camera.position += forward * distance;
    }

    pub fn move_right(&self, camera: &mut Camera, distance: f32) {
        camera.position += camera.right() * distance;
    }
}
