use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::scene::Lighting;

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

impl CameraParams {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj(),
            position: camera.position,
        }
    }
}

/// Lighting state consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct LightParams {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
}

impl LightParams {
    pub fn from_lighting(lighting: &Lighting) -> Self {
        Self {
            position: lighting.point.position,
            color: lighting.point.color,
            intensity: lighting.point.intensity,
            ambient_color: lighting.ambient.color,
            ambient_intensity: lighting.ambient.intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use crate::scene::Scene;

    #[test]
    fn light_params_follow_the_scene() {
        let scene = Scene::from_shapes(&RoomConfig::default(), Vec::new());
        let light = LightParams::from_lighting(&scene.lights);
        assert_eq!(light.position, Vec3::new(0.0, 10.0, 10.0));
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.ambient_intensity, 0.5);
    }

    #[test]
    fn camera_params_put_the_view_center_at_ndc_origin() {
        let camera = Camera::new(&RoomConfig::default().camera, 1.5);
        let params = CameraParams::from_camera(&camera);
        let ndc = params
            .view_proj
            .project_point3(camera.position + camera.direction() * 5.0);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
