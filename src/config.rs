use glam::Vec3;
use roxmltree::{Document, Node};
use thiserror::Error;

/// Errors raised while reading or validating a room configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected a <room> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<{tag}> has an invalid value {value:?}")]
    InvalidNumber { tag: String, value: String },
    #[error("<{tag}> is missing components")]
    MissingComponents { tag: String },
    #[error("{field} {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// Tunable constants of the demo. Defaults reproduce the stock room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    /// Edge length of the cubic room, centered on the origin.
    pub room_size: f32,
    pub shape_count: usize,
    /// Shapes are placed in a cube of this edge length around the origin.
    pub spawn_span: f32,
    /// Distance travelled per frame while a movement key is held.
    pub move_speed: f32,
    pub pointer_speed: f32,
    /// 24-bit sRGB color of the room walls.
    pub room_color: u32,
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room_size: 20.0,
            shape_count: 20,
            spawn_span: 18.0,
            move_speed: 0.1,
            pointer_speed: 1.0,
            room_color: 0x80_80_80,
            seed: None,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 1.6, 10.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub ambient: f32,
    pub intensity: f32,
    pub position: Vec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            intensity: 1.0,
            position: Vec3::new(0.0, 10.0, 10.0),
        }
    }
}

impl RoomConfig {
    /// Parses an override document. Elements that are absent keep their defaults.
    pub fn from_xml(xml: &str) -> Result<Self, ConfigError> {
        let document = Document::parse(xml)?;
        let root = document.root_element();
        if !root.has_tag_name("room") {
            return Err(ConfigError::UnexpectedRoot(
                root.tag_name().name().to_string(),
            ));
        }

        let mut config = Self::default();
        config.room_size = parse_f32(&root, "size", config.room_size)?;
        config.shape_count = parse_number(&root, "shapes", config.shape_count)?;
        config.spawn_span = parse_f32(&root, "spawn_span", config.spawn_span)?;
        config.move_speed = parse_f32(&root, "move_speed", config.move_speed)?;
        config.pointer_speed = parse_f32(&root, "pointer_speed", config.pointer_speed)?;
        config.room_color = parse_color(&root, "color", config.room_color)?;
        if let Some(seed) = optional_text(&root, "seed") {
            config.seed = Some(seed.parse().map_err(|_| invalid("seed", &seed))?);
        }

        if let Some(camera) = child(&root, "camera") {
            let cam = &mut config.camera;
            cam.fov = parse_f32(&camera, "fov", cam.fov)?;
            cam.near = parse_f32(&camera, "near", cam.near)?;
            cam.far = parse_f32(&camera, "far", cam.far)?;
            cam.position = parse_vec3(&camera, "position", cam.position)?;
        }

        if let Some(lighting) = child(&root, "lighting") {
            let light = &mut config.lighting;
            light.ambient = parse_f32(&lighting, "ambient", light.ambient)?;
            light.intensity = parse_f32(&lighting, "intensity", light.intensity)?;
            light.position = parse_vec3(&lighting, "position", light.position)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.room_size.is_finite() && self.room_size > 0.0) {
            return Err(out_of_range("room size", "must be positive and finite"));
        }
        if !(self.spawn_span >= 0.0) || self.spawn_span > self.room_size {
            return Err(out_of_range(
                "spawn span",
                format!("must lie within [0, {}]", self.room_size),
            ));
        }
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(out_of_range("move speed", "must be positive and finite"));
        }
        if !(self.pointer_speed.is_finite() && self.pointer_speed > 0.0) {
            return Err(out_of_range("pointer speed", "must be positive and finite"));
        }
        if self.room_color > 0xff_ff_ff {
            return Err(out_of_range("room color", "must be a 24-bit value"));
        }
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(out_of_range("camera fov", "must lie within (0, 180)"));
        }
        if !(camera.near > 0.0) || !(camera.far > camera.near) || !camera.far.is_finite() {
            return Err(out_of_range(
                "camera clip range",
                "requires 0 < near < far, both finite",
            ));
        }
        if !camera.position.is_finite() {
            return Err(out_of_range("camera position", "must be finite"));
        }
        let lighting = &self.lighting;
        for (field, value) in [
            ("ambient intensity", lighting.ambient),
            ("light intensity", lighting.intensity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(out_of_range(field, "must be non-negative and finite"));
            }
        }
        if !lighting.position.is_finite() {
            return Err(out_of_range("light position", "must be finite"));
        }
        Ok(())
    }

    /// Half the room edge: every wall sits at this distance from the origin.
    pub fn half_extent(&self) -> f32 {
        self.room_size * 0.5
    }
}

fn out_of_range(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        reason: reason.into(),
    }
}

fn invalid(tag: &str, value: &str) -> ConfigError {
    ConfigError::InvalidNumber {
        tag: tag.to_string(),
        value: value.to_string(),
    }
}

fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_f32(node: &Node<'_, '_>, tag: &str, default: f32) -> Result<f32, ConfigError> {
    parse_number(node, tag, default)
}

fn parse_number<T: std::str::FromStr>(
    node: &Node<'_, '_>,
    tag: &str,
    default: T,
) -> Result<T, ConfigError> {
    match optional_text(node, tag) {
        Some(value) => value.parse::<T>().map_err(|_| invalid(tag, &value)),
        None => Ok(default),
    }
}

fn parse_components(node: &Node<'_, '_>, tag: &str) -> Result<Option<[f32; 3]>, ConfigError> {
    let Some(value) = optional_text(node, tag) else {
        return Ok(None);
    };
    let mut out = [0.0; 3];
    let mut numbers = value.split_whitespace();
    for slot in &mut out {
        let component = numbers.next().ok_or_else(|| ConfigError::MissingComponents {
            tag: tag.to_string(),
        })?;
        *slot = component.parse().map_err(|_| invalid(tag, &value))?;
    }
    Ok(Some(out))
}

fn parse_vec3(node: &Node<'_, '_>, tag: &str, default: Vec3) -> Result<Vec3, ConfigError> {
    Ok(parse_components(node, tag)?
        .map(Vec3::from_array)
        .unwrap_or(default))
}

/// Colors are written as three 0-255 channels, e.g. `128 128 128`.
fn parse_color(node: &Node<'_, '_>, tag: &str, default: u32) -> Result<u32, ConfigError> {
    let Some([r, g, b]) = parse_components(node, tag)? else {
        return Ok(default);
    };
    let channel = |value: f32| value.round().clamp(0.0, 255.0) as u32;
    Ok(channel(r) << 16 | channel(g) << 8 | channel(b))
}
