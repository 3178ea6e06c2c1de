use std::f32::consts::TAU;

pub(crate) const SHADER: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let base = object.color.rgb;
    // params.x == 0 marks unlit surfaces such as the room walls
    if (object.params.x < 0.5) {
        return vec4<f32>(base, 1.0);
    }
    let light_dir = normalize(globals.light_position.xyz - input.world_pos);
    let normal = normalize(input.normal);
    let diffuse = max(dot(normal, light_dir), 0.0) * globals.light_color.w;
    let ambient = globals.ambient.rgb * globals.ambient.w;
    let lit_color = base * (ambient + diffuse * globals.light_color.rgb);
    return vec4<f32>(lit_color, 1.0);
}
"#;

pub(crate) const CROSSHAIR_SHADER: &str = r#"
struct CrosshairUniform {
    color: vec4<f32>,
    pixel_to_ndc: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> crosshair: CrosshairUniform;

@vertex
fn vs_main(@location(0) offset: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(offset * crosshair.pixel_to_ndc.xy, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return crosshair.color;
}
"#;

/// Crosshair ring radii in logical pixels: a 20px circle with a 2px border.
pub(crate) const CROSSHAIR_INNER_RADIUS: f32 = 10.0;
pub(crate) const CROSSHAIR_OUTER_RADIUS: f32 = 12.0;
const CROSSHAIR_SEGMENTS: u32 = 48;

/// Triangle list of 2D offsets (logical pixels) forming the crosshair ring.
pub(crate) fn crosshair_ring() -> Vec<[f32; 2]> {
    let point = |radius: f32, index: u32| {
        let angle = index as f32 / CROSSHAIR_SEGMENTS as f32 * TAU;
        [radius * angle.cos(), radius * angle.sin()]
    };
    let mut vertices = Vec::with_capacity(CROSSHAIR_SEGMENTS as usize * 6);
    for index in 0..CROSSHAIR_SEGMENTS {
        let inner_a = point(CROSSHAIR_INNER_RADIUS, index);
        let inner_b = point(CROSSHAIR_INNER_RADIUS, index + 1);
        let outer_a = point(CROSSHAIR_OUTER_RADIUS, index);
        let outer_b = point(CROSSHAIR_OUTER_RADIUS, index + 1);
        vertices.extend_from_slice(&[inner_a, outer_a, outer_b, inner_a, outer_b, inner_b]);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_vertices_lie_between_the_radii() {
        let ring = crosshair_ring();
        assert_eq!(ring.len(), CROSSHAIR_SEGMENTS as usize * 6);
        for [x, y] in ring {
            let r = (x * x + y * y).sqrt();
            assert!(r > CROSSHAIR_INNER_RADIUS - 1e-3 && r < CROSSHAIR_OUTER_RADIUS + 1e-3);
        }
    }
}
