//! Global uniform bindings for camera and scene lights
//!
//! Manages the uniform buffer and bind group for per-frame state shared by
//! every draw: the camera and the full light rig. Bound to slot 0 in all
//! render pipelines.

use cgmath::{Point3, Vector3};

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::lights::{Attenuation, LightRig, PointLight, POINT_LIGHT_COUNT, SHININESS},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

fn vec4(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

fn point4(p: Point3<f32>) -> [f32; 4] {
    [p.x, p.y, p.z, 1.0]
}

fn attenuation4(a: Attenuation) -> [f32; 4] {
    [a.constant, a.linear, a.quadratic, 0.0]
}

// Every field is a vec4 so the layout matches WGSL without manual padding.

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    direction: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    /// constant, linear, quadratic, unused
    attenuation: [f32; 4],
}

impl From<&PointLight> for PointLightRaw {
    fn from(light: &PointLight) -> Self {
        Self {
            position: point4(light.position),
            ambient: vec4(light.ambient, 0.0),
            diffuse: vec4(light.diffuse, 0.0),
            specular: vec4(light.specular, 0.0),
            attenuation: attenuation4(light.attenuation),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw {
    position: [f32; 4],
    direction: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    attenuation: [f32; 4],
    /// inner cos, outer cos, unused, unused
    cutoff: [f32; 4],
}

/// Global uniform buffer content.
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    dir_light: DirectionalLightRaw,
    point_lights: [PointLightRaw; POINT_LIGHT_COUNT],
    spot_light: SpotLightRaw,
    /// shininess, unused, unused, unused
    material: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, lights: &LightRig) -> Self {
        let sun = &lights.directional;
        let spot = &lights.spot;

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            dir_light: DirectionalLightRaw {
                direction: vec4(sun.direction, 0.0),
                ambient: vec4(sun.ambient, 0.0),
                diffuse: vec4(sun.diffuse, 0.0),
                specular: vec4(sun.specular, 0.0),
            },
            point_lights: lights.points.each_ref().map(PointLightRaw::from),
            spot_light: SpotLightRaw {
                position: point4(spot.position),
                direction: vec4(spot.direction, 0.0),
                ambient: vec4(spot.ambient, 0.0),
                diffuse: vec4(spot.diffuse, 0.0),
                specular: vec4(spot.specular, 0.0),
                attenuation: attenuation4(spot.attenuation),
                cutoff: [spot.inner_cutoff, spot.outer_cutoff, 0.0, 0.0],
            },
            material: [SHININESS, 0.0, 0.0, 0.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Uploads this frame's camera and lights.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    lights: &LightRig,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, SquareMatrix};

    #[test]
    fn test_layout_is_vec4_aligned() {
        // camera 80 + sun 64 + 4 lamps * 80 + spot 112 + material 16
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 592);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
    }

    #[test]
    fn test_content_carries_light_rig() {
        let rig = LightRig::at(0.0, Point3::new(0.0, 0.7, 0.0), Matrix4::identity());
        let content = GlobalUBOContent::new(&CameraUniform::default(), &rig);

        assert_eq!(content.material[0], SHININESS);
        assert_eq!(content.point_lights[2].attenuation, [1.0, 0.7, 1.8, 0.0]);
        assert_eq!(content.point_lights[0].position[3], 1.0);
        assert_eq!(content.dir_light.direction, [1.0, -1.0, 1.0, 0.0]);
        assert!(content.spot_light.cutoff[0] > content.spot_light.cutoff[1]);
    }
}
