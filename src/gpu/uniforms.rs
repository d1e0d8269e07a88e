//! Per-frame uniform block shared by the mesh and point shaders.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use super::camera::OrbitCamera;
use crate::config::{LightingConfig, ParticleConfig};
use crate::scene::material::srgb_hex_to_linear;

/// Layout matches `struct Uniforms` in both WGSL shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// xyz: unit direction towards the light, w: intensity.
    pub light_dir: [f32; 4],
    /// x: ambient intensity.
    pub ambient: [f32; 4],
    /// rgb: linear particle colour, a: opacity.
    pub particle_color: [f32; 4],
    /// x: particle sprite size.
    pub particle_params: [f32; 4],
}

impl FrameUniforms {
    pub fn new(camera: &OrbitCamera, aspect: f32, lighting: &LightingConfig, particles: &ParticleConfig) -> Self {
        let view = camera.view_matrix();
        let proj = camera.projection(aspect);
        let light = Vec3::from(lighting.directional_position).try_normalize().unwrap_or(Vec3::Y);

        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            eye: camera.position().extend(1.0).to_array(),
            light_dir: light.extend(lighting.directional_intensity).to_array(),
            ambient: [lighting.ambient_intensity, 0.0, 0.0, 0.0],
            particle_color: srgb_hex_to_linear(particles.color)
                .extend(particles.opacity)
                .to_array(),
            particle_params: Vec4::new(particles.size, 0.0, 0.0, 0.0).to_array(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}
