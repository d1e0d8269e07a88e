//! Flattening the scene into per-mesh instance batches.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};
use std::ops::Range;

use crate::mesh::{MeshKey, MeshVertex};
use crate::scene::{Material, Scene, Shading};

/// Per-instance data for the mesh pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model's upper 3×3, for normals.
    pub normal: [[f32; 3]; 3],
    /// rgb: linear colour, a: roughness.
    pub color: [f32; 4],
    /// x: 1.0 when unlit.
    pub params: [f32; 4],
}

impl MeshInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x3,
        7 => Float32x3,
        8 => Float32x3,
        9 => Float32x4,
        10 => Float32x4
    ];

    pub fn new(model: Mat4, material: &Material) -> Self {
        let linear = Mat3::from_mat4(model);
        let normal = if linear.determinant().abs() > f32::EPSILON {
            linear.inverse().transpose()
        } else {
            Mat3::IDENTITY
        };
        let unlit = match material.shading {
            Shading::Lit => 0.0,
            Shading::Unlit => 1.0,
        };

        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            color: material.color.extend(material.roughness).to_array(),
            params: [unlit, 0.0, 0.0, 0.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// A run of instances sharing one mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub mesh: MeshKey,
    pub instances: Range<u32>,
}

/// Instances for every part of `scene` at its current pose, grouped by mesh.
///
/// Batches come out in [`MeshKey`] order and their ranges tile the returned
/// instance list.
pub fn collect_instances(scene: &Scene) -> (Vec<MeshInstance>, Vec<Batch>) {
    let world = scene.graph().world_matrices();

    let mut order: Vec<usize> = (0..scene.parts().len()).collect();
    order.sort_by_key(|&i| scene.parts()[i].mesh);

    let mut instances = Vec::with_capacity(order.len());
    let mut batches: Vec<Batch> = Vec::new();
    for i in order {
        let part = &scene.parts()[i];
        let model = world[part.node.index()] * part.local.matrix();
        let index = instances.len() as u32;
        instances.push(MeshInstance::new(model, &part.material));

        match batches.last_mut() {
            Some(batch) if batch.mesh == part.mesh => batch.instances.end = index + 1,
            _ => batches.push(Batch {
                mesh: part.mesh,
                instances: index..index + 1,
            }),
        }
    }

    (instances, batches)
}
