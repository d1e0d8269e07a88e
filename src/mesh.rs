//! Indexed triangle meshes and primitive generators.
//!
//! All generators produce CPU-side [`MeshData`] with one position and one
//! normal per vertex. Spheres and cylinders are built at unit size and scaled
//! per instance, so a single GPU mesh serves every body part that shares a
//! tessellation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// GPU vertex layout shared by every mesh in the scene.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Identifies a reusable mesh.
///
/// Primitive keys describe unit-sized geometry; the terrain is unique per
/// scene and is supplied by the scene itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKey {
    /// The displaced ground grid.
    Terrain,
    /// Unit-radius UV sphere.
    Sphere { width_segments: u32, height_segments: u32 },
    /// Unit-radius, unit-height capped cylinder centred on the origin.
    Cylinder { radial_segments: u32 },
}

impl MeshKey {
    /// Build the geometry for a primitive key. Returns `None` for
    /// [`MeshKey::Terrain`], which is not a primitive.
    pub fn build_primitive(&self) -> Option<MeshData> {
        match *self {
            MeshKey::Terrain => None,
            MeshKey::Sphere {
                width_segments,
                height_segments,
            } => Some(MeshData::sphere(1.0, width_segments, height_segments)),
            MeshKey::Cylinder { radial_segments } => {
                Some(MeshData::cylinder(1.0, 1.0, 1.0, radial_segments))
            }
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// UV sphere with poles on the Y axis.
    ///
    /// Segment counts are clamped to the smallest closed shape (3 around,
    /// 2 top to bottom).
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row_len = width_segments + 1;

        let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let theta = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * TAU;
                let dir = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
                vertices.push(MeshVertex::new(dir * radius, dir));
            }
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;

                // The pole rows collapse one triangle of each quad.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Capped cylinder along the Y axis, centred on the origin.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let half_height = height * 0.5;
        let slope = if height > 0.0 {
            (radius_bottom - radius_top) / height
        } else {
            0.0
        };

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Side wall: top ring then bottom ring.
        for (radius, y) in [(radius_top, half_height), (radius_bottom, -half_height)] {
            for ix in 0..=radial_segments {
                let theta = ix as f32 / radial_segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize();
                vertices.push(MeshVertex::new(Vec3::new(radius * sin, y, radius * cos), normal));
            }
        }
        let ring = radial_segments + 1;
        for ix in 0..radial_segments {
            let a = ix;
            let b = ring + ix;
            let c = ring + ix + 1;
            let d = ix + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        push_cap(&mut vertices, &mut indices, radius_top, half_height, radial_segments, true);
        push_cap(&mut vertices, &mut indices, radius_bottom, -half_height, radial_segments, false);

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn push_cap(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    radial_segments: u32,
    top: bool,
) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = vertices.len() as u32;
    vertices.push(MeshVertex::new(Vec3::new(0.0, y, 0.0), normal));

    let start = vertices.len() as u32;
    for ix in 0..=radial_segments {
        let theta = ix as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        vertices.push(MeshVertex::new(Vec3::new(radius * sin, y, radius * cos), normal));
    }

    for ix in 0..radial_segments {
        let i = start + ix;
        if top {
            indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}

/// Recompute per-vertex normals for an indexed triangle list.
///
/// Each vertex normal is the normalised sum of the (area-weighted) normals of
/// every face that references it. Vertices with no faces, or whose faces
/// cancel out, get `fallback`.
pub fn compute_vertex_normals(
    positions: &[Vec3],
    indices: &[u32],
    normals: &mut [Vec3],
    fallback: Vec3,
) {
    debug_assert_eq!(positions.len(), normals.len());

    normals.iter_mut().for_each(|n| *n = Vec3::ZERO);

    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (a, b, c) = (positions[ia], positions[ib], positions[ic]);
        let face = (c - b).cross(a - b);
        normals[ia] += face;
        normals[ib] += face;
        normals[ic] += face;
    }

    for n in normals.iter_mut() {
        *n = n.try_normalize().unwrap_or(fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = MeshData::sphere(2.0, 8, 6);
        assert_eq!(mesh.vertex_count(), 9 * 7);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 2.0).abs() < 1e-4);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_triangle_count() {
        // Each band has 2 triangles per quad except the two pole bands.
        let mesh = MeshData::sphere(1.0, 8, 6);
        assert_eq!(mesh.triangle_count(), 8 * (6 * 2 - 2));
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_cylinder_bounds() {
        let mesh = MeshData::cylinder(0.5, 0.5, 2.0, 12);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.y.abs() <= 1.0 + 1e-5);
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= 0.5 + 1e-5);
        }
        // 12 quads on the wall, 12 triangles per cap
        assert_eq!(mesh.triangle_count(), 12 * 2 + 12 * 2);
    }

    #[test]
    fn test_cylinder_cap_normals() {
        let mesh = MeshData::cylinder(1.0, 1.0, 1.0, 8);
        let up = mesh
            .vertices
            .iter()
            .filter(|v| v.normal == [0.0, 1.0, 0.0])
            .count();
        let down = mesh
            .vertices
            .iter()
            .filter(|v| v.normal == [0.0, -1.0, 0.0])
            .count();
        assert_eq!(up, 10);
        assert_eq!(down, 10);
    }

    #[test]
    fn test_compute_normals_single_triangle() {
        // Counter-clockwise seen from +Z
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let mut normals = [Vec3::ZERO; 3];
        // Winding matches (a, b, d) ordering in the grid: a=Y, b=ZERO, d=X
        compute_vertex_normals(&positions, &[2, 0, 1], &mut normals, Vec3::Z);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_compute_normals_unreferenced_vertex_uses_fallback() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(5.0, 5.0, 5.0)];
        let mut normals = [Vec3::ZERO; 4];
        compute_vertex_normals(&positions, &[2, 0, 1], &mut normals, Vec3::Y);
        assert_eq!(normals[3], Vec3::Y);
    }

    #[test]
    fn test_primitive_keys() {
        assert!(MeshKey::Terrain.build_primitive().is_none());
        let sphere = MeshKey::Sphere {
            width_segments: 6,
            height_segments: 6,
        }
        .build_primitive()
        .unwrap();
        assert!(sphere.vertex_count() > 0);
    }
}
