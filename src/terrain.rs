//! Procedural ground: a flat grid displaced by a wave, noise and craters.
//!
//! The height at a grid point `(x, y)` is
//!
//! ```text
//! 0.5 * sin(2x) * cos(2y)  +  noise  -  Σ depth * (1 - dist / radius)²
//! ```
//!
//! where the sum runs over every crater whose radius contains the point and
//! `noise` is uniform in `[-0.15, 0.15)`. The deterministic parts
//! ([`base_wave`], [`crater_offset`]) are exposed separately from the noise so
//! they can be evaluated without a random source.
//!
//! # Example
//!
//! ```
//! use lunar_mochi::terrain::{Crater, VertexGrid};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let craters = [Crater::new(0.0, 0.0, 2.0, 1.0)];
//! let mut grid = VertexGrid::plane(10.0, 10.0, 10, 10);
//! grid.displace(&craters, &mut StdRng::seed_from_u64(7));
//! assert_eq!(grid.vertex_count(), 121);
//! ```

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::mesh::{compute_vertex_normals, MeshData, MeshVertex};

/// Peak height of the base wave.
pub const WAVE_AMPLITUDE: f32 = 0.5;
/// Angular frequency of the base wave along both axes.
pub const WAVE_FREQUENCY: f32 = 2.0;
/// Half-width of the uniform height noise.
pub const NOISE_AMPLITUDE: f32 = 0.15;

/// A circular depression carved into the ground.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crater {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub depth: f32,
}

impl Crater {
    pub const fn new(center_x: f32, center_y: f32, radius: f32, depth: f32) -> Self {
        Self {
            center_x,
            center_y,
            radius,
            depth,
        }
    }

    /// Height change this crater applies at `(x, y)`. Always `<= 0`, and
    /// exactly zero on or outside the rim.
    pub fn contribution(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < self.radius {
            let factor = 1.0 - dist / self.radius;
            -self.depth * factor * factor
        } else {
            0.0
        }
    }
}

/// The three craters of the default lunar ground.
pub fn default_craters() -> Vec<Crater> {
    vec![
        Crater::new(5.0, 5.0, 2.0, 1.0),
        Crater::new(-3.0, 2.0, 1.5, 0.7),
        Crater::new(0.0, -4.0, 2.5, 1.2),
    ]
}

/// Smooth rolling base of the terrain, without noise.
#[inline]
pub fn base_wave(x: f32, y: f32) -> f32 {
    WAVE_AMPLITUDE * (x * WAVE_FREQUENCY).sin() * (y * WAVE_FREQUENCY).cos()
}

/// Summed contribution of every crater at `(x, y)`.
pub fn crater_offset(x: f32, y: f32, craters: &[Crater]) -> f32 {
    craters.iter().map(|c| c.contribution(x, y)).sum()
}

/// Draw one noise sample in `[-NOISE_AMPLITUDE, NOISE_AMPLITUDE)`.
#[inline]
pub fn sample_noise<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE)
}

/// Full terrain height at `(x, y)`: wave, one noise sample, craters.
pub fn compute_height<R: Rng + ?Sized>(x: f32, y: f32, craters: &[Crater], rng: &mut R) -> f32 {
    base_wave(x, y) + sample_noise(rng) + crater_offset(x, y, craters)
}

/// A regular planar grid in the XY plane with heights along Z.
///
/// Vertices are stored row-major. The first row sits at `y = +height / 2`
/// and every row runs from `x = -width / 2` to `x = +width / 2`. Only the z
/// component of a position is ever modified after construction.
#[derive(Clone, Debug)]
pub struct VertexGrid {
    columns: u32,
    rows: u32,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl VertexGrid {
    /// Create a flat `width × height` plane split into
    /// `segments_x × segments_y` quads.
    pub fn plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let segments_x = segments_x.max(1);
        let segments_y = segments_y.max(1);
        let columns = segments_x + 1;
        let rows = segments_y + 1;
        let cell_w = width / segments_x as f32;
        let cell_h = height / segments_y as f32;

        let mut positions = Vec::with_capacity((columns * rows) as usize);
        for iy in 0..rows {
            let y = height * 0.5 - iy as f32 * cell_h;
            for ix in 0..columns {
                let x = ix as f32 * cell_w - width * 0.5;
                positions.push(Vec3::new(x, y, 0.0));
            }
        }

        let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
        for iy in 0..segments_y {
            for ix in 0..segments_x {
                let a = ix + columns * iy;
                let b = ix + columns * (iy + 1);
                let c = (ix + 1) + columns * (iy + 1);
                let d = (ix + 1) + columns * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let normals = vec![Vec3::Z; positions.len()];

        Self {
            columns,
            rows,
            positions,
            normals,
            indices,
        }
    }

    /// Vertices per row.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Row-major index of the vertex at column `ix`, row `iy`.
    #[inline]
    pub fn index(&self, ix: u32, iy: u32) -> usize {
        (iy * self.columns + ix) as usize
    }

    /// Overwrite every vertex's z with `height(x, y)`, then recompute normals.
    pub fn apply_heights<F>(&mut self, mut height: F)
    where
        F: FnMut(f32, f32) -> f32,
    {
        for p in &mut self.positions {
            p.z = height(p.x, p.y);
        }
        self.compute_vertex_normals();
    }

    /// Displace the grid with the full terrain height function.
    pub fn displace<R: Rng + ?Sized>(&mut self, craters: &[Crater], rng: &mut R) {
        self.apply_heights(|x, y| compute_height(x, y, craters, rng));
    }

    /// Rebuild normals from the current positions.
    pub fn compute_vertex_normals(&mut self) {
        compute_vertex_normals(&self.positions, &self.indices, &mut self.normals, Vec3::Z);
    }

    /// Lowest and highest z over the grid.
    pub fn height_range(&self) -> (f32, f32) {
        self.positions
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            })
    }

    /// Copy into an uploadable mesh.
    pub fn to_mesh(&self) -> MeshData {
        MeshData {
            vertices: self
                .positions
                .iter()
                .zip(&self.normals)
                .map(|(&p, &n)| MeshVertex::new(p, n))
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_crater_zero_outside_radius() {
        let crater = Crater::new(1.0, -1.0, 2.0, 3.0);
        assert_eq!(crater.contribution(10.0, 10.0), 0.0);
        assert_eq!(crater.contribution(3.5, -1.0), 0.0);
    }

    #[test]
    fn test_crater_full_depth_at_center() {
        let crater = Crater::new(-3.0, 2.0, 1.5, 0.7);
        assert_eq!(crater.contribution(-3.0, 2.0), -0.7);
    }

    #[test]
    fn test_crater_zero_on_rim() {
        let crater = Crater::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(crater.contribution(2.0, 0.0), 0.0);
        assert_eq!(crater.contribution(0.0, -2.0), 0.0);
    }

    #[test]
    fn test_crater_halfway() {
        let crater = Crater::new(0.0, 0.0, 2.0, 1.0);
        assert!((crater.contribution(1.0, 0.0) - -0.25).abs() < EPS);
    }

    #[test]
    fn test_overlapping_craters_sum() {
        let craters = [Crater::new(0.0, 0.0, 2.0, 1.0), Crater::new(0.0, 0.0, 4.0, 2.0)];
        let expected = -0.25 + -2.0 * 0.75 * 0.75;
        assert!((crater_offset(1.0, 0.0, &craters) - expected).abs() < EPS);

        let reversed = [craters[1], craters[0]];
        assert!((crater_offset(1.0, 0.0, &reversed) - expected).abs() < EPS);
    }

    #[test]
    fn test_base_wave_values() {
        assert_eq!(base_wave(0.0, 0.0), 0.0);
        let x = std::f32::consts::FRAC_PI_4;
        assert!((base_wave(x, 0.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_noise_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let n = sample_noise(&mut rng);
            assert!((-NOISE_AMPLITUDE..NOISE_AMPLITUDE).contains(&n));
        }
    }

    #[test]
    fn test_height_outside_craters_is_wave_plus_noise() {
        let craters = default_craters();
        let mut rng = StdRng::seed_from_u64(3);
        for &(x, y) in &[(15.0, 15.0), (-15.0, -12.0), (10.0, -18.0)] {
            let h = compute_height(x, y, &craters, &mut rng);
            assert!((h - base_wave(x, y)).abs() <= NOISE_AMPLITUDE);
        }
    }

    #[test]
    fn test_plane_layout() {
        let grid = VertexGrid::plane(40.0, 40.0, 40, 40);
        assert_eq!(grid.columns(), 41);
        assert_eq!(grid.rows(), 41);
        assert_eq!(grid.vertex_count(), 41 * 41);
        assert_eq!(grid.indices().len(), 40 * 40 * 6);

        assert_eq!(grid.positions()[0], Vec3::new(-20.0, 20.0, 0.0));
        assert_eq!(grid.positions()[40], Vec3::new(20.0, 20.0, 0.0));
        let last = grid.positions()[grid.index(40, 40)];
        assert_eq!(last, Vec3::new(20.0, -20.0, 0.0));
    }

    #[test]
    fn test_flat_grid_normals_face_up() {
        let mut grid = VertexGrid::plane(4.0, 4.0, 4, 4);
        grid.compute_vertex_normals();
        for n in grid.normals() {
            assert!((*n - Vec3::Z).length() < EPS);
        }
    }

    #[test]
    fn test_displace_only_writes_z() {
        let flat = VertexGrid::plane(8.0, 6.0, 8, 6);
        let mut grid = flat.clone();
        grid.displace(&default_craters(), &mut StdRng::seed_from_u64(11));

        for (a, b) in flat.positions().iter().zip(grid.positions()) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_deterministic_part_matches_wave_and_craters() {
        let craters = default_craters();
        let mut grid = VertexGrid::plane(40.0, 40.0, 40, 40);
        grid.apply_heights(|x, y| base_wave(x, y) + crater_offset(x, y, &craters));

        let center = grid.positions()[grid.index(20, 24)];
        assert_eq!(center.x, 0.0);
        assert_eq!(center.y, -4.0);
        let expected = base_wave(0.0, -4.0) - 1.2;
        assert!((center.z - expected).abs() < 1e-5);
    }

    #[test]
    fn test_seeded_displacement_is_reproducible() {
        let craters = default_craters();
        let mut a = VertexGrid::plane(20.0, 20.0, 16, 16);
        let mut b = a.clone();
        a.displace(&craters, &mut StdRng::seed_from_u64(99));
        b.displace(&craters, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.normals(), b.normals());
    }

    #[test]
    fn test_recompute_normals_is_idempotent() {
        let mut grid = VertexGrid::plane(20.0, 20.0, 20, 20);
        grid.displace(&default_craters(), &mut StdRng::seed_from_u64(5));
        let first = grid.normals().to_vec();
        grid.compute_vertex_normals();
        assert_eq!(first, grid.normals());
    }

    #[test]
    fn test_crater_floor_is_lowest_region() {
        let craters = [Crater::new(0.0, 0.0, 3.0, 2.0)];
        let mut grid = VertexGrid::plane(10.0, 10.0, 10, 10);
        grid.apply_heights(|x, y| crater_offset(x, y, &craters));
        let (lo, hi) = grid.height_range();
        assert_eq!(lo, -2.0);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn test_slope_normals_tilt_away_from_rise() {
        let mut grid = VertexGrid::plane(4.0, 4.0, 4, 4);
        // Height increases with x, so normals lean towards -x.
        grid.apply_heights(|x, _| x);
        let n = grid.normals()[grid.index(2, 2)];
        assert!(n.x < 0.0);
        assert!(n.z > 0.0);
        assert!(n.y.abs() < 1e-5);
    }

    #[test]
    fn test_to_mesh_matches_grid() {
        let mut grid = VertexGrid::plane(2.0, 2.0, 2, 2);
        grid.displace(&[], &mut StdRng::seed_from_u64(1));
        let mesh = grid.to_mesh();
        assert_eq!(mesh.vertex_count(), grid.vertex_count());
        assert_eq!(mesh.indices, grid.indices());
        assert_eq!(mesh.vertices[4].position, grid.positions()[4].to_array());
    }
}
