//! Light particles and starfield placement.

use glam::Vec3;
use rand::Rng;

/// Lowest height a light particle can have; drift wraps back to it.
pub const PARTICLE_FLOOR: f32 = -10.0;
/// Height above which a light particle wraps to [`PARTICLE_FLOOR`].
pub const PARTICLE_CEILING: f32 = 10.0;

/// Flat `x, y, z` buffer of floating light particles.
///
/// Stored exactly as it is uploaded to the GPU: three consecutive `f32`s per
/// particle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightParticles {
    coords: Vec<f32>,
}

impl LightParticles {
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            coords: positions.into_iter().flat_map(|p| p.to_array()).collect(),
        }
    }

    /// Scatter `count` particles over a `spread × spread` square centred on
    /// the origin, with heights in `[0, PARTICLE_CEILING)`.
    pub fn spawn<R: Rng + ?Sized>(count: usize, spread: f32, rng: &mut R) -> Self {
        Self::from_positions((0..count).map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * spread,
                rng.gen::<f32>() * PARTICLE_CEILING,
                (rng.gen::<f32>() - 0.5) * spread,
            )
        }))
    }

    pub fn len(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.coords[i * 3..i * 3 + 3])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.coords
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.coords
    }
}

/// Star positions: `x, z` in `[-spread/2, spread/2)`, `y` in `[0, height)`.
pub fn scatter_stars<R: Rng + ?Sized>(count: usize, spread: f32, height: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * spread,
                rng.gen::<f32>() * height,
                (rng.gen::<f32>() - 0.5) * spread,
            )
        })
        .collect()
}
