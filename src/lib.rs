//! # Lunar Mochi
//!
//! A small animated 3D tableau: rabbits pounding mochi on a cratered moon,
//! under a starfield, with light particles drifting upward.
//!
//! The crate splits into a pure core and a host side. The core has no window
//! and no GPU and is what the tests exercise:
//!
//! - [`terrain`] displaces a plane grid with a wave, random noise and craters,
//!   then recomputes its normals.
//! - [`animator`] advances a fixed-step clock and overwrites the transforms of
//!   the animated actors, and lifts the light particles.
//! - [`scene`] holds the scene graph, the static models and the particle
//!   buffer.
//!
//! The host side ([`viewer`], [`gpu`], [`input`]) opens a window, renders the
//! scene with wgpu and drives one animation tick per frame.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lunar_mochi::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig {
//!         seed: Some(7),
//!         ..SceneConfig::default()
//!     };
//!     Viewer::new(config)?.run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Headless use
//!
//! ```
//! use lunar_mochi::prelude::*;
//!
//! let config = SceneConfig { seed: Some(1), ..SceneConfig::default() };
//! let mut scene = Scene::from_config(&config);
//! let mut animator = Animator::new(config.tick_step);
//!
//! for _ in 0..100 {
//!     animator.tick(&mut scene);
//! }
//! assert!((animator.time() - 2.0).abs() < 1e-4);
//! ```

pub mod animator;
pub mod config;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod scene;
pub mod terrain;
pub mod time;
pub mod viewer;

pub use animator::{Animator, Rig};
pub use config::SceneConfig;
pub use error::{ConfigError, GpuError, ViewerError};
pub use glam::{Vec2, Vec3, Vec4};
pub use scene::Scene;
pub use terrain::{Crater, VertexGrid};
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::animator::{animate, drift_particles, Animator, Rig};
    pub use crate::config::SceneConfig;
    pub use crate::error::{ConfigError, GpuError, ViewerError};
    pub use crate::scene::{LightParticles, NodeId, Scene, SceneGraph, Transform};
    pub use crate::terrain::{compute_height, Crater, VertexGrid};
    pub use crate::time::SimClock;
    pub use crate::viewer::Viewer;
    pub use glam::{Vec2, Vec3, Vec4};
}
