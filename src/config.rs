//! Scene configuration.
//!
//! Every section has defaults reproducing the classic scene, and every field
//! is `#[serde(default)]`, so a JSON file only needs the values it changes:
//!
//! ```json
//! { "seed": 7, "orbit": { "count": 12 }, "particles": { "count": 500 } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::terrain::{default_craters, Crater};
use crate::time::DEFAULT_STEP;

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    /// Clear colour as sRGB `0xRRGGBB`.
    pub background: u32,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub terrain: TerrainConfig,
    pub stars: StarConfig,
    pub particles: ParticleConfig,
    pub orbit: OrbitConfig,
    /// Simulated seconds added per tick.
    pub tick_step: f32,
    /// Seed for terrain noise and object placement. `None` draws from OS
    /// entropy, giving a different scene every run.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            background: 0x0a0a5c,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            terrain: TerrainConfig::default(),
            stars: StarConfig::default(),
            particles: ParticleConfig::default(),
            orbit: OrbitConfig::default(),
            tick_step: DEFAULT_STEP,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lunar Mochi".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of pending orbit motion applied per frame (0 disables
    /// damping).
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [10.0, 10.0, 25.0],
            target: [0.0, 0.0, 0.0],
            fov_y: 60.0,
            near: 0.1,
            far: 1000.0,
            damping: 0.05,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    /// Position of the directional light; it shines towards the origin.
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.6,
            directional_intensity: 1.0,
            directional_position: [10.0, 20.0, 10.0],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Edge length of the square ground.
    pub size: f32,
    /// Quads along each edge.
    pub segments: u32,
    pub color: u32,
    pub craters: Vec<Crater>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            segments: 40,
            color: 0xe0c878,
            craters: default_craters(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    pub count: u32,
    /// Width of the square the stars are scattered over.
    pub spread: f32,
    pub height: f32,
    pub radius: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 500,
            spread: 100.0,
            height: 100.0,
            radius: 0.07,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: u32,
    pub spread: f32,
    pub color: u32,
    /// Sprite edge length in world units.
    pub size: f32,
    pub opacity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 40.0,
            color: 0xe0c878,
            size: 0.25,
            opacity: 0.8,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    /// Number of rabbits circling the mortar.
    pub count: u32,
    pub radius: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self { count: 8, radius: 8.0 }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a buildable scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window size must be non-zero"));
        }
        if !(self.tick_step.is_finite() && self.tick_step > 0.0) {
            return Err(invalid(format!("tick_step must be positive, got {}", self.tick_step)));
        }

        let cam = &self.camera;
        if !all_finite(&cam.position) || !all_finite(&cam.target) {
            return Err(invalid("camera position and target must be finite"));
        }
        if !(cam.fov_y > 0.0 && cam.fov_y < 180.0) {
            return Err(invalid(format!("camera fov_y must be in (0, 180), got {}", cam.fov_y)));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(invalid("camera requires 0 < near < far"));
        }
        if !(0.0..=1.0).contains(&cam.damping) {
            return Err(invalid("camera damping must be in [0, 1]"));
        }

        let terrain = &self.terrain;
        if terrain.segments == 0 {
            return Err(invalid("terrain segments must be at least 1"));
        }
        if !(terrain.size.is_finite() && terrain.size > 0.0) {
            return Err(invalid("terrain size must be positive"));
        }
        for (i, crater) in terrain.craters.iter().enumerate() {
            if !(crater.center_x.is_finite() && crater.center_y.is_finite() && crater.depth.is_finite()) {
                return Err(invalid(format!("crater {} has non-finite parameters", i)));
            }
            if !(crater.radius.is_finite() && crater.radius > 0.0) {
                return Err(invalid(format!("crater {} radius must be positive", i)));
            }
            if crater.depth < 0.0 {
                return Err(invalid(format!("crater {} depth must not be negative", i)));
            }
        }

        let light = &self.lighting;
        if !(light.ambient_intensity.is_finite() && light.directional_intensity.is_finite())
            || !all_finite(&light.directional_position)
        {
            return Err(invalid("lighting values must be finite"));
        }
        if light.ambient_intensity < 0.0 || light.directional_intensity < 0.0 {
            return Err(invalid("light intensities must not be negative"));
        }

        if self.orbit.count > 0 && !(self.orbit.radius.is_finite() && self.orbit.radius > 0.0) {
            return Err(invalid("orbit radius must be positive"));
        }

        let pc = &self.particles;
        if !(pc.spread.is_finite() && pc.spread >= 0.0) {
            return Err(invalid("particle spread must be finite and not negative"));
        }
        if !(pc.size.is_finite() && pc.size > 0.0) || !(0.0..=1.0).contains(&pc.opacity) {
            return Err(invalid("particle size must be positive and opacity in [0, 1]"));
        }

        let sc = &self.stars;
        if !(sc.spread.is_finite() && sc.spread >= 0.0) || !sc.height.is_finite() {
            return Err(invalid("star spread and height must be finite"));
        }
        if !(sc.radius.is_finite() && sc.radius > 0.0) {
            return Err(invalid("star radius must be positive"));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn all_finite(v: &[f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}
