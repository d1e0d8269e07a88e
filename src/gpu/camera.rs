//! Orbit camera with damped mouse controls.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Radians of orbit per pixel dragged.
const ROTATE_SPEED: f32 = 0.005;
/// Pitch limit, just short of looking straight up or down.
const PITCH_LIMIT: f32 = 1.5;
/// Fraction of the distance covered by one wheel notch.
const ZOOM_SPEED: f32 = 0.1;
/// World units panned per pixel, per unit of distance.
const PAN_SPEED: f32 = 0.002;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 500.0;

/// Camera orbiting a target point.
///
/// Mouse input is queued with [`rotate`](Self::rotate), [`zoom`](Self::zoom)
/// and [`pan`](Self::pan) and eased in by [`update`](Self::update), once per
/// frame, so motion glides to a stop after the mouse does.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    damping: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
    pending_pan: Vec3,
}

impl OrbitCamera {
    /// Place the camera at `position` looking at `target`.
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(MIN_DISTANCE);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            damping: 0.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
            pending_pan: Vec3::ZERO,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::from_position(Vec3::from(config.position), Vec3::from(config.target));
        camera.fov_y = config.fov_y.to_radians();
        camera.near = config.near;
        camera.far = config.far;
        camera.damping = config.damping;
        camera
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Queue an orbit from a mouse drag of `dx, dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * ROTATE_SPEED;
        self.pending_pitch += dy * ROTATE_SPEED;
    }

    /// Queue a zoom of `notches` wheel steps; positive moves closer.
    pub fn zoom(&mut self, notches: f32) {
        self.pending_zoom += notches * ZOOM_SPEED;
    }

    /// Queue a pan of the target from a drag of `dx, dy` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.distance * PAN_SPEED;
        self.pending_pan += (-right * dx + up * dy) * scale;
    }

    /// Apply queued motion for one frame.
    pub fn update(&mut self) {
        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };

        self.yaw += self.pending_yaw * factor;
        self.pitch = (self.pitch + self.pending_pitch * factor).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * (-self.pending_zoom * factor).exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.target += self.pending_pan * factor;

        let keep = 1.0 - factor;
        self.pending_yaw *= keep;
        self.pending_pitch *= keep;
        self.pending_zoom *= keep;
        self.pending_pan *= keep;
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
