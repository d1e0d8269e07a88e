//! Per-frame scene animation.
//!
//! One [`Animator::tick`] per rendered frame advances the simulated clock by
//! a fixed step and then:
//!
//! - lifts every light particle by [`PARTICLE_RISE`], wrapping at the top,
//! - swings the pestle pivot about its X axis,
//! - bobs the pounding rabbit,
//! - moves every orbiting rabbit along its ring.
//!
//! Everything except particle drift is a pure function of the clock's time:
//! transforms are overwritten, never accumulated, so [`animate`] called twice
//! with the same time leaves the scene unchanged.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::scene::particles::{PARTICLE_CEILING, PARTICLE_FLOOR};
use crate::scene::{NodeId, Scene, SceneGraph};
use crate::time::SimClock;

/// Height gained by each light particle per tick.
pub const PARTICLE_RISE: f32 = 0.015;

const POUND_RATE: f32 = 4.0;
const SWING_AMPLITUDE: f32 = 0.8;
const BOUNCE_BASE: f32 = 0.3;
const BOUNCE_HEIGHT: f32 = 0.1;

const ORBIT_SPEED: f32 = 0.8;
const HOP_BASE: f32 = 0.5;
const HOP_HEIGHT: f32 = 1.2;
const HOP_RATE: f32 = 3.0;
const SWAY_AMPLITUDE: f32 = 0.3;
const SWAY_RATE: f32 = 5.0;

/// The nodes the animator drives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rig {
    /// Node whose X rotation swings the pestle.
    pub pestle_pivot: Option<NodeId>,
    /// Rabbit that bobs while pounding.
    pub pounder: Option<NodeId>,
    /// Rabbits circling the mortar, in ring order.
    pub orbiters: Vec<NodeId>,
    pub orbit_radius: f32,
}

/// Position and heading of one orbiting actor at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPose {
    pub position: Vec3,
    /// Rotation about the vertical axis.
    pub yaw: f32,
}

/// Pestle pivot X rotation at `time`.
#[inline]
pub fn pestle_swing(time: f32) -> f32 {
    (time * POUND_RATE).sin() * SWING_AMPLITUDE
}

/// Pounding rabbit height at `time`.
#[inline]
pub fn bounce_height(time: f32) -> f32 {
    BOUNCE_BASE + BOUNCE_HEIGHT * (time * POUND_RATE).sin().abs()
}

/// Pose of orbiter `index` out of `count` on a ring of `radius` at `time`.
pub fn orbit_pose(time: f32, index: usize, count: usize, radius: f32) -> OrbitPose {
    let i = index as f32;
    let angle = time * ORBIT_SPEED + i / count as f32 * TAU;
    OrbitPose {
        position: Vec3::new(
            angle.cos() * radius,
            HOP_BASE + (time * HOP_RATE + i).sin().abs() * HOP_HEIGHT,
            angle.sin() * radius,
        ),
        yaw: angle + (time * SWAY_RATE + i).sin() * SWAY_AMPLITUDE,
    }
}

/// Raise every particle in a flat `x, y, z` buffer by one tick of drift.
///
/// A particle that ends up above the ceiling restarts at the floor. Only the
/// y slot of each triple is touched.
pub fn drift_particles(coords: &mut [f32]) {
    for y in coords.iter_mut().skip(1).step_by(3) {
        *y += PARTICLE_RISE;
        if *y > PARTICLE_CEILING {
            *y = PARTICLE_FLOOR;
        }
    }
}

/// Apply every time-determined transform of the rig for `time`.
///
/// Orbiters are turned about the vertical axis only; any tilt left over from
/// their build pose is cleared.
pub fn animate(time: f32, rig: &Rig, graph: &mut SceneGraph) {
    if let Some(pivot) = rig.pestle_pivot {
        graph.transform_mut(pivot).rotation.x = pestle_swing(time);
    }

    if let Some(pounder) = rig.pounder {
        graph.transform_mut(pounder).position.y = bounce_height(time);
    }

    let count = rig.orbiters.len();
    for (i, &id) in rig.orbiters.iter().enumerate() {
        let pose = orbit_pose(time, i, count, rig.orbit_radius);
        let transform = graph.transform_mut(id);
        transform.position = pose.position;
        transform.rotation = Vec3::new(0.0, pose.yaw, 0.0);
    }
}

/// Owns the simulated clock and applies one animation step per tick.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    clock: SimClock,
}

impl Animator {
    pub fn new(step: f32) -> Self {
        Self {
            clock: SimClock::new(step),
        }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// Current simulated time.
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Advance the clock one step and animate the scene at the new time.
    ///
    /// Returns the time used, or `None` when the clock is paused, in which
    /// case the scene is left untouched.
    pub fn tick(&mut self, scene: &mut Scene) -> Option<f32> {
        let time = self.clock.advance()?;
        let (rig, graph, particles) = scene.animation_targets();
        drift_particles(particles.as_mut_slice());
        animate(time, rig, graph);
        Some(time)
    }

    /// Re-apply the transforms for the current time without advancing.
    pub fn pose(&self, scene: &mut Scene) {
        let time = self.clock.time();
        let (rig, graph, _) = scene.animation_targets();
        animate(time, rig, graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::scene::Transform;

    const EPS: f32 = 1e-5;

    fn rig_graph(orbiters: usize) -> (Rig, SceneGraph) {
        let mut graph = SceneGraph::new();
        let pounder = graph.add_root("pounder", Transform::from_xyz(1.5, 5.0, 3.5));
        let pivot = graph.add_child(pounder, "pivot", Transform::from_xyz(0.6, 0.4, 1.0));
        let orbiters = (0..orbiters)
            .map(|i| graph.add_root(format!("orbiter_{}", i), Transform::IDENTITY))
            .collect();
        let rig = Rig {
            pestle_pivot: Some(pivot),
            pounder: Some(pounder),
            orbiters,
            orbit_radius: 8.0,
        };
        (rig, graph)
    }

    #[test]
    fn test_orbit_at_time_zero() {
        let pose = orbit_pose(0.0, 0, 8, 8.0);
        assert!((pose.position - Vec3::new(8.0, 0.5, 0.0)).length() < EPS);
        assert_eq!(pose.yaw, 0.0);
    }

    #[test]
    fn test_orbiters_evenly_spaced() {
        let quarter = orbit_pose(0.0, 2, 8, 8.0);
        assert!(quarter.position.x.abs() < EPS);
        assert!((quarter.position.z - 8.0).abs() < EPS);
    }

    #[test]
    fn test_orbit_stays_on_ring() {
        for step in 0..200 {
            let t = step as f32 * 0.37;
            for i in 0..8 {
                let p = orbit_pose(t, i, 8, 8.0).position;
                assert!((Vec3::new(p.x, 0.0, p.z).length() - 8.0).abs() < 1e-4);
                assert!((HOP_BASE..=HOP_BASE + HOP_HEIGHT + EPS).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_pestle_and_bounce_ranges() {
        for step in 0..500 {
            let t = step as f32 * 0.02;
            assert!(pestle_swing(t).abs() <= SWING_AMPLITUDE + EPS);
            let h = bounce_height(t);
            assert!((0.3 - EPS..=0.4 + EPS).contains(&h));
        }
        assert_eq!(pestle_swing(0.0), 0.0);
        assert_eq!(bounce_height(0.0), 0.3);
    }

    #[test]
    fn test_animate_at_zero() {
        let (rig, mut graph) = rig_graph(8);
        animate(0.0, &rig, &mut graph);

        let first = graph.transform(rig.orbiters[0]);
        assert!((first.position - Vec3::new(8.0, 0.5, 0.0)).length() < EPS);
        assert_eq!(first.rotation.y, 0.0);

        let pounder = graph.transform(rig.pounder.unwrap());
        assert_eq!(pounder.position, Vec3::new(1.5, 0.3, 3.5));
        assert_eq!(graph.transform(rig.pestle_pivot.unwrap()).rotation.x, 0.0);
    }

    #[test]
    fn test_animate_is_reproducible() {
        let (rig, mut graph) = rig_graph(8);
        let nodes: Vec<NodeId> = rig.orbiters.iter().copied().chain(rig.pounder).chain(rig.pestle_pivot).collect();

        animate(2.5, &rig, &mut graph);
        let first: Vec<Transform> = nodes.iter().map(|&id| *graph.transform(id)).collect();
        animate(2.5, &rig, &mut graph);
        let second: Vec<Transform> = nodes.iter().map(|&id| *graph.transform(id)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_animate_ignores_history() {
        let (rig, mut a) = rig_graph(4);
        let (_, mut b) = rig_graph(4);

        for step in 0..50 {
            animate(step as f32 * 0.02, &rig, &mut a);
        }
        animate(49.0 * 0.02, &rig, &mut b);

        for &id in &rig.orbiters {
            assert_eq!(a.transform(id), b.transform(id));
        }
    }

    #[test]
    fn test_drift_moves_only_y() {
        let mut coords = vec![1.0, 2.0, 3.0, -4.0, 9.99, 6.0];
        drift_particles(&mut coords);
        assert_eq!(coords[0], 1.0);
        assert_eq!(coords[2], 3.0);
        assert_eq!(coords[3], -4.0);
        assert_eq!(coords[5], 6.0);
        assert!((coords[1] - 2.015).abs() < EPS);
        assert_eq!(coords[4], PARTICLE_FLOOR);
    }

    #[test]
    fn test_drift_exactly_at_ceiling_does_not_wrap() {
        let mut coords = vec![0.0, PARTICLE_CEILING - PARTICLE_RISE, 0.0];
        drift_particles(&mut coords);
        assert!((coords[1] - PARTICLE_CEILING).abs() < EPS);
    }

    #[test]
    fn test_drift_wraps_within_period() {
        let starts = [-10.0, -5.5, 0.0, 3.3, 9.999, 10.0];
        for &start in &starts {
            let mut coords = vec![0.0, start, 0.0];
            let mut wrapped = false;
            for _ in 0..1334 {
                let before = coords[1];
                drift_particles(&mut coords);
                assert!((PARTICLE_FLOOR..=PARTICLE_CEILING).contains(&coords[1]));
                if coords[1] < before {
                    wrapped = true;
                }
            }
            assert!(wrapped, "particle starting at {} never wrapped", start);
        }
    }

    #[test]
    fn test_tick_advances_and_animates() {
        let config = SceneConfig {
            seed: Some(9),
            ..SceneConfig::default()
        };
        let mut scene = Scene::from_config(&config);
        let before = scene.particles().clone();
        let mut animator = Animator::new(config.tick_step);

        let time = animator.tick(&mut scene).unwrap();
        assert!((time - 0.02).abs() < 1e-7);

        let expected = orbit_pose(time, 0, 8, 8.0);
        let first = scene.graph().transform(scene.rig().orbiters[0]);
        assert_eq!(first.position, expected.position);
        assert_eq!(first.rotation.y, expected.yaw);

        for i in 0..before.len() {
            let (a, b) = (before.position(i), scene.particles().position(i));
            assert_eq!(a.x, b.x);
            assert_eq!(a.z, b.z);
            assert!((b.y - a.y - PARTICLE_RISE).abs() < EPS || b.y == PARTICLE_FLOOR);
        }
    }

    #[test]
    fn test_paused_tick_leaves_scene_alone() {
        let config = SceneConfig {
            seed: Some(9),
            ..SceneConfig::default()
        };
        let mut scene = Scene::from_config(&config);
        let mut animator = Animator::default();
        animator.clock_mut().pause();

        let before = scene.particles().clone();
        assert_eq!(animator.tick(&mut scene), None);
        assert_eq!(&before, scene.particles());
        assert_eq!(animator.clock().ticks(), 0);
    }

    #[test]
    fn test_pose_does_not_advance() {
        let config = SceneConfig {
            seed: Some(1),
            ..SceneConfig::default()
        };
        let mut scene = Scene::from_config(&config);
        let animator = Animator::default();
        animator.pose(&mut scene);
        assert_eq!(animator.clock().ticks(), 0);

        let first = scene.graph().transform(scene.rig().orbiters[0]);
        assert!((first.position - Vec3::new(8.0, 0.5, 0.0)).length() < EPS);
    }
}
