//! Static figures of the tableau: rabbit, pestle (kine) and mortar (usu).
//!
//! Each builder adds one group node and attaches its body parts to it. Parts
//! use unit primitives, so sizes live in the part's local scale.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use super::graph::{NodeId, Transform};
use super::material::Material;
use super::Scene;
use crate::mesh::MeshKey;

const WHITE: u32 = 0xffffff;
const SNOW: u32 = 0xfffafa;
const WOOD: u32 = 0xdeb887;
const TAN: u32 = 0xd2b48c;
const BLACK: u32 = 0x000000;

fn sphere(segments: u32) -> MeshKey {
    MeshKey::Sphere {
        width_segments: segments,
        height_segments: segments,
    }
}

fn cylinder(radial_segments: u32) -> MeshKey {
    MeshKey::Cylinder { radial_segments }
}

/// Local transform placing a unit sphere of the given radius.
fn sphere_at(radius: f32, position: Vec3) -> Transform {
    Transform::from_position(position).with_scale(Vec3::splat(radius))
}

/// Local transform placing a unit cylinder of the given size.
fn cylinder_at(radius: f32, height: f32, position: Vec3) -> Transform {
    Transform::from_position(position).with_scale(Vec3::new(radius, height, radius))
}

/// Add a rabbit group node. The rabbit faces its local +Z.
pub fn rabbit(scene: &mut Scene, parent: Option<NodeId>, name: &str, transform: Transform) -> NodeId {
    let node = scene.add_node(parent, name, transform);
    let fur = Material::lit(WHITE, 0.7);
    let ear = Material::lit(SNOW, 1.0);
    let eye = Material::unlit(BLACK);

    scene.add_part(
        node,
        sphere(32),
        Transform::IDENTITY.with_scale(Vec3::new(1.0, 0.8, 1.5)),
        fur,
    );
    scene.add_part(node, sphere(32), sphere_at(0.6, Vec3::new(0.0, 1.1, 0.8)), fur);

    for (x, tilt) in [(-0.3, 0.3), (0.3, -0.3)] {
        let t = cylinder_at(0.15, 1.0, Vec3::new(x, 1.8, 0.6)).with_rotation(Vec3::new(0.0, 0.0, tilt));
        scene.add_part(node, cylinder(16), t, ear);
    }

    for (x, z) in [(-0.4, 0.5), (0.4, 0.5), (-0.4, -0.5), (0.4, -0.5)] {
        scene.add_part(node, cylinder(8), cylinder_at(0.15, 0.7, Vec3::new(x, -0.5, z)), fur);
    }

    for x in [-0.2, 0.2] {
        scene.add_part(node, sphere(16), sphere_at(0.1, Vec3::new(x, 1.2, 1.3)), eye);
    }

    node
}

/// Add a pestle group node: a shaft standing on the origin with a cross-head
/// at the top.
pub fn kine(scene: &mut Scene, parent: Option<NodeId>, name: &str, transform: Transform) -> NodeId {
    let node = scene.add_node(parent, name, transform);
    let wood = Material::lit(WOOD, 0.7);

    scene.add_part(node, cylinder(12), cylinder_at(0.15, 2.0, Vec3::new(0.0, 1.0, 0.0)), wood);
    scene.add_part(
        node,
        cylinder(12),
        cylinder_at(0.2, 1.2, Vec3::new(-0.2, 1.9, 0.0)).with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2)),
        wood,
    );

    node
}

/// Default local transform of the pestle on its pivot.
pub fn kine_rest_pose() -> Transform {
    Transform::from_xyz(0.0, 1.0, 0.0).with_rotation(Vec3::new(0.0, FRAC_PI_4, FRAC_PI_4))
}

/// Add a mortar group node: a tan tub holding a white mound of mochi.
pub fn usu(scene: &mut Scene, parent: Option<NodeId>, name: &str, transform: Transform) -> NodeId {
    let node = scene.add_node(parent, name, transform);

    scene.add_part(
        node,
        cylinder(32),
        cylinder_at(2.0, 1.2, Vec3::new(0.0, 0.6, 0.0)),
        Material::lit(TAN, 0.9),
    );
    scene.add_part(
        node,
        cylinder(32),
        cylinder_at(1.5, 1.3, Vec3::new(0.0, 0.7, 0.0)),
        Material::lit(WHITE, 0.7),
    );

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Shading;

    #[test]
    fn test_rabbit_parts() {
        let mut scene = Scene::empty();
        let node = rabbit(&mut scene, None, "rabbit", Transform::IDENTITY);

        let parts: Vec<_> = scene.parts().iter().filter(|p| p.node == node).collect();
        // body, head, 2 ears, 4 legs, 2 eyes
        assert_eq!(parts.len(), 10);
        let eyes = parts.iter().filter(|p| p.material.shading == Shading::Unlit).count();
        assert_eq!(eyes, 2);
    }

    #[test]
    fn test_kine_attached_to_parent() {
        let mut scene = Scene::empty();
        let pivot = scene.add_node(None, "pivot", Transform::IDENTITY);
        let pestle = kine(&mut scene, Some(pivot), "kine", kine_rest_pose());
        assert_eq!(scene.graph().parent(pestle), Some(pivot));
        assert_eq!(scene.parts().len(), 2);
    }

    #[test]
    fn test_usu_height() {
        let mut scene = Scene::empty();
        usu(&mut scene, None, "usu", Transform::IDENTITY);
        let top = scene
            .parts()
            .iter()
            .map(|p| p.local.position.y + p.local.scale.y * 0.5)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((top - 1.35).abs() < 1e-6);
    }
}
