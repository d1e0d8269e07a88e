//! The lunar tableau: ground, sky, figures and the nodes the animator drives.
//!
//! A [`Scene`] is plain data. It knows nothing about windows or GPUs; the
//! renderer reads it between ticks and the [`Animator`](crate::animator::Animator)
//! writes to it during ticks.

pub mod graph;
pub mod material;
pub mod models;
pub mod particles;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::FRAC_PI_2;

use crate::animator::{orbit_pose, Rig};
use crate::config::SceneConfig;
use crate::mesh::{MeshData, MeshKey};
use crate::terrain::VertexGrid;

pub use graph::{NodeId, SceneGraph, Transform};
pub use material::{Material, Shading};
pub use particles::LightParticles;

const STAR_SEGMENTS: u32 = 6;

/// A renderable piece attached to a scene node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Part {
    pub node: NodeId,
    pub mesh: MeshKey,
    /// Placement relative to the node.
    pub local: Transform,
    pub material: Material,
}

/// Everything that makes up the scene.
#[derive(Clone, Debug)]
pub struct Scene {
    graph: SceneGraph,
    parts: Vec<Part>,
    terrain: VertexGrid,
    particles: LightParticles,
    rig: Rig,
}

impl Scene {
    /// An empty scene with a flat 1×1 ground and no actors.
    pub fn empty() -> Self {
        Self {
            graph: SceneGraph::new(),
            parts: Vec::new(),
            terrain: VertexGrid::plane(1.0, 1.0, 1, 1),
            particles: LightParticles::default(),
            rig: Rig::default(),
        }
    }

    /// Build the scene described by `config`, seeding placement and terrain
    /// noise from `config.seed` (or OS entropy when unset).
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(config, &mut rng)
    }

    /// Build the scene described by `config` using `rng` for every random
    /// choice.
    pub fn build<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let mut scene = Self::empty();

        // Ground: grid z becomes world up once the node is tipped back.
        let tc = &config.terrain;
        let mut terrain = VertexGrid::plane(tc.size, tc.size, tc.segments, tc.segments);
        terrain.displace(&tc.craters, rng);
        let (lowest, highest) = terrain.height_range();
        log::debug!(
            "Terrain: {} vertices, {} craters, height {:.2}..{:.2}",
            terrain.vertex_count(),
            tc.craters.len(),
            lowest,
            highest
        );
        scene.terrain = terrain;
        let ground = scene.add_node(
            None,
            "ground",
            Transform::IDENTITY.with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        );
        scene.add_part(ground, MeshKey::Terrain, Transform::IDENTITY, Material::lit(tc.color, 1.0));

        // Sky
        let sc = &config.stars;
        let stars = scene.add_node(None, "stars", Transform::IDENTITY);
        let star_mesh = MeshKey::Sphere {
            width_segments: STAR_SEGMENTS,
            height_segments: STAR_SEGMENTS,
        };
        for position in particles::scatter_stars(sc.count as usize, sc.spread, sc.height, rng) {
            let local = Transform::from_position(position).with_scale(Vec3::splat(sc.radius));
            scene.add_part(stars, star_mesh, local, Material::unlit(0xffffff));
        }

        let pc = &config.particles;
        scene.particles = LightParticles::spawn(pc.count as usize, pc.spread, rng);

        // Mortar, and the rabbit pounding mochi in it
        models::usu(&mut scene, None, "usu", Transform::IDENTITY);

        let mut pounder_pose = Transform::from_xyz(1.5, 5.0, 3.5);
        pounder_pose.look_at(Vec3::new(0.0, 5.0, 0.0));
        let pounder = models::rabbit(&mut scene, None, "mochi_rabbit", pounder_pose);

        let pivot = scene.add_node(Some(pounder), "kine_pivot", Transform::from_xyz(0.6, 0.4, 1.0));
        models::kine(&mut scene, Some(pivot), "kine", models::kine_rest_pose());

        // Ring of rabbits, in their time-zero pose
        let oc = &config.orbit;
        let count = oc.count as usize;
        let orbiters = (0..count)
            .map(|i| {
                let start = orbit_pose(0.0, i, count, oc.radius);
                let pose = Transform::from_position(start.position).with_rotation(Vec3::new(0.0, start.yaw, 0.0));
                models::rabbit(&mut scene, None, &format!("orbit_rabbit_{}", i), pose)
            })
            .collect();

        scene.rig = Rig {
            pestle_pivot: Some(pivot),
            pounder: Some(pounder),
            orbiters,
            orbit_radius: oc.radius,
        };

        log::info!(
            "Scene built: {} nodes, {} parts, {} light particles",
            scene.graph.len(),
            scene.parts.len(),
            scene.particles.len()
        );

        scene
    }

    /// Add a node, as a root when `parent` is `None`.
    pub fn add_node(&mut self, parent: Option<NodeId>, name: &str, transform: Transform) -> NodeId {
        match parent {
            Some(parent) => self.graph.add_child(parent, name, transform),
            None => self.graph.add_root(name, transform),
        }
    }

    pub fn add_part(&mut self, node: NodeId, mesh: MeshKey, local: Transform, material: Material) {
        self.parts.push(Part {
            node,
            mesh,
            local,
            material,
        });
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn terrain(&self) -> &VertexGrid {
        &self.terrain
    }

    pub fn particles(&self) -> &LightParticles {
        &self.particles
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    /// Split borrow for the animator: the rig is read while the graph and
    /// particles are written.
    pub(crate) fn animation_targets(&mut self) -> (&Rig, &mut SceneGraph, &mut LightParticles) {
        (&self.rig, &mut self.graph, &mut self.particles)
    }

    /// Distinct meshes referenced by the parts, in a stable order.
    pub fn mesh_keys(&self) -> Vec<MeshKey> {
        let mut keys: Vec<MeshKey> = self.parts.iter().map(|p| p.mesh).collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Geometry for a mesh key.
    pub fn mesh_data(&self, key: MeshKey) -> MeshData {
        key.build_primitive().unwrap_or_else(|| self.terrain.to_mesh())
    }
}
