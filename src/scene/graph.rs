//! Transform hierarchy.
//!
//! Nodes are stored in insertion order and a child can only be added after
//! its parent, so a parent's index is always lower than its children's.
//! [`SceneGraph::world_matrices`] relies on this to resolve the whole tree in
//! one forward pass.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Handle to a node in a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local position, rotation and scale of a node.
///
/// `rotation` holds Euler angles in radians applied in XYZ order
/// (`Rx * Ry * Rz`), so setting a single component spins the node about that
/// local axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-parent matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Rotate so the node's local +Z axis points at `target`, keeping +Y as
    /// close to world up as possible. Does nothing if `target` is the current
    /// position.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let right = match Vec3::Y.cross(forward).try_normalize() {
            Some(r) => r,
            // Looking straight up or down: any horizontal right vector works.
            None => Vec3::X,
        };
        let up = forward.cross(right);
        let basis = Mat3::from_cols(right, up, forward);
        let (x, y, z) = Quat::from_mat3(&basis).to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    transform: Transform,
    parent: Option<NodeId>,
}

/// A forest of transform nodes.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with no parent.
    pub fn add_root(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.push(name.into(), transform, None)
    }

    /// Add a node under `parent`.
    ///
    /// # Panics
    ///
    /// If `parent` does not belong to this graph.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent {:?} is not in this graph", parent);
        self.push(name.into(), transform, Some(parent))
    }

    fn push(&mut self, name: String, transform: Transform, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            transform,
            parent,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Find the first node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Local-to-world matrix of a single node.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let local = self.transform(id).matrix();
        match self.parent(id) {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// World matrices for every node, indexed by [`NodeId::index`].
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                Some(parent) => out[parent.0] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }
}
