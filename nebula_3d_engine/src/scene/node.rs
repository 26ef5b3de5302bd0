//! Node transform graph — hierarchical nodes with lazily evaluated world
//! matrices.
//!
//! Nodes live in a SlotMap arena owned by the NodeGraph. The parent
//! back-reference is a plain NodeKey, never an owning reference, so no
//! reference cycles can form; the owning relation is the child list.
//!
//! Transform evaluation is lazy: mutating a node's local transform (or
//! reparenting it) marks the node and its whole subtree dirty, and the
//! evaluated world matrix is recomputed on read by composing the recursively
//! evaluated parent matrix with the node's local matrix.

use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec3};
use slotmap::new_key_type;

use crate::engine_bail;
use crate::error::Result;
use crate::resource::mesh::Mesh;
use super::camera::Camera;
use super::light::Light;

const SOURCE: &str = "nebula3d::NodeGraph";

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a Node within a NodeGraph.
    ///
    /// Keys remain valid even after other nodes are removed.
    pub struct NodeKey;
}

// ===== ROTATION ORDER =====

/// Order in which the per-axis Euler rotations compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationOrder {
    /// X, then Y, then Z (default, matches the loader's Euler extraction)
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl RotationOrder {
    fn euler_rot(self) -> EulerRot {
        match self {
            RotationOrder::Xyz => EulerRot::XYZ,
            RotationOrder::Xzy => EulerRot::XZY,
            RotationOrder::Yxz => EulerRot::YXZ,
            RotationOrder::Yzx => EulerRot::YZX,
            RotationOrder::Zxy => EulerRot::ZXY,
            RotationOrder::Zyx => EulerRot::ZYX,
        }
    }
}

// ===== NODE KIND =====

/// Closed set of node variants.
///
/// The loader and Scene switch exhaustively on kind, so this is a tagged
/// enum rather than open-ended subclassing.
pub enum NodeKind {
    /// Plain transform node with no payload
    Transform,
    /// Node carrying a shared mesh reference
    Mesh(Arc<Mesh>),
    /// Node owning a camera kept in sync with the node transform
    Camera(Camera),
    /// Node owning a punctual light
    Light(Light),
}

// ===== NODE =====

/// A spatial entity in the node graph.
pub struct Node {
    /// Optional name for scene lookup
    name: Option<String>,
    /// Local translation
    translation: Vec3,
    /// Local rotation as Euler angles in radians
    rotation: Vec3,
    /// Local scale
    scale: Vec3,
    /// Euler composition order
    rotation_order: RotationOrder,
    /// Cached concatenated local matrix (valid when not dirty)
    local_matrix: Mat4,
    /// Cached evaluated world matrix (valid when not dirty)
    world_matrix: Mat4,
    /// True when the cached matrices are stale
    dirty: bool,
    /// Non-owning back-reference to the parent
    parent: Option<NodeKey>,
    /// Owning child list
    children: Vec<NodeKey>,
    /// Node variant payload
    kind: NodeKind,
}

impl Node {
    fn new(name: Option<String>, kind: NodeKind) -> Self {
        Self {
            name,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation_order: RotationOrder::default(),
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            dirty: true,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Compose the local matrix from translation, rotation and scale
    fn compute_local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_euler(
                self.rotation_order.euler_rot(),
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
            * Mat4::from_scale(self.scale)
    }

    // ===== ACCESSORS =====

    /// Node name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Local translation
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Local rotation (Euler angles in radians)
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Euler composition order
    pub fn rotation_order(&self) -> RotationOrder {
        self.rotation_order
    }

    /// Whether the cached matrices are stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Parent key, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys in attach order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Node variant payload
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Shared mesh reference for mesh nodes
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Camera for camera nodes
    pub fn camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Light for light nodes
    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}

// ===== NODE GRAPH =====

/// Arena of nodes with hierarchy management and lazy transform evaluation.
///
/// All mutation goes through the graph so that dirty propagation and the
/// parent/child invariants (at most one parent, no cycles) hold under any
/// mutation order. Single-threaded; callers requiring concurrent access
/// must serialize externally.
pub struct NodeGraph {
    nodes: slotmap::SlotMap<NodeKey, Node>,
}

impl NodeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: slotmap::SlotMap::with_key(),
        }
    }

    // ===== NODE CREATION =====

    /// Create a plain transform node
    pub fn create_node(&mut self, name: Option<String>) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Transform))
    }

    /// Create a node carrying a shared mesh reference
    pub fn create_mesh_node(&mut self, name: Option<String>, mesh: Arc<Mesh>) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Mesh(mesh)))
    }

    /// Create a node owning a camera
    pub fn create_camera_node(&mut self, name: Option<String>, camera: Camera) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Camera(camera)))
    }

    /// Create a node owning a light
    pub fn create_light_node(&mut self, name: Option<String>, light: Light) -> NodeKey {
        self.nodes.insert(Node::new(name, NodeKind::Light(light)))
    }

    /// Remove a node and its whole subtree from the graph.
    ///
    /// Detaches the node from its parent first. Removing an invalid key is
    /// a no-op.
    pub fn destroy_node(&mut self, key: NodeKey) {
        if !self.nodes.contains_key(key) {
            return;
        }
        if let Some(parent) = self.nodes[key].parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != key);
            }
        }
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    // ===== ACCESSORS =====

    /// Get a node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes (key, node)
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    // ===== HIERARCHY =====

    /// Attach `child` under `parent`.
    ///
    /// Fails if either key is invalid, `child == parent`, `child` is an
    /// ancestor of `parent` (cycle prevention, checked by walking the
    /// child's subtree for the parent before linking), the child is already
    /// in the parent's child list, or the child already has a different
    /// parent. On failure neither node's parent/child state changes.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            engine_bail!(SOURCE, InvalidArgument, "add_child: invalid parent key {:?}", parent);
        }
        if !self.nodes.contains_key(child) {
            engine_bail!(SOURCE, InvalidArgument, "add_child: invalid child key {:?}", child);
        }
        if parent == child {
            engine_bail!(SOURCE, InvalidArgument, "add_child: node {:?} cannot be its own child", child);
        }
        if self.subtree_contains(child, parent) {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "add_child: node {:?} is an ancestor of {:?}, linking would create a cycle",
                child,
                parent
            );
        }
        match self.nodes[child].parent {
            Some(existing) if existing == parent => {
                engine_bail!(
                    SOURCE,
                    InvalidArgument,
                    "add_child: node {:?} is already a child of {:?}",
                    child,
                    parent
                );
            }
            Some(existing) => {
                engine_bail!(
                    SOURCE,
                    InvalidArgument,
                    "add_child: node {:?} already has parent {:?}",
                    child,
                    existing
                );
            }
            None => {}
        }

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.mark_subtree_dirty(child);
        self.sync_subtree_cameras(child);
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// Clears the child's parent back-reference and marks its subtree dirty,
    /// so re-insertion elsewhere re-evaluates against the new parent chain.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            engine_bail!(SOURCE, InvalidArgument, "remove_child: invalid parent key {:?}", parent);
        }
        if !self.nodes.contains_key(child) {
            engine_bail!(SOURCE, InvalidArgument, "remove_child: invalid child key {:?}", child);
        }
        if self.nodes[child].parent != Some(parent) {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "remove_child: node {:?} is not a child of {:?}",
                child,
                parent
            );
        }

        self.nodes[parent].children.retain(|&key| key != child);
        self.nodes[child].parent = None;
        self.mark_subtree_dirty(child);
        self.sync_subtree_cameras(child);
        Ok(())
    }

    /// True if `needle` is inside the subtree rooted at `root` (inclusive)
    fn subtree_contains(&self, root: NodeKey, needle: NodeKey) -> bool {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if current == needle {
                return true;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend_from_slice(&node.children);
            }
        }
        false
    }

    // ===== TRANSFORM SETTERS =====

    /// Set the local translation, marking the subtree dirty
    pub fn set_translation(&mut self, key: NodeKey, translation: Vec3) -> Result<()> {
        if !self.nodes.contains_key(key) {
            engine_bail!(SOURCE, InvalidArgument, "set_translation: invalid node key {:?}", key);
        }
        self.nodes[key].translation = translation;
        self.mark_subtree_dirty(key);
        self.sync_camera(key);
        Ok(())
    }

    /// Set the local rotation (Euler angles in radians), marking the subtree dirty
    pub fn set_rotation(&mut self, key: NodeKey, rotation: Vec3) -> Result<()> {
        if !self.nodes.contains_key(key) {
            engine_bail!(SOURCE, InvalidArgument, "set_rotation: invalid node key {:?}", key);
        }
        self.nodes[key].rotation = rotation;
        self.mark_subtree_dirty(key);
        self.sync_camera(key);
        Ok(())
    }

    /// Set the local scale, marking the subtree dirty
    pub fn set_scale(&mut self, key: NodeKey, scale: Vec3) -> Result<()> {
        if !self.nodes.contains_key(key) {
            engine_bail!(SOURCE, InvalidArgument, "set_scale: invalid node key {:?}", key);
        }
        self.nodes[key].scale = scale;
        self.mark_subtree_dirty(key);
        Ok(())
    }

    /// Set the Euler composition order, marking the subtree dirty
    pub fn set_rotation_order(&mut self, key: NodeKey, order: RotationOrder) -> Result<()> {
        if !self.nodes.contains_key(key) {
            engine_bail!(SOURCE, InvalidArgument, "set_rotation_order: invalid node key {:?}", key);
        }
        self.nodes[key].rotation_order = order;
        self.mark_subtree_dirty(key);
        self.sync_camera(key);
        Ok(())
    }

    /// Mark a node and every descendant dirty
    fn mark_subtree_dirty(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current) {
                node.dirty = true;
                stack.extend_from_slice(&node.children);
            }
        }
    }

    /// Refresh every camera in a subtree after its parent chain changed
    fn sync_subtree_cameras(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                stack.extend_from_slice(&node.children);
            } else {
                continue;
            }
            self.sync_camera(current);
        }
    }

    /// Refresh a camera node's eye/target from its world transform.
    ///
    /// Evaluates the world matrix eagerly so the sync is correct under
    /// arbitrary parent chains.
    fn sync_camera(&mut self, key: NodeKey) {
        if !matches!(self.nodes[key].kind, NodeKind::Camera(_)) {
            return;
        }
        let world = self.evaluate(key);
        if let NodeKind::Camera(camera) = &mut self.nodes[key].kind {
            camera.set_from_world_matrix(&world);
        }
    }

    // ===== TRANSFORM EVALUATION =====

    /// Concatenated local matrix of a node.
    ///
    /// Recomputed from the current translation/rotation/scale; does not
    /// touch the dirty flag.
    pub fn local_matrix(&self, key: NodeKey) -> Result<Mat4> {
        match self.nodes.get(key) {
            Some(node) => Ok(node.compute_local_matrix()),
            None => {
                engine_bail!(SOURCE, InvalidArgument, "local_matrix: invalid node key {:?}", key)
            }
        }
    }

    /// Evaluated world matrix of a node.
    ///
    /// The read path of the graph: when the node is dirty, the parent's
    /// evaluated matrix is resolved recursively (no parent evaluates to
    /// identity), multiplied by the node's local matrix, cached, and the
    /// dirty flag is cleared.
    pub fn evaluated_matrix(&mut self, key: NodeKey) -> Result<Mat4> {
        if !self.nodes.contains_key(key) {
            engine_bail!(SOURCE, InvalidArgument, "evaluated_matrix: invalid node key {:?}", key);
        }
        Ok(self.evaluate(key))
    }

    fn evaluate(&mut self, key: NodeKey) -> Mat4 {
        let (dirty, parent) = {
            let node = &self.nodes[key];
            (node.dirty, node.parent)
        };
        if !dirty {
            return self.nodes[key].world_matrix;
        }

        let parent_world = match parent {
            Some(parent_key) => self.evaluate(parent_key),
            None => Mat4::IDENTITY,
        };

        let node = &mut self.nodes[key];
        node.local_matrix = node.compute_local_matrix();
        node.world_matrix = parent_world * node.local_matrix;
        node.dirty = false;
        node.world_matrix
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
