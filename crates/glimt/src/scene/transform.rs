//! # Transform hierarchy with cached world matrices
//!
//! A [`TransformArena`] owns every transform node in the scene. Nodes are
//! addressed by generational [`TransformId`] handles, so parent/child links
//! never dangle: destroying a node invalidates its handle and any stale copy
//! of it becomes inert.
//!
//! Each node stores a local position/rotation/scale and caches its world
//! matrix behind a dirty flag:
//!
//! ```text
//!   write local fields ──► mark node + all descendants dirty   (push down)
//!   read world matrix  ──► recompute through parent chain,     (pull up)
//!                          cache, clear the flag
//! ```
//!
//! Reading a clean subtree is O(1); the first read after an ancestor write
//! costs O(depth). The invariant is `world == parent.world * local` whenever
//! a node's flag is clear.
//!
//! ## Comparison
//!
//! - **Unity**: `Transform.SetParent(parent, worldPositionStays)` is the
//!   same re-parenting contract as [`set_parent`](TransformArena::set_parent).
//! - **Bevy**: splits local and world state into `Transform` +
//!   `GlobalTransform` components and recomputes the whole tree each frame;
//!   here the cache is per-node and recomputed on demand.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Stable handle to a node in a [`TransformArena`].
///
/// Cheap to copy and safe to hold across node removals: the generation
/// stamps out use-after-free, turning operations on a stale handle into
/// logged no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformId {
    index: u32,
    generation: u32,
}

struct Node {
    local_position: Vec3,
    local_rotation: Quat,
    local_scale: Vec3,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
    world_matrix: Mat4,
    dirty: bool,
}

impl Node {
    fn new() -> Self {
        Self {
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            parent: None,
            children: Vec::new(),
            world_matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }

    /// Translation × rotation × scale from the current local fields.
    /// Pure and uncached; only called while rebuilding the world matrix.
    fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.local_scale,
            self.local_rotation,
            self.local_position,
        )
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of transform nodes. See the module docs for the caching contract.
#[derive(Default)]
pub struct TransformArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            generation: 0,
            node: None,
        }
    }
}

impl TransformArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root node with the identity local transform.
    pub fn create(&mut self) -> TransformId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(Node::new());
                TransformId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(Node::new()),
                });
                TransformId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Create a node already linked under `parent`.
    pub fn create_child(&mut self, parent: TransformId) -> TransformId {
        let id = self.create();
        self.set_parent(id, Some(parent), false);
        id
    }

    /// Remove a node. Its children are detached to the root with their
    /// world pose preserved; the handle (and any copy of it) goes stale.
    pub fn remove(&mut self, id: TransformId) {
        if self.node(id).is_none() {
            log::warn!("remove called on a stale transform handle");
            return;
        }
        let children: Vec<TransformId> = self.children(id).to_vec();
        for child in children {
            self.set_parent(child, None, true);
        }
        self.unlink(id);
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    /// Is the handle still backed by a live node?
    pub fn contains(&self, id: TransformId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, id: TransformId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: TransformId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    // ── Hierarchy ────────────────────────────────────────────────────────

    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: TransformId) -> &[TransformId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Re-parent `id` under `new_parent` (or detach to the root with `None`).
    ///
    /// With `keep_world` the node's world position and rotation are captured
    /// before relinking and converted into the new parent's space, so the
    /// object does not move on screen. Without it the local fields are left
    /// untouched and the world pose jumps to `new_parent.world * local`.
    ///
    /// Re-parenting to the current parent is a no-op, as is any request that
    /// would create a cycle (logged and ignored).
    pub fn set_parent(&mut self, id: TransformId, new_parent: Option<TransformId>, keep_world: bool) {
        let Some(current) = self.node(id).map(|n| n.parent) else {
            log::warn!("set_parent called on a stale transform handle");
            return;
        };
        if current == new_parent {
            return;
        }
        if let Some(parent) = new_parent {
            if self.node(parent).is_none() {
                log::warn!("set_parent called with a stale parent handle");
                return;
            }
            if parent == id || self.has_ancestor(parent, id) {
                log::warn!("set_parent would create a transform cycle, ignoring");
                return;
            }
        }

        if keep_world {
            // Capture the world pose before touching any link.
            let world_position = self.position(id);
            let world_rotation = self.rotation(id);

            self.unlink(id);
            self.link(id, new_parent);

            let (local_position, local_rotation) = match new_parent {
                Some(parent) => {
                    let inverse_parent = self.model_matrix(parent).inverse();
                    let parent_rotation = self.rotation(parent);
                    (
                        inverse_parent.transform_point3(world_position),
                        parent_rotation.inverse() * world_rotation,
                    )
                }
                // Unparenting to the root: world space is local space.
                None => (world_position, world_rotation),
            };
            if let Some(node) = self.node_mut(id) {
                node.local_position = local_position;
                node.local_rotation = local_rotation;
            }
        } else {
            self.unlink(id);
            self.link(id, new_parent);
        }

        self.mark_dirty(id);
    }

    fn unlink(&mut self, id: TransformId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    fn link(&mut self, id: TransformId, parent: Option<TransformId>) {
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
        if let Some(parent) = parent {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.children.push(id);
            }
        }
    }

    /// Does `ancestor` appear anywhere on `id`'s parent chain?
    fn has_ancestor(&self, id: TransformId, ancestor: TransformId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    // ── Local space ──────────────────────────────────────────────────────

    pub fn local_position(&self, id: TransformId) -> Vec3 {
        self.node(id).map(|n| n.local_position).unwrap_or(Vec3::ZERO)
    }

    pub fn local_rotation(&self, id: TransformId) -> Quat {
        self.node(id)
            .map(|n| n.local_rotation)
            .unwrap_or(Quat::IDENTITY)
    }

    pub fn local_scale(&self, id: TransformId) -> Vec3 {
        self.node(id).map(|n| n.local_scale).unwrap_or(Vec3::ONE)
    }

    pub fn set_local_position(&mut self, id: TransformId, position: Vec3) {
        if let Some(node) = self.node_mut(id) {
            node.local_position = position;
            self.mark_dirty(id);
        }
    }

    pub fn set_local_rotation(&mut self, id: TransformId, rotation: Quat) {
        if let Some(node) = self.node_mut(id) {
            node.local_rotation = rotation;
            self.mark_dirty(id);
        }
    }

    pub fn set_local_scale(&mut self, id: TransformId, scale: Vec3) {
        if let Some(node) = self.node_mut(id) {
            node.local_scale = scale;
            self.mark_dirty(id);
        }
    }

    /// Set the local rotation from XYZ Euler angles in radians.
    pub fn set_local_euler(&mut self, id: TransformId, angles: Vec3) {
        self.set_local_rotation(
            id,
            Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z),
        );
    }

    /// Local rotation as XYZ Euler angles in radians.
    pub fn local_euler(&self, id: TransformId) -> Vec3 {
        let (x, y, z) = self.local_rotation(id).to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    // ── World space ──────────────────────────────────────────────────────

    /// The node's world matrix, recomputing through the parent chain if the
    /// cache is stale. This is the matrix handed to shaders as `uModel`.
    pub fn model_matrix(&mut self, id: TransformId) -> Mat4 {
        let Some(node) = self.node(id) else {
            log::warn!("model_matrix called on a stale transform handle");
            return Mat4::IDENTITY;
        };
        if !node.dirty {
            return node.world_matrix;
        }

        let parent = node.parent;
        let local = node.local_matrix();
        let world = match parent {
            Some(parent) => self.model_matrix(parent) * local,
            None => local,
        };
        if let Some(node) = self.node_mut(id) {
            node.world_matrix = world;
            node.dirty = false;
        }
        world
    }

    /// World position, read from the cached world matrix's translation.
    pub fn position(&mut self, id: TransformId) -> Vec3 {
        self.model_matrix(id).col(3).truncate()
    }

    /// World rotation, composed up the parent chain. Not cached — cheap
    /// relative to a matrix rebuild.
    pub fn rotation(&self, id: TransformId) -> Quat {
        let Some(node) = self.node(id) else {
            return Quat::IDENTITY;
        };
        match node.parent {
            Some(parent) => self.rotation(parent) * node.local_rotation,
            None => node.local_rotation,
        }
    }

    /// Move the node to a world position by rewriting its local position
    /// through the inverse parent transform.
    pub fn set_position(&mut self, id: TransformId, position: Vec3) {
        let parent = self.parent(id);
        let local = match parent {
            Some(parent) => self.model_matrix(parent).inverse().transform_point3(position),
            None => position,
        };
        self.set_local_position(id, local);
    }

    /// Set the node's world rotation: `local = parent.world_rotation⁻¹ * world`.
    pub fn set_rotation(&mut self, id: TransformId, rotation: Quat) {
        let local = match self.parent(id) {
            Some(parent) => self.rotation(parent).inverse() * rotation,
            None => rotation,
        };
        self.set_local_rotation(id, local);
    }

    /// Is the cached world matrix stale?
    pub fn is_dirty(&self, id: TransformId) -> bool {
        self.node(id).map(|n| n.dirty).unwrap_or(false)
    }

    /// Flag `id` and every descendant for recomputation.
    ///
    /// Early-outs on already-dirty nodes: a dirty node's descendants are
    /// dirty too (cleaning a descendant cleans its whole ancestor chain), so
    /// there is nothing left to mark below it.
    fn mark_dirty(&mut self, id: TransformId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.dirty {
            return;
        }
        node.dirty = true;
        let children = node.children.clone();
        for child in children {
            self.mark_dirty(child);
        }
    }

    // ── Directions ───────────────────────────────────────────────────────

    /// World forward axis. The convention is -Z, matching the right-handed
    /// view space used everywhere else in the crate.
    pub fn forward(&self, id: TransformId) -> Vec3 {
        self.rotation(id) * Vec3::NEG_Z
    }

    /// World up axis (+Y rotated into world space).
    pub fn up(&self, id: TransformId) -> Vec3 {
        self.rotation(id) * Vec3::Y
    }

    /// World right axis (+X rotated into world space).
    pub fn right(&self, id: TransformId) -> Vec3 {
        self.rotation(id) * Vec3::X
    }

    // ── Utility operations ───────────────────────────────────────────────

    /// Offset the local position.
    pub fn translate(&mut self, id: TransformId, translation: Vec3) {
        if let Some(node) = self.node_mut(id) {
            node.local_position += translation;
            self.mark_dirty(id);
        }
    }

    /// Apply a rotation on top of the current local rotation (world-axis
    /// pre-multiply).
    pub fn rotate(&mut self, id: TransformId, rotation: Quat) {
        if let Some(node) = self.node_mut(id) {
            node.local_rotation = rotation * node.local_rotation;
            self.mark_dirty(id);
        }
    }

    /// Rotate around a local axis by `angle` radians (post-multiply).
    pub fn rotate_axis(&mut self, id: TransformId, axis: Vec3, angle: f32) {
        if let Some(node) = self.node_mut(id) {
            node.local_rotation = node.local_rotation * Quat::from_axis_angle(axis, angle);
            self.mark_dirty(id);
        }
    }

    /// Orient the node so its forward axis points at `target`.
    pub fn look_at(&mut self, id: TransformId, target: Vec3, up: Vec3) {
        let eye = self.position(id);
        if eye.distance_squared(target) < f32::EPSILON {
            return;
        }
        let look = Mat4::look_at_rh(eye, target, up);
        let (_, rotation, _) = look.inverse().to_scale_rotation_translation();
        self.set_rotation(id, rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
        assert!(
            actual.distance(expected) < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_node_starts_dirty_with_identity_matrix() {
        let mut arena = TransformArena::new();
        let id = arena.create();

        assert!(arena.is_dirty(id));
        assert_eq!(arena.model_matrix(id), Mat4::IDENTITY);
        assert!(!arena.is_dirty(id));
    }

    #[test]
    fn dirty_propagates_to_all_descendants() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);
        let grandchild = arena.create_child(child);

        // Clean the whole chain first.
        arena.model_matrix(grandchild);
        assert!(!arena.is_dirty(root));
        assert!(!arena.is_dirty(child));
        assert!(!arena.is_dirty(grandchild));

        arena.set_local_position(root, Vec3::new(1.0, 0.0, 0.0));

        assert!(arena.is_dirty(root));
        assert!(arena.is_dirty(child));
        assert!(arena.is_dirty(grandchild));

        // Reading the grandchild cleans its whole ancestor chain.
        arena.model_matrix(grandchild);
        assert!(!arena.is_dirty(root));
        assert!(!arena.is_dirty(child));
        assert!(!arena.is_dirty(grandchild));
    }

    #[test]
    fn two_level_world_matrix_composes_translations() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.set_local_position(root, Vec3::new(10.0, 20.0, 30.0));
        arena.set_local_position(child, Vec3::new(1.0, 2.0, 3.0));

        let translation = arena.model_matrix(child).col(3).truncate();
        assert_vec3_eq(translation, Vec3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn rotation_composes_through_parents() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        // Parent rotated 90° around Y carries the child's local +X to -Z.
        arena.set_local_rotation(root, Quat::from_rotation_y(FRAC_PI_2));
        arena.set_local_position(child, Vec3::new(1.0, 0.0, 0.0));

        assert_vec3_eq(arena.position(child), Vec3::new(0.0, 0.0, -1.0));

        let world_rotation = arena.rotation(child);
        assert!((world_rotation.dot(Quat::from_rotation_y(FRAC_PI_2)).abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn scale_affects_child_position() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.set_local_scale(root, Vec3::splat(2.0));
        arena.set_local_position(child, Vec3::new(1.0, 1.0, 1.0));

        assert_vec3_eq(arena.position(child), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn reparent_keeping_world_pose() {
        let mut arena = TransformArena::new();
        let a = arena.create();
        let b = arena.create();
        let child = arena.create_child(a);

        arena.set_local_position(a, Vec3::new(5.0, 0.0, 0.0));
        arena.set_local_position(b, Vec3::new(0.0, 7.0, 0.0));
        arena.set_local_position(child, Vec3::new(1.0, 0.0, 0.0));

        let before = arena.position(child);
        assert_vec3_eq(before, Vec3::new(6.0, 0.0, 0.0));

        arena.set_parent(child, Some(b), true);

        // World pose preserved, local rewritten into b's space.
        assert_vec3_eq(arena.position(child), before);
        assert_vec3_eq(arena.local_position(child), Vec3::new(6.0, -7.0, 0.0));
        assert_eq!(arena.parent(child), Some(b));
    }

    #[test]
    fn reparent_keeping_world_pose_under_rotated_parent() {
        let mut arena = TransformArena::new();
        let a = arena.create();
        let b = arena.create();
        let child = arena.create_child(a);

        arena.set_local_position(child, Vec3::new(3.0, 0.0, 0.0));
        arena.set_local_rotation(b, Quat::from_rotation_y(FRAC_PI_2));

        let before = arena.position(child);
        arena.set_parent(child, Some(b), true);

        assert_vec3_eq(arena.position(child), before);
        // And the world rotation is still identity even though b is rotated.
        let world_rotation = arena.rotation(child);
        assert!((world_rotation.dot(Quat::IDENTITY).abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn reparent_without_keeping_world_pose_leaves_locals_untouched() {
        let mut arena = TransformArena::new();
        let a = arena.create();
        let b = arena.create();
        let child = arena.create_child(a);

        arena.set_local_position(b, Vec3::new(0.0, 10.0, 0.0));
        arena.set_local_position(child, Vec3::new(1.0, 0.0, 0.0));
        arena.set_local_rotation(child, Quat::from_rotation_x(0.5));

        let local_position = arena.local_position(child);
        let local_rotation = arena.local_rotation(child);

        arena.set_parent(child, Some(b), false);

        assert_eq!(arena.local_position(child), local_position);
        assert_eq!(arena.local_rotation(child), local_rotation);
        // World pose jumped to reflect the new parent.
        assert_vec3_eq(arena.position(child), Vec3::new(1.0, 10.0, 0.0));
    }

    #[test]
    fn unparenting_to_root_preserves_world_pose() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.set_local_position(root, Vec3::new(2.0, 4.0, 6.0));
        arena.set_local_position(child, Vec3::new(1.0, 1.0, 1.0));

        let before = arena.position(child);
        arena.set_parent(child, None, true);

        assert_eq!(arena.parent(child), None);
        assert_vec3_eq(arena.position(child), before);
        assert_vec3_eq(arena.local_position(child), before);
    }

    #[test]
    fn reparent_to_current_parent_is_a_noop() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.model_matrix(child);
        assert!(!arena.is_dirty(child));

        arena.set_parent(child, Some(root), true);

        // No relink, no dirtying.
        assert!(!arena.is_dirty(child));
        assert_eq!(arena.children(root), &[child]);
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);
        let grandchild = arena.create_child(child);

        arena.set_parent(root, Some(grandchild), false);
        assert_eq!(arena.parent(root), None);

        arena.set_parent(root, Some(root), false);
        assert_eq!(arena.parent(root), None);
    }

    #[test]
    fn end_to_end_move_root_then_read_child() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create();
        arena.set_parent(child, Some(root), false);
        arena.set_local_position(child, Vec3::new(1.0, 0.0, 0.0));

        assert_vec3_eq(arena.position(child), Vec3::new(1.0, 0.0, 0.0));

        arena.set_local_position(root, Vec3::new(5.0, 0.0, 0.0));

        // Without reading the child first, it must already be flagged.
        assert!(arena.is_dirty(child));
        assert_vec3_eq(arena.position(child), Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn set_position_converts_through_parent_space() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.set_local_position(root, Vec3::new(10.0, 0.0, 0.0));
        arena.set_position(child, Vec3::new(12.0, 3.0, 0.0));

        assert_vec3_eq(arena.local_position(child), Vec3::new(2.0, 3.0, 0.0));
        assert_vec3_eq(arena.position(child), Vec3::new(12.0, 3.0, 0.0));
    }

    #[test]
    fn set_rotation_converts_through_parent_rotation() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.set_local_rotation(root, Quat::from_rotation_y(FRAC_PI_2));
        arena.set_rotation(child, Quat::from_rotation_y(FRAC_PI_2));

        // Parent already provides the full world rotation.
        let local = arena.local_rotation(child);
        assert!((local.dot(Quat::IDENTITY).abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn direction_vectors_follow_world_rotation() {
        let mut arena = TransformArena::new();
        let id = arena.create();

        assert_vec3_eq(arena.forward(id), Vec3::NEG_Z);
        assert_vec3_eq(arena.up(id), Vec3::Y);
        assert_vec3_eq(arena.right(id), Vec3::X);

        arena.set_local_rotation(id, Quat::from_rotation_y(FRAC_PI_2));
        assert_vec3_eq(arena.forward(id), Vec3::NEG_X);
        assert_vec3_eq(arena.right(id), Vec3::NEG_Z);
    }

    #[test]
    fn look_at_points_forward_axis_at_target() {
        let mut arena = TransformArena::new();
        let id = arena.create();
        arena.set_local_position(id, Vec3::new(0.0, 0.0, 5.0));

        arena.look_at(id, Vec3::ZERO, Vec3::Y);

        assert_vec3_eq(arena.forward(id), Vec3::NEG_Z);
    }

    #[test]
    fn removing_a_node_detaches_children_and_stales_the_handle() {
        let mut arena = TransformArena::new();
        let root = arena.create();
        let child = arena.create_child(root);

        arena.set_local_position(root, Vec3::new(1.0, 2.0, 3.0));
        arena.set_local_position(child, Vec3::new(1.0, 0.0, 0.0));
        let child_world = arena.position(child);

        arena.remove(root);

        assert!(!arena.contains(root));
        assert!(arena.contains(child));
        assert_eq!(arena.parent(child), None);
        assert_vec3_eq(arena.position(child), child_world);

        // Operations through the stale handle are inert.
        arena.set_local_position(root, Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(arena.model_matrix(root), Mat4::IDENTITY);
    }

    #[test]
    fn slot_reuse_does_not_resurrect_old_handles() {
        let mut arena = TransformArena::new();
        let old = arena.create();
        arena.remove(old);

        let new = arena.create();
        assert_eq!(new.index, old.index);
        assert_ne!(new, old);
        assert!(!arena.contains(old));
        assert!(arena.contains(new));
    }

    #[test]
    fn translate_and_rotate_mark_dirty() {
        let mut arena = TransformArena::new();
        let id = arena.create();
        arena.model_matrix(id);

        arena.translate(id, Vec3::X);
        assert!(arena.is_dirty(id));
        assert_vec3_eq(arena.position(id), Vec3::X);

        arena.rotate(id, Quat::from_rotation_z(FRAC_PI_2));
        assert!(arena.is_dirty(id));
        assert_vec3_eq(arena.up(id), Vec3::NEG_X);
    }
}
