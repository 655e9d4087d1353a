//! Resolution of parent-relative transforms into the owning space.
//!
//! A grouped node stores its transform relative to its parent: the position
//! is a fraction of the parent's width and height measured from the parent's
//! unrotated top-left corner, and the size is scaled by the parent's height
//! alone so nested content keeps its proportions. The parent's world rotation is applied about
//! the parent's anchor, and rotations add up along the chain.
//!
//! [`Resolver`] walks ancestor chains once per resolution pass, memoizing
//! every node it resolves. It never loops: a node revisited while its own
//! resolution is in progress is treated as parent-less, and a parent that no
//! longer exists is skipped the same way.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::collections::{HashMap, HashSet};

use crate::consts::MIN_PARENT_SCALE;
use crate::doc::{Node, NodeId, PresentationModel};
use crate::geometry::{Anchor, Point, Transform, compose_rotation};

fn floored(extent: f64) -> f64 {
    if extent.is_finite() && extent > MIN_PARENT_SCALE { extent } else { MIN_PARENT_SCALE }
}

/// Uniform scale a group applies to its children's sizes.
#[must_use]
pub fn parent_scale(parent_world: &Transform) -> f64 {
    floored(parent_world.h)
}

/// Map a point in parent fractions into the parent's owning space.
#[must_use]
pub fn local_point_to_world(local: Point, parent_world: &Transform) -> Point {
    let offset = Point::new(local.x * floored(parent_world.w), local.y * floored(parent_world.h));
    (parent_world.top_left() + offset).rotated_about(parent_world.anchor_point(), parent_world.rotation_deg)
}

/// Inverse of [`local_point_to_world`].
#[must_use]
pub fn world_point_to_local(world: Point, parent_world: &Transform) -> Point {
    let unrotated = world.rotated_about(parent_world.anchor_point(), -parent_world.rotation_deg);
    let offset = unrotated - parent_world.top_left();
    Point::new(offset.x / floored(parent_world.w), offset.y / floored(parent_world.h))
}

/// Compose a parent's world transform with a child's local transform.
#[must_use]
pub fn compose(parent_world: &Transform, local: &Transform) -> Transform {
    let s = parent_scale(parent_world);
    let p = local_point_to_world(local.anchor_point(), parent_world);
    Transform {
        x: p.x,
        y: p.y,
        w: local.w * s,
        h: local.h * s,
        anchor: local.anchor,
        rotation_deg: compose_rotation(parent_world.rotation_deg, local.rotation_deg),
    }
}

/// Express `desired_world` as a local transform under `parent_world`, using
/// `desired_anchor` as the stored anchor. Exact inverse of [`compose`].
///
/// With no parent the result is simply `desired_world` re-anchored.
#[must_use]
pub fn to_local_from_world(
    desired_world: &Transform,
    parent_world: Option<&Transform>,
    desired_anchor: Anchor,
) -> Transform {
    let world = desired_world.reanchored(desired_anchor);
    let Some(parent) = parent_world else {
        return world;
    };
    let s = parent_scale(parent);
    let p = world_point_to_local(world.anchor_point(), parent);
    Transform {
        x: p.x,
        y: p.y,
        w: world.w / s,
        h: world.h / s,
        anchor: desired_anchor,
        rotation_deg: world.rotation_deg - parent.rotation_deg,
    }
}

/// Resolves nodes to their owning-space transforms for a single pass.
///
/// Build one per pointer event or render tick and drop it afterwards; the
/// memo is never carried across passes.
pub struct Resolver<'a> {
    nodes: HashMap<&'a NodeId, &'a Node>,
    cache: HashMap<&'a NodeId, Transform>,
    in_progress: HashSet<&'a NodeId>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(model: &'a PresentationModel) -> Self {
        let nodes = model.nodes.iter().map(|n| (&n.id, n)).collect();
        Self { nodes, cache: HashMap::new(), in_progress: HashSet::new() }
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// Transform of `id` in its owning space (world units for world nodes,
    /// viewport fractions for screen nodes). `None` only when the node itself
    /// is unknown.
    pub fn world_transform(&mut self, id: &NodeId) -> Option<Transform> {
        let node = self.node(id)?;
        let key = &node.id;
        if let Some(cached) = self.cache.get(key) {
            return Some(*cached);
        }
        if !self.in_progress.insert(key) {
            tracing::warn!(node = %key, "parent cycle detected; resolving as parent-less");
            return Some(*node.transform());
        }

        let local = *node.transform();
        let resolved = match node.parent_id() {
            None => local,
            Some(parent_id) => match self.world_transform(parent_id) {
                Some(parent_world) => compose(&parent_world, &local),
                None => {
                    tracing::warn!(node = %key, parent = %parent_id, "missing parent; resolving as parent-less");
                    local
                }
            },
        };

        self.in_progress.remove(key);
        self.cache.insert(key, resolved);
        Some(resolved)
    }

    /// World transform of `id`'s parent, when it has one that resolves.
    pub fn parent_world(&mut self, id: &NodeId) -> Option<Transform> {
        let parent_id = self.node(id)?.parent_id()?;
        if self.node(parent_id).is_none() {
            return None;
        }
        self.world_transform(parent_id)
    }
}
