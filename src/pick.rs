//! Object picking by ray casting.
//!
//! A click is turned into a world-space ray through the camera, the ray is
//! tested against every mesh below the roots in the selectable list, and the
//! nearest hit is resolved to an entity name through the registry:
//!
//! 1. Normalize the pointer to device coordinates in `[-1, 1]`
//! 2. Build the ray from the camera position through that point
//! 3. Move the ray into each mesh node's local space and test its primitives
//!    (bounding box first, then triangles)
//! 4. Keep the hit closest to the camera and look up its owning entity
//!
//! All of this runs on the CPU against the vertex data kept in the scene graph,
//! so it needs neither a GPU nor a frame to have been drawn.

use cgmath::{EuclideanSpace, InnerSpace, Point3, SquareMatrix};
use winit::dpi::PhysicalPosition;

use crate::{
    camera::{Camera, Projection},
    data_structures::{model::Ray, scene_graph::NodeId},
    scene::SceneContext,
};

/// Converts a pointer position in pixels to normalized device coordinates.
///
/// The top-left corner maps to `(-1, 1)` and the bottom-right corner to `(1, -1)`.
pub fn normalize_pointer(pointer: PhysicalPosition<f64>, width: f32, height: f32) -> (f32, f32) {
    let width = width.max(1.0);
    let height = height.max(1.0);
    (
        (pointer.x as f32 / width) * 2.0 - 1.0,
        -(pointer.y as f32 / height) * 2.0 + 1.0,
    )
}

/// The nearest mesh hit of a ray, resolved to its entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub entity: String,
    pub node: NodeId,
    /// Distance from the ray origin in world units.
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Nearest intersection of `ray` with any mesh below the selectable roots.
///
/// Returns the hit node, its distance and the world-space hit point.
pub fn intersect_selectable(ray: &Ray, scene: &SceneContext) -> Option<(NodeId, f32, Point3<f32>)> {
    let mut nearest: Option<(NodeId, f32, Point3<f32>)> = None;
    for root in scene.selectable.iter() {
        for id in scene.graph.descendants(root) {
            let Some(node) = scene.graph.node(id) else {
                continue;
            };
            if !node.is_mesh() {
                continue;
            }
            let world = *node.world_transform();
            // Degenerate (zero scale) nodes cannot be hit.
            let Some(inverse) = world.invert() else {
                continue;
            };
            let local_origin = inverse * ray.origin.extend(1.0);
            let local_direction = (inverse * ray.direction.extend(0.0)).truncate();
            if local_direction.magnitude2() <= f32::EPSILON {
                continue;
            }
            let local_ray = Ray::new(local_origin.truncate(), local_direction);

            for primitive in &node.primitives {
                let Some(t) = primitive.intersect_ray(&local_ray) else {
                    continue;
                };
                let local_point = local_ray.point_at(t);
                let world_point = (world * local_point.extend(1.0)).truncate();
                let distance = (world_point - ray.origin).magnitude();
                if nearest.is_none_or(|(_, best, _)| distance < best) {
                    nearest = Some((id, distance, Point3::from_vec(world_point)));
                }
            }
        }
    }
    nearest
}

/**
 * Resolves a click at `pointer` to the entity under it.
 *
 * `viewport` is the current surface size in physical pixels. Returns `None`
 * when nothing selectable is hit or when the hit node belongs to no entity; the
 * latter is logged since it means a node escaped registration.
 */
pub fn resolve_click(
    pointer: PhysicalPosition<f64>,
    viewport: (u32, u32),
    camera: &Camera,
    projection: &Projection,
    scene: &SceneContext,
) -> Option<PickHit> {
    let ray = camera.cast_ray_from_mouse(pointer, viewport.0 as f32, viewport.1 as f32, projection);
    let (node, distance, point) = intersect_selectable(&ray, scene)?;
    let Some(entity) = scene.registry.entity_for_node(node) else {
        log::warn!("Picked node {:?} does not belong to any registered entity.", node);
        return None;
    };
    log::debug!("Picked {} at distance {:.1}", entity.name, distance);
    Some(PickHit {
        entity: entity.name.clone(),
        node,
        distance,
        point,
    })
}

/// World-space position of an entity's root, the point the camera flies to.
pub fn focus_point(scene: &SceneContext, entity: &str) -> Option<Point3<f32>> {
    let root = scene.registry.get(entity)?.root;
    scene.graph.world_position(root).map(Point3::from_vec)
}
