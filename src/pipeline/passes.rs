use crate::core::geometry::Triangle;
use crate::core::math::transform::{Projection, transform_point};
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};

/// Object -> world through the model matrix `model`, usually built by
/// [`TransformFactory::pose`](crate::core::math::transform::TransformFactory::pose) or [`Thing::model_matrix`](crate::scene::thing::Thing::model_matrix).
///
/// Normals are recomputed from the world-space edges. The result carries the
/// mesh's color and id and a world-space copy of its vertices.
pub fn world_pass(mesh: &Mesh, model: &Matrix4<f32>) -> Vec<Triangle> {
    mesh.triangles
        .iter()
        .map(|tri| {
            let mut world = tri.map_points(|p| transform_point(model, p));
            world.normal = world.face_normal();
            world.world = world.points();
            world.world_normal = world.normal;
            world.color = mesh.color;
            world.id = mesh.id;
            world
        })
        .collect()
}

/// World -> view through the camera's cached view matrix.
///
/// The view-space normal is recomputed; `world` and `world_normal` pass
/// through unchanged.
pub fn view_pass(tri: &Triangle, camera: &Camera) -> Triangle {
    let view = camera.view_matrix();
    let mut out = tri.map_points(|p| transform_point(&view, p));
    out.normal = out.face_normal();
    out
}

/// Back-face test on the world normal: faces whose normal is within
/// `threshold` of the camera's forward direction are rejected.
#[inline]
pub fn is_backface(tri: &Triangle, forward: &Vector3<f32>, threshold: f32) -> bool {
    tri.world_normal.dot(forward) >= threshold
}

/// Coarse frustum test: true when every view-space vertex is closer than `near`.
#[inline]
pub fn is_behind_near(tri: &Triangle, near: f32) -> bool {
    tri.points().iter().all(|p| p.z < near)
}

/// View -> pixel space.
///
/// A vertex at z = 0 collapses to the projected origin, the viewport center,
/// rather than dividing by zero.
/// Returns the projected triangle and how many vertices collapsed; after a
/// near clip that count is always 0.
pub fn projection_pass(tri: &Triangle, projection: &Projection) -> (Triangle, usize) {
    let mut degenerate = 0;
    let out = tri.map_points(|p| match projection.project_point(p) {
        Some(ndc) => projection.to_screen(&ndc),
        None => {
            degenerate += 1;
            projection.to_screen(&Point3::origin())
        }
    });
    (out, degenerate)
}
