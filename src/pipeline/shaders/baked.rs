use crate::core::geometry::Triangle;
use crate::core::pipeline::{LightEnvironment, Shader};
use crate::pipeline::passes::world_pass;
use crate::pipeline::shaders::flat::accumulate;
use crate::scene::mesh::Mesh;
use crate::scene::thing::{Placement, Thing};
use log::info;
use nalgebra::{Matrix4, Vector3};

/// Reads light cached on the triangle by [`bake_lighting`].
///
/// Cached values are never refreshed here: after lights or geometry move the
/// caller has to bake again. Triangles that were never baked get the ambient
/// floor only.
#[derive(Debug, Clone, Copy, Default)]
pub struct BakedShader;

impl Shader for BakedShader {
    fn shade(&self, triangle: &Triangle, env: &LightEnvironment) -> Vector3<f32> {
        env.finish(triangle.baked.unwrap_or_else(Vector3::zeros))
    }
}

/// Evaluates the lights once for every triangle of every mesh in `things`, at
/// each mesh's current pose, and caches the result on the mesh's triangles.
/// Dupes share their thing's meshes, so they reuse the light baked at the
/// thing's own placement.
///
/// Returns the number of triangles baked.
pub fn bake_lighting(things: &mut [Thing], env: &LightEnvironment) -> usize {
    let mut baked = 0;
    for thing in things.iter_mut() {
        let placement = Placement::new(thing.position, thing.rotation);
        let models: Vec<Matrix4<f32>> = thing
            .meshes
            .iter()
            .map(|mesh| thing.model_matrix(mesh, &placement))
            .collect();
        for (mesh, model) in thing.meshes.iter_mut().zip(&models) {
            baked += bake_mesh(mesh, model, env);
        }
    }
    info!("Baked lighting for {} triangles from {} lights", baked, env.lights.len());
    baked
}

/// Bakes a single mesh placed in the world by `model`.
pub fn bake_mesh(mesh: &mut Mesh, model: &Matrix4<f32>, env: &LightEnvironment) -> usize {
    let world = world_pass(mesh, model);
    for (tri, world_tri) in mesh.triangles.iter_mut().zip(&world) {
        tri.baked = Some(accumulate(world_tri, env.lights));
    }
    world.len()
}
