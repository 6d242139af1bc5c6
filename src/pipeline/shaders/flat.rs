use crate::core::geometry::Triangle;
use crate::core::pipeline::{LightEnvironment, Shader};
use crate::scene::light::Light;
use nalgebra::Vector3;

/// Per-triangle dynamic lighting, evaluated every frame from the triangle's
/// world normal and world centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatShader;

impl Shader for FlatShader {
    fn shade(&self, triangle: &Triangle, env: &LightEnvironment) -> Vector3<f32> {
        env.finish(accumulate(triangle, env.lights))
    }
}

/// Sum of every light's colored contribution to `triangle`, before ambient
/// and clamping.
pub fn accumulate(triangle: &Triangle, lights: &[Light]) -> Vector3<f32> {
    let normal = triangle.world_normal;
    let centroid = triangle.world_centroid();
    lights
        .iter()
        .fold(Vector3::zeros(), |acc, light| acc + light.illuminate(&normal, &centroid))
}
