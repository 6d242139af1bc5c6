use crate::core::geometry::Triangle;
use crate::core::pipeline::{LightEnvironment, Shader};
use nalgebra::Vector3;

/// Leaves the base color as-is; only the ambient floor and clamp policy apply.
/// Also used for debug geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlitShader;

impl Shader for UnlitShader {
    fn shade(&self, _triangle: &Triangle, env: &LightEnvironment) -> Vector3<f32> {
        env.finish(Vector3::repeat(1.0))
    }
}
