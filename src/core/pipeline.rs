use crate::core::geometry::Triangle;
use crate::scene::light::Light;
use nalgebra::{Point2, Vector3};

/// Lights and ambient floor a shader evaluates against.
#[derive(Debug, Clone, Copy)]
pub struct LightEnvironment<'a> {
    pub lights: &'a [Light],
    /// World color: added to every triangle's light so nothing goes fully black.
    pub ambient: Vector3<f32>,
    /// Clamp accumulated light to [0, 1] per channel. When false, light may
    /// over-brighten the base color.
    pub clamp: bool,
}

impl<'a> LightEnvironment<'a> {
    pub fn new(lights: &'a [Light], ambient: Vector3<f32>) -> Self {
        Self {
            lights,
            ambient,
            clamp: true,
        }
    }

    /// Applies the ambient floor and the clamp policy to raw accumulated light.
    pub fn finish(&self, light: Vector3<f32>) -> Vector3<f32> {
        let total = light + self.ambient;
        if self.clamp {
            total.map(|c| c.clamp(0.0, 1.0))
        } else {
            total.map(|c| c.max(0.0))
        }
    }
}

/// Shader represents the lighting stage of the pipeline.
///
/// It runs once per emitted triangle, after screen clipping, and returns the
/// light arriving at the face. The triangle's `world` vertices and
/// `world_normal` are valid at that point even though its working vertices are
/// already in pixel space.
pub trait Shader {
    fn shade(&self, triangle: &Triangle, env: &LightEnvironment) -> Vector3<f32>;
}

/// The 2D drawing collaborator: fills one screen-space triangle.
///
/// Triangles arrive farthest first, so a plain overwrite gives the painter's
/// algorithm.
pub trait Canvas {
    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: [u8; 3]);
}

impl<F> Canvas for F
where
    F: FnMut([Point2<f32>; 3], [u8; 3]),
{
    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: [u8; 3]) {
        self(points, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ambient_is_a_floor() {
        let env = LightEnvironment::new(&[], Vector3::new(0.1, 0.2, 0.3));
        assert_relative_eq!(env.finish(Vector3::zeros()), Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn clamp_policy() {
        let mut env = LightEnvironment::new(&[], Vector3::repeat(0.5));
        assert_relative_eq!(env.finish(Vector3::repeat(1.0)), Vector3::repeat(1.0));
        env.clamp = false;
        assert_relative_eq!(env.finish(Vector3::repeat(1.0)), Vector3::repeat(1.5));
    }

    #[test]
    fn closures_are_canvases() {
        let mut filled = Vec::new();
        {
            let mut canvas = |pts: [Point2<f32>; 3], rgb: [u8; 3]| filled.push((pts, rgb));
            canvas.fill_triangle([Point2::origin(); 3], [1, 2, 3]);
        }
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].1, [1, 2, 3]);
    }
}
