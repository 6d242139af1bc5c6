use crate::core::math::transform::{rotate_vector_degrees, safe_normalize};
use nalgebra::{Point3, Vector3};

/// Represents a light source in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// A light at a position, fading linearly to nothing at `radius`.
    Point {
        position: Point3<f32>,
        strength: f32,
        radius: f32,
        color: Vector3<f32>,
    },
    /// A light source that is infinitely far away.
    /// Rays are parallel and do not fade.
    Sun {
        /// Direction the light travels (unit length).
        direction: Vector3<f32>,
        strength: f32,
        color: Vector3<f32>,
    },
}

impl Light {
    /// Creates a white point light.
    pub fn new_point(position: Point3<f32>, strength: f32, radius: f32) -> Self {
        Self::Point {
            position,
            strength,
            radius,
            color: Vector3::repeat(1.0),
        }
    }

    /// Creates a white sun travelling along `direction`.
    pub fn new_sun(direction: Vector3<f32>, strength: f32) -> Self {
        Self::Sun {
            direction: safe_normalize(direction),
            strength,
            color: Vector3::repeat(1.0),
        }
    }

    /// Creates a sun whose direction is +Z rotated by `angles` (pitch, yaw, roll
    /// in degrees, the same order meshes use).
    pub fn sun_from_angles(angles: Vector3<f32>, strength: f32) -> Self {
        Self::new_sun(rotate_vector_degrees(&Vector3::z(), &angles), strength)
    }

    pub fn with_color(mut self, new_color: Vector3<f32>) -> Self {
        match &mut self {
            Light::Point { color, .. } | Light::Sun { color, .. } => *color = new_color,
        }
        self
    }

    pub fn color(&self) -> Vector3<f32> {
        match self {
            Light::Point { color, .. } | Light::Sun { color, .. } => *color,
        }
    }

    /// Scalar contribution of this light to a face with unit `normal` whose
    /// center is at `centroid`, both in world space.
    pub fn contribution(&self, normal: &Vector3<f32>, centroid: &Point3<f32>) -> f32 {
        match self {
            Light::Point {
                position,
                strength,
                radius,
                ..
            } => {
                let to_light = position - centroid;
                let facing = normal.dot(&safe_normalize(to_light)).max(0.0);
                strength * facing * attenuation(to_light.norm(), *radius)
            }
            Light::Sun {
                direction,
                strength,
                ..
            } => strength * normal.dot(&-direction).max(0.0),
        }
    }

    /// Colored contribution, `color * contribution`.
    pub fn illuminate(&self, normal: &Vector3<f32>, centroid: &Point3<f32>) -> Vector3<f32> {
        self.color() * self.contribution(normal, centroid)
    }
}

/// Linear falloff: 1 at the light, 0 at and beyond `radius`.
#[inline]
pub fn attenuation(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    1.0 - (distance / radius).clamp(0.0, 1.0)
}
