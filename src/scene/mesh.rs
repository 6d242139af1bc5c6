use crate::core::geometry::Triangle;
use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use std::str::FromStr;

/// Lighting mode of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Base color as-is (plus ambient).
    Unlit,
    /// Lights evaluated every frame.
    #[default]
    Dynamic,
    /// Light cached by a baking pass and reused.
    Baked,
}

impl FromStr for Shading {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "unlit" => Ok(Shading::Unlit),
            "dynamic" | "lit" => Ok(Shading::Dynamic),
            "baked" | "static" => Ok(Shading::Baked),
            _ => Err(Error::UnknownShading(s.to_string())),
        }
    }
}

/// An ordered list of local-space triangles and the pose they are drawn at.
///
/// Triangle order is draw order before sorting.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub position: Vector3<f32>,
    /// Euler angles in degrees, see [`TransformFactory::euler_degrees`](crate::core::math::transform::TransformFactory::euler_degrees).
    pub rotation: Vector3<f32>,
    pub color: Vector3<f32>,
    pub id: i32,
    pub shading: Shading,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let mut mesh = Self {
            triangles,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            color: Vector3::repeat(1.0),
            id: 0,
            shading: Shading::default(),
        };
        mesh.set_color(mesh.color);
        mesh
    }

    /// Builds a mesh from vertex positions and 1-based triangle index triples.
    pub fn from_faces(vertices: &[Point3<f32>], faces: &[[usize; 3]]) -> Result<Self> {
        let lookup = |face: usize, index: usize| {
            index
                .checked_sub(1)
                .and_then(|i| vertices.get(i))
                .copied()
                .ok_or(Error::FaceIndexOutOfRange {
                    face,
                    index,
                    count: vertices.len(),
                })
        };

        let triangles = faces
            .iter()
            .enumerate()
            .map(|(f, [a, b, c])| {
                Ok(Triangle::new(lookup(f, *a)?, lookup(f, *b)?, lookup(f, *c)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(triangles))
    }

    /// Axis-aligned cube centered on the origin with edge length `scale`.
    /// Faces wind so their normals point outward.
    pub fn cube(scale: f32) -> Self {
        let h = scale * 0.5;
        let vertices = [
            Point3::new(-h, -h, -h),
            Point3::new(-h, h, -h),
            Point3::new(h, h, -h),
            Point3::new(h, -h, -h),
            Point3::new(-h, -h, h),
            Point3::new(-h, h, h),
            Point3::new(h, h, h),
            Point3::new(h, -h, h),
        ];
        #[rustfmt::skip]
        let faces = [
            [1, 2, 3], [1, 3, 4], // -z
            [8, 7, 6], [8, 6, 5], // +z
            [5, 6, 2], [5, 2, 1], // -x
            [4, 3, 7], [4, 7, 8], // +x
            [2, 6, 7], [2, 7, 3], // +y
            [5, 1, 4], [5, 4, 8], // -y
        ];
        let triangles = faces
            .iter()
            .map(|[a, b, c]| Triangle::new(vertices[a - 1], vertices[b - 1], vertices[c - 1]))
            .collect();
        Self::new(triangles)
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.set_color(color);
        self
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.set_id(id);
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    /// Recolors the mesh and every triangle in it.
    pub fn set_color(&mut self, color: Vector3<f32>) {
        self.color = color;
        for tri in &mut self.triangles {
            tri.color = color;
        }
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
        for tri in &mut self.triangles {
            tri.id = id;
        }
    }

    pub fn add_rotation(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    pub fn add_position(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Drops any cached baked light, e.g. after the mesh moved.
    pub fn clear_baked(&mut self) {
        for tri in &mut self.triangles {
            tri.baked = None;
        }
    }

    pub fn is_baked(&self) -> bool {
        !self.triangles.is_empty() && self.triangles.iter().all(|t| t.baked.is_some())
    }
}
