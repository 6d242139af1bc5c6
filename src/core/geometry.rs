use crate::core::math::transform::{centroid, face_normal};
use nalgebra::{Point3, Vector2, Vector3};

/// Id carried by debug geometry (light markers and similar wireframes).
pub const DEBUG_ID: i32 = -1;

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in whatever space the owning triangle is currently in.
    pub position: Point3<f32>,
    /// Texture coordinates (UV). Carried through clipping, never sampled here.
    pub texcoord: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, texcoord: Vector2<f32>) -> Self {
        Self { position, texcoord }
    }
}

impl From<Point3<f32>> for Vertex {
    fn from(position: Point3<f32>) -> Self {
        Self::new(position, Vector2::zeros())
    }
}

/// A triangle flowing through the pipeline.
///
/// Every stage builds a new value instead of editing one in place. `vertices`
/// and `normal` describe the current stage's space (local, world, view or
/// screen); `world` and `world_normal` are fixed once the world stage has run
/// and are what lighting reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub normal: Vector3<f32>,
    pub world: [Point3<f32>; 3],
    pub world_normal: Vector3<f32>,
    /// Base color, linear RGB in [0, 1].
    pub color: Vector3<f32>,
    /// Light arriving at the face, per channel. Set by the shading step.
    pub lighting: Vector3<f32>,
    /// Cached result of a baking pass.
    pub baked: Option<Vector3<f32>>,
    pub id: i32,
}

impl Triangle {
    pub fn new(p1: Point3<f32>, p2: Point3<f32>, p3: Point3<f32>) -> Self {
        Self::from_vertices([p1.into(), p2.into(), p3.into()])
    }

    pub fn from_vertices(vertices: [Vertex; 3]) -> Self {
        let [a, b, c] = vertices.map(|v| v.position);
        let normal = face_normal(&a, &b, &c);
        Self {
            vertices,
            normal,
            world: [a, b, c],
            world_normal: normal,
            color: Vector3::repeat(1.0),
            lighting: Vector3::repeat(1.0),
            baked: None,
            id: 0,
        }
    }

    pub fn with_texcoords(mut self, uv: [Vector2<f32>; 3]) -> Self {
        for (v, t) in self.vertices.iter_mut().zip(uv) {
            v.texcoord = t;
        }
        self
    }

    #[inline]
    pub fn points(&self) -> [Point3<f32>; 3] {
        self.vertices.map(|v| v.position)
    }

    #[inline]
    pub fn p1(&self) -> Point3<f32> {
        self.vertices[0].position
    }

    #[inline]
    pub fn p2(&self) -> Point3<f32> {
        self.vertices[1].position
    }

    #[inline]
    pub fn p3(&self) -> Point3<f32> {
        self.vertices[2].position
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.points();
        centroid(&a, &b, &c)
    }

    pub fn world_centroid(&self) -> Point3<f32> {
        centroid(&self.world[0], &self.world[1], &self.world[2])
    }

    /// Average z of the current vertices.
    pub fn depth(&self) -> f32 {
        (self.p1().z + self.p2().z + self.p3().z) / 3.0
    }

    /// Largest z of the current vertices.
    pub fn furthest_depth(&self) -> f32 {
        self.p1().z.max(self.p2().z).max(self.p3().z)
    }

    /// Area of the triangle in its current space.
    pub fn area(&self) -> f32 {
        let [a, b, c] = self.points();
        (b - a).cross(&(c - a)).norm() * 0.5
    }

    /// Recomputes the current-space normal from the current vertices.
    pub fn face_normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.points();
        face_normal(&a, &b, &c)
    }

    /// Final color handed to the drawing collaborator.
    pub fn shaded_color(&self) -> Vector3<f32> {
        self.color.component_mul(&self.lighting)
    }

    /// Returns a copy with new vertices, keeping normal, world data, color and id.
    pub fn with_vertices(&self, vertices: [Vertex; 3]) -> Self {
        Self {
            vertices,
            ..self.clone()
        }
    }

    /// Returns a copy at new positions, texcoords and metadata kept.
    pub fn with_points(&self, points: [Point3<f32>; 3]) -> Self {
        let mut vertices = self.vertices;
        for (v, p) in vertices.iter_mut().zip(points) {
            v.position = p;
        }
        self.with_vertices(vertices)
    }

    /// Returns a copy with every position mapped through `f`; texcoords are kept.
    pub fn map_points<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Point3<f32>) -> Point3<f32>,
    {
        self.with_vertices(self.vertices.map(|v| Vertex::new(f(&v.position), v.texcoord)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 2.0, 3.0),
            Point3::new(2.0, 0.0, 5.0),
        )
    }

    #[test]
    fn new_triangle_has_unit_normal_and_world_copy() {
        let t = tri();
        assert_relative_eq!(t.normal.norm(), 1.0, epsilon = 1e-6);
        assert_eq!(t.world, t.points());
        assert_eq!(t.id, 0);
    }

    #[test]
    fn depth_keys() {
        let t = tri();
        assert_relative_eq!(t.depth(), 3.0);
        assert_relative_eq!(t.furthest_depth(), 5.0);
    }

    #[test]
    fn map_points_keeps_metadata() {
        let mut t = tri();
        t.id = 7;
        t.color = Vector3::new(0.5, 0.25, 1.0);
        let moved = t.map_points(|p| p + Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(moved.id, 7);
        assert_eq!(moved.color, t.color);
        assert_eq!(moved.world, t.world);
        assert_relative_eq!(moved.p1(), Point3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn shaded_color_multiplies_light() {
        let mut t = tri();
        t.color = Vector3::new(1.0, 0.5, 0.2);
        t.lighting = Vector3::repeat(0.5);
        assert_relative_eq!(t.shaded_color(), Vector3::new(0.5, 0.25, 0.1));
    }

    #[test]
    fn zero_area_triangle_is_tolerated() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let t = Triangle::new(p, p, p);
        assert_eq!(t.area(), 0.0);
        assert_eq!(t.normal, Vector3::zeros());
    }
}
