use crate::core::geometry::Triangle;
use crate::core::math::interpolation::lerp_vertex;
use crate::core::math::transform::safe_normalize;
use nalgebra::{Point3, Vector3};

/// A half-space: everything on the side `normal` points to (plane included) is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Plane {
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            point,
            normal: safe_normalize(normal),
        }
    }

    /// The view-space near plane `z = near`, keeping z >= near.
    pub fn near(near: f32) -> Self {
        Self::new(Point3::new(0.0, 0.0, near), Vector3::z())
    }

    /// Signed distance of `p` from the plane.
    #[inline]
    pub fn distance(&self, p: &Point3<f32>) -> f32 {
        self.normal.dot(&p.coords) - self.normal.dot(&self.point.coords)
    }
}

/// The four screen-rectangle edges in pixel space with inward normals:
/// top (y = 0), bottom (y = height - 1), left (x = 0), right (x = width - 1).
pub fn screen_planes(width: f32, height: f32) -> [Plane; 4] {
    [
        Plane::new(Point3::origin(), Vector3::y()),
        Plane::new(Point3::new(0.0, height - 1.0, 0.0), -Vector3::y()),
        Plane::new(Point3::origin(), Vector3::x()),
        Plane::new(Point3::new(width - 1.0, 0.0, 0.0), -Vector3::x()),
    ]
}

/// Clips `tri` against `plane`, appending 0, 1 or 2 triangles to `output`.
///
/// Returns the number of triangles appended. Fragments keep the source
/// triangle's winding and inherit its normal, world data, color, lighting and id.
pub fn clip_triangle(plane: &Plane, tri: &Triangle, output: &mut Vec<Triangle>) -> usize {
    let v = &tri.vertices;
    let d = v.map(|vert| plane.distance(&vert.position));
    let inside = d.map(|dist| dist >= 0.0);
    let inside_count = inside.iter().filter(|&&i| i).count();

    // Point on edge a -> b where it crosses the plane. a and b sit on opposite
    // sides, so the denominator cannot vanish.
    let intersect = |a: usize, b: usize| lerp_vertex(&v[a], &v[b], d[a] / (d[a] - d[b]));

    match inside_count {
        0 => 0,
        3 => {
            output.push(tri.clone());
            1
        }
        1 => {
            // Rotate so `a` is the inside vertex; (a, b, c) keeps the winding.
            let a = inside.iter().position(|&i| i).unwrap_or(0);
            let (b, c) = ((a + 1) % 3, (a + 2) % 3);
            output.push(tri.with_vertices([v[a], intersect(a, b), intersect(a, c)]));
            1
        }
        2 => {
            // Rotate so `a` is the outside vertex; b and c are inside.
            let a = inside.iter().position(|&i| !i).unwrap_or(0);
            let (b, c) = ((a + 1) % 3, (a + 2) % 3);
            let ab = intersect(a, b);
            let ca = intersect(c, a);
            // Quad b, c, ca, ab. The diagonal runs from the lower-indexed
            // inside vertex to the crossing next to the other inside vertex.
            if b < c {
                output.push(tri.with_vertices([v[b], v[c], ca]));
                output.push(tri.with_vertices([v[b], ca, ab]));
            } else {
                output.push(tri.with_vertices([v[c], ab, v[b]]));
                output.push(tri.with_vertices([v[c], ca, ab]));
            }
            2
        }
        n => unreachable!("a triangle has three vertices, found {n} inside"),
    }
}

/// Convenience wrapper around [`clip_triangle`] that allocates its own output.
pub fn clip_to_vec(plane: &Plane, tri: &Triangle) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(2);
    clip_triangle(plane, tri, &mut out);
    out
}

/// Clips `tri` successively against every plane, each plane operating on the
/// fragments produced by the previous one. Results are appended to `output`.
///
/// Uses a double-buffering strategy for the fragment lists to keep allocations
/// out of the per-plane loop.
pub fn clip_against_planes(planes: &[Plane], tri: &Triangle, output: &mut Vec<Triangle>) {
    let mut current: Vec<Triangle> = Vec::with_capacity(8);
    let mut next: Vec<Triangle> = Vec::with_capacity(8);
    current.push(tri.clone());

    for plane in planes {
        if current.is_empty() {
            return;
        }
        next.clear();
        for t in &current {
            clip_triangle(plane, t, &mut next);
        }
        std::mem::swap(&mut current, &mut next);
    }

    output.append(&mut current);
}
