use crate::core::geometry::Vertex;
use nalgebra::{Point2, Point3, Vector3};

const EPSILON: f32 = 1e-5;

/// Calculates the barycentric coordinates (alpha, beta, gamma) of point p
/// with respect to triangle (v1, v2, v3).
///
/// Returns `None` if the triangle is degenerate (area is near zero).
///
/// # Returns
/// A Vector3 where:
/// - x: alpha (weight for v1)
/// - y: beta  (weight for v2)
/// - z: gamma (weight for v3)
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;

    // Calculate the determinant (2x area of the triangle)
    let total_area_x2 = e1.x * e2.y - e1.y * e2.x;

    if total_area_x2.abs() < EPSILON {
        return None; // Degenerate triangle
    }

    let inv_total_area_x2 = 1.0 / total_area_x2;

    // Weight for v2: sub-triangle (p, v3, v1)
    let area2_x2 = p_v1.x * e2.y - p_v1.y * e2.x;
    let beta = area2_x2 * inv_total_area_x2;

    // Weight for v3: sub-triangle (p, v1, v2)
    let area3_x2 = e1.x * p_v1.y - e1.y * p_v1.x;
    let gamma = area3_x2 * inv_total_area_x2;

    let alpha = 1.0 - beta - gamma;

    Some(Vector3::new(alpha, beta, gamma))
}

/// Checks if the barycentric coordinates represent a point inside the triangle.
/// Returns true if alpha, beta, and gamma are all >= 0.
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Point in the screen-space triangle `(a, b, c)`, ignoring depth.
pub fn covers(p: Point2<f32>, a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> bool {
    barycentric_coordinates(p, a.xy(), b.xy(), c.xy()).is_some_and(is_inside_triangle)
}

/// Linear interpolation of a vertex along the segment `a -> b`.
#[inline]
pub fn lerp_vertex(a: &Vertex, b: &Vertex, t: f32) -> Vertex {
    Vertex {
        position: a.position + (b.position - a.position) * t,
        texcoord: a.texcoord * (1.0 - t) + b.texcoord * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    #[test]
    fn barycentric_of_vertex_is_unit() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(0.0, 4.0);
        let bary = barycentric_coordinates(b, a, b, c).unwrap();
        assert_relative_eq!(bary, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn degenerate_triangle_has_no_barycentrics() {
        let a = Point2::new(1.0, 1.0);
        assert!(barycentric_coordinates(a, a, a, a).is_none());
    }

    #[test]
    fn covers_ignores_winding() {
        let a = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(4.0, 0.0, 1.0);
        let c = Point3::new(0.0, 4.0, 1.0);
        let p = Point2::new(1.0, 1.0);
        assert!(covers(p, &a, &b, &c));
        assert!(covers(p, &a, &c, &b));
        assert!(!covers(Point2::new(3.0, 3.0), &a, &b, &c));
    }

    #[test]
    fn lerp_interpolates_position_and_uv() {
        let a = Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector2::new(0.0, 0.0));
        let b = Vertex::new(Point3::new(2.0, 4.0, 6.0), Vector2::new(1.0, 1.0));
        let m = lerp_vertex(&a, &b, 0.25);
        assert_relative_eq!(m.position, Point3::new(0.5, 1.0, 1.5));
        assert_relative_eq!(m.texcoord, Vector2::new(0.25, 0.25));
    }
}
