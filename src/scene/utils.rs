use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Analyzes the mesh's bounding box and moves all vertices so that the mesh is
/// centered at (0,0,0) and its largest extent is `size`.
///
/// Returns the original center and the scaling factor used.
pub fn normalize_and_center(mesh: &mut Mesh, size: f32) -> (Point3<f32>, f32) {
    let Some((min_bound, max_bound)) = bounds(mesh) else {
        return (Point3::origin(), 1.0);
    };

    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_dimension = extent.x.max(extent.y).max(extent.z);
    let scale_factor = if max_dimension > 1e-6 {
        size / max_dimension
    } else {
        1.0
    };

    for tri in &mut mesh.triangles {
        *tri = tri.map_points(|p| Point3::from((p - center) * scale_factor));
        tri.world = tri.points();
    }

    (center, scale_factor)
}

/// Scales the mesh's local geometry about its origin.
pub fn scale_mesh(mesh: &mut Mesh, scale: f32) {
    if scale == 1.0 {
        return;
    }
    for tri in &mut mesh.triangles {
        *tri = tri.map_points(|p| p * scale);
        tri.world = tri.points();
    }
}

/// Axis-aligned bounds of the mesh's local vertices, `None` when it is empty.
pub fn bounds(mesh: &Mesh) -> Option<(Point3<f32>, Point3<f32>)> {
    let mut points = mesh.triangles.iter().flat_map(|t| t.points());
    let first = points.next()?;
    Some(points.fold((first, first), |(lo, hi), p| {
        (
            Point3::from(lo.coords.inf(&p.coords)),
            Point3::from(hi.coords.sup(&p.coords)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn centers_and_fits() {
        let mut mesh = Mesh::cube(4.0);
        for tri in &mut mesh.triangles {
            *tri = tri.map_points(|p| p + Vector3::new(10.0, 0.0, 0.0));
        }
        let (center, scale) = normalize_and_center(&mut mesh, 2.0);
        assert_relative_eq!(center, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(scale, 0.5);

        let (lo, hi) = bounds(&mesh).unwrap();
        assert_relative_eq!(lo, Point3::new(-1.0, -1.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(hi, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn empty_mesh_is_left_alone() {
        let mut mesh = Mesh::new(Vec::new());
        assert_eq!(normalize_and_center(&mut mesh, 1.0), (Point3::origin(), 1.0));
        assert!(bounds(&mesh).is_none());
    }

    #[test]
    fn scaling_keeps_normals() {
        let mut mesh = Mesh::cube(1.0);
        let normals: Vec<_> = mesh.triangles.iter().map(|t| t.normal).collect();
        scale_mesh(&mut mesh, 3.0);
        let (lo, hi) = bounds(&mesh).unwrap();
        assert_relative_eq!(hi - lo, Vector3::repeat(3.0), epsilon = 1e-5);
        assert!(mesh.triangles.iter().zip(&normals).all(|(t, n)| t.normal == *n));
    }
}
