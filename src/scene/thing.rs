use crate::core::math::transform::TransformFactory;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};

/// Where one copy of a thing sits: position plus Euler rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Placement {
    pub fn new(position: Vector3<f32>, rotation: Vector3<f32>) -> Self {
        Self { position, rotation }
    }
}

/// A named group of meshes sharing one pose offset.
///
/// A thing can be drawn more than once: every entry in `dupes` renders the
/// same meshes again at another placement without copying any geometry.
#[derive(Debug, Clone)]
pub struct Thing {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub position: Vector3<f32>,
    /// Degrees, added to each mesh's own rotation.
    pub rotation: Vector3<f32>,
    /// When set, the thing is turned so its local +Z points at this world
    /// location and `rotation` is ignored.
    pub target: Option<Point3<f32>>,
    pub dupes: Vec<Placement>,
}

impl Thing {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            target: None,
            dupes: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_target(mut self, target: Point3<f32>) -> Self {
        self.target = Some(target);
        self
    }

    /// Adds another copy of this thing at `position`/`rotation`.
    pub fn add_dupe(&mut self, position: Vector3<f32>, rotation: Vector3<f32>) {
        self.dupes.push(Placement::new(position, rotation));
    }

    /// The thing's own placement followed by every dupe.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        std::iter::once(Placement::new(self.position, self.rotation)).chain(self.dupes.iter().copied())
    }

    /// Object -> world matrix for `mesh` drawn at `placement`.
    ///
    /// Aimed things use a point-at matrix; the mesh's own rotation is still
    /// applied first. A target on top of the mesh leaves the aim undefined, so
    /// the Euler rotation is used instead.
    pub fn model_matrix(&self, mesh: &Mesh, placement: &Placement) -> Matrix4<f32> {
        let position = placement.position + mesh.position;
        let eye = Point3::from(position);
        match self.target {
            Some(target) if (target - eye).norm() > f32::EPSILON => {
                TransformFactory::point_at(&eye, &target, &Vector3::y())
                    * TransformFactory::euler_degrees(&mesh.rotation)
            }
            _ => {
                TransformFactory::pose(&position, &(placement.rotation + mesh.rotation))
            }
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles.len()).sum()
    }

    pub fn add_position(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Rotates the thing and every dupe by `delta`.
    pub fn add_rotation(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
        for dupe in &mut self.dupes {
            dupe.rotation += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;
    use approx::assert_relative_eq;

    #[test]
    fn mesh_pose_is_offset_by_thing() {
        let mesh = Mesh::cube(1.0)
            .with_position(Vector3::new(0.0, 1.0, 0.0))
            .with_rotation(Vector3::new(0.0, 0.0, 45.0));
        let thing = Thing::new("tower", vec![mesh])
            .with_position(Vector3::new(5.0, 0.0, 0.0))
            .with_rotation(Vector3::new(0.0, 90.0, 0.0));

        let model = thing.model_matrix(&thing.meshes[0], &Placement::new(thing.position, thing.rotation));
        let expected = TransformFactory::translation(&Vector3::new(5.0, 1.0, 0.0))
            * TransformFactory::euler_degrees(&Vector3::new(0.0, 90.0, 45.0));
        assert_relative_eq!(model, expected, epsilon = 1e-6);
        assert_eq!(thing.triangle_count(), 12);
    }

    #[test]
    fn placements_start_with_the_thing_itself() {
        let mut thing = Thing::new("tree", vec![Mesh::cube(1.0)]).with_position(Vector3::new(1.0, 0.0, 0.0));
        thing.add_dupe(Vector3::new(6.0, 0.0, 10.0), Vector3::new(0.0, 45.0, 0.0));
        thing.add_dupe(Vector3::new(-6.0, 0.0, 12.0), Vector3::new(0.0, 45.0, 0.0));

        let placements: Vec<Placement> = thing.placements().collect();
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].position, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(placements[2].position, Vector3::new(-6.0, 0.0, 12.0));

        thing.add_rotation(Vector3::new(0.0, 5.0, 0.0));
        assert_eq!(thing.dupes[0].rotation, Vector3::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn aimed_thing_points_local_z_at_target() {
        let thing = Thing::new("arrow", vec![Mesh::cube(1.0)])
            .with_position(Vector3::new(2.0, 0.0, 0.0))
            .with_rotation(Vector3::new(0.0, 123.0, 0.0))
            .with_target(Point3::new(12.0, 0.0, 0.0));
        let placement = thing.placements().next().unwrap_or_default();
        let model = thing.model_matrix(&thing.meshes[0], &placement);

        // Origin lands on the position, local +Z along (1, 0, 0).
        assert_relative_eq!(transform_point(&model, &Point3::origin()), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(
            transform_point(&model, &Point3::new(0.0, 0.0, 1.0)),
            Point3::new(3.0, 0.0, 0.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn target_on_the_thing_falls_back_to_rotation() {
        let thing = Thing::new("still", vec![Mesh::cube(1.0)]).with_target(Point3::origin());
        let model = thing.model_matrix(&thing.meshes[0], &Placement::default());
        assert_relative_eq!(model, Matrix4::identity(), epsilon = 1e-6);
    }
}
