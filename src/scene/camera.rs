use crate::core::math::transform::{Projection, TransformFactory, safe_normalize};
use nalgebra::{Matrix4, Point3, Vector3};

pub const DEFAULT_FOV_DEGREES: f32 = 90.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1500.0;

/// Pitch limit applied in first-person mode.
pub const FIRST_PERSON_PITCH_LIMIT: f32 = 160.0;

/// How the camera decides where it looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    /// Degrees. Forward is +Z pitched about X, then yawed about Y; roll turns
    /// the up vector about forward.
    Angles { yaw: f32, pitch: f32, roll: f32 },
    /// Look along a fixed direction wherever the camera moves.
    Direction(Vector3<f32>),
    /// Keep looking at a world location (third person).
    Target(Point3<f32>),
}

/// Position, orientation and lens of the active view.
///
/// Every setter recomputes the projection constants and the view matrix before
/// returning, so a frame rendered right after a change never sees stale state.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    orientation: Orientation,
    world_up: Vector3<f32>,
    fov_rad: f32,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
    first_person: bool,

    // --- Cached ---
    projection: Projection,
    forward: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    view_matrix: Matrix4<f32>,
}

impl Camera {
    /// Camera with 90° FOV, near 0.1 and far 1500, looking down +Z.
    pub fn new(position: Point3<f32>, width: u32, height: u32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        let fov_rad = DEFAULT_FOV_DEGREES.to_radians();
        let mut cam = Self {
            position,
            orientation: Orientation::Angles {
                yaw: 0.0,
                pitch: 0.0,
                roll: 0.0,
            },
            world_up: Vector3::y(),
            fov_rad,
            width,
            height,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            first_person: false,
            projection: Projection::new(fov_rad, width, height, DEFAULT_NEAR, DEFAULT_FAR),
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            view_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Builder-style lens override.
    pub fn with_clip(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_rad = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self.update_matrices();
        self
    }

    // ============ Setters ============

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        self.update_view();
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.set_position(self.position + offset);
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_rad = fov_degrees.to_radians();
        self.update_matrices();
    }

    pub fn set_yaw_pitch_roll(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.orientation = Orientation::Angles { yaw, pitch, roll };
        self.update_view();
    }

    pub fn set_target_direction(&mut self, direction: Vector3<f32>) {
        self.orientation = Orientation::Direction(direction);
        self.update_view();
    }

    pub fn set_target_location(&mut self, target: Point3<f32>) {
        self.orientation = Orientation::Target(target);
        self.update_view();
    }

    pub fn set_up_vector(&mut self, up: Vector3<f32>) {
        self.world_up = up;
        self.update_view();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
        self.update_matrices();
    }

    pub fn set_clip(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_matrices();
    }

    /// First-person mode clamps pitch to ±160° to avoid flipping over.
    pub fn set_first_person(&mut self, enabled: bool) {
        self.first_person = enabled;
        self.update_view();
    }

    /// Installs precomputed projection constants, skipping the trigonometry.
    /// They stay in effect until the FOV, viewport or clip distances change.
    pub fn set_projection_constants(&mut self, aspect: f32, tan_factor: f32) {
        self.projection.aspect = aspect;
        self.projection.tan_factor = tan_factor;
    }

    // ============ Accessors ============

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_rad.to_degrees()
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_first_person(&self) -> bool {
        self.first_person
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    // ============ Recalculation ============

    /// Recalculates projection constants and the view matrix.
    fn update_matrices(&mut self) {
        self.projection = Projection::new(self.fov_rad, self.width, self.height, self.near, self.far);
        self.update_view();
    }

    fn update_view(&mut self) {
        let (forward, up) = match self.orientation {
            Orientation::Angles { yaw, pitch, roll } => {
                let pitch = if self.first_person {
                    pitch.clamp(-FIRST_PERSON_PITCH_LIMIT, FIRST_PERSON_PITCH_LIMIT)
                } else {
                    pitch
                };
                let turn = TransformFactory::rotation_y(yaw.to_radians())
                    * TransformFactory::rotation_x(pitch.to_radians());
                let forward = turn.fixed_view::<3, 3>(0, 0) * Vector3::z();
                let roll_m = TransformFactory::rotation(&forward, roll.to_radians());
                let up = roll_m.fixed_view::<3, 3>(0, 0) * self.world_up;
                (forward, up)
            }
            Orientation::Direction(dir) => (safe_normalize(dir), self.world_up),
            Orientation::Target(target) => (safe_normalize(target - self.position), self.world_up),
        };

        let target = self.position + forward;
        let (right, up, forward) = TransformFactory::basis(&self.position, &target, &up);
        self.forward = forward;
        self.up = up;
        self.right = right;
        self.view_matrix = TransformFactory::look_at(&self.position, &target, &up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;
    use approx::assert_relative_eq;

    fn cam() -> Camera {
        Camera::new(Point3::origin(), 200, 100)
    }

    #[test]
    fn defaults() {
        let c = cam();
        assert_relative_eq!(c.fov_degrees(), 90.0, epsilon = 1e-4);
        assert_eq!(c.near(), DEFAULT_NEAR);
        assert_eq!(c.far(), DEFAULT_FAR);
        assert_relative_eq!(c.forward(), Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(c.projection().aspect, 0.5);
        assert_relative_eq!(c.projection().tan_factor, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn position_change_is_visible_immediately() {
        let mut c = cam();
        c.set_position(Point3::new(0.0, 0.0, -10.0));
        let p = transform_point(&c.view_matrix(), &Point3::origin());
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 10.0), epsilon = 1e-5);
    }

    #[test]
    fn viewport_change_updates_projection() {
        let mut c = cam();
        c.set_viewport(100, 100);
        assert_relative_eq!(c.projection().aspect, 1.0);
        assert_eq!(c.projection().width, 100.0);
    }

    #[test]
    fn yaw_turns_forward_about_y() {
        let mut c = cam();
        c.set_yaw_pitch_roll(90.0, 0.0, 0.0);
        assert_relative_eq!(c.forward(), Vector3::x(), epsilon = 1e-5);
        assert_relative_eq!(c.up(), Vector3::y(), epsilon = 1e-5);
    }

    #[test]
    fn target_location_faces_the_target() {
        let mut c = cam();
        c.set_target_location(Point3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(c.forward(), -Vector3::z(), epsilon = 1e-6);
        c.set_position(Point3::new(-5.0, 0.0, -5.0));
        assert_relative_eq!(c.forward(), Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn first_person_clamps_pitch() {
        let mut free = cam();
        free.set_yaw_pitch_roll(0.0, 170.0, 0.0);
        let mut fp = cam();
        fp.set_first_person(true);
        fp.set_yaw_pitch_roll(0.0, 170.0, 0.0);
        let mut limit = cam();
        limit.set_yaw_pitch_roll(0.0, FIRST_PERSON_PITCH_LIMIT, 0.0);
        assert_relative_eq!(fp.forward(), limit.forward(), epsilon = 1e-5);
        assert!((free.forward() - fp.forward()).norm() > 1e-3);
    }

    #[test]
    fn explicit_constants_survive_position_changes() {
        let mut c = cam();
        c.set_projection_constants(0.75, 2.0);
        c.translate(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(c.projection().aspect, 0.75);
        assert_eq!(c.projection().tan_factor, 2.0);
        c.set_fov(90.0);
        assert_relative_eq!(c.projection().tan_factor, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn up_vector_change_rebuilds_the_view() {
        let mut c = cam();
        c.set_target_direction(Vector3::z());
        c.set_up_vector(Vector3::x());
        assert_relative_eq!(c.up(), Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(c.right(), -Vector3::y(), epsilon = 1e-6);

        // World +X is now straight up in view space.
        let p = transform_point(&c.view_matrix(), &Point3::new(1.0, 0.0, 5.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 5.0), epsilon = 1e-6);
    }

    #[test]
    fn parallel_up_still_gives_a_basis() {
        let mut c = cam();
        c.set_target_direction(Vector3::y());
        assert_relative_eq!(c.right().norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(c.up().dot(&c.forward()), 0.0, epsilon = 1e-5);
    }
}
