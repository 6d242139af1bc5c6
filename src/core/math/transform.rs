use nalgebra::{Matrix4, Point2, Point3, Vector3};

const EPSILON: f32 = 1e-6;

//=================================
// Vector helpers
//=================================

/// Normalizes `v`, returning it unchanged when its length is zero.
#[inline]
pub fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.norm();
    if len > 0.0 { v / len } else { v }
}

/// Unit normal of the triangle (a, b, c): `normalize((b - a) x (c - a))`.
/// Degenerate triangles yield the zero vector.
#[inline]
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    safe_normalize((b - a).cross(&(c - a)))
}

#[inline]
pub fn centroid(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Point3<f32> {
    Point3::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Applies an affine matrix to a point (implicit w = 1, no perspective divide).
#[inline]
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    let v = m * p.to_homogeneous();
    Point3::new(v.x, v.y, v.z)
}

/// Rotates a direction by Euler angles in degrees using the engine's fixed order.
pub fn rotate_vector_degrees(v: &Vector3<f32>, rotation_deg: &Vector3<f32>) -> Vector3<f32> {
    let m = TransformFactory::euler_degrees(rotation_deg);
    m.fixed_view::<3, 3>(0, 0) * v
}

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the handful of affine matrices the pipeline needs.
///
/// Column-vector convention (`M * p`). View space looks down +Z, which is what
/// the near-plane clip and the `x / z` projection expect.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around an arbitrary axis using Rodrigues' rotation formula.
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let axis_unit = safe_normalize(*axis);
        let x = axis_unit.x;
        let y = axis_unit.y;
        let z = axis_unit.z;
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;

        Matrix4::new(
            t * x * x + c,     t * x * y - z * s, t * x * z + y * s, 0.0,
            t * x * y + z * s, t * y * y + c,     t * y * z - x * s, 0.0,
            t * x * z - y * s, t * y * z + x * s, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        )
    }

    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Mesh rotation from Euler angles in degrees: `Rx * Ry * Rz`.
    /// A point is rotated about Z first, then Y, then X.
    pub fn euler_degrees(rotation_deg: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_x(rotation_deg.x.to_radians())
            * Self::rotation_y(rotation_deg.y.to_radians())
            * Self::rotation_z(rotation_deg.z.to_radians())
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Model matrix for an object rotated by Euler degrees, then moved to `position`.
    pub fn pose(position: &Vector3<f32>, rotation_deg: &Vector3<f32>) -> Matrix4<f32> {
        Self::translation(position) * Self::euler_degrees(rotation_deg)
    }

    /// Orthonormal camera basis `(right, up, forward)` for an eye looking at `target`.
    ///
    /// The up vector has its component along forward removed. If nothing is left
    /// (up parallel to forward) a fallback axis is used instead.
    pub fn basis(
        eye: &Point3<f32>,
        target: &Point3<f32>,
        up: &Vector3<f32>,
    ) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
        let forward = safe_normalize(target - eye);

        let mut new_up = up - forward * up.dot(&forward);
        if new_up.norm() < EPSILON {
            let fallback = if forward.z.abs() > 0.9 { Vector3::y() } else { Vector3::z() };
            new_up = fallback - forward * fallback.dot(&forward);
        }
        let new_up = safe_normalize(new_up);
        let right = new_up.cross(&forward);

        (right, new_up, forward)
    }

    /// Creates a View matrix (Look-At, +Z forward).
    /// Transforms world space coordinates to camera/view space.
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        let (r, u, f) = Self::basis(eye, target, up);
        let e = eye.coords;

        Matrix4::new(
            r.x, r.y, r.z, -e.dot(&r),
            u.x, u.y, u.z, -e.dot(&u),
            f.x, f.y, f.z, -e.dot(&f),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Inverse of [`TransformFactory::look_at`]: places an object at `eye` facing `target`.
    pub fn point_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        let (r, u, f) = Self::basis(eye, target, up);

        Matrix4::new(
            r.x, u.x, f.x, eye.x,
            r.y, u.y, f.y, eye.y,
            r.z, u.z, f.z, eye.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

//=================================
// Perspective projection
//=================================

/// Constants for the formula-based perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Height / width.
    pub aspect: f32,
    /// `1 / tan(fov / 2)`.
    pub tan_factor: f32,
    pub near: f32,
    pub far: f32,
    pub width: f32,
    pub height: f32,
}

impl Projection {
    pub fn new(fov_rad: f32, width: f32, height: f32, near: f32, far: f32) -> Self {
        Self {
            aspect: height / width,
            tan_factor: 1.0 / (fov_rad / 2.0).tan(),
            near,
            far,
            width,
            height,
        }
    }

    /// Depth scale `q = far / (far - near)`.
    #[inline]
    pub fn q(&self) -> f32 {
        self.far / (self.far - self.near)
    }

    /// View space -> NDC.
    ///
    /// Returns `None` when `z == 0`; such a vertex should have been removed by the
    /// near-plane clip.
    #[inline]
    pub fn project_point(&self, p: &Point3<f32>) -> Option<Point3<f32>> {
        if p.z == 0.0 {
            return None;
        }
        let q = self.q();
        Some(Point3::new(
            (self.aspect * self.tan_factor * p.x) / p.z,
            (self.tan_factor * p.y) / p.z,
            q * p.z - q * self.near,
        ))
    }

    /// NDC -> pixel space: translate by (+1, +1) and scale by half the viewport.
    /// Depth passes through untouched.
    #[inline]
    pub fn to_screen(&self, ndc: &Point3<f32>) -> Point3<f32> {
        let p = ndc_to_screen(ndc.x, ndc.y, self.width, self.height);
        Point3::new(p.x, p.y, ndc.z)
    }
}

/// Converts NDC coordinates to screen coordinates (Viewport Transform).
/// View-space +Y maps to increasing pixel rows.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (ndc_y + 1.0) * 0.5 * height)
}
