use nalgebra::Vector3;

/// Clamps every channel into [0, 1].
#[inline]
pub fn clamp_color(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Converts a [0, 1] RGB color to 8-bit channels. Out-of-range values saturate.
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    let c = clamp_color(color) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}
