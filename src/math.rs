use glam::{vec4, Mat4, Vec3};

/// Builds a right-handed view matrix looking from `eye` towards `target`.
///
/// The rotation rows are the camera axes (`x`, `y`, `z`) and the translation is `-eye` expressed
/// in those axes. The result is column-major, as used by OpenGL and `glam`, and agrees with
/// [`Mat4::look_at_rh`].
///
/// Zero-length inputs normalize to zero instead of producing NaN values.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let z = (eye - target).normalize_or_zero();

    // Positive x points to the right of the viewer
    let x = up.normalize_or_zero().cross(z).normalize_or_zero();
    let y = z.cross(x);

    Mat4::from_cols(
        vec4(x.x, y.x, z.x, 0.0),
        vec4(x.y, y.y, z.y, 0.0),
        vec4(x.z, y.z, z.z, 0.0),
        vec4(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0),
    )
}

/// Builds an OpenGL perspective projection (clip-space depth in `-1..=1`).
///
/// `fov_y` is the vertical field of view in degrees.
pub fn perspective(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Mat4 {
    debug_assert_ne!(aspect_ratio, 0.0);
    debug_assert_ne!(z_near, z_far);

    let half_tan = (fov_y.to_radians() * 0.5).tan();
    let depth = z_far - z_near;

    Mat4::from_cols(
        vec4(1.0 / (aspect_ratio * half_tan), 0.0, 0.0, 0.0),
        vec4(0.0, 1.0 / half_tan, 0.0, 0.0),
        vec4(0.0, 0.0, -(z_far + z_near) / depth, -1.0),
        vec4(0.0, 0.0, -(2.0 * z_far * z_near) / depth, 0.0),
    )
}
