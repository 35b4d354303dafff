use {
    crate::math::{look_at, perspective},
    bytemuck::{Pod, Zeroable},
    derive_builder::{Builder, UninitializedFieldError},
    glam::{Mat4, Vec3, Vec4},
    std::{
        error::Error,
        fmt::{Display, Formatter},
        str::FromStr,
    },
};

/// Default upper bound of [`Camera::zoom_in_out`].
pub const DEFAULT_ZOOM_BOUND: f32 = 45.0;

/// Lowest zoom (field of view, in degrees) a camera will settle on.
pub const MIN_ZOOM: f32 = 1.0;

/// Pitch limit applied by [`Camera::look_around`] when bounding is requested.
///
/// Kept strictly inside ±90° so that `front` never becomes parallel to the world up vector.
pub const PITCH_BOUND: f32 = 89.9;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CameraError {
    /// The given movement direction name is not one of [`Direction::ALL`].
    InvalidArgument(String),
}

impl Display for CameraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(direction) => write!(
                f,
                "Unknown direction {direction}, available moves are forward, backward, left, right"
            ),
        }
    }
}

impl Error for CameraError {}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Forward, Self::Backward, Self::Left, Self::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CameraError;

    /// Parses a direction name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CameraError::InvalidArgument(s.to_owned()))
    }
}

/// A free-fly camera driven by discrete move requests, look deltas and zoom deltas.
///
/// `front`, `right` and `up` always form an orthonormal basis derived from `yaw`, `pitch` and
/// `world_up`; every operation which changes those inputs rebuilds the basis before returning.
///
/// The camera performs no synchronization. Callers which share one between threads must
/// serialize access themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    front: Vec3,
    movement_sensitivity: f32,
    movement_speed: f32,
    pitch: f32,
    planar_lock: bool,
    position: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    zoom: f32,
}

impl Camera {
    pub fn new(info: impl Into<CameraInfo>) -> Self {
        let info = info.into();
        let mut res = Self {
            front: Vec3::NEG_Z,
            movement_sensitivity: info.movement_sensitivity,
            movement_speed: info.movement_speed,
            pitch: info.pitch,
            planar_lock: info.planar_lock,
            position: info.position,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: info.world_up,
            yaw: info.yaw,
            zoom: info.zoom,
        };
        res.update_orientation();

        res
    }

    /// Recomputes `front`, `right` and `up` from the current yaw, pitch and world up vector.
    pub fn update_orientation(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        self.front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Moves the camera along its own axes for `dt` seconds of travel.
    ///
    /// With planar lock enabled the resulting position is pinned to the `y = 0` plane.
    pub fn translate(&mut self, direction: Direction, dt: f32) {
        let velocity = self.movement_speed * dt;

        match direction {
            Direction::Forward => self.position += self.front * velocity,
            Direction::Backward => self.position -= self.front * velocity,
            Direction::Right => self.position += self.right * velocity,
            Direction::Left => self.position -= self.right * velocity,
        }

        if self.planar_lock {
            self.position.y = 0.0;
        }
    }

    /// Moves the camera using a direction name such as `"forward"` (case is ignored).
    ///
    /// The camera is left untouched when the name is not recognized.
    pub fn translate_named(&mut self, direction: &str, dt: f32) -> Result<(), CameraError> {
        self.translate(direction.parse()?, dt);

        Ok(())
    }

    /// Turns the camera by raw input offsets, scaled by the movement sensitivity.
    pub fn look_around(&mut self, x_offset: f32, y_offset: f32, pitch_bound: bool) {
        self.yaw += x_offset * self.movement_sensitivity;
        self.pitch += y_offset * self.movement_sensitivity;

        if pitch_bound {
            self.pitch = self.pitch.clamp(-PITCH_BOUND, PITCH_BOUND);
        }

        self.update_orientation();
    }

    /// Zooms by `y_offset` degrees, positive offsets zoom in.
    ///
    /// A zoom inside `MIN_ZOOM..=zoom_bound` is offset and held within that range. A zoom which is
    /// already outside the range (only reachable through construction or [`Self::set_zoom`]) snaps
    /// to the nearest bound and ignores the offset of that call.
    pub fn zoom_in_out(&mut self, y_offset: f32, zoom_bound: f32) {
        if (MIN_ZOOM..=zoom_bound).contains(&self.zoom) {
            self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, zoom_bound);
        } else if self.zoom <= MIN_ZOOM {
            self.zoom = MIN_ZOOM;
        } else {
            self.zoom = zoom_bound;
        }
    }

    /// Returns the world-to-view transform for the current pose.
    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.position + self.front, self.up)
    }

    /// Returns a perspective projection using the current zoom as the vertical field of view.
    pub fn projection_matrix(&self, aspect_ratio: f32, z_near: f32, z_far: f32) -> Mat4 {
        perspective(self.zoom, aspect_ratio, z_near, z_far)
    }

    /// Returns the per-frame uniform data a shader program needs from this camera.
    pub fn uniform(&self, aspect_ratio: f32, z_near: f32, z_far: f32) -> CameraUniform {
        CameraUniform {
            projection: self.projection_matrix(aspect_ratio, z_near, z_far),
            view: self.view_matrix(),
            position: self.position.extend(1.0),
        }
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn movement_sensitivity(&self) -> f32 {
        self.movement_sensitivity
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn planar_lock(&self) -> bool {
        self.planar_lock
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_movement_sensitivity(&mut self, movement_sensitivity: f32) {
        self.movement_sensitivity = movement_sensitivity;
    }

    pub fn set_movement_speed(&mut self, movement_speed: f32) {
        self.movement_speed = movement_speed;
    }

    pub fn set_planar_lock(&mut self, planar_lock: bool) {
        self.planar_lock = planar_lock;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Sets the reference up vector and rebuilds the camera axes.
    pub fn set_world_up(&mut self, world_up: Vec3) {
        self.world_up = world_up;
        self.update_orientation();
    }

    /// Sets both Euler angles (degrees) and rebuilds the camera axes. No clamping is applied.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.update_orientation();
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraInfo::default())
    }
}

impl Display for Camera {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera: position {}, yaw: {}, pitch: {}, world up: {}",
            self.position, self.yaw, self.pitch, self.world_up
        )
    }
}

/// Information used to create a [`Camera`] instance.
#[derive(Builder, Clone, Copy, Debug, PartialEq)]
#[builder(
    build_fn(private, name = "fallible_build", error = "CameraInfoBuilderError"),
    derive(Debug),
    pattern = "owned"
)]
pub struct CameraInfo {
    /// Scale applied to raw look-around offsets.
    #[builder(default = "0.05")]
    pub movement_sensitivity: f32,

    /// Travel speed in world units per second.
    #[builder(default = "2.5")]
    pub movement_speed: f32,

    /// Initial pitch in degrees.
    #[builder(default)]
    pub pitch: f32,

    /// Pins every move to the `y = 0` plane, as a first-person camera on flat ground.
    #[builder(default)]
    pub planar_lock: bool,

    /// Initial world space position.
    #[builder(default = "Vec3::ZERO")]
    pub position: Vec3,

    /// Reference up vector used to derive the camera axes.
    #[builder(default = "Vec3::Y")]
    pub world_up: Vec3,

    /// Initial yaw in degrees; the default of -90° looks down the negative z axis.
    #[builder(default = "-90.0")]
    pub yaw: f32,

    /// Initial zoom, which is the vertical field of view in degrees.
    #[builder(default = "DEFAULT_ZOOM_BOUND")]
    pub zoom: f32,
}

impl CameraInfo {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> CameraInfoBuilder {
        CameraInfoBuilder::default()
    }
}

impl Default for CameraInfo {
    fn default() -> Self {
        CameraInfoBuilder::default().build()
    }
}

// HACK: https://github.com/colin-kiegel/rust-derive-builder/issues/56
impl CameraInfoBuilder {
    /// Builds a new `CameraInfo`.
    pub fn build(self) -> CameraInfo {
        self.fallible_build()
            .expect("All required fields set at initialization")
    }
}

impl From<CameraInfoBuilder> for CameraInfo {
    fn from(info: CameraInfoBuilder) -> Self {
        info.build()
    }
}

#[derive(Debug)]
struct CameraInfoBuilderError;

impl From<UninitializedFieldError> for CameraInfoBuilderError {
    fn from(_: UninitializedFieldError) -> Self {
        Self
    }
}

/// Camera data laid out for direct upload into a uniform buffer.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CameraUniform {
    pub projection: Mat4,
    pub view: Mat4,
    pub position: Vec4,
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        glam::vec3,
        rand::{rngs::SmallRng, Rng, SeedableRng},
    };

    fn assert_approx(lhs: f32, rhs: f32) {
        assert!(
            lhs.is_finite() && rhs.is_finite() && (lhs - rhs).abs() < 1e-5,
            "{lhs} is not approximately {rhs}"
        );
    }

    fn assert_vec3_approx(lhs: Vec3, rhs: Vec3) {
        assert!(lhs.abs_diff_eq(rhs, 1e-5), "{lhs} is not approximately {rhs}");
    }

    fn assert_orthonormal(camera: &Camera) {
        let (front, right, up) = (camera.front(), camera.right(), camera.up());

        assert_approx(front.length(), 1.0);
        assert_approx(right.length(), 1.0);
        assert_approx(up.length(), 1.0);
        assert_approx(front.dot(right), 0.0);
        assert_approx(front.dot(up), 0.0);
        assert_approx(right.dot(up), 0.0);

        // Right-handed: right x up points backwards
        assert_vec3_approx(right.cross(up), -front);
    }

    #[test]
    pub fn default_looks_down_negative_z() {
        let camera = Camera::default();

        assert_vec3_approx(camera.front(), Vec3::NEG_Z);
        assert_vec3_approx(camera.right(), Vec3::X);
        assert_vec3_approx(camera.up(), Vec3::Y);
        assert_approx(camera.zoom(), 45.0);
    }

    #[test]
    pub fn orthonormal_basis() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut camera = Camera::default();

        for _ in 0..1_000 {
            let yaw = rng.gen_range(-10_000.0..10_000.0);
            let pitch = rng.gen_range(-PITCH_BOUND..=PITCH_BOUND);
            camera.set_yaw_pitch(yaw, pitch);

            assert_orthonormal(&camera);
        }
    }

    #[test]
    pub fn orthonormal_after_look_around() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut camera = Camera::default();

        for _ in 0..1_000 {
            camera.look_around(
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-500.0..500.0),
                true,
            );

            assert_orthonormal(&camera);
        }
    }

    #[test]
    pub fn pitch_bound() {
        let mut camera = Camera::default();

        for _ in 0..10 {
            camera.look_around(0.0, 1000.0, true);

            assert!(camera.pitch() <= PITCH_BOUND);
        }

        assert_approx(camera.pitch(), PITCH_BOUND);

        for _ in 0..10 {
            camera.look_around(0.0, -1000.0, true);

            assert!(camera.pitch() >= -PITCH_BOUND);
        }
    }

    #[test]
    pub fn pitch_unbounded() {
        let mut camera = Camera::default();

        camera.look_around(0.0, 1000.0, false);
        camera.look_around(0.0, 1000.0, false);

        assert!(camera.pitch() > 90.0);
        assert!(camera.front().is_finite());
    }

    #[test]
    pub fn look_around_scales_by_sensitivity() {
        let mut camera = Camera::new(CameraInfo::new().movement_sensitivity(0.5));

        camera.look_around(10.0, -4.0, true);

        assert_approx(camera.yaw(), -85.0);
        assert_approx(camera.pitch(), -2.0);
    }

    #[test]
    pub fn zoom_pinned_at_bound() {
        let mut camera = Camera::default();

        camera.zoom_in_out(-5.0, DEFAULT_ZOOM_BOUND);

        assert_eq!(camera.zoom(), 45.0);
    }

    #[test]
    pub fn zoom_in_and_floor() {
        let mut camera = Camera::default();

        camera.zoom_in_out(5.0, DEFAULT_ZOOM_BOUND);
        assert_approx(camera.zoom(), 40.0);

        camera.zoom_in_out(100.0, DEFAULT_ZOOM_BOUND);
        assert_eq!(camera.zoom(), MIN_ZOOM);

        camera.zoom_in_out(-2.0, DEFAULT_ZOOM_BOUND);
        assert_approx(camera.zoom(), 3.0);
    }

    #[test]
    pub fn zoom_out_of_range_snaps_to_bound() {
        let mut camera = Camera::new(CameraInfo::new().zoom(60.0));

        // The offset is ignored even though it would bring the zoom back in range
        camera.zoom_in_out(30.0, DEFAULT_ZOOM_BOUND);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM_BOUND);

        camera.set_zoom(0.25);
        camera.zoom_in_out(-10.0, DEFAULT_ZOOM_BOUND);
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    pub fn move_zero_dt() {
        let mut camera = Camera::new(CameraInfo::new().position(vec3(1.0, 2.0, 3.0)));

        camera.translate_named("forward", 0.0).unwrap();

        assert_eq!(camera.position(), vec3(1.0, 2.0, 3.0));
    }

    #[test]
    pub fn move_directions() {
        let mut camera = Camera::default();

        camera.translate(Direction::Forward, 1.0);
        assert_vec3_approx(camera.position(), vec3(0.0, 0.0, -2.5));

        camera.translate(Direction::Backward, 2.0);
        assert_vec3_approx(camera.position(), vec3(0.0, 0.0, 2.5));

        camera.translate(Direction::Right, 0.4);
        assert_vec3_approx(camera.position(), vec3(1.0, 0.0, 2.5));

        camera.translate(Direction::Left, 0.8);
        assert_vec3_approx(camera.position(), vec3(-1.0, 0.0, 2.5));
    }

    #[test]
    pub fn move_invalid_direction() {
        let mut camera = Camera::default();

        assert_eq!(
            camera.translate_named("diagonal", 1.0),
            Err(CameraError::InvalidArgument("diagonal".to_owned()))
        );
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    pub fn move_ignores_case() {
        let mut lhs = Camera::default();
        let mut rhs = Camera::default();

        lhs.translate_named("FORWARD", 1.0).unwrap();
        rhs.translate_named("forward", 1.0).unwrap();

        assert_eq!(lhs.position(), rhs.position());
        assert_eq!("bAcKwArD".parse::<Direction>(), Ok(Direction::Backward));
    }

    #[test]
    pub fn planar_lock() {
        let mut camera = Camera::new(
            CameraInfo::new()
                .planar_lock(true)
                .pitch(45.0)
                .position(vec3(0.0, 1.7, 0.0)),
        );

        assert!(camera.front().y > 0.5);

        for direction in Direction::ALL {
            camera.translate(direction, 0.7);

            assert_eq!(camera.position().y, 0.0);
        }
    }

    #[test]
    pub fn view_matrix() {
        let camera = Camera::new(CameraInfo::new().position(vec3(0.0, 0.0, 3.0)));

        assert_vec3_approx(camera.front(), Vec3::NEG_Z);

        let view = camera.view_matrix();
        let expected = Mat4::look_at_rh(vec3(0.0, 0.0, 3.0), vec3(0.0, 0.0, 2.0), Vec3::Y);

        assert!(view.abs_diff_eq(expected, 1e-5), "{view} != {expected}");
        assert!(view.abs_diff_eq(Mat4::from_translation(vec3(0.0, 0.0, -3.0)), 1e-5));
    }

    #[test]
    pub fn view_matrix_moves_world_into_view_space() {
        let mut camera = Camera::new(CameraInfo::new().position(vec3(2.0, 1.0, -4.0)));
        camera.look_around(600.0, 300.0, true);

        let view = camera.view_matrix();

        // The eye maps to the origin and the target lands on the negative z axis
        assert_vec3_approx(view.transform_point3(camera.position()), Vec3::ZERO);
        assert_vec3_approx(
            view.transform_point3(camera.position() + camera.front()),
            Vec3::NEG_Z,
        );
    }

    #[test]
    pub fn uniform_layout() {
        let camera = Camera::default();
        let uniform = camera.uniform(4.0 / 3.0, 0.2, 100.0);

        assert_eq!(bytemuck::bytes_of(&uniform).len(), 144);
        assert_eq!(uniform.view, camera.view_matrix());
        assert_eq!(uniform.position, Vec4::W);
    }

    #[test]
    pub fn display() {
        let camera = Camera::default();

        assert_eq!(
            camera.to_string(),
            "Camera: position [0, 0, 0], yaw: -90, pitch: 0, world up: [0, 1, 0]"
        );
    }
}
