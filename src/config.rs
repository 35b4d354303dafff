use {
    crate::camera::{CameraInfo, DEFAULT_ZOOM_BOUND, MIN_ZOOM},
    directories::ProjectDirs,
    glam::Vec3,
    log::{info, trace, warn},
    serde::{de::DeserializeOwned, Deserialize, Serialize},
    std::{
        fmt::Debug,
        fs::{create_dir_all, metadata, read_to_string, write},
        io::{Error, ErrorKind},
        path::{Path, PathBuf},
    },
};

pub const APPLICATION: &str = "Flycam";
pub const ORGANIZATION: &str = "Flycam";
pub const QUALIFIER: &str = "com";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

fn default_aspect_ratio() -> f32 {
    4.0 / 3.0
}

fn default_frame_time() -> f32 {
    0.05
}

fn default_light_position() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_mouse_sensitivity() -> f32 {
    0.05
}

fn default_movement_speed() -> f32 {
    2.5
}

fn default_pitch_bound() -> bool {
    true
}

fn default_planar_lock() -> bool {
    false
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, 3.0]
}

fn default_z_far() -> f32 {
    100.0
}

fn default_z_near() -> f32 {
    0.2
}

fn default_zoom_bound() -> f32 {
    DEFAULT_ZOOM_BOUND
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Config {
    /// Width divided by height of the viewport the projection is built for.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,

    /// Seconds of travel applied by a move event which does not give its own.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,

    #[serde(default = "default_light_position")]
    pub light_position: [f32; 3],

    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,

    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,

    #[serde(default = "default_pitch_bound")]
    pub pitch_bound: bool,

    #[serde(default = "default_planar_lock")]
    pub planar_lock: bool,

    /// Initial camera position.
    #[serde(default = "default_position")]
    pub position: [f32; 3],

    #[serde(default = "default_z_far")]
    pub z_far: f32,

    #[serde(default = "default_z_near")]
    pub z_near: f32,

    #[serde(default = "default_zoom_bound")]
    pub zoom_bound: f32,
}

impl Config {
    const FILE_NAME: &str = "config.toml";

    pub fn local_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_default()
            .join(Self::FILE_NAME)
    }

    /// Reads the config file from the platform data directory.
    pub fn read() -> Self {
        Self::read_from(Self::local_path())
    }

    /// Reads the config file at `path`, falling back to defaults, and clamps the values.
    pub fn read_from(path: impl AsRef<Path>) -> Self {
        let mut res: Self = read_path(path);
        res.clamp();

        res
    }

    fn clamp(&mut self) {
        fn finite_or_default(name: &str, value: &mut f32, default: fn() -> f32) {
            if !value.is_finite() {
                warn!("Invalid {name} {value}");

                *value = default();
            }
        }

        finite_or_default("frame time", &mut self.frame_time, default_frame_time);
        finite_or_default(
            "mouse sensitivity",
            &mut self.mouse_sensitivity,
            default_mouse_sensitivity,
        );
        finite_or_default(
            "movement speed",
            &mut self.movement_speed,
            default_movement_speed,
        );
        finite_or_default("zoom bound", &mut self.zoom_bound, default_zoom_bound);

        self.frame_time = self.frame_time.clamp(0.0, 1.0);
        self.zoom_bound = self.zoom_bound.max(MIN_ZOOM);

        if !self.aspect_ratio.is_normal() || self.aspect_ratio < 0.0 {
            warn!("Invalid aspect ratio {}", self.aspect_ratio);

            self.aspect_ratio = default_aspect_ratio();
        }

        if !(self.z_near > 0.0 && self.z_near < self.z_far && self.z_far.is_finite()) {
            warn!("Invalid depth range {}..{}", self.z_near, self.z_far);

            self.z_near = default_z_near();
            self.z_far = default_z_far();
        }

        for (name, position) in [
            ("position", &mut self.position),
            ("light position", &mut self.light_position),
        ] {
            if !position.iter().all(|value| value.is_finite()) {
                warn!("Invalid {name} {position:?}");

                *position = if name == "position" {
                    default_position()
                } else {
                    default_light_position()
                };
            }
        }
    }

    /// Returns the camera settings described by this config.
    pub fn camera_info(&self) -> CameraInfo {
        CameraInfo::new()
            .movement_sensitivity(self.mouse_sensitivity)
            .movement_speed(self.movement_speed)
            .planar_lock(self.planar_lock)
            .position(Vec3::from_array(self.position))
            .zoom(self.zoom_bound)
            .build()
    }

    pub fn light_position(&self) -> Vec3 {
        Vec3::from_array(self.light_position)
    }

    pub fn write(&self) -> Result<(), Error> {
        self.write_to(Self::local_path())
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        if let Some(dir) = path.as_ref().parent() {
            create_dir_all(dir)?;
        }

        write_path(path, self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            frame_time: default_frame_time(),
            light_position: default_light_position(),
            mouse_sensitivity: default_mouse_sensitivity(),
            movement_speed: default_movement_speed(),
            pitch_bound: default_pitch_bound(),
            planar_lock: default_planar_lock(),
            position: default_position(),
            z_far: default_z_far(),
            z_near: default_z_near(),
            zoom_bound: default_zoom_bound(),
        }
    }
}

fn read_path<P, T>(path: P) -> T
where
    P: AsRef<Path>,
    T: Debug + Default + DeserializeOwned,
{
    let config = if metadata(path.as_ref()).is_err() {
        info!("Using default config file");

        Default::default()
    } else {
        info!("Reading {}", path.as_ref().display());

        let txt = read_to_string(path).unwrap_or_else(|_| {
            warn!("Unable to read file");

            Default::default()
        });

        toml::from_str(txt.as_str()).unwrap_or_else(|err| {
            warn!("Unable to parse file: {err}");

            Default::default()
        })
    };

    info!("{:#?}", config);

    config
}

fn write_path<P, T>(path: P, t: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
    T: Serialize,
{
    trace!("Writing {}", path.as_ref().display());

    write(
        path,
        toml::to_string(t).map_err(|_| Error::from(ErrorKind::InvalidData))?,
    )?;

    Ok(())
}
