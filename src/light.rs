use {
    glam::{vec3, Vec3},
    std::{
        error::Error,
        fmt::{Display, Formatter},
        ops::RangeInclusive,
        str::FromStr,
    },
};

const COEFFICIENT_RANGE: RangeInclusive<f32> = 0.0..=1.0;
const INTENSITY_RANGE: RangeInclusive<f32> = 0.0..=255.0;

fn check_range(value: f32, range: RangeInclusive<f32>) -> Result<f32, LightError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(LightError::OutOfRange { value, range })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LightError {
    /// A channel intensity or reflection coefficient was outside of its allowed range.
    OutOfRange {
        value: f32,
        range: RangeInclusive<f32>,
    },

    /// The given name is not one of red, green or blue.
    UnknownChannel(String),

    /// The given name is not one of diffuse, specular or all.
    UnknownComponent(String),
}

impl Display for LightError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { value, range } => write!(
                f,
                "Value {value} is outside of {}..={}",
                range.start(),
                range.end()
            ),
            Self::UnknownChannel(name) => write!(
                f,
                "Unknown channel name {name}, available channels are: red, green, blue"
            ),
            Self::UnknownComponent(name) => write!(
                f,
                "Unknown color type {name}, known types are specular, diffuse, all"
            ),
        }
    }
}

impl Error for LightError {}

/// Distance falloff coefficients of a point or spot light.
///
/// The light reaching a point `d` units away is scaled by `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Coefficients covering a range of light distances, sorted by distance.
    pub const TABLE: [(f32, Self); 12] = [
        (7.0, Self::new(1.0, 0.7, 1.8)),
        (13.0, Self::new(1.0, 0.35, 0.44)),
        (20.0, Self::new(1.0, 0.22, 0.20)),
        (32.0, Self::new(1.0, 0.14, 0.07)),
        (50.0, Self::new(1.0, 0.09, 0.032)),
        (65.0, Self::new(1.0, 0.07, 0.017)),
        (100.0, Self::new(1.0, 0.045, 0.0075)),
        (160.0, Self::new(1.0, 0.027, 0.0028)),
        (200.0, Self::new(1.0, 0.022, 0.0019)),
        (325.0, Self::new(1.0, 0.014, 0.0007)),
        (600.0, Self::new(1.0, 0.007, 0.0002)),
        (3250.0, Self::new(1.0, 0.0014, 0.000007)),
    ];

    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Returns the coefficients of the given table row.
    pub fn from_table(index: usize) -> Option<Self> {
        Self::TABLE.get(index).map(|(_, attenuation)| *attenuation)
    }

    /// Picks the table row for a light which should reach `distance` units.
    ///
    /// Distances past either end of the table use the first or last row; otherwise the first row
    /// whose distance is greater than `distance` is used.
    pub fn from_distance(distance: f32) -> Self {
        let (min_distance, first) = Self::TABLE[0];
        let (max_distance, last) = Self::TABLE[Self::TABLE.len() - 1];

        if distance >= max_distance {
            return last;
        }

        if distance <= min_distance {
            return first;
        }

        Self::TABLE
            .iter()
            .find(|(row_distance, _)| *row_distance > distance)
            .map(|(_, attenuation)| *attenuation)
            .unwrap_or(last)
    }

    /// Returns the light scale at `distance`, never brighter than the unattenuated light.
    pub fn factor(self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;

        (1.0 / denom).min(1.0)
    }
}

impl Display for Attenuation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "constant {}, linear {}, quadratic {}",
            self.constant, self.linear, self.quadratic
        )
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::TABLE[0].1
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

impl FromStr for Channel {
    type Err = LightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Self::Red),
            "green" | "g" => Ok(Self::Green),
            "blue" | "b" => Ok(Self::Blue),
            _ => Err(LightError::UnknownChannel(s.to_owned())),
        }
    }
}

/// Selects which sources of a [`PhongLight`] an update applies to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Component {
    Diffuse,
    Specular,
    All,
}

impl FromStr for Component {
    type Err = LightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diffuse" => Ok(Self::Diffuse),
            "specular" => Ok(Self::Specular),
            "all" => Ok(Self::All),
            _ => Err(LightError::UnknownComponent(s.to_owned())),
        }
    }
}

/// A colored light whose final color is its per-channel intensity scaled by per-channel
/// coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub attenuation: Attenuation,
    coefficients: Vec3,

    /// Cosine of the spot light cut-off angle.
    pub cut_off: f32,

    pub direction: Vec3,
    intensity: Vec3,
    pub position: Vec3,
}

impl LightSource {
    pub fn coefficients(&self) -> Vec3 {
        self.coefficients
    }

    /// Returns the mean of the red, green and blue coefficients.
    pub fn coefficient_average(&self) -> f32 {
        (self.coefficients.x + self.coefficients.y + self.coefficients.z) / 3.0
    }

    pub fn color(&self) -> Vec3 {
        self.intensity * self.coefficients
    }

    pub fn intensity(&self) -> Vec3 {
        self.intensity
    }

    /// Sets one channel coefficient, which must be within `0.0..=1.0`.
    pub fn set_coefficient(&mut self, channel: Channel, value: f32) -> Result<(), LightError> {
        self.coefficients[channel.index()] = check_range(value, COEFFICIENT_RANGE)?;

        Ok(())
    }

    /// Sets the spot light cut-off from an angle in degrees.
    pub fn set_cut_off(&mut self, degrees: f32) {
        self.cut_off = degrees.to_radians().cos();
    }

    /// Sets one channel intensity, which must be within `0.0..=255.0`.
    pub fn set_intensity(&mut self, channel: Channel, value: f32) -> Result<(), LightError> {
        self.intensity[channel.index()] = check_range(value, INTENSITY_RANGE)?;

        Ok(())
    }
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            attenuation: Attenuation::default(),
            coefficients: Vec3::ONE,
            cut_off: 12.5f32.to_radians().cos(),
            direction: vec3(0.0, -1.0, -0.1),
            intensity: Vec3::ONE,
            position: Vec3::Y,
        }
    }
}

impl Display for LightSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Light source: position {}, direction {}, intensity {}, coefficients {}, color {}, \
             cut off {}, attenuation {}",
            self.position,
            self.direction,
            self.intensity,
            self.coefficients,
            self.color(),
            self.cut_off,
            self.attenuation
        )
    }
}

/// Returns the diffuse light a surface with the given normal and reflection coefficients reflects.
///
/// Reflection coefficients must be within `0.0..=1.0`.
pub fn lambertian(light: &LightSource, diffuse: Vec3, normal: Vec3) -> Result<Vec3, LightError> {
    for value in diffuse.to_array() {
        check_range(value, COEFFICIENT_RANGE)?;
    }

    let cos_theta = normal
        .normalize_or_zero()
        .dot(light.direction.normalize_or_zero());

    Ok(light.intensity * diffuse * cos_theta)
}

/// Like [`lambertian`], with the color of an ambient light added on top.
pub fn lambertian_ambient(
    light: &LightSource,
    ambient: &LightSource,
    diffuse: Vec3,
    normal: Vec3,
) -> Result<Vec3, LightError> {
    Ok(lambertian(light, diffuse, normal)? + ambient.color())
}

/// The ambient, diffuse and specular sources a Phong shader needs for one light.
///
/// The diffuse and specular sources share this light's placement and falloff.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhongLight {
    pub ambient: LightSource,
    diffuse: LightSource,
    specular: LightSource,
}

impl PhongLight {
    pub fn attenuation(&self) -> Attenuation {
        self.diffuse.attenuation
    }

    pub fn cut_off(&self) -> f32 {
        self.diffuse.cut_off
    }

    pub fn diffuse(&self) -> &LightSource {
        &self.diffuse
    }

    pub fn direction(&self) -> Vec3 {
        self.diffuse.direction
    }

    pub fn position(&self) -> Vec3 {
        self.diffuse.position
    }

    pub fn specular(&self) -> &LightSource {
        &self.specular
    }

    fn sources_mut(&mut self, component: Component) -> impl Iterator<Item = &mut LightSource> {
        let (diffuse, specular) = match component {
            Component::Diffuse => (Some(&mut self.diffuse), None),
            Component::Specular => (None, Some(&mut self.specular)),
            Component::All => (Some(&mut self.diffuse), Some(&mut self.specular)),
        };

        diffuse.into_iter().chain(specular)
    }

    pub fn set_attenuation(&mut self, attenuation: Attenuation) {
        for source in self.sources_mut(Component::All) {
            source.attenuation = attenuation;
        }
    }

    pub fn set_coefficient(
        &mut self,
        component: Component,
        channel: Channel,
        value: f32,
    ) -> Result<(), LightError> {
        for source in self.sources_mut(component) {
            source.set_coefficient(channel, value)?;
        }

        Ok(())
    }

    /// Sets the cut-off of both sources from an angle in degrees.
    pub fn set_cut_off(&mut self, degrees: f32) {
        for source in self.sources_mut(Component::All) {
            source.set_cut_off(degrees);
        }
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        for source in self.sources_mut(Component::All) {
            source.direction = direction;
        }
    }

    pub fn set_intensity(
        &mut self,
        component: Component,
        channel: Channel,
        value: f32,
    ) -> Result<(), LightError> {
        for source in self.sources_mut(component) {
            source.set_intensity(channel, value)?;
        }

        Ok(())
    }

    pub fn set_position(&mut self, position: Vec3) {
        for source in self.sources_mut(Component::All) {
            source.position = position;
        }
    }
}

impl Display for PhongLight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Phong light: position {}, direction {}, ambient {}, diffuse {}, specular {}, \
             cut off {}, attenuation {}",
            self.position(),
            self.direction(),
            self.ambient.color(),
            self.diffuse.color(),
            self.specular.color(),
            self.cut_off(),
            self.attenuation()
        )
    }
}
