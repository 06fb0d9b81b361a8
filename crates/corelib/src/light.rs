//! Light parameters shared between input handling and the shader uniforms.

use std::{fmt, str::FromStr};

use crate::{CoreError, Vec3};

pub const MIN_INTENSITY: f32 = 0.0;
pub const MAX_INTENSITY: f32 = 2.0;
pub const INTENSITY_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    #[default]
    Point,
    Spotlight,
}

impl LightKind {
    /// Value of the `light_type` uniform.
    pub fn as_uniform(self) -> u32 {
        match self {
            LightKind::Directional => 0,
            LightKind::Point => 1,
            LightKind::Spotlight => 2,
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightKind::Directional => "Directional",
            LightKind::Point => "Point",
            LightKind::Spotlight => "Spotlight",
        };
        f.write_str(name)
    }
}

impl FromStr for LightKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "directional" | "dir" => Ok(LightKind::Directional),
            "point" => Ok(LightKind::Point),
            "spot" | "spotlight" => Ok(LightKind::Spotlight),
            other => Err(CoreError::UnknownLightKind(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightState {
    pub kind: LightKind,
    pub enabled: bool,
    pub intensity: f32,
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    /// Spotlight inner cone, degrees.
    pub cut_off_deg: f32,
    /// Spotlight outer cone, degrees.
    pub outer_cut_off_deg: f32,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            enabled: true,
            intensity: 1.0,
            position: Vec3::new(0.0, 1.5, 0.0),
            direction: Vec3::new(0.0, -1.0, -0.8),
            color: Vec3::ONE,
            cut_off_deg: 25.0,
            outer_cut_off_deg: 35.0,
        }
    }
}

impl LightState {
    /// Changes intensity by `delta`, clamped to `[MIN_INTENSITY, MAX_INTENSITY]`.
    /// Returns the new value.
    pub fn adjust_intensity(&mut self, delta: f32) -> f32 {
        self.intensity = (self.intensity + delta).clamp(MIN_INTENSITY, MAX_INTENSITY);
        self.intensity
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn cut_off_cos(&self) -> f32 {
        self.cut_off_deg.to_radians().cos()
    }

    pub fn outer_cut_off_cos(&self) -> f32 {
        self.outer_cut_off_deg.to_radians().cos()
    }
}
