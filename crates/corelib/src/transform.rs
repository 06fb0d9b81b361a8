use crate::{Mat4, Quat, Vec3};

/// Placement of a scene object: translation, rotation and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Spin in the XY plane, as used by the flat stages.
    #[inline]
    pub fn from_rotation_z(radians: f32) -> Self {
        Self {
            rotation: Quat::from_rotation_z(radians),
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    /// T * R * S.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
