//! Core types: math re-exports, Transform, fly camera, light state, FPS counter.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod error;
pub mod fps;
pub mod light;
pub mod transform;

pub use error::{CoreError, CoreResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let t = transform::Transform::from_translation(vec3(1.0, 2.0, 3.0)).with_scale(2.0);
        // Last column holds the translation, the diagonal the scale.
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let t = transform::Transform::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = camera::FlyCamera::default();
        let proj = camera::Projection::new(800, 600);
        let pv = proj.matrix() * cam.view();
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }
}
