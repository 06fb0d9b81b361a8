use crate::{Mat4, Vec3};

pub const MAX_PITCH_DEG: f32 = 89.0;
pub const MIN_PITCH_DEG: f32 = -89.0;
pub const FULL_TURN_DEG: f32 = 360.0;

/// Keys held during the current frame (W/S/A/D/Q/E).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl MoveInput {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.turn_left || self.turn_right
    }
}

/// Free-fly camera driven by yaw/pitch angles (degrees, right-handed, +Y up).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub up: Vec3,
    /// World units per second.
    pub speed: f32,
    /// Degrees per second for Q/E turning.
    pub rotation_speed: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw_deg: 270.0,
            pitch_deg: 0.0,
            up: Vec3::Y,
            speed: 3.0,
            rotation_speed: 200.0,
            mouse_sensitivity: 0.05,
        }
    }
}

impl FlyCamera {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Unit view direction derived from yaw and pitch.
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(self.up).normalize()
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), self.up)
    }

    /// Mouse look. Pitch is clamped so the view never flips over the pole.
    pub fn apply_mouse(&mut self, dx: f64, dy: f64) {
        let s = f64::from(self.mouse_sensitivity);
        self.yaw_deg += (dx * s) as f32;
        self.pitch_deg -= (dy * s) as f32;
        self.pitch_deg = self.pitch_deg.clamp(MIN_PITCH_DEG, MAX_PITCH_DEG);
        self.wrap_yaw();
    }

    /// Moves/turns according to held keys. Returns `true` if anything changed.
    pub fn apply_movement(&mut self, input: MoveInput, dt: f32) -> bool {
        if !input.any() {
            return false;
        }
        let step = self.speed * dt;
        let front = self.front();
        let right = self.right();

        if input.forward {
            self.position += front * step;
        }
        if input.back {
            self.position -= front * step;
        }
        if input.left {
            self.position -= right * step;
        }
        if input.right {
            self.position += right * step;
        }
        if input.turn_left {
            self.yaw_deg -= self.rotation_speed * dt;
        }
        if input.turn_right {
            self.yaw_deg += self.rotation_speed * dt;
        }
        self.wrap_yaw();
        true
    }

    fn wrap_yaw(&mut self) {
        let wrapped = self.yaw_deg.rem_euclid(FULL_TURN_DEG);
        // Tiny negatives round up to exactly one full turn.
        self.yaw_deg = if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped };
    }
}

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_y_deg: 45.0,
            aspect: width.max(1) as f32 / height.max(1) as f32,
            z_near: 0.01,
            z_far: 100.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// wgpu-style depth range (z in [0,1]); glam's `perspective_rh` already targets it.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = FlyCamera::default();
        let f = cam.front();
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(f.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::default();
        cam.apply_mouse(0.0, -100_000.0);
        assert_eq!(cam.pitch_deg, MAX_PITCH_DEG);
        cam.apply_mouse(0.0, 100_000.0);
        assert_eq!(cam.pitch_deg, MIN_PITCH_DEG);
    }

    #[test]
    fn yaw_wraps_both_directions() {
        let mut cam = FlyCamera::default();
        cam.apply_mouse(2000.0, 0.0); // +100 degrees
        assert_relative_eq!(cam.yaw_deg, 10.0, epsilon = 1e-3);
        cam.apply_mouse(-400.0, 0.0); // -20 degrees
        assert_relative_eq!(cam.yaw_deg, 350.0, epsilon = 1e-3);
    }

    #[test]
    fn tiny_negative_yaw_stays_below_full_turn() {
        let mut cam = FlyCamera {
            yaw_deg: -1e-6,
            ..FlyCamera::default()
        };
        cam.apply_mouse(0.0, 0.0);
        assert!((0.0..FULL_TURN_DEG).contains(&cam.yaw_deg), "{}", cam.yaw_deg);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut cam = FlyCamera::default();
        let moved = cam.apply_movement(
            MoveInput {
                forward: true,
                ..Default::default()
            },
            0.5,
        );
        assert!(moved);
        assert_relative_eq!(cam.position.z, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn strafe_right_moves_positive_x() {
        let mut cam = FlyCamera::default();
        cam.apply_movement(
            MoveInput {
                right: true,
                ..Default::default()
            },
            1.0,
        );
        assert_relative_eq!(cam.position.x, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn idle_input_reports_no_change() {
        let mut cam = FlyCamera::default();
        assert!(!cam.apply_movement(MoveInput::default(), 1.0));
        assert_eq!(cam, FlyCamera::default());
    }

    #[test]
    fn turning_uses_rotation_speed() {
        let mut cam = FlyCamera::default();
        cam.apply_movement(
            MoveInput {
                turn_right: true,
                ..Default::default()
            },
            0.1,
        );
        assert_relative_eq!(cam.yaw_deg, 290.0, epsilon = 1e-3);
    }

    #[test]
    fn projection_aspect_follows_size() {
        let mut p = Projection::new(800, 600);
        assert_relative_eq!(p.aspect, 800.0 / 600.0);
        p.resize(100, 0);
        assert_relative_eq!(p.aspect, 100.0);
    }
}
