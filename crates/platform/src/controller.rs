//! Window-independent viewer state: reacts to input, advances per frame.

use asset::{Primitive, shapes};
use corelib::{
    Mat4,
    camera::{FlyCamera, Projection},
    fps::FpsCounter,
    light::{INTENSITY_STEP, LightState},
    transform::Transform,
};
use renderer::FrameParams;

use crate::{
    input::{Action, HeldKeys},
    stage::{Stage, StageFlags, ViewerOptions},
};

/// Polygon spin, radians per second.
pub const POLYGON_SPIN: f32 = 0.8;
/// Fixed tilt of the cube around +Z.
pub const CUBE_TILT_DEG: f32 = 45.0;

/// What the window layer must do after an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Exit,
    SetPrimitive(Primitive),
    /// Rebuild the polygon with this many corners.
    RebuildPolygon(u32),
}

/// Result of advancing one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    pub fps: Option<u32>,
    /// New model matrix for object 0, when the stage animates it.
    pub model: Option<Mat4>,
}

pub struct ViewerState {
    pub stage: Stage,
    pub flags: StageFlags,
    pub camera: FlyCamera,
    pub projection: Projection,
    pub light: LightState,
    pub held: HeldKeys,
    pub primitive: Primitive,
    pub vert_count: u32,
    fps: FpsCounter,
    elapsed: f32,
}

impl ViewerState {
    pub fn new(options: &ViewerOptions) -> Self {
        Self {
            stage: options.stage,
            flags: options.stage.flags(),
            camera: FlyCamera::default(),
            projection: Projection::new(options.width, options.height),
            light: LightState {
                kind: options.light,
                ..LightState::default()
            },
            held: HeldKeys::default(),
            primitive: Primitive::default(),
            vert_count: options
                .polygon_verts
                .clamp(shapes::MIN_VERTS, shapes::MAX_VERTS),
            fps: FpsCounter::default(),
            elapsed: 0.0,
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Effect {
        match action {
            Action::Exit => Effect::Exit,
            Action::Digit(digit) if self.flags.primitive_manipulation => {
                match Primitive::from_digit(digit) {
                    Ok(primitive) => {
                        self.primitive = primitive;
                        log::info!("Set primitive: {primitive}");
                        Effect::SetPrimitive(primitive)
                    }
                    Err(err) => {
                        log::warn!("{err}");
                        Effect::None
                    }
                }
            }
            Action::Increase | Action::Decrease if self.flags.vertex_manipulation => {
                let delta = if action == Action::Increase { 1 } else { -1 };
                self.set_vert_count(shapes::step_vertex_count(self.vert_count, delta))
            }
            Action::Increase | Action::Decrease if self.flags.lit => {
                let delta = if action == Action::Increase {
                    INTENSITY_STEP
                } else {
                    -INTENSITY_STEP
                };
                let intensity = self.light.adjust_intensity(delta);
                log::info!("Light intensity: {intensity:.1}");
                Effect::None
            }
            Action::ToggleLight if self.flags.lit => {
                let on = self.light.toggle();
                log::info!("Light enabled: {}", if on { "ON" } else { "OFF" });
                Effect::None
            }
            Action::SetLight(kind) if self.flags.lit => {
                self.light.kind = kind;
                log::info!("Light type: {kind}");
                Effect::None
            }
            _ => Effect::None,
        }
    }

    /// Cursor row drives the polygon's corner count.
    pub fn handle_cursor_y(&mut self, y: f64, window_height: u32) -> Effect {
        if !self.flags.vertex_manipulation {
            return Effect::None;
        }
        self.set_vert_count(shapes::vertex_count_from_cursor(y, window_height))
    }

    pub fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.flags.mouse_look {
            self.camera.apply_mouse(dx, dy);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    pub fn update(&mut self, dt: f32) -> FrameUpdate {
        self.elapsed += dt;
        if self.flags.keyboard_movement {
            self.camera.apply_movement(self.held.move_input(), dt);
        }
        let model = match self.stage {
            Stage::Polygon => Some(Transform::from_rotation_z(self.elapsed * POLYGON_SPIN).matrix()),
            Stage::Cube => Some(Transform::from_rotation_z(CUBE_TILT_DEG.to_radians()).matrix()),
            Stage::Triangle | Stage::Model | Stage::Scene => None,
        };
        FrameUpdate {
            fps: self.fps.tick(dt),
            model,
        }
    }

    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            view: self.camera.view(),
            proj: self.projection.matrix(),
            view_pos: self.camera.position,
            light: self.light,
            lit: self.flags.lit,
        }
    }

    fn set_vert_count(&mut self, count: u32) -> Effect {
        if count == self.vert_count {
            return Effect::None;
        }
        self.vert_count = count;
        log::info!("Vertices: {count}");
        Effect::RebuildPolygon(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::light::LightKind;
    use winit::keyboard::KeyCode;

    fn state(stage: Stage) -> ViewerState {
        ViewerState::new(&ViewerOptions {
            stage,
            ..Default::default()
        })
    }

    #[test]
    fn digits_switch_primitive_when_enabled() {
        let mut s = state(Stage::Cube);
        assert_eq!(
            s.handle_action(Action::Digit(1)),
            Effect::SetPrimitive(Primitive::Lines)
        );
        assert_eq!(s.primitive, Primitive::Lines);

        let mut t = state(Stage::Triangle);
        assert_eq!(t.handle_action(Action::Digit(1)), Effect::None);
        assert_eq!(t.primitive, Primitive::Triangles);
    }

    #[test]
    fn arrows_change_vertex_count_in_polygon_stage() {
        let mut s = state(Stage::Polygon);
        assert_eq!(s.handle_action(Action::Increase), Effect::RebuildPolygon(4));
        assert_eq!(s.handle_action(Action::Decrease), Effect::RebuildPolygon(3));
        s.vert_count = shapes::MIN_VERTS;
        assert_eq!(s.handle_action(Action::Decrease), Effect::None);
        // Light stays untouched in the unlit stage.
        assert_eq!(s.light, LightState::default());
    }

    #[test]
    fn arrows_change_light_in_lit_stages() {
        let mut s = state(Stage::Model);
        s.handle_action(Action::Increase);
        assert!((s.light.intensity - 1.1).abs() < 1e-6);
        s.handle_action(Action::ToggleLight);
        assert!(!s.light.enabled);
        s.handle_action(Action::SetLight(LightKind::Directional));
        assert_eq!(s.light.kind, LightKind::Directional);
    }

    #[test]
    fn cursor_only_matters_for_polygon() {
        let mut s = state(Stage::Polygon);
        assert_eq!(
            s.handle_cursor_y(0.0, 600),
            Effect::RebuildPolygon(shapes::MAX_VERTS)
        );
        assert_eq!(s.handle_cursor_y(0.0, 600), Effect::None);

        let mut c = state(Stage::Cube);
        assert_eq!(c.handle_cursor_y(0.0, 600), Effect::None);
    }

    #[test]
    fn mouse_look_respects_stage() {
        let mut c = state(Stage::Cube);
        c.handle_mouse_motion(100.0, 0.0);
        assert!((c.camera.yaw_deg - 275.0).abs() < 1e-3);

        let mut p = state(Stage::Polygon);
        p.handle_mouse_motion(100.0, 0.0);
        assert_eq!(p.camera, FlyCamera::default());
    }

    #[test]
    fn update_moves_camera_with_held_keys() {
        let mut s = state(Stage::Scene);
        s.held.press(KeyCode::KeyS);
        let update = s.update(1.0);
        assert!((s.camera.position.z - 6.0).abs() < 1e-4);
        assert_eq!(update.model, None);
        // A full second exceeds the FPS interval.
        assert_eq!(update.fps, Some(1));
    }

    #[test]
    fn polygon_spins_and_cube_is_tilted() {
        let mut p = state(Stage::Polygon);
        let first = p.update(0.1).model.unwrap();
        let second = p.update(0.1).model.unwrap();
        assert_ne!(first, second);

        let mut c = state(Stage::Cube);
        assert_eq!(c.update(0.1).model, c.update(0.1).model);
    }

    #[test]
    fn frame_params_follow_stage_lighting() {
        assert!(state(Stage::Cube).frame_params().lit);
        assert!(!state(Stage::Triangle).frame_params().lit);
    }

    #[test]
    fn initial_light_kind_comes_from_options() {
        let s = ViewerState::new(&ViewerOptions {
            stage: Stage::Model,
            light: LightKind::Spotlight,
            ..Default::default()
        });
        assert_eq!(s.light.kind, LightKind::Spotlight);
        assert_eq!(s.frame_params().light.kind, LightKind::Spotlight);
    }

    #[test]
    fn escape_exits() {
        let mut s = state(Stage::Triangle);
        assert_eq!(s.handle_action(Action::Exit), Effect::Exit);
    }
}
