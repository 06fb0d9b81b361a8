//! Uniform blocks shared with `shaders/scene.wgsl`.

use bytemuck::{Pod, Zeroable};
use corelib::light::LightState;
use glam::{Mat4, Vec3};

/// Per-frame data: camera matrices and light parameters (16-byte aligned rows).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    view_pos: [f32; 3],
    light_intensity: f32,
    light_pos: [f32; 3],
    light_type: u32,
    light_dir: [f32; 3],
    light_cut_off: f32,
    light_color: [f32; 3],
    light_outer_cut_off: f32,
    light_enabled: u32,
    lit: u32,
    _pad: [u32; 2],
}

impl FrameUniform {
    pub fn new(params: &FrameParams) -> Self {
        let light = &params.light;
        Self {
            view: params.view.to_cols_array_2d(),
            proj: params.proj.to_cols_array_2d(),
            view_pos: params.view_pos.to_array(),
            light_intensity: light.intensity,
            light_pos: light.position.to_array(),
            light_type: light.kind.as_uniform(),
            light_dir: light.direction.to_array(),
            light_cut_off: light.cut_off_cos(),
            light_color: light.color.to_array(),
            light_outer_cut_off: light.outer_cut_off_cos(),
            light_enabled: light.enabled as u32,
            lit: params.lit as u32,
            _pad: [0; 2],
        }
    }
}

/// Per-object model matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Everything the renderer needs from the application for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    pub view: Mat4,
    pub proj: Mat4,
    pub view_pos: Vec3,
    pub light: LightState,
    /// `false` draws vertex color x texture without lighting.
    pub lit: bool,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            view_pos: Vec3::ZERO,
            light: LightState::default(),
            lit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_uniform_matches_wgsl_layout() {
        // 2 x mat4 + 5 x 16-byte rows.
        assert_eq!(std::mem::size_of::<FrameUniform>(), 208);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 64);
    }

    #[test]
    fn light_flags_are_encoded() {
        let mut params = FrameParams {
            lit: true,
            ..Default::default()
        };
        params.light.enabled = false;
        let u = FrameUniform::new(&params);
        assert_eq!(u.lit, 1);
        assert_eq!(u.light_enabled, 0);
        assert_eq!(u.light_type, 1);
        assert!(u.light_cut_off > u.light_outer_cut_off);
    }
}
