//! Demo stages and the options the viewer is started with.

use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::{Result, bail};
use asset::{ModelSpec, Scene, shapes};
use corelib::light::LightKind;
use rand::Rng;

/// What the viewer shows; each stage adds one capability to the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    Triangle,
    Polygon,
    #[default]
    Cube,
    Model,
    Scene,
}

/// Per-stage feature switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageFlags {
    pub keyboard_movement: bool,
    pub mouse_look: bool,
    pub vertex_manipulation: bool,
    pub primitive_manipulation: bool,
    pub lit: bool,
}

impl Stage {
    pub fn flags(self) -> StageFlags {
        match self {
            Stage::Triangle => StageFlags {
                keyboard_movement: false,
                mouse_look: false,
                vertex_manipulation: false,
                primitive_manipulation: false,
                lit: false,
            },
            Stage::Polygon => StageFlags {
                keyboard_movement: false,
                mouse_look: false,
                vertex_manipulation: true,
                primitive_manipulation: true,
                lit: false,
            },
            Stage::Cube | Stage::Model | Stage::Scene => StageFlags {
                keyboard_movement: true,
                mouse_look: true,
                vertex_manipulation: false,
                primitive_manipulation: true,
                lit: true,
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Triangle => "triangle",
            Stage::Polygon => "polygon",
            Stage::Cube => "cube",
            Stage::Model => "model",
            Stage::Scene => "scene",
        };
        f.write_str(name)
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "triangle" | "1" => Stage::Triangle,
            "polygon" | "2" => Stage::Polygon,
            "cube" | "3" => Stage::Cube,
            "model" | "4" => Stage::Model,
            "scene" | "5" => Stage::Scene,
            other => bail!("unknown stage '{other}'"),
        })
    }
}

/// Everything needed to start the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerOptions {
    pub stage: Stage,
    pub models: Vec<ModelSpec>,
    pub cube_texture: PathBuf,
    /// Split models into height halves; always on for [`Stage::Scene`].
    pub split: bool,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Corner count of the polygon stage at startup.
    pub polygon_verts: u32,
    /// Light type the lit stages start with.
    pub light: LightKind,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            stage: Stage::default(),
            models: Vec::new(),
            cube_texture: PathBuf::from("assets/textures/cube.png"),
            split: false,
            backends: wgpu::Backends::all(),
            show_fps: true,
            width: 800,
            height: 600,
            title: "lumen3d".to_string(),
            polygon_verts: 3,
            light: LightKind::default(),
        }
    }
}

pub const POLYGON_RADIUS: f32 = 1.0;

impl ViewerOptions {
    /// Builds the initial CPU-side scene for the selected stage.
    pub fn build_scene<R: Rng>(&self, rng: &mut R) -> Scene {
        match self.stage {
            Stage::Triangle => Scene::single("triangle", shapes::triangle(), None),
            Stage::Polygon => Scene::single(
                "polygon",
                shapes::polygon(self.polygon_verts, POLYGON_RADIUS, rng),
                None,
            ),
            Stage::Cube => Scene::single("cube", shapes::cube(), Some(self.cube_texture.clone())),
            Stage::Model => Scene::load_models(&self.models, self.split),
            Stage::Scene => Scene::load_models(&self.models, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn stage_names_round_trip() {
        for stage in [
            Stage::Triangle,
            Stage::Polygon,
            Stage::Cube,
            Stage::Model,
            Stage::Scene,
        ] {
            assert_eq!(stage.to_string().parse::<Stage>().unwrap(), stage);
        }
        assert_eq!("4".parse::<Stage>().unwrap(), Stage::Model);
        assert!("teapot".parse::<Stage>().is_err());
    }

    #[test]
    fn only_polygon_manipulates_vertices() {
        assert!(Stage::Polygon.flags().vertex_manipulation);
        assert!(!Stage::Polygon.flags().mouse_look);
        assert!(!Stage::Cube.flags().vertex_manipulation);
        assert!(Stage::Scene.flags().lit);
        assert!(!Stage::Triangle.flags().primitive_manipulation);
    }

    #[test]
    fn builtin_stages_build_one_object() {
        let mut rng = StdRng::seed_from_u64(3);
        for stage in [Stage::Triangle, Stage::Polygon, Stage::Cube] {
            let options = ViewerOptions {
                stage,
                ..Default::default()
            };
            let scene = options.build_scene(&mut rng);
            assert_eq!(scene.objects.len(), 1, "{stage}");
            assert!(scene.objects[0].mesh.is_valid());
        }
    }

    #[test]
    fn scene_stage_without_models_is_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = ViewerOptions {
            stage: Stage::Scene,
            ..Default::default()
        };
        assert!(options.build_scene(&mut rng).is_empty());
    }
}
