//! Command-line configuration: `--flag=value` pairs, unknown values fall back
//! to defaults with a warning.

use std::path::PathBuf;

use asset::ModelSpec;
use corelib::light::LightKind;
use platform::{Stage, ViewerOptions};

pub const DEFAULT_ASSETS_DIR: &str = "assets";
const CUBE_TEXTURE: &str = "textures/cube.png";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub stage: Stage,
    pub models: Vec<ModelSpec>,
    /// Explicit cube texture; otherwise taken from the assets directory.
    pub texture: Option<PathBuf>,
    pub assets: PathBuf,
    pub split: bool,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub light: LightKind,
}

impl Default for Config {
    fn default() -> Self {
        let viewer = ViewerOptions::default();
        Self {
            stage: viewer.stage,
            models: Vec::new(),
            texture: None,
            assets: PathBuf::from(DEFAULT_ASSETS_DIR),
            split: viewer.split,
            backends: viewer.backends,
            show_fps: viewer.show_fps,
            width: viewer.width,
            height: viewer.height,
            light: viewer.light,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Config::default();
        let mut w: Option<u32> = None;
        let mut h: Option<u32> = None;

        for arg in args {
            let arg = arg.as_ref();
            let (key, val) = match arg.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (arg, None),
            };
            match (key, val) {
                ("--stage", Some(v)) => match v.parse() {
                    Ok(stage) => cfg.stage = stage,
                    Err(e) => log::warn!("{e}, keeping '{}'", cfg.stage),
                },
                ("--model", Some(v)) if !v.is_empty() => cfg.models.push(ModelSpec::parse(v)),
                ("--texture", Some(v)) if !v.is_empty() => cfg.texture = Some(PathBuf::from(v)),
                ("--assets", Some(v)) if !v.is_empty() => cfg.assets = PathBuf::from(v),
                ("--split", v) => cfg.split = parse_switch(key, v, cfg.split),
                ("--show-fps", v) => cfg.show_fps = parse_switch(key, v, cfg.show_fps),
                ("--gpu-backend", Some(v)) => cfg.backends = parse_backend(v),
                ("--light", Some(v)) => match v.parse() {
                    Ok(kind) => cfg.light = kind,
                    Err(e) => log::warn!("{e}, keeping {}", cfg.light),
                },
                ("--size", Some(v)) => {
                    match v
                        .split_once('x')
                        .or_else(|| v.split_once('X'))
                        .and_then(|(sw, sh)| Some((sw.parse::<u32>().ok()?, sh.parse::<u32>().ok()?)))
                    {
                        Some((pw, ph)) => {
                            w = Some(pw);
                            h = Some(ph);
                        }
                        None => log::warn!("Invalid size '{v}', expected WxH"),
                    }
                }
                ("--width", Some(v)) => match v.parse() {
                    Ok(pw) => w = Some(pw),
                    Err(_) => log::warn!("Invalid width '{v}'"),
                },
                ("--height", Some(v)) => match v.parse() {
                    Ok(ph) => h = Some(ph),
                    Err(_) => log::warn!("Invalid height '{v}'"),
                },
                _ => log::warn!("Ignoring unknown argument '{arg}'"),
            }
        }

        cfg.width = w.unwrap_or(cfg.width).max(1);
        cfg.height = h.unwrap_or(cfg.height).max(1);
        cfg
    }

    pub fn cube_texture(&self) -> PathBuf {
        self.texture
            .clone()
            .unwrap_or_else(|| self.assets.join(CUBE_TEXTURE))
    }

    pub fn into_viewer_options(self) -> ViewerOptions {
        ViewerOptions {
            cube_texture: self.cube_texture(),
            stage: self.stage,
            models: self.models,
            split: self.split,
            backends: self.backends,
            show_fps: self.show_fps,
            width: self.width,
            height: self.height,
            light: self.light,
            ..ViewerOptions::default()
        }
    }
}

fn parse_switch(key: &str, val: Option<&str>, current: bool) -> bool {
    let Some(val) = val else {
        return true;
    };
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => true,
        "0" | "false" | "off" | "no" => false,
        other => {
            log::warn!("Unknown value '{other}' for {key}, keeping {current}");
            current
        }
    }
}

fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{other}', falling back to auto");
            wgpu::Backends::all()
        }
    }
}
