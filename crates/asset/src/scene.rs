//! Scene assembly: models loaded from disk, laid out side by side,
//! optionally split into named sub-meshes.

use std::path::{Path, PathBuf};

use corelib::{Vec3, transform::Transform};

use crate::{
    mesh::{MeshData, NamedMesh},
    obj::{self, ObjModel},
    split,
};

/// Gap between neighbouring models along +X, world units.
pub const MODEL_GAP: f32 = 0.5;

/// One model to load: an OBJ path and an optional texture for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSpec {
    pub path: PathBuf,
    pub texture: Option<PathBuf>,
}

impl ModelSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: impl Into<PathBuf>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    /// Parses `model.obj` or `model.obj,texture.png`.
    pub fn parse(value: &str) -> Self {
        match value.split_once(',') {
            Some((model, texture)) if !texture.is_empty() => Self::new(model).with_texture(texture),
            Some((model, _)) => Self::new(model),
            None => Self::new(value),
        }
    }

    /// Display name: the file stem (`models/teapot.obj` -> `teapot`).
    pub fn name(&self) -> String {
        object_name(&self.path)
    }
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

/// A drawable: named mesh, optional texture, placement.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshData,
    pub texture: Option<PathBuf>,
    pub transform: Transform,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn single(name: impl Into<String>, mesh: MeshData, texture: Option<PathBuf>) -> Self {
        Self {
            objects: vec![SceneObject {
                name: name.into(),
                mesh,
                texture,
                transform: Transform::identity(),
            }],
        }
    }

    /// Loads every model in `specs`. A model that fails to load is skipped
    /// with a warning. A file with several `o`/`g` groups contributes one
    /// object per group, named `{model}_{group}`. With `split_models` each
    /// of those contributes its two height halves instead of itself.
    pub fn load_models(specs: &[ModelSpec], split_models: bool) -> Self {
        let loaded: Vec<(&ModelSpec, ObjModel)> = specs
            .iter()
            .filter_map(|spec| match obj::load_obj_model_from_path(&spec.path) {
                Ok(model) => Some((spec, model)),
                Err(err) => {
                    log::warn!("Skipping model {}: {err:#}", spec.path.display());
                    None
                }
            })
            .collect();

        let offsets = layout_along_x(loaded.iter().map(|(_, model)| &model.mesh));

        let mut objects = Vec::new();
        for ((spec, model), offset) in loaded.into_iter().zip(offsets) {
            let transform = Transform::from_translation(Vec3::new(offset, 0.0, 0.0));
            for part in model_parts(&spec.name(), model) {
                let pieces: Vec<NamedMesh> = if split_models {
                    split::split_by_height(&part.mesh, &part.name).into()
                } else {
                    vec![part]
                };
                for piece in pieces {
                    if piece.mesh.is_empty() {
                        log::debug!("Sub-mesh '{}' is empty, not adding it", piece.name);
                        continue;
                    }
                    objects.push(SceneObject {
                        name: piece.name,
                        mesh: piece.mesh,
                        texture: spec.texture.clone(),
                        transform,
                    });
                }
            }
        }

        log::info!(
            "Scene ready: {} object(s) from {} model file(s)",
            objects.len(),
            specs.len()
        );
        Self { objects }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }
}

/// Splits a model into its named groups; a single-group model stays whole.
fn model_parts(name: &str, model: ObjModel) -> Vec<NamedMesh> {
    let groups = model.group_meshes();
    if groups.len() <= 1 {
        return vec![NamedMesh {
            name: name.to_string(),
            mesh: model.mesh,
        }];
    }
    groups
        .into_iter()
        .map(|group| NamedMesh {
            name: format!("{name}_{}", group.name),
            mesh: group.mesh,
        })
        .collect()
}

/// X translations that place meshes next to each other, the whole row
/// centred on the origin.
fn layout_along_x<'a>(meshes: impl Iterator<Item = &'a MeshData>) -> Vec<f32> {
    let mut cursor = 0.0f32;
    let mut offsets = Vec::new();
    for mesh in meshes {
        let (min_x, max_x) = mesh
            .bounds()
            .map(|(lo, hi)| (lo[0], hi[0]))
            .unwrap_or((0.0, 0.0));
        offsets.push(cursor - min_x);
        cursor += (max_x - min_x) + MODEL_GAP;
    }
    let row_width = (cursor - MODEL_GAP).max(0.0);
    offsets.iter().map(|x| x - row_width / 2.0).collect()
}
