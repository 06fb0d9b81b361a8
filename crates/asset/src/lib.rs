//! Asset loading and CPU-side geometry: meshes, OBJ parsing, builtin
//! shapes, primitive modes, mesh splitting, scene assembly, textures.

pub mod mesh;
pub mod obj;
pub mod primitive;
pub mod scene;
pub mod shapes;
pub mod split;
pub mod texture;

pub use mesh::{MeshData, MeshVertex, NamedMesh};
pub use primitive::{Primitive, Topology};
pub use scene::{ModelSpec, Scene, SceneObject};
pub use texture::TextureData;
