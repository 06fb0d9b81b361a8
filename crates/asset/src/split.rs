//! Partitioning a mesh into sub-meshes.

use std::collections::HashMap;

use crate::mesh::{MeshData, NamedMesh};

pub const UPPER_SUFFIX: &str = "upper";
pub const LOWER_SUFFIX: &str = "lower";

/// Splits `mesh` into two halves by height.
///
/// The threshold is the mean Y of all vertices. A triangle whose corners
/// average at or above it goes to `{name}_upper`, every other triangle to
/// `{name}_lower`. Either half may come back empty. Triangles that reference
/// a missing vertex are dropped.
pub fn split_by_height(mesh: &MeshData, name: &str) -> [NamedMesh; 2] {
    let threshold = mesh.average_height().unwrap_or(0.0);

    let mut upper: Vec<[u32; 3]> = Vec::new();
    let mut lower: Vec<[u32; 3]> = Vec::new();
    for tri in mesh.triangles() {
        let Some(heights) = tri
            .iter()
            .map(|&i| mesh.vertices.get(i as usize).map(|v| v.position[1]))
            .collect::<Option<Vec<f32>>>()
        else {
            log::debug!("Dropping triangle {tri:?} of '{name}': vertex out of range");
            continue;
        };
        let height = heights.iter().sum::<f32>() / 3.0;
        if height >= threshold {
            upper.push(tri);
        } else {
            lower.push(tri);
        }
    }

    log::debug!(
        "Split '{}' at y={:.3}: {} upper / {} lower triangles",
        name,
        threshold,
        upper.len(),
        lower.len()
    );

    [
        NamedMesh::new(format!("{name}_{UPPER_SUFFIX}"), reindex(mesh, &upper)),
        NamedMesh::new(format!("{name}_{LOWER_SUFFIX}"), reindex(mesh, &lower)),
    ]
}

/// Builds a standalone mesh from a subset of `source`'s triangles.
///
/// Only referenced vertices are copied, in order of first use, and indices
/// are remapped to the compacted vertex list. Triangles that reference a
/// vertex `source` does not have are skipped.
pub fn reindex(source: &MeshData, triangles: &[[u32; 3]]) -> MeshData {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(triangles.len() * 3);

    let in_range = |tri: &&[u32; 3]| tri.iter().all(|&i| (i as usize) < source.vertices.len());
    for &old in triangles.iter().filter(in_range).flatten() {
        let new = *remap.entry(old).or_insert_with(|| {
            vertices.push(source.vertices[old as usize]);
            (vertices.len() - 1) as u32
        });
        indices.push(new);
    }

    MeshData::new(vertices, indices)
}
