//! CPU-side mesh representation used by loaders.

/// Vertex with position/color/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Default for MeshVertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: [1.0; 3],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0; 2],
        }
    }
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }
}

/// Indexed mesh with tightly-packed vertices. Indices are a triangle list
/// unless a primitive rewrite says otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Non-indexed geometry: vertex `i` is drawn as element `i`.
    pub fn from_vertices(vertices: Vec<MeshVertex>) -> Self {
        let indices = (0..vertices.len() as u32).collect();
        Self { vertices, indices }
    }

    /// Both buffers non-empty and every index in range.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v.position[axis]);
                hi[axis] = hi[axis].max(v.position[axis]);
            }
            (lo, hi)
        }))
    }

    /// Mean Y over all vertices; `None` for an empty mesh.
    pub fn average_height(&self) -> Option<f32> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: f32 = self.vertices.iter().map(|v| v.position[1]).sum();
        Some(sum / self.vertices.len() as f32)
    }
}

/// A mesh with a display name, as produced by splitting and scene loading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedMesh {
    pub name: String,
    pub mesh: MeshData,
}

impl NamedMesh {
    pub fn new(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            mesh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(data.is_valid());
        let dangling = MeshData::new(vec![MeshVertex::default()], vec![0, 1]);
        assert!(!dangling.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn bounds_and_height() {
        let data = MeshData::from_vertices(vec![
            MeshVertex::new([-1.0, 0.0, 2.0], [0.0; 3], [0.0; 2]),
            MeshVertex::new([3.0, 4.0, -2.0], [0.0; 3], [0.0; 2]),
        ]);
        assert_eq!(data.bounds(), Some(([-1.0, 0.0, -2.0], [3.0, 4.0, 2.0])));
        assert_eq!(data.average_height(), Some(2.0));
        assert_eq!(data.indices, vec![0, 1]);
        assert_eq!(MeshData::default().bounds(), None);
    }
}
