//! GPU-side meshes: interleaved vertex buffer plus an index buffer rebuilt
//! whenever the primitive mode changes.

use asset::{MeshData, MeshVertex, Primitive};
use bytemuck::{Pod, Zeroable};
use wgpu::{Buffer, BufferUsages, Device, VertexBufferLayout, VertexStepMode, util::DeviceExt};

/// Vertex: position + color + normal + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3, 1 => Float32x3, 2 => Float32x3, 3 => Float32x2
        ],
    };
}

impl From<&MeshVertex> for Vertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            pos: v.position,
            color: v.color,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

pub struct GpuMesh {
    label: String,
    vertex_buf: Buffer,
    index_buf: Option<Buffer>,
    index_count: u32,
    /// Element order as authored; primitive rewrites start from here.
    source_indices: Vec<u32>,
}

impl GpuMesh {
    pub fn new(device: &Device, label: &str, mesh: &MeshData, primitive: Primitive) -> Self {
        let vertex_buf = create_vertex_buffer(device, label, mesh);
        let mut gpu = Self {
            label: label.to_string(),
            vertex_buf,
            index_buf: None,
            index_count: 0,
            source_indices: mesh.indices.clone(),
        };
        gpu.rebuild_indices(device, primitive);
        gpu
    }

    /// Re-uploads vertices and indices, keeping the current primitive.
    pub fn replace(&mut self, device: &Device, mesh: &MeshData, primitive: Primitive) {
        self.vertex_buf = create_vertex_buffer(device, &self.label, mesh);
        self.source_indices = mesh.indices.clone();
        self.rebuild_indices(device, primitive);
    }

    pub fn rebuild_indices(&mut self, device: &Device, primitive: Primitive) {
        let indices = primitive.expand(&self.source_indices);
        self.index_count = indices.len() as u32;
        self.index_buf = (!indices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} IB", self.label)),
                contents: bytemuck::cast_slice(&indices),
                usage: BufferUsages::INDEX,
            })
        });
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let Some(index_buf) = &self.index_buf else {
            return;
        };
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn create_vertex_buffer(device: &Device, label: &str, mesh: &MeshData) -> Buffer {
    let vertices: Vec<Vertex> = mesh.vertices.iter().map(Vertex::from).collect();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} VB")),
        contents: bytemuck::cast_slice(&vertices),
        usage: BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 11 * 4);
        assert_eq!(Vertex::LAYOUT.attributes.len(), 4);
    }

    #[test]
    fn converts_mesh_vertex() {
        let v = MeshVertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.25, 0.75])
            .with_color([0.5, 0.5, 0.5]);
        let g = Vertex::from(&v);
        assert_eq!(g.pos, [1.0, 2.0, 3.0]);
        assert_eq!(g.color, [0.5, 0.5, 0.5]);
        assert_eq!(g.uv, [0.25, 0.75]);
    }
}
