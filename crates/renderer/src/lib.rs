//! Renderer: wgpu init, depth buffer, one pipeline per topology, scene objects.
//! wgpu = 26.x, winit = 0.30.x

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use asset::{Primitive, Scene, TextureData, Topology};
use glam::Mat4;
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, DepthBiasState, DepthStencilState, Device, DeviceDescriptor,
    Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayout, PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    Sampler, ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, Surface,
    SurfaceConfiguration, SurfaceError, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor, VertexState, util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

pub mod mesh;
pub mod texture;
pub mod uniforms;

use mesh::{GpuMesh, Vertex};
use texture::GpuTexture;
pub use uniforms::{FrameParams, FrameUniform, ObjectUniform};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const SHADER_SRC: &str = include_str!("shaders/scene.wgsl");
const FALLBACK_TEXTURE_SIZE: u32 = 64;

/// A scene object living on the GPU.
struct DrawObject {
    name: String,
    mesh: GpuMesh,
    texture: GpuTexture,
    object_buf: Buffer,
    object_bg: BindGroup,
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines, keyed by native topology
    pipelines: HashMap<Topology, RenderPipeline>,
    primitive: Primitive,

    // Bindings
    frame_buf: Buffer,
    frame_bg: BindGroup,
    object_bgl: BindGroupLayout,
    texture_bgl: BindGroupLayout,
    sampler: Sampler,

    objects: Vec<DrawObject>,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window>.
    ///
    /// Fails if no adapter/device is available or the shader does not
    /// pass validation.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("Version:\t{:?} ({})", info.backend, info.driver_info);
        log::info!("Running on:\t{}", info.name);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("lumen3d Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("request_device failed")?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Bind group layouts ====
        let frame_bgl = uniform_layout::<FrameUniform>(
            &device,
            "Frame BGL",
            ShaderStages::VERTEX | ShaderStages::FRAGMENT,
        );
        let object_bgl =
            uniform_layout::<ObjectUniform>(&device, "Object BGL", ShaderStages::VERTEX);
        let texture_bgl = texture::create_bind_group_layout(&device);
        let sampler = texture::create_sampler(&device);

        let frame_init = FrameUniform::new(&FrameParams::default());
        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&frame_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        // ==== Shader + pipelines, validated together ====
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Scene WGSL"),
            source: ShaderSource::Wgsl(SHADER_SRC.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Scene PipelineLayout"),
            bind_group_layouts: &[&frame_bgl, &object_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let pipelines: HashMap<Topology, RenderPipeline> = Topology::ALL
            .into_iter()
            .map(|topology| {
                let pipeline =
                    create_pipeline(&device, &pipeline_layout, &shader, surface_format, topology);
                (topology, pipeline)
            })
            .collect();
        if let Some(err) = device.pop_error_scope().await {
            log::error!("Shader compilation failed:\n\t{err}");
            return Err(anyhow!("Shader compilation failed: {err}"));
        }

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipelines,
            primitive: Primitive::default(),
            frame_buf,
            frame_bg,
            object_bgl,
            texture_bgl,
            sampler,
            objects: Vec::new(),
            depth_view,
            width,
            height,
        })
    }

    /// Replaces all drawn objects with the contents of `scene`.
    ///
    /// Objects without a texture sample a white texel; a texture that fails
    /// to load is replaced by a checkerboard.
    pub fn load_scene(&mut self, scene: &Scene) {
        let objects = scene
            .objects
            .iter()
            .map(|obj| {
                let data = match &obj.texture {
                    Some(path) => TextureData::load_or(path, || {
                        TextureData::create_test_texture(FALLBACK_TEXTURE_SIZE)
                    }),
                    None => TextureData::white(),
                };
                let texture = GpuTexture::upload(
                    &self.device,
                    &self.queue,
                    &self.texture_bgl,
                    &self.sampler,
                    &data,
                    &obj.name,
                );
                let mesh = GpuMesh::new(&self.device, &obj.name, &obj.mesh, self.primitive);
                let object_buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} UBO", obj.name)),
                    contents: bytemuck::bytes_of(&ObjectUniform::new(obj.transform.matrix())),
                    usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                });
                let object_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{} BG", obj.name)),
                    layout: &self.object_bgl,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: object_buf.as_entire_binding(),
                    }],
                });
                DrawObject {
                    name: obj.name.clone(),
                    mesh,
                    texture,
                    object_buf,
                    object_bg,
                }
            })
            .collect();
        self.objects = objects;
        log::info!(
            "Uploaded {} object(s): {}",
            self.objects.len(),
            self.objects
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Switches primitive mode; every object's index buffer is rewritten.
    pub fn set_primitive(&mut self, primitive: Primitive) {
        if primitive == self.primitive {
            return;
        }
        self.primitive = primitive;
        for obj in &mut self.objects {
            obj.mesh.rebuild_indices(&self.device, primitive);
        }
    }

    /// Re-uploads the geometry of object `index`.
    pub fn replace_mesh(&mut self, index: usize, mesh: &asset::MeshData) {
        if let Some(obj) = self.objects.get_mut(index) {
            obj.mesh.replace(&self.device, mesh, self.primitive);
        }
    }

    /// Updates the model matrix of object `index`.
    pub fn set_model_matrix(&mut self, index: usize, model: Mat4) {
        if let Some(obj) = self.objects.get(index) {
            self.queue.write_buffer(
                &obj.object_buf,
                0,
                bytemuck::bytes_of(&ObjectUniform::new(model)),
            );
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: upload frame uniforms, clear, draw every object.
    pub fn render(&mut self, params: &FrameParams) -> Result<(), SurfaceError> {
        self.queue.write_buffer(
            &self.frame_buf,
            0,
            bytemuck::bytes_of(&FrameUniform::new(params)),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipelines.get(&self.primitive.topology()) {
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &self.frame_bg, &[]);
                for obj in &self.objects {
                    rpass.set_bind_group(1, &obj.object_bg, &[]);
                    rpass.set_bind_group(2, &obj.texture.bind_group, &[]);
                    obj.mesh.draw(&mut rpass);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

fn uniform_layout<T>(device: &Device, label: &str, visibility: ShaderStages) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

fn create_pipeline(
    device: &Device,
    layout: &PipelineLayout,
    shader: &ShaderModule,
    format: TextureFormat,
    topology: Topology,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(&format!("Scene Pipeline ({topology:?})")),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: to_wgpu_topology(topology),
            strip_index_format: topology.is_strip().then_some(wgpu::IndexFormat::Uint32),
            // Both faces are drawn; the shader lights back faces too.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn to_wgpu_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::PointList => wgpu::PrimitiveTopology::PointList,
        Topology::LineList => wgpu::PrimitiveTopology::LineList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_topologies_map_to_strips() {
        assert_eq!(
            to_wgpu_topology(Primitive::QuadStrip.topology()),
            wgpu::PrimitiveTopology::TriangleStrip
        );
        assert_eq!(
            to_wgpu_topology(Primitive::LineLoop.topology()),
            wgpu::PrimitiveTopology::LineStrip
        );
        assert_eq!(
            to_wgpu_topology(Primitive::Polygon.topology()),
            wgpu::PrimitiveTopology::TriangleList
        );
    }

    #[test]
    fn every_primitive_has_a_pipeline_topology() {
        for p in Primitive::ALL {
            assert!(Topology::ALL.contains(&p.topology()), "{p} has no pipeline");
        }
    }

    #[test]
    fn shader_source_declares_entry_points() {
        assert!(SHADER_SRC.contains("fn vs_main"));
        assert!(SHADER_SRC.contains("fn fs_main"));
    }
}
