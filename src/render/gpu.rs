use super::{CameraPose, Handle, ObjectDescriptor, Renderer, Shape};
use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec3};
use web_sys as web;

pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
    cam_eye: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstancePacked {
    pos_scale: [f32; 4],
    color: [f32; 4],
    axis_kind: [f32; 4],
    params: [f32; 4],
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x4,
    1 => Float32x4,
    2 => Float32x4,
    3 => Float32x4
];

struct GpuObject {
    shape: Shape,
    color: [f32; 4],
    position: Vec3,
    orientation: Quat,
    scale: f32,
    progress: f32,
    visible: bool,
}

impl GpuObject {
    fn kind(&self) -> f32 {
        match self.shape {
            Shape::Globe => 0.0,
            Shape::Drone => 1.0,
            Shape::Particle => 2.0,
            Shape::Wave { .. } => 3.0,
            Shape::Spike { .. } => 4.0,
        }
    }

    fn pack(&self) -> InstancePacked {
        let (rim, intensity, length) = match self.shape {
            Shape::Wave {
                rim_power,
                intensity,
            } => (rim_power, intensity, 0.0),
            Shape::Spike { length } => (0.0, 0.0, length),
            _ => (0.0, 0.0, 0.0),
        };
        let axis = self.orientation * Vec3::Y;
        InstancePacked {
            pos_scale: [self.position.x, self.position.y, self.position.z, self.scale],
            color: self.color,
            axis_kind: [axis.x, axis.y, axis.z, self.kind()],
            params: [self.progress, rim, intensity, length],
        }
    }
}

/// WebGPU implementation of the scene renderer.
///
/// Every object is one instance of a camera-facing quad; the fragment shader
/// picks the look by kind. Objects are drawn back to front with waves last.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    objects: FnvHashMap<u32, GpuObject>,
    next_id: u32,
    camera: Option<CameraPose>,
    clear_color: wgpu::Color,
    scratch: Vec<(f32, InstancePacked)>,
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_instances"),
        size: (capacity * std::mem::size_of::<InstancePacked>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl GpuRenderer {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstancePacked>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRS,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        log::info!("[gpu] ready {}x{} format={:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            instance_buffer,
            instance_capacity,
            objects: FnvHashMap::default(),
            next_id: 0,
            camera: None,
            clear_color: wgpu::Color {
                r: 0.01,
                g: 0.015,
                b: 0.04,
                a: 1.0,
            },
            scratch: Vec::new(),
        })
    }

    fn with<F: FnOnce(&mut GpuObject)>(&mut self, handle: Handle, f: F) {
        if let Some(obj) = self.objects.get_mut(&handle.0) {
            f(obj);
        }
    }

    fn write_uniforms(&self, pose: &CameraPose) {
        let right = pose.view.row(0).truncate();
        let up = pose.view.row(1).truncate();
        let view_proj: Mat4 = pose.proj * pose.view;
        let u = SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
            cam_eye: pose.eye.extend(1.0).to_array(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }

    /// Pack visible objects back to front, waves last.
    fn pack_instances(&mut self, eye: Vec3) -> Vec<InstancePacked> {
        self.scratch.clear();
        for obj in self.objects.values().filter(|o| o.visible) {
            let key = match obj.shape {
                Shape::Wave { .. } => f32::NEG_INFINITY,
                _ => obj.position.distance(eye),
            };
            self.scratch.push((key, obj.pack()));
        }
        self.scratch
            .sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        self.scratch.iter().map(|(_, p)| *p).collect()
    }
}

impl Renderer for GpuRenderer {
    fn create_object(&mut self, desc: &ObjectDescriptor) -> Handle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.objects.insert(
            id,
            GpuObject {
                shape: desc.shape,
                color: desc.color,
                position: desc.position,
                orientation: Quat::IDENTITY,
                scale: desc.scale,
                progress: 0.0,
                visible: false,
            },
        );
        Handle(id)
    }

    fn add(&mut self, handle: Handle) {
        self.with(handle, |o| o.visible = true);
    }

    fn remove(&mut self, handle: Handle) {
        self.with(handle, |o| o.visible = false);
    }

    fn dispose(&mut self, handle: Handle) {
        if self.objects.remove(&handle.0).is_none() {
            log::warn!("[gpu] dispose of unknown object {}", handle.0);
        }
    }

    fn set_scale(&mut self, handle: Handle, scale: f32) {
        self.with(handle, |o| o.scale = scale);
    }

    fn set_position(&mut self, handle: Handle, position: Vec3) {
        self.with(handle, |o| o.position = position);
    }

    fn set_orientation(&mut self, handle: Handle, orientation: Quat) {
        self.with(handle, |o| o.orientation = orientation);
    }

    fn set_progress(&mut self, handle: Handle, progress: f32) {
        self.with(handle, |o| o.progress = progress);
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        self.camera = Some(*pose);
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let Some(pose) = self.camera else {
            return Ok(());
        };
        self.write_uniforms(&pose);
        let instances = self.pack_instances(pose.eye);
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(anyhow::anyhow!("surface error: {:?}", e)),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !instances.is_empty() {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                rpass.draw(0..6, 0..instances.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
