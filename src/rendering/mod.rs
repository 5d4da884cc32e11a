//! Rendering system with wgpu pipelines and per-variant shading programs.

mod textures;
pub mod uniforms;

use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{Result, SeaglowError};
use crate::lighting::{IlluminationTables, LightEmission};
use crate::mesh::CornerVertex;
use crate::params::{AssetPaths, RenderConfig};
use crate::scene::{FeatureSupport, SceneState};

pub use textures::{load_rgba, CubeFaces, DepthBuffer, DEPTH_FORMAT};
pub use uniforms::{
    gpu_waves, light_corners, patch_vertices, wave_storage, GpuWave, LightQuadUniforms,
    PatchVertex, SkyboxUniforms, SurfaceUniforms,
};

/// View and projection for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameMatrices {
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One surface shading variant: its own uniform set, bind group and pipeline
struct SurfaceProgram {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

/// Tessellated ocean surface and its variants
struct SurfacePass {
    patch_count: u32,
    tables_bind_group: wgpu::BindGroup,
    light_texture_bind_group: Option<wgpu::BindGroup>,
    untextured: SurfaceProgram,
    textured: Option<SurfaceProgram>,
    wireframe: Option<SurfaceProgram>,
}

struct LightQuadPass {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    textured: bool,
}

struct SkyPass {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

/// Shared GPU inputs of every surface program
struct SurfaceInputs<'a> {
    shader: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    layout: &'a wgpu::BindGroupLayout,
    waves: &'a wgpu::Buffer,
    patches: &'a wgpu::Buffer,
    corners: &'a wgpu::Buffer,
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    clear_color: wgpu::Color,
    surface_pass: Option<SurfacePass>,
    light_pass: Option<LightQuadPass>,
    sky: Option<SkyPass>,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(
    binding: u32,
    filterable: bool,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32, kind: wgpu::SamplerBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(kind),
        count: None,
    }
}

fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

impl RenderSystem {
    /// Create new rendering system and upload everything the scene needs
    pub async fn new(
        window: Arc<Window>,
        scene: &SceneState,
        assets: &AssetPaths,
        render_config: &RenderConfig,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .map_err(|e| SeaglowError::gpu(format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| SeaglowError::gpu("Failed to find suitable GPU adapter"))?;
        log::info!("Using adapter {}", adapter.get_info().name);

        // Line polygons are optional; without them the wireframe overlay is off
        let required_features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features,
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| SeaglowError::gpu(format!("Failed to request device: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| SeaglowError::gpu("Surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth = DepthBuffer::new(&device, config.width, config.height);

        let light_image = assets.light_texture.as_ref().and_then(|path| {
            load_rgba(path)
                .map_err(|e| log::error!("{}; textured light mode disabled", e))
                .ok()
        });
        let light_texture_view = light_image.as_ref().map(|img| {
            textures::create_rgba_texture(
                &device,
                &queue,
                "Light Texture",
                img.width(),
                img.height(),
                img.as_raw(),
            )
        });

        let surface_pass = scene.surface.as_ref().map(|mesh| {
            Self::create_surface_pass(
                &device,
                &queue,
                surface_format,
                scene,
                &patch_vertices(mesh),
                &scene.tables,
                light_texture_view.as_ref(),
            )
        });
        if surface_pass.is_none() {
            log::warn!("No surface mesh, skipping the ocean pass");
        }

        let light_pass = scene.lights.as_ref().map(|rig| {
            Self::create_light_pass(
                &device,
                &queue,
                surface_format,
                &rig.mesh.vertices,
                light_texture_view.as_ref(),
            )
        });

        let sky = match CubeFaces::load(&assets.skybox_faces()) {
            Ok(faces) => Some(Self::create_sky_pass(&device, &queue, surface_format, &faces)),
            Err(e) => {
                log::error!("{}; sky disabled", e);
                None
            }
        };

        let [r, g, b] = render_config.clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            surface_pass,
            light_pass,
            sky,
        })
    }

    fn create_surface_pass(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        scene: &SceneState,
        patches: &[PatchVertex],
        tables: &IlluminationTables,
        light_texture: Option<&wgpu::TextureView>,
    ) -> SurfacePass {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("surface.wgsl").into()),
        });

        let wave_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Buffer"),
            contents: bytemuck::cast_slice(&wave_storage(&scene.waves)),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let patch_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Patch Buffer"),
            contents: bytemuck::cast_slice(patches),
            usage: wgpu::BufferUsages::STORAGE,
        });
        // Storage bindings cannot be empty; the panel count in the uniforms
        // keeps the placeholder unread
        let mut corners = scene
            .lights
            .as_ref()
            .map(|rig| light_corners(&rig.geometry))
            .unwrap_or_default();
        if corners.is_empty() {
            corners = vec![[0.0; 4]; 4];
        }
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Corner Buffer"),
            contents: bytemuck::cast_slice(&corners),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let state_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Surface State Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                storage_entry(1, wgpu::ShaderStages::VERTEX),
                storage_entry(2, wgpu::ShaderStages::VERTEX),
                storage_entry(3, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        // Float32 tables are not filterable without an extra feature
        let tables_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Illumination Table Layout"),
            entries: &[
                texture_entry(0, false, wgpu::TextureViewDimension::D2),
                texture_entry(1, false, wgpu::TextureViewDimension::D2),
                sampler_entry(2, wgpu::SamplerBindingType::NonFiltering),
            ],
        });
        let matrix_view =
            textures::create_table_texture(device, queue, "LTC Matrix Table", &tables.matrix);
        let amplitude_view =
            textures::create_table_texture(device, queue, "LTC Amplitude Table", &tables.amplitude);
        let table_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("LTC Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let tables_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Illumination Table Bind Group"),
            layout: &tables_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&matrix_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&amplitude_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&table_sampler),
                },
            ],
        });

        let light_texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Light Texture Layout"),
                entries: &[
                    texture_entry(0, true, wgpu::TextureViewDimension::D2),
                    sampler_entry(1, wgpu::SamplerBindingType::Filtering),
                ],
            });
        let light_texture_bind_group = light_texture.map(|view| {
            let sampler = linear_sampler(device, "Light Texture Sampler");
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Light Texture Bind Group"),
                layout: &light_texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        });

        let inputs = SurfaceInputs {
            shader: &shader,
            format,
            layout: &state_layout,
            waves: &wave_buffer,
            patches: &patch_buffer,
            corners: &corner_buffer,
        };

        let untextured = Self::create_surface_program(
            device,
            &inputs,
            "Untextured Surface",
            "fs_untextured",
            &[&state_layout, &tables_layout],
            wgpu::PolygonMode::Fill,
            depth_state(true, wgpu::CompareFunction::Less),
        );

        let textured = light_texture_bind_group.as_ref().map(|_| {
            Self::create_surface_program(
                device,
                &inputs,
                "Textured Surface",
                "fs_textured",
                &[&state_layout, &tables_layout, &light_texture_layout],
                wgpu::PolygonMode::Fill,
                depth_state(true, wgpu::CompareFunction::Less),
            )
        });

        let wireframe = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            let mut depth = depth_state(false, wgpu::CompareFunction::LessEqual);
            // Pull the lines toward the camera so they sit on the surface
            depth.bias = wgpu::DepthBiasState {
                constant: -2,
                slope_scale: -1.0,
                clamp: 0.0,
            };
            Some(Self::create_surface_program(
                device,
                &inputs,
                "Wireframe Surface",
                "fs_wireframe",
                &[&state_layout],
                wgpu::PolygonMode::Line,
                depth,
            ))
        } else {
            log::warn!("Adapter lacks line polygon mode, wireframe overlay disabled");
            None
        };

        SurfacePass {
            patch_count: (patches.len() / 3) as u32,
            tables_bind_group,
            light_texture_bind_group,
            untextured,
            textured,
            wireframe,
        }
    }

    fn create_surface_program(
        device: &wgpu::Device,
        inputs: &SurfaceInputs<'_>,
        label: &str,
        fragment_entry: &str,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        polygon_mode: wgpu::PolygonMode,
        depth_stencil: wgpu::DepthStencilState,
    ) -> SurfaceProgram {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<SurfaceUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: inputs.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: inputs.waves.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: inputs.patches.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: inputs.corners.as_entire_binding(),
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: inputs.shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: inputs.shader,
                entry_point: Some(fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: inputs.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        SurfaceProgram {
            uniform_buffer,
            bind_group,
            pipeline,
        }
    }

    fn create_light_pass(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        vertices: &[CornerVertex],
        light_texture: Option<&wgpu::TextureView>,
    ) -> LightQuadPass {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Area Light Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("area_light.wgsl").into()),
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Panel Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Panel Uniform Buffer"),
            size: std::mem::size_of::<LightQuadUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Panels without a texture sample a single white texel
        let fallback;
        let view = match light_texture {
            Some(view) => view,
            None => {
                fallback = textures::create_rgba_texture(
                    device,
                    queue,
                    "White Texel",
                    1,
                    1,
                    &[255, 255, 255, 255],
                );
                &fallback
            }
        };
        let sampler = linear_sampler(device, "Light Panel Sampler");

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Light Panel Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                texture_entry(1, true, wgpu::TextureViewDimension::D2),
                sampler_entry(2, wgpu::SamplerBindingType::Filtering),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Light Panel Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Light Panel Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Light Panel Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<CornerVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        LightQuadPass {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
            pipeline,
            textured: light_texture.is_some(),
        }
    }

    fn create_sky_pass(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        faces: &CubeFaces,
    ) -> SkyPass {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Skybox Uniform Buffer"),
            size: std::mem::size_of::<SkyboxUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let cube_view = textures::create_cube_texture(device, queue, faces);
        let sampler = linear_sampler(device, "Skybox Sampler");

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                texture_entry(1, true, wgpu::TextureViewDimension::Cube),
                sampler_entry(2, wgpu::SamplerBindingType::Filtering),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cube_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Drawn last at the far plane, never writes depth
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::LessEqual)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        SkyPass {
            uniform_buffer,
            bind_group,
            pipeline,
        }
    }

    /// Which optional features survived startup
    pub fn features(&self) -> FeatureSupport {
        self.surface_pass
            .as_ref()
            .map(|pass| FeatureSupport {
                light_texture: pass.textured.is_some(),
                wireframe: pass.wireframe.is_some(),
            })
            .unwrap_or_default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Reconfigure the surface and depth buffer for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::new(&self.device, width, height);
        log::debug!("Resized to {}x{}", width, height);
    }

    /// Write this frame's camera, wave clock, LOD and light state into every
    /// stage that will draw
    pub fn push_state(&self, scene: &SceneState, frame: &FrameMatrices, time_s: f32) {
        let view_proj = frame.view_proj();

        if let Some(pass) = &self.surface_pass {
            let uniforms =
                SurfaceUniforms::from_scene(scene, view_proj, time_s, scene.lod.gpu_level());
            let bytes = bytemuck::cast_slice(std::slice::from_ref(&uniforms));
            if let Some(program) = Self::active_program(pass, scene.shading.emission) {
                self.queue.write_buffer(&program.uniform_buffer, 0, bytes);
            }
            if let Some(wireframe) = pass.wireframe.as_ref().filter(|_| scene.show_wireframe) {
                self.queue.write_buffer(&wireframe.uniform_buffer, 0, bytes);
            }
        }

        if let Some(pass) = &self.light_pass {
            let textured = pass.textured && scene.shading.emission == LightEmission::Textured;
            let lighting = &scene.lighting;
            let uniforms = LightQuadUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                color_intensity: [
                    lighting.area_color[0],
                    lighting.area_color[1],
                    lighting.area_color[2],
                    lighting.area_intensity,
                ],
                flags: [textured as u32, 0, 0, 0],
            };
            self.queue
                .write_buffer(&pass.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }

        if let Some(sky) = &self.sky {
            let uniforms = SkyboxUniforms::new(frame.view, frame.projection);
            self.queue
                .write_buffer(&sky.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    fn active_program(pass: &SurfacePass, emission: LightEmission) -> Option<&SurfaceProgram> {
        match emission {
            LightEmission::Untextured => Some(&pass.untextured),
            LightEmission::Textured => pass.textured.as_ref(),
        }
    }

    /// Draw surface, optional wireframe, light panels, then sky
    pub fn render(&self, scene: &SceneState) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(pass) = &self.surface_pass {
                let level = scene.lod.gpu_level();
                let vertices = 3 * level * level;

                if let Some(program) = Self::active_program(pass, scene.shading.emission) {
                    render_pass.set_pipeline(&program.pipeline);
                    render_pass.set_bind_group(0, &program.bind_group, &[]);
                    render_pass.set_bind_group(1, &pass.tables_bind_group, &[]);
                    if let Some(texture) = &pass.light_texture_bind_group {
                        if scene.shading.emission == LightEmission::Textured {
                            render_pass.set_bind_group(2, texture, &[]);
                        }
                    }
                    render_pass.draw(0..vertices, 0..pass.patch_count);
                }

                if let Some(wireframe) = pass.wireframe.as_ref().filter(|_| scene.show_wireframe) {
                    render_pass.set_pipeline(&wireframe.pipeline);
                    render_pass.set_bind_group(0, &wireframe.bind_group, &[]);
                    render_pass.draw(0..vertices, 0..pass.patch_count);
                }
            }

            if let Some(lights) = &self.light_pass {
                render_pass.set_pipeline(&lights.pipeline);
                render_pass.set_bind_group(0, &lights.bind_group, &[]);
                render_pass.set_vertex_buffer(0, lights.vertex_buffer.slice(..));
                render_pass.draw(0..lights.vertex_count, 0..1);
            }

            if let Some(sky) = &self.sky {
                render_pass.set_pipeline(&sky.pipeline);
                render_pass.set_bind_group(0, &sky.bind_group, &[]);
                render_pass.draw(0..3, 0..1); // Fullscreen triangle
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
