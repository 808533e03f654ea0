//! WGPU-based forward renderer for the scene
//!
//! Owns the surface, device and queue, the depth buffer, the global uniforms
//! and the three scene pipelines. Each frame the scene's draw commands are
//! grouped into instanced batches and drawn in a single pass.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    config::AppConfig,
    error::{Result, SceneError},
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            texture_resource::TextureResource,
        },
        scene::{layout::PipelineKind, object::DrawObject, scene::Scene},
    },
};

use super::instanced_renderer::{build_batches, InstancedRenderer};
use super::pipeline_manager::{PipelineConfig, PipelineManager};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.1,
    b: 0.2,
    a: 1.0,
};

/// Enough room for the static scene plus a 25x50 rug
const INITIAL_INSTANCE_CAPACITY: u32 = 2048;

/// What one rendered frame cost
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub instances: u32,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    instances: InstancedRenderer,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`.
    ///
    /// Pipelines are registered by [`RenderEngine::prepare_scene`] once the
    /// material layout exists.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Textures are sRGB, so the swapchain must encode back to sRGB
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(SceneError::SurfaceUnsupported)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .ok_or(SceneError::SurfaceUnsupported)?;
        // Pacing is done by the frame pacer, not by vsync
        let present_mode = if surface_capabilities
            .present_modes
            .contains(&wgpu::PresentMode::Immediate)
        {
            wgpu::PresentMode::Immediate
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            present_mode
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let instances = InstancedRenderer::new(&device, INITIAL_INSTANCE_CAPACITY);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("phong", include_str!("phong.wgsl"));
        pipeline_manager.load_shader("basic", include_str!("basic.wgsl"));

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            instances,
        })
    }

    /// Loads the scene's textures and models and builds the pipelines that
    /// draw them.
    pub fn prepare_scene(&mut self, scene: &mut Scene, app_config: &AppConfig) -> Result<()> {
        scene.init_gpu_resources(&self.device, &self.queue, app_config)?;
        let Some(assets) = scene.assets.as_ref() else {
            return Ok(());
        };

        let layouts = vec![
            self.global_bindings.bind_group_layout().clone(),
            assets.materials.bind_group_layout().clone(),
        ];
        let color_target = vec![Some(wgpu::ColorTargetState {
            format: self.format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        for kind in PipelineKind::ALL {
            let (shader, cull_mode) = match kind {
                PipelineKind::Lit => ("phong", Some(wgpu::Face::Back)),
                PipelineKind::LitMirrored => ("phong", Some(wgpu::Face::Front)),
                PipelineKind::Unlit => ("basic", Some(wgpu::Face::Back)),
            };
            self.pipeline_manager.register_pipeline(
                kind.name(),
                PipelineConfig::default_with_shader(shader)
                    .with_label(kind.name())
                    .with_cull_mode(cull_mode)
                    .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                    .with_bind_group_layouts(layouts.clone())
                    .with_color_targets(color_target.clone()),
            );
        }

        if let Err(errors) = self.pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }
        let stats = self.pipeline_manager.get_stats();
        log::info!(
            "Pipelines ready: {} created, {} pending, {} shaders",
            stats.total_pipelines,
            stats.pending_pipelines,
            stats.loaded_shaders
        );
        Ok(())
    }

    /// Draws one frame of `scene`.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame(&mut self, scene: &Scene) -> FrameStats {
        let Some(assets) = scene.assets.as_ref() else {
            return FrameStats::default();
        };

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return FrameStats::default();
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return FrameStats::default();
            }
        };

        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            &scene.camera_manager.uniform,
            &scene.light_rig(),
        );

        let commands = scene.draw_commands();
        let (instance_data, batches) = build_batches(&commands, |shape| assets.parts(shape));
        self.instances
            .update_instances(&self.device, &self.queue, &instance_data);

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut stats = FrameStats::default();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_vertex_buffer(1, self.instances.instance_buffer().slice(..));

            let mut bound: Option<PipelineKind> = None;
            for batch in &batches {
                let key = batch.key;
                if bound != Some(key.pipeline) {
                    let Some(pipeline) = self.pipeline_manager.pipeline(key.pipeline.name()) else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    bound = Some(key.pipeline);
                }

                let (Some(mesh), Some(material)) = (
                    assets.mesh(key.mesh),
                    assets.materials.get_material(key.material),
                ) else {
                    continue;
                };

                render_pass.set_bind_group(1, material.bind_group(), &[]);
                render_pass.draw_mesh_instanced(mesh, batch.instances.clone());
                stats.draw_calls += 1;
                stats.instances += batch.instances.len() as u32;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        stats
    }

    /// Resizes the surface and recreates the depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}
