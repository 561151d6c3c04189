use std::sync::Arc;

use anyhow::{bail, Context};
use wgpu::{
    BindGroup, BindGroupLayout, Device, RenderPipeline, Sampler, Surface, SurfaceConfiguration,
    Texture, TextureFormat,
};

use super::gpu_context::GpuContext;

const CANVAS_FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;

/// Presents CPU pixel buffers on a window surface
///
/// Each frame the RGBA canvas is uploaded into a texture and drawn with a
/// fullscreen triangle.
pub struct SurfaceRenderer {
    gpu: Arc<GpuContext>,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    pipeline: RenderPipeline,
    canvas_layout: BindGroupLayout,
    sampler: Sampler,
    canvas: Texture,
    canvas_bindings: BindGroup,
}

impl SurfaceRenderer {
    /// Configure `surface` at the given size
    pub fn new(gpu: Arc<GpuContext>, surface: Surface<'static>, width: u32, height: u32) -> anyhow::Result<Self> {
        let caps = surface.get_capabilities(gpu.adapter());
        let Some(&first) = caps.formats.first() else {
            bail!("surface reports no supported formats");
        };
        let format = caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(first);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);
        log::debug!("surface configured as {:?} {}x{}", format, config.width, config.height);

        let device = gpu.device();
        let canvas_layout = Self::canvas_layout(device);
        let pipeline = Self::display_pipeline(device, &canvas_layout, format);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("canvas sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let canvas = Self::canvas_texture(device, config.width, config.height);
        let canvas_bindings = Self::bind_canvas(device, &canvas_layout, &sampler, &canvas);

        Ok(Self {
            gpu,
            surface,
            config,
            pipeline,
            canvas_layout,
            sampler,
            canvas,
            canvas_bindings,
        })
    }

    /// Upload `pixels` (tightly packed RGBA) and present them
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped, as
    /// is a timed out one. Other surface errors are returned.
    pub fn present(&mut self, pixels: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
        self.check_canvas(pixels, width, height)?;

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire surface texture"),
        };

        self.gpu.queue().write_texture(
            self.canvas.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            self.canvas.size(),
        );

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("present encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("present pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.canvas_bindings, &[]);
            pass.draw(0..3, 0..1);
        }

        let _ = self.gpu.queue().submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Reconfigure the surface and recreate the canvas texture; zero sizes
    /// are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        let device = self.gpu.device();
        self.surface.configure(device, &self.config);

        self.canvas = Self::canvas_texture(device, width, height);
        self.canvas_bindings = Self::bind_canvas(device, &self.canvas_layout, &self.sampler, &self.canvas);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn check_canvas(&self, pixels: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
        if (width, height) != self.dimensions() {
            bail!(
                "canvas is {}x{} but the surface is {}x{}",
                width,
                height,
                self.config.width,
                self.config.height
            );
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            bail!("canvas holds {} bytes, expected {}", pixels.len(), expected);
        }
        Ok(())
    }

    fn canvas_texture(device: &Device, width: u32, height: u32) -> Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("canvas texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CANVAS_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn canvas_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("canvas layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    fn bind_canvas(device: &Device, layout: &BindGroupLayout, sampler: &Sampler, canvas: &Texture) -> BindGroup {
        let view = canvas.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("canvas bindings"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Fullscreen triangle that samples the canvas into the surface format
    fn display_pipeline(device: &Device, layout: &BindGroupLayout, format: TextureFormat) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("display shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../display.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("display layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("display pipeline"),
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
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
