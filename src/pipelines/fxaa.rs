//! Fast approximate anti-aliasing as the last full-screen pass.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{draw_fullscreen, mk_fullscreen_pipeline, mk_post_bind_group, mk_post_bind_group_layout},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FxaaUniform {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

impl FxaaUniform {
    /// `resolution` is the size of one pixel: `(1 / width, 1 / height)`.
    pub fn for_size(width: u32, height: u32) -> Self {
        let mut uniform = Self {
            resolution: [0.0; 2],
            _padding: [0.0; 2],
        };
        uniform.set_size(width, height);
        uniform
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.resolution = [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32];
    }

    pub fn resolution(&self) -> [f32; 2] {
        self.resolution
    }
}

#[derive(Debug)]
pub struct FxaaPass {
    pub uniform: FxaaUniform,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl FxaaPass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, uniform: FxaaUniform, input: &Texture) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("FXAA Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_post_bind_group_layout(device, "fxaa_bind_group_layout", 1);
        let bind_group = mk_post_bind_group(device, "fxaa_bind_group", &bind_group_layout, &[input], &buffer);
        let pipeline = mk_fullscreen_pipeline(
            device,
            "FXAA Pipeline",
            &bind_group_layout,
            format,
            wgpu::ShaderModuleDescriptor {
                label: Some("FXAA Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("fxaa.wgsl").into()),
            },
        );
        Self {
            uniform,
            buffer,
            bind_group_layout,
            bind_group,
            pipeline,
        }
    }

    /// Uploads the current uniform and rebinds the (recreated) input target.
    pub fn rebind(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, input: &Texture) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        self.bind_group = mk_post_bind_group(device, "fxaa_bind_group", &self.bind_group_layout, &[input], &self.buffer);
    }

    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        draw_fullscreen(encoder, "FXAA Pass", &self.pipeline, &self.bind_group, target);
    }
}
