//! Edge highlight around selectable objects.
//!
//! The scene pass writes a mask of every selectable mesh. This pass finds the
//! mask's silhouette and adds the edge colour on top of the scene colour.

use wgpu::util::DeviceExt;

use crate::{
    config::OutlineSettings,
    data_structures::texture::Texture,
    pipelines::basic::{draw_fullscreen, mk_fullscreen_pipeline, mk_post_bind_group, mk_post_bind_group_layout},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutlineUniform {
    edge_color: [f32; 3],
    edge_strength: f32,
    /// Size of one pixel in UV units.
    texel_size: [f32; 2],
    edge_thickness: f32,
    _padding: f32,
}

impl OutlineUniform {
    pub fn new(settings: &OutlineSettings, width: u32, height: u32) -> Self {
        Self {
            edge_color: settings.visible_edge_color,
            edge_strength: settings.edge_strength,
            texel_size: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32],
            edge_thickness: settings.edge_thickness,
            _padding: 0.0,
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.texel_size = [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32];
    }

    pub fn texel_size(&self) -> [f32; 2] {
        self.texel_size
    }
}

#[derive(Debug)]
pub struct OutlinePass {
    pub uniform: OutlineUniform,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl OutlinePass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        uniform: OutlineUniform,
        scene_color: &Texture,
        mask: &Texture,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Outline Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_post_bind_group_layout(device, "outline_bind_group_layout", 2);
        let bind_group = mk_post_bind_group(
            device,
            "outline_bind_group",
            &bind_group_layout,
            &[scene_color, mask],
            &buffer,
        );
        let pipeline = mk_fullscreen_pipeline(
            device,
            "Outline Pipeline",
            &bind_group_layout,
            format,
            wgpu::ShaderModuleDescriptor {
                label: Some("Outline Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("outline.wgsl").into()),
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

    /// Points the pass at freshly created targets after a resize.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        scene_color: &Texture,
        mask: &Texture,
    ) {
        self.uniform.set_size(width, height);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        self.bind_group = mk_post_bind_group(
            device,
            "outline_bind_group",
            &self.bind_group_layout,
            &[scene_color, mask],
            &self.buffer,
        );
    }

    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        draw_fullscreen(encoder, "Outline Pass", &self.pipeline, &self.bind_group, target);
    }
}
