use wgpu::util::DeviceExt;

use crate::data_structures::{model::MaterialData, texture};

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("Material bind_group_layout"),
    })
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    base_color: [f32; 4],
    emissive: [f32; 3],
    unlit: f32,
}

impl From<&MaterialData> for MaterialUniform {
    fn from(material: &MaterialData) -> Self {
        Self {
            base_color: material.base_color,
            emissive: material.emissive,
            unlit: if material.unlit { 1.0 } else { 0.0 },
        }
    }
}

/// A material ready for the model pipeline (bind group 0).
#[derive(Debug)]
pub struct GpuMaterial {
    pub name: String,
    pub diffuse: texture::Texture,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    /// Uploads the colour map (or a white 1x1 texture when there is none) and the
    /// material factors.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material: &MaterialData,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let diffuse = match &material.base_color_texture {
            Some(image) => texture::Texture::from_rgba(device, queue, image, Some(&material.name)),
            None => texture::Texture::create_solid(device, queue, [255, 255, 255, 255]),
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Material Buffer", material.name)),
            contents: bytemuck::cast_slice(&[MaterialUniform::from(material)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer.as_entire_binding(),
                },
            ],
            label: Some(&material.name),
        });
        Self {
            name: material.name.clone(),
            diffuse,
            buffer,
            bind_group,
        }
    }
}
