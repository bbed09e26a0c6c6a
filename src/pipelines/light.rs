use wgpu::util::DeviceExt;

use crate::config::LightSettings;

/// Ambient plus one directional light.
///
/// Intensities are stored pre-divided by π so the shader's Lambert term
/// (`albedo * irradiance`) matches the physically based light units the scene
/// was authored with.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    /// Unit vector from the surface towards the light.
    direction: [f32; 3],
    _padding2: u32,
    color: [f32; 3],
    _padding3: u32,
}

impl LightUniform {
    pub fn from_settings(settings: &LightSettings) -> Self {
        use cgmath::InnerSpace;
        let direction = cgmath::Vector3::from(settings.directional_position);
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            cgmath::Vector3::unit_y()
        };
        let scale = |color: [f32; 3], intensity: f32| color.map(|c| c * intensity / std::f32::consts::PI);
        Self {
            ambient: scale(settings.ambient_color, settings.ambient_intensity),
            _padding: 0,
            direction: direction.into(),
            _padding2: 0,
            color: scale(settings.directional_color, settings.directional_intensity),
            _padding3: 0,
        }
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    pub fn direction(&self) -> [f32; 3] {
        self.direction
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("light_bind_group_layout"),
    })
}

fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
