//! CPU-side model data: vertices, primitives, bounding boxes and materials.
//!
//! A loaded glTF asset is turned into these plain structs first. They are
//! what the ray picker intersects against; the renderer later uploads the
//! same vertices and indices to GPU buffers.

use cgmath::Vector3;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A 3D ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        use cgmath::InnerSpace;
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn from_vertices(vertices: &[ModelVertex]) -> Option<Self> {
        let first = vertices.first()?;
        let start = Vector3::from(first.position);
        let (min, max) = vertices.iter().skip(1).fold((start, start), |(min, max), v| {
            let p = Vector3::from(v.position);
            (
                Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Self { min, max })
    }

    /// Slab test. Returns the entry distance along the ray (or the exit distance
    /// when the origin is inside the box).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let (origin, direction) = (ray.origin[axis], ray.direction[axis]);
            let (min, max) = (self.min[axis], self.max[axis]);
            if direction == 0.0 {
                // Parallel to this slab: the origin must already lie within it.
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }
            let t0 = (min - origin) / direction;
            let t1 = (max - origin) / direction;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// One drawable part of a mesh: its own vertices, indices and material slot.
#[derive(Debug, Clone)]
pub struct PrimitiveData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: usize,
    pub bounds: Option<Aabb>,
}

impl PrimitiveData {
    pub fn new(vertices: Vec<ModelVertex>, indices: Vec<u32>, material: usize) -> Self {
        let bounds = Aabb::from_vertices(&vertices);
        Self {
            vertices,
            indices,
            material,
            bounds,
        }
    }

    /// Nearest triangle hit along `ray` (Möller–Trumbore, both faces).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        use cgmath::InnerSpace;
        const EPSILON: f32 = 1e-7;

        self.bounds.as_ref()?.intersect_ray(ray)?;

        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let v0 = Vector3::from(self.vertices.get(tri[0] as usize)?.position);
                let v1 = Vector3::from(self.vertices.get(tri[1] as usize)?.position);
                let v2 = Vector3::from(self.vertices.get(tri[2] as usize)?.position);
                let edge1 = v1 - v0;
                let edge2 = v2 - v0;
                let h = ray.direction.cross(edge2);
                let a = edge1.dot(h);
                if a.abs() < EPSILON {
                    return None;
                }
                let f = 1.0 / a;
                let s = ray.origin - v0;
                let u = f * s.dot(h);
                if !(0.0..=1.0).contains(&u) {
                    return None;
                }
                let q = s.cross(edge1);
                let v = f * ray.direction.dot(q);
                if v < 0.0 || u + v > 1.0 {
                    return None;
                }
                let t = f * edge2.dot(q);
                (t > EPSILON).then_some(t)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Material parameters read from glTF (subset of metallic-roughness PBR).
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub base_color_texture: Option<image::RgbaImage>,
    /// Emissive materials skip lighting entirely.
    pub unlit: bool,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [1.0; 4],
            emissive: [0.0; 3],
            base_color_texture: None,
            unlit: false,
        }
    }
}

/// Material replacement applied to every material of an asset when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaterialOverride {
    /// Use the materials as authored.
    #[default]
    Keep,
    /// Force a plain lit material: keep colour and texture, drop emission.
    StandardLit,
    /// A luminous body: rendered unlit with the given emissive colour and intensity.
    Emissive { color: [f32; 3], intensity: f32 },
}

impl MaterialOverride {
    pub fn apply(&self, material: &mut MaterialData) {
        match *self {
            MaterialOverride::Keep => (),
            MaterialOverride::StandardLit => {
                material.emissive = [0.0; 3];
                material.unlit = false;
            }
            MaterialOverride::Emissive { color, intensity } => {
                material.emissive = color.map(|c| c * intensity);
                material.unlit = true;
            }
        }
    }
}
