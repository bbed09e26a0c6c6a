//! GPU side of the scene: uploaded meshes, materials and per-node instances.
//!
//! Nodes never move once registered and are never removed, so everything is
//! uploaded once. [`SceneRenderer::sync`] runs every frame and only uploads the
//! nodes and materials that appeared since the previous call, which is how
//! assets finishing their load in any order show up on screen.
//!
//! # Key types
//!
//! - [`DrawItem`] is the CPU description of one node to draw
//! - [`GpuMesh`] holds the vertex and index buffers of one primitive
//! - [`SceneRenderer`] owns all of the above and records the scene pass

use std::collections::BTreeMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{instance::InstanceRaw, scene_graph::NodeId},
    resources::texture::GpuMaterial,
    scene::SceneContext,
};

/// One mesh node to draw and whether it belongs to a selectable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub highlight: bool,
    pub world: cgmath::Matrix4<f32>,
}

/// Every mesh node of the scene, in node order.
pub fn collect_draws(scene: &SceneContext) -> Vec<DrawItem> {
    scene
        .graph
        .ids()
        .filter_map(|node| {
            let data = scene.graph.node(node)?;
            if !data.is_mesh() {
                return None;
            }
            let highlight = scene.registry.entity_for_node(node).is_some_and(|e| e.selectable);
            Some(DrawItem {
                node,
                highlight,
                world: *data.world_transform(),
            })
        })
        .collect()
}

#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
}

#[derive(Debug)]
struct GpuNode {
    meshes: Vec<GpuMesh>,
    instance: wgpu::Buffer,
}

pub trait DrawMesh {
    fn draw_mesh(
        &mut self,
        mesh: &GpuMesh,
        material: &GpuMaterial,
        instance: &wgpu::Buffer,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    );
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(
        &mut self,
        mesh: &GpuMesh,
        material: &GpuMaterial,
        instance: &wgpu::Buffer,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_vertex_buffer(1, instance.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }
}

#[derive(Debug, Default)]
pub struct SceneRenderer {
    materials: Vec<GpuMaterial>,
    nodes: BTreeMap<NodeId, GpuNode>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploaded_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Uploads materials and mesh nodes that are not on the GPU yet.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &SceneContext,
        material_layout: &wgpu::BindGroupLayout,
    ) {
        let materials = scene.graph.materials();
        for material in materials.iter().skip(self.materials.len()) {
            self.materials.push(GpuMaterial::new(device, queue, material, material_layout));
        }

        for item in collect_draws(scene) {
            if self.nodes.contains_key(&item.node) {
                continue;
            }
            let Some(node) = scene.graph.node(item.node) else {
                continue;
            };
            let label = node.name.as_deref().unwrap_or("node");
            let meshes = node
                .primitives
                .iter()
                .filter(|p| !p.indices.is_empty())
                .map(|primitive| GpuMesh {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{:?} Vertex Buffer", label)),
                        contents: bytemuck::cast_slice(&primitive.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{:?} Index Buffer", label)),
                        contents: bytemuck::cast_slice(&primitive.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    num_elements: primitive.indices.len() as u32,
                    material: primitive.material,
                })
                .collect();
            let instance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Instance Buffer", label)),
                contents: bytemuck::cast_slice(&[InstanceRaw::new(&item.world, item.highlight)]),
                usage: wgpu::BufferUsages::VERTEX,
            });
            self.nodes.insert(item.node, GpuNode { meshes, instance });
        }
    }

    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        pipeline: &wgpu::RenderPipeline,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(pipeline);
        for node in self.nodes.values() {
            for mesh in &node.meshes {
                let Some(material) = self.materials.get(mesh.material) else {
                    log::warn!("Mesh references material {} which was never uploaded.", mesh.material);
                    continue;
                };
                render_pass.draw_mesh(mesh, material, &node.instance, camera_bind_group, light_bind_group);
            }
        }
    }
}
