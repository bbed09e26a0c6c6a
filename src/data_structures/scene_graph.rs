//! Scene graph and hierarchical scene organization.
//!
//! Nodes live in an arena and are addressed by [`NodeId`] handles. A handle is
//! the identity the rest of the crate works with: the registry maps handles to
//! entity names, the selectable list stores root handles and the renderer keys
//! its GPU buffers by handle.

use cgmath::SquareMatrix;

use crate::data_structures::{
    instance::Instance,
    model::{MaterialData, MaterialOverride, PrimitiveData},
};

/// Opaque handle of a node in the [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A node as produced by a model parser, before it is placed into the graph.
#[derive(Debug, Clone, Default)]
pub struct ModelNodeData {
    pub name: Option<String>,
    pub local: Instance,
    pub primitives: Vec<PrimitiveData>,
    pub children: Vec<usize>,
}

/// A parsed model: a node forest plus the materials its primitives point into.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub nodes: Vec<ModelNodeData>,
    pub roots: Vec<usize>,
    pub materials: Vec<MaterialData>,
}

impl ModelData {
    pub fn primitive_count(&self) -> usize {
        self.nodes.iter().map(|n| n.primitives.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub local: Instance,
    world: cgmath::Matrix4<f32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Material slots index into [`SceneGraph::materials`].
    pub primitives: Vec<PrimitiveData>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    fn new(name: Option<String>, local: Instance, parent: Option<NodeId>) -> Self {
        Self {
            name,
            local,
            world: cgmath::Matrix4::identity(),
            parent,
            children: Vec::new(),
            primitives: Vec::new(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn is_mesh(&self) -> bool {
        !self.primitives.is_empty()
    }

    pub fn world_transform(&self) -> &cgmath::Matrix4<f32> {
        &self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    materials: Vec<MaterialData>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles of all nodes in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn materials(&self) -> &[MaterialData] {
        &self.materials
    }

    pub fn add_node(&mut self, parent: Option<NodeId>, name: Option<String>, local: Instance) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name, local, parent));
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            parent.children.push(id);
        }
        id
    }

    /**
     * Places a parsed model under a fresh root node carrying `placement`.
     *
     * The model's materials are appended to the graph (after `material` has been
     * applied to each of them) and primitive material slots are rebased onto them.
     * World transforms of the new subtree are up to date when this returns.
     */
    pub fn insert_model(
        &mut self,
        name: &str,
        model: ModelData,
        placement: Instance,
        material: MaterialOverride,
    ) -> NodeId {
        let material_offset = self.materials.len();
        self.materials.extend(model.materials.into_iter().map(|mut m| {
            material.apply(&mut m);
            m
        }));
        // glTF primitives without a material use slot 0 of the model
        if self.materials.len() == material_offset {
            let mut fallback = MaterialData::default();
            material.apply(&mut fallback);
            self.materials.push(fallback);
        }

        let root = self.add_node(None, Some(name.to_string()), placement);
        let mut nodes: Vec<Option<ModelNodeData>> = model.nodes.into_iter().map(Some).collect();
        let mut stack: Vec<(usize, NodeId)> = model.roots.iter().rev().map(|&r| (r, root)).collect();
        while let Some((idx, parent)) = stack.pop() {
            let Some(data) = nodes.get_mut(idx).and_then(Option::take) else {
                log::warn!("Model {} references node {} twice or out of range, skipping it.", name, idx);
                continue;
            };
            let id = self.add_node(Some(parent), data.name, data.local);
            self.nodes[id.0].primitives = data
                .primitives
                .into_iter()
                .map(|mut p| {
                    p.material += material_offset;
                    p
                })
                .collect();
            stack.extend(data.children.iter().rev().map(|&c| (c, id)));
        }
        self.update_world_transforms(root);
        root
    }

    /// All nodes of the subtree rooted at `root` in pre-order, `root` included.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn traverse_mut(&mut self, root: NodeId, mutation: &mut dyn FnMut(&mut Node)) {
        for id in self.descendants(root) {
            mutation(&mut self.nodes[id.0]);
        }
    }

    /// Recomputes cached world matrices of `root` and everything below it.
    pub fn update_world_transforms(&mut self, root: NodeId) {
        let parent_world = self
            .node(root)
            .and_then(|n| n.parent)
            .and_then(|p| self.node(p))
            .map(|p| p.world)
            .unwrap_or_else(cgmath::Matrix4::identity);
        let mut stack = vec![(root, parent_world)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.0) else {
                continue;
            };
            node.world = parent_world * node.local.to_matrix();
            let world = node.world;
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<cgmath::Vector3<f32>> {
        self.node(id).map(|n| n.world.w.truncate())
    }
}
