//! Named entities and the list of handles eligible for picking.

use std::collections::HashMap;

use crate::data_structures::scene_graph::NodeId;

/// A named, positioned object of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub root: NodeId,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub selectable: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("an entity named {0:?} is already registered")]
    DuplicateName(String),
    #[error("node {0:?} already belongs to entity {1:?}")]
    NodeTaken(NodeId, String),
}

/**
 * Name → entity mapping, plus the reverse node → name mapping.
 *
 * The reverse mapping covers every node of an entity's subtree and is filled
 * in at registration time, so resolving a picked child mesh never depends on
 * the shape of the tree.
 */
#[derive(Debug, Default)]
pub struct SceneRegistry {
    entities: HashMap<String, Entity>,
    owners: HashMap<NodeId, String>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity` as the owner of `nodes` (its whole subtree).
    ///
    /// Names are unique: a second registration under the same name is rejected
    /// and leaves the registry untouched.
    pub fn register(&mut self, entity: Entity, nodes: &[NodeId]) -> Result<(), RegistryError> {
        if self.entities.contains_key(&entity.name) {
            return Err(RegistryError::DuplicateName(entity.name));
        }
        if let Some((node, owner)) = nodes
            .iter()
            .find_map(|n| self.owners.get(n).map(|owner| (*n, owner.clone())))
        {
            return Err(RegistryError::NodeTaken(node, owner));
        }
        for node in nodes {
            self.owners.insert(*node, entity.name.clone());
        }
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn entity_for_node(&self, node: NodeId) -> Option<&Entity> {
        self.owners.get(&node).and_then(|name| self.entities.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

/// Ordered, append-only list of root handles that ray picking tests against.
#[derive(Debug, Default, Clone)]
pub struct SelectableList {
    handles: Vec<NodeId>,
}

impl SelectableList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handle` unless it is already present. Returns whether it was added.
    pub fn push(&mut self, handle: NodeId) -> bool {
        if self.handles.contains(&handle) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    pub fn contains(&self, handle: NodeId) -> bool {
        self.handles.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.handles.iter().copied()
    }
}
