//! The scene context handed to every component.
//!
//! [`SceneContext`] owns the scene graph, the entity registry, the selectable
//! list and the info table. Nothing in the crate reaches these through globals;
//! the picker, the viewer and the renderer all borrow the context explicitly.

use crate::{
    data_structures::{
        info::InfoTable,
        instance::Instance,
        registry::{Entity, RegistryError, SceneRegistry, SelectableList},
        scene_graph::{NodeId, SceneGraph},
    },
    resources::loader::LoadedAsset,
};

#[derive(Debug, Default)]
pub struct SceneContext {
    pub graph: SceneGraph,
    pub registry: SceneRegistry,
    pub selectable: SelectableList,
    pub info: InfoTable,
}

impl SceneContext {
    pub fn new(info: InfoTable) -> Self {
        Self {
            info,
            ..Default::default()
        }
    }

    /**
     * Places a loaded asset into the scene and registers it.
     *
     * Every mesh node gets its shadow flags, the root is placed at the requested
     * position and scale, the subtree is mapped to the display name and, for
     * selectable assets, the root is appended to the selectable list.
     *
     * A name that is already taken is rejected before anything is inserted, so a
     * duplicate leaves the scene exactly as it was.
     */
    pub fn register_asset(&mut self, asset: LoadedAsset) -> Result<NodeId, RegistryError> {
        let LoadedAsset { request, model } = asset;
        if self.registry.contains(&request.display_name) {
            return Err(RegistryError::DuplicateName(request.display_name));
        }

        let root = self.graph.insert_model(
            &request.display_name,
            model,
            Instance::placed(request.position, request.scale),
            request.material,
        );
        self.graph.traverse_mut(root, &mut |node| {
            if node.is_mesh() {
                node.cast_shadow = true;
                node.receive_shadow = true;
            }
        });

        let nodes = self.graph.descendants(root);
        self.registry.register(
            Entity {
                name: request.display_name.clone(),
                root,
                position: request.position,
                scale: request.scale,
                selectable: request.selectable,
            },
            &nodes,
        )?;
        if request.selectable {
            self.selectable.push(root);
        }
        log::info!(
            "Model {} loaded with {} nodes{}.",
            request.display_name,
            nodes.len(),
            if request.selectable { " and added to the selectable objects" } else { "" }
        );
        Ok(root)
    }
}
