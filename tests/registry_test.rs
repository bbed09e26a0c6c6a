use orbit_showcase::{
    data_structures::{
        info::InfoTable,
        model::MaterialOverride,
        registry::{RegistryError, SelectableList},
    },
    scene::SceneContext,
};

use crate::common::test_utils::{cube_model, loaded, loaded_scenery, nested_cube_model};

mod common;

#[test]
fn registering_a_name_twice_is_rejected_and_leaves_the_scene_untouched() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let first = scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();
    let nodes = scene.graph.len();

    let second = scene.register_asset(loaded("Sputnik", [50.0, 0.0, 0.0], 1.0, cube_model()));

    assert_eq!(second, Err(RegistryError::DuplicateName("Sputnik".to_string())));
    assert_eq!(scene.graph.len(), nodes);
    assert_eq!(scene.registry.len(), 1);
    assert_eq!(scene.selectable.len(), 1);
    assert_eq!(scene.registry.get("Sputnik").map(|e| e.root), Some(first));
    assert_eq!(scene.registry.get("Sputnik").map(|e| e.position), Some([0.0, 0.0, -1000.0]));
}

#[test]
fn every_node_of_an_asset_resolves_to_its_entity() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let root = scene
        .register_asset(loaded("Hubble", [-1000.0, -150.0, 0.0], 3.0, nested_cube_model()))
        .unwrap();

    let nodes = scene.graph.descendants(root);
    assert_eq!(nodes.len(), 3, "root, group and mesh node");
    for node in nodes {
        assert_eq!(
            scene.registry.entity_for_node(node).map(|e| e.name.as_str()),
            Some("Hubble")
        );
    }
}

#[test]
fn only_selectable_assets_enter_the_selectable_list() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let sputnik = scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();
    let earth = scene.register_asset(loaded_scenery("Earth", [0.0; 3], 100.0)).unwrap();

    assert_eq!(scene.selectable.iter().collect::<Vec<_>>(), vec![sputnik]);
    assert!(!scene.selectable.contains(earth));
    assert!(scene.registry.get("Earth").is_some_and(|e| !e.selectable));
}

#[test]
fn mesh_nodes_cast_and_receive_shadows() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let root = scene
        .register_asset(loaded("Voyager", [0.0, 100.0, 1000.0], 3.0, nested_cube_model()))
        .unwrap();

    for id in scene.graph.descendants(root) {
        let node = scene.graph.node(id).unwrap();
        assert_eq!(node.cast_shadow, node.is_mesh());
        assert_eq!(node.receive_shadow, node.is_mesh());
    }
}

#[test]
fn placement_is_applied_to_the_root() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let root = scene
        .register_asset(loaded("ISS", [1000.0, 300.0, 0.0], 2.0, cube_model()))
        .unwrap();

    let position = scene.graph.world_position(root).unwrap();
    assert_eq!(position, cgmath::Vector3::new(1000.0, 300.0, 0.0));
    let mesh = scene.graph.node(root).unwrap().children()[0];
    let world = scene.graph.node(mesh).unwrap().world_transform();
    assert_eq!(world.x.x, 2.0);
    assert_eq!(world.w.truncate(), cgmath::Vector3::new(1000.0, 300.0, 0.0));
}

#[test]
fn material_overrides_apply_to_every_material_of_the_asset() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let mut sun = loaded_scenery("Sun", [5200.0, 800.0, 5200.0], 10.0);
    sun.request.material = MaterialOverride::Emissive {
        color: [1.0, 0.5, 0.0],
        intensity: 2.0,
    };
    scene.register_asset(sun).unwrap();

    let material = &scene.graph.materials()[0];
    assert!(material.unlit);
    assert_eq!(material.emissive, [2.0, 1.0, 0.0]);
}

#[test]
fn selectable_list_keeps_each_handle_once() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    let root = scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();

    let mut list = SelectableList::new();
    assert!(list.push(root));
    assert!(!list.push(root));
    assert_eq!(list.len(), 1);
}

#[test]
fn satellite_info_table_covers_the_selectable_catalog() {
    let info = InfoTable::satellites();
    let catalog = orbit_showcase::config::default_catalog();

    let selectable: Vec<_> = catalog.iter().filter(|r| r.selectable).collect();
    assert_eq!(selectable.len(), info.len());
    for request in selectable {
        assert!(info.get(&request.display_name).is_some(), "{}", request.display_name);
    }
    assert!(info.get("Earth").is_none());
}
