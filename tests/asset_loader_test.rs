use orbit_showcase::{
    data_structures::info::InfoTable,
    pick::resolve_click,
    resources::loader::{AssetLoader, AssetRequest, LoadError},
    scene::SceneContext,
};

use crate::common::test_utils::{camera_at_origin, center, projection, write_cube_gltf, VIEWPORT};

mod common;

fn asset_root(dir: &tempfile::TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

#[tokio::test]
async fn loads_a_gltf_with_an_external_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models/cube");
    std::fs::create_dir_all(&model_dir).unwrap();
    write_cube_gltf(&model_dir, 2.0).unwrap();

    let loader = AssetLoader::new(asset_root(&dir));
    let asset = loader
        .load(AssetRequest::new("models/cube", "Cube", [0.0, 0.0, -50.0], [1.0; 3]))
        .await
        .unwrap();

    assert_eq!(asset.request.display_name, "Cube");
    assert_eq!(asset.model.nodes.len(), 1);
    assert_eq!(asset.model.roots, vec![0]);
    assert_eq!(asset.model.nodes[0].name.as_deref(), Some("Body"));
    let primitive = &asset.model.nodes[0].primitives[0];
    assert_eq!(primitive.vertices.len(), 8);
    assert_eq!(primitive.indices.len(), 36);
    let bounds = primitive.bounds.unwrap();
    assert_eq!(bounds.min, cgmath::Vector3::new(-2.0, -2.0, -2.0));
    assert_eq!(bounds.max, cgmath::Vector3::new(2.0, 2.0, 2.0));
    // No materials in the file: primitives fall back to the default slot.
    assert_eq!(asset.model.materials.len(), 1);
    assert_eq!(primitive.material, 0);
}

#[tokio::test]
async fn loaded_asset_is_pickable_once_registered() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models/sputnik");
    std::fs::create_dir_all(&model_dir).unwrap();
    write_cube_gltf(&model_dir, 1.0).unwrap();

    let loader = AssetLoader::new(asset_root(&dir));
    let asset = loader
        .load(AssetRequest::new("models/sputnik", "Sputnik", [0.0, 0.0, -1000.0], [5.0; 3]))
        .await
        .unwrap();
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene.register_asset(asset).unwrap();

    let hit = resolve_click(center(), VIEWPORT, &camera_at_origin(), &projection(), &scene).unwrap();
    assert_eq!(hit.entity, "Sputnik");
}

#[tokio::test]
async fn missing_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = AssetLoader::new(asset_root(&dir));

    let result = loader
        .load(AssetRequest::new("models/nothing", "Nothing", [0.0; 3], [1.0; 3]))
        .await;

    match result {
        Err(LoadError::Fetch { path, .. }) => assert_eq!(path, "models/nothing/scene.gltf"),
        other => panic!("expected a fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_buffer_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models/cube");
    std::fs::create_dir_all(&model_dir).unwrap();
    write_cube_gltf(&model_dir, 1.0).unwrap();
    std::fs::remove_file(model_dir.join("cube.bin")).unwrap();

    let loader = AssetLoader::new(asset_root(&dir));
    let result = loader
        .load(AssetRequest::new("models/cube", "Cube", [0.0; 3], [1.0; 3]))
        .await;

    assert!(matches!(result, Err(LoadError::Fetch { ref path, .. }) if path == "models/cube/cube.bin"));
}

#[tokio::test]
async fn embedded_data_uris_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models/inline");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(
        model_dir.join("scene.gltf"),
        r#"{
  "asset": { "version": "2.0" },
  "buffers": [ { "uri": "data:application/octet-stream;base64,AAAA", "byteLength": 3 } ]
}"#,
    )
    .unwrap();

    let loader = AssetLoader::new(asset_root(&dir));
    let result = loader
        .load(AssetRequest::new("models/inline", "Inline", [0.0; 3], [1.0; 3]))
        .await;

    assert!(matches!(result, Err(LoadError::UnsupportedUri(_))));
}

#[tokio::test]
async fn invalid_json_is_a_gltf_error() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models/broken");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(model_dir.join("scene.gltf"), "{ not json").unwrap();

    let loader = AssetLoader::new(asset_root(&dir));
    let result = loader
        .load(AssetRequest::new("models/broken", "Broken", [0.0; 3], [1.0; 3]))
        .await;

    assert!(matches!(result, Err(LoadError::Gltf(_))));
}

#[test]
fn asset_paths_join_with_a_single_separator() {
    use orbit_showcase::resources::asset_path;

    assert_eq!(asset_path("models/iss/", "scene.gltf"), "models/iss/scene.gltf");
    assert_eq!(asset_path("models/iss", "/scene.gltf"), "models/iss/scene.gltf");
    assert_eq!(asset_path("", "scene.gltf"), "scene.gltf");
}
