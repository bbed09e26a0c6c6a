#![allow(dead_code)]

use std::path::Path;

use orbit_showcase::{
    animator::CameraAnimator,
    camera::{Camera, Projection},
    data_structures::{
        info::InfoTable,
        instance::Instance,
        model::{MaterialData, ModelVertex, PrimitiveData},
        scene_graph::{ModelData, ModelNodeData},
    },
    resources::loader::{AssetRequest, LoadedAsset},
    viewer::Showcase,
};

pub const VIEWPORT: (u32, u32) = (800, 600);

const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // -z
    4, 6, 5, 6, 4, 7, // +z
    0, 4, 5, 5, 1, 0, // -y
    3, 2, 6, 6, 7, 3, // +y
    0, 3, 7, 7, 4, 0, // -x
    1, 5, 6, 6, 2, 1, // +x
];

pub fn cube_vertices(half: f32) -> Vec<ModelVertex> {
    [
        [-half, -half, -half],
        [half, -half, -half],
        [half, half, -half],
        [-half, half, -half],
        [-half, -half, half],
        [half, -half, half],
        [half, half, half],
        [-half, half, half],
    ]
    .into_iter()
    .map(|position| ModelVertex {
        position,
        ..Default::default()
    })
    .collect()
}

pub fn cube_primitive(half: f32) -> PrimitiveData {
    PrimitiveData::new(cube_vertices(half), CUBE_INDICES.to_vec(), 0)
}

/// A single mesh node holding a unit cube.
pub fn cube_model() -> ModelData {
    ModelData {
        nodes: vec![ModelNodeData {
            name: Some("Body".to_string()),
            local: Instance::new(),
            primitives: vec![cube_primitive(1.0)],
            children: vec![],
        }],
        roots: vec![0],
        materials: vec![MaterialData::default()],
    }
}

/// An empty group node whose only child carries the cube, the way exported
/// models usually nest their meshes.
pub fn nested_cube_model() -> ModelData {
    ModelData {
        nodes: vec![
            ModelNodeData {
                name: Some("Sketchfab_model".to_string()),
                local: Instance::new(),
                primitives: vec![],
                children: vec![1],
            },
            ModelNodeData {
                name: Some("Body".to_string()),
                local: Instance::new(),
                primitives: vec![cube_primitive(1.0)],
                children: vec![],
            },
        ],
        roots: vec![0],
        materials: vec![MaterialData::default()],
    }
}

pub fn loaded(name: &str, position: [f32; 3], scale: f32, model: ModelData) -> LoadedAsset {
    LoadedAsset {
        request: AssetRequest::new("models/test", name, position, [scale; 3]),
        model,
    }
}

pub fn loaded_scenery(name: &str, position: [f32; 3], scale: f32) -> LoadedAsset {
    LoadedAsset {
        request: AssetRequest::new("models/test", name, position, [scale; 3]).scenery(),
        model: cube_model(),
    }
}

pub fn showcase() -> Showcase {
    Showcase::new(
        InfoTable::satellites(),
        CameraAnimator::default(),
        instant::Duration::from_secs(2),
    )
}

/// Camera at the origin looking down -Z.
pub fn camera_at_origin() -> Camera {
    Camera::new([0.0, 0.0, 0.0], cgmath::Deg(-90.0), cgmath::Deg(0.0))
}

pub fn projection() -> Projection {
    Projection::new(VIEWPORT.0, VIEWPORT.1, cgmath::Deg(60.0), 1.0, 1e6)
}

pub fn center() -> winit::dpi::PhysicalPosition<f64> {
    winit::dpi::PhysicalPosition::new(VIEWPORT.0 as f64 / 2.0, VIEWPORT.1 as f64 / 2.0)
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/**
 * Writes `<dir>/scene.gltf` and its external `cube.bin`: one node named
 * `Body` with an indexed cube of half extent `half`.
 */
pub fn write_cube_gltf(dir: &Path, half: f32) -> std::io::Result<()> {
    let mut bin = Vec::new();
    for vertex in cube_vertices(half) {
        for c in vertex.position {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    let positions_len = bin.len();
    for index in CUBE_INDICES {
        bin.extend_from_slice(&(index as u16).to_le_bytes());
    }
    let indices_len = bin.len() - positions_len;

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [ {{ "nodes": [0] }} ],
  "nodes": [ {{ "name": "Body", "mesh": 0 }} ],
  "meshes": [ {{ "primitives": [ {{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "mode": 4 }} ] }} ],
  "buffers": [ {{ "uri": "cube.bin", "byteLength": {total} }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": {positions_len}, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": {positions_len}, "byteLength": {indices_len}, "target": 34963 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3",
       "min": [{min}, {min}, {min}], "max": [{max}, {max}, {max}] }},
    {{ "bufferView": 1, "componentType": 5123, "count": 36, "type": "SCALAR" }}
  ]
}}"#,
        total = bin.len(),
        positions_len = positions_len,
        indices_len = indices_len,
        min = -half,
        max = half,
    );

    std::fs::write(dir.join("scene.gltf"), json)?;
    std::fs::write(dir.join("cube.bin"), bin)?;
    Ok(())
}
