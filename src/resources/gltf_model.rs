//! glTF parsing into [`ModelData`].
//!
//! Supports `.gltf` files with external buffers/images (resolved relative to the
//! asset directory) and `.glb` files with an embedded binary chunk.

use std::collections::HashMap;

use crate::{
    data_structures::{
        instance::Instance,
        model::{MaterialData, ModelVertex, PrimitiveData},
        scene_graph::{ModelData, ModelNodeData},
    },
    resources::{asset_path, load_binary, loader::LoadError},
};

pub async fn load_gltf(root: &str, directory: &str, file_name: &str) -> Result<ModelData, LoadError> {
    let path = asset_path(directory, file_name);
    let bytes = fetch(root, &path).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)?;

    // Load buffers, external ones concurrently
    let buffer_data: Vec<Vec<u8>> = futures::future::try_join_all(gltf.buffers().map(|buffer| {
        let path = &path;
        let blob = gltf.blob.as_deref();
        async move {
            match buffer.source() {
                gltf::buffer::Source::Bin => blob
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| LoadError::MissingBinaryChunk(path.clone())),
                gltf::buffer::Source::Uri(uri) => {
                    if uri.starts_with("data:") {
                        return Err(LoadError::UnsupportedUri(uri.chars().take(32).collect()));
                    }
                    fetch(root, &asset_path(directory, uri)).await
                }
            }
        }
    }))
    .await?;

    // Load base colour images, once per image index
    let mut images: HashMap<usize, image::RgbaImage> = HashMap::new();
    for material in gltf.materials() {
        let Some(info) = material.pbr_metallic_roughness().base_color_texture() else {
            continue;
        };
        let source_image = info.texture().source();
        if images.contains_key(&source_image.index()) {
            continue;
        }
        let (bytes, mime_type) = match source_image.source() {
            gltf::image::Source::View { view, mime_type } => {
                let data = buffer_data
                    .get(view.buffer().index())
                    .and_then(|b| b.get(view.offset()..view.offset() + view.length()))
                    .ok_or_else(|| LoadError::Malformed(format!("image {} points outside its buffer", source_image.index())))?;
                (data.to_vec(), Some(mime_type))
            }
            gltf::image::Source::Uri { uri, mime_type } => {
                if uri.starts_with("data:") {
                    return Err(LoadError::UnsupportedUri(uri.chars().take(32).collect()));
                }
                (fetch(root, &asset_path(directory, uri)).await?, mime_type)
            }
        };
        let decoded = match mime_type.and_then(image::ImageFormat::from_mime_type) {
            Some(format) => image::load_from_memory_with_format(&bytes, format)?,
            None => image::load_from_memory(&bytes)?,
        };
        images.insert(source_image.index(), decoded.to_rgba8());
    }

    // Load materials; the extra trailing slot is used by primitives without one
    let mut materials: Vec<MaterialData> = gltf
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            MaterialData {
                name: material.name().unwrap_or("unnamed_material").to_string(),
                base_color: pbr.base_color_factor(),
                emissive: material.emissive_factor(),
                base_color_texture: pbr
                    .base_color_texture()
                    .and_then(|info| images.get(&info.texture().source().index()).cloned()),
                unlit: false,
            }
        })
        .collect();
    let default_material = materials.len();
    materials.push(MaterialData::default());

    let nodes = gltf
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            let local = Instance {
                position: translation.into(),
                rotation: cgmath::Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
                scale: scale.into(),
            };
            let primitives = node
                .mesh()
                .map(|mesh| read_primitives(&mesh, &buffer_data, default_material))
                .unwrap_or_default();
            ModelNodeData {
                name: node.name().map(str::to_string),
                local,
                primitives,
                children: node.children().map(|c| c.index()).collect(),
            }
        })
        .collect::<Vec<_>>();

    let roots = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => {
            let children: std::collections::HashSet<usize> =
                nodes.iter().flat_map(|n| n.children.iter().copied()).collect();
            (0..nodes.len()).filter(|i| !children.contains(i)).collect()
        }
    };

    let model = ModelData {
        nodes,
        roots,
        materials,
    };
    log::debug!(
        "Parsed {} with {} nodes and {} primitives",
        path,
        model.nodes.len(),
        model.primitive_count()
    );
    Ok(model)
}

async fn fetch(root: &str, path: &str) -> Result<Vec<u8>, LoadError> {
    load_binary(root, path).await.map_err(|e| LoadError::Fetch {
        path: path.to_string(),
        reason: format!("{:#}", e),
    })
}

fn read_primitives(mesh: &gltf::Mesh, buffers: &[Vec<u8>], default_material: usize) -> Vec<PrimitiveData> {
    mesh.primitives()
        .filter_map(|primitive| {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of mesh {:?}: only triangle lists are supported.",
                    primitive.index(),
                    mesh.name()
                );
                return None;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

            let Some(positions) = reader.read_positions() else {
                log::warn!("Primitive {} of mesh {:?} has no positions.", primitive.index(), mesh.name());
                return None;
            };
            let mut vertices: Vec<ModelVertex> = positions
                .map(|position| ModelVertex {
                    position,
                    ..Default::default()
                })
                .collect();
            if let Some(normals) = reader.read_normals() {
                vertices.iter_mut().zip(normals).for_each(|(v, n)| v.normal = n);
            }
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                vertices
                    .iter_mut()
                    .zip(tex_coords.into_f32())
                    .for_each(|(v, uv)| v.tex_coords = uv);
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            let material = primitive.material().index().unwrap_or(default_material);
            Some(PrimitiveData::new(vertices, indices, material))
        })
        .collect()
}
