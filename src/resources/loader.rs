//! Asynchronous asset loading.
//!
//! [`AssetLoader::load`] fetches and parses one catalog entry. It never
//! registers anything itself: the caller hands the resulting [`LoadedAsset`] to
//! [`crate::scene::SceneContext::register_asset`] on the thread that owns the
//! scene, in whatever order loads complete.

use crate::{
    data_structures::{model::MaterialOverride, scene_graph::ModelData},
    resources::gltf_model::load_gltf,
};

/// Everything that can go wrong between requesting an asset and having its model data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF {0} references a binary chunk but has none")]
    MissingBinaryChunk(String),
    #[error("unsupported URI {0:?}, only relative file references are supported")]
    UnsupportedUri(String),
    #[error("could not decode texture: {0}")]
    Image(#[from] image::ImageError),
    #[error("malformed glTF: {0}")]
    Malformed(String),
}

/// One entry of the asset catalog: where to find it and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    /// Directory below the asset root, e.g. `models/sputnik`.
    pub directory: String,
    pub file_name: String,
    pub display_name: String,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub material: MaterialOverride,
    pub selectable: bool,
}

impl AssetRequest {
    /// A selectable asset stored as `<directory>/scene.gltf`.
    pub fn new(directory: &str, display_name: &str, position: [f32; 3], scale: [f32; 3]) -> Self {
        Self {
            directory: directory.to_string(),
            file_name: "scene.gltf".to_string(),
            display_name: display_name.to_string(),
            position,
            scale,
            material: MaterialOverride::Keep,
            selectable: true,
        }
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    pub fn with_material(mut self, material: MaterialOverride) -> Self {
        self.material = material;
        self
    }

    pub fn scenery(mut self) -> Self {
        self.selectable = false;
        self
    }
}

/// A parsed asset waiting to be registered.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub request: AssetRequest,
    pub model: ModelData,
}

#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: String,
}

impl AssetLoader {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub async fn load(&self, request: AssetRequest) -> Result<LoadedAsset, LoadError> {
        log::debug!("Loading {} from {}", request.display_name, request.directory);
        let model = load_gltf(&self.root, &request.directory, &request.file_name).await?;
        Ok(LoadedAsset { request, model })
    }
}
