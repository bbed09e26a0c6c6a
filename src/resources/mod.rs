/**
 * This module contains all logic for loading models and textures from external files.
 *
 * Natively files are read from the asset root with tokio; on the web they are
 * fetched relative to the page origin.
 */
pub mod gltf_model;
pub mod loader;
pub mod texture;

/// Joins an asset directory and a file name with exactly one `/` between them.
pub fn asset_path(directory: &str, file_name: &str) -> String {
    let directory = directory.trim_end_matches('/');
    if directory.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", directory, file_name.trim_start_matches('/'))
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, root.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(root, file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(root).join(file_name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
    };

    Ok(data)
}
