//! orbit-showcase
//!
//! An interactive 3D scene of satellites around Earth. glTF models are loaded
//! asynchronously and registered as named entities; clicking a satellite flies
//! the camera to it and opens a panel with its description. Runs natively and
//! in the browser (WebGL).
//!
//! High-level modules
//! - `animator`: eased camera flights and camera ownership
//! - `camera`: first-person camera, projection, controller and uniforms
//! - `config`: startup settings and the asset catalog
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene graph, entity registry, model data and info records
//! - `flow`: the winit event loop
//! - `panel`: info panel state and layout
//! - `pick`: CPU ray picking against the selectable entities
//! - `pipelines`: the model pass and the post-processing passes
//! - `render`: GPU upload and drawing of the scene graph
//! - `resources`: asynchronous glTF loading
//! - `scene`: the scene context shared by loading, picking and rendering
//! - `viewer`: click, escape and per-frame handling on top of the scene
//!

pub mod animator;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod panel;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    flow::run(config::ShowcaseConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
