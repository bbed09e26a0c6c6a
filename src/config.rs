//! Start-up configuration of the showcase.
//!
//! [`ShowcaseConfig::default`] reproduces the satellite scene: camera start,
//! controller speeds, lighting, post-processing settings and the asset catalog.

use cgmath::{Deg, Vector3};
use instant::Duration;

use crate::{
    data_structures::model::MaterialOverride,
    resources::loader::AssetRequest,
};

pub const ASSET_ROOT_ENV: &str = "ORBIT_ASSET_ROOT";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineSettings {
    pub edge_strength: f32,
    pub edge_thickness: f32,
    pub visible_edge_color: [f32; 3],
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            edge_strength: 2.0,
            edge_thickness: 1.0,
            visible_edge_color: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSettings {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    /// Position of the directional light; it shines towards the origin.
    pub directional_position: [f32; 3],
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 3.0,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 1.0,
            directional_position: [5.0, 10.0, 7.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseConfig {
    /// Directory (native) or URL path (web) the asset directories live under.
    pub asset_root: String,
    pub window_title: String,
    pub camera_position: [f32; 3],
    pub camera_yaw: Deg<f32>,
    pub camera_pitch: Deg<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub movement_speed: f32,
    pub look_speed: f32,
    pub fly_to_duration: Duration,
    pub fly_to_standoff: Vector3<f32>,
    pub clear_colour: wgpu::Color,
    pub light: LightSettings,
    pub outline: OutlineSettings,
    pub catalog: Vec<AssetRequest>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".to_string(),
            window_title: "Orbit showcase".to_string(),
            camera_position: [1500.0, 0.0, 400.0],
            camera_yaw: Deg(-90.0),
            camera_pitch: Deg(0.0),
            fovy: Deg(60.0),
            znear: 1.0,
            zfar: 1_000_000.0,
            movement_speed: 50.0,
            look_speed: 0.15,
            fly_to_duration: Duration::from_secs(2),
            fly_to_standoff: Vector3::new(0.0, 0.0, 100.0),
            clear_colour: wgpu::Color::BLACK,
            light: LightSettings::default(),
            outline: OutlineSettings::default(),
            catalog: default_catalog(),
        }
    }
}

impl ShowcaseConfig {
    /// The default configuration with the asset root taken from `ORBIT_ASSET_ROOT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(root) = std::env::var(ASSET_ROOT_ENV) {
            if !root.trim().is_empty() {
                log::info!("Using asset root {} from {}", root, ASSET_ROOT_ENV);
                config.asset_root = root;
            }
        }
        config
    }
}

/// Satellites first, then the scenery.
pub fn default_catalog() -> Vec<AssetRequest> {
    vec![
        AssetRequest::new("models/sputnik", "Sputnik", [0.0, 0.0, -1000.0], [5.0; 3]),
        AssetRequest::new("models/iss", "ISS", [1000.0, 300.0, 0.0], [2.0; 3]),
        AssetRequest::new("models/hubble", "Hubble", [-1000.0, -150.0, 0.0], [3.0; 3]),
        AssetRequest::new("models/voyager", "Voyager", [0.0, 100.0, 1000.0], [3.0; 3]),
        AssetRequest::new("models/skybox", "SkyBox", [-4500.0, -9000.0, 4000.0], [200.0; 3]).scenery(),
        AssetRequest::new("models/sun", "Sun", [5200.0, 800.0, 5200.0], [10.0; 3])
            .with_material(MaterialOverride::Emissive {
                color: [1.0, 0.85, 0.4],
                intensity: 2.0,
            })
            .scenery(),
        AssetRequest::new("models/earth", "Earth", [0.0, 0.0, 0.0], [100.0; 3])
            .with_material(MaterialOverride::StandardLit)
            .scenery(),
    ]
}
