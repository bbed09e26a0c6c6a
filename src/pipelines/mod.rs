//! Render pipelines of the frame: the lit model pass and the post-processing
//! chain (outline, FXAA, overlay, panel text).

pub mod basic;
pub mod fxaa;
pub mod light;
pub mod outline;
pub mod overlay;
#[cfg(feature = "ui")]
pub mod text;
