//! Data structures: transforms, model data, the scene graph, the entity
//! registry and the static info table.
//!
//! - `instance` holds per-node transformation data and its GPU layout
//! - `model` contains CPU vertices, primitives, bounding boxes and materials
//! - `scene_graph` is the node arena addressed by `NodeId` handles
//! - `registry` maps entity names and node handles to entities
//! - `info` is the static table of descriptive records
//! - `texture` contains GPU texture wrapper and creation utilities

pub mod info;
pub mod instance;
pub mod model;
pub mod registry;
pub mod scene_graph;
pub mod texture;
