//! Engine data structures: models, textures and instances.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data
//! - `block` pairs a model with its instance list and buffer

pub mod block;
pub mod instance;
pub mod model;
pub mod texture;
