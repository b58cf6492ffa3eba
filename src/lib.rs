//! prism
//!
//! A small wgpu rendering playground: one demo program per technique
//! (see `demos/`), backed by a library of GPU scaffolding and a
//! synchronous scene-import core that flattens a node hierarchy into
//! device-ready meshes with de-duplicated textures.
//!
//! High-level modules
//! - `app`: winit event loop, application state and the `Demo` lifecycle
//! - `camera`: camera types, controller and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue
//! - `data_structures`: engine data models (meshes, instances, textures)
//! - `import`: scene loading, flattening and GPU upload
//! - `pipelines`: render pipeline constructors (model, light)
//! - `shader`: shader compilation with structured errors
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod import;
pub mod pipelines;
pub mod shader;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
