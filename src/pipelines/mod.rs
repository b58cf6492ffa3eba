//! Render pipeline constructors.
//!
//! `model` renders imported, textured, instanced geometry; `light` renders
//! the light marker. Both validate their WGSL through [`crate::shader`]
//! and return a `Result` instead of trusting the source blindly.

pub mod light;
pub mod model;
