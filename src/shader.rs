//! Shader module creation with structured errors.
//!
//! WGPU reports bad WGSL through error scopes rather than return values.
//! [`create_shader`] wraps module creation in a validation scope and turns
//! any failure into a [`ShaderError`], so callers can decide whether to
//! abort or substitute a fallback instead of discovering the problem as a
//! logged message at draw time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader {label:?} failed validation: {message}")]
    Validation { label: String, message: String },
}

/// Compile a WGSL source into a shader module, or report why it is invalid.
pub fn create_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    // The scope future resolves as soon as validation has run; block here
    // so the caller gets a plain Result.
    match futures::executor::block_on(error_scope.pop()) {
        Some(error) => Err(ShaderError::Validation {
            label: label.to_string(),
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}
