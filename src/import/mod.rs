//! Scene import: load a 3D asset file and flatten its node hierarchy into
//! device-ready mesh data.
//!
//! The pipeline has three stages, each its own module:
//!
//! - `scene` parses glTF/GLB or OBJ into a loader-agnostic [`SceneData`]
//! - `flatten` walks the hierarchy and produces flat vertex/index/texture
//!   data, de-duplicating textures by source path
//! - `upload` turns the flattened data into GPU buffers and materials
//!
//! The whole pass is synchronous and runs to completion on the caller's
//! thread; each call owns an independent texture cache. A failed load
//! yields an error, never a partially-populated model.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod flatten;
pub mod scene;
pub mod upload;

pub use flatten::{
    FlatMesh, FlatVertex, ModelData, TextureKind, TextureRef, TextureResolver, flatten_scene,
};
pub use scene::{MaterialRecord, MeshRecord, NodeRecord, SceneData};
pub use upload::{GpuTextures, upload_model};

/// Flags forwarded to the scene-loading front-ends.
#[derive(Clone, Copy, Debug)]
pub struct ImportOptions {
    /// Ask the loader to triangulate all primitives (OBJ only; glTF assets
    /// are expected to arrive triangulated).
    pub triangulate: bool,
    /// Flip the texture-coordinate V axis while building the scene.
    pub flip_v: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_v: true,
        }
    }
}

/// Why an import failed. Every variant is fatal to the whole call.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse glTF scene {path}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("could not load OBJ scene {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{path} contains no loadable scene content")]
    EmptyScene { path: PathBuf },
    #[error("unsupported scene format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Parse a scene file into its [`SceneData`] representation.
///
/// The format is picked by file extension: `gltf`/`glb` or `obj`.
pub fn load_scene(path: impl AsRef<Path>, options: &ImportOptions) -> Result<SceneData, ImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("gltf") | Some("glb") => scene::load_gltf(path, options),
        Some("obj") => scene::load_obj(path, options),
        _ => Err(ImportError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a scene file and flatten everything reachable from its root.
///
/// Texture paths are resolved relative to the scene file's directory.
pub fn load_model<R: TextureResolver>(
    path: impl AsRef<Path>,
    options: &ImportOptions,
    resolver: &mut R,
) -> Result<ModelData<R::Handle>, ImportError> {
    let path = path.as_ref();
    let scene = load_scene(path, options)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(flatten_scene(&scene, base_dir, resolver))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_scene("scene.fbx", &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat { .. }));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        // Missing file, but the OBJ front-end must be the one reporting it.
        let err = load_scene("does-not-exist.OBJ", &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::Obj { .. }));
    }
}
