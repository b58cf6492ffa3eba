//! Flattening a scene hierarchy into device-ready mesh data.
//!
//! This is a pure CPU transform: the walk visits every node of the scene
//! tree once, turns each referenced mesh record into a [`FlatMesh`], and
//! resolves material textures through a caller-supplied [`TextureResolver`].
//! No GPU calls happen here; uploading the results is the caller's job
//! (see [`crate::import::upload`]).

use std::{collections::HashMap, path::Path};

use crate::import::scene::{MeshRecord, NodeRecord, SceneData};

/// A single vertex of a flattened mesh. Missing source attributes default
/// to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Which material slot a texture was resolved from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    /// Human-readable label, e.g. for shader uniform naming conventions.
    pub fn label(&self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
        }
    }
}

/// A resolved texture: the collaborator's handle plus the slot and source
/// path it was resolved for.
#[derive(Clone, Debug)]
pub struct TextureRef<H> {
    pub handle: H,
    pub kind: TextureKind,
    pub path: String,
}

/// One flattened mesh: vertices and indices in source order, plus the
/// textures its material resolved to. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct FlatMesh<H> {
    pub name: String,
    pub vertices: Vec<FlatVertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<TextureRef<H>>,
}

/// The importer's output collection: every mesh reachable from the scene
/// root, in traversal order.
#[derive(Clone, Debug, Default)]
pub struct ModelData<H> {
    pub meshes: Vec<FlatMesh<H>>,
}

/// Loads (and typically uploads) a texture by source path.
///
/// The importer treats this as an opaque dependency: given a path relative
/// to `base_dir`, produce a handle or fail with a descriptive error. The
/// flatten pass guarantees at most one call per distinct path, so an
/// implementation need not de-duplicate on its own.
pub trait TextureResolver {
    type Handle: Clone;

    fn load(&mut self, path: &str, base_dir: &Path, kind: TextureKind) -> anyhow::Result<Self::Handle>;
}

/// Walk `scene` depth-first and flatten every referenced mesh record.
///
/// Order is deterministic: a node's own meshes come before its children's,
/// and both are visited in stored order. Texture failures are logged and
/// the affected texture omitted; the walk itself cannot fail.
pub fn flatten_scene<R: TextureResolver>(
    scene: &SceneData,
    base_dir: &Path,
    resolver: &mut R,
) -> ModelData<R::Handle> {
    let mut pass = FlattenPass {
        scene,
        base_dir,
        resolver,
        loaded: HashMap::new(),
        meshes: Vec::new(),
    };
    pass.visit(&scene.root);
    ModelData { meshes: pass.meshes }
}

struct FlattenPass<'a, R: TextureResolver> {
    scene: &'a SceneData,
    base_dir: &'a Path,
    resolver: &'a mut R,
    /// Per-pass texture cache, keyed by source path. At most one resolver
    /// call per distinct path.
    loaded: HashMap<String, TextureRef<R::Handle>>,
    meshes: Vec<FlatMesh<R::Handle>>,
}

impl<'a, R: TextureResolver> FlattenPass<'a, R> {
    fn visit(&mut self, node: &'a NodeRecord) {
        let scene = self.scene;
        for &mesh_index in &node.meshes {
            match scene.meshes.get(mesh_index) {
                Some(record) => {
                    let mesh = self.flatten_mesh(record);
                    self.meshes.push(mesh);
                }
                None => log::warn!(
                    "node {:?} references mesh {} which is not in the scene table",
                    node.name,
                    mesh_index
                ),
            }
        }
        for child in &node.children {
            self.visit(child);
        }
    }

    fn flatten_mesh(&mut self, record: &MeshRecord) -> FlatMesh<R::Handle> {
        let scene = self.scene;
        let mut vertices = Vec::with_capacity(record.positions.len());
        for (i, &position) in record.positions.iter().enumerate() {
            vertices.push(FlatVertex {
                position,
                normal: record
                    .normals
                    .as_ref()
                    .and_then(|normals| normals.get(i))
                    .copied()
                    .unwrap_or([0.0; 3]),
                tex_coords: record
                    .tex_coords
                    .as_ref()
                    .and_then(|coords| coords.get(i))
                    .copied()
                    .unwrap_or([0.0; 2]),
            });
        }

        let mut indices = Vec::new();
        for face in &record.faces {
            for &index in face {
                indices.push(index);
            }
        }

        let mut textures = Vec::new();
        if let Some(material) = record.material.and_then(|m| scene.materials.get(m)) {
            textures.extend(self.resolve_textures(&material.diffuse_textures, TextureKind::Diffuse));
            textures.extend(self.resolve_textures(&material.specular_textures, TextureKind::Specular));
        }

        FlatMesh {
            name: record.name.clone(),
            vertices,
            indices,
            textures,
        }
    }

    /// Resolve one material slot's texture paths, reusing cached handles.
    fn resolve_textures(&mut self, paths: &[String], kind: TextureKind) -> Vec<TextureRef<R::Handle>> {
        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(cached) = self.loaded.get(path) {
                resolved.push(cached.clone());
                continue;
            }
            match self.resolver.load(path, self.base_dir, kind) {
                Ok(handle) => {
                    let texture = TextureRef {
                        handle,
                        kind,
                        path: path.clone(),
                    };
                    self.loaded.insert(path.clone(), texture.clone());
                    resolved.push(texture);
                }
                Err(e) => {
                    log::warn!("could not load texture {:?}: {:#}", path, e);
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::scene::MaterialRecord;

    struct NoTextures;
    impl TextureResolver for NoTextures {
        type Handle = u32;

        fn load(&mut self, _: &str, _: &Path, _: TextureKind) -> anyhow::Result<u32> {
            unreachable!("no materials in this scene");
        }
    }

    #[test]
    fn missing_attributes_default_to_zero() {
        let scene = SceneData {
            root: NodeRecord {
                meshes: vec![0],
                ..Default::default()
            },
            meshes: vec![MeshRecord {
                name: "bare".to_string(),
                positions: vec![[1.0, 2.0, 3.0]],
                faces: vec![vec![0]],
                ..Default::default()
            }],
            materials: Vec::new(),
        };
        let model = flatten_scene(&scene, Path::new("."), &mut NoTextures);
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(
            model.meshes[0].vertices[0],
            FlatVertex {
                position: [1.0, 2.0, 3.0],
                normal: [0.0; 3],
                tex_coords: [0.0; 2],
            }
        );
    }

    #[test]
    fn out_of_table_mesh_reference_is_skipped() {
        let scene = SceneData {
            root: NodeRecord {
                meshes: vec![7],
                ..Default::default()
            },
            meshes: Vec::new(),
            materials: vec![MaterialRecord::default()],
        };
        let model = flatten_scene(&scene, Path::new("."), &mut NoTextures);
        assert!(model.meshes.is_empty());
    }
}
