// Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::Path;

use prism::import::{
    MaterialRecord, MeshRecord, NodeRecord, SceneData, TextureKind, TextureResolver,
};

/// Fake texture collaborator: hands out incrementing ids and records every
/// path it was asked for, optionally failing specific paths.
#[derive(Default)]
pub struct CountingResolver {
    pub calls: Vec<String>,
    pub fail_paths: Vec<String>,
    next_handle: u32,
}

impl TextureResolver for CountingResolver {
    type Handle = u32;

    fn load(&mut self, path: &str, _base_dir: &Path, _kind: TextureKind) -> anyhow::Result<u32> {
        self.calls.push(path.to_string());
        if self.fail_paths.iter().any(|p| p == path) {
            anyhow::bail!("simulated unreadable image: {path}");
        }
        self.next_handle += 1;
        Ok(self.next_handle)
    }
}

impl CountingResolver {
    pub fn calls_for(&self, path: &str) -> usize {
        self.calls.iter().filter(|p| *p == path).count()
    }
}

pub fn mesh(name: &str, vertex_count: usize, faces: &[&[u32]], material: Option<usize>) -> MeshRecord {
    MeshRecord {
        name: name.to_string(),
        positions: (0..vertex_count)
            .map(|i| [i as f32, 0.0, 0.0])
            .collect(),
        normals: None,
        tex_coords: None,
        faces: faces.iter().map(|f| f.to_vec()).collect(),
        material,
    }
}

pub fn material(name: &str, diffuse: &[&str], specular: &[&str]) -> MaterialRecord {
    MaterialRecord {
        name: name.to_string(),
        diffuse_textures: diffuse.iter().map(|p| p.to_string()).collect(),
        specular_textures: specular.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn node(name: &str, meshes: &[usize], children: Vec<NodeRecord>) -> NodeRecord {
    NodeRecord {
        name: name.to_string(),
        meshes: meshes.to_vec(),
        children,
    }
}

pub fn scene(root: NodeRecord, meshes: Vec<MeshRecord>, materials: Vec<MaterialRecord>) -> SceneData {
    SceneData {
        root,
        meshes,
        materials,
    }
}
