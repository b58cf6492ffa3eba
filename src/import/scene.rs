//! CPU-side scene representation and the format front-ends that produce it.
//!
//! A [`SceneData`] is the loader-agnostic input to flattening: a node
//! hierarchy plus a flat table of mesh records and a table of materials.
//! Nothing in this module touches the GPU.

use std::{collections::HashMap, fs, io::{BufReader, Cursor}, path::Path};

use crate::import::{ImportError, ImportOptions};

/// One element of the scene hierarchy.
///
/// Children are owned values, so the tree is acyclic and finite by
/// construction; traversal termination needs no visited set.
#[derive(Clone, Debug, Default)]
pub struct NodeRecord {
    pub name: String,
    /// Indices into [`SceneData::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<NodeRecord>,
}

/// Raw per-primitive geometry and material reference, prior to flattening.
///
/// Attribute arrays are parallel: slot `i` of each present array belongs to
/// vertex `i`. Absent arrays mean the source provided no such attribute.
#[derive(Clone, Debug, Default)]
pub struct MeshRecord {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    /// One entry per face; each entry lists that face's vertex indices in
    /// stored order. Faces are not triangulated here.
    pub faces: Vec<Vec<u32>>,
    /// Index into [`SceneData::materials`].
    pub material: Option<usize>,
}

/// A named bundle of texture references, as source paths relative to the
/// scene file's directory.
#[derive(Clone, Debug, Default)]
pub struct MaterialRecord {
    pub name: String,
    pub diffuse_textures: Vec<String>,
    pub specular_textures: Vec<String>,
}

/// The root-level imported representation of a 3D asset.
#[derive(Clone, Debug, Default)]
pub struct SceneData {
    pub root: NodeRecord,
    pub meshes: Vec<MeshRecord>,
    pub materials: Vec<MaterialRecord>,
}

impl SceneData {
    /// Total number of mesh references reachable from the root.
    pub fn mesh_reference_count(&self) -> usize {
        fn count(node: &NodeRecord) -> usize {
            node.meshes.len() + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

pub(crate) fn load_gltf(path: &Path, options: &ImportOptions) -> Result<SceneData, ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(Cursor::new(bytes));
    let gltf = gltf::Gltf::from_reader(reader).map_err(|source| ImportError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    // Resolve buffers up front: GLB blob or sidecar files next to the scene.
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                }
            }
            gltf::buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    return Err(ImportError::Read {
                        path: path.to_path_buf(),
                        source: std::io::Error::other("base64 data URIs are not supported"),
                    });
                }
                let bin = fs::read(base_dir.join(uri)).map_err(|source| ImportError::Read {
                    path: base_dir.join(uri),
                    source,
                })?;
                buffer_data.push(bin);
            }
        }
    }

    let materials = gltf
        .materials()
        .filter(|material| material.index().is_some())
        .map(|material| {
            let mut record = MaterialRecord {
                name: material.name().unwrap_or("unnamed_material").to_string(),
                ..Default::default()
            };
            if let Some(info) = material.pbr_metallic_roughness().base_color_texture() {
                match info.texture().source().source() {
                    gltf::image::Source::Uri { uri, .. } => {
                        record.diffuse_textures.push(uri.to_string());
                    }
                    gltf::image::Source::View { .. } => {
                        log::warn!(
                            "material {:?} uses an embedded texture, which has no path identity; skipping",
                            record.name
                        );
                    }
                }
            }
            record
        })
        .collect::<Vec<_>>();

    // One record per primitive: a primitive carries exactly one material
    // reference, which is what a mesh record models.
    let mut meshes = Vec::new();
    let mut records_by_mesh: HashMap<usize, Vec<usize>> = HashMap::new();
    for mesh in gltf.meshes() {
        let mesh_name = mesh.name().unwrap_or("unnamed_mesh").to_string();
        for primitive in mesh.primitives() {
            if !matches!(primitive.mode(), gltf::mesh::Mode::Triangles) {
                log::warn!(
                    "skipping primitive {} of mesh {:?}: unsupported mode {:?}",
                    primitive.index(),
                    mesh_name,
                    primitive.mode()
                );
                continue;
            }
            let reader = primitive
                .reader(|buffer| buffer_data.get(buffer.index()).map(|data| data.as_slice()));

            let positions = match reader.read_positions() {
                Some(iter) => iter.collect::<Vec<_>>(),
                None => {
                    log::warn!(
                        "skipping primitive {} of mesh {:?}: no position data",
                        primitive.index(),
                        mesh_name
                    );
                    continue;
                }
            };
            let normals = reader.read_normals().map(|iter| iter.collect::<Vec<_>>());
            let tex_coords = reader.read_tex_coords(0).map(|coords| {
                coords
                    .into_f32()
                    .map(|[u, v]| [u, if options.flip_v { 1.0 - v } else { v }])
                    .collect::<Vec<_>>()
            });

            let indices = match reader.read_indices() {
                Some(raw) => raw.into_u32().collect::<Vec<u32>>(),
                // Non-indexed geometry: every consecutive triple is a face.
                None => (0..positions.len() as u32).collect(),
            };
            let faces = indices
                .chunks_exact(3)
                .map(|face| face.to_vec())
                .collect::<Vec<_>>();

            records_by_mesh
                .entry(mesh.index())
                .or_default()
                .push(meshes.len());
            meshes.push(MeshRecord {
                name: mesh_name.clone(),
                positions,
                normals,
                tex_coords,
                faces,
                material: primitive.material().index(),
            });
        }
    }

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| ImportError::EmptyScene {
            path: path.to_path_buf(),
        })?;
    let children = scene
        .nodes()
        .map(|node| convert_node(node, &records_by_mesh))
        .collect::<Vec<_>>();
    if children.is_empty() {
        return Err(ImportError::EmptyScene {
            path: path.to_path_buf(),
        });
    }

    Ok(SceneData {
        root: NodeRecord {
            name: scene.name().unwrap_or("scene").to_string(),
            meshes: Vec::new(),
            children,
        },
        meshes,
        materials,
    })
}

fn convert_node(node: gltf::scene::Node, records_by_mesh: &HashMap<usize, Vec<usize>>) -> NodeRecord {
    let meshes = node
        .mesh()
        .and_then(|mesh| records_by_mesh.get(&mesh.index()).cloned())
        .unwrap_or_default();
    NodeRecord {
        name: node.name().unwrap_or("unnamed_node").to_string(),
        meshes,
        children: node
            .children()
            .map(|child| convert_node(child, records_by_mesh))
            .collect(),
    }
}

pub(crate) fn load_obj(path: &Path, options: &ImportOptions) -> Result<SceneData, ImportError> {
    let (models, obj_materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: options.triangulate,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| ImportError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    if models.is_empty() {
        return Err(ImportError::EmptyScene {
            path: path.to_path_buf(),
        });
    }

    // A failed MTL lookup degrades to an untextured model rather than
    // failing the whole import.
    let materials = match obj_materials {
        Ok(materials) => materials
            .into_iter()
            .map(|material| MaterialRecord {
                name: material.name,
                diffuse_textures: material.diffuse_texture.into_iter().collect(),
                specular_textures: material.specular_texture.into_iter().collect(),
            })
            .collect(),
        Err(source) => {
            log::warn!("no usable material library for {}: {}", path.display(), source);
            Vec::new()
        }
    };

    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let positions = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect::<Vec<_>>();
            let normals = (!mesh.normals.is_empty()).then(|| {
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect::<Vec<_>>()
            });
            let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
                mesh.texcoords
                    .chunks_exact(2)
                    .map(|t| [t[0], if options.flip_v { 1.0 - t[1] } else { t[1] }])
                    .collect::<Vec<_>>()
            });
            let faces = if mesh.face_arities.is_empty() {
                mesh.indices.chunks_exact(3).map(|f| f.to_vec()).collect()
            } else {
                let mut faces = Vec::with_capacity(mesh.face_arities.len());
                let mut next = 0usize;
                for arity in &mesh.face_arities {
                    let end = next + *arity as usize;
                    faces.push(mesh.indices[next..end].to_vec());
                    next = end;
                }
                faces
            };
            MeshRecord {
                name: model.name,
                positions,
                normals,
                tex_coords,
                faces,
                material: mesh.material_id,
            }
        })
        .collect::<Vec<_>>();

    // OBJ has no hierarchy: all records hang off a single root node.
    Ok(SceneData {
        root: NodeRecord {
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "obj".to_string()),
            meshes: (0..meshes.len()).collect(),
            children: Vec::new(),
        },
        meshes,
        materials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_reference_count_walks_the_whole_tree() {
        let scene = SceneData {
            root: NodeRecord {
                meshes: vec![0],
                children: vec![
                    NodeRecord {
                        meshes: vec![1, 2],
                        ..Default::default()
                    },
                    NodeRecord {
                        children: vec![NodeRecord {
                            meshes: vec![0],
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(scene.mesh_reference_count(), 4);
    }
}
