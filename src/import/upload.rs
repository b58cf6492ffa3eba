//! GPU upload of flattened import data.
//!
//! Two collaborators live here: [`GpuTextures`], the production
//! [`TextureResolver`] that reads image files below the model's directory
//! and uploads them, and [`upload_model`], which turns a [`ModelData`]
//! into vertex/index buffers and materials.

use std::path::Path;

use anyhow::Context;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{Material, Mesh, Model, ModelVertex},
        texture::Texture,
    },
    import::flatten::{ModelData, TextureKind, TextureResolver},
};

/// Resolves texture paths by reading the file and uploading it.
///
/// Diffuse maps are uploaded as sRGB, everything else as linear data.
/// De-duplication is the flatten pass's job; every call here is a fresh
/// read and upload.
pub struct GpuTextures<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

impl TextureResolver for GpuTextures<'_> {
    type Handle = Texture;

    fn load(&mut self, path: &str, base_dir: &Path, kind: TextureKind) -> anyhow::Result<Texture> {
        let full_path = base_dir.join(path);
        let data = std::fs::read(&full_path)
            .with_context(|| format!("reading texture file {}", full_path.display()))?;
        let format = full_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        Texture::from_bytes(
            self.device,
            self.queue,
            &data,
            path,
            format.as_deref(),
            kind == TextureKind::Diffuse,
        )
        .with_context(|| format!("decoding texture file {}", full_path.display()))
    }
}

/// Upload flattened meshes as a drawable [`Model`].
///
/// Each mesh gets one material: its first resolved diffuse and specular
/// textures, with solid-color fallbacks for empty slots. Pure device
/// upload; no file I/O happens here.
pub fn upload_model(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &ModelData<Texture>,
    layout: &wgpu::BindGroupLayout,
) -> Model {
    let mut meshes = Vec::with_capacity(data.meshes.len());
    let mut materials = Vec::with_capacity(data.meshes.len());

    for flat in &data.meshes {
        let vertices = flat
            .vertices
            .iter()
            .map(|v| ModelVertex {
                position: v.position,
                tex_coords: v.tex_coords,
                normal: v.normal,
            })
            .collect::<Vec<_>>();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", flat.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", flat.name)),
            contents: bytemuck::cast_slice(&flat.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let diffuse = flat
            .textures
            .iter()
            .find(|t| t.kind == TextureKind::Diffuse)
            .map(|t| t.handle.clone())
            .unwrap_or_else(|| {
                Texture::from_pixel(device, queue, [255, 255, 255, 255], "default diffuse")
            });
        let specular = flat
            .textures
            .iter()
            .find(|t| t.kind == TextureKind::Specular)
            .map(|t| t.handle.clone())
            .unwrap_or_else(|| {
                Texture::from_pixel(device, queue, [32, 32, 32, 255], "default specular")
            });
        materials.push(Material::new(device, &flat.name, diffuse, specular, layout));

        meshes.push(Mesh {
            name: flat.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: flat.indices.len() as u32,
            material: materials.len() - 1,
        });
    }

    Model { meshes, materials }
}
