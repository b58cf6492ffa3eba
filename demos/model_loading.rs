//! Model loading: import a scene file, flatten it and draw the result.
//!
//! Pass a `.obj`, `.gltf` or `.glb` path as the first argument; without
//! one the bundled cube is used. A failed import aborts with the error —
//! a partially-loaded model is never drawn.

use std::path::{Path, PathBuf};

use prism::{
    app::{self, Demo},
    camera::Camera,
    context::Context,
    data_structures::{
        block::InstancedModel,
        instance::Instance,
        model::DrawModel,
    },
    import::{self, GpuTextures, ImportOptions, upload_model},
    pipelines::model::{material_layout, mk_model_pipeline},
};

fn scene_path() -> PathBuf {
    match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join("cube.obj"),
    }
}

struct ModelLoading {
    pipeline: wgpu::RenderPipeline,
    model: InstancedModel,
}

impl Demo for ModelLoading {
    fn init(ctx: &mut Context) -> anyhow::Result<Self> {
        let path = scene_path();
        let mut resolver = GpuTextures {
            device: &ctx.device,
            queue: &ctx.queue,
        };
        let data = import::load_model(&path, &ImportOptions::default(), &mut resolver)?;
        log::info!(
            "imported {} with {} meshes",
            path.display(),
            data.meshes.len()
        );

        let layout = material_layout(&ctx.device);
        let uploaded = upload_model(&ctx.device, &ctx.queue, &data, &layout);
        let model = InstancedModel::new(&ctx.device, uploaded, vec![Instance::default()]);

        let pipeline = mk_model_pipeline(
            &ctx.device,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
        )?;

        ctx.camera.camera = Camera::new((0.0, 2.0, 5.0), cgmath::Deg(-90.0), cgmath::Deg(-20.0));

        Ok(Self { pipeline, model })
    }

    fn render(
        &mut self,
        ctx: &Context,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Model Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: ctx.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(1, self.model.instance_buffer.slice(..));
        render_pass.draw_model_instanced(
            &self.model.model,
            0..self.model.instances.len() as u32,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}

fn main() -> anyhow::Result<()> {
    app::run::<ModelLoading>("prism: model loading")
}
