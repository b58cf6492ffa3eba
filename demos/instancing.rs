//! Geometry instancing: a cube grid drawn with one instanced call.

use std::path::Path;

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

const GRID_LEN: usize = 10;
const SPACING: f32 = 2.5;

struct Instancing {
    pipeline: wgpu::RenderPipeline,
    cubes: InstancedModel,
}

impl Demo for Instancing {
    fn init(ctx: &mut Context) -> anyhow::Result<Self> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join("cube.obj");
        let mut resolver = GpuTextures {
            device: &ctx.device,
            queue: &ctx.queue,
        };
        let data = import::load_model(&path, &ImportOptions::default(), &mut resolver)?;
        let layout = material_layout(&ctx.device);
        let model = upload_model(&ctx.device, &ctx.queue, &data, &layout);

        // GRID_LEN^3 cube lattice centered on the origin.
        let offset = GRID_LEN as f32 / 2.0;
        let instances = (0..GRID_LEN * GRID_LEN * GRID_LEN)
            .map(|i| {
                let x = i % GRID_LEN;
                let y = (i / GRID_LEN) % GRID_LEN;
                let z = i / (GRID_LEN * GRID_LEN);
                let mut instance = Instance::new();
                instance.position = cgmath::Vector3::new(
                    (x as f32 - offset) * SPACING,
                    (y as f32 - offset) * SPACING,
                    (z as f32 - offset) * SPACING,
                );
                instance.scale = [0.4; 3].into();
                instance
            })
            .collect::<Vec<_>>();
        let cubes = InstancedModel::new(&ctx.device, model, instances);

        let pipeline = mk_model_pipeline(
            &ctx.device,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
        )?;

        ctx.camera.camera = Camera::new((0.0, 14.0, 32.0), cgmath::Deg(-90.0), cgmath::Deg(-22.0));
        ctx.light.uniform.position = [0.0, 30.0, 20.0];

        Ok(Self { pipeline, cubes })
    }

    fn render(
        &mut self,
        ctx: &Context,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Instancing Pass"),
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
        render_pass.set_vertex_buffer(1, self.cubes.instance_buffer.slice(..));
        render_pass.draw_model_instanced(
            &self.cubes.model,
            0..self.cubes.instances.len() as u32,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}

fn main() -> anyhow::Result<()> {
    app::run::<Instancing>("prism: instancing")
}
