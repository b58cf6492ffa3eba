//! Basic lighting: Blinn-Phong cube plus an orbiting light marker.

use std::path::Path;

use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use instant::Duration;
use prism::{
    app::{self, Demo},
    context::Context,
    data_structures::{
        block::InstancedModel,
        instance::Instance,
        model::{DrawLight, DrawModel},
    },
    import::{self, GpuTextures, ImportOptions, upload_model},
    pipelines::{
        light::mk_light_pipeline,
        model::{material_layout, mk_model_pipeline},
    },
};

struct Lighting {
    model_pipeline: wgpu::RenderPipeline,
    light_pipeline: wgpu::RenderPipeline,
    cube: InstancedModel,
}

impl Demo for Lighting {
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

        let mut instance = Instance::new();
        instance.scale = [1.5; 3].into();
        let cube = InstancedModel::new(&ctx.device, model, vec![instance]);

        let model_pipeline = mk_model_pipeline(
            &ctx.device,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
        )?;
        let light_pipeline = mk_light_pipeline(
            &ctx.device,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
        )?;

        ctx.light.uniform.position = [3.0, 2.0, 3.0];

        Ok(Self {
            model_pipeline,
            light_pipeline,
            cube,
        })
    }

    fn update(&mut self, ctx: &mut Context, dt: Duration) {
        // Swing the light around the cube; the event loop pushes the
        // uniform to the GPU each frame.
        let old_position: Vector3<f32> = ctx.light.uniform.position.into();
        let rotation = Quaternion::from_axis_angle(
            Vector3::unit_y(),
            Deg(60.0 * dt.as_secs_f32()),
        );
        ctx.light.uniform.position = (rotation * old_position).into();
    }

    fn render(
        &mut self,
        ctx: &Context,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Lighting Pass"),
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

        render_pass.set_pipeline(&self.light_pipeline);
        render_pass.draw_light_model(
            &self.cube.model,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );

        render_pass.set_pipeline(&self.model_pipeline);
        render_pass.set_vertex_buffer(1, self.cube.instance_buffer.slice(..));
        render_pass.draw_model_instanced(
            &self.cube.model,
            0..self.cube.instances.len() as u32,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}

fn main() -> anyhow::Result<()> {
    app::run::<Lighting>("prism: lighting")
}
