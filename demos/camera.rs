//! Orbiting camera: a ring of imported cubes watched from a circling eye.

use std::path::Path;

use cgmath::{Deg, Point3, Quaternion, Rad, Rotation3};
use instant::Duration;
use prism::{
    app::{self, Demo},
    context::Context,
    data_structures::{
        block::InstancedModel,
        instance::Instance,
        model::DrawModel,
    },
    import::{self, GpuTextures, ImportOptions, upload_model},
    pipelines::model::{material_layout, mk_model_pipeline},
};

const RING_RADIUS: f32 = 4.0;
const ORBIT_RADIUS: f32 = 9.0;

struct CameraDemo {
    pipeline: wgpu::RenderPipeline,
    cubes: InstancedModel,
    angle: f32,
}

impl Demo for CameraDemo {
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

        let mut instances = vec![Instance::default()];
        for i in 0..8 {
            let angle = Rad(i as f32 / 8.0 * std::f32::consts::TAU);
            let mut instance = Instance::new();
            instance.position =
                cgmath::Vector3::new(RING_RADIUS * angle.0.cos(), 0.0, RING_RADIUS * angle.0.sin());
            instance.rotation = Quaternion::from_angle_y(angle);
            instances.push(instance);
        }
        let cubes = InstancedModel::new(&ctx.device, model, instances);

        let pipeline = mk_model_pipeline(
            &ctx.device,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
        )?;

        ctx.light.uniform.position = [0.0, 8.0, 0.0];

        Ok(Self {
            pipeline,
            cubes,
            angle: 0.0,
        })
    }

    fn update(&mut self, ctx: &mut Context, dt: Duration) {
        // Circle the origin; yaw faces the center, which for a point on
        // the circle at `angle` is `angle + pi`.
        self.angle += 0.5 * dt.as_secs_f32();
        ctx.camera.camera.position = Point3::new(
            ORBIT_RADIUS * self.angle.cos(),
            3.0,
            ORBIT_RADIUS * self.angle.sin(),
        );
        ctx.camera.camera.yaw = Rad(self.angle + std::f32::consts::PI);
        ctx.camera.camera.pitch = Deg(-16.0).into();
    }

    fn render(
        &mut self,
        ctx: &Context,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Camera Pass"),
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
    app::run::<CameraDemo>("prism: camera")
}
