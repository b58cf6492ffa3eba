//! A model paired with a set of instances and their GPU buffer.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    instance::Instance,
    model::Model,
};

/// A model drawn many times in one call.
///
/// Holds the CPU-side instance list next to its GPU buffer. Mutate
/// `instances` freely, then call [`write_to_buffer`](Self::write_to_buffer)
/// to push the new transforms; the instance count is fixed at creation.
pub struct InstancedModel {
    pub model: Model,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
}

impl InstancedModel {
    pub fn new(device: &wgpu::Device, model: Model, instances: Vec<Instance>) -> Self {
        let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            model,
            instances,
            instance_buffer,
        }
    }

    /// Upload the current instance transforms to the GPU buffer.
    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        let instance_data = self.instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instance_data));
    }
}
