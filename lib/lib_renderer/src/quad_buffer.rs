use bytemuck::cast_slice;
use lib_gpu::{BindingResource, Buffer, BufferDescriptor, BufferUsages, Device, Queue};

use crate::Quad;

/// GPU storage buffer holding one batch of quads.
#[derive(Debug, Clone)]
pub struct QuadBuffer {
    buf: Buffer,
    capacity: usize,
}

impl QuadBuffer {
    pub fn new(capacity: usize, device: &Device) -> Self {
        let capacity = capacity.max(1);

        Self {
            buf: device.create_buffer(&BufferDescriptor {
                label: Some("lib_renderer quad buffer"),
                size: (capacity * size_of::<Quad>()) as u64,
                usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            capacity,
        }
    }

    /// Number of quads the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn write(&self, quads: &[Quad], queue: &Queue) {
        debug_assert!(quads.len() <= self.capacity);

        queue.write_buffer(&self.buf, 0, cast_slice(quads));
    }

    pub fn as_binding(&self) -> BindingResource<'_> {
        self.buf.as_entire_binding()
    }
}
