//! Hit test pixel readback.
//!
//! The synchronous path copies the pixel, submits, and waits for the copy in
//! the same frame. The delayed path alternates between two buffers: each frame
//! requests into one and maps the other, which was requested exactly one frame
//! earlier and has had a whole frame to land.

use wgpu::{Buffer, BufferAddress, BufferDescriptor, BufferUsages, Device, Maintain, MapMode, SubmissionIndex};

use crate::types::Passthrough;

/// Size of each readback buffer. One padded row of a single texel copy.
pub const READBACK_BUFFER_SIZE: BufferAddress = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as BufferAddress;

/// Which buffers a delayed hit test frame uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RingStep {
    /// Slot receiving this frame's pixel.
    pub request: usize,
    /// Slot to map for this frame's reported result.
    pub map: usize,
    /// The map slot holds last frame's pixel. When false there is nothing
    /// worth mapping and the result is [`Passthrough::NONE`].
    pub fresh: bool,
}

/// The double-buffer state machine behind the delayed hit test.
///
/// Every frame must call either [`ReadbackRing::request`] or
/// [`ReadbackRing::skip`] exactly once. Each slot is tagged with the frame
/// that requested it, so a result is only reported when it is exactly one
/// frame old; anything older is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadbackRing {
    frame: u64,
    cursor: usize,
    tags: [Option<u64>; 2],
}

impl ReadbackRing {
    pub const fn new() -> Self {
        Self {
            frame: 0,
            cursor: 0,
            tags: [None; 2],
        }
    }

    /// Index of the next frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances one frame that requests a readback.
    pub fn request(&mut self) -> RingStep {
        let request = self.cursor;
        let map = 1 - request;
        let fresh = self.frame.checked_sub(1).is_some_and(|prev| self.tags[map] == Some(prev));

        self.tags[request] = Some(self.frame);
        self.tags[map] = None;
        self.cursor = map;
        self.frame += 1;

        RingStep { request, map, fresh }
    }

    /// Advances one frame that performs no delayed readback.
    pub fn skip(&mut self) {
        self.frame += 1;
    }
}

/// How this frame's hit test pixel is read back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadbackRequest {
    Synchronous,
    Delayed(RingStep),
}

fn create_readback_buffer(device: &Device, label: &str) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some(label),
        size: READBACK_BUFFER_SIZE,
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Blocks until `submission` finished and returns the first two bytes of
/// `buffer`.
fn read_passthrough(device: &Device, buffer: &Buffer, submission: SubmissionIndex) -> Passthrough {
    let slice = buffer.slice(..4);
    let (sender, receiver) = flume::bounded(1);
    slice.map_async(MapMode::Read, move |result| {
        // The receiver outlives the poll below, so this cannot fail.
        let _ = sender.send(result);
    });
    device.poll(Maintain::WaitForSubmissionIndex(submission));

    match receiver.recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("failed to map hit test readback buffer: {e}"),
        Err(_) => panic!("hit test readback buffer was never mapped"),
    }

    let passthrough = {
        let mapping = slice.get_mapped_range();
        Passthrough::new(mapping[0], mapping[1])
    };
    buffer.unmap();
    passthrough
}

/// GPU side of the hit test: the delayed pair and a dedicated synchronous
/// buffer.
pub(crate) struct HitTestReadback {
    ring: ReadbackRing,
    slots: [Buffer; 2],
    submissions: [Option<SubmissionIndex>; 2],
    sync_buffer: Buffer,
}

impl HitTestReadback {
    pub fn new(device: &Device) -> Self {
        Self {
            ring: ReadbackRing::new(),
            slots: [
                create_readback_buffer(device, "hit test readback 0"),
                create_readback_buffer(device, "hit test readback 1"),
            ],
            submissions: [None, None],
            sync_buffer: create_readback_buffer(device, "hit test readback sync"),
        }
    }

    /// Starts a frame that reads back a pixel.
    pub fn begin(&mut self, delayed: bool) -> ReadbackRequest {
        if delayed {
            ReadbackRequest::Delayed(self.ring.request())
        } else {
            self.ring.skip();
            ReadbackRequest::Synchronous
        }
    }

    /// Starts a frame without a hit test.
    pub fn skip(&mut self) {
        self.ring.skip();
    }

    /// The buffer the pixel copy of `request` goes into.
    pub fn destination(&self, request: ReadbackRequest) -> &Buffer {
        match request {
            ReadbackRequest::Synchronous => &self.sync_buffer,
            ReadbackRequest::Delayed(step) => &self.slots[step.request],
        }
    }

    /// Resolves the frame's reported result once its commands are submitted.
    pub fn finish(&mut self, device: &Device, request: ReadbackRequest, submission: SubmissionIndex) -> Passthrough {
        match request {
            ReadbackRequest::Synchronous => read_passthrough(device, &self.sync_buffer, submission),
            ReadbackRequest::Delayed(step) => {
                self.submissions[step.request] = Some(submission);
                let previous = self.submissions[step.map].take();
                match previous {
                    Some(previous) if step.fresh => read_passthrough(device, &self.slots[step.map], previous),
                    _ => Passthrough::NONE,
                }
            }
        }
    }
}
