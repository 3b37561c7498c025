//! In-memory backend used by lifecycle tests. Slots are plain pixel buffers keyed by texture id.

use std::collections::HashMap;
use std::ffi::{CStr, c_void};
use std::sync::{Arc, Mutex, MutexGuard};

use dpi::PhysicalSize;

use crate::engine::error::BridgeError;
use crate::engine::frame::TextureHandle;

use super::{DeviceInfo, FrameSlot, GraphicsApi, RenderBackend, SetupRequest};

#[derive(Default)]
pub(crate) struct GpuState {
    next_texture: u64,
    pub(crate) allocations: usize,
    pub(crate) opens: usize,
    pub(crate) barriers: usize,
    pub(crate) current: bool,
    pub(crate) open: bool,
    /// Fail the n-th `create_slot` call from now (0 = next call).
    pub(crate) fail_at: Option<usize>,
    pub(crate) bound: Option<TextureHandle>,
    /// Slots destroyed while no context was current.
    pub(crate) releases_without_context: usize,
    /// Make `make_current(false)` fail.
    pub(crate) fail_unbind: bool,
    textures: HashMap<TextureHandle, u64>,
}

impl GpuState {
    pub(crate) fn live_textures(&self) -> usize {
        self.textures.len()
    }
}

/// Shared view of the fake GPU, cloned into the test and the backend.
#[derive(Clone, Default)]
pub(crate) struct MockGpu {
    state: Arc<Mutex<GpuState>>,
}

impl MockGpu {
    pub(crate) fn state(&self) -> MutexGuard<'_, GpuState> {
        self.state.lock().expect("mock gpu lock")
    }

    /// Writes `marker` into whatever slot the producer currently has bound.
    pub(crate) fn draw(&self, marker: u64) {
        let mut state = self.state();
        let bound = state.bound.expect("no render target bound");
        state.textures.insert(bound, marker);
    }

    pub(crate) fn read(&self, texture: TextureHandle) -> Option<u64> {
        self.state().textures.get(&texture).copied()
    }
}

pub(crate) struct MockSlot {
    texture: TextureHandle,
    size: PhysicalSize<u32>,
}

impl FrameSlot for MockSlot {
    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn texture(&self) -> TextureHandle {
        self.texture
    }
}

pub(crate) struct MockBackend {
    gpu: MockGpu,
    threaded: bool,
}

impl MockBackend {
    pub(crate) fn new(gpu: &MockGpu) -> Self {
        Self {
            gpu: gpu.clone(),
            threaded: true,
        }
    }

    pub(crate) fn without_threaded_contexts(gpu: &MockGpu) -> Self {
        Self {
            gpu: gpu.clone(),
            threaded: false,
        }
    }
}

impl RenderBackend for MockBackend {
    type Slot = MockSlot;
    type ConsumerHandle = ();

    fn supports_threaded_contexts(&self) -> bool {
        self.threaded
    }

    fn open(&mut self, _consumer: &(), _request: &SetupRequest) -> Result<DeviceInfo, BridgeError> {
        let mut state = self.gpu.state();
        if !state.open {
            state.open = true;
            state.opens += 1;
        }
        Ok(DeviceInfo {
            api: GraphicsApi::OpenGl,
            version_major: 3,
            version_minor: 3,
        })
    }

    fn is_open(&self) -> bool {
        self.gpu.state().open
    }

    fn make_current(&mut self, active: bool) -> Result<(), BridgeError> {
        let mut state = self.gpu.state();
        if active && !state.open {
            return Err(BridgeError::ContextBindFailure("closed".to_string()));
        }
        if !active && state.fail_unbind {
            return Err(BridgeError::ContextBindFailure("unbind rejected".to_string()));
        }
        state.current = active;
        Ok(())
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        if name.to_bytes().starts_with(b"gl") {
            0x1000 as *const c_void
        } else if name.to_bytes().starts_with(b"egl") {
            0x2000 as *const c_void
        } else {
            std::ptr::null()
        }
    }

    fn create_slot(
        &mut self,
        index: usize,
        size: PhysicalSize<u32>,
    ) -> Result<MockSlot, BridgeError> {
        let mut state = self.gpu.state();
        match state.fail_at {
            Some(0) => {
                state.fail_at = None;
                return Err(BridgeError::AllocationFailure {
                    index,
                    size,
                    reason: "injected".to_string(),
                });
            }
            Some(n) => state.fail_at = Some(n - 1),
            None => {}
        }
        state.next_texture += 1;
        let texture = TextureHandle(state.next_texture);
        state.textures.insert(texture, 0);
        state.allocations += 1;
        Ok(MockSlot { texture, size })
    }

    fn destroy_slot(&mut self, slot: MockSlot) {
        let mut state = self.gpu.state();
        if !state.current {
            state.releases_without_context += 1;
        }
        state.textures.remove(&slot.texture);
        if state.bound == Some(slot.texture) {
            state.bound = None;
        }
    }

    fn bind_slot(&mut self, slot: &MockSlot) {
        self.gpu.state().bound = Some(slot.texture);
    }

    fn publish_barrier(&mut self) {
        self.gpu.state().barriers += 1;
    }

    fn close(&mut self) {
        let mut state = self.gpu.state();
        state.open = false;
        state.current = false;
    }
}
