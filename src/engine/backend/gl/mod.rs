//! ### English
//! OpenGL backend: a GLFW offscreen context sharing objects with the consumer window.
//!
//! ### 中文
//! OpenGL 后端：与消费者 window 共享对象的 GLFW 离屏上下文。
mod context;
mod slot;

use std::ffi::{CStr, c_void};

use dpi::PhysicalSize;
use glow::HasContext as _;

use crate::engine::error::BridgeError;
use crate::engine::glfw::{GlfwApi, GlfwWindowPtr};

use self::context::GlfwProducerContext;
pub use self::slot::GlFrameSlot;

use super::{DeviceInfo, RenderBackend, SetupRequest};

/// ### English
/// The consumer's GLFW window (`GLFWwindow*`), published once its context exists.
///
/// ### 中文
/// 消费者的 GLFW window（`GLFWwindow*`），在其上下文创建后发布。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlConsumerWindow(*mut c_void);

impl GlConsumerWindow {
    /// ### English
    /// Wraps a raw `GLFWwindow*`. Returns `None` for NULL.
    ///
    /// ### 中文
    /// 包装一个原始 `GLFWwindow*`。传入 NULL 时返回 `None`。
    pub fn new(window: *mut c_void) -> Option<Self> {
        (!window.is_null()).then_some(Self(window))
    }

    #[inline]
    fn as_glfw(self) -> GlfwWindowPtr {
        self.0.cast()
    }
}

/// SAFETY: the pointer is only used as a share target while creating the producer context; the
/// consumer window itself is never touched from another thread.
unsafe impl Send for GlConsumerWindow {}
unsafe impl Sync for GlConsumerWindow {}

pub struct GlBackend {
    context: Option<GlfwProducerContext>,
    next_serial: u64,
}

/// SAFETY: the backend is owned by one `VideoOutput`, whose calls the decode framework serializes
/// on the producer thread. The GL context is only ever current on that thread.
unsafe impl Send for GlBackend {}

impl GlBackend {
    pub const fn new() -> Self {
        Self {
            context: None,
            next_serial: 0,
        }
    }

    fn gl(&self) -> Option<&glow::Context> {
        self.context.as_ref().map(GlfwProducerContext::gl)
    }
}

impl Default for GlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for GlBackend {
    type Slot = GlFrameSlot;
    type ConsumerHandle = GlConsumerWindow;

    fn supports_threaded_contexts(&self) -> bool {
        GlfwApi::is_installed()
    }

    fn open(
        &mut self,
        consumer: &GlConsumerWindow,
        request: &SetupRequest,
    ) -> Result<DeviceInfo, BridgeError> {
        if self.context.is_none() {
            let glfw = GlfwApi::load().map_err(BridgeError::CapabilityUnavailable)?;
            let context = GlfwProducerContext::new(glfw, consumer.as_glfw())
                .map_err(BridgeError::ContextCreation)?;
            self.context = Some(context);
        }
        let Some(context) = self.context.as_ref() else {
            return Err(BridgeError::ContextCreation(
                "producer context missing after creation".to_string(),
            ));
        };

        let (version_major, version_minor) = context.version();
        tracing::info!(
            api = ?context.api(),
            version_major,
            version_minor,
            hardware_decoding = request.hardware_decoding,
            "OpenGL producer device ready"
        );
        Ok(DeviceInfo {
            api: context.api(),
            version_major,
            version_minor,
        })
    }

    fn is_open(&self) -> bool {
        self.context.is_some()
    }

    fn make_current(&mut self, active: bool) -> Result<(), BridgeError> {
        match self.context.as_ref() {
            Some(context) => {
                context.make_current(active);
                Ok(())
            }
            None if !active => Ok(()),
            None => Err(BridgeError::ContextBindFailure(
                "producer context has not been created".to_string(),
            )),
        }
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        match self.context.as_ref() {
            Some(context) => context.get_proc_address(name),
            None => match GlfwApi::load() {
                Ok(glfw) => unsafe { glfw.get_proc_address(name) },
                Err(_) => std::ptr::null(),
            },
        }
    }

    fn create_slot(
        &mut self,
        index: usize,
        size: PhysicalSize<u32>,
    ) -> Result<GlFrameSlot, BridgeError> {
        let Some(gl) = self.gl() else {
            return Err(BridgeError::AllocationFailure {
                index,
                size,
                reason: "producer context has not been created".to_string(),
            });
        };
        let serial = self.next_serial;
        let slot = GlFrameSlot::new(gl, index, size, serial)?;
        self.next_serial += 1;
        tracing::trace!(index, serial = slot.serial(), ?size, "frame slot allocated");
        Ok(slot)
    }

    fn destroy_slot(&mut self, slot: GlFrameSlot) {
        if let Some(gl) = self.gl() {
            tracing::trace!(serial = slot.serial(), "frame slot released");
            slot.delete(gl);
        }
    }

    fn bind_slot(&mut self, slot: &GlFrameSlot) {
        if let Some(gl) = self.gl() {
            slot.bind(gl);
        }
    }

    fn publish_barrier(&mut self) {
        if let Some(gl) = self.gl() {
            unsafe { gl.finish() };
        }
    }

    fn close(&mut self) {
        if self.context.take().is_some() {
            tracing::debug!("producer GL context destroyed");
        }
    }
}
