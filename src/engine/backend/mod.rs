//! ### English
//! Platform abstraction for the producer side: context creation, slot allocation, and the
//! publish barrier. One implementation per graphics API, chosen at construction time.
//!
//! ### 中文
//! 生产者侧的平台抽象：上下文创建、槽位分配与发布屏障。每种图形 API 一个实现，在构造时选定。
mod gl;
#[cfg(test)]
pub(crate) mod mock;

use std::ffi::{CStr, c_void};

use dpi::PhysicalSize;

use super::error::BridgeError;
use super::frame::TextureHandle;

pub use gl::{GlBackend, GlConsumerWindow, GlFrameSlot};

/// ### English
/// One GPU-backed offscreen render target plus its sampleable texture.
///
/// ### 中文
/// 一个由 GPU 承载的离屏渲染目标及其可采样纹理。
pub trait FrameSlot {
    fn size(&self) -> PhysicalSize<u32>;
    /// ### English
    /// The shareable texture. Framebuffer objects stay private to the producer context.
    ///
    /// ### 中文
    /// 可共享的纹理。framebuffer 对象只属于生产者上下文。
    fn texture(&self) -> TextureHandle;
}

/// ### English
/// Parameters the decode framework passes to `setup()`.
///
/// ### 中文
/// 解码框架传给 `setup()` 的参数。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetupRequest {
    /// ### English
    /// Whether the decoder intends to use hardware decoding on this device.
    ///
    /// ### 中文
    /// 解码器是否打算在该设备上使用硬件解码。
    pub hardware_decoding: bool,
}

/// ### English
/// Graphics API flavour of the producer context.
///
/// ### 中文
/// 生产者上下文的图形 API 类型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum GraphicsApi {
    /// ### English
    /// Desktop OpenGL.
    ///
    /// ### 中文
    /// 桌面 OpenGL。
    OpenGl = 0,
    /// ### English
    /// OpenGL ES.
    ///
    /// ### 中文
    /// OpenGL ES。
    OpenGlEs = 1,
}

/// ### English
/// Device information returned by `setup()` (lets the framework pick its GL vs GLES renderer).
///
/// ### 中文
/// `setup()` 返回的设备信息（供框架选择 GL 或 GLES 渲染器）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    /// ### English
    /// Client API of the producer context (desktop GL or GLES).
    ///
    /// ### 中文
    /// 生产者上下文的客户端 API（桌面 GL 或 GLES）。
    pub api: GraphicsApi,
    /// ### English
    /// Major version parsed from `GL_VERSION`.
    ///
    /// ### 中文
    /// 从 `GL_VERSION` 解析出的主版本号。
    pub version_major: u32,
    /// ### English
    /// Minor version parsed from `GL_VERSION`.
    ///
    /// ### 中文
    /// 从 `GL_VERSION` 解析出的次版本号。
    pub version_minor: u32,
}

/// ### English
/// Per-platform capability set driven by the producer lifecycle.
///
/// All methods are called from the producer thread only, serialized by the decode framework.
///
/// ### 中文
/// 由生产者生命周期驱动的平台能力集合。
///
/// 所有方法只会在生产者线程上调用，并由解码框架保证串行。
pub trait RenderBackend {
    type Slot: FrameSlot;
    /// ### English
    /// Handle the consumer publishes once its own context exists (the share target).
    ///
    /// ### 中文
    /// 消费者在自身上下文创建完成后发布的句柄（共享目标）。
    type ConsumerHandle: Send + Sync + 'static;

    /// ### English
    /// Whether this platform can run a second, resource-sharing context on another thread.
    ///
    /// ### 中文
    /// 该平台能否在另一线程上运行第二个共享资源的上下文。
    fn supports_threaded_contexts(&self) -> bool;

    /// ### English
    /// Creates the producer context sharing resources with `consumer`. Called once; later setups
    /// reuse the same context.
    ///
    /// ### 中文
    /// 创建与 `consumer` 共享资源的生产者上下文。只调用一次；之后的 setup 复用同一上下文。
    fn open(
        &mut self,
        consumer: &Self::ConsumerHandle,
        request: &SetupRequest,
    ) -> Result<DeviceInfo, BridgeError>;

    fn is_open(&self) -> bool;

    /// ### English
    /// Binds (`true`) or unbinds (`false`) the producer context on the calling thread.
    ///
    /// ### 中文
    /// 在调用线程上绑定（`true`）或解绑（`false`）生产者上下文。
    fn make_current(&mut self, active: bool) -> Result<(), BridgeError>;

    /// ### English
    /// Resolves an API entry point through the producer context; NULL if unknown.
    ///
    /// ### 中文
    /// 通过生产者上下文解析 API 入口；未知时返回 NULL。
    fn get_proc_address(&self, name: &CStr) -> *const c_void;

    fn create_slot(
        &mut self,
        index: usize,
        size: PhysicalSize<u32>,
    ) -> Result<Self::Slot, BridgeError>;

    fn destroy_slot(&mut self, slot: Self::Slot);

    /// ### English
    /// Makes `slot` the active render target of the producer context.
    ///
    /// ### 中文
    /// 将 `slot` 设为生产者上下文的当前渲染目标。
    fn bind_slot(&mut self, slot: &Self::Slot);

    /// ### English
    /// Blocks until every command issued for the finished frame is visible to other contexts.
    /// Called before the frame is handed to the consumer.
    ///
    /// ### 中文
    /// 阻塞直到已完成帧的所有命令对其它上下文可见。在帧交给消费者之前调用。
    fn publish_barrier(&mut self);

    /// ### English
    /// Destroys the producer context. Slots must already be destroyed.
    ///
    /// ### 中文
    /// 销毁生产者上下文。调用前槽位必须已全部销毁。
    fn close(&mut self);
}
