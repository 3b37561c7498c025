/// ### English
/// `frame_bridge` crate root.
/// Triple-buffered GPU frame handoff between a decoder thread (producer) and a UI thread
/// (consumer). Exposes a C ABI via `ffi`; core implementation lives under `engine`.
///
/// ### 中文
/// `frame_bridge` 的 crate 根。
/// 在解码线程（生产者）与 UI 线程（消费者）之间进行三缓冲 GPU 帧交接。
/// 通过 `ffi` 导出 C ABI；核心实现位于 `engine` 模块。
mod engine;
mod ffi;

pub use engine::{
    AcquiredFrame, BridgeConfig, BridgeError, ColorPrimaries, ColorSpace, DeviceInfo,
    FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS, FrameConsumer, FrameSlot, GlBackend, GlConsumerWindow,
    GlFrameSlot, GraphicsApi, LOG_ENV_VAR, LifecycleState, MouseButton, Orientation,
    OutputCallbacks, OutputConfig, PixelFormat, RenderBackend, SetupCanceller, SetupRequest,
    TRIPLE_BUFFER_COUNT, TextureHandle, TransferFunction, VideoOutput, WindowCallbacks,
    WindowEventSink, init_logging,
};
