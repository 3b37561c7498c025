/// ### English
/// Engine internal modules (frame exchange, producer lifecycle, backends, event relay).
///
/// ### 中文
/// 引擎内部模块（帧交换、生产者生命周期、后端、事件转发）。
pub mod backend;
pub mod config;
pub mod consumer;
pub mod error;
pub mod events;
pub mod frame;
pub(crate) mod glfw;
pub mod logging;
pub mod output;
mod ready;
pub(crate) mod shared;

pub use backend::{
    DeviceInfo, FrameSlot, GlBackend, GlConsumerWindow, GlFrameSlot, GraphicsApi, RenderBackend,
    SetupRequest,
};
pub use config::{BridgeConfig, FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS};
pub use consumer::FrameConsumer;
pub use error::BridgeError;
pub use events::{MouseButton, WindowCallbacks, WindowEventSink};
pub use frame::{AcquiredFrame, TRIPLE_BUFFER_COUNT, TextureHandle};
pub(crate) use glfw::{EmbedderGlfwApi, install_embedder_glfw_api};
pub use logging::{LOG_ENV_VAR, init_logging};
pub use output::{
    ColorPrimaries, ColorSpace, LifecycleState, Orientation, OutputCallbacks, OutputConfig,
    PixelFormat, SetupCanceller, TransferFunction, VideoOutput,
};
