//! ### English
//! C ABI surface for `frame_bridge`.
//!
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`. Failures are
//! reported as `false` / NULL; nothing unwinds across the boundary.
//!
//! Typical use: the UI thread creates a `FrameBridgeConsumer`, the decode framework gets a
//! `FrameBridgeOutput` created from it and drives the output callbacks on its own thread.
//!
//! ### 中文
//! `frame_bridge` 的 C ABI 接口层。
//!
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。失败通过 `false` / NULL 返回，
//! 不会有任何 unwind 穿过边界。
//!
//! 典型用法：UI 线程创建 `FrameBridgeConsumer`，解码框架基于它创建 `FrameBridgeOutput`，
//! 并在自己的线程上驱动输出回调。
mod abi;
mod consumer;
mod events;
mod glfw;
mod output;

use std::sync::Mutex;

use crate::engine::{
    AcquiredFrame, BridgeConfig, DeviceInfo, FrameConsumer, GlBackend, GlConsumerWindow,
    OutputConfig, SetupCanceller, VideoOutput,
};

#[repr(C)]
/// ### English
/// Opaque consumer handle, owned by the UI thread.
///
/// ### 中文
/// 不透明消费者句柄，由 UI 线程持有。
pub struct FrameBridgeConsumer {
    consumer: FrameConsumer<GlConsumerWindow>,
}

#[repr(C)]
/// ### English
/// Opaque producer-side output handle, driven by the decode framework.
///
/// ### 中文
/// 不透明的生产者侧输出句柄，由解码框架驱动。
pub struct FrameBridgeOutput {
    /// ### English
    /// Lets `cleanup` wake a `setup` that is blocked while holding `output`.
    ///
    /// ### 中文
    /// 让 `cleanup` 能唤醒持有 `output` 锁并阻塞中的 `setup`。
    canceller: SetupCanceller<GlConsumerWindow>,
    output: Mutex<VideoOutput<GlBackend>>,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Construction-time configuration. `setup_timeout_ms = 0` waits without a timeout.
///
/// ### 中文
/// 构造期配置。`setup_timeout_ms = 0` 表示无超时等待。
pub struct FrameBridgeConfig {
    pub setup_timeout_ms: u32,
    /// ### English
    /// Bitwise OR of `FRAME_BRIDGE_FLAG_*`.
    ///
    /// ### 中文
    /// `FRAME_BRIDGE_FLAG_*` 的按位或。
    pub flags: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// One acquired frame returned to the UI thread.
///
/// ### 中文
/// 返回给 UI 线程的单个已获取帧。
pub struct FrameBridgeFrame {
    /// ### English
    /// Triple-buffer slot index (0..=2).
    ///
    /// ### 中文
    /// 三缓冲槽位索引（0..=2）。
    pub slot: u32,
    /// ### English
    /// GL texture name to sample from the consumer context.
    ///
    /// ### 中文
    /// 在消费者上下文中采样的 GL 纹理名。
    pub texture_id: u64,
    /// ### English
    /// Frame width in pixels.
    ///
    /// ### 中文
    /// 帧宽度（像素）。
    pub width: u32,
    /// ### English
    /// Frame height in pixels.
    ///
    /// ### 中文
    /// 帧高度（像素）。
    pub height: u32,
    /// ### English
    /// `1` if this call promoted a new frame, `0` if it re-displays the previous one.
    ///
    /// ### 中文
    /// 若本次调用提升了新帧则为 `1`，重复显示上一帧则为 `0`。
    pub updated: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Producer device description written by `frame_bridge_output_setup`.
/// `api`: 0 = OpenGL, 1 = OpenGL ES.
///
/// ### 中文
/// 由 `frame_bridge_output_setup` 写出的生产者设备描述。
/// `api`：0 = OpenGL，1 = OpenGL ES。
pub struct FrameBridgeDeviceInfo {
    pub api: u32,
    /// ### English
    /// Major GL version of the producer context.
    ///
    /// ### 中文
    /// 生产者上下文的 GL 主版本号。
    pub version_major: u32,
    /// ### English
    /// Minor GL version of the producer context.
    ///
    /// ### 中文
    /// 生产者上下文的 GL 次版本号。
    pub version_minor: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Negotiated output format written by `frame_bridge_output_resize`. The enum fields carry the
/// discriminants of the matching Rust enums (always 0 today: RGBA8, BT.709, BT.709, sRGB,
/// top-left).
///
/// ### 中文
/// 由 `frame_bridge_output_resize` 写出的协商输出格式。枚举字段为对应 Rust 枚举的判别值
/// （目前始终为 0：RGBA8、BT.709、BT.709、sRGB、左上角）。
pub struct FrameBridgeOutputConfig {
    pub width: u32,
    pub height: u32,
    pub format: u32,
    pub full_range: u8,
    pub colorspace: u32,
    pub primaries: u32,
    pub transfer: u32,
    pub orientation: u32,
}

/// ### English
/// C ABI version for `frame_bridge`.
///
/// ### 中文
/// `frame_bridge` 的 C ABI 版本号。
const FRAME_BRIDGE_ABI_VERSION: u32 = 1;

impl From<FrameBridgeConfig> for BridgeConfig {
    fn from(value: FrameBridgeConfig) -> Self {
        BridgeConfig::from_abi(value.setup_timeout_ms, value.flags)
    }
}

impl From<AcquiredFrame> for FrameBridgeFrame {
    fn from(value: AcquiredFrame) -> Self {
        Self {
            slot: value.slot as u32,
            texture_id: value.texture.0,
            width: value.size.width,
            height: value.size.height,
            updated: u8::from(value.updated),
        }
    }
}

impl From<DeviceInfo> for FrameBridgeDeviceInfo {
    fn from(value: DeviceInfo) -> Self {
        Self {
            api: value.api as u32,
            version_major: value.version_major,
            version_minor: value.version_minor,
        }
    }
}

impl From<OutputConfig> for FrameBridgeOutputConfig {
    fn from(value: OutputConfig) -> Self {
        Self {
            width: value.size.width,
            height: value.size.height,
            format: value.format as u32,
            full_range: u8::from(value.full_range),
            colorspace: value.colorspace as u32,
            primaries: value.primaries as u32,
            transfer: value.transfer as u32,
            orientation: value.orientation as u32,
        }
    }
}

/// ### English
/// Writes `value` through `out` when `out` is non-NULL.
///
/// # Safety
/// `out` must be NULL or valid for a write of `T`.
///
/// ### 中文
/// 当 `out` 非 NULL 时通过它写出 `value`。
///
/// # Safety
/// `out` 必须为 NULL，或可安全写入一个 `T`。
unsafe fn write_out<T>(out: *mut T, value: T) {
    if !out.is_null() {
        unsafe { out.write(value) };
    }
}

#[cfg(test)]
mod tests {
    use dpi::PhysicalSize;

    use super::*;
    use crate::engine::{FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS, TextureHandle};

    #[test]
    fn output_config_uses_fixed_policy() {
        let config = FrameBridgeOutputConfig::from(OutputConfig::fixed(PhysicalSize::new(640, 480)));
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.full_range, 1);
        assert_eq!(
            (config.format, config.colorspace, config.primaries, config.transfer, config.orientation),
            (0, 0, 0, 0, 0)
        );
    }

    #[test]
    fn frame_conversion_keeps_handles() {
        let frame = FrameBridgeFrame::from(AcquiredFrame {
            slot: 2,
            texture: TextureHandle(17),
            size: PhysicalSize::new(1920, 1080),
            updated: true,
        });
        assert_eq!(frame.slot, 2);
        assert_eq!(frame.texture_id, 17);
        assert_eq!((frame.width, frame.height), (1920, 1080));
        assert_eq!(frame.updated, 1);
    }

    #[test]
    fn frame_carries_only_the_shared_texture() {
        assert_eq!(std::mem::offset_of!(FrameBridgeFrame, texture_id), 8);
        assert_eq!(std::mem::offset_of!(FrameBridgeFrame, width), 16);
        assert_eq!(std::mem::offset_of!(FrameBridgeFrame, height), 20);
        assert_eq!(std::mem::offset_of!(FrameBridgeFrame, updated), 24);
        assert_eq!(std::mem::size_of::<FrameBridgeFrame>(), 32);
    }

    #[test]
    fn abi_config_maps_flags() {
        let config = BridgeConfig::from(FrameBridgeConfig {
            setup_timeout_ms: 0,
            flags: FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS,
        });
        assert!(config.hide_egl_symbols);
        assert_eq!(config.setup_timeout, None);
    }
}
