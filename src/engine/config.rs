//! ### English
//! Bridge configuration and the bitflags that carry it through the C ABI.
//!
//! ### 中文
//! 桥接配置，以及通过 C ABI 传递配置的位标志（bitflags）。

use std::time::Duration;

/// ### English
/// Hide `egl*` symbols from `get_proc_address` (the producer context is not an EGL context, so a
/// renderer probing for EGL entry points must not be handed GLFW's answer).
///
/// ### 中文
/// 让 `get_proc_address` 对 `egl*` 符号返回 NULL（生产者上下文不是 EGL 上下文，
/// 探测 EGL 入口的渲染器不应拿到 GLFW 的返回值）。
pub const FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS: u32 = 1 << 0;

/// ### English
/// Construction-time configuration shared by the producer and consumer halves.
///
/// ### 中文
/// 生产者与消费者两端共享的构造期配置。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// ### English
    /// Upper bound on how long `setup()` waits for the consumer context.
    ///
    /// `None` waits until the consumer publishes its context or the bridge is cleaned up / shut
    /// down. On expiry `setup()` fails with `CapabilityUnavailable`.
    ///
    /// ### 中文
    /// `setup()` 等待消费者上下文的最长时间。
    ///
    /// `None` 表示一直等待，直到消费者发布上下文或桥接被 cleanup / shutdown。
    /// 超时后 `setup()` 以 `CapabilityUnavailable` 失败。
    pub setup_timeout: Option<Duration>,
    /// ### English
    /// See `FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS`.
    ///
    /// ### 中文
    /// 见 `FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS`。
    pub hide_egl_symbols: bool,
}

impl BridgeConfig {
    /// ### English
    /// Builds a configuration from C ABI values.
    ///
    /// #### Parameters
    /// - `setup_timeout_ms`: Setup wait bound in milliseconds (`0` = unbounded).
    /// - `flags`: Bitmask of `FRAME_BRIDGE_FLAG_*`.
    ///
    /// ### 中文
    /// 由 C ABI 传入的值构造配置。
    ///
    /// #### 参数
    /// - `setup_timeout_ms`：setup 等待上限（毫秒；`0` = 不设上限）。
    /// - `flags`：`FRAME_BRIDGE_FLAG_*` 位掩码。
    pub fn from_abi(setup_timeout_ms: u32, flags: u32) -> Self {
        Self {
            setup_timeout: (setup_timeout_ms != 0)
                .then(|| Duration::from_millis(u64::from(setup_timeout_ms))),
            hide_egl_symbols: flags & FRAME_BRIDGE_FLAG_HIDE_EGL_SYMBOLS != 0,
        }
    }
}
