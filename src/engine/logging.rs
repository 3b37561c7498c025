//! ### English
//! Opt-in `tracing` subscriber for embedders that do not install their own.
//!
//! ### 中文
//! 可选的 `tracing` subscriber，供未自行安装 subscriber 的宿主使用。

use tracing_subscriber::EnvFilter;

/// ### English
/// Environment variable holding the filter directives (e.g. `frame_bridge=debug`).
///
/// ### 中文
/// 存放过滤指令的环境变量（例如 `frame_bridge=debug`）。
pub const LOG_ENV_VAR: &str = "FRAME_BRIDGE_LOG";

/// ### English
/// Installs a global fmt subscriber filtered by `FRAME_BRIDGE_LOG` (default `warn`).
/// Returns `false` if a global subscriber already exists; calling it again is harmless.
///
/// ### 中文
/// 安装按 `FRAME_BRIDGE_LOG` 过滤的全局 fmt subscriber（默认 `warn`）。
/// 若已存在全局 subscriber 则返回 `false`；重复调用无副作用。
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}
