#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn frame_bridge_abi_version() -> u32 {
    super::FRAME_BRIDGE_ABI_VERSION
}

#[unsafe(no_mangle)]
/// ### English
/// Installs a stderr logger filtered by the `FRAME_BRIDGE_LOG` environment variable
/// (default `warn`). Returns `false` if a logger is already installed.
///
/// ### 中文
/// 安装输出到 stderr 的日志器，按环境变量 `FRAME_BRIDGE_LOG` 过滤（默认 `warn`）。
/// 若已安装日志器则返回 `false`。
pub extern "C" fn frame_bridge_init_logging() -> bool {
    crate::engine::init_logging()
}
