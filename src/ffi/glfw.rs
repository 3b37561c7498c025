use crate::engine::{EmbedderGlfwApi, install_embedder_glfw_api};

#[unsafe(no_mangle)]
/// ### English
/// Installs an embedder-provided GLFW function table. Must be called before the first
/// `frame_bridge_output_setup`; without it setup fails as "capability unavailable".
///
/// All function pointers must come from the same GLFW library instance that created the window
/// passed to `frame_bridge_consumer_context_ready`.
///
/// Returns `true` on success.
///
/// ### 中文
/// 安装由宿主提供的 GLFW 函数表。必须在第一次 `frame_bridge_output_setup` 之前调用；
/// 否则 setup 会以“能力不可用”失败。
///
/// 所有函数指针必须来自创建 `frame_bridge_consumer_context_ready` 所传 window 的同一 GLFW 库实例。
///
/// 成功返回 `true`。
pub unsafe extern "C" fn frame_bridge_set_glfw_api(api: *const EmbedderGlfwApi) -> bool {
    if api.is_null() {
        return false;
    }

    let api = unsafe { *api };
    match install_embedder_glfw_api(api) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "rejected embedder GLFW table");
            false
        }
    }
}
