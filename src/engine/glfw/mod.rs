/// ### English
/// Minimal GLFW symbol table provided by the embedder.
/// Used to create the producer's shared offscreen OpenGL context next to the consumer's window.
///
/// ### 中文
/// 由宿主提供的最小 GLFW 符号表。
/// 用于在消费者窗口之外创建生产者的共享离屏 OpenGL 上下文。
mod api;

pub(crate) use api::{GlfwApi, GlfwWindowPtr};

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Function pointer table for GLFW symbols provided by the embedder.
///
/// All fields are raw addresses (`usize`) and must be non-zero when installing. They must come
/// from the same GLFW library instance that created the consumer window.
///
/// ### 中文
/// 由宿主提供的 GLFW 符号函数指针表。
///
/// 所有字段都是原始地址（`usize`），安装时必须全部为非 0，并且必须来自创建消费者窗口的同一 GLFW 库实例。
pub struct EmbedderGlfwApi {
    pub glfw_get_proc_address: usize,
    pub glfw_make_context_current: usize,
    pub glfw_default_window_hints: usize,
    pub glfw_window_hint: usize,
    pub glfw_get_window_attrib: usize,
    pub glfw_create_window: usize,
    pub glfw_destroy_window: usize,
}

/// ### English
/// Installs the embedder GLFW table for this process. Must happen before the first `setup()`;
/// until then the OpenGL backend reports that threaded contexts are unavailable.
///
/// ### 中文
/// 为当前进程安装宿主 GLFW 函数表。必须在第一次 `setup()` 之前完成；
/// 在此之前 OpenGL 后端会报告线程化上下文不可用。
pub(crate) fn install_embedder_glfw_api(api: EmbedderGlfwApi) -> Result<(), String> {
    api::install_embedder_glfw_api(api)
}
