/// ### English
/// Producer-side GLFW OpenGL context.
/// An invisible offscreen window whose context shares objects with the consumer's window, so
/// textures rendered by the decoder thread can be sampled by the UI thread.
///
/// ### 中文
/// 生产者侧 GLFW OpenGL 上下文。
/// 一个不可见的离屏 window，其上下文与消费者 window 共享对象，
/// 使解码线程渲染的纹理可被 UI 线程采样。
use std::cell::Cell;
use std::ffi::{CStr, CString, c_void};

use glow::HasContext as _;

use crate::engine::backend::GraphicsApi;
use crate::engine::glfw::{GlfwApi, GlfwWindowPtr};

/// ### English
/// Parses `"4.6.0 ..."` or `"OpenGL ES 3.2 ..."` into `(major, minor)`; unknown parts are 0.
///
/// ### 中文
/// 将 `"4.6.0 ..."` 或 `"OpenGL ES 3.2 ..."` 解析为 `(major, minor)`；无法识别的部分为 0。
pub(super) fn parse_gl_version(version: &str) -> (u32, u32) {
    let Some(token) = version
        .split_whitespace()
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))
    else {
        return (0, 0);
    };
    let mut parts = token.split('.');
    let mut next = || {
        parts
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0)
    };
    let major = next();
    let minor = next();
    (major, minor)
}

thread_local! {
    static CURRENT_GLFW_WINDOW: Cell<GlfwWindowPtr> =
        const { Cell::new(std::ptr::null_mut()) };
}

pub(super) struct GlfwProducerContext {
    glfw: GlfwApi,
    window: GlfwWindowPtr,
    gl: glow::Context,
    api: GraphicsApi,
    version: (u32, u32),
}

impl GlfwProducerContext {
    /// ### English
    /// Creates the offscreen context sharing with `share`, loads GL entry points, then releases
    /// it again so the caller decides which thread binds it.
    ///
    /// #### Parameters
    /// - `glfw`: Installed embedder GLFW table.
    /// - `share`: The consumer's GLFW window.
    ///
    /// ### 中文
    /// 创建与 `share` 共享的离屏上下文并加载 GL 入口，然后再次释放，
    /// 由调用方决定在哪个线程绑定。
    ///
    /// #### 参数
    /// - `glfw`：已安装的宿主 GLFW 函数表。
    /// - `share`：消费者的 GLFW window。
    pub(super) fn new(glfw: GlfwApi, share: GlfwWindowPtr) -> Result<Self, String> {
        let window = unsafe { glfw.create_shared_offscreen_window(share)? };

        unsafe { glfw.make_current(window) };
        let gl = unsafe {
            glow::Context::from_loader_function(|name| match CString::new(name) {
                Ok(name) => glfw.get_proc_address(&name),
                Err(_) => std::ptr::null(),
            })
        };
        let version_string = unsafe { gl.get_parameter_string(glow::VERSION) };
        unsafe { glfw.make_current(std::ptr::null_mut()) };
        CURRENT_GLFW_WINDOW.with(|current| current.set(std::ptr::null_mut()));

        let api = if version_string.starts_with("OpenGL ES") {
            GraphicsApi::OpenGlEs
        } else {
            GraphicsApi::OpenGl
        };
        let version = parse_gl_version(&version_string);
        tracing::debug!(version = %version_string, "producer GL context created");

        Ok(Self {
            glfw,
            window,
            gl,
            api,
            version,
        })
    }

    #[inline]
    pub(super) fn gl(&self) -> &glow::Context {
        &self.gl
    }

    #[inline]
    pub(super) fn api(&self) -> GraphicsApi {
        self.api
    }

    #[inline]
    pub(super) fn version(&self) -> (u32, u32) {
        self.version
    }

    /// ### English
    /// Binds or releases the context on the calling thread, skipping redundant GLFW calls.
    ///
    /// ### 中文
    /// 在调用线程上绑定或释放该上下文，并跳过重复的 GLFW 调用。
    pub(super) fn make_current(&self, active: bool) {
        let target = if active {
            self.window
        } else {
            std::ptr::null_mut()
        };
        CURRENT_GLFW_WINDOW.with(|current| {
            if current.get() == target {
                return;
            }
            unsafe { self.glfw.make_current(target) };
            current.set(target);
        });
    }

    pub(super) fn get_proc_address(&self, name: &CStr) -> *const c_void {
        unsafe { self.glfw.get_proc_address(name) }
    }
}

impl Drop for GlfwProducerContext {
    fn drop(&mut self) {
        unsafe {
            self.glfw.make_current(std::ptr::null_mut());
            CURRENT_GLFW_WINDOW.with(|current| current.set(std::ptr::null_mut()));
            self.glfw.destroy_window(self.window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_gl_version;

    #[test]
    fn parses_desktop_and_es_versions() {
        assert_eq!(parse_gl_version("4.6.0 NVIDIA 550.54"), (4, 6));
        assert_eq!(parse_gl_version("OpenGL ES 3.2 Mesa 24.0"), (3, 2));
        assert_eq!(parse_gl_version("garbage"), (0, 0));
    }
}
