//! ### English
//! GLFW symbol table backed by embedder-provided function pointers (no library lookup by name).
//!
//! ### 中文
//! 由宿主提供函数指针的 GLFW 符号表（不按名字查找动态库）。

use std::ffi::{CStr, c_char, c_int, c_void};
use std::sync::OnceLock;

#[repr(C)]
/// ### English
/// Opaque GLFW window type (`GLFWwindow`).
///
/// ### 中文
/// 不透明 GLFW window 类型（`GLFWwindow`）。
pub struct GLFWwindow {
    _private: [u8; 0],
}

#[repr(C)]
pub struct GLFWmonitor {
    _private: [u8; 0],
}

type GlfwGetProcAddress = unsafe extern "C" fn(*const c_char) -> *const c_void;
type GlfwMakeContextCurrent = unsafe extern "C" fn(*mut GLFWwindow);
type GlfwDefaultWindowHints = unsafe extern "C" fn();
type GlfwWindowHint = unsafe extern "C" fn(c_int, c_int);
type GlfwGetWindowAttrib = unsafe extern "C" fn(*mut GLFWwindow, c_int) -> c_int;
type GlfwCreateWindow = unsafe extern "C" fn(
    c_int,
    c_int,
    *const c_char,
    *mut GLFWmonitor,
    *mut GLFWwindow,
) -> *mut GLFWwindow;
type GlfwDestroyWindow = unsafe extern "C" fn(*mut GLFWwindow);

/// ### English
/// Raw window pointer type used by this crate.
///
/// ### 中文
/// 本 crate 使用的 window 裸指针类型。
pub(crate) type GlfwWindowPtr = *mut GLFWwindow;

static EMBEDDER_GLFW_API: OnceLock<GlfwApi> = OnceLock::new();

fn require(address: usize, name: &str) -> Result<usize, String> {
    if address == 0 {
        return Err(format!("EmbedderGlfwApi.{name} is NULL"));
    }
    Ok(address)
}

/// ### English
/// One-time installation backed by `OnceLock`; repeated calls return an error.
///
/// ### 中文
/// 由 `OnceLock` 保证只安装一次；重复调用会返回错误。
pub(super) fn install_embedder_glfw_api(api: super::EmbedderGlfwApi) -> Result<(), String> {
    let get_proc_address = require(api.glfw_get_proc_address, "glfw_get_proc_address")?;
    let make_context_current =
        require(api.glfw_make_context_current, "glfw_make_context_current")?;
    let default_window_hints =
        require(api.glfw_default_window_hints, "glfw_default_window_hints")?;
    let window_hint = require(api.glfw_window_hint, "glfw_window_hint")?;
    let get_window_attrib = require(api.glfw_get_window_attrib, "glfw_get_window_attrib")?;
    let create_window = require(api.glfw_create_window, "glfw_create_window")?;
    let destroy_window = require(api.glfw_destroy_window, "glfw_destroy_window")?;

    let table = unsafe {
        GlfwApi {
            glfw_get_proc_address: std::mem::transmute::<usize, GlfwGetProcAddress>(
                get_proc_address,
            ),
            glfw_make_context_current: std::mem::transmute::<usize, GlfwMakeContextCurrent>(
                make_context_current,
            ),
            glfw_default_window_hints: std::mem::transmute::<usize, GlfwDefaultWindowHints>(
                default_window_hints,
            ),
            glfw_window_hint: std::mem::transmute::<usize, GlfwWindowHint>(window_hint),
            glfw_get_window_attrib: std::mem::transmute::<usize, GlfwGetWindowAttrib>(
                get_window_attrib,
            ),
            glfw_create_window: std::mem::transmute::<usize, GlfwCreateWindow>(create_window),
            glfw_destroy_window: std::mem::transmute::<usize, GlfwDestroyWindow>(destroy_window),
        }
    };

    EMBEDDER_GLFW_API
        .set(table)
        .map_err(|_| "Embedder GLFW API is already installed".to_string())
}

#[derive(Clone, Copy)]
/// ### English
/// Loaded minimal GLFW API used by the OpenGL backend (context control + proc loading).
///
/// ### 中文
/// OpenGL 后端使用的最小 GLFW API（上下文控制 + 函数指针加载）。
pub(crate) struct GlfwApi {
    glfw_get_proc_address: GlfwGetProcAddress,
    glfw_make_context_current: GlfwMakeContextCurrent,
    glfw_default_window_hints: GlfwDefaultWindowHints,
    glfw_window_hint: GlfwWindowHint,
    glfw_get_window_attrib: GlfwGetWindowAttrib,
    glfw_create_window: GlfwCreateWindow,
    glfw_destroy_window: GlfwDestroyWindow,
}

impl GlfwApi {
    /// ### English
    /// Returns the installed table, or an error if `frame_bridge_set_glfw_api` was never called.
    ///
    /// ### 中文
    /// 返回已安装的函数表；若从未调用 `frame_bridge_set_glfw_api` 则返回错误。
    #[inline]
    pub(crate) fn load() -> Result<Self, String> {
        EMBEDDER_GLFW_API.get().copied().ok_or_else(|| {
            "Embedder GLFW API is not installed; call frame_bridge_set_glfw_api before setup"
                .to_string()
        })
    }

    #[inline]
    pub(crate) fn is_installed() -> bool {
        EMBEDDER_GLFW_API.get().is_some()
    }

    /// ### English
    /// Makes `window` current on the calling thread (NULL releases the current context).
    ///
    /// ### 中文
    /// 将 `window` 设为调用线程的 current 上下文（传 NULL 则释放当前上下文）。
    #[inline]
    pub(crate) unsafe fn make_current(&self, window: GlfwWindowPtr) {
        unsafe { (self.glfw_make_context_current)(window) };
    }

    #[inline]
    pub(crate) unsafe fn get_proc_address(&self, name: &CStr) -> *const c_void {
        unsafe { (self.glfw_get_proc_address)(name.as_ptr()) }
    }

    #[inline]
    pub(crate) unsafe fn destroy_window(&self, window: GlfwWindowPtr) {
        unsafe { (self.glfw_destroy_window)(window) };
    }

    /// ### English
    /// Creates an invisible 1x1 window whose GL context shares objects with `share`, copying the
    /// client API, version, profile and creation API of the shared context.
    ///
    /// ### 中文
    /// 创建一个不可见的 1x1 window，其 GL 上下文与 `share` 共享对象，
    /// 并沿用共享上下文的 client API、版本、profile 与创建 API。
    pub(crate) unsafe fn create_shared_offscreen_window(
        &self,
        share: GlfwWindowPtr,
    ) -> Result<GlfwWindowPtr, String> {
        const GLFW_FALSE: c_int = 0;

        const GLFW_FOCUSED: c_int = 0x0002_0001;
        const GLFW_RESIZABLE: c_int = 0x0002_0003;
        const GLFW_VISIBLE: c_int = 0x0002_0004;

        const GLFW_CLIENT_API: c_int = 0x0002_2001;
        const GLFW_CONTEXT_VERSION_MAJOR: c_int = 0x0002_2002;
        const GLFW_CONTEXT_VERSION_MINOR: c_int = 0x0002_2003;
        const GLFW_OPENGL_FORWARD_COMPAT: c_int = 0x0002_2006;
        const GLFW_OPENGL_PROFILE: c_int = 0x0002_2008;
        const GLFW_CONTEXT_CREATION_API: c_int = 0x0002_200B;

        let attrib = |name: c_int| unsafe { (self.glfw_get_window_attrib)(share, name) };
        let client_api = attrib(GLFW_CLIENT_API);
        let major = attrib(GLFW_CONTEXT_VERSION_MAJOR);
        let minor = attrib(GLFW_CONTEXT_VERSION_MINOR);
        let profile = attrib(GLFW_OPENGL_PROFILE);
        let forward_compat = attrib(GLFW_OPENGL_FORWARD_COMPAT);
        let creation_api = attrib(GLFW_CONTEXT_CREATION_API);

        let hint = |name: c_int, value: c_int| unsafe { (self.glfw_window_hint)(name, value) };
        unsafe { (self.glfw_default_window_hints)() };
        hint(GLFW_VISIBLE, GLFW_FALSE);
        hint(GLFW_FOCUSED, GLFW_FALSE);
        hint(GLFW_RESIZABLE, GLFW_FALSE);
        if client_api != 0 {
            hint(GLFW_CLIENT_API, client_api);
        }
        if major > 0 {
            hint(GLFW_CONTEXT_VERSION_MAJOR, major);
        }
        if minor > 0 {
            hint(GLFW_CONTEXT_VERSION_MINOR, minor);
        }
        if profile != 0 {
            hint(GLFW_OPENGL_PROFILE, profile);
        }
        hint(GLFW_OPENGL_FORWARD_COMPAT, forward_compat);
        if creation_api != 0 {
            hint(GLFW_CONTEXT_CREATION_API, creation_api);
        }

        let title = c"frame_bridge-producer";
        let window =
            unsafe { (self.glfw_create_window)(1, 1, title.as_ptr(), std::ptr::null_mut(), share) };
        unsafe { (self.glfw_default_window_hints)() };

        if window.is_null() {
            return Err(
                "glfwCreateWindow failed; ensure the consumer window's context is valid".to_string(),
            );
        }
        Ok(window)
    }
}
