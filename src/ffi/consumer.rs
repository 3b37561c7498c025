//! ### English
//! C ABI bindings for the consumer (UI thread) side.
//!
//! ### 中文
//! 消费者（UI 线程）侧的 C ABI 绑定。

use std::ffi::c_void;

use crate::engine::{BridgeConfig, FrameConsumer, GlConsumerWindow};

use super::events::{FfiRedraw, FrameBridgeRedrawFn};
use super::{FrameBridgeConfig, FrameBridgeConsumer, FrameBridgeFrame, write_out};

#[unsafe(no_mangle)]
/// ### English
/// Creates a consumer. `config` may be NULL for defaults (no setup timeout, no flags).
///
/// ### 中文
/// 创建消费者。`config` 可为 NULL 表示使用默认值（无 setup 超时、无标志）。
pub unsafe extern "C" fn frame_bridge_consumer_create(
    config: *const FrameBridgeConfig,
) -> *mut FrameBridgeConsumer {
    let config = if config.is_null() {
        BridgeConfig::default()
    } else {
        BridgeConfig::from(unsafe { *config })
    };

    Box::into_raw(Box::new(FrameBridgeConsumer {
        consumer: FrameConsumer::new(config),
    }))
}

#[unsafe(no_mangle)]
/// ### English
/// Shuts the consumer down and frees the handle. Outputs created from it stay valid but their
/// `setup` fails from now on.
///
/// ### 中文
/// 关闭消费者并释放句柄。基于它创建的输出仍然有效，但此后其 `setup` 会失败。
pub unsafe extern "C" fn frame_bridge_consumer_destroy(consumer: *mut FrameBridgeConsumer) {
    if consumer.is_null() {
        return;
    }
    let consumer = unsafe { Box::from_raw(consumer) };
    consumer.consumer.shutdown();
}

#[unsafe(no_mangle)]
/// ### English
/// Publishes the consumer's `GLFWwindow*` once its context exists. Unblocks a waiting
/// `frame_bridge_output_setup`. Returns `false` for NULL or if already published.
///
/// ### 中文
/// 在消费者上下文创建后发布其 `GLFWwindow*`，并解除等待中的 `frame_bridge_output_setup`。
/// 传入 NULL 或已发布过时返回 `false`。
pub unsafe extern "C" fn frame_bridge_consumer_context_ready(
    consumer: *mut FrameBridgeConsumer,
    glfw_window: *mut c_void,
) -> bool {
    if consumer.is_null() {
        return false;
    }
    let Some(window) = GlConsumerWindow::new(glfw_window) else {
        return false;
    };
    unsafe { (*consumer).consumer.context_ready(window) }
}

#[unsafe(no_mangle)]
/// ### English
/// Acquires the newest frame. Call once per paint.
///
/// Returns `false` when there is nothing to draw yet; `out_frame` is left untouched then.
///
/// ### 中文
/// 获取最新帧。每次绘制调用一次。
///
/// 暂无可绘制内容时返回 `false`，此时不会写入 `out_frame`。
pub unsafe extern "C" fn frame_bridge_consumer_acquire_frame(
    consumer: *mut FrameBridgeConsumer,
    out_frame: *mut FrameBridgeFrame,
) -> bool {
    if consumer.is_null() {
        return false;
    }
    let Some(frame) = (unsafe { (*consumer).consumer.acquire_latest() }) else {
        return false;
    };
    unsafe { write_out(out_frame, frame.into()) };
    true
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn frame_bridge_consumer_on_resize(
    consumer: *mut FrameBridgeConsumer,
    width: u32,
    height: u32,
) {
    if consumer.is_null() {
        return;
    }
    unsafe { (*consumer).consumer.on_resize(width, height) };
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn frame_bridge_consumer_on_mouse_move(
    consumer: *mut FrameBridgeConsumer,
    x: i32,
    y: i32,
) {
    if consumer.is_null() {
        return;
    }
    unsafe { (*consumer).consumer.on_mouse_move(x, y) };
}

#[unsafe(no_mangle)]
/// ### English
/// Forwards a GLFW mouse button press (`GLFW_MOUSE_BUTTON_*`). Buttons other than left, right
/// and middle are dropped.
///
/// ### 中文
/// 转发 GLFW 鼠标按下事件（`GLFW_MOUSE_BUTTON_*`）。左、右、中键以外的按键会被丢弃。
pub unsafe extern "C" fn frame_bridge_consumer_on_mouse_press(
    consumer: *mut FrameBridgeConsumer,
    glfw_button: u32,
) {
    if consumer.is_null() {
        return;
    }
    unsafe { (*consumer).consumer.on_mouse_press(glfw_button) };
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn frame_bridge_consumer_on_mouse_release(
    consumer: *mut FrameBridgeConsumer,
    glfw_button: u32,
) {
    if consumer.is_null() {
        return;
    }
    unsafe { (*consumer).consumer.on_mouse_release(glfw_button) };
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn frame_bridge_consumer_on_mouse_double_click(
    consumer: *mut FrameBridgeConsumer,
    glfw_button: u32,
) {
    if consumer.is_null() {
        return;
    }
    unsafe { (*consumer).consumer.on_mouse_double_click(glfw_button) };
}

#[unsafe(no_mangle)]
/// ### English
/// Installs a callback invoked on the producer thread after each published frame (e.g. to
/// post a repaint to the UI loop). Pass NULL `callback` to remove it.
///
/// ### 中文
/// 安装一个在每次发布帧后于生产者线程调用的回调（例如向 UI 循环投递重绘）。
/// `callback` 传 NULL 表示移除。
pub unsafe extern "C" fn frame_bridge_consumer_set_redraw_callback(
    consumer: *mut FrameBridgeConsumer,
    callback: Option<FrameBridgeRedrawFn>,
    opaque: *mut c_void,
) {
    if consumer.is_null() {
        return;
    }
    let consumer = unsafe { &(*consumer).consumer };
    match callback {
        Some(f) => {
            let redraw = FfiRedraw::new(f, opaque);
            consumer.set_redraw_notifier(move || redraw.call());
        }
        None => consumer.clear_redraw_notifier(),
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Signals that the UI is going away: a blocked `frame_bridge_output_setup` returns `false`.
///
/// ### 中文
/// 通知 UI 即将关闭：阻塞中的 `frame_bridge_output_setup` 会返回 `false`。
pub unsafe extern "C" fn frame_bridge_consumer_shutdown(consumer: *mut FrameBridgeConsumer) {
    if consumer.is_null() {
        return;
    }
    unsafe { (*consumer).consumer.shutdown() };
}
