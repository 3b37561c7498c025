//! ### English
//! C callback tables adapted to the engine's typed event sink.
//!
//! ### 中文
//! 将 C 回调表适配为引擎的类型化事件 sink。

use std::ffi::c_void;

use crate::engine::{MouseButton, WindowEventSink};

pub type FrameBridgeResizeFn = unsafe extern "C" fn(opaque: *mut c_void, width: u32, height: u32);
pub type FrameBridgeMouseMoveFn = unsafe extern "C" fn(opaque: *mut c_void, x: i32, y: i32);
/// ### English
/// `button`: 0 = left, 1 = middle, 2 = right.
///
/// ### 中文
/// `button`：0 = 左键，1 = 中键，2 = 右键。
pub type FrameBridgeMouseButtonFn = unsafe extern "C" fn(opaque: *mut c_void, button: u32);

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Window event callbacks registered by the decode framework. NULL entries ignore their event.
/// `opaque` is passed back unchanged as the first argument.
///
/// Callbacks normally run on the UI thread inside the `frame_bridge_consumer_on_*` call that
/// reported the event. The size replay runs on the producer thread while the output is locked,
/// so a callback must not call any `frame_bridge_output_*` function; that would deadlock.
///
/// ### 中文
/// 解码框架注册的窗口事件回调。为 NULL 的条目会忽略对应事件。
/// `opaque` 会原样作为第一个参数传回。
///
/// 回调通常在上报事件的 `frame_bridge_consumer_on_*` 调用内、于 UI 线程执行。
/// 尺寸重放在生产者线程且输出已加锁时执行，因此回调不得调用任何 `frame_bridge_output_*`
/// 函数，否则会死锁。
pub struct FrameBridgeWindowCallbacks {
    pub opaque: *mut c_void,
    pub resize: Option<FrameBridgeResizeFn>,
    pub mouse_move: Option<FrameBridgeMouseMoveFn>,
    pub mouse_press: Option<FrameBridgeMouseButtonFn>,
    pub mouse_release: Option<FrameBridgeMouseButtonFn>,
    pub mouse_double_click: Option<FrameBridgeMouseButtonFn>,
}

pub(super) struct FfiWindowSink {
    table: FrameBridgeWindowCallbacks,
}

/// SAFETY: the embedder promises the callbacks and `opaque` may be called from any thread,
/// one call at a time. The relay serializes calls under its lock; they come from the UI thread,
/// and from the producer thread for the size replay in `frame_bridge_output_set_window_callbacks`.
unsafe impl Send for FfiWindowSink {}

impl FfiWindowSink {
    pub(super) fn new(table: FrameBridgeWindowCallbacks) -> Self {
        Self { table }
    }

    fn button(&self, f: Option<FrameBridgeMouseButtonFn>, button: MouseButton) {
        if let Some(f) = f {
            unsafe { f(self.table.opaque, button as u32) };
        }
    }
}

impl WindowEventSink for FfiWindowSink {
    fn resize(&mut self, width: u32, height: u32) {
        if let Some(f) = self.table.resize {
            unsafe { f(self.table.opaque, width, height) };
        }
    }

    fn mouse_move(&mut self, x: i32, y: i32) {
        if let Some(f) = self.table.mouse_move {
            unsafe { f(self.table.opaque, x, y) };
        }
    }

    fn mouse_press(&mut self, button: MouseButton) {
        self.button(self.table.mouse_press, button);
    }

    fn mouse_release(&mut self, button: MouseButton) {
        self.button(self.table.mouse_release, button);
    }

    fn mouse_double_click(&mut self, button: MouseButton) {
        self.button(self.table.mouse_double_click, button);
    }
}

pub type FrameBridgeRedrawFn = unsafe extern "C" fn(opaque: *mut c_void);

/// ### English
/// Redraw request callback plus its opaque pointer.
///
/// ### 中文
/// 重绘请求回调及其 opaque 指针。
pub(super) struct FfiRedraw {
    f: FrameBridgeRedrawFn,
    opaque: *mut c_void,
}

/// SAFETY: the embedder promises the callback is safe to invoke from the producer thread.
unsafe impl Send for FfiRedraw {}
unsafe impl Sync for FfiRedraw {}

impl FfiRedraw {
    pub(super) fn new(f: FrameBridgeRedrawFn, opaque: *mut c_void) -> Self {
        Self { f, opaque }
    }

    pub(super) fn call(&self) {
        unsafe { (self.f)(self.opaque) };
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::c_void;

    use super::*;

    #[derive(Default)]
    struct Log {
        sizes: Vec<(u32, u32)>,
        presses: Vec<u32>,
    }

    unsafe extern "C" fn on_resize(opaque: *mut c_void, width: u32, height: u32) {
        let log = unsafe { &mut *opaque.cast::<Log>() };
        log.sizes.push((width, height));
    }

    unsafe extern "C" fn on_press(opaque: *mut c_void, button: u32) {
        let log = unsafe { &mut *opaque.cast::<Log>() };
        log.presses.push(button);
    }

    #[test]
    fn c_table_receives_events_with_opaque_pointer() {
        let mut log = Log::default();
        let mut sink = FfiWindowSink::new(FrameBridgeWindowCallbacks {
            opaque: (&raw mut log).cast(),
            resize: Some(on_resize),
            mouse_move: None,
            mouse_press: Some(on_press),
            mouse_release: None,
            mouse_double_click: None,
        });

        sink.resize(800, 600);
        sink.mouse_move(1, 2);
        sink.mouse_press(MouseButton::Right);
        sink.mouse_release(MouseButton::Left);
        drop(sink);

        assert_eq!(log.sizes, vec![(800, 600)]);
        assert_eq!(log.presses, vec![MouseButton::Right as u32]);
    }
}
