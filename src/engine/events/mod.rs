//! ### English
//! Forwards consumer-side window events (resize, mouse) to the decode framework.
//!
//! ### 中文
//! 将消费者侧窗口事件（尺寸变化、鼠标）转发给解码框架。
mod button;

use std::sync::{Mutex, MutexGuard, PoisonError};

use dpi::PhysicalSize;

pub use button::MouseButton;

/// ### English
/// Receiver of window events, installed by the decode framework.
///
/// Every method defaults to a no-op, so a sink only implements what it cares about.
/// Calls are made with the relay lock held; implementations must be quick and must not call
/// back into the relay.
///
/// Events arrive on the consumer (UI) thread, except the size replay on registration, which
/// runs on the thread that installs the sink (the producer thread for `set_window_callbacks`).
///
/// ### 中文
/// 窗口事件接收者，由解码框架安装。
///
/// 所有方法默认都是 no-op，sink 只需实现关心的部分。
/// 调用时会持有 relay 锁；实现必须快速返回，且不能回调 relay。
///
/// 事件在消费者（UI）线程到达；例外是注册时的尺寸重放，它在安装 sink 的线程上执行
/// （对 `set_window_callbacks` 而言即生产者线程）。
pub trait WindowEventSink: Send {
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn mouse_move(&mut self, _x: i32, _y: i32) {}
    fn mouse_press(&mut self, _button: MouseButton) {}
    fn mouse_release(&mut self, _button: MouseButton) {}
    fn mouse_double_click(&mut self, _button: MouseButton) {}
}

type SizeFn = Box<dyn FnMut(u32, u32) + Send>;
type PositionFn = Box<dyn FnMut(i32, i32) + Send>;
type ButtonFn = Box<dyn FnMut(MouseButton) + Send>;

/// ### English
/// Closure-based sink. Unset entries ignore their event.
///
/// ### 中文
/// 基于闭包的 sink。未设置的条目会忽略对应事件。
#[derive(Default)]
pub struct WindowCallbacks {
    on_resize: Option<SizeFn>,
    on_mouse_move: Option<PositionFn>,
    on_mouse_press: Option<ButtonFn>,
    on_mouse_release: Option<ButtonFn>,
    on_mouse_double_click: Option<ButtonFn>,
}

impl WindowCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_resize(mut self, f: impl FnMut(u32, u32) + Send + 'static) -> Self {
        self.on_resize = Some(Box::new(f));
        self
    }

    pub fn on_mouse_move(mut self, f: impl FnMut(i32, i32) + Send + 'static) -> Self {
        self.on_mouse_move = Some(Box::new(f));
        self
    }

    pub fn on_mouse_press(mut self, f: impl FnMut(MouseButton) + Send + 'static) -> Self {
        self.on_mouse_press = Some(Box::new(f));
        self
    }

    pub fn on_mouse_release(mut self, f: impl FnMut(MouseButton) + Send + 'static) -> Self {
        self.on_mouse_release = Some(Box::new(f));
        self
    }

    pub fn on_mouse_double_click(mut self, f: impl FnMut(MouseButton) + Send + 'static) -> Self {
        self.on_mouse_double_click = Some(Box::new(f));
        self
    }
}

impl WindowEventSink for WindowCallbacks {
    fn resize(&mut self, width: u32, height: u32) {
        if let Some(f) = self.on_resize.as_mut() {
            f(width, height);
        }
    }

    fn mouse_move(&mut self, x: i32, y: i32) {
        if let Some(f) = self.on_mouse_move.as_mut() {
            f(x, y);
        }
    }

    fn mouse_press(&mut self, button: MouseButton) {
        if let Some(f) = self.on_mouse_press.as_mut() {
            f(button);
        }
    }

    fn mouse_release(&mut self, button: MouseButton) {
        if let Some(f) = self.on_mouse_release.as_mut() {
            f(button);
        }
    }

    fn mouse_double_click(&mut self, button: MouseButton) {
        if let Some(f) = self.on_mouse_double_click.as_mut() {
            f(button);
        }
    }
}

#[derive(Default)]
struct RelayState {
    sink: Option<Box<dyn WindowEventSink>>,
    last_size: Option<PhysicalSize<u32>>,
}

/// ### English
/// Swappable sink plus the last known window size, behind a lock separate from the frame lock.
///
/// ### 中文
/// 可替换的 sink 以及最近一次窗口尺寸，由独立于帧锁的锁保护。
#[derive(Default)]
pub(crate) struct WindowEventRelay {
    state: Mutex<RelayState>,
}

impl WindowEventRelay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ### English
    /// Replaces the sink. If a window size is already known, the new sink immediately receives
    /// one `resize` with it, so a size reported before registration is not lost.
    ///
    /// #### Parameters
    /// - `sink`: New sink, or `None` to stop forwarding.
    ///
    /// ### 中文
    /// 替换 sink。若已知窗口尺寸，新 sink 会立即收到一次该尺寸的 `resize`，
    /// 避免注册之前上报的尺寸丢失。
    ///
    /// #### 参数
    /// - `sink`：新的 sink；传 `None` 表示停止转发。
    pub(crate) fn set_sink(&self, sink: Option<Box<dyn WindowEventSink>>) {
        let mut state = self.lock();
        state.sink = sink;
        let last_size = state.last_size;
        if let (Some(sink), Some(size)) = (state.sink.as_mut(), last_size) {
            tracing::debug!(?size, "replaying window size to new event sink");
            sink.resize(size.width, size.height);
        }
    }

    pub(crate) fn on_resize(&self, width: u32, height: u32) {
        let mut state = self.lock();
        state.last_size = Some(PhysicalSize::new(width, height));
        if let Some(sink) = state.sink.as_mut() {
            sink.resize(width, height);
        }
    }

    pub(crate) fn on_mouse_move(&self, x: i32, y: i32) {
        if let Some(sink) = self.lock().sink.as_mut() {
            sink.mouse_move(x, y);
        }
    }

    pub(crate) fn on_mouse_press(&self, button: MouseButton) {
        if let Some(sink) = self.lock().sink.as_mut() {
            sink.mouse_press(button);
        }
    }

    pub(crate) fn on_mouse_release(&self, button: MouseButton) {
        if let Some(sink) = self.lock().sink.as_mut() {
            sink.mouse_release(button);
        }
    }

    pub(crate) fn on_mouse_double_click(&self, button: MouseButton) {
        if let Some(sink) = self.lock().sink.as_mut() {
            sink.mouse_double_click(button);
        }
    }
}
