//! ### English
//! Consumer-side (UI thread) handle: publishes the share context, acquires frames, and feeds
//! window events into the relay.
//!
//! ### 中文
//! 消费者侧（UI 线程）句柄：发布共享上下文、获取帧，并将窗口事件送入转发器。

use std::sync::Arc;

use super::config::BridgeConfig;
use super::events::MouseButton;
use super::frame::AcquiredFrame;
use super::shared::SharedBridgeState;

/// ### English
/// Cloneable handle owned by the UI side. `H` is the backend's consumer handle type
/// (for OpenGL, the consumer's GLFW window).
///
/// ### 中文
/// UI 侧持有的可克隆句柄。`H` 为后端的消费者句柄类型（OpenGL 下为消费者的 GLFW window）。
pub struct FrameConsumer<H> {
    shared: Arc<SharedBridgeState<H>>,
}

impl<H> Clone for FrameConsumer<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H: Send + Sync + 'static> FrameConsumer<H> {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            shared: Arc::new(SharedBridgeState::new(config)),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<SharedBridgeState<H>> {
        &self.shared
    }

    /// ### English
    /// Publishes the consumer's context once it exists and unblocks a waiting `setup()`.
    ///
    /// #### Parameters
    /// - `handle`: Share target for the producer context.
    ///
    /// ### 中文
    /// 在消费者上下文创建后发布它，并解除等待中的 `setup()`。
    ///
    /// #### 参数
    /// - `handle`：生产者上下文的共享目标。
    pub fn context_ready(&self, handle: H) -> bool {
        self.shared.publish_consumer_context(handle)
    }

    /// ### English
    /// Claims the newest completed frame. Call once per paint; `None` means nothing to draw yet.
    ///
    /// ### 中文
    /// 领取最新完成的帧。每次绘制调用一次；`None` 表示暂无可绘制内容。
    pub fn acquire_latest(&self) -> Option<AcquiredFrame> {
        self.shared.frames.acquire_latest()
    }

    pub fn on_resize(&self, width: u32, height: u32) {
        self.shared.events.on_resize(width, height);
    }

    pub fn on_mouse_move(&self, x: i32, y: i32) {
        self.shared.events.on_mouse_move(x, y);
    }

    /// ### English
    /// Forwards a press of GLFW button `button`. Buttons other than left/right/middle are dropped.
    ///
    /// ### 中文
    /// 转发 GLFW 按键 `button` 的按下事件。左/右/中键以外的按键会被丢弃。
    pub fn on_mouse_press(&self, button: u32) {
        if let Some(button) = MouseButton::from_glfw(button) {
            self.shared.events.on_mouse_press(button);
        }
    }

    pub fn on_mouse_release(&self, button: u32) {
        if let Some(button) = MouseButton::from_glfw(button) {
            self.shared.events.on_mouse_release(button);
        }
    }

    pub fn on_mouse_double_click(&self, button: u32) {
        if let Some(button) = MouseButton::from_glfw(button) {
            self.shared.events.on_mouse_double_click(button);
        }
    }

    /// ### English
    /// Installs a callback run on the producer thread after each published frame, typically used
    /// to schedule a repaint. The callback must not re-enter this method.
    ///
    /// ### 中文
    /// 安装一个在每次发布帧后于生产者线程执行的回调，通常用于安排重绘。回调内不可重入本方法。
    pub fn set_redraw_notifier(&self, notifier: impl Fn() + Send + Sync + 'static) {
        self.shared.set_redraw_notifier(Some(Box::new(notifier)));
    }

    pub fn clear_redraw_notifier(&self) {
        self.shared.set_redraw_notifier(None);
    }

    /// ### English
    /// Signals that the consumer is going away. A blocked `setup()` returns with an error.
    ///
    /// ### 中文
    /// 通知消费者即将离开。阻塞中的 `setup()` 会返回错误。
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }
}
