use crate::engine::backend::RenderBackend;
use crate::engine::error::BridgeError;
use crate::engine::events::WindowEventSink;

use super::{LifecycleState, VideoOutput};

impl<B: RenderBackend> VideoOutput<B> {
    /// ### English
    /// Releases the frame slots (idempotent) and wakes a `setup()` blocked on the consumer.
    /// The producer context is kept for the next `setup()`.
    ///
    /// ### 中文
    /// 释放帧槽位（幂等），并唤醒阻塞等待消费者的 `setup()`。
    /// 生产者上下文会保留给下一次 `setup()`。
    pub fn cleanup(&mut self) -> Result<(), BridgeError> {
        self.ensure_alive("cleanup")?;
        self.shared.release_setup_waiter();
        self.release_slots();
        if matches!(
            self.state,
            LifecycleState::FramesAllocated | LifecycleState::Resizing
        ) {
            self.state = LifecycleState::DeviceReady;
        }
        Ok(())
    }

    /// ### English
    /// Installs the decode framework's window event sink (`None` removes it). The last known
    /// window size is replayed to the new sink.
    ///
    /// ### 中文
    /// 安装解码框架的窗口事件 sink（`None` 表示移除）。最近一次窗口尺寸会重放给新 sink。
    pub fn set_window_callbacks(
        &mut self,
        sink: Option<Box<dyn WindowEventSink>>,
    ) -> Result<(), BridgeError> {
        self.ensure_alive("set_window_callbacks")?;
        self.shared.events.set_sink(sink);
        Ok(())
    }

    /// ### English
    /// Destroys slots and the producer context (idempotent). Afterwards every call fails with
    /// `InvalidState`. Runs on drop as well.
    ///
    /// ### 中文
    /// 销毁槽位与生产者上下文（幂等）。此后所有调用都会以 `InvalidState` 失败。Drop 时也会执行。
    pub fn teardown(&mut self) {
        if self.state == LifecycleState::TornDown {
            return;
        }
        self.shared.release_setup_waiter();
        self.shared.events.set_sink(None);

        if self.backend.is_open() {
            if let Err(err) = self.backend.make_current(true) {
                tracing::warn!(%err, "cannot bind producer context for teardown");
            }
            self.release_slots();
            if let Err(err) = self.backend.make_current(false) {
                tracing::warn!(%err, "cannot unbind producer context for teardown");
            }
            self.backend.close();
        }
        self.device = None;
        self.state = LifecycleState::TornDown;
        tracing::debug!("video output torn down");
    }
}

impl<B: RenderBackend> Drop for VideoOutput<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
