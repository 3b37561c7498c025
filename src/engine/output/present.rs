use std::ffi::{CStr, c_void};

use crate::engine::backend::RenderBackend;
use crate::engine::error::BridgeError;

use super::{LifecycleState, VideoOutput};

impl<B: RenderBackend> VideoOutput<B> {
    /// ### English
    /// Publishes the frame just rendered and binds the next render slot.
    ///
    /// Runs the backend's publish barrier first so the consumer context sees every write, then
    /// rotates the slots under the frame lock and notifies the consumer.
    ///
    /// ### 中文
    /// 发布刚渲染完成的帧，并绑定下一个 render 槽位。
    ///
    /// 先执行后端的发布屏障，确保消费者上下文能看到全部写入；
    /// 然后在帧锁内轮转槽位并通知消费者。
    pub fn swap(&mut self) -> Result<(), BridgeError> {
        self.ensure_alive("swap")?;
        if self.state != LifecycleState::FramesAllocated {
            tracing::trace!(state = ?self.state, "swap without frame slots ignored");
            return Err(BridgeError::InvalidState {
                operation: "swap",
                state: self.state,
            });
        }

        self.backend.publish_barrier();
        let render = self.shared.frames.complete_frame();
        if let Some(slot) = self.slots.get(render) {
            self.backend.bind_slot(slot);
        }
        tracing::trace!(render, "frame published");
        self.shared.notify_redraw();
        Ok(())
    }

    /// ### English
    /// Binds (`true`) or releases (`false`) the producer context on the calling thread.
    ///
    /// ### 中文
    /// 在调用线程上绑定（`true`）或释放（`false`）生产者上下文。
    pub fn make_current(&mut self, active: bool) -> Result<(), BridgeError> {
        if active {
            self.ensure_device("make_current")?;
        } else {
            self.ensure_alive("make_current")?;
        }
        self.backend.make_current(active).inspect_err(|err| {
            tracing::warn!(%err, active, "make_current failed");
        })
    }

    /// ### English
    /// Resolves a graphics API entry point. Returns NULL when unknown, after teardown, or for
    /// `egl*` names when `hide_egl_symbols` is configured.
    ///
    /// ### 中文
    /// 解析图形 API 入口。未知符号、teardown 之后，或在配置了 `hide_egl_symbols` 时的 `egl*`
    /// 名称都会返回 NULL。
    pub fn get_proc_address(&self, name: &CStr) -> *const c_void {
        if self.state == LifecycleState::TornDown {
            return std::ptr::null();
        }
        if self.shared.config.hide_egl_symbols && name.to_bytes().starts_with(b"egl") {
            return std::ptr::null();
        }
        self.backend.get_proc_address(name)
    }
}
