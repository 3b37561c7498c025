use dpi::PhysicalSize;

use crate::engine::backend::RenderBackend;
use crate::engine::error::BridgeError;

use super::{LifecycleState, OutputConfig, VideoOutput};

impl<B: RenderBackend> VideoOutput<B> {
    /// ### English
    /// Makes sure three slots of `size` exist and binds the render slot.
    ///
    /// A different size releases the old slots first, then allocates all three or none. The same
    /// size as the current allocation allocates nothing. On failure the output holds no slots
    /// and reports a zero size, so the next resize is never skipped.
    ///
    /// The producer context must be current.
    ///
    /// #### Parameters
    /// - `size`: Frame size negotiated by the decoder.
    ///
    /// ### 中文
    /// 确保存在三个 `size` 尺寸的槽位，并绑定 render 槽位。
    ///
    /// 尺寸变化时先释放旧槽位，再一次性分配全部三个（要么全部成功，要么一个都不保留）。
    /// 与当前分配尺寸相同则不做分配。失败时输出不持有任何槽位且尺寸为 0，
    /// 因此下一次 resize 不会被跳过。
    ///
    /// 调用时生产者上下文必须为 current。
    ///
    /// #### 参数
    /// - `size`：解码器协商出的帧尺寸。
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<OutputConfig, BridgeError> {
        self.ensure_device("resize")?;

        if self.slots.is_allocated() && self.size == size {
            self.bind_render_slot();
            return Ok(OutputConfig::fixed(size));
        }

        self.state = LifecycleState::Resizing;
        self.release_slots();

        if size.width == 0 || size.height == 0 {
            self.state = LifecycleState::DeviceReady;
            tracing::warn!(?size, "refusing to allocate empty frame slots");
            return Err(BridgeError::AllocationFailure {
                index: 0,
                size,
                reason: "frame size must be non-zero".to_string(),
            });
        }

        let entries = match self.slots.allocate(&mut self.backend, size) {
            Ok(entries) => entries,
            Err(err) => {
                self.state = LifecycleState::DeviceReady;
                tracing::error!(%err, "frame slot allocation failed");
                return Err(err);
            }
        };

        let render = self.shared.frames.install_slots(entries);
        self.size = size;
        self.state = LifecycleState::FramesAllocated;
        if let Some(slot) = self.slots.get(render) {
            self.backend.bind_slot(slot);
        }
        tracing::debug!(?size, "frame slots allocated");
        Ok(OutputConfig::fixed(size))
    }

    pub(super) fn bind_render_slot(&mut self) {
        let render = self.shared.frames.render_slot();
        if let Some(slot) = self.slots.get(render) {
            self.backend.bind_slot(slot);
        }
    }
}
