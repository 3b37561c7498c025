//! ### English
//! Producer-side video output: the device lifecycle driven by the decode framework.
//!
//! ### 中文
//! 生产者侧视频输出：由解码框架驱动的设备生命周期。
mod callbacks;
mod format;
mod present;
mod resize;
mod setup;
mod state;
mod teardown;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use dpi::PhysicalSize;

use super::backend::{DeviceInfo, RenderBackend};
use super::consumer::FrameConsumer;
use super::error::BridgeError;
use super::frame::FrameSlotSet;
use super::shared::SharedBridgeState;

pub use callbacks::OutputCallbacks;
pub use format::{
    ColorPrimaries, ColorSpace, Orientation, OutputConfig, PixelFormat, TransferFunction,
};
pub use state::LifecycleState;

/// ### English
/// Owns the producer backend, the three frame slots and the lifecycle state.
///
/// Every method is called from the producer thread; the decode framework serializes them.
///
/// ### 中文
/// 持有生产者后端、三个帧槽位以及生命周期状态。
///
/// 所有方法都在生产者线程调用，由解码框架保证串行。
pub struct VideoOutput<B: RenderBackend> {
    backend: B,
    shared: Arc<SharedBridgeState<B::ConsumerHandle>>,
    slots: FrameSlotSet<B::Slot>,
    state: LifecycleState,
    /// ### English
    /// Size of the allocated slots; zero when none are allocated.
    ///
    /// ### 中文
    /// 已分配槽位的尺寸；未分配时为 0。
    size: PhysicalSize<u32>,
    device: Option<DeviceInfo>,
}

/// ### English
/// Thread-safe handle that wakes a `setup()` blocked on the consumer context.
///
/// ### 中文
/// 线程安全的句柄，用于唤醒阻塞等待消费者上下文的 `setup()`。
pub struct SetupCanceller<H> {
    shared: Arc<SharedBridgeState<H>>,
}

impl<H> Clone for SetupCanceller<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H> SetupCanceller<H> {
    /// ### English
    /// Ends a `setup()` that is in progress with `CapabilityUnavailable`. Does nothing when no
    /// setup is running, so it is safe to call repeatedly. Returns whether a setup was woken.
    ///
    /// ### 中文
    /// 以 `CapabilityUnavailable` 结束进行中的 `setup()`。没有 setup 在运行时不产生任何效果，
    /// 因此可以重复调用。返回是否唤醒了某个 setup。
    pub fn cancel(&self) -> bool {
        self.shared.release_setup_waiter()
    }

    /// ### English
    /// Whether a `setup()` has started and not yet been woken.
    ///
    /// ### 中文
    /// 是否有 `setup()` 已开始且尚未被唤醒。
    pub fn is_waiting(&self) -> bool {
        self.shared.has_setup_waiter()
    }
}

impl<B: RenderBackend> VideoOutput<B> {
    /// ### English
    /// Creates an output bound to `consumer`. No GPU work happens until `setup()`.
    ///
    /// #### Parameters
    /// - `backend`: Platform backend used for the producer context and slots.
    /// - `consumer`: Consumer whose context the producer context will share with.
    ///
    /// ### 中文
    /// 创建绑定到 `consumer` 的输出。在 `setup()` 之前不做任何 GPU 工作。
    ///
    /// #### 参数
    /// - `backend`：用于生产者上下文与槽位的平台后端。
    /// - `consumer`：生产者上下文将与其共享的消费者。
    pub fn new(backend: B, consumer: &FrameConsumer<B::ConsumerHandle>) -> Self {
        Self {
            backend,
            shared: Arc::clone(consumer.shared()),
            slots: FrameSlotSet::new(),
            state: LifecycleState::Uninitialized,
            size: PhysicalSize::new(0, 0),
            device: None,
        }
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    #[inline]
    pub fn device(&self) -> Option<DeviceInfo> {
        self.device
    }

    pub fn setup_canceller(&self) -> SetupCanceller<B::ConsumerHandle> {
        SetupCanceller {
            shared: Arc::clone(&self.shared),
        }
    }

    fn ensure_alive(&self, operation: &'static str) -> Result<(), BridgeError> {
        if self.state == LifecycleState::TornDown {
            tracing::warn!(operation, "call on torn-down video output");
            return Err(BridgeError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn ensure_device(&self, operation: &'static str) -> Result<(), BridgeError> {
        self.ensure_alive(operation)?;
        if !self.state.has_device() {
            tracing::warn!(operation, state = ?self.state, "call before setup");
            return Err(BridgeError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// ### English
    /// Withdraws the slots from the consumer, then destroys them. Does not touch the
    /// device-ready signal.
    ///
    /// ### 中文
    /// 先从消费者侧撤下槽位，再销毁它们。不触碰设备就绪信号。
    fn release_slots(&mut self) {
        if !self.slots.is_allocated() {
            return;
        }
        self.shared.frames.clear_slots();
        self.slots.release(&mut self.backend);
        self.size = PhysicalSize::new(0, 0);
        tracing::debug!("frame slots released");
    }

    /// ### English
    /// `release_slots` for callers that run without the producer context current: binds it
    /// around the release and unbinds it afterwards.
    ///
    /// ### 中文
    /// 供生产者上下文不为 current 时调用的 `release_slots`：在释放期间绑定上下文，之后解绑。
    fn release_slots_in_context(&mut self) {
        if !self.slots.is_allocated() {
            return;
        }
        if let Err(err) = self.backend.make_current(true) {
            tracing::warn!(%err, "cannot bind producer context to release frame slots");
        }
        self.release_slots();
        if let Err(err) = self.backend.make_current(false) {
            tracing::warn!(%err, "cannot unbind producer context after releasing frame slots");
        }
    }
}
