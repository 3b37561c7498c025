//! ### English
//! State shared between the consumer handle and the producer-side output.
//!
//! ### 中文
//! 消费者句柄与生产者侧输出之间共享的状态。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use super::config::BridgeConfig;
use super::error::BridgeError;
use super::events::WindowEventRelay;
use super::frame::FrameExchange;
use super::ready::{DeviceReadySignal, WaitOutcome, WaitTicket};

pub(crate) type RedrawNotifier = Box<dyn Fn() + Send + Sync>;

pub(crate) struct SharedBridgeState<H> {
    pub(crate) frames: FrameExchange,
    pub(crate) events: WindowEventRelay,
    pub(crate) config: BridgeConfig,
    ready: DeviceReadySignal,
    /// ### English
    /// Share target published by the consumer. Set at most once, immutable afterwards.
    ///
    /// ### 中文
    /// 消费者发布的共享目标。最多设置一次，之后不可变。
    consumer_context: OnceLock<H>,
    closed: AtomicBool,
    redraw: Mutex<Option<RedrawNotifier>>,
}

impl<H> SharedBridgeState<H> {
    pub(crate) fn new(config: BridgeConfig) -> Self {
        Self {
            frames: FrameExchange::new(),
            events: WindowEventRelay::new(),
            config,
            ready: DeviceReadySignal::new(),
            consumer_context: OnceLock::new(),
            closed: AtomicBool::new(false),
            redraw: Mutex::new(None),
        }
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// ### English
    /// Publishes the consumer's share handle and wakes a waiting `setup()`.
    /// Returns `false` if a handle was already published or the consumer was shut down.
    ///
    /// ### 中文
    /// 发布消费者的共享句柄并唤醒等待中的 `setup()`。
    /// 若句柄已发布或消费者已关闭则返回 `false`。
    pub(crate) fn publish_consumer_context(&self, handle: H) -> bool {
        if self.is_closed() {
            tracing::warn!("consumer context published after shutdown; ignored");
            return false;
        }
        if self.consumer_context.set(handle).is_err() {
            tracing::warn!("consumer context already published; ignored");
            return false;
        }
        tracing::debug!("consumer context ready");
        self.ready.set_ready();
        true
    }

    /// ### English
    /// Registers a pending `setup()`. Cancels issued from here on reach that setup, even before
    /// it starts blocking in [`Self::wait_device_ready`].
    ///
    /// ### 中文
    /// 登记一个进行中的 `setup()`。此后发出的取消都会到达该 setup，即使它尚未在
    /// [`Self::wait_device_ready`] 中开始阻塞。
    #[inline]
    pub(crate) fn register_setup(&self) -> WaitTicket<'_> {
        self.ready.register()
    }

    /// ### English
    /// Blocks until the consumer context is available, the wait is cancelled, or the configured
    /// timeout elapses. Returns immediately if the handle is already published.
    ///
    /// ### 中文
    /// 阻塞直到消费者上下文可用、等待被取消或超过配置的超时时间。
    /// 若句柄已发布则立即返回。
    pub(crate) fn wait_device_ready(&self, ticket: WaitTicket<'_>) -> Result<&H, BridgeError> {
        if !self.is_closed() && self.consumer_context.get().is_none() {
            tracing::debug!(timeout = ?self.config.setup_timeout, "waiting for consumer context");
        }
        let reason = match ticket.wait(self.config.setup_timeout) {
            WaitOutcome::Ready => {
                return self.consumer_context.get().ok_or_else(|| {
                    BridgeError::CapabilityUnavailable(
                        "consumer context signalled but not published".to_string(),
                    )
                });
            }
            WaitOutcome::Closed => "consumer has shut down",
            WaitOutcome::Cancelled => "setup cancelled before the consumer context was ready",
            WaitOutcome::TimedOut => "timed out waiting for the consumer context",
        };
        Err(BridgeError::CapabilityUnavailable(reason.to_string()))
    }

    /// ### English
    /// Wakes a `setup()` that is registered or blocked on the device-ready signal. With no setup
    /// in progress nothing is recorded, so repeated cancels never make a later setup fail.
    /// Returns whether a setup was woken.
    ///
    /// ### 中文
    /// 唤醒已登记或正阻塞在设备就绪信号上的 `setup()`。没有进行中的 setup 时不记录任何东西，
    /// 因此重复取消不会导致之后的 setup 失败。返回是否唤醒了某个 setup。
    pub(crate) fn release_setup_waiter(&self) -> bool {
        let woke = self.ready.cancel();
        if woke {
            tracing::debug!("releasing blocked setup");
        }
        woke
    }

    #[inline]
    pub(crate) fn has_setup_waiter(&self) -> bool {
        self.ready.has_waiter()
    }

    pub(crate) fn set_redraw_notifier(&self, notifier: Option<RedrawNotifier>) {
        *self.redraw.lock().unwrap_or_else(PoisonError::into_inner) = notifier;
    }

    pub(crate) fn notify_redraw(&self) {
        if let Some(notify) = self
            .redraw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            notify();
        }
    }

    /// ### English
    /// Marks the consumer as gone: pending and future `setup()` calls fail, and redraw requests
    /// stop.
    ///
    /// ### 中文
    /// 标记消费者已离开：当前及之后的 `setup()` 都会失败，重绘请求停止。
    pub(crate) fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!("consumer shut down");
        self.set_redraw_notifier(None);
        self.ready.close();
    }
}
