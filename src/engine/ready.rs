//! ### English
//! "Device ready" signal between the consumer (sets it) and `setup()` (waits on it).
//!
//! ### 中文
//! 消费者（置位）与 `setup()`（等待）之间的“设备就绪”信号。

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossbeam_channel as channel;

/// ### English
/// How a wait on [`DeviceReadySignal`] ended.
///
/// ### 中文
/// [`DeviceReadySignal`] 上一次等待的结束方式。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
    Ready,
    Closed,
    Cancelled,
    TimedOut,
}

struct WaitState {
    ready: bool,
    closed: bool,
    /// ### English
    /// One wake channel per wait in progress. Waking drains the list, so each wait is woken at
    /// most once and nothing is left for a later wait.
    ///
    /// ### 中文
    /// 每个进行中的等待各有一个唤醒 channel。唤醒会清空列表，因此每次等待至多被唤醒一次，
    /// 也不会给之后的等待留下任何残留。
    waiters: Vec<channel::Sender<()>>,
}

impl WaitState {
    fn settled(&self) -> Option<WaitOutcome> {
        if self.closed {
            Some(WaitOutcome::Closed)
        } else if self.ready {
            Some(WaitOutcome::Ready)
        } else {
            None
        }
    }

    fn wake_all(&mut self) -> bool {
        let woke = !self.waiters.is_empty();
        for waiter in self.waiters.drain(..) {
            let _ = waiter.try_send(());
        }
        woke
    }
}

/// ### English
/// Level-triggered ready/closed flags plus edge-triggered cancellation.
///
/// `set_ready` and `close` are sticky. `cancel` only wakes waits that are already registered;
/// with nobody waiting it does nothing, however often it is called.
///
/// ### 中文
/// 电平触发的就绪/关闭标志，加上边沿触发的取消。
///
/// `set_ready` 与 `close` 一旦置位便保持。`cancel` 只唤醒已登记的等待；
/// 无人等待时无论调用多少次都不产生任何效果。
pub(crate) struct DeviceReadySignal {
    state: Mutex<WaitState>,
}

impl DeviceReadySignal {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(WaitState {
                ready: false,
                closed: false,
                waiters: Vec::new(),
            }),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, WaitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_ready(&self) {
        let mut state = self.lock();
        state.ready = true;
        state.wake_all();
    }

    pub(crate) fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.wake_all();
    }

    /// ### English
    /// Wakes every wait currently in progress with [`WaitOutcome::Cancelled`].
    /// Returns whether any wait was woken.
    ///
    /// ### 中文
    /// 以 [`WaitOutcome::Cancelled`] 唤醒当前所有进行中的等待。返回是否唤醒了任何等待。
    pub(crate) fn cancel(&self) -> bool {
        self.lock().wake_all()
    }

    #[inline]
    pub(crate) fn has_waiter(&self) -> bool {
        !self.lock().waiters.is_empty()
    }

    /// ### English
    /// Registers a wait. Wakes issued after this call are kept for the ticket until it waits,
    /// so a cancel that lands before `WaitTicket::wait` blocks is not lost.
    ///
    /// ### 中文
    /// 登记一次等待。此调用之后发出的唤醒会为该 ticket 保留到它开始等待，
    /// 因此在 `WaitTicket::wait` 阻塞之前到达的取消不会丢失。
    pub(crate) fn register(&self) -> WaitTicket<'_> {
        let (sender, receiver) = channel::bounded(1);
        self.lock().waiters.push(sender.clone());
        WaitTicket {
            signal: self,
            waker: sender,
            receiver,
        }
    }

    fn unregister(&self, waker: &channel::Sender<()>) {
        self.lock()
            .waiters
            .retain(|waiter| !waiter.same_channel(waker));
    }
}

/// ### English
/// One registered wait on a [`DeviceReadySignal`]. Dropping it unregisters the wait.
///
/// ### 中文
/// [`DeviceReadySignal`] 上一次已登记的等待。drop 时注销该等待。
pub(crate) struct WaitTicket<'a> {
    signal: &'a DeviceReadySignal,
    waker: channel::Sender<()>,
    receiver: channel::Receiver<()>,
}

impl WaitTicket<'_> {
    /// ### English
    /// Returns at once if the signal is ready or closed, or if this ticket was already woken;
    /// otherwise blocks until it is set, closed, cancelled, or `timeout` elapses.
    ///
    /// #### Parameters
    /// - `timeout`: Upper bound for the wait; `None` waits indefinitely.
    ///
    /// ### 中文
    /// 若信号已就绪或已关闭，或该 ticket 已被唤醒，则立即返回；
    /// 否则阻塞直到被置位、关闭、取消，或到达 `timeout`。
    ///
    /// #### 参数
    /// - `timeout`：等待上限；`None` 表示无限等待。
    pub(crate) fn wait(self, timeout: Option<Duration>) -> WaitOutcome {
        if let Some(outcome) = self.signal.lock().settled() {
            return outcome;
        }

        let woken = match timeout {
            Some(timeout) => self.receiver.recv_timeout(timeout).is_ok(),
            None => self.receiver.recv().is_ok(),
        };

        match self.signal.lock().settled() {
            Some(outcome) => outcome,
            None if woken => WaitOutcome::Cancelled,
            None => WaitOutcome::TimedOut,
        }
    }
}

impl Drop for WaitTicket<'_> {
    fn drop(&mut self) {
        self.signal.unregister(&self.waker);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::{DeviceReadySignal, WaitOutcome};

    fn spawn_wait(
        signal: &Arc<DeviceReadySignal>,
        timeout: Option<Duration>,
    ) -> thread::JoinHandle<WaitOutcome> {
        let handle = {
            let signal = Arc::clone(signal);
            thread::spawn(move || signal.register().wait(timeout))
        };
        while !handle.is_finished() && !signal.has_waiter() {
            thread::sleep(Duration::from_millis(1));
        }
        handle
    }

    #[test]
    fn ready_is_sticky() {
        let signal = DeviceReadySignal::new();
        signal.set_ready();
        assert_eq!(signal.register().wait(Some(Duration::ZERO)), WaitOutcome::Ready);
        assert_eq!(signal.register().wait(None), WaitOutcome::Ready);
    }

    #[test]
    fn close_wins_over_ready() {
        let signal = DeviceReadySignal::new();
        signal.set_ready();
        signal.close();
        assert_eq!(signal.register().wait(None), WaitOutcome::Closed);
    }

    #[test]
    fn set_ready_from_other_thread_wakes_waiter() {
        let signal = Arc::new(DeviceReadySignal::new());
        let waiter = spawn_wait(&signal, None);
        signal.set_ready();
        assert_eq!(waiter.join().expect("waiter thread"), WaitOutcome::Ready);
        assert!(!signal.has_waiter());
    }

    #[test]
    fn cancel_without_waiter_leaves_nothing_behind() {
        let signal = DeviceReadySignal::new();
        assert!(!signal.cancel());
        assert!(!signal.cancel());
        assert_eq!(
            signal.register().wait(Some(Duration::from_millis(20))),
            WaitOutcome::TimedOut
        );
    }

    #[test]
    fn repeated_cancel_only_ends_the_current_wait() {
        let signal = Arc::new(DeviceReadySignal::new());
        let waiter = spawn_wait(&signal, None);
        assert!(signal.cancel());
        assert!(!signal.cancel());
        signal.cancel();
        assert_eq!(waiter.join().expect("waiter thread"), WaitOutcome::Cancelled);

        let next = spawn_wait(&signal, None);
        thread::sleep(Duration::from_millis(20));
        assert!(!next.is_finished());
        signal.set_ready();
        assert_eq!(next.join().expect("waiter thread"), WaitOutcome::Ready);
    }

    #[test]
    fn cancel_before_blocking_is_kept_for_the_ticket() {
        let signal = DeviceReadySignal::new();
        let ticket = signal.register();
        assert!(signal.cancel());
        assert_eq!(ticket.wait(None), WaitOutcome::Cancelled);
        assert!(!signal.has_waiter());
    }

    #[test]
    fn timed_out_wait_unregisters() {
        let signal = DeviceReadySignal::new();
        assert_eq!(
            signal.register().wait(Some(Duration::from_millis(10))),
            WaitOutcome::TimedOut
        );
        assert!(!signal.has_waiter());
    }
}
