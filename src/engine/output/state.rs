/// ### English
/// Lifecycle of a `VideoOutput`, driven by the decode framework's callbacks.
///
/// ### 中文
/// `VideoOutput` 的生命周期，由解码框架的回调驱动。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// ### English
    /// Constructed; `setup()` has not succeeded yet.
    ///
    /// ### 中文
    /// 已构造；`setup()` 尚未成功。
    Uninitialized,
    /// ### English
    /// Producer context exists; no frame slots are allocated.
    ///
    /// ### 中文
    /// 生产者上下文已存在；尚未分配帧槽位。
    DeviceReady,
    /// ### English
    /// Slots are being reallocated.
    ///
    /// ### 中文
    /// 正在重新分配槽位。
    Resizing,
    /// ### English
    /// Three slots of the current size exist; `swap()` publishes frames.
    ///
    /// ### 中文
    /// 已存在三个当前尺寸的槽位；`swap()` 会发布帧。
    FramesAllocated,
    /// ### English
    /// Terminal. Every callback fails with `InvalidState`.
    ///
    /// ### 中文
    /// 终止状态。所有回调都会以 `InvalidState` 失败。
    TornDown,
}

impl LifecycleState {
    #[inline]
    pub const fn has_device(self) -> bool {
        matches!(self, Self::DeviceReady | Self::Resizing | Self::FramesAllocated)
    }
}
