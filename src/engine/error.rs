//! ### English
//! Error taxonomy shared by the producer-side lifecycle and the render backends.
//!
//! ### 中文
//! 生产者侧生命周期与渲染后端共用的错误分类。

use dpi::PhysicalSize;

use super::output::LifecycleState;

/// ### English
/// Failure reported by a bridge operation.
///
/// None of these cross the C ABI as panics; the FFI layer maps every variant to `false`.
///
/// ### 中文
/// 桥接操作返回的失败类型。
///
/// 这些错误都不会以 panic 形式穿过 C ABI；FFI 层会把所有变体映射为 `false`。
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// ### English
    /// The platform cannot provide threaded / shared GPU contexts, or the consumer context never
    /// became available. Fatal for the stream, not retryable.
    ///
    /// ### 中文
    /// 平台无法提供线程化/共享 GPU 上下文，或消费者上下文始终未就绪。对该流是致命错误，不可重试。
    #[error("threaded GPU context sharing is unavailable: {0}")]
    CapabilityUnavailable(String),
    /// ### English
    /// A frame slot could not be allocated at the requested size. A later resize may succeed.
    ///
    /// ### 中文
    /// 无法按请求尺寸分配帧槽位。之后的 resize 可能成功。
    #[error("failed to allocate frame slot {index} at {}x{}: {reason}", .size.width, .size.height)]
    AllocationFailure {
        index: usize,
        size: PhysicalSize<u32>,
        reason: String,
    },
    /// ### English
    /// The producer context could not be bound to (or released from) the calling thread.
    ///
    /// ### 中文
    /// 生产者上下文无法绑定到调用线程（或无法从调用线程解绑）。
    #[error("failed to bind producer context: {0}")]
    ContextBindFailure(String),
    /// ### English
    /// The producer context could not be created against the consumer's share context.
    ///
    /// ### 中文
    /// 无法基于消费者的共享上下文创建生产者上下文。
    #[error("failed to create producer context: {0}")]
    ContextCreation(String),
    /// ### English
    /// A callback arrived in a lifecycle state that cannot serve it.
    ///
    /// ### 中文
    /// 回调到达时所处的生命周期状态无法处理该调用。
    #[error("`{operation}` is not valid in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },
}
