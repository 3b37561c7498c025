//! ### English
//! C ABI bindings for the producer side. These are the callbacks a decode framework calls;
//! they are expected on one (producer) thread at a time, except `cleanup`, which may arrive
//! from another thread while `setup` is blocked.
//!
//! ### 中文
//! 生产者侧的 C ABI 绑定，即解码框架调用的回调。它们应在同一时刻只由一个（生产者）线程调用；
//! 例外是 `cleanup`：在 `setup` 阻塞期间可能从其它线程到达。

use std::ffi::{CStr, c_char, c_void};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread;
use std::time::Duration;

use crate::engine::{GlBackend, OutputCallbacks, SetupRequest, VideoOutput, WindowEventSink};

use super::events::{FfiWindowSink, FrameBridgeWindowCallbacks};
use super::{
    FrameBridgeConsumer, FrameBridgeDeviceInfo, FrameBridgeOutput, FrameBridgeOutputConfig,
    write_out,
};

impl FrameBridgeOutput {
    fn lock(&self) -> MutexGuard<'_, VideoOutput<GlBackend>> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ### English
    /// Locks the output, cancelling a `setup` that holds the lock while waiting for the consumer.
    ///
    /// ### 中文
    /// 锁定输出；若 `setup` 在等待消费者期间持有锁，则取消该等待。
    fn lock_cancelling_setup(&self) -> MutexGuard<'_, VideoOutput<GlBackend>> {
        loop {
            match self.output.try_lock() {
                Ok(guard) => return guard,
                Err(TryLockError::Poisoned(poisoned)) => return poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    self.canceller.cancel();
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Creates an OpenGL output whose producer context will share objects with `consumer`'s window.
/// The consumer handle may be destroyed before the output.
///
/// ### 中文
/// 创建一个 OpenGL 输出，其生产者上下文将与 `consumer` 的 window 共享对象。
/// 消费者句柄可以先于输出销毁。
pub unsafe extern "C" fn frame_bridge_output_create(
    consumer: *const FrameBridgeConsumer,
) -> *mut FrameBridgeOutput {
    if consumer.is_null() {
        return std::ptr::null_mut();
    }

    let consumer = unsafe { &(*consumer).consumer };
    let output = VideoOutput::new(GlBackend::new(), consumer);
    Box::into_raw(Box::new(FrameBridgeOutput {
        canceller: output.setup_canceller(),
        output: Mutex::new(output),
    }))
}

#[unsafe(no_mangle)]
/// ### English
/// Tears the output down (slots and producer context) and frees the handle.
/// Must be called on the producer thread, or with no producer context current anywhere.
///
/// ### 中文
/// 销毁输出（槽位与生产者上下文）并释放句柄。
/// 必须在生产者线程调用，或确保生产者上下文在任何线程都不是 current。
pub unsafe extern "C" fn frame_bridge_output_destroy(output: *mut FrameBridgeOutput) {
    if output.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(output));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// `setup` callback. Blocks until the consumer context is published, then creates the producer
/// context. Writes the device description to `out_info` (may be NULL).
///
/// Returns `false` if threaded GL contexts are unavailable (no GLFW table installed), if the wait
/// was cancelled or timed out, or if the context could not be created.
///
/// ### 中文
/// `setup` 回调。阻塞直到消费者上下文发布，然后创建生产者上下文。
/// 设备描述写入 `out_info`（可为 NULL）。
///
/// 以下情况返回 `false`：线程化 GL 上下文不可用（未安装 GLFW 函数表）、等待被取消或超时、
/// 上下文创建失败。
pub unsafe extern "C" fn frame_bridge_output_setup(
    output: *mut FrameBridgeOutput,
    hardware_decoding: bool,
    out_info: *mut FrameBridgeDeviceInfo,
) -> bool {
    if output.is_null() {
        return false;
    }

    let request = SetupRequest { hardware_decoding };
    let result = unsafe { OutputCallbacks::setup(&mut *(*output).lock(), &request) };
    match result {
        Ok(info) => {
            unsafe { write_out(out_info, info.into()) };
            true
        }
        Err(_) => false,
    }
}

#[unsafe(no_mangle)]
/// ### English
/// `resize` callback. (Re)allocates the three frame slots when the size changed and binds the
/// render slot. Writes the negotiated format to `out_config` (may be NULL).
///
/// The producer context must be current.
///
/// ### 中文
/// `resize` 回调。尺寸变化时（重新）分配三个帧槽位，并绑定 render 槽位。
/// 协商格式写入 `out_config`（可为 NULL）。
///
/// 调用时生产者上下文必须为 current。
pub unsafe extern "C" fn frame_bridge_output_resize(
    output: *mut FrameBridgeOutput,
    width: u32,
    height: u32,
    out_config: *mut FrameBridgeOutputConfig,
) -> bool {
    if output.is_null() {
        return false;
    }

    let result = unsafe { OutputCallbacks::resize(&mut *(*output).lock(), width, height) };
    match result {
        Ok(config) => {
            unsafe { write_out(out_config, config.into()) };
            true
        }
        Err(_) => false,
    }
}

#[unsafe(no_mangle)]
/// ### English
/// `cleanup` callback. Releases the frame slots and wakes a blocked `setup`.
///
/// ### 中文
/// `cleanup` 回调。释放帧槽位并唤醒阻塞中的 `setup`。
pub unsafe extern "C" fn frame_bridge_output_cleanup(output: *mut FrameBridgeOutput) {
    if output.is_null() {
        return;
    }

    let output = unsafe { &*output };
    let _ = OutputCallbacks::cleanup(&mut *output.lock_cancelling_setup());
}

#[unsafe(no_mangle)]
/// ### English
/// `swap` callback: publishes the frame just rendered. Call after the frame's GL commands.
///
/// ### 中文
/// `swap` 回调：发布刚渲染完成的帧。在该帧的 GL 命令之后调用。
pub unsafe extern "C" fn frame_bridge_output_swap(output: *mut FrameBridgeOutput) -> bool {
    if output.is_null() {
        return false;
    }
    unsafe { OutputCallbacks::swap(&mut *(*output).lock()).is_ok() }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn frame_bridge_output_make_current(
    output: *mut FrameBridgeOutput,
    current: bool,
) -> bool {
    if output.is_null() {
        return false;
    }
    unsafe { OutputCallbacks::make_current(&mut *(*output).lock(), current).is_ok() }
}

#[unsafe(no_mangle)]
/// ### English
/// Resolves a GL entry point through the producer context. Returns NULL if unknown.
///
/// ### 中文
/// 通过生产者上下文解析 GL 入口。未知时返回 NULL。
pub unsafe extern "C" fn frame_bridge_output_get_proc_address(
    output: *mut FrameBridgeOutput,
    name: *const c_char,
) -> *const c_void {
    if output.is_null() || name.is_null() {
        return std::ptr::null();
    }

    let name = unsafe { CStr::from_ptr(name) };
    unsafe { OutputCallbacks::get_proc_address(&*(*output).lock(), name) }
}

#[unsafe(no_mangle)]
/// ### English
/// Registers the framework's window event callbacks (NULL `callbacks` removes them). If the
/// window size is already known, `callbacks->resize` is invoked once on the calling thread
/// before this returns, with the output locked; it must not re-enter `frame_bridge_output_*`.
///
/// ### 中文
/// 注册框架的窗口事件回调（`callbacks` 传 NULL 表示移除）。
/// 若窗口尺寸已知，会在返回前于调用线程调用一次 `callbacks->resize`，此时输出已加锁；
/// 该回调不得重入 `frame_bridge_output_*`。
pub unsafe extern "C" fn frame_bridge_output_set_window_callbacks(
    output: *mut FrameBridgeOutput,
    callbacks: *const FrameBridgeWindowCallbacks,
) -> bool {
    if output.is_null() {
        return false;
    }

    let sink = if callbacks.is_null() {
        None
    } else {
        let table = unsafe { *callbacks };
        Some(Box::new(FfiWindowSink::new(table)) as Box<dyn WindowEventSink>)
    };
    unsafe { OutputCallbacks::set_window_callbacks(&mut *(*output).lock(), sink).is_ok() }
}
