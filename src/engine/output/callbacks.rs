//! ### English
//! The callback table a decode framework drives, as a trait.
//!
//! ### 中文
//! 解码框架驱动的回调表（以 trait 表达）。

use std::ffi::{CStr, c_void};

use dpi::PhysicalSize;

use crate::engine::backend::{DeviceInfo, RenderBackend, SetupRequest};
use crate::engine::error::BridgeError;
use crate::engine::events::WindowEventSink;

use super::{OutputConfig, VideoOutput};

/// ### English
/// Output-side callbacks in the order a decode framework uses them:
/// `setup` once, `resize` on every (re)negotiation, `make_current` around GPU work, `swap`
/// after each frame, `cleanup` on stop.
///
/// ### 中文
/// 解码框架使用的输出侧回调，调用顺序为：`setup` 一次，每次（重新）协商时 `resize`，
/// GPU 工作前后 `make_current`，每帧之后 `swap`，停止时 `cleanup`。
pub trait OutputCallbacks {
    fn setup(&mut self, request: &SetupRequest) -> Result<DeviceInfo, BridgeError>;
    fn resize(&mut self, width: u32, height: u32) -> Result<OutputConfig, BridgeError>;
    fn cleanup(&mut self) -> Result<(), BridgeError>;
    fn swap(&mut self) -> Result<(), BridgeError>;
    fn make_current(&mut self, active: bool) -> Result<(), BridgeError>;
    fn get_proc_address(&self, name: &CStr) -> *const c_void;
    fn set_window_callbacks(
        &mut self,
        sink: Option<Box<dyn WindowEventSink>>,
    ) -> Result<(), BridgeError>;
}

impl<B: RenderBackend> OutputCallbacks for VideoOutput<B> {
    fn setup(&mut self, request: &SetupRequest) -> Result<DeviceInfo, BridgeError> {
        VideoOutput::setup(self, request)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<OutputConfig, BridgeError> {
        VideoOutput::resize(self, PhysicalSize::new(width, height))
    }

    fn cleanup(&mut self) -> Result<(), BridgeError> {
        VideoOutput::cleanup(self)
    }

    fn swap(&mut self) -> Result<(), BridgeError> {
        VideoOutput::swap(self)
    }

    fn make_current(&mut self, active: bool) -> Result<(), BridgeError> {
        VideoOutput::make_current(self, active)
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        VideoOutput::get_proc_address(self, name)
    }

    fn set_window_callbacks(
        &mut self,
        sink: Option<Box<dyn WindowEventSink>>,
    ) -> Result<(), BridgeError> {
        VideoOutput::set_window_callbacks(self, sink)
    }
}
