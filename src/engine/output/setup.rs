use std::sync::Arc;

use dpi::PhysicalSize;

use crate::engine::backend::{DeviceInfo, RenderBackend, SetupRequest};
use crate::engine::error::BridgeError;

use super::{LifecycleState, VideoOutput};

impl<B: RenderBackend> VideoOutput<B> {
    /// ### English
    /// Creates (or reuses) the producer context. Blocks until the consumer has published its
    /// context, unless it already has.
    ///
    /// The wait ends early with `CapabilityUnavailable` when it is cancelled (cleanup, a
    /// `SetupCanceller`, or consumer shutdown) or when the configured timeout elapses.
    ///
    /// #### Parameters
    /// - `request`: Device capabilities requested by the decode framework.
    ///
    /// ### 中文
    /// 创建（或复用）生产者上下文。若消费者尚未发布其上下文，则阻塞等待。
    ///
    /// 等待被取消（cleanup、`SetupCanceller` 或消费者关闭）或超过配置的超时时间时，
    /// 会提前以 `CapabilityUnavailable` 返回。
    ///
    /// #### 参数
    /// - `request`：解码框架请求的设备能力。
    pub fn setup(&mut self, request: &SetupRequest) -> Result<DeviceInfo, BridgeError> {
        self.ensure_alive("setup")?;
        if !self.backend.supports_threaded_contexts() {
            tracing::error!("platform cannot share GPU contexts across threads");
            return Err(BridgeError::CapabilityUnavailable(
                "threaded GPU contexts are not supported on this platform".to_string(),
            ));
        }

        let shared = Arc::clone(&self.shared);
        let ticket = shared.register_setup();

        // A repeated setup starts from an unknown size so the next resize always allocates.
        self.release_slots_in_context();
        self.size = PhysicalSize::new(0, 0);

        let consumer = shared.wait_device_ready(ticket).inspect_err(|err| {
            tracing::warn!(%err, "setup aborted");
        })?;
        let info = self.backend.open(consumer, request)?;

        self.device = Some(info);
        self.state = LifecycleState::DeviceReady;
        tracing::debug!(?info, "video output setup complete");
        Ok(info)
    }
}
