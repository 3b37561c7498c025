//! ### English
//! Mutex-guarded frame table: slot rotation plus the consumer-visible slot descriptors.
//!
//! ### 中文
//! 受互斥锁保护的帧表：槽位轮转以及消费者可见的槽位描述。

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::rotator::SlotRotator;
use super::{AcquiredFrame, SlotEntry, TRIPLE_BUFFER_COUNT};

struct FrameTable {
    rotator: SlotRotator,
    /// ### English
    /// `None` until the first successful resize, and again after cleanup.
    ///
    /// ### 中文
    /// 首次 resize 成功之前为 `None`，cleanup 之后也会回到 `None`。
    slots: Option<[SlotEntry; TRIPLE_BUFFER_COUNT]>,
}

/// ### English
/// The frame lock. Held only for index swaps and descriptor copies, never across GPU calls.
///
/// ### 中文
/// 帧锁。只在交换索引与复制描述信息时持有，从不跨越 GPU 调用。
pub(crate) struct FrameExchange {
    table: Mutex<FrameTable>,
}

impl FrameExchange {
    pub(crate) fn new() -> Self {
        Self {
            table: Mutex::new(FrameTable {
                rotator: SlotRotator::new(),
                slots: None,
            }),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, FrameTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ### English
    /// Producer side: publishes the render slot as the newest ready frame and returns the slot the
    /// producer must render into next.
    ///
    /// ### 中文
    /// 生产者侧：将 render 槽位发布为最新 ready 帧，并返回生产者接下来要渲染的槽位。
    pub(crate) fn complete_frame(&self) -> usize {
        let mut table = self.lock();
        let render = table.rotator.complete_frame();
        debug_assert!(table.rotator.is_permutation());
        render
    }

    #[inline]
    pub(crate) fn render_slot(&self) -> usize {
        self.lock().rotator.render()
    }

    /// ### English
    /// Consumer side: claims the newest completed frame (if any) and returns the displayed slot.
    ///
    /// Returns `None` while no slots are allocated ("nothing to draw yet").
    ///
    /// ### 中文
    /// 消费者侧：领取最新完成的帧（若有），并返回 displayed 槽位。
    ///
    /// 尚未分配槽位时返回 `None`（表示“暂无可绘制内容”）。
    pub(crate) fn acquire_latest(&self) -> Option<AcquiredFrame> {
        let mut table = self.lock();
        let slots = table.slots?;
        let updated = table.rotator.promote_latest();
        debug_assert!(table.rotator.is_permutation());

        let slot = table.rotator.displayed();
        let entry = slots[slot];
        Some(AcquiredFrame {
            slot,
            texture: entry.texture,
            size: entry.size,
            updated,
        })
    }

    /// ### English
    /// Publishes a freshly allocated slot set. Any frame pending from the previous set is dropped.
    /// Returns the render slot index the producer must bind.
    ///
    /// ### 中文
    /// 发布新分配的槽位集合。旧集合中待提升的帧会被丢弃。返回生产者必须绑定的 render 槽位索引。
    pub(crate) fn install_slots(&self, slots: [SlotEntry; TRIPLE_BUFFER_COUNT]) -> usize {
        let mut table = self.lock();
        table.slots = Some(slots);
        table.rotator.discard_pending();
        table.rotator.render()
    }

    /// ### English
    /// Withdraws the slot set before its GPU objects are destroyed.
    ///
    /// ### 中文
    /// 在销毁 GPU 对象之前撤下槽位集合。
    pub(crate) fn clear_slots(&self) {
        let mut table = self.lock();
        table.slots = None;
        table.rotator.discard_pending();
    }

    #[cfg(test)]
    pub(crate) fn rotator_snapshot(&self) -> SlotRotator {
        self.lock().rotator
    }
}
