//! ### English
//! Producer-owned set of exactly three GPU frame slots with all-or-nothing allocation.
//!
//! ### 中文
//! 生产者持有的恰好三个 GPU 帧槽位集合，分配要么全部成功要么全部回滚。

use dpi::PhysicalSize;

use crate::engine::backend::{FrameSlot, RenderBackend};
use crate::engine::error::BridgeError;

use super::{SlotEntry, TRIPLE_BUFFER_COUNT};

pub(crate) struct FrameSlotSet<S> {
    slots: Option<[S; TRIPLE_BUFFER_COUNT]>,
}

impl<S: FrameSlot> FrameSlotSet<S> {
    pub(crate) const fn new() -> Self {
        Self { slots: None }
    }

    #[inline]
    pub(crate) fn is_allocated(&self) -> bool {
        self.slots.is_some()
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&S> {
        self.slots.as_ref()?.get(index)
    }

    /// ### English
    /// Allocates three slots of `size`. If any allocation fails, the slots created so far are
    /// destroyed and the set stays empty.
    ///
    /// #### Parameters
    /// - `backend`: Backend whose (current) producer context creates the slots.
    /// - `size`: Requested frame size; every slot gets exactly this size.
    ///
    /// ### 中文
    /// 分配三个 `size` 尺寸的槽位。任一分配失败时，会销毁已创建的槽位，集合保持为空。
    ///
    /// #### 参数
    /// - `backend`：使用其（current）生产者上下文创建槽位的后端。
    /// - `size`：请求的帧尺寸；每个槽位都严格使用该尺寸。
    pub(crate) fn allocate<B>(
        &mut self,
        backend: &mut B,
        size: PhysicalSize<u32>,
    ) -> Result<[SlotEntry; TRIPLE_BUFFER_COUNT], BridgeError>
    where
        B: RenderBackend<Slot = S>,
    {
        debug_assert!(self.slots.is_none());
        debug_assert_eq!(TRIPLE_BUFFER_COUNT, 3);

        let first = backend.create_slot(0, size)?;
        let second = match backend.create_slot(1, size) {
            Ok(slot) => slot,
            Err(err) => {
                backend.destroy_slot(first);
                return Err(err);
            }
        };
        let third = match backend.create_slot(2, size) {
            Ok(slot) => slot,
            Err(err) => {
                backend.destroy_slot(second);
                backend.destroy_slot(first);
                return Err(err);
            }
        };

        let slots = [first, second, third];
        let entries = std::array::from_fn(|index| {
            let slot = &slots[index];
            SlotEntry {
                texture: slot.texture(),
                size: slot.size(),
            }
        });
        self.slots = Some(slots);
        Ok(entries)
    }

    /// ### English
    /// Destroys all slots (no-op when nothing is allocated).
    ///
    /// ### 中文
    /// 销毁全部槽位（未分配时为 no-op）。
    pub(crate) fn release<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend<Slot = S>,
    {
        let Some(slots) = self.slots.take() else {
            return;
        };
        for slot in slots {
            backend.destroy_slot(slot);
        }
    }
}
