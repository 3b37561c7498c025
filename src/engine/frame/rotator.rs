//! ### English
//! Slot index rotation for the triple buffer.
//!
//! ### 中文
//! 三缓冲的槽位索引轮转。

use super::TRIPLE_BUFFER_COUNT;

/// ### English
/// Which slot is being rendered, which one holds the newest unclaimed frame, and which one is
/// exposed to the consumer.
///
/// The three indices are always a permutation of `{0, 1, 2}`. The producer only moves
/// `render <-> swap_pending`, the consumer only moves `swap_pending <-> displayed`, so the slot the
/// consumer samples is never the slot the producer writes.
///
/// ### 中文
/// 记录正在渲染的槽位、持有最新未被领取帧的槽位，以及暴露给消费者的槽位。
///
/// 三个索引始终是 `{0, 1, 2}` 的一个排列。生产者只交换 `render <-> swap_pending`，
/// 消费者只交换 `swap_pending <-> displayed`，因此消费者采样的槽位永远不是生产者写入的槽位。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SlotRotator {
    render: usize,
    swap_pending: usize,
    displayed: usize,
    /// ### English
    /// Set by the producer on completion, cleared by the consumer when it promotes the frame.
    ///
    /// ### 中文
    /// 生产者完成一帧时置位；消费者提升该帧时清除。
    updated: bool,
}

impl SlotRotator {
    pub(crate) const fn new() -> Self {
        Self {
            render: 0,
            swap_pending: 1,
            displayed: 2,
            updated: false,
        }
    }

    #[inline]
    pub(crate) fn render(&self) -> usize {
        self.render
    }

    #[inline]
    pub(crate) fn displayed(&self) -> usize {
        self.displayed
    }

    /// ### English
    /// Producer side: the slot just finished becomes the newest ready slot. Returns the new render
    /// slot. A previously ready but unclaimed frame is dropped here.
    ///
    /// ### 中文
    /// 生产者侧：刚完成的槽位成为最新的 ready 槽位。返回新的 render 槽位。
    /// 之前已 ready 但未被领取的帧在此被丢弃。
    #[inline]
    pub(crate) fn complete_frame(&mut self) -> usize {
        std::mem::swap(&mut self.render, &mut self.swap_pending);
        self.updated = true;
        self.render
    }

    /// ### English
    /// Consumer side: promotes the newest ready slot to displayed if there is one.
    /// Returns whether a promotion happened.
    ///
    /// ### 中文
    /// 消费者侧：若存在最新 ready 槽位，则将其提升为 displayed。返回是否发生了提升。
    #[inline]
    pub(crate) fn promote_latest(&mut self) -> bool {
        if !self.updated {
            return false;
        }
        std::mem::swap(&mut self.swap_pending, &mut self.displayed);
        self.updated = false;
        true
    }

    /// ### English
    /// Forgets a pending frame (used when the slots behind it are reallocated).
    ///
    /// ### 中文
    /// 丢弃待提升的帧（其背后的槽位被重新分配时使用）。
    #[inline]
    pub(crate) fn discard_pending(&mut self) {
        self.updated = false;
    }

    pub(crate) fn is_permutation(&self) -> bool {
        let mut seen = [false; TRIPLE_BUFFER_COUNT];
        for index in [self.render, self.swap_pending, self.displayed] {
            match seen.get_mut(index) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_identity_permutation() {
        let rotator = SlotRotator::new();
        assert_eq!(rotator.render(), 0);
        assert_eq!(rotator.displayed(), 2);
        assert!(rotator.is_permutation());
    }

    #[test]
    fn completed_frame_reaches_consumer_after_promotion() {
        let mut rotator = SlotRotator::new();
        let finished = rotator.render();
        let next_render = rotator.complete_frame();
        assert_ne!(next_render, finished);

        assert!(rotator.promote_latest());
        assert_eq!(rotator.displayed(), finished);
        assert!(rotator.is_permutation());
    }

    #[test]
    fn promotion_without_new_frame_is_a_no_op() {
        let mut rotator = SlotRotator::new();
        let before = rotator;
        assert!(!rotator.promote_latest());
        assert_eq!(rotator, before);
    }

    #[test]
    fn only_last_of_several_completions_is_promoted() {
        let mut rotator = SlotRotator::new();
        rotator.complete_frame();
        let last = rotator.render();
        rotator.complete_frame();

        assert!(rotator.promote_latest());
        assert_eq!(rotator.displayed(), last);
        assert!(!rotator.promote_latest());
    }

    #[test]
    fn discarded_frame_is_not_promoted() {
        let mut rotator = SlotRotator::new();
        rotator.complete_frame();
        rotator.discard_pending();
        assert!(!rotator.promote_latest());
        assert_eq!(rotator.displayed(), 2);
    }
}
