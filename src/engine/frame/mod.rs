/// ### English
/// Triple-buffer frame state shared between the producer thread (decoder/render callbacks) and
/// the consumer thread (UI paint). Only slot bookkeeping is locked; GPU work never runs under the
/// frame lock.
///
/// ### 中文
/// 生产者线程（解码/渲染回调）与消费者线程（UI 绘制）之间共享的三缓冲帧状态。
/// 只有槽位簿记受锁保护；GPU 工作从不在帧锁内执行。
mod exchange;
mod rotator;
mod slot_set;

use dpi::PhysicalSize;

pub(crate) use exchange::FrameExchange;
pub(crate) use slot_set::FrameSlotSet;

/// ### English
/// Fixed triple-buffer slot count (always 3: render / ready-to-swap / displayed).
///
/// ### 中文
/// 固定三缓冲槽位数量（始终为 3：render / 待交换 / displayed）。
pub const TRIPLE_BUFFER_COUNT: usize = 3;

/// ### English
/// Opaque native texture handle (GL texture name, or a platform pointer widened to `u64`).
///
/// ### 中文
/// 不透明的原生纹理句柄（GL 纹理名，或扩展为 `u64` 的平台指针）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// ### English
/// What the consumer needs to know about one slot. Copied into the frame table when slots are
/// (re)allocated so the consumer never touches producer-owned GPU objects.
///
/// ### 中文
/// 消费者需要了解的单个槽位信息。槽位（重新）分配时复制进帧表，消费者因此不会触碰生产者持有的 GPU 对象。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SlotEntry {
    pub texture: TextureHandle,
    pub size: PhysicalSize<u32>,
}

/// ### English
/// Metadata for one acquired frame (consumer side).
///
/// ### 中文
/// 单个已获取帧的元数据（消费者侧）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquiredFrame {
    /// ### English
    /// Triple-buffer slot index (0..=2).
    ///
    /// ### 中文
    /// 三缓冲槽位索引（0..=2）。
    pub slot: usize,
    /// ### English
    /// Texture to sample from the consumer's context. Only the texture is shared between the two
    /// contexts; the producer's framebuffer objects never cross over.
    ///
    /// ### 中文
    /// 在消费者上下文中采样的纹理。两个上下文之间只共享纹理；生产者的 framebuffer 对象不会跨上下文传递。
    pub texture: TextureHandle,
    /// ### English
    /// Frame size in pixels.
    ///
    /// ### 中文
    /// 帧尺寸（像素）。
    pub size: PhysicalSize<u32>,
    /// ### English
    /// Whether this acquisition promoted a newly completed frame (`false` = re-display).
    ///
    /// ### 中文
    /// 本次获取是否提升了一个新完成的帧（`false` = 重复显示上一帧）。
    pub updated: bool,
}
