//! ### English
//! Output format negotiated by `resize()`. The policy is fixed: full-range BT.709 RGBA with an
//! sRGB transfer, top-left origin.
//!
//! ### 中文
//! `resize()` 协商出的输出格式。策略固定：全范围 BT.709 RGBA、sRGB 传递函数、左上角原点。

use dpi::PhysicalSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum PixelFormat {
    Rgba8 = 0,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ColorSpace {
    Bt709 = 0,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ColorPrimaries {
    Bt709 = 0,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TransferFunction {
    Srgb = 0,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Orientation {
    TopLeft = 0,
}

/// ### English
/// Description of the frames the producer renders into after a successful `resize()`.
///
/// ### 中文
/// `resize()` 成功后生产者渲染目标帧的格式描述。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub size: PhysicalSize<u32>,
    pub format: PixelFormat,
    pub full_range: bool,
    pub colorspace: ColorSpace,
    pub primaries: ColorPrimaries,
    pub transfer: TransferFunction,
    pub orientation: Orientation,
}

impl OutputConfig {
    pub const fn fixed(size: PhysicalSize<u32>) -> Self {
        Self {
            size,
            format: PixelFormat::Rgba8,
            full_range: true,
            colorspace: ColorSpace::Bt709,
            primaries: ColorPrimaries::Bt709,
            transfer: TransferFunction::Srgb,
            orientation: Orientation::TopLeft,
        }
    }
}
