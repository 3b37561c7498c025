//! ### English
//! Per-slot GL resources (FBO + RGBA8 colour texture) created in the producer context.
//!
//! ### 中文
//! 在生产者上下文中创建的每槽位 GL 资源（FBO + RGBA8 颜色纹理）。

use dpi::PhysicalSize;
use glow::HasContext as _;

use crate::engine::backend::FrameSlot;
use crate::engine::error::BridgeError;
use crate::engine::frame::TextureHandle;

pub struct GlFrameSlot {
    framebuffer: glow::NativeFramebuffer,
    texture: glow::NativeTexture,
    size: PhysicalSize<u32>,
    /// ### English
    /// Monotonic allocation number, only used in diagnostics.
    ///
    /// ### 中文
    /// 单调递增的分配序号，仅用于诊断日志。
    serial: u64,
}

impl GlFrameSlot {
    /// ### English
    /// Creates an FBO with a freshly allocated colour texture attached.
    ///
    /// #### Parameters
    /// - `gl`: Producer GL context (must be current).
    /// - `index`: Slot index, used for error reporting.
    /// - `size`: Texture size in pixels.
    /// - `serial`: Allocation number.
    ///
    /// ### 中文
    /// 创建一个附带新分配颜色纹理的 FBO。
    ///
    /// #### 参数
    /// - `gl`：生产者 GL 上下文（必须为 current）。
    /// - `index`：槽位索引，用于错误信息。
    /// - `size`：纹理像素尺寸。
    /// - `serial`：分配序号。
    pub(super) fn new(
        gl: &glow::Context,
        index: usize,
        size: PhysicalSize<u32>,
        serial: u64,
    ) -> Result<Self, BridgeError> {
        let fail = |reason: String| BridgeError::AllocationFailure {
            index,
            size,
            reason,
        };
        let (Ok(width), Ok(height)) = (i32::try_from(size.width), i32::try_from(size.height))
        else {
            return Err(fail("size exceeds GLsizei".to_string()));
        };

        unsafe {
            // Drain errors left by whoever used the context before us.
            for _ in 0..16 {
                if gl.get_error() == glow::NO_ERROR {
                    break;
                }
            }

            let texture = gl.create_texture().map_err(fail)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            let framebuffer = match gl.create_framebuffer() {
                Ok(framebuffer) => framebuffer,
                Err(err) => {
                    gl.delete_texture(texture);
                    return Err(fail(err));
                }
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            let error = gl.get_error();
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE || error != glow::NO_ERROR {
                gl.delete_framebuffer(framebuffer);
                gl.delete_texture(texture);
                let reason = if error == glow::OUT_OF_MEMORY {
                    "out of GPU memory".to_string()
                } else {
                    format!("framebuffer status {status:#x}, GL error {error:#x}")
                };
                return Err(fail(reason));
            }

            Ok(Self {
                framebuffer,
                texture,
                size,
                serial,
            })
        }
    }

    #[inline]
    pub(super) fn serial(&self) -> u64 {
        self.serial
    }

    pub(super) fn bind(&self, gl: &glow::Context) {
        unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer)) };
    }

    pub(super) fn delete(self, gl: &glow::Context) {
        unsafe {
            gl.delete_framebuffer(self.framebuffer);
            gl.delete_texture(self.texture);
        }
    }
}

impl FrameSlot for GlFrameSlot {
    #[inline]
    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    #[inline]
    fn texture(&self) -> TextureHandle {
        TextureHandle(u64::from(self.texture.0.get()))
    }
}
