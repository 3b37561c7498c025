/// ### English
/// Mouse buttons the relay forwards. Any other platform button is dropped.
///
/// ### 中文
/// 事件转发支持的鼠标按键。其它平台按键会被丢弃。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl MouseButton {
    /// ### English
    /// Maps a GLFW button code (`GLFW_MOUSE_BUTTON_LEFT = 0`, `RIGHT = 1`, `MIDDLE = 2`).
    ///
    /// ### 中文
    /// 映射 GLFW 按键码（`GLFW_MOUSE_BUTTON_LEFT = 0`、`RIGHT = 1`、`MIDDLE = 2`）。
    pub const fn from_glfw(button: u32) -> Option<Self> {
        match button {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Middle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MouseButton;

    #[test]
    fn glfw_codes_map_to_buttons() {
        assert_eq!(MouseButton::from_glfw(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_glfw(1), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_glfw(2), Some(MouseButton::Middle));
        assert_eq!(MouseButton::from_glfw(3), None);
        assert_eq!(MouseButton::from_glfw(7), None);
    }
}
