//! 数值换算
//!
//! PWM 0-255 与设备 0-100 百分比之间的换算，以及温度缩放。

/// PWM 值（0-255）换算为设备百分比（0-100）
///
/// 采用四舍五入而非截断：`round(value * 100 / 255)`。
/// 截断会让 255 映射到 99，写满功率永远到不了 100%。
///
/// 调用方负责保证输入已经被限制在 0-255（超范围值在驱动层
/// 作为 `InvalidArgument` 拒绝，不会到达这里）。
pub fn pwm_to_device_percent(value: u8) -> u8 {
    ((value as u32 * 100 + 127) / 255) as u8
}

/// 温度缩放：原始值为整数摄氏度，对外单位为十分之一度
///
/// 恒等于 `10 × raw`，无舍入。
pub fn scale_temp(raw: u16) -> u32 {
    raw as u32 * 10
}
