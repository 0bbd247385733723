//! 协议常量定义
//!
//! 包含 opcode 表、缓冲区大小和固定通道数

use num_enum::{IntoPrimitive, TryFromPrimitive};

// ============================================================================
// USB Identity
// ============================================================================

/// Corsair vendor ID
pub const USB_VENDOR_ID_CORSAIR: u16 = 0x1B1C;
/// Commander Pro product ID
pub const USB_PRODUCT_ID_COMMANDER_PRO: u16 = 0x0C10;

// ============================================================================
// Buffer Sizes
// ============================================================================

/// 命令帧大小（Bulk OUT，固定 63 字节，未用部分补零）
pub const OUT_BUFFER_SIZE: usize = 63;
/// 响应帧大小（Bulk IN，固定 16 字节）
pub const IN_BUFFER_SIZE: usize = 16;

// ============================================================================
// Channel Counts
// ============================================================================

/// 温度传感器通道数
pub const TEMP_CHANNEL_COUNT: usize = 4;
/// 风扇通道数
pub const FAN_CHANNEL_COUNT: usize = 6;
/// 电压轨数量（0 = 12V, 1 = 5V, 2 = 3.3V）
pub const RAIL_COUNT: usize = 3;

// ============================================================================
// Status Codes
// ============================================================================

/// 响应状态码：成功。非零表示设备内部错误，负载必须丢弃。
pub const STATUS_OK: u8 = 0x00;

// ============================================================================
// USB Endpoints
// ============================================================================

/// Bulk OUT endpoint (host to device)
pub const BULK_ENDPOINT_OUT: u8 = 0x02;
/// Bulk IN endpoint (device to host)
pub const BULK_ENDPOINT_IN: u8 = 0x81;

// ============================================================================
// Opcodes
// ============================================================================

/// 命令 opcode（命令帧 byte 0）
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Opcode {
    /// 温度通道连接性（响应 bytes 1..5 为每通道 0/1）
    GetTempConfig = 0x10,
    /// 读取温度（byte 1 为通道号，响应为整数摄氏度）
    GetTemp = 0x11,
    /// 读取电压（byte 1 为电压轨编号，响应为毫伏）
    GetVolt = 0x12,
    /// 风扇通道连接性/类型（响应 bytes 1..7 为每通道 0/1/2）
    GetFanConfig = 0x20,
    /// 读取风扇转速（byte 1 为通道号，响应为 RPM）
    GetFanRpm = 0x21,
    /// 设置固定风扇功率（byte 1 为通道号，byte 2 为 0-100 百分比）
    SetFanFixedPwm = 0x23,
}

impl Opcode {
    /// 从命令帧 byte 0 解析 opcode，未知值返回 `UnknownOpcode`
    pub fn from_byte(byte: u8) -> Result<Self, crate::ProtocolError> {
        Self::try_from(byte).map_err(|_| crate::ProtocolError::UnknownOpcode(byte))
    }
}
