//! 命令帧构建
//!
//! 将类型化的命令编码为固定 63 字节的 Bulk OUT 帧。

use crate::constants::{OUT_BUFFER_SIZE, Opcode};

/// 设备命令（类型化）
///
/// 每个变体对应一个 opcode。通道号在此处不做范围校验：
/// 校验属于驱动层的输入验证，越界通道不会到达编码层。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// 查询温度通道连接性
    TempConfig,
    /// 读取温度通道原始值（整数摄氏度）
    ReadTemp { channel: u8 },
    /// 读取电压轨（毫伏）
    ReadVoltage { rail: u8 },
    /// 查询风扇通道连接性/类型
    FanConfig,
    /// 读取风扇转速（RPM）
    ReadRpm { channel: u8 },
    /// 设置固定风扇功率（percent 为设备单位 0-100）
    SetFanPower { channel: u8, percent: u8 },
}

impl Command {
    /// 命令对应的 opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::TempConfig => Opcode::GetTempConfig,
            Command::ReadTemp { .. } => Opcode::GetTemp,
            Command::ReadVoltage { .. } => Opcode::GetVolt,
            Command::FanConfig => Opcode::GetFanConfig,
            Command::ReadRpm { .. } => Opcode::GetFanRpm,
            Command::SetFanPower { .. } => Opcode::SetFanFixedPwm,
        }
    }

    /// 参数字节（命令帧 bytes 1-2）
    fn params(&self) -> (u8, u8) {
        match *self {
            Command::TempConfig | Command::FanConfig => (0, 0),
            Command::ReadTemp { channel } => (channel, 0),
            Command::ReadVoltage { rail } => (rail, 0),
            Command::ReadRpm { channel } => (channel, 0),
            Command::SetFanPower { channel, percent } => (channel, percent),
        }
    }

    /// 编码为固定大小的 Bulk OUT 帧
    ///
    /// byte 0 为 opcode，bytes 1-2 为参数，byte 3 之后全部为零。
    /// 纯数据变换，无分配失败路径。
    pub fn encode(&self) -> [u8; OUT_BUFFER_SIZE] {
        let mut buf = [0u8; OUT_BUFFER_SIZE];
        let (p1, p2) = self.params();
        buf[0] = self.opcode().into();
        buf[1] = p1;
        buf[2] = p2;
        buf
    }
}
