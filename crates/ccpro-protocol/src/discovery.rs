//! 连接性（拓扑发现）负载解析
//!
//! 将 `GetTempConfig` / `GetFanConfig` 的响应负载解析为每通道的
//! 连接类型和派生标签。硬件偶尔会报告未记录的连接码，此时保守
//! 处理为"存在但类型未知"而不是报错。

use crate::constants::{FAN_CHANNEL_COUNT, TEMP_CHANNEL_COUNT};
use crate::response::Response;

/// 风扇连接类型（`GetFanConfig` 响应中的每通道字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FanConnector {
    /// 0：未连接
    None,
    /// 1：3-pin 风扇
    ThreePin,
    /// 2：4-pin (PWM) 风扇
    FourPin,
    /// 其他未记录的连接码：按存在处理
    Other(u8),
}

impl FanConnector {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => FanConnector::None,
            1 => FanConnector::ThreePin,
            2 => FanConnector::FourPin,
            other => FanConnector::Other(other),
        }
    }

    /// 通道上是否检测到硬件
    pub fn connected(&self) -> bool {
        !matches!(self, FanConnector::None)
    }

    fn suffix(&self) -> &'static str {
        match self {
            FanConnector::None => "nc",
            FanConnector::ThreePin => "3pin",
            FanConnector::FourPin => "4pin",
            FanConnector::Other(_) => "other",
        }
    }
}

/// 温度传感器连接类型（`GetTempConfig` 响应中的每通道字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TempConnector {
    /// 0：未连接
    None,
    /// 1：已连接
    Connected,
    /// 其他未记录的连接码：按存在处理
    Other(u8),
}

impl TempConnector {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => TempConnector::None,
            1 => TempConnector::Connected,
            other => TempConnector::Other(other),
        }
    }

    pub fn connected(&self) -> bool {
        !matches!(self, TempConnector::None)
    }

    fn suffix(&self) -> &'static str {
        match self {
            TempConnector::None => "nc",
            TempConnector::Connected => "connected",
            TempConnector::Other(_) => "other",
        }
    }
}

/// 单个风扇通道的发现结果
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FanInfo {
    pub connector: FanConnector,
    /// 派生标签，1 基编号，如 `"fan1 3pin"` / `"fan3 nc"`
    pub label: String,
}

impl FanInfo {
    pub fn connected(&self) -> bool {
        self.connector.connected()
    }
}

/// 单个温度通道的发现结果
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempInfo {
    pub connector: TempConnector,
    /// 派生标签，1 基编号，如 `"temp1 connected"` / `"temp2 nc"`
    pub label: String,
}

impl TempInfo {
    pub fn connected(&self) -> bool {
        self.connector.connected()
    }
}

/// 解析 `GetFanConfig` 响应：通道 i 对应负载 byte i+1
pub fn parse_fan_config(resp: &Response) -> [FanInfo; FAN_CHANNEL_COUNT] {
    std::array::from_fn(|i| {
        let connector = FanConnector::from_code(resp.config_byte(i));
        FanInfo {
            connector,
            label: format!("fan{} {}", i + 1, connector.suffix()),
        }
    })
}

/// 解析 `GetTempConfig` 响应：通道 i 对应负载 byte i+1
pub fn parse_temp_config(resp: &Response) -> [TempInfo; TEMP_CHANNEL_COUNT] {
    std::array::from_fn(|i| {
        let connector = TempConnector::from_code(resp.config_byte(i));
        TempInfo {
            connector,
            label: format!("temp{} {}", i + 1, connector.suffix()),
        }
    })
}
