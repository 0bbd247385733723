//! 驱动层错误类型定义

use ccpro_protocol::ProtocolError;
use ccpro_usb::TransportError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 输入验证失败（越界通道号、越界数值）
    ///
    /// 在任何传输交换之前拒绝，不会到达设备。
    #[error("Invalid argument: {what} = {value}")]
    InvalidArgument { what: &'static str, value: u32 },

    /// 请求合法，但目标通道未连接或被禁用
    ///
    /// 不是通道本身的故障，调用方可以据此隐藏该通道。
    #[error("No data for this channel (absent or disabled)")]
    NoData,

    /// 传输层错误（Bulk 交换失败或超时），原样向上传播，不重试
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 交换成功但设备报告内部错误（响应状态码非零）
    ///
    /// 与传输错误区分开：设备"说不行"和"联系不上设备"是两回事。
    #[error("Device reported error status: 0x{status:02X}")]
    DeviceStatus { status: u8 },

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl DriverError {
    fn invalid(what: &'static str, value: u32) -> Self {
        DriverError::InvalidArgument { what, value }
    }

    /// 越界通道号的便捷构造
    pub(crate) fn bad_channel(what: &'static str, channel: usize) -> Self {
        Self::invalid(what, channel as u32)
    }

    /// 越界数值的便捷构造
    pub(crate) fn bad_value(what: &'static str, value: u32) -> Self {
        Self::invalid(what, value)
    }

    /// 是否为"无数据"（通道缺席/禁用，而非故障）
    pub fn is_no_data(&self) -> bool {
        matches!(self, DriverError::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::InvalidArgument {
            what: "fan channel",
            value: 9,
        };
        assert!(err.to_string().contains("fan channel"));
        assert!(err.to_string().contains("9"));

        let err = DriverError::NoData;
        assert!(err.to_string().contains("No data"));

        let err = DriverError::DeviceStatus { status: 0x03 };
        assert!(err.to_string().contains("0x03"));
    }

    #[test]
    fn test_from_transport_error() {
        let err: DriverError = TransportError::DeviceNotFound.into();
        match err {
            DriverError::Transport(TransportError::DeviceNotFound) => {},
            other => panic!("Expected Transport variant, got {:?}", other),
        }
    }

    #[test]
    fn test_from_protocol_error() {
        let err: DriverError = ProtocolError::InvalidLength {
            expected: 16,
            actual: 3,
        }
        .into();
        assert!(matches!(err, DriverError::Protocol(_)));
    }

    #[test]
    fn test_is_no_data() {
        assert!(DriverError::NoData.is_no_data());
        assert!(!DriverError::DeviceStatus { status: 1 }.is_no_data());
    }
}
