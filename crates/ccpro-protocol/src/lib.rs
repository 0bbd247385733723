//! # Commander Pro Protocol
//!
//! Commander Pro USB 命令协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量定义（opcode、缓冲区大小、通道数）
//! - `command`: 命令帧构建
//! - `response`: 响应帧解析
//! - `discovery`: 连接性（拓扑发现）负载解析
//! - `scaling`: 数值换算（PWM 百分比、温度缩放）
//!
//! ## 帧格式
//!
//! 命令帧固定 63 字节：byte 0 为 opcode，bytes 1-2 为参数，其余补零。
//! 响应帧固定 16 字节：byte 0 为状态码（0 = 成功），bytes 1-2 为
//! 大端字节序的 16 位负载。

pub mod command;
pub mod constants;
pub mod discovery;
pub mod response;
pub mod scaling;

// 重新导出常用类型
pub use command::Command;
pub use constants::*;
pub use discovery::{FanConnector, FanInfo, TempConnector, TempInfo};
pub use response::Response;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::InvalidLength {
            expected: 16,
            actual: 4,
        };
        assert!(err.to_string().contains("expected 16"));
        assert!(err.to_string().contains("got 4"));

        let err = ProtocolError::UnknownOpcode(0x42);
        assert!(err.to_string().contains("0x42"));
    }
}
