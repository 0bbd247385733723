//! # Commander Pro USB 传输层
//!
//! Bulk USB 传输抽象：`Transport` trait 定义一次阻塞发送/接收的
//! 两个半程，`UsbTransport` 为 rusb 后端实现。`mock` feature 提供
//! 无硬件依赖的 `MockTransport`（用于驱动层测试）。
//!
//! 本层只负责搬运固定大小的帧，不理解协议内容；状态码校验和
//! 事务配对（send 之后必须 receive）属于驱动层。

use ccpro_protocol::constants::{IN_BUFFER_SIZE, OUT_BUFFER_SIZE};
use thiserror::Error;

pub mod device;

#[cfg(feature = "mock")]
pub mod mock;

pub use device::UsbTransport;

#[cfg(feature = "mock")]
pub use mock::{MockExchange, MockReply, MockTransport};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    /// Bulk OUT 半程失败（含超时）
    #[error("Bulk send failed: {0}")]
    SendFailed(#[source] rusb::Error),

    /// Bulk IN 半程失败（含超时）
    #[error("Bulk receive failed: {0}")]
    ReceiveFailed(#[source] rusb::Error),

    /// 响应长度不足一个完整帧
    #[error("Short response from device: expected {expected} bytes, got {actual}")]
    ShortResponse { expected: usize, actual: usize },

    /// 未找到匹配的设备
    #[error("Device not found")]
    DeviceNotFound,

    /// 设备接口上没有 Bulk IN/OUT 端点对
    #[error("No bulk endpoints found")]
    NoBulkEndpoints,

    /// 设备打开/配置阶段的 USB 错误（来自 rusb）
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
}

impl TransportError {
    /// 检查是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TransportError::SendFailed(rusb::Error::Timeout)
                | TransportError::ReceiveFailed(rusb::Error::Timeout)
                | TransportError::Usb(rusb::Error::Timeout)
        )
    }
}

/// 一次阻塞交换的两个半程
///
/// 实现必须保证每个半程有界阻塞（约 1 秒超时），超时表现为
/// `SendFailed` / `ReceiveFailed`，绝不无限阻塞。本 trait 不做
/// 并发控制：调用方（驱动层的通道锁）保证同一时刻至多一个
/// 在途交换。
pub trait Transport {
    /// 发送一个固定 63 字节的命令帧（Bulk OUT）
    fn send(&mut self, frame: &[u8; OUT_BUFFER_SIZE]) -> Result<(), TransportError>;

    /// 接收一个固定 16 字节的响应帧（Bulk IN）
    fn receive(&mut self, frame: &mut [u8; IN_BUFFER_SIZE]) -> Result<(), TransportError>;
}
