//! 响应帧解析
//!
//! 将固定 16 字节的 Bulk IN 帧解析为状态码 + 负载。

use crate::ProtocolError;
use crate::constants::IN_BUFFER_SIZE;

/// 设备响应帧（固定 16 字节）
///
/// byte 0 为状态码（0 = 成功），bytes 1-2 为大端字节序的 16 位负载。
/// 连接性查询的响应在 bytes 1.. 携带每通道一个字节的连接码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    raw: [u8; IN_BUFFER_SIZE],
}

impl Response {
    /// 从固定大小缓冲区构建（零拷贝语义，按值复制 16 字节）
    pub fn new(raw: [u8; IN_BUFFER_SIZE]) -> Self {
        Self { raw }
    }

    /// 从切片构建，长度不符返回 `InvalidLength`
    pub fn from_slice(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() != IN_BUFFER_SIZE {
            return Err(ProtocolError::InvalidLength {
                expected: IN_BUFFER_SIZE,
                actual: data.len(),
            });
        }
        let mut raw = [0u8; IN_BUFFER_SIZE];
        raw.copy_from_slice(data);
        Ok(Self { raw })
    }

    /// 状态码（byte 0）。非零表示设备内部错误，负载必须丢弃。
    pub fn status(&self) -> u8 {
        self.raw[0]
    }

    /// 16 位负载（bytes 1-2，大端字节序）
    pub fn value_u16(&self) -> u16 {
        u16::from_be_bytes([self.raw[1], self.raw[2]])
    }

    /// 连接性负载字节：通道 `index` 对应 byte `index + 1`
    pub fn config_byte(&self, index: usize) -> u8 {
        self.raw[index + 1]
    }

    /// 原始帧内容
    pub fn raw(&self) -> &[u8; IN_BUFFER_SIZE] {
        &self.raw
    }
}
