//! Mock 传输（无硬件依赖）
//!
//! 用于驱动层测试：按脚本或响应函数回放响应帧，记录每一次完整的
//! 交换（发送帧 + 响应帧成对记录），并统计 send/receive 调用次数，
//! 以便测试断言"零传输调用"和"帧不交错"这类属性。

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use ccpro_protocol::constants::{IN_BUFFER_SIZE, OUT_BUFFER_SIZE, STATUS_OK};

use crate::{Transport, TransportError};

/// 脚本化的单次回复
pub enum MockReply {
    /// 正常返回一个响应帧
    Frame([u8; IN_BUFFER_SIZE]),
    /// 本次 send 失败（模拟 Bulk OUT 超时）
    SendError,
    /// 本次 receive 失败（模拟 Bulk IN 超时）
    ReceiveError,
}

/// 一次已完成的交换记录
///
/// `sent` 与 `reply` 成对记录：配对发生在 receive 时刻，
/// 中间不可能插入另一个交换的帧（锁序列化的验证点）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockExchange {
    pub sent: [u8; OUT_BUFFER_SIZE],
    /// receive 失败时为 None
    pub reply: Option<[u8; IN_BUFFER_SIZE]>,
}

type Responder = Box<dyn FnMut(&[u8; OUT_BUFFER_SIZE]) -> [u8; IN_BUFFER_SIZE] + Send>;

struct MockInner {
    script: VecDeque<MockReply>,
    responder: Option<Responder>,
    /// 已发送但尚未 receive 的帧
    pending: Option<[u8; OUT_BUFFER_SIZE]>,
    exchanges: Vec<MockExchange>,
    send_calls: usize,
    receive_calls: usize,
}

/// Mock 传输后端
///
/// `Clone` 共享内部状态：测试持有一个克隆用于事后检查，
/// 另一个克隆交给驱动句柄。
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                script: VecDeque::new(),
                responder: None,
                pending: None,
                exchanges: Vec::new(),
                send_calls: 0,
                receive_calls: 0,
            })),
        }
    }

    /// 追加一个脚本化的响应帧（按字节）
    ///
    /// `bytes` 不足 16 字节的部分补零。
    pub fn push_reply(&self, bytes: &[u8]) {
        let mut frame = [0u8; IN_BUFFER_SIZE];
        frame[..bytes.len()].copy_from_slice(bytes);
        self.inner.lock().script.push_back(MockReply::Frame(frame));
    }

    /// 追加一次 send 失败
    pub fn push_send_error(&self) {
        self.inner.lock().script.push_back(MockReply::SendError);
    }

    /// 追加一次 receive 失败
    pub fn push_receive_error(&self) {
        self.inner.lock().script.push_back(MockReply::ReceiveError);
    }

    /// 设置响应函数：脚本为空时根据发送帧计算响应
    ///
    /// 用于并发测试——响应由请求派生，可以事后验证每次交换自洽。
    pub fn set_responder<F>(&self, f: F)
    where
        F: FnMut(&[u8; OUT_BUFFER_SIZE]) -> [u8; IN_BUFFER_SIZE] + Send + 'static,
    {
        self.inner.lock().responder = Some(Box::new(f));
    }

    /// 已完成的交换记录
    pub fn exchanges(&self) -> Vec<MockExchange> {
        self.inner.lock().exchanges.clone()
    }

    /// (send 调用次数, receive 调用次数)
    pub fn calls(&self) -> (usize, usize) {
        let inner = self.inner.lock();
        (inner.send_calls, inner.receive_calls)
    }

    /// 已完成的交换次数
    pub fn transaction_count(&self) -> usize {
        self.inner.lock().exchanges.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, frame: &[u8; OUT_BUFFER_SIZE]) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.send_calls += 1;

        // send 失败也要记录 pending：设备已经收到了半个交换，
        // 驱动层随后仍会执行 receive 来保持配对
        inner.pending = Some(*frame);

        if matches!(inner.script.front(), Some(MockReply::SendError)) {
            inner.script.pop_front();
            return Err(TransportError::SendFailed(rusb::Error::Timeout));
        }

        Ok(())
    }

    fn receive(&mut self, frame: &mut [u8; IN_BUFFER_SIZE]) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.receive_calls += 1;

        let sent = inner.pending.take().unwrap_or([0u8; OUT_BUFFER_SIZE]);

        let reply = match inner.script.pop_front() {
            Some(MockReply::Frame(f)) => f,
            Some(MockReply::ReceiveError) => {
                inner.exchanges.push(MockExchange { sent, reply: None });
                return Err(TransportError::ReceiveFailed(rusb::Error::Timeout));
            },
            // SendError 不应该留到 receive 阶段；当作脚本耗尽处理
            Some(MockReply::SendError) | None => {
                if let Some(responder) = inner.responder.as_mut() {
                    responder(&sent)
                } else {
                    // 默认：状态 0、负载全零的成功响应
                    let mut f = [0u8; IN_BUFFER_SIZE];
                    f[0] = STATUS_OK;
                    f
                }
            },
        };

        frame.copy_from_slice(&reply);
        inner.exchanges.push(MockExchange {
            sent,
            reply: Some(reply),
        });
        Ok(())
    }
}
