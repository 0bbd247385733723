//! # Commander Pro 驱动层
//!
//! 设备句柄与类型化传感器门面：
//! - `device`: `CommanderPro` 句柄（锁串行化事务 + 门面操作）
//! - `topology`: 一次性拓扑发现的结果缓存
//! - `visibility`: 能力查询（监控前端决定暴露哪些属性）
//! - `error`: 驱动层错误类型
//!
//! ## 并发模型
//!
//! 同步阻塞调用，无内部工作线程。通道锁是唯一的并发原语：
//! 允许多个调用线程，但同一时刻只放行一个在途交换。调用最坏
//! 情况下阻塞约 2 秒（收发各约 1 秒超时），事务一旦开始不可取消。
//! 失败不在内部重试，原样交给调用方决定。

pub mod device;
pub mod error;
pub mod topology;
pub mod visibility;

// 重新导出常用类型
pub use device::CommanderPro;
pub use error::DriverError;
pub use topology::Topology;
pub use visibility::{Access, Attribute, SensorKind, visibility};
