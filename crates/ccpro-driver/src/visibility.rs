//! 可见性（能力）查询
//!
//! 监控前端在注册属性之前查询这里：给定 (传感器类别, 属性, 通道) 和
//! 发现状态，返回该属性应当以何种访问权限暴露。这是一个纯函数——
//! 核心不负责注册，只回答"存在与否、可读可写与否"。
//!
//! 穷尽匹配：新增传感器类别时编译器会强制补全所有分支，
//! 不会静默落入默认拒绝。

use ccpro_protocol::constants::{FAN_CHANNEL_COUNT, RAIL_COUNT, TEMP_CHANNEL_COUNT};

use crate::topology::Topology;

/// 传感器类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temp,
    Fan,
    Pwm,
    Voltage,
}

/// 通道属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// 测量值（温度/转速/电压/PWM 缓存值）
    Input,
    /// 发现派生的标签
    Label,
    /// 启用开关
    Enable,
}

/// 访问权限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 属性不存在，不应暴露
    None,
    ReadOnly,
    ReadWrite,
}

/// 计算一个属性的访问权限
pub fn visibility(
    topo: &Topology,
    kind: SensorKind,
    attr: Attribute,
    channel: usize,
) -> Access {
    match kind {
        SensorKind::Temp => match attr {
            Attribute::Input => {
                if channel < TEMP_CHANNEL_COUNT && topo.temp_present(channel) {
                    Access::ReadOnly
                } else {
                    Access::None
                }
            },
            Attribute::Label => {
                // 标签总是可读：未连接的通道也报告 "nc" 标签
                if channel < TEMP_CHANNEL_COUNT {
                    Access::ReadOnly
                } else {
                    Access::None
                }
            },
            Attribute::Enable => Access::None,
        },
        SensorKind::Fan => match attr {
            Attribute::Input => {
                if channel < FAN_CHANNEL_COUNT && topo.fan_present(channel) {
                    Access::ReadOnly
                } else {
                    Access::None
                }
            },
            Attribute::Label => {
                if channel < FAN_CHANNEL_COUNT {
                    Access::ReadOnly
                } else {
                    Access::None
                }
            },
            Attribute::Enable => {
                // 启用开关是策略而非存在性：缺席的风扇也可以被禁用
                if channel < FAN_CHANNEL_COUNT {
                    Access::ReadWrite
                } else {
                    Access::None
                }
            },
        },
        SensorKind::Pwm => match attr {
            Attribute::Input | Attribute::Enable => {
                if channel < FAN_CHANNEL_COUNT {
                    Access::ReadWrite
                } else {
                    Access::None
                }
            },
            Attribute::Label => Access::None,
        },
        SensorKind::Voltage => match attr {
            Attribute::Input => {
                // 电压轨没有存在标志，三条轨始终可读
                if channel < RAIL_COUNT {
                    Access::ReadOnly
                } else {
                    Access::None
                }
            },
            Attribute::Label | Attribute::Enable => Access::None,
        },
    }
}
