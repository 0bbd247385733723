//! 设备句柄与传感器门面
//!
//! `CommanderPro` 是每台物理设备唯一的句柄：持有传输端点、共享
//! 交换缓冲区和互斥锁。所有设备通信（包括构造时的拓扑发现）都
//! 通过同一把锁串行化——同一时刻至多一个在途交换，两个并发的
//! 传感器读取不可能在共享缓冲区上交错。

use parking_lot::Mutex;
use tracing::{debug, trace};

use ccpro_protocol::constants::{
    FAN_CHANNEL_COUNT, IN_BUFFER_SIZE, OUT_BUFFER_SIZE, RAIL_COUNT, STATUS_OK, TEMP_CHANNEL_COUNT,
};
use ccpro_protocol::discovery::{parse_fan_config, parse_temp_config};
use ccpro_protocol::scaling::{pwm_to_device_percent, scale_temp};
use ccpro_protocol::{Command, Response};
use ccpro_usb::{Transport, UsbTransport};

use crate::error::DriverError;
use crate::topology::Topology;
use crate::visibility::{Access, Attribute, SensorKind, visibility};

/// 锁保护的交换状态
///
/// 传输端点、交换缓冲区和按通道的缓存标志都在锁内：
/// 事务期间独占缓冲区，缓存读写也不需要第二把锁。
struct Exchange<T> {
    transport: T,
    out_buf: [u8; OUT_BUFFER_SIZE],
    in_buf: [u8; IN_BUFFER_SIZE],
    /// 每风扇最近一次写入的 PWM 值（0-255）。协议没有读回命令，
    /// 读取只返回缓存，句柄创建时为 0。
    pwm: [u8; FAN_CHANNEL_COUNT],
    /// 每风扇的启用开关（策略位，与物理存在无关），默认启用
    fan_enable: [bool; FAN_CHANNEL_COUNT],
    /// 每风扇的 pwm_enable 缓存（自动模式不支持，纯内存标志）
    pwm_enable: [u8; FAN_CHANNEL_COUNT],
}

impl<T: Transport> Exchange<T> {
    fn new(transport: T) -> Self {
        Self {
            transport,
            out_buf: [0u8; OUT_BUFFER_SIZE],
            in_buf: [0u8; IN_BUFFER_SIZE],
            pwm: [0u8; FAN_CHANNEL_COUNT],
            fan_enable: [true; FAN_CHANNEL_COUNT],
            pwm_enable: [0u8; FAN_CHANNEL_COUNT],
        }
    }

    /// 一次完整的事务：编码 → 发送 → 接收 → 状态校验
    ///
    /// 发送失败后仍然无条件接收：设备内部状态机要求收发严格配对，
    /// 半途放弃接收会导致协议失步，之后每次交换都会错位。
    /// 接收完成后才返回发送错误（不让次要错误掩盖主因）。
    fn transact(&mut self, cmd: Command) -> Result<Response, DriverError> {
        self.out_buf = cmd.encode();
        trace!("transact opcode=0x{:02X}", self.out_buf[0]);

        let send_result = self.transport.send(&self.out_buf);
        let recv_result = self.transport.receive(&mut self.in_buf);

        if let Err(send_err) = send_result {
            if let Err(recv_err) = recv_result {
                trace!("Receive after failed send also failed: {}", recv_err);
            }
            return Err(send_err.into());
        }
        recv_result?;

        let resp = Response::new(self.in_buf);
        if resp.status() != STATUS_OK {
            // 设备报告内部错误，负载无效，必须丢弃
            return Err(DriverError::DeviceStatus {
                status: resp.status(),
            });
        }
        Ok(resp)
    }
}

/// Commander Pro 设备句柄（对外 API）
///
/// 构造即发现：`new()` 同步执行一次拓扑发现，失败则句柄不会存在，
/// 所以句柄只会以 Ready 状态被观察到，部分发现的状态无法表示，
/// 会话中途重新发现在类型上就不可能。
///
/// 所有门面方法都取 `&self`（内部经由通道锁互斥），同一个句柄
/// 可以被多个线程共享使用；调用最坏情况下会阻塞约 2 秒
/// （发送 + 接收各约 1 秒超时）。
pub struct CommanderPro<T: Transport> {
    exchange: Mutex<Exchange<T>>,
    topology: Topology,
}

impl CommanderPro<UsbTransport> {
    /// 打开第一台匹配的物理设备（可选按序列号过滤）并完成发现
    pub fn open(serial_number_filter: Option<&str>) -> Result<Self, DriverError> {
        let transport = UsbTransport::open_first(serial_number_filter)?;
        Self::new(transport)
    }
}

impl<T: Transport> CommanderPro<T> {
    /// 在给定传输上创建句柄，同步执行一次拓扑发现
    ///
    /// 发现失败会中止构造：不会有部分发现的句柄暴露给调用方。
    pub fn new(transport: T) -> Result<Self, DriverError> {
        let mut exchange = Exchange::new(transport);

        // 连接性只在设备刚上电时采样才正确，结果缓存到句柄销毁
        let temps = parse_temp_config(&exchange.transact(Command::TempConfig)?);
        let fans = parse_fan_config(&exchange.transact(Command::FanConfig)?);

        let topology = Topology::new(temps, fans);
        debug!(
            "Discovery complete: fans present {:?}, temps present {:?}",
            (0..FAN_CHANNEL_COUNT).map(|i| topology.fan_present(i)).collect::<Vec<_>>(),
            (0..TEMP_CHANNEL_COUNT).map(|i| topology.temp_present(i)).collect::<Vec<_>>(),
        );

        Ok(Self {
            exchange: Mutex::new(exchange),
            topology,
        })
    }

    /// 发现结果（句柄生命周期内只读）
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// 读取温度通道，单位为十分之一摄氏度（恒等于 10 × 原始整数度）
    ///
    /// 未连接的通道返回 `NoData`，不会发起任何交换。
    pub fn temperature(&self, channel: usize) -> Result<u32, DriverError> {
        if channel >= TEMP_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("temp channel", channel));
        }
        if !self.topology.temp_present(channel) {
            return Err(DriverError::NoData);
        }

        let resp = self.exchange.lock().transact(Command::ReadTemp {
            channel: channel as u8,
        })?;
        Ok(scale_temp(resp.value_u16()))
    }

    /// 读取风扇转速（RPM，原始值不缩放）
    ///
    /// 风扇被禁用时返回 `NoData`，不会发起任何交换。
    pub fn fan_rpm(&self, channel: usize) -> Result<u16, DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }

        let mut exchange = self.exchange.lock();
        // 启用检查必须在锁内：set_fan_enable 走同一把锁
        if !exchange.fan_enable[channel] {
            return Err(DriverError::NoData);
        }

        let resp = exchange.transact(Command::ReadRpm {
            channel: channel as u8,
        })?;
        Ok(resp.value_u16())
    }

    /// 读取电压轨（毫伏，原始值不缩放）
    ///
    /// 0 = 12V，1 = 5V，2 = 3.3V。电压轨没有存在标志，总是可查。
    pub fn voltage(&self, rail: usize) -> Result<u16, DriverError> {
        if rail >= RAIL_COUNT {
            return Err(DriverError::bad_channel("voltage rail", rail));
        }

        let resp = self.exchange.lock().transact(Command::ReadVoltage { rail: rail as u8 })?;
        Ok(resp.value_u16())
    }

    /// 设置固定风扇功率
    ///
    /// `value` 为 0-255，超范围拒绝为 `InvalidArgument`。发往设备前
    /// 四舍五入换算为 0-100；缓存记录的是换算前的 0-255 原值，且在
    /// 交换之前更新——缓存回读不依赖传输结果。
    pub fn set_fan_power(&self, channel: usize, value: u32) -> Result<(), DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        if value > 255 {
            return Err(DriverError::bad_value("pwm value", value));
        }

        let mut exchange = self.exchange.lock();
        exchange.pwm[channel] = value as u8;
        exchange.transact(Command::SetFanPower {
            channel: channel as u8,
            percent: pwm_to_device_percent(value as u8),
        })?;
        Ok(())
    }

    /// 读取缓存的风扇功率（0-255）
    ///
    /// 协议没有功率读回命令：返回最近一次写入的值，从未写过则为 0，
    /// 绝不是测量值。不发起任何交换。
    pub fn fan_power(&self, channel: usize) -> Result<u8, DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        Ok(self.exchange.lock().pwm[channel])
    }

    /// 发现派生的风扇标签（如 `"fan1 3pin"`），无交换
    pub fn fan_label(&self, channel: usize) -> Result<&str, DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        Ok(self.topology.fan_label(channel))
    }

    /// 发现派生的温度标签（如 `"temp1 connected"`），无交换
    pub fn temp_label(&self, channel: usize) -> Result<&str, DriverError> {
        if channel >= TEMP_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("temp channel", channel));
        }
        Ok(self.topology.temp_label(channel))
    }

    /// 读取风扇启用开关（纯内存状态，默认启用）
    pub fn fan_enable(&self, channel: usize) -> Result<bool, DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        Ok(self.exchange.lock().fan_enable[channel])
    }

    /// 设置风扇启用开关，只接受 0/1
    ///
    /// 禁用后 `fan_rpm` 返回 `NoData` 且不发起交换。
    /// 与存在性无关：缺席的风扇也可以单独禁用。
    pub fn set_fan_enable(&self, channel: usize, value: u32) -> Result<(), DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        let enabled = match value {
            0 => false,
            1 => true,
            other => return Err(DriverError::bad_value("fan enable", other)),
        };
        self.exchange.lock().fan_enable[channel] = enabled;
        Ok(())
    }

    /// 读取 pwm_enable 缓存（默认 0）
    pub fn pwm_enable(&self, channel: usize) -> Result<u8, DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        Ok(self.exchange.lock().pwm_enable[channel])
    }

    /// 设置 pwm_enable 缓存，只接受 0/1
    ///
    /// 自动模式（值 2）需要协议未公开的命令，不支持；
    /// 这是一个纯内存标志，不发起交换。
    pub fn set_pwm_enable(&self, channel: usize, value: u32) -> Result<(), DriverError> {
        if channel >= FAN_CHANNEL_COUNT {
            return Err(DriverError::bad_channel("fan channel", channel));
        }
        if value > 1 {
            return Err(DriverError::bad_value("pwm enable", value));
        }
        self.exchange.lock().pwm_enable[channel] = value as u8;
        Ok(())
    }

    /// 可见性查询：监控前端用它决定暴露哪些属性
    pub fn visibility(&self, kind: SensorKind, attr: Attribute, channel: usize) -> Access {
        visibility(&self.topology, kind, attr, channel)
    }
}
