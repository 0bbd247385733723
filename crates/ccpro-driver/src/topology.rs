//! 设备拓扑（发现结果缓存）
//!
//! 存放一次性拓扑发现的结果：每个风扇/温度通道的连接类型和标签。
//! 构造之后只读——连接性只在设备刚上电时采样才正确，会话中途
//! 不支持重新发现。电压轨没有存在标志，三条轨始终视为存在。

use ccpro_protocol::constants::{FAN_CHANNEL_COUNT, TEMP_CHANNEL_COUNT};
use ccpro_protocol::{FanConnector, FanInfo, TempConnector, TempInfo};

/// 发现结果（句柄生命周期内不变）
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) fans: [FanInfo; FAN_CHANNEL_COUNT],
    pub(crate) temps: [TempInfo; TEMP_CHANNEL_COUNT],
}

impl Topology {
    pub fn new(
        temps: [TempInfo; TEMP_CHANNEL_COUNT],
        fans: [FanInfo; FAN_CHANNEL_COUNT],
    ) -> Self {
        Self { fans, temps }
    }

    /// 风扇通道是否检测到硬件（`channel` 必须已验证 < 6）
    pub fn fan_present(&self, channel: usize) -> bool {
        self.fans[channel].connected()
    }

    /// 温度通道是否检测到硬件（`channel` 必须已验证 < 4）
    pub fn temp_present(&self, channel: usize) -> bool {
        self.temps[channel].connected()
    }

    pub fn fan_label(&self, channel: usize) -> &str {
        &self.fans[channel].label
    }

    pub fn temp_label(&self, channel: usize) -> &str {
        &self.temps[channel].label
    }

    pub fn fan_connector(&self, channel: usize) -> FanConnector {
        self.fans[channel].connector
    }

    pub fn temp_connector(&self, channel: usize) -> TempConnector {
        self.temps[channel].connector
    }
}
