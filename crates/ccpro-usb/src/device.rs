//! rusb 后端设备操作
//!
//! 提供 USB 设备扫描、接口准备、Bulk 数据传输等功能

use rusb::{DeviceHandle, GlobalContext};
use std::time::Duration;
use tracing::{trace, warn};

use ccpro_protocol::constants::{
    BULK_ENDPOINT_IN, BULK_ENDPOINT_OUT, IN_BUFFER_SIZE, OUT_BUFFER_SIZE,
    USB_PRODUCT_ID_COMMANDER_PRO, USB_VENDOR_ID_CORSAIR,
};

use crate::{Transport, TransportError};

/// 每个半程的 Bulk 传输超时
///
/// 设备固件忙碌时 USB 控制器会返回 NAK，超时是交换的唯一时间上界；
/// 超时后交换以 `SendFailed`/`ReceiveFailed` 失败，由调用方决定是否重试。
const BULK_TIMEOUT: Duration = Duration::from_millis(1000);

/// Commander Pro 的 rusb 传输后端
///
/// 持有已 claim 的 USB 接口和 Bulk IN/OUT 端点地址。
/// Drop 时释放接口（交还给操作系统），防止下次启动时
/// claim 失败（Access denied）。
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    interface_number: u8,
    endpoint_in: u8,
    endpoint_out: u8,
    /// 记录是否已经 claim 了接口（用于正确的资源清理）
    interface_claimed: bool,
    /// 设备序列号（用于设备识别）
    serial_number: Option<String>,
}

impl UsbTransport {
    /// 检查是否为 Commander Pro 设备
    fn is_commander_pro(vendor_id: u16, product_id: u16) -> bool {
        (vendor_id, product_id) == (USB_VENDOR_ID_CORSAIR, USB_PRODUCT_ID_COMMANDER_PRO)
    }

    /// 扫描所有 Commander Pro 设备
    pub fn scan() -> Result<Vec<UsbTransport>, TransportError> {
        Self::scan_with_filter(None)
    }

    /// 扫描所有 Commander Pro 设备，可选地按序列号过滤
    ///
    /// # 注意
    /// - 如果设备没有序列号（序列号索引为 0 或读取失败），序列号字段将为 `None`
    /// - 如果提供了 `serial_number_filter`，只有序列号匹配的设备会被返回
    /// - 序列号匹配是大小写敏感的
    pub fn scan_with_filter(
        serial_number_filter: Option<&str>,
    ) -> Result<Vec<UsbTransport>, TransportError> {
        let mut devices = Vec::new();

        for device in rusb::devices()?.iter() {
            let desc = match device.device_descriptor() {
                Ok(desc) => desc,
                Err(_) => continue,
            };

            if !Self::is_commander_pro(desc.vendor_id(), desc.product_id()) {
                continue;
            }

            let handle = match device.open() {
                Ok(handle) => handle,
                Err(e) => {
                    warn!("Failed to open matching device: {}", e);
                    continue;
                },
            };

            // 尝试读取序列号
            let serial_number = match desc.serial_number_string_index() {
                Some(idx) if idx != 0 => match handle.read_string_descriptor_ascii(idx) {
                    Ok(serial) => {
                        if let Some(filter) = serial_number_filter
                            && serial != filter
                        {
                            continue; // 序列号不匹配，跳过此设备
                        }
                        Some(serial)
                    },
                    Err(_) => {
                        // 读取序列号失败，但如果提供了过滤器，必须匹配，所以跳过
                        if serial_number_filter.is_some() {
                            continue;
                        }
                        None
                    },
                },
                _ => {
                    if serial_number_filter.is_some() {
                        continue;
                    }
                    None
                },
            };

            // 查找接口和端点
            let config_desc = match device.config_descriptor(0) {
                Ok(config) => config,
                Err(_) => continue,
            };

            let interface = match config_desc
                .interfaces()
                .next()
                .and_then(|iface| iface.descriptors().next())
            {
                Some(iface) => iface,
                None => continue,
            };

            let interface_number = interface.interface_number();

            // 查找 Bulk IN/OUT 端点；描述符里找不到时退回协议约定的固定地址
            let (endpoint_in, endpoint_out) = Self::find_bulk_endpoints(&interface)
                .unwrap_or((BULK_ENDPOINT_IN, BULK_ENDPOINT_OUT));

            devices.push(UsbTransport {
                handle,
                interface_number,
                endpoint_in,
                endpoint_out,
                interface_claimed: false,
                serial_number,
            });
        }

        Ok(devices)
    }

    /// 打开第一个匹配的设备并准备接口
    pub fn open_first(serial_number_filter: Option<&str>) -> Result<UsbTransport, TransportError> {
        let mut devices = Self::scan_with_filter(serial_number_filter)?;
        if devices.is_empty() {
            return Err(TransportError::DeviceNotFound);
        }
        let mut device = devices.remove(0);
        device.prepare_interface()?;
        Ok(device)
    }

    /// 获取设备序列号
    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    /// 查找 Bulk IN/OUT 端点
    fn find_bulk_endpoints(interface: &rusb::InterfaceDescriptor) -> Option<(u8, u8)> {
        let mut endpoint_in = None;
        let mut endpoint_out = None;

        for endpoint in interface.endpoint_descriptors() {
            if endpoint.transfer_type() == rusb::TransferType::Bulk
                || endpoint.transfer_type() == rusb::TransferType::Interrupt
            {
                let address = endpoint.address();
                if endpoint.direction() == rusb::Direction::In {
                    endpoint_in = Some(address);
                } else {
                    endpoint_out = Some(address);
                }
            }
        }

        match (endpoint_in, endpoint_out) {
            (Some(in_ep), Some(out_ep)) => Some((in_ep, out_ep)),
            _ => None,
        }
    }

    /// 准备接口（detach kernel driver 和 claim interface）
    pub fn prepare_interface(&mut self) -> Result<(), TransportError> {
        // 如果接口已经 claim 了，跳过（避免重复 claim）
        if self.interface_claimed {
            return Ok(());
        }

        // Detach kernel driver on Linux/macOS（在 claim 之前）
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            if self.handle.kernel_driver_active(self.interface_number).unwrap_or(false) {
                self.handle
                    .detach_kernel_driver(self.interface_number)
                    .map_err(TransportError::Usb)?;
            }
        }

        self.handle.claim_interface(self.interface_number).map_err(TransportError::Usb)?;
        self.interface_claimed = true;

        trace!(
            "Interface {} claimed (ep_in=0x{:02X}, ep_out=0x{:02X})",
            self.interface_number, self.endpoint_in, self.endpoint_out
        );
        Ok(())
    }

    /// 释放 USB 接口（交还给操作系统）
    pub fn release_interface(&mut self) {
        if self.interface_claimed {
            // 忽略错误：销毁过程中即使失败（例如设备已断开）也不应该 panic
            let _ = self.handle.release_interface(self.interface_number);
            self.interface_claimed = false;
            trace!("USB interface released");
        }
    }
}

impl Transport for UsbTransport {
    fn send(&mut self, frame: &[u8; OUT_BUFFER_SIZE]) -> Result<(), TransportError> {
        match self.handle.write_bulk(self.endpoint_out, frame, BULK_TIMEOUT) {
            Ok(_) => Ok(()),
            Err(rusb::Error::Timeout) => {
                // 超时后 endpoint 可能进入 STALL 状态，必须清除 halt
                // 才能恢复设备，否则后续交换会一直失败
                if let Err(clear_err) = self.handle.clear_halt(self.endpoint_out) {
                    warn!("Failed to clear OUT endpoint halt after timeout: {}", clear_err);
                }
                Err(TransportError::SendFailed(rusb::Error::Timeout))
            },
            Err(e) => Err(TransportError::SendFailed(e)),
        }
    }

    fn receive(&mut self, frame: &mut [u8; IN_BUFFER_SIZE]) -> Result<(), TransportError> {
        let len = match self.handle.read_bulk(self.endpoint_in, frame, BULK_TIMEOUT) {
            Ok(len) => len,
            Err(rusb::Error::Timeout) => {
                if let Err(clear_err) = self.handle.clear_halt(self.endpoint_in) {
                    warn!("Failed to clear IN endpoint halt after timeout: {}", clear_err);
                }
                return Err(TransportError::ReceiveFailed(rusb::Error::Timeout));
            },
            Err(e) => return Err(TransportError::ReceiveFailed(e)),
        };

        if len < IN_BUFFER_SIZE {
            return Err(TransportError::ShortResponse {
                expected: IN_BUFFER_SIZE,
                actual: len,
            });
        }

        Ok(())
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        self.release_interface();
    }
}
