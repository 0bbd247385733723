//! 状态输出（表格 / JSON）

use anyhow::Result;
use serde_json::json;

use ccpro_driver::{CommanderPro, DriverError};
use ccpro_protocol::constants::{FAN_CHANNEL_COUNT, RAIL_COUNT, TEMP_CHANNEL_COUNT};
use ccpro_usb::UsbTransport;

const RAIL_NAMES: [&str; RAIL_COUNT] = ["12V", "5V", "3.3V"];

/// 把读取结果折叠为 Option：NoData（未连接/已禁用）不算错误
fn reading<T>(result: Result<T, DriverError>) -> Result<Option<T>, DriverError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_no_data() => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn print_table(device: &CommanderPro<UsbTransport>) -> Result<()> {
    println!("{:<18} {:>10}", "sensor", "value");

    for channel in 0..TEMP_CHANNEL_COUNT {
        let label = device.temp_label(channel)?;
        match reading(device.temperature(channel))? {
            Some(deci) => println!("{:<18} {:>8.1} °C", label, deci as f64 / 10.0),
            None => println!("{:<18} {:>10}", label, "n/a"),
        }
    }

    for channel in 0..FAN_CHANNEL_COUNT {
        let label = device.fan_label(channel)?;
        match reading(device.fan_rpm(channel))? {
            Some(rpm) => println!("{:<18} {:>6} RPM", label, rpm),
            None => println!("{:<18} {:>10}", label, "n/a"),
        }
    }

    for rail in 0..RAIL_COUNT {
        let mv = device.voltage(rail)?;
        println!("{:<18} {:>8.3} V", RAIL_NAMES[rail], mv as f64 / 1000.0);
    }

    Ok(())
}

pub fn print_json(device: &CommanderPro<UsbTransport>) -> Result<()> {
    let mut temps = Vec::new();
    for channel in 0..TEMP_CHANNEL_COUNT {
        temps.push(json!({
            "label": device.temp_label(channel)?,
            "connected": device.topology().temp_present(channel),
            // 十分之一摄氏度；未连接为 null
            "deci_celsius": reading(device.temperature(channel))?,
        }));
    }

    let mut fans = Vec::new();
    for channel in 0..FAN_CHANNEL_COUNT {
        fans.push(json!({
            "label": device.fan_label(channel)?,
            "connected": device.topology().fan_present(channel),
            "enabled": device.fan_enable(channel)?,
            "rpm": reading(device.fan_rpm(channel))?,
            // 最近写入的 PWM 值（0-255），不是测量值
            "pwm": device.fan_power(channel)?,
        }));
    }

    let mut rails = Vec::new();
    for rail in 0..RAIL_COUNT {
        rails.push(json!({
            "label": RAIL_NAMES[rail],
            "millivolts": device.voltage(rail)?,
        }));
    }

    let doc = json!({ "temps": temps, "fans": fans, "rails": rails });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
