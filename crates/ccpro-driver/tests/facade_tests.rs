//! 传感器门面集成测试
//!
//! 使用 MockTransport 验证门面操作的编码、换算、存在性/启用门控
//! 和错误分类。每个测试关注的不变量在断言旁注明。

use ccpro_driver::{Access, Attribute, CommanderPro, DriverError, SensorKind};
use ccpro_usb::{MockTransport, TransportError};

/// 脚本化两条发现响应（温度在前，风扇在后）
fn script_discovery(mock: &MockTransport, temp_codes: [u8; 4], fan_codes: [u8; 6]) {
    let mut temp_reply = vec![0x00];
    temp_reply.extend_from_slice(&temp_codes);
    mock.push_reply(&temp_reply);

    let mut fan_reply = vec![0x00];
    fan_reply.extend_from_slice(&fan_codes);
    mock.push_reply(&fan_reply);
}

fn all_connected(mock: &MockTransport) -> CommanderPro<MockTransport> {
    script_discovery(mock, [1, 1, 1, 1], [1, 1, 1, 1, 1, 1]);
    CommanderPro::new(mock.clone()).expect("discovery should succeed")
}

#[test]
fn test_discovery_end_to_end_scenario() {
    // 风扇连接性负载 [1,1,0,2,0,0]：
    // 通道 0,1 = 3-pin，2 = 未连接，3 = 4-pin，4,5 = 未连接
    let mock = MockTransport::new();
    script_discovery(&mock, [1, 1, 1, 1], [1, 1, 0, 2, 0, 0]);
    let ccp = CommanderPro::new(mock.clone()).unwrap();

    let expected_labels = [
        "fan1 3pin", "fan2 3pin", "fan3 nc", "fan4 4pin", "fan5 nc", "fan6 nc",
    ];
    let expected_presence = [true, true, false, true, false, false];
    for ch in 0..6 {
        assert_eq!(ccp.fan_label(ch).unwrap(), expected_labels[ch]);
        assert_eq!(ccp.topology().fan_present(ch), expected_presence[ch]);
    }
}

#[test]
fn test_temperature_is_ten_times_raw() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    // 原始负载 0x0019 = 25 整数度 → 250（十分之一度）
    mock.push_reply(&[0x00, 0x00, 0x19]);
    assert_eq!(ccp.temperature(2).unwrap(), 250);

    // 发出的命令帧：opcode 0x11，byte 1 = 通道号
    let exchanges = mock.exchanges();
    let last = exchanges.last().unwrap();
    assert_eq!(last.sent[0], 0x11);
    assert_eq!(last.sent[1], 2);
}

#[test]
fn test_absent_temp_channel_yields_nodata_without_transaction() {
    let mock = MockTransport::new();
    script_discovery(&mock, [1, 0, 1, 1], [1, 1, 1, 1, 1, 1]);
    let ccp = CommanderPro::new(mock.clone()).unwrap();

    assert!(matches!(ccp.temperature(1), Err(DriverError::NoData)));
    // 零传输调用：发现之外没有任何交换
    assert_eq!(mock.transaction_count(), 2);
}

#[test]
fn test_disabled_fan_yields_nodata_without_transaction() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    ccp.set_fan_enable(3, 0).unwrap();
    assert!(matches!(ccp.fan_rpm(3), Err(DriverError::NoData)));
    assert_eq!(mock.transaction_count(), 2);

    // 重新启用后恢复正常读取
    ccp.set_fan_enable(3, 1).unwrap();
    mock.push_reply(&[0x00, 0x03, 0xE8]);
    assert_eq!(ccp.fan_rpm(3).unwrap(), 1000);
}

#[test]
fn test_rpm_gated_by_enable_not_presence() {
    // 未连接但启用的风扇仍然发起读取（门控是启用开关，不是存在性）
    let mock = MockTransport::new();
    script_discovery(&mock, [1, 1, 1, 1], [0, 0, 0, 0, 0, 0]);
    let ccp = CommanderPro::new(mock.clone()).unwrap();

    mock.push_reply(&[0x00, 0x00, 0x00]);
    assert_eq!(ccp.fan_rpm(0).unwrap(), 0);
    assert_eq!(mock.transaction_count(), 3);
}

#[test]
fn test_out_of_range_indices_rejected_before_any_transaction() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    assert!(matches!(
        ccp.temperature(4),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ccp.fan_rpm(6),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ccp.voltage(3),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ccp.set_fan_power(6, 0),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ccp.fan_power(6),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ccp.fan_label(6),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert!(matches!(
        ccp.temp_label(4),
        Err(DriverError::InvalidArgument { .. })
    ));

    // 越界索引绝不转发到设备
    assert_eq!(mock.transaction_count(), 2);
}

#[test]
fn test_pwm_value_over_255_rejected_before_conversion() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    assert!(matches!(
        ccp.set_fan_power(0, 256),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert_eq!(mock.transaction_count(), 2);
    // 缓存未被污染
    assert_eq!(ccp.fan_power(0).unwrap(), 0);
}

#[test]
fn test_set_fan_power_converts_with_rounding() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    // 128 → round(128*100/255) = 50
    ccp.set_fan_power(2, 128).unwrap();
    let last = mock.exchanges().last().unwrap().clone();
    assert_eq!(last.sent[0], 0x23);
    assert_eq!(last.sent[1], 2);
    assert_eq!(last.sent[2], 50);

    // 端点：255 → 100，0 → 0
    ccp.set_fan_power(2, 255).unwrap();
    assert_eq!(mock.exchanges().last().unwrap().sent[2], 100);
    ccp.set_fan_power(2, 0).unwrap();
    assert_eq!(mock.exchanges().last().unwrap().sent[2], 0);
}

#[test]
fn test_pwm_cache_roundtrip_exact() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    // 缓存记录换算前的 0-255 原值
    for ch in 0..6 {
        let value = (ch as u32) * 40 + 13;
        ccp.set_fan_power(ch, value).unwrap();
        assert_eq!(ccp.fan_power(ch).unwrap() as u32, value);
    }
}

#[test]
fn test_pwm_cache_updated_even_when_transport_fails() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    mock.push_receive_error();
    assert!(ccp.set_fan_power(1, 77).is_err());
    // 回读仍返回写入值：缓存回读不依赖传输结果
    assert_eq!(ccp.fan_power(1).unwrap(), 77);
}

#[test]
fn test_fan_power_read_performs_no_transaction() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    // 默认值 0（从未写过），无读回命令
    assert_eq!(ccp.fan_power(4).unwrap(), 0);
    assert_eq!(mock.transaction_count(), 2);
}

#[test]
fn test_fan_rpm_raw_value() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    mock.push_reply(&[0x00, 0x04, 0xD2]);
    assert_eq!(ccp.fan_rpm(0).unwrap(), 1234);
}

#[test]
fn test_voltage_raw_millivolts() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    // 12V 轨：12000 mV = 0x2EE0
    mock.push_reply(&[0x00, 0x2E, 0xE0]);
    assert_eq!(ccp.voltage(0).unwrap(), 12000);

    let last = mock.exchanges().last().unwrap().clone();
    assert_eq!(last.sent[0], 0x12);
    assert_eq!(last.sent[1], 0);
}

#[test]
fn test_device_reported_error_discards_payload() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    // 状态非零：负载必须丢弃，错误类别与传输错误区分
    mock.push_reply(&[0x02, 0x12, 0x34]);
    match ccp.temperature(0) {
        Err(DriverError::DeviceStatus { status }) => assert_eq!(status, 0x02),
        other => panic!("Expected DeviceStatus, got {:?}", other),
    }
}

#[test]
fn test_transport_errors_propagated_verbatim() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    mock.push_receive_error();
    match ccp.fan_rpm(0) {
        Err(DriverError::Transport(TransportError::ReceiveFailed(_))) => {},
        other => panic!("Expected ReceiveFailed, got {:?}", other),
    }

    mock.push_send_error();
    match ccp.fan_rpm(0) {
        Err(DriverError::Transport(TransportError::SendFailed(_))) => {},
        other => panic!("Expected SendFailed, got {:?}", other),
    }
}

#[test]
fn test_fan_enable_accepts_only_boolean_values() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    assert!(ccp.fan_enable(0).unwrap()); // 默认启用
    ccp.set_fan_enable(0, 0).unwrap();
    assert!(!ccp.fan_enable(0).unwrap());
    ccp.set_fan_enable(0, 1).unwrap();
    assert!(ccp.fan_enable(0).unwrap());

    assert!(matches!(
        ccp.set_fan_enable(0, 2),
        Err(DriverError::InvalidArgument { .. })
    ));
    // 启用开关是纯内存状态
    assert_eq!(mock.transaction_count(), 2);
}

#[test]
fn test_pwm_enable_cached_flag() {
    let mock = MockTransport::new();
    let ccp = all_connected(&mock);

    assert_eq!(ccp.pwm_enable(0).unwrap(), 0);
    ccp.set_pwm_enable(0, 1).unwrap();
    assert_eq!(ccp.pwm_enable(0).unwrap(), 1);
    // 自动模式不支持
    assert!(matches!(
        ccp.set_pwm_enable(0, 2),
        Err(DriverError::InvalidArgument { .. })
    ));
    assert_eq!(mock.transaction_count(), 2);
}

#[test]
fn test_labels_read_from_cache() {
    let mock = MockTransport::new();
    script_discovery(&mock, [1, 0, 1, 0], [1, 1, 0, 2, 0, 0]);
    let ccp = CommanderPro::new(mock.clone()).unwrap();

    assert_eq!(ccp.temp_label(0).unwrap(), "temp1 connected");
    assert_eq!(ccp.temp_label(1).unwrap(), "temp2 nc");
    assert_eq!(ccp.fan_label(3).unwrap(), "fan4 4pin");
    // 标签来自发现缓存，不发起交换
    assert_eq!(mock.transaction_count(), 2);
}

#[test]
fn test_unknown_connector_codes_present_with_other_label() {
    let mock = MockTransport::new();
    script_discovery(&mock, [1, 1, 1, 1], [1, 7, 0, 0, 0, 0]);
    let ccp = CommanderPro::new(mock.clone()).unwrap();

    // 未记录的连接码：按存在处理，标签为 "other"，不报错
    assert!(ccp.topology().fan_present(1));
    assert_eq!(ccp.fan_label(1).unwrap(), "fan2 other");
}

#[test]
fn test_visibility_through_handle() {
    let mock = MockTransport::new();
    script_discovery(&mock, [1, 0, 1, 1], [1, 1, 0, 2, 0, 0]);
    let ccp = CommanderPro::new(mock.clone()).unwrap();

    assert_eq!(
        ccp.visibility(SensorKind::Temp, Attribute::Input, 0),
        Access::ReadOnly
    );
    assert_eq!(
        ccp.visibility(SensorKind::Temp, Attribute::Input, 1),
        Access::None
    );
    assert_eq!(
        ccp.visibility(SensorKind::Fan, Attribute::Input, 2),
        Access::None
    );
    assert_eq!(
        ccp.visibility(SensorKind::Fan, Attribute::Label, 2),
        Access::ReadOnly
    );
    assert_eq!(
        ccp.visibility(SensorKind::Pwm, Attribute::Input, 5),
        Access::ReadWrite
    );
    assert_eq!(
        ccp.visibility(SensorKind::Voltage, Attribute::Input, 2),
        Access::ReadOnly
    );
}
