//! # Commander Pro CLI
//!
//! Commander Pro 监控命令行工具。
//!
//! ```bash
//! # 列出所有已连接的设备
//! ccpro-cli scan
//!
//! # 打印全部传感器状态（表格或 JSON）
//! ccpro-cli status
//! ccpro-cli status --json
//!
//! # 单项读取 / 风扇控制
//! ccpro-cli read temp 0
//! ccpro-cli set-fan 2 128
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

mod config;
mod status;

use ccpro_driver::CommanderPro;
use ccpro_usb::UsbTransport;
use config::CliConfig;

/// Commander Pro 命令行工具
#[derive(Parser, Debug)]
#[command(name = "ccpro-cli")]
#[command(about = "Command-line tool for the Corsair Commander Pro", long_about = None)]
#[command(version)]
struct Cli {
    /// 目标设备序列号（覆盖配置文件）
    #[arg(short, long, global = true)]
    serial: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出所有已连接的 Commander Pro 设备
    Scan,

    /// 打印全部传感器状态
    Status {
        /// 以 JSON 输出（用于脚本）
        #[arg(long)]
        json: bool,
    },

    /// 读取单个传感器
    Read {
        /// 传感器类别
        sensor: Sensor,

        /// 通道号（temp 0-3，fan 0-5，volt 0-2）
        channel: usize,
    },

    /// 设置风扇固定功率（0-255）
    SetFan {
        /// 风扇通道（0-5）
        channel: usize,

        /// PWM 值（0-255，发往设备前换算为 0-100）
        value: u32,
    },

    /// 启用/禁用风扇通道的转速读取
    FanEnable {
        /// 风扇通道（0-5）
        channel: usize,

        /// 1 = 启用，0 = 禁用
        value: u32,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Sensor {
    Temp,
    Fan,
    Volt,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 默认设备序列号
        #[arg(long)]
        serial: Option<String>,

        /// 默认日志指令（如 ccpro_driver=debug）
        #[arg(long)]
        log: Option<String>,
    },

    /// 打印当前配置
    Get,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load().unwrap_or_default();

    // 初始化日志：RUST_LOG > 配置文件 > 默认 info
    let default_directive = config.log.clone().unwrap_or_else(|| "ccpro_cli=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse().context("Invalid log directive")?),
        )
        .init();

    let serial = cli.serial.or(config.serial);

    match cli.command {
        Commands::Scan => scan(),
        Commands::Status { json } => {
            let device = open_device(serial.as_deref())?;
            if json {
                status::print_json(&device)
            } else {
                status::print_table(&device)
            }
        },
        Commands::Read { sensor, channel } => {
            let device = open_device(serial.as_deref())?;
            read_one(&device, sensor, channel)
        },
        Commands::SetFan { channel, value } => {
            let device = open_device(serial.as_deref())?;
            device.set_fan_power(channel, value)?;
            println!("fan{} power set to {}", channel + 1, value);
            Ok(())
        },
        Commands::FanEnable { channel, value } => {
            let device = open_device(serial.as_deref())?;
            device.set_fan_enable(channel, value)?;
            println!("fan{} {}", channel + 1, if value == 1 { "enabled" } else { "disabled" });
            Ok(())
        },
        Commands::Config(cmd) => run_config(cmd),
    }
}

/// 打开设备并完成拓扑发现
fn open_device(serial: Option<&str>) -> Result<CommanderPro<UsbTransport>> {
    tracing::debug!("Opening Commander Pro (serial filter: {:?})", serial);
    CommanderPro::open(serial).context("Failed to open a Commander Pro device")
}

fn scan() -> Result<()> {
    let devices = UsbTransport::scan()?;
    if devices.is_empty() {
        println!("No Commander Pro devices found");
        return Ok(());
    }
    for (index, device) in devices.iter().enumerate() {
        match device.serial_number() {
            Some(serial) => println!("#{index}: serial {serial}"),
            None => println!("#{index}: (no serial number)"),
        }
    }
    Ok(())
}

fn read_one(device: &CommanderPro<UsbTransport>, sensor: Sensor, channel: usize) -> Result<()> {
    match sensor {
        Sensor::Temp => {
            let deci = device.temperature(channel)?;
            println!("{:.1} °C", deci as f64 / 10.0);
        },
        Sensor::Fan => {
            let rpm = device.fan_rpm(channel)?;
            println!("{rpm} RPM");
        },
        Sensor::Volt => {
            let mv = device.voltage(channel)?;
            println!("{:.3} V", mv as f64 / 1000.0);
        },
    }
    Ok(())
}

fn run_config(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Set { serial, log } => {
            if serial.is_none() && log.is_none() {
                bail!("Nothing to set: pass --serial and/or --log");
            }
            let mut config = CliConfig::load()?;
            if let Some(serial) = serial {
                println!("default serial: {serial}");
                config.serial = Some(serial);
            }
            if let Some(log) = log {
                println!("default log directive: {log}");
                config.log = Some(log);
            }
            config.save()
        },
        ConfigCommand::Get => {
            let config = CliConfig::load()?;
            println!("serial = {}", config.serial.as_deref().unwrap_or("(unset)"));
            println!("log    = {}", config.log.as_deref().unwrap_or("(unset)"));
            Ok(())
        },
    }
}
