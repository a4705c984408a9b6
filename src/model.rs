/// 压缩机指令（开机/关机）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressorCommand {
    On,
    Off,
}

impl CompressorCommand {
    /// 指令在总线上的命令字节。
    pub fn byte(&self) -> u8 {
        match self {
            CompressorCommand::On => 0xB3,
            CompressorCommand::Off => 0xB2,
        }
    }
}

/// 压缩机功率档位（封闭集合，对应大致千瓦数）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerLevel {
    Off,
    Low,
    MediumLow,
    Medium,
    High,
}

impl PowerLevel {
    /// 档位在数据字节 1 上的取值。
    pub fn byte(&self) -> u8 {
        match self {
            PowerLevel::Off => 0x00,
            PowerLevel::Low => 0x05,
            PowerLevel::MediumLow => 0x0C,
            PowerLevel::Medium => 0x12,
            PowerLevel::High => 0x16,
        }
    }

    /// 档位对应的大致功率（千瓦）。
    pub fn kilowatts(&self) -> f32 {
        match self {
            PowerLevel::Off => 0.0,
            PowerLevel::Low => 1.0,
            PowerLevel::MediumLow => 1.5,
            PowerLevel::Medium => 2.0,
            PowerLevel::High => 3.0,
        }
    }

    /// 从原始字节解析档位；集合外的值一律拒绝，避免把非法字节推上总线。
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(PowerLevel::Off),
            0x05 => Some(PowerLevel::Low),
            0x0C => Some(PowerLevel::MediumLow),
            0x12 => Some(PowerLevel::Medium),
            0x16 => Some(PowerLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerLevel::Off => "off",
            PowerLevel::Low => "low",
            PowerLevel::MediumLow => "medium_low",
            PowerLevel::Medium => "medium",
            PowerLevel::High => "high",
        }
    }

    /// 按名称解析档位（编译期配置用）。
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(PowerLevel::Off),
            "low" => Some(PowerLevel::Low),
            "medium_low" => Some(PowerLevel::MediumLow),
            "medium" => Some(PowerLevel::Medium),
            "high" => Some(PowerLevel::High),
            _ => None,
        }
    }
}

impl Default for PowerLevel {
    /// 默认约 1.5kW 档（接收端的出厂缺省值）。
    fn default() -> Self {
        PowerLevel::MediumLow
    }
}

/// 桥接器运行参数（可配置项）。
#[derive(Clone, Debug)]
pub struct BridgeSettings {
    /// 控制循环轮询周期（毫秒）。快于帧间静默时多余的帧
    /// 会在投递处被丢弃，实际帧率由总线静默间隔限定。
    pub poll_period_ms: u32,
    /// 上电默认档位。
    pub default_power: PowerLevel,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            poll_period_ms: 250,
            default_power: PowerLevel::default(),
        }
    }
}
