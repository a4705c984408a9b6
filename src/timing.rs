use crate::proto::FRAME_WIRE_LEN;

/// 总线时序参数（初始化时计算一次，此后只读）。
#[derive(Clone, Copy, Debug)]
pub struct LinTiming {
    /// 波特率（bit/s）。
    pub baudrate: u32,
    /// break 长度（bit 时间数，13 bit 低电平 + 1 bit 分隔）。
    pub break_bits: u32,
    /// break 拉高后的重同步保护间隔（微秒）。
    pub guard_micros: u32,
    /// 帧间最小静默时间（毫秒）。
    pub quiet_millis: u32,
}

impl LinTiming {
    /// 参考配置：19200 波特、14 bit break、50µs 保护、200ms 静默。
    pub fn leaf_default() -> Self {
        Self {
            baudrate: 19_200,
            break_bits: 14,
            guard_micros: 50,
            quiet_millis: 200,
        }
    }

    /// break 低电平持续时间（微秒），向下取整。
    pub fn break_micros(&self) -> u32 {
        self.break_bits * 1_000_000 / self.baudrate
    }

    /// sync + ID + 数据 + 校验和的传输时间（微秒），8N1 每字节 10 bit。
    pub fn frame_micros(&self) -> u32 {
        let bytes = (1 + FRAME_WIRE_LEN) as u32;
        bytes * 10 * 1_000_000 / self.baudrate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_break_duration() {
        // 14 bit @ 19200 波特 = 729.16µs，向下取整为 729
        let timing = LinTiming::leaf_default();
        assert_eq!(timing.break_micros(), 729);
    }

    #[test]
    fn break_duration_floor_rounding() {
        let timing = LinTiming {
            baudrate: 9_600,
            break_bits: 13,
            guard_micros: 50,
            quiet_millis: 200,
        };
        // 13 * 1e6 / 9600 = 1354.16 -> 1354
        assert_eq!(timing.break_micros(), 1354);
    }

    #[test]
    fn reference_guard_and_quiet_intervals() {
        // 两次发送的最小间距 = 帧传输时间 + 200ms 静默
        let timing = LinTiming::leaf_default();
        assert_eq!(timing.guard_micros, 50);
        assert_eq!(timing.quiet_millis, 200);
    }

    #[test]
    fn frame_duration_covers_eleven_bytes() {
        // sync + ID + 8 数据 + 校验和 = 11 字节，各 10 bit
        let timing = LinTiming::leaf_default();
        assert_eq!(timing.frame_micros(), 11 * 10 * 1_000_000 / 19_200);
    }
}
