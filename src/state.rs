use crate::model::PowerLevel;
use crate::proto::LinFrame;

/// 桥接器全局状态快照（供 LED 任务与诊断读取）。
pub struct BridgeState {
    pub enabled: bool,
    pub power: PowerLevel,
    pub frames_sent: u32,
    pub last_frame: Option<LinFrame>,
}

impl BridgeState {
    /// 上电初始状态：关机、使用给定档位。
    pub fn bootstrap(power: PowerLevel) -> Self {
        Self {
            enabled: false,
            power,
            frames_sent: 0,
            last_frame: None,
        }
    }

    /// 记录一次控制周期的结果。
    pub fn record_cycle(&mut self, enabled: bool, power: PowerLevel, frame: LinFrame) {
        self.enabled = enabled;
        self.power = power;
        self.frames_sent = self.frames_sent.wrapping_add(1);
        self.last_frame = Some(frame);
    }
}
