use crate::model::{CompressorCommand, PowerLevel};
use crate::proto::{build_frame, LinFrame};

/// 压缩机控制器：持有目标状态并在每个控制周期产出一帧。
///
/// 档位在关机期间保留，下一次开机沿用；控制器本身不做去重，
/// 帧率只受总线发送任务的帧间静默限制。
pub struct CompressorController {
    power: PowerLevel,
    last_frame: Option<LinFrame>,
}

impl CompressorController {
    pub fn new(power: PowerLevel) -> Self {
        Self {
            power,
            last_frame: None,
        }
    }

    /// 一个控制周期：按使能输入选择指令并构帧。
    ///
    /// 即使状态与上一周期相同也照常构帧发送（总线为单向广播，
    /// 接收端依赖周期性刷新）。
    pub fn update(&mut self, enabled: bool) -> LinFrame {
        let command = if enabled {
            CompressorCommand::On
        } else {
            CompressorCommand::Off
        };
        let frame = build_frame(command, self.power);
        self.last_frame = Some(frame);
        frame
    }

    /// 修改存储档位，不触发发送；下一次使能周期生效。
    pub fn set_power(&mut self, level: PowerLevel) {
        self.power = level;
    }

    pub fn power(&self) -> PowerLevel {
        self.power
    }

    /// 最近一次构出的帧（诊断用）。
    pub fn last_frame(&self) -> Option<&LinFrame> {
        self.last_frame.as_ref()
    }
}
