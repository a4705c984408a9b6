use std::time::{Duration, Instant};

use crate::state::BridgeState;

// 状态上报间隔（5 秒）。
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// 限速状态上报：周期性输出当前使能状态与档位，不参与协议。
pub struct StatusReporter {
    interval: Duration,
    last_report: Option<Instant>,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::with_interval(REPORT_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_report: None,
        }
    }

    /// 间隔已到则输出一条状态日志并复位计时，否则不做任何事。
    pub fn tick(&mut self, state: &BridgeState) {
        if !self.due(Instant::now()) {
            return;
        }
        log::info!(
            "AC status: enabled={} power={} (~{:.1}kW), {} frames sent",
            state.enabled,
            state.power.as_str(),
            state.power.kilowatts(),
            state.frames_sent
        );
        if let Some(frame) = state.last_frame {
            log::debug!(
                "last frame: id={:02X} cmd={:02X} power={:02X} cksum={:02X}",
                frame.id,
                frame.data[0],
                frame.data[1],
                frame.checksum
            );
        }
    }

    /// 判断是否到达上报时刻；到达时顺带复位计时。
    fn due(&mut self, now: Instant) -> bool {
        match self.last_report {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_report = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_due() {
        let mut reporter = StatusReporter::new();
        assert!(reporter.due(Instant::now()));
    }

    #[test]
    fn tick_within_interval_is_suppressed() {
        let mut reporter = StatusReporter::with_interval(Duration::from_secs(5));
        let start = Instant::now();
        assert!(reporter.due(start));
        assert!(!reporter.due(start + Duration::from_secs(1)));
        assert!(!reporter.due(start + Duration::from_millis(4_999)));
    }

    #[test]
    fn tick_after_interval_resets_timer() {
        let mut reporter = StatusReporter::with_interval(Duration::from_secs(5));
        let start = Instant::now();
        assert!(reporter.due(start));
        assert!(reporter.due(start + Duration::from_secs(5)));
        // 计时已复位，再过 1 秒仍不触发
        assert!(!reporter.due(start + Duration::from_secs(6)));
    }
}
