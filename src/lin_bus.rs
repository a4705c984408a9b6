use std::fmt::Write as _;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError};
use std::thread;

use esp_idf_hal::delay::{self, Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::UartTxDriver;

use crate::proto::{LinFrame, FRAME_WIRE_LEN, SYNC_BYTE};
use crate::timing::LinTiming;

/// LIN 单主发送驱动：自管 break 线、调试触发线与 UART 字节发送。
///
/// 总线无应答通道，发送方无法察觉线路卡死或接收端离线，
/// transmit 在字节交给硬件后即视为成功。
pub struct LinBusDriver<'d> {
    bus_pin: PinDriver<'d, AnyOutputPin, Output>,
    debug_pin: PinDriver<'d, AnyOutputPin, Output>,
    uart: UartTxDriver<'d>,
    timing: LinTiming,
}

impl<'d> LinBusDriver<'d> {
    /// 初始化驱动：break 线拉高进入空闲电平，调试线拉低。
    pub fn new(
        bus_pin: AnyOutputPin,
        debug_pin: AnyOutputPin,
        uart: UartTxDriver<'d>,
        timing: LinTiming,
    ) -> Result<Self, EspError> {
        let mut bus_pin = PinDriver::output(bus_pin)?;
        bus_pin.set_high()?;
        let mut debug_pin = PinDriver::output(debug_pin)?;
        debug_pin.set_low()?;
        log::info!(
            "LIN bus ready: {} baud, break {}us, frame {}us, quiet {}ms",
            timing.baudrate,
            timing.break_micros(),
            timing.frame_micros(),
            timing.quiet_millis
        );
        Ok(Self {
            bus_pin,
            debug_pin,
            uart,
            timing,
        })
    }

    /// 阻塞发送一帧：break、保护间隔、sync + 线上字节、帧间静默。
    pub fn transmit(&mut self, frame: &LinFrame) -> Result<(), EspError> {
        // 调试触发线覆盖 break 与字节发送全程，供示波器抓取
        self.debug_pin.set_high()?;

        // break：拉低一个 break 时长后释放
        self.bus_pin.set_low()?;
        Ets::delay_us(self.timing.break_micros());
        self.bus_pin.set_high()?;

        // 保护间隔，等待接收端位采样重新同步
        Ets::delay_us(self.timing.guard_micros());

        let mut bytes = [0u8; 1 + FRAME_WIRE_LEN];
        bytes[0] = SYNC_BYTE;
        bytes[1..].copy_from_slice(&frame.wire_bytes());
        self.uart.write(&bytes)?;
        self.uart.wait_done(delay::BLOCK)?;

        self.debug_pin.set_low()?;
        log_bytes("LIN TX:", &bytes);

        // 帧间最小静默，避免背靠背帧挤爆接收端的时序预算
        FreeRtos::delay_ms(self.timing.quiet_millis);
        Ok(())
    }
}

/// 启动总线发送任务：消费控制器产出的帧并逐帧发送。
///
/// 控制循环只向通道投递帧，不会被 break/静默的毫秒级延时卡住。
pub fn spawn_bus_task(
    mut driver: LinBusDriver<'static>,
    frame_rx: Receiver<LinFrame>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(frame) = frame_rx.recv() {
            if let Err(err) = driver.transmit(&frame) {
                log::warn!("LIN TX error: {:?}", err);
            }
        }
    })
}

/// 向发送任务投递一帧；驱动忙（break + 静默未结束）则丢弃本帧，
/// 下一控制周期会按当前状态重建，帧率由帧间静默自然限速。
/// 返回 false 表示发送任务已退出。
pub fn offer_frame(frame_tx: &SyncSender<LinFrame>, frame: LinFrame) -> bool {
    match frame_tx.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => true,
        Err(TrySendError::Disconnected(_)) => false,
    }
}

fn log_bytes(prefix: &str, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let mut line = String::with_capacity(prefix.len() + bytes.len() * 3);
    line.push_str(prefix);
    line.push(' ');
    for (idx, byte) in bytes.iter().enumerate() {
        if idx > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{:02X}", byte);
    }
    log::info!("{}", line);
}
