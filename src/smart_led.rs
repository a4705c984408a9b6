use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::rmt::{config::TransmitConfig, FixedLengthSignal, PinState, Pulse, TxRmtDriver};
use esp_idf_hal::sys::EspError;
use esp_idf_hal::{peripheral::Peripheral, rmt::RmtChannel};
use smart_leds::{SmartLedsWrite, RGB8};

use crate::model::PowerLevel;
use crate::state::BridgeState;

// 亮度缩放（约 30%）。
const BRIGHTNESS_SCALE: u8 = 77;

/// WS2812 智能灯封装（通过 RMT 发送）。
pub struct SmartLed<'d> {
    tx: TxRmtDriver<'d>,
}

impl<'d> SmartLed<'d> {
    /// 初始化 RMT 发送器。
    pub fn new<C, P, Ch, Pin>(channel: C, pin: P) -> Result<Self, EspError>
    where
        C: Peripheral<P = Ch> + 'd,
        P: Peripheral<P = Pin> + 'd,
        Ch: RmtChannel,
        Pin: OutputPin,
    {
        let config = TransmitConfig::new().clock_divider(1);
        let tx = TxRmtDriver::new(channel, pin, &config)?;
        Ok(Self { tx })
    }

    /// 设置单色显示。
    pub fn set_color(&mut self, color: RGB8) -> Result<(), EspError> {
        self.write([color].into_iter())
    }

    /// 亮度缩放，降低刺眼程度。
    fn apply_brightness(color: RGB8) -> RGB8 {
        let scale = BRIGHTNESS_SCALE as u16;
        let apply = |v| ((v as u16 * scale) / 255) as u8;
        RGB8 {
            r: apply(color.r),
            g: apply(color.g),
            b: apply(color.b),
        }
    }

    /// 生成 GRB 24bit 脉冲序列。
    fn render_signal(&self, color: RGB8) -> Result<FixedLengthSignal<24>, EspError> {
        let color = Self::apply_brightness(color);
        let grb: u32 = ((color.g as u32) << 16) | ((color.r as u32) << 8) | color.b as u32;
        let ticks_hz = self.tx.counter_clock()?;
        let (t0h, t0l, t1h, t1l) = (
            Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(350))?,
            Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(800))?,
            Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(700))?,
            Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(600))?,
        );
        let mut signal = FixedLengthSignal::<24>::new();
        for i in (0..24).rev() {
            let bit = (grb & (1 << i)) != 0;
            let (hi, lo) = if bit { (t1h, t1l) } else { (t0h, t0l) };
            signal.set(23 - i as usize, &(hi, lo))?;
        }
        Ok(signal)
    }
}

impl SmartLedsWrite for SmartLed<'_> {
    type Color = RGB8;
    type Error = EspError;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut iter = iterator.into_iter();
        let color = iter.next().map(Into::into).unwrap_or(RGB8::default());
        let signal = self.render_signal(color)?;
        self.tx.start_blocking(&signal)?;
        Ok(())
    }
}

/// 启动灯带任务：颜色反映压缩机使能状态与档位。
pub fn spawn_led_task<C, P, Ch, Pin>(channel: C, pin: P, state: Arc<Mutex<BridgeState>>)
where
    C: Peripheral<P = Ch> + Send + 'static,
    P: Peripheral<P = Pin> + Send + 'static,
    Ch: RmtChannel + Send + 'static,
    Pin: OutputPin + Send + 'static,
{
    thread::spawn(move || {
        let mut led = match SmartLed::new(channel, pin) {
            Ok(led) => led,
            Err(err) => {
                log::warn!("Smart LED init failed: {:?}", err);
                return;
            }
        };
        let _ = led.set_color(RGB8::default());
        let mut shown: Option<RGB8> = None;
        loop {
            let next = state
                .lock()
                .map(|state| bridge_color(state.enabled, state.power))
                .unwrap_or_default();
            // 颜色变化时才重新发送，避免无谓的 RMT 刷新
            if shown != Some(next) {
                if let Err(err) = led.set_color(next) {
                    log::warn!("Smart LED update failed: {:?}", err);
                }
                shown = Some(next);
            }
            thread::sleep(Duration::from_millis(250));
        }
    });
}

/// 将压缩机状态映射到 LED 颜色（关机为暗蓝待机色）。
fn bridge_color(enabled: bool, power: PowerLevel) -> RGB8 {
    if !enabled {
        return RGB8 { r: 0, g: 0, b: 32 };
    }
    match power {
        PowerLevel::Off => RGB8 { r: 0, g: 0, b: 32 },
        PowerLevel::Low => RGB8 { r: 0, g: 255, b: 0 },
        PowerLevel::MediumLow => RGB8 { r: 0, g: 255, b: 255 },
        PowerLevel::Medium => RGB8 { r: 255, g: 255, b: 0 },
        PowerLevel::High => RGB8 { r: 255, g: 0, b: 0 },
    }
}
