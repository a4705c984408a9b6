// 模块划分：协议编码、时序、总线驱动、控制器与状态显示
mod controller;
mod lin_bus;
mod model;
mod proto;
mod report;
mod smart_led;
mod state;
mod timing;

use std::sync::{mpsc, Arc, Mutex};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::prelude::*;
use esp_idf_hal::uart;

use controller::CompressorController;
use lin_bus::LinBusDriver;
use model::{BridgeSettings, PowerLevel};
use report::StatusReporter;
use timing::LinTiming;

fn main() {
    // ESP-IDF 运行时初始化（链接补丁 & 日志）
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("LeafAC bridge booting (ESP-IDF)...");

    // 外设初始化：UART + GPIO + RMT
    let peripherals = Peripherals::take().unwrap();
    let pins = peripherals.pins;
    let rmt_channel = peripherals.rmt.channel0;

    let settings = BridgeSettings::default();
    let lin_timing = LinTiming::leaf_default();

    // LIN 物理层 8N1，19200 波特
    let uart_config = uart::config::Config::new()
        .baudrate(Hertz(lin_timing.baudrate))
        .data_bits(uart::config::DataBits::DataBits8)
        .parity_none()
        .stop_bits(uart::config::StopBits::STOP1);
    let uart = uart::UartDriver::new(
        peripherals.uart1,
        pins.gpio17, // LIN TX
        pins.gpio18, // RX 未使用（单主写出，无应答通道）
        AnyInputPin::none(),
        AnyOutputPin::none(),
        &uart_config,
    )
    .unwrap();
    let (uart_tx, _uart_rx) = uart.into_split();

    // 使能输入：上拉，高电平 = 压缩机开
    let mut enable_input = PinDriver::input(pins.gpio4).unwrap();
    enable_input.set_pull(Pull::Up).unwrap();

    // 可选：编译期配置默认档位
    let mut ctrl = CompressorController::new(settings.default_power);
    if let Some(level) = option_env!("DEFAULT_POWER_LEVEL").and_then(parse_power_level) {
        log::info!("default power level from .env: {}", level.as_str());
        ctrl.set_power(level);
    }

    // 共享状态（LED 与诊断读取）
    let state = Arc::new(Mutex::new(state::BridgeState::bootstrap(ctrl.power())));
    smart_led::spawn_led_task(rmt_channel, pins.gpio48, state.clone());

    // 总线发送任务：break 线 gpio5、调试触发线 gpio6
    let bus = LinBusDriver::new(
        pins.gpio5.downgrade_output(),
        pins.gpio6.downgrade_output(),
        uart_tx,
        lin_timing,
    )
    .unwrap();
    // 容量 1 的同步通道：驱动忙时帧被丢弃而非排队，杜绝陈旧指令积压
    let (frame_tx, frame_rx) = mpsc::sync_channel(1);
    let _bus_handle = lin_bus::spawn_bus_task(bus, frame_rx);

    let mut reporter = StatusReporter::new();

    // 控制循环：每周期按使能输入构帧并交给发送任务
    loop {
        let enabled = enable_input.is_high();
        let frame = ctrl.update(enabled);
        if !lin_bus::offer_frame(&frame_tx, frame) {
            log::warn!("LIN bus task exited, stopping control loop");
            break;
        }
        if let Ok(mut state) = state.lock() {
            state.record_cycle(enabled, ctrl.power(), frame);
            reporter.tick(&state);
        }
        FreeRtos::delay_ms(settings.poll_period_ms);
    }

    // 正常情况下不可达；留给看门狗处置
    loop {
        FreeRtos::delay_ms(1000);
    }
}

/// 解析 .env 里的档位：档位名或原始字节值（十进制 / 0x 十六进制）。
fn parse_power_level(value: &str) -> Option<PowerLevel> {
    PowerLevel::from_name(value).or_else(|| {
        let raw = value
            .strip_prefix("0x")
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .or_else(|| value.parse::<u8>().ok())?;
        PowerLevel::from_byte(raw)
    })
}
