//! DewGuard Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  EspPulseLine    HeaterDriver    LogEventSink   NvsConfig    │
//! │  (PulseLine)     (HeaterPort)    (EventSink)    (ConfigPort) │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          HeaterService (pure logic)                │      │
//! │  │  DHT22 decode · dew point · PID · autotune         │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Holding the BOOT button during power-up schedules a relay-feedback
//! autotune session; it starts once the first valid ambient sample is in.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;

use dewguard::adapters::dht_line::EspPulseLine;
use dewguard::adapters::log_sink::LogEventSink;
use dewguard::adapters::nvs::NvsConfigStore;
use dewguard::adapters::time::MonotonicClock;
use dewguard::app::ports::ConfigPort;
use dewguard::app::service::HeaterService;
use dewguard::config::SystemConfig;
use dewguard::drivers::HeaterDriver;
use dewguard::sensors::Dht22;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("DewGuard v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsConfigStore::new() {
        Ok(store) => store.load().unwrap_or_else(|e| {
            warn!("config load failed ({e:?}), using defaults");
            SystemConfig::default()
        }),
        Err(e) => {
            warn!("NVS init failed ({e}), running with defaults and no persistence");
            SystemConfig::default()
        }
    };

    // ── 3. Wire up hardware adapters ──────────────────────────
    // Pin assignments per `dewguard::pins` (gpio4 = AMBIENT_GPIO,
    // gpio5 = HEATER_PWM_GPIO).
    let line = EspPulseLine::new(peripherals.pins.gpio4.downgrade())?;
    let mut dht = Dht22::new(line);

    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default().frequency(1.kHz().into()),
    )?;
    let pwm = LedcDriver::new(peripherals.ledc.channel0, timer, peripherals.pins.gpio5)?;
    let mut heater = HeaterDriver::new(pwm);

    // BOOT button held at power-up requests a calibration run.
    let boot_button = PinDriver::input(peripherals.pins.gpio0)?;
    let mut autotune_requested = boot_button.is_low();
    if autotune_requested {
        info!("BOOT held: autotune scheduled after sensor warm-up");
    }

    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();

    // ── 4. Control loop ───────────────────────────────────────
    let mut service = HeaterService::new(config);
    let interval_ms = service.config().control_interval_ms;
    service.start(clock.now_ms(), &mut sink);

    loop {
        let now_ms = clock.now_ms();
        service.tick(now_ms, &mut dht, &mut heater, &mut sink);

        // Kick off the requested calibration once a real sample arrived.
        if autotune_requested && dht.last_sample().valid {
            service.begin_autotune(clock.now_ms(), &mut sink);
            autotune_requested = false;
        }

        // While a tuning session is active the loop tightens to the relay
        // sampling cadence; no other control activity interleaves.
        if service.autotune_active() {
            FreeRtos::delay_ms(50);
        } else {
            FreeRtos::delay_ms(interval_ms);
        }
    }
}
