//! Instrument Cluster Firmware: Main Entry Point
//!
//! Hexagonal architecture: one sequential control loop plus the toggle ISR.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ClusterHardware        Hd44780            LogEventSink        │
//! │  (ADC·PCNT·timer·LED)   (DisplayPort)      (EventSink)         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ClusterService (pure logic)               │    │
//! │  │  ADC sample · speed · fuel timer · thresholds · render │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  toggle ISR ──▶ SYSTEM_TOGGLE (AtomicBool) ──▶ supervisor loop │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Delay, FreeRtos};
use log::info;

use cluster::adapters::hardware::ClusterHardware;
use cluster::adapters::log_sink::LogEventSink;
use cluster::app::service::ClusterService;
use cluster::config::ClusterConfig;
use cluster::drivers::hw_init::{self, GpioOut};
use cluster::drivers::lcd::Hd44780;
use cluster::pins;
use cluster::toggle::SYSTEM_TOGGLE;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Cluster v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals + domain service ───────────────────────
    let config = ClusterConfig::default();
    let idle_poll_ms = config.idle_poll_ms;
    let mut app = match boot(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("boot failed ({}), halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── 3. Adapters ───────────────────────────────────────────
    let mut hw = ClusterHardware::new(app.config().timer_tick_us);
    let [d4, d5, d6, d7] = pins::LCD_DATA_GPIOS;
    let mut lcd = Hd44780::new(
        GpioOut(pins::LCD_RS_GPIO),
        GpioOut(pins::LCD_EN_GPIO),
        [GpioOut(d4), GpioOut(d5), GpioOut(d6), GpioOut(d7)],
        Delay::new_default(),
    );
    let mut delay = Delay::new_default();
    let mut sink = LogEventSink::new();

    app.start(&mut hw, &mut lcd, &mut sink);
    info!("System ready. Waiting for toggle (GPIO{}).", pins::TOGGLE_GPIO);

    // ── 4. Supervisor loop ────────────────────────────────────
    loop {
        if SYSTEM_TOGGLE.is_on() {
            app.run_while_on(&SYSTEM_TOGGLE, &mut hw, &mut lcd, &mut delay, &mut sink);
        }
        FreeRtos::delay_ms(idle_poll_ms);
    }
}

/// Bring up the peripherals and validate the configuration.  A missing
/// toggle ISR is not fatal: the cluster stays stopped.
fn boot(config: ClusterConfig) -> cluster::error::Result<ClusterService> {
    hw_init::init_peripherals()?;
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed ({}), toggle input disabled", e);
    }
    Ok(ClusterService::new(config)?)
}
