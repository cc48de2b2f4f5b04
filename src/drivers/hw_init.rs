//! One-shot hardware peripheral initialisation and register helpers.
//!
//! Configures GPIO directions, the PCNT unit used as the speed pulse
//! counter, the one-shot `esp_timer` used as the fuel timer, and the
//! toggle-switch ISR, using raw ESP-IDF sys calls.  Called once from
//! `main()` before the control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real registers.
//! On host/test: an in-memory board model fed through the `sim_*`
//! functions (converter sample, speed pulses, toggle presses).

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    PcntInitFailed(i32),
    TimerInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::PcntInitFailed(rc)   => write!(f, "PCNT unit init failed (rc={})", rc),
            Self::TimerInitFailed(rc)  => write!(f, "fuel timer create failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

/// Set by the fuel-timer callback when the one-shot period elapses.
/// Cleared only by the control loop.
static FUEL_TIMER_OVERFLOW: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_pcnt()?;
        init_fuel_timer()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let mut mask = 1u64 << pins::ADC_INTR_GPIO;
    for &pin in &pins::ADC_DATA_GPIOS {
        mask |= 1u64 << pin;
    }

    let cfg = gpio_config_t {
        pin_bit_mask: mask,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    let toggle_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::TOGGLE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&toggle_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: GPIO inputs configured (ADC bus, INTR, toggle)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host board model: INTR reports "done" immediately, the data bus carries
/// the injected sample, every other input idles high.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    if pin == pins::ADC_INTR_GPIO {
        return false;
    }
    match pins::ADC_DATA_GPIOS.iter().position(|&p| p == pin) {
        Some(bit) => (sim::ADC_SAMPLE.load(Ordering::Relaxed) >> bit) & 1 == 1,
        None => true,
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    // Idle levels: strobes high, LED off, LCD lines low.
    let output_pins = [
        (pins::ADC_WR_GPIO, 1),
        (pins::ADC_RD_GPIO, 1),
        (pins::OVER_TEMP_LED_GPIO, 0),
        (pins::LCD_RS_GPIO, 0),
        (pins::LCD_EN_GPIO, 0),
        (pins::LCD_DATA_GPIOS[0], 0),
        (pins::LCD_DATA_GPIOS[1], 0),
        (pins::LCD_DATA_GPIOS[2], 0),
        (pins::LCD_DATA_GPIOS[3], 0),
    ];

    for &(pin, level) in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            ..Default::default()
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, level) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    if pin == pins::OVER_TEMP_LED_GPIO {
        sim::LED.store(high, Ordering::Relaxed);
    }
}

/// `embedded-hal` output pin over a raw GPIO number, for drivers that are
/// generic over [`OutputPin`](embedded_hal::digital::OutputPin).
pub struct GpioOut(pub i32);

impl embedded_hal::digital::ErrorType for GpioOut {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for GpioOut {
    fn set_low(&mut self) -> Result<(), Infallible> {
        gpio_write(self.0, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        gpio_write(self.0, true);
        Ok(())
    }
}

// ── Pulse counter (PCNT) ──────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut PCNT_UNIT: pcnt_unit_handle_t = core::ptr::null_mut();

/// SAFETY: PCNT_UNIT is written once in `init_pcnt()` before the control
/// loop starts; afterwards only the main task reads it.
#[cfg(target_os = "espidf")]
unsafe fn pcnt_unit() -> pcnt_unit_handle_t { unsafe { PCNT_UNIT } }

#[cfg(target_os = "espidf")]
unsafe fn init_pcnt() -> Result<(), HwInitError> {
    // The hardware counter is 15 bits wide; with accumulation on, the
    // driver folds every high-limit crossing into a 32-bit software count.
    let mut unit_cfg = pcnt_unit_config_t {
        low_limit: -1,
        high_limit: i16::MAX as i32,
        ..Default::default()
    };
    unit_cfg.flags.set_accum_count(1);
    // SAFETY: PCNT_UNIT is only written here, once at boot.
    let ret = unsafe { pcnt_new_unit(&unit_cfg, &raw mut PCNT_UNIT) };
    if ret != ESP_OK as i32 { return Err(HwInitError::PcntInitFailed(ret)); }

    // Accumulation needs a watch point on the limit it folds at.
    let ret = unsafe { pcnt_unit_add_watch_point(pcnt_unit(), i16::MAX as i32) };
    if ret != ESP_OK as i32 { return Err(HwInitError::PcntInitFailed(ret)); }

    let chan_cfg = pcnt_chan_config_t {
        edge_gpio_num: pins::SPEED_PULSE_GPIO,
        level_gpio_num: -1,
        ..Default::default()
    };
    let mut chan: pcnt_channel_handle_t = core::ptr::null_mut();
    let ret = unsafe { pcnt_new_channel(pcnt_unit(), &chan_cfg, &mut chan) };
    if ret != ESP_OK as i32 { return Err(HwInitError::PcntInitFailed(ret)); }

    // Count rising edges only.
    let ret = unsafe {
        pcnt_channel_set_edge_action(
            chan,
            pcnt_channel_edge_action_t_PCNT_CHANNEL_EDGE_ACTION_INCREASE,
            pcnt_channel_edge_action_t_PCNT_CHANNEL_EDGE_ACTION_HOLD,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::PcntInitFailed(ret)); }

    let ret = unsafe { pcnt_unit_enable(pcnt_unit()) };
    if ret != ESP_OK as i32 { return Err(HwInitError::PcntInitFailed(ret)); }

    info!("hw_init: PCNT unit on GPIO{} ready (stopped)", pins::SPEED_PULSE_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn pcnt_clear() {
    // SAFETY: pcnt_unit() contract, main task only.
    unsafe { pcnt_unit_clear_count(pcnt_unit()); }
}

#[cfg(target_os = "espidf")]
pub fn pcnt_set_running(run: bool) {
    // SAFETY: pcnt_unit() contract, main task only. Starting a running
    // unit or stopping a stopped one returns ESP_ERR_INVALID_STATE, which
    // leaves the unit as requested.
    unsafe {
        if run {
            pcnt_unit_start(pcnt_unit());
        } else {
            pcnt_unit_stop(pcnt_unit());
        }
    }
}

/// Pulses since the last clear, wrapping at 16 bits like the counter
/// register it stands in for.
#[cfg(target_os = "espidf")]
pub fn pcnt_count() -> u16 {
    let mut count: i32 = 0;
    // SAFETY: pcnt_unit() contract, main task only.
    let ret = unsafe { pcnt_unit_get_count(pcnt_unit(), &mut count) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    count as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn pcnt_clear() {
    sim::PULSES.store(0, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn pcnt_set_running(run: bool) {
    sim::PCNT_RUNNING.store(run, Ordering::Relaxed);
}

/// Pulses since the last clear, wrapping at 16 bits.
#[cfg(not(target_os = "espidf"))]
pub fn pcnt_count() -> u16 {
    sim::PULSES.load(Ordering::Relaxed)
}

// ── Fuel timer (one-shot esp_timer) ───────────────────────────

#[cfg(target_os = "espidf")]
static mut FUEL_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: FUEL_TIMER is written once in `init_fuel_timer()` before the
/// control loop starts; afterwards only the main task reads it.
#[cfg(target_os = "espidf")]
unsafe fn fuel_timer() -> esp_timer_handle_t { unsafe { FUEL_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn fuel_timer_cb(_arg: *mut core::ffi::c_void) {
    FUEL_TIMER_OVERFLOW.store(true, Ordering::Release);
}

#[cfg(target_os = "espidf")]
unsafe fn init_fuel_timer() -> Result<(), HwInitError> {
    let args = esp_timer_create_args_t {
        callback: Some(fuel_timer_cb),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: b"fuel\0".as_ptr() as *const _,
        skip_unhandled_events: false,
    };
    // SAFETY: FUEL_TIMER is only written here, once at boot.
    let ret = unsafe { esp_timer_create(&args, &raw mut FUEL_TIMER) };
    if ret != ESP_OK { return Err(HwInitError::TimerInitFailed(ret)); }
    info!("hw_init: fuel timer created");
    Ok(())
}

/// (Re)start the one-shot period.  A pending overflow flag is left set,
/// as reloading a hardware timer does not clear its flag either.
#[cfg(target_os = "espidf")]
pub fn fuel_timer_start(period_us: u32) {
    // SAFETY: fuel_timer() contract, main task only. Stopping an idle
    // timer returns ESP_ERR_INVALID_STATE, which is harmless here.
    unsafe {
        esp_timer_stop(fuel_timer());
        esp_timer_start_once(fuel_timer(), u64::from(period_us));
    }
}

#[cfg(target_os = "espidf")]
pub fn fuel_timer_stop() {
    // SAFETY: fuel_timer() contract, main task only.
    unsafe { esp_timer_stop(fuel_timer()); }
}

#[cfg(not(target_os = "espidf"))]
pub fn fuel_timer_start(period_us: u32) {
    // Latch an expiry nobody has polled yet before the deadline moves.
    sim::expire_timer();
    let deadline = std::time::Instant::now() + std::time::Duration::from_micros(u64::from(period_us));
    if let Ok(mut slot) = sim::TIMER_DEADLINE.lock() {
        *slot = Some(deadline);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn fuel_timer_stop() {
    if let Ok(mut slot) = sim::TIMER_DEADLINE.lock() {
        *slot = None;
    }
}

/// Read the overflow flag.
pub fn fuel_timer_overflowed() -> bool {
    #[cfg(not(target_os = "espidf"))]
    sim::expire_timer();
    FUEL_TIMER_OVERFLOW.load(Ordering::Acquire)
}

pub fn fuel_timer_clear_overflow() {
    FUEL_TIMER_OVERFLOW.store(false, Ordering::Release);
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn toggle_gpio_isr(_arg: *mut core::ffi::c_void) {
    crate::toggle::toggle_isr_handler();
}

/// Install the per-pin GPIO ISR service and register the toggle handler.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler only flips
    // an atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(pins::TOGGLE_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(pins::TOGGLE_GPIO, Some(toggle_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::TOGGLE_GPIO);

        info!("hw_init: ISR service installed (toggle on GPIO{})", pins::TOGGLE_GPIO);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped, use sim_press_toggle()");
    Ok(())
}

// ── Host board model ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    pub(super) static ADC_SAMPLE: AtomicU8 = AtomicU8::new(0);
    pub(super) static PULSES: AtomicU16 = AtomicU16::new(0);
    pub(super) static PCNT_RUNNING: AtomicBool = AtomicBool::new(false);
    pub(super) static LED: AtomicBool = AtomicBool::new(false);
    pub(super) static TIMER_DEADLINE: Mutex<Option<Instant>> = Mutex::new(None);

    /// Raise the overflow flag once the one-shot deadline has passed.
    pub(super) fn expire_timer() {
        let Ok(mut slot) = TIMER_DEADLINE.lock() else {
            return;
        };
        if slot.is_some_and(|deadline| Instant::now() >= deadline) {
            *slot = None;
            super::FUEL_TIMER_OVERFLOW.store(true, Ordering::Release);
        }
    }
}

/// Present `sample` on the simulated converter's data bus.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc_sample(sample: u8) {
    sim::ADC_SAMPLE.store(sample, Ordering::Relaxed);
}

/// Feed `n` speed-sensor edges; ignored while the counter is stopped.
#[cfg(not(target_os = "espidf"))]
pub fn sim_add_pulses(n: u16) {
    if sim::PCNT_RUNNING.load(Ordering::Relaxed) {
        // Wraps like the 16-bit register.
        let _ = sim::PULSES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |p| {
            Some(p.wrapping_add(n))
        });
    }
}

/// Current level of the simulated over-temperature LED.
#[cfg(not(target_os = "espidf"))]
pub fn sim_led() -> bool {
    sim::LED.load(Ordering::Relaxed)
}

/// Simulate a falling edge on the toggle input.
#[cfg(not(target_os = "espidf"))]
pub fn sim_press_toggle() {
    crate::toggle::toggle_isr_handler();
}
