//! Mock board, display, delay and event sink for integration tests.
//!
//! Records every register-level call so tests can assert on the full
//! peripheral history without touching real GPIO/PCNT/timer registers.

use std::collections::VecDeque;

use cluster::adapters::text_display::TextDisplay;
use cluster::app::events::ClusterEvent;
use cluster::app::ports::{
    ConverterLines, CounterRegisters, DisplayPort, EventSink, IndicatorPort, TimerRegisters,
};
use cluster::toggle::SystemToggle;
use embedded_hal::delay::DelayNs;

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Write(bool),
    Read(bool),
    BusRead,
    CounterMode,
    CounterRun(bool),
    TimerMode,
    TimerLoad(u8, u8),
    TimerRun(bool),
    TimerClear,
    Led(bool),
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub calls: Vec<BoardCall>,
    /// Samples handed out one per conversion; `sample` once exhausted.
    pub samples: VecDeque<u8>,
    pub sample: u8,
    /// INTR reads that report busy before each conversion completes.
    pub busy_polls: u32,
    busy_left: u32,
    pub pulses: u16,
    pub counting: bool,
    pub timer_running: bool,
    pub overflow: bool,
    /// Overflow as soon as the timer starts (a loop slower than the period).
    pub fire_on_start: bool,
    pub led: bool,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            samples: VecDeque::new(),
            sample: 25,
            busy_polls: 0,
            busy_left: 0,
            pulses: 0,
            counting: false,
            timer_running: false,
            overflow: false,
            fire_on_start: true,
            led: false,
        }
    }

    pub fn with_sample(sample: u8) -> Self {
        Self { sample, ..Self::new() }
    }

    pub fn count(&self, call: BoardCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }

    pub fn timer_starts(&self) -> usize {
        self.count(BoardCall::TimerRun(true))
    }

    pub fn led_history(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Led(on) => Some(*on),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterLines for MockBoard {
    fn set_write(&mut self, high: bool) {
        if high {
            self.busy_left = self.busy_polls;
        }
        self.calls.push(BoardCall::Write(high));
    }

    fn set_read(&mut self, high: bool) {
        self.calls.push(BoardCall::Read(high));
    }

    fn conversion_busy(&mut self) -> bool {
        if self.busy_left == 0 {
            return false;
        }
        self.busy_left -= 1;
        true
    }

    fn read_data_bus(&mut self) -> u8 {
        self.calls.push(BoardCall::BusRead);
        self.samples.pop_front().unwrap_or(self.sample)
    }
}

impl CounterRegisters for MockBoard {
    fn configure_external_count(&mut self) {
        self.calls.push(BoardCall::CounterMode);
    }

    fn set_running(&mut self, run: bool) {
        self.counting = run;
        self.calls.push(BoardCall::CounterRun(run));
    }

    fn read_high(&mut self) -> u8 {
        self.pulses.to_be_bytes()[0]
    }

    fn read_low(&mut self) -> u8 {
        self.pulses.to_be_bytes()[1]
    }
}

impl TimerRegisters for MockBoard {
    fn configure_interval_mode(&mut self) {
        self.calls.push(BoardCall::TimerMode);
    }

    fn load(&mut self, high: u8, low: u8) {
        self.calls.push(BoardCall::TimerLoad(high, low));
    }

    fn set_running(&mut self, run: bool) {
        self.timer_running = run;
        if run && self.fire_on_start {
            self.overflow = true;
        }
        self.calls.push(BoardCall::TimerRun(run));
    }

    fn overflowed(&mut self) -> bool {
        self.overflow
    }

    fn clear_overflow(&mut self) {
        self.overflow = false;
        self.calls.push(BoardCall::TimerClear);
    }
}

impl IndicatorPort for MockBoard {
    fn set_over_temperature(&mut self, on: bool) {
        self.led = on;
        self.calls.push(BoardCall::Led(on));
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

/// Frame buffer plus an ordered log of every write.
#[derive(Default)]
pub struct RecordingDisplay {
    pub screen: TextDisplay,
    pub writes: Vec<(u8, u8, String)>,
    pub inits: u32,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, row: u8) -> &str {
        self.screen.row(row)
    }
}

impl DisplayPort for RecordingDisplay {
    fn init(&mut self) {
        self.inits += 1;
        self.screen.init();
    }

    fn write_text(&mut self, row: u8, col: u8, text: &str) {
        self.writes.push((row, col, text.to_string()));
        self.screen.write_text(row, col, text);
    }

    fn write_number(&mut self, row: u8, col: u8, value: u32, min_width: u8) {
        self.writes.push((row, col, format!("{value:0width$}", width = usize::from(min_width))));
        self.screen.write_number(row, col, value, min_width);
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Records every millisecond wait; optionally flips a toggle from inside
/// the `n`th wait, the way an interrupt lands mid-iteration.
#[derive(Default)]
pub struct MockDelay<'a> {
    pub waits_ms: Vec<u32>,
    toggle_at: Option<(usize, &'a SystemToggle)>,
}

#[allow(dead_code)]
impl<'a> MockDelay<'a> {
    pub fn new() -> Self {
        Self {
            waits_ms: Vec::new(),
            toggle_at: None,
        }
    }

    pub fn toggling(toggle: &'a SystemToggle, at_wait: usize) -> Self {
        Self {
            waits_ms: Vec::new(),
            toggle_at: Some((at_wait, toggle)),
        }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        if let Some((at, toggle)) = self.toggle_at {
            if at == self.waits_ms.len() {
                toggle.toggle();
            }
        }
        self.waits_ms.push(ms);
    }
}

// ── EventLog ──────────────────────────────────────────────────

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<ClusterEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&ClusterEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &ClusterEvent) {
        self.events.push(*event);
    }
}
