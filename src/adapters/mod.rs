//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `hardware`     | ConverterLines     | ESP32 GPIO (ADC0804 bus)    |
//! |                | CounterRegisters   | ESP32 PCNT unit             |
//! |                | TimerRegisters     | ESP32 one-shot `esp_timer`  |
//! |                | IndicatorPort      | ESP32 GPIO (LED)            |
//! | `log_sink`     | EventSink          | Serial log output           |
//! | `text_display` | DisplayPort        | In-memory 2x16 frame buffer |
//!
//! The HD44780 [`DisplayPort`](crate::app::ports::DisplayPort) lives in
//! [`drivers::lcd`](crate::drivers::lcd).

pub mod hardware;
pub mod log_sink;
pub mod text_display;
