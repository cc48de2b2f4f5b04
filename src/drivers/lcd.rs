//! HD44780 16x2 character LCD over a 4-bit parallel bus.
//!
//! Write-only wiring (R/W tied to GND), so every command is followed by a
//! fixed wait instead of a busy-flag poll.
//!
//! Generic over `embedded-hal` pins and delay so the same driver runs on
//! ESP-IDF GPIOs and on recording fakes in tests.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::DisplayPort;
use crate::layout::{COLS, ROWS};

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
/// 4-bit bus, 2 lines, 5x8 font.
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;
/// DDRAM address of the first column of row 2.
const ROW2_OFFSET: u8 = 0x40;

const POWER_ON_WAIT_MS: u32 = 50;
const CLEAR_WAIT_US: u32 = 2_000;
const COMMAND_WAIT_US: u32 = 50;

/// Widest value a `u32` can render to.
const MAX_DIGITS: usize = 10;

/// Render `value` in decimal, zero-padded to `min_width` digits (capped
/// at the width of `u32::MAX`).
pub fn format_number(value: u32, min_width: u8) -> heapless::String<MAX_DIGITS> {
    let width = usize::from(min_width).min(MAX_DIGITS);
    let mut out = heapless::String::new();
    // Cannot overflow: at most MAX_DIGITS characters.
    let _ = write!(out, "{value:0width$}");
    out
}

/// Translate a 1-based (row, col) into a DDRAM address, or `None` when
/// the position is off-screen.
pub fn ddram_address(row: u8, col: u8) -> Option<u8> {
    if !(1..=ROWS).contains(&row) || !(1..=COLS).contains(&col) {
        return None;
    }
    let base = if row == 1 { 0 } else { ROW2_OFFSET };
    Some(base + col - 1)
}

pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// `data` is D4..D7 in bit order.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self { rs, en, data, delay }
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let _ = pin.set_state(((nibble >> bit) & 1 == 1).into());
        }
        let _ = self.en.set_high();
        self.delay.delay_us(1);
        let _ = self.en.set_low();
        self.delay.delay_us(COMMAND_WAIT_US);
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) {
        let _ = self.rs.set_state(is_data.into());
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }

    fn command(&mut self, cmd: u8) {
        self.write_byte(cmd, false);
        if cmd == CMD_CLEAR {
            self.delay.delay_us(CLEAR_WAIT_US);
        }
    }
}

impl<P: OutputPin, D: DelayNs> DisplayPort for Hd44780<P, D> {
    fn init(&mut self) {
        self.delay.delay_ms(POWER_ON_WAIT_MS);
        let _ = self.rs.set_low();
        let _ = self.en.set_low();

        // Reset-by-instruction: three 8-bit function sets, then 4-bit.
        self.write_nibble(0x3);
        self.delay.delay_us(4_100);
        self.write_nibble(0x3);
        self.delay.delay_us(100);
        self.write_nibble(0x3);
        self.write_nibble(0x2);

        self.command(CMD_FUNCTION_4BIT_2LINE);
        self.command(CMD_DISPLAY_ON);
        self.command(CMD_ENTRY_INCREMENT);
        self.command(CMD_CLEAR);
    }

    fn write_text(&mut self, row: u8, col: u8, text: &str) {
        let Some(addr) = ddram_address(row, col) else {
            return;
        };
        self.command(CMD_SET_DDRAM | addr);
        let room = usize::from(COLS - (col - 1));
        for byte in text.bytes().take(room) {
            let glyph = if byte.is_ascii() { byte } else { b'?' };
            self.write_byte(glyph, true);
        }
    }

    fn write_number(&mut self, row: u8, col: u8, value: u32, min_width: u8) {
        let digits = format_number(value, min_width);
        self.write_text(row, col, &digits);
    }
}
